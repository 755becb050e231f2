//! # POI Finder - Proximity Ranking over Block-Stored Points of Interest
//!
//! This crate ranks points of interest by distance from a cursor on a pixel
//! map and drives a small interactive loop around that ranking: a panning
//! viewport, a paginated result list and touch-screen setting buttons.
//!
//! ## Features
//!
//! - **Block Storage**: Fixed 64-byte records packed eight to a 512-byte block
//! - **Single-Block Cache**: Consecutive reads from one block cost one device read
//! - **Retry Policy**: Unbounded retry or bounded retry with backoff
//! - **Two Sorts**: Stable insertion sort and in-place quicksort, timed
//! - **Tile Panning**: The window jumps one tile when the cursor hits an edge
//! - **Headless**: Input and drawing go through traits, with scripted and
//!   recording implementations included
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poi_finder::{
//!     FileBlockDevice, FinderConfig, FinderEngine, RecordingSurface, ScriptedInput,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FinderConfig::builder().base_block(0).record_count(1066).build()?;
//! let device = FileBlockDevice::open("restaurants.img")?;
//! let mut engine = FinderEngine::new(config, device)?;
//!
//! let mut input = ScriptedInput::new(512);
//! let mut surface = RecordingSurface::new();
//! engine.start(&mut surface);
//!
//! // press and release the stick button to rank everything near the cursor
//! input.click();
//! while !input.is_exhausted() {
//!     engine.tick(&mut input, &mut surface)?;
//! }
//! assert!(engine.is_browsing());
//! # Ok(())
//! # }
//! ```

pub mod candidates;
pub mod config;
pub mod engine;
pub mod errors;
pub mod input;
pub mod navigator;
pub mod projection;
pub mod ranking;
pub mod rating;
pub mod sort;
pub mod store;
pub mod surface;
pub mod touch;
pub mod viewport;

pub use candidates::{build_candidates, Candidate};
pub use config::{FinderConfig, FinderConfigBuilder, StoreConfig};
pub use engine::{FinderEngine, Mode};
pub use errors::{FinderError, FinderResult};
pub use input::{Axis, InputFrame, InputSource, JoystickConfig, ScriptedInput, TouchPoint};
pub use navigator::{NavInput, NavOutcome, ResultListNavigator, PAGE_SIZE};
pub use projection::{remap, GeoBounds, MapPoint, MapProjection};
pub use ranking::{Ranker, SortReport};
pub use rating::{display_rating, DisplayRating};
pub use sort::{insertion_sort, quick_sort, timed_sort, SortAlgorithm, SortMode, SortTiming};
pub use store::{
    encode_blocks, BlockDevice, FileBlockDevice, MemoryBlockDevice, Record, RecordStore,
    RetryPolicy, StoreStats,
};
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use touch::{TouchCalibration, TouchZone};
pub use viewport::{MapGeometry, Pan, ScreenPoint, ViewportController};
