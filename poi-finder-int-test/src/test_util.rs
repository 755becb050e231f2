use poi_finder::{
    FileBlockDevice, FinderConfigBuilder, FinderEngine, FinderResult, GeoBounds, Record,
    ScriptedInput, Surface,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::TempDir;

/// Runs `test` between `before` and `after`. `after` runs even when the test
/// fails; the first error is turned into a panic with context.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    B: FnOnce() -> FinderResult<TestContext>,
    T: FnOnce(&TestContext) -> FinderResult<()>,
    A: FnOnce(TestContext) -> FinderResult<()>,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let start = Instant::now();
    let result = test(&ctx);
    log::debug!("Test body took {:?}", start.elapsed());

    let after_result = after(ctx);
    if let Err(e) = result {
        panic!("Test failed: {:?}", e);
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

/// A record image on disk plus the records written to it.
pub struct TestContext {
    dir: TempDir,
    image: PathBuf,
    base_block: u64,
    records: Vec<Record>,
}

impl TestContext {
    pub fn image(&self) -> &Path {
        &self.image
    }

    pub fn base_block(&self) -> u64 {
        self.base_block
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Config builder already pointed at this image.
    pub fn config(&self) -> FinderConfigBuilder {
        FinderConfigBuilder::new()
            .geo_bounds(identity_bounds())
            .base_block(self.base_block)
            .record_count(self.records.len())
    }

    pub fn open_device(&self) -> FinderResult<FileBlockDevice> {
        FileBlockDevice::open(&self.image)
    }

    pub fn engine(&self, config: FinderConfigBuilder) -> FinderResult<FinderEngine<FileBlockDevice>> {
        FinderEngine::new(config.build()?, self.open_device()?)
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Writes `records` to a fresh image starting at `base_block`.
pub fn create_test_context(records: Vec<Record>, base_block: u64) -> FinderResult<TestContext> {
    let dir = tempfile::tempdir()?;
    let image = dir.path().join("records.img");
    FileBlockDevice::write_image(&image, base_block, &records)?;
    log::info!(
        "Wrote {} records at block {} to {:?}",
        records.len(),
        base_block,
        image
    );
    Ok(TestContext {
        dir,
        image,
        base_block,
        records,
    })
}

pub fn cleanup(ctx: TestContext) -> FinderResult<()> {
    let path = ctx.dir.path().to_path_buf();
    ctx.dir.close()?;
    log::debug!("Removed {:?}", path);
    Ok(())
}

/// Bounds under which a record's longitude is its map x and its latitude
/// its map y.
pub fn identity_bounds() -> GeoBounds {
    GeoBounds {
        lat_north: 0,
        lat_south: 2048,
        lon_west: 0,
        lon_east: 2048,
    }
}

/// Record that projects to map pixel `(x, y)` under [`identity_bounds`].
pub fn record_at(x: i32, y: i32, rating: u8, name: &str) -> Record {
    Record::new(y, x, rating, name)
}

/// `count` records scattered over the map with ratings 0..=10.
pub fn random_records(count: usize, seed: u64) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            record_at(
                rng.gen_range(0..2048),
                rng.gen_range(0..2048),
                rng.gen_range(0..=10),
                &format!("Place {}", i),
            )
        })
        .collect()
}

/// Ticks `engine` until `input` has replayed every queued frame. Returns the
/// number of ticks run.
pub fn run_until_exhausted<S: Surface>(
    engine: &mut FinderEngine<FileBlockDevice>,
    input: &mut ScriptedInput,
    surface: &mut S,
) -> FinderResult<usize> {
    let mut ticks = 0;
    while !input.is_exhausted() {
        engine.tick(input, surface)?;
        ticks += 1;
    }
    Ok(ticks)
}
