//! Input collaborators: the two-axis stick, its push button and the touch
//! panel.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::errors::{FinderError, FinderResult};

/// Stick axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Raw touch panel sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
    pub pressure: i32,
}

impl TouchPoint {
    pub fn new(x: i32, y: i32, pressure: i32) -> Self {
        TouchPoint { x, y, pressure }
    }
}

/// Source of per-tick input samples.
pub trait InputSource {
    /// Called once at the start of every engine tick, before any reads.
    fn begin_tick(&mut self) {}

    fn read_axis(&mut self, axis: Axis) -> i32;

    fn is_confirm_pressed(&mut self) -> bool;

    fn read_touch(&mut self) -> TouchPoint;
}

/// Stick calibration and speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoystickConfig {
    /// Reading at rest
    pub center: i32,
    /// Half-width of the band around `center` treated as rest
    pub dead_zone: i32,
    /// Readings beyond the dead zone are divided by this to get pixels/tick
    pub speed_divisor: i32,
    /// The horizontal reading grows when pushed left
    pub invert_x: bool,
    pub invert_y: bool,
    /// While browsing, a vertical reading below this moves the highlight up
    pub list_up_below: i32,
    /// While browsing, a vertical reading above this moves the highlight down
    pub list_down_above: i32,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        JoystickConfig {
            center: 512,
            dead_zone: 64,
            speed_divisor: 20,
            invert_x: true,
            invert_y: false,
            list_up_below: 80,
            list_down_above: 950,
        }
    }
}

impl JoystickConfig {
    pub fn validate(&self) -> FinderResult<()> {
        if self.speed_divisor <= 0 {
            return Err(FinderError::InvalidConfig(format!(
                "Stick speed divisor must be positive, got {}",
                self.speed_divisor
            )));
        }
        if self.dead_zone < 0 {
            return Err(FinderError::InvalidConfig(format!(
                "Stick dead zone must not be negative, got {}",
                self.dead_zone
            )));
        }
        if self.list_up_below >= self.list_down_above {
            return Err(FinderError::InvalidConfig(format!(
                "List thresholds overlap: up below {}, down above {}",
                self.list_up_below, self.list_down_above
            )));
        }
        Ok(())
    }

    pub fn outside_dead_zone(&self, value: i32) -> bool {
        value < self.center - self.dead_zone || value > self.center + self.dead_zone
    }

    /// Pixels to move for a reading: distance past the dead zone boundary on
    /// the side the reading falls, divided by the speed divisor.
    pub fn axis_delta(&self, value: i32) -> i32 {
        let low = self.center - self.dead_zone;
        let high = self.center + self.dead_zone;
        if value < low {
            (value - low) / self.speed_divisor
        } else if value > high {
            (value - high) / self.speed_divisor
        } else {
            0
        }
    }

    /// Cursor motion `(dx, dy)` for a pair of readings.
    pub fn cursor_delta(&self, horizontal: i32, vertical: i32) -> (i32, i32) {
        let dx = self.axis_delta(horizontal);
        let dy = self.axis_delta(vertical);
        (
            if self.invert_x { -dx } else { dx },
            if self.invert_y { -dy } else { dy },
        )
    }
}

/// Everything sampled during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFrame {
    pub horizontal: i32,
    pub vertical: i32,
    pub confirm: bool,
    pub touch: TouchPoint,
}

impl InputFrame {
    /// Stick at rest, nothing pressed or touched.
    pub fn idle(center: i32) -> Self {
        InputFrame {
            horizontal: center,
            vertical: center,
            confirm: false,
            touch: TouchPoint::default(),
        }
    }

    pub fn stick(mut self, horizontal: i32, vertical: i32) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    pub fn pressed(mut self) -> Self {
        self.confirm = true;
        self
    }

    pub fn touched(mut self, touch: TouchPoint) -> Self {
        self.touch = touch;
        self
    }
}

/// Replays a queue of frames, one per tick; idle once exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedInput {
    frames: VecDeque<InputFrame>,
    idle: InputFrame,
    current: InputFrame,
}

impl ScriptedInput {
    pub fn new(center: i32) -> Self {
        let idle = InputFrame::idle(center);
        ScriptedInput {
            frames: VecDeque::new(),
            idle,
            current: idle,
        }
    }

    pub fn push(&mut self, frame: InputFrame) -> &mut Self {
        self.frames.push_back(frame);
        self
    }

    /// Queues `count` idle frames.
    pub fn wait(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.frames.push_back(self.idle);
        }
        self
    }

    /// Queues a press followed by a release.
    pub fn click(&mut self) -> &mut Self {
        self.frames.push_back(self.idle.pressed());
        self.frames.push_back(self.idle);
        self
    }

    /// Queues a stick deflection followed by a return to rest.
    pub fn nudge(&mut self, horizontal: i32, vertical: i32) -> &mut Self {
        self.frames.push_back(self.idle.stick(horizontal, vertical));
        self.frames.push_back(self.idle);
        self
    }

    /// Queues a touch followed by a lift.
    pub fn tap(&mut self, touch: TouchPoint) -> &mut Self {
        self.frames.push_back(self.idle.touched(touch));
        self.frames.push_back(self.idle);
        self
    }

    pub fn idle_frame(&self) -> InputFrame {
        self.idle
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn begin_tick(&mut self) {
        self.current = self.frames.pop_front().unwrap_or(self.idle);
    }

    fn read_axis(&mut self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.current.horizontal,
            Axis::Vertical => self.current.vertical,
        }
    }

    fn is_confirm_pressed(&mut self) -> bool {
        self.current.confirm
    }

    fn read_touch(&mut self) -> TouchPoint {
        self.current.touch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dead_zone_gives_no_motion() {
        let cfg = JoystickConfig::default();
        for value in 448..=576 {
            assert_eq!(cfg.axis_delta(value), 0);
            assert!(!cfg.outside_dead_zone(value));
        }
    }

    #[test]
    fn test_axis_delta_proportional_to_deflection() {
        let cfg = JoystickConfig::default();
        assert_eq!(cfg.axis_delta(1023), (1023 - 576) / 20);
        assert_eq!(cfg.axis_delta(0), -448 / 20);
        // truncates toward zero
        assert_eq!(cfg.axis_delta(590), 0);
        assert_eq!(cfg.axis_delta(420), -1);
    }

    #[test]
    fn test_horizontal_is_inverted() {
        let cfg = JoystickConfig::default();
        let (dx, dy) = cfg.cursor_delta(1023, 1023);
        assert!(dx < 0);
        assert!(dy > 0);
    }

    #[test]
    fn test_validate_rejects_zero_divisor() {
        let cfg = JoystickConfig {
            speed_divisor: 0,
            ..JoystickConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert!(JoystickConfig::default().validate().is_ok());
    }

    #[test]
    fn test_scripted_input_replays_then_idles() {
        let mut input = ScriptedInput::new(512);
        input.nudge(1023, 512).click();
        assert_eq!(input.remaining(), 4);

        input.begin_tick();
        assert_eq!(input.read_axis(Axis::Horizontal), 1023);
        assert!(!input.is_confirm_pressed());

        input.begin_tick();
        assert_eq!(input.read_axis(Axis::Horizontal), 512);

        input.begin_tick();
        assert!(input.is_confirm_pressed());

        input.begin_tick();
        input.begin_tick();
        assert!(input.is_exhausted());
        assert!(!input.is_confirm_pressed());
        assert_eq!(input.read_touch(), TouchPoint::default());
    }
}
