use std::time::Duration;

use crate::constants::{CLOCK_SPEED, PROGRAM_START, TIMER_SPEED};

/// # Config
/// Knobs for a `Chip8` that a front-end may want to turn.
///
/// - `program_start` where ROMs are loaded and where the program counter starts
/// - `clock_speed` instructions executed per second
/// - `timer_speed` timer decrements per second, usually 60
/// - `sprite_sheet` whether the hex digit sprites are loaded at 0x000
/// - `seed` fixes the random source used by `Cxnn`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub program_start: u16,
    pub clock_speed: u32,
    pub timer_speed: u32,
    pub sprite_sheet: bool,
    pub seed: Option<u64>,
}

impl Config {
    /// How many instructions run between two timer ticks.
    pub fn cycles_per_frame(&self) -> u32 {
        (self.clock_speed / self.timer_speed.max(1)).max(1)
    }

    /// Wall-clock length of a single timer frame.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs(1) / self.timer_speed.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            program_start: PROGRAM_START,
            clock_speed: CLOCK_SPEED,
            timer_speed: TIMER_SPEED,
            sprite_sheet: true,
            seed: None,
        }
    }
}
