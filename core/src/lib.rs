pub use chip8::Chip8;
pub use config::Config;
pub use constants::{CLOCK_SPEED, HALT, TIMER_SPEED};
pub use error::{DecodeError, Error, Result};
pub use instruction::{decode, fetch_and_advance, Instruction};
pub use memory::Memory;
pub use registers::{Register, Registers, Timers};
pub use state::{FrameBuffer, Keys, State};
pub use trace::{Effect, Trace, TraceSink};

mod chip8;
mod config;
pub mod constants;
mod error;
mod instruction;
mod memory;
mod opcode;
mod operations;
mod registers;
pub mod state;
mod trace;
