use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, KEY_COUNT, PROGRAM_START};
use crate::memory::Memory;
use crate::registers::{Register, Registers};

/// The FrameBuffer is indexed as [y][x]; lit pixels are 1
pub type FrameBuffer = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// Pressed status of the keys 0..F
pub type Keys = [bool; KEY_COUNT];

/// Everything an instruction may read or write
///
/// - `registers` the register file, timers and call stack
/// - `memory` 4096 bytes of addressable memory
/// - `frame_buffer` the contents of the next frame to be drawn
/// - `draw_flag` set whenever `frame_buffer` changes
/// - `register_needing_key` emulation halts until a key's value is written to this register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub registers: Registers,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub register_needing_key: Option<Register>,
}

impl State {
    pub fn new(program_start: u16, memory: Memory) -> Self {
        State {
            registers: Registers::new(program_start),
            memory,
            frame_buffer: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            draw_flag: false,
            register_needing_key: None,
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new(PROGRAM_START, Memory::new())
    }
}
