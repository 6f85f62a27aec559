/// Size of the addressable memory in bytes.
pub const MEMORY_SIZE: usize = 0x1000;

/// 0x200 is where ROMs are loaded into memory
pub const PROGRAM_START: u16 = 0x200;

/// Number of general purpose registers (V0..VF).
pub const REGISTER_COUNT: usize = 0x10;

/// Levels of nesting allowed in the call stack.
pub const STACK_SIZE: usize = 0x10;

/// Number of keys on the hexadecimal keypad (0x0..0xF).
pub const KEY_COUNT: usize = 0x10;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Instructions executed per second.
pub const CLOCK_SPEED: u32 = 500;

/// Timer decrements per second.
pub const TIMER_SPEED: u32 = 60;

/// The reserved all-zero instruction word that ends a run.
pub const HALT: u16 = 0x0000;

/// Where the sprite sheet is placed in memory.
pub const SPRITE_SHEET_START: u16 = 0x000;

/// Bytes per hexadecimal digit sprite.
pub const SPRITE_SIZE: u16 = 5;

/// # Sprite Sheet
/// Sprites for the hexadecimal digits 0..F, each 8 pixels wide and 5 tall.
///
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
