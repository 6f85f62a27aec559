use thiserror::Error;

use crate::constants::{KEY_COUNT, MEMORY_SIZE, REGISTER_COUNT, STACK_SIZE};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Faults that stop the current step.
///
/// When one of these is returned the instruction that caused it has not written
/// any register or memory cell, so the caller may inspect the state as it was.
#[derive(Debug, Error)]
pub enum Error {
    #[error("address {address:#06X} is outside of the {} byte address space", MEMORY_SIZE)]
    AddressOutOfBounds { address: usize },

    #[error("register index {index:#X} is outside of V0..V{:X}", REGISTER_COUNT - 1)]
    RegisterOutOfBounds { index: usize },

    #[error("call stack overflow: more than {} nested calls", STACK_SIZE)]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("key {key:#04X} is not one of the {} keypad keys", KEY_COUNT)]
    KeyOutOfRange { key: u8 },

    #[error("ROM of {size} bytes doesn't fit at {offset:#06X}; {available} bytes are free")]
    RomTooLarge {
        size: usize,
        offset: usize,
        available: usize,
    },

    #[error("unable to read ROM: {0}")]
    Io(#[from] std::io::Error),
}

/// An instruction word that doesn't name any instruction.
///
/// Decode failures aren't fatal: the program counter has already moved past the
/// word, so execution carries on with the next instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode {0:#06X}")]
    UnknownOpcode(u16),

    #[error("unknown sub-opcode {sub:#04X} in group {group:X} ({word:#06X})")]
    UnknownSubOpcode { word: u16, group: u8, sub: u8 },
}

impl DecodeError {
    /// The raw instruction word that failed to decode.
    pub fn word(&self) -> u16 {
        match *self {
            DecodeError::UnknownOpcode(word) => word,
            DecodeError::UnknownSubOpcode { word, .. } => word,
        }
    }
}
