use std::fmt;

use crate::error::DecodeError;
use crate::instruction::Instruction;
use crate::registers::Register;

/// What an executed instruction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Halt,
    Clear,
    Register { register: Register, value: u8 },
    /// A register write that also set the carry flag
    Flagged { register: Register, value: u8, flag: u8 },
    Index(u16),
    /// I was written and VF holds its overflow
    FlaggedIndex { index: u16, flag: u8 },
    Jump(u16),
    Call { ret: u16, target: u16 },
    Return(u16),
    Skip(bool),
    /// `first` is the byte written at `address`
    Memory { address: u16, len: usize, first: u8 },
    /// `first` is the value loaded into V0
    Registers { last: Register, first: u8 },
    Delay(u8),
    Sound(u8),
    Draw { collision: bool },
    AwaitKey(Register),
}

impl Effect {
    /// The resulting register or memory value, if the effect has one.
    pub fn value(&self) -> Option<u16> {
        match *self {
            Effect::Register { value, .. } | Effect::Flagged { value, .. } => Some(value.into()),
            Effect::Index(index) | Effect::FlaggedIndex { index, .. } => Some(index),
            Effect::Jump(address) | Effect::Return(address) => Some(address),
            Effect::Call { target, .. } => Some(target),
            Effect::Delay(value) | Effect::Sound(value) => Some(value.into()),
            Effect::Draw { collision } => Some(collision.into()),
            Effect::Memory { first, .. } | Effect::Registers { first, .. } => Some(first.into()),
            _ => None,
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Effect::Halt => write!(f, "halt"),
            Effect::Clear => write!(f, "screen cleared"),
            Effect::Register { register, value } => write!(f, "{register} = {value:#04X}"),
            Effect::Flagged {
                register,
                value,
                flag,
            } => write!(f, "{register} = {value:#04X}, VF = {flag}"),
            Effect::Index(index) => write!(f, "I = {index:#06X}"),
            Effect::FlaggedIndex { index, flag } => write!(f, "I = {index:#06X}, VF = {flag}"),
            Effect::Jump(address) => write!(f, "PC = {address:#06X}"),
            Effect::Call { ret, target } => write!(f, "push {ret:#06X}, PC = {target:#06X}"),
            Effect::Return(address) => write!(f, "pop PC = {address:#06X}"),
            Effect::Skip(true) => write!(f, "skip next"),
            Effect::Skip(false) => write!(f, "no skip"),
            Effect::Memory {
                address,
                len,
                first,
            } => write!(
                f,
                "mem[{address:#06X}..{:#06X}] written, first {first:#04X}",
                usize::from(address) + len
            ),
            Effect::Registers { last, first } => write!(f, "V0..={last} loaded, V0 = {first:#04X}"),
            Effect::Delay(value) => write!(f, "DT = {value:#04X}"),
            Effect::Sound(value) => write!(f, "ST = {value:#04X}"),
            Effect::Draw { collision } => write!(f, "sprite drawn, VF = {}", u8::from(collision)),
            Effect::AwaitKey(register) => write!(f, "waiting for a key into {register}"),
        }
    }
}

/// One executed instruction, as seen by a debugger or visualizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trace {
    /// Where the instruction was fetched from
    pub address: u16,
    pub word: u16,
    pub instruction: Instruction,
    pub effect: Effect,
}

impl Trace {
    pub fn mnemonic(&self) -> String {
        self.instruction.to_string()
    }

    pub fn description(&self) -> String {
        self.effect.to_string()
    }

    pub fn value(&self) -> Option<u16> {
        self.effect.value()
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04X}: {:04X} {:<16} ; {}",
            self.address,
            self.word,
            self.instruction.to_string(),
            self.effect
        )
    }
}

/// Receives a record of every step. Purely observational.
pub trait TraceSink {
    fn record(&mut self, trace: &Trace);

    /// Called instead of `record` when a word doesn't decode.
    fn decode_failure(&mut self, _address: u16, _error: &DecodeError) {}
}

impl TraceSink for Vec<Trace> {
    fn record(&mut self, trace: &Trace) {
        self.push(*trace);
    }
}
