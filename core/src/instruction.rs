use std::fmt;

use rand::RngCore;

use crate::constants::HALT;
use crate::error::{DecodeError, Result};
use crate::opcode::Opcode;
use crate::operations::*;
use crate::registers::Register;
use crate::state::{Keys, State};
use crate::trace::Effect;

/// A decoded instruction word with its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `0000`
    Halt,
    /// `00E0`
    Clear,
    /// `00EE`
    Return,
    /// `1nnn`
    Jump(u16),
    /// `2nnn`
    Call(u16),
    /// `3xnn`
    SkipEqual(Register, u8),
    /// `4xnn`
    SkipNotEqual(Register, u8),
    /// `5xy0`
    SkipRegistersEqual(Register, Register),
    /// `6xnn`
    Load(Register, u8),
    /// `7xnn`
    Add(Register, u8),
    /// `8xy0`
    Move(Register, Register),
    /// `8xy1`
    Or(Register, Register),
    /// `8xy2`
    And(Register, Register),
    /// `8xy3`
    Xor(Register, Register),
    /// `8xy4`
    AddRegisters(Register, Register),
    /// `8xy5`
    Sub(Register, Register),
    /// `8xy6`
    ShiftRight(Register, Register),
    /// `8xy7`
    SubNegated(Register, Register),
    /// `8xyE`
    ShiftLeft(Register, Register),
    /// `9xy0`
    SkipRegistersNotEqual(Register, Register),
    /// `Annn`
    LoadIndex(u16),
    /// `Bnnn`
    JumpOffset(u16),
    /// `Cxnn`
    Random(Register, u8),
    /// `Dxyn`
    Draw(Register, Register, u8),
    /// `Ex9E`
    SkipPressed(Register),
    /// `ExA1`
    SkipNotPressed(Register),
    /// `Fx07`
    LoadDelay(Register),
    /// `Fx0A`
    AwaitKey(Register),
    /// `Fx15`
    SetDelay(Register),
    /// `Fx18`
    SetSound(Register),
    /// `Fx1E`
    AddIndex(Register),
    /// `Fx29`
    LoadSprite(Register),
    /// `Fx33`
    StoreBcd(Register),
    /// `Fx55`
    StoreRegisters(Register),
    /// `Fx65`
    LoadRegisters(Register),
}

/// Reads the instruction word at the program counter and moves the program counter past it.
///
/// Memory holds bytes but instructions are 16 bits, so two subsequent bytes are
/// combined with the first as the high byte.
pub fn fetch_and_advance(state: &mut State) -> Result<u16> {
    let word = state.memory.read_word(state.registers.pc as usize)?;
    state.registers.advance_pc();
    Ok(word)
}

/// Selects the Instruction for an instruction word.
///
/// The group nibble picks the instruction; groups 8, E and F are further cased
/// on their sub-opcode.
pub fn decode(word: u16) -> Result<Instruction, DecodeError> {
    use Instruction::*;

    let x = Register::from_nibble(word.x());
    let y = Register::from_nibble(word.y());
    let instruction = match word.group() {
        0x0 => match word {
            HALT => Halt,
            0x00E0 => Clear,
            0x00EE => Return,
            _ => return Err(DecodeError::UnknownOpcode(word)),
        },
        0x1 => Jump(word.nnn()),
        0x2 => Call(word.nnn()),
        0x3 => SkipEqual(x, word.nn()),
        0x4 => SkipNotEqual(x, word.nn()),
        0x5 if word.n() == 0x0 => SkipRegistersEqual(x, y),
        0x6 => Load(x, word.nn()),
        0x7 => Add(x, word.nn()),
        0x8 => decode_arithmetic(word, x, y)?,
        0x9 if word.n() == 0x0 => SkipRegistersNotEqual(x, y),
        0xA => LoadIndex(word.nnn()),
        0xB => JumpOffset(word.nnn()),
        0xC => Random(x, word.nn()),
        0xD => Draw(x, y, word.n()),
        0xE => decode_keys(word, x)?,
        0xF => decode_misc(word, x)?,
        _ => return Err(DecodeError::UnknownOpcode(word)),
    };
    Ok(instruction)
}

/// Group 8, cased on the low nibble
fn decode_arithmetic(word: u16, x: Register, y: Register) -> Result<Instruction, DecodeError> {
    use Instruction::*;

    Ok(match word.n() {
        0x0 => Move(x, y),
        0x1 => Or(x, y),
        0x2 => And(x, y),
        0x3 => Xor(x, y),
        0x4 => AddRegisters(x, y),
        0x5 => Sub(x, y),
        0x6 => ShiftRight(x, y),
        0x7 => SubNegated(x, y),
        0xE => ShiftLeft(x, y),
        sub => return Err(unknown_sub(word, sub)),
    })
}

/// Group E, cased on the low byte
fn decode_keys(word: u16, x: Register) -> Result<Instruction, DecodeError> {
    match word.nn() {
        0x9E => Ok(Instruction::SkipPressed(x)),
        0xA1 => Ok(Instruction::SkipNotPressed(x)),
        sub => Err(unknown_sub(word, sub)),
    }
}

/// Group F, cased on the low byte
fn decode_misc(word: u16, x: Register) -> Result<Instruction, DecodeError> {
    use Instruction::*;

    Ok(match word.nn() {
        0x07 => LoadDelay(x),
        0x0A => AwaitKey(x),
        0x15 => SetDelay(x),
        0x18 => SetSound(x),
        0x1E => AddIndex(x),
        0x29 => LoadSprite(x),
        0x33 => StoreBcd(x),
        0x55 => StoreRegisters(x),
        0x65 => LoadRegisters(x),
        sub => return Err(unknown_sub(word, sub)),
    })
}

fn unknown_sub(word: u16, sub: u8) -> DecodeError {
    DecodeError::UnknownSubOpcode {
        word,
        group: word.group(),
        sub,
    }
}

impl Instruction {
    /// Applies the instruction to `state`.
    ///
    /// Expects the program counter to already point past this instruction, as
    /// `fetch_and_advance` leaves it.
    pub fn execute(
        self,
        state: &mut State,
        pressed_keys: &Keys,
        rng: &mut dyn RngCore,
    ) -> Result<Effect> {
        use Instruction::*;

        let effect = match self {
            Halt => Effect::Halt,
            Clear => clr(state),
            Return => rts(state)?,
            Jump(addr) => jump(state, addr),
            Call(addr) => call(state, addr)?,
            SkipEqual(x, nn) => ske(state, x, nn),
            SkipNotEqual(x, nn) => skne(state, x, nn),
            SkipRegistersEqual(x, y) => skre(state, x, y),
            Load(x, nn) => load(state, x, nn),
            Add(x, nn) => add(state, x, nn),
            Move(x, y) => mv(state, x, y),
            Or(x, y) => or(state, x, y),
            And(x, y) => and(state, x, y),
            Xor(x, y) => xor(state, x, y),
            AddRegisters(x, y) => addr(state, x, y),
            Sub(x, y) => sub(state, x, y),
            ShiftRight(x, _) => shr(state, x),
            SubNegated(x, y) => subn(state, x, y),
            ShiftLeft(x, _) => shl(state, x),
            SkipRegistersNotEqual(x, y) => skrne(state, x, y),
            LoadIndex(addr) => loadi(state, addr),
            JumpOffset(addr) => jumpi(state, addr),
            Random(x, nn) => rnd(state, rng, x, nn),
            Draw(x, y, n) => draw(state, x, y, n)?,
            SkipPressed(x) => skpr(state, pressed_keys, x)?,
            SkipNotPressed(x) => skup(state, pressed_keys, x)?,
            LoadDelay(x) => moved(state, x),
            AwaitKey(x) => keyd(state, x),
            SetDelay(x) => loadd(state, x),
            SetSound(x) => loadst(state, x),
            AddIndex(x) => addi(state, x),
            LoadSprite(x) => ldspr(state, x),
            StoreBcd(x) => bcd(state, x)?,
            StoreRegisters(x) => stor(state, x)?,
            LoadRegisters(x) => read(state, x)?,
        };
        Ok(effect)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Halt => write!(f, "HALT"),
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(addr) => write!(f, "JP {addr:#05X}"),
            Call(addr) => write!(f, "CALL {addr:#05X}"),
            SkipEqual(x, nn) => write!(f, "SE {x}, {nn:#04X}"),
            SkipNotEqual(x, nn) => write!(f, "SNE {x}, {nn:#04X}"),
            SkipRegistersEqual(x, y) => write!(f, "SE {x}, {y}"),
            Load(x, nn) => write!(f, "LD {x}, {nn:#04X}"),
            Add(x, nn) => write!(f, "ADD {x}, {nn:#04X}"),
            Move(x, y) => write!(f, "LD {x}, {y}"),
            Or(x, y) => write!(f, "OR {x}, {y}"),
            And(x, y) => write!(f, "AND {x}, {y}"),
            Xor(x, y) => write!(f, "XOR {x}, {y}"),
            AddRegisters(x, y) => write!(f, "ADD {x}, {y}"),
            Sub(x, y) => write!(f, "SUB {x}, {y}"),
            ShiftRight(x, _) => write!(f, "SHR {x}"),
            SubNegated(x, y) => write!(f, "SUBN {x}, {y}"),
            ShiftLeft(x, _) => write!(f, "SHL {x}"),
            SkipRegistersNotEqual(x, y) => write!(f, "SNE {x}, {y}"),
            LoadIndex(addr) => write!(f, "LD I, {addr:#05X}"),
            JumpOffset(addr) => write!(f, "JP V0, {addr:#05X}"),
            Random(x, nn) => write!(f, "RND {x}, {nn:#04X}"),
            Draw(x, y, n) => write!(f, "DRW {x}, {y}, {n}"),
            SkipPressed(x) => write!(f, "SKP {x}"),
            SkipNotPressed(x) => write!(f, "SKNP {x}"),
            LoadDelay(x) => write!(f, "LD {x}, DT"),
            AwaitKey(x) => write!(f, "LD {x}, K"),
            SetDelay(x) => write!(f, "LD DT, {x}"),
            SetSound(x) => write!(f, "LD ST, {x}"),
            AddIndex(x) => write!(f, "ADD I, {x}"),
            LoadSprite(x) => write!(f, "LD F, {x}"),
            StoreBcd(x) => write!(f, "LD B, {x}"),
            StoreRegisters(x) => write!(f, "LD [I], {x}"),
            LoadRegisters(x) => write!(f, "LD {x}, [I]"),
        }
    }
}
