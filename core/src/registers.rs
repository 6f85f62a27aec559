use std::fmt;

use crate::constants::{PROGRAM_START, REGISTER_COUNT, STACK_SIZE};
use crate::error::{Error, Result};

/// Index of one of the sixteen general purpose registers.
///
/// Only values 0x0..=0xF can be constructed, so register access never needs a
/// bounds check once decoding is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Register(u8);

impl Register {
    pub const V0: Register = Register(0x0);
    /// The carry flag
    pub const VF: Register = Register(0xF);

    /// Takes the low nibble of `nibble`.
    pub(crate) fn from_nibble(nibble: u8) -> Self {
        Register(nibble & 0xF)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for Register {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        if (index as usize) < REGISTER_COUNT {
            Ok(Register(index))
        } else {
            Err(Error::RegisterOutOfBounds {
                index: index as usize,
            })
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{:X}", self.0)
    }
}

/// # Timers
/// Two 8-bit countdown timers (delay & sound).
/// - they decrement once per tick, which a front-end drives at 60Hz
/// - when the sound timer is above 0 a front-end should beep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
}

impl Timers {
    /// Decrements both timers, stopping at 0.
    pub fn tick(&mut self) {
        self.delay = self.delay.saturating_sub(1);
        self.sound = self.sound.saturating_sub(1);
    }

    pub fn is_sounding(&self) -> bool {
        self.sound > 0
    }
}

/// # Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry flag
/// - (i) a 16-bit memory address register
/// - (pc) a 16-bit program counter
/// - (sp) the number of occupied slots of a 16 entry return address stack
/// - two 8-bit timers
///
/// Register widths are the native integer widths, so every write truncates for
/// free; arithmetic that may overflow goes through the `wrapping_*` helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    sp: usize,
    stack: [u16; STACK_SIZE],
    pub timers: Timers,
}

impl Registers {
    pub fn new(program_start: u16) -> Self {
        Registers {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: program_start,
            sp: 0,
            stack: [0; STACK_SIZE],
            timers: Timers::default(),
        }
    }

    pub fn v(&self, register: Register) -> u8 {
        self.v[register.index()]
    }

    pub fn set_v(&mut self, register: Register, value: u8) {
        self.v[register.index()] = value;
    }

    /// All sixteen general purpose registers.
    pub fn v_all(&self) -> &[u8; REGISTER_COUNT] {
        &self.v
    }

    /// V0..=Vx
    pub fn v_through(&self, last: Register) -> &[u8] {
        &self.v[..=last.index()]
    }

    pub fn v_through_mut(&mut self, last: Register) -> &mut [u8] {
        &mut self.v[..=last.index()]
    }

    pub fn flag(&self) -> u8 {
        self.v[Register::VF.index()]
    }

    pub fn set_flag(&mut self, set: bool) {
        self.v[Register::VF.index()] = u8::from(set);
    }

    pub fn clear_flag(&mut self) {
        self.set_flag(false);
    }

    /// I += value, wrapping at 16 bits. Returns whether it wrapped.
    pub fn add_i(&mut self, value: u16) -> bool {
        let (i, overflow) = self.i.overflowing_add(value);
        self.i = i;
        overflow
    }

    /// Moves the program counter onto the following instruction.
    pub fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    pub fn sp(&self) -> usize {
        self.sp
    }

    /// The occupied part of the return address stack, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.sp]
    }

    pub fn push(&mut self, address: u16) -> Result<()> {
        let slot = self.stack.get_mut(self.sp).ok_or(Error::StackOverflow)?;
        *slot = address;
        self.sp += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        self.sp = self.sp.checked_sub(1).ok_or(Error::StackUnderflow)?;
        Ok(self.stack[self.sp])
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new(PROGRAM_START)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_try_from() {
        assert_eq!(Register::try_from(0xF).unwrap(), Register::VF);
        assert!(matches!(
            Register::try_from(0x10),
            Err(Error::RegisterOutOfBounds { index: 0x10 })
        ));
    }

    #[test]
    fn test_register_display() {
        assert_eq!(Register::from_nibble(0xA).to_string(), "VA");
    }

    #[test]
    fn test_registers_start_at_program_start() {
        let registers = Registers::new(0x300);
        assert_eq!(registers.pc, 0x300);
        assert_eq!(registers.sp(), 0);
        assert_eq!(registers.v_all(), &[0; REGISTER_COUNT]);
    }

    #[test]
    fn test_add_i_wraps_and_reports_overflow() {
        let mut registers = Registers::default();
        registers.i = 0xFFFF;
        assert!(registers.add_i(0x2));
        assert_eq!(registers.i, 0x1);
        assert!(!registers.add_i(0x2));
        assert_eq!(registers.i, 0x3);
    }

    #[test]
    fn test_advance_pc_wraps() {
        let mut registers = Registers::new(0xFFFE);
        registers.advance_pc();
        assert_eq!(registers.pc, 0x0);
    }

    #[test]
    fn test_stack_is_lifo() {
        let mut registers = Registers::default();
        registers.push(0x202).unwrap();
        registers.push(0x404).unwrap();
        assert_eq!(registers.stack(), &[0x202, 0x404]);
        assert_eq!(registers.pop().unwrap(), 0x404);
        assert_eq!(registers.pop().unwrap(), 0x202);
        assert_eq!(registers.sp(), 0);
    }

    #[test]
    fn test_stack_overflow() {
        let mut registers = Registers::default();
        for n in 0..STACK_SIZE as u16 {
            registers.push(n).unwrap();
        }
        assert!(matches!(registers.push(0xABC), Err(Error::StackOverflow)));
        assert_eq!(registers.sp(), STACK_SIZE);
    }

    #[test]
    fn test_stack_underflow() {
        let mut registers = Registers::default();
        assert!(matches!(registers.pop(), Err(Error::StackUnderflow)));
        assert_eq!(registers.sp(), 0);
    }

    #[test]
    fn test_timers_tick_down() {
        let mut timers = Timers { delay: 2, sound: 1 };
        timers.tick();
        assert_eq!(timers, Timers { delay: 1, sound: 0 });
        assert!(!timers.is_sounding());
    }

    #[test]
    fn test_timers_stop_at_zero() {
        let mut timers = Timers::default();
        for _ in 0..3 {
            timers.tick();
        }
        assert_eq!(timers, Timers { delay: 0, sound: 0 });
    }
}
