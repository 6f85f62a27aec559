//! One function per instruction.
//!
//! Each runs after the fetch has already moved the program counter onto the next
//! instruction, so control flow only has to overwrite it and skips add 2 more.
//! Fallible operations check every address before their first write.

use rand::{Rng, RngCore};

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_SIZE};
use crate::error::{Error, Result};
use crate::registers::Register;
use crate::state::{Keys, State};
use crate::trace::Effect;

/// Writes Vx and the carry flag; VF is written last so it holds the flag even when x is F
fn flagged(state: &mut State, x: Register, value: u8, flag: bool) -> Effect {
    state.registers.clear_flag();
    state.registers.set_v(x, value);
    state.registers.set_flag(flag);
    Effect::Flagged {
        register: x,
        value: state.registers.v(x),
        flag: state.registers.flag(),
    }
}

fn skip_if(state: &mut State, condition: bool) -> Effect {
    if condition {
        state.registers.advance_pc();
    }
    Effect::Skip(condition)
}

fn set(state: &mut State, x: Register, value: u8) -> Effect {
    state.registers.set_v(x, value);
    Effect::Register { register: x, value }
}

/// clear
pub fn clr(state: &mut State) -> Effect {
    state.frame_buffer = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    state.draw_flag = true;
    Effect::Clear
}

/// PC = STACK.pop()
pub fn rts(state: &mut State) -> Result<Effect> {
    let address = state.registers.pop()?;
    state.registers.pc = address;
    Ok(Effect::Return(address))
}

/// PC = addr
pub fn jump(state: &mut State, addr: u16) -> Effect {
    state.registers.pc = addr;
    Effect::Jump(addr)
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Result<Effect> {
    let ret = state.registers.pc;
    state.registers.push(ret)?;
    state.registers.pc = addr;
    Ok(Effect::Call { ret, target: addr })
}

/// if Vx == nn then pc += 2
pub fn ske(state: &mut State, x: Register, nn: u8) -> Effect {
    let condition = state.registers.v(x) == nn;
    skip_if(state, condition)
}

/// if Vx != nn then pc += 2
pub fn skne(state: &mut State, x: Register, nn: u8) -> Effect {
    let condition = state.registers.v(x) != nn;
    skip_if(state, condition)
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &mut State, x: Register, y: Register) -> Effect {
    let condition = state.registers.v(x) == state.registers.v(y);
    skip_if(state, condition)
}

/// Vx = nn
pub fn load(state: &mut State, x: Register, nn: u8) -> Effect {
    set(state, x, nn)
}

/// Vx += nn
/// Overflow wraps and leaves VF alone
pub fn add(state: &mut State, x: Register, nn: u8) -> Effect {
    let value = state.registers.v(x).wrapping_add(nn);
    set(state, x, value)
}

/// Vx = Vy
pub fn mv(state: &mut State, x: Register, y: Register) -> Effect {
    let value = state.registers.v(y);
    set(state, x, value)
}

/// Vx |= Vy
pub fn or(state: &mut State, x: Register, y: Register) -> Effect {
    let value = state.registers.v(x) | state.registers.v(y);
    set(state, x, value)
}

/// Vx &= Vy
pub fn and(state: &mut State, x: Register, y: Register) -> Effect {
    let value = state.registers.v(x) & state.registers.v(y);
    set(state, x, value)
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: Register, y: Register) -> Effect {
    let value = state.registers.v(x) ^ state.registers.v(y);
    set(state, x, value)
}

/// Vx += Vy; VF = carry
pub fn addr(state: &mut State, x: Register, y: Register) -> Effect {
    let (value, carry) = state.registers.v(x).overflowing_add(state.registers.v(y));
    flagged(state, x, value, carry)
}

/// Vx -= Vy; VF = borrow
pub fn sub(state: &mut State, x: Register, y: Register) -> Effect {
    let (value, borrow) = state.registers.v(x).overflowing_sub(state.registers.v(y));
    flagged(state, x, value, borrow)
}

/// Vx >>= 1; VF = lsb
pub fn shr(state: &mut State, x: Register) -> Effect {
    let vx = state.registers.v(x);
    flagged(state, x, vx >> 1, vx & 0x1 == 0x1)
}

/// Vx = Vy - Vx; VF = borrow
pub fn subn(state: &mut State, x: Register, y: Register) -> Effect {
    let (value, borrow) = state.registers.v(y).overflowing_sub(state.registers.v(x));
    flagged(state, x, value, borrow)
}

/// Vx <<= 1; VF = msb
pub fn shl(state: &mut State, x: Register) -> Effect {
    let vx = state.registers.v(x);
    flagged(state, x, vx << 1, vx & 0x80 == 0x80)
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &mut State, x: Register, y: Register) -> Effect {
    let condition = state.registers.v(x) != state.registers.v(y);
    skip_if(state, condition)
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) -> Effect {
    state.registers.i = addr;
    Effect::Index(addr)
}

/// PC = V0 + addr
pub fn jumpi(state: &mut State, addr: u16) -> Effect {
    let target = addr.wrapping_add(state.registers.v(Register::V0).into());
    jump(state, target)
}

/// Vx = rand_byte & nn
pub fn rnd(state: &mut State, rng: &mut dyn RngCore, x: Register, nn: u8) -> Effect {
    let rand_byte: u8 = rng.gen();
    set(state, x, rand_byte & nn)
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels were erased
pub fn draw(state: &mut State, x: Register, y: Register, n: u8) -> Result<Effect> {
    let origin_x = state.registers.v(x) as usize;
    let origin_y = state.registers.v(y) as usize;
    let sprite = state
        .memory
        .slice(state.registers.i as usize, n as usize)?;

    let mut collision = 0x0;
    for (row, byte) in sprite.iter().enumerate() {
        let py = (origin_y + row) % DISPLAY_HEIGHT;
        for bit in 0..8 {
            let px = (origin_x + bit) % DISPLAY_WIDTH;
            let pixel = (byte >> (7 - bit)) & 0x1;
            collision |= pixel & state.frame_buffer[py][px];
            state.frame_buffer[py][px] ^= pixel;
        }
    }

    state.registers.set_flag(collision == 0x1);
    state.draw_flag = true;
    Ok(Effect::Draw {
        collision: collision == 0x1,
    })
}

fn key_for(state: &State, pressed_keys: &Keys, x: Register) -> Result<bool> {
    let key = state.registers.v(x);
    pressed_keys
        .get(key as usize)
        .copied()
        .ok_or(Error::KeyOutOfRange { key })
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &mut State, pressed_keys: &Keys, x: Register) -> Result<Effect> {
    let pressed = key_for(state, pressed_keys, x)?;
    Ok(skip_if(state, pressed))
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &mut State, pressed_keys: &Keys, x: Register) -> Result<Effect> {
    let pressed = key_for(state, pressed_keys, x)?;
    Ok(skip_if(state, !pressed))
}

/// Vx = DT
pub fn moved(state: &mut State, x: Register) -> Effect {
    let value = state.registers.timers.delay;
    set(state, x, value)
}

/// await keypress for Vx
pub fn keyd(state: &mut State, x: Register) -> Effect {
    state.register_needing_key = Some(x);
    Effect::AwaitKey(x)
}

/// DT = Vx
pub fn loadd(state: &mut State, x: Register) -> Effect {
    let value = state.registers.v(x);
    state.registers.timers.delay = value;
    Effect::Delay(value)
}

/// ST = Vx
pub fn loadst(state: &mut State, x: Register) -> Effect {
    let value = state.registers.v(x);
    state.registers.timers.sound = value;
    Effect::Sound(value)
}

/// I += Vx; VF = overflow
pub fn addi(state: &mut State, x: Register) -> Effect {
    let vx = state.registers.v(x);
    state.registers.clear_flag();
    let overflow = state.registers.add_i(vx.into());
    state.registers.set_flag(overflow);
    Effect::FlaggedIndex {
        index: state.registers.i,
        flag: state.registers.flag(),
    }
}

/// I = Vx * 5
/// Set I to the offset of the sprite for digit Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &mut State, x: Register) -> Effect {
    let index = u16::from(state.registers.v(x)) * SPRITE_SIZE;
    loadi(state, index)
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &mut State, x: Register) -> Result<Effect> {
    let vx = state.registers.v(x);
    let address = state.registers.i;
    state
        .memory
        .slice_mut(address as usize, 3)?
        .copy_from_slice(&[vx / 100, vx / 10 % 10, vx % 10]);
    Ok(Effect::Memory {
        address,
        len: 3,
        first: vx / 100,
    })
}

/// mem[I..=I+x] = V0..=Vx
pub fn stor(state: &mut State, x: Register) -> Result<Effect> {
    let address = state.registers.i;
    let values = state.registers.v_through(x);
    state
        .memory
        .slice_mut(address as usize, values.len())?
        .copy_from_slice(values);
    Ok(Effect::Memory {
        address,
        len: values.len(),
        first: values[0],
    })
}

/// V0..=Vx = mem[I..=I+x]
pub fn read(state: &mut State, x: Register) -> Result<Effect> {
    let bytes = state
        .memory
        .slice(state.registers.i as usize, x.index() + 1)?;
    state.registers.v_through_mut(x).copy_from_slice(bytes);
    Ok(Effect::Registers {
        last: x,
        first: state.registers.v(Register::V0),
    })
}
