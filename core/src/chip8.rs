use std::io::Read;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::constants::{HALT, KEY_COUNT};
use crate::error::{Error, Result};
use crate::instruction::{decode, fetch_and_advance};
use crate::memory::Memory;
use crate::state::{FrameBuffer, Keys, State};
use crate::trace::{Trace, TraceSink};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `pressed_keys` with public interfaces for manipulating them
///  - the random source used by `Cxnn`
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU one instruction at a time
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// Nothing here knows about wall-clock time. A driver calls `advance_timers`
/// at `Config::timer_speed` and `step` at `Config::clock_speed`, or `run_frame`
/// once per timer tick.
pub struct Chip8 {
    config: Config,
    state: State,
    pressed_keys: Keys,
    rng: Box<dyn RngCore>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let memory = if config.sprite_sheet {
            Memory::with_sprite_sheet()
        } else {
            Memory::new()
        };
        let rng: Box<dyn RngCore> = match config.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_entropy()),
        };
        debug!("creating chip-8 with {:?}", config);
        Chip8 {
            state: State::new(config.program_start, memory),
            config,
            pressed_keys: [false; KEY_COUNT],
            rng,
        }
    }

    /// Replaces the random source used by `Cxnn`
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Load a rom from a source file at `Config::program_start`
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        self.load(&rom, self.config.program_start)
    }

    /// Copy `bytes` into memory at `offset`
    pub fn load(&mut self, bytes: &[u8], offset: u16) -> Result<()> {
        self.state.memory.load(bytes, offset as usize)
    }

    /// Returns the FrameBuffer if the display should be redrawn, and marks it drawn
    pub fn take_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    /// Whether a front-end should currently be beeping
    pub fn is_sounding(&self) -> bool {
        self.state.registers.timers.is_sounding()
    }

    /// Whether `Fx0A` is blocking execution
    pub fn is_waiting_for_key(&self) -> bool {
        self.state.register_needing_key.is_some()
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<()> {
        *self.key_mut(key)? = true;
        if let Some(register) = self.state.register_needing_key.take() {
            self.state.registers.set_v(register, key);
            debug!("key {key:X} written to {register}");
        }
        Ok(())
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) -> Result<()> {
        *self.key_mut(key)? = false;
        Ok(())
    }

    fn key_mut(&mut self, key: u8) -> Result<&mut bool> {
        self.pressed_keys
            .get_mut(key as usize)
            .ok_or(Error::KeyOutOfRange { key })
    }

    /// Advances the CPU by a single instruction and returns the instruction word
    ///
    /// - while awaiting a keypress nothing runs and the waiting `Fx0A` word is returned
    /// - a word that doesn't decode is logged and skipped
    /// - on a fault the program counter is put back on the faulting instruction
    ///
    /// `HALT` (0x0000) is returned as-is so a driver knows to stop.
    pub fn step(&mut self) -> Result<u16> {
        self.cycle(None)
    }

    /// `step`, reporting what happened to `sink`
    pub fn step_traced(&mut self, sink: &mut dyn TraceSink) -> Result<u16> {
        self.cycle(Some(sink))
    }

    fn cycle(&mut self, sink: Option<&mut dyn TraceSink>) -> Result<u16> {
        if let Some(register) = self.state.register_needing_key {
            return Ok(0xF00A | ((register.index() as u16) << 8));
        }

        let address = self.state.registers.pc;
        let word = fetch_and_advance(&mut self.state)?;
        match decode(word) {
            Ok(instruction) => {
                let effect =
                    match instruction.execute(&mut self.state, &self.pressed_keys, &mut *self.rng) {
                        Ok(effect) => effect,
                        Err(error) => {
                            warn!("{instruction} at {address:#06X} faulted: {error}");
                            self.state.registers.pc = address;
                            return Err(error);
                        }
                    };
                let record = Trace {
                    address,
                    word,
                    instruction,
                    effect,
                };
                trace!("{record}");
                if let Some(sink) = sink {
                    sink.record(&record);
                }
            }
            Err(error) => {
                warn!("{error} at {address:#06X}");
                if let Some(sink) = sink {
                    sink.decode_failure(address, &error);
                }
            }
        }
        Ok(word)
    }

    /// Decrements the delay and sound timers, stopping at 0
    pub fn advance_timers(&mut self) {
        self.state.registers.timers.tick();
    }

    /// One timer frame: ticks the timers, then runs `Config::cycles_per_frame` steps.
    ///
    /// Returns true if the program halted during the frame.
    pub fn run_frame(&mut self) -> Result<bool> {
        self.frame(None)
    }

    /// `run_frame`, reporting every step to `sink`
    pub fn run_frame_traced(&mut self, sink: &mut dyn TraceSink) -> Result<bool> {
        self.frame(Some(sink))
    }

    fn frame(&mut self, mut sink: Option<&mut dyn TraceSink>) -> Result<bool> {
        self.advance_timers();
        for _ in 0..self.config.cycles_per_frame() {
            let step_sink = sink.as_deref_mut().map(|s| s as &mut dyn TraceSink);
            if self.cycle(step_sink)? == HALT {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
