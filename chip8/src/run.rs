use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use emu8_core::{Chip8, Config, FrameBuffer, Result, Trace, TraceSink};

pub struct Options {
    /// Whether or not the clock speed should be ignored
    pub fast: bool,
    pub max_frames: Option<u64>,
    pub trace: bool,
    pub dump_screen: bool,
}

/// Logs every executed step at info; decode failures are already warned about by the core
struct LogSink;

impl TraceSink for LogSink {
    fn record(&mut self, trace: &Trace) {
        info!("{trace}");
    }
}

/// Runs `rom` one timer frame at a time until it halts, faults or hits `max_frames`.
///
/// Returns the number of frames run.
pub fn run(rom: &Path, config: Config, options: &Options) -> Result<u64> {
    let mut chip8 = Chip8::with_config(config);

    // Load ROM
    let file = File::open(rom)?;
    let mut reader = BufReader::new(file);
    chip8.load_rom(&mut reader)?;
    info!("successfully loaded ROM {}", rom.display());

    // Set initial timing
    let cycle_time = chip8.config().frame_duration();
    let mut last_cycle = Instant::now();

    let mut sink = LogSink;
    let mut frames: u64 = 0;
    let mut warned_about_keys = false;

    loop {
        let halted = if options.trace {
            chip8.run_frame_traced(&mut sink)?
        } else {
            chip8.run_frame()?
        };
        frames += 1;

        if chip8.take_frame().is_some() {
            debug!("frame {frames} redrawn");
        }
        if chip8.is_waiting_for_key() && !warned_about_keys {
            warn!("program is waiting for a key but there's no keypad");
            warned_about_keys = true;
        }

        if halted {
            info!("halted after {frames} frames");
            break;
        }
        if options.max_frames.is_some_and(|max| frames >= max) {
            info!("stopping after {frames} frames");
            break;
        }

        // Handle timing
        let elapsed_cycle_time = last_cycle.elapsed();
        if !options.fast && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = Instant::now();
    }

    if options.dump_screen {
        print!("{}", render(chip8.frame_buffer()));
    }
    Ok(frames)
}

/// Draws a FrameBuffer as text, one line per row: `#` lit, `.` dark
fn render(frame: &FrameBuffer) -> String {
    frame
        .iter()
        .flat_map(|row| {
            row.iter()
                .map(|pixel| if *pixel == 1 { '#' } else { '.' })
                .chain(std::iter::once('\n'))
        })
        .collect()
}
