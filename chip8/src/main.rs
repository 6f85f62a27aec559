use std::num::ParseIntError;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing::level_filters::LevelFilter;

use emu8_core::{Config, CLOCK_SPEED, TIMER_SPEED};

mod run;

/// Runs a Chip-8 ROM until it halts
///
/// There's no window or keypad: the screen can be dumped as text on exit and
/// every executed instruction can be logged.
#[derive(Debug, Parser)]
#[command(name = "emu8", version, about)]
struct Args {
    /// ROM file to run
    rom: PathBuf,

    /// Where the ROM is loaded and execution starts (decimal or 0x hex)
    #[arg(long, default_value = "0x200", value_parser = parse_address)]
    offset: u16,

    /// Instructions per second
    #[arg(long, default_value_t = CLOCK_SPEED)]
    speed: u32,

    /// Timer ticks per second
    #[arg(long, default_value_t = TIMER_SPEED)]
    timer_speed: u32,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Don't load the hex digit sprites into low memory
    #[arg(long)]
    no_sprites: bool,

    /// Run as fast as possible instead of at the clock speed
    #[arg(long)]
    fast: bool,

    /// Stop after this many timer frames
    #[arg(long)]
    max_frames: Option<u64>,

    /// Log every executed instruction
    #[arg(long)]
    trace: bool,

    /// Print the frame buffer when the run ends
    #[arg(long)]
    dump_screen: bool,

    /// More logging; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_address(arg: &str) -> Result<u16, ParseIntError> {
    match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => arg.parse(),
    }
}

impl Args {
    fn config(&self) -> Config {
        Config {
            program_start: self.offset,
            clock_speed: self.speed,
            timer_speed: self.timer_speed,
            sprite_sheet: !self.no_sprites,
            seed: self.seed,
        }
    }

    fn options(&self) -> run::Options {
        run::Options {
            fast: self.fast,
            max_frames: self.max_frames,
            trace: self.trace,
            dump_screen: self.dump_screen,
        }
    }

    fn log_level(&self) -> LevelFilter {
        let level = match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        // Trace records are logged at info
        if self.trace {
            level.max(LevelFilter::INFO)
        } else {
            level
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .init();

    match run::run(&args.rom, args.config(), &args.options()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x200"), Ok(0x200));
        assert_eq!(parse_address("0X6a0"), Ok(0x6A0));
        assert_eq!(parse_address("512"), Ok(0x200));
        assert!(parse_address("0xZZ").is_err());
    }

    #[test]
    fn test_args_map_onto_config() {
        let args = Args::parse_from([
            "emu8",
            "pong.ch8",
            "--offset",
            "0x600",
            "--seed",
            "3",
            "--no-sprites",
        ]);
        let config = args.config();
        assert_eq!(config.program_start, 0x600);
        assert_eq!(config.seed, Some(3));
        assert!(!config.sprite_sheet);
        assert_eq!(config.clock_speed, CLOCK_SPEED);
    }

    #[test]
    fn test_trace_raises_log_level() {
        let args = Args::parse_from(["emu8", "pong.ch8", "--trace"]);
        assert_eq!(args.log_level(), LevelFilter::INFO);
        let args = Args::parse_from(["emu8", "pong.ch8", "-vvv", "--trace"]);
        assert_eq!(args.log_level(), LevelFilter::TRACE);
    }
}
