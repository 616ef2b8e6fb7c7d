//! Conformance harness: runs a ROM from a fixed program counter and emits
//! a nestest.log-compatible trace.
//!
//! Exit codes: `0` on a clean run, `1` for a missing/unreadable ROM or bad
//! CLI arguments, and the process aborts with a nonzero status if the CPU
//! jams (a JAM/KIL opcode) partway through.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rustynes_core::{CpuTracer, Nes, NESTEST_AUTOMATION_PC};

/// Runs a 6502 conformance ROM and prints (or saves) its execution trace.
#[derive(Parser, Debug)]
#[command(name = "nestest", about = "nestest.log-compatible trace runner")]
struct Args {
    /// Path to the iNES ROM file to run.
    rom: PathBuf,

    /// Program counter to start execution at.
    #[arg(long, value_parser = parse_hex_or_dec, default_value_t = NESTEST_AUTOMATION_PC)]
    start_pc: u16,

    /// Maximum number of instructions to execute before stopping.
    #[arg(long, default_value_t = 10_000)]
    max_instructions: usize,

    /// Write the trace to this file instead of stdout.
    #[arg(long)]
    log: Option<PathBuf>,
}

fn parse_hex_or_dec(s: &str) -> Result<u16, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix('$')) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut nes = match Nes::from_path(&args.rom) {
        Ok(nes) => nes,
        Err(err) => {
            eprintln!("failed to load {}: {err}", args.rom.display());
            return ExitCode::from(1);
        }
    };
    nes.set_pc(args.start_pc);

    let mut tracer = CpuTracer::new();
    nes.run_traced(&mut tracer, args.max_instructions);

    let log = tracer.get_log();
    let write_result = match &args.log {
        Some(path) => File::create(path).and_then(|mut f| writeln!(f, "{log}")),
        None => {
            println!("{log}");
            Ok(())
        }
    };

    if let Err(err) = write_result {
        eprintln!("failed to write trace: {err}");
        return ExitCode::from(1);
    }

    if nes.is_jammed() {
        eprintln!("CPU jammed at PC {:#06X} after {} cycles", nes.pc(), nes.cpu_cycles());
        return ExitCode::from(2);
    }

    ExitCode::SUCCESS
}
