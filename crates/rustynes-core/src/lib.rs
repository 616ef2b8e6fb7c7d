//! NES system integration layer: NROM cartridge, bus wiring, and the
//! master tick driver connecting the CPU and PPU crates.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                      Nes                      │
//! │  ┌──────────────────────────────────────┐    │
//! │  │                 Mmu                    │    │
//! │  │  ┌─────┐ ┌─────────┐ ┌─────┐ ┌──────┐ │    │
//! │  │  │ RAM │ │ PpuBank │ │ Apu │ │ PRG  │ │    │
//! │  │  │ 2KB │ │ $2000-  │ │stub │ │ ROM/ │ │    │
//! │  │  │     │ │ $3FFF   │ │     │ │ RAM  │ │    │
//! │  │  └─────┘ └────┬────┘ └─────┘ └──┬───┘ │    │
//! │  └────────────────┼─────────────────┼─────┘    │
//! │                    │                 │          │
//! │               ┌────┴────┐      ┌─────┴─────┐    │
//! │               │   Ppu   │      │ Cartridge │    │
//! │               └─────────┘      └───────────┘    │
//! │                          ▲                       │
//! │                     ┌────┴────┐                  │
//! │                     │ DmaCpu  │                  │
//! │                     │ ⊇ Cpu   │                  │
//! │                     └─────────┘                  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use rustynes_core::Nes;
//!
//! let mut nes = Nes::from_path("game.nes").expect("failed to load ROM");
//! for _ in 0..100 {
//!     nes.tick();
//! }
//! ```
//!
//! # Non-goals
//!
//! No PPU rendering pipeline, no mapper beyond NROM, no audio, no input,
//! no save states. See the crate-level docs of `rustynes-ppu` for the PPU's
//! own scope.

mod bus;
mod cartridge;
mod error;
mod nes;

pub use cartridge::Cartridge;
pub use error::ConsoleError;
pub use nes::{Nes, NESTEST_AUTOMATION_PC};

// Re-exported so downstream crates (and the `nestest` binary) don't need a
// direct dependency on `rustynes-cpu` just to load a ROM or format a trace.
pub use rustynes_cpu::{CpuTracer, INesRom};
