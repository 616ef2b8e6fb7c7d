//! The top-level console: owns every component and drives the master tick.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustynes_cpu::{CpuTracer, DmaCpu, Cpu, INesRom, Mmu, RamBank};
use rustynes_ppu::Ppu;

use crate::bus::{ApuIoBank, PpuBank};
use crate::cartridge::{Cartridge, PrgBank};
use crate::error::ConsoleError;

/// Address the RESET vector points nestest at when run in "automation"
/// mode, bypassing its interactive prelude.
pub const NESTEST_AUTOMATION_PC: u16 = 0xC000;

/// Owns the CPU, PPU, cartridge, and CPU-side bus, and advances them one
/// master tick at a time.
///
/// One [`Nes::tick`] call is one CPU cycle: the PPU runs three dots (the
/// NTSC 3:1 clock ratio), any VBlank-triggered NMI edge is latched into the
/// CPU, and the DMA-decorated CPU advances by exactly one bus cycle.
pub struct Nes {
    cpu: DmaCpu,
    mmu: Mmu,
    ppu: Rc<RefCell<Ppu>>,
    cartridge: Rc<RefCell<Cartridge>>,
    dma_request: Rc<Cell<Option<u8>>>,
}

impl Nes {
    /// Builds a console from a parsed iNES ROM and runs the power-on RESET
    /// sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::UnsupportedMapper`] if the ROM is not NROM.
    pub fn new(rom: &INesRom) -> Result<Self, ConsoleError> {
        let cartridge = Rc::new(RefCell::new(Cartridge::from_rom(rom)?));
        let ppu = Rc::new(RefCell::new(Ppu::new(cartridge.borrow().mirroring())));
        let dma_request = Rc::new(Cell::new(None));

        let mut mmu = Mmu::new();
        mmu.add_bank(Box::new(RamBank::new(0x0000, 0x1FFF, 0x0800)));
        mmu.add_bank(Box::new(PpuBank::new(Rc::clone(&ppu), Rc::clone(&cartridge))));
        mmu.add_bank(Box::new(ApuIoBank::new(Rc::clone(&dma_request))));
        mmu.add_bank(Box::new(PrgBank::new(Rc::clone(&cartridge))));

        let mut cpu = Cpu::new();
        cpu.reset(&mut mmu);

        Ok(Self { cpu: DmaCpu::new(cpu), mmu, ppu, cartridge, dma_request })
    }

    /// Loads and parses a ROM file, then builds a console from it.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Io`] if the file cannot be read, or
    /// [`ConsoleError::BadRomFormat`]/[`ConsoleError::UnsupportedMapper`] if
    /// it cannot be parsed.
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConsoleError> {
        let rom = INesRom::load(path)?;
        Self::new(&rom)
    }

    /// Re-runs the power-on RESET sequence without reloading the cartridge.
    pub fn reset(&mut self) {
        self.cpu.cpu_mut().reset(&mut self.mmu);
        self.ppu.borrow_mut().reset();
        self.dma_request.set(None);
    }

    /// Overrides the program counter, for conformance harnesses (like
    /// nestest) that start execution somewhere other than the RESET vector.
    pub fn set_pc(&mut self, pc: u16) {
        self.cpu.cpu_mut().pc = pc;
    }

    /// Current program counter.
    #[must_use]
    pub fn pc(&self) -> u16 {
        self.cpu.cpu().pc()
    }

    /// Shared reference to the underlying CPU, for introspection in tests
    /// and debug tooling.
    #[must_use]
    pub fn cpu(&self) -> &Cpu {
        self.cpu.cpu()
    }

    /// Whether the CPU has executed a halting (JAM/KIL) opcode.
    #[must_use]
    pub fn is_jammed(&self) -> bool {
        self.cpu.cpu().is_jammed()
    }

    /// Total CPU cycles elapsed since the last reset.
    #[must_use]
    pub fn cpu_cycles(&self) -> u64 {
        self.cpu.cpu().cycles()
    }

    /// Advances the system by one master tick (one CPU cycle / three PPU
    /// dots). Returns `true` if this tick completed a CPU instruction (i.e.
    /// the next tick will begin fetching a new opcode and is safe to trace).
    pub fn tick(&mut self) -> bool {
        let mut nmi_edge = false;
        for _ in 0..3 {
            self.ppu.borrow_mut().execute();
            if self.ppu.borrow_mut().take_nmi() {
                nmi_edge = true;
            }
        }
        if nmi_edge {
            self.cpu.cpu_mut().trigger_nmi();
        }

        let instruction_complete = self.cpu.execute(&mut self.mmu);

        if let Some(page) = self.dma_request.take() {
            self.cpu.trigger_dma(page);
        }

        instruction_complete
    }

    /// Whether the CPU is at an instruction boundary and not mid-DMA-stall,
    /// i.e. the next `tick()` begins fetching a new opcode.
    #[must_use]
    pub fn at_instruction_boundary(&self) -> bool {
        !self.cpu.cpu().is_mid_instruction() && !self.cpu.is_active()
    }

    /// Records a trace entry for the instruction about to begin, using the
    /// PPU's current scanline/dot. Only meaningful when
    /// [`Nes::at_instruction_boundary`] is `true`.
    pub fn trace_instruction(&mut self, tracer: &mut CpuTracer) {
        let scanline = self.ppu.borrow().scanline();
        let dot = self.ppu.borrow().cycle();
        tracer.trace_with_ppu(self.cpu.cpu(), &mut self.mmu, scanline, dot);
    }

    /// Runs instructions (logging one trace entry per instruction boundary)
    /// until `count` instructions have completed or the CPU jams.
    pub fn run_traced(&mut self, tracer: &mut CpuTracer, count: usize) {
        let mut completed = 0;
        while completed < count && !self.is_jammed() {
            if self.at_instruction_boundary() {
                self.trace_instruction(tracer);
            }
            if self.tick() {
                completed += 1;
            }
        }
    }
}
