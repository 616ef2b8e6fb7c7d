//! CPU-side memory banks that aren't the cartridge: PPU registers and the
//! APU/IO stub.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustynes_cpu::MemBank;
use rustynes_ppu::Ppu;

use crate::cartridge::Cartridge;

/// Routes `$2000-$3FFF` (mirrored every 8 bytes) to the PPU's register
/// file, resolving its `$2007` pattern-table accesses against the shared
/// cartridge's CHR bank.
pub struct PpuBank {
    ppu: Rc<RefCell<Ppu>>,
    cartridge: Rc<RefCell<Cartridge>>,
}

impl PpuBank {
    /// Creates a bank sharing the given PPU and cartridge handles.
    pub fn new(ppu: Rc<RefCell<Ppu>>, cartridge: Rc<RefCell<Cartridge>>) -> Self {
        Self { ppu, cartridge }
    }
}

impl MemBank for PpuBank {
    fn start(&self) -> u16 {
        0x2000
    }

    fn end(&self) -> u16 {
        0x3FFF
    }

    fn read_byte(&mut self, addr: u16) -> u8 {
        let cartridge = Rc::clone(&self.cartridge);
        self.ppu
            .borrow_mut()
            .read_register(addr, |chr_addr| cartridge.borrow().read_chr(chr_addr))
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        let cartridge = Rc::clone(&self.cartridge);
        self.ppu.borrow_mut().write_register(addr, value, |chr_addr, chr_value| {
            cartridge.borrow_mut().write_chr(chr_addr, chr_value);
        });
    }
}

/// A stub covering `$4000-$401F` (APU registers, OAM DMA, joypad ports).
///
/// Audio and input are non-goals, so every register reads back as open bus
/// except `$4014` (OAMDMA), whose write latches the source page for the
/// tick driver to act on — OAM DMA is part of the CPU/PPU timing contract
/// this crate does implement.
pub struct ApuIoBank {
    dma_request: Rc<Cell<Option<u8>>>,
}

impl ApuIoBank {
    /// Creates the stub, sharing its OAM DMA request latch with the caller.
    pub fn new(dma_request: Rc<Cell<Option<u8>>>) -> Self {
        Self { dma_request }
    }
}

impl MemBank for ApuIoBank {
    fn start(&self) -> u16 {
        0x4000
    }

    fn end(&self) -> u16 {
        0x401F
    }

    fn read_byte(&mut self, addr: u16) -> u8 {
        log::trace!("APU/IO stub read at {addr:#06X}, returning open bus");
        0
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        if addr == 0x4014 {
            log::debug!("OAM DMA requested from page {value:#04X}");
            self.dma_request.set(Some(value));
        } else {
            log::trace!("APU/IO stub write {value:#04X} at {addr:#06X}, ignored");
        }
    }
}
