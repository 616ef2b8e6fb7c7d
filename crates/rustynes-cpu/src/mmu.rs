//! Address-space router: an ordered list of [`MemBank`]s behind a single
//! [`Bus`] implementation.
//!
//! The CPU only ever talks to a [`Bus`]; the [`Mmu`] is one concrete way to
//! build one by composing smaller windows (RAM, PPU registers, cartridge,
//! ...) that each answer "do I own this address?" On every access the
//! `Mmu` dispatches to the **first** bank whose range contains the address,
//! so overlapping installation order matters.

use crate::bus::Bus;

/// A read/write view over a fixed address window.
///
/// Implementors only need to answer "is this address mine?" and perform the
/// byte access; mirroring (e.g. 2KB RAM mirrored across `0x0000-0x1FFF`) is
/// expressed by folding the address modulo the backing size inside
/// `read_byte`/`write_byte`, not by the range itself.
pub trait MemBank {
    /// First address (inclusive) this bank answers for.
    fn start(&self) -> u16;

    /// Last address (inclusive) this bank answers for.
    fn end(&self) -> u16;

    /// Whether `addr` falls within `[start, end]`.
    fn is_address_in_range(&self, addr: u16) -> bool {
        addr >= self.start() && addr <= self.end()
    }

    /// Reads a byte at `addr`, which the caller has already verified is in range.
    fn read_byte(&mut self, addr: u16) -> u8;

    /// Writes a byte at `addr`, which the caller has already verified is in range.
    fn write_byte(&mut self, addr: u16, value: u8);
}

/// Error raised when an address falls outside every installed bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MmuError {
    /// No installed bank claims this address.
    #[error("invalid address 0x{addr:04X} ({direction})")]
    InvalidAddress {
        /// The address that missed every bank.
        addr: u16,
        /// `"read"` or `"write"`.
        direction: &'static str,
    },
}

/// Composes an ordered list of [`MemBank`]s into a flat 16-bit address space.
///
/// Banks are exclusively owned by the `Mmu`; the CPU, PPU, and other
/// peripherals never see them directly, only through this bus.
#[derive(Default)]
pub struct Mmu {
    banks: Vec<Box<dyn MemBank>>,
}

impl Mmu {
    /// Creates an empty `Mmu` with no installed banks.
    #[must_use]
    pub fn new() -> Self {
        Self { banks: Vec::new() }
    }

    /// Appends a bank to the end of the dispatch order.
    ///
    /// Banks installed earlier take priority when ranges overlap.
    pub fn add_bank(&mut self, bank: Box<dyn MemBank>) {
        self.banks.push(bank);
    }

    fn find_bank_mut(&mut self, addr: u16) -> Option<&mut Box<dyn MemBank>> {
        self.banks.iter_mut().find(|bank| bank.is_address_in_range(addr))
    }

    /// Reads a byte, returning [`MmuError::InvalidAddress`] if no bank covers `addr`.
    pub fn try_read_byte(&mut self, addr: u16) -> Result<u8, MmuError> {
        match self.find_bank_mut(addr) {
            Some(bank) => Ok(bank.read_byte(addr)),
            None => Err(MmuError::InvalidAddress { addr, direction: "read" }),
        }
    }

    /// Writes a byte, returning [`MmuError::InvalidAddress`] if no bank covers `addr`.
    pub fn try_write_byte(&mut self, addr: u16, value: u8) -> Result<(), MmuError> {
        match self.find_bank_mut(addr) {
            Some(bank) => {
                bank.write_byte(addr, value);
                Ok(())
            }
            None => Err(MmuError::InvalidAddress { addr, direction: "write" }),
        }
    }
}

impl Bus for Mmu {
    fn read(&mut self, addr: u16) -> u8 {
        self.try_read_byte(addr).unwrap_or_else(|err| {
            log::warn!("{err}, returning open-bus 0");
            0
        })
    }

    fn write(&mut self, addr: u16, value: u8) {
        if let Err(err) = self.try_write_byte(addr, value) {
            log::warn!("{err}");
        }
    }
}

/// A fixed-size block of RAM, mirrored across a larger address window.
///
/// The NES's 2KB internal RAM is mirrored across `0x0000-0x1FFF` this way:
/// `RamBank::new(0x0000, 0x1FFF, 0x0800)`.
pub struct RamBank {
    start: u16,
    end: u16,
    data: Vec<u8>,
}

impl RamBank {
    /// Creates a RAM bank covering `[start, end]`, backed by `size` bytes.
    ///
    /// Addresses within the window are folded modulo `size`, so `size` must
    /// be a power of two for the mirroring to align on natural boundaries.
    #[must_use]
    pub fn new(start: u16, end: u16, size: usize) -> Self {
        Self { start, end, data: vec![0; size] }
    }
}

impl MemBank for RamBank {
    fn start(&self) -> u16 {
        self.start
    }

    fn end(&self) -> u16 {
        self.end
    }

    fn read_byte(&mut self, addr: u16) -> u8 {
        let offset = (addr - self.start) as usize % self.data.len();
        self.data[offset]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        let offset = (addr - self.start) as usize % self.data.len();
        self.data[offset] = value;
    }
}

/// A bank backed by plain read/write closures, for peripherals (PPU
/// registers, APU/IO, cartridge) that live in another crate and only need
/// to expose two functions to join the bus.
pub struct CallbackBank<R, W>
where
    R: FnMut(u16) -> u8,
    W: FnMut(u16, u8),
{
    start: u16,
    end: u16,
    read: R,
    write: W,
}

impl<R, W> CallbackBank<R, W>
where
    R: FnMut(u16) -> u8,
    W: FnMut(u16, u8),
{
    /// Creates a bank covering `[start, end]` delegating reads and writes
    /// to the given closures.
    pub fn new(start: u16, end: u16, read: R, write: W) -> Self {
        Self { start, end, read, write }
    }
}

impl<R, W> MemBank for CallbackBank<R, W>
where
    R: FnMut(u16) -> u8,
    W: FnMut(u16, u8),
{
    fn start(&self) -> u16 {
        self.start
    }

    fn end(&self) -> u16 {
        self.end
    }

    fn read_byte(&mut self, addr: u16) -> u8 {
        (self.read)(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        (self.write)(addr, value);
    }
}
