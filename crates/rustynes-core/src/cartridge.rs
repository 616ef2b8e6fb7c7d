//! NROM cartridge: the only mapper implemented (iNES mapper 0).
//!
//! 16 KiB PRG-ROM is mirrored into both `$8000-$BFFF` and `$C000-$FFFF`;
//! 32 KiB maps straight through. `$6000-$7FFF` is a fixed 8 KiB PRG-RAM
//! window. CHR is a single contiguous bank, backed by CHR-ROM or (if the
//! header declares zero CHR banks) 8 KiB of CHR-RAM.

use rustynes_cpu::{INesHeader, INesRom, MemBank};
use rustynes_ppu::Mirroring;

use crate::error::ConsoleError;

const PRG_RAM_SIZE: usize = 0x2000;
const CHR_RAM_SIZE: usize = 0x2000;

/// An NROM-mapped game image: PRG-ROM/RAM plus CHR-ROM/RAM.
pub struct Cartridge {
    prg_rom: Vec<u8>,
    prg_ram: Vec<u8>,
    chr: Vec<u8>,
    chr_is_ram: bool,
    mirroring: Mirroring,
}

impl Cartridge {
    /// Builds a cartridge from a parsed iNES ROM, rejecting anything but
    /// mapper 0 (NROM).
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::UnsupportedMapper`] if the header names a
    /// mapper other than 0.
    pub fn from_rom(rom: &INesRom) -> Result<Self, ConsoleError> {
        if rom.header.mapper != 0 {
            return Err(ConsoleError::UnsupportedMapper(rom.header.mapper));
        }

        let chr_is_ram = rom.chr_rom.is_empty();
        let chr = if chr_is_ram { vec![0; CHR_RAM_SIZE] } else { rom.chr_rom.clone() };

        Ok(Self {
            prg_rom: rom.prg_rom.clone(),
            prg_ram: vec![0; PRG_RAM_SIZE],
            chr,
            chr_is_ram,
            mirroring: Self::mirroring_from_header(&rom.header),
        })
    }

    fn mirroring_from_header(header: &INesHeader) -> Mirroring {
        if header.four_screen {
            Mirroring::FourScreen
        } else if header.mirroring == 0 {
            Mirroring::Horizontal
        } else {
            Mirroring::Vertical
        }
    }

    /// The nametable mirroring declared by the ROM header.
    #[must_use]
    pub fn mirroring(&self) -> Mirroring {
        self.mirroring
    }

    /// Reads a byte from the `$6000-$FFFF` CPU-side window.
    #[must_use]
    pub fn read_prg(&self, addr: u16) -> u8 {
        match addr {
            0x6000..=0x7FFF => self.prg_ram[(addr - 0x6000) as usize],
            0x8000..=0xFFFF => {
                let offset = (addr - 0x8000) as usize % self.prg_rom.len();
                self.prg_rom[offset]
            }
            _ => 0,
        }
    }

    /// Writes a byte to the `$6000-$FFFF` CPU-side window. Writes landing
    /// on `$8000-$FFFF` (ROM) are silently dropped.
    pub fn write_prg(&mut self, addr: u16, value: u8) {
        if let 0x6000..=0x7FFF = addr {
            self.prg_ram[(addr - 0x6000) as usize] = value;
        }
    }

    /// Reads a byte from the PPU-side pattern table window (`$0000-$1FFF`).
    #[must_use]
    pub fn read_chr(&self, addr: u16) -> u8 {
        self.chr[addr as usize % self.chr.len()]
    }

    /// Writes a byte to the PPU-side pattern table window. Ignored unless
    /// the cartridge declared CHR-RAM (zero CHR-ROM banks in the header).
    pub fn write_chr(&mut self, addr: u16, value: u8) {
        if self.chr_is_ram {
            let index = addr as usize % self.chr.len();
            self.chr[index] = value;
        }
    }
}

/// A [`MemBank`] view of a cartridge's `$6000-$FFFF` CPU-side window.
///
/// Kept separate from [`Cartridge`] itself so the cartridge can be shared
/// (via `Rc<RefCell<_>>`) between the CPU-side bus and the PPU's CHR
/// closures without the `Mmu` needing to know about that sharing.
pub struct PrgBank<T> {
    cartridge: T,
}

impl<T> PrgBank<T> {
    /// Wraps a shared handle to a cartridge as a CPU-side memory bank.
    pub fn new(cartridge: T) -> Self {
        Self { cartridge }
    }
}

impl<T> MemBank for PrgBank<T>
where
    T: AsRef<core::cell::RefCell<Cartridge>>,
{
    fn start(&self) -> u16 {
        0x6000
    }

    fn end(&self) -> u16 {
        0xFFFF
    }

    fn read_byte(&mut self, addr: u16) -> u8 {
        self.cartridge.as_ref().borrow().read_prg(addr)
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.cartridge.as_ref().borrow_mut().write_prg(addr, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustynes_cpu::INesHeader;

    fn header(mapper: u8, mirroring: u8, four_screen: bool) -> INesHeader {
        INesHeader {
            prg_rom_size: 1,
            chr_rom_size: 0,
            mapper,
            mirroring,
            battery: false,
            trainer: false,
            four_screen,
        }
    }

    fn rom_with_prg(prg_rom: Vec<u8>) -> INesRom {
        INesRom { header: header(0, 0, false), prg_rom, chr_rom: Vec::new() }
    }

    #[test]
    fn test_rejects_non_nrom_mapper() {
        let rom = INesRom { header: header(1, 0, false), prg_rom: vec![0; 0x4000], chr_rom: Vec::new() };
        assert!(matches!(Cartridge::from_rom(&rom), Err(ConsoleError::UnsupportedMapper(1))));
    }

    #[test]
    fn test_16kb_prg_is_mirrored_across_both_halves() {
        let mut prg = vec![0u8; 0x4000];
        prg[0] = 0x42;
        let rom = rom_with_prg(prg);
        let cart = Cartridge::from_rom(&rom).unwrap();

        assert_eq!(cart.read_prg(0x8000), 0x42);
        assert_eq!(cart.read_prg(0xC000), 0x42);
    }

    #[test]
    fn test_32kb_prg_maps_straight_through() {
        let mut prg = vec![0u8; 0x8000];
        prg[0] = 0x11;
        prg[0x4000] = 0x22;
        let rom = rom_with_prg(prg);
        let cart = Cartridge::from_rom(&rom).unwrap();

        assert_eq!(cart.read_prg(0x8000), 0x11);
        assert_eq!(cart.read_prg(0xC000), 0x22);
    }

    #[test]
    fn test_prg_ram_is_readable_and_writable() {
        let rom = rom_with_prg(vec![0; 0x4000]);
        let mut cart = Cartridge::from_rom(&rom).unwrap();

        cart.write_prg(0x6000, 0x99);
        assert_eq!(cart.read_prg(0x6000), 0x99);
    }

    #[test]
    fn test_writes_to_prg_rom_are_dropped() {
        let rom = rom_with_prg(vec![0xAA; 0x4000]);
        let mut cart = Cartridge::from_rom(&rom).unwrap();

        cart.write_prg(0x8000, 0x00);
        assert_eq!(cart.read_prg(0x8000), 0xAA);
    }

    #[test]
    fn test_zero_chr_banks_allocates_chr_ram() {
        let rom = rom_with_prg(vec![0; 0x4000]);
        let mut cart = Cartridge::from_rom(&rom).unwrap();

        cart.write_chr(0x0000, 0x7E);
        assert_eq!(cart.read_chr(0x0000), 0x7E);
    }

    #[test]
    fn test_chr_rom_writes_are_ignored() {
        let rom = INesRom { header: header(0, 0, false), prg_rom: vec![0; 0x4000], chr_rom: vec![0x55; 0x2000] };
        let mut cart = Cartridge::from_rom(&rom).unwrap();

        cart.write_chr(0x0000, 0x00);
        assert_eq!(cart.read_chr(0x0000), 0x55);
    }

    #[test]
    fn test_mirroring_from_header() {
        let horizontal = rom_with_prg(vec![0; 0x4000]);
        assert_eq!(Cartridge::from_rom(&horizontal).unwrap().mirroring(), Mirroring::Horizontal);

        let mut vertical = horizontal;
        vertical.header.mirroring = 1;
        assert_eq!(Cartridge::from_rom(&vertical).unwrap().mirroring(), Mirroring::Vertical);

        let mut four = INesRom { header: header(0, 0, true), prg_rom: vec![0; 0x4000], chr_rom: Vec::new() };
        four.header.four_screen = true;
        assert_eq!(Cartridge::from_rom(&four).unwrap().mirroring(), Mirroring::FourScreen);
    }
}
