use tracing::debug;

use crate::constants::{MEMORY_SIZE, SPRITE_SHEET, SPRITE_SHEET_START};
use crate::error::{Error, Result};

/// # Memory
/// 4096 bytes of addressable memory, zeroed on construction.
///
/// Every access is bounds checked; touching an address past the end is an
/// `Error::AddressOutOfBounds` rather than a panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            bytes: [0; MEMORY_SIZE],
        }
    }

    /// Zeroed memory with the hex digit sprites at `SPRITE_SHEET_START`.
    pub fn with_sprite_sheet() -> Self {
        let mut memory = Self::new();
        let start = SPRITE_SHEET_START as usize;
        memory.bytes[start..start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        memory
    }

    /// Copy `bytes` into memory starting at `offset`.
    ///
    /// Nothing is written if the bytes don't fit.
    pub fn load(&mut self, bytes: &[u8], offset: usize) -> Result<()> {
        let available = MEMORY_SIZE.saturating_sub(offset);
        if bytes.len() > available {
            return Err(Error::RomTooLarge {
                size: bytes.len(),
                offset,
                available,
            });
        }
        self.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
        debug!("loaded {} bytes at {offset:#06X}", bytes.len());
        Ok(())
    }

    pub fn read(&self, address: usize) -> Result<u8> {
        self.bytes
            .get(address)
            .copied()
            .ok_or(Error::AddressOutOfBounds { address })
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<()> {
        let cell = self
            .bytes
            .get_mut(address)
            .ok_or(Error::AddressOutOfBounds { address })?;
        *cell = value;
        Ok(())
    }

    /// Reads a big-endian word: the high byte lives at `address`.
    pub fn read_word(&self, address: usize) -> Result<u16> {
        let high = self.read(address)?;
        let low = self.read(address + 1)?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// The `len` bytes starting at `address`.
    pub fn slice(&self, address: usize, len: usize) -> Result<&[u8]> {
        let end = Self::end_of(address, len)?;
        Ok(&self.bytes[address..end])
    }

    pub fn slice_mut(&mut self, address: usize, len: usize) -> Result<&mut [u8]> {
        let end = Self::end_of(address, len)?;
        Ok(&mut self.bytes[address..end])
    }

    /// One past the last address of a range, if the whole range is addressable.
    fn end_of(address: usize, len: usize) -> Result<usize> {
        let end = address + len;
        if end > MEMORY_SIZE {
            // Report the first address that falls outside
            Err(Error::AddressOutOfBounds {
                address: address.max(MEMORY_SIZE),
            })
        } else {
            Ok(end)
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_starts_zeroed() {
        let memory = Memory::new();
        assert!(memory.slice(0, MEMORY_SIZE).unwrap().iter().all(|b| *b == 0));
    }

    #[test]
    fn test_sprite_sheet_is_in_low_memory() {
        let memory = Memory::with_sprite_sheet();
        assert_eq!(memory.slice(0x0, 5).unwrap(), &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(memory.read(0x50).unwrap(), 0);
    }

    #[test]
    fn test_load_places_bytes_at_offset() {
        let mut memory = Memory::new();
        memory.load(b"ab", 0x100).unwrap();
        assert_eq!(memory.read(0x100).unwrap(), b'a');
        assert_eq!(memory.read(0x101).unwrap(), b'b');
        assert_eq!(memory.read(0x0FF).unwrap(), 0);
        assert_eq!(memory.read(0x102).unwrap(), 0);
    }

    #[test]
    fn test_load_fills_to_the_last_byte() {
        let mut memory = Memory::new();
        memory.load(&[0xAA, 0xBB], MEMORY_SIZE - 2).unwrap();
        assert_eq!(memory.read(MEMORY_SIZE - 1).unwrap(), 0xBB);
    }

    #[test]
    fn test_load_rejects_oversized_rom() {
        let mut memory = Memory::new();
        let rom = vec![0xFF; 0xE01];
        match memory.load(&rom, 0x200) {
            Err(Error::RomTooLarge {
                size: 0xE01,
                offset: 0x200,
                available: 0xE00,
            }) => {}
            other => panic!("expected RomTooLarge, got {:?}", other),
        }
        // Nothing was written
        assert_eq!(memory.read(0x200).unwrap(), 0);
    }

    #[test]
    fn test_load_rejects_offset_past_the_end() {
        let mut memory = Memory::new();
        assert!(memory.load(&[0x1], MEMORY_SIZE).is_err());
    }

    #[test]
    fn test_read_out_of_bounds() {
        let memory = Memory::new();
        assert!(matches!(
            memory.read(MEMORY_SIZE),
            Err(Error::AddressOutOfBounds { address: MEMORY_SIZE })
        ));
    }

    #[test]
    fn test_write_out_of_bounds() {
        let mut memory = Memory::new();
        assert!(memory.write(0x1FFF, 0x1).is_err());
    }

    #[test]
    fn test_read_word_is_big_endian() {
        let mut memory = Memory::new();
        memory.load(&[0xAA, 0xBB], 0x200).unwrap();
        assert_eq!(memory.read_word(0x200).unwrap(), 0xAABB);
    }

    #[test]
    fn test_read_word_straddling_the_end() {
        let memory = Memory::new();
        assert!(memory.read_word(MEMORY_SIZE - 1).is_err());
    }

    #[test]
    fn test_slice_bounds() {
        let mut memory = Memory::new();
        assert_eq!(memory.slice(MEMORY_SIZE - 3, 3).unwrap().len(), 3);
        assert!(memory.slice(MEMORY_SIZE - 2, 3).is_err());
        assert!(memory.slice_mut(MEMORY_SIZE, 0).is_ok());
    }
}
