//! Fixed-size ROM images.
//!
//! The machine carries two 32 KiB images: the system image (BASIC and
//! kernal, also the source of the reset/IRQ vectors and the built-in
//! character set) and the function image that can be banked into either
//! half of the upper address space. Both are addressed with `addr & 0x7FFF`.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Size of every ROM image in bytes.
pub const ROM_SIZE: usize = 0x8000;

#[derive(Clone)]
pub struct RomImage {
    name: String,
    data: Box<[u8]>,
}

impl std::fmt::Debug for RomImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RomImage")
            .field("name", &self.name)
            .field("len", &self.data.len())
            .finish()
    }
}

impl RomImage {
    /// Wrap raw bytes; anything other than exactly 32 KiB is rejected.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        if bytes.len() != ROM_SIZE {
            return Err(Error::RomSize {
                name,
                expected: ROM_SIZE,
                actual: bytes.len(),
            });
        }
        Ok(Self {
            name,
            data: bytes.into_boxed_slice(),
        })
    }

    /// Read an image from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let rom = Self::from_bytes(name, bytes)?;
        log::info!("loaded ROM image `{}` ({} bytes)", rom.name, rom.data.len());
        Ok(rom)
    }

    /// An all-zero image, used when no function ROM is supplied.
    pub fn blank(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: vec![0; ROM_SIZE].into_boxed_slice(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.data[(addr & 0x7FFF) as usize]
    }

    /// Little-endian word at a CPU address (e.g. a vector at $FFFC).
    #[inline]
    pub fn read_word(&self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
