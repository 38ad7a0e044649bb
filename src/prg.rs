//! Program (`.prg`) images.
//!
//! A PRG file is a two-byte little-endian load address followed by the
//! bytes to place there. Images that would run past $FFFF are rejected at
//! parse time so injection can copy them without wrapping.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Load address of tokenised BASIC programs.
pub const BASIC_START: u16 = 0x1001;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrgImage {
    load: u16,
    data: Vec<u8>,
}

impl PrgImage {
    /// Split raw file contents into load address and payload.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let [lo, hi, data @ ..] = bytes else {
            return Err(Error::PrgTooShort(bytes.len()));
        };
        let load = u16::from_le_bytes([*lo, *hi]);
        if load as usize + data.len() > 0x10000 {
            return Err(Error::PrgOverrun {
                load,
                len: data.len(),
            });
        }
        Ok(Self {
            load,
            data: data.to_vec(),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&bytes)
    }

    pub fn load_address(&self) -> u16 {
        self.load
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// First address past the program. A program ending exactly at $FFFF
    /// reports $0000.
    pub fn end_address(&self) -> u16 {
        self.load.wrapping_add(self.data.len() as u16)
    }

    pub fn is_basic_program(&self) -> bool {
        self.load == BASIC_START
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn splits_header_from_payload() {
        let prg = PrgImage::parse(&[0x01, 0x10, 0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(prg.load_address(), 0x1001);
        assert_eq!(prg.data(), &[0xAA, 0xBB, 0xCC]);
        assert_eq!(prg.end_address(), 0x1004);
        assert!(prg.is_basic_program());
    }

    #[test]
    fn machine_code_is_not_basic() {
        let prg = PrgImage::parse(&[0x00, 0x20, 0xA9, 0x00]).unwrap();
        assert!(!prg.is_basic_program());
        assert_eq!(prg.end_address(), 0x2002);
    }

    #[test]
    fn header_only_is_empty_program() {
        let prg = PrgImage::parse(&[0x00, 0x30]).unwrap();
        assert!(prg.data().is_empty());
        assert_eq!(prg.end_address(), 0x3000);
    }

    #[test]
    fn short_images_rejected() {
        assert!(matches!(PrgImage::parse(&[]), Err(Error::PrgTooShort(0))));
        assert!(matches!(PrgImage::parse(&[0x01]), Err(Error::PrgTooShort(1))));
    }

    #[test]
    fn overrun_rejected_but_exact_fit_allowed() {
        let fits = PrgImage::parse(&[0xFE, 0xFF, 1, 2]).unwrap();
        assert_eq!(fits.end_address(), 0x0000);
        let err = PrgImage::parse(&[0xFE, 0xFF, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, Error::PrgOverrun { load: 0xFFFE, len: 3 }));
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x00, 0x40, 0xEA, 0x60]).unwrap();
        let prg = PrgImage::load(file.path()).unwrap();
        assert_eq!(prg.load_address(), 0x4000);
        assert_eq!(prg.data(), &[0xEA, 0x60]);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.prg");
        match PrgImage::load(&path) {
            Err(Error::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
    }
}
