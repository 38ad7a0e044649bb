//! Startup error taxonomy.
//!
//! Everything that can go wrong before the core exists (ROM and program
//! images, host files) is reported through [`Error`]. Once a [`Machine`]
//! has been constructed, stepping is infallible.
//!
//! [`Machine`]: crate::machine::Machine

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ROM image `{name}` is {actual} bytes, expected exactly {expected}")]
    RomSize {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("cannot read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("program image is {0} bytes; a two-byte load address is required")]
    PrgTooShort(usize),

    #[error("program of {len} bytes loaded at ${load:04X} runs past $FFFF")]
    PrgOverrun { load: u16, len: usize },

    #[error("cannot start emulation thread: {0}")]
    Spawn(#[source] io::Error),

    #[cfg(feature = "display")]
    #[error("event loop failed: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[cfg(feature = "display")]
    #[error("cannot open window: {0}")]
    Window(#[from] winit::error::OsError),

    #[cfg(feature = "display")]
    #[error("pixel surface failed: {0}")]
    Surface(#[from] pixels::Error),

    #[cfg(feature = "screenshot")]
    #[error("failed to encode screenshot: {0}")]
    Image(#[from] image::ImageError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
