/*!
display - Consumers of rendered scanlines.

The core never presents anything itself. After each visible raster line
it hands a borrowed row of 320 colour indices to a [`ScanlineSink`]; the
sink decides what to do with it:

- [`NullSink`] drops it (benchmarks, warm-up runs).
- [`FrameBuffer`] keeps a full 320x200 index image and counts completed
  frames; [`FrameBuffer::rgba`] expands it through the palette.
- [`ChannelSink`] copies the row into an owned [`Scanline`] and sends it
  to a presentation thread over a `crossbeam-channel`.

Front ends (feature gated):
- `window` (`display`): winit event loop + `pixels` surface.
- `screenshot` (`screenshot`): PNG dump of a `FrameBuffer`.
*/

#[cfg(feature = "screenshot")]
pub mod screenshot;
#[cfg(feature = "display")]
pub mod window;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::ted::palette;
use crate::ted::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Receives each visible raster line as it completes.
pub trait ScanlineSink {
    /// `line` is the display row, 0..200.
    fn scanline(&mut self, line: usize, pixels: &[u8; SCREEN_WIDTH]);
}

impl<S: ScanlineSink + ?Sized> ScanlineSink for &mut S {
    fn scanline(&mut self, line: usize, pixels: &[u8; SCREEN_WIDTH]) {
        (**self).scanline(line, pixels);
    }
}

impl<S: ScanlineSink + ?Sized> ScanlineSink for Box<S> {
    fn scanline(&mut self, line: usize, pixels: &[u8; SCREEN_WIDTH]) {
        (**self).scanline(line, pixels);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl ScanlineSink for NullSink {
    fn scanline(&mut self, _line: usize, _pixels: &[u8; SCREEN_WIDTH]) {}
}

// ---------------------------------------------------------------------------
// Frame buffer
// ---------------------------------------------------------------------------

/// Full-frame image of colour indices.
#[derive(Clone)]
pub struct FrameBuffer {
    pixels: Box<[u8]>,
    frames: u64,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![0; SCREEN_WIDTH * SCREEN_HEIGHT].into_boxed_slice(),
            frames: 0,
        }
    }

    /// Frames whose last line has been received.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn line(&self, y: usize) -> &[u8] {
        &self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    /// Colour indices, row-major.
    pub fn indices(&self) -> &[u8] {
        &self.pixels
    }

    /// Store an owned line received from a [`ChannelSink`].
    pub fn apply(&mut self, line: &Scanline) {
        self.scanline(line.line, &line.pixels);
    }

    /// Expand into `out` as RGBA8; `out` must hold 320*200*4 bytes.
    pub fn write_rgba(&self, out: &mut [u8]) {
        for (dst, &index) in out.chunks_exact_mut(4).zip(self.pixels.iter()) {
            dst.copy_from_slice(&palette::rgba(index));
        }
    }

    pub fn rgba(&self) -> Vec<u8> {
        let mut out = vec![0; SCREEN_WIDTH * SCREEN_HEIGHT * 4];
        self.write_rgba(&mut out);
        out
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl ScanlineSink for FrameBuffer {
    fn scanline(&mut self, line: usize, pixels: &[u8; SCREEN_WIDTH]) {
        debug_assert!(line < SCREEN_HEIGHT);
        self.pixels[line * SCREEN_WIDTH..(line + 1) * SCREEN_WIDTH].copy_from_slice(pixels);
        if line == SCREEN_HEIGHT - 1 {
            self.frames += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// Channel hand-off
// ---------------------------------------------------------------------------

/// One rendered line, owned so it can cross threads.
#[derive(Clone, PartialEq, Eq)]
pub struct Scanline {
    pub line: usize,
    pub pixels: [u8; SCREEN_WIDTH],
}

impl std::fmt::Debug for Scanline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanline").field("line", &self.line).finish_non_exhaustive()
    }
}

/// Sends every line to a receiver on another thread. When the channel is
/// full the line is dropped rather than stalling emulation; once the
/// receiver is gone the sink goes quiet.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Sender<Scanline>,
    dropped: u64,
    disconnected: bool,
}

impl ChannelSink {
    pub fn new(tx: Sender<Scanline>) -> Self {
        Self {
            tx,
            dropped: 0,
            disconnected: false,
        }
    }

    /// Sink plus receiver, buffering up to `frames` whole frames.
    pub fn bounded(frames: usize) -> (Self, Receiver<Scanline>) {
        let (tx, rx) = crossbeam_channel::bounded(frames.max(1) * SCREEN_HEIGHT);
        (Self::new(tx), rx)
    }

    /// Lines discarded because the receiver fell behind.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl ScanlineSink for ChannelSink {
    fn scanline(&mut self, line: usize, pixels: &[u8; SCREEN_WIDTH]) {
        if self.disconnected {
            return;
        }
        let owned = Scanline {
            line,
            pixels: *pixels,
        };
        match self.tx.try_send(owned) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.dropped += 1,
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("scanline receiver closed");
                self.disconnected = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(v: u8) -> [u8; SCREEN_WIDTH] {
        [v; SCREEN_WIDTH]
    }

    #[test]
    fn frame_buffer_counts_frames_on_last_line() {
        let mut fb = FrameBuffer::new();
        fb.scanline(0, &row(1));
        assert_eq!(fb.frames(), 0);
        fb.scanline(SCREEN_HEIGHT - 1, &row(2));
        assert_eq!(fb.frames(), 1);
        assert_eq!(fb.pixel(10, 0), 1);
        assert_eq!(fb.line(SCREEN_HEIGHT - 1)[319], 2);
    }

    #[test]
    fn rgba_expands_through_palette() {
        let mut fb = FrameBuffer::new();
        fb.scanline(0, &row(0x01));
        let rgba = fb.rgba();
        assert_eq!(rgba.len(), SCREEN_WIDTH * SCREEN_HEIGHT * 4);
        assert_eq!(&rgba[0..4], &palette::rgba(0x01));
        assert_eq!(&rgba[SCREEN_WIDTH * 4..SCREEN_WIDTH * 4 + 4], &palette::rgba(0x00));
    }

    #[test]
    fn channel_sink_delivers_owned_lines() {
        let (mut sink, rx) = ChannelSink::bounded(1);
        sink.scanline(7, &row(0x33));
        let got = rx.try_recv().unwrap();
        assert_eq!(got.line, 7);
        assert_eq!(got.pixels[0], 0x33);

        let mut fb = FrameBuffer::new();
        fb.apply(&got);
        assert_eq!(fb.pixel(0, 7), 0x33);
    }

    #[test]
    fn channel_sink_drops_when_full_and_stops_when_closed() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let mut sink = ChannelSink::new(tx);
        sink.scanline(0, &row(0));
        sink.scanline(1, &row(0));
        assert_eq!(sink.dropped(), 1);
        drop(rx);
        sink.scanline(2, &row(0));
        assert!(sink.is_disconnected());
    }

    #[test]
    fn sinks_work_through_references() {
        fn feed<S: ScanlineSink>(mut s: S) {
            s.scanline(0, &[9; SCREEN_WIDTH]);
        }
        let mut fb = FrameBuffer::new();
        feed(&mut fb);
        assert_eq!(fb.pixel(0, 0), 9);
        feed(NullSink);
    }
}
