/*!
window - Interactive front end (winit + pixels).

The machine runs on its own thread (see [`machine::spawn`]) and streams
scanlines through a [`ChannelSink`]. The UI thread owns the event loop:
on every redraw it drains whatever lines have arrived into a
[`FrameBuffer`], expands it through the palette into the `pixels`
surface and presents it.

Host keys are mapped onto the 8x8 keyboard matrix through a
[`SharedKeys`] handle that the machine's bus also holds. Closing the
window raises the stop flag; the core finishes its current instruction
and the thread is joined before [`run`] returns.

[`machine::spawn`]: crate::machine::spawn
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::display::{ChannelSink, FrameBuffer, Scanline};
use crate::error::{Error, Result};
use crate::input::SharedKeys;
use crate::machine::{self, Machine, RunStats};
use crate::ted::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Presentation interval (PAL field rate).
const FRAME_INTERVAL: Duration = Duration::from_micros(20_000);

/// Frames of scanlines the channel may buffer before lines are dropped.
const CHANNEL_FRAMES: usize = 2;

/// Open a window, run `machine` until it is closed and return the run
/// counters. `keys` must be the handle the machine's bus scans.
pub fn run(machine: Machine, keys: SharedKeys, scale: u32) -> Result<RunStats> {
    let stop = Arc::new(AtomicBool::new(false));
    let (sink, lines) = ChannelSink::bounded(CHANNEL_FRAMES);
    let core = machine::spawn(machine, sink, Arc::clone(&stop))?;

    let mut app = App {
        surface: None,
        frame: FrameBuffer::new(),
        lines,
        keys,
        stop: Arc::clone(&stop),
        scale: scale.max(1),
        error: None,
    };

    let outcome = EventLoop::new()
        .map_err(Error::from)
        .and_then(|event_loop| event_loop.run_app(&mut app).map_err(Error::from));

    stop.store(true, Ordering::Relaxed);
    let stats = match core.join() {
        Ok((_, stats)) => stats,
        Err(panic) => std::panic::resume_unwind(panic),
    };

    outcome?;
    match app.error {
        Some(err) => Err(err),
        None => Ok(stats),
    }
}

struct Surface {
    window: Arc<Window>,
    pixels: Pixels<'static>,
}

struct App {
    surface: Option<Surface>,
    frame: FrameBuffer,
    lines: Receiver<Scanline>,
    keys: SharedKeys,
    stop: Arc<AtomicBool>,
    scale: u32,
    error: Option<Error>,
}

impl App {
    fn open(&self, event_loop: &ActiveEventLoop) -> Result<Surface> {
        let size = LogicalSize::new(
            (SCREEN_WIDTH as u32 * self.scale) as f64,
            (SCREEN_HEIGHT as u32 * self.scale) as f64,
        );
        let attrs = Window::default_attributes()
            .with_title("tedium")
            .with_inner_size(size)
            .with_min_inner_size(LogicalSize::new(SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let inner = window.inner_size();
        let texture = SurfaceTexture::new(inner.width, inner.height, Arc::clone(&window));
        let pixels = Pixels::new(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, texture)?;
        Ok(Surface { window, pixels })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Error) {
        log::error!("{err}");
        self.error = Some(err);
        self.stop.store(true, Ordering::Relaxed);
        event_loop.exit();
    }

    fn present(&mut self) -> Result<()> {
        for line in self.lines.try_iter() {
            self.frame.apply(&line);
        }
        if let Some(surface) = self.surface.as_mut() {
            self.frame.write_rgba(surface.pixels.frame_mut());
            surface.pixels.render()?;
        }
        Ok(())
    }

    fn key(&self, code: KeyCode, state: ElementState) {
        let Some((row, col)) = matrix_position(code) else {
            return;
        };
        self.keys.with(|m| match state {
            ElementState::Pressed => m.press(row, col),
            ElementState::Released => m.release(row, col),
        });
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }
        match self.open(event_loop) {
            Ok(surface) => self.surface = Some(surface),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.stop.store(true, Ordering::Relaxed);
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(surface) = self.surface.as_mut() {
                    if let Err(err) = surface.pixels.resize_surface(size.width, size.height) {
                        log::warn!("surface resize failed: {err}");
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = self.present() {
                    self.fail(event_loop, err);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.key(code, event.state);
                }
            }
            WindowEvent::Focused(false) => self.keys.with(|m| m.clear()),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(surface) = self.surface.as_ref() {
            surface.window.request_redraw();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + FRAME_INTERVAL));
    }
}

/// Host key to (row, column) of the keyboard matrix. Row `r` is selected
/// by bit `r` of $FD30 going low; column `c` reads back as bit `c` of $FF08.
fn matrix_position(code: KeyCode) -> Option<(usize, usize)> {
    use KeyCode::*;
    let pos = match code {
        Backspace | Delete => (0, 0),
        Enter => (0, 1),
        Backslash => (0, 2),
        F4 => (0, 3),
        F1 => (0, 4),
        F2 => (0, 5),
        F3 => (0, 6),
        BracketLeft => (0, 7),

        Digit3 => (1, 0),
        KeyW => (1, 1),
        KeyA => (1, 2),
        Digit4 => (1, 3),
        KeyZ => (1, 4),
        KeyS => (1, 5),
        KeyE => (1, 6),
        ShiftLeft | ShiftRight => (1, 7),

        Digit5 => (2, 0),
        KeyR => (2, 1),
        KeyD => (2, 2),
        Digit6 => (2, 3),
        KeyC => (2, 4),
        KeyF => (2, 5),
        KeyT => (2, 6),
        KeyX => (2, 7),

        Digit7 => (3, 0),
        KeyY => (3, 1),
        KeyG => (3, 2),
        Digit8 => (3, 3),
        KeyB => (3, 4),
        KeyH => (3, 5),
        KeyU => (3, 6),
        KeyV => (3, 7),

        Digit9 => (4, 0),
        KeyI => (4, 1),
        KeyJ => (4, 2),
        Digit0 => (4, 3),
        KeyM => (4, 4),
        KeyK => (4, 5),
        KeyO => (4, 6),
        KeyN => (4, 7),

        ArrowDown => (5, 0),
        KeyP => (5, 1),
        KeyL => (5, 2),
        ArrowUp => (5, 3),
        Period => (5, 4),
        Quote => (5, 5),
        Minus => (5, 6),
        Comma => (5, 7),

        ArrowLeft => (6, 0),
        BracketRight => (6, 1),
        Semicolon => (6, 2),
        ArrowRight => (6, 3),
        Escape => (6, 4),
        Equal => (6, 5),
        NumpadAdd => (6, 6),
        Slash => (6, 7),

        Digit1 => (7, 0),
        Home => (7, 1),
        ControlLeft | ControlRight => (7, 2),
        Digit2 => (7, 3),
        Space => (7, 4),
        AltLeft => (7, 5),
        KeyQ => (7, 6),
        Tab => (7, 7),

        _ => return None,
    };
    Some(pos)
}
