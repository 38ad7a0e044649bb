use std::path::PathBuf;

use clap::Parser;
use tedium::{FrameBuffer, Machine, NullSink, PrgImage, RomImage, RunStats};

#[derive(Parser, Debug)]
#[command(name = "tedium", version, about = "Commodore Plus/4 (TED) emulator.")]
struct Args {
    /// System image: BASIC + kernal, 32 KiB.
    #[arg(long, value_name = "PATH")]
    rom: PathBuf,

    /// Function ROM (3-plus-1), 32 KiB. A blank image is used when omitted.
    #[arg(long, value_name = "PATH")]
    function_rom: Option<PathBuf>,

    /// Program to inject once the system has booted.
    #[arg(long, value_name = "PATH")]
    prg: Option<PathBuf>,

    /// Frames to run before injecting `--prg`.
    #[arg(long, value_name = "N", default_value_t = 120)]
    warmup_frames: u64,

    /// Frames to run headless.
    #[arg(long, value_name = "N", default_value_t = 50)]
    frames: u64,

    /// Write the last frame as PNG.
    #[cfg(feature = "screenshot")]
    #[arg(long, value_name = "PATH")]
    screenshot: Option<PathBuf>,

    /// Open a window instead of running headless.
    #[cfg(feature = "display")]
    #[arg(long, default_value_t = false)]
    window: bool,

    /// Window scale factor.
    #[cfg(feature = "display")]
    #[arg(long, value_name = "N", default_value_t = 3)]
    scale: u32,
}

fn main() -> tedium::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let system = RomImage::load(&args.rom)?;
    let function = match &args.function_rom {
        Some(path) => RomImage::load(path)?,
        None => RomImage::blank("function (blank)"),
    };
    let prg = args.prg.as_ref().map(PrgImage::load).transpose()?;

    #[cfg(feature = "display")]
    {
        if args.window {
            let keys = tedium::SharedKeys::new();
            let mut machine = Machine::with_input(system, function, Box::new(keys.clone()));
            boot(&mut machine, prg.as_ref(), args.warmup_frames)?;
            let stats = tedium::display::window::run(machine, keys, args.scale)?;
            report_stats(&stats);
            return Ok(());
        }
    }

    let mut machine = Machine::new(system, function);
    boot(&mut machine, prg.as_ref(), args.warmup_frames)?;

    let mut frame = FrameBuffer::new();
    let stats = machine.run_frames(args.frames, &mut frame);

    #[cfg(feature = "screenshot")]
    {
        if let Some(path) = &args.screenshot {
            tedium::display::screenshot::save_png(&frame, path)?;
        }
    }

    println!("{}", machine.cpu());
    report_stats(&stats);
    Ok(())
}

/// Hard reset, then (if a program was given) let the ROM initialise for
/// `warmup` frames before copying the program in.
fn boot(machine: &mut Machine, prg: Option<&PrgImage>, warmup: u64) -> tedium::Result<()> {
    machine.hard_reset();
    if let Some(prg) = prg {
        machine.run_frames(warmup, &mut NullSink);
        machine.load_prg(prg)?;
    }
    Ok(())
}

fn report_stats(stats: &RunStats) {
    println!(
        "{} instructions, {} cycles, {} frames",
        stats.instructions, stats.cycles, stats.frames
    );
}
