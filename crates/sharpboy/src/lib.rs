use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use typed_builder::TypedBuilder;

use sharpboy_core::bus::{reg, Bus};
use sharpboy_core::{FrameBuffer, GameBoy, MachineConfig, RunExit, SCREEN_HEIGHT, SCREEN_WIDTH};

pub const USAGE: &str =
    "Usage: sharpboy <rom> [--frames N | --until-serial] [--max-cycles N] [--dump-frame PATH]";

/// Default cycle budget: a little over 2800 frames of dispatcher cycles.
pub const DEFAULT_MAX_CYCLES: u64 = 200_000_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunMode {
    Frames(u64),
    UntilSerial,
}

#[derive(Clone, Debug, Eq, PartialEq, TypedBuilder)]
pub struct RunOptions {
    pub rom: PathBuf,
    #[builder(default = RunMode::Frames(60))]
    pub mode: RunMode,
    #[builder(default = DEFAULT_MAX_CYCLES)]
    pub max_cycles: u64,
    #[builder(default)]
    pub dump_frame: Option<PathBuf>,
}

/// Parse command-line arguments (without the program name).
pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<RunOptions> {
    let mut rom = None;
    let mut mode = RunMode::Frames(60);
    let mut max_cycles = DEFAULT_MAX_CYCLES;
    let mut dump_frame = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => {
                let value = args.next().context("--frames needs a value")?;
                let frames = value
                    .parse()
                    .with_context(|| format!("invalid frame count '{value}'"))?;
                mode = RunMode::Frames(frames);
            }
            "--until-serial" => mode = RunMode::UntilSerial,
            "--max-cycles" => {
                let value = args.next().context("--max-cycles needs a value")?;
                max_cycles = value
                    .parse()
                    .with_context(|| format!("invalid cycle budget '{value}'"))?;
            }
            "--dump-frame" => {
                let value = args.next().context("--dump-frame needs a path")?;
                dump_frame = Some(PathBuf::from(value));
            }
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'\n{USAGE}"),
            path => {
                if rom.is_some() {
                    bail!("unexpected argument '{path}'\n{USAGE}");
                }
                rom = Some(PathBuf::from(path));
            }
        }
    }

    let rom = rom.with_context(|| format!("no ROM path given\n{USAGE}"))?;
    Ok(RunOptions::builder()
        .rom(rom)
        .mode(mode)
        .max_cycles(max_cycles)
        .dump_frame(dump_frame)
        .build())
}

/// Load the ROM, run it and write any requested output.
pub fn run(options: &RunOptions) -> Result<RunExit> {
    let rom = std::fs::read(&options.rom)
        .with_context(|| format!("failed to read ROM '{}'", options.rom.display()))?;

    let config = MachineConfig::from_env();
    log::debug!("{config:?}");
    let mut gb = GameBoy::with_config(config);
    gb.load_rom(&rom);

    let exit = match options.mode {
        RunMode::Frames(frames) => gb.run_frames_within(frames, options.max_cycles),
        RunMode::UntilSerial => gb.run_until_serial(options.max_cycles),
    };
    log::info!(
        "{exit:?} after {} cycles, {} frames",
        gb.cycles(),
        gb.ppu.frame_count()
    );

    let serial = gb.serial.text();
    if !serial.is_empty() {
        print!("{serial}");
    }

    if let Some(path) = &options.dump_frame {
        let bgp = gb.bus.read8(reg::BGP);
        let buffer = frame_to_rgb24(gb.frame(), bgp);
        std::fs::write(path, &buffer)
            .with_context(|| format!("failed to write frame '{}'", path.display()))?;
        println!(
            "Wrote {} bytes ({}x{} rgb24) to '{}'",
            buffer.len(),
            SCREEN_WIDTH,
            SCREEN_HEIGHT,
            path.display()
        );
    }

    Ok(exit)
}

/// DMG grayscale for a palette entry: 0 = white, 3 = black.
pub fn shade(palette_entry: u8) -> u8 {
    match palette_entry & 0x03 {
        0 => 0xFF,
        1 => 0xAA,
        2 => 0x55,
        _ => 0x00,
    }
}

/// Map each colour index through `bgp` and expand to RGB24.
pub fn frame_to_rgb24(frame: &FrameBuffer, bgp: u8) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(SCREEN_WIDTH * SCREEN_HEIGHT * 3);
    for &color in frame.iter().flatten() {
        let value = shade(bgp >> ((color & 0x03) * 2));
        buffer.extend_from_slice(&[value, value, value]);
    }
    buffer
}
