// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
use clap::Parser;
use log::{error, info};
use psrx_core::core::cdrom::BinDisc;
use psrx_core::core::config::{EmulatorConfig, Region};
use psrx_core::core::error::{EmulatorError, Result};
use psrx_core::core::memory::Bus;
use psrx_core::core::{InputSnapshot, System};
use std::path::PathBuf;

/// Headless PlayStation (PSX) core runner
#[derive(Parser)]
#[command(name = "psrx")]
#[command(about = "Run the PSX core headless for a number of frames", long_about = None)]
struct Args {
    /// Path to PlayStation BIOS file (defaults to $PSRX_BIOS)
    bios_file: Option<PathBuf>,

    /// Core configuration (TOML)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Raw 2352-byte/sector disc image (.bin)
    #[arg(short = 'c', long)]
    cdrom: Option<PathBuf>,

    /// Number of frames to run
    #[arg(short = 'n', long, default_value = "60")]
    frames: u64,

    /// Override the configured region (ntsc, pal)
    #[arg(short = 'r', long)]
    region: Option<String>,

    /// Write a save state here after the last frame
    #[arg(short = 's', long)]
    save_state: Option<PathBuf>,

    /// Print a JSON summary on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // .env is optional
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("psrx v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => EmulatorConfig::load(path)?,
        None => EmulatorConfig::default(),
    };
    if let Some(region) = &args.region {
        config.region = region.parse::<Region>()?;
    }

    let bios_path = args
        .bios_file
        .clone()
        .or_else(|| std::env::var_os("PSRX_BIOS").map(PathBuf::from))
        .ok_or_else(|| EmulatorError::BiosNotFound("no path given and PSRX_BIOS unset".into()))?;
    info!("Loading BIOS from: {}", bios_path.display());
    let bios = Bus::read_bios_file(&bios_path)?;

    let region = config.region;
    let mut system = System::with_config(config);
    system.init(&bios, region)?;

    if let Some(path) = &args.cdrom {
        info!("Loading disc from: {}", path.display());
        system.insert_disc(Box::new(BinDisc::open(path)?))?;
    }

    let input = InputSnapshot::default();
    let mut last = None;
    let log_interval = (args.frames / 10).max(1);
    for frame in 0..args.frames {
        last = Some(system.run_frame(&input)?);
        if frame % log_interval == 0 {
            info!(
                "Frame {}/{} | PC: 0x{:08X} | Cycles: {}",
                frame + 1,
                args.frames,
                system.pc().unwrap_or_default(),
                system.cycles()
            );
        }
    }

    if let Some(path) = &args.save_state {
        let blob = system.serialize()?;
        std::fs::write(path, &blob)?;
        info!("Save state written to {} ({} bytes)", path.display(), blob.len());
    }

    if args.json {
        let (width, height) = last
            .as_ref()
            .map_or((0, 0), |f| (f.framebuffer.width, f.framebuffer.height));
        let summary = serde_json::json!({
            "finished_at": chrono::Utc::now().to_rfc3339(),
            "frames": system.frame_count(),
            "cycles": system.cycles(),
            "pc": format!("0x{:08X}", system.pc().unwrap_or_default()),
            "region": system.config().region,
            "framebuffer": { "width": width, "height": height },
        });
        println!("{}", summary);
    }

    info!("Emulation completed: {} frames", system.frame_count());
    Ok(())
}
