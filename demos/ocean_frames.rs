//! Example: Simulate a few ocean frames and dump the maps as PNG.
//!
//! Run with:
//!     cargo run --example ocean_frames --features tokio [config.json] [output_dir]

use anyhow::Context;
use ocean_fft::gpu::GpuContext;
use ocean_fft::{FrameStatus, OceanSimulator, OceanState, SpectrumConfig};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SpectrumConfig::from_json_file(&path)
            .with_context(|| format!("Failed to load config {}", path))?,
        None => SpectrumConfig::default(),
    };
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| "ocean_frames".to_string()));
    std::fs::create_dir_all(&output_dir)?;

    println!("Ocean FFT - Frame Dump Example");
    println!("==============================\n");
    println!("{}\n", config.to_json_string()?);

    let ctx = GpuContext::new().await.context("No GPU available")?;
    println!("Adapter: {}\n", ctx.adapter_info().name);

    let mut ocean = OceanSimulator::from_context(&ctx, config, 42)?;
    ocean.create_output_targets();
    let mut state = OceanState::new(ocean.config().patch_length, 0.0);

    for frame in 0..4 {
        let world_time = frame as f32 * 0.5;
        if ocean.tick(world_time) != FrameStatus::Rendered {
            anyhow::bail!("Frame {} was skipped", frame);
        }

        let displacement = ocean.read_displacement()?;
        let gradient = ocean.read_gradient()?;
        let [dx, dy, dz, _] = displacement.statistics();
        let folding = gradient.statistics()[3];

        println!("Frame {} (t = {:.2}s)", frame, world_time);
        println!(
            "  Dz mean {:+.4}  std {:.4}  range [{:.3}, {:.3}]",
            dz.mean,
            dz.variance.sqrt(),
            dz.min,
            dz.max
        );
        println!(
            "  Dx std {:.4}  Dy std {:.4}",
            dx.variance.sqrt(),
            dy.variance.sqrt()
        );
        println!("  Folding max {:.4}", folding.max);

        displacement.save_png(output_dir.join(format!("displacement_{:02}.png", frame)))?;
        gradient.save_png(output_dir.join(format!("gradient_{:02}.png", frame)))?;

        state.update(displacement, gradient);
        println!("  Level at origin {:+.4}\n", state.level_at(0.0, 0.0));
    }

    ocean.shutdown();
    println!("Wrote maps to {}", output_dir.display());
    Ok(())
}
