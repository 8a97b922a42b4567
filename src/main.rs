//! Headless particle demo
//! Runs an emitter through a frame loop the way the rendering demos do:
//! step, sort for the camera, pack; sort for the light, pack.
//!
//! Usage: particle-demo [fountain|column|<settings.toml>] [frames]

use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use log::{debug, info};
use rand::Rng;
use serde::Serialize;

use particle_engine::{EmitterSettings, ParticleSystem, StylePalette};

const DEFAULT_FRAMES: usize = 600;
const TARGET_FRAME_TIME: f32 = 1.0 / 60.0;

#[derive(Debug, Default, Serialize)]
struct DemoSummary {
    frames: usize,
    simulated_seconds: f32,
    total_spawned: usize,
    total_retired: usize,
    total_dropped: usize,
    peak_alive: usize,
    final_alive: usize,
    uniform_bytes_per_pass: usize,
}

fn load_settings(source: &str) -> Result<(EmitterSettings, StylePalette)> {
    if let Some(settings) = EmitterSettings::preset(source) {
        let palette = match source {
            "column" => StylePalette::column(),
            _ => StylePalette::fountain(),
        };
        return Ok((settings, palette));
    }

    let settings = EmitterSettings::load(source)
        .with_context(|| format!("loading emitter settings from {source}"))?;
    if settings.styles_count as usize != StylePalette::fountain().len() {
        bail!(
            "settings file asks for {} styles, the demo palette has {}",
            settings.styles_count,
            StylePalette::fountain().len()
        );
    }
    Ok((settings, StylePalette::fountain()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "fountain".to_string());
    let frames = match args.next() {
        Some(raw) => raw.parse::<usize>().with_context(|| format!("invalid frame count {raw}"))?,
        None => DEFAULT_FRAMES,
    };

    let (settings, palette) = load_settings(&source)?;
    info!(
        "Running {} frames of '{}': {} slots, {} particles/s, {}s lifetime",
        frames, source, settings.max_particles, settings.particles_per_second, settings.life_length_seconds
    );

    let target = settings.origin;
    let camera_view = Mat4::look_at_rh(Vec3::new(0.0, 5.0, 0.0), target, Vec3::Y);
    let light_view = Mat4::look_at_rh(target + Vec3::new(20.0, 40.0, -10.0), target, Vec3::Y);

    let mut system = ParticleSystem::from_settings(settings, palette)?;
    let mut rng = rand::thread_rng();

    let mut summary = DemoSummary {
        frames,
        uniform_bytes_per_pass: system.layout().size_in_bytes(),
        ..Default::default()
    };
    let mut second_elapsed = 0.0_f32;

    for frame in 0..frames {
        // Frame pacing jitter, with an occasional long stall
        let time_delta: f32 = if rng.gen_ratio(1, 200) {
            rng.gen_range(0.5..1.5)
        } else {
            TARGET_FRAME_TIME * rng.gen_range(0.8..1.2)
        };

        let update = system.update(time_delta, &camera_view, &light_view)?;
        let stats = update.stats;

        summary.simulated_seconds += time_delta;
        summary.total_spawned += stats.spawned;
        summary.total_retired += stats.retired;
        summary.total_dropped += stats.dropped;
        summary.peak_alive = summary.peak_alive.max(stats.alive);

        if time_delta > system.emitter().settings().max_time_delta {
            debug!("Frame {}: stall of {:.3}s clamped", frame, time_delta);
        }

        second_elapsed += time_delta;
        if second_elapsed >= 1.0 {
            second_elapsed = 0.0;
            info!(
                "Frame {}: {} alive, {} spawned, {} retired, {} dropped",
                frame, stats.alive, stats.spawned, stats.retired, stats.dropped
            );
        }
    }

    summary.final_alive = system.emitter().alive_particles_count();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
