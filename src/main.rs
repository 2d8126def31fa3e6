//! Gyrotone - motion sensors as synthesis controllers

use anyhow::{Context, Result};
use clap::Parser;
use gyrotone::config;
use gyrotone::control::{load_trajectory, save_trajectory, TrajectoryFile};
use gyrotone::engine::{self, run_session, Engine, Player, RunOptions, WavRecorder};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config: config_path,
            duration,
            record,
        } => {
            let cfg = config::load_config(&config_path)?;
            let mut engine = Engine::new(&cfg)?;

            let mut player = Player::new();
            player.start(engine.synth(), cfg.audio.device.as_deref())?;

            if record.is_some() {
                engine.session_mut().start_recording();
            }

            println!("Running gyrotone, press Ctrl-C to stop");
            println!("  Mode: {}", engine.session().mode());
            println!("  Tick: {} ms", cfg.control.tick_interval_ms);

            let options = RunOptions {
                cycle_every: cfg.motion.cycle_secs.map(Duration::from_secs),
                stop_after_playback: false,
            };
            let stats = run_until_stopped(&mut engine, options, duration.map(Duration::from_secs))?;
            player.stop();

            println!("\nStopped after {} ticks ({} applied)", stats.ticks, stats.applied_ticks);
            if let Some(path) = record {
                write_recording(&mut engine, &path)?;
            }
        }

        Commands::Render {
            config: config_path,
            output,
            duration,
            record,
        } => {
            let cfg = config::load_config(&config_path)?;
            let mut engine = Engine::new(&cfg)?;
            let mut recorder = WavRecorder::create(&output, engine.sample_rate())?;

            if record.is_some() {
                engine.session_mut().start_recording();
            }

            println!("Rendering {} seconds to {:?}...", duration, output);
            engine.render(&mut recorder, Duration::from_secs(duration))?;
            let written = recorder.finish()?;
            println!("Rendered {:.1}s to {:?}", written.as_secs_f64(), output);

            if let Some(path) = record {
                write_recording(&mut engine, &path)?;
            }
        }

        Commands::Replay {
            config: config_path,
            trajectory,
            output,
        } => {
            let mut cfg = config::load_config(&config_path)?;
            let recording = load_trajectory(&trajectory)?;
            cfg.control.tick_interval_ms = recording.tick_interval_ms;
            cfg.validate()
                .with_context(|| format!("unusable tick interval in {:?}", trajectory))?;

            let mut engine = Engine::new(&cfg)?;
            engine.session_mut().load_tones(recording.events)?;
            let tones = engine.session_mut().play()?;
            println!(
                "Replaying {} tones at {} ms intervals",
                tones, recording.tick_interval_ms
            );

            match output {
                Some(output) => {
                    let mut recorder = WavRecorder::create(&output, engine.sample_rate())?;
                    engine.render_playback(&mut recorder)?;
                    let written = recorder.finish()?;
                    println!("Rendered {:.1}s to {:?}", written.as_secs_f64(), output);
                }
                None => {
                    let mut player = Player::new();
                    player.start(engine.synth(), cfg.audio.device.as_deref())?;
                    let options = RunOptions {
                        cycle_every: None,
                        stop_after_playback: true,
                    };
                    let stats = run_until_stopped(&mut engine, options, None)?;
                    player.stop();
                    println!("Played {} of {} tones", stats.played_tones, tones);
                }
            }
        }

        Commands::Devices => {
            println!("Available audio output devices:\n");

            if let Some(name) = engine::default_device_name() {
                println!("Default output: {}\n", name);
            }

            let devices = engine::list_output_devices();
            if devices.is_empty() {
                println!("  (none found)");
            }
            for (name, config) in devices {
                println!(
                    "  - {} ({} Hz, {} ch)",
                    name, config.sample_rate.0, config.channels
                );
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Tick interval: {} ms", cfg.control.tick_interval_ms);
                    println!("  Guard policy: {:?}", cfg.control.guard_policy);
                    println!(
                        "  Ceilings: {} Hz, amplitude {}, ramp {} s, mix {}",
                        cfg.ceilings.max_frequency,
                        cfg.ceilings.max_amplitude,
                        cfg.ceilings.max_ramp_time,
                        cfg.ceilings.max_effect_mix
                    );
                    println!(
                        "  Sensitivity: x {} / y {} / z {}",
                        cfg.sensitivity.x, cfg.sensitivity.y, cfg.sensitivity.z
                    );
                    println!("  Synth: {} with {} effect", cfg.synth.waveform, cfg.synth.effect);
                    println!("  Motion source: {:?}", cfg.motion.source);
                    for mode in &cfg.motion.unavailable {
                        println!("    - {} disabled", mode);
                    }
                }
                Err(e) => {
                    println!("Configuration is invalid: {:#}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../gyrotone.example.yaml");

            let path = "gyrotone.yaml";
            if Path::new(path).exists() {
                println!("gyrotone.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created gyrotone.yaml with example configuration.");
            }
        }
    }

    Ok(())
}

/// Drive the engine in real time until Ctrl-C, the optional time limit, or
/// the end of playback when requested
fn run_until_stopped(
    engine: &mut Engine,
    options: RunOptions,
    limit: Option<Duration>,
) -> Result<engine::RunStats> {
    let interrupted = Arc::new(Notify::new());
    {
        let interrupted = interrupted.clone();
        ctrlc::set_handler(move || interrupted.notify_one())
            .context("failed to install Ctrl-C handler")?;
    }

    let rt = tokio::runtime::Runtime::new()?;
    let stats = rt.block_on(async {
        // No interactive front end; the sender only keeps the channel open
        let (_commands_tx, mut commands) = mpsc::channel(16);

        let shutdown = async {
            match limit {
                Some(limit) => {
                    tokio::select! {
                        _ = tokio::time::sleep(limit) => {}
                        _ = interrupted.notified() => {}
                    }
                }
                None => interrupted.notified().await,
            }
        };

        run_session(engine.session_mut(), &mut commands, options, shutdown).await
    });

    Ok(stats)
}

fn write_recording(engine: &mut Engine, path: &Path) -> Result<()> {
    let session = engine.session_mut();
    session.stop_recording();

    let file = TrajectoryFile::new(session.tick_interval(), session.trajectory().events());
    save_trajectory(path, &file)?;
    println!("Saved {} tones to {:?}", file.events.len(), path);
    Ok(())
}
