//! Real-time control loop
//!
//! One task owns the session. Ticks, playback deadlines, and front-end
//! commands are all serviced from the same `select!`, so nothing touches
//! the session concurrently and ticks never overlap.

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::control::{Command, Session, TickOutcome};
use crate::motion::MotionSensor;
use crate::synth::Synthesizer;

/// Counters from a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub applied_ticks: u64,
    pub played_tones: u64,
    pub commands: u64,
}

/// Loop options
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Advance the sensor mode this often
    pub cycle_every: Option<Duration>,
    /// Return as soon as a playback run completes
    pub stop_after_playback: bool,
}

/// Drive `session` until `shutdown` resolves
///
/// A closed command channel only stops command handling; ticks continue.
pub async fn run_session<M, S, F>(
    session: &mut Session<M, S>,
    commands: &mut mpsc::Receiver<Command>,
    options: RunOptions,
    shutdown: F,
) -> RunStats
where
    M: MotionSensor,
    S: Synthesizer,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut stats = RunStats::default();
    let mut ticker = time::interval(session.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    // A zero period means no automatic cycling
    let cycle_every = options.cycle_every.filter(|period| !period.is_zero());
    let cycle_period = cycle_every.unwrap_or(Duration::from_secs(3600));
    let mut cycler = time::interval_at(Instant::now() + cycle_period, cycle_period);

    let mut playback_start: Option<Instant> = None;
    let mut commands_open = true;

    loop {
        // Playback starts from a command or was already running on entry
        if session.is_playing() && playback_start.is_none() {
            playback_start = Some(Instant::now());
            stats.played_tones += session.poll_playback(Duration::ZERO) as u64;
        }
        if !session.is_playing() && playback_start.take().is_some() && options.stop_after_playback {
            break;
        }

        let next_tone = playback_start
            .zip(session.next_playback_deadline())
            .map(|(start, offset)| start + offset);

        tokio::select! {
            biased;

            _ = &mut shutdown => break,

            command = commands.recv(), if commands_open => match command {
                Some(command) => {
                    stats.commands += 1;
                    if let Err(err) = session.handle(command) {
                        warn!("{:?} ignored: {}", command, err);
                    }
                }
                None => commands_open = false,
            },

            _ = time::sleep_until(next_tone.unwrap_or_else(Instant::now)), if next_tone.is_some() => {
                if let Some(start) = playback_start {
                    stats.played_tones += session.poll_playback(start.elapsed()) as u64;
                }
            }

            _ = cycler.tick(), if cycle_every.is_some() => {
                session.advance_mode();
            }

            _ = ticker.tick() => {
                stats.ticks += 1;
                match session.tick() {
                    TickOutcome::Applied(report) => {
                        stats.applied_ticks += 1;
                        debug!(
                            "{} tick: f={:.1} a={:.3} r={:.2}",
                            report.mode,
                            session.parameters().frequency,
                            session.parameters().amplitude,
                            session.parameters().ramp_time
                        );
                    }
                    TickOutcome::NoSample(_) | TickOutcome::Suspended => {}
                }
            }
        }
    }

    stats
}
