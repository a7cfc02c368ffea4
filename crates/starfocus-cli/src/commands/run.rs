//! Interactive terminal session.
//!
//! Frames go to stdout, one line per render. Commands arrive one per line on
//! stdin. Everything runs on a single-threaded runtime: the loop sleeps until
//! the session's next queued task or the next input line, whichever is first.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use starfocus_core::{Action, Config, RenderFrame, Session, Starfield};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{sleep_until, Duration, Instant};
use tracing::{info, warn};

use crate::audio_log::LogSink;

const PROGRESS_WIDTH: usize = 20;
const SKY_WIDTH: usize = 48;
const SKY_HEIGHT: usize = 6;

#[derive(Args)]
pub struct RunArgs {
    /// Focus length in minutes. Overrides config if provided.
    #[arg(long)]
    focus: Option<u32>,
    /// Break length in minutes. Overrides config if provided.
    #[arg(long = "break")]
    break_minutes: Option<u32>,
    /// Start with UI sound effects on
    #[arg(long)]
    sound: bool,
    /// Start with ambient music on
    #[arg(long)]
    music: bool,
    /// Seed for the ambient and starfield randomness
    #[arg(long)]
    seed: Option<u64>,
    /// Number of stars in the banner. Overrides config if provided.
    #[arg(long)]
    stars: Option<usize>,
    /// Print frames as JSON lines
    #[arg(long)]
    json: bool,
    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,
}

/// A line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Action(Action),
    ToggleMusic,
    ToggleSoundEffects,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    if line.starts_with(' ') && line.trim().is_empty() {
        return Some(Command::Action(Action::ToggleRunning));
    }
    match line.trim() {
        "s" | "start" | "pause" => Some(Command::Action(Action::ToggleRunning)),
        "r" | "reset" => Some(Command::Action(Action::Reset)),
        "m" | "mode" => Some(Command::Action(Action::SwitchMode)),
        "a" | "audio" => Some(Command::Action(Action::ToggleAudio)),
        "music" => Some(Command::ToggleMusic),
        "sfx" => Some(Command::ToggleSoundEffects),
        "q" | "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn load_config(args: &RunArgs) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(focus) = args.focus {
        config.timer.focus_minutes = focus;
    }
    if let Some(brk) = args.break_minutes {
        config.timer.break_minutes = brk;
    }
    if let Some(stars) = args.stars {
        config.effects.stars = stars;
    }
    config.audio.sound_effects |= args.sound;
    config.audio.music |= args.music;
    config.validate()?;
    Ok(config)
}

fn progress_bar(frame: &RenderFrame) -> String {
    let left = if frame.circumference > 0.0 {
        1.0 - frame.progress_offset / frame.circumference
    } else {
        0.0
    };
    let filled = ((left * PROGRESS_WIDTH as f64).round() as usize).min(PROGRESS_WIDTH);
    format!("{}{}", "#".repeat(filled), "-".repeat(PROGRESS_WIDTH - filled))
}

fn format_frame(frame: &RenderFrame) -> String {
    let status = if frame.running { "running" } else { "paused" };
    format!(
        "{:<10} {}  [{}] {}",
        frame.mode_label,
        frame.clock,
        progress_bar(frame),
        status
    )
}

fn frame_printer(json: bool) -> impl FnMut(&RenderFrame) {
    move |frame: &RenderFrame| {
        let line = if json {
            match serde_json::to_string(frame) {
                Ok(line) => line,
                Err(e) => {
                    warn!(error = %e, "frame serialization failed");
                    return;
                }
            }
        } else {
            format_frame(frame)
        };
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args)?;
    let mut rng = match args.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_entropy(),
    };

    if !args.json && config.effects.stars > 0 {
        let sky = Starfield::generate(config.effects.stars, &mut rng);
        for row in sky.render_ascii(SKY_WIDTH, SKY_HEIGHT) {
            println!("{row}");
        }
    }

    info!(
        focus = config.timer.focus_minutes,
        brk = config.timer.break_minutes,
        music = config.audio.music,
        sound = config.audio.sound_effects,
        "starting session"
    );

    let mut session = Session::new(
        &config,
        Box::new(frame_printer(args.json)),
        Box::new(LogSink::default()),
        rng,
    )?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(drive(&mut session))?;
    info!("session ended");
    Ok(())
}

async fn drive<R: Rng>(session: &mut Session<R>) -> Result<(), Box<dyn std::error::Error>> {
    let started = Instant::now();
    let elapsed_ms = || started.elapsed().as_millis() as u64;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let deadline = session
            .next_due_ms()
            .map(|ms| started + Duration::from_millis(ms));

        tokio::select! {
            _ = sleep_until_opt(deadline) => {
                session.advance_to(elapsed_ms());
            }
            line = lines.next_line() => {
                session.advance_to(elapsed_ms());
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                        warn!(error = %e, "skipping unreadable input line");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                match parse_command(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Action(action)) => {
                        session.handle(action);
                    }
                    Some(Command::ToggleMusic) => {
                        let on = session.toggle_music();
                        info!(on, "music toggled");
                    }
                    Some(Command::ToggleSoundEffects) => {
                        let on = session.toggle_sound_effects();
                        info!(on, "sound effects toggled");
                    }
                    None if line.trim().is_empty() => {}
                    None => warn!(input = %line.trim(), "unknown command"),
                }
            }
        }
    }
    Ok(())
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
