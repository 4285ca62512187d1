//! Terminal host shell for playkit.
//!
//! Run with: `cargo run -p playkit-demo -- [options]`
//!
//! Reads commands from stdin (`help` lists them) and redraws the progress
//! line every time the session's reporter ticks.

mod command;

use anyhow::{Context, Result};
use clap::Parser;
use command::{Command, HELP, Selector};
use owo_colors::OwoColorize;
use playkit::audio::RodioBackend;
use playkit::video::Mp4Backend;
use playkit::{
    Catalogue, MediaBackend, MediaKind, MemoryBackend, PlaybackSessionController, RoutedBackend,
    SessionError, SessionSnapshot, SessionState, format_progress,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};

const BAR_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "playkit-demo")]
#[command(about = "Pick a bundled track or clip and control its playback", long_about = None)]
struct Cli {
    /// Directory the catalogue's media locators are relative to
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// JSON catalogue to use instead of the bundled one
    #[arg(long)]
    catalogue: Option<PathBuf>,

    /// Milliseconds between progress updates
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Play silently with an in-memory backend, every entry this many seconds long
    #[arg(long, value_name = "SECS")]
    memory: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let catalogue = match &cli.catalogue {
        Some(path) => Catalogue::from_json_file(path)
            .with_context(|| format!("Failed to load catalogue {}", path.display()))?,
        None => Catalogue::bundled(),
    };
    let interval = Duration::from_millis(cli.interval_ms);
    log::info!(
        "{} catalogue entries, progress every {interval:?}",
        catalogue.len()
    );

    if let Some(secs) = cli.memory {
        let backend = MemoryBackend::for_catalogue(&catalogue, Duration::from_secs(secs));
        let session = PlaybackSessionController::builder(backend)
            .catalogue(catalogue)
            .progress_interval(interval)
            .build();

        // the in-memory backend only moves when told to; follow the wall clock
        let mut last = Instant::now();
        run(session, move |session| {
            let now = Instant::now();
            session.backend().time().advance(now - last);
            last = now;
        })
        .await
    } else {
        let audio = RodioBackend::new()
            .assets_root(&cli.assets)
            .build()
            .context("Failed to open audio output")?;
        let video = Mp4Backend::new(&cli.assets);
        let session = PlaybackSessionController::builder(RoutedBackend::new(audio, video))
            .catalogue(catalogue)
            .progress_interval(interval)
            .build();
        run(session, |_| {}).await
    }
}

/// Host event loop: stdin commands and reporter ticks, one owner for the session.
async fn run<B, F>(mut session: PlaybackSessionController<B>, mut sync: F) -> Result<()>
where
    B: MediaBackend,
    F: FnMut(&PlaybackSessionController<B>),
{
    println!("{}", "=== playkit ===".bold());
    print_catalogue(session.catalogue());
    println!("\n{HELP}\n");

    let ticks = session.progress_ticks();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                sync(&session);
                log::debug!("command: {line:?}");
                match Command::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => apply(&mut session, command),
                    Err(err) => println!("{}", err.yellow()),
                }
            }
            tick = ticks.recv() => {
                let Ok(tick) = tick else {
                    break;
                };
                sync(&session);
                if let Some(snapshot) = session.handle_tick(tick) {
                    render(&snapshot);
                    if snapshot.state == SessionState::Paused && !snapshot.is_playing {
                        println!("{}", "Finished".dimmed());
                    }
                }
            }
        }
    }

    // dropping the session stops the reporter and releases the handle
    drop(session);
    println!("\n=== Bye ===");
    Ok(())
}

fn apply<B: MediaBackend>(session: &mut PlaybackSessionController<B>, command: Command) {
    let result = match command {
        Command::List => {
            print_catalogue(session.catalogue());
            return;
        }
        Command::Help => {
            println!("{HELP}");
            return;
        }
        Command::Status | Command::Quit => {
            render(&session.tick());
            return;
        }
        Command::Select(selector) => {
            select(session, &selector);
            return;
        }
        Command::Play => session.play().map(|()| {
            let title = session.snapshot().title.unwrap_or_default();
            format!("Now Playing: {title}")
        }),
        Command::Pause => {
            let was_playing = session.snapshot().is_playing;
            let message = if was_playing { "Paused" } else { "Not playing" };
            session.pause().map(|()| message.to_owned())
        }
        Command::Stop => session.stop().map(|()| "Stopped".to_owned()),
        Command::Seek(secs) => session.seek(secs).map(|()| String::new()),
    };

    match result {
        Ok(message) => {
            if !message.is_empty() {
                println!("{}", message.green());
            }
            render(&session.snapshot());
        }
        Err(SessionError::NothingSelected) => println!("{}", "Nothing selected!".yellow()),
        Err(err) => println!("{} {err}", "Error!".red().bold()),
    }
}

fn select<B: MediaBackend>(session: &mut PlaybackSessionController<B>, selector: &Selector) {
    let name = match selector {
        Selector::Index(index) => {
            let entry = index
                .checked_sub(1)
                .and_then(|i| session.catalogue().get_index(i));
            match entry {
                Some(entry) => entry.display_name().to_owned(),
                None => {
                    println!("{}", format!("No entry number {index}").yellow());
                    return;
                }
            }
        }
        Selector::Name(name) => name.clone(),
    };

    match session.select_by_name(&name) {
        Ok(snapshot) => {
            if let Some(artwork) = &snapshot.artwork {
                println!("Artwork: {}", artwork.as_str().dimmed());
            }
            render(&snapshot);
        }
        Err(err) => println!("{} {err}", "Error!".red().bold()),
    }
}

fn print_catalogue(catalogue: &Catalogue) {
    for (heading, kind) in [("Music", MediaKind::Audio), ("Video", MediaKind::Video)] {
        if catalogue.of_kind(kind).next().is_none() {
            continue;
        }
        println!("{}", heading.bold());
        for (index, entry) in catalogue.iter().enumerate() {
            if entry.kind() == kind {
                println!("  {:>2}. {}", index + 1, entry.display_name());
            }
        }
    }
}

fn render(snapshot: &SessionSnapshot) {
    let Some(title) = &snapshot.title else {
        println!("{}", "Nothing selected".dimmed());
        return;
    };

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = (snapshot.progress() * BAR_WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    let marker = match snapshot.state {
        SessionState::Playing => "▶",
        SessionState::Paused => "⏸",
        SessionState::Stopped => "⏹",
        SessionState::Selected | SessionState::Idle => " ",
    };

    println!(
        "{marker} [{}] {}  {}",
        bar.cyan(),
        format_progress(snapshot),
        title.bold()
    );
}
