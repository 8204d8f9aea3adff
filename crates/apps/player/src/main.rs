use std::path::PathBuf;
use std::rc::Rc;

use clap::Parser;
use runtime::Millis;
use story::{Story, StoryLoadError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tour::{NavigationConfig, NavigationController, NavigationInput, TourError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod console;

use commands::Command;
use console::Console;

/// Plays a guided globe tour in the terminal.
#[derive(Debug, Parser)]
#[command(name = "tour-player", version)]
struct Args {
    /// Story JSON with `properties` and `chapters`.
    #[arg(long, env = "TOUR_STORY", default_value = "crates/story/assets/seattle.story.json")]
    story: PathBuf,

    /// Initial URL or query, e.g. `?chapterId=3`, to open a deep link.
    #[arg(long, default_value = "")]
    url: String,

    /// Milliseconds between autoplay steps.
    #[arg(long, env = "TOUR_AUTOPLAY_MS", default_value_t = 3000)]
    autoplay_ms: u64,

    /// Start autoplay right after opening the story.
    #[arg(long)]
    autoplay: bool,
}

#[derive(Debug, thiserror::Error)]
enum PlayerError {
    #[error(transparent)]
    Story(#[from] StoryLoadError),
    #[error(transparent)]
    Tour(#[from] TourError),
    #[error("stdin: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), PlayerError> {
    let story = Rc::new(Story::load(&args.story)?);
    info!(
        path = %args.story.display(),
        chapters = story.chapter_count(),
        "story loaded"
    );

    let config = NavigationConfig {
        autoplay_period: Millis(args.autoplay_ms),
        ..NavigationConfig::default()
    };
    let console = Console::with_query(&args.url);
    let mut nav = NavigationController::new(story, console.ports(), config);
    nav.init()?;

    if args.autoplay {
        if nav.current_index().is_none() {
            nav.handle_input(NavigationInput::Start)?;
        }
        nav.handle_input(NavigationInput::ToggleAutoplay)?;
    }
    println!("{}", console.render(&nav));

    let start = Instant::now();
    let clock = || Millis::from(start.elapsed());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let deadline = nav.next_deadline();
        let wake = start + deadline.unwrap_or(Millis::ZERO).as_duration();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                nav.advance_to(clock())?;
                let cmd = match commands::parse(&line) {
                    Ok(Some(cmd)) => cmd,
                    Ok(None) => continue,
                    Err(msg) => {
                        warn!("{msg}");
                        continue;
                    }
                };
                match cmd {
                    Command::Input(input) => nav.handle_input(input)?,
                    Command::Url(query) => {
                        console.replace_query(&query);
                        nav.handle_input(NavigationInput::UrlChanged)?;
                    }
                    Command::Show => {}
                    Command::Help => {
                        println!("{}", commands::HELP);
                        continue;
                    }
                    Command::Quit => break,
                }
                println!("{}", console.render(&nav));
            }
            _ = tokio::time::sleep_until(wake), if deadline.is_some() => {
                if nav.advance_to(clock())? > 0 {
                    println!("{}", console.render(&nav));
                }
            }
        }
    }
    Ok(())
}
