use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, TimeDelta, Utc};
use clap::Parser;
use colored::Colorize;
use log::{info, Level, LevelFilter, Log, Metadata, Record};
use rand::{rngs::StdRng, SeedableRng};
use solitaire_scoring::{
    apply_bonus_score, apply_time_penalty, create_initial_state, create_initial_state_with,
    detect_game_win,
};

/// Deals a Klondike game, stamps its duration and prints the time score.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Seed for a reproducible deal
    #[arg(short, long)]
    seed: Option<u64>,

    /// Length of the game in seconds
    #[arg(short, long, default_value_t = 120)]
    elapsed: i64,

    /// Move every card to the foundations before checking for a win
    #[arg(short, long)]
    won: bool,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,

    /// Log more, repeat for trace output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "ERROR".red(),
            Level::Warn => "WARN".yellow(),
            Level::Info => "INFO".green(),
            Level::Debug => "DEBUG".blue(),
            Level::Trace => "TRACE".dimmed(),
        };
        eprintln!("[{level} {}] {}", record.target(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|err| anyhow!("could not install logger: {err}"))?;
    log::set_max_level(match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    Ok(())
}

/// `start` moved forward by `elapsed` seconds, or an error when that is not
/// a representable time.
fn end_time(start: DateTime<Utc>, elapsed: i64) -> Result<DateTime<Utc>> {
    TimeDelta::try_seconds(elapsed)
        .and_then(|delta| start.checked_add_signed(delta))
        .ok_or_else(|| anyhow!("game length of {elapsed}s is out of range"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let mut game = match args.seed {
        Some(seed) => create_initial_state_with(&mut StdRng::seed_from_u64(seed)),
        None => create_initial_state(),
    };
    println!("Game: {}", game);

    let start = Utc::now();
    game.start(start);
    if args.won {
        game.play_out();
    }
    game.finish(end_time(start, args.elapsed)?)
        .context("could not stamp the end of the game")?;

    detect_game_win(&mut game);
    if game.game_won {
        apply_bonus_score(&mut game).context("could not apply the time bonus")?;
    } else {
        apply_time_penalty(&mut game).context("could not apply the time penalty")?;
    }
    info!(
        "game {} after {}s",
        if game.game_won { "won" } else { "lost" },
        args.elapsed
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&game)?);
    } else {
        println!("Final: {}", game);
        println!(
            "{}: {}\t{}: {}",
            "Won".bold(),
            game.game_won,
            "Time score".bold(),
            game.time_score
        );
    }
    Ok(())
}
