use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use engine::{Goal, Msg, Receiver, Runtime, ScenarioStatus};

pub const GAME_NAME: &str = "delve";

/// Built-in demo level for unattended runs: four chambers, a door, traps, a
/// stationary mold, some monsters and a stairwell hidden behind a secret
/// door at the end of a dead-end corridor.
const DEMO_MAP: &str = "\
################################
#@......#............m..####...#
#.......#.......#...$...####...#
#.t.....+...o...#..........s.>.#
#.......#..x....#..^....####...#
#.......#.......#.....w.####...#
################################";

#[derive(Parser, Debug)]
struct Args {
    /// Path to an ascii map file, the built-in demo level by default.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Give up after this many scheduler clock ticks.
    #[arg(long, default_value_t = 20_000)]
    ticks: u64,

    /// Print debug level log messages.
    #[arg(long)]
    verbose: bool,
}

/// Initializes the global logger.
///
/// When `verbose` is `true`, all debug messages are printed. Otherwise only
/// info level and above are shown. `RUST_LOG` overrides either.
fn init_logger(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    let text = match &args.map {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read map {}", path.display()))?,
        None => DEMO_MAP.to_string(),
    };

    let messages = Receiver::default();
    let mut game = Runtime::from_map(&text)?;
    let player = game
        .player()
        .context("map has no player spawn, add an @ somewhere")?;

    // Hand the helm to the automaton and let it play.
    player.set_goal(&mut game, Goal::Automaton);
    log::info!("{GAME_NAME}: automaton running");

    while game.now() < args.ticks {
        if game.scenario_status() != ScenarioStatus::Ongoing {
            break;
        }

        game.tick();

        for msg in messages.try_iter() {
            match msg {
                Msg::Message(text) => log::info!("{text}"),
                Msg::Death(loc) => log::debug!("death at {loc}"),
                Msg::AutomatonStopped => {
                    log::info!("autonomous control handed back")
                }
            }
        }

        if game.awaiting_input() {
            // Nobody home to take the keys back in a headless run.
            log::info!("automaton out of goals, ending the run");
            break;
        }
    }

    match game.scenario_status() {
        ScenarioStatus::Descended => log::info!(
            "descended after {} ticks with {} loot",
            game.now(),
            player.loot(&game)
        ),
        ScenarioStatus::Lost => log::info!("died after {} ticks", game.now()),
        ScenarioStatus::Ongoing => log::info!(
            "still going at {} ticks, hp {}",
            game.now(),
            player.hp(&game)
        ),
    }

    Ok(())
}
