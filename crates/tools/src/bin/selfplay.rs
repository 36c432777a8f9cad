use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use shogi_cpu_core::{Difficulty, Game, StrengthLevel};
use shogi_cpu_tools::selfplay::{SelfplayConfig, build_manager, run_game};
use shogi_cpu_tools::usi_engine::UsiEngineConfig;

/// CPU self-play harness.
///
/// # Examples
///
/// - Ten hard-vs-medium games:
///   `cargo run --release -p shogi-cpu-tools --bin selfplay -- --games 10 --sente hard --gote medium`
///
/// - Built-in hard against a USI engine:
///   `cargo run --release -p shogi-cpu-tools --bin selfplay -- --sente hard --gote-engine /path/to/engine --strength beginner`
///
/// - Everything from a TOML file (flags given on the command line win):
///   `cargo run --release -p shogi-cpu-tools --bin selfplay -- --config selfplay.toml`
#[derive(Parser, Debug)]
#[command(author, version, about = "shogi CPU selfplay harness")]
struct Cli {
    /// TOML file with a full selfplay configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of games to run
    #[arg(long)]
    games: Option<u32>,

    /// Maximum plies per game before giving up
    #[arg(long)]
    max_plies: Option<u32>,

    /// Built-in difficulty for sente (easy, medium, hard)
    #[arg(long)]
    sente: Option<Difficulty>,

    /// Built-in difficulty for gote (easy, medium, hard)
    #[arg(long)]
    gote: Option<Difficulty>,

    /// Search depth for hard built-in players
    #[arg(long)]
    depth: Option<u8>,

    /// USI engine binary playing sente
    #[arg(long)]
    sente_engine: Option<PathBuf>,

    /// USI engine binary playing gote
    #[arg(long)]
    gote_engine: Option<PathBuf>,

    /// Strength preset for USI engines
    #[arg(long)]
    strength: Option<StrengthLevel>,

    /// Base RNG seed; game i uses seed + 2i and seed + 2i + 1
    #[arg(long)]
    seed: Option<u64>,

    /// Print one JSON object per game instead of text
    #[arg(long)]
    json: bool,

    /// Print every move as it is played
    #[arg(long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<SelfplayConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SelfplayConfig::from_toml(&text).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SelfplayConfig::default(),
    };
    if let Some(games) = cli.games {
        config.games = games;
    }
    if let Some(max_plies) = cli.max_plies {
        config.max_plies = max_plies;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    for (settings, difficulty, engine) in [
        (&mut config.sente, cli.sente, &cli.sente_engine),
        (&mut config.gote, cli.gote, &cli.gote_engine),
    ] {
        if let Some(difficulty) = difficulty {
            settings.difficulty = difficulty;
        }
        if cli.depth.is_some() {
            settings.depth = cli.depth;
        }
        if let Some(strength) = cli.strength {
            settings.strength = strength;
        }
        if let Some(path) = engine {
            settings.engine = Some(UsiEngineConfig { path: path.clone(), ..UsiEngineConfig::default() });
        }
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let mut sente_wins = 0u32;
    let mut gote_wins = 0u32;
    let mut draws = 0u32;
    let mut unfinished = 0u32;

    for game_no in 0..config.games {
        let seeds = config.seed.map(|s| {
            let base = s.wrapping_add(2 * u64::from(game_no));
            (base, base.wrapping_add(1))
        });
        let mut sente = build_manager(&config.sente, config.rules, seeds.map(|s| s.0));
        let mut gote = build_manager(&config.gote, config.rules, seeds.map(|s| s.1));
        let mut game = Game::new(config.rules);

        let verbose = cli.verbose;
        let result = run_game(&mut game, &mut sente, &mut gote, config.max_plies, &mut |event| {
            if verbose {
                println!("{:>4} {:<6} {:<8} {} ms", event.ply, event.side, event.usi, event.elapsed_ms);
            }
        })?;

        match result.outcome.and_then(|o| o.winner()) {
            Some(shogi_cpu_core::Side::Player) => sente_wins += 1,
            Some(shogi_cpu_core::Side::Cpu) => gote_wins += 1,
            None if result.outcome.is_some() => draws += 1,
            None => unfinished += 1,
        }

        if cli.json {
            println!("{}", serde_json::to_string(&result)?);
        } else {
            println!("game {}: {} after {} plies", game_no + 1, result.reason, result.plies);
            println!("  moves: {}", result.moves.join(" "));
        }
    }

    log::info!(
        "sente {sente_wins} / gote {gote_wins} / draw {draws} / unfinished {unfinished} over {} games",
        config.games
    );
    if !cli.json {
        println!("sente {sente_wins}  gote {gote_wins}  draw {draws}  unfinished {unfinished}");
    }
    Ok(())
}
