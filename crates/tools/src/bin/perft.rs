use std::time::Instant;

use anyhow::{Result, anyhow};
use clap::Parser;
use shogi_cpu_core::notation::{STARTPOS_SFEN, parse_sfen};
use shogi_cpu_tools::perft::{perft, perft_divide};

/// Counts legal move tree leaves from a position.
///
/// `cargo run --release -p shogi-cpu-tools --bin perft -- --depth 3`
#[derive(Parser, Debug)]
#[command(author, version, about = "perft for the shogi CPU move generator")]
struct Cli {
    /// Start position as SFEN, or "startpos"
    #[arg(long, default_value = STARTPOS_SFEN)]
    sfen: String,

    /// Plies to expand
    #[arg(long, default_value_t = 3)]
    depth: u32,

    /// Print the count below every root move
    #[arg(long)]
    divide: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let pos = parse_sfen(&cli.sfen).map_err(|e| anyhow!("bad sfen {:?}: {e}", cli.sfen))?;
    let mut board = pos.board;
    let start = Instant::now();

    let nodes = if cli.divide {
        let divide = perft_divide(&mut board, pos.side_to_move, cli.depth);
        for (usi, count) in &divide {
            println!("{usi}: {count}");
        }
        divide.iter().map(|(_, n)| n).sum()
    } else {
        perft(&mut board, pos.side_to_move, cli.depth)
    };

    let elapsed = start.elapsed();
    println!("depth {} nodes {nodes} time {} ms", cli.depth, elapsed.as_millis());
    Ok(())
}
