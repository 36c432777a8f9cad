//! Parsing of engine `info` and `bestmove` lines.

use serde::{Deserialize, Serialize};

/// Score reported by an engine, from the engine's side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum EngineScore {
    Cp(i32),
    /// Moves to mate; negative when being mated.
    Mate(i32),
}

/// Latest search progress seen from an engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoSnapshot {
    pub depth: Option<u32>,
    pub nodes: Option<u64>,
    pub score: Option<EngineScore>,
    pub pv: Vec<String>,
}

impl InfoSnapshot {
    /// Folds one `info ...` line in. Non-primary multipv lines are ignored.
    pub fn update_from_line(&mut self, line: &str) {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.first().copied() != Some("info") {
            return;
        }
        if let Some(pos) = tokens.iter().position(|&t| t == "multipv")
            && tokens.get(pos + 1).and_then(|v| v.parse::<u32>().ok()).unwrap_or(1) != 1
        {
            return;
        }

        let mut i = 1;
        while i < tokens.len() {
            match tokens[i] {
                "depth" => {
                    self.depth = tokens.get(i + 1).and_then(|v| v.parse().ok());
                    i += 1;
                }
                "nodes" => {
                    self.nodes = tokens.get(i + 1).and_then(|v| v.parse().ok());
                    i += 1;
                }
                "score" => {
                    let kind = tokens.get(i + 1).copied();
                    let value = tokens.get(i + 2).copied();
                    self.score = match (kind, value) {
                        (Some("cp"), Some(v)) => v.parse().ok().map(EngineScore::Cp),
                        (Some("mate"), Some(v)) => parse_mate(v).map(EngineScore::Mate),
                        _ => self.score,
                    };
                    i += 2;
                }
                "pv" => {
                    self.pv = tokens[i + 1..].iter().map(|s| s.to_string()).collect();
                    break;
                }
                // Free text runs to the end of the line.
                "string" => break,
                _ => {}
            }
            i += 1;
        }
    }
}

/// `mate +` / `mate -` carry only a sign.
fn parse_mate(v: &str) -> Option<i32> {
    match v {
        "+" => Some(1),
        "-" => Some(-1),
        _ => v.parse().ok(),
    }
}

/// Final answer of a `go` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BestMove {
    Move(String),
    Resign,
    Win,
}

/// Parses `bestmove <move> [ponder <move>]`.
pub fn parse_bestmove_line(line: &str) -> Option<BestMove> {
    let rest = line.trim().strip_prefix("bestmove")?;
    let mv = rest.split_whitespace().next()?;
    Some(match mv {
        "resign" => BestMove::Resign,
        "win" => BestMove::Win,
        other => BestMove::Move(other.to_string()),
    })
}
