//! Game, rule and search configuration.
//!
//! Every struct deserializes with defaults for missing fields, so the UI
//! can send `{}` or only the knobs it cares about.

use serde::{Deserialize, Serialize};

use crate::rules::REPETITION_THRESHOLD;

/// Built-in CPU strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random legal move.
    Easy,
    /// Prefers captures, otherwise random.
    #[default]
    Medium,
    /// Fixed-depth alpha-beta search.
    Hard,
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// What a side with no legal move and no check gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalemateRule {
    #[default]
    Draw,
    LossForStalemated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub stalemate: StalemateRule,
    pub repetition_threshold: usize,
}

impl Default for RuleConfig {
    fn default() -> Self {
        RuleConfig {
            stalemate: StalemateRule::Draw,
            repetition_threshold: REPETITION_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched by the hard policy.
    pub depth: u8,
    /// Entry count at which the transposition table is wiped.
    pub tt_capacity: usize,
    /// Probability that the medium policy plays a capture when one exists.
    pub capture_bias: f64,
    /// Soft limit checked between root candidates.
    pub time_limit_ms: Option<u64>,
    /// Fixed RNG seed; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 4,
            tt_capacity: 100_000,
            capture_bias: 0.7,
            time_limit_ms: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub rules: RuleConfig,
    pub search: SearchConfig,
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(GameConfig::default());
        }
        serde_json::from_str(json)
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.search.depth, 4);
        assert_eq!(config.search.tt_capacity, 100_000);
        assert_eq!(config.rules.stalemate, StalemateRule::Draw);
        assert_eq!(config.rules.repetition_threshold, 4);
    }

    #[test]
    fn test_partial_json() {
        let config = GameConfig::from_json(r#"{"difficulty":"hard","search":{"depth":2}}"#).unwrap();
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.search.depth, 2);
        assert_eq!(config.search.tt_capacity, 100_000);
        assert_eq!(GameConfig::from_json("").unwrap(), GameConfig::default());
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("insane".parse::<Difficulty>().is_err());
    }
}
