use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::SearchOptions;

/// Grace period on top of the time limit before a search is abandoned.
pub const SEARCH_TIMEOUT_MARGIN_MS: u64 = 5000;

/// Strength presets offered for external engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl StrengthLevel {
    pub const ALL: [StrengthLevel; 4] = [
        StrengthLevel::Beginner,
        StrengthLevel::Intermediate,
        StrengthLevel::Advanced,
        StrengthLevel::Expert,
    ];

    pub fn options(self) -> SearchOptions {
        let (time_limit_ms, depth) = match self {
            StrengthLevel::Beginner => (100, 1),
            StrengthLevel::Intermediate => (1000, 4),
            StrengthLevel::Advanced => (3000, 6),
            StrengthLevel::Expert => (10_000, 10),
        };
        SearchOptions { time_limit_ms, depth }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrengthLevel::Beginner => "beginner",
            StrengthLevel::Intermediate => "intermediate",
            StrengthLevel::Advanced => "advanced",
            StrengthLevel::Expert => "expert",
        }
    }
}

impl SearchOptions {
    /// Hard deadline for a search with these options.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms.saturating_add(SEARCH_TIMEOUT_MARGIN_MS))
    }
}

impl FromStr for StrengthLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrengthLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown strength: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(StrengthLevel::Beginner.options(), SearchOptions { time_limit_ms: 100, depth: 1 });
        assert_eq!(StrengthLevel::Expert.options().depth, 10);
        assert_eq!(StrengthLevel::default(), StrengthLevel::Intermediate);
    }

    #[test]
    fn test_timeout_adds_margin() {
        let options = StrengthLevel::Advanced.options();
        assert_eq!(options.timeout(), Duration::from_millis(8000));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Expert".parse::<StrengthLevel>(), Ok(StrengthLevel::Expert));
        assert!("grandmaster".parse::<StrengthLevel>().is_err());
    }
}
