//! CPU against CPU games, optionally with USI engines on either side.

use std::time::Instant;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use shogi_cpu_core::engine::MoveSource;
use shogi_cpu_core::{
    Difficulty, EngineManager, Game, GameConfig, GameOutcome, RuleConfig, SearchConfig, Side,
    StrengthLevel,
};

use crate::usi_engine::{UsiEngineConfig, UsiProcessEngine};

/// Settings for one side of a self-play game.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SideSettings {
    pub difficulty: Difficulty,
    /// Overrides the built-in search depth.
    pub depth: Option<u8>,
    pub strength: StrengthLevel,
    pub engine: Option<UsiEngineConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelfplayConfig {
    pub games: u32,
    pub max_plies: u32,
    pub seed: Option<u64>,
    pub rules: RuleConfig,
    pub sente: SideSettings,
    pub gote: SideSettings,
}

impl Default for SelfplayConfig {
    fn default() -> Self {
        SelfplayConfig {
            games: 1,
            max_plies: 400,
            seed: None,
            rules: RuleConfig::default(),
            sente: SideSettings::default(),
            gote: SideSettings::default(),
        }
    }
}

impl SelfplayConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Reported after every ply.
#[derive(Debug, Clone, Serialize)]
pub struct MoveEvent {
    pub ply: u32,
    pub side: Side,
    pub usi: String,
    pub source: Option<MoveSource>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub outcome: Option<GameOutcome>,
    pub reason: String,
    pub plies: u32,
    pub moves: Vec<String>,
    pub final_sfen: String,
}

/// Builds the move chooser for one side. A USI engine that fails to start
/// leaves the built-in policy in charge.
pub fn build_manager(settings: &SideSettings, rules: RuleConfig, seed: Option<u64>) -> EngineManager {
    let mut search = SearchConfig { seed, ..SearchConfig::default() };
    if let Some(depth) = settings.depth {
        search.depth = depth;
    }
    let config = GameConfig { difficulty: settings.difficulty, rules, search };
    let mut manager = EngineManager::new(&config);
    manager.set_strength(settings.strength);
    if let Some(engine) = &settings.engine
        && let Err(err) = manager.attach_external(Box::new(UsiProcessEngine::new(engine.clone())))
    {
        log::warn!("{}: {err}; using the built-in engine", engine.path.display());
    }
    manager
}

/// Plays one game to the end or to `max_plies`, which counts as unfinished.
pub fn run_game(
    game: &mut Game,
    sente: &mut EngineManager,
    gote: &mut EngineManager,
    max_plies: u32,
    on_move: &mut dyn FnMut(&MoveEvent),
) -> Result<GameResult> {
    let mut reason = "max_plies".to_string();
    for _ in 0..max_plies {
        if game.is_over() {
            break;
        }
        let side = game.side_to_move();
        let manager = match side {
            Side::Player => &mut *sente,
            Side::Cpu => &mut *gote,
        };
        let start = Instant::now();
        let Some(mv) = manager.choose_move(game) else {
            bail!("{side} has no move in an unfinished game: {}", game.sfen());
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;
        let report = match game.play(mv) {
            Ok(report) => report,
            Err(rejected) => bail!("{side} chose a rejected move ({rejected:?}): {}", game.sfen()),
        };
        on_move(&MoveEvent {
            ply: game.moves().len() as u32,
            side,
            usi: report.record.usi,
            source: manager.last_source(),
            elapsed_ms,
        });
    }
    if let Some(outcome) = game.outcome() {
        reason = outcome.to_string();
    }
    Ok(GameResult {
        outcome: game.outcome(),
        reason,
        plies: game.moves().len() as u32,
        moves: game.moves().iter().map(|m| m.usi.clone()).collect(),
        final_sfen: game.sfen(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_config() {
        let config = SelfplayConfig::from_toml(
            r#"
games = 3
max_plies = 50
seed = 42

[rules]
stalemate = "loss_for_stalemated"

[sente]
difficulty = "hard"
depth = 2

[gote.engine]
path = "/usr/local/bin/engine"
usi_options = ["USI_Hash=64"]
"#,
        )
        .unwrap();
        assert_eq!(config.games, 3);
        assert_eq!(config.sente.difficulty, Difficulty::Hard);
        assert_eq!(config.sente.depth, Some(2));
        assert_eq!(config.gote.difficulty, Difficulty::Medium);
        assert_eq!(config.gote.engine.unwrap().usi_options, vec!["USI_Hash=64"]);
        assert_eq!(config.rules.repetition_threshold, 4);
    }

    #[test]
    fn test_easy_selfplay_runs() {
        let settings = SideSettings { difficulty: Difficulty::Easy, ..SideSettings::default() };
        let mut sente = build_manager(&settings, RuleConfig::default(), Some(1));
        let mut gote = build_manager(&settings, RuleConfig::default(), Some(2));
        let mut game = Game::default();
        let mut events = Vec::new();
        let result = run_game(&mut game, &mut sente, &mut gote, 40, &mut |e| events.push(e.clone())).unwrap();

        assert_eq!(result.plies as usize, events.len());
        assert_eq!(result.moves.len(), events.len());
        assert!(events.iter().all(|e| e.source == Some(MoveSource::Builtin)));
        assert_eq!(events.first().map(|e| e.side), Some(Side::Player));
        assert_eq!(result.final_sfen, game.sfen());
    }
}
