use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use super::{EngineError, ExternalEngine, StrengthLevel};
use crate::config::{Difficulty, GameConfig};
use crate::game::Game;
use crate::movegen::all_legal_moves;
use crate::notation::parse_usi_move;
use crate::search::BuiltinEngine;
use crate::types::Move;

/// Which engine produced the last CPU move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveSource {
    External,
    Builtin,
}

/// Picks CPU moves, preferring an external engine when one is attached and
/// healthy. Any external failure disables it until it is re-initialised and
/// the built-in policy answers instead.
pub struct EngineManager {
    builtin: BuiltinEngine,
    external: Option<Box<dyn ExternalEngine>>,
    external_failed: bool,
    strength: StrengthLevel,
    last_source: Option<MoveSource>,
    fallback_reason: Option<String>,
}

impl EngineManager {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_builtin(BuiltinEngine::new(config))
    }

    pub fn with_builtin(builtin: BuiltinEngine) -> Self {
        EngineManager {
            builtin,
            external: None,
            external_failed: false,
            strength: StrengthLevel::default(),
            last_source: None,
            fallback_reason: None,
        }
    }

    pub fn builtin(&self) -> &BuiltinEngine {
        &self.builtin
    }

    pub fn builtin_mut(&mut self) -> &mut BuiltinEngine {
        &mut self.builtin
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.builtin.set_difficulty(difficulty);
    }

    pub fn strength(&self) -> StrengthLevel {
        self.strength
    }

    pub fn set_strength(&mut self, strength: StrengthLevel) {
        self.strength = strength;
    }

    /// Attaches an external engine and initialises it. On failure the
    /// engine stays attached but unused.
    pub fn attach_external(&mut self, engine: Box<dyn ExternalEngine>) -> Result<(), EngineError> {
        self.external = Some(engine);
        self.initialize_external()
    }

    pub fn detach_external(&mut self) -> Option<Box<dyn ExternalEngine>> {
        self.external_failed = false;
        self.external.take()
    }

    pub fn initialize_external(&mut self) -> Result<(), EngineError> {
        let Some(engine) = self.external.as_mut() else {
            return Err(EngineError::NotReady);
        };
        match engine.initialize() {
            Ok(()) => {
                log::info!("external engine {} ready", engine.name());
                self.external_failed = false;
                self.fallback_reason = None;
                Ok(())
            }
            Err(err) => {
                log::warn!("external engine {} failed to start: {err}", engine.name());
                self.disable_external(&err);
                Err(err)
            }
        }
    }

    /// Whether the next request will go to the external engine.
    pub fn external_active(&self) -> bool {
        !self.external_failed && self.external.as_ref().is_some_and(|e| e.is_ready())
    }

    pub fn external_name(&self) -> Option<&str> {
        self.external.as_deref().map(|e| e.name())
    }

    pub fn last_source(&self) -> Option<MoveSource> {
        self.last_source
    }

    /// Why the external engine was last abandoned.
    pub fn fallback_reason(&self) -> Option<&str> {
        self.fallback_reason.as_deref()
    }

    /// Shared flag that cuts the built-in search short. It can be raised
    /// from another thread while [`EngineManager::choose_move`] runs; raised
    /// beforehand, it applies to the next built-in decision.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.builtin.stop_handle()
    }

    /// Interrupts whichever engine is thinking.
    pub fn stop(&mut self) {
        self.builtin.stop_handle().store(true, Ordering::Relaxed);
        if let Some(engine) = self.external.as_mut() {
            engine.stop();
        }
    }

    /// Move for the side to move, `None` only when the game is over or the
    /// side has no legal move.
    pub fn choose_move(&mut self, game: &Game) -> Option<Move> {
        if game.is_over() {
            return None;
        }
        if self.external_active() {
            match self.ask_external(game) {
                Ok(mv) => {
                    self.last_source = Some(MoveSource::External);
                    return Some(mv);
                }
                Err(err) => {
                    log::warn!("external engine failed, falling back to built-in: {err}");
                    self.disable_external(&err);
                }
            }
        }

        let mut board = game.board().clone();
        let mv = self.builtin.choose_move(&mut board, game.side_to_move());
        self.last_source = mv.map(|_| MoveSource::Builtin);
        mv
    }

    fn ask_external(&mut self, game: &Game) -> Result<Move, EngineError> {
        let options = self.strength.options();
        let engine = self.external.as_mut().ok_or(EngineError::NotReady)?;
        let reply = engine.best_move(&game.sfen(), &options)?;
        if matches!(reply.mv.as_str(), "" | "resign" | "win") {
            return Err(EngineError::NoMove);
        }
        let mv = parse_usi_move(&reply.mv)?;
        let mut board = game.board().clone();
        if all_legal_moves(&mut board, game.side_to_move()).contains(&mv) {
            Ok(mv)
        } else {
            Err(EngineError::InvalidMove(reply.mv))
        }
    }

    fn disable_external(&mut self, err: &EngineError) {
        self.external_failed = true;
        self.fallback_reason = Some(err.to_string());
    }
}
