//! Plain-Rust half of the bindings: every call takes and returns JSON text
//! so it can be exercised without a browser.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};
use shogi_cpu_core::game::MoveRecord;
use shogi_cpu_core::notation::{move_to_usi, parse_usi_move};
use shogi_cpu_core::{
    Board, Difficulty, EngineManager, EvaluationSummary, Game, GameConfig, GameOutcome, Move,
    PieceKind, Rejected, Side, Square, TurnReport,
};

pub type SessionResult<T> = Result<T, String>;

/// Everything the UI redraws from after a change.
#[derive(Debug, Serialize)]
pub struct GameView<'a> {
    pub sfen: String,
    pub board: &'a Board,
    pub side_to_move: Side,
    pub move_number: u32,
    pub in_check: bool,
    pub outcome: Option<GameOutcome>,
    pub last_move: Option<&'a MoveRecord>,
    pub moves: Vec<&'a str>,
    pub evaluation: EvaluationSummary,
    pub can_take_back: bool,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlayResult {
    Played { report: TurnReport },
    Rejected { reason: Rejected },
}

#[derive(Debug, Deserialize)]
struct SquareQuery {
    row: u8,
    col: u8,
}

pub struct Session {
    config: GameConfig,
    game: Game,
    cpu: EngineManager,
}

fn config_from(json: &str) -> SessionResult<GameConfig> {
    GameConfig::from_json(json).map_err(|e| format!("invalid config: {e}"))
}

fn to_json<T: Serialize>(value: &T) -> SessionResult<String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

impl Session {
    pub fn new(config_json: &str) -> SessionResult<Self> {
        let config = config_from(config_json)?;
        let game = Game::new(config.rules);
        Ok(Self::with_game(config, game))
    }

    pub fn from_sfen(sfen: &str, config_json: &str) -> SessionResult<Self> {
        let config = config_from(config_json)?;
        let game = Game::from_sfen(sfen, config.rules).map_err(|e| e.to_string())?;
        Ok(Self::with_game(config, game))
    }

    /// Resumes a game saved with [`Session::save`].
    pub fn load(snapshot_json: &str, config_json: &str) -> SessionResult<Self> {
        let config = config_from(config_json)?;
        let game = Game::from_json(snapshot_json).map_err(|e| e.to_string())?;
        Ok(Self::with_game(config, game))
    }

    fn with_game(config: GameConfig, game: Game) -> Self {
        let cpu = EngineManager::new(&config);
        log::info!("new session, difficulty {:?}", config.difficulty);
        Session { config, game, cpu }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn cpu_mut(&mut self) -> &mut EngineManager {
        &mut self.cpu
    }

    pub fn view(&self) -> GameView<'_> {
        GameView {
            sfen: self.game.sfen(),
            board: self.game.board(),
            side_to_move: self.game.side_to_move(),
            move_number: self.game.move_number(),
            in_check: self.game.in_check(),
            outcome: self.game.outcome(),
            last_move: self.game.last_move(),
            moves: self.game.moves().iter().map(|m| m.usi.as_str()).collect(),
            evaluation: self.game.evaluation(),
            can_take_back: self.game.can_take_back(),
        }
    }

    pub fn state_json(&self) -> SessionResult<String> {
        to_json(&self.view())
    }

    /// Legal moves of the piece on `{"row":r,"col":c}`.
    pub fn legal_moves_from(&mut self, square_json: &str) -> SessionResult<String> {
        let query: SquareQuery = serde_json::from_str(square_json).map_err(|e| e.to_string())?;
        let square = Square::checked(query.row as i8, query.col as i8)
            .ok_or_else(|| format!("square out of range: {},{}", query.row, query.col))?;
        to_json(&self.game.legal_moves_from(square).as_slice())
    }

    /// Drop targets for a piece kind such as `"pawn"`.
    pub fn legal_drops(&mut self, kind: &str) -> SessionResult<String> {
        let kind: PieceKind =
            serde_json::from_value(serde_json::Value::String(kind.to_string())).map_err(|e| e.to_string())?;
        to_json(&self.game.legal_drops(kind))
    }

    pub fn play_json(&mut self, move_json: &str) -> SessionResult<String> {
        let mv: Move = serde_json::from_str(move_json).map_err(|e| format!("invalid move: {e}"))?;
        to_json(&self.play(mv))
    }

    pub fn play_usi(&mut self, usi: &str) -> SessionResult<String> {
        let mv = parse_usi_move(usi).map_err(|e| e.to_string())?;
        to_json(&self.play(mv))
    }

    fn play(&mut self, mv: Move) -> PlayResult {
        match self.game.play(mv) {
            Ok(report) => PlayResult::Played { report },
            Err(reason) => PlayResult::Rejected { reason },
        }
    }

    /// Lets the CPU move. Rejected when it is not the CPU's turn.
    pub fn cpu_move(&mut self) -> SessionResult<String> {
        if self.game.is_over() {
            return to_json(&PlayResult::Rejected { reason: Rejected::GameOver });
        }
        if self.game.side_to_move() != Side::Cpu {
            return Err("not the CPU's turn".to_string());
        }
        match self.cpu.choose_move(&self.game) {
            Some(mv) => {
                log::debug!("cpu plays {}", move_to_usi(mv));
                to_json(&self.play(mv))
            }
            None => to_json(&PlayResult::Rejected { reason: Rejected::GameOver }),
        }
    }

    pub fn take_back(&mut self) -> bool {
        self.game.take_back()
    }

    pub fn set_difficulty(&mut self, difficulty: &str) -> SessionResult<()> {
        let difficulty: Difficulty = difficulty.parse()?;
        self.config.difficulty = difficulty;
        self.cpu.set_difficulty(difficulty);
        Ok(())
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Starts over with the same settings.
    pub fn reset(&mut self) {
        self.game = Game::new(self.config.rules);
    }

    pub fn save(&self) -> SessionResult<String> {
        self.game.to_json().map_err(|e| e.to_string())
    }

    /// Cuts the current or next CPU search short.
    pub fn stop(&mut self) {
        self.cpu.stop();
    }

    /// Stop flag for a host that runs [`Session::cpu_move`] on another thread.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.cpu.stop_handle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy() -> Session {
        Session::new(r#"{"difficulty":"easy","search":{"seed":4}}"#).unwrap()
    }

    #[test]
    fn test_empty_config_gives_defaults() {
        let session = Session::new("").unwrap();
        assert_eq!(session.difficulty(), Difficulty::Medium);
        assert!(Session::new("{not json").is_err());
    }

    #[test]
    fn test_human_then_cpu_turn() {
        let mut session = easy();
        let played = session.play_usi("7g7f").unwrap();
        assert!(played.contains(r#""status":"played""#));
        assert!(session.play_usi("2g2f").unwrap().contains(r#""reason":"illegal""#));

        let reply = session.cpu_move().unwrap();
        assert!(reply.contains(r#""status":"played""#), "{reply}");
        assert_eq!(session.game().side_to_move(), Side::Player);
        assert!(session.cpu_move().is_err());
    }

    #[test]
    fn test_move_json_from_the_ui() {
        let mut session = easy();
        let json = r#"{"type":"board","from":{"row":6,"col":2},"to":{"row":5,"col":2}}"#;
        assert!(session.play_json(json).unwrap().contains(r#""usi":"7g7f""#));
        assert!(session.play_json(r#"{"type":"warp"}"#).is_err());
    }

    #[test]
    fn test_legal_move_queries() {
        let mut session = easy();
        let moves: Vec<Move> = serde_json::from_str(&session.legal_moves_from(r#"{"row":6,"col":2}"#).unwrap()).unwrap();
        assert_eq!(moves.len(), 1);
        assert!(session.legal_moves_from(r#"{"row":9,"col":0}"#).is_err());
        assert_eq!(session.legal_drops("pawn").unwrap(), "[]");
        assert!(session.legal_drops("queen").is_err());
    }

    #[test]
    fn test_state_view_fields() {
        let session = easy();
        let state: serde_json::Value = serde_json::from_str(&session.state_json().unwrap()).unwrap();
        assert_eq!(state["side_to_move"], "player");
        assert_eq!(state["move_number"], 1);
        assert_eq!(state["evaluation"]["percentage"], 50);
        assert_eq!(state["can_take_back"], false);
    }

    #[test]
    fn test_save_load_and_take_back() {
        let mut session = easy();
        session.play_usi("7g7f").unwrap();
        session.cpu_move().unwrap();
        let saved = session.save().unwrap();

        let mut resumed = Session::load(&saved, "").unwrap();
        assert_eq!(resumed.game().sfen(), session.game().sfen());
        assert!(resumed.take_back());
        assert!(resumed.game().moves().is_empty());
    }

    #[test]
    fn test_imported_mate_reports_outcome() {
        let mut session = Session::from_sfen("k8/GG7/9/9/9/9/9/9/8K w - 1", "").unwrap();
        let state: serde_json::Value = serde_json::from_str(&session.state_json().unwrap()).unwrap();
        assert_eq!(state["outcome"]["result"], "win");
        assert_eq!(state["outcome"]["winner"], "player");
        assert!(session.cpu_move().unwrap().contains(r#""reason":"game_over""#));
    }

    #[test]
    fn test_stop_before_cpu_move_shortens_search() {
        let mut session = Session::new(r#"{"difficulty":"hard","search":{"depth":2,"seed":1}}"#).unwrap();
        session.play_usi("7g7f").unwrap();
        session.stop();
        assert!(session.cpu_move().unwrap().contains(r#""status":"played""#));
        let result = session.cpu_mut().builtin().last_result().unwrap();
        assert!(!result.completed);
        assert_eq!(result.stats.root_moves_searched, 1);
        assert!(!session.stop_handle().load(std::sync::atomic::Ordering::Relaxed));
    }

    #[test]
    fn test_set_difficulty() {
        let mut session = easy();
        session.set_difficulty("hard").unwrap();
        assert_eq!(session.difficulty(), Difficulty::Hard);
        assert!(session.set_difficulty("brutal").is_err());
    }
}
