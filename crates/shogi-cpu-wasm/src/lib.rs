//! Browser bindings. The UI owns one [`ShogiGame`] and exchanges JSON with
//! it; all rules live in `shogi-cpu-core`.

mod session;

pub use session::{GameView, PlayResult, Session, SessionResult};

use wasm_bindgen::prelude::*;

fn js_err(message: String) -> JsValue {
    JsValue::from_str(&message)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
}

#[wasm_bindgen]
pub struct ShogiGame {
    inner: Session,
}

#[wasm_bindgen]
impl ShogiGame {
    /// `config` is a `GameConfig` JSON object; an empty string means defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: &str) -> Result<ShogiGame, JsValue> {
        Session::new(config).map(|inner| ShogiGame { inner }).map_err(js_err)
    }

    #[wasm_bindgen(js_name = fromSfen)]
    pub fn from_sfen(sfen: &str, config: &str) -> Result<ShogiGame, JsValue> {
        Session::from_sfen(sfen, config).map(|inner| ShogiGame { inner }).map_err(js_err)
    }

    pub fn load(snapshot: &str, config: &str) -> Result<ShogiGame, JsValue> {
        Session::load(snapshot, config).map(|inner| ShogiGame { inner }).map_err(js_err)
    }

    pub fn save(&self) -> Result<String, JsValue> {
        self.inner.save().map_err(js_err)
    }

    /// Current state as a plain JS object.
    pub fn state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.view()).map_err(JsValue::from)
    }

    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsValue> {
        self.inner.state_json().map_err(js_err)
    }

    #[wasm_bindgen(getter)]
    pub fn sfen(&self) -> String {
        self.inner.game().sfen()
    }

    /// USI strings of the moves played so far.
    #[wasm_bindgen(js_name = moveList)]
    pub fn move_list(&self) -> js_sys::Array {
        self.inner
            .game()
            .moves()
            .iter()
            .map(|m| JsValue::from_str(&m.usi))
            .collect()
    }

    #[wasm_bindgen(js_name = legalMovesFrom)]
    pub fn legal_moves_from(&mut self, square: &str) -> Result<String, JsValue> {
        self.inner.legal_moves_from(square).map_err(js_err)
    }

    #[wasm_bindgen(js_name = legalDrops)]
    pub fn legal_drops(&mut self, kind: &str) -> Result<String, JsValue> {
        self.inner.legal_drops(kind).map_err(js_err)
    }

    #[wasm_bindgen(js_name = playMove)]
    pub fn play_move(&mut self, mv: &str) -> Result<String, JsValue> {
        self.inner.play_json(mv).map_err(js_err)
    }

    #[wasm_bindgen(js_name = playUsi)]
    pub fn play_usi(&mut self, usi: &str) -> Result<String, JsValue> {
        self.inner.play_usi(usi).map_err(js_err)
    }

    /// Runs the CPU turn. Call from a deferred task to keep the page responsive.
    #[wasm_bindgen(js_name = cpuMove)]
    pub fn cpu_move(&mut self) -> Result<String, JsValue> {
        self.inner.cpu_move().map_err(js_err)
    }

    #[wasm_bindgen(js_name = takeBack)]
    pub fn take_back(&mut self) -> bool {
        self.inner.take_back()
    }

    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), JsValue> {
        self.inner.set_difficulty(difficulty).map_err(js_err)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Makes the next or running CPU search return after its first candidate.
    pub fn stop(&mut self) {
        self.inner.stop();
    }
}
