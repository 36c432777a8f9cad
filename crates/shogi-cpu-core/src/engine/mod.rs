//! Optional external USI engine with fallback to the built-in policies.

mod external;
mod manager;
mod strength;

pub use external::{EngineError, EngineReply, ExternalEngine, SearchOptions};
pub use manager::{EngineManager, MoveSource};
pub use strength::{SEARCH_TIMEOUT_MARGIN_MS, StrengthLevel};
