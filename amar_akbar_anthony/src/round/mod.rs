//! Round module providing the live round behind an async actor.
//!
//! This module implements:
//! - RoundActor: single owner of the live round and its admitted bets
//! - RoundHandle: cloneable handle used by admission and settlement
//! - Message-based communication with tokio channels
//! - Game configuration (limits, cashout cap, ledger timeout)
//!
//! ## Architecture
//!
//! The actor runs in its own Tokio task with an mpsc inbox. Every mutation of
//! the round (open, reserve, admit, close, checkpoint, clear) is a message, so
//! the window check and the append are serialized against each other and
//! against the settlement sweep. Ledger and cache calls never run inside the
//! actor.
//!
//! ## Example
//!
//! ```no_run
//! use amar_akbar_anthony::game::{Category, GameResult};
//! use amar_akbar_anthony::round::{GameConfig, RoundActor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let handle = RoundActor::spawn(GameConfig::default());
//!
//!     handle.open(1).await.unwrap();
//!     handle
//!         .close(1, GameResult::new(Category::Amar, "4-H"))
//!         .await
//!         .unwrap();
//! }
//! ```

pub mod actor;
pub mod config;
pub mod errors;
pub mod messages;
pub mod state;

pub use actor::{RoundActor, RoundHandle};
pub use config::{DEFAULT_LEDGER_TIMEOUT, GameConfig};
pub use errors::{RoundError, RoundResult};
pub use messages::{RoundMessage, RoundSnapshot, SettlementBatch};
pub use state::{RoundState, RoundStatus, RoundWindow};
