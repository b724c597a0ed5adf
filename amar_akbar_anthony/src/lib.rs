//! # Amar Akbar Anthony
//!
//! Round state and settlement engine for a round-based, three-outcome card
//! game played for real money.
//!
//! Players bet on one or more of three categories while a round is open. Each
//! stake is debited through an external ledger before the bet is recorded.
//! When the round closes a card is drawn, every bet is settled against the
//! fixed-odds table and winners are credited.
//!
//! ## Architecture
//!
//! - **Amar** (1): A through 6, pays 2.10x
//! - **Akbar** (2): 7 through 10, pays 3.15x
//! - **Anthony** (3): J, Q and K, pays 4.15x
//!
//! The live round is owned by a single actor task. Bet admission and the
//! settlement sweep talk to it through a cloneable handle, and every ledger,
//! cache and store call happens outside of it.
//!
//! ## Core Modules
//!
//! - [`game`]: Categories, outcome resolution and the payout table
//! - [`bets`]: Parsing, validation and admission of wagers
//! - [`round`]: Round actor, round state and game configuration
//! - [`settlement`]: Payout computation and the settlement sweep
//! - [`ledger`]: Account-of-record gateway contract and adapters
//! - [`engine`]: Facade for the round lifecycle
//!
//! ## Example
//!
//! ```no_run
//! use amar_akbar_anthony::{
//!     Collaborators, GameEngine,
//!     bets::{Connection, Selection},
//!     events::NullEventSink,
//!     ledger::MemoryLedger,
//!     round::GameConfig,
//!     session::{MemorySessionCache, PlayerSession, SessionCache},
//!     store::MemoryStore,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sessions = Arc::new(MemorySessionCache::new());
//!     sessions
//!         .set("conn-1", PlayerSession::new("p1", "op1", "token", "aaa", 10_000))
//!         .await;
//!
//!     let engine = GameEngine::new(
//!         GameConfig::default(),
//!         Collaborators {
//!             ledger: Arc::new(MemoryLedger::new()),
//!             sessions,
//!             store: Arc::new(MemoryStore::new()),
//!             events: Arc::new(NullEventSink),
//!         },
//!     )?;
//!
//!     engine.open_round(1).await?;
//!     engine
//!         .place_bet(&Connection::new("conn-1", "127.0.0.1"), 1, vec![Selection::new(1, 1000)])
//!         .await?;
//!     let outcome = engine.close_round(1).await?;
//!     println!("Round result: {}", outcome.result.card);
//!     Ok(())
//! }
//! ```

pub mod bets;
pub mod db;
pub mod engine;
pub mod events;
pub mod game;
pub mod ledger;
pub mod round;
pub mod session;
pub mod settlement;
pub mod store;

pub use engine::{Collaborators, GameEngine, RoundOutcome};
pub use game::{Amount, Category, GameResult, RoundId};
