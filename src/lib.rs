//! Falling-block rules engine: board, 7-bag queue with marked pieces,
//! kick-table rotation with spin detection, garbage exchange, and a
//! deterministic, host-driven timing scheduler.
//!
//! The crate draws nothing and owns no clock or input device. A host feeds
//! key edges and elapsed milliseconds into a [`Session`] (or wires [`Game`]
//! and a [`timing::Scheduler`] together itself) and observes the results
//! through an [`EventSink`].
//!
//! ```
//! use linefall::{Action, Config, NullSink, Session};
//!
//! let mut session = Session::new(Config::default(), 42, Box::new(NullSink));
//! session.start();
//! session.key_down(Action::MoveLeft);
//! session.key_up(Action::MoveLeft);
//! session.advance(1000); // one gravity step
//! assert!(!session.game_over());
//! ```

pub mod config;
pub mod core;
pub mod events;
pub mod session;
pub mod timing;
pub mod types;

pub use config::{Config, GameConfig, TimingConfig};
pub use core::{Board, Cell, Game, Piece, PieceQueue, PreviewPiece};
pub use events::{EventSink, NullSink};
pub use session::Session;
pub use types::{Action, CellColor, PieceKind};
