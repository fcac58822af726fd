//! Pure Wordle board data shared by the relay.
//!
//! Nothing in this crate performs I/O. It defines how a row of tiles is
//! encoded ([`Feedback`], [`RowResult`]) and how a site's markup maps onto that
//! encoding ([`GameAdapterConfig`], [`AdapterRegistry`]).

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adapter;
mod feedback;
pub mod presets;
mod registry;
mod row;

pub use adapter::{AdapterError, GameAdapterConfig, ROW_PLACEHOLDER};
pub use feedback::{Feedback, FeedbackParseError, TileState};
pub use registry::{AdapterRegistry, UnknownGame};
pub use row::RowResult;

/// Number of letters in every puzzle word.
pub const WORD_LENGTH: usize = 5;

/// Number of guesses a player gets before the puzzle is lost.
pub const MAX_ATTEMPTS: usize = 6;
