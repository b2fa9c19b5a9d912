//! The Drafter conversation loop.
//!
//! Ties the pieces together: an [`InputSource`] supplies user utterances,
//! a [`DraftSession`] drives the model/tool cycle over an append-only
//! transcript, and [`is_session_complete`] decides when the drafting work
//! is done.

pub mod input;
pub mod session;
pub mod termination;

pub use input::{InputSource, ScriptedInput};
pub use session::{DraftSession, SessionOutcome, SessionReport};
pub use termination::is_session_complete;
