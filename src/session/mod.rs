//! Interactive session
//!
//! The `SessionLoop` owns the session identifier and turns console lines
//! into turns.

mod session_loop;

pub use session_loop::{SessionEnd, SessionLoop, PROMPT};
