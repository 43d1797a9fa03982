//! Turn execution
//!
//! - `TurnExecutor` - Interface of the conversational runtime (one pass per call)
//! - `TurnLoop` - Runs passes and resolves interrupts until the turn is done

mod executor;
mod turn_loop;

pub use executor::{
    EventStream, SessionContext, TurnEvent, TurnExecutor, TurnInput, UpdateGroup,
};
pub use turn_loop::TurnLoop;
