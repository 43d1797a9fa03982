//! Interrupts raised mid-turn and their resolution
//!
//! - `Interrupt` / `InterruptKind` - What a suspended tool call is waiting for
//! - `Decision` / `ResumeValue` - How it was resolved
//! - `InterruptResolver` - Drives each interrupt to a decision

mod resolver;
mod types;

pub use resolver::{AuthorizationWaiter, InterruptResolver};
pub use types::{AuthorizationHandle, Decision, Interrupt, InterruptKind, ResumeValue};
