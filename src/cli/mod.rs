//! Terminal front end
//!
//! `Terminal` is the seam between the loops and the user. `Console` is the
//! real implementation; tests drive the loops through a scripted one.

mod console;

use async_trait::async_trait;
use std::io;

use crate::llm::ChatMessage;

pub use console::{is_affirmative, Console};

/// Line-oriented user interaction
#[async_trait]
pub trait Terminal: Send + Sync {
    /// Show `prompt` and read one trimmed line; `None` once input is closed
    async fn read_line(&self, prompt: &str) -> io::Result<Option<String>>;

    /// Ask a yes/no question
    async fn confirm(&self, question: &str) -> io::Result<bool>;

    /// Print the welcome line
    fn banner(&self);

    /// Print the goodbye line
    fn farewell(&self);

    /// Render a message produced by the agent
    fn show_message(&self, message: &ChatMessage);

    /// Print a status line
    fn notice(&self, text: &str);

    /// Print an error
    fn error(&self, text: &str);
}
