use async_trait::async_trait;
use colored::*;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use super::Terminal;
use crate::llm::ChatMessage;

/// Console handles all terminal I/O with colored formatting
pub struct Console {
    prompt_color: Color,
    assistant_color: Color,
    notice_color: Color,
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Console {
    /// Create a new Console with default colors
    pub fn new() -> Self {
        Self::with_colors(Color::Cyan, Color::Green, Color::Yellow)
    }

    /// Create a new Console with custom colors
    pub fn with_colors(prompt_color: Color, assistant_color: Color, notice_color: Color) -> Self {
        Self {
            prompt_color,
            assistant_color,
            notice_color,
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    fn print_prompt(&self, prompt: &str) -> io::Result<()> {
        print!("{}", prompt.color(self.prompt_color).bold());
        io::stdout().flush()
    }

    async fn next_line(&self) -> io::Result<Option<String>> {
        let mut lines = self.lines.lock().await;
        Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Terminal for Console {
    async fn read_line(&self, prompt: &str) -> io::Result<Option<String>> {
        self.print_prompt(prompt)?;
        self.next_line().await
    }

    async fn confirm(&self, question: &str) -> io::Result<bool> {
        self.print_prompt(&format!("{} (y/n): ", question))?;
        let answer = self.next_line().await?.ok_or_else(|| {
            io::Error::new(io::ErrorKind::UnexpectedEof, "input closed while waiting for an answer")
        })?;
        let approved = is_affirmative(&answer);

        if approved {
            println!("{}", "✓ Approved".green());
        } else {
            println!("{}", "✗ Declined".red());
        }
        Ok(approved)
    }

    fn banner(&self) {
        println!("{}", "Welcome to the chatbot! Type 'exit' to quit.".green());
    }

    fn farewell(&self) {
        println!("{}", "👋 Bye...".red());
    }

    fn show_message(&self, message: &ChatMessage) {
        println!(
            "{} {}",
            "🤖:".color(self.assistant_color).bold(),
            message.to_formatted_string()
        );
    }

    fn notice(&self, text: &str) {
        println!("{} {}", "⚙️:".color(self.notice_color).bold(), text);
    }

    fn error(&self, text: &str) {
        eprintln!("{} {}", "Error:".red().bold(), text);
    }
}

/// Whether a yes/no answer means yes
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
