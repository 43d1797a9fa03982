pub mod core;
pub mod interrupt;
pub mod session;
pub mod turn;

// Tool access and gating
pub mod broker;
pub mod permissions;
pub mod tools;

// Conversational runtime
pub mod agent;
pub mod llm;

// Terminal and process plumbing
pub mod cli;
pub mod logging;
