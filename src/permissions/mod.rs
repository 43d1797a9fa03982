//! Human approval policy for tool execution
//!
//! ## Rule Types
//!
//! - `Tool`: One tool by exact name (e.g., `Confluence_CreatePage`)
//! - `Pattern`: A regex over tool names, configured as `re:<regex>`
//!
//! ## Example
//!
//! ```rust,ignore
//! use confluence_agent::permissions::{ApprovalPolicy, ApprovalRule};
//!
//! let mut policy = ApprovalPolicy::from_tool_names(&["Confluence_CreatePage"])?;
//! policy.add_rule(ApprovalRule::pattern("^Confluence_Delete")?);
//!
//! if policy.requires_approval("Confluence_CreatePage") {
//!     // raise an approval interrupt
//! }
//! ```

mod policy;

pub use policy::{ApprovalPolicy, ApprovalRule, RuleType, PATTERN_PREFIX};
