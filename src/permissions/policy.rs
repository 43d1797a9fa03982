//! Approval policy implementation
//!
//! Decides which tool calls must be confirmed by the user before the
//! executor runs them. Rules are checked in order; the first match wins.

use regex::Regex;

use crate::core::{AgentError, AgentResult};

/// Prefix marking a configured entry as a regex over tool names
pub const PATTERN_PREFIX: &str = "re:";

/// Type of approval rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleType {
    /// Match one tool by its exact exposed name
    Tool,
    /// Match every tool whose name matches a regex
    Pattern,
}

/// An approval rule
#[derive(Debug, Clone)]
pub struct ApprovalRule {
    rule_type: RuleType,
    tool_name: String,
    pattern: Option<Regex>,
}

impl ApprovalRule {
    /// Create a rule for an entire tool
    pub fn tool(tool_name: impl Into<String>) -> Self {
        Self {
            rule_type: RuleType::Tool,
            tool_name: tool_name.into(),
            pattern: None,
        }
    }

    /// Create a rule from a regex over tool names
    ///
    /// Examples:
    /// - `"^Confluence_(Create|Update)"` - every create and update tool
    /// - `"Delete"` - anything with Delete in its name
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            rule_type: RuleType::Pattern,
            tool_name: pattern.to_string(),
            pattern: Some(Regex::new(pattern)?),
        })
    }

    /// Parse a configured entry, `re:` entries become patterns
    pub fn parse(entry: &str) -> AgentResult<Self> {
        let entry = entry.trim();
        match entry.strip_prefix(PATTERN_PREFIX) {
            Some(pattern) => Self::pattern(pattern).map_err(|e| {
                AgentError::InvalidConfig(format!("Invalid approval pattern '{}': {}", pattern, e))
            }),
            None => Ok(Self::tool(entry)),
        }
    }

    pub fn rule_type(&self) -> RuleType {
        self.rule_type
    }

    /// Check if this rule matches the given tool
    pub fn matches(&self, tool_name: &str) -> bool {
        match self.rule_type {
            RuleType::Tool => self.tool_name == tool_name,
            RuleType::Pattern => self
                .pattern
                .as_ref()
                .is_some_and(|regex| regex.is_match(tool_name)),
        }
    }
}

/// Ordered set of approval rules
#[derive(Debug, Clone, Default)]
pub struct ApprovalPolicy {
    rules: Vec<ApprovalRule>,
}

impl ApprovalPolicy {
    /// A policy that never asks
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: Vec<ApprovalRule>) -> Self {
        Self { rules }
    }

    /// Build a policy from configured entries (exact names or `re:` patterns)
    ///
    /// Blank entries are skipped; an empty list disables approval.
    pub fn from_tool_names<S: AsRef<str>>(names: &[S]) -> AgentResult<Self> {
        let rules = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !name.trim().is_empty())
            .map(ApprovalRule::parse)
            .collect::<AgentResult<Vec<_>>>()?;

        tracing::info!("[ApprovalPolicy] {} approval rules loaded", rules.len());
        Ok(Self { rules })
    }

    /// Add a rule at the end of the list
    pub fn add_rule(&mut self, rule: ApprovalRule) {
        tracing::debug!(
            "[ApprovalPolicy] Adding {:?} rule for {}",
            rule.rule_type,
            rule.tool_name
        );
        self.rules.push(rule);
    }

    /// Whether a call to `tool_name` must be confirmed by the user
    pub fn requires_approval(&self, tool_name: &str) -> bool {
        self.rules.iter().any(|r| r.matches(tool_name))
    }

    pub fn rules(&self) -> &[ApprovalRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::DEFAULT_APPROVAL_TOOLS;

    #[test]
    fn test_rule_tool() {
        let rule = ApprovalRule::tool("Confluence_CreatePage");

        assert!(rule.matches("Confluence_CreatePage"));
        assert!(!rule.matches("Confluence_CreatePageDraft"));
        assert!(!rule.matches("Confluence_GetPage"));
    }

    #[test]
    fn test_rule_pattern() {
        let rule = ApprovalRule::pattern("^Confluence_(Create|Update)").unwrap();

        assert_eq!(rule.rule_type(), RuleType::Pattern);
        assert!(rule.matches("Confluence_CreatePage"));
        assert!(rule.matches("Confluence_UpdatePageContent"));
        assert!(!rule.matches("Confluence_GetPage"));
    }

    #[test]
    fn test_parse_entries() {
        assert_eq!(ApprovalRule::parse(" Confluence_RenamePage ").unwrap().rule_type(), RuleType::Tool);
        assert_eq!(ApprovalRule::parse("re:Delete$").unwrap().rule_type(), RuleType::Pattern);
        assert!(matches!(
            ApprovalRule::parse("re:(unclosed"),
            Err(AgentError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_policy() {
        let policy = ApprovalPolicy::from_tool_names(DEFAULT_APPROVAL_TOOLS).unwrap();

        assert!(policy.requires_approval("Confluence_CreatePage"));
        assert!(policy.requires_approval("Confluence_UpdatePageContent"));
        assert!(policy.requires_approval("Confluence_RenamePage"));
        assert!(!policy.requires_approval("Confluence_GetPage"));
        assert!(!policy.requires_approval("Confluence_WhoAmI"));
    }

    #[test]
    fn test_empty_policy_never_asks() {
        let policy = ApprovalPolicy::from_tool_names(&["", "  "]).unwrap();
        assert!(policy.is_empty());
        assert!(!policy.requires_approval("Confluence_CreatePage"));
        assert!(!ApprovalPolicy::none().requires_approval("anything"));
    }

    #[test]
    fn test_add_rule() {
        let mut policy = ApprovalPolicy::none();
        policy.add_rule(ApprovalRule::pattern("Delete").unwrap());

        assert!(policy.requires_approval("Confluence_DeletePage"));
        assert_eq!(policy.rules().len(), 1);
    }
}
