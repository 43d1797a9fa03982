//! Interrupt and decision types
//!
//! An interrupt is a suspension request surfaced mid-turn by the executor.
//! The runtime payload is duck-typed (`authorization_required` /
//! `hitl_required` flags); it is classified into `InterruptKind` once, at the
//! boundary, so the rest of the code can match exhaustively.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where the user has to go, and what to wait on, to authorize a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationHandle {
    /// URL the user visits in a browser
    pub url: String,
    /// Opaque id used to wait for completion
    pub id: String,
}

/// What a suspension is waiting for
#[derive(Debug, Clone, PartialEq)]
pub enum InterruptKind {
    /// The tool needs the user to grant access to a third-party account
    Authorization {
        tool_name: String,
        handle: AuthorizationHandle,
    },

    /// The tool call needs an explicit yes/no from the user
    Approval { tool_name: String, input: Value },

    /// A payload matching neither known shape
    Unrecognized(Value),
}

/// A suspension request surfaced by the executor during one pass
#[derive(Debug, Clone, PartialEq)]
pub struct Interrupt {
    /// Identifier assigned by the executor
    pub id: String,
    pub kind: InterruptKind,
}

impl Interrupt {
    /// Create an authorization interrupt
    pub fn authorization(
        id: impl Into<String>,
        tool_name: impl Into<String>,
        url: impl Into<String>,
        auth_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: InterruptKind::Authorization {
                tool_name: tool_name.into(),
                handle: AuthorizationHandle {
                    url: url.into(),
                    id: auth_id.into(),
                },
            },
        }
    }

    /// Create an approval interrupt
    pub fn approval(id: impl Into<String>, tool_name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            kind: InterruptKind::Approval {
                tool_name: tool_name.into(),
                input,
            },
        }
    }

    /// Classify a raw runtime payload
    ///
    /// `authorization_required` wins over `hitl_required`. A flagged payload
    /// missing the fields its kind needs is treated as unrecognized.
    pub fn from_payload(id: impl Into<String>, payload: Value) -> Self {
        let kind = classify(&payload).unwrap_or(InterruptKind::Unrecognized(payload));
        Self { id: id.into(), kind }
    }

    /// Name of the tool this interrupt suspends, if known
    pub fn tool_name(&self) -> Option<&str> {
        match &self.kind {
            InterruptKind::Authorization { tool_name, .. }
            | InterruptKind::Approval { tool_name, .. } => Some(tool_name),
            InterruptKind::Unrecognized(_) => None,
        }
    }
}

fn flag(payload: &Value, key: &str) -> bool {
    payload.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn classify(payload: &Value) -> Option<InterruptKind> {
    let tool_name = payload
        .get("tool_name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    // A flag whose handle is missing or malformed does not match.
    if flag(payload, "authorization_required") {
        let handle = payload
            .get("authorization_response")
            .and_then(|response| serde_json::from_value::<AuthorizationHandle>(response.clone()).ok());
        if let Some(handle) = handle {
            return Some(InterruptKind::Authorization { tool_name, handle });
        }
    }

    if flag(payload, "hitl_required") {
        let input = payload.get("input").cloned().unwrap_or(Value::Null);
        return Some(InterruptKind::Approval { tool_name, input });
    }

    None
}

/// Resolution of one interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the suspended tool call may proceed
    pub authorized: bool,
}

impl Decision {
    /// Permit the suspended call
    pub fn allow() -> Self {
        Self { authorized: true }
    }

    /// Refuse the suspended call
    pub fn deny() -> Self {
        Self { authorized: false }
    }
}

/// Decisions handed back to the executor when resuming
///
/// A single interrupt resumes with a bare decision, several with an ordered
/// list, mirroring the wire shape the runtime expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResumeValue {
    Single(Decision),
    Many(Vec<Decision>),
}

impl ResumeValue {
    /// Build the resume value for decisions collected in one pass
    pub fn from_decisions(mut decisions: Vec<Decision>) -> Self {
        if decisions.len() == 1 {
            if let Some(decision) = decisions.pop() {
                return ResumeValue::Single(decision);
            }
        }
        ResumeValue::Many(decisions)
    }

    /// Decisions in interrupt order
    pub fn into_decisions(self) -> Vec<Decision> {
        match self {
            ResumeValue::Single(decision) => vec![decision],
            ResumeValue::Many(decisions) => decisions,
        }
    }

    /// Number of decisions carried
    pub fn len(&self) -> usize {
        match self {
            ResumeValue::Single(_) => 1,
            ResumeValue::Many(decisions) => decisions.len(),
        }
    }

    /// Whether no decisions are carried
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authorization_payload() {
        let interrupt = Interrupt::from_payload(
            "i1",
            json!({
                "authorization_required": true,
                "hitl_required": true,
                "tool_name": "Confluence_GetPage",
                "authorization_response": {"url": "https://auth.example/x", "id": "auth-1"}
            }),
        );

        assert_eq!(
            interrupt.kind,
            InterruptKind::Authorization {
                tool_name: "Confluence_GetPage".into(),
                handle: AuthorizationHandle {
                    url: "https://auth.example/x".into(),
                    id: "auth-1".into(),
                },
            }
        );
        assert_eq!(interrupt.tool_name(), Some("Confluence_GetPage"));
    }

    #[test]
    fn test_approval_payload() {
        let interrupt = Interrupt::from_payload(
            "i2",
            json!({
                "hitl_required": true,
                "tool_name": "Confluence_CreatePage",
                "input": {"title": "Runbook"}
            }),
        );

        assert!(matches!(
            interrupt.kind,
            InterruptKind::Approval { ref tool_name, ref input }
                if tool_name == "Confluence_CreatePage" && input["title"] == "Runbook"
        ));
    }

    #[test]
    fn test_unknown_payload_falls_back() {
        let payload = json!({"something_else": true});
        let interrupt = Interrupt::from_payload("i3", payload.clone());
        assert_eq!(interrupt.kind, InterruptKind::Unrecognized(payload));
        assert_eq!(interrupt.tool_name(), None);
    }

    #[test]
    fn test_authorization_without_handle_is_unrecognized() {
        let interrupt = Interrupt::from_payload(
            "i4",
            json!({"authorization_required": true, "tool_name": "X"}),
        );
        assert!(matches!(interrupt.kind, InterruptKind::Unrecognized(_)));
    }

    #[test]
    fn test_bad_handle_falls_through_to_approval() {
        let interrupt = Interrupt::from_payload(
            "i5",
            json!({
                "authorization_required": true,
                "hitl_required": true,
                "tool_name": "Confluence_CreatePage",
                "authorization_response": {"url": 7},
                "input": {"title": "Runbook"}
            }),
        );
        assert_eq!(
            interrupt.kind,
            InterruptKind::Approval {
                tool_name: "Confluence_CreatePage".into(),
                input: json!({"title": "Runbook"}),
            }
        );
    }

    #[test]
    fn test_resume_value_shape() {
        let single = ResumeValue::from_decisions(vec![Decision::allow()]);
        assert_eq!(single, ResumeValue::Single(Decision::allow()));
        assert_eq!(serde_json::to_value(&single).unwrap(), json!({"authorized": true}));

        let many = ResumeValue::from_decisions(vec![Decision::allow(), Decision::deny()]);
        assert_eq!(many.len(), 2);
        assert_eq!(
            serde_json::to_value(&many).unwrap(),
            json!([{"authorized": true}, {"authorized": false}])
        );
        assert_eq!(many.into_decisions(), vec![Decision::allow(), Decision::deny()]);
    }
}
