//! Append-only conversation log

use crate::types::{Message, RenderedTurn, TurnRole};

/// The ordered conversation log for one session.
///
/// Grows monotonically by appends; entries are never edited, reordered
/// or truncated. The first entry is always the system directive, and a
/// tool-requesting assistant entry is always followed by exactly one
/// `ToolResult` per call id before the next plain assistant entry.
///
/// Calling `append` out of that order is a programmer error in the
/// orchestration loop, not a runtime condition, so it is checked by
/// debug assertions rather than a `Result`.
#[derive(Debug, Clone)]
pub struct MessageHistory {
    messages: Vec<Message>,
}

impl MessageHistory {
    /// Create a history seeded with the system directive
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Append a message to the log. Infallible; ordering violations
    /// trip a debug assertion.
    pub fn append(&mut self, message: Message) {
        debug_assert!(
            self.accepts(&message),
            "history ordering violated by append of {:?} after {:?}",
            message,
            self.messages.last()
        );
        self.messages.push(message);
    }

    /// Immutable view of the full log, for model invocations
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    /// Number of entries, including scaffolding and the directive
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Project the log for display: system messages, tool-requesting
    /// assistant messages and tool results are never rendered.
    pub fn renderable(&self) -> Vec<RenderedTurn> {
        self.messages
            .iter()
            .filter_map(|message| match message {
                Message::User { text } => Some(RenderedTurn {
                    role: TurnRole::User,
                    text: text.clone(),
                }),
                Message::Assistant { text, tool_calls } if tool_calls.is_empty() => {
                    Some(RenderedTurn {
                        role: TurnRole::Assistant,
                        text: text.clone(),
                    })
                }
                _ => None,
            })
            .collect()
    }

    /// Call ids of the last assistant entry that are still waiting for
    /// a `ToolResult`. Empty when the log is in a settled state.
    pub fn pending_call_ids(&self) -> Vec<String> {
        let mut answered: Vec<&str> = Vec::new();
        for message in self.messages.iter().rev() {
            match message {
                Message::ToolResult { call_id, .. } => answered.push(call_id),
                Message::Assistant { tool_calls, .. } => {
                    return tool_calls
                        .iter()
                        .map(|c| c.id.clone())
                        .filter(|id| !answered.iter().any(|a| a == id))
                        .collect();
                }
                _ => return Vec::new(),
            }
        }
        Vec::new()
    }

    /// Ordering rule for `append`, per the conversation invariant.
    fn accepts(&self, message: &Message) -> bool {
        let pending = self.pending_call_ids();
        match message {
            // The constructor places the one system directive.
            Message::System { .. } => self.messages.is_empty(),
            // User input and assistant replies only land once every
            // outstanding call has been answered.
            Message::User { .. } | Message::Assistant { .. } => pending.is_empty(),
            // Results must answer an outstanding call of the
            // immediately preceding assistant entry.
            Message::ToolResult { call_id, .. } => pending.iter().any(|id| id == call_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ToolCall;
    use serde_json::json;

    fn call(id: &str) -> ToolCall {
        ToolCall::new(id, "add_expense", json!({"amount": 1}))
    }

    #[test]
    fn test_new_history_holds_only_directive() {
        let history = MessageHistory::new("You have access to tools.");
        assert_eq!(history.len(), 1);
        assert!(matches!(history.snapshot()[0], Message::System { .. }));
        assert!(history.renderable().is_empty());
    }

    #[test]
    fn test_plain_turn_appends_in_order() {
        let mut history = MessageHistory::new("directive");
        history.append(Message::user("hi"));
        history.append(Message::assistant("hello"));

        let rendered = history.renderable();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].role, TurnRole::User);
        assert_eq!(rendered[1].role, TurnRole::Assistant);
    }

    #[test]
    fn test_renderable_hides_scaffolding() {
        let mut history = MessageHistory::new("directive");
        history.append(Message::user("add lunch"));
        history.append(Message::assistant_with_calls("", vec![call("c1")]));
        history.append(Message::tool_result("c1", "{\"status\":\"success\"}"));
        history.append(Message::assistant("Added."));

        let rendered = history.renderable();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].text, "add lunch");
        assert_eq!(rendered[1].text, "Added.");
    }

    #[test]
    fn test_pending_call_ids_tracks_unanswered_calls() {
        let mut history = MessageHistory::new("directive");
        history.append(Message::user("add two things"));
        history.append(Message::assistant_with_calls("", vec![call("c1"), call("c2")]));
        assert_eq!(history.pending_call_ids(), vec!["c1", "c2"]);

        history.append(Message::tool_result("c2", "{}"));
        assert_eq!(history.pending_call_ids(), vec!["c1"]);

        history.append(Message::tool_result("c1", "{}"));
        assert!(history.pending_call_ids().is_empty());
    }

    #[test]
    #[cfg_attr(not(debug_assertions), ignore)]
    #[should_panic(expected = "history ordering violated")]
    fn test_orphan_tool_result_is_rejected_in_debug() {
        let mut history = MessageHistory::new("directive");
        history.append(Message::user("hi"));
        history.append(Message::tool_result("c9", "{}"));
    }

    #[test]
    #[cfg_attr(not(debug_assertions), ignore)]
    #[should_panic(expected = "history ordering violated")]
    fn test_plain_reply_before_results_is_rejected_in_debug() {
        let mut history = MessageHistory::new("directive");
        history.append(Message::user("hi"));
        history.append(Message::assistant_with_calls("", vec![call("c1")]));
        history.append(Message::assistant("too early"));
    }
}
