//! Message sequences for the graph and summary endpoints.

use graphwise_llm::Message;
use graphwise_types::{ComposeMode, GraphDocument};
use serde::{Deserialize, Serialize};

use crate::templates::{EXPAND_SYSTEM_PROMPT, FRESH_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT};
use crate::validator::serialize_graph;

/// Template selection for one graph request
#[derive(Debug, Clone, Copy)]
pub enum PromptMode<'a> {
    Fresh,
    Expand(&'a GraphDocument),
}

impl PromptMode<'_> {
    pub fn kind(&self) -> ComposeMode {
        match self {
            PromptMode::Fresh => ComposeMode::Fresh,
            PromptMode::Expand(_) => ComposeMode::Expand,
        }
    }
}

impl<'a> From<Option<&'a GraphDocument>> for PromptMode<'a> {
    fn from(prior: Option<&'a GraphDocument>) -> Self {
        prior.map_or(PromptMode::Fresh, PromptMode::Expand)
    }
}

/// Ordered messages for the graph endpoint.
///
/// Fresh: `[system, user]`. Expand: `[system, assistant(prior graph), user]`.
pub fn compose(mode: PromptMode<'_>, user_text: &str) -> Vec<Message> {
    match mode {
        PromptMode::Fresh => vec![
            Message::system(FRESH_SYSTEM_PROMPT),
            Message::human(user_text),
        ],
        PromptMode::Expand(prior) => vec![
            Message::system(EXPAND_SYSTEM_PROMPT),
            Message::ai(serialize_graph(prior)),
            Message::human(user_text),
        ],
    }
}

/// Body of a summary request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub system: String,
    pub user_prompt: String,
}

pub fn compose_summary(user_text: &str) -> SummaryRequest {
    SummaryRequest {
        system: SUMMARY_SYSTEM_PROMPT.to_string(),
        user_prompt: user_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphwise_types::{GraphLink, GraphNode};

    #[test]
    fn test_fresh_has_no_assistant_message() {
        let messages = compose(PromptMode::Fresh, "urban traffic congestion");
        let roles: Vec<_> = messages.iter().map(|m| m.role()).collect();
        assert_eq!(roles, vec!["system", "user"]);
        assert_eq!(
            messages[1].content().to_plain_text(),
            "urban traffic congestion"
        );
    }

    #[test]
    fn test_expand_carries_prior_graph() {
        let prior = GraphDocument::new(
            vec![
                GraphNode::new("root", "Root").with_group(0),
                GraphNode::new("leaf", "Leaf").with_group(1),
            ],
            vec![GraphLink::new("root", "leaf")],
        );

        let messages = compose(PromptMode::Expand(&prior), "tell me more about leaf");
        let roles: Vec<_> = messages.iter().map(|m| m.role()).collect();
        assert_eq!(roles, vec!["system", "assistant", "user"]);
        assert_eq!(
            messages[1].content().to_plain_text(),
            serialize_graph(&prior)
        );
    }

    #[test]
    fn test_mode_from_prior() {
        assert_eq!(PromptMode::from(None).kind(), ComposeMode::Fresh);
        let graph = GraphDocument::default();
        assert_eq!(PromptMode::from(Some(&graph)).kind(), ComposeMode::Expand);
    }

    #[test]
    fn test_summary_request_wire_shape() {
        let json = serde_json::to_value(compose_summary("stoicism")).unwrap();
        assert_eq!(json["userPrompt"], "stoicism");
        assert_eq!(json["system"], SUMMARY_SYSTEM_PROMPT);
    }
}
