use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Group reserved for the main-question node
pub const ROOT_GROUP: u32 = 0;

/// A subtopic in the knowledge graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique within a graph, stable across expansions
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            group: None,
            description: None,
        }
    }

    pub fn with_group(mut self, group: u32) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.group == Some(ROOT_GROUP)
    }
}

/// A relation between two nodes, endpoints are node ids.
///
/// Several links may join the same pair with different descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphLink {
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GraphLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Link endpoint as it may arrive on the wire.
///
/// Renderers replace id strings with the node object they point to, and
/// some models emit numeric ids. All forms reduce to an id string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkEndpoint {
    Id(String),
    Number(serde_json::Number),
    Node { id: serde_json::Value },
}

impl LinkEndpoint {
    /// The referenced node id, if the endpoint carries a usable one
    pub fn into_id(self) -> Option<String> {
        match self {
            LinkEndpoint::Id(id) => Some(id),
            LinkEndpoint::Number(n) => Some(n.to_string()),
            LinkEndpoint::Node { id } => match id {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            },
        }
    }
}

/// Node/link document exchanged with the model and handed to renderers.
///
/// "No graph yet" is modelled as `Option<GraphDocument>::None`, which is
/// distinct from a document with empty arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl GraphDocument {
    pub fn new(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> Self {
        Self { nodes, links }
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }

    /// First node in the root group
    pub fn root(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.is_root())
    }

    /// Number of root-group nodes; a well-formed answer has exactly one
    pub fn root_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_root()).count()
    }

    /// Links leaving `id`
    pub fn links_from<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a GraphLink> + 'a {
        self.links.iter().filter(move |l| l.source == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}
