//! Graph schema validation.
//!
//! Everything that crosses into the session goes through [`validate`]:
//! model answers, request bodies and stored records. The result is always
//! normalised so that link endpoints are plain id strings, whatever shape
//! they arrived in.

use std::collections::HashSet;

use graphwise_types::{GraphDocument, GraphLink, GraphNode, LinkEndpoint};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Check `raw` and return it as a normalised [`GraphDocument`]
pub fn validate(raw: &Value) -> Result<GraphDocument, SchemaError> {
    let object = raw.as_object().ok_or(SchemaError::NotAnObject)?;
    let raw_nodes = array_field(object, "nodes")?;
    let raw_links = array_field(object, "links")?;

    let mut nodes = Vec::with_capacity(raw_nodes.len());
    let mut seen = HashSet::with_capacity(raw_nodes.len());
    for (index, raw_node) in raw_nodes.iter().enumerate() {
        let node = parse_node(index, raw_node)?;
        if !seen.insert(node.id.clone()) {
            return Err(SchemaError::DuplicateNode { id: node.id });
        }
        nodes.push(node);
    }

    let mut links = Vec::with_capacity(raw_links.len());
    for (index, raw_link) in raw_links.iter().enumerate() {
        let link = parse_link(index, raw_link)?;
        for (endpoint, id) in [("source", &link.source), ("target", &link.target)] {
            if !seen.contains(id) {
                return Err(SchemaError::DanglingLink {
                    index,
                    endpoint,
                    id: id.clone(),
                });
            }
        }
        links.push(link);
    }

    Ok(GraphDocument::new(nodes, links))
}

/// Validate previously held state.
///
/// `{}` and `null` mean "no graph yet" and map to `None`.
pub fn validate_prior(raw: &Value) -> Result<Option<GraphDocument>, SchemaError> {
    match raw {
        Value::Null => Ok(None),
        Value::Object(map) if map.is_empty() => Ok(None),
        other => validate(other).map(Some),
    }
}

/// Every node id of `prior` must still be present in `next`
pub fn check_superset(prior: &GraphDocument, next: &GraphDocument) -> Result<(), SchemaError> {
    let next_ids = next.node_ids();
    let missing: Vec<String> = prior
        .nodes
        .iter()
        .filter(|n| !next_ids.contains(n.id.as_str()))
        .map(|n| n.id.clone())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::NotSuperset { missing })
    }
}

/// Serialize a graph for the wire with endpoints as id strings
pub fn serialize_graph(graph: &GraphDocument) -> String {
    // Field types are all plain strings/integers, this cannot fail
    serde_json::to_string(graph).unwrap_or_else(|_| String::from("{}"))
}

fn array_field<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Vec<Value>, SchemaError> {
    object
        .get(field)
        .and_then(Value::as_array)
        .ok_or(SchemaError::MissingArray { field })
}

fn parse_node(index: usize, raw: &Value) -> Result<GraphNode, SchemaError> {
    let invalid = |reason: &str| SchemaError::InvalidNode {
        index,
        reason: reason.to_string(),
    };
    let object = raw.as_object().ok_or_else(|| invalid("not an object"))?;

    let id = match object.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => return Err(invalid("`id` must be a non-empty string or number")),
        None => return Err(invalid("missing `id`")),
    };

    let name = match object.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(_) => return Err(invalid("`name` must be a string")),
        None => return Err(invalid("missing `name`")),
    };

    let group = match object.get("group") {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(
            n.as_u64()
                .and_then(|g| u32::try_from(g).ok())
                .ok_or_else(|| invalid("`group` must be a non-negative integer"))?,
        ),
        Some(Value::String(s)) => Some(
            s.trim()
                .parse::<u32>()
                .map_err(|_| invalid("`group` must be a non-negative integer"))?,
        ),
        Some(_) => return Err(invalid("`group` must be a non-negative integer")),
    };

    let mut node = GraphNode::new(id, name);
    node.group = group;
    node.description = optional_text(object.get("description"));
    Ok(node)
}

fn parse_link(index: usize, raw: &Value) -> Result<GraphLink, SchemaError> {
    let invalid = |reason: String| SchemaError::InvalidLink { index, reason };
    let object = raw
        .as_object()
        .ok_or_else(|| invalid("not an object".to_string()))?;

    let endpoint = |name: &str| -> Result<String, SchemaError> {
        let value = object
            .get(name)
            .ok_or_else(|| invalid(format!("missing `{}`", name)))?;
        serde_json::from_value::<LinkEndpoint>(value.clone())
            .ok()
            .and_then(LinkEndpoint::into_id)
            .ok_or_else(|| invalid(format!("`{}` is not a node reference", name)))
    };

    let mut link = GraphLink::new(endpoint("source")?, endpoint("target")?);
    link.description = optional_text(object.get("description"));
    Ok(link)
}

/// Strings are kept verbatim (empty included); anything else reads as absent
fn optional_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn traffic() -> Value {
        json!({
            "nodes": [
                { "id": "main_question", "name": "What causes urban traffic congestion?", "group": 0 },
                { "id": "technology", "name": "Technology", "group": 3, "description": "Smart systems." },
                { "id": "navigation_tools", "name": "Navigation Tools", "group": "3", "val": 10 }
            ],
            "links": [
                { "source": "main_question", "target": "technology" },
                { "source": "technology", "target": "navigation_tools", "description": "apps" }
            ]
        })
    }

    #[test]
    fn test_valid_document() {
        let graph = validate(&traffic()).unwrap();
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.nodes[2].group, Some(3));
        assert_eq!(graph.links[1].description.as_deref(), Some("apps"));
        assert_eq!(graph.root_count(), 1);
    }

    #[test]
    fn test_serialize_then_validate_is_identity() {
        let graph = validate(&traffic()).unwrap();
        let raw: Value = serde_json::from_str(&serialize_graph(&graph)).unwrap();
        assert_eq!(validate(&raw).unwrap(), graph);
    }

    #[test]
    fn test_dangling_target() {
        let mut raw = traffic();
        raw["links"][0]["target"] = json!("ghost");
        assert_eq!(
            validate(&raw),
            Err(SchemaError::DanglingLink {
                index: 0,
                endpoint: "target",
                id: "ghost".to_string()
            })
        );
    }

    #[test]
    fn test_dangling_source() {
        let mut raw = traffic();
        raw["links"][1]["source"] = json!("ghost");
        assert!(matches!(
            validate(&raw),
            Err(SchemaError::DanglingLink { endpoint: "source", .. })
        ));
    }

    #[test]
    fn test_rendered_endpoints_are_normalised() {
        let mut raw = traffic();
        raw["links"][0]["source"] = json!({ "id": "main_question", "x": 12.5, "vy": -0.3, "index": 0 });
        raw["links"][0]["target"] = json!({ "id": "technology", "name": "Technology" });

        let graph = validate(&raw).unwrap();
        assert_eq!(graph.links[0].source, "main_question");
        assert_eq!(graph.links[0].target, "technology");
        assert!(serialize_graph(&graph).contains(r#""source":"main_question""#));
    }

    #[test]
    fn test_numeric_ids() {
        let raw = json!({
            "nodes": [{ "id": 1, "name": "One" }, { "id": 2, "name": "Two" }],
            "links": [{ "source": 1, "target": { "id": 2 } }]
        });
        let graph = validate(&raw).unwrap();
        assert_eq!(graph.links[0], GraphLink::new("1", "2"));
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(validate(&json!([])), Err(SchemaError::NotAnObject));
        assert_eq!(
            validate(&json!({ "nodes": [] })),
            Err(SchemaError::MissingArray { field: "links" })
        );
        assert!(matches!(
            validate(&json!({ "nodes": [{ "id": "a" }], "links": [] })),
            Err(SchemaError::InvalidNode { index: 0, .. })
        ));
        assert!(matches!(
            validate(&json!({ "nodes": [{ "name": "A" }], "links": [] })),
            Err(SchemaError::InvalidNode { index: 0, .. })
        ));
        assert!(matches!(
            validate(&json!({ "nodes": [{ "id": "a", "name": "A" }], "links": ["a"] })),
            Err(SchemaError::InvalidLink { index: 0, .. })
        ));
    }

    #[test]
    fn test_duplicate_node() {
        let raw = json!({
            "nodes": [{ "id": "a", "name": "A" }, { "id": "a", "name": "Again" }],
            "links": []
        });
        assert_eq!(
            validate(&raw),
            Err(SchemaError::DuplicateNode { id: "a".to_string() })
        );
    }

    #[test]
    fn test_self_loop_and_parallel_links_allowed() {
        let raw = json!({
            "nodes": [{ "id": "a", "name": "A" }, { "id": "b", "name": "B" }],
            "links": [
                { "source": "a", "target": "a" },
                { "source": "a", "target": "b", "description": "causes" },
                { "source": "a", "target": "b", "description": "limits" }
            ]
        });
        let graph = validate(&raw).unwrap();
        assert!(graph.links[0].is_self_loop());
        assert_eq!(graph.links.len(), 3);
    }

    #[test]
    fn test_empty_description_is_kept() {
        let graph = GraphDocument::new(
            vec![GraphNode::new("a", "A").with_description("")],
            vec![GraphLink::new("a", "a").with_description("")],
        );
        let raw: Value = serde_json::from_str(&serialize_graph(&graph)).unwrap();
        assert_eq!(validate(&raw).unwrap(), graph);
    }

    fn arb_graph() -> impl Strategy<Value = GraphDocument> {
        let node = ("[a-z]{1,6}", ".*", prop::option::of(0u32..16), prop::option::of(".*"));
        prop::collection::vec(node, 1..8)
            .prop_flat_map(|specs| {
                let nodes: Vec<GraphNode> = specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (prefix, name, group, description))| GraphNode {
                        id: format!("{}_{}", prefix, i),
                        name,
                        group,
                        description,
                    })
                    .collect();
                let count = nodes.len();
                let links =
                    prop::collection::vec((0..count, 0..count, prop::option::of(".*")), 0..12);
                (Just(nodes), links)
            })
            .prop_map(|(nodes, links)| {
                let links = links
                    .into_iter()
                    .map(|(source, target, description)| GraphLink {
                        source: nodes[source].id.clone(),
                        target: nodes[target].id.clone(),
                        description,
                    })
                    .collect();
                GraphDocument::new(nodes, links)
            })
    }

    proptest! {
        #[test]
        fn prop_serialize_then_validate_is_identity(graph in arb_graph()) {
            let raw: Value = serde_json::from_str(&serialize_graph(&graph)).unwrap();
            prop_assert_eq!(validate(&raw).unwrap(), graph);
        }
    }

    #[test]
    fn test_validate_prior() {
        assert_eq!(validate_prior(&json!({})), Ok(None));
        assert_eq!(validate_prior(&Value::Null), Ok(None));
        let empty = validate_prior(&json!({ "nodes": [], "links": [] })).unwrap();
        assert_eq!(empty, Some(GraphDocument::default()));
    }

    #[test]
    fn test_check_superset() {
        let prior = validate(&traffic()).unwrap();
        let mut next = prior.clone();
        next.nodes.push(GraphNode::new("extra", "Extra"));
        assert!(check_superset(&prior, &next).is_ok());

        next.nodes.retain(|n| n.id != "technology");
        assert_eq!(
            check_superset(&prior, &next),
            Err(SchemaError::NotSuperset {
                missing: vec!["technology".to_string()]
            })
        );
    }
}
