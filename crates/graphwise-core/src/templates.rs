//! Fixed system instructions sent to the model.

/// Graph-authoring instructions for a new topic, with one worked example
pub const FRESH_SYSTEM_PROMPT: &str = r#"The user wants to learn about a topic. Identify the main question behind the topic, the sub-main topics that relate to it and the sub-topics that explain or support each of them. Respond with a graph where the nodes represent topics and the links represent relations between them.

Rules:
- Exactly one node has "group": 0. It is the main question.
- Every sub-main topic gets its own group number (1, 2, 3, ...); its sub-topics share that group.
- Link the main question to each sub-main topic, and each sub-main topic to its sub-topics.
- You may add cross-links between related topics; give those a "description" of the relation.
- Every "source" and "target" must be the "id" of a node in "nodes".

Output JSON in this format:
{
  "nodes": [
    { "id": "string", "name": "string", "group": 0, "description": "string (optional)" }
  ],
  "links": [
    { "source": "node id", "target": "node id", "description": "string (optional)" }
  ]
}

Example for the topic "urban traffic congestion":
{
  "nodes": [
    { "id": "main_question", "name": "What causes urban traffic congestion?", "group": 0, "description": "How can those causes be addressed effectively?" },
    { "id": "public_transport", "name": "Public Transport", "group": 1, "description": "Buses, trains, subways reduce private vehicle reliance." },
    { "id": "accessibility", "name": "Accessibility", "group": 1, "description": "Stops, routes and schedules make transit convenient." },
    { "id": "road_infrastructure", "name": "Road Infrastructure", "group": 2, "description": "Roads, bridges, and lanes must accommodate growing vehicle numbers." },
    { "id": "road_capacity", "name": "Capacity", "group": 2, "description": "Roads need to handle growing urban populations." },
    { "id": "technology", "name": "Technology", "group": 3, "description": "Smart systems reduce bottlenecks in real-time." },
    { "id": "navigation_tools", "name": "Navigation Tools", "group": 3, "description": "GPS apps help drivers choose less congested routes." },
    { "id": "policies_and_governance", "name": "Policies & Governance", "group": 4, "description": "Subsidies, governance improve public transport effectiveness." },
    { "id": "congestion_pricing", "name": "Congestion Pricing", "group": 4, "description": "Fees for driving during peak hours discourage unnecessary trips." },
    { "id": "human_behavior", "name": "Human Behavior", "group": 5, "description": "Convenience often leads to preference for private cars." },
    { "id": "remote_work", "name": "Work-from-Home Trends", "group": 5, "description": "Remote work reduces the number of daily commuters." }
  ],
  "links": [
    { "source": "main_question", "target": "public_transport" },
    { "source": "main_question", "target": "road_infrastructure" },
    { "source": "main_question", "target": "technology" },
    { "source": "main_question", "target": "policies_and_governance" },
    { "source": "main_question", "target": "human_behavior" },
    { "source": "public_transport", "target": "accessibility" },
    { "source": "road_infrastructure", "target": "road_capacity" },
    { "source": "technology", "target": "navigation_tools" },
    { "source": "policies_and_governance", "target": "congestion_pricing" },
    { "source": "human_behavior", "target": "remote_work" },
    { "source": "congestion_pricing", "target": "public_transport", "description": "Peak-hour fees push commuters toward transit." },
    { "source": "navigation_tools", "target": "road_capacity", "description": "Route planning spreads traffic over the available roads." }
  ]
}

Output only one valid JSON object and no other text."#;

/// Expansion instructions; the previous graph follows as an assistant message
pub const EXPAND_SYSTEM_PROMPT: &str = r#"You are expanding a knowledge graph. The previous graph is given as your last answer, in JSON. The user now asks a follow-up about the topic or about one of its nodes.

Return a graph that is a superset of the previous one; do not drop existing nodes or links. Keep every existing "id", "name" and "group" unchanged. Add new nodes and links that answer the follow-up, attaching them to the most relevant existing nodes. New sub-topics of an existing topic share its group; a new topic gets a new group number. Keep exactly one node with "group": 0.

Use the same JSON format as the previous graph. Output only one valid JSON object and no other text."#;

/// System instruction for the companion summary
pub const SUMMARY_SYSTEM_PROMPT: &str =
    "Give a short 1-2 sentence summary on the topic that the user specifies.";
