//! Assembles message records into a node/link graph for
//! force-directed rendering.
//!
//! Every message becomes its own mail node. People are deduplicated
//! by email so each address appears exactly once no matter how many
//! messages reference it. Node indices are positions in `nodes`,
//! assigned in order of first appearance.
//!
//! Links are asymmetric: a mail node points at its author while each
//! receiver points at the mail node. The renderer depends on this
//! direction.
use std::collections::HashMap;

use serde::Serialize;

use crate::mail::{MessageRecord, mail_title};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Mail,
    Person,
}

impl NodeKind {
    /// Single letter group used by the renderer for coloring
    pub const fn group(self) -> &'static str {
        match self {
            NodeKind::Mail => "M",
            NodeKind::Person => "P",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum RelationKind {
    /// Mail to author
    #[default]
    None,
    /// Receiver to mail
    #[serde(rename = "relationship type")]
    Received,
}

impl RelationKind {
    pub fn is_none(&self) -> bool {
        matches!(self, RelationKind::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    #[serde(skip)]
    pub index: usize,
    #[serde(rename = "subject")]
    pub display_label: String,
    #[serde(rename = "label")]
    pub kind: NodeKind,
    #[serde(rename = "group")]
    pub group_tag: &'static str,
}

impl GraphNode {
    fn new(index: usize, display_label: String, kind: NodeKind) -> Self {
        Self {
            index,
            display_label,
            kind,
            group_tag: kind.group(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    #[serde(rename = "source")]
    pub source_index: usize,
    #[serde(rename = "target")]
    pub target_index: usize,
    #[serde(rename = "type", skip_serializing_if = "RelationKind::is_none")]
    pub relation_kind: RelationKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphEdge>,
}

impl Graph {
    pub fn mail_count(&self) -> usize {
        self.count_kind(NodeKind::Mail)
    }

    pub fn person_count(&self) -> usize {
        self.count_kind(NodeKind::Person)
    }

    fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }
}

/// Build the graph for `records`, in order.
pub fn assemble_graph(records: &[MessageRecord]) -> Graph {
    let mut graph = Graph::default();
    // Person email to node index
    let mut people: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let mail_index = graph.nodes.len();
        graph.nodes.push(GraphNode::new(
            mail_index,
            mail_title(Some(record)),
            NodeKind::Mail,
        ));

        let participants =
            std::iter::once(&record.author_email).chain(record.receiver_emails.iter());
        for (position, email) in participants.enumerate() {
            let person_index = *people.entry(email.as_str()).or_insert_with(|| {
                let index = graph.nodes.len();
                graph
                    .nodes
                    .push(GraphNode::new(index, email.clone(), NodeKind::Person));
                index
            });

            let edge = if position == 0 {
                GraphEdge {
                    source_index: mail_index,
                    target_index: person_index,
                    relation_kind: RelationKind::None,
                }
            } else {
                GraphEdge {
                    source_index: person_index,
                    target_index: mail_index,
                    relation_kind: RelationKind::Received,
                }
            };
            graph.links.push(edge);
        }
    }

    graph
}
