//! Graph export of the current link set.

use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use serde::{Deserialize, Serialize};

use crate::manager::RelationshipManager;
use crate::path::NormalizedPath;

/// A classified known path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkNode {
    pub full_path: String,
    pub type_name: String,
    pub icon: String,
}

impl RelationshipManager {
    /// Convert the known paths and their links into a petgraph `StableDiGraph`.
    ///
    /// Nodes are classified known paths; edges point from a path to each file
    /// it links to, labelled with the target type name.
    pub fn to_petgraph(
        &self,
    ) -> (
        StableDiGraph<LinkNode, String>,
        HashMap<NormalizedPath, NodeIndex>,
    ) {
        let mut graph = StableDiGraph::new();
        let mut path_to_index = HashMap::new();

        // Add all nodes
        for path in self.known_paths() {
            let Some(metadata) = self.classify(path) else {
                continue;
            };
            let icon = self
                .matcher(&metadata.file_type)
                .map(|m| m.icon().to_string())
                .unwrap_or_default();
            let idx = graph.add_node(LinkNode {
                full_path: path.to_string(),
                type_name: metadata.file_type.clone(),
                icon,
            });
            path_to_index.insert(NormalizedPath::new(path), idx);
        }

        // Add all edges
        for path in self.known_paths() {
            let Some(&from_idx) = path_to_index.get(&NormalizedPath::new(path)) else {
                continue;
            };
            for record in self.get_linked_files(path) {
                if let Some(&to_idx) = path_to_index.get(&NormalizedPath::new(&record.full_path)) {
                    graph.add_edge(from_idx, to_idx, record.type_name);
                }
            }
        }

        (graph, path_to_index)
    }
}
