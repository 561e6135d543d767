//! Topology description files: buckets addressed by path, each with its nodes.
//!
//! ```toml
//! [[bucket]]
//! path = "/region:eu/rack:1"
//! nodes = [{ id = 1, capacity = 10.0, price = 2.0 }]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{BucketTree, Nodes};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyEntry {
    pub path: String,
    #[serde(default)]
    pub nodes: Nodes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(rename = "bucket", default)]
    pub buckets: Vec<TopologyEntry>,
}

impl Topology {
    pub fn from_toml_str(content: &str) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Topology {
            message: e.to_string(),
        })
    }

    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = fs::read_to_string(path).with_path_context("read topology", path)?;
        let topology = Self::from_toml_str(&content)?;
        debug!(buckets = topology.buckets.len(), "topology loaded");
        Ok(topology)
    }

    /// Insert every entry in file order, then flatten.
    #[instrument(level = "debug", skip(self))]
    pub fn build_tree(&self) -> ApplicationResult<BucketTree> {
        if self.buckets.is_empty() {
            return Err(ApplicationError::Topology {
                message: "no buckets defined".to_string(),
            });
        }
        let mut tree = BucketTree::new();
        for entry in &self.buckets {
            tree.add_bucket(&entry.path, entry.nodes.clone())?;
        }
        tree.fill_nodes();
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    #[test]
    fn given_integer_attributes_when_parsing_then_reads_as_numbers() {
        let topology = Topology::from_toml_str(
            r#"
[[bucket]]
path = "/opt:first"
nodes = [{ id = 0, capacity = 1, price = 2 }]
"#,
        )
        .unwrap();
        assert_eq!(topology.buckets[0].nodes[0].price, 2.0);
    }

    #[test]
    fn given_malformed_path_when_building_then_returns_domain_error() {
        let topology = Topology {
            buckets: vec![TopologyEntry {
                path: "/opt".into(),
                nodes: vec![],
            }],
        };
        let err = topology.build_tree().unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::InvalidSegment { .. })
        ));
    }

    #[test]
    fn given_empty_topology_when_building_then_errors() {
        assert!(Topology::default().build_tree().is_err());
    }
}
