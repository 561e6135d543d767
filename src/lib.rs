//! Node weighting for topology-aware placement.
//!
//! Nodes live in a bucket tree mirroring the network topology (region → rack → node).
//! Raw attributes are normalized against reference statistics, combined into one score
//! per node, and rolled up so every bucket carries a representative weight.
//!
//! ```
//! use netmap::domain::{capacity_weight, Aggregator, AggregatorFactory, BucketTree, MeanAgg, Node};
//!
//! let mut tree = BucketTree::new();
//! tree.add_bucket("/rack:a", vec![Node::new(0, 1.0, 2.0), Node::new(1, 3.0, 2.0)])?;
//! tree.add_bucket("/rack:b", vec![Node::new(2, 2.0, 3.0), Node::new(3, 6.0, 1.0)])?;
//! tree.fill_nodes();
//!
//! let mean = tree.traverse_root(&mut MeanAgg::new(), capacity_weight).compute();
//! assert_eq!(mean, 3.0);
//!
//! tree.traverse_tree(&AggregatorFactory::mean(), capacity_weight);
//! assert_eq!(tree.weight(tree.root()), Some(3.0));
//! # Ok::<(), netmap::domain::DomainError>(())
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;
