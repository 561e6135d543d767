//! Text rendering of a weighted bucket tree.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::arena::{Bucket, BucketTree};

pub trait BucketTreeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

fn describe(bucket: &Bucket) -> String {
    let label = bucket
        .label()
        .map(|segment| segment.to_string())
        .unwrap_or_else(|| "/".to_string());
    let weight = bucket
        .weight()
        .map(|w| format!("{:.4}", w))
        .unwrap_or_else(|| "-".to_string());
    format!("{} weight={} nodes={}", label, weight, bucket.nodes().len())
}

impl BucketTreeConvert for BucketTree {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(tree: &BucketTree, idx: Index) -> Tree<String> {
            let label = tree.bucket(idx).map(describe).unwrap_or_default();
            let leaves: Vec<_> = tree
                .children(idx)
                .iter()
                .map(|&child| build_tree(tree, child))
                .collect();
            Tree::new(label).with_leaves(leaves)
        }

        build_tree(self, self.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregator::AggregatorFactory;
    use crate::domain::node::Node;
    use crate::domain::weight::capacity_weight;

    #[test]
    fn given_weighted_tree_when_rendering_then_lists_every_bucket() {
        let mut tree = BucketTree::new();
        tree.add_bucket("/rack:a", vec![Node::new(1, 2.0, 1.0)]).unwrap();
        tree.add_bucket("/rack:b", vec![Node::new(2, 4.0, 1.0)]).unwrap();
        tree.fill_nodes();
        tree.traverse_tree(&AggregatorFactory::mean(), capacity_weight);

        let rendered = tree.to_tree_string().to_string();
        assert!(rendered.contains("/ weight=3.0000 nodes=2"));
        assert!(rendered.contains("rack:a weight=2.0000 nodes=1"));
        assert!(rendered.contains("rack:b weight=4.0000 nodes=1"));
    }
}
