//! Weight functions: `Node -> f64` scores.

use itertools::Itertools;

use crate::domain::node::{Node, Nodes};
use crate::domain::normalizer::Normalizer;

/// Raw capacity as a weight.
pub fn capacity_weight(node: &Node) -> f64 {
    node.capacity
}

/// Raw price as a weight.
pub fn price_weight(node: &Node) -> f64 {
    node.price
}

/// Product of normalized capacity and normalized price.
///
/// A node weak on either axis scores low regardless of the other.
pub fn composite_weight<C, P>(capacity_norm: C, price_norm: P) -> impl Fn(&Node) -> f64
where
    C: Normalizer,
    P: Normalizer,
{
    move |node: &Node| {
        capacity_norm.normalize(capacity_weight(node)) * price_norm.normalize(price_weight(node))
    }
}

/// Nodes ordered by descending score; equal scores keep their input order.
pub fn rank_nodes<F>(nodes: &[Node], weight_fn: F) -> Nodes
where
    F: Fn(&Node) -> f64,
{
    nodes
        .iter()
        .map(|node| (weight_fn(node), *node))
        .sorted_by(|(a, _), (b, _)| b.total_cmp(a))
        .map(|(_, node)| node)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::normalizer::{MaxNorm, SigmoidNorm};

    #[test]
    fn given_equal_scores_when_ranking_then_keeps_input_order() {
        let nodes = vec![Node::new(1, 2.0, 1.0), Node::new(2, 2.0, 1.0), Node::new(3, 5.0, 1.0)];
        let ranked = rank_nodes(&nodes, capacity_weight);
        let ids: Vec<u64> = ranked.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn given_composite_when_either_factor_is_zero_then_score_is_zero() {
        let wf = composite_weight(SigmoidNorm::new(1.0), MaxNorm::new(0.0));
        assert_eq!(wf(&Node::new(0, 100.0, 5.0)), 0.0);
    }
}
