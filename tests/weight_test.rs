//! Tests for composite weight functions and node ranking

use netmap::domain::{
    capacity_weight, composite_weight, price_weight, rank_nodes, Aggregator, BucketTree, MeanAgg,
    MinAgg, Node, ReverseMinNorm, SigmoidNorm,
};
use rstest::{fixture, rstest};

#[fixture]
fn tree() -> BucketTree {
    let mut tree = BucketTree::new();
    tree.add_bucket("/opt:first", vec![Node::new(0, 1.0, 2.0), Node::new(2, 3.0, 2.0)])
        .unwrap();
    tree.add_bucket(
        "/opt:second/sub:1",
        vec![Node::new(1, 2.0, 3.0), Node::new(10, 6.0, 1.0)],
    )
    .unwrap();
    tree.fill_nodes();
    tree
}

#[rstest]
fn given_global_references_when_ranking_by_composite_then_fixed_order(tree: BucketTree) {
    let mean_capacity = tree.traverse_root(&mut MeanAgg::new(), capacity_weight).compute();
    let min_price = tree.traverse_root(&mut MinAgg::new(), price_weight).compute();
    let wf = composite_weight(SigmoidNorm::new(mean_capacity), ReverseMinNorm::new(min_price));

    let nodes = tree.bucket(tree.root()).unwrap().nodes().to_vec();
    let ranked = rank_nodes(&nodes, &wf);

    assert_eq!(
        ranked,
        vec![
            Node::new(10, 6.0, 1.0),
            Node::new(2, 3.0, 2.0),
            Node::new(1, 2.0, 3.0),
            Node::new(0, 1.0, 2.0),
        ]
    );
}

#[test]
fn given_composite_when_scoring_then_multiplies_normalized_factors() {
    let wf = composite_weight(SigmoidNorm::new(3.0), ReverseMinNorm::new(1.0));

    // 3/(3+3) * 1/2
    assert!((wf(&Node::new(2, 3.0, 2.0)) - 0.25).abs() < 1e-12);
    // 6/(6+3) * 1/1
    assert!((wf(&Node::new(10, 6.0, 1.0)) - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn given_strong_on_one_axis_only_when_scoring_then_balanced_node_wins() {
    let wf = composite_weight(SigmoidNorm::new(10.0), ReverseMinNorm::new(1.0));
    let huge_but_pricey = Node::new(1, 1000.0, 50.0);
    let balanced = Node::new(2, 10.0, 1.0);
    assert!(wf(&balanced) > wf(&huge_but_pricey));
}
