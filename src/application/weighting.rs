//! Weighting pipeline: reference statistics, composite weight function, rollup.

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::WeightingConfig;
use crate::domain::{
    capacity_weight, composite_weight, price_weight, rank_nodes, Aggregator, AggregatorFactory,
    BucketTree, Node, Nodes,
};

/// Reference statistics and resulting root weight of one rollup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightReport {
    /// Statistic parameterizing the capacity normalizer
    pub capacity_reference: f64,
    /// Statistic parameterizing the price normalizer
    pub price_reference: f64,
    pub root_weight: f64,
    pub buckets: usize,
}

#[derive(Debug, Clone)]
pub struct WeightingService {
    config: WeightingConfig,
}

impl WeightingService {
    pub fn new(config: WeightingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WeightingConfig {
        &self.config
    }

    fn validate(&self) -> ApplicationResult<()> {
        if !self.config.iqr_k.is_finite() {
            return Err(ApplicationError::Config {
                message: format!("iqr_k must be finite, got {}", self.config.iqr_k),
            });
        }
        Ok(())
    }

    /// Capacity and price references over the whole (flattened) tree.
    pub fn reference_statistics(&self, tree: &BucketTree) -> (f64, f64) {
        let mut capacity = self.config.capacity_norm.reference_aggregator();
        let mut price = self.config.price_norm.reference_aggregator();
        let capacity_reference = tree
            .traverse_root(capacity.as_mut(), capacity_weight)
            .compute();
        let price_reference = tree.traverse_root(price.as_mut(), price_weight).compute();
        (capacity_reference, price_reference)
    }

    /// Composite weight function parameterized by `tree`'s reference statistics.
    pub fn build_weight_fn(&self, tree: &BucketTree) -> impl Fn(&Node) -> f64 {
        let (capacity_reference, price_reference) = self.reference_statistics(tree);
        self.weight_fn_for(capacity_reference, price_reference)
    }

    fn weight_fn_for(&self, capacity_reference: f64, price_reference: f64) -> impl Fn(&Node) -> f64 {
        debug!(
            capacity_norm = %self.config.capacity_norm,
            capacity_reference,
            price_norm = %self.config.price_norm,
            price_reference,
            "weight function parameters"
        );
        composite_weight(
            self.config.capacity_norm.build(capacity_reference),
            self.config.price_norm.build(price_reference),
        )
    }

    /// Flatten `tree`, derive the composite weight function and roll weights up.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn apply(&self, tree: &mut BucketTree) -> ApplicationResult<WeightReport> {
        self.validate()?;
        tree.fill_nodes();

        let (capacity_reference, price_reference) = self.reference_statistics(tree);
        let weight_fn = self.weight_fn_for(capacity_reference, price_reference);
        let factory = AggregatorFactory::from_kind(self.config.rollup, self.config.iqr_k);
        tree.traverse_tree(&factory, weight_fn);

        let report = WeightReport {
            capacity_reference,
            price_reference,
            root_weight: tree.weight(tree.root()).unwrap_or(0.0),
            buckets: tree.len(),
        };
        info!(
            rollup = %self.config.rollup,
            root_weight = report.root_weight,
            "bucket weights computed"
        );
        Ok(report)
    }

    /// Every node of the tree, best composite score first.
    pub fn rank(&self, tree: &mut BucketTree) -> ApplicationResult<Nodes> {
        self.validate()?;
        tree.fill_nodes();
        let weight_fn = self.build_weight_fn(tree);
        let nodes = tree
            .bucket(tree.root())
            .map(|root| root.nodes().to_vec())
            .unwrap_or_default();
        Ok(rank_nodes(&nodes, weight_fn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AggregatorKind, NormalizerKind};

    fn tree() -> BucketTree {
        let mut tree = BucketTree::new();
        tree.add_bucket("/opt:first", vec![Node::new(0, 1.0, 2.0), Node::new(2, 3.0, 2.0)])
            .unwrap();
        tree.add_bucket("/opt:second/sub:1", vec![Node::new(1, 2.0, 3.0), Node::new(10, 6.0, 1.0)])
            .unwrap();
        tree
    }

    #[test]
    fn given_default_config_when_applying_then_references_are_mean_capacity_and_min_price() {
        let service = WeightingService::new(WeightingConfig::default());
        let mut tree = tree();
        let report = service.apply(&mut tree).unwrap();
        assert_eq!(report.capacity_reference, 3.0);
        assert_eq!(report.price_reference, 1.0);
        assert_eq!(report.buckets, 4);
        // first: mean(0.125, 0.25); second: sub:1 = mean(0.1333, 0.6667)
        assert!((report.root_weight - (0.1875 + 0.4) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn given_max_rollup_when_applying_then_root_holds_best_leaf_group() {
        let service = WeightingService::new(WeightingConfig {
            capacity_norm: NormalizerKind::Max,
            price_norm: NormalizerKind::ReverseMin,
            rollup: AggregatorKind::Max,
            iqr_k: 1.5,
        });
        let mut tree = tree();
        let report = service.apply(&mut tree).unwrap();
        assert_eq!(report.root_weight, 1.0);
    }

    #[test]
    fn given_non_finite_k_when_applying_then_config_error() {
        let service = WeightingService::new(WeightingConfig {
            iqr_k: f64::NAN,
            ..WeightingConfig::default()
        });
        assert!(matches!(
            service.apply(&mut tree()),
            Err(ApplicationError::Config { .. })
        ));
    }
}
