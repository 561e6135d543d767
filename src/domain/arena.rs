//! Arena-backed bucket tree mirroring the network topology.
//!
//! A bucket is either a *leaf group* (nodes, no children) or an *internal group*
//! (children, no directly resident nodes); [`BucketTree::add_bucket`] refuses to mix
//! the two. Internal groups see their descendants' nodes only after
//! [`BucketTree::fill_nodes`].
//!
//! Weights are written only by [`BucketTree::traverse_tree`]. The tree does no locking:
//! callers running traversals from several threads must serialize them.

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::aggregator::{Aggregator, AggregatorFactory};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{Node, Nodes};
use crate::domain::path::{BucketPath, Segment};

/// One level of the topology: a region, a rack, a leaf group of nodes...
#[derive(Debug, Clone)]
pub struct Bucket {
    /// `key:value` this bucket was created for, None for the root
    label: Option<Segment>,
    /// Nodes inserted directly into this bucket
    own_nodes: Nodes,
    /// Own nodes followed by every descendant's nodes, in child order
    nodes: Nodes,
    parent: Option<Index>,
    children: Vec<Index>,
    /// Undefined until the first hierarchical traversal
    weight: Option<f64>,
}

impl Bucket {
    fn new(label: Option<Segment>, parent: Option<Index>) -> Self {
        Self {
            label,
            own_nodes: Vec::new(),
            nodes: Vec::new(),
            parent,
            children: Vec::new(),
            weight: None,
        }
    }

    pub fn label(&self) -> Option<&Segment> {
        self.label.as_ref()
    }

    pub fn own_nodes(&self) -> &[Node] {
        &self.own_nodes
    }

    /// Flattened node list as of the last [`BucketTree::fill_nodes`].
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight
    }

    pub fn is_leaf_group(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct BucketTree {
    arena: Arena<Bucket>,
    root: Index,
}

impl Default for BucketTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BucketTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Bucket::new(None, None));
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn bucket(&self, idx: Index) -> Option<&Bucket> {
        self.arena.get(idx)
    }

    pub fn weight(&self, idx: Index) -> Option<f64> {
        self.arena.get(idx).and_then(Bucket::weight)
    }

    pub fn children(&self, idx: Index) -> &[Index] {
        self.arena
            .get(idx)
            .map(|bucket| bucket.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of buckets, root included.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena[self.root].children.is_empty() && self.arena[self.root].own_nodes.is_empty()
    }

    fn child_with_label(&self, idx: Index, segment: &Segment) -> Option<Index> {
        self.children(idx)
            .iter()
            .copied()
            .find(|&child| self.arena[child].label.as_ref() == Some(segment))
    }

    /// Bucket addressed by `path`, if it exists.
    pub fn find(&self, path: &str) -> DomainResult<Option<Index>> {
        let path = BucketPath::parse(path)?;
        let mut current = self.root;
        for segment in path.segments() {
            match self.child_with_label(current, segment) {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Canonical path of a bucket, `/` for the root.
    pub fn path_of(&self, idx: Index) -> Option<String> {
        let mut labels = Vec::new();
        let mut current = self.arena.get(idx)?;
        while let Some(label) = &current.label {
            labels.push(label.to_string());
            current = &self.arena[current.parent?];
        }
        if labels.is_empty() {
            return Some("/".to_string());
        }
        labels.reverse();
        Some(format!("/{}", labels.join("/")))
    }

    /// Insert `nodes` into the bucket at `path`, creating missing buckets on the way.
    ///
    /// The tree is left untouched when an error is returned. Flattened node lists are
    /// stale after insertion until [`BucketTree::fill_nodes`] runs again.
    #[instrument(level = "debug", skip(self, nodes), fields(node_count = nodes.len()))]
    pub fn add_bucket(&mut self, path: &str, nodes: Nodes) -> DomainResult<Index> {
        let parsed = BucketPath::parse(path)?;
        for node in &nodes {
            node.validate()?;
        }

        // Walk existing buckets; validate the first missing step before mutating.
        let mut current = self.root;
        let mut depth = 0;
        for segment in parsed.segments() {
            match self.child_with_label(current, segment) {
                Some(child) => {
                    current = child;
                    depth += 1;
                }
                None => break,
            }
        }

        let missing = &parsed.segments()[depth..];
        if let Some(first) = missing.first() {
            let parent = &self.arena[current];
            if !parent.own_nodes.is_empty() {
                return Err(DomainError::MixedBucket {
                    path: path.to_string(),
                });
            }
            if let Some(sibling) = parent.children.first() {
                if let Some(label) = &self.arena[*sibling].label {
                    if label.key != first.key {
                        return Err(DomainError::ConflictingKey {
                            path: path.to_string(),
                            expected: label.key.clone(),
                            found: first.key.clone(),
                        });
                    }
                }
            }
        } else if !nodes.is_empty() && !self.arena[current].children.is_empty() {
            return Err(DomainError::MixedBucket {
                path: path.to_string(),
            });
        }

        for segment in missing {
            let child = self
                .arena
                .insert(Bucket::new(Some(segment.clone()), Some(current)));
            self.arena[current].children.push(child);
            current = child;
        }

        self.arena[current].own_nodes.extend(nodes);
        debug!(created = missing.len(), "bucket {} updated", parsed);
        Ok(current)
    }

    /// Flatten every descendant's nodes into each ancestor, bottom-up.
    ///
    /// Recomputed from directly inserted nodes each time, so repeated calls without
    /// mutation produce identical lists.
    #[instrument(level = "debug", skip(self))]
    pub fn fill_nodes(&mut self) {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let bucket = &self.arena[idx];
            let mut nodes = bucket.own_nodes.clone();
            for &child in &bucket.children {
                nodes.extend_from_slice(&self.arena[child].nodes);
            }
            self.arena[idx].nodes = nodes;
        }
    }

    /// Feed `weight_fn(node)` for every flattened node of `idx` into `aggregator`.
    ///
    /// Returns the same aggregator so the caller can `compute()` it. Unknown indices
    /// leave the aggregator untouched.
    pub fn traverse<'a, A, F>(&self, idx: Index, aggregator: &'a mut A, weight_fn: F) -> &'a mut A
    where
        A: Aggregator + ?Sized,
        F: Fn(&Node) -> f64,
    {
        if let Some(bucket) = self.arena.get(idx) {
            for node in &bucket.nodes {
                aggregator.add(weight_fn(node));
            }
        }
        aggregator
    }

    /// [`BucketTree::traverse`] over the whole tree.
    pub fn traverse_root<'a, A, F>(&self, aggregator: &'a mut A, weight_fn: F) -> &'a mut A
    where
        A: Aggregator + ?Sized,
        F: Fn(&Node) -> f64,
    {
        self.traverse(self.root, aggregator, weight_fn)
    }

    /// Fill every bucket's weight bottom-up.
    ///
    /// Leaf groups aggregate `weight_fn` over their own nodes; internal groups aggregate
    /// their children's finished weights. Every bucket gets a fresh aggregator from
    /// `factory`. Previous weights are overwritten.
    #[instrument(level = "debug", skip(self, factory, weight_fn))]
    pub fn traverse_tree<F>(&mut self, factory: &AggregatorFactory, weight_fn: F)
    where
        F: Fn(&Node) -> f64,
    {
        let order: Vec<Index> = self.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let mut aggregator = factory.create();
            let bucket = &self.arena[idx];
            if bucket.children.is_empty() {
                for node in &bucket.own_nodes {
                    aggregator.add(weight_fn(node));
                }
            } else {
                for &child in &bucket.children {
                    aggregator.add(self.arena[child].weight.unwrap_or(0.0));
                }
            }
            let weight = aggregator.compute();
            self.arena[idx].weight = Some(weight);
        }
        debug!(root_weight = ?self.arena[self.root].weight, "weights rolled up");
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Number of levels, 1 for a lone root.
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, idx: Index) -> usize {
        1 + self
            .children(idx)
            .iter()
            .map(|&child| self.calculate_depth(child))
            .max()
            .unwrap_or(0)
    }

    /// Buckets without children, left to right.
    pub fn leaf_groups(&self) -> Vec<Index> {
        self.iter()
            .filter(|(_, bucket)| bucket.is_leaf_group())
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Pre-order, left-to-right.
pub struct TreeIterator<'a> {
    tree: &'a BucketTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a BucketTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a Bucket);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let bucket = self.tree.bucket(current)?;
        // Reverse push keeps left-to-right order
        self.stack.extend(bucket.children.iter().rev().copied());
        Some((current, bucket))
    }
}

/// Children before parents, left-to-right.
pub struct PostOrderIterator<'a> {
    tree: &'a BucketTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a BucketTree) -> Self {
        Self {
            tree,
            stack: vec![(tree.root, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a Bucket);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(bucket) = self.tree.bucket(current) {
                if visited {
                    return Some((current, bucket));
                }
                self.stack.push((current, true));
                for &child in bucket.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
