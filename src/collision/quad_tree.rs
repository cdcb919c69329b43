//! Quad-tree broad phase
//!
//! Nodes live in a flat `Vec` and refer to their children by index, so
//! clearing the tree is a truncate back to the root. An entry is pushed
//! down only while its bounds overlap exactly one child; straddling entries
//! stay at the node where they stopped.

use crate::collision::aabb::AABB;
use crate::collision::pair::ColliderPair;
use crate::math::vec2::Vec2;
use crate::storage::handle::ColliderRef;
use serde::{Deserialize, Serialize};

const ROOT: usize = 0;

/// Which entries `query_pairs` pairs with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairingMode {
    /// Only entries stored at the same node. Entries that straddle a split
    /// and stay at an ancestor are never paired with entries deeper down.
    #[default]
    SameNode,
    /// Same-node pairs plus every entry against all entries of its ancestors.
    IncludeAncestors,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    pub max_depth: usize,
    /// Entries a leaf holds before it subdivides
    pub node_capacity: usize,
    pub pairing: PairingMode,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            node_capacity: 16,
            pairing: PairingMode::SameNode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadEntry {
    pub collider: ColliderRef,
    pub bounds: AABB,
}

#[derive(Debug, Clone)]
pub struct QuadNode {
    pub boundary: AABB,
    pub depth: usize,
    /// Either no children (leaf) or all four quadrants, see [`AABB::quadrants`]
    pub children: Option<[usize; 4]>,
    pub entries: Vec<QuadEntry>,
}

impl QuadNode {
    fn new(boundary: AABB, depth: usize) -> Self {
        Self {
            boundary,
            depth,
            children: None,
            entries: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct QuadTree {
    config: QuadTreeConfig,
    nodes: Vec<QuadNode>,
    len: usize,
}

impl QuadTree {
    pub fn new(boundary: AABB, config: QuadTreeConfig) -> Self {
        Self {
            config,
            nodes: vec![QuadNode::new(boundary, 0)],
            len: 0,
        }
    }

    pub fn config(&self) -> &QuadTreeConfig {
        &self.config
    }

    pub fn boundary(&self) -> AABB {
        self.nodes[ROOT].boundary
    }

    /// Replaces the root boundary. Drops every entry.
    pub fn set_boundary(&mut self, boundary: AABB) {
        self.clear();
        self.nodes[ROOT].boundary = boundary;
    }

    pub fn set_pairing(&mut self, pairing: PairingMode) {
        self.config.pairing = pairing;
    }

    /// Number of inserted entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes, root first. Read-only view for debug drawing.
    pub fn nodes(&self) -> &[QuadNode] {
        &self.nodes
    }

    /// Drops all children and entries, keeping the root boundary.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        let root = &mut self.nodes[ROOT];
        root.children = None;
        root.entries.clear();
        self.len = 0;
    }

    pub fn insert(&mut self, bounds: AABB, collider: ColliderRef) {
        self.len += 1;
        self.insert_at(ROOT, QuadEntry { collider, bounds });
    }

    /// Candidate pairs according to the configured [`PairingMode`].
    pub fn query_pairs(&self) -> Vec<ColliderPair> {
        let mut pairs = Vec::new();
        let mut ancestors: Vec<usize> = Vec::with_capacity(self.config.max_depth + 1);
        self.collect_pairs(ROOT, &mut ancestors, &mut pairs);
        pairs
    }

    /// Index of the node holding `collider`, if inserted.
    pub fn node_of(&self, collider: ColliderRef) -> Option<usize> {
        self.nodes
            .iter()
            .position(|n| n.entries.iter().any(|e| e.collider == collider))
    }

    fn insert_at(&mut self, mut node: usize, entry: QuadEntry) {
        loop {
            match self.nodes[node].children {
                Some(children) => match self.single_child(&children, &entry.bounds) {
                    Some(child) => node = child,
                    None => {
                        self.nodes[node].entries.push(entry);
                        return;
                    }
                },
                None => {
                    let leaf = &mut self.nodes[node];
                    leaf.entries.push(entry);
                    if leaf.entries.len() > self.config.node_capacity
                        && leaf.depth < self.config.max_depth
                    {
                        self.subdivide(node);
                    }
                    return;
                }
            }
        }
    }

    /// The only child whose rectangle overlaps `bounds`, if exactly one does.
    fn single_child(&self, children: &[usize; 4], bounds: &AABB) -> Option<usize> {
        let mut found = None;
        for &child in children {
            if self.nodes[child].boundary.overlaps(bounds) {
                if found.is_some() {
                    return None;
                }
                found = Some(child);
            }
        }
        found
    }

    fn subdivide(&mut self, node: usize) {
        let depth = self.nodes[node].depth + 1;
        let quadrants = self.nodes[node].boundary.quadrants();
        let first = self.nodes.len();
        self.nodes
            .extend(quadrants.iter().map(|q| QuadNode::new(*q, depth)));
        self.nodes[node].children = Some([first, first + 1, first + 2, first + 3]);

        let entries = std::mem::take(&mut self.nodes[node].entries);
        log::debug!(
            "quad-tree node {} subdivided at depth {} ({} entries)",
            node,
            depth - 1,
            entries.len()
        );
        for entry in entries {
            self.insert_at(node, entry);
        }
    }

    fn collect_pairs(&self, node: usize, ancestors: &mut Vec<usize>, out: &mut Vec<ColliderPair>) {
        let entries = &self.nodes[node].entries;
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                out.push(ColliderPair::new(a.collider, b.collider));
            }
        }

        if self.config.pairing == PairingMode::IncludeAncestors {
            for &ancestor in ancestors.iter() {
                for a in &self.nodes[ancestor].entries {
                    for b in entries {
                        out.push(ColliderPair::new(a.collider, b.collider));
                    }
                }
            }
        }

        if let Some(children) = self.nodes[node].children {
            ancestors.push(node);
            for child in children {
                self.collect_pairs(child, ancestors, out);
            }
            ancestors.pop();
        }
    }
}

impl Default for QuadTree {
    fn default() -> Self {
        let extent = Vec2::splat(1000.0);
        Self::new(AABB::new(-extent, extent), QuadTreeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn world_bounds() -> AABB {
        AABB::new(Vec2::new(-100.0, -100.0), Vec2::new(100.0, 100.0))
    }

    fn square(x: f32, y: f32, half: f32) -> AABB {
        AABB::from_center(Vec2::new(x, y), Vec2::splat(half))
    }

    fn random_boxes(seed: u64, count: usize) -> Vec<(ColliderRef, AABB)> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|i| {
                let x = rng.gen_range(-95.0..95.0);
                let y = rng.gen_range(-95.0..95.0);
                let half = rng.gen_range(0.5..5.0);
                (ColliderRef::new(i, 0), square(x, y, half))
            })
            .collect()
    }

    fn brute_force(boxes: &[(ColliderRef, AABB)]) -> HashSet<ColliderPair> {
        let mut pairs = HashSet::new();
        for (i, (a, ba)) in boxes.iter().enumerate() {
            for (b, bb) in &boxes[i + 1..] {
                if ba.overlaps(bb) {
                    pairs.insert(ColliderPair::new(*a, *b));
                }
            }
        }
        pairs
    }

    fn build(boxes: &[(ColliderRef, AABB)], pairing: PairingMode) -> QuadTree {
        let config = QuadTreeConfig {
            pairing,
            ..QuadTreeConfig::default()
        };
        let mut tree = QuadTree::new(world_bounds(), config);
        for (collider, bounds) in boxes {
            tree.insert(*bounds, *collider);
        }
        tree
    }

    #[test]
    fn test_leaf_holds_up_to_capacity() {
        let boxes = random_boxes(1, 16);
        let tree = build(&boxes, PairingMode::SameNode);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.len(), 16);
        // Everything sits in the root, so every combination is a candidate
        assert_eq!(tree.query_pairs().len(), 16 * 15 / 2);
    }

    #[test]
    fn test_subdivides_past_capacity() {
        let mut tree = QuadTree::new(world_bounds(), QuadTreeConfig::default());
        for i in 0..17 {
            tree.insert(square(50.0, 50.0 + i as f32 * 0.01, 0.1), ColliderRef::new(i, 0));
        }
        assert!(tree.node_count() > 1);
        assert!(!tree.nodes()[0].is_leaf());
        assert!(tree.nodes()[0].entries.is_empty());
    }

    #[test]
    fn test_straddler_stays_at_parent() {
        let mut tree = QuadTree::new(world_bounds(), QuadTreeConfig::default());
        for i in 0..17 {
            tree.insert(square(-50.0, -50.0, 1.0), ColliderRef::new(i, 0));
        }
        let straddler = ColliderRef::new(100, 0);
        tree.insert(square(0.0, 0.0, 2.0), straddler);
        assert_eq!(tree.node_of(straddler), Some(0));
    }

    #[test]
    fn test_max_depth_stops_subdivision() {
        let config = QuadTreeConfig {
            max_depth: 2,
            node_capacity: 1,
            pairing: PairingMode::SameNode,
        };
        let mut tree = QuadTree::new(world_bounds(), config);
        for i in 0..10 {
            tree.insert(square(90.0, 90.0, 0.1), ColliderRef::new(i, 0));
        }
        assert!(tree.nodes().iter().all(|n| n.depth <= 2));
        // Root plus one split at depth 0 and one at depth 1
        assert_eq!(tree.node_count(), 9);
        assert_eq!(tree.query_pairs().len(), 10 * 9 / 2);
    }

    #[test]
    fn test_clear_keeps_boundary() {
        let boxes = random_boxes(2, 64);
        let mut tree = build(&boxes, PairingMode::SameNode);
        tree.clear();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.is_empty());
        assert!(tree.query_pairs().is_empty());
        assert_eq!(tree.boundary(), world_bounds());
    }

    #[test]
    fn test_insertion_is_deterministic() {
        let boxes = random_boxes(3, 200);
        let a = build(&boxes, PairingMode::SameNode).query_pairs();
        let b = build(&boxes, PairingMode::SameNode).query_pairs();
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_node_misses_only_cross_level_pairs() {
        for seed in 0..8 {
            let boxes = random_boxes(seed, 300);
            let tree = build(&boxes, PairingMode::SameNode);
            let candidates: HashSet<_> = tree.query_pairs().into_iter().collect();
            for pair in brute_force(&boxes) {
                if !candidates.contains(&pair) {
                    let a = tree.node_of(pair.first());
                    let b = tree.node_of(pair.second());
                    assert_ne!(a, b, "pair {pair:?} shares a node but was not reported");
                }
            }
        }
    }

    #[test]
    fn test_include_ancestors_is_complete() {
        for seed in 0..8 {
            let boxes = random_boxes(seed, 300);
            let tree = build(&boxes, PairingMode::IncludeAncestors);
            let candidates: HashSet<_> = tree.query_pairs().into_iter().collect();
            let missing: Vec<_> = brute_force(&boxes)
                .into_iter()
                .filter(|p| !candidates.contains(p))
                .collect();
            assert!(missing.is_empty(), "seed {seed}: missed {missing:?}");
        }
    }
}
