//! Structural statistics for a tree.
//!
//! Node promotions, demotions and collapses leave no trace in the map API. These numbers make
//! them visible, which is handy for tests, benchmarks and eyeballing memory use.

use std::collections::HashMap;

use crate::node::Node;
use crate::tree::AdaptiveRadixTree;

pub trait TreeStatsTrait {
    fn get_tree_stats(&self) -> TreeStats;
}

/// Totals for one inner node variant.
#[derive(Debug, Default)]
pub struct NodeStats {
    pub width: usize,
    pub node_type: String,
    pub total_nodes: usize,
    pub total_children: usize,
    /// Occupied child slots over available ones.
    pub density: f64,
}

#[derive(Debug, Default)]
pub struct TreeStats {
    /// Keyed by variant name: `Node4`, `Node16`, `Node48` or `Node256`.
    pub node_stats: HashMap<String, NodeStats>,
    pub num_leaves: usize,
    pub num_values: usize,
    pub num_inner_nodes: usize,
    pub total_density: f64,
    pub max_height: usize,
}

impl<V> TreeStatsTrait for AdaptiveRadixTree<V> {
    fn get_tree_stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let Some(root) = self.root() else {
            return stats;
        };

        collect_node_stats(root, &mut stats);

        let mut total_children = 0;
        let mut total_width = 0;
        for ns in stats.node_stats.values_mut() {
            total_children += ns.total_children;
            total_width += ns.width * ns.total_nodes;
            ns.density = ns.total_children as f64 / (ns.width * ns.total_nodes) as f64;
        }
        stats.num_inner_nodes = stats.node_stats.values().map(|ns| ns.total_nodes).sum();
        if total_width > 0 {
            stats.total_density = total_children as f64 / total_width as f64;
        }

        stats
    }
}

fn collect_node_stats<V>(root: &Node<V>, tree_stats: &mut TreeStats) {
    // Explicit stack; trees of long nested keys can be far deeper than the call stack allows.
    let mut pending = vec![(root, 1)];
    while let Some((node, height)) = pending.pop() {
        tree_stats.max_height = tree_stats.max_height.max(height);
        if node.is_leaf() {
            tree_stats.num_leaves += 1;
            tree_stats.num_values += 1;
            continue;
        }

        update_tree_stats(tree_stats, node);
        pending.extend(node.iter().map(|(_k, child)| (child, height + 1)));
    }
}

fn update_tree_stats<V>(tree_stats: &mut TreeStats, node: &Node<V>) {
    let num_children = node.num_children();
    tree_stats
        .node_stats
        .entry(node.type_name().to_string())
        .and_modify(|e| {
            e.total_nodes += 1;
            e.total_children += num_children;
        })
        .or_insert_with(|| NodeStats {
            width: node.capacity(),
            node_type: node.type_name().to_string(),
            total_nodes: 1,
            total_children: num_children,
            density: 0.0,
        });
}
