use std::collections::HashSet;
use std::ops::{Index, IndexMut};
use std::vec;

use failure::Error;
use itertools::Itertools;
use petgraph::prelude::{Direction, EdgeIndex, EdgeRef, NodeIndex, StableGraph};

use crate::{Edge, Node, Span};

/// `Tree`
///
/// `Tree`s represent constituency trees and consist of `Node`s. The nodes
/// are either `Terminal`s or `NonTerminal`s. Relations between nodes are
/// expressed as `Edge`s.
///
/// The children of a node are ordered by the position of their leftmost
/// terminal, so "left to right" always refers to the surface order of the
/// sentence, regardless of the order in which edges were added.
#[derive(Debug, Clone)]
pub struct Tree {
    graph: StableGraph<Node, Edge>,
    n_terminals: usize,
    root: NodeIndex,
}

impl Tree {
    /// Construct a tree from a node arena and the index of its root.
    ///
    /// Validates that the nodes reachable from `root` form a tree and that
    /// the terminal numbers are exactly `1..=k` without gaps or duplicates.
    pub fn new(graph: StableGraph<Node, Edge>, root: NodeIndex) -> Result<Self, Error> {
        let mut nums = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if !seen.insert(node) {
                return Err(format_err!(
                    "Not a tree, node is reachable twice: {}",
                    graph[node]
                ));
            }
            if let Some(terminal) = graph[node].terminal() {
                nums.push(terminal.num());
            }
            stack.extend(
                graph
                    .edges_directed(node, Direction::Outgoing)
                    .map(|edge_ref| edge_ref.target()),
            );
        }

        nums.sort();
        if nums.is_empty() {
            return Err(format_err!("Tree without terminals"));
        }
        for (expected, &num) in (1..).zip(&nums) {
            if num != expected {
                return Err(format_err!(
                    "Terminal numbers are not 1..={}: found {}",
                    nums.len(),
                    num
                ));
            }
        }

        Ok(Tree {
            n_terminals: nums.len(),
            graph,
            root,
        })
    }

    /// Get the number of terminals in the tree.
    pub fn n_terminals(&self) -> usize {
        self.n_terminals
    }

    /// Get the index of the root of the tree.
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Get the parent and corresponding edge of a tree node.
    ///
    /// * Returns `NodeIndex` of immediately dominating node and corresponding `EdgeIndex`.
    /// * Returns `None` if `node` doesn't exist or doesn't have incoming edges.
    pub fn parent(&self, node: NodeIndex) -> Option<(NodeIndex, EdgeIndex)> {
        self.graph
            .edges_directed(node, Direction::Incoming)
            .next()
            .map(|edge_ref| (edge_ref.source(), edge_ref.id()))
    }

    /// Get an iterator over `node`'s children, left to right.
    pub fn children<'a>(&'a self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + 'a {
        self.graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge_ref| edge_ref.target())
            .sorted_by_key(|&child| self.lowest_num(child))
    }

    /// Get the sibling following `node` in surface order.
    ///
    /// Returns `None` if `node` is the last child of its parent or the root.
    pub fn right_sibling(&self, node: NodeIndex) -> Option<NodeIndex> {
        let (parent, _) = self.parent(node)?;
        let mut children = self.children(parent);
        while let Some(child) = children.next() {
            if child == node {
                return children.next();
            }
        }
        None
    }

    /// Get the terminals of the tree, sorted by their position in the
    /// sentence.
    pub fn terminals(&self) -> Vec<NodeIndex> {
        self.descendent_terminals(self.root)
    }

    /// Get the terminals dominated by `node`, sorted by their position in
    /// the sentence.
    ///
    /// A terminal dominates itself.
    pub fn descendent_terminals(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut terminals = Vec::new();
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            if self.graph[node].is_terminal() {
                terminals.push(node);
            } else {
                stack.extend(
                    self.graph
                        .edges_directed(node, Direction::Outgoing)
                        .map(|edge_ref| edge_ref.target()),
                );
            }
        }
        terminals.sort_by_key(|&terminal| self.lowest_num(terminal));
        terminals
    }

    /// Partition the terminals under `node` into maximal runs of terminals
    /// with consecutive positions.
    ///
    /// A node with a continuous yield has exactly one block.
    pub fn terminal_blocks(&self, node: NodeIndex) -> Vec<Vec<NodeIndex>> {
        let mut blocks: Vec<Vec<NodeIndex>> = Vec::new();
        let mut previous = None;
        for terminal in self.descendent_terminals(node) {
            let num = self.lowest_num(terminal);
            match previous {
                Some(prev) if num == prev + 1 => {
                    if let Some(block) = blocks.last_mut() {
                        block.push(terminal);
                    }
                }
                _ => blocks.push(vec![terminal]),
            }
            previous = Some(num);
        }
        blocks
    }

    /// Get the span covered by `node`.
    pub fn span(&self, node: NodeIndex) -> Result<Span, Error> {
        let nums = self
            .descendent_terminals(node)
            .into_iter()
            .map(|terminal| self.lowest_num(terminal))
            .collect();
        Span::from_vec(nums)
    }

    /// Get an iterator over the subtree of `node` in preorder.
    pub fn preorder(&self, node: NodeIndex) -> PreOrder {
        PreOrder {
            tree: self,
            stack: vec![node],
        }
    }

    /// Get an iterator over the subtree of `node` in postorder.
    ///
    /// Children are visited before their parents.
    pub fn postorder(&self, node: NodeIndex) -> PostOrder {
        let children = self.children(node).collect::<Vec<_>>().into_iter();
        PostOrder {
            tree: self,
            stack: vec![(node, children)],
        }
    }

    /// Get an iterator from `node` up to and including the root.
    pub fn dominance(&self, node: NodeIndex) -> Dominance {
        Dominance {
            tree: self,
            cur: Some(node),
        }
    }

    /// Get the lowest node dominating both `first` and `second`.
    ///
    /// Returns `None` if the nodes do not share a root.
    pub fn lca(&self, first: NodeIndex, second: NodeIndex) -> Option<NodeIndex> {
        let path = self.dominance(second).collect::<HashSet<_>>();
        self.dominance(first).find(|node| path.contains(node))
    }

    /// Get an immutable reference to the underlying `StableGraph`.
    pub fn graph(&self) -> &StableGraph<Node, Edge> {
        &self.graph
    }

    /// Get a mutable reference to the underlying `StableGraph`.
    pub(crate) fn graph_mut(&mut self) -> &mut StableGraph<Node, Edge> {
        &mut self.graph
    }

    /// Get the lowest and highest terminal position under `node`.
    pub(crate) fn yield_bounds(&self, node: NodeIndex) -> Option<(usize, usize)> {
        let mut bounds: Option<(usize, usize)> = None;
        let mut stack = vec![node];
        while let Some(node) = stack.pop() {
            if let Some(terminal) = self.graph[node].terminal() {
                let num = terminal.num();
                bounds = match bounds {
                    Some((lo, hi)) => Some((lo.min(num), hi.max(num))),
                    None => Some((num, num)),
                };
            } else {
                stack.extend(
                    self.graph
                        .edges_directed(node, Direction::Outgoing)
                        .map(|edge_ref| edge_ref.target()),
                );
            }
        }
        bounds
    }

    // Smallest terminal position under `node`, used as the sort key for the
    // surface order of siblings.
    fn lowest_num(&self, node: NodeIndex) -> usize {
        self.yield_bounds(node)
            .map(|(lo, _)| lo)
            .unwrap_or(usize::max_value())
    }

    fn subtree_eq(&self, node: NodeIndex, other: &Tree, other_node: NodeIndex) -> bool {
        if self[node] != other[other_node] {
            return false;
        }
        let children = self.children(node).collect::<Vec<_>>();
        let other_children = other.children(other_node).collect::<Vec<_>>();
        if children.len() != other_children.len() {
            return false;
        }
        children
            .into_iter()
            .zip(other_children)
            .all(|(child, other_child)| {
                let edge = self.parent(child).map(|(_, edge_id)| &self[edge_id]);
                let other_edge = other
                    .parent(other_child)
                    .map(|(_, edge_id)| &other[edge_id]);
                edge == other_edge && self.subtree_eq(child, other, other_child)
            })
    }
}

impl PartialEq for Tree {
    /// Two trees are equal iff they have the same structure in surface
    /// order, with equal nodes and equal edge labels.
    fn eq(&self, other: &Tree) -> bool {
        self.n_terminals == other.n_terminals
            && self.graph.node_count() == other.graph.node_count()
            && self.subtree_eq(self.root, other, other.root)
    }
}

impl Index<NodeIndex> for Tree {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &<Self as Index<NodeIndex>>::Output {
        &self.graph[index]
    }
}

impl Index<EdgeIndex> for Tree {
    type Output = Edge;

    fn index(&self, index: EdgeIndex) -> &<Self as Index<EdgeIndex>>::Output {
        &self.graph[index]
    }
}

impl IndexMut<NodeIndex> for Tree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.graph[index]
    }
}

impl IndexMut<EdgeIndex> for Tree {
    fn index_mut(&mut self, index: EdgeIndex) -> &mut Edge {
        &mut self.graph[index]
    }
}

/// Iterator over a subtree in preorder.
pub struct PreOrder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeIndex>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut children = self.tree.children(node).collect::<Vec<_>>();
        children.reverse();
        self.stack.extend(children);
        Some(node)
    }
}

/// Iterator over a subtree in postorder.
pub struct PostOrder<'a> {
    tree: &'a Tree,
    stack: Vec<(NodeIndex, vec::IntoIter<NodeIndex>)>,
}

impl<'a> Iterator for PostOrder<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let child = self.stack.last_mut()?.1.next();
            match child {
                Some(child) => {
                    let children = self.tree.children(child).collect::<Vec<_>>().into_iter();
                    self.stack.push((child, children));
                }
                None => {
                    if let Some((node, _)) = self.stack.pop() {
                        return Some(node);
                    }
                }
            }
        }
    }
}

/// Iterator over the dominance path of a node, from the node itself up to
/// and including the root.
///
/// The iterator advances through `parent` lookups on each call, nodes
/// returned earlier may be detached without invalidating it.
pub struct Dominance<'a> {
    tree: &'a Tree,
    cur: Option<NodeIndex>,
}

impl<'a> Iterator for Dominance<'a> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = self.tree.parent(node).map(|(parent, _)| parent);
        Some(node)
    }
}
