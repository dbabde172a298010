use failure::Error;
use petgraph::prelude::NodeIndex;

use crate::{Node, NonTerminal, Tree};

/// Trait specifying the NeGra/TIGER preprocessing passes.
pub trait TreeOps {
    /// Reattach loosely attached children of the root node.
    ///
    /// Moves children of the root to the lowest common ancestor of the
    /// left neighbor of their leftmost terminal and the right neighbor of
    /// their rightmost terminal. The right boundary is first extended over
    /// adjacent siblings, skipping siblings whose yield starts inside the
    /// current group and stopping at the first gap. Children whose group
    /// reaches the start or end of the sentence are not moved.
    fn root_attach(&mut self) -> Result<(), Error>;

    /// Mark the head child of each node.
    ///
    /// If a node has a child with `head_edge`, the leftmost such child is
    /// marked. Otherwise the rightmost child with `modifier_edge` is
    /// marked, and if there is no such child either, the leftmost child.
    fn mark_heads(&mut self, head_edge: &str, modifier_edge: &str);
}

/// Trait specifying the continuization passes.
pub trait Continuize {
    /// Split discontinuous nodes into one node per continuous block.
    ///
    /// For each continuous terminal block of a discontinuous node a new
    /// node covering exactly that block is introduced, carrying the label,
    /// edge and head flag of the original node. The unique block covering
    /// the original head daughter is marked as head block, determined
    /// recursively if the head daughter was split itself. The algorithm is
    /// documented in Boyd (2007) (ACL-LAW workshop).
    ///
    /// Relies on a previous application of `mark_heads`; fails if no head
    /// block can be determined for a split node.
    fn boyd_split(&mut self) -> Result<(), Error>;

    /// Remove crossing branches by raising non-head blocks.
    ///
    /// Removes every node introduced by `boyd_split` that is not marked as
    /// head block and reattaches its children to its former parent. The
    /// resulting tree has a continuous yield at every node.
    fn raise_nonhead_blocks(&mut self) -> Result<(), Error>;
}

impl TreeOps for Tree {
    fn root_attach(&mut self) -> Result<(), Error> {
        let terminals = self.terminals();
        let tree_min = 1;
        let tree_max = self.n_terminals();
        let top_level = self.children(self.root()).collect::<Vec<_>>();
        for child in top_level {
            let (lo, hi) = self
                .yield_bounds(child)
                .ok_or_else(|| format_err!("Node without terminals: {}", self[child]))?;
            // neighbor positions of the leftmost and rightmost terminal
            let t_l = lo - 1;
            let mut t_r = hi + 1;
            // extend the right boundary over adjacent siblings; skip
            // siblings starting inside the current group, stop at a gap
            let mut focus = child;
            let mut sibling = self.right_sibling(focus);
            while let Some(sib) = sibling {
                let (_, focus_hi) = self
                    .yield_bounds(focus)
                    .ok_or_else(|| format_err!("Node without terminals: {}", self[focus]))?;
                let (sib_lo, sib_hi) = self
                    .yield_bounds(sib)
                    .ok_or_else(|| format_err!("Node without terminals: {}", self[sib]))?;
                if sib_lo < focus_hi {
                    sibling = self.right_sibling(sib);
                    continue;
                }
                if sib_lo > focus_hi + 1 {
                    break;
                }
                t_r = sib_hi + 1;
                focus = sib;
                sibling = self.right_sibling(sib);
            }
            // groups reaching a sentence boundary stay at the root
            if t_l < tree_min || t_r > tree_max {
                continue;
            }
            let target = self
                .lca(terminals[t_l - 1], terminals[t_r - 1])
                .ok_or_else(|| {
                    format_err!("No common ancestor for terminals {} and {}", t_l, t_r)
                })?;
            let (_, edge_id) = self
                .parent(child)
                .ok_or_else(|| format_err!("Root child without incoming edge: {}", self[child]))?;
            // safe to unwrap, edge_id was just looked up
            let weight = self.graph_mut().remove_edge(edge_id).unwrap();
            self.graph_mut().add_edge(target, child, weight);
        }
        Ok(())
    }

    fn mark_heads(&mut self, head_edge: &str, modifier_edge: &str) {
        let root = self.root();
        self[root].set_head(false);
        let order = self.preorder(root).collect::<Vec<_>>();
        for node in order {
            let children = self.children(node).collect::<Vec<_>>();
            if children.is_empty() {
                continue;
            }
            let edges = children
                .iter()
                .map(|&child| {
                    self.parent(child)
                        .and_then(|(_, edge_id)| self[edge_id].label().map(ToOwned::to_owned))
                })
                .collect::<Vec<_>>();
            // default leftmost
            let mut index = 0;
            if let Some(position) = edges
                .iter()
                .position(|edge| edge.as_ref().map(String::as_str) == Some(head_edge))
            {
                index = position;
            } else if let Some(position) = edges
                .iter()
                .rposition(|edge| edge.as_ref().map(String::as_str) == Some(modifier_edge))
            {
                index = position;
            }
            for (i, &child) in children.iter().enumerate() {
                self[child].set_head(i == index);
            }
        }
    }
}

impl Continuize for Tree {
    fn boyd_split(&mut self) -> Result<(), Error> {
        // postorder, lower trees have to be continuified first
        let order = self.postorder(self.root()).collect::<Vec<_>>();
        for node in order {
            if let Some(nt) = self[node].nonterminal_mut() {
                nt.set_split(false);
                nt.set_head_block(true);
            } else {
                continue;
            }
            let children = self.children(node).collect::<Vec<_>>();
            if children.is_empty() {
                continue;
            }
            // group the children such that each group dominates one
            // continuous block of terminals
            let mut blocks: Vec<Vec<NodeIndex>> = Vec::new();
            let mut previous_hi = 0;
            for child in children {
                let (lo, hi) = self
                    .yield_bounds(child)
                    .ok_or_else(|| format_err!("Node without terminals: {}", self[child]))?;
                if blocks.is_empty() || lo > previous_hi + 1 {
                    blocks.push(Vec::new());
                }
                if let Some(block) = blocks.last_mut() {
                    block.push(child);
                }
                previous_hi = hi;
            }
            if blocks.len() < 2 {
                continue;
            }
            // a block covers the head of the original node if one of its
            // children is marked as head; a split child must also cover
            // the head block of its own original
            let head_blocks = blocks
                .iter()
                .map(|block| {
                    block.iter().any(|&child| {
                        self[child].is_head()
                            && (!self[child].is_split() || self[child].is_head_block())
                    })
                })
                .collect::<Vec<_>>();
            if !head_blocks.iter().any(|&head_block| head_block) {
                return Err(format_err!(
                    "No head block among the blocks of '{}', heads not marked?",
                    self[node].label()
                ));
            }
            let (parent, edge_id) = self
                .parent(node)
                .ok_or_else(|| format_err!("Discontinuous root node: {}", self[node]))?;
            let label = self[node].label().to_owned();
            let head = self[node].is_head();
            // safe to unwrap, edge_id was just looked up
            let weight = self.graph_mut().remove_edge(edge_id).unwrap();
            for (i, (block, head_block)) in blocks.into_iter().zip(head_blocks).enumerate() {
                let block_node = self.graph_mut().add_node(Node::NonTerminal(
                    NonTerminal::new_block(label.clone(), head, head_block, i + 1),
                ));
                self.graph_mut().add_edge(parent, block_node, weight.clone());
                for child in block {
                    let (_, child_edge) = self.parent(child).ok_or_else(|| {
                        format_err!("Block child without incoming edge: {}", self[child])
                    })?;
                    // safe to unwrap, child_edge was just looked up
                    let child_weight = self.graph_mut().remove_edge(child_edge).unwrap();
                    self.graph_mut().add_edge(block_node, child, child_weight);
                }
            }
            self.graph_mut().remove_node(node);
        }
        Ok(())
    }

    fn raise_nonhead_blocks(&mut self) -> Result<(), Error> {
        let root = self.root();
        let removal = self
            .preorder(root)
            .filter(|&node| node != root && self[node].is_split() && !self[node].is_head_block())
            .collect::<Vec<_>>();
        for node in removal {
            let (parent, edge_id) = self
                .parent(node)
                .ok_or_else(|| format_err!("Split node without incoming edge: {}", self[node]))?;
            self.graph_mut().remove_edge(edge_id);
            let children = self.children(node).collect::<Vec<_>>();
            for child in children {
                let (_, child_edge) = self.parent(child).ok_or_else(|| {
                    format_err!("Raised child without incoming edge: {}", self[child])
                })?;
                // safe to unwrap, child_edge was just looked up
                let weight = self.graph_mut().remove_edge(child_edge).unwrap();
                self.graph_mut().add_edge(parent, child, weight);
            }
            self.graph_mut().remove_node(node);
        }
        Ok(())
    }
}
