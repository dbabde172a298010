use std::collections::HashMap;

use indexmap::IndexMap;

use crate::Tree;

/// A bare CFG production.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Function {
    lhs: String,
    rhs: Vec<String>,
}

impl Function {
    pub fn new(lhs: impl Into<String>, rhs: Vec<String>) -> Self {
        Function {
            lhs: lhs.into(),
            rhs,
        }
    }

    /// Get the left-hand side label.
    pub fn lhs(&self) -> &str {
        self.lhs.as_str()
    }

    /// Get the right-hand side labels.
    pub fn rhs(&self) -> &[String] {
        &self.rhs
    }
}

/// One argument of a linearization: references to the arguments
/// contributed by right-hand side children, as `(rhs index, argument
/// position)` pairs.
pub type Argument = Vec<(usize, usize)>;

/// Linearization of a function, one argument per terminal block.
pub type Linearization = Vec<Argument>;

type Contexts = IndexMap<Vec<String>, usize>;
type Linearizations = IndexMap<Linearization, Contexts>;

/// A PMCFG under extraction.
///
/// Bare CFG productions are remembered together with their possible
/// linearizations and the vertical contexts they were seen in (for later
/// markovization), with occurrence counts. The accumulator is purely
/// additive; independent `Grammar`s can be folded into one with `merge`.
#[derive(Clone, Debug, Default)]
pub struct Grammar {
    rules: IndexMap<Function, Linearizations>,
}

impl Grammar {
    pub fn new() -> Self {
        Grammar::default()
    }

    /// Extract rules from `tree` and add them to the grammar.
    ///
    /// One rule per node with children; no rules are extracted at the
    /// pre-terminal level.
    pub fn extract(&mut self, tree: &Tree) {
        for node in tree.preorder(tree.root()) {
            let children = tree.children(node).collect::<Vec<_>>();
            if children.is_empty() {
                continue;
            }
            // map terminal positions to the rhs elements covering them,
            // and build the bare rule
            let mut rhs = Vec::with_capacity(children.len());
            let mut covering = HashMap::new();
            for (i, &child) in children.iter().enumerate() {
                rhs.push(tree[child].label().to_owned());
                for terminal in tree.descendent_terminals(child) {
                    if let Some(terminal) = tree[terminal].terminal() {
                        covering.insert(terminal.num(), i);
                    }
                }
            }
            let function = Function::new(tree[node].label(), rhs);
            // one lhs argument per terminal block; a new reference is
            // appended only when the covering rhs element changes, with a
            // running argument position per rhs element shared across the
            // whole linearization
            let mut linearization: Linearization = Vec::new();
            let mut argument_positions = vec![0; function.rhs().len()];
            for block in tree.terminal_blocks(node) {
                let mut argument: Argument = Vec::new();
                for terminal in block {
                    let num = match tree[terminal].terminal() {
                        Some(terminal) => terminal.num(),
                        None => continue,
                    };
                    let rhs_position = match covering.get(&num) {
                        Some(&position) => position,
                        None => continue,
                    };
                    let changed = argument
                        .last()
                        .map(|&(last, _)| last != rhs_position)
                        .unwrap_or(true);
                    if changed {
                        argument.push((rhs_position, argument_positions[rhs_position]));
                        argument_positions[rhs_position] += 1;
                    }
                }
                linearization.push(argument);
            }
            let context = tree
                .dominance(node)
                .map(|ancestor| tree[ancestor].label().to_owned())
                .collect::<Vec<_>>();
            let counts = self
                .rules
                .entry(function)
                .or_insert_with(IndexMap::new)
                .entry(linearization)
                .or_insert_with(IndexMap::new);
            *counts.entry(context).or_insert(0) += 1;
        }
    }

    /// Fold another grammar into this one, adding up counts.
    ///
    /// Merging is commutative and associative up to iteration order of
    /// equal-count grammars.
    pub fn merge(&mut self, other: Grammar) {
        for (function, linearizations) in other.rules {
            let into_linearizations = self.rules.entry(function).or_insert_with(IndexMap::new);
            for (linearization, contexts) in linearizations {
                let into_contexts = into_linearizations
                    .entry(linearization)
                    .or_insert_with(IndexMap::new);
                for (context, count) in contexts {
                    *into_contexts.entry(context).or_insert(0) += count;
                }
            }
        }
    }

    /// Get the number of distinct functions.
    pub fn n_functions(&self) -> usize {
        self.rules.len()
    }

    /// Get the number of function-linearization pairs.
    pub fn n_rules(&self) -> usize {
        self.rules
            .values()
            .map(|linearizations| linearizations.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Get the occurrence count of a function-linearization pair, summed
    /// over all vertical contexts.
    pub fn count(&self, function: &Function, linearization: &Linearization) -> usize {
        self.rules
            .get(function)
            .and_then(|linearizations| linearizations.get(linearization))
            .map(|contexts| contexts.values().sum())
            .unwrap_or(0)
    }

    pub(crate) fn rules(&self) -> &IndexMap<Function, Linearizations> {
        &self.rules
    }
}

#[cfg(test)]
mod tests {
    use petgraph::prelude::StableGraph;

    use crate::{Edge, Function, Grammar, Node, NonTerminal, Terminal, Tree};

    // (VROOT (S (NP (ART 1)) (VP (VVFIN 2) (NN 3))))
    fn continuous_tree() -> Tree {
        let mut g = StableGraph::new();
        let root_idx = g.add_node(Node::NonTerminal(NonTerminal::new("VROOT")));
        let s_idx = g.add_node(Node::NonTerminal(NonTerminal::new("S")));
        let np_idx = g.add_node(Node::NonTerminal(NonTerminal::new("NP")));
        let vp_idx = g.add_node(Node::NonTerminal(NonTerminal::new("VP")));
        let t1_idx = g.add_node(Node::Terminal(Terminal::new("sie", "ART", 1)));
        let t2_idx = g.add_node(Node::Terminal(Terminal::new("sieht", "VVFIN", 2)));
        let t3_idx = g.add_node(Node::Terminal(Terminal::new("Licht", "NN", 3)));
        g.add_edge(root_idx, s_idx, Edge::default());
        g.add_edge(s_idx, np_idx, Edge::new("SB"));
        g.add_edge(s_idx, vp_idx, Edge::new("HD"));
        g.add_edge(np_idx, t1_idx, Edge::new("NK"));
        g.add_edge(vp_idx, t2_idx, Edge::new("HD"));
        g.add_edge(vp_idx, t3_idx, Edge::new("OA"));
        Tree::new(g, root_idx).unwrap()
    }

    #[test]
    fn extracts_flat_production() {
        let mut grammar = Grammar::new();
        grammar.extract(&continuous_tree());

        // S -> NP VP with a single continuous argument
        let function = Function::new("S", vec!["NP".to_owned(), "VP".to_owned()]);
        let linearization = vec![vec![(0, 0), (1, 0)]];
        assert_eq!(grammar.count(&function, &linearization), 1);

        // unary rule above
        let function = Function::new("VROOT", vec!["S".to_owned()]);
        assert_eq!(grammar.count(&function, &vec![vec![(0, 0)]]), 1);

        // pre-terminal rules cover the POS level, no lexical rules
        assert_eq!(grammar.n_functions(), 4);
        let lexical = Function::new("ART", vec!["sie".to_owned()]);
        assert_eq!(grammar.count(&lexical, &vec![vec![(0, 0)]]), 0);
    }

    #[test]
    fn extracts_discontinuous_linearization() {
        // (VROOT (S (VP (PROAV 1) (VVPP 4)) (VAFIN 2) (NN 3)) ($. 5))
        let mut g = StableGraph::new();
        let root_idx = g.add_node(Node::NonTerminal(NonTerminal::new("VROOT")));
        let s_idx = g.add_node(Node::NonTerminal(NonTerminal::new("S")));
        let vp_idx = g.add_node(Node::NonTerminal(NonTerminal::new("VP")));
        let t1_idx = g.add_node(Node::Terminal(Terminal::new("Darüber", "PROAV", 1)));
        let t2_idx = g.add_node(Node::Terminal(Terminal::new("muß", "VAFIN", 2)));
        let t3_idx = g.add_node(Node::Terminal(Terminal::new("jemand", "NN", 3)));
        let t4_idx = g.add_node(Node::Terminal(Terminal::new("nachgedacht", "VVPP", 4)));
        let t5_idx = g.add_node(Node::Terminal(Terminal::new(".", "$.", 5)));
        g.add_edge(root_idx, s_idx, Edge::default());
        g.add_edge(root_idx, t5_idx, Edge::default());
        g.add_edge(s_idx, vp_idx, Edge::new("OC"));
        g.add_edge(s_idx, t2_idx, Edge::new("HD"));
        g.add_edge(s_idx, t3_idx, Edge::new("SB"));
        g.add_edge(vp_idx, t1_idx, Edge::new("MO"));
        g.add_edge(vp_idx, t4_idx, Edge::new("HD"));
        let tree = Tree::new(g, root_idx).unwrap();

        let mut grammar = Grammar::new();
        grammar.extract(&tree);

        // the VP is discontinuous: two arguments for the S rule, with the
        // VP contributing one argument to each
        let function = Function::new(
            "S",
            vec!["VP".to_owned(), "VAFIN".to_owned(), "NN".to_owned()],
        );
        let linearization = vec![vec![(0, 0), (1, 0), (2, 0), (0, 1)]];
        assert_eq!(grammar.count(&function, &linearization), 1);

        // inside the VP both terminals are covered by distinct children
        let function = Function::new("VP", vec!["PROAV".to_owned(), "VVPP".to_owned()]);
        let linearization = vec![vec![(0, 0)], vec![(1, 0)]];
        assert_eq!(grammar.count(&function, &linearization), 1);
    }

    #[test]
    fn argument_positions_share_one_counter_per_rhs_element() {
        // (VROOT (X (NP (NN 2) (NN 4))) (ADV 1) (ADV 3) (ADV 5))
        //
        // The NP covers two blocks of its parent, so its second block is
        // referenced at argument position 1.
        let mut g = StableGraph::new();
        let root_idx = g.add_node(Node::NonTerminal(NonTerminal::new("VROOT")));
        let x_idx = g.add_node(Node::NonTerminal(NonTerminal::new("X")));
        let np_idx = g.add_node(Node::NonTerminal(NonTerminal::new("NP")));
        let t1_idx = g.add_node(Node::Terminal(Terminal::new("a", "ADV", 1)));
        let t2_idx = g.add_node(Node::Terminal(Terminal::new("b", "NN", 2)));
        let t3_idx = g.add_node(Node::Terminal(Terminal::new("c", "ADV", 3)));
        let t4_idx = g.add_node(Node::Terminal(Terminal::new("d", "NN", 4)));
        let t5_idx = g.add_node(Node::Terminal(Terminal::new("e", "ADV", 5)));
        g.add_edge(root_idx, x_idx, Edge::default());
        g.add_edge(root_idx, t1_idx, Edge::default());
        g.add_edge(root_idx, t3_idx, Edge::default());
        g.add_edge(root_idx, t5_idx, Edge::default());
        g.add_edge(x_idx, np_idx, Edge::default());
        g.add_edge(np_idx, t2_idx, Edge::default());
        g.add_edge(np_idx, t4_idx, Edge::default());
        let tree = Tree::new(g, root_idx).unwrap();

        let mut grammar = Grammar::new();
        grammar.extract(&tree);

        let function = Function::new("X", vec!["NP".to_owned()]);
        let linearization = vec![vec![(0, 0)], vec![(0, 1)]];
        assert_eq!(grammar.count(&function, &linearization), 1);
    }

    #[test]
    fn merge_is_additive() {
        let tree = continuous_tree();
        let mut once = Grammar::new();
        once.extract(&tree);

        let mut first = Grammar::new();
        first.extract(&tree);
        let mut second = Grammar::new();
        second.extract(&tree);
        first.merge(second);

        assert_eq!(first.n_functions(), once.n_functions());
        assert_eq!(first.n_rules(), once.n_rules());
        for (function, linearizations) in once.rules() {
            for linearization in linearizations.keys() {
                assert_eq!(
                    first.count(function, linearization),
                    2 * once.count(function, linearization)
                );
            }
        }
    }

    #[test]
    fn vertical_contexts_are_tracked_separately() {
        // the same NP -> NN rule occurs under two different dominance
        // paths
        let mut g = StableGraph::new();
        let root_idx = g.add_node(Node::NonTerminal(NonTerminal::new("VROOT")));
        let s_idx = g.add_node(Node::NonTerminal(NonTerminal::new("S")));
        let np1_idx = g.add_node(Node::NonTerminal(NonTerminal::new("NP")));
        let np2_idx = g.add_node(Node::NonTerminal(NonTerminal::new("NP")));
        let t1_idx = g.add_node(Node::Terminal(Terminal::new("Anna", "NN", 1)));
        let t2_idx = g.add_node(Node::Terminal(Terminal::new("Licht", "NN", 2)));
        g.add_edge(root_idx, s_idx, Edge::default());
        g.add_edge(root_idx, np2_idx, Edge::default());
        g.add_edge(s_idx, np1_idx, Edge::new("SB"));
        g.add_edge(np1_idx, t1_idx, Edge::new("NK"));
        g.add_edge(np2_idx, t2_idx, Edge::new("NK"));
        let tree = Tree::new(g, root_idx).unwrap();

        let mut grammar = Grammar::new();
        grammar.extract(&tree);

        let function = Function::new("NP", vec!["NN".to_owned()]);
        let linearization = vec![vec![(0, 0)]];
        // both occurrences are counted under the same rule
        assert_eq!(grammar.count(&function, &linearization), 2);
        // but under distinct vertical contexts
        let contexts = &grammar.rules()[&function][&linearization];
        assert_eq!(contexts.len(), 2);
        assert!(contexts
            .contains_key(&vec!["NP".to_owned(), "S".to_owned(), "VROOT".to_owned()]));
        assert!(contexts.contains_key(&vec!["NP".to_owned(), "VROOT".to_owned()]));
    }
}
