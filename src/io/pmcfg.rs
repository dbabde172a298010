use std::io::Write;

use failure::Error;
use indexmap::IndexMap;

use crate::io::WriteGrammar;
use crate::{Argument, Grammar};

pub static RULE: &str = ":";
pub static RULE_ARROW: &str = "<-";
pub static LINEARIZATION: &str = "=";
pub static SEQUENCE: &str = "->";

/// Writer for grammars in PMCFG format.
///
/// Every function-linearization pair becomes a numbered `fun` record of
/// three lines: the bare production, the sequence ids of its linearization
/// arguments, and its count summed over all vertical contexts. Distinct
/// arguments are assigned 1-based sequence ids in order of first use and
/// defined once at the end of the output:
///
/// ```text
///  fun1 : S <- VP VAFIN
///  fun1 = s1 s2
///  fun1 17
///  s1 -> 0:0 1:0
///  s2 -> 0:1
/// ```
pub struct PmcfgWriter<W> {
    inner: W,
}

impl<W> PmcfgWriter<W>
where
    W: Write,
{
    pub fn new(inner: W) -> Self {
        PmcfgWriter { inner }
    }
}

impl<W> WriteGrammar for PmcfgWriter<W>
where
    W: Write,
{
    fn write_grammar(&mut self, grammar: &Grammar) -> Result<(), Error> {
        let mut sequence_ids: IndexMap<&Argument, usize> = IndexMap::new();
        let mut func_id = 1;
        for (function, linearizations) in grammar.rules() {
            for (linearization, contexts) in linearizations {
                let count: usize = contexts.values().sum();
                writeln!(
                    self.inner,
                    " fun{} {} {} {} {}",
                    func_id,
                    RULE,
                    function.lhs(),
                    RULE_ARROW,
                    function.rhs().join(" ")
                )?;
                write!(self.inner, " fun{} {}", func_id, LINEARIZATION)?;
                for argument in linearization {
                    let next_id = sequence_ids.len() + 1;
                    let id = *sequence_ids.entry(argument).or_insert(next_id);
                    write!(self.inner, " s{}", id)?;
                }
                writeln!(self.inner)?;
                writeln!(self.inner, " fun{} {}", func_id, count)?;
                func_id += 1;
            }
        }
        for (argument, id) in &sequence_ids {
            write!(self.inner, " s{} {}", id, SEQUENCE)?;
            for (rhs_position, argument_position) in argument.iter() {
                write!(self.inner, " {}:{}", rhs_position, argument_position)?;
            }
            writeln!(self.inner)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use petgraph::prelude::StableGraph;

    use crate::io::WriteGrammar;
    use crate::{Edge, Grammar, Node, NonTerminal, PmcfgWriter, Terminal, Tree};

    // the continuized "Darüber muß nachgedacht werden ." style tree:
    // (VROOT (S (PROAV 1) (VAFIN 2) (VP (VVPP 3) (VAINF 4))) ($. 5))
    fn continuized_tree() -> Tree {
        let mut g = StableGraph::new();
        let root_idx = g.add_node(Node::NonTerminal(NonTerminal::new("VROOT")));
        let s_idx = g.add_node(Node::NonTerminal(NonTerminal::new("S")));
        let vp_idx = g.add_node(Node::NonTerminal(NonTerminal::new("VP")));
        let t1_idx = g.add_node(Node::Terminal(Terminal::new("Darüber", "PROAV", 1)));
        let t2_idx = g.add_node(Node::Terminal(Terminal::new("muß", "VAFIN", 2)));
        let t3_idx = g.add_node(Node::Terminal(Terminal::new("nachgedacht", "VVPP", 3)));
        let t4_idx = g.add_node(Node::Terminal(Terminal::new("werden", "VAINF", 4)));
        let t5_idx = g.add_node(Node::Terminal(Terminal::new(".", "$.", 5)));
        g.add_edge(root_idx, s_idx, Edge::default());
        g.add_edge(root_idx, t5_idx, Edge::default());
        g.add_edge(s_idx, t1_idx, Edge::new("MO"));
        g.add_edge(s_idx, t2_idx, Edge::new("HD"));
        g.add_edge(s_idx, vp_idx, Edge::new("OC"));
        g.add_edge(vp_idx, t3_idx, Edge::new("HD"));
        g.add_edge(vp_idx, t4_idx, Edge::new("OC"));
        Tree::new(g, root_idx).unwrap()
    }

    #[test]
    fn writes_pmcfg_records() {
        let mut grammar = Grammar::new();
        grammar.extract(&continuized_tree());

        let mut writer = PmcfgWriter::new(Vec::new());
        writer.write_grammar(&grammar).unwrap();
        let output = String::from_utf8(writer.inner).unwrap();

        // the VROOT and VP rules share their sequence definition
        let expected = " fun1 : VROOT <- S $.\n\
                        \u{20}fun1 = s1\n\
                        \u{20}fun1 1\n\
                        \u{20}fun2 : S <- PROAV VAFIN VP\n\
                        \u{20}fun2 = s2\n\
                        \u{20}fun2 1\n\
                        \u{20}fun3 : VP <- VVPP VAINF\n\
                        \u{20}fun3 = s1\n\
                        \u{20}fun3 1\n\
                        \u{20}s1 -> 0:0 1:0\n\
                        \u{20}s2 -> 0:0 1:0 2:0\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn sums_counts_over_vertical_contexts() {
        let mut grammar = Grammar::new();
        grammar.extract(&continuized_tree());
        let mut other = Grammar::new();
        other.extract(&continuized_tree());
        grammar.merge(other);

        let mut writer = PmcfgWriter::new(Vec::new());
        writer.write_grammar(&grammar).unwrap();
        let output = String::from_utf8(writer.inner).unwrap();
        assert!(output.contains(" fun1 2\n"));
        assert!(output.contains(" fun2 2\n"));
        assert!(output.contains(" fun3 2\n"));
    }
}
