#[macro_use]
extern crate failure;

pub mod io;
pub use io::{PmcfgWriter, WriteGrammar};

mod tree;
pub use tree::{Dominance, PostOrder, PreOrder, Tree};

mod edge;
pub use edge::Edge;

mod grammar;
pub use grammar::{Argument, Function, Grammar, Linearization};

mod node;
pub use node::{Node, NonTerminal, Terminal};

mod span;
pub use span::Span;

mod transform;
pub use transform::{Transform, NEGRA_HEAD_EDGE, NEGRA_MODIFIER_EDGE};

mod tree_modification;
pub use tree_modification::{Continuize, TreeOps};
