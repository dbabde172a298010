mod pmcfg;
pub use crate::io::pmcfg::{PmcfgWriter, LINEARIZATION, RULE, RULE_ARROW, SEQUENCE};

use failure::Error;

use crate::Grammar;

/// Trait to write a `Grammar`.
pub trait WriteGrammar {
    fn write_grammar(&mut self, grammar: &Grammar) -> Result<(), Error>;
}
