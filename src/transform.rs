use std::convert::TryFrom;

use failure::Error;

use crate::tree_modification::{Continuize, TreeOps};
use crate::Tree;

/// Head edge label in NeGra/TIGER annotation.
pub static NEGRA_HEAD_EDGE: &str = "HD";
/// Noun kernel edge label in NeGra/TIGER annotation.
pub static NEGRA_MODIFIER_EDGE: &str = "NK";

/// Tree transformations, selectable by name.
///
/// External drivers chain transformations by resolving the configured
/// names once through `Transform::pipeline` and applying the resolved
/// passes to each tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transform {
    /// Reattach loosely attached children of the root node.
    RootAttach,
    /// Mark head children using the NeGra/TIGER edge labels.
    NegraMarkHeads,
    /// Split discontinuous nodes into continuous blocks.
    BoydSplit,
    /// Remove non-head blocks left behind by splitting.
    Raising,
}

impl Transform {
    /// Resolve a sequence of transformation names.
    ///
    /// Fails on the first unknown name, before any tree is processed.
    pub fn pipeline<S>(names: impl IntoIterator<Item = S>) -> Result<Vec<Transform>, Error>
    where
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| Transform::try_from(name.as_ref()))
            .collect()
    }

    /// Apply the transformation to `tree`.
    pub fn apply(self, tree: &mut Tree) -> Result<(), Error> {
        match self {
            Transform::RootAttach => tree.root_attach(),
            Transform::NegraMarkHeads => {
                tree.mark_heads(NEGRA_HEAD_EDGE, NEGRA_MODIFIER_EDGE);
                Ok(())
            }
            Transform::BoydSplit => tree.boyd_split(),
            Transform::Raising => tree.raise_nonhead_blocks(),
        }
    }

    /// Get the name under which the transformation is selected.
    pub fn name(self) -> &'static str {
        match self {
            Transform::RootAttach => "root_attach",
            Transform::NegraMarkHeads => "negra_mark_heads",
            Transform::BoydSplit => "boyd_split",
            Transform::Raising => "raising",
        }
    }
}

impl<'a> TryFrom<&'a str> for Transform {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "root_attach" => Ok(Transform::RootAttach),
            "negra_mark_heads" => Ok(Transform::NegraMarkHeads),
            "boyd_split" => Ok(Transform::BoydSplit),
            "raising" => Ok(Transform::Raising),
            _ => Err(format_err!("Unknown transformation: {}", value)),
        }
    }
}
