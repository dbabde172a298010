use std::fmt;
use std::mem;

/// Edge between a node and its parent.
///
/// Carries the grammatical function label of the child, e.g. `HD` or `NK`
/// in NeGra/TIGER annotation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Edge {
    label: Option<String>,
}

// implementing display comes in handy for debugging using Dot Graphs
impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.label() {
            Some(label) => write!(f, "{}", label),
            None => write!(f, "--"),
        }
    }
}

impl Edge {
    /// Create a new labeled edge.
    pub fn new(label: impl Into<String>) -> Self {
        Edge {
            label: Some(label.into()),
        }
    }

    /// Get the edge label.
    pub fn label(&self) -> Option<&str> {
        self.label.as_ref().map(String::as_str)
    }

    /// Set the edge label.
    ///
    /// Returns the replaced label.
    pub fn set_label<S>(&mut self, new_label: Option<S>) -> Option<String>
    where
        S: Into<String>,
    {
        mem::replace(&mut self.label, new_label.map(Into::into))
    }
}
