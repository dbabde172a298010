use std::fmt;
use std::mem;

/// Enum representing nodes in a constituency tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    /// Nonterminal node.
    NonTerminal(NonTerminal),
    /// Terminal node.
    Terminal(Terminal),
}

impl Node {
    /// Returns whether `self` is a `Terminal`.
    pub fn is_terminal(&self) -> bool {
        match &self {
            Node::Terminal(_) => true,
            Node::NonTerminal { .. } => false,
        }
    }

    /// Get a `Option<&Terminal>`.
    ///
    /// Returns `None` if `self` is a `Node::NonTerminal`.
    pub fn terminal(&self) -> Option<&Terminal> {
        match &self {
            Node::Terminal(ref terminal) => Some(terminal),
            Node::NonTerminal { .. } => None,
        }
    }

    /// Get a `Option<&mut Terminal>`.
    ///
    /// Returns `None` if `self` is a `Node::NonTerminal`.
    pub fn terminal_mut(&mut self) -> Option<&mut Terminal> {
        match self {
            Node::NonTerminal(_) => None,
            Node::Terminal(ref mut terminal) => Some(terminal),
        }
    }

    /// Get a `Option<&NonTerminal>`.
    ///
    /// Returns `None` if `self` is a `Node::Terminal`.
    pub fn nonterminal(&self) -> Option<&NonTerminal> {
        match self {
            Node::Terminal(_) => None,
            Node::NonTerminal(ref inner) => Some(inner),
        }
    }

    /// Get a `Option<&mut NonTerminal>`.
    ///
    /// Returns `None` if `self` is a `Node::Terminal`.
    pub fn nonterminal_mut(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Node::Terminal(_) => None,
            Node::NonTerminal(ref mut inner) => Some(inner),
        }
    }

    /// Get the node's label.
    ///
    /// Returns the part-of-speech for `Terminal`s and the node label for
    /// `NonTerminal`s.
    pub fn label(&self) -> &str {
        match self {
            Node::NonTerminal(nt) => nt.label(),
            Node::Terminal(t) => t.label(),
        }
    }

    /// Set the node's label.
    ///
    /// Returns the replaced label.
    pub fn set_label(&mut self, s: impl Into<String>) -> String {
        match self {
            Node::NonTerminal(nt) => nt.set_label(s),
            Node::Terminal(t) => t.set_label(s),
        }
    }

    /// Returns whether the node is the head child of its parent.
    pub fn is_head(&self) -> bool {
        match self {
            Node::NonTerminal(nt) => nt.is_head(),
            Node::Terminal(t) => t.is_head(),
        }
    }

    /// Set the head flag. Returns the replaced value.
    pub fn set_head(&mut self, head: bool) -> bool {
        match self {
            Node::NonTerminal(nt) => nt.set_head(head),
            Node::Terminal(t) => t.set_head(head),
        }
    }

    /// Returns whether the node was introduced by block splitting.
    ///
    /// `Terminal`s are never split.
    pub fn is_split(&self) -> bool {
        match self {
            Node::NonTerminal(nt) => nt.is_split(),
            Node::Terminal(_) => false,
        }
    }

    /// Returns whether the node covers the head of its pre-split node.
    ///
    /// Trivially true for nodes that were never split.
    pub fn is_head_block(&self) -> bool {
        match self {
            Node::NonTerminal(nt) => nt.is_head_block(),
            Node::Terminal(_) => true,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Node::Terminal(terminal) => write!(f, "{} {}", terminal.pos, terminal.form),
            Node::NonTerminal(nt) => write!(f, "{}", nt.label),
        }
    }
}

/// Struct representing a non terminal tree node.
///
/// `NonTerminal`s are defined by their `label` and the annotations left by
/// the transformation passes: the `head` flag set by head marking, and the
/// `split`, `head_block` and `block_number` annotations set by block
/// splitting.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NonTerminal {
    label: String,
    head: bool,
    split: bool,
    head_block: bool,
    block_number: Option<usize>,
}

impl NonTerminal {
    pub fn new(label: impl Into<String>) -> Self {
        NonTerminal {
            label: label.into(),
            head: false,
            split: false,
            head_block: true,
            block_number: None,
        }
    }

    // Constructor for the nodes introduced by block splitting.
    pub(crate) fn new_block(
        label: impl Into<String>,
        head: bool,
        head_block: bool,
        block_number: usize,
    ) -> Self {
        NonTerminal {
            label: label.into(),
            head,
            split: true,
            head_block,
            block_number: Some(block_number),
        }
    }

    /// Return the label of the `NonTerminal`.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Return old label and replace with `label`.
    pub fn set_label(&mut self, label: impl Into<String>) -> String {
        mem::replace(&mut self.label, label.into())
    }

    /// Returns whether this node is the head child of its parent.
    pub fn is_head(&self) -> bool {
        self.head
    }

    /// Set the head flag. Returns the replaced value.
    pub fn set_head(&mut self, head: bool) -> bool {
        mem::replace(&mut self.head, head)
    }

    /// Returns whether this node was introduced by block splitting.
    pub fn is_split(&self) -> bool {
        self.split
    }

    pub(crate) fn set_split(&mut self, split: bool) -> bool {
        mem::replace(&mut self.split, split)
    }

    /// Returns whether this node covers the head of its pre-split node.
    pub fn is_head_block(&self) -> bool {
        self.head_block
    }

    pub(crate) fn set_head_block(&mut self, head_block: bool) -> bool {
        mem::replace(&mut self.head_block, head_block)
    }

    /// Return the 1-based position among the sibling nodes introduced by
    /// splitting the same node.
    ///
    /// Returns `None` if this node was not introduced by splitting.
    pub fn block_number(&self) -> Option<usize> {
        self.block_number
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Struct representing a terminal.
///
/// `Terminal`s are represented by:
/// * `form` - word form
/// * `pos` - part of speech tag
/// * `num` - 1-based position in the sentence
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Terminal {
    form: String,
    pos: String,
    num: usize,
    head: bool,
}

impl Terminal {
    pub fn new(form: impl Into<String>, pos: impl Into<String>, num: usize) -> Self {
        Terminal {
            form: form.into(),
            pos: pos.into(),
            num,
            head: false,
        }
    }

    /// Return the `Terminal`'s form.
    pub fn form(&self) -> &str {
        self.form.as_str()
    }

    /// Replace form with `new_form`. Return old value.
    pub fn set_form(&mut self, new_form: impl Into<String>) -> String {
        mem::replace(&mut self.form, new_form.into())
    }

    /// Return part of speech.
    pub fn label(&self) -> &str {
        self.pos.as_str()
    }

    /// Replace part of speech with `new_pos`. Return old value.
    pub fn set_label(&mut self, new_pos: impl Into<String>) -> String {
        mem::replace(&mut self.pos, new_pos.into())
    }

    /// Return the 1-based position of the `Terminal` in the sentence.
    pub fn num(&self) -> usize {
        self.num
    }

    /// Returns whether this terminal is the head child of its parent.
    pub fn is_head(&self) -> bool {
        self.head
    }

    /// Set the head flag. Returns the replaced value.
    pub fn set_head(&mut self, head: bool) -> bool {
        mem::replace(&mut self.head, head)
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.pos, self.form)
    }
}
