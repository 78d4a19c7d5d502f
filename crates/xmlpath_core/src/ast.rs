//! Compiled representation of XML path expressions

use std::fmt;

/// A compiled path expression.
///
/// Equality is structural: two paths are equal when their steps are,
/// regardless of the source text they were compiled from.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompiledPath {
    source: String,
    steps: Vec<Step>,
}

impl CompiledPath {
    pub(crate) fn new(source: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            source: source.into(),
            steps,
        }
    }

    /// The exact text this path was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether the path starts at the document root
    pub fn is_absolute(&self) -> bool {
        self.steps.first().is_some_and(|step| step.is_root)
    }
}

impl PartialEq for CompiledPath {
    fn eq(&self, other: &Self) -> bool {
        self.steps == other.steps
    }
}

impl Eq for CompiledPath {}

/// One navigation step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Step {
    pub(crate) is_root: bool,
    pub(crate) axis: Axis,
    pub(crate) node_test: NodeTest,
    pub(crate) node_kind: NodeKind,
    pub(crate) predicate: Option<Predicate>,
}

impl Step {
    pub(crate) fn new() -> Self {
        Self {
            is_root: false,
            axis: Axis::Child,
            node_test: NodeTest::Wildcard,
            node_kind: NodeKind::Any,
            predicate: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn node_test(&self) -> &NodeTest {
        &self.node_test
    }

    pub fn node_kind(&self) -> NodeKind {
        self.node_kind
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }
}

/// Direction a step navigates from its context node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Axis {
    #[cfg_attr(feature = "serde", serde(rename = "self"))]
    SelfNode,
    Child,
    Parent,
    Attribute,
    Descendant,
    DescendantOrSelf,
    Ancestor,
    AncestorOrSelf,
    Following,
    FollowingSibling,
    Preceding,
    PrecedingSibling,
}

impl Axis {
    /// Look up an axis by its keyword, as written before `::`
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let axis = match keyword {
            "self" => Self::SelfNode,
            "child" => Self::Child,
            "parent" => Self::Parent,
            "attribute" => Self::Attribute,
            "descendant" => Self::Descendant,
            "descendant-or-self" => Self::DescendantOrSelf,
            "ancestor" => Self::Ancestor,
            "ancestor-or-self" => Self::AncestorOrSelf,
            "following" => Self::Following,
            "following-sibling" => Self::FollowingSibling,
            "preceding" => Self::Preceding,
            "preceding-sibling" => Self::PrecedingSibling,
            _ => return None,
        };
        Some(axis)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelfNode => "self",
            Self::Child => "child",
            Self::Parent => "parent",
            Self::Attribute => "attribute",
            Self::Descendant => "descendant",
            Self::DescendantOrSelf => "descendant-or-self",
            Self::Ancestor => "ancestor",
            Self::AncestorOrSelf => "ancestor-or-self",
            Self::Following => "following",
            Self::FollowingSibling => "following-sibling",
            Self::Preceding => "preceding",
            Self::PrecedingSibling => "preceding-sibling",
        }
    }

    /// Node kind implied by the axis itself
    pub(crate) fn principal_kind(&self) -> NodeKind {
        match self {
            Self::Attribute => NodeKind::Attribute,
            _ => NodeKind::Any,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name a step's candidate nodes must carry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NodeTest {
    /// `*`: any name
    Wildcard,
    Name(String),
}

impl NodeTest {
    pub(crate) fn from_name(name: &str) -> Self {
        if name == "*" {
            Self::Wildcard
        } else {
            Self::Name(name.to_string())
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Wildcard => None,
            Self::Name(name) => Some(name),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }
}

impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wildcard => f.write_str("*"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Structural category of node a step may select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum NodeKind {
    Any,
    /// Element-like nodes
    Start,
    Attribute,
    Text,
    Comment,
    ProcessingInstruction,
}

impl NodeKind {
    /// Node kind selected by a function-style test such as `text()`
    pub fn from_function(name: &str) -> Option<Self> {
        let kind = match name {
            "node" => Self::Any,
            "text" => Self::Text,
            "comment" => Self::Comment,
            "processing-instruction" => Self::ProcessingInstruction,
            _ => return None,
        };
        Some(kind)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "node",
            Self::Start => "start",
            Self::Attribute => "attribute",
            Self::Text => "text",
            Self::Comment => "comment",
            Self::ProcessingInstruction => "processing-instruction",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean filter attached to a step
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Predicate {
    /// `[n]`: the n-th matching sibling, 1-based
    Position(usize),
    /// `[contains(path, 'literal')]`
    Contains {
        path: CompiledPath,
        literal: String,
    },
    /// `[not(path)]`
    Not(CompiledPath),
    /// `[path = 'literal']`
    Equals {
        path: CompiledPath,
        literal: String,
    },
    /// `[path]`
    Exists(CompiledPath),
    /// Conjunction of at least two terms
    And(Vec<Predicate>),
    /// Disjunction of at least two terms
    Or(Vec<Predicate>),
}

impl Predicate {
    /// Collapse a term list into one predicate: the lone term, or an `Or`
    pub(crate) fn any_of(mut terms: Vec<Predicate>) -> Option<Self> {
        match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(Self::Or(terms)),
        }
    }

    fn fmt_term(&self, f: &mut fmt::Formatter<'_>, parent: &Predicate) -> fmt::Result {
        let grouped = match (parent, self) {
            (Self::And(_), Self::And(_) | Self::Or(_)) => true,
            (Self::Or(_), Self::Or(_)) => true,
            _ => false,
        };
        if grouped {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(n) => write!(f, "{n}"),
            Self::Contains { path, literal } => {
                write!(f, "contains({path}, {})", Quoted(literal))
            }
            Self::Not(path) => write!(f, "not({path})"),
            Self::Equals { path, literal } => write!(f, "{path} = {}", Quoted(literal)),
            Self::Exists(path) => write!(f, "{path}"),
            Self::And(terms) | Self::Or(terms) => {
                let keyword = if matches!(self, Self::And(_)) {
                    " and "
                } else {
                    " or "
                };
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(keyword)?;
                    }
                    term.fmt_term(f, self)?;
                }
                Ok(())
            }
        }
    }
}

/// Literal rendered with whichever quote it does not contain
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.contains('\'') {
            write!(f, "\"{}\"", self.0)
        } else {
            write!(f, "'{}'", self.0)
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::", self.axis)?;
        match (self.node_kind, &self.node_test) {
            (NodeKind::Any, NodeTest::Wildcard) => f.write_str("node()")?,
            (NodeKind::Text | NodeKind::Comment, _) => write!(f, "{}()", self.node_kind)?,
            (NodeKind::ProcessingInstruction, NodeTest::Wildcard) => {
                f.write_str("processing-instruction()")?
            }
            (NodeKind::ProcessingInstruction, NodeTest::Name(target)) => {
                write!(f, "processing-instruction({})", Quoted(target))?
            }
            (_, test) => write!(f, "{test}")?,
        }
        if let Some(predicate) = &self.predicate {
            write!(f, "[{predicate}]")?;
        }
        Ok(())
    }
}

impl fmt::Display for CompiledPath {
    /// Renders the expanded form, e.g. `//a` as
    /// `/descendant-or-self::node()/child::a`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_absolute() {
            f.write_str("/")?;
        }
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
