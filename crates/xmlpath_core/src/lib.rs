//! xmlpath_core - XML path expression compiler
//!
//! This library compiles XPath-like expressions into a sequence of
//! navigation steps that an evaluator can walk over a markup tree.

pub mod ast;
pub mod cursor;
pub mod error;
pub mod parser;

use std::str::FromStr;

pub use ast::{Axis, CompiledPath, NodeKind, NodeTest, Predicate, Step};
pub use error::CompileError;

/// Default limit on how deeply predicate sub-paths may nest
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Settings for a compile call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    max_depth: usize,
}

impl CompileOptions {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Limit the nesting of paths inside predicates, e.g. `a[b[c]]` nests
    /// two levels deep.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile an XML path expression
///
/// # Arguments
/// * `source` - A path expression (e.g., "/library/book[@lang = 'en']/title")
///
/// # Returns
/// The compiled steps, or an error pointing at the offending position
///
/// # Example
/// ```
/// use xmlpath_core::{Axis, Predicate, compile};
///
/// let path = compile("//book[2]").unwrap();
/// assert_eq!(path.steps().len(), 2);
/// assert_eq!(path.steps()[0].axis(), Axis::DescendantOrSelf);
/// assert_eq!(path.steps()[1].predicate(), Some(&Predicate::Position(2)));
/// ```
pub fn compile(source: &str) -> Result<CompiledPath, CompileError> {
    compile_with(source, &CompileOptions::default())
}

/// Compile an XML path expression with explicit options
pub fn compile_with(source: &str, options: &CompileOptions) -> Result<CompiledPath, CompileError> {
    parser::Compiler::compile(source, options)
}

impl CompiledPath {
    /// Compile `source` with default options
    pub fn parse(source: &str) -> Result<Self, CompileError> {
        compile(source)
    }
}

impl FromStr for CompiledPath {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}
