//! Compile error carrying the offending source position

use thiserror::Error;

/// Error produced when a path expression fails to compile.
///
/// # Examples
/// ```
/// use xmlpath_core::compile;
///
/// let err = compile("a[0]").unwrap_err();
/// assert_eq!(err.offset(), 3);
/// assert_eq!(err.message(), "positions start at 1");
/// assert_eq!(err.to_string(), r#"compiling xml path "a[0]":3: positions start at 1"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("compiling xml path {path:?}:{offset}: {message}")]
pub struct CompileError {
    path: String,
    offset: usize,
    message: String,
}

impl CompileError {
    pub(crate) fn new(path: &str, offset: usize, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            offset,
            message: message.into(),
        }
    }

    /// The full source text that was being compiled
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Byte offset into [`path`](Self::path) where compilation stopped
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Render the source with a caret under the failing position.
    ///
    /// ```
    /// use xmlpath_core::compile;
    ///
    /// let err = compile("a[b)]").unwrap_err();
    /// assert_eq!(err.pointer(), "a[b)]\n   ^ unexpected ')'");
    /// ```
    pub fn pointer(&self) -> String {
        let column = self
            .path
            .get(..self.offset)
            .map_or(self.offset, |prefix| prefix.chars().count());
        format!("{}\n{}^ {}", self.path, " ".repeat(column), self.message)
    }
}
