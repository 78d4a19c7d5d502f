//! Compiler for XML path expressions

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::CompileOptions;
use crate::ast::{Axis, CompiledPath, NodeKind, NodeTest, Predicate, Step};
use crate::cursor::{Cursor, Literal, parse_integer};
use crate::error::CompileError;

/// Terms collected at one parenthesis level of a predicate
#[derive(Debug, Default)]
struct Frame {
    terms: Vec<Predicate>,
    /// The last combinator seen at this level was `and`
    and: bool,
}

impl Frame {
    fn push(&mut self, term: Predicate) {
        if self.and
            && let Some(Predicate::And(terms)) = self.terms.last_mut()
        {
            terms.push(term);
        } else {
            self.terms.push(term);
        }
    }

    /// Turn the last term into a conjunction that the next terms join
    fn begin_and(&mut self) {
        if self.and {
            return;
        }
        self.and = true;
        if let Some(last) = self.terms.pop() {
            self.terms.push(Predicate::And(vec![last]));
        }
    }

    fn collapse(self) -> Option<Predicate> {
        Predicate::any_of(self.terms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    And,
    Or,
}

/// Compiler state for a single path expression
pub struct Compiler<'a> {
    cursor: Cursor<'a>,
    max_depth: usize,
    depth: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(source: &'a str, options: &CompileOptions) -> Self {
        Self {
            cursor: Cursor::new(source),
            max_depth: options.max_depth(),
            depth: 0,
        }
    }

    /// Compile a complete path expression
    pub fn compile(source: &'a str, options: &CompileOptions) -> Result<CompiledPath, CompileError> {
        let mut compiler = Self::new(source, options);
        if source.is_empty() {
            return Err(compiler.error("missing path"));
        }
        match compiler.parse_path() {
            Ok(path) => {
                debug!(path = source, steps = path.steps().len(), "compiled path");
                Ok(path)
            }
            Err(e) => {
                debug!(error = %e, "path compilation failed");
                Err(e)
            }
        }
    }

    fn error(&self, message: impl Into<String>) -> CompileError {
        CompileError::new(self.cursor.source(), self.cursor.position(), message)
    }

    fn parse_path(&mut self) -> Result<CompiledPath, CompileError> {
        let start = self.cursor.position();
        let top_level = self.depth == 0;
        let mut steps = Vec::new();

        loop {
            let step = self.parse_step(steps.is_empty())?;
            steps.push(step);
            if !self.cursor.skip_byte(b'/') {
                break;
            }
        }

        // Nested paths stop at whatever follows them; only the outermost
        // path must account for the whole input.
        if (top_level || self.cursor.position() == start)
            && let Some(ch) = self.cursor.current_char()
        {
            return Err(self.error(format!("unexpected {ch:?}")));
        }

        Ok(CompiledPath::new(self.cursor.slice_from(start), steps))
    }

    /// Parse a path embedded in a predicate
    fn parse_nested_path(&mut self) -> Result<CompiledPath, CompileError> {
        if self.depth >= self.max_depth {
            return Err(self.error(format!(
                "path nesting exceeds limit of {}",
                self.max_depth
            )));
        }
        self.depth += 1;
        let path = self.parse_path();
        self.depth -= 1;
        path
    }

    fn parse_name(&mut self) -> Option<&'a str> {
        let mark = self.cursor.position();
        self.cursor
            .skip_name()
            .then(|| self.cursor.slice_from(mark))
    }

    fn parse_step(&mut self, first: bool) -> Result<Step, CompileError> {
        let mut step = Step::new();

        self.cursor.skip_spaces();
        if first && self.cursor.skip_byte(b'/') {
            step.is_root = true;
            self.cursor.skip_spaces();
            if self.cursor.is_at_end() {
                trace!("parsed root step");
                return Ok(step);
            }
        }

        if self.cursor.peek_byte(b'/') {
            // `//`: the second slash is left to separate the next step
            step.axis = Axis::DescendantOrSelf;
        } else if self.cursor.skip_byte(b'@') {
            let name = self
                .parse_name()
                .ok_or_else(|| self.error("missing name after @"))?;
            step.axis = Axis::Attribute;
            step.node_kind = NodeKind::Attribute;
            step.node_test = NodeTest::from_name(name);
            self.cursor.skip_spaces();
            if self.cursor.skip_byte(b'(') {
                self.parse_kind_test(&mut step, name)?;
            }
        } else {
            let mut name = self.parse_name().ok_or_else(|| self.error("missing name"))?;
            self.cursor.skip_spaces();
            match name {
                "*" => step.node_kind = NodeKind::Start,
                "." => step.axis = Axis::SelfNode,
                ".." => step.axis = Axis::Parent,
                _ => {
                    if self.cursor.skip_byte(b':') {
                        if !self.cursor.skip_byte(b':') {
                            return Err(self.error("missing ':'"));
                        }
                        self.cursor.skip_spaces();
                        step.axis = Axis::from_keyword(name)
                            .ok_or_else(|| self.error(format!("unsupported axis: {name:?}")))?;
                        step.node_kind = step.axis.principal_kind();
                        name = self.parse_name().ok_or_else(|| self.error("missing name"))?;
                        self.cursor.skip_spaces();
                    }

                    if self.cursor.skip_byte(b'(') {
                        self.parse_kind_test(&mut step, name)?;
                    } else {
                        step.node_test = NodeTest::from_name(name);
                        if step.node_test.is_wildcard() && step.node_kind == NodeKind::Any {
                            step.node_kind = NodeKind::Start;
                        }
                    }
                }
            }
        }

        if self.cursor.skip_byte(b'[') {
            step.predicate = Some(self.parse_predicate()?);
        }

        trace!(
            axis = %step.axis,
            kind = %step.node_kind,
            test = %step.node_test,
            root = step.is_root,
            "parsed step"
        );
        Ok(step)
    }

    /// Parse the rest of a function-style node test after `name(`
    fn parse_kind_test(&mut self, step: &mut Step, name: &str) -> Result<(), CompileError> {
        let kind = NodeKind::from_function(name)
            .ok_or_else(|| self.error(format!("unsupported expression: {name}()")))?;
        self.check_axis_kind(step, name)?;
        step.node_kind = kind;

        self.cursor.skip_spaces();
        step.node_test = match self.cursor.parse_literal() {
            Literal::Absent => NodeTest::Wildcard,
            Literal::Quoted(target) if kind == NodeKind::ProcessingInstruction => {
                self.cursor.skip_spaces();
                NodeTest::Name(target.to_string())
            }
            Literal::Quoted(_) => return Err(self.error(format!("{name}() has no arguments"))),
            Literal::Unterminated(quote) => return Err(self.error(missing_quote(quote))),
        };

        if !self.cursor.skip_byte(b')') {
            return Err(self.error(format!("{name}() missing ')'")));
        }
        self.cursor.skip_spaces();
        Ok(())
    }

    /// A function-style test needs the node kind to still be open; an axis
    /// that already implies a kind can never match it.
    fn check_axis_kind(&self, step: &Step, name: &str) -> Result<(), CompileError> {
        if step.node_kind != NodeKind::Any {
            return Err(self.error(format!(
                "{name}() cannot succeed on axis {:?}",
                step.axis.as_str()
            )));
        }
        Ok(())
    }

    // ========== Predicate Parsing ==========

    /// Parse a predicate body; the opening `[` is already consumed.
    ///
    /// `and` binds tighter than `or` and both associate to the left.
    /// Parenthesized groups push a frame; closing one feeds the grouped
    /// predicate back to the enclosing frame as an ordinary term.
    fn parse_predicate(&mut self) -> Result<Predicate, CompileError> {
        let mut stack: SmallVec<[Frame; 4]> = SmallVec::new();
        let mut frame = Frame::default();

        loop {
            self.cursor.skip_spaces();
            while self.cursor.skip_byte(b'(') {
                stack.push(std::mem::take(&mut frame));
                self.cursor.skip_spaces();
            }
            if self.cursor.is_at_end() {
                return Err(self.error(expected_closer(&stack)));
            }

            let mut term = self.parse_predicate_term()?;
            let combinator = loop {
                frame.push(term);
                if let Some(combinator) = self.parse_combinator() {
                    break Some(combinator);
                }
                if !self.cursor.peek_byte(b')') {
                    break None;
                }
                term = self.close_frame(&mut stack, &mut frame)?;
                self.cursor.skip_byte(b')');
            };

            match combinator {
                Some(Combinator::And) => frame.begin_and(),
                Some(Combinator::Or) => frame.and = false,
                None => break,
            }
        }

        if !stack.is_empty() {
            return Err(self.error("expected ')'"));
        }
        let predicate = frame
            .collapse()
            .ok_or_else(|| self.error("expected ']'"))?;
        if !self.cursor.skip_byte(b']') {
            return Err(self.error("expected ']'"));
        }
        self.cursor.skip_spaces();

        trace!(predicate = %predicate, "parsed predicate");
        Ok(predicate)
    }

    /// Pop the innermost group, returning its collapsed predicate
    fn close_frame(
        &self,
        stack: &mut SmallVec<[Frame; 4]>,
        frame: &mut Frame,
    ) -> Result<Predicate, CompileError> {
        // Reported at the `)` itself; the caller consumes it only on success.
        let parent = stack.pop().ok_or_else(|| self.error("unexpected ')'"))?;
        std::mem::replace(frame, parent)
            .collapse()
            .ok_or_else(|| self.error("expected predicate"))
    }

    /// Parse `and`/`or` between terms; both need a space on either side
    fn parse_combinator(&mut self) -> Option<Combinator> {
        self.cursor.skip_spaces();
        if !self.cursor.follows_space() {
            return None;
        }
        if self.cursor.skip_word("and") {
            Some(Combinator::And)
        } else if self.cursor.skip_word("or") {
            Some(Combinator::Or)
        } else {
            None
        }
    }

    fn parse_predicate_term(&mut self) -> Result<Predicate, CompileError> {
        if let Some(digits) = self.cursor.parse_digits() {
            let position: usize = digits
                .parse()
                .map_err(|_| self.error("position out of range"))?;
            if position == 0 {
                return Err(self.error("positions start at 1"));
            }
            return Ok(Predicate::Position(position));
        }

        if self.cursor.skip_string("contains(") {
            let path = self.parse_nested_path()?;
            self.cursor.skip_spaces();
            if !self.cursor.skip_byte(b',') {
                return Err(self.error("contains() expected ',' followed by a literal string"));
            }
            self.cursor.skip_spaces();
            let literal = self.parse_required_literal()?;
            self.cursor.skip_spaces();
            if !self.cursor.skip_byte(b')') {
                return Err(self.error("contains() missing ')'"));
            }
            return Ok(Predicate::Contains { path, literal });
        }

        if self.cursor.skip_string("not(") {
            let path = self.parse_nested_path()?;
            self.cursor.skip_spaces();
            if !self.cursor.skip_byte(b')') {
                return Err(self.error("not() missing ')'"));
            }
            return Ok(Predicate::Not(path));
        }

        let path = self.parse_nested_path()?;
        if path.source().starts_with('-') && parse_integer(path.source()).is_some() {
            return Err(self.error("positions must be positive"));
        }
        self.cursor.skip_spaces();
        if self.cursor.skip_byte(b'=') {
            self.cursor.skip_spaces();
            let literal = self.parse_required_literal()?;
            return Ok(Predicate::Equals { path, literal });
        }
        Ok(Predicate::Exists(path))
    }

    fn parse_required_literal(&mut self) -> Result<String, CompileError> {
        match self.cursor.parse_literal() {
            Literal::Quoted(value) => Ok(value.to_string()),
            Literal::Absent => Err(self.error("expected a literal string")),
            Literal::Unterminated(quote) => Err(self.error(missing_quote(quote))),
        }
    }
}

fn missing_quote(quote: char) -> &'static str {
    if quote == '"' {
        r#"missing '"'"#
    } else {
        r#"missing "'""#
    }
}

fn expected_closer(stack: &[Frame]) -> &'static str {
    if stack.is_empty() {
        "expected ']'"
    } else {
        "expected ')'"
    }
}
