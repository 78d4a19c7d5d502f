//! Byte cursor over an XML path expression

/// Outcome of reading a quoted literal at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal<'a> {
    /// The cursor is not positioned on a quote
    Absent,
    /// Content between matching quotes
    Quoted(&'a str),
    /// An opening quote with no matching close
    Unterminated(char),
}

/// Cursor over the source text of a path expression.
///
/// Every operation either advances the offset or leaves it untouched, so
/// the offset always stays within `0..=source.len()` and on a char boundary.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Text between `start` and the current offset
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.source.get(start..self.position).unwrap_or_default()
    }

    /// Character at the current offset, if any
    pub fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &'a str {
        self.source.get(self.position..).unwrap_or_default()
    }

    fn current(&self) -> Option<u8> {
        self.source.as_bytes().get(self.position).copied()
    }

    /// Skip ASCII spaces, returning whether any were consumed
    pub fn skip_spaces(&mut self) -> bool {
        let mark = self.position;
        while self.current() == Some(b' ') {
            self.position += 1;
        }
        self.position != mark
    }

    /// Whether the byte just before the cursor is a space
    pub fn follows_space(&self) -> bool {
        self.position
            .checked_sub(1)
            .and_then(|i| self.source.as_bytes().get(i))
            == Some(&b' ')
    }

    pub fn skip_byte(&mut self, b: u8) -> bool {
        if self.peek_byte(b) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub fn peek_byte(&self, b: u8) -> bool {
        self.current() == Some(b)
    }

    /// Skip `s` if the input continues with exactly it
    pub fn skip_string(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.position += s.len();
            true
        } else {
            false
        }
    }

    /// Skip `word` and the spaces after it. Nothing is consumed unless at
    /// least one space follows the word.
    pub fn skip_word(&mut self, word: &str) -> bool {
        let spaced = self
            .rest()
            .strip_prefix(word)
            .is_some_and(|rest| rest.starts_with(' '));
        if spaced {
            self.position += word.len();
            self.skip_spaces();
        }
        spaced
    }

    /// Skip a lone `*` or a maximal run of name characters.
    pub fn skip_name(&mut self) -> bool {
        if self.skip_byte(b'*') {
            return true;
        }
        let mark = self.position;
        while self.current().is_some_and(is_name_byte) {
            self.position += 1;
        }
        self.position != mark
    }

    /// Read a run of ASCII digits
    pub fn parse_digits(&mut self) -> Option<&'a str> {
        let mark = self.position;
        while self.current().is_some_and(|b| b.is_ascii_digit()) {
            self.position += 1;
        }
        if self.position == mark {
            None
        } else {
            Some(self.slice_from(mark))
        }
    }

    /// Read a single or double quoted literal.
    ///
    /// There are no escape sequences: the literal ends at the next quote
    /// of the same kind. On `Absent` and `Unterminated` the cursor is left
    /// where it was.
    pub fn parse_literal(&mut self) -> Literal<'a> {
        let quote = match self.current() {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Literal::Absent,
        };
        let start = self.position + 1;
        let body = self.source.get(start..).unwrap_or_default();
        match body.bytes().position(|b| b == quote) {
            Some(len) => {
                self.position = start + len + 1;
                Literal::Quoted(body.get(..len).unwrap_or_default())
            }
            None => Literal::Unterminated(char::from(quote)),
        }
    }
}

/// Bytes allowed inside a name. Bytes of multi-byte UTF-8 sequences are
/// all >= 0x80, so a run never stops inside a character.
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-') || b >= 0x80
}

/// Parse `text` as an optionally negative decimal integer
pub fn parse_integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_spaces() {
        let mut cursor = Cursor::new("  a");
        assert!(cursor.skip_spaces());
        assert_eq!(cursor.position(), 2);
        assert!(!cursor.skip_spaces());
        assert!(cursor.follows_space());
    }

    #[test]
    fn test_skip_spaces_ignores_tabs() {
        let mut cursor = Cursor::new("\ta");
        assert!(!cursor.skip_spaces());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_skip_and_peek_byte() {
        let mut cursor = Cursor::new("/a");
        assert!(cursor.peek_byte(b'/'));
        assert!(!cursor.skip_byte(b'a'));
        assert!(cursor.skip_byte(b'/'));
        assert!(cursor.peek_byte(b'a'));
        assert!(cursor.skip_byte(b'a'));
        assert!(cursor.is_at_end());
        assert!(!cursor.skip_byte(b'a'));
    }

    #[test]
    fn test_skip_string_is_atomic() {
        let mut cursor = Cursor::new("contain(");
        assert!(!cursor.skip_string("contains("));
        assert_eq!(cursor.position(), 0);
        assert!(cursor.skip_string("contain"));
        assert_eq!(cursor.position(), 7);
    }

    #[test]
    fn test_skip_word_needs_trailing_space() {
        let mut cursor = Cursor::new("and  b");
        assert!(!cursor.skip_word("or"));
        assert!(cursor.skip_word("and"));
        assert_eq!(cursor.position(), 5);

        let mut cursor = Cursor::new("android");
        assert!(!cursor.skip_word("and"));
        assert_eq!(cursor.position(), 0);

        let mut cursor = Cursor::new("and");
        assert!(!cursor.skip_word("and"));
    }

    #[test]
    fn test_skip_name_stops_at_colon() {
        let mut cursor = Cursor::new("child::a");
        assert!(cursor.skip_name());
        assert_eq!(cursor.slice_from(0), "child");
    }

    #[test]
    fn test_skip_name_wildcard() {
        let mut cursor = Cursor::new("*abc");
        assert!(cursor.skip_name());
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_skip_name_symbols() {
        let mut cursor = Cursor::new("my-tag_1.x/");
        assert!(cursor.skip_name());
        assert_eq!(cursor.slice_from(0), "my-tag_1.x");
    }

    #[test]
    fn test_skip_name_non_ascii() {
        let mut cursor = Cursor::new("日本語[1]");
        assert!(cursor.skip_name());
        assert_eq!(cursor.slice_from(0), "日本語");
        assert_eq!(cursor.current_char(), Some('['));
    }

    #[test]
    fn test_skip_name_empty() {
        let mut cursor = Cursor::new("[1]");
        assert!(!cursor.skip_name());
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_parse_digits() {
        let mut cursor = Cursor::new("123]");
        assert_eq!(cursor.parse_digits(), Some("123"));
        assert_eq!(cursor.parse_digits(), None);
        assert!(cursor.peek_byte(b']'));
    }

    #[test]
    fn test_parse_literal_quotes() {
        let mut cursor = Cursor::new(r#"'a"b' "c'd""#);
        assert_eq!(cursor.parse_literal(), Literal::Quoted("a\"b"));
        cursor.skip_spaces();
        assert_eq!(cursor.parse_literal(), Literal::Quoted("c'd"));
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_parse_literal_absent() {
        let mut cursor = Cursor::new("abc");
        assert_eq!(cursor.parse_literal(), Literal::Absent);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_parse_literal_no_escapes() {
        let mut cursor = Cursor::new(r"'a\'b");
        assert_eq!(cursor.parse_literal(), Literal::Quoted(r"a\"));
        assert_eq!(cursor.current_char(), Some('b'));
    }

    #[test]
    fn test_parse_literal_unterminated() {
        let mut cursor = Cursor::new("\"abc");
        assert_eq!(cursor.parse_literal(), Literal::Unterminated('"'));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-7"), Some(-7));
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer("-1 "), None);
        assert_eq!(parse_integer("+1"), None);
        assert_eq!(parse_integer("-a"), None);
    }
}
