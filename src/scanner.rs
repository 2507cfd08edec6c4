use derive_more::Display;
use memchr::memchr2;

/// Reference style of an include directive.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    /// `#include "name"` — resolved relative to the including file.
    #[display("quoted")]
    Quoted,
    /// `#include <name>` — resolved against every library root.
    #[display("angle")]
    Angle,
}

/// One include directive pulled out of a source buffer. `name` is the byte
/// sequence between the delimiters, verbatim — no escape processing, no
/// normalization.
#[derive(Debug, PartialEq, Eq)]
pub struct Include<'a> {
    pub name: &'a [u8],
    pub kind: IncludeKind,
}

/// Forward-only lexer that extracts `#include` directives from raw source
/// bytes. A line that turns out not to be a well-formed directive is
/// abandoned by skipping to the next line break, so repeated calls always
/// make progress and arbitrary text drains in one pass.
///
/// Directives are recognized anywhere in the buffer — including inside
/// comments and string literals, which the lexer cannot tell apart from
/// real code.
pub struct IncludeScanner<'a> {
    data: &'a [u8],
    cursor: usize,
}

/// The C `isspace` set. `u8::is_ascii_whitespace` lacks vertical tab.
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

fn is_linebreak(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

impl<'a> IncludeScanner<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.data.len()
    }

    /// Try to lex one directive at the cursor. Returns `None` when the
    /// current line is not a directive; the cursor then sits at the line
    /// break (or end of buffer) and the next call starts fresh.
    pub fn next_directive(&mut self) -> Option<Include<'a>> {
        self.skip_all_whitespace();
        if !self.try_parse(b"#") {
            return self.abandon_line();
        }
        self.skip_intra_line_whitespace();
        if !self.try_parse(b"include") {
            return self.abandon_line();
        }
        self.skip_intra_line_whitespace();
        let (terminator, kind) = if self.try_parse(b"\"") {
            (b'"', IncludeKind::Quoted)
        } else if self.try_parse(b"<") {
            (b'>', IncludeKind::Angle)
        } else {
            return self.abandon_line();
        };
        match self.read_name(terminator) {
            Some(name) => Some(Include { name, kind }),
            None => self.abandon_line(),
        }
    }

    fn skip_all_whitespace(&mut self) {
        while self.data.get(self.cursor).is_some_and(|&b| is_space(b)) {
            self.cursor += 1;
        }
    }

    fn skip_intra_line_whitespace(&mut self) {
        while self
            .data
            .get(self.cursor)
            .is_some_and(|&b| is_space(b) && !is_linebreak(b))
        {
            self.cursor += 1;
        }
    }

    /// Consume `literal` if it sits exactly at the cursor.
    fn try_parse(&mut self, literal: &[u8]) -> bool {
        if self.data[self.cursor..].starts_with(literal) {
            self.cursor += literal.len();
            true
        } else {
            false
        }
    }

    /// Read the directive name up to `terminator`, which must be present
    /// before the line ends — an unterminated name is a failed parse. The
    /// terminator is consumed on success.
    fn read_name(&mut self, terminator: u8) -> Option<&'a [u8]> {
        let start = self.cursor;
        while self
            .data
            .get(self.cursor)
            .is_some_and(|&b| b != terminator && !is_linebreak(b))
        {
            self.cursor += 1;
        }
        if self.data.get(self.cursor) == Some(&terminator) {
            let name = &self.data[start..self.cursor];
            self.cursor += 1;
            Some(name)
        } else {
            None
        }
    }

    /// Give up on the current line: leave the cursor on the line break so
    /// the next call's whitespace skip moves past it.
    fn abandon_line(&mut self) -> Option<Include<'a>> {
        match memchr2(b'\n', b'\r', &self.data[self.cursor..]) {
            Some(offset) => self.cursor += offset,
            None => self.cursor = self.data.len(),
        }
        None
    }
}
