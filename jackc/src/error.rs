//! Result and errors.
use std::fmt::{self, Display, Formatter};

use smol_str::SmolStr;

use crate::lex::Span;

pub type JackResult<T> = std::result::Result<T, JackError>;

/// Fatal error aborting the compilation of one class.
#[derive(Debug)]
pub enum JackError {
    /// Character sequence that can't start any token.
    Lex(LexError),
    /// Token doesn't fit the grammar production being compiled.
    Syntax(SyntaxError),
    /// Identifier not declared in either scope.
    Name(NameError),
    Fmt(fmt::Error),
}

impl Display for JackError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(err) => write!(f, "{err}"),
            Self::Syntax(err) => write!(f, "{err}"),
            Self::Name(err) => write!(f, "{err}"),
            Self::Fmt(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for JackError {}

impl From<LexError> for JackError {
    fn from(err: LexError) -> Self {
        JackError::Lex(err)
    }
}

impl From<SyntaxError> for JackError {
    fn from(err: SyntaxError) -> Self {
        JackError::Syntax(err)
    }
}

impl From<NameError> for JackError {
    fn from(err: NameError) -> Self {
        JackError::Name(err)
    }
}

impl From<fmt::Error> for JackError {
    fn from(err: fmt::Error) -> Self {
        JackError::Fmt(err)
    }
}

/// Position of an error, with a copy of the source line
/// so the error outlives the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub span: Span,
    /// Line number, counting from 1.
    pub line_no: usize,
    /// Character column of the span start, counting from 1.
    pub column: usize,
    pub text: String,
}

impl SourceLine {
    pub fn new(source: &str, span: Span) -> Self {
        let (text, line_span) = span.surrounding_line(source);
        let offset = (span.index - line_span.index).min(line_span.size) as usize;
        let column = text[..offset].chars().count() + 1;

        Self {
            span,
            line_no: span.line_number(source),
            column,
            text: text.to_owned(),
        }
    }
}

impl Display for SourceLine {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let gutter = self.line_no.to_string().len();
        let pad = " ".repeat(self.column - 1);

        // Underline at least one character, but never past the end of the line.
        let remaining = self.text.chars().count().saturating_sub(self.column - 1);
        let width = (self.span.size as usize).clamp(1, remaining.max(1));
        let marker = "^".repeat(width);

        writeln!(f, "{:gutter$}--> line {}, column {}", "", self.line_no, self.column)?;
        writeln!(f, "{:gutter$} |", "")?;
        writeln!(f, "{} | {}", self.line_no, self.text)?;
        write!(f, "{:gutter$} | {pad}{marker}", "")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub at: SourceLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    UnknownChar(char),
    /// A newline or the end of the source was reached
    /// before the closing quote.
    UnterminatedString,
    /// Source length in bytes, too long for 32-bit spans.
    SourceTooLarge(usize),
}

impl LexError {
    pub fn new(source: &str, span: Span, kind: LexErrorKind) -> Self {
        Self {
            kind,
            at: SourceLine::new(source, span),
        }
    }
}

impl Display for LexError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            LexErrorKind::UnknownChar(c) => {
                writeln!(f, "lexical error: unrecognised character {c:?}")?
            }
            LexErrorKind::UnterminatedString => {
                writeln!(f, "lexical error: string constant is missing its closing quote")?
            }
            LexErrorKind::SourceTooLarge(len) => {
                writeln!(f, "lexical error: source of {len} bytes exceeds the 4 GiB limit")?
            }
        }
        write!(f, "{}", self.at)
    }
}

impl std::error::Error for LexError {}

/// Error returned when an unexpected token is encountered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Description of what the grammar accepts here.
    pub expected: String,
    /// Source text of the token that was found instead.
    pub found: String,
    pub at: SourceLine,
}

impl SyntaxError {
    pub fn new(source: &str, span: Span, expected: impl ToString, found: impl ToString) -> Self {
        Self {
            expected: expected.to_string(),
            found: found.to_string(),
            at: SourceLine::new(source, span),
        }
    }
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "syntax error: expected {}, found {}",
            self.expected, self.found
        )?;
        write!(f, "{}", self.at)
    }
}

impl std::error::Error for SyntaxError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameError {
    pub name: SmolStr,
    pub at: SourceLine,
}

impl NameError {
    pub fn new(source: &str, span: Span, name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            at: SourceLine::new(source, span),
        }
    }
}

impl Display for NameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "name error: undefined variable '{}'", self.name)?;
        write!(f, "{}", self.at)
    }
}

impl std::error::Error for NameError {}
