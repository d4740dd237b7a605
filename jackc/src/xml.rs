//! XML listings of tokens and parse trees.
use std::fmt::{self, Write};

use crate::{lex::TokenKind, symbol::Kind};

/// Replace the symbols that are special in XML.
pub(crate) fn escape(text: &str) -> &str {
    match text {
        "<" => "&lt;",
        ">" => "&gt;",
        "&" => "&amp;",
        text => text,
    }
}

/// What an identifier names, as shown in annotated trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Class,
    Subroutine,
    Var { kind: Kind, index: u16 },
}

impl Category {
    fn index(&self) -> i32 {
        match self {
            Self::Var { index, .. } => i32::from(*index),
            _ => -1,
        }
    }
}

impl fmt::Display for Category {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Class                            => write!(f, "class"),
            Self::Subroutine                       => write!(f, "subroutine"),
            Self::Var { kind: Kind::Local, .. }    => write!(f, "var"),
            Self::Var { kind, .. }                 => write!(f, "{kind}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Definition,
    Using,
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Definition => write!(f, "definition"),
            Self::Using => write!(f, "using"),
        }
    }
}

/// Parse tree written one element per line, children indented
/// by two spaces.
///
/// With annotations on, identifiers carry their category, their
/// index for variables (-1 otherwise), and whether the occurrence
/// defines or uses the name.
#[derive(Debug, Default)]
pub struct XmlTree {
    buf: String,
    depth: usize,
    annotate: bool,
}

impl XmlTree {
    pub fn new(annotate: bool) -> Self {
        Self {
            annotate,
            ..Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    /// Start a non-terminal element.
    pub fn open(&mut self, tag: &str) -> fmt::Result {
        self.line(format_args!("<{tag}>"))?;
        self.depth += 1;
        Ok(())
    }

    pub fn close(&mut self, tag: &str) -> fmt::Result {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("</{tag}>"))
    }

    /// Terminal element. End-of-file has none.
    pub fn token(&mut self, kind: TokenKind, text: &str) -> fmt::Result {
        match kind.xml_tag() {
            Some(tag) => self.line(format_args!("<{tag}> {} </{tag}>", escape(text))),
            None => Ok(()),
        }
    }

    pub fn ident(&mut self, name: &str, category: Category, usage: Usage) -> fmt::Result {
        if self.annotate {
            self.line(format_args!(
                "<identifier> name: {name}, category: {category}, index: {}, usage: {usage} </identifier>",
                category.index()
            ))
        } else {
            self.line(format_args!("<identifier> {name} </identifier>"))
        }
    }

    fn line(&mut self, args: fmt::Arguments) -> fmt::Result {
        for _ in 0..self.depth {
            self.buf.write_str("  ")?;
        }
        self.buf.write_fmt(args)?;
        self.buf.write_char('\n')
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lex::Symbol;

    #[test]
    fn test_nested_elements() {
        let mut tree = XmlTree::new(false);
        tree.open("term").unwrap();
        tree.token(TokenKind::Symbol(Symbol::Less), "<").unwrap();
        tree.ident("x", Category::Class, Usage::Using).unwrap();
        tree.token(TokenKind::EOF, "").unwrap();
        tree.close("term").unwrap();

        assert_eq!(
            tree.as_str(),
            "<term>\n  <symbol> &lt; </symbol>\n  <identifier> x </identifier>\n</term>\n"
        );
    }

    #[test]
    fn test_annotated_identifiers() {
        let mut tree = XmlTree::new(true);
        let local = Category::Var {
            kind: Kind::Local,
            index: 2,
        };
        tree.ident("sum", local, Usage::Definition).unwrap();
        tree.ident("Main", Category::Class, Usage::Using).unwrap();

        let lines: Vec<&str> = tree.as_str().lines().collect();
        assert_eq!(
            lines,
            [
                "<identifier> name: sum, category: var, index: 2, usage: definition </identifier>",
                "<identifier> name: Main, category: class, index: -1, usage: using </identifier>",
            ]
        );
    }
}
