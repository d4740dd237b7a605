//! Text output of stack machine instructions.
use std::fmt::Write;

use super::{ArithOp, Segment};
use crate::error::JackResult;

/// Serializes instructions, one per line, into an internal buffer.
///
/// The writer has no knowledge of scopes and doesn't validate what
/// it's given.
#[derive(Debug, Default)]
pub struct VmWriter {
    code: String,
    /// Indent instructions that aren't a `function` or `label`.
    /// Purely cosmetic.
    indent: bool,
}

impl VmWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(indent: bool) -> Self {
        Self {
            code: String::new(),
            indent,
        }
    }

    /// Accumulated instruction text.
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn into_code(self) -> String {
        self.code
    }
}

/// Instructions
impl VmWriter {
    /// `push segment index`
    pub fn push(&mut self, segment: Segment, index: u32) -> JackResult<()> {
        self.body_line()?;
        writeln!(self.code, "push {segment} {index}")?;
        Ok(())
    }

    /// `pop segment index`
    pub fn pop(&mut self, segment: Segment, index: u32) -> JackResult<()> {
        self.body_line()?;
        writeln!(self.code, "pop {segment} {index}")?;
        Ok(())
    }

    pub fn arithmetic(&mut self, op: ArithOp) -> JackResult<()> {
        self.body_line()?;
        writeln!(self.code, "{op}")?;
        Ok(())
    }

    pub fn label(&mut self, label: &str) -> JackResult<()> {
        writeln!(self.code, "label {label}")?;
        Ok(())
    }

    pub fn goto(&mut self, label: &str) -> JackResult<()> {
        self.body_line()?;
        writeln!(self.code, "goto {label}")?;
        Ok(())
    }

    pub fn if_goto(&mut self, label: &str) -> JackResult<()> {
        self.body_line()?;
        writeln!(self.code, "if-goto {label}")?;
        Ok(())
    }

    /// `call name n_args`, where the name is fully qualified.
    pub fn call(&mut self, name: &str, n_args: u32) -> JackResult<()> {
        self.body_line()?;
        writeln!(self.code, "call {name} {n_args}")?;
        Ok(())
    }

    /// `function name n_locals`, where the name is fully qualified.
    pub fn function(&mut self, name: &str, n_locals: u32) -> JackResult<()> {
        writeln!(self.code, "function {name} {n_locals}")?;
        Ok(())
    }

    pub fn ret(&mut self) -> JackResult<()> {
        self.body_line()?;
        writeln!(self.code, "return")?;
        Ok(())
    }

    #[inline]
    fn body_line(&mut self) -> JackResult<()> {
        if self.indent {
            self.code.write_str("    ")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_instruction_text() {
        let mut w = VmWriter::new();
        w.function("Main.main", 2).unwrap();
        w.push(Segment::Constant, 7).unwrap();
        w.pop(Segment::That, 0).unwrap();
        w.arithmetic(ArithOp::Neg).unwrap();
        w.label("WHILE_EXP0").unwrap();
        w.if_goto("WHILE_END0").unwrap();
        w.goto("WHILE_EXP0").unwrap();
        w.call("Math.multiply", 2).unwrap();
        w.ret().unwrap();

        let expected = [
            "function Main.main 2",
            "push constant 7",
            "pop that 0",
            "neg",
            "label WHILE_EXP0",
            "if-goto WHILE_END0",
            "goto WHILE_EXP0",
            "call Math.multiply 2",
            "return",
        ];
        assert_eq!(w.code().lines().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_indent_is_cosmetic() {
        let mut w = VmWriter::with_indent(true);
        w.function("Main.f", 0).unwrap();
        w.push(Segment::Pointer, 0).unwrap();
        w.label("L").unwrap();
        w.ret().unwrap();

        assert_eq!(
            w.code(),
            "function Main.f 0\n    push pointer 0\nlabel L\n    return\n"
        );
    }
}
