//! Statements.
use super::Compiler;
use crate::{
    error::JackResult,
    lex::{Keyword, Symbol, TokenKind},
    vm::{ArithOp, Segment},
    xml::Usage,
};

impl<'a> Compiler<'a> {
    /// Compile statements until the next token can't start one.
    pub(super) fn statements(&mut self) -> JackResult<()> {
        self.open("statements")?;

        loop {
            match self.stream.peek_kind()? {
                TokenKind::Keyword(Keyword::Let) => self.let_statement()?,
                TokenKind::Keyword(Keyword::If) => self.if_statement()?,
                TokenKind::Keyword(Keyword::While) => self.while_statement()?,
                TokenKind::Keyword(Keyword::Do) => self.do_statement()?,
                TokenKind::Keyword(Keyword::Return) => self.return_statement()?,
                _ => break,
            }
        }

        self.close("statements")
    }

    /// ```text
    /// let name ([ expression ])? = expression ;
    /// ```
    fn let_statement(&mut self) -> JackResult<()> {
        self.open("letStatement")?;
        self.keyword(Keyword::Let)?;

        let name = self.ident()?;
        let target = self.resolve_var(&name)?;
        self.record_var(&target, Usage::Using)?;

        if self.match_symbol(Symbol::LeftBracket)? {
            // Element address
            self.push_var(&target)?;
            self.expression()?;
            self.symbol(Symbol::RightBracket)?;
            self.writer.arithmetic(ArithOp::Add)?;

            self.symbol(Symbol::Eq)?;
            self.expression()?;
            self.symbol(Symbol::Semicolon)?;

            // The value expression may itself use `that`, so the
            // address is only loaded into the pointer afterwards.
            self.writer.pop(Segment::Temp, 0)?;
            self.writer.pop(Segment::Pointer, 1)?;
            self.writer.push(Segment::Temp, 0)?;
            self.writer.pop(Segment::That, 0)?;
        } else {
            self.symbol(Symbol::Eq)?;
            self.expression()?;
            self.symbol(Symbol::Semicolon)?;

            self.pop_var(&target)?;
        }

        self.close("letStatement")
    }

    /// ```text
    /// if ( expression ) { statements } (else { statements })?
    /// ```
    fn if_statement(&mut self) -> JackResult<()> {
        self.open("ifStatement")?;
        self.keyword(Keyword::If)?;

        let id = self.next_label_id();
        let else_label = format!("IF_ELSE{id}");
        let end_label = format!("IF_END{id}");

        self.symbol(Symbol::LeftParen)?;
        self.expression()?;
        self.symbol(Symbol::RightParen)?;

        self.writer.arithmetic(ArithOp::Not)?;
        self.writer.if_goto(&else_label)?;

        self.block()?;
        self.writer.goto(&end_label)?;

        self.writer.label(&else_label)?;
        if self.match_kind(TokenKind::Keyword(Keyword::Else))? {
            self.block()?;
        }
        self.writer.label(&end_label)?;

        self.close("ifStatement")
    }

    /// ```text
    /// while ( expression ) { statements }
    /// ```
    fn while_statement(&mut self) -> JackResult<()> {
        self.open("whileStatement")?;
        self.keyword(Keyword::While)?;

        let id = self.next_label_id();
        let exp_label = format!("WHILE_EXP{id}");
        let end_label = format!("WHILE_END{id}");

        self.writer.label(&exp_label)?;

        self.symbol(Symbol::LeftParen)?;
        self.expression()?;
        self.symbol(Symbol::RightParen)?;

        self.writer.arithmetic(ArithOp::Not)?;
        self.writer.if_goto(&end_label)?;

        self.block()?;
        self.writer.goto(&exp_label)?;

        self.writer.label(&end_label)?;

        self.close("whileStatement")
    }

    /// ```text
    /// do subroutineCall ;
    /// ```
    fn do_statement(&mut self) -> JackResult<()> {
        self.open("doStatement")?;
        self.keyword(Keyword::Do)?;

        let head = self.ident()?;
        self.subroutine_call(&head)?;
        self.symbol(Symbol::Semicolon)?;

        // Discard the return value.
        self.writer.pop(Segment::Temp, 0)?;

        self.close("doStatement")
    }

    /// ```text
    /// return expression? ;
    /// ```
    fn return_statement(&mut self) -> JackResult<()> {
        self.open("returnStatement")?;
        self.keyword(Keyword::Return)?;

        if self.peek_is_symbol(Symbol::Semicolon)? {
            // Every subroutine leaves a value on the stack.
            self.writer.push(Segment::Constant, 0)?;
        } else {
            self.expression()?;
        }

        self.symbol(Symbol::Semicolon)?;
        self.writer.ret()?;

        self.close("returnStatement")
    }

    /// ```text
    /// { statements }
    /// ```
    fn block(&mut self) -> JackResult<()> {
        let open = self.symbol(Symbol::LeftBrace)?;
        self.nested(&open, |this| {
            this.statements()?;
            this.end_block()
        })
    }

    /// Consume the closing brace of a statement list.
    pub(super) fn end_block(&mut self) -> JackResult<()> {
        let token = self.advance()?;
        if token.kind.is_symbol(Symbol::RightBrace) {
            Ok(())
        } else {
            Err(self.stream.unexpected(&token, "statement or '}'"))
        }
    }
}
