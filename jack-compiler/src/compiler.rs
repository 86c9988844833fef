//! Recursive-descent parser and emitter. Each `compile_*` routine both
//! recognizes one grammar production and emits its VM code as it goes —
//! there is no intermediate AST.

use crate::error::JackError;
use crate::symbol_table::{Kind, SymbolTable};
use crate::token::{Lexer, Token};
use std::io::Write;

pub struct Compiler<W: Write> {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    symbols: SymbolTable,
    out: W,
    class_name: String,
    num_fields: u16,
    if_counter: u32,
    while_counter: u32,
    current_return_type: String,
}

impl<W: Write> Compiler<W> {
    pub fn new(source: &str, out: W) -> Result<Self, JackError> {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        while let Some(tok) = lexer.next_token()? {
            tokens.push((tok, lexer.line()));
        }

        Ok(Compiler {
            tokens,
            pos: 0,
            symbols: SymbolTable::new(),
            out,
            class_name: String::new(),
            num_fields: 0,
            if_counter: 0,
            while_counter: 0,
            current_return_type: String::new(),
        })
    }

    // --- token stream helpers -------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, l)| *l)
            .or_else(|| self.tokens.last().map(|(_, l)| *l))
            .unwrap_or(1)
    }

    fn advance(&mut self) -> Result<Token, JackError> {
        let (tok, _) = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or_else(|| JackError::UnexpectedEof {
                expected: "a token".to_string(),
            })?;
        self.pos += 1;
        Ok(tok)
    }

    fn expect_symbol(&mut self, expected: char) -> Result<(), JackError> {
        let line = self.line();
        match self.advance()? {
            Token::Symbol(c) if c == expected => Ok(()),
            other => Err(JackError::UnexpectedToken {
                expected: format!("'{expected}'"),
                found: other.describe(),
                line,
            }),
        }
    }

    fn expect_keyword(&mut self, expected: &str) -> Result<(), JackError> {
        let line = self.line();
        match self.advance()? {
            Token::Keyword(k) if k == expected => Ok(()),
            other => Err(JackError::UnexpectedToken {
                expected: format!("'{expected}'"),
                found: other.describe(),
                line,
            }),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, JackError> {
        let line = self.line();
        match self.advance()? {
            Token::Identifier(name) => Ok(name),
            other => Err(JackError::UnexpectedToken {
                expected: "identifier".to_string(),
                found: other.describe(),
                line,
            }),
        }
    }

    fn peek_is_symbol(&self, c: char) -> bool {
        matches!(self.peek(), Some(Token::Symbol(s)) if *s == c)
    }

    fn peek_is_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Some(Token::Keyword(k)) if k == kw)
    }

    // --- VM emission -----------------------------------------------------------

    fn write_push(&mut self, segment: &str, index: u16) -> Result<(), JackError> {
        writeln!(self.out, "push {segment} {index}")?;
        Ok(())
    }

    fn write_pop(&mut self, segment: &str, index: u16) -> Result<(), JackError> {
        writeln!(self.out, "pop {segment} {index}")?;
        Ok(())
    }

    fn write_arithmetic(&mut self, op: &str) -> Result<(), JackError> {
        writeln!(self.out, "{op}")?;
        Ok(())
    }

    fn write_call(&mut self, name: &str, nargs: u16) -> Result<(), JackError> {
        writeln!(self.out, "call {name} {nargs}")?;
        Ok(())
    }

    fn write_label(&mut self, label: &str) -> Result<(), JackError> {
        writeln!(self.out, "label {label}")?;
        Ok(())
    }

    fn write_goto(&mut self, label: &str) -> Result<(), JackError> {
        writeln!(self.out, "goto {label}")?;
        Ok(())
    }

    fn write_if_goto(&mut self, label: &str) -> Result<(), JackError> {
        writeln!(self.out, "if-goto {label}")?;
        Ok(())
    }

    fn write_function(&mut self, name: &str, num_locals: u16) -> Result<(), JackError> {
        writeln!(self.out, "function {name} {num_locals}")?;
        Ok(())
    }

    fn write_return(&mut self) -> Result<(), JackError> {
        writeln!(self.out, "return")?;
        Ok(())
    }

    // --- grammar ---------------------------------------------------------------

    pub fn compile_class(&mut self) -> Result<(), JackError> {
        self.expect_keyword("class")?;
        self.class_name = self.expect_identifier()?;
        self.expect_symbol('{')?;

        self.symbols.push_scope();

        while self.peek_is_keyword("static") || self.peek_is_keyword("field") {
            self.compile_class_var_dec()?;
        }

        while self.peek_is_keyword("constructor")
            || self.peek_is_keyword("function")
            || self.peek_is_keyword("method")
        {
            self.compile_subroutine_dec()?;
        }

        self.expect_symbol('}')?;
        self.symbols.pop_scope();
        Ok(())
    }

    fn compile_type(&mut self) -> Result<String, JackError> {
        let line = self.line();
        match self.advance()? {
            Token::Keyword(k) if k == "int" || k == "char" || k == "boolean" => Ok(k),
            Token::Identifier(name) => Ok(name),
            other => Err(JackError::UnexpectedToken {
                expected: "a type".to_string(),
                found: other.describe(),
                line,
            }),
        }
    }

    fn compile_class_var_dec(&mut self) -> Result<(), JackError> {
        let kind = match self.advance()? {
            Token::Keyword(k) if k == "static" => Kind::Static,
            Token::Keyword(k) if k == "field" => Kind::Field,
            _ => unreachable!("caller only enters on static/field"),
        };
        let type_name = self.compile_type()?;

        let first = self.expect_identifier()?;
        self.symbols.define(&first, &type_name, kind);
        if kind == Kind::Field {
            self.num_fields += 1;
        }

        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &type_name, kind);
            if kind == Kind::Field {
                self.num_fields += 1;
            }
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_subroutine_dec(&mut self) -> Result<(), JackError> {
        let line = self.line();
        let subroutine_kind = match self.advance()? {
            Token::Keyword(k) if k == "constructor" || k == "function" || k == "method" => k,
            other => {
                return Err(JackError::UnexpectedToken {
                    expected: "'constructor', 'function', or 'method'".to_string(),
                    found: other.describe(),
                    line,
                })
            }
        };

        let return_type = if self.peek_is_keyword("void") {
            self.advance()?;
            "void".to_string()
        } else {
            self.compile_type()?
        };
        let name = self.expect_identifier()?;

        self.symbols.push_scope();
        self.if_counter = 0;
        self.while_counter = 0;
        self.current_return_type = return_type;

        if subroutine_kind == "method" {
            self.symbols.define("this", &self.class_name.clone(), Kind::Argument);
        }

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.compile_subroutine_body(&subroutine_kind, &name)?;

        self.symbols.pop_scope();
        Ok(())
    }

    fn compile_parameter_list(&mut self) -> Result<(), JackError> {
        if self.peek_is_symbol(')') {
            return Ok(());
        }
        loop {
            let type_name = self.compile_type()?;
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &type_name, Kind::Argument);
            if self.peek_is_symbol(',') {
                self.expect_symbol(',')?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn compile_subroutine_body(&mut self, kind: &str, name: &str) -> Result<(), JackError> {
        self.expect_symbol('{')?;

        while self.peek_is_keyword("var") {
            self.compile_var_dec()?;
        }

        let num_locals = self.symbols.count(Kind::Var);
        self.write_function(&format!("{}.{name}", self.class_name), num_locals)?;

        match kind {
            "constructor" => {
                self.write_push("constant", self.num_fields)?;
                self.write_call("Memory.alloc", 1)?;
                self.write_pop("pointer", 0)?;
            }
            "method" => {
                self.write_push("argument", 0)?;
                self.write_pop("pointer", 0)?;
            }
            _ => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')?;
        Ok(())
    }

    fn compile_var_dec(&mut self) -> Result<(), JackError> {
        self.expect_keyword("var")?;
        let type_name = self.compile_type()?;
        let first = self.expect_identifier()?;
        self.symbols.define(&first, &type_name, Kind::Var);
        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            let name = self.expect_identifier()?;
            self.symbols.define(&name, &type_name, Kind::Var);
        }
        self.expect_symbol(';')?;
        Ok(())
    }

    fn compile_statements(&mut self) -> Result<(), JackError> {
        loop {
            if self.peek_is_keyword("let") {
                self.compile_let()?;
            } else if self.peek_is_keyword("if") {
                self.compile_if()?;
            } else if self.peek_is_keyword("while") {
                self.compile_while()?;
            } else if self.peek_is_keyword("do") {
                self.compile_do()?;
            } else if self.peek_is_keyword("return") {
                self.compile_return()?;
            } else {
                return Ok(());
            }
        }
    }

    fn resolve(&self, name: &str, line: usize) -> Result<crate::symbol_table::Symbol, JackError> {
        self.symbols
            .lookup(name)
            .cloned()
            .ok_or_else(|| JackError::UndefinedIdentifier {
                name: name.to_string(),
                line,
            })
    }

    fn compile_let(&mut self) -> Result<(), JackError> {
        self.expect_keyword("let")?;
        let line = self.line();
        let name = self.expect_identifier()?;

        if self.peek_is_symbol('[') {
            self.expect_symbol('[')?;
            self.compile_expression()?;
            self.expect_symbol(']')?;

            let symbol = self.resolve(&name, line)?;
            self.write_push(symbol.kind.segment(), symbol.index)?;
            self.write_arithmetic("add")?;

            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;

            self.write_pop("temp", 0)?;
            self.write_pop("pointer", 1)?;
            self.write_push("temp", 0)?;
            self.write_pop("that", 0)?;
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;

            let symbol = self.resolve(&name, line)?;
            self.write_pop(symbol.kind.segment(), symbol.index)?;
        }
        Ok(())
    }

    fn compile_if(&mut self) -> Result<(), JackError> {
        self.expect_keyword("if")?;
        let n = self.if_counter;
        self.if_counter += 1;

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;

        self.write_if_goto(&format!("IF_TRUE{n}"))?;
        self.write_goto(&format!("IF_FALSE{n}"))?;
        self.write_label(&format!("IF_TRUE{n}"))?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        if self.peek_is_keyword("else") {
            self.write_goto(&format!("IF_END{n}"))?;
            self.write_label(&format!("IF_FALSE{n}"))?;
            self.expect_keyword("else")?;
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
            self.write_label(&format!("IF_END{n}"))?;
        } else {
            self.write_label(&format!("IF_FALSE{n}"))?;
        }
        Ok(())
    }

    fn compile_while(&mut self) -> Result<(), JackError> {
        self.expect_keyword("while")?;
        let n = self.while_counter;
        self.while_counter += 1;

        self.write_label(&format!("WHILE_EXP{n}"))?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.write_arithmetic("not")?;
        self.write_if_goto(&format!("WHILE_END{n}"))?;

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;

        self.write_goto(&format!("WHILE_EXP{n}"))?;
        self.write_label(&format!("WHILE_END{n}"))?;
        Ok(())
    }

    fn compile_do(&mut self) -> Result<(), JackError> {
        self.expect_keyword("do")?;
        let name = self.expect_identifier()?;
        self.compile_subroutine_call(&name)?;
        self.expect_symbol(';')?;
        self.write_pop("temp", 0)?;
        Ok(())
    }

    fn compile_return(&mut self) -> Result<(), JackError> {
        let line = self.line();
        self.expect_keyword("return")?;

        if self.peek_is_symbol(';') {
            if self.current_return_type != "void" {
                return Err(JackError::UnexpectedToken {
                    expected: "an expression".to_string(),
                    found: "';'".to_string(),
                    line,
                });
            }
            self.write_push("constant", 0)?;
        } else {
            // `this` falls through to the general term path below; kept as
            // an ordinary keyword constant, not a special case.
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.write_return()?;
        Ok(())
    }

    fn compile_expression(&mut self) -> Result<(), JackError> {
        self.compile_term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Symbol(c)) if "+-*/&|<>=".contains(*c) => *c,
                _ => return Ok(()),
            };
            self.advance()?;
            self.compile_term()?;
            match op {
                '+' => self.write_arithmetic("add")?,
                '-' => self.write_arithmetic("sub")?,
                '&' => self.write_arithmetic("and")?,
                '|' => self.write_arithmetic("or")?,
                '<' => self.write_arithmetic("lt")?,
                '>' => self.write_arithmetic("gt")?,
                '=' => self.write_arithmetic("eq")?,
                '*' => self.write_call("Math.multiply", 2)?,
                '/' => self.write_call("Math.divide", 2)?,
                _ => unreachable!("peek already restricted the operator set"),
            }
        }
    }

    fn compile_term(&mut self) -> Result<(), JackError> {
        let line = self.line();
        match self.peek().cloned() {
            Some(Token::IntConst(n)) => {
                self.advance()?;
                self.write_push("constant", n)
            }
            Some(Token::StrConst(s)) => {
                self.advance()?;
                self.write_push("constant", s.len() as u16)?;
                self.write_call("String.new", 1)?;
                for c in s.chars() {
                    self.write_push("constant", c as u16)?;
                    self.write_call("String.appendChar", 2)?;
                }
                Ok(())
            }
            Some(Token::Keyword(k)) if k == "true" => {
                self.advance()?;
                self.write_push("constant", 0)?;
                self.write_arithmetic("not")
            }
            Some(Token::Keyword(k)) if k == "false" || k == "null" => {
                self.advance()?;
                self.write_push("constant", 0)
            }
            Some(Token::Keyword(k)) if k == "this" => {
                self.advance()?;
                self.write_push("pointer", 0)
            }
            Some(Token::Symbol('(')) => {
                self.advance()?;
                self.compile_expression()?;
                self.expect_symbol(')')
            }
            Some(Token::Symbol('-')) => {
                self.advance()?;
                self.compile_term()?;
                self.write_arithmetic("neg")
            }
            Some(Token::Symbol('~')) => {
                self.advance()?;
                self.compile_term()?;
                self.write_arithmetic("not")
            }
            Some(Token::Identifier(name)) => {
                self.advance()?;
                if self.peek_is_symbol('[') {
                    self.expect_symbol('[')?;
                    self.compile_expression()?;
                    self.expect_symbol(']')?;
                    let symbol = self.resolve(&name, line)?;
                    self.write_push(symbol.kind.segment(), symbol.index)?;
                    self.write_arithmetic("add")?;
                    self.write_pop("pointer", 1)?;
                    self.write_push("that", 0)
                } else if self.peek_is_symbol('(') || self.peek_is_symbol('.') {
                    self.compile_subroutine_call(&name)
                } else {
                    let symbol = self.resolve(&name, line)?;
                    self.write_push(symbol.kind.segment(), symbol.index)
                }
            }
            other => Err(JackError::UnexpectedToken {
                expected: "an expression".to_string(),
                found: other.map(|t| t.describe()).unwrap_or_else(|| "end of input".to_string()),
                line,
            }),
        }
    }

    /// Resolves and emits one of the three subroutine-call forms against
    /// `name`, which has already been consumed from the token stream.
    fn compile_subroutine_call(&mut self, name: &str) -> Result<(), JackError> {
        if self.peek_is_symbol('(') {
            self.expect_symbol('(')?;
            self.write_push("pointer", 0)?;
            let nargs = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            self.write_call(&format!("{}.{name}", self.class_name), nargs + 1)
        } else {
            self.expect_symbol('.')?;
            let member = self.expect_identifier()?;
            self.expect_symbol('(')?;

            if let Some(symbol) = self.symbols.lookup(name).cloned() {
                self.write_push(symbol.kind.segment(), symbol.index)?;
                let nargs = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.write_call(&format!("{}.{member}", symbol.type_name), nargs + 1)
            } else {
                let nargs = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.write_call(&format!("{name}.{member}"), nargs)
            }
        }
    }

    fn compile_expression_list(&mut self) -> Result<u16, JackError> {
        if self.peek_is_symbol(')') {
            return Ok(0);
        }
        let mut count = 1u16;
        self.compile_expression()?;
        while self.peek_is_symbol(',') {
            self.expect_symbol(',')?;
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }
}
