use crate::ast::{Expr, FunctionDecl, Stmt};
use crate::errors::ParsingError;
use crate::stack::ensure_sufficient_stack;
use crate::tokens::{Kind, Token};
use crate::value::Value;

use std::mem;
use std::rc::Rc;

use tracing::debug;

/// Most arguments a call, or parameters a declaration, may have.
pub const MAX_ARGS: usize = 255;

/// Deepest the syntax tree may nest before parsing gives up on the declaration.
pub const MAX_NESTING: usize = 1024;

type ParseResult<T> = Result<T, ParsingError>;

/// Create an Abstract Syntax Tree from a token stream ending in `Kind::Eof`.
/// This is a top-down, recursive descent parser with a single token of lookahead.
pub struct Parser<'a> {
    tokens: &'a [Token],
    current: usize,
    errors: Vec<ParsingError>,
    function_depth: usize,
    nesting: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            function_depth: 0,
            nesting: 0,
        }
    }

    /// program ---> declaration* EOF
    pub fn parse(&mut self) -> (Vec<Stmt>, Vec<ParsingError>) {
        let mut statements = Vec::new();

        while !self.finished() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        debug!(
            statements = statements.len(),
            errors = self.errors.len(),
            "parsed program"
        );

        (statements, mem::take(&mut self.errors))
    }

    /// Parse a single expression. Used by the `parse` and `evaluate` commands.
    pub fn parse_expression(&mut self) -> (Option<Expr>, Vec<ParsingError>) {
        let expr = match self.expression() {
            Ok(expr) => Some(expr),
            Err(err) => {
                self.nesting = 0;
                self.errors.push(err);
                None
            }
        };

        (expr, mem::take(&mut self.errors))
    }

    /// When in panic mode, consume tokens until reaching a new statement so parsing can begin again.
    /// Stops after a `;`, or before a keyword that starts a statement. A declaration that failed
    /// on its first token always gives up at least that token.
    fn synchronise(&mut self, start: usize) {
        if self.current == start {
            self.next();
        }

        while !self.finished() {
            if self.check(&[
                Kind::Class,
                Kind::Fun,
                Kind::Var,
                Kind::For,
                Kind::If,
                Kind::While,
                Kind::Print,
                Kind::Return,
            ]) {
                return;
            }

            if self.next().kind == Kind::SemiColon {
                return;
            }
        }
    }

    /// declaration ---> classDecl | funDecl | varDecl | statement
    fn declaration(&mut self) -> Option<Stmt> {
        let start = self.current;
        let nesting = self.nesting;

        let result = self.nested(|parser| {
            if parser.check(&[Kind::Class]) {
                parser.class_declaration()
            } else if parser.check(&[Kind::Fun]) {
                parser.next();
                parser.function("function").map(Stmt::Function)
            } else if parser.check(&[Kind::Var]) {
                parser.var_declaration()
            } else {
                parser.statement()
            }
        });

        match result {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                debug!(line = err.line(), "syntax error, synchronising");
                self.nesting = nesting;
                self.errors.push(err);
                self.synchronise(start);
                None
            }
        }
    }

    /// classDecl ---> "class" IDENTIFIER ( "<" IDENTIFIER )? "{" function* "}"
    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        self.consume(Kind::Class, "Expect 'class'.")?;
        let name = self.consume(Kind::Identifier(String::new()), "Expect class name.")?;

        let superclass = match self.match_kind(&[Kind::Less]) {
            Some(_) => Some(self.consume(
                Kind::Identifier(String::new()),
                "Expect superclass name.",
            )?),
            None => None,
        };

        self.consume(Kind::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(&[Kind::RightBrace]) && !self.finished() {
            methods.push(self.function("method")?);
        }

        self.consume(Kind::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class {
            name,
            superclass,
            methods,
        })
    }

    /// function ---> IDENTIFIER "(" parameters? ")" "{" block
    fn function(&mut self, kind: &str) -> ParseResult<Rc<FunctionDecl>> {
        let name = self.consume(
            Kind::Identifier(String::new()),
            &format!("Expect {} name.", kind),
        )?;
        self.consume(Kind::LeftParen, &format!("Expect '(' after {} name.", kind))?;

        let mut params = Vec::new();
        if !self.check(&[Kind::RightParen]) {
            loop {
                if params.len() >= MAX_ARGS {
                    let err = self.error(format!("Can't have more than {} parameters.", MAX_ARGS));
                    self.errors.push(err);
                }

                let param =
                    self.consume(Kind::Identifier(String::new()), "Expect parameter name.")?;
                params.push(param);

                if self.match_kind(&[Kind::Comma]).is_none() {
                    break;
                }
            }
        }

        self.consume(Kind::RightParen, "Expect ')' after parameters.")?;
        self.consume(Kind::LeftBrace, &format!("Expect '{{' before {} body.", kind))?;

        self.function_depth += 1;
        let body = self.block();
        self.function_depth -= 1;

        Ok(Rc::new(FunctionDecl {
            name,
            params,
            body: body?,
        }))
    }

    /// varDecl ---> "var" IDENTIFIER ( "=" expression )? ";"
    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        self.consume(Kind::Var, "Expect 'var'.")?;

        let name = self.consume(Kind::Identifier(String::new()), "Expect variable name.")?;

        let initial = match self.match_kind(&[Kind::Eq]) {
            Some(_) => Some(self.expression()?),
            None => None,
        };

        self.consume(Kind::SemiColon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Variable { name, initial })
    }

    /// statement ---> exprStmt | forStmt | ifStmt | printStmt | returnStmt | whileStmt | block
    fn statement(&mut self) -> ParseResult<Stmt> {
        let kind = self.peek().map(|token| token.kind.clone());

        self.nested(|parser| match kind {
            Some(Kind::LeftBrace) => {
                parser.next();
                Ok(Stmt::Block(parser.block()?))
            }
            Some(Kind::Print) => parser.print_statement(),
            Some(Kind::Return) => parser.return_statement(),
            Some(Kind::If) => parser.if_statement(),
            Some(Kind::While) => parser.while_statement(),
            Some(Kind::For) => parser.for_statement(),
            _ => parser.expression_statement(),
        })
    }

    /// forStmt ---> "for" "(" ( varDecl | exprStmt | ";") expression? ";" expression? ")" statement
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        // Parse the for loop
        // ------------------

        let keyword = self.consume(Kind::For, "Expect 'for'.")?;
        self.consume(Kind::LeftParen, "Expect '(' after 'for'.")?;

        // Parse optional initialiser
        let opt_initialiser = if self.match_kind(&[Kind::SemiColon]).is_some() {
            None
        } else if self.check(&[Kind::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        // Parse optional condition
        let opt_condition = if self.check(&[Kind::SemiColon]) {
            None
        } else {
            Some(self.expression()?)
        };

        self.consume(Kind::SemiColon, "Expect ';' after loop condition.")?;

        // Parse optional increment
        let opt_increment = if self.check(&[Kind::RightParen]) {
            None
        } else {
            Some(self.expression()?)
        };

        self.consume(Kind::RightParen, "Expect ')' after for clauses.")?;

        let body = self.statement()?;

        // Desugar the for loop into a while statement.
        // --------------------------------------------

        // Optional increment gets placed at end of the body of the loop.
        let while_body = match opt_increment {
            Some(increment) => Stmt::Block(vec![body, Stmt::Expr(increment)]),
            None => body,
        };

        // A missing condition loops forever.
        let condition = opt_condition.unwrap_or(Expr::Literal {
            value: Value::Boolean(true),
            line: keyword.line,
        });

        let while_stmt = Stmt::While {
            condition,
            body: Box::new(while_body),
        };

        // Optional initialiser gets placed before the loop and both are wrapped in a block.
        Ok(match opt_initialiser {
            Some(initialiser) => Stmt::Block(vec![initialiser, while_stmt]),
            None => while_stmt,
        })
    }

    /// ifStmt ---> "if" "(" expression ")" statement ( "else" statement )?
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Kind::If, "Expect 'if'.")?;
        self.consume(Kind::LeftParen, "Expect '(' after 'if'.")?;

        let condition = self.expression()?;

        self.consume(Kind::RightParen, "Expect ')' after if condition.")?;

        let if_branch = Box::new(self.statement()?);

        let else_branch = match self.match_kind(&[Kind::Else]) {
            Some(_) => Some(Box::new(self.statement()?)),
            None => None,
        };

        Ok(Stmt::If {
            condition,
            if_branch,
            else_branch,
        })
    }

    /// whileStmt ---> "while" "(" expression ")" statement
    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Kind::While, "Expect 'while'.")?;
        self.consume(Kind::LeftParen, "Expect '(' after 'while'.")?;

        let condition = self.expression()?;

        self.consume(Kind::RightParen, "Expect ')' after condition.")?;

        let body = Box::new(self.statement()?);

        Ok(Stmt::While { condition, body })
    }

    /// block ---> declaration* "}"
    ///
    /// The caller has already consumed the opening brace, so a function body can report its own
    /// message for a missing one.
    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();

        while !self.check(&[Kind::RightBrace]) && !self.finished() {
            if let Some(stmt) = self.declaration() {
                stmts.push(stmt);
            }
        }

        self.consume(Kind::RightBrace, "Expect '}' after block.")?;
        Ok(stmts)
    }

    /// printStmt ---> "print" expression ";"
    fn print_statement(&mut self) -> ParseResult<Stmt> {
        self.next();

        let expr = self.expression()?;
        self.consume(Kind::SemiColon, "Expect ';' after value.")?;
        Ok(Stmt::Print(expr))
    }

    /// returnStmt ---> "return" expression? ";"
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.next();

        if self.function_depth == 0 {
            self.errors
                .push(ParsingError::at(&keyword, "Can't return from top-level code."));
        }

        let value = if self.check(&[Kind::SemiColon]) {
            None
        } else {
            Some(self.expression()?)
        };

        self.consume(Kind::SemiColon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { keyword, value })
    }

    /// exprStmt ---> expression ";"
    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Kind::SemiColon, "Expect ';' after expression.")?;
        Ok(Stmt::Expr(expr))
    }

    /// expression ---> assignment
    fn expression(&mut self) -> ParseResult<Expr> {
        self.nested(Self::assignment)
    }

    /// assignment ---> ( call "." )? IDENTIFIER "=" assignment | logicOr
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.logic_or()?;

        if let Some(eq) = self.match_kind(&[Kind::Eq]) {
            let value = Box::new(self.nested(Self::assignment)?);

            return Ok(match expr {
                Expr::Variable(name) => Expr::Assign { name, value },
                Expr::Get { object, name } => Expr::Set {
                    object,
                    name,
                    value,
                },

                // Reported, but not worth synchronising over.
                other => {
                    self.errors
                        .push(ParsingError::at(&eq, "Invalid assignment target."));
                    other
                }
            });
        }

        Ok(expr)
    }

    /// logicOr ---> logicAnd ( "or" logicAnd )*
    fn logic_or(&mut self) -> ParseResult<Expr> {
        let base = self.nesting;
        let mut lhs = self.logic_and()?;

        while let Some(op) = self.match_kind(&[Kind::Or]) {
            self.deepen()?;
            let rhs = self.logic_and()?;

            lhs = Expr::Logical {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
            }
        }

        self.nesting = base;
        Ok(lhs)
    }

    /// logicAnd ---> equality ( "and" equality )*
    fn logic_and(&mut self) -> ParseResult<Expr> {
        let base = self.nesting;
        let mut lhs = self.equality()?;

        while let Some(op) = self.match_kind(&[Kind::And]) {
            self.deepen()?;
            let rhs = self.equality()?;

            lhs = Expr::Logical {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
            }
        }

        self.nesting = base;
        Ok(lhs)
    }

    /// equality ---> comparison ( ( "!=" | "==" ) comparison ) *
    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary(&[Kind::BangEq, Kind::DoubleEq], Self::comparison)
    }

    /// comparison ---> term ( ( ">" | ">=" | "<" | "<=" ) term ) *
    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary(
            &[Kind::Greater, Kind::GreaterEq, Kind::Less, Kind::LessEq],
            Self::term,
        )
    }

    /// term ---> factor ( ( "-" | "+" ) factor ) *
    fn term(&mut self) -> ParseResult<Expr> {
        self.binary(&[Kind::Minus, Kind::Plus], Self::factor)
    }

    /// factor ---> unary ( ( "/" | "*" ) unary ) *
    fn factor(&mut self) -> ParseResult<Expr> {
        self.binary(&[Kind::Slash, Kind::Star], Self::unary)
    }

    /// Left associative chain of `operand ( op operand )*`, built in a loop.
    /// Every link still makes the tree one level deeper, so each one counts towards the nesting limit.
    fn binary(
        &mut self,
        ops: &[Kind],
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let base = self.nesting;
        let mut lhs = operand(self)?;

        while let Some(op) = self.match_kind(ops) {
            self.deepen()?;
            let rhs = operand(self)?;

            lhs = Expr::Binary {
                left: Box::new(lhs),
                op,
                right: Box::new(rhs),
            };
        }

        self.nesting = base;
        Ok(lhs)
    }

    /// unary ---> ( ( "-" | "!" ) unary ) | call
    fn unary(&mut self) -> ParseResult<Expr> {
        if let Some(op) = self.match_kind(&[Kind::Minus, Kind::Bang]) {
            let rhs = self.nested(Self::unary)?;

            return Ok(Expr::Unary {
                op,
                expr: Box::new(rhs),
            });
        }

        self.call()
    }

    /// call ---> primary ( "(" arguments? ")" | "." IDENTIFIER )*
    fn call(&mut self) -> ParseResult<Expr> {
        let base = self.nesting;
        let mut expr = self.primary()?;

        loop {
            if self.match_kind(&[Kind::LeftParen]).is_some() {
                self.deepen()?;
                expr = self.finish_call(expr)?;
            } else if self.match_kind(&[Kind::Dot]).is_some() {
                self.deepen()?;
                let name = self.consume(
                    Kind::Identifier(String::new()),
                    "Expect property name after '.'.",
                )?;

                expr = Expr::Get {
                    object: Box::new(expr),
                    name,
                };
            } else {
                break;
            }
        }

        self.nesting = base;
        Ok(expr)
    }

    /// arguments ---> expression ( "," expression )*
    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut args = Vec::new();

        if !self.check(&[Kind::RightParen]) {
            loop {
                if args.len() >= MAX_ARGS {
                    let err = self.error(format!("Can't have more than {} arguments.", MAX_ARGS));
                    self.errors.push(err);
                }

                args.push(self.expression()?);

                if self.match_kind(&[Kind::Comma]).is_none() {
                    break;
                }
            }
        }

        let paren = self.consume(Kind::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            args,
        })
    }

    /// primary ---> NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")" | IDENTIFIER
    ///            | "this" | "super" "." IDENTIFIER
    fn primary(&mut self) -> ParseResult<Expr> {
        let kind = match self.peek() {
            Some(token) => token.kind.clone(),
            None => return Err(self.error("Expect expression.")),
        };

        match kind {
            // Handle literal values.
            Kind::False | Kind::True | Kind::Nil | Kind::String(_) | Kind::Number(_) => {
                let token = self.next();
                Ok(Expr::Literal {
                    value: Value::from(&token.kind),
                    line: token.line,
                })
            }

            // Handle parenthesised expressions.
            Kind::LeftParen => {
                self.next();

                let expr = self.expression()?;
                self.consume(Kind::RightParen, "Expect ')' after expression.")?;

                Ok(Expr::Group(Box::new(expr)))
            }

            // Handle identifier usage.
            Kind::Identifier(_) => Ok(Expr::Variable(self.next())),

            Kind::This => Ok(Expr::This(self.next())),

            Kind::Super => {
                let keyword = self.next();
                self.consume(Kind::Dot, "Expect '.' after 'super'.")?;
                let method = self.consume(
                    Kind::Identifier(String::new()),
                    "Expect superclass method name.",
                )?;

                Ok(Expr::Super { keyword, method })
            }

            // Handle unexpected tokens.
            _ => Err(self.error("Expect expression.")),
        }
    }

    /// Run `parse` one level deeper in the tree, on a stack with room for it.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.deepen()?;
        let result = ensure_sufficient_stack(|| parse(self));
        self.nesting -= 1;
        result
    }

    /// Count one more level of nesting, failing once the tree would be too deep to walk safely.
    fn deepen(&mut self) -> ParseResult<()> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error("Too much nesting."));
        }

        self.nesting += 1;
        Ok(())
    }

    /// Check if end of file has been reached.
    fn finished(&self) -> bool {
        self.peek().is_none()
    }

    /// Advance past the current token and return it. At the end this keeps returning `Eof`.
    fn next(&mut self) -> Token {
        let tokens = self.tokens;

        match tokens.get(self.current) {
            Some(token) if token.kind != Kind::Eof => {
                self.current += 1;
                token.clone()
            }
            _ => Token::eof(self.end_line()),
        }
    }

    /// Consume the next token if it matches one of `kinds`.
    fn match_kind(&mut self, kinds: &[Kind]) -> Option<Token> {
        if self.check(kinds) {
            Some(self.next())
        } else {
            None
        }
    }

    /// Attempt to consume an expected token. Report `message` at the current token if it cannot.
    fn consume(&mut self, expected: Kind, message: &str) -> ParseResult<Token> {
        match self.match_kind(&[expected]) {
            Some(token) => Ok(token),
            None => Err(self.error(message)),
        }
    }

    /// Match a collection of token kinds against the next token. Payloads are not compared.
    fn check(&self, kinds: &[Kind]) -> bool {
        match self.peek() {
            Some(peeked) => kinds
                .iter()
                .any(|kind| mem::discriminant(kind) == mem::discriminant(&peeked.kind)),
            None => false,
        }
    }

    /// Peek at the next token. `None` once only the end marker remains.
    fn peek(&self) -> Option<&Token> {
        self.tokens
            .get(self.current)
            .filter(|token| token.kind != Kind::Eof)
    }

    fn end_line(&self) -> usize {
        self.tokens.last().map_or(1, |token| token.line)
    }

    /// Error located at the current token, or at the end of input.
    fn error(&self, message: impl Into<String>) -> ParsingError {
        match self.tokens.get(self.current) {
            Some(token) => ParsingError::at(token, message),
            None => ParsingError::UnexpectedEOF {
                message: message.into(),
                line: self.end_line(),
            },
        }
    }
}
