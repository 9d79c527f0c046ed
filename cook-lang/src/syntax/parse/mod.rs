//! Parsing token streams into abstract syntax trees.
//!
//! The parser is a conventional recursive-descent parser over the
//! precedence ladder in spec.md §4.3, with two tokens of lookahead
//! (`current`, `next`) plus `previous`, matching spec.md's description
//! of the lookahead discipline. It never aborts: a missing expected
//! token is reported against `previous` and recovery proceeds by
//! advancing a single token, per spec.md's "accumulate, don't abort"
//! error policy for this phase.

pub use self::{arenas::*, error::*};

use super::{
    ast::*,
    lex::{Lexer, Token},
    location::Location,
};

mod arenas;
mod error;

const MAX_ARGUMENTS: usize = 63;

/// Parse recipe source text into a single root block statement.
///
/// Returns the root block alongside any diagnostics accumulated while
/// parsing; the returned tree is always a best-effort result, never a
/// hard failure (spec.md §4.3).
pub fn parse_unit<'a>(arenas: &Arenas<'a>, source: &'a str)
    -> (&'a Statement<'a>, Vec<Diagnostic>)
{
    let mut parser = Parser::new(arenas, source);
    let mut statements = Vec::new();
    while !parser.is_at_end() {
        statements.push(parser.parse_statement());
    }
    log::debug!("lexed {} token(s)", parser.token_count);
    log::debug!("parsed {} top-level statement(s)", statements.len());

    let root = Statement::Block{
        left_brace: Location::START,
        statements: arenas.alloc_extend(statements),
        right_brace: parser.current.location,
    };
    (arenas.alloc(root), parser.diagnostics)
}

struct Parser<'p, 'a>
{
    arenas: &'p Arenas<'a>,
    source: &'a str,
    lexer: Lexer<'a>,
    previous: TokenSlot<'a>,
    current: TokenSlot<'a>,
    next: TokenSlot<'a>,
    diagnostics: Vec<Diagnostic>,
    token_count: usize,
}

#[derive(Clone, Copy)]
struct TokenSlot<'a>
{
    location: Location,
    token: Token<'a>,
    end: usize,
}

impl<'p, 'a> Parser<'p, 'a>
{
    fn new(arenas: &'p Arenas<'a>, source: &'a str) -> Self
    {
        let mut lexer = Lexer::new(source);
        let current = Self::read(&mut lexer);
        let next = Self::read(&mut lexer);
        Self{
            arenas, source, lexer, previous: current, current, next,
            diagnostics: Vec::new(),
            token_count: 2,
        }
    }

    fn read(lexer: &mut Lexer<'a>) -> TokenSlot<'a>
    {
        let lexeme = lexer.next_token();
        TokenSlot{location: lexeme.location, token: lexeme.token, end: lexer.pos()}
    }

    fn is_at_end(&self) -> bool
    {
        self.current.token == Token::End
    }

    fn advance(&mut self) -> TokenSlot<'a>
    {
        self.previous = self.current;
        self.current = self.next;
        self.next = Self::read(&mut self.lexer);
        self.token_count += 1;
        self.previous
    }

    fn check(&self, token: &Token<'a>) -> bool
    {
        &self.current.token == token
    }

    fn consume_if(&mut self, token: &Token<'a>) -> Option<Location>
    {
        if self.check(token) {
            Some(self.advance().location)
        } else {
            None
        }
    }

    fn expect(&mut self, token: Token<'a>) -> Location
    {
        if self.check(&token) {
            self.advance().location
        } else {
            self.error(DiagnosticKind::ExpectedToken(token.into(), self.current.token.into()));
            // Advance once past the unexpected token to guarantee forward
            // progress, per spec.md §4.3's recovery rule.
            self.advance().location
        }
    }

    fn error(&mut self, kind: DiagnosticKind)
    {
        self.diagnostics.push(Diagnostic{location: self.previous.location, kind});
    }

    fn alloc(&self, expression: Expression<'a>) -> &'a Expression<'a>
    {
        self.arenas.alloc(expression)
    }

    /* ---------------------------------------------------------------- */
    /*                             Statements                            */
    /* ---------------------------------------------------------------- */

    fn parse_statement(&mut self) -> Statement<'a>
    {
        if self.check(&Token::LeftBrace) {
            return self.parse_block();
        }

        let head = self.parse_expression_statement();

        if self.check(&Token::LeftBrace) {
            let body = self.parse_block();
            Statement::Description{head: self.arenas.alloc(head), body: self.arenas.alloc(body)}
        } else {
            head
        }
    }

    fn parse_expression_statement(&mut self) -> Statement<'a>
    {
        let expression = self.parse_expression();
        let semicolon = self.consume_if(&Token::Semicolon);
        Statement::Expression{expression: self.alloc(expression), semicolon}
    }

    fn parse_block(&mut self) -> Statement<'a>
    {
        let left_brace = self.expect(Token::LeftBrace);

        let mut statements = Vec::new();
        while !self.check(&Token::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_statement());
        }

        let right_brace = self.expect(Token::RightBrace);
        Statement::Block{
            left_brace,
            statements: self.arenas.alloc_extend(statements),
            right_brace,
        }
    }

    /* ---------------------------------------------------------------- */
    /*                             Expressions                           */
    /* ---------------------------------------------------------------- */

    fn parse_expression(&mut self) -> Expression<'a>
    {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Expression<'a>
    {
        let target = self.parse_logical_or();

        let Some(equals) = self.consume_if(&Token::Equal) else {
            return target;
        };

        let value = self.parse_assignment();

        match target {
            Expression::Variable{location, name} =>
                Expression::Assignment{
                    name, name_location: location, equals,
                    value: self.alloc(value),
                },
            other => {
                self.diagnostics.push(Diagnostic{
                    location: other.location(),
                    kind: DiagnosticKind::InvalidAssignmentTarget,
                });
                other
            }
        }
    }

    fn parse_logical_or(&mut self) -> Expression<'a>
    {
        let mut left = self.parse_logical_and();
        while let Some(op) = self.consume_if(&Token::PipePipe) {
            let right = self.parse_logical_and();
            left = Expression::Logical{
                left: self.alloc(left),
                operator: LogicalOperator::Or,
                operator_location: op,
                right: self.alloc(right),
            };
        }
        left
    }

    fn parse_logical_and(&mut self) -> Expression<'a>
    {
        let mut left = self.parse_equality();
        while let Some(op) = self.consume_if(&Token::AmpAmp) {
            let right = self.parse_equality();
            left = Expression::Logical{
                left: self.alloc(left),
                operator: LogicalOperator::And,
                operator_location: op,
                right: self.alloc(right),
            };
        }
        left
    }

    fn parse_equality(&mut self) -> Expression<'a>
    {
        let mut left = self.parse_comparison();
        loop {
            let operator = if self.check(&Token::EqualEqual) { BinaryOperator::Equal }
                           else if self.check(&Token::BangEqual) { BinaryOperator::NotEqual }
                           else { break };
            let op = self.advance().location;
            let right = self.parse_comparison();
            left = Expression::Binary{left: self.alloc(left), operator, operator_location: op, right: self.alloc(right)};
        }
        left
    }

    fn parse_comparison(&mut self) -> Expression<'a>
    {
        let mut left = self.parse_term();
        loop {
            let operator = if self.check(&Token::Less) { BinaryOperator::Less }
                           else if self.check(&Token::LessEqual) { BinaryOperator::LessEqual }
                           else if self.check(&Token::Greater) { BinaryOperator::Greater }
                           else if self.check(&Token::GreaterEqual) { BinaryOperator::GreaterEqual }
                           else { break };
            let op = self.advance().location;
            let right = self.parse_term();
            left = Expression::Binary{left: self.alloc(left), operator, operator_location: op, right: self.alloc(right)};
        }
        left
    }

    fn parse_term(&mut self) -> Expression<'a>
    {
        let mut left = self.parse_factor();
        loop {
            let operator = if self.check(&Token::Plus) { BinaryOperator::Add }
                           else if self.check(&Token::Minus) { BinaryOperator::Subtract }
                           else { break };
            let op = self.advance().location;
            let right = self.parse_factor();
            left = Expression::Binary{left: self.alloc(left), operator, operator_location: op, right: self.alloc(right)};
        }
        left
    }

    fn parse_factor(&mut self) -> Expression<'a>
    {
        let mut left = self.parse_unary();
        loop {
            let operator = if self.check(&Token::Star) { BinaryOperator::Multiply }
                           else if self.check(&Token::Slash) { BinaryOperator::Divide }
                           else if self.check(&Token::Percent) { BinaryOperator::Modulo }
                           else { break };
            let op = self.advance().location;
            let right = self.parse_unary();
            left = Expression::Binary{left: self.alloc(left), operator, operator_location: op, right: self.alloc(right)};
        }
        left
    }

    fn parse_unary(&mut self) -> Expression<'a>
    {
        let operator = if self.check(&Token::Bang) { Some(UnaryOperator::Not) }
                       else if self.check(&Token::Minus) { Some(UnaryOperator::Negate) }
                       else if self.check(&Token::MinusMinus) { Some(UnaryOperator::PreDecrement) }
                       else if self.check(&Token::PlusPlus) { Some(UnaryOperator::PreIncrement) }
                       else { None };

        match operator {
            Some(operator) => {
                let op = self.advance().location;
                let right = self.parse_unary();
                Expression::Unary{operator, operator_location: op, right: self.alloc(right)}
            }
            None => self.parse_call(),
        }
    }

    fn parse_call(&mut self) -> Expression<'a>
    {
        let mut expr = self.parse_primary();
        loop {
            if let Some(paren) = self.consume_if(&Token::LeftParen) {
                let arguments = self.parse_call_arguments();
                self.expect(Token::RightParen);
                expr = Expression::Call{
                    callee: self.alloc(expr),
                    paren,
                    arguments: self.arenas.alloc_extend(arguments),
                };
            } else if let Some(dot) = self.consume_if(&Token::Dot) {
                let right = self.parse_call();
                expr = Expression::Chain{left: self.alloc(expr), dot, right: self.alloc(right)};
            } else {
                break;
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expression<'a>
    {
        let slot = self.advance();
        match slot.token {
            Token::Identifier(name) => Expression::Variable{location: slot.location, name},
            Token::IntLiteral(value) => Expression::LiteralInt{location: slot.location, value},
            Token::FloatLiteral(value) => Expression::LiteralFloat{location: slot.location, value},
            Token::StringLiteral(value) => Expression::LiteralString{location: slot.location, value},
            Token::True => Expression::LiteralBool{location: slot.location, value: true},
            Token::False => Expression::LiteralBool{location: slot.location, value: false},
            Token::LeftParen => {
                let inner = self.parse_expression();
                let right_paren = self.expect(Token::RightParen);
                Expression::Grouping{left_paren: slot.location, inner: self.alloc(inner), right_paren}
            }
            other => {
                self.error(DiagnosticKind::ExpectedExpression(other.into()));
                Expression::LiteralString{location: slot.location, value: ""}
            }
        }
    }

    /* ---------------------------------------------------------------- */
    /*                           Call arguments                          */
    /* ---------------------------------------------------------------- */

    fn parse_call_arguments(&mut self) -> Vec<Expression<'a>>
    {
        let mut arguments = Vec::new();

        if self.check(&Token::RightParen) {
            return arguments;
        }

        loop {
            let argument = self.parse_call_argument();

            if arguments.len() == MAX_ARGUMENTS {
                self.error(DiagnosticKind::TooManyArguments(MAX_ARGUMENTS));
            }
            if arguments.len() < MAX_ARGUMENTS {
                arguments.push(argument);
            }

            if self.consume_if(&Token::Comma).is_none() {
                break;
            }
            if self.check(&Token::RightParen) {
                break;
            }
        }

        arguments
    }

    /// Parse one call argument using spec.md §4.3's three-form rule.
    fn parse_call_argument(&mut self) -> Expression<'a>
    {
        if self.check(&Token::Dollar) {
            self.advance();
            return self.parse_expression();
        }

        self.parse_bare_argument_run()
    }

    /// Consume tokens up to the next `,`, `)`, or `$`, synthesizing a
    /// single string literal spanning the raw source text of the run.
    ///
    /// This also handles the `@`-prefixed macro form: it is not given
    /// special treatment beyond being included verbatim in the run,
    /// since it is reserved and not evaluated in this core.
    fn parse_bare_argument_run(&mut self) -> Expression<'a>
    {
        let start = self.current.location;
        let start_offset = self.current.location.offset;
        let mut end_offset = start_offset;

        while !matches!(self.current.token, Token::Comma | Token::RightParen | Token::Dollar | Token::End) {
            end_offset = self.advance().end;
        }

        Expression::LiteralString{
            location: start,
            value: &self.source[start_offset .. end_offset],
        }
    }
}
