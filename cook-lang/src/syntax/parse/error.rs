use {super::super::{lex::Token, location::Location}, thiserror::Error};

/// A non-fatal diagnostic produced while parsing.
///
/// Per spec.md §4.3, a parse error never aborts parsing: the parser
/// reports the problem against the *previous* token, advances once to
/// recover, and continues. Diagnostics accumulate in
/// [`super::Parser::diagnostics`] rather than being returned as `Err`.
#[derive(Clone, Debug, Error)]
#[error("{location}: {kind}")]
pub struct Diagnostic
{
    pub location: Location,
    pub kind: DiagnosticKind,
}

/// What kind of problem a [`Diagnostic`] describes.
#[allow(missing_docs)]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DiagnosticKind
{
    #[error("expected statement, got {0}")]
    ExpectedStatement(TokenKind),

    #[error("expected expression, got {0}")]
    ExpectedExpression(TokenKind),

    #[error("expected identifier, got {0}")]
    ExpectedIdentifier(TokenKind),

    #[error("expected {0}, got {1}")]
    ExpectedToken(TokenKind, TokenKind),

    #[error("call takes at most {0} arguments; extra arguments were dropped")]
    TooManyArguments(usize),

    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
}

/// An owned, 'static description of a [`Token`] for use in diagnostics.
///
/// Diagnostics must outlive the borrow of the source text held by the
/// token they describe (they are collected into a `Vec` and printed
/// after parsing finishes), so they store this instead of a `Token<'a>`.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenKind(pub String);

impl std::fmt::Display for TokenKind
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result
    {
        write!(f, "{}", self.0)
    }
}

impl<'a> From<Token<'a>> for TokenKind
{
    fn from(token: Token<'a>) -> Self
    {
        TokenKind(token.to_string())
    }
}
