//! Locations within source code.

use std::fmt;

/// A source location within a recipe file.
///
/// The lexer computes `line` and `column` as it advances past whitespace
/// and comments, so every downstream consumer (parser, diagnostics) can
/// render a location without rescanning the source.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Location
{
    /// The byte offset in the source file.
    pub offset: usize,

    /// One-based line number.
    pub line: u32,

    /// One-based column, counted in bytes from the start of the line.
    pub column: u32,
}

impl Location
{
    /// The location of the very first byte of a source file.
    pub const START: Location = Location{offset: 0, line: 1, column: 1};
}

impl fmt::Debug for Location
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        // We explicitly *do not* want to use f.debug_struct,
        // as that would insert noisy newlines with {:#?}.
        write!(f, "Location({}:{})", self.line, self.column)
    }
}

impl fmt::Display for Location
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "{}:{}", self.line, self.column)
    }
}
