//! Lexer, AST, and parser for the cook recipe language.
//!
//! This crate turns recipe source text into a single root [`Statement::Block`],
//! following a conventional lex → recursive-descent parse pipeline. It knows
//! nothing about build commands, compilers, or the filesystem; that is the
//! job of the `cook` crate, which consumes the AST this crate produces.

#![warn(missing_docs)]

pub mod syntax;
