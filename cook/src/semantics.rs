//! Built-in methods recognized by the recipe language, and the values
//! produced by evaluating expressions against a build command.
//!
//! An identifier's text is matched against this closed set (spec.md §4.4);
//! a match evaluates to [`Value::Method`], a miss evaluates to
//! [`Value::String`] holding the identifier text itself.

use crate::build_command::BuildCommand;

/// A built-in method, dispatched on the current build command.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Method
{
    Build,
    Compiler,
    Input,
    Cflags,
    Ldflags,
    SourceDir,
    OutputDir,
    IncludeDir,
    LibraryDir,
    Link,
    Dirty,
    MarkClean,
    Echo,
}

impl Method
{
    /// Look up a method by its recipe-language identifier.
    ///
    /// Returns `None` for any identifier outside the closed method set,
    /// in which case the identifier evaluates to a plain string instead
    /// (spec.md §4.4).
    pub fn from_name(name: &str) -> Option<Self>
    {
        Some(match name {
            "build"       => Self::Build,
            "compiler"    => Self::Compiler,
            "input"       => Self::Input,
            "cflags"      => Self::Cflags,
            "ldflags"     => Self::Ldflags,
            "source_dir"  => Self::SourceDir,
            "output_dir"  => Self::OutputDir,
            "include_dir" => Self::IncludeDir,
            "library_dir" => Self::LibraryDir,
            "link"        => Self::Link,
            "dirty"       => Self::Dirty,
            "mark_clean"  => Self::MarkClean,
            "echo"        => Self::Echo,
            _ => return None,
        })
    }

    /// The identifier text this method is spelled with in recipes.
    ///
    /// Used to name the method in diagnostics.
    pub fn name(self) -> &'static str
    {
        match self {
            Self::Build       => "build",
            Self::Compiler    => "compiler",
            Self::Input       => "input",
            Self::Cflags      => "cflags",
            Self::Ldflags     => "ldflags",
            Self::SourceDir   => "source_dir",
            Self::OutputDir   => "output_dir",
            Self::IncludeDir  => "include_dir",
            Self::LibraryDir  => "library_dir",
            Self::Link        => "link",
            Self::Dirty       => "dirty",
            Self::MarkClean   => "mark_clean",
            Self::Echo        => "echo",
        }
    }

    /// The fixed argument count this method requires, or `None` if it
    /// takes a variable number of arguments.
    pub fn fixed_arity(self) -> Option<usize>
    {
        match self {
            Self::Compiler | Self::SourceDir | Self::OutputDir | Self::Echo => Some(1),
            Self::Dirty | Self::MarkClean => Some(0),
            Self::Build | Self::Input | Self::Cflags | Self::Ldflags
                | Self::IncludeDir | Self::LibraryDir | Self::Link => None,
        }
    }
}

/// The result of evaluating an expression.
///
/// Mirrors spec.md §3's `SymbolValue`, minus the `Int`/`Float` payloads
/// carrying any runtime meaning beyond being discarded (spec.md §1
/// Non-goals: no arithmetic evaluation in this core).
#[derive(Clone, Debug)]
pub enum Value<'a>
{
    Nil,
    Int(i32),
    Float(f32),
    String(&'a str),
    Method(Method),
    BuildCommand(&'a BuildCommand<'a>),
}

impl<'a> Value<'a>
{
    /// This value's string payload, if it is a [`Value::String`].
    pub fn as_str(&self) -> Option<&'a str>
    {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}
