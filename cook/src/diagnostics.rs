//! Rendering of lex/parse diagnostics against a named recipe file
//! (spec.md §7: `file:line:col kind: message`).

use cook_lang::syntax::parse::Diagnostic;

/// Print every diagnostic to stderr, prefixed with `path`.
///
/// Returns `true` if any diagnostic was printed, so the caller can
/// decide whether parsing was clean enough to keep going — per
/// spec.md §7, parse errors are non-fatal, so this never aborts on its
/// own.
pub fn report(path: &str, diagnostics: &[Diagnostic]) -> bool
{
    for diagnostic in diagnostics {
        eprintln!("{path}:{diagnostic}");
    }
    !diagnostics.is_empty()
}
