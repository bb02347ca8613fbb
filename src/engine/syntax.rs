use crate::events::Diagnostic;
use std::ops::RangeInclusive;

// TypeScript reserves 1000-1999 for parser diagnostics.
const SYNTAX_CODE_RANGE: RangeInclusive<i64> = 1000..=1999;

const SYNTAX_PHRASES: &[&str] = &[
    "expected",
    "unexpected token",
    "unexpected end",
    "unterminated",
    "syntax error",
    "invalid syntax",
    "missing semicolon",
];

pub fn is_syntax_error(diagnostic: &Diagnostic) -> bool {
    if let Some(code) = diagnostic.code.as_ref().and_then(|c| c.as_number()) {
        if SYNTAX_CODE_RANGE.contains(&code) {
            return true;
        }
    }

    let message = diagnostic.message.to_lowercase();
    SYNTAX_PHRASES.iter().any(|phrase| message.contains(phrase))
}

pub fn all_syntax<'a>(diagnostics: impl IntoIterator<Item = &'a Diagnostic>) -> bool {
    let mut seen = false;
    for diagnostic in diagnostics {
        if !is_syntax_error(diagnostic) {
            return false;
        }
        seen = true;
    }
    seen
}
