use regex::{Regex, RegexBuilder};

use crate::errors::{ErrorKind, TextlabError, TextlabResult};

/// Compiles `pattern`, reporting a failure with the given error kind.
pub fn compile_pattern(pattern: &str, error_kind: ErrorKind) -> TextlabResult<Regex> {
    Regex::new(pattern).map_err(|err| pattern_error(pattern, err, error_kind))
}

/// Compiles `pattern` with `^` and `$` matching at line boundaries.
pub fn compile_multiline_pattern(pattern: &str, error_kind: ErrorKind) -> TextlabResult<Regex> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .build()
        .map_err(|err| pattern_error(pattern, err, error_kind))
}

/// Compiles an optional pattern.
pub fn compile_optional(
    pattern: Option<&str>,
    error_kind: ErrorKind,
) -> TextlabResult<Option<Regex>> {
    pattern
        .map(|p| compile_pattern(p, error_kind))
        .transpose()
}

fn pattern_error(pattern: &str, err: regex::Error, error_kind: ErrorKind) -> TextlabError {
    log::error!("Invalid regex pattern '{}': {}", pattern, err);
    TextlabError::new(
        &format!("Invalid regex pattern '{}': {}", pattern, err),
        error_kind,
    )
}
