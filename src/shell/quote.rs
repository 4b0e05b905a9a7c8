//! POSIX shell word quoting.

use std::path::Path;

/// Quote `value` as a single shell word.
///
/// Uses single quotes, closing and reopening around embedded quotes
/// (`'\''`), so the result is safe to splice into a script verbatim.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for ch in value.chars() {
        if ch == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(ch);
        }
    }
    out.push('\'');
    out
}

/// Quote a filesystem path as a single shell word.
pub fn quote_path(path: &Path) -> String {
    quote(&path.to_string_lossy())
}
