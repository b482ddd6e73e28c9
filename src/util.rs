//! Shared utility functions

/// Shorten `s` to at most `max_chars` characters for log output, appending
/// "..." when something was cut. Counts chars, so multi-byte text is never
/// split mid-codepoint.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}
