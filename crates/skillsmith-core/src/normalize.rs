//! Skill name normalization.

/// Canonicalize arbitrary user text into a skill identifier.
///
/// Lowercases the input, maps every character outside `[a-z0-9-]` to a hyphen,
/// collapses hyphen runs and strips hyphens from both ends. The result always
/// matches `^[a-z0-9-]*$` and `normalize_skill_name` is idempotent.
pub fn normalize_skill_name(raw: &str) -> String {
    let mut output = String::with_capacity(raw.len());
    let mut last_dash = false;

    for ch in raw.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            output.push(ch);
            last_dash = false;
        } else if !last_dash && !output.is_empty() {
            output.push('-');
            last_dash = true;
        }
    }

    if output.ends_with('-') {
        output.pop();
    }

    output
}
