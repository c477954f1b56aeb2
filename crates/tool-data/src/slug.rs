/// Derive a URL slug from a display name.
///
/// Lowercases, collapses every run of characters outside `[a-z0-9]` into a single `-`,
/// and trims leading/trailing dashes. Applying it twice gives the same result as once.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_dash = false;
    for ch in s.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            out.push(ch);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// A slug usable in a route: non-empty after trimming whitespace.
pub fn is_routable(slug: &str) -> bool {
    !slug.trim().is_empty()
}
