//! URL-safe slug derivation for workspace names.

/// Symbolic characters get spelled out or stripped before slugging; some
/// vector stores reject collection names containing them.
const SYMBOL_SUBSTITUTIONS: &[(char, &str)] = &[
    ('+', " plus "),
    ('!', " bang "),
    ('@', " at "),
    ('*', " splat "),
    ('.', " dot "),
    (':', ""),
    ('~', ""),
    ('(', ""),
    (')', ""),
    ('\'', ""),
    ('"', ""),
    ('|', ""),
];

/// Derives a lowercase, URL-safe slug from a display name.
///
/// The substitution table is applied first, then anything that is not
/// alphanumeric or an underscore collapses into single `-` separators.
/// May return an empty string (e.g. a name of pure punctuation); callers
/// are expected to fall back to a generated identifier.
pub fn slugify(input: &str) -> String {
    let mut expanded = String::with_capacity(input.len());
    for ch in input.chars() {
        match SYMBOL_SUBSTITUTIONS.iter().find(|(symbol, _)| *symbol == ch) {
            Some((_, replacement)) => expanded.push_str(replacement),
            None => expanded.push(ch),
        }
    }

    let mut slug = String::with_capacity(expanded.len());
    let mut pending_separator = false;
    for ch in expanded.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            // whitespace, hyphens and leftover punctuation all separate
            pending_separator = true;
        }
    }

    slug
}
