//! URL slug derivation for products and categories.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases the input, keeps ASCII alphanumeric runs, and collapses every
/// other character into a single hyphen. Leading and trailing hyphens are
/// trimmed. Uniqueness is the caller's problem (the database holds the
/// unique constraint; collisions get a numeric suffix on retry).
///
/// # Example
///
/// ```
/// use driftwear_core::slugify;
///
/// assert_eq!(slugify("Heavyweight Hoodie (Unisex)"), "heavyweight-hoodie-unisex");
/// assert_eq!(slugify("  Salt & Pine Tee  "), "salt-pine-tee");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
