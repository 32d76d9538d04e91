/// generate_slug
///
/// Derives the URL slug for a post title: lowercase, every maximal run of
/// characters outside `[a-z0-9]` collapsed into a single `-`, leading and
/// trailing hyphens stripped.
///
/// Only ASCII letters and digits survive; accented or non-Latin characters act as
/// separators ("Kopi Susu Premium!" → "kopi-susu-premium", "Café Latte" →
/// "caf-latte").
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
