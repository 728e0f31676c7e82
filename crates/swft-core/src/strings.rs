//! String helpers.

/// Lowercase `value` and collapse every run of non `[a-z0-9]` characters into
/// a single `-`, trimming leading and trailing dashes. Falls back to `default`
/// when `value` is absent or slugs to nothing.
pub fn slugify(value: Option<&str>, default: &str) -> String {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return default.to_string();
    };

    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        default.to_string()
    } else {
        slug
    }
}

/// Trim, drop empties and deduplicate, preserving first-seen order.
pub fn normalize_list<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for value in values {
        let trimmed = value.as_ref().trim();
        if !trimmed.is_empty() && !out.iter().any(|v| v == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify(Some("NIST SP 800-53 Rev5!"), "x"), "nist-sp-800-53-rev5");
        assert_eq!(slugify(Some("  --FedRAMP__High-- "), "x"), "fedramp-high");
    }

    #[test]
    fn slugify_defaults() {
        assert_eq!(slugify(None, "catalog"), "catalog");
        assert_eq!(slugify(Some(""), "catalog"), "catalog");
        assert_eq!(slugify(Some("***"), "catalog"), "catalog");
    }

    #[test]
    fn normalize_list_dedupes_in_order() {
        let got = normalize_list([" vm ", "", "storage", "vm", "  "]);
        assert_eq!(got, vec!["vm".to_string(), "storage".to_string()]);
    }
}
