//! URL slug derivation and collision resolution.

use std::future::Future;

/// Derive a URL slug from a title.
///
/// Lowercases the input, collapses every run of non-alphanumeric ASCII
/// characters into a single hyphen, and trims leading/trailing hyphens.
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Resolve slug collisions by appending `-1`, `-2`, ... until the probe
/// reports the candidate free.
///
/// The probe is expected to exclude the record's own id when a slug is
/// recomputed on update, so an unchanged title keeps its slug.
pub async fn ensure_unique_slug<F, Fut, E>(candidate: &str, mut exists: F) -> Result<String, E>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    if !exists(candidate.to_owned()).await? {
        return Ok(candidate.to_owned());
    }

    let mut suffix: u32 = 1;
    loop {
        let attempt = format!("{candidate}-{suffix}");
        if !exists(attempt.clone()).await? {
            return Ok(attempt);
        }
        suffix += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::convert::Infallible;

    use super::*;

    #[test]
    fn lowercases_and_hyphenates() {
        assert_eq!(generate_slug("Hello, World!"), "hello-world");
        assert_eq!(generate_slug("Rust   &   Me"), "rust-me");
        assert_eq!(generate_slug("10 Things I Learned"), "10-things-i-learned");
    }

    #[test]
    fn trims_leading_and_trailing_hyphens() {
        assert_eq!(generate_slug("  --Hello--  "), "hello");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn output_alphabet_is_lowercase_alphanumeric_and_hyphen() {
        for title in ["Ünïcödé Tîtle", "C++ > Go?", "a_b__c", "  spaced out  "] {
            let slug = generate_slug(title);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "bad slug {slug:?} for {title:?}"
            );
            assert!(!slug.starts_with('-'));
            assert!(!slug.ends_with('-'));
            assert!(!slug.contains("--"));
        }
    }

    #[tokio::test]
    async fn keeps_candidate_when_free() {
        let taken: HashSet<String> = HashSet::new();
        let slug = ensure_unique_slug("my-post", |s| {
            let hit = taken.contains(&s);
            async move { Ok::<_, Infallible>(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "my-post");
    }

    #[tokio::test]
    async fn appends_numeric_suffix_per_collision() {
        let taken: HashSet<String> = ["my-post", "my-post-1", "my-post-2"]
            .into_iter()
            .map(String::from)
            .collect();
        let slug = ensure_unique_slug("my-post", |s| {
            let hit = taken.contains(&s);
            async move { Ok::<_, Infallible>(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "my-post-3");
    }
}
