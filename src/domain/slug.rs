//! Deterministic, human-friendly slugs for categories and posts.
//!
//! ASCII slugification comes from the `slug` crate; Chinese characters are
//! transliterated with `pinyin` first so "基线对齐" becomes `ji-xian-dui-qi`.
//! Uniqueness is left to the store: a colliding slug fails on insert.
//! Transliteration can make a slug much longer than its source, so results
//! are cut back to [`MAX_SLUG_CHARS`] on a word boundary.

use pinyin::{Pinyin, ToPinyin};
use slug::slugify;
use thiserror::Error;

/// Fits the narrowest slug column (`categories.slug VARCHAR(150)`).
pub const MAX_SLUG_CHARS: usize = 150;

/// Errors that can occur while generating a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
}

/// Derive a slug from the provided name or title.
///
/// The result is lowercase, only contains `[a-z0-9-]`, never starts or
/// ends with a hyphen and is at most [`MAX_SLUG_CHARS`] long.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let transliterated = transliterate_to_ascii(input);
    let candidate = slugify(&transliterated);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(truncate_on_word(candidate, MAX_SLUG_CHARS))
}

/// `slug` is ASCII, so byte offsets are character offsets.
fn truncate_on_word(slug: String, max: usize) -> String {
    if slug.len() <= max {
        return slug;
    }
    let head = &slug[..max];
    let cut = if slug.as_bytes()[max] == b'-' {
        head
    } else {
        head.rsplit_once('-').map_or(head, |(before, _)| before)
    };
    cut.trim_end_matches('-').to_string()
}

fn transliterate_to_ascii(input: &str) -> String {
    let mut output = String::with_capacity(input.len());

    for ch in input.chars() {
        if ch.is_ascii() {
            output.push(ch);
            continue;
        }

        match ch.to_pinyin() {
            Some(py) => append_pinyin(&mut output, py),
            None if ch.is_whitespace() => output.push(' '),
            // slugify decides how to fold or drop the rest.
            None => output.push(ch),
        }
    }

    output
}

fn append_pinyin(buffer: &mut String, pinyin: Pinyin) {
    if !buffer.is_empty() && !buffer.ends_with(' ') {
        buffer.push(' ');
    }
    buffer.push_str(pinyin.plain());
    buffer.push(' ');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_well_formed(slug: &str) -> bool {
        !slug.is_empty()
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && slug
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-')
    }

    #[test]
    fn derive_slug_joins_words_with_hyphens() {
        assert_eq!(derive_slug("Hello World").unwrap(), "hello-world");
        assert_eq!(derive_slug("  Design  ").unwrap(), "design");
    }

    #[test]
    fn derive_slug_strips_punctuation() {
        assert_eq!(
            derive_slug("What's new in Rust 2024?!").unwrap(),
            "what-s-new-in-rust-2024"
        );
        assert_eq!(derive_slug("--UI / UX--").unwrap(), "ui-ux");
    }

    #[test]
    fn derive_slug_transliterates_chinese() {
        let slug = derive_slug("Rust 基础教程").expect("slug");
        assert_eq!(slug, "rust-ji-chu-jiao-cheng");
    }

    #[test]
    fn derive_slug_rejects_blank_and_symbol_only_input() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
        assert!(matches!(
            derive_slug("!!! ???"),
            Err(SlugError::Unrepresentable { .. })
        ));
    }

    #[test]
    fn derived_slugs_are_well_formed() {
        let names = [
            "Design",
            "Hello World",
            "  leading and trailing  ",
            "C++ & Rust",
            "Ünïcödé Names",
            "Tips: 10 things_you-should know.",
            "前端 Engineering",
            "a",
            "Q&A -- 2025",
        ];
        for name in names {
            let slug = derive_slug(name).expect("slug");
            assert!(is_well_formed(&slug), "{name:?} produced {slug:?}");
        }
    }

    #[test]
    fn long_transliterations_are_cut_on_a_word_boundary() {
        let slug = derive_slug(&"庄".repeat(30)).expect("slug");
        assert!(slug.len() <= MAX_SLUG_CHARS, "{} chars", slug.len());
        assert!(is_well_formed(&slug));
        assert!(slug.split('-').all(|word| word == "zhuang"));

        let slug = derive_slug(&"爽".repeat(40)).expect("slug");
        assert!(slug.len() <= MAX_SLUG_CHARS);
        assert!(slug.split('-').all(|word| word == "shuang"));
    }

    #[test]
    fn unbroken_words_are_cut_hard() {
        let slug = derive_slug(&"a".repeat(MAX_SLUG_CHARS + 20)).expect("slug");
        assert_eq!(slug.len(), MAX_SLUG_CHARS);
    }

    #[test]
    fn same_normalized_name_yields_same_slug() {
        assert_eq!(
            derive_slug("Design Systems").unwrap(),
            derive_slug("design   systems!").unwrap()
        );
    }
}
