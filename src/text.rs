//! Text utilities for CMS content
//!
//! Slug generation, reading-time estimation and HTML excerpting for blog
//! display records.

/// Average reading speed used for estimates.
pub const WORDS_PER_MINUTE: usize = 200;

/// Derive a URL slug from a human-readable title.
///
/// Transliterates to ASCII and lowercases, so
/// `¿Qué es la Transformación Digital?` becomes
/// `que-es-la-transformacion-digital`.
pub fn generate_slug(input: &str) -> String {
    slug::slugify(input)
}

/// Estimate reading time in whole minutes at [`WORDS_PER_MINUTE`].
///
/// Rounds up and never returns zero; an empty body still reads as one
/// minute.
pub fn calculate_reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Sanitize untrusted CMS HTML, keeping the default safe tag set.
pub fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

/// Reduce HTML to plain text: all tags stripped, whitespace collapsed.
pub fn plain_text(html: &str) -> String {
    let stripped = ammonia::Builder::empty().clean(html).to_string();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Build a plain-text excerpt of at most `max_chars` characters, cut on a
/// word boundary with a trailing ellipsis when truncated.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = plain_text(html);

    if text.chars().count() <= max_chars {
        return text;
    }

    let mut out = String::new();
    let mut len = 0usize;
    for word in text.split(' ') {
        let word_len = word.chars().count();
        let added = if out.is_empty() { word_len } else { word_len + 1 };
        if len + added > max_chars {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        len += added;
    }

    // A single word longer than the limit: hard cut
    if out.is_empty() {
        out = text.chars().take(max_chars).collect();
    }

    out.push('…');
    out
}
