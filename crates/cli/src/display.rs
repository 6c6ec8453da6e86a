//! Terminal rendering of posts and search headers.

use archive::Post;
use colored::Colorize;
use std::ops::Range;

/// Byte ranges of `needle` in `text`, ASCII case-insensitive and
/// non-overlapping. Mirrors how the archive's `LIKE` matches.
pub fn match_ranges(text: &str, needle: &str) -> Vec<Range<usize>> {
    if needle.is_empty() {
        return Vec::new();
    }
    // ASCII lowercasing keeps byte offsets and char boundaries intact.
    let haystack = text.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    haystack
        .match_indices(&needle)
        .map(|(start, m)| start..start + m.len())
        .collect()
}

/// `text` with every match of `needle` highlighted.
pub fn highlight(text: &str, needle: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for range in match_ranges(text, needle) {
        out.push_str(&text[last..range.start]);
        out.push_str(&text[range.clone()].black().on_yellow().to_string());
        last = range.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Human description of the active date bounds, if any.
pub fn date_range_label(from: &str, to: &str) -> Option<String> {
    match (from.trim(), to.trim()) {
        ("", "") => None,
        (from, "") => Some(format!("From: {from}")),
        ("", to) => Some(format!("To: {to}")),
        (from, to) => Some(format!("From: {from} To: {to}")),
    }
}

/// Print one post as a numbered entry.
pub fn print_post(rank: usize, post: &Post, needle: &str, thumbnails: bool) {
    let marker = if post.featured { "⭐ " } else { "" };
    println!(
        "{}. {}{}",
        rank.to_string().green(),
        marker,
        highlight(&post.title, needle).bold()
    );

    let date = if post.date.is_empty() { "undated" } else { post.date.as_str() };
    println!(
        "   {} | {} | {}",
        highlight(&post.authors, needle),
        date.dimmed(),
        post.category_name.cyan()
    );
    if !post.summary.is_empty() {
        println!("   {}", highlight(&post.summary, needle));
    }
    println!("   {}", post.link.blue().underline());
    if thumbnails {
        if let Some(thumbnail) = post.thumbnail.as_deref().filter(|t| !t.is_empty()) {
            println!("   {} {}", "Thumbnail:".dimmed(), thumbnail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_ranges_ignores_ascii_case() {
        assert_eq!(match_ranges("Shader shaders SHADER", "shader"), vec![0..6, 7..13, 15..21]);
    }

    #[test]
    fn test_match_ranges_empty_needle() {
        assert!(match_ranges("anything", "").is_empty());
    }

    #[test]
    fn test_match_ranges_with_multibyte_text() {
        let text = "Über AI für Spiele";
        let ranges = match_ranges(text, "ai");
        assert_eq!(ranges.len(), 1);
        assert_eq!(&text[ranges[0].clone()], "AI");
    }

    #[test]
    fn test_date_range_label() {
        assert_eq!(date_range_label("", ""), None);
        assert_eq!(date_range_label("2020-01-01", "").as_deref(), Some("From: 2020-01-01"));
        assert_eq!(date_range_label("", "2021").as_deref(), Some("To: 2021"));
        assert_eq!(
            date_range_label("2020", "2021-06").as_deref(),
            Some("From: 2020 To: 2021-06")
        );
    }
}
