//! Segment → human label formatting, used everywhere a path token is
//! rendered as text.

/// `"web-design"` → `"Web Design"`. `None` and empty input format to `""`.
pub fn format_segment_label(segment: Option<&str>) -> String {
    let Some(segment) = segment else {
        return String::new();
    };

    segment
        .split('-')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
