//! Text formatting helpers for cards and dropdown labels

/// Season/episode code, both parts zero-padded to at least two digits
pub fn format_episode_code(season: u32, number: u32) -> String {
    format!("S{:02}E{:02}", season, number)
}

/// Remove anything that looks like an HTML tag.
///
/// An unterminated `<` is kept as literal text.
pub fn strip_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('<') {
        match rest[start..].find('>') {
            Some(end) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + end + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);

    decode_entities(&out)
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Shorten `text` to `max_chars` characters, appending "..." when cut.
/// Returns the preview and whether anything was cut.
pub fn summary_preview(text: &str, max_chars: usize) -> (String, bool) {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => (format!("{}...", &text[..cut]), true),
        None => (text.to_string(), false),
    }
}

pub fn genres_text(genres: &[String]) -> String {
    if genres.is_empty() {
        "N/A".to_string()
    } else {
        genres.join(", ")
    }
}

pub fn status_text(status: &str) -> String {
    if status.is_empty() { "N/A".to_string() } else { status.to_string() }
}

pub fn rating_text(rating: Option<f64>) -> String {
    match rating {
        Some(r) if r > 0.0 => r.to_string(),
        _ => "N/A".to_string(),
    }
}

pub fn runtime_text(runtime: Option<u32>) -> String {
    match runtime {
        Some(m) if m > 0 => format!("{} minutes", m),
        _ => "N/A".to_string(),
    }
}
