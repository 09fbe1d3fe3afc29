//! Lightweight preview highlighting
//!
//! Text is split into plain runs, URLs, mentions, hashtags and line breaks,
//! then rendered as escaped HTML with one `<span>` class per highlighted kind.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// URLs anywhere; mentions and hashtags only at the start of the text or
    /// after whitespace, which `lead` captures so it stays plain text
    static ref TOKEN_REGEX: Regex = Regex::new(concat!(
        r"(?P<url>https?://[^\s<]+)",
        r"|(?P<lead>^|\s)(?:",
        r"(?P<mention>@[A-Za-z0-9_.-]+(?:@[A-Za-z0-9_.-]+)?)",
        r"|(?P<hashtag>#[A-Za-z0-9_]+))",
    ))
    .expect("token pattern is valid");
}

/// One run of preview text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Segment {
    Text(String),
    Url(String),
    Mention(String),
    Hashtag(String),
    LineBreak,
}

/// Split `text` into highlightable segments
///
/// URLs are recognised anywhere; mentions and hashtags only at the start of
/// the text or right after whitespace.
pub fn tokenize(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut plain_start = 0;

    for caps in TOKEN_REGEX.captures_iter(text) {
        let (token, segment) = if let Some(url) = caps.name("url") {
            (url, Segment::Url(url.as_str().to_string()))
        } else if let Some(mention) = caps.name("mention") {
            (mention, Segment::Mention(mention.as_str().to_string()))
        } else if let Some(tag) = caps.name("hashtag") {
            (tag, Segment::Hashtag(tag.as_str().to_string()))
        } else {
            continue;
        };

        push_plain(&mut segments, &text[plain_start..token.start()]);
        segments.push(segment);
        plain_start = token.end();
    }

    push_plain(&mut segments, &text[plain_start..]);
    segments
}

/// Render segments to HTML
pub fn render_html(segments: &[Segment]) -> String {
    let mut html = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => html.push_str(&escape_html(text)),
            Segment::Url(url) => push_span(&mut html, "highlight-url", url),
            Segment::Mention(mention) => push_span(&mut html, "highlight-mention", mention),
            Segment::Hashtag(tag) => push_span(&mut html, "highlight-hashtag", tag),
            Segment::LineBreak => html.push_str("<br>"),
        }
    }
    html
}

/// `tokenize` then `render_html`
pub fn highlight(text: &str) -> String {
    render_html(&tokenize(text))
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn push_span(html: &mut String, class: &str, text: &str) {
    html.push_str("<span class=\"");
    html.push_str(class);
    html.push_str("\">");
    html.push_str(&escape_html(text));
    html.push_str("</span>");
}

/// Plain run, with a `LineBreak` for every newline
fn push_plain(segments: &mut Vec<Segment>, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            segments.push(Segment::LineBreak);
        }
        if !line.is_empty() {
            segments.push(Segment::Text(line.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_segment() {
        assert_eq!(tokenize("just words"), vec![Segment::Text("just words".to_string())]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_mixed_segments() {
        let segments = tokenize("New post #11ty by @zach@fosstodon.org\nhttps://11ty.dev/blog/ ok");
        assert_eq!(
            segments,
            vec![
                Segment::Text("New post ".to_string()),
                Segment::Hashtag("#11ty".to_string()),
                Segment::Text(" by ".to_string()),
                Segment::Mention("@zach@fosstodon.org".to_string()),
                Segment::LineBreak,
                Segment::Url("https://11ty.dev/blog/".to_string()),
                Segment::Text(" ok".to_string()),
            ]
        );
    }

    #[test]
    fn test_bluesky_handle_mention() {
        assert_eq!(
            tokenize("@11ty.dev"),
            vec![Segment::Mention("@11ty.dev".to_string())]
        );
    }

    #[test]
    fn test_mid_word_markers_are_plain() {
        assert_eq!(
            tokenize("mail me@example.com or a#b"),
            vec![Segment::Text("mail me@example.com or a#b".to_string())]
        );
    }

    #[test]
    fn test_lone_markers_are_plain() {
        assert_eq!(tokenize("# @ x"), vec![Segment::Text("# @ x".to_string())]);
    }

    #[test]
    fn test_url_stops_at_angle_bracket() {
        assert_eq!(
            tokenize("<https://a.b/c>"),
            vec![
                Segment::Text("<".to_string()),
                Segment::Url("https://a.b/c>".to_string()),
            ]
        );
        assert_eq!(
            tokenize("https://a.b/c<d"),
            vec![
                Segment::Url("https://a.b/c".to_string()),
                Segment::Text("<d".to_string()),
            ]
        );
    }

    #[test]
    fn test_hashtag_after_line_break() {
        assert_eq!(
            tokenize("hi\n#tag"),
            vec![
                Segment::Text("hi".to_string()),
                Segment::LineBreak,
                Segment::Hashtag("#tag".to_string()),
            ]
        );
    }

    #[test]
    fn test_adjacent_tags_share_separator() {
        assert_eq!(
            tokenize("#a #b https://x.y/#frag"),
            vec![
                Segment::Hashtag("#a".to_string()),
                Segment::Text(" ".to_string()),
                Segment::Hashtag("#b".to_string()),
                Segment::Text(" ".to_string()),
                Segment::Url("https://x.y/#frag".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_escapes_and_wraps() {
        let html = highlight("<b>&</b> #rust\n@me https://x.y/?a=1&b=2");
        assert_eq!(
            html,
            "&lt;b&gt;&amp;&lt;/b&gt; <span class=\"highlight-hashtag\">#rust</span><br>\
             <span class=\"highlight-mention\">@me</span> \
             <span class=\"highlight-url\">https://x.y/?a=1&amp;b=2</span>"
        );
    }

    #[test]
    fn test_non_ascii_text_survives() {
        assert_eq!(highlight("caf\u{e9} \u{1F680}"), "caf\u{e9} \u{1F680}");
    }
}
