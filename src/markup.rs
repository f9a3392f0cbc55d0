//! The small markup dialect used in AI replies: `**bold**`, `[label](url)`
//! and newlines. Everything else is literal text.

use regex::Regex;
use std::sync::OnceLock;

fn bold_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").expect("static regex"))
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(.*?)\]\((.*?)\)").expect("static regex"))
}

/// Link targets that may become clickable. Anything else stays text.
pub fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    ["https://", "http://", "tg://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape first, then substitute. Substituted markup never comes from the
/// input, so `<script>` in a reply always arrives as text.
pub fn to_html(text: &str) -> String {
    let escaped = escape_html(text);
    let bolded = bold_re().replace_all(&escaped, "<strong>$1</strong>");
    let linked = link_re().replace_all(&bolded, |caps: &regex::Captures| {
        let label = &caps[1];
        let url = &caps[2];
        if is_safe_url(url) {
            format!(r#"<a href="{url}" target="_blank" rel="noopener noreferrer">{label}</a>"#)
        } else {
            caps[0].to_string()
        }
    });
    linked.replace('\n', "<br />")
}

/// Renderable pieces of a reply, for widgets that don't speak HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
    Link { label: String, url: String },
    LineBreak,
}

/// Same dialect as [`to_html`], produced as spans. Nothing is escaped here;
/// the caller renders spans as plain text.
pub fn to_spans(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            spans.push(Span::LineBreak);
        }
        push_line(line, &mut spans);
    }
    spans
}

fn push_line(line: &str, spans: &mut Vec<Span>) {
    let mut rest = line;
    while !rest.is_empty() {
        let bold = bold_re().captures(rest);
        let link = link_re().captures(rest);
        let bold_at = bold.as_ref().and_then(|c| c.get(0)).map(|m| m.start());
        let link_at = link.as_ref().and_then(|c| c.get(0)).map(|m| m.start());

        let (caps, is_bold) = match (bold_at, link_at) {
            (Some(b), Some(l)) if b <= l => (bold, true),
            (Some(_), None) => (bold, true),
            (_, Some(_)) => (link, false),
            (None, None) => {
                push_text(rest, spans);
                return;
            }
        };
        let Some(caps) = caps else {
            push_text(rest, spans);
            return;
        };
        let Some(whole) = caps.get(0) else {
            push_text(rest, spans);
            return;
        };

        push_text(&rest[..whole.start()], spans);
        if is_bold {
            spans.push(Span::Bold(caps[1].to_string()));
        } else if is_safe_url(&caps[2]) {
            spans.push(Span::Link {
                label: caps[1].to_string(),
                url: caps[2].trim().to_string(),
            });
        } else {
            push_text(whole.as_str(), spans);
        }
        rest = &rest[whole.end()..];
    }
}

fn push_text(text: &str, spans: &mut Vec<Span>) {
    if text.is_empty() {
        return;
    }
    if let Some(Span::Text(prev)) = spans.last_mut() {
        prev.push_str(text);
    } else {
        spans.push(Span::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::{Span, escape_html, is_safe_url, to_html, to_spans};

    #[test]
    fn escapes_all_five_characters() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn scheme_allowlist() {
        assert!(is_safe_url("https://t.me/x"));
        assert!(is_safe_url("tg://resolve?domain=x"));
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("/relative"));
    }

    #[test]
    fn spans_split_bold_links_and_breaks() {
        assert_eq!(
            to_spans("a **b** [c](https://d)\ne"),
            vec![
                Span::Text("a ".into()),
                Span::Bold("b".into()),
                Span::Text(" ".into()),
                Span::Link {
                    label: "c".into(),
                    url: "https://d".into()
                },
                Span::LineBreak,
                Span::Text("e".into()),
            ]
        );
    }

    #[test]
    fn unsafe_link_stays_text() {
        assert_eq!(
            to_spans("[x](javascript:alert(1))"),
            vec![Span::Text("[x](javascript:alert(1))".into())]
        );
        assert!(!to_html("[x](javascript:alert(1))").contains("<a "));
    }
}
