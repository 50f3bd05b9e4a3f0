//! Summary view rendering.

use once_cell::sync::Lazy;
use regex::Regex;

/// Shown while a summary is being generated.
pub const LOADING_TEXT: &str = "Generating summary...";

/// Appended below every error message.
pub const ERROR_HINT: &str = "Please check your API key and try again.";

static NUMERIC_ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").expect("entity pattern is valid")
});

/// Escape text for insertion into markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Decode the entities model output commonly carries, so text that
/// arrives already escaped is not escaped twice.
pub fn unescape_html(text: &str) -> String {
    let decoded = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures<'_>| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// What the summary area shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SummaryContent {
    #[default]
    Empty,
    Loading,
    Summary {
        original_comment: String,
        summary: String,
    },
    Error {
        message: String,
    },
}

impl SummaryContent {
    /// CSS class of the summary area.
    pub fn class(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Error { .. } => "error",
            Self::Empty | Self::Summary { .. } => "",
        }
    }

    /// The original thread, when a summary is shown.
    pub fn original_comment(&self) -> Option<&str> {
        match self {
            Self::Summary {
                original_comment, ..
            } => Some(original_comment),
            _ => None,
        }
    }

    /// Markup for the summary area. Every piece of text is escaped.
    pub fn render(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Loading => LOADING_TEXT.to_string(),
            Self::Summary {
                original_comment,
                summary,
            } => format!(
                concat!(
                    "<div class=\"summary-container\">",
                    "<div class=\"original-comment\"><strong>Original Comment Thread:</strong>",
                    "<pre>{}</pre></div>",
                    "<div class=\"summary-result\"><strong>Summary:</strong><p>{}</p></div>",
                    "</div>"
                ),
                escape_html(original_comment),
                escape_html(&unescape_html(summary)),
            ),
            Self::Error { message } => format!(
                "<div class=\"error-container\"><p class=\"error-message\">{}</p><p>{}</p></div>",
                escape_html(message),
                ERROR_HINT,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_five() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom's & Jerry</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom&#039;s &amp; Jerry&lt;/a&gt;"
        );
    }

    #[test]
    fn test_unescape_named_and_numeric() {
        assert_eq!(unescape_html("&lt;b&gt; &amp; &quot;x&quot; &#39;y&#x27;"), "<b> & \"x\" 'y'");
        assert_eq!(unescape_html("&#9999999;"), "&#9999999;");
    }

    #[test]
    fn test_unescape_decodes_once() {
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_script_never_survives_rendering() {
        for input in [
            "<script>alert(1)</script>",
            "&lt;script&gt;alert(1)&lt;/script&gt;",
            "a & b \"quoted\" 'single'",
        ] {
            let content = SummaryContent::Summary {
                original_comment: input.to_string(),
                summary: input.to_string(),
            };
            let html = content.render();
            assert!(!html.contains("<script"), "{html}");
            assert!(!html.contains("\"quoted\""));
            assert!(!html.contains("'single'"));
        }
    }

    #[test]
    fn test_already_escaped_summary_is_not_double_escaped() {
        let content = SummaryContent::Summary {
            original_comment: "x".to_string(),
            summary: "Tom &amp; Jerry".to_string(),
        };
        let html = content.render();
        assert!(html.contains("<p>Tom &amp; Jerry</p>"));
        assert!(!html.contains("&amp;amp;"));
    }

    #[test]
    fn test_error_view() {
        let content = SummaryContent::Error {
            message: "API Error: <bad>".to_string(),
        };
        let html = content.render();
        assert!(html.contains("API Error: &lt;bad&gt;"));
        assert!(html.contains(ERROR_HINT));
        assert_eq!(content.class(), "error");
    }

    #[test]
    fn test_loading_view() {
        assert_eq!(SummaryContent::Loading.render(), LOADING_TEXT);
        assert_eq!(SummaryContent::Loading.class(), "loading");
    }
}
