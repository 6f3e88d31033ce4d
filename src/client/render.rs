//! Presentation helpers. Direction affects how text is shown, never what
//! is stored or sent for translation.

use crate::languages::TextDirection;

/// Unicode RIGHT-TO-LEFT EMBEDDING.
const RLE: char = '\u{202B}';
/// Unicode POP DIRECTIONAL FORMATTING.
const PDF: char = '\u{202C}';

/// Heading for a language, flagged when it was saved this session.
pub fn display_label(language: &str, modified: bool) -> String {
    if modified {
        format!("{language} (Modified)")
    } else {
        language.to_string()
    }
}

/// Wrap RTL content in a right-aligned block; LTR content is unchanged.
pub fn render_html(language: &str, html: &str) -> String {
    match TextDirection::of(language) {
        TextDirection::Rtl => {
            format!("<div style=\"direction: rtl; text-align: right;\">{html}</div>")
        }
        TextDirection::Ltr => html.to_string(),
    }
}

/// Text for a terminal. RTL content is embedded in directional marks so
/// bidi-aware terminals lay it out right-to-left.
pub fn render_terminal(language: &str, text: &str) -> String {
    match TextDirection::of(language) {
        TextDirection::Rtl => text
            .lines()
            .map(|line| format!("{RLE}{line}{PDF}"))
            .collect::<Vec<_>>()
            .join("\n"),
        TextDirection::Ltr => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_label() {
        assert_eq!(display_label("French", false), "French");
        assert_eq!(display_label("French", true), "French (Modified)");
    }

    #[test]
    fn test_render_html_wraps_only_rtl() {
        assert_eq!(
            render_html("Arabic", "<p>مرحبا</p>"),
            "<div style=\"direction: rtl; text-align: right;\"><p>مرحبا</p></div>"
        );
        assert_eq!(render_html("French", "<p>Bonjour</p>"), "<p>Bonjour</p>");
    }

    #[test]
    fn test_render_terminal_marks_each_rtl_line() {
        let rendered = render_terminal("Hebrew", "שלום\nעולם");
        assert_eq!(rendered, "\u{202B}שלום\u{202C}\n\u{202B}עולם\u{202C}");
        assert_eq!(render_terminal("German", "Hallo\nWelt"), "Hallo\nWelt");
    }
}
