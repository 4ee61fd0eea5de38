use pulldown_cmark::{html, Event, Options, Parser};

pub const EMPTY_STAGE_MESSAGE: &str = "No analysis output for this stage.";

/// Render model output to HTML. Raw HTML in the source is shown as text.
pub fn render_markdown(source: &str) -> String {
    if source.trim().is_empty() {
        return format!("<p class=\"empty-stage\">{}</p>", EMPTY_STAGE_MESSAGE);
    }

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_and_lists() {
        let html = render_markdown("## Summary\n\n- one\n- **two**\n");
        assert!(html.contains("<h2>Summary</h2>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains("<strong>two</strong>"));
    }

    #[test]
    fn test_tables_and_strikethrough() {
        let html = render_markdown("| A | B |\n|---|---|\n| 1 | 2 |\n\n~~old~~");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_markdown("Hello <script>alert(1)</script> world");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));

        let block = render_markdown("<div onclick=\"x()\">hi</div>\n");
        assert!(!block.contains("<div"));
        assert!(block.contains("&lt;div"));
    }

    #[test]
    fn test_empty_content_placeholder() {
        assert!(render_markdown("").contains(EMPTY_STAGE_MESSAGE));
        assert!(render_markdown("   \n").contains(EMPTY_STAGE_MESSAGE));
    }
}
