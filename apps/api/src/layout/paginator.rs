//! Top-to-bottom text placement with automatic page breaks.

use super::font_metrics::{get_metrics, PageConfig, Typeface};

/// Helvetica has no tab glyph.
const TAB_SPACES: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub typeface: Typeface,
    pub size_pt: u8,
}

impl TextStyle {
    pub const fn regular(size_pt: u8) -> Self {
        Self {
            typeface: Typeface::Helvetica,
            size_pt,
        }
    }

    pub const fn bold(size_pt: u8) -> Self {
        Self {
            typeface: Typeface::HelveticaBold,
            size_pt,
        }
    }
}

/// One line of text fixed at a baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub style: TextStyle,
    pub x_pt: i32,
    pub y_pt: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Places lines down the page and opens a new page once the cursor has passed
/// the bottom margin. The active style persists across page breaks.
pub struct Paginator<'a> {
    config: &'a PageConfig,
    pages: Vec<Page>,
    current: Page,
    y_pt: i32,
    style: TextStyle,
}

impl<'a> Paginator<'a> {
    pub fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: Page::default(),
            y_pt: config.top_pt(),
            style: TextStyle::regular(10),
        }
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.style = style;
    }

    #[cfg(test)]
    pub fn y_pt(&self) -> i32 {
        self.y_pt
    }

    /// Draws at the cursor without a break check, then moves down by `advance_pt`.
    pub fn draw(&mut self, text: &str, advance_pt: i32) {
        self.place(text.to_string());
        self.y_pt -= advance_pt;
    }

    /// Draws one body line, breaking to a new page first if the cursor is below the margin.
    pub fn put(&mut self, text: &str) {
        if self.y_pt < self.config.margin_pt {
            self.break_page();
        }
        self.place(text.to_string());
        self.y_pt -= self.config.leading_pt;
    }

    /// Word-wraps `text` to the text column after `indent`, putting each
    /// resulting line with the indent prefixed. Leading spaces and tabs of
    /// `text` join the indent, so nested lines stay nested after wrapping.
    pub fn put_wrapped(&mut self, indent: &str, text: &str) {
        let body = text.trim_start_matches(|c: char| c == ' ' || c == '\t');
        let lead = &text[..text.len() - body.len()];
        let indent = format!("{indent}{}", lead.replace('\t', TAB_SPACES));

        let metrics = get_metrics(self.style.typeface);
        let size = f32::from(self.style.size_pt);
        let available = self.config.text_width_pt() - metrics.measure_pt(&indent, size);
        for line in metrics.wrap(body, size, available) {
            self.put(&format!("{indent}{line}"));
        }
    }

    /// Moves the cursor down without drawing.
    pub fn skip(&mut self, gap_pt: i32) {
        self.y_pt -= gap_pt;
    }

    pub fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y_pt = self.config.top_pt();
    }

    fn place(&mut self, text: String) {
        self.current.lines.push(PlacedLine {
            text,
            style: self.style,
            x_pt: self.config.margin_pt,
            y_pt: self.y_pt,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_page_config;

    #[test]
    fn test_lines_advance_by_leading() {
        let config = default_page_config();
        let mut paginator = Paginator::new(&config);
        paginator.put("one");
        paginator.put("two");
        let pages = paginator.finish();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines[0].y_pt, 720);
        assert_eq!(pages[0].lines[1].y_pt, 706);
        assert_eq!(pages[0].lines[0].x_pt, 72);
    }

    #[test]
    fn test_breaks_page_below_bottom_margin() {
        let config = default_page_config();
        let mut paginator = Paginator::new(&config);
        // 720 down to 76 in 14pt steps is 47 lines, leaving the cursor at 62.
        for i in 0..47 {
            paginator.put(&format!("line {i}"));
        }
        let pages = paginator.finish();
        assert_eq!(pages.len(), 1);

        let mut paginator = Paginator::new(&config);
        for i in 0..48 {
            paginator.put(&format!("line {i}"));
        }
        let pages = paginator.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].lines.len(), 1);
        assert_eq!(pages[1].lines[0].y_pt, 720);
    }

    #[test]
    fn test_style_carries_over_page_break() {
        let config = default_page_config();
        let mut paginator = Paginator::new(&config);
        paginator.set_style(TextStyle::bold(12));
        paginator.skip(720 - 60);
        paginator.put("after break");
        let pages = paginator.finish();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].lines.is_empty());
        assert_eq!(pages[1].lines[0].style, TextStyle::bold(12));
    }

    #[test]
    fn test_draw_ignores_margin() {
        let config = default_page_config();
        let mut paginator = Paginator::new(&config);
        paginator.skip(700);
        paginator.draw("footer", 22);
        assert_eq!(paginator.y_pt(), -2);
        assert_eq!(paginator.finish().len(), 1);
    }

    #[test]
    fn test_put_wrapped_indents_every_line() {
        let config = default_page_config();
        let mut paginator = Paginator::new(&config);
        paginator.put_wrapped("  ", &"lorem ipsum dolor ".repeat(20));
        let pages = paginator.finish();
        assert!(pages[0].lines.len() > 1);
        assert!(pages[0].lines.iter().all(|line| line.text.starts_with("  ")));
    }

    #[test]
    fn test_put_wrapped_keeps_leading_whitespace() {
        let config = default_page_config();
        let mut paginator = Paginator::new(&config);
        paginator.put_wrapped("  ", "  - nested point");
        paginator.put_wrapped("  ", "\tstep one");
        paginator.put_wrapped("  ", &format!("    {}", "wrapped ".repeat(60)));
        let pages = paginator.finish();
        let lines = &pages[0].lines;
        assert_eq!(lines[0].text, "    - nested point");
        assert_eq!(lines[1].text, "      step one");
        assert!(lines.len() > 3);
        assert!(lines[2..].iter().all(|line| line.text.starts_with("      wrapped")));

        let metrics = get_metrics(Typeface::Helvetica);
        for line in &lines[2..] {
            assert!(metrics.measure_pt(line.text.trim_end(), 10.0) <= config.text_width_pt() + 0.01);
        }
    }
}
