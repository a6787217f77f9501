//! Rendering of diff segments for browsers and terminals.

use serde::{Deserialize, Serialize};

use crate::diff::segment::{DiffSegment, SegmentKind};

/// Output format of a rendered diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderTarget {
    /// HTML with changed words wrapped in a highlight tag.
    #[default]
    Html,
    /// Terminal text with changed words on a colored background.
    Ansi,
    /// The normalized text without any markup.
    Plain,
}

/// Configuration for HTML highlighting of changed words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlRenderConfig {
    /// HTML tag to wrap changed words (e.g., "mark", "em", "strong").
    pub tag: String,
    /// CSS class to add to the tag.
    pub css_class: Option<String>,
}

impl Default for HtmlRenderConfig {
    fn default() -> Self {
        HtmlRenderConfig {
            tag: "mark".to_string(),
            css_class: Some("change".to_string()),
        }
    }
}

impl HtmlRenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTML tag.
    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the CSS class, or remove it with `None`.
    pub fn css_class<S: Into<String>>(mut self, css_class: Option<S>) -> Self {
        self.css_class = css_class.map(Into::into);
        self
    }

    /// Build the opening HTML tag.
    pub fn opening_tag(&self) -> String {
        match &self.css_class {
            Some(class) => format!("<{} class=\"{}\">", self.tag, escape_html(class)),
            None => format!("<{}>", self.tag),
        }
    }

    /// Build the closing HTML tag.
    pub fn closing_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}

/// Start of the highlight: yellow background.
pub const ANSI_HIGHLIGHT: &str = "\x1b[43m";
/// Reset all attributes.
pub const ANSI_RESET: &str = "\x1b[0m";

/// Configuration for terminal rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsiRenderConfig {
    /// Emit escape sequences. Without color the output is the plain
    /// normalized text.
    pub use_color: bool,
}

impl Default for AnsiRenderConfig {
    fn default() -> Self {
        AnsiRenderConfig { use_color: true }
    }
}

impl AnsiRenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }
}

/// Escape `& < > " '` for inclusion in HTML text or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Render the normalized side of `segments` as HTML.
pub fn render_html(segments: &[DiffSegment], config: &HtmlRenderConfig) -> String {
    let open = config.opening_tag();
    let close = config.closing_tag();
    let mut html = String::new();

    for segment in segments {
        let text = escape_html(&segment.normalized);
        if segment.kind == SegmentKind::Changed {
            html.push_str(&open);
            html.push_str(&text);
            html.push_str(&close);
        } else {
            html.push_str(&text);
        }
    }
    html
}

// Keeps input text from injecting its own escape sequences.
fn strip_control(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect()
}

/// Render the normalized side of `segments` for a terminal.
pub fn render_ansi(segments: &[DiffSegment], config: &AnsiRenderConfig) -> String {
    let mut out = String::new();

    for segment in segments {
        let text = strip_control(&segment.normalized);
        if config.use_color && segment.kind == SegmentKind::Changed {
            out.push_str(ANSI_HIGHLIGHT);
            out.push_str(&text);
            out.push_str(ANSI_RESET);
        } else {
            out.push_str(&text);
        }
    }
    out
}
