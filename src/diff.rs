//! Word-level diff between original and normalized text.
//!
//! [`word_diff`] turns a normalization result into [`DiffSegment`]s, which
//! the renderers turn into HTML or terminal output:
//!
//! ```
//! use std::sync::Arc;
//!
//! use hassy::data::DataStore;
//! use hassy::diff::{HtmlRenderConfig, render_html, word_diff};
//! use hassy::normalizer::Normalizer;
//!
//! let normalizer = Normalizer::new(Arc::new(DataStore::empty()));
//! let result = normalizer.normalize_text("قال الرجل").unwrap();
//! let html = render_html(&word_diff(&result), &HtmlRenderConfig::default());
//! assert_eq!(html, "<mark class=\"change\">كال</mark> الرجل");
//! ```

pub mod render;
pub mod segment;

pub use render::{
    AnsiRenderConfig, HtmlRenderConfig, RenderTarget, escape_html, render_ansi, render_html,
};
pub use segment::{ChangeSummary, DiffSegment, SegmentKind, change_summary, percentage, word_diff};
