//! # hassy
//!
//! Normalization of Hassaniya-Arabic text.
//!
//! ## Features
//!
//! - Variant lookup against a hot-reloadable, versioned data store
//! - Ordered letter rules (`گ`/`ق` to `ك`, final `ة` to `ه`) with exception words
//! - Lossless tokenization: every byte of the input survives normalization
//! - Sharded per-word cache keyed by data version
//! - Word-level diff rendered as HTML or terminal output
//! - Aggregate statistics, including words nothing applied to
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hassy::prelude::*;
//!
//! let service = HassyService::from_store(Arc::new(DataStore::empty()), HassyConfig::default());
//! let response = service.normalize_text("كلمة", RenderTarget::Html).unwrap();
//! assert_eq!(response.normalized, "كلمه");
//! assert_eq!(response.rendered, "<mark class=\"change\">كلمه</mark>");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod diff;
pub mod error;
pub mod normalizer;
pub mod service;
pub mod stats;

pub mod prelude {
    pub use crate::config::HassyConfig;
    pub use crate::data::{DataStore, ExceptionSet, Snapshot, VariantMap};
    pub use crate::diff::{DiffSegment, RenderTarget, SegmentKind};
    pub use crate::error::{HassyError, Result};
    pub use crate::normalizer::{NormalizationResult, Normalizer, WordSource};
    pub use crate::service::{DataInfo, HassyService, NormalizeResponse};
    pub use crate::stats::{Stats, StatsCollector, StatsSummary};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
