//! Tracing subscriber setup for debugging resolution decisions.
//!
//! Output format comes from `CXX_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span hierarchy via `tracing-tree`, one level per
//!   nested resolution, conversion search or class completion
//!
//! ```bash
//! CXX_LOG=debug CXX_LOG_FORMAT=tree cargo test -p cxx_sema scenario
//! CXX_LOG="cxx_sema::overload=trace" cargo test -p cxx_sema
//! ```
//!
//! Nothing is installed unless `CXX_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
}

impl LogFormat {
    fn from_env() -> Self {
        Self::parse(&std::env::var("CXX_LOG_FORMAT").unwrap_or_default())
    }

    /// Unknown spellings fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            _ => Self::Text,
        }
    }
}

/// `CXX_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("CXX_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `true` when a subscriber was installed by this call. Calling it
/// again, or after another subscriber was set, is harmless.
pub fn init_tracing() -> bool {
    let has_cxx_log = std::env::var("CXX_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_cxx_log && !has_rust_log {
        return false;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_writer(std::io::stderr)
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init().is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}
