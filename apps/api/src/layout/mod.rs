// Document layout: Helvetica glyph metrics and a paginating line placer.
// Used by the PDF export; CPU-bound callers run it inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod paginator;

pub use font_metrics::{default_page_config, PageConfig, Typeface};
pub use paginator::{Page, Paginator, TextStyle};
