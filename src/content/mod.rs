//! Content processing: front matter, excerpts and markdown rendering.

pub mod excerpt;
pub mod front_matter;
pub mod markdown;

pub use excerpt::{excerpt, strip_html, ExcerptOptions};
pub use front_matter::{split_front_matter, FrontMatter, FrontMatterError, Value};
pub use markdown::MarkdownRenderer;
