//! Content module - newsletter sources, parsing and loading

pub mod date;
mod entry;
mod error;
pub mod fetch;
mod frontmatter;
pub mod loader;
pub mod manifest;
mod markdown;
pub mod source;

pub use entry::{sort_newest_first, NewsletterEntry, StaticPost, LOAD_ERROR_MESSAGE};
pub use error::{FetchError, SourceError};
pub use fetch::{Fetch, FsFetcher, HttpFetcher};
pub use frontmatter::FrontMatter;
pub use manifest::PostReference;
pub use markdown::{Markdown, MarkdownRenderer};
pub use source::{ManifestSource, NewsletterSource, StaticSource};
