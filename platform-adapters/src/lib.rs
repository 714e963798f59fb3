pub mod document;
pub mod extractor;
pub mod reddit;
pub mod registry;
pub mod twitter;


pub use document::PageDocument;
pub use extractor::ContentExtractor;
pub use reddit::RedditAdapter;
pub use registry::{extract_page, AdapterRegistry, PlatformAdapter};
pub use twitter::TwitterAdapter;
