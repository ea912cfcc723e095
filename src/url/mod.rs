//! URL handling module for CrawlCraft
//!
//! Links found on a page are resolved against the host root of the page
//! they were found on. URLs are otherwise treated as opaque strings, so two
//! URLs name the same page only if they are byte-for-byte identical.

mod resolve;

pub use resolve::{host_root, resolve_link};
