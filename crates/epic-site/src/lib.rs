//! Everything around the page partitioner that makes a site.
//!
//! - [`config`]: where the document template, pages and static files live
//! - [`route`]: turning a request path into a page file or a static lookup
//! - [`site`]: rendering a page into the document template
//! - [`static_files`]: reading static files and guessing their type
//! - [`server`]: the HTTP/1.1 development server behind `epic serve`
//! - [`generate`]: the static export behind `epic generate`

/// Site layout on disk.
pub mod config;
/// Static export.
pub mod generate;
/// Request path resolution.
pub mod route;
/// Development server.
pub mod server;
/// Page rendering.
pub mod site;
/// Static file lookup.
pub mod static_files;

pub use config::SiteConfig;
pub use generate::{GenerateError, GenerateReport, generate};
pub use route::{Route, resolve_route};
pub use server::{ServerError, respond, serve};
pub use site::{Site, SiteError};
pub use static_files::StaticFile;
