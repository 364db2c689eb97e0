//! User directory service library.
//!
//! Hexagonal layout: [`domain`] holds the listing pipeline, the role
//! reconciler and the service behind the ports; [`inbound`] adapts HTTP
//! requests onto those ports; [`outbound`] implements the store.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
