//! Edge request gate for the SaaS front-end.
//!
//! Every request passes through [`pipeline::EdgePipeline`] before any page
//! renders: protected routes without a session cookie are sent to the login
//! page, edition-only routes are rewritten into the enterprise namespace when
//! that edition is deployed, and the locale cookie is resolved into a request
//! header for the renderer.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod pipeline;
pub mod routing;

pub use config::schema::EdgeConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use pipeline::{EdgePipeline, EdgeRequest, PipelineResult};
