//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace/timeout/request-id layers)
//!     → request.rs (request ID)
//!     → middleware/edge.rs (auth gate, edition rewrite, locale header)
//!     → server.rs forward handler → upstream renderer
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod server;

pub use middleware::{with_edge_pipeline, EdgeState};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
