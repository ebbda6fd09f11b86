//! Request middleware.

pub mod edge;

pub use edge::{edge_middleware, with_edge_pipeline, BypassRule, EdgeState};
