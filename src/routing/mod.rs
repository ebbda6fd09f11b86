//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → classifier.rs (protected? public?)
//!     → matcher.rs (prefix set membership)
//!     → Return: Classification
//!
//! Route Compilation (at startup):
//!     RouteTableConfig
//!     → Compile PrefixSets (protected, public, edition_only)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Tables compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same classification

pub mod classifier;
pub mod matcher;

pub use classifier::{classify, Classification, RouteTable};
pub use matcher::PrefixSet;
