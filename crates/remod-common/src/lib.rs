//! Common types and utilities for the remod JavaScript modernizer.
//!
//! This crate provides foundational types used across all remod crates:
//! - Source spans (`Span`)
//! - Position/line lookup for source locations (`LineMap`, `Position`)
//! - Comment ranges and comment scanning
//! - Warning records produced by transforms

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position/Range types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Comment scanning utilities
pub mod comments;
pub use comments::{CommentKind, CommentRange};

// Warnings surfaced by transforms that decline a rewrite
pub mod diagnostics;
pub use diagnostics::Warning;
