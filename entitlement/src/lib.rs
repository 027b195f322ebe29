//! Decoding of on-chain entitlement rule data.
//!
//! Entitlement modules publish access-control predicates as compactly
//! ABI-encoded rule data: a post-order list of operations referencing check
//! operations (leaf predicates over token holdings or custom contracts) and
//! logical AND/OR combinators. This crate decodes the raw payloads into
//! typed entitlements, migrates legacy V1 rule data to the V2 schema, and
//! builds the evaluable operation tree. Evaluation against live chain state
//! is the caller's concern; everything here is a pure in-memory
//! transformation.

pub mod entitlement;
pub mod error;
pub mod migrate;
pub mod operation_tree;
pub mod params;
pub mod rule_data;

pub use entitlement::{marshal_entitlement, Entitlement};
pub use error::EntitlementError;
pub use migrate::upgrade_rule_data;
pub use operation_tree::{operation_tree, operation_tree_strict, OperationNode};
