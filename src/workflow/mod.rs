//! Backend workflow graphs.
//!
//! A workflow is a typed, validated node graph that serializes to the backend's API-format
//! JSON.

/// Fixed text-to-image topology.
pub mod builder;
/// Typed nodes and the validated graph.
pub mod graph;
