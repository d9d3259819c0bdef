//! spritegen generates consistent multi-frame sprite animations with a ComfyUI-compatible
//! image-synthesis backend and packs them into sprite sheets.
//!
//! The crate has two halves:
//!
//! - Job orchestration: build a reproducible [`WorkflowGraph`], submit it with a
//!   [`JobClient`], track completion over the backend's event channel and download the
//!   artifact.
//! - Deterministic image work: [`normalize_sprite`] onto a fixed canvas, pack frames into a
//!   grid with [`SheetPacker`], and score cross-frame consistency with [`validate_frames`].
//!
//! [`generate_animation`] ties both together for one entity and animation.
#![forbid(unsafe_code)]

mod foundation;

/// Job orchestration against the backend.
pub mod client;
/// Seeds, prompt presets and the animation pipeline.
pub mod generation;
/// Normalization, packing, validation and persistence.
pub mod sprite;
/// Typed backend workflow graphs.
pub mod workflow;

pub use crate::foundation::core::{Frame, SpriteSize};
pub use crate::foundation::error::{SpriteError, SpriteResult};

pub use crate::client::backend::{Backend, EventChannel};
pub use crate::client::config::ClientConfig;
pub use crate::client::http::HttpBackend;
pub use crate::client::job::{GenerationRequest, JobClient, JobHandle, JobStatus, new_session_id};
pub use crate::client::progress::{NoopObserver, ProgressEvent, ProgressObserver, TracingObserver};
pub use crate::client::protocol::ImageRef;
pub use crate::generation::pipeline::{
    AnimationReport, EntityFailure, GenerationSettings, RunSummary, generate_animation,
    generate_entities,
};
pub use crate::generation::presets::{
    AnimationSpec, EntitySpec, NEGATIVE_PROMPT, WALK_POSES, build_prompt, demo_entities,
};
pub use crate::generation::seed::derive_seed;
pub use crate::sprite::normalize::normalize_sprite;
pub use crate::sprite::pack::{
    AnimationFrames, FrameMetadata, SheetPacker, SpriteSheetMetadata, pack_frames,
};
pub use crate::sprite::store::{SpriteStore, decode_frame, load_frames_from_dir};
pub use crate::sprite::validate::{ValidationResult, validate_frames};
pub use crate::workflow::builder::{SamplerSettings, WorkflowBuilder, build_workflow};
pub use crate::workflow::graph::{InputRef, Node, NodeId, WorkflowGraph};
