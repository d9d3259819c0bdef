use std::collections::BTreeMap;

use crate::{
    foundation::error::{SpriteError, SpriteResult},
    workflow::graph::{
        CheckpointLoaderParams, ClipTextEncodeParams, EmptyLatentParams, InputRef,
        KSamplerParams, Node, NodeId, SaveImageParams, VaeDecodeParams, WorkflowGraph,
    },
};

const SAMPLER: &str = "3";
const CHECKPOINT: &str = "4";
const LATENT: &str = "5";
const POSITIVE: &str = "6";
const NEGATIVE: &str = "7";
const DECODE: &str = "8";
const SAVE: &str = "9";

// Checkpoint loader output slots.
const MODEL_SLOT: u32 = 0;
const CLIP_SLOT: u32 = 1;
const VAE_SLOT: u32 = 2;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Fixed quality parameters baked into every generated workflow.
pub struct SamplerSettings {
    /// Checkpoint loaded by the backend.
    pub checkpoint: String,
    /// Sampling steps.
    pub steps: u32,
    /// Guidance scale.
    pub cfg: f64,
    /// Sampler identifier.
    pub sampler_name: String,
    /// Scheduler identifier.
    pub scheduler: String,
    /// Prefix for files saved on the backend.
    pub filename_prefix: String,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            checkpoint: "v1-5-pruned-emaonly.safetensors".to_string(),
            steps: 15,
            cfg: 7.5,
            sampler_name: "euler_ancestral".to_string(),
            scheduler: "normal".to_string(),
            filename_prefix: "sprite".to_string(),
        }
    }
}

impl SamplerSettings {
    /// Check settings invariants.
    pub fn validate(&self) -> SpriteResult<()> {
        if self.checkpoint.trim().is_empty() {
            return Err(SpriteError::validation("checkpoint must be non-empty"));
        }
        if self.steps == 0 {
            return Err(SpriteError::validation("steps must be > 0"));
        }
        if !self.cfg.is_finite() || self.cfg <= 0.0 {
            return Err(SpriteError::validation("cfg must be finite and > 0"));
        }
        if self.sampler_name.trim().is_empty() || self.scheduler.trim().is_empty() {
            return Err(SpriteError::validation(
                "sampler_name and scheduler must be non-empty",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
/// Assembles the fixed text-to-image topology.
///
/// Only prompt text, seed and resolution vary between builds; wiring and quality
/// parameters come from [`SamplerSettings`].
pub struct WorkflowBuilder {
    settings: SamplerSettings,
}

impl WorkflowBuilder {
    /// Builder using `settings` for every graph.
    pub fn new(settings: SamplerSettings) -> Self {
        Self { settings }
    }

    /// Settings in use.
    pub fn settings(&self) -> &SamplerSettings {
        &self.settings
    }

    /// Build the graph for one image.
    ///
    /// Width and height must be non-zero. Divisibility constraints of the backend are a
    /// caller precondition.
    pub fn build(
        &self,
        prompt: &str,
        negative_prompt: &str,
        seed: u64,
        width: u32,
        height: u32,
    ) -> SpriteResult<WorkflowGraph> {
        if width == 0 || height == 0 {
            return Err(SpriteError::validation(format!(
                "workflow resolution must be non-zero (got {width}x{height})"
            )));
        }
        let s = &self.settings;

        let mut nodes = BTreeMap::new();
        nodes.insert(
            NodeId::new(SAMPLER),
            Node::KSampler(KSamplerParams {
                seed,
                steps: s.steps,
                cfg: s.cfg,
                sampler_name: s.sampler_name.clone(),
                scheduler: s.scheduler.clone(),
                denoise: 1.0,
                model: InputRef::new(CHECKPOINT, MODEL_SLOT),
                positive: InputRef::new(POSITIVE, 0),
                negative: InputRef::new(NEGATIVE, 0),
                latent_image: InputRef::new(LATENT, 0),
            }),
        );
        nodes.insert(
            NodeId::new(CHECKPOINT),
            Node::CheckpointLoader(CheckpointLoaderParams {
                ckpt_name: s.checkpoint.clone(),
            }),
        );
        nodes.insert(
            NodeId::new(LATENT),
            Node::EmptyLatentImage(EmptyLatentParams {
                width,
                height,
                batch_size: 1,
            }),
        );
        nodes.insert(
            NodeId::new(POSITIVE),
            Node::ClipTextEncode(ClipTextEncodeParams {
                text: prompt.to_string(),
                clip: InputRef::new(CHECKPOINT, CLIP_SLOT),
            }),
        );
        nodes.insert(
            NodeId::new(NEGATIVE),
            Node::ClipTextEncode(ClipTextEncodeParams {
                text: negative_prompt.to_string(),
                clip: InputRef::new(CHECKPOINT, CLIP_SLOT),
            }),
        );
        nodes.insert(
            NodeId::new(DECODE),
            Node::VaeDecode(VaeDecodeParams {
                samples: InputRef::new(SAMPLER, 0),
                vae: InputRef::new(CHECKPOINT, VAE_SLOT),
            }),
        );
        nodes.insert(
            NodeId::new(SAVE),
            Node::SaveImage(SaveImageParams {
                filename_prefix: s.filename_prefix.clone(),
                images: InputRef::new(DECODE, 0),
            }),
        );

        WorkflowGraph::new(nodes)
    }
}

/// Build a graph with default [`SamplerSettings`].
pub fn build_workflow(
    prompt: &str,
    negative_prompt: &str,
    seed: u64,
    width: u32,
    height: u32,
) -> SpriteResult<WorkflowGraph> {
    WorkflowBuilder::default().build(prompt, negative_prompt, seed, width, height)
}

#[cfg(test)]
#[path = "../../tests/unit/workflow/builder.rs"]
mod tests;
