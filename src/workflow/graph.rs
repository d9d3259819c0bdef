use std::collections::{BTreeMap, HashMap};

use crate::foundation::error::{SpriteError, SpriteResult};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// Identifier of a node inside a [`WorkflowGraph`].
pub struct NodeId(pub String);

impl NodeId {
    /// Build a node id from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Reference to output slot `.1` of node `.0`.
///
/// Serialized the way the backend expects it: `["4", 1]`.
pub struct InputRef(pub NodeId, pub u32);

impl InputRef {
    /// Reference `slot` of node `node`.
    pub fn new(node: impl Into<String>, slot: u32) -> Self {
        Self(NodeId::new(node), slot)
    }

    /// Referenced node.
    pub fn node(&self) -> &NodeId {
        &self.0
    }

    /// Referenced output slot.
    pub fn slot(&self) -> u32 {
        self.1
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Load a diffusion checkpoint. Outputs: `0` model, `1` clip, `2` vae.
pub struct CheckpointLoaderParams {
    /// Checkpoint file name as known to the backend.
    pub ckpt_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Allocate an empty latent batch.
pub struct EmptyLatentParams {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
    /// Images per batch.
    pub batch_size: u32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Encode prompt text with the checkpoint's text encoder.
pub struct ClipTextEncodeParams {
    /// Prompt text.
    pub text: String,
    /// Text encoder reference.
    pub clip: InputRef,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Denoising sampler.
pub struct KSamplerParams {
    /// Noise seed.
    pub seed: u64,
    /// Sampling step count.
    pub steps: u32,
    /// Classifier-free guidance scale.
    pub cfg: f64,
    /// Sampler identifier.
    pub sampler_name: String,
    /// Scheduler identifier.
    pub scheduler: String,
    /// Denoise strength; `1.0` for text-to-image.
    pub denoise: f64,
    /// Model reference.
    pub model: InputRef,
    /// Positive conditioning reference.
    pub positive: InputRef,
    /// Negative conditioning reference.
    pub negative: InputRef,
    /// Latent input reference.
    pub latent_image: InputRef,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Decode latents to pixels.
pub struct VaeDecodeParams {
    /// Latent samples reference.
    pub samples: InputRef,
    /// VAE reference.
    pub vae: InputRef,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Persist decoded images on the backend; the graph's output node.
pub struct SaveImageParams {
    /// File name prefix used by the backend.
    pub filename_prefix: String,
    /// Images reference.
    pub images: InputRef,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "class_type", content = "inputs")]
/// A typed workflow node. Serializes as `{"class_type": ..., "inputs": {...}}`.
pub enum Node {
    /// `CheckpointLoaderSimple`.
    #[serde(rename = "CheckpointLoaderSimple")]
    CheckpointLoader(CheckpointLoaderParams),
    /// `EmptyLatentImage`.
    #[serde(rename = "EmptyLatentImage")]
    EmptyLatentImage(EmptyLatentParams),
    /// `CLIPTextEncode`.
    #[serde(rename = "CLIPTextEncode")]
    ClipTextEncode(ClipTextEncodeParams),
    /// `KSampler`.
    #[serde(rename = "KSampler")]
    KSampler(KSamplerParams),
    /// `VAEDecode`.
    #[serde(rename = "VAEDecode")]
    VaeDecode(VaeDecodeParams),
    /// `SaveImage`.
    #[serde(rename = "SaveImage")]
    SaveImage(SaveImageParams),
}

impl Node {
    /// Backend class name of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::CheckpointLoader(_) => "CheckpointLoaderSimple",
            Node::EmptyLatentImage(_) => "EmptyLatentImage",
            Node::ClipTextEncode(_) => "CLIPTextEncode",
            Node::KSampler(_) => "KSampler",
            Node::VaeDecode(_) => "VAEDecode",
            Node::SaveImage(_) => "SaveImage",
        }
    }

    /// Number of output slots the node exposes.
    pub fn output_slots(&self) -> u32 {
        match self {
            Node::CheckpointLoader(_) => 3,
            Node::SaveImage(_) => 0,
            _ => 1,
        }
    }

    /// All input references, in parameter order.
    pub fn inputs(&self) -> Vec<&InputRef> {
        match self {
            Node::CheckpointLoader(_) | Node::EmptyLatentImage(_) => vec![],
            Node::ClipTextEncode(p) => vec![&p.clip],
            Node::KSampler(p) => vec![&p.model, &p.positive, &p.negative, &p.latent_image],
            Node::VaeDecode(p) => vec![&p.samples, &p.vae],
            Node::SaveImage(p) => vec![&p.images],
        }
    }

    /// `true` for nodes that emit artifacts.
    pub fn is_output(&self) -> bool {
        matches!(self, Node::SaveImage(_))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(
    try_from = "BTreeMap<NodeId, Node>",
    into = "BTreeMap<NodeId, Node>"
)]
/// Validated workflow graph.
///
/// Construction checks that every input reference points at an existing node and output
/// slot, that the graph is acyclic, and that exactly one output node exists. Serializes as
/// the bare node map the backend accepts.
pub struct WorkflowGraph {
    nodes: BTreeMap<NodeId, Node>,
    output: NodeId,
}

impl WorkflowGraph {
    /// Validate `nodes` and wrap them into a graph.
    pub fn new(nodes: BTreeMap<NodeId, Node>) -> SpriteResult<Self> {
        if nodes.is_empty() {
            return Err(SpriteError::validation("workflow graph has no nodes"));
        }

        for (id, node) in &nodes {
            for input in node.inputs() {
                let target = nodes.get(input.node()).ok_or_else(|| {
                    SpriteError::validation(format!(
                        "node '{id}' ({}) references missing node '{}'",
                        node.kind(),
                        input.node()
                    ))
                })?;
                if input.slot() >= target.output_slots() {
                    return Err(SpriteError::validation(format!(
                        "node '{id}' references slot {} of '{}' ({}), which has {} outputs",
                        input.slot(),
                        input.node(),
                        target.kind(),
                        target.output_slots()
                    )));
                }
            }
        }

        let mut outputs = nodes.iter().filter(|(_, n)| n.is_output()).map(|(id, _)| id);
        let output = match (outputs.next(), outputs.next()) {
            (Some(id), None) => id.clone(),
            (None, _) => {
                return Err(SpriteError::validation("workflow graph has no output node"));
            }
            (Some(a), Some(b)) => {
                return Err(SpriteError::validation(format!(
                    "workflow graph has more than one output node ('{a}', '{b}')"
                )));
            }
        };

        check_acyclic(&nodes)?;

        Ok(Self { nodes, output })
    }

    /// Node lookup.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Iterate nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false` for a constructed graph.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The designated output node.
    pub fn output(&self) -> &NodeId {
        &self.output
    }

    /// The sampler seed, when the graph has a sampler node.
    pub fn seed(&self) -> Option<u64> {
        self.nodes.values().find_map(|n| match n {
            Node::KSampler(p) => Some(p.seed),
            _ => None,
        })
    }

    /// Backend API-format JSON.
    pub fn to_api_json(&self) -> SpriteResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl TryFrom<BTreeMap<NodeId, Node>> for WorkflowGraph {
    type Error = SpriteError;

    fn try_from(nodes: BTreeMap<NodeId, Node>) -> Result<Self, Self::Error> {
        Self::new(nodes)
    }
}

impl From<WorkflowGraph> for BTreeMap<NodeId, Node> {
    fn from(graph: WorkflowGraph) -> Self {
        graph.nodes
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

fn check_acyclic(nodes: &BTreeMap<NodeId, Node>) -> SpriteResult<()> {
    let mut marks: HashMap<&NodeId, Mark> = HashMap::with_capacity(nodes.len());

    for root in nodes.keys() {
        if marks.contains_key(root) {
            continue;
        }
        // Iterative DFS; the bool flags the post-order visit.
        let mut stack: Vec<(&NodeId, bool)> = vec![(root, false)];
        while let Some((id, exiting)) = stack.pop() {
            if exiting {
                marks.insert(id, Mark::Done);
                continue;
            }
            match marks.get(id) {
                Some(Mark::Done) => continue,
                Some(Mark::Visiting) => continue,
                None => {}
            }
            marks.insert(id, Mark::Visiting);
            stack.push((id, true));

            let Some(node) = nodes.get(id) else {
                continue;
            };
            for input in node.inputs() {
                match marks.get(input.node()) {
                    Some(Mark::Visiting) => {
                        return Err(SpriteError::validation(format!(
                            "workflow graph has a cycle through '{id}' -> '{}'",
                            input.node()
                        )));
                    }
                    Some(Mark::Done) => {}
                    None => stack.push((input.node(), false)),
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/workflow/graph.rs"]
mod tests;
