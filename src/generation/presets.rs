use crate::foundation::error::{SpriteError, SpriteResult};

/// Style line appended to every sprite prompt unless overridden.
pub const DEFAULT_STYLE: &str = "16-bit SNES pixel art";

/// Shared negative prompt.
pub const NEGATIVE_PROMPT: &str = "multiple characters, duplicate sprites,
blurry, smooth gradients, anti-aliasing,
3d render, realistic, photograph,
shadows on ground, ground plane,
perspective distortion,
text, watermark, UI elements,
different art styles, inconsistent style";

/// Four-pose walk cycle. Poses 0 and 2 are the same contact pose.
pub const WALK_POSES: [&str; 4] = [
    "standing idle, centered pose",
    "mid-stride walking, left foot forward",
    "standing idle, centered pose",
    "mid-stride walking, right foot forward",
];

/// A character to generate.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EntitySpec {
    /// Identifier; also the output directory name and the seed key.
    pub name: String,
    /// Free-text appearance, spliced into every prompt.
    pub description: String,
}

impl EntitySpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// An animation: a name (which selects the seed band) and one pose line per frame.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AnimationSpec {
    pub name: String,
    pub poses: Vec<String>,
}

impl AnimationSpec {
    pub fn new(name: impl Into<String>, poses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            poses: poses.into_iter().map(Into::into).collect(),
        }
    }

    /// The four-frame walk cycle.
    pub fn walk() -> Self {
        Self::new("walk", WALK_POSES)
    }

    pub fn frame_count(&self) -> usize {
        self.poses.len()
    }
}

/// The demo roster.
pub fn demo_entities() -> Vec<EntitySpec> {
    vec![
        EntitySpec::new(
            "goblin",
            "small green-skinned goblin warrior with ragged leather armor and rusty dagger",
        ),
        EntitySpec::new(
            "fighter",
            "human fighter in polished plate armor with longsword and shield",
        ),
        EntitySpec::new(
            "skeleton",
            "animated skeleton archer with tattered hooded cloak and bone bow",
        ),
    ]
}

/// Demo entities named in `names`, in the order given.
///
/// Unknown names are a validation error listing what is available.
pub fn select_entities(names: &[String]) -> SpriteResult<Vec<EntitySpec>> {
    let all = demo_entities();
    names
        .iter()
        .map(|name| {
            all.iter().find(|e| &e.name == name).cloned().ok_or_else(|| {
                let known: Vec<&str> = all.iter().map(|e| e.name.as_str()).collect();
                SpriteError::validation(format!(
                    "unknown entity '{name}' (known: {})",
                    known.join(", ")
                ))
            })
        })
        .collect()
}

/// Prompt for one frame: fixed template around the entity description and the pose.
pub fn build_prompt(description: &str, pose: &str, style: &str) -> String {
    format!(
        "isometric pixel art sprite, {description},
{pose},
{style}, clean pixel art,
45-degree angle top-down view,
single character centered in frame,
transparent background,
retro RPG game aesthetic,
crisp pixels, no anti-aliasing,
clear silhouette"
    )
}

#[cfg(test)]
#[path = "../../tests/unit/generation/presets.rs"]
mod tests;
