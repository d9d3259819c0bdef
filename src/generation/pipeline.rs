use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use crate::{
    client::{job::JobClient, progress::ProgressEvent},
    foundation::{
        core::SpriteSize,
        error::{SpriteError, SpriteResult},
    },
    generation::{
        presets::{AnimationSpec, DEFAULT_STYLE, EntitySpec, NEGATIVE_PROMPT, build_prompt},
        seed::derive_seed,
    },
    sprite::{
        normalize::normalize_sprite,
        pack::SheetPacker,
        store::{SpriteStore, decode_frame},
        validate::{ValidationResult, validate_frames},
    },
};

/// Resolution and prompt settings shared by every frame of a run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Width requested from the backend.
    pub source_width: u32,
    /// Height requested from the backend.
    pub source_height: u32,
    /// Size every frame is normalized to.
    pub sprite_size: SpriteSize,
    /// Style line of the prompt template.
    pub style: String,
    pub negative_prompt: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            source_width: 128,
            source_height: 128,
            sprite_size: SpriteSize { w: 32, h: 32 },
            style: DEFAULT_STYLE.to_string(),
            negative_prompt: NEGATIVE_PROMPT.to_string(),
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> SpriteResult<()> {
        if self.source_width == 0 || self.source_height == 0 {
            return Err(SpriteError::validation(format!(
                "source resolution must be non-zero (got {}x{})",
                self.source_width, self.source_height
            )));
        }
        SpriteSize::new(self.sprite_size.w, self.sprite_size.h)?;
        Ok(())
    }
}

/// Outcome of one generated animation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationReport {
    pub entity: String,
    pub animation: String,
    /// Saved normalized frames, in frame order.
    pub frame_paths: Vec<PathBuf>,
    pub sheet_path: PathBuf,
    pub metadata_path: PathBuf,
    /// Wall time per frame, generation through save.
    pub frame_times: Vec<Duration>,
    pub validation: ValidationResult,
}

impl AnimationReport {
    pub fn frame_count(&self) -> usize {
        self.frame_paths.len()
    }

    pub fn total_time(&self) -> Duration {
        self.frame_times.iter().sum()
    }

    pub fn avg_frame_time(&self) -> Duration {
        match u32::try_from(self.frame_times.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.total_time() / n,
        }
    }
}

/// An entity whose animation could not be produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityFailure {
    pub entity: String,
    pub error: String,
}

/// Outcome of a multi-entity run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunSummary {
    pub reports: Vec<AnimationReport>,
    pub failures: Vec<EntityFailure>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.reports.len() + self.failures.len()
    }

    pub fn total_frames(&self) -> usize {
        self.reports.iter().map(AnimationReport::frame_count).sum()
    }

    /// Mean of the per-animation average frame times.
    pub fn avg_frame_time(&self) -> Duration {
        match u32::try_from(self.reports.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => {
                let sum: Duration = self.reports.iter().map(AnimationReport::avg_frame_time).sum();
                sum / n
            }
        }
    }

    /// `true` when every entity produced a sheet that passed validation.
    pub fn all_passed(&self) -> bool {
        self.failures.is_empty() && self.reports.iter().all(|r| r.validation.passes)
    }
}

/// Generate, normalize and save every frame of `animation` for `entity`, then pack,
/// save and score the sheet.
///
/// Frames are generated one after another. The first failing frame aborts the animation
/// before anything is packed; frames already written stay on disk.
#[tracing::instrument(skip_all, fields(entity = %entity.name, animation = %animation.name))]
pub async fn generate_animation(
    client: &JobClient,
    store: &SpriteStore,
    entity: &EntitySpec,
    animation: &AnimationSpec,
    settings: &GenerationSettings,
) -> SpriteResult<AnimationReport> {
    settings.validate()?;
    if animation.poses.is_empty() {
        return Err(SpriteError::empty_frame_set(format!(
            "animation '{}' has no poses",
            animation.name
        )));
    }
    let observer = client.observer();
    let total = animation.frame_count();

    let mut frames = Vec::with_capacity(total);
    let mut frame_paths = Vec::with_capacity(total);
    let mut frame_times = Vec::with_capacity(total);

    for (index, pose) in animation.poses.iter().enumerate() {
        let started = Instant::now();
        let frame_index = u32::try_from(index)
            .map_err(|_| SpriteError::validation("animation has too many frames"))?;
        let seed = derive_seed(&entity.name, &animation.name, frame_index);
        observer.on_event(&ProgressEvent::FrameStarted {
            entity: entity.name.clone(),
            animation: animation.name.clone(),
            index,
            total,
            seed,
        });

        let prompt = build_prompt(&entity.description, pose, &settings.style);
        let bytes = client
            .generate_image(
                &prompt,
                &settings.negative_prompt,
                seed,
                settings.source_width,
                settings.source_height,
            )
            .await?;
        let frame = normalize_sprite(&decode_frame(&bytes)?, settings.sprite_size);
        frame_paths.push(store.save_frame(&entity.name, index, &frame)?);
        frames.push(frame);

        let elapsed = started.elapsed();
        frame_times.push(elapsed);
        observer.on_event(&ProgressEvent::FrameFinished {
            entity: entity.name.clone(),
            animation: animation.name.clone(),
            index,
            elapsed,
        });
    }

    let (sheet, metadata) = SheetPacker::default().pack(&frames, &entity.name, &animation.name)?;
    let (sheet_path, metadata_path) = store.save_sprite_sheet(&entity.name, &sheet, &metadata)?;
    observer.on_event(&ProgressEvent::SheetPacked {
        entity: entity.name.clone(),
        animation: animation.name.clone(),
        frames: frames.len(),
        width: sheet.width(),
        height: sheet.height(),
    });

    let validation = validate_frames(&frames)?;
    observer.on_event(&ProgressEvent::Validated {
        entity: entity.name.clone(),
        animation: animation.name.clone(),
        result: validation.clone(),
    });

    Ok(AnimationReport {
        entity: entity.name.clone(),
        animation: animation.name.clone(),
        frame_paths,
        sheet_path,
        metadata_path,
        frame_times,
        validation,
    })
}

/// Run `animation` for each entity in order. A failing entity is recorded and the run
/// moves on to the next one.
pub async fn generate_entities(
    client: &JobClient,
    store: &SpriteStore,
    entities: &[EntitySpec],
    animation: &AnimationSpec,
    settings: &GenerationSettings,
) -> RunSummary {
    let started = Instant::now();
    let mut summary = RunSummary::default();

    for entity in entities {
        match generate_animation(client, store, entity, animation, settings).await {
            Ok(report) => summary.reports.push(report),
            Err(e) => {
                let error = e.to_string();
                client.observer().on_event(&ProgressEvent::EntityFailed {
                    entity: entity.name.clone(),
                    error: error.clone(),
                });
                summary.failures.push(EntityFailure {
                    entity: entity.name.clone(),
                    error,
                });
            }
        }
    }

    summary.elapsed = started.elapsed();
    summary
}

#[cfg(test)]
#[path = "../../tests/unit/generation/pipeline.rs"]
mod tests;
