use std::path::{Path, PathBuf};

use anyhow::Context as _;
use image::RgbaImage;

use crate::{
    foundation::{
        core::Frame,
        error::{SpriteError, SpriteResult},
    },
    sprite::pack::SpriteSheetMetadata,
};

/// File name of a packed sheet inside an entity directory.
pub const SHEET_FILE: &str = "spritesheet.png";
/// File name of the sheet metadata inside an entity directory.
pub const METADATA_FILE: &str = "metadata.json";

/// On-disk layout rooted at an output directory: `<root>/<entity>/...`.
#[derive(Clone, Debug)]
pub struct SpriteStore {
    root: PathBuf,
}

impl SpriteStore {
    /// Store rooted at `root`. Nothing is created until something is written.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one entity's files.
    pub fn entity_dir(&self, entity: &str) -> SpriteResult<PathBuf> {
        validate_entity_name(entity)?;
        Ok(self.root.join(entity))
    }

    /// `<root>/<entity>/frame_<index>.png`
    pub fn frame_path(&self, entity: &str, index: usize) -> SpriteResult<PathBuf> {
        Ok(self.entity_dir(entity)?.join(format!("frame_{index}.png")))
    }

    /// Write one normalized frame.
    pub fn save_frame(&self, entity: &str, index: usize, frame: &Frame) -> SpriteResult<PathBuf> {
        let path = self.frame_path(entity, index)?;
        ensure_parent_dir(&path)?;
        frame
            .to_rgba8()
            .save_with_format(&path, image::ImageFormat::Png)
            .with_context(|| format!("write frame png '{}'", path.display()))?;
        Ok(path)
    }

    /// Write the sheet PNG and its pretty-printed metadata JSON.
    ///
    /// Returns `(sheet_path, metadata_path)`.
    pub fn save_sprite_sheet(
        &self,
        entity: &str,
        sheet: &RgbaImage,
        metadata: &SpriteSheetMetadata,
    ) -> SpriteResult<(PathBuf, PathBuf)> {
        let dir = self.entity_dir(entity)?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create entity dir '{}'", dir.display()))?;

        let sheet_path = dir.join(SHEET_FILE);
        sheet
            .save_with_format(&sheet_path, image::ImageFormat::Png)
            .with_context(|| format!("write sheet png '{}'", sheet_path.display()))?;

        let metadata_path = dir.join(METADATA_FILE);
        let json = serde_json::to_string_pretty(metadata)?;
        std::fs::write(&metadata_path, json)
            .with_context(|| format!("write metadata '{}'", metadata_path.display()))?;

        tracing::debug!(
            sheet = %sheet_path.display(),
            metadata = %metadata_path.display(),
            "saved sprite sheet"
        );
        Ok((sheet_path, metadata_path))
    }

    /// Read back a metadata document written by [`Self::save_sprite_sheet`].
    pub fn load_metadata(&self, entity: &str) -> SpriteResult<SpriteSheetMetadata> {
        let path = self.entity_dir(entity)?.join(METADATA_FILE);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read metadata '{}'", path.display()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Decode every `*.png` in `dir`, sorted by file name with numeric runs compared by value
/// (`frame_2` before `frame_10`).
pub fn load_frames_from_dir(dir: &Path) -> SpriteResult<Vec<Frame>> {
    let mut paths = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read frame dir '{}'", dir.display()))?
    {
        let path = entry
            .with_context(|| format!("list frame dir '{}'", dir.display()))?
            .path();
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        let is_sheet = path.file_name().and_then(|n| n.to_str()) == Some(SHEET_FILE);
        if path.is_file() && is_png && !is_sheet {
            paths.push(path);
        }
    }
    paths.sort_by_key(|p| natural_key(&p.file_name().unwrap_or_default().to_string_lossy()));

    paths
        .iter()
        .map(|p| {
            let bytes = std::fs::read(p).with_context(|| format!("read frame '{}'", p.display()))?;
            decode_frame(&bytes)
        })
        .collect()
}

/// Decode encoded image bytes into a frame, keeping the source color type.
pub fn decode_frame(bytes: &[u8]) -> SpriteResult<Frame> {
    Ok(image::load_from_memory(bytes).context("decode image from memory")?)
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum KeyPart {
    Num(u64),
    Text(String),
}

fn natural_key(name: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut digits = String::new();
    let mut text = String::new();
    for c in name.chars() {
        if c.is_ascii_digit() {
            if !text.is_empty() {
                parts.push(KeyPart::Text(std::mem::take(&mut text)));
            }
            digits.push(c);
        } else {
            if !digits.is_empty() {
                parts.push(KeyPart::Num(digits.parse().unwrap_or(u64::MAX)));
                digits.clear();
            }
            text.push(c);
        }
    }
    if !digits.is_empty() {
        parts.push(KeyPart::Num(digits.parse().unwrap_or(u64::MAX)));
    }
    if !text.is_empty() {
        parts.push(KeyPart::Text(text));
    }
    parts
}

fn validate_entity_name(entity: &str) -> SpriteResult<()> {
    let bad = entity.trim().is_empty()
        || entity == "."
        || entity == ".."
        || entity.contains(['/', '\\']);
    if bad {
        return Err(SpriteError::validation(format!(
            "entity name '{entity}' is not a valid directory name"
        )));
    }
    Ok(())
}

/// Create `path`'s parent directory when missing.
pub fn ensure_parent_dir(path: &Path) -> SpriteResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/store.rs"]
mod tests;
