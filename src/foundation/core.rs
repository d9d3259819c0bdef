use crate::foundation::error::{SpriteError, SpriteResult};

/// A decoded raster frame.
///
/// Frames keep their source color type so alpha presence can be inspected; helpers that
/// need pixels convert to RGBA8 on demand.
pub type Frame = image::DynamicImage;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Pixel dimensions of a single sprite frame.
pub struct SpriteSize {
    /// Width in pixels.
    pub w: u32,
    /// Height in pixels.
    pub h: u32,
}

impl SpriteSize {
    /// Build a size, rejecting zero dimensions.
    pub fn new(w: u32, h: u32) -> SpriteResult<Self> {
        if w == 0 || h == 0 {
            return Err(SpriteError::validation(format!(
                "sprite size must be non-zero (got {w}x{h})"
            )));
        }
        Ok(Self { w, h })
    }

    /// Size of an existing frame.
    pub fn of(frame: &Frame) -> Self {
        Self {
            w: frame.width(),
            h: frame.height(),
        }
    }
}

impl std::fmt::Display for SpriteSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

impl std::str::FromStr for SpriteSize {
    type Err = SpriteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| SpriteError::validation(format!("expected WxH, got '{s}'")))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|e| SpriteError::validation(format!("invalid dimension '{v}': {e}")))
        };
        Self::new(parse(w)?, parse(h)?)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
