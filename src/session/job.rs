use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::error::{ReelError, ReelResult};
use crate::render::text::find_system_font;
use crate::session::render_session::{RenderOpts, RenderRequest};

/// A render described on disk.
///
/// Relative paths are resolved against the directory of the job file by [`Self::from_path`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderJob {
    /// Source images in display order.
    pub images: Vec<PathBuf>,
    /// Narration audio file.
    pub audio: PathBuf,
    /// Optional watermark label.
    #[serde(default)]
    pub watermark: Option<String>,
    /// Font file for the hook and watermark.
    #[serde(default)]
    pub font: Option<PathBuf>,
    /// Render options; missing fields take their defaults.
    #[serde(default)]
    pub opts: RenderOpts,
}

impl RenderJob {
    /// Parse a job from a JSON reader. Paths are kept as written.
    pub fn from_reader<R: std::io::Read>(r: R) -> ReelResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ReelError::validation(format!("parse render job JSON: {e}")))
    }

    /// Parse a job from a JSON file, resolving relative paths against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open render job JSON '{}': {e}", path.display()))
        })?;
        let mut job = Self::from_reader(BufReader::new(f))?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        job.resolve_relative_to(root);
        Ok(job)
    }

    /// Rebase every relative path onto `root`.
    pub fn resolve_relative_to(&mut self, root: &Path) {
        for p in &mut self.images {
            rebase(p, root);
        }
        rebase(&mut self.audio, root);
        if let Some(font) = self.font.as_mut() {
            rebase(font, root);
        }
    }

    /// Read every referenced file into a [`RenderRequest`].
    ///
    /// Without an explicit font, well-known system fonts are probed.
    pub fn load(&self) -> ReelResult<RenderRequest> {
        use anyhow::Context as _;

        let images = self
            .images
            .iter()
            .enumerate()
            .map(|(index, p)| {
                std::fs::read(p).map_err(|e| {
                    ReelError::image_load(index, format!("read '{}': {e}", p.display()))
                })
            })
            .collect::<ReelResult<Vec<_>>>()?;
        let audio = std::fs::read(&self.audio)
            .map_err(|e| ReelError::decode(format!("read '{}': {e}", self.audio.display())))?;
        let font = match &self.font {
            Some(p) => Some(Arc::new(
                std::fs::read(p).with_context(|| format!("read font '{}'", p.display()))?,
            )),
            None => find_system_font(),
        };

        Ok(RenderRequest {
            images,
            audio,
            watermark: self.watermark.clone(),
            font,
        })
    }
}

fn rebase(p: &mut PathBuf, root: &Path) {
    if p.is_relative() {
        *p = root.join(&*p);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/job.rs"]
mod tests;
