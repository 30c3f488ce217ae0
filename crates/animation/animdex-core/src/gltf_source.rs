//! glTF file source (feature `gltf`).
//!
//! Reads `.gltf`/`.glb` files under a root directory. Only the document is
//! parsed: clip durations come from the `max` bound the glTF format requires
//! on every animation sampler input, so buffers are never decoded.
//!
//! File reads go through `tokio::fs`, which hands them to tokio's blocking
//! thread pool. The load futures still only suspend; hosts that must avoid
//! worker threads should supply their own [`AssetSource`].

use std::path::{Path, PathBuf};

use crate::assets::{Clip, ClipSet, Skeleton};
use crate::error::AnimdexError;
use crate::source::AssetSource;

/// Resolves asset URLs as paths relative to `root`.
#[derive(Clone, Debug)]
pub struct GltfFileSource {
    root: PathBuf,
}

impl GltfFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(url.trim_start_matches('/'))
    }

    async fn read_document(&self, url: &str) -> Result<gltf::Gltf, AnimdexError> {
        let bytes = tokio::fs::read(self.path_for(url))
            .await
            .map_err(|e| AnimdexError::asset(url, e))?;
        parse_gltf(url, &bytes)
    }
}

impl AssetSource for GltfFileSource {
    async fn fetch_text(&self, url: &str) -> Result<String, AnimdexError> {
        tokio::fs::read_to_string(self.path_for(url))
            .await
            .map_err(|e| AnimdexError::asset(url, e))
    }

    async fn load_skeleton(&self, url: &str) -> Result<Skeleton, AnimdexError> {
        let gltf = self.read_document(url).await?;
        skeleton_from_document(&gltf.document)
            .ok_or_else(|| AnimdexError::asset(url, "asset has no skin"))
    }

    async fn load_clips(&self, url: &str) -> Result<ClipSet, AnimdexError> {
        let gltf = self.read_document(url).await?;
        Ok(clips_from_document(&gltf.document))
    }
}

pub(crate) fn parse_gltf(url: &str, bytes: &[u8]) -> Result<gltf::Gltf, AnimdexError> {
    gltf::Gltf::from_slice(bytes).map_err(|e| AnimdexError::asset(url, e))
}

/// First skin of the document, joints in skin order.
pub(crate) fn skeleton_from_document(doc: &gltf::Document) -> Option<Skeleton> {
    let skin = doc.skins().next()?;
    let name = skin
        .name()
        .or_else(|| doc.scenes().next().and_then(|s| s.name()))
        .unwrap_or_default()
        .to_string();
    let joints = skin
        .joints()
        .map(|j| {
            j.name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("joint_{}", j.index()))
        })
        .collect();
    Some(Skeleton { name, joints })
}

/// Every animation in document order. Unnamed animations keep an empty name and
/// therefore never match a contract entry.
pub(crate) fn clips_from_document(doc: &gltf::Document) -> ClipSet {
    doc.animations()
        .map(|anim| {
            let duration = anim
                .channels()
                .filter_map(|ch| input_max(&ch.sampler().input()))
                .fold(0.0f32, f32::max);
            Clip::new(anim.name().unwrap_or_default(), duration)
        })
        .collect()
}

fn input_max(accessor: &gltf::Accessor<'_>) -> Option<f32> {
    let max = accessor.max()?;
    let first = match &max {
        serde_json::Value::Array(values) => values.first()?.as_f64()?,
        other => other.as_f64()?,
    };
    Some(first as f32)
}
