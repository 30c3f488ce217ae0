//! Asset source trait and an in-memory implementation.
//!
//! Hosts implement [`AssetSource`] over whatever fetch/decode stack they own
//! (HTTP, bundle files, an engine's asset server) and pass it to the loader.
//! Methods take `&self` so the skeleton and clip loads can be in flight at the
//! same time.

use hashbrown::HashMap;

use crate::assets::{ClipSet, Skeleton};
use crate::error::AnimdexError;

/// Fetches the contract index and decodes the two external assets by URL.
#[allow(async_fn_in_trait)]
pub trait AssetSource {
    /// Fetch a text document (the contract index).
    async fn fetch_text(&self, url: &str) -> Result<String, AnimdexError>;

    /// Load the rig from the skeleton asset.
    async fn load_skeleton(&self, url: &str) -> Result<Skeleton, AnimdexError>;

    /// Load every clip from the animation-source asset.
    async fn load_clips(&self, url: &str) -> Result<ClipSet, AnimdexError>;
}

/// Pre-populated source; every lookup completes without suspending.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetSource {
    texts: HashMap<String, String>,
    skeletons: HashMap<String, Skeleton>,
    clips: HashMap<String, ClipSet>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, url: impl Into<String>, text: impl Into<String>) -> Self {
        self.texts.insert(url.into(), text.into());
        self
    }

    pub fn with_skeleton(mut self, url: impl Into<String>, skeleton: Skeleton) -> Self {
        self.skeletons.insert(url.into(), skeleton);
        self
    }

    pub fn with_clips(mut self, url: impl Into<String>, clips: ClipSet) -> Self {
        self.clips.insert(url.into(), clips);
        self
    }
}

impl AssetSource for MemoryAssetSource {
    async fn fetch_text(&self, url: &str) -> Result<String, AnimdexError> {
        self.texts
            .get(url)
            .cloned()
            .ok_or_else(|| AnimdexError::asset(url, "no such document"))
    }

    async fn load_skeleton(&self, url: &str) -> Result<Skeleton, AnimdexError> {
        self.skeletons
            .get(url)
            .cloned()
            .ok_or_else(|| AnimdexError::asset(url, "no such skeleton"))
    }

    async fn load_clips(&self, url: &str) -> Result<ClipSet, AnimdexError> {
        self.clips
            .get(url)
            .cloned()
            .ok_or_else(|| AnimdexError::asset(url, "no such clip library"))
    }
}
