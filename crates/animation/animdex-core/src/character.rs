//! One-call character loading: contract → assets → resolved playback.

use std::future::Future;

use futures_util::future::{abortable, AbortHandle};
use log::{info, warn};

use crate::assets::Skeleton;
use crate::config::Config;
use crate::contract::AnimationContract;
use crate::controller::PlaybackController;
use crate::error::AnimdexError;
use crate::loader::load_contract;
use crate::resolver::{resolve_contract, Diagnostic, Resolution};
use crate::source::AssetSource;

/// A character ready to play, plus everything that went wrong while loading it.
#[derive(Debug)]
pub struct LoadedCharacter {
    pub contract: AnimationContract,
    pub skeleton: Skeleton,
    pub diagnostics: Vec<Diagnostic>,
    pub playback: PlaybackController,
}

impl LoadedCharacter {
    /// Build the controller and, if configured, start the default with no fade.
    pub fn from_resolution(resolution: Resolution, cfg: &Config) -> Result<Self, AnimdexError> {
        let mut playback = PlaybackController::new(&resolution, cfg);
        if cfg.autoplay_default {
            playback.play_default(0.0)?;
        }
        Ok(Self {
            contract: resolution.contract,
            skeleton: resolution.skeleton,
            diagnostics: resolution.diagnostics,
            playback,
        })
    }

    pub fn character_id(&self) -> &str {
        &self.contract.character_id
    }

    /// Human-readable diagnostics, one line each.
    pub fn startup_messages(&self) -> Vec<String> {
        self.diagnostics
            .iter()
            .map(|d| format!("{}: {d}", self.contract.character_id))
            .collect()
    }

    /// Release every action; the character cannot play afterwards.
    pub fn dispose(&mut self) {
        self.playback.dispose();
    }
}

/// Load the contract for `character_id` from the index at `index_url`, load its
/// assets and resolve every entry.
///
/// Structural failures (missing character, empty list, invalid default under
/// `DefaultPolicy::Fail`, asset errors) are returned. Per-entry problems are
/// logged and kept in [`LoadedCharacter::diagnostics`].
pub async fn load_character<S: AssetSource>(
    source: &S,
    index_url: &str,
    character_id: &str,
    cfg: &Config,
) -> Result<LoadedCharacter, AnimdexError> {
    let contract = load_contract(source, index_url, character_id, cfg).await?;
    let resolution = resolve_contract(source, &contract, cfg).await?;
    for d in &resolution.diagnostics {
        warn!("{character_id}: {d}");
    }
    info!(
        "'{character_id}': {}/{} animations resolved, default {:?}",
        resolution.resolved.len(),
        contract.entries.len(),
        resolution.default_id
    );
    LoadedCharacter::from_resolution(resolution, cfg)
}

/// Like [`load_character`], with a handle to abort the load while it is in flight
/// (for example when the user navigates away). An aborted load yields
/// `AnimdexError::Cancelled`.
pub fn load_character_cancellable<'a, S: AssetSource>(
    source: &'a S,
    index_url: &'a str,
    character_id: &'a str,
    cfg: &'a Config,
) -> (
    impl Future<Output = Result<LoadedCharacter, AnimdexError>> + 'a,
    AbortHandle,
) {
    let (fut, handle) = abortable(load_character(source, index_url, character_id, cfg));
    let load = async move {
        match fut.await {
            Ok(result) => result,
            Err(_aborted) => {
                info!("'{character_id}': load cancelled");
                Err(AnimdexError::Cancelled {
                    character_id: character_id.to_string(),
                })
            }
        }
    };
    (load, handle)
}
