//! Animation contract data model and JSON index parsing.
//!
//! The shared index maps character ids to a skeleton asset, an optional
//! animation-source asset, and an ordered list of animation entries. Parsing
//! keeps each character raw until it is requested so one malformed character
//! does not prevent the others from loading.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::AnimdexError;

/// How an action's clock maps onto clip time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopMode {
    #[default]
    #[serde(rename = "repeat", alias = "loop")]
    Repeat,
    #[serde(rename = "once")]
    Once,
    #[serde(rename = "pingpong", alias = "ping_pong", alias = "pingPong")]
    PingPong,
}

/// One declared animation.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationEntry {
    /// Stable short key, unique within the contract.
    pub id: String,
    pub display_name: String,
    /// Must exactly match the name of a loaded clip.
    pub source_clip_name: String,
    pub loop_mode: LoopMode,
}

/// Parsed and validated descriptor for one character. Immutable after parse.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationContract {
    pub character_id: String,
    pub skeleton_url: String,
    /// Equal to `skeleton_url` when the index omits `animationSource`.
    pub animation_source_url: String,
    pub entries: Vec<AnimationEntry>,
    pub default_animation_id: Option<String>,
    pub cross_fade_seconds: f32,
}

impl AnimationContract {
    pub fn entry(&self, id: &str) -> Option<&AnimationEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when skeleton and clips come from the same asset.
    #[inline]
    pub fn single_asset(&self) -> bool {
        self.skeleton_url == self.animation_source_url
    }
}

/// The shared JSON index, keyed by character id.
#[derive(Clone, Debug)]
pub struct ContractIndex {
    // Kept as raw JSON; each character is checked only when requested.
    characters: HashMap<String, serde_json::Value>,
}

impl ContractIndex {
    /// Character ids in the index, sorted for stable diagnostics.
    pub fn character_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.characters.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn contains(&self, character_id: &str) -> bool {
        self.characters.contains_key(character_id)
    }

    /// Build the validated contract for `character_id`.
    ///
    /// `default_cross_fade` is used when the character has no `crossFadeSec`.
    pub fn contract(
        &self,
        character_id: &str,
        default_cross_fade: f32,
    ) -> Result<AnimationContract, AnimdexError> {
        let raw = self
            .characters
            .get(character_id)
            .ok_or_else(|| AnimdexError::ContractNotFound {
                character_id: character_id.to_string(),
            })?;
        let raw = RawCharacter::deserialize(raw).map_err(|e| AnimdexError::Parse {
            reason: format!("character '{character_id}': {e}"),
        })?;
        raw.to_contract(character_id, default_cross_fade)
    }
}

/// Public API: parse the shared index JSON.
///
/// Only the document shape is checked here (an object of characters).
/// Each character is parsed and validated in [`ContractIndex::contract`].
pub fn parse_contract_index_json(s: &str) -> Result<ContractIndex, AnimdexError> {
    let doc: IndexDoc = serde_json::from_str(s)?;
    Ok(ContractIndex {
        characters: doc.characters,
    })
}

impl RawCharacter {
    fn to_contract(
        &self,
        character_id: &str,
        default_cross_fade: f32,
    ) -> Result<AnimationContract, AnimdexError> {
        let mut entries: Vec<AnimationEntry> = Vec::with_capacity(self.animations.len());
        for ra in &self.animations {
            if entries.iter().any(|e| e.id == ra.id) {
                return Err(AnimdexError::DuplicateAnimationId {
                    character_id: character_id.to_string(),
                    id: ra.id.clone(),
                });
            }
            entries.push(AnimationEntry {
                id: ra.id.clone(),
                display_name: ra.display_name.clone().unwrap_or_else(|| ra.id.clone()),
                source_clip_name: ra.source_clip_name.clone(),
                loop_mode: ra.loop_mode,
            });
        }

        let defaults = self.defaults.clone().unwrap_or_default();
        let cross_fade_seconds = defaults.cross_fade_sec.unwrap_or(default_cross_fade);
        if !cross_fade_seconds.is_finite() || cross_fade_seconds < 0.0 {
            return Err(AnimdexError::InvalidCrossFade {
                character_id: character_id.to_string(),
                seconds: cross_fade_seconds,
            });
        }

        let skeleton_url = self.skeleton.url.clone();
        let animation_source_url = self
            .animation_source
            .as_ref()
            .map(|a| a.url.clone())
            .unwrap_or_else(|| skeleton_url.clone());

        Ok(AnimationContract {
            character_id: character_id.to_string(),
            skeleton_url,
            animation_source_url,
            entries,
            default_animation_id: defaults.default_animation_id,
            cross_fade_seconds,
        })
    }
}

// ----- JSON schema (serde) -----

#[derive(Debug, Deserialize)]
struct IndexDoc {
    characters: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AssetRef {
    url: String,
}

#[derive(Debug, Deserialize)]
struct RawCharacter {
    skeleton: AssetRef,
    #[serde(default, rename = "animationSource")]
    animation_source: Option<AssetRef>,
    #[serde(default)]
    animations: Vec<RawEntry>,
    #[serde(default)]
    defaults: Option<RawDefaults>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: String,
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
    #[serde(rename = "sourceClipName")]
    source_clip_name: String,
    #[serde(default, rename = "loop")]
    loop_mode: LoopMode,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawDefaults {
    #[serde(default, rename = "defaultAnimationId")]
    default_animation_id: Option<String>,
    #[serde(default, rename = "crossFadeSec")]
    cross_fade_sec: Option<f32>,
}
