//! Asset resolver: binds contract entries to loaded clips.
//!
//! Per-entry failures never abort resolution. They are collected as
//! [`Diagnostic`]s so the caller sees every problem at once and still gets a
//! usable character from the entries that did resolve.

use std::fmt;

use futures_util::future::try_join;
use indexmap::IndexMap;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::assets::{Clip, ClipMatch, ClipSet, Skeleton};
use crate::config::{Config, DefaultPolicy};
use crate::contract::{AnimationContract, AnimationEntry};
use crate::error::AnimdexError;
use crate::source::AssetSource;

/// Non-fatal findings from resolution, reported at load time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// No loaded clip carries the entry's `sourceClipName`.
    UnresolvedClip { entry_id: String, clip_name: String },
    /// Several clips carry the name; the first in source order was used.
    AmbiguousClip {
        entry_id: String,
        clip_name: String,
        matches: usize,
    },
    /// The declared default could not be used and `applied` plays instead.
    DefaultFallback { requested: String, applied: String },
}

impl Diagnostic {
    /// Entry the diagnostic is about, if it concerns a single entry.
    pub fn entry_id(&self) -> Option<&str> {
        match self {
            Self::UnresolvedClip { entry_id, .. } | Self::AmbiguousClip { entry_id, .. } => {
                Some(entry_id.as_str())
            }
            Self::DefaultFallback { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvedClip {
                entry_id,
                clip_name,
            } => write!(
                f,
                "animation '{entry_id}': clip '{clip_name}' not found in the animation source"
            ),
            Self::AmbiguousClip {
                entry_id,
                clip_name,
                matches,
            } => write!(
                f,
                "animation '{entry_id}': {matches} clips are named '{clip_name}', using the first"
            ),
            Self::DefaultFallback { requested, applied } => write!(
                f,
                "default animation '{requested}' is unusable, falling back to '{applied}'"
            ),
        }
    }
}

/// A contract entry bound to the clip that will back its action.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedClip {
    pub entry: AnimationEntry,
    pub clip: Clip,
}

/// Result of resolving one contract.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub contract: AnimationContract,
    pub skeleton: Skeleton,
    /// Entry id → clip, in contract declaration order.
    pub resolved: IndexMap<String, ResolvedClip>,
    pub diagnostics: Vec<Diagnostic>,
    /// Effective default after the fallback policy; `None` only when nothing resolved.
    pub default_id: Option<String>,
}

impl Resolution {
    /// Ids of entries whose clip could not be found.
    pub fn unresolved_ids(&self) -> impl Iterator<Item = &str> {
        self.diagnostics.iter().filter_map(|d| match d {
            Diagnostic::UnresolvedClip { entry_id, .. } => Some(entry_id.as_str()),
            _ => None,
        })
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Load the skeleton and the animation source concurrently.
/// Both must succeed before anything is resolved.
pub async fn load_assets<S: AssetSource>(
    source: &S,
    contract: &AnimationContract,
) -> Result<(Skeleton, ClipSet), AnimdexError> {
    try_join(
        source.load_skeleton(&contract.skeleton_url),
        source.load_clips(&contract.animation_source_url),
    )
    .await
}

/// Public API: load the contract's assets and resolve every entry.
pub async fn resolve_contract<S: AssetSource>(
    source: &S,
    contract: &AnimationContract,
    cfg: &Config,
) -> Result<Resolution, AnimdexError> {
    ensure_not_empty(contract)?;
    let (skeleton, clips) = load_assets(source, contract).await.map_err(|e| {
        error!("'{}': asset load failed: {e}", contract.character_id);
        e
    })?;
    info!(
        "'{}': loaded {} joints and {} clips{}",
        contract.character_id,
        skeleton.joints.len(),
        clips.len(),
        if contract.single_asset() {
            " from one asset"
        } else {
            ""
        }
    );
    resolve_against(contract, skeleton, &clips, cfg)
}

/// Resolve a contract against an already-loaded clip set.
pub fn resolve_against(
    contract: &AnimationContract,
    skeleton: Skeleton,
    clips: &ClipSet,
    cfg: &Config,
) -> Result<Resolution, AnimdexError> {
    ensure_not_empty(contract)?;
    let character = contract.character_id.as_str();

    let mut resolved: IndexMap<String, ResolvedClip> =
        IndexMap::with_capacity(contract.entries.len());
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    for entry in &contract.entries {
        let clip = match clips.find_exact(&entry.source_clip_name) {
            ClipMatch::One(clip) => clip,
            ClipMatch::Many { first, count } => {
                diagnostics.push(Diagnostic::AmbiguousClip {
                    entry_id: entry.id.clone(),
                    clip_name: entry.source_clip_name.clone(),
                    matches: count,
                });
                first
            }
            ClipMatch::None => {
                diagnostics.push(Diagnostic::UnresolvedClip {
                    entry_id: entry.id.clone(),
                    clip_name: entry.source_clip_name.clone(),
                });
                continue;
            }
        };
        resolved.insert(
            entry.id.clone(),
            ResolvedClip {
                entry: entry.clone(),
                clip: clip.clone(),
            },
        );
    }

    let first_resolved = resolved.keys().next().cloned();
    let default_id = match contract.default_animation_id.as_deref() {
        None => {
            if let Some(first) = &first_resolved {
                info!("'{character}': no default animation declared, using '{first}'");
            }
            first_resolved
        }
        Some(requested) if resolved.contains_key(requested) => Some(requested.to_string()),
        Some(requested) => {
            let why = if contract.entry(requested).is_some() {
                "its clip did not resolve"
            } else {
                "no entry has that id"
            };
            match (cfg.default_policy, first_resolved) {
                (DefaultPolicy::FirstResolved, Some(applied)) => {
                    warn!(
                        "'{character}': default animation '{requested}' unusable ({why}), \
                         falling back to '{applied}'"
                    );
                    diagnostics.push(Diagnostic::DefaultFallback {
                        requested: requested.to_string(),
                        applied: applied.clone(),
                    });
                    Some(applied)
                }
                (DefaultPolicy::FirstResolved, None) => None,
                (DefaultPolicy::Fail, _) => {
                    error!("'{character}': default animation '{requested}' unusable ({why})");
                    return Err(AnimdexError::InvalidDefault {
                        character_id: character.to_string(),
                        default_id: requested.to_string(),
                    });
                }
            }
        }
    };

    if resolved.is_empty() {
        error!("'{character}': none of {} animations resolved", contract.entries.len());
    }

    Ok(Resolution {
        contract: contract.clone(),
        skeleton,
        resolved,
        diagnostics,
        default_id,
    })
}

fn ensure_not_empty(contract: &AnimationContract) -> Result<(), AnimdexError> {
    if contract.is_empty() {
        error!("'{}': animation list is empty", contract.character_id);
        return Err(AnimdexError::EmptyContract {
            character_id: contract.character_id.clone(),
        });
    }
    Ok(())
}
