//! Core configuration for animdex-core.

use serde::{Deserialize, Serialize};

/// What to do when a contract's `defaultAnimationId` cannot be used.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultPolicy {
    /// Reject the load with `InvalidDefault`.
    Fail,
    /// Use the first successfully resolved entry and record a `DefaultFallback` diagnostic.
    #[default]
    FirstResolved,
}

/// Behavior of `switch_to` when the requested id is already the current action.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameIdPolicy {
    /// Reset the clock and run the fade-in again.
    #[default]
    Restart,
    /// Leave the running action untouched.
    Ignore,
}

/// Configuration for contract resolution and playback.
/// Missing fields fall back to `Config::default()` when deserialized.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_policy: DefaultPolicy,
    pub same_id_policy: SameIdPolicy,

    /// Crossfade used when a contract omits `defaults.crossFadeSec`.
    pub default_cross_fade_seconds: f32,

    /// Start the default animation (zero fade) as soon as a character finishes loading.
    pub autoplay_default: bool,

    /// Maximum events to retain per tick before the rest are dropped.
    pub max_events_per_tick: usize,

    /// Initial capacity hint for the mixer's action table.
    pub action_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_policy: DefaultPolicy::FirstResolved,
            same_id_policy: SameIdPolicy::Restart,
            default_cross_fade_seconds: 0.25,
            autoplay_default: true,
            max_events_per_tick: 1024,
            action_capacity: 16,
        }
    }
}
