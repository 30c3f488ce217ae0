//! Output contracts from the mixer.
//!
//! Each tick reports one sample per running action (clip time and blend
//! weight) and a separate list of semantic events. Hosts apply the samples to
//! their own rig; nothing here evaluates poses.

use serde::{Deserialize, Serialize};

use crate::ids::ActionId;

/// Clip time and blend weight of one running action after this tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionSample {
    pub action: ActionId,
    pub clip: String,
    /// Seconds into the clip, already mapped by the action's loop mode.
    pub time: f32,
    pub weight: f32,
}

/// Discrete signals emitted while stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MixerEvent {
    FadeInCompleted {
        action: ActionId,
    },
    /// The action reached zero weight and stopped.
    FadeOutCompleted {
        action: ActionId,
    },
    /// A `Repeat` action wrapped past the end of its clip.
    Looped {
        action: ActionId,
        loops: u32,
    },
    /// A `Once` action reached the end of its clip; it holds the last frame.
    Finished {
        action: ActionId,
    },
}

/// Outputs returned by Mixer::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub samples: Vec<ActionSample>,
    #[serde(default)]
    pub events: Vec<MixerEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.samples.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_sample(&mut self, sample: ActionSample) {
        self.samples.push(sample);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty() && self.events.is_empty()
    }

    pub fn sample(&self, action: ActionId) -> Option<&ActionSample> {
        self.samples.iter().find(|s| s.action == action)
    }
}
