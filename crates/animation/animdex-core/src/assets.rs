//! Engine-agnostic view of the two external assets a character needs.
//!
//! Only what resolution and playback consume is kept: joint names for the rig,
//! and clip names with durations for the animation library.

use serde::{Deserialize, Serialize};

/// Rig description loaded from the skeleton asset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub joints: Vec<String>,
}

/// A named animation clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    /// Length in seconds.
    #[serde(rename = "duration")]
    pub duration_seconds: f32,
}

impl Clip {
    pub fn new(name: impl Into<String>, duration_seconds: f32) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
        }
    }
}

/// Outcome of an exact-name lookup in a [`ClipSet`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClipMatch<'a> {
    None,
    One(&'a Clip),
    /// More than one clip carries the name; `first` is the earliest in source order.
    Many { first: &'a Clip, count: usize },
}

/// Clips from the animation-source asset, in source order.
/// Names are not required to be unique; duplicates surface as ambiguous matches.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClipSet {
    pub clips: Vec<Clip>,
}

impl ClipSet {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self { clips }
    }

    /// Exact, case-sensitive name lookup.
    pub fn find_exact(&self, name: &str) -> ClipMatch<'_> {
        let mut matches = self.clips.iter().filter(|c| c.name == name);
        let Some(first) = matches.next() else {
            return ClipMatch::None;
        };
        let rest = matches.count();
        if rest == 0 {
            ClipMatch::One(first)
        } else {
            ClipMatch::Many {
                first,
                count: rest + 1,
            }
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|c| c.name.as_str())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

impl FromIterator<Clip> for ClipSet {
    fn from_iter<T: IntoIterator<Item = Clip>>(iter: T) -> Self {
        Self {
            clips: iter.into_iter().collect(),
        }
    }
}
