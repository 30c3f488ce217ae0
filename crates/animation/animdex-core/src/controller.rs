//! Playback controller: one current action per character, switched with crossfades.
//!
//! The controller owns the character's [`Mixer`] and the entry id → action
//! map built once from a [`Resolution`]. Playback state is just the id of the
//! current entry, if any; it only changes through `switch_to`, `stop` and
//! `dispose`, and failed requests leave it untouched.

use indexmap::IndexMap;
use log::debug;

use crate::config::{Config, SameIdPolicy};
use crate::contract::LoopMode;
use crate::error::AnimdexError;
use crate::ids::ActionId;
use crate::mixer::Mixer;
use crate::outputs::Outputs;
use crate::resolver::Resolution;

/// Contract entry bound to a playable action in this controller's mixer.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedAction {
    pub entry_id: String,
    pub display_name: String,
    pub action: ActionId,
    pub loop_mode: LoopMode,
}

#[derive(Debug)]
pub struct PlaybackController {
    character_id: String,
    mixer: Mixer,
    actions: IndexMap<String, ResolvedAction>,
    current: Option<String>,
    default_id: Option<String>,
    cross_fade_seconds: f32,
    same_id_policy: SameIdPolicy,
}

impl PlaybackController {
    /// Build one action per resolved entry, in declaration order. Nothing plays yet.
    pub fn new(resolution: &Resolution, cfg: &Config) -> Self {
        let mut mixer = Mixer::new(cfg);
        let mut actions = IndexMap::with_capacity(resolution.resolved.len());
        for (id, rc) in &resolution.resolved {
            let action =
                mixer.add_action(&rc.clip.name, rc.clip.duration_seconds, rc.entry.loop_mode);
            actions.insert(
                id.clone(),
                ResolvedAction {
                    entry_id: id.clone(),
                    display_name: rc.entry.display_name.clone(),
                    action,
                    loop_mode: rc.entry.loop_mode,
                },
            );
        }
        Self {
            character_id: resolution.contract.character_id.clone(),
            mixer,
            actions,
            current: None,
            default_id: resolution.default_id.clone(),
            cross_fade_seconds: resolution.contract.cross_fade_seconds,
            same_id_policy: cfg.same_id_policy,
        }
    }

    /// Crossfade from the current action to `id` over `fade_seconds`.
    ///
    /// The previous action fades out; the new one restarts its clock with its
    /// declared loop mode and fades in. Asking for the current id follows the
    /// configured [`SameIdPolicy`].
    pub fn switch_to(&mut self, id: &str, fade_seconds: f32) -> Result<(), AnimdexError> {
        let next = self
            .actions
            .get(id)
            .ok_or_else(|| AnimdexError::UnknownAnimationId { id: id.to_string() })?;
        if !fade_seconds.is_finite() || fade_seconds < 0.0 {
            return Err(AnimdexError::InvalidFade {
                seconds: fade_seconds,
            });
        }
        let (next_action, loop_mode) = (next.action, next.loop_mode);

        if self.current.as_deref() == Some(id) {
            if self.same_id_policy == SameIdPolicy::Ignore {
                debug!("'{}': '{id}' already playing", self.character_id);
                return Ok(());
            }
        } else if let Some(prev) = self.current_action() {
            self.mixer.fade_out(prev, fade_seconds);
        }

        self.mixer.reset(next_action);
        self.mixer.set_loop_mode(next_action, loop_mode);
        self.mixer.fade_in(next_action, fade_seconds);
        debug!(
            "'{}': switch {:?} -> '{id}' over {fade_seconds}s",
            self.character_id, self.current
        );
        self.current = Some(id.to_string());
        Ok(())
    }

    /// Switch using the contract's `crossFadeSec`.
    pub fn crossfade_to(&mut self, id: &str) -> Result<(), AnimdexError> {
        self.switch_to(id, self.cross_fade_seconds)
    }

    /// Start the default animation. Returns `false` when there is no default.
    pub fn play_default(&mut self, fade_seconds: f32) -> Result<bool, AnimdexError> {
        match self.default_id.clone() {
            Some(id) => self.switch_to(&id, fade_seconds).map(|_| true),
            None => Ok(false),
        }
    }

    /// Advance the mixer by dt seconds.
    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.mixer.update(dt)
    }

    /// Stop every action immediately and clear the current id.
    pub fn stop(&mut self) {
        self.mixer.stop_all();
        self.current = None;
    }

    /// Release every action. The controller is empty afterwards.
    pub fn dispose(&mut self) {
        self.mixer.clear();
        self.actions.clear();
        self.current = None;
        self.default_id = None;
        debug!("'{}': playback disposed", self.character_id);
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current_action(&self) -> Option<ActionId> {
        self.current
            .as_deref()
            .and_then(|id| self.actions.get(id))
            .map(|a| a.action)
    }

    pub fn default_id(&self) -> Option<&str> {
        self.default_id.as_deref()
    }

    pub fn cross_fade_seconds(&self) -> f32 {
        self.cross_fade_seconds
    }

    pub fn contains(&self, id: &str) -> bool {
        self.actions.contains_key(id)
    }

    pub fn action(&self, id: &str) -> Option<&ResolvedAction> {
        self.actions.get(id)
    }

    /// Resolved actions in contract declaration order.
    pub fn actions(&self) -> impl Iterator<Item = &ResolvedAction> {
        self.actions.values()
    }

    pub fn loop_mode(&self, id: &str) -> Option<LoopMode> {
        self.actions.get(id).map(|a| a.loop_mode)
    }

    /// Negative scales play backwards. Non-finite scales are rejected.
    pub fn set_time_scale(&mut self, id: &str, time_scale: f32) -> Result<(), AnimdexError> {
        let action = self
            .actions
            .get(id)
            .ok_or_else(|| AnimdexError::UnknownAnimationId { id: id.to_string() })?
            .action;
        if !time_scale.is_finite() {
            return Err(AnimdexError::InvalidTimeScale { scale: time_scale });
        }
        self.mixer.set_time_scale(action, time_scale);
        Ok(())
    }

    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }
}
