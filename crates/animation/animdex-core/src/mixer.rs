//! Mixer: owns every action of one character and advances clocks and fades.
//!
//! Methods:
//! - add_action, reset, play, fade_in, fade_out, stop_all, update (fades → clocks → samples)
//!
//! Fades are linear weight ramps. A finished fade-out stops its action. Clock
//! time maps to clip time through the action's [`LoopMode`] when sampled.

use log::{debug, warn};

use crate::config::Config;
use crate::contract::LoopMode;
use crate::ids::{ActionId, IdAllocator};
use crate::outputs::{ActionSample, MixerEvent, Outputs};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Fade {
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    fn weight(&self) -> f32 {
        self.from + (self.to - self.from) * self.progress()
    }
}

/// A playable instance of one clip.
#[derive(Clone, Debug)]
pub struct Action {
    pub id: ActionId,
    pub clip: String,
    /// Clip length in seconds.
    pub duration: f32,
    pub loop_mode: LoopMode,
    pub time_scale: f32,
    clock: f32,
    weight: f32,
    fade: Option<Fade>,
    running: bool,
    finished: bool,
    loops: u32,
}

impl Action {
    fn new(id: ActionId, clip: String, duration: f32, loop_mode: LoopMode) -> Self {
        Self {
            id,
            clip,
            duration: duration.max(0.0),
            loop_mode,
            time_scale: 1.0,
            clock: 0.0,
            weight: 0.0,
            fade: None,
            running: false,
            finished: false,
            loops: 0,
        }
    }

    /// Seconds into the clip under the current loop mode.
    pub fn time(&self) -> f32 {
        clip_time(self.clock, self.duration, self.loop_mode)
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Only meaningful for `Once`: the clock has reached the end of the clip.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Target weight of the running fade, if any.
    pub fn fade_target(&self) -> Option<f32> {
        self.fade.map(|f| f.to)
    }
}

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Reflect t into [0, span] with ping-pong behavior, where period = 2 * span.
fn ping_pong(t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * span;
    let m = fmod(t, period);
    if m <= span {
        m
    } else {
        period - m
    }
}

/// Map an action clock onto clip time.
pub fn clip_time(clock: f32, duration: f32, mode: LoopMode) -> f32 {
    if duration <= 0.0 {
        return 0.0;
    }
    match mode {
        LoopMode::Once => clock.clamp(0.0, duration),
        LoopMode::Repeat => fmod(clock, duration),
        LoopMode::PingPong => ping_pong(clock, duration),
    }
}

/// Owner of all actions for one character.
#[derive(Debug)]
pub struct Mixer {
    ids: IdAllocator,
    actions: Vec<Action>,
    max_events: usize,
    // Events raised outside update() (zero-length fades); flushed on the next tick.
    pending: Vec<MixerEvent>,
    outputs: Outputs,
}

impl Mixer {
    pub fn new(cfg: &Config) -> Self {
        Self {
            ids: IdAllocator::new(),
            actions: Vec::with_capacity(cfg.action_capacity),
            max_events: cfg.max_events_per_tick,
            pending: Vec::new(),
            outputs: Outputs::default(),
        }
    }

    /// Register a clip as a stopped, zero-weight action.
    pub fn add_action(&mut self, clip: &str, duration: f32, loop_mode: LoopMode) -> ActionId {
        let id = self.ids.alloc_action();
        self.actions
            .push(Action::new(id, clip.to_string(), duration, loop_mode));
        id
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    fn action_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.actions.iter_mut().find(|a| a.id == id)
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn running_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|a| a.running)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn set_loop_mode(&mut self, id: ActionId, mode: LoopMode) {
        if let Some(a) = self.action_mut(id) {
            a.loop_mode = mode;
        }
    }

    pub fn set_time_scale(&mut self, id: ActionId, time_scale: f32) {
        if let Some(a) = self.action_mut(id) {
            a.time_scale = time_scale;
        }
    }

    /// Rewind the clock and cancel any fade. Weight and running state are kept.
    pub fn reset(&mut self, id: ActionId) {
        if let Some(a) = self.action_mut(id) {
            a.clock = 0.0;
            a.loops = 0;
            a.finished = false;
            a.fade = None;
        }
    }

    /// Start the clock at full weight without a fade.
    pub fn play(&mut self, id: ActionId) {
        if let Some(a) = self.action_mut(id) {
            a.running = true;
            a.fade = None;
            a.weight = 1.0;
        }
    }

    /// Start the action and ramp its weight from 0 to 1 over `seconds`.
    pub fn fade_in(&mut self, id: ActionId, seconds: f32) {
        let Some(a) = self.action_mut(id) else {
            return;
        };
        a.running = true;
        if seconds <= 0.0 {
            a.weight = 1.0;
            a.fade = None;
            self.pending.push(MixerEvent::FadeInCompleted { action: id });
            return;
        }
        a.weight = 0.0;
        a.fade = Some(Fade {
            from: 0.0,
            to: 1.0,
            duration: seconds,
            elapsed: 0.0,
        });
        debug!("mixer: fade in {:?} over {seconds}s", id);
    }

    /// Ramp the weight from its current value to 0 over `seconds`, then stop.
    /// Stopped actions are left alone.
    pub fn fade_out(&mut self, id: ActionId, seconds: f32) {
        let Some(a) = self.action_mut(id) else {
            return;
        };
        if !a.running {
            return;
        }
        if seconds <= 0.0 {
            a.running = false;
            a.weight = 0.0;
            a.fade = None;
            self.pending.push(MixerEvent::FadeOutCompleted { action: id });
            return;
        }
        a.fade = Some(Fade {
            from: a.weight,
            to: 0.0,
            duration: seconds,
            elapsed: 0.0,
        });
        debug!("mixer: fade out {:?} over {seconds}s", id);
    }

    /// Stop every action immediately at zero weight; no event is emitted.
    pub fn stop_all(&mut self) {
        for a in &mut self.actions {
            a.running = false;
            a.weight = 0.0;
            a.fade = None;
        }
    }

    /// Drop every action and any pending events.
    pub fn clear(&mut self) {
        self.actions.clear();
        self.pending.clear();
        self.outputs.clear();
        self.ids.reset();
    }

    /// Step all running actions by dt seconds.
    pub fn update(&mut self, dt: f32) -> &Outputs {
        self.outputs.clear();
        let mut events = std::mem::take(&mut self.pending);

        for a in self.actions.iter_mut().filter(|a| a.running) {
            // 1) Fade ramps
            if let Some(mut fade) = a.fade {
                fade.elapsed += dt;
                a.weight = fade.weight();
                if fade.progress() >= 1.0 {
                    a.fade = None;
                    if fade.to <= 0.0 {
                        a.running = false;
                        a.weight = 0.0;
                        events.push(MixerEvent::FadeOutCompleted { action: a.id });
                        continue;
                    }
                    events.push(MixerEvent::FadeInCompleted { action: a.id });
                } else {
                    a.fade = Some(fade);
                }
            }

            // 2) Clock and loop bookkeeping
            a.clock += dt * a.time_scale;
            if a.duration > 0.0 {
                match a.loop_mode {
                    LoopMode::Repeat => {
                        let cycles = (a.clock / a.duration).floor().abs() as u32;
                        if cycles > a.loops {
                            a.loops = cycles;
                            events.push(MixerEvent::Looped {
                                action: a.id,
                                loops: cycles,
                            });
                        }
                    }
                    LoopMode::Once => {
                        let past_end = a.clock >= a.duration;
                        let past_start = a.time_scale < 0.0 && a.clock <= 0.0;
                        if !a.finished && (past_end || past_start) {
                            a.finished = true;
                            events.push(MixerEvent::Finished { action: a.id });
                        }
                    }
                    LoopMode::PingPong => {}
                }
            } else if a.loop_mode == LoopMode::Once && !a.finished {
                a.finished = true;
                events.push(MixerEvent::Finished { action: a.id });
            }

            // 3) Sample
            self.outputs.push_sample(ActionSample {
                action: a.id,
                clip: a.clip.clone(),
                time: a.time(),
                weight: a.weight,
            });
        }

        if events.len() > self.max_events {
            warn!(
                "mixer: {} events this tick exceed the limit of {}; dropping the rest",
                events.len(),
                self.max_events
            );
            events.truncate(self.max_events);
        }
        self.outputs.events = events;
        &self.outputs
    }
}
