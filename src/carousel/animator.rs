use bevy::log::trace;
use bevy::math::curve::{Curve, EaseFunction};
use serde::{Deserialize, Serialize};

const SPRING_SUBSTEP: f32 = 1.0 / 240.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    QuadraticInOut,
    CubicOut,
    SineInOut,
}

impl Easing {
    pub fn sample(self, t: f32) -> f32 {
        EaseFunction::from(self).sample_clamped(t)
    }
}

impl From<Easing> for EaseFunction {
    fn from(easing: Easing) -> Self {
        match easing {
            Easing::Linear => EaseFunction::Linear,
            Easing::QuadraticInOut => EaseFunction::QuadraticInOut,
            Easing::CubicOut => EaseFunction::CubicOut,
            Easing::SineInOut => EaseFunction::SineInOut,
        }
    }
}

/// How an [`AnimatedValue`] travels toward its target. Durations are seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationConfig {
    Timing {
        duration: f32,
        #[serde(default)]
        easing: Easing,
    },
    Spring {
        stiffness: f32,
        damping: f32,
        mass: f32,
        #[serde(default)]
        overshoot_clamping: bool,
        rest_speed_threshold: f32,
        rest_displacement_threshold: f32,
    },
}

impl AnimationConfig {
    pub fn timing(duration: f32, easing: Easing) -> Self {
        AnimationConfig::Timing { duration, easing }
    }

    /// Under-damped spring that stops at the first target crossing.
    pub fn clamped_spring() -> Self {
        AnimationConfig::Spring {
            stiffness: 100.0,
            damping: 10.0,
            mass: 1.0,
            overshoot_clamping: true,
            rest_speed_threshold: 2.0,
            rest_displacement_threshold: 0.01,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig::timing(0.3, Easing::QuadraticInOut)
    }
}

#[derive(Debug, Clone)]
struct Transition<P> {
    from: f32,
    to: f32,
    config: AnimationConfig,
    delay: f32,
    elapsed: f32,
    velocity: f32,
    payload: P,
}

/// A continuously animated scalar with at most one transition in flight.
///
/// `next_value` is the value the scalar will rest at once nothing is in
/// flight. It moves synchronously with `animate_to`, so a reader arriving
/// mid-transition sees where the value is going rather than where it is.
///
/// The payload `P` is handed back from [`AnimatedValue::tick`] when a
/// transition completes. Cancelled or superseded transitions drop their
/// payload without returning it.
#[derive(Debug, Clone)]
pub struct AnimatedValue<P = ()> {
    value: f32,
    next_value: f32,
    transition: Option<Transition<P>>,
}

impl<P> AnimatedValue<P> {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            next_value: value,
            transition: None,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn next_value(&self) -> f32 {
        self.next_value
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Target of the in-flight transition, if any.
    pub fn target(&self) -> Option<f32> {
        self.transition.as_ref().map(|transition| transition.to)
    }

    /// Writes the value directly, dropping any transition in flight.
    pub fn set(&mut self, value: f32) {
        self.transition = None;
        self.value = value;
        self.next_value = value;
    }

    /// Freezes the value where it currently is. `next_value` keeps the
    /// resting target of the dropped transition.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.transition.take().is_some();
        if cancelled {
            trace!(
                "animation cancelled at {:.2} (resting {:.2})",
                self.value,
                self.next_value
            );
        }
        cancelled
    }

    pub fn animate_to(&mut self, target: f32, config: AnimationConfig, payload: P) {
        self.animate_to_delayed(target, 0.0, config, payload);
    }

    /// Starts a transition after `delay` seconds. The value holds still
    /// during the delay. Replaces whatever was in flight.
    pub fn animate_to_delayed(
        &mut self,
        target: f32,
        delay: f32,
        config: AnimationConfig,
        payload: P,
    ) {
        self.next_value = target;
        self.transition = Some(Transition {
            from: self.value,
            to: target,
            config,
            delay: delay.max(0.0),
            elapsed: 0.0,
            velocity: 0.0,
            payload,
        });
    }

    /// Advances by `delta_seconds`, returning the payload of a transition
    /// that completed during this step.
    pub fn tick(&mut self, delta_seconds: f32) -> Option<P> {
        let transition = self.transition.as_mut()?;
        let delta_seconds = delta_seconds.max(0.0);
        transition.elapsed += delta_seconds;

        let active_time = transition.elapsed - transition.delay;
        if active_time <= 0.0 {
            return None;
        }
        // Only the portion of this frame past the delay moves the value.
        let step = active_time.min(delta_seconds);

        let done = match transition.config {
            AnimationConfig::Timing { duration, easing } => {
                let progress = if duration <= 0.0 {
                    1.0
                } else {
                    (active_time / duration).clamp(0.0, 1.0)
                };
                self.value =
                    transition.from + (transition.to - transition.from) * easing.sample(progress);
                progress >= 1.0
            }
            AnimationConfig::Spring {
                stiffness,
                damping,
                mass,
                overshoot_clamping,
                rest_speed_threshold,
                rest_displacement_threshold,
            } => {
                let mass = mass.max(f32::EPSILON);
                let start_side = (transition.from - transition.to).signum();
                let mut remaining = step;
                let mut settled = false;
                while remaining > 0.0 {
                    let dt = remaining.min(SPRING_SUBSTEP);
                    remaining -= dt;
                    let displacement = self.value - transition.to;
                    let acceleration =
                        (-stiffness * displacement - damping * transition.velocity) / mass;
                    transition.velocity += acceleration * dt;
                    self.value += transition.velocity * dt;

                    let displacement = self.value - transition.to;
                    let crossed = displacement == 0.0 || displacement.signum() != start_side;
                    let at_rest = transition.velocity.abs() < rest_speed_threshold
                        && displacement.abs() < rest_displacement_threshold;
                    if (overshoot_clamping && crossed) || at_rest {
                        settled = true;
                        break;
                    }
                }
                settled || transition.from == transition.to
            }
        };

        if !done {
            return None;
        }
        let finished = self.transition.take()?;
        self.value = finished.to;
        Some(finished.payload)
    }

    /// Moves the value, its resting target and any transition by `delta`
    /// without disturbing the transition's progress or payload.
    pub fn shift(&mut self, delta: f32) {
        self.value += delta;
        self.next_value += delta;
        if let Some(transition) = self.transition.as_mut() {
            transition.from += delta;
            transition.to += delta;
        }
    }

    /// Scales every pixel quantity by `ratio` after a layout change.
    pub fn rescale(&mut self, ratio: f32) {
        self.value *= ratio;
        self.next_value *= ratio;
        if let Some(transition) = self.transition.as_mut() {
            transition.from *= ratio;
            transition.to *= ratio;
            transition.velocity *= ratio;
        }
    }
}
