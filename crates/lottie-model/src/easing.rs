//! Keyframe easing.
//!
//! Lottie eases each keyframe segment with a cubic from `(0, 0)` to `(1, 1)`
//! whose two inner handles are stored on the keyframe as `o` (out of the
//! segment start) and `i` (into the segment end).

use std::sync::OnceLock;

use lottie_core::{Bezier, NVector};

use crate::prop::{Cardinality, Prop};

/// Default handle offset for the non-linear easings.
pub const DEFAULT_DELAY: f64 = 1.0 / 3.0;

/// One easing handle, in the unit square of time (`x`) and value (`y`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyframeBezierHandle {
    pub x: f64,
    pub y: f64,
}

impl KeyframeBezierHandle {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl crate::object::Schema for KeyframeBezierHandle {
    const CLASS: &'static str = "KeyframeBezierHandle";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<KeyframeBezierHandle>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            vec![
                Prop::required(
                    "x",
                    "x",
                    Cardinality::PseudoList,
                    |o: &KeyframeBezierHandle| &o.x,
                    |o: &mut KeyframeBezierHandle| &mut o.x,
                ),
                Prop::required(
                    "y",
                    "y",
                    Cardinality::PseudoList,
                    |o: &KeyframeBezierHandle| &o.y,
                    |o: &mut KeyframeBezierHandle| &mut o.y,
                ),
            ]
        })
    }
}

crate::schema_object!(KeyframeBezierHandle);

/// How a keyframe segment moves from its start value to its end value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Lingers near the start, then accelerates.
    EaseIn(f64),
    /// Starts fast, then decelerates.
    EaseOut(f64),
    /// Ease in and ease out combined.
    Sigmoid(f64),
    /// Holds the start value until the next keyframe.
    Jump,
    /// Out handle from the first easing, in handle from the second.
    Split(Box<Easing>, Box<Easing>),
}

/// Easing fields as stored on a keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EasingHandles {
    pub out_value: Option<KeyframeBezierHandle>,
    pub in_value: Option<KeyframeBezierHandle>,
    pub jump: Option<bool>,
}

impl Easing {
    pub fn ease_in() -> Self {
        Easing::EaseIn(DEFAULT_DELAY)
    }

    pub fn ease_out() -> Self {
        Easing::EaseOut(DEFAULT_DELAY)
    }

    pub fn sigmoid() -> Self {
        Easing::Sigmoid(DEFAULT_DELAY)
    }

    pub fn split(out_ease: Easing, in_ease: Easing) -> Self {
        Easing::Split(Box::new(out_ease), Box::new(in_ease))
    }

    pub fn handles(&self) -> EasingHandles {
        let bezier = |ox: f64, ix: f64| EasingHandles {
            out_value: Some(KeyframeBezierHandle::new(ox, 0.0)),
            in_value: Some(KeyframeBezierHandle::new(ix, 1.0)),
            jump: None,
        };
        match self {
            Easing::Linear => bezier(0.0, 1.0),
            Easing::EaseIn(delay) => bezier(*delay, 1.0),
            Easing::EaseOut(delay) => bezier(0.0, 1.0 - delay),
            Easing::Sigmoid(delay) => bezier(*delay, 1.0 - delay),
            Easing::Jump => EasingHandles {
                out_value: None,
                in_value: None,
                jump: Some(true),
            },
            Easing::Split(out_ease, in_ease) => {
                let out_handles = out_ease.handles();
                let in_handles = in_ease.handles();
                let jump = out_handles.jump.or(in_handles.jump);
                EasingHandles {
                    out_value: out_handles.out_value,
                    in_value: in_handles.in_value,
                    jump,
                }
            }
        }
    }
}

const NEWTON_ITERATIONS: usize = 4;
const NEWTON_MIN_SLOPE: f64 = 0.001;
const SUBDIVISION_PRECISION: f64 = 0.000_000_1;
const SUBDIVISION_MAX_ITERATIONS: usize = 10;
const SPLINE_TABLE_SIZE: usize = 11;
const SAMPLE_STEP_SIZE: f64 = 1.0 / (SPLINE_TABLE_SIZE as f64 - 1.0);

/// The easing curve of a keyframe segment, solved for value given time.
#[derive(Debug, Clone)]
pub struct KeyframeBezier {
    h1: KeyframeBezierHandle,
    h2: KeyframeBezierHandle,
    samples: [f64; SPLINE_TABLE_SIZE],
}

fn coeff_a(c1: f64, c2: f64) -> f64 {
    1.0 - 3.0 * c2 + 3.0 * c1
}

fn coeff_b(c1: f64, c2: f64) -> f64 {
    3.0 * c2 - 6.0 * c1
}

fn coeff_c(c1: f64) -> f64 {
    3.0 * c1
}

fn bezier_component(t: f64, c1: f64, c2: f64) -> f64 {
    ((coeff_a(c1, c2) * t + coeff_b(c1, c2)) * t + coeff_c(c1)) * t
}

fn slope_component(t: f64, c1: f64, c2: f64) -> f64 {
    3.0 * coeff_a(c1, c2) * t * t + 2.0 * coeff_b(c1, c2) * t + coeff_c(c1)
}

impl KeyframeBezier {
    /// `h1` is the out handle of the segment start, `h2` the in handle of its end.
    pub fn new(h1: KeyframeBezierHandle, h2: KeyframeBezierHandle) -> Self {
        let mut samples = [0.0; SPLINE_TABLE_SIZE];
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = bezier_component(i as f64 * SAMPLE_STEP_SIZE, h1.x, h2.x);
        }
        Self { h1, h2, samples }
    }

    /// The easing curve as a path in the unit square.
    pub fn bezier(&self) -> Bezier {
        let mut bez = Bezier::new();
        bez.add_point_with(
            NVector::xy(0.0, 0.0),
            NVector::zeros(2),
            NVector::xy(self.h1.x, self.h1.y),
        );
        bez.add_point_with(
            NVector::xy(1.0, 1.0),
            NVector::xy(self.h2.x - 1.0, self.h2.y - 1.0),
            NVector::zeros(2),
        );
        bez
    }

    pub fn point_at(&self, t: f64) -> NVector {
        NVector::xy(
            bezier_component(t, self.h1.x, self.h2.x),
            bezier_component(t, self.h1.y, self.h2.y),
        )
    }

    pub fn slope_at(&self, t: f64) -> NVector {
        NVector::xy(
            slope_component(t, self.h1.x, self.h2.x),
            slope_component(t, self.h1.y, self.h2.y),
        )
    }

    fn binary_subdivide(&self, x: f64, mut start: f64, mut end: f64) -> f64 {
        let mut t = start + (end - start) / 2.0;
        for _ in 0..SUBDIVISION_MAX_ITERATIONS {
            t = start + (end - start) / 2.0;
            let current_x = bezier_component(t, self.h1.x, self.h2.x) - x;
            if current_x.abs() < SUBDIVISION_PRECISION {
                break;
            }
            if current_x > 0.0 {
                end = t;
            } else {
                start = t;
            }
        }
        t
    }

    fn newton_raphson(&self, x: f64, mut t_guess: f64) -> f64 {
        for _ in 0..NEWTON_ITERATIONS {
            let slope = slope_component(t_guess, self.h1.x, self.h2.x);
            if slope == 0.0 {
                return t_guess;
            }
            let current_x = bezier_component(t_guess, self.h1.x, self.h2.x) - x;
            t_guess -= current_x / slope;
        }
        t_guess
    }

    /// Curve parameter whose x coordinate is `x`.
    pub fn t_for_x(&self, x: f64) -> f64 {
        let last_sample = SPLINE_TABLE_SIZE - 1;
        let mut interval_start = 0.0;
        let mut current = 1;
        while current != last_sample && self.samples[current] <= x {
            interval_start += SAMPLE_STEP_SIZE;
            current += 1;
        }
        current -= 1;

        let span = self.samples[current + 1] - self.samples[current];
        let dist = if span != 0.0 {
            (x - self.samples[current]) / span
        } else {
            0.0
        };
        let t_guess = interval_start + dist * SAMPLE_STEP_SIZE;
        let initial_slope = slope_component(t_guess, self.h1.x, self.h2.x);
        if initial_slope >= NEWTON_MIN_SLOPE {
            self.newton_raphson(x, t_guess)
        } else if initial_slope == 0.0 {
            t_guess
        } else {
            self.binary_subdivide(x, interval_start, interval_start + SAMPLE_STEP_SIZE)
        }
    }

    /// Eased progress at time ratio `x`.
    pub fn y_at_x(&self, x: f64) -> f64 {
        let t = self.t_for_x(x);
        bezier_component(t, self.h1.y, self.h2.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::LottieObject;
    use serde_json::json;

    #[test]
    fn test_handle_wire_form() {
        let handle = KeyframeBezierHandle::new(0.5, 1.0);
        assert_eq!(
            crate::Json::Object(handle.to_dict().unwrap()),
            json!({"x": [0.5], "y": [1]})
        );
        let loaded = KeyframeBezierHandle::load(
            json!({"x": [0.25, 0.3], "y": 0}).as_object().unwrap(),
        )
        .unwrap();
        assert_eq!(loaded, KeyframeBezierHandle::new(0.25, 0.0));
    }

    #[test]
    fn test_easing_handles() {
        let linear = Easing::Linear.handles();
        assert_eq!(linear.out_value, Some(KeyframeBezierHandle::new(0.0, 0.0)));
        assert_eq!(linear.in_value, Some(KeyframeBezierHandle::new(1.0, 1.0)));

        let sigmoid = Easing::sigmoid().handles();
        assert_eq!(sigmoid.out_value.unwrap().x, DEFAULT_DELAY);
        assert_eq!(sigmoid.in_value.unwrap().x, 1.0 - DEFAULT_DELAY);

        let jump = Easing::Jump.handles();
        assert_eq!(jump.jump, Some(true));
        assert!(jump.in_value.is_none());
    }

    #[test]
    fn test_split_easing() {
        let split = Easing::split(Easing::ease_in(), Easing::ease_out()).handles();
        assert_eq!(
            split.out_value,
            Some(KeyframeBezierHandle::new(DEFAULT_DELAY, 0.0))
        );
        assert_eq!(
            split.in_value,
            Some(KeyframeBezierHandle::new(1.0 - DEFAULT_DELAY, 1.0))
        );
    }

    #[test]
    fn test_linear_curve_is_identity() {
        let curve = KeyframeBezier::new(
            KeyframeBezierHandle::new(0.0, 0.0),
            KeyframeBezierHandle::new(1.0, 1.0),
        );
        for i in 0..=10 {
            let x = i as f64 / 10.0;
            assert!((curve.y_at_x(x) - x).abs() < 1e-3);
        }
    }

    #[test]
    fn test_ease_in_lags_behind() {
        let curve = KeyframeBezier::new(
            KeyframeBezierHandle::new(0.42, 0.0),
            KeyframeBezierHandle::new(1.0, 1.0),
        );
        assert!(curve.y_at_x(0.5) < 0.5);
        assert!((curve.y_at_x(0.0)).abs() < 1e-6);
        assert!((curve.y_at_x(1.0) - 1.0).abs() < 1e-3);
    }
}
