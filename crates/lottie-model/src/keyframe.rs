//! Keyframes of animated properties.

use std::sync::OnceLock;

use lottie_core::{Bezier, NVector};

use crate::easing::{Easing, KeyframeBezier, KeyframeBezierHandle};
use crate::object::Schema;
use crate::prop::{Cardinality, Prop};
use crate::values::{LottieValue, PseudoBool};

/// A value that can be animated with keyframes.
pub trait KeyframeValue: LottieValue + Clone + PartialEq + Default + Send + Sync + 'static {
    /// How `s` and `e` are wrapped on the wire.
    const CARDINALITY: Cardinality;

    /// Whether keyframes carry spatial tangents (`ti`/`to`).
    const SPATIAL: bool = false;

    fn lerp(&self, other: &Self, t: f64) -> Self;

    /// Point on the spatial path from `start` to `end` at `t`, when the
    /// value type has one.
    fn spatial(
        _start: &Self,
        _end: &Self,
        _out_tan: &NVector,
        _in_tan: &NVector,
        _t: f64,
    ) -> Option<Self> {
        None
    }
}

impl KeyframeValue for f64 {
    const CARDINALITY: Cardinality = Cardinality::PseudoList;

    fn lerp(&self, other: &Self, t: f64) -> Self {
        self * (1.0 - t) + other * t
    }
}

impl KeyframeValue for NVector {
    const CARDINALITY: Cardinality = Cardinality::Scalar;
    const SPATIAL: bool = true;

    fn lerp(&self, other: &Self, t: f64) -> Self {
        NVector::lerp(self, other, t)
    }

    fn spatial(
        start: &Self,
        end: &Self,
        out_tan: &NVector,
        in_tan: &NVector,
        t: f64,
    ) -> Option<Self> {
        if out_tan.is_zero() && in_tan.is_zero() {
            return None;
        }
        Some(motion_path(start, end, out_tan, in_tan).point_at(t))
    }
}

impl KeyframeValue for Bezier {
    const CARDINALITY: Cardinality = Cardinality::PseudoList;

    fn lerp(&self, other: &Self, t: f64) -> Self {
        Bezier::lerp(self, other, t)
    }
}

/// The motion path from `start` to `end` shaped by spatial tangents.
fn motion_path(start: &NVector, end: &NVector, out_tan: &NVector, in_tan: &NVector) -> Bezier {
    let mut path = Bezier::new();
    path.add_point_with(start.clone(), NVector::zeros(start.len()), out_tan.clone());
    path.add_point_with(end.clone(), in_tan.clone(), NVector::zeros(end.len()));
    path
}

/// A keyframe: the value at `time` and the easing towards the next one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Keyframe<T> {
    pub time: f64,
    /// Easing handle into the next keyframe (`i`).
    pub in_value: Option<KeyframeBezierHandle>,
    /// Easing handle out of this keyframe (`o`).
    pub out_value: Option<KeyframeBezierHandle>,
    /// Hold the start value for the whole segment (`h`).
    pub jump: Option<bool>,
    pub start: Option<T>,
    pub end: Option<T>,
    /// Spatial in tangent (`ti`), positions only.
    pub in_tan: Option<NVector>,
    /// Spatial out tangent (`to`), positions only.
    pub out_tan: Option<NVector>,
}

impl<T: KeyframeValue> Keyframe<T> {
    pub fn new(time: f64, start: T, easing: &Easing) -> Self {
        let mut keyframe = Self {
            time,
            start: Some(start),
            ..Default::default()
        };
        keyframe.set_easing(easing);
        keyframe
    }

    /// Replaces the easing of the segment starting at this keyframe.
    pub fn set_easing(&mut self, easing: &Easing) {
        let handles = easing.handles();
        self.out_value = handles.out_value;
        self.in_value = handles.in_value;
        self.jump = handles.jump;
    }

    pub fn is_jump(&self) -> bool {
        self.jump.unwrap_or(false)
    }

    /// The easing curve of the segment starting here.
    pub fn easing_curve(&self) -> Option<KeyframeBezier> {
        Some(KeyframeBezier::new(self.out_value?, self.in_value?))
    }

    /// The easing curve as a path in the unit square.
    pub fn bezier(&self) -> Option<Bezier> {
        if self.is_jump() {
            let mut bez = Bezier::new();
            bez.add_point(NVector::xy(0.0, 0.0));
            bez.add_point(NVector::xy(1.0, 0.0));
            bez.add_point(NVector::xy(1.0, 1.0));
            return Some(bez);
        }
        self.easing_curve().map(|curve| curve.bezier())
    }

    /// Eased progress for the time ratio `ratio` within the segment.
    pub fn lerp_factor(&self, ratio: f64) -> f64 {
        if self.is_jump() {
            return if ratio >= 1.0 { 1.0 } else { 0.0 };
        }
        match self.easing_curve() {
            Some(curve) => curve.y_at_x(ratio),
            None => ratio,
        }
    }

    /// Value at `ratio` of the way to the end of the segment.
    ///
    /// `next_start` stands in for a missing `end`.
    pub fn interpolated_value(&self, ratio: f64, next_start: Option<&T>) -> Option<T> {
        let start = self.start.as_ref()?;
        let Some(end) = self.end.as_ref().or(next_start) else {
            return Some(start.clone());
        };
        if self.in_value.is_none() || self.out_value.is_none() {
            return Some(start.clone());
        }
        if ratio >= 1.0 {
            return Some(end.clone());
        }
        if ratio <= 0.0 {
            return Some(start.clone());
        }
        let factor = self.lerp_factor(ratio);
        if let (Some(in_tan), Some(out_tan)) = (&self.in_tan, &self.out_tan) {
            if let Some(value) = T::spatial(start, end, out_tan, in_tan, factor) {
                return Some(value);
            }
        }
        Some(start.lerp(end, factor))
    }
}

impl Keyframe<NVector> {
    /// Direction of motion along the spatial path, in radians.
    pub fn interpolated_tangent_angle(&self, ratio: f64, next_start: Option<&NVector>) -> f64 {
        let (Some(start), Some(end)) = (self.start.as_ref(), self.end.as_ref().or(next_start))
        else {
            return 0.0;
        };
        let (Some(in_tan), Some(out_tan)) = (&self.in_tan, &self.out_tan) else {
            return 0.0;
        };
        motion_path(start, end, out_tan, in_tan).tangent_angle_at(ratio)
    }
}

fn keyframe_props<T: KeyframeValue>() -> Vec<Prop<Keyframe<T>>> {
    let mut props = vec![
        Prop::required(
            "time",
            "t",
            Cardinality::Scalar,
            |o: &Keyframe<T>| &o.time,
            |o: &mut Keyframe<T>| &mut o.time,
        ),
        Prop::scalar(
            "in_value",
            "i",
            |o: &Keyframe<T>| &o.in_value,
            |o: &mut Keyframe<T>| &mut o.in_value,
        ),
        Prop::scalar(
            "out_value",
            "o",
            |o: &Keyframe<T>| &o.out_value,
            |o: &mut Keyframe<T>| &mut o.out_value,
        ),
        Prop::converted::<PseudoBool, _, _>(
            "jump",
            "h",
            |o: &Keyframe<T>| &o.jump,
            |o: &mut Keyframe<T>| &mut o.jump,
        ),
    ];
    match T::CARDINALITY {
        Cardinality::PseudoList => {
            props.push(Prop::pseudo_list(
                "start",
                "s",
                |o: &Keyframe<T>| &o.start,
                |o: &mut Keyframe<T>| &mut o.start,
            ));
            props.push(Prop::pseudo_list(
                "end",
                "e",
                |o: &Keyframe<T>| &o.end,
                |o: &mut Keyframe<T>| &mut o.end,
            ));
        }
        _ => {
            props.push(Prop::scalar(
                "start",
                "s",
                |o: &Keyframe<T>| &o.start,
                |o: &mut Keyframe<T>| &mut o.start,
            ));
            props.push(Prop::scalar(
                "end",
                "e",
                |o: &Keyframe<T>| &o.end,
                |o: &mut Keyframe<T>| &mut o.end,
            ));
        }
    }
    if T::SPATIAL {
        props.push(Prop::scalar(
            "in_tan",
            "ti",
            |o: &Keyframe<T>| &o.in_tan,
            |o: &mut Keyframe<T>| &mut o.in_tan,
        ));
        props.push(Prop::scalar(
            "out_tan",
            "to",
            |o: &Keyframe<T>| &o.out_tan,
            |o: &mut Keyframe<T>| &mut o.out_tan,
        ));
    }
    props
}

macro_rules! keyframe_schema {
    ($($value:ty => $class:literal),+ $(,)?) => {$(
        impl Schema for Keyframe<$value> {
            const CLASS: &'static str = $class;

            fn props() -> &'static [Prop<Self>] {
                static PROPS: OnceLock<Vec<Prop<Keyframe<$value>>>> = OnceLock::new();
                PROPS.get_or_init(keyframe_props::<$value>)
            }
        }

        crate::schema_object!(Keyframe<$value>);
    )+};
}

keyframe_schema! {
    f64 => "Keyframe",
    NVector => "OffsetKeyframe",
    Bezier => "ShapePropKeyframe",
}
