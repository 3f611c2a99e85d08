//! Transforms and masks.

use std::sync::OnceLock;

use lottie_core::{Bezier, NVector, TransformMatrix};

use crate::enums::MaskMode;
use crate::object::Schema;
use crate::prop::Prop;
use crate::properties::{MultiDimensional, PositionValue, ShapeProperty, Value};

/// Anchor, position, scale, rotation, opacity and skew of a layer or group.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub anchor_point: Option<MultiDimensional>,
    pub position: Option<PositionValue>,
    /// Percent per axis.
    pub scale: Option<MultiDimensional>,
    /// Degrees, clockwise.
    pub rotation: Option<Value>,
    /// Percent.
    pub opacity: Option<Value>,
    /// Degrees.
    pub skew: Option<Value>,
    /// Degrees. `0` skews along x, `90` along y.
    pub skew_axis: Option<Value>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            anchor_point: Some(NVector::xy(0.0, 0.0).into()),
            position: Some(NVector::xy(0.0, 0.0).into()),
            scale: Some(NVector::xy(100.0, 100.0).into()),
            rotation: Some(0.0.into()),
            opacity: Some(100.0.into()),
            skew: Some(0.0.into()),
            skew_axis: Some(0.0.into()),
        }
    }
}

fn vector_at(prop: &Option<MultiDimensional>, time: f64, default: NVector) -> NVector {
    prop.as_ref()
        .and_then(|p| p.get_value_interpolated(time))
        .filter(|v| v.len() >= 2)
        .unwrap_or(default)
}

fn scalar_at(prop: &Option<Value>, time: f64, default: f64) -> f64 {
    prop.as_ref()
        .and_then(|p| p.get_value_interpolated(time))
        .unwrap_or(default)
}

fn unset_if_static<T: crate::keyframe::KeyframeValue>(
    prop: &mut Option<crate::properties::Animatable<T>>,
    default: &T,
) {
    if prop
        .as_ref()
        .is_some_and(|p| p.static_value() == Some(default))
    {
        *prop = None;
    }
}

impl Transform {
    /// The affine matrix at `time`, mapping local coordinates to the parent.
    ///
    /// With `auto_orient`, an animated position also rotates the content
    /// along its direction of motion.
    pub fn to_matrix(&self, time: f64, auto_orient: bool) -> TransformMatrix {
        let mut matrix = TransformMatrix::identity();

        let anchor = vector_at(&self.anchor_point, time, NVector::xy(0.0, 0.0));
        matrix.translate(-anchor[0], -anchor[1]);

        let scale = vector_at(&self.scale, time, NVector::xy(100.0, 100.0));
        matrix.scale(scale[0] / 100.0, scale[1] / 100.0);

        let skew = scalar_at(&self.skew, time, 0.0).to_radians();
        if skew != 0.0 {
            let axis = scalar_at(&self.skew_axis, time, 0.0).to_radians();
            matrix.skew_from_axis(-skew, axis);
        }

        let rotation = scalar_at(&self.rotation, time, 0.0).to_radians();
        if rotation != 0.0 {
            matrix.rotate(rotation);
        }

        if auto_orient {
            if let Some(position) = self.position.as_ref().filter(|p| p.is_animated()) {
                matrix.rotate(position.get_tangent_angle(time));
            }
        }

        let position = vector_at(&self.position, time, NVector::xy(0.0, 0.0));
        matrix.translate(position[0], position[1]);
        matrix
    }

    /// Unsets static anchor, position, rotation and skew holding their
    /// default values.
    pub fn strip_defaults(&mut self) {
        let origin = NVector::xy(0.0, 0.0);
        unset_if_static(&mut self.anchor_point, &origin);
        unset_if_static(&mut self.position, &origin);
        unset_if_static(&mut self.rotation, &0.0);
        unset_if_static(&mut self.skew, &0.0);
        unset_if_static(&mut self.skew_axis, &0.0);
    }
}

/// A type whose props embed the transform props.
pub trait HasTransform: 'static {
    fn transform(&self) -> &Transform;
    fn transform_mut(&mut self) -> &mut Transform;
}

impl HasTransform for Transform {
    fn transform(&self) -> &Transform {
        self
    }

    fn transform_mut(&mut self) -> &mut Transform {
        self
    }
}

/// The transform props (`a`, `p`, `s`, `r`, `o`, `sk`, `sa`) for any type
/// embedding a [`Transform`].
pub fn transform_props<O: HasTransform>() -> Vec<Prop<O>> {
    vec![
        Prop::scalar(
            "anchor_point",
            "a",
            |o: &O| &o.transform().anchor_point,
            |o: &mut O| &mut o.transform_mut().anchor_point,
        ),
        Prop::scalar(
            "position",
            "p",
            |o: &O| &o.transform().position,
            |o: &mut O| &mut o.transform_mut().position,
        ),
        Prop::scalar(
            "scale",
            "s",
            |o: &O| &o.transform().scale,
            |o: &mut O| &mut o.transform_mut().scale,
        ),
        Prop::scalar(
            "rotation",
            "r",
            |o: &O| &o.transform().rotation,
            |o: &mut O| &mut o.transform_mut().rotation,
        ),
        Prop::scalar(
            "opacity",
            "o",
            |o: &O| &o.transform().opacity,
            |o: &mut O| &mut o.transform_mut().opacity,
        ),
        Prop::scalar(
            "skew",
            "sk",
            |o: &O| &o.transform().skew,
            |o: &mut O| &mut o.transform_mut().skew,
        ),
        Prop::scalar(
            "skew_axis",
            "sa",
            |o: &O| &o.transform().skew_axis,
            |o: &mut O| &mut o.transform_mut().skew_axis,
        ),
    ]
}

impl Schema for Transform {
    const CLASS: &'static str = "Transform";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<Transform>>> = OnceLock::new();
        PROPS.get_or_init(transform_props::<Transform>)
    }
}

crate::schema_object!(Transform);

/// A layer mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask {
    pub inverted: Option<bool>,
    pub name: Option<String>,
    pub shape: Option<ShapeProperty>,
    pub opacity: Option<Value>,
    pub mode: Option<MaskMode>,
    pub dilate: Option<Value>,
}

impl Default for Mask {
    fn default() -> Self {
        Self::new(Bezier::new())
    }
}

impl Mask {
    pub fn new(bezier: Bezier) -> Self {
        Self {
            inverted: Some(false),
            name: None,
            shape: Some(bezier.into()),
            opacity: Some(100.0.into()),
            mode: Some(MaskMode::Intersect),
            dilate: Some(0.0.into()),
        }
    }
}

impl Schema for Mask {
    const CLASS: &'static str = "Mask";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<Mask>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            vec![
                Prop::scalar("inverted", "inv", |o: &Mask| &o.inverted, |o: &mut Mask| {
                    &mut o.inverted
                }),
                Prop::scalar("name", "nm", |o: &Mask| &o.name, |o: &mut Mask| &mut o.name),
                Prop::scalar("shape", "pt", |o: &Mask| &o.shape, |o: &mut Mask| &mut o.shape),
                Prop::scalar("opacity", "o", |o: &Mask| &o.opacity, |o: &mut Mask| {
                    &mut o.opacity
                }),
                Prop::scalar("mode", "mode", |o: &Mask| &o.mode, |o: &mut Mask| &mut o.mode),
                Prop::scalar("dilate", "x", |o: &Mask| &o.dilate, |o: &mut Mask| {
                    &mut o.dilate
                }),
            ]
        })
    }
}

crate::schema_object!(Mask);
