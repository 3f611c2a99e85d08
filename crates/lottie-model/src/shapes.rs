//! Shape elements.
//!
//! A shape layer holds a list of [`ShapeElement`]s: geometry (rectangles,
//! ellipses, stars, paths), styles (fills, strokes, gradients), modifiers
//! (trim, repeater, rounded corners, merge, twist) and groups nesting more of
//! them. Every variant shares the [`ShapeBase`] props and is picked on load by
//! its `ty` tag.

use std::f64::consts::PI;
use std::sync::OnceLock;

use lottie_core::{Bezier, BoundingBox, EllipseArc, LottieError, LottieResult, NVector};
use tracing::{debug, warn};

use crate::easing::Easing;
use crate::enums::{
    Composite, FillRule, GradientType, LineCap, LineJoin, StarType, StrokeDashType,
    TrimMultipleShapes,
};
use crate::gradient::GradientColors;
use crate::helpers::{transform_props, HasTransform, Transform};
use crate::keyframe::KeyframeValue;
use crate::object::{LottieObject, Node, Schema};
use crate::prop::{scalar_field, Prop};
use crate::properties::{Animatable, MultiDimensional, PositionValue, ShapeProperty, Value};
use crate::registry::{CustomShape, EXTENSION_KEY};
use crate::values::{expect_object, LottieValue};
use crate::{Dict, Json};

/// Most points a star outline is built with.
pub const MAX_STAR_POINTS: f64 = 1000.0;

/// Props every shape element carries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeBase {
    pub hidden: Option<bool>,
    pub name: Option<String>,
    pub property_index: Option<i64>,
    pub blend_mode: Option<i64>,
}

/// A concrete shape element type with its `ty` tag.
pub trait ShapeVariant: Schema {
    const TYPE: &'static str;

    fn base(&self) -> &ShapeBase;
    fn base_mut(&mut self) -> &mut ShapeBase;
}

fn base_props<O: ShapeVariant>() -> Vec<Prop<O>> {
    vec![
        Prop::scalar(
            "hidden",
            "hd",
            |o: &O| &o.base().hidden,
            |o: &mut O| &mut o.base_mut().hidden,
        ),
        Prop::scalar(
            "name",
            "nm",
            |o: &O| &o.base().name,
            |o: &mut O| &mut o.base_mut().name,
        ),
        Prop::computed("type", "ty", "str", |_: &O| Some(Json::from(O::TYPE))),
        Prop::scalar(
            "property_index",
            "cix",
            |o: &O| &o.base().property_index,
            |o: &mut O| &mut o.base_mut().property_index,
        ),
        Prop::scalar(
            "blend_mode",
            "bm",
            |o: &O| &o.base().blend_mode,
            |o: &mut O| &mut o.base_mut().blend_mode,
        ),
    ]
}

macro_rules! shape_schema {
    ($ty:ident, $tag:literal, $props:expr $(, after_load = $hook:path)?) => {
        impl ShapeVariant for $ty {
            const TYPE: &'static str = $tag;

            fn base(&self) -> &ShapeBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut ShapeBase {
                &mut self.base
            }
        }

        impl Schema for $ty {
            const CLASS: &'static str = stringify!($ty);

            fn props() -> &'static [Prop<Self>] {
                static PROPS: OnceLock<Vec<Prop<$ty>>> = OnceLock::new();
                PROPS.get_or_init(|| {
                    let mut props = base_props::<$ty>();
                    props.extend($props);
                    props
                })
            }

            $(
                fn after_load(&mut self, dict: &Dict) -> LottieResult<()> {
                    $hook(self, dict)
                }
            )?
        }

        crate::schema_object!($ty);
    };
}

fn vector_at(prop: &Option<MultiDimensional>, time: f64) -> NVector {
    prop.as_ref()
        .and_then(|p| p.get_value_interpolated(time))
        .filter(|v| v.len() >= 2)
        .unwrap_or_else(|| NVector::zeros(2))
}

fn scalar_at(prop: &Option<Value>, time: f64) -> f64 {
    prop.as_ref()
        .and_then(|p| p.get_value_interpolated(time))
        .unwrap_or(0.0)
}

fn collect_times<T: KeyframeValue>(times: &mut Vec<f64>, prop: &Option<Animatable<T>>) {
    if let Some(keyframes) = prop.as_ref().and_then(|p| p.keyframes()) {
        times.extend(keyframes.iter().map(|k| k.time));
    }
}

/// A shape property sampled by `build` at every keyframe time, or a static
/// one when nothing is animated.
fn sample_shape(mut times: Vec<f64>, build: impl Fn(f64) -> Bezier) -> ShapeProperty {
    times.sort_by(f64::total_cmp);
    times.dedup();
    if times.is_empty() {
        return ShapeProperty::new(build(0.0));
    }
    let mut shape = ShapeProperty::default();
    for time in times {
        shape.add_keyframe(time, build(time), Easing::Linear);
    }
    shape
}

fn path_from(base: &ShapeBase, shape: ShapeProperty) -> Path {
    Path {
        base: ShapeBase {
            name: base.name.clone(),
            ..Default::default()
        },
        shape: Some(shape),
        ..Default::default()
    }
}

/// Axis aligned rectangle, optionally with rounded corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub base: ShapeBase,
    pub direction: Option<f64>,
    /// Center.
    pub position: Option<MultiDimensional>,
    pub size: Option<MultiDimensional>,
    /// Corner radius.
    pub rounded: Option<Value>,
}

impl Default for Rect {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            direction: Some(0.0),
            position: Some(NVector::xy(0.0, 0.0).into()),
            size: Some(NVector::xy(0.0, 0.0).into()),
            rounded: Some(0.0.into()),
        }
    }
}

impl Rect {
    pub fn new(position: NVector, size: NVector) -> Self {
        Self {
            position: Some(position.into()),
            size: Some(size.into()),
            ..Default::default()
        }
    }

    pub fn bounding_box(&self, time: f64) -> BoundingBox {
        let position = vector_at(&self.position, time);
        let half = vector_at(&self.size, time) / 2.0;
        BoundingBox::new(
            position[0] - half[0],
            position[1] - half[1],
            position[0] + half[0],
            position[1] + half[1],
        )
    }

    /// Outline at `time`, clockwise from the top left corner.
    pub fn bezier_at(&self, time: f64) -> Bezier {
        let bbox = self.bounding_box(time);
        let mut bezier = Bezier::new();
        let Some([tl, tr, br, bl]) = bbox.corners() else {
            return bezier;
        };
        let radius = scalar_at(&self.rounded, time);
        if radius == 0.0 {
            bezier.add_point(tl).add_point(tr).add_point(br).add_point(bl);
        } else {
            let zero = NVector::zeros(2);
            let hh = NVector::xy(radius / 2.0, 0.0);
            let vh = NVector::xy(0.0, radius / 2.0);
            let hd = NVector::xy(radius, 0.0);
            let vd = NVector::xy(0.0, radius);
            bezier
                .add_point_with(&tl + &vd, zero.clone(), -&vh)
                .add_point_with(&tl + &hd, -&hh, zero.clone())
                .add_point_with(&tr - &hd, zero.clone(), hh.clone())
                .add_point_with(&tr + &vd, -&vh, zero.clone())
                .add_point_with(&br - &vd, zero.clone(), vh.clone())
                .add_point_with(&br - &hd, hh.clone(), zero.clone())
                .add_point_with(&bl + &hd, zero.clone(), -&hh)
                .add_point_with(&bl - &vd, vh, zero);
        }
        bezier.close(true);
        bezier
    }

    pub fn to_bezier(&self) -> Path {
        let mut times = Vec::new();
        collect_times(&mut times, &self.position);
        collect_times(&mut times, &self.size);
        collect_times(&mut times, &self.rounded);
        path_from(&self.base, sample_shape(times, |t| self.bezier_at(t)))
    }
}

shape_schema!(Rect, "rc", vec![
    scalar_field!(Rect, "direction", "d", direction),
    scalar_field!(Rect, "position", "p", position),
    scalar_field!(Rect, "size", "s", size),
    scalar_field!(Rect, "rounded", "r", rounded),
]);

/// Ellipse fitted in a box of `size` centered on `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub base: ShapeBase,
    pub direction: Option<f64>,
    pub position: Option<MultiDimensional>,
    pub size: Option<MultiDimensional>,
}

impl Default for Ellipse {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            direction: Some(0.0),
            position: Some(NVector::xy(0.0, 0.0).into()),
            size: Some(NVector::xy(0.0, 0.0).into()),
        }
    }
}

impl Ellipse {
    pub fn new(position: NVector, size: NVector) -> Self {
        Self {
            position: Some(position.into()),
            size: Some(size.into()),
            ..Default::default()
        }
    }

    pub fn bounding_box(&self, time: f64) -> BoundingBox {
        let position = vector_at(&self.position, time);
        let half = vector_at(&self.size, time) / 2.0;
        BoundingBox::new(
            position[0] - half[0],
            position[1] - half[1],
            position[0] + half[0],
            position[1] + half[1],
        )
    }

    pub fn bezier_at(&self, time: f64) -> Bezier {
        let position = vector_at(&self.position, time);
        let radii = vector_at(&self.size, time) / 2.0;
        let arc = EllipseArc::new(position, radii, 0.0);
        let mut bezier = Bezier::new();
        // The last point closes the loop onto the first.
        for point in arc.to_bezier(0.0, 2.0 * PI).into_iter().skip(1) {
            bezier.add_bezier_point(point);
        }
        bezier.close(true);
        bezier
    }

    pub fn to_bezier(&self) -> Path {
        let mut times = Vec::new();
        collect_times(&mut times, &self.position);
        collect_times(&mut times, &self.size);
        path_from(&self.base, sample_shape(times, |t| self.bezier_at(t)))
    }
}

shape_schema!(Ellipse, "el", vec![
    scalar_field!(Ellipse, "direction", "d", direction),
    scalar_field!(Ellipse, "position", "p", position),
    scalar_field!(Ellipse, "size", "s", size),
]);

/// Star or regular polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub base: ShapeBase,
    pub direction: Option<f64>,
    pub position: Option<MultiDimensional>,
    /// Only used by [`StarType::Star`].
    pub inner_radius: Option<Value>,
    /// Percent.
    pub inner_roundness: Option<Value>,
    pub outer_radius: Option<Value>,
    /// Percent.
    pub outer_roundness: Option<Value>,
    /// Degrees, clockwise.
    pub rotation: Option<Value>,
    pub points: Option<Value>,
    pub star_type: Option<StarType>,
}

impl Default for Star {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            direction: Some(0.0),
            position: Some(NVector::xy(0.0, 0.0).into()),
            inner_radius: Some(0.0.into()),
            inner_roundness: Some(0.0.into()),
            outer_radius: Some(0.0.into()),
            outer_roundness: Some(0.0.into()),
            rotation: Some(0.0.into()),
            points: Some(5.0.into()),
            star_type: Some(StarType::Star),
        }
    }
}

impl Star {
    pub fn bounding_box(&self, time: f64) -> BoundingBox {
        let position = vector_at(&self.position, time);
        let radius = scalar_at(&self.outer_radius, time);
        BoundingBox::new(
            position[0] - radius,
            position[1] - radius,
            position[0] + radius,
            position[1] + radius,
        )
    }

    /// Outline at `time`. The first outer point is straight above the
    /// center when the rotation is zero. Point counts are clamped to
    /// [`MAX_STAR_POINTS`]; a count below 1 or NaN gives an empty outline.
    pub fn bezier_at(&self, time: f64) -> Bezier {
        let mut bezier = Bezier::new();
        let points = self
            .points
            .as_ref()
            .and_then(|p| p.get_value_interpolated(time))
            .unwrap_or(5.0)
            .round();
        if points.is_nan() || points < 1.0 {
            bezier.close(true);
            return bezier;
        }
        let points = if points > MAX_STAR_POINTS {
            warn!(points, max = MAX_STAR_POINTS, "star point count clamped");
            MAX_STAR_POINTS
        } else {
            points
        };
        let position = vector_at(&self.position, time);
        let outer = scalar_at(&self.outer_radius, time);
        let inner = scalar_at(&self.inner_radius, time);
        let rotation = -scalar_at(&self.rotation, time).to_radians() + PI;
        let half_step = -PI / points;
        let with_inner = self.star_type.unwrap_or(StarType::Star) == StarType::Star;

        let at = |angle: f64, radius: f64| {
            &position + &NVector::xy(radius * angle.sin(), radius * angle.cos())
        };
        for i in 0..points as usize {
            let angle = rotation + i as f64 * 2.0 * half_step;
            bezier.add_point(at(angle, outer));
            if with_inner {
                bezier.add_point(at(angle + half_step, inner));
            }
        }
        bezier.close(true);
        bezier
    }

    pub fn to_bezier(&self) -> Path {
        let mut times = Vec::new();
        collect_times(&mut times, &self.position);
        collect_times(&mut times, &self.inner_radius);
        collect_times(&mut times, &self.outer_radius);
        collect_times(&mut times, &self.rotation);
        collect_times(&mut times, &self.points);
        path_from(&self.base, sample_shape(times, |t| self.bezier_at(t)))
    }
}

shape_schema!(Star, "sr", vec![
    scalar_field!(Star, "direction", "d", direction),
    scalar_field!(Star, "position", "p", position),
    scalar_field!(Star, "inner_radius", "ir", inner_radius),
    scalar_field!(Star, "inner_roundness", "is", inner_roundness),
    scalar_field!(Star, "outer_radius", "or", outer_radius),
    scalar_field!(Star, "outer_roundness", "os", outer_roundness),
    scalar_field!(Star, "rotation", "r", rotation),
    scalar_field!(Star, "points", "pt", points),
    scalar_field!(Star, "star_type", "sy", star_type),
]);

/// Free form Bezier path.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub base: ShapeBase,
    pub direction: Option<f64>,
    pub shape: Option<ShapeProperty>,
    pub index: Option<i64>,
}

impl Default for Path {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            direction: Some(0.0),
            shape: Some(Bezier::new().into()),
            index: None,
        }
    }
}

impl Path {
    pub fn new(bezier: Bezier) -> Self {
        Self {
            shape: Some(bezier.into()),
            ..Default::default()
        }
    }

    pub fn bounding_box(&self, time: f64) -> BoundingBox {
        self.shape
            .as_ref()
            .and_then(|s| s.get_value_interpolated(time))
            .map(|b| b.bounding_box())
            .unwrap_or_default()
    }
}

shape_schema!(Path, "sh", vec![
    scalar_field!(Path, "direction", "d", direction),
    scalar_field!(Path, "shape", "ks", shape),
    scalar_field!(Path, "index", "ind", index),
]);

/// Shape group. The last item is always the group's [`TransformShape`].
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub base: ShapeBase,
    pub number_of_properties: Option<f64>,
    pub shapes: Vec<ShapeElement>,
}

impl Default for Group {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            number_of_properties: None,
            shapes: vec![TransformShape::default().into()],
        }
    }
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transform(&self) -> Option<&TransformShape> {
        match self.shapes.last() {
            Some(ShapeElement::Transform(transform)) => Some(transform),
            _ => None,
        }
    }

    pub fn transform_mut(&mut self) -> Option<&mut TransformShape> {
        match self.shapes.last_mut() {
            Some(ShapeElement::Transform(transform)) => Some(transform),
            _ => None,
        }
    }

    /// Appends a shape, keeping the transform last.
    pub fn add_shape(&mut self, shape: impl Into<ShapeElement>) -> &mut ShapeElement {
        let index = if self.transform().is_some() {
            self.shapes.len() - 1
        } else {
            self.shapes.len()
        };
        self.insert_shape(index, shape)
    }

    /// Inserts a shape at `index`, clamped to the group size.
    pub fn insert_shape(&mut self, index: usize, shape: impl Into<ShapeElement>) -> &mut ShapeElement {
        let index = index.min(self.shapes.len());
        self.shapes.insert(index, shape.into());
        &mut self.shapes[index]
    }

    /// Bounds of the contents at `time`, in the group's parent coordinates.
    pub fn bounding_box(&self, time: f64) -> BoundingBox {
        let mut bbox = BoundingBox::default();
        for shape in &self.shapes {
            bbox.expand(&shape.bounding_box(time));
        }
        let (Some(transform), Some(corners)) = (self.transform(), bbox.corners()) else {
            return bbox;
        };
        let matrix = transform.transform.to_matrix(time, false);
        let mut transformed = BoundingBox::default();
        for corner in corners {
            let point = matrix.apply(&corner);
            transformed.include(point[0], point[1]);
        }
        transformed
    }
}

fn move_transform_last(group: &mut Group, _dict: &Dict) -> LottieResult<()> {
    let mut transform = None;
    let mut shapes = Vec::with_capacity(group.shapes.len());
    for shape in std::mem::take(&mut group.shapes) {
        match shape {
            ShapeElement::Transform(t) => {
                if transform.is_none() {
                    transform = Some(t);
                }
            }
            other => shapes.push(other),
        }
    }
    let transform = transform.unwrap_or_else(|| {
        warn!(name = ?group.base.name, "group without a transform, adding a default one");
        TransformShape::default()
    });
    shapes.push(transform.into());
    group.shapes = shapes;
    Ok(())
}

shape_schema!(
    Group,
    "gr",
    vec![
        scalar_field!(Group, "number_of_properties", "np", number_of_properties),
        Prop::items(
            "shapes",
            "it",
            |o: &Group| &o.shapes,
            |o: &mut Group| &mut o.shapes,
        ),
    ],
    after_load = move_transform_last
);

/// Transform of a group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransformShape {
    pub base: ShapeBase,
    pub transform: Transform,
}

impl HasTransform for TransformShape {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

shape_schema!(TransformShape, "tr", transform_props::<TransformShape>());

/// Solid fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub base: ShapeBase,
    pub opacity: Option<Value>,
    /// RGB in `[0, 1]`.
    pub color: Option<MultiDimensional>,
    pub fill_rule: Option<FillRule>,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            opacity: Some(100.0.into()),
            color: Some(NVector::xyz(1.0, 1.0, 1.0).into()),
            fill_rule: None,
        }
    }
}

impl Fill {
    pub fn new(color: NVector) -> Self {
        Self {
            color: Some(color.into()),
            ..Default::default()
        }
    }
}

shape_schema!(Fill, "fl", vec![
    scalar_field!(Fill, "opacity", "o", opacity),
    scalar_field!(Fill, "color", "c", color),
    scalar_field!(Fill, "fill_rule", "r", fill_rule),
]);

/// Gradient geometry and colors shared by gradient fills and strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub start_point: Option<MultiDimensional>,
    pub end_point: Option<MultiDimensional>,
    pub gradient_type: Option<GradientType>,
    /// Radial gradients only, percent.
    pub highlight_length: Option<Value>,
    /// Radial gradients only, degrees.
    pub highlight_angle: Option<Value>,
    pub colors: Option<GradientColors>,
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            start_point: Some(NVector::xy(0.0, 0.0).into()),
            end_point: Some(NVector::xy(0.0, 0.0).into()),
            gradient_type: Some(GradientType::Linear),
            highlight_length: Some(0.0.into()),
            highlight_angle: Some(0.0.into()),
            colors: Some(GradientColors::default()),
        }
    }
}

pub trait HasGradient: 'static {
    fn gradient(&self) -> &Gradient;
    fn gradient_mut(&mut self) -> &mut Gradient;
}

fn gradient_props<O: HasGradient>() -> Vec<Prop<O>> {
    vec![
        Prop::scalar(
            "start_point",
            "s",
            |o: &O| &o.gradient().start_point,
            |o: &mut O| &mut o.gradient_mut().start_point,
        ),
        Prop::scalar(
            "end_point",
            "e",
            |o: &O| &o.gradient().end_point,
            |o: &mut O| &mut o.gradient_mut().end_point,
        ),
        Prop::scalar(
            "gradient_type",
            "t",
            |o: &O| &o.gradient().gradient_type,
            |o: &mut O| &mut o.gradient_mut().gradient_type,
        ),
        Prop::scalar(
            "highlight_length",
            "h",
            |o: &O| &o.gradient().highlight_length,
            |o: &mut O| &mut o.gradient_mut().highlight_length,
        ),
        Prop::scalar(
            "highlight_angle",
            "a",
            |o: &O| &o.gradient().highlight_angle,
            |o: &mut O| &mut o.gradient_mut().highlight_angle,
        ),
        Prop::scalar(
            "colors",
            "g",
            |o: &O| &o.gradient().colors,
            |o: &mut O| &mut o.gradient_mut().colors,
        ),
    ]
}

/// Stroke settings shared by solid and gradient strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub line_cap: Option<LineCap>,
    pub line_join: Option<LineJoin>,
    pub miter_limit: Option<f64>,
    pub opacity: Option<Value>,
    pub width: Option<Value>,
    pub dashes: Option<Vec<StrokeDash>>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            line_cap: Some(LineCap::Round),
            line_join: Some(LineJoin::Round),
            miter_limit: Some(0.0),
            opacity: Some(100.0.into()),
            width: Some(1.0.into()),
            dashes: None,
        }
    }
}

pub trait HasStroke: 'static {
    fn stroke(&self) -> &StrokeStyle;
    fn stroke_mut(&mut self) -> &mut StrokeStyle;
}

fn stroke_props<O: HasStroke>() -> Vec<Prop<O>> {
    vec![
        Prop::scalar(
            "line_cap",
            "lc",
            |o: &O| &o.stroke().line_cap,
            |o: &mut O| &mut o.stroke_mut().line_cap,
        ),
        Prop::scalar(
            "line_join",
            "lj",
            |o: &O| &o.stroke().line_join,
            |o: &mut O| &mut o.stroke_mut().line_join,
        ),
        Prop::scalar(
            "miter_limit",
            "ml",
            |o: &O| &o.stroke().miter_limit,
            |o: &mut O| &mut o.stroke_mut().miter_limit,
        ),
        Prop::scalar(
            "opacity",
            "o",
            |o: &O| &o.stroke().opacity,
            |o: &mut O| &mut o.stroke_mut().opacity,
        ),
        Prop::scalar(
            "width",
            "w",
            |o: &O| &o.stroke().width,
            |o: &mut O| &mut o.stroke_mut().width,
        ),
        Prop::list(
            "dashes",
            "d",
            |o: &O| &o.stroke().dashes,
            |o: &mut O| &mut o.stroke_mut().dashes,
        ),
    ]
}

/// Solid stroke.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub base: ShapeBase,
    pub style: StrokeStyle,
    pub color: Option<MultiDimensional>,
}

impl Default for Stroke {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            style: StrokeStyle::default(),
            color: Some(NVector::xyz(0.0, 0.0, 0.0).into()),
        }
    }
}

impl Stroke {
    pub fn new(color: NVector, width: f64) -> Self {
        let mut stroke = Self {
            color: Some(color.into()),
            ..Default::default()
        };
        stroke.style.width = Some(width.into());
        stroke
    }
}

impl HasStroke for Stroke {
    fn stroke(&self) -> &StrokeStyle {
        &self.style
    }

    fn stroke_mut(&mut self) -> &mut StrokeStyle {
        &mut self.style
    }
}

shape_schema!(Stroke, "st", {
    let mut props = stroke_props::<Stroke>();
    props.push(scalar_field!(Stroke, "color", "c", color));
    props
});

#[derive(Debug, Clone, PartialEq)]
pub struct GradientFill {
    pub base: ShapeBase,
    pub gradient: Gradient,
    pub opacity: Option<Value>,
    pub fill_rule: Option<FillRule>,
}

impl Default for GradientFill {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            gradient: Gradient::default(),
            opacity: Some(100.0.into()),
            fill_rule: None,
        }
    }
}

impl HasGradient for GradientFill {
    fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    fn gradient_mut(&mut self) -> &mut Gradient {
        &mut self.gradient
    }
}

shape_schema!(GradientFill, "gf", {
    let mut props = gradient_props::<GradientFill>();
    props.push(scalar_field!(GradientFill, "opacity", "o", opacity));
    props.push(scalar_field!(GradientFill, "fill_rule", "r", fill_rule));
    props
});

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientStroke {
    pub base: ShapeBase,
    pub style: StrokeStyle,
    pub gradient: Gradient,
}

impl HasStroke for GradientStroke {
    fn stroke(&self) -> &StrokeStyle {
        &self.style
    }

    fn stroke_mut(&mut self) -> &mut StrokeStyle {
        &mut self.style
    }
}

impl HasGradient for GradientStroke {
    fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    fn gradient_mut(&mut self) -> &mut Gradient {
        &mut self.gradient
    }
}

shape_schema!(GradientStroke, "gs", {
    let mut props = stroke_props::<GradientStroke>();
    props.extend(gradient_props::<GradientStroke>());
    props
});

/// One entry of a stroke dash pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeDash {
    pub name: Option<String>,
    pub dash_type: Option<StrokeDashType>,
    pub length: Option<Value>,
}

impl Default for StrokeDash {
    fn default() -> Self {
        Self::new(0.0, StrokeDashType::Dash)
    }
}

impl StrokeDash {
    pub fn new(length: f64, dash_type: StrokeDashType) -> Self {
        Self {
            name: Some(dash_type.label().to_string()),
            dash_type: Some(dash_type),
            length: Some(length.into()),
        }
    }
}

impl Schema for StrokeDash {
    const CLASS: &'static str = "StrokeDash";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<StrokeDash>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            vec![
                scalar_field!(StrokeDash, "name", "nm", name),
                scalar_field!(StrokeDash, "dash_type", "n", dash_type),
                scalar_field!(StrokeDash, "length", "v", length),
            ]
        })
    }
}

crate::schema_object!(StrokeDash);

/// Draws only part of the paths before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Trim {
    pub base: ShapeBase,
    /// Percent.
    pub start: Option<Value>,
    /// Percent.
    pub end: Option<Value>,
    /// Degrees.
    pub offset: Option<Value>,
    pub multiple: Option<TrimMultipleShapes>,
}

impl Default for Trim {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            start: Some(0.0.into()),
            end: Some(100.0.into()),
            offset: Some(0.0.into()),
            multiple: None,
        }
    }
}

shape_schema!(Trim, "tm", vec![
    scalar_field!(Trim, "start", "s", start),
    scalar_field!(Trim, "end", "e", end),
    scalar_field!(Trim, "offset", "o", offset),
    scalar_field!(Trim, "multiple", "m", multiple),
]);

/// Transform applied between repeater copies, with an opacity ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct RepeaterTransform {
    pub transform: Transform,
    pub start_opacity: Option<Value>,
    pub end_opacity: Option<Value>,
}

impl Default for RepeaterTransform {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            start_opacity: Some(100.0.into()),
            end_opacity: Some(100.0.into()),
        }
    }
}

impl HasTransform for RepeaterTransform {
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }
}

impl Schema for RepeaterTransform {
    const CLASS: &'static str = "RepeaterTransform";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<RepeaterTransform>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            let mut props = transform_props::<RepeaterTransform>();
            props.push(scalar_field!(RepeaterTransform, "start_opacity", "so", start_opacity));
            props.push(scalar_field!(RepeaterTransform, "end_opacity", "eo", end_opacity));
            props
        })
    }
}

crate::schema_object!(RepeaterTransform);

/// Duplicates the shapes before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Repeater {
    pub base: ShapeBase,
    pub copies: Option<Value>,
    pub offset: Option<Value>,
    pub composite: Option<Composite>,
    pub transform: Option<RepeaterTransform>,
}

impl Default for Repeater {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            copies: Some(1.0.into()),
            offset: Some(0.0.into()),
            composite: Some(Composite::Above),
            transform: Some(RepeaterTransform::default()),
        }
    }
}

impl Repeater {
    pub fn new(copies: f64) -> Self {
        Self {
            copies: Some(copies.into()),
            ..Default::default()
        }
    }
}

shape_schema!(Repeater, "rp", vec![
    scalar_field!(Repeater, "copies", "c", copies),
    scalar_field!(Repeater, "offset", "o", offset),
    scalar_field!(Repeater, "composite", "m", composite),
    scalar_field!(Repeater, "transform", "tr", transform),
]);

#[derive(Debug, Clone, PartialEq)]
pub struct RoundedCorners {
    pub base: ShapeBase,
    pub radius: Option<Value>,
}

impl Default for RoundedCorners {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            radius: Some(0.0.into()),
        }
    }
}

shape_schema!(RoundedCorners, "rd", vec![scalar_field!(RoundedCorners, "radius", "r", radius)]);

/// Boolean combination of the paths before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub base: ShapeBase,
    pub merge_mode: Option<f64>,
}

impl Default for Merge {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            merge_mode: Some(1.0),
        }
    }
}

shape_schema!(Merge, "mm", vec![scalar_field!(Merge, "merge_mode", "mm", merge_mode)]);

#[derive(Debug, Clone, PartialEq)]
pub struct Twist {
    pub base: ShapeBase,
    pub angle: Option<Value>,
    pub center: Option<PositionValue>,
}

impl Default for Twist {
    fn default() -> Self {
        Self {
            base: ShapeBase::default(),
            angle: Some(0.0.into()),
            center: Some(NVector::xy(0.0, 0.0).into()),
        }
    }
}

shape_schema!(Twist, "tw", vec![
    scalar_field!(Twist, "angle", "a", angle),
    scalar_field!(Twist, "center", "c", center),
]);

macro_rules! shape_elements {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        /// Any item of a shape list.
        #[derive(Debug, Clone, PartialEq)]
        pub enum ShapeElement {
            $($variant($ty),)+
            /// A shape built by a registered [`Extension`](crate::registry::Extension).
            Custom(CustomShape),
        }

        $(
            impl From<$ty> for ShapeElement {
                fn from(shape: $ty) -> Self {
                    ShapeElement::$variant(shape)
                }
            }
        )+

        impl From<CustomShape> for ShapeElement {
            fn from(shape: CustomShape) -> Self {
                ShapeElement::Custom(shape)
            }
        }

        impl ShapeElement {
            /// Tags accepted by [`LottieObject::load`].
            pub const TYPES: &'static [&'static str] = &[$(<$ty as ShapeVariant>::TYPE),+];

            fn node(&self) -> &dyn Node {
                match self {
                    $(ShapeElement::$variant(shape) => shape,)+
                    ShapeElement::Custom(shape) => shape,
                }
            }

            pub fn base(&self) -> &ShapeBase {
                match self {
                    $(ShapeElement::$variant(shape) => shape.base(),)+
                    ShapeElement::Custom(shape) => shape.wrapped.base(),
                }
            }

            pub fn base_mut(&mut self) -> &mut ShapeBase {
                match self {
                    $(ShapeElement::$variant(shape) => shape.base_mut(),)+
                    ShapeElement::Custom(shape) => shape.wrapped.base_mut(),
                }
            }

            /// The `ty` tag written for this element.
            pub fn type_tag(&self) -> &'static str {
                match self {
                    $(ShapeElement::$variant(_) => <$ty as ShapeVariant>::TYPE,)+
                    ShapeElement::Custom(shape) => shape.wrapped.type_tag(),
                }
            }

            fn load_tagged(tag: &str, dict: &Dict) -> LottieResult<Self> {
                $(
                    if tag == <$ty as ShapeVariant>::TYPE {
                        return <$ty as LottieObject>::load(dict).map(ShapeElement::$variant);
                    }
                )+
                Err(LottieError::unknown_discriminator("shape", tag))
            }

            fn dict(&self) -> LottieResult<Dict> {
                match self {
                    $(ShapeElement::$variant(shape) => shape.to_dict(),)+
                    ShapeElement::Custom(shape) => shape.to_dict(),
                }
            }
        }
    };
}

shape_elements! {
    Rect(Rect),
    Ellipse(Ellipse),
    Star(Star),
    Path(Path),
    Group(Group),
    Fill(Fill),
    Stroke(Stroke),
    GradientFill(GradientFill),
    GradientStroke(GradientStroke),
    Transform(TransformShape),
    Trim(Trim),
    Repeater(Repeater),
    RoundedCorners(RoundedCorners),
    Merge(Merge),
    Twist(Twist),
}

impl ShapeElement {
    pub fn name(&self) -> Option<&str> {
        self.base().name.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.base().hidden == Some(true)
    }

    /// Bounds at `time`. Styles and modifiers have null bounds.
    pub fn bounding_box(&self, time: f64) -> BoundingBox {
        match self {
            ShapeElement::Rect(shape) => shape.bounding_box(time),
            ShapeElement::Ellipse(shape) => shape.bounding_box(time),
            ShapeElement::Star(shape) => shape.bounding_box(time),
            ShapeElement::Path(shape) => shape.bounding_box(time),
            ShapeElement::Group(shape) => shape.bounding_box(time),
            ShapeElement::Custom(shape) => shape.wrapped.bounding_box(time),
            _ => BoundingBox::default(),
        }
    }

    /// The element as an explicit path, for geometry elements.
    pub fn to_bezier(&self) -> Option<Path> {
        match self {
            ShapeElement::Rect(shape) => Some(shape.to_bezier()),
            ShapeElement::Ellipse(shape) => Some(shape.to_bezier()),
            ShapeElement::Star(shape) => Some(shape.to_bezier()),
            ShapeElement::Path(shape) => Some(shape.clone()),
            ShapeElement::Custom(shape) => shape.wrapped.to_bezier(),
            _ => None,
        }
    }
}

impl Node for ShapeElement {
    fn class_name(&self) -> &'static str {
        self.node().class_name()
    }

    fn property(&self, name: &str) -> Option<Json> {
        self.node().property(name)
    }

    fn children(&self) -> Vec<&dyn Node> {
        self.node().children()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self.node().as_any()
    }
}

impl LottieValue for ShapeElement {
    const TYPE_NAME: &'static str = "ShapeElement";

    fn to_json(&self) -> LottieResult<Json> {
        self.dict().map(Json::Object)
    }

    fn from_json(value: &Json) -> LottieResult<Self> {
        Self::load(expect_object(value)?)
    }

    fn as_node(&self) -> Option<&dyn Node> {
        Some(self.node())
    }
}

impl LottieObject for ShapeElement {
    fn to_dict(&self) -> LottieResult<Dict> {
        self.dict()
    }

    /// Picks the variant from `ty`, or the registered extension named by the
    /// extension key.
    fn load(dict: &Dict) -> LottieResult<Self> {
        if dict.contains_key(EXTENSION_KEY) {
            return CustomShape::load(dict).map(ShapeElement::Custom);
        }
        let tag = match dict.get("ty") {
            Some(Json::String(tag)) => tag.as_str(),
            Some(other) => return Err(LottieError::unknown_discriminator("shape", other)),
            None => {
                return Err(LottieError::MissingDiscriminator {
                    kind: "shape".into(),
                    key: "ty".into(),
                })
            }
        };
        debug!(ty = tag, "loading shape element");
        Self::load_tagged(tag, dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load_shape(value: Json) -> LottieResult<ShapeElement> {
        ShapeElement::load(value.as_object().unwrap())
    }

    #[test]
    fn test_star_wire_form() {
        let star = Star {
            inner_radius: Some(64.0.into()),
            outer_radius: Some(128.0.into()),
            points: Some(5.0.into()),
            position: Some(NVector::xy(256.0, 256.0).into()),
            ..Default::default()
        };
        let dict = star.to_dict().unwrap();
        assert_eq!(dict["ty"], json!("sr"));
        assert_eq!(dict["pt"], json!({"a": 0, "k": 5}));
        assert_eq!(dict["ir"], json!({"a": 0, "k": 64}));
        assert_eq!(dict["sy"], json!(1));
        assert!(!dict.contains_key("nm"));
    }

    #[test]
    fn test_star_outline() {
        let star = Star {
            inner_radius: Some(5.0.into()),
            outer_radius: Some(10.0.into()),
            ..Default::default()
        };
        let bezier = star.bezier_at(0.0);
        assert_eq!(bezier.len(), 10);
        assert!(bezier.closed);
        assert!((bezier.vertices[0][0]).abs() < 1e-6);
        assert!((bezier.vertices[0][1] + 10.0).abs() < 1e-6);

        let polygon = Star {
            star_type: Some(StarType::Polygon),
            points: Some(6.0.into()),
            outer_radius: Some(10.0.into()),
            ..Default::default()
        };
        assert_eq!(polygon.bezier_at(0.0).len(), 6);
    }

    #[test]
    fn test_star_point_count_bounds() {
        let star = |points: f64| Star {
            star_type: Some(StarType::Polygon),
            points: Some(points.into()),
            outer_radius: Some(10.0.into()),
            ..Default::default()
        };
        assert_eq!(star(1e12).bezier_at(0.0).len(), MAX_STAR_POINTS as usize);
        assert!(star(-3.0).bezier_at(0.0).is_empty());
        assert!(star(f64::NAN).bezier_at(0.0).is_empty());

        let loaded = load_shape(json!({"ty": "sr", "pt": {"a": 0, "k": 1e12}, "or": {"a": 0, "k": 10}}))
            .unwrap();
        let ShapeElement::Star(loaded) = loaded else {
            panic!("expected a star");
        };
        assert_eq!(loaded.bezier_at(0.0).len(), 2 * MAX_STAR_POINTS as usize);
    }

    #[test]
    fn test_rect_outline() {
        let rect = Rect::new(NVector::xy(50.0, 50.0), NVector::xy(20.0, 10.0));
        let bezier = rect.bezier_at(0.0);
        assert_eq!(
            bezier.vertices,
            vec![
                NVector::xy(40.0, 45.0),
                NVector::xy(60.0, 45.0),
                NVector::xy(60.0, 55.0),
                NVector::xy(40.0, 55.0),
            ]
        );
        assert!(bezier.closed);

        let rounded = Rect {
            rounded: Some(2.0.into()),
            ..rect
        };
        let bezier = rounded.bezier_at(0.0);
        assert_eq!(bezier.len(), 8);
        assert_eq!(bezier.vertices[0], NVector::xy(40.0, 47.0));
        assert_eq!(bezier.vertices[1], NVector::xy(42.0, 45.0));
        assert_eq!(bezier.out_tangents[0], NVector::xy(0.0, -1.0));
    }

    #[test]
    fn test_animated_rect_holds_values_between_keyframes() {
        let mut rect = Rect::default();
        if let Some(position) = rect.position.as_mut() {
            position.add_keyframe(0.0, NVector::xy(10.0, 10.0), Easing::Linear);
            position.add_keyframe(30.0, NVector::xy(50.0, 50.0), Easing::Linear);
        }
        let position = rect.position.as_ref().unwrap();
        assert_eq!(position.get_value(15.0), Some(NVector::xy(10.0, 10.0)));
        assert_eq!(position.get_value(30.0), Some(NVector::xy(50.0, 50.0)));
    }

    #[test]
    fn test_animated_rect_to_bezier() {
        let mut rect = Rect::new(NVector::xy(0.0, 0.0), NVector::xy(10.0, 10.0));
        if let Some(size) = rect.size.as_mut() {
            size.add_keyframe(0.0, NVector::xy(10.0, 10.0), Easing::Linear);
            size.add_keyframe(20.0, NVector::xy(20.0, 20.0), Easing::Linear);
        }
        let path = rect.to_bezier();
        let shape = path.shape.unwrap();
        let keyframes = shape.keyframes().unwrap();
        assert_eq!(keyframes.len(), 2);
        assert_eq!(keyframes[1].time, 20.0);
        assert_eq!(
            keyframes[1].start.as_ref().unwrap().vertices[0],
            NVector::xy(-10.0, -10.0)
        );
    }

    #[test]
    fn test_ellipse_outline() {
        let ellipse = Ellipse::new(NVector::xy(0.0, 0.0), NVector::xy(20.0, 10.0));
        let bezier = ellipse.bezier_at(0.0);
        assert_eq!(bezier.len(), 4);
        assert!(bezier.closed);
        let bbox = ellipse.bounding_box(0.0);
        assert_eq!(bbox, BoundingBox::new(-10.0, -5.0, 10.0, 5.0));
    }

    #[test]
    fn test_group_keeps_transform_last() {
        let mut group = Group::new();
        group.add_shape(Rect::default());
        group.add_shape(Fill::default());
        let tags: Vec<_> = group.shapes.iter().map(|s| s.type_tag()).collect();
        assert_eq!(tags, vec!["rc", "fl", "tr"]);
        group.insert_shape(0, Ellipse::default());
        assert_eq!(group.shapes[0].type_tag(), "el");
    }

    #[test]
    fn test_group_load_moves_transform_to_end() {
        let shape = load_shape(json!({
            "ty": "gr",
            "it": [
                {"ty": "tr", "nm": "first"},
                {"ty": "rc"},
                {"ty": "tr", "nm": "second"},
                {"ty": "fl"}
            ]
        }))
        .unwrap();
        let ShapeElement::Group(group) = shape else {
            panic!("expected a group");
        };
        let tags: Vec<_> = group.shapes.iter().map(|s| s.type_tag()).collect();
        assert_eq!(tags, vec!["rc", "fl", "tr"]);
        assert_eq!(group.shapes[2].name(), Some("first"));

        let shape = load_shape(json!({"ty": "gr", "it": [{"ty": "el"}]})).unwrap();
        let ShapeElement::Group(group) = shape else {
            panic!("expected a group");
        };
        assert_eq!(group.shapes.len(), 2);
        assert!(group.transform().is_some());
    }

    #[test]
    fn test_group_bounding_box_applies_transform() {
        let mut group = Group::new();
        group.add_shape(Rect::new(NVector::xy(0.0, 0.0), NVector::xy(10.0, 10.0)));
        if let Some(transform) = group.transform_mut() {
            transform.transform.position = Some(NVector::xy(100.0, 0.0).into());
            transform.transform.scale = Some(NVector::xy(200.0, 200.0).into());
        }
        let bbox = ShapeElement::from(group).bounding_box(0.0);
        assert_eq!(bbox, BoundingBox::new(90.0, -10.0, 110.0, 10.0));
    }

    #[test]
    fn test_styles_have_null_bounds() {
        assert!(ShapeElement::from(Fill::default()).bounding_box(0.0).is_null());
        assert!(ShapeElement::from(GradientStroke::default()).bounding_box(0.0).is_null());
    }

    #[test]
    fn test_round_trip_every_variant() {
        let mut stroke = Stroke::new(NVector::xyz(1.0, 0.0, 0.0), 4.0);
        stroke.style.dashes = Some(vec![
            StrokeDash::new(5.0, StrokeDashType::Dash),
            StrokeDash::new(2.0, StrokeDashType::Gap),
        ]);
        let shapes: Vec<ShapeElement> = vec![
            Rect::default().into(),
            Ellipse::default().into(),
            Star::default().into(),
            Path::default().into(),
            Group::default().into(),
            Fill::default().into(),
            stroke.into(),
            GradientFill::default().into(),
            GradientStroke::default().into(),
            TransformShape::default().into(),
            Trim::default().into(),
            Repeater::new(3.0).into(),
            RoundedCorners::default().into(),
            Merge::default().into(),
            Twist::default().into(),
        ];
        assert_eq!(shapes.len(), ShapeElement::TYPES.len());
        for shape in shapes {
            let dict = shape.to_dict().unwrap();
            assert_eq!(dict["ty"], json!(shape.type_tag()));
            let loaded = ShapeElement::load(&dict).unwrap();
            assert_eq!(loaded.to_dict().unwrap(), dict);
            assert_eq!(loaded, shape);
        }
    }

    #[test]
    fn test_stroke_dash_wire_form() {
        let dash = StrokeDash::new(3.0, StrokeDashType::Offset);
        assert_eq!(
            Json::Object(dash.to_dict().unwrap()),
            json!({"nm": "offset", "n": "o", "v": {"a": 0, "k": 3}})
        );
    }

    #[test]
    fn test_unknown_and_missing_type() {
        let err = load_shape(json!({"ty": "zz"})).unwrap_err();
        assert!(matches!(
            err,
            LottieError::UnknownDiscriminator { ref kind, ref tag } if kind == "shape" && tag == "zz"
        ));
        let err = load_shape(json!({"nm": "no type"})).unwrap_err();
        assert!(matches!(err, LottieError::MissingDiscriminator { .. }));

        let err = load_shape(json!({"ty": "gr", "it": [{"ty": "zz"}]})).unwrap_err();
        assert!(matches!(err.root_cause(), LottieError::UnknownDiscriminator { .. }));
    }

    #[test]
    fn test_find_through_groups() {
        let mut inner = Group::new();
        inner.base.name = Some("inner".into());
        let mut fill = Fill::new(NVector::xyz(1.0, 0.0, 0.0));
        fill.base.name = Some("red".into());
        inner.add_shape(fill);
        let mut outer = Group::new();
        outer.add_shape(inner);

        let found: &Fill = outer.find_as("red").unwrap();
        assert_eq!(
            found.color.as_ref().unwrap().static_value(),
            Some(&NVector::xyz(1.0, 0.0, 0.0))
        );
        assert_eq!(outer.find("inner").unwrap().class_name(), "Group");
    }

    #[test]
    fn test_path_to_bezier_is_a_copy() {
        let mut bezier = Bezier::new();
        bezier.add_point(NVector::xy(0.0, 0.0)).add_point(NVector::xy(4.0, 2.0));
        let path = ShapeElement::from(Path::new(bezier));
        let copy = path.to_bezier().unwrap();
        assert_eq!(ShapeElement::from(copy), path);
        assert_eq!(path.bounding_box(0.0), BoundingBox::new(0.0, 0.0, 4.0, 2.0));
        assert!(ShapeElement::from(Trim::default()).to_bezier().is_none());
    }
}
