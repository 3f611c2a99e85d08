//! Layers.

use std::sync::OnceLock;

use lottie_core::{LottieError, LottieResult};
use tracing::debug;

use crate::effects::Effect;
use crate::enums::{BlendMode, MatteMode};
use crate::helpers::{Mask, Transform};
use crate::object::{LottieObject, Node, Schema};
use crate::prop::{scalar_field, Prop};
use crate::properties::Value;
use crate::shapes::ShapeElement;
use crate::values::{expect_object, is_fractional, LottieValue, PseudoBool};
use crate::{Dict, Json};

/// Props shared by every layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerBase {
    pub threedimensional: Option<bool>,
    pub hidden: Option<bool>,
    pub name: Option<String>,
    /// `index` of the parent layer.
    pub parent_index: Option<i64>,
    /// Time stretch factor.
    pub stretch: Option<f64>,
    pub transform: Option<Transform>,
    pub auto_orient: Option<bool>,
    /// First visible frame.
    pub in_point: Option<f64>,
    /// Frame after the last visible one.
    pub out_point: Option<f64>,
    pub start_time: Option<f64>,
    pub blend_mode: Option<BlendMode>,
    pub matte_mode: Option<MatteMode>,
    pub index: Option<i64>,
    pub masks: Option<Vec<Mask>>,
    pub effects: Option<Vec<Effect>>,
    pub matte_target: Option<i64>,
}

impl Default for LayerBase {
    fn default() -> Self {
        Self {
            threedimensional: Some(false),
            hidden: None,
            name: None,
            parent_index: None,
            stretch: Some(1.0),
            transform: Some(Transform::default()),
            auto_orient: Some(false),
            in_point: None,
            out_point: None,
            start_time: Some(0.0),
            blend_mode: Some(BlendMode::Normal),
            matte_mode: None,
            index: None,
            masks: None,
            effects: None,
            matte_target: None,
        }
    }
}

impl LayerBase {
    pub fn has_masks(&self) -> Option<bool> {
        self.masks.as_ref().map(|masks| !masks.is_empty())
    }
}

/// A concrete layer type with its `ty` number.
pub trait LayerVariant: Schema {
    const TYPE: i64;

    fn base(&self) -> &LayerBase;
    fn base_mut(&mut self) -> &mut LayerBase;
}

fn base_props<O: LayerVariant>() -> Vec<Prop<O>> {
    vec![
        Prop::converted::<PseudoBool, _, _>(
            "threedimensional",
            "ddd",
            |o: &O| &o.base().threedimensional,
            |o: &mut O| &mut o.base_mut().threedimensional,
        ),
        Prop::scalar(
            "hidden",
            "hd",
            |o: &O| &o.base().hidden,
            |o: &mut O| &mut o.base_mut().hidden,
        ),
        Prop::computed("type", "ty", "int", |_: &O| Some(Json::from(O::TYPE))),
        Prop::scalar(
            "name",
            "nm",
            |o: &O| &o.base().name,
            |o: &mut O| &mut o.base_mut().name,
        ),
        Prop::scalar(
            "parent_index",
            "parent",
            |o: &O| &o.base().parent_index,
            |o: &mut O| &mut o.base_mut().parent_index,
        ),
        Prop::scalar(
            "stretch",
            "sr",
            |o: &O| &o.base().stretch,
            |o: &mut O| &mut o.base_mut().stretch,
        ),
        Prop::scalar(
            "transform",
            "ks",
            |o: &O| &o.base().transform,
            |o: &mut O| &mut o.base_mut().transform,
        ),
        Prop::converted::<PseudoBool, _, _>(
            "auto_orient",
            "ao",
            |o: &O| &o.base().auto_orient,
            |o: &mut O| &mut o.base_mut().auto_orient,
        ),
        Prop::scalar(
            "in_point",
            "ip",
            |o: &O| &o.base().in_point,
            |o: &mut O| &mut o.base_mut().in_point,
        ),
        Prop::scalar(
            "out_point",
            "op",
            |o: &O| &o.base().out_point,
            |o: &mut O| &mut o.base_mut().out_point,
        ),
        Prop::scalar(
            "start_time",
            "st",
            |o: &O| &o.base().start_time,
            |o: &mut O| &mut o.base_mut().start_time,
        ),
        Prop::scalar(
            "blend_mode",
            "bm",
            |o: &O| &o.base().blend_mode,
            |o: &mut O| &mut o.base_mut().blend_mode,
        ),
        Prop::scalar(
            "matte_mode",
            "tt",
            |o: &O| &o.base().matte_mode,
            |o: &mut O| &mut o.base_mut().matte_mode,
        ),
        Prop::scalar(
            "index",
            "ind",
            |o: &O| &o.base().index,
            |o: &mut O| &mut o.base_mut().index,
        ),
        Prop::computed("has_masks", "hasMask", "bool", |o: &O| {
            o.base().has_masks().map(Json::from)
        }),
        Prop::list(
            "masks",
            "masksProperties",
            |o: &O| &o.base().masks,
            |o: &mut O| &mut o.base_mut().masks,
        ),
        Prop::list(
            "effects",
            "ef",
            |o: &O| &o.base().effects,
            |o: &mut O| &mut o.base_mut().effects,
        ),
        Prop::scalar(
            "matte_target",
            "td",
            |o: &O| &o.base().matte_target,
            |o: &mut O| &mut o.base_mut().matte_target,
        ),
    ]
}

macro_rules! layer_schema {
    ($ty:ident, $type_id:literal, $props:expr) => {
        impl LayerVariant for $ty {
            const TYPE: i64 = $type_id;

            fn base(&self) -> &LayerBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut LayerBase {
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
        }

        crate::schema_object!($ty);
    };
}

/// Instance of a precomposition asset.
#[derive(Debug, Clone, PartialEq)]
pub struct PreCompLayer {
    pub base: LayerBase,
    /// `id` of the precomp asset.
    pub reference_id: Option<String>,
    pub time_remapping: Option<Value>,
    pub width: Option<i64>,
    pub height: Option<i64>,
}

impl Default for PreCompLayer {
    fn default() -> Self {
        Self::new("")
    }
}

impl PreCompLayer {
    pub fn new(reference_id: &str) -> Self {
        Self {
            base: LayerBase::default(),
            reference_id: Some(reference_id.to_string()),
            time_remapping: None,
            width: Some(512),
            height: Some(512),
        }
    }
}

layer_schema!(PreCompLayer, 0, vec![
    scalar_field!(PreCompLayer, "reference_id", "refId", reference_id),
    scalar_field!(PreCompLayer, "time_remapping", "tm", time_remapping),
    scalar_field!(PreCompLayer, "width", "w", width),
    scalar_field!(PreCompLayer, "height", "h", height),
]);

/// Rectangle filled with a single color.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidColorLayer {
    pub base: LayerBase,
    /// Hex color such as `#ff0000`.
    pub color: Option<String>,
    pub height: Option<f64>,
    pub width: Option<f64>,
}

impl Default for SolidColorLayer {
    fn default() -> Self {
        Self::new("", 512.0, 512.0)
    }
}

impl SolidColorLayer {
    pub fn new(color: &str, width: f64, height: f64) -> Self {
        Self {
            base: LayerBase::default(),
            color: Some(color.to_string()),
            height: Some(height),
            width: Some(width),
        }
    }
}

layer_schema!(SolidColorLayer, 1, vec![
    scalar_field!(SolidColorLayer, "color", "sc", color),
    scalar_field!(SolidColorLayer, "height", "sh", height),
    scalar_field!(SolidColorLayer, "width", "sw", width),
]);

/// Instance of an image asset.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    pub base: LayerBase,
    pub image_id: Option<String>,
}

impl Default for ImageLayer {
    fn default() -> Self {
        Self::new("")
    }
}

impl ImageLayer {
    pub fn new(image_id: &str) -> Self {
        Self {
            base: LayerBase::default(),
            image_id: Some(image_id.to_string()),
        }
    }
}

layer_schema!(ImageLayer, 2, vec![scalar_field!(ImageLayer, "image_id", "refId", image_id)]);

/// Layer with no content, used as a parent for other layers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NullLayer {
    pub base: LayerBase,
}

layer_schema!(NullLayer, 3, Vec::new());

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapeLayer {
    pub base: LayerBase,
    pub shapes: Vec<ShapeElement>,
}

impl ShapeLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_shape(&mut self, shape: impl Into<ShapeElement>) -> &mut ShapeElement {
        let index = self.shapes.len();
        self.insert_shape(index, shape)
    }

    /// Inserts a shape at `index`, clamped to the shape count. Earlier shapes
    /// are drawn on top.
    pub fn insert_shape(&mut self, index: usize, shape: impl Into<ShapeElement>) -> &mut ShapeElement {
        let index = index.min(self.shapes.len());
        self.shapes.insert(index, shape.into());
        &mut self.shapes[index]
    }
}

layer_schema!(ShapeLayer, 4, vec![Prop::items(
    "shapes",
    "shapes",
    |o: &ShapeLayer| &o.shapes,
    |o: &mut ShapeLayer| &mut o.shapes,
)]);

/// Any layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    PreComp(PreCompLayer),
    SolidColor(SolidColorLayer),
    Image(ImageLayer),
    Null(NullLayer),
    Shape(ShapeLayer),
}

macro_rules! each_layer {
    ($layer:expr, $inner:ident => $body:expr) => {
        match $layer {
            Layer::PreComp($inner) => $body,
            Layer::SolidColor($inner) => $body,
            Layer::Image($inner) => $body,
            Layer::Null($inner) => $body,
            Layer::Shape($inner) => $body,
        }
    };
}

impl Layer {
    pub fn base(&self) -> &LayerBase {
        each_layer!(self, layer => layer.base())
    }

    pub fn base_mut(&mut self) -> &mut LayerBase {
        each_layer!(self, layer => layer.base_mut())
    }

    /// The `ty` number written for this layer.
    pub fn type_id(&self) -> i64 {
        match self {
            Layer::PreComp(_) => PreCompLayer::TYPE,
            Layer::SolidColor(_) => SolidColorLayer::TYPE,
            Layer::Image(_) => ImageLayer::TYPE,
            Layer::Null(_) => NullLayer::TYPE,
            Layer::Shape(_) => ShapeLayer::TYPE,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.base().name.as_deref()
    }

    pub fn index(&self) -> Option<i64> {
        self.base().index
    }

    pub fn parent_index(&self) -> Option<i64> {
        self.base().parent_index
    }

    pub fn as_shape_layer(&self) -> Option<&ShapeLayer> {
        match self {
            Layer::Shape(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn as_shape_layer_mut(&mut self) -> Option<&mut ShapeLayer> {
        match self {
            Layer::Shape(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn node(&self) -> &dyn Node {
        each_layer!(self, layer => layer)
    }
}

impl From<PreCompLayer> for Layer {
    fn from(layer: PreCompLayer) -> Self {
        Layer::PreComp(layer)
    }
}

impl From<SolidColorLayer> for Layer {
    fn from(layer: SolidColorLayer) -> Self {
        Layer::SolidColor(layer)
    }
}

impl From<ImageLayer> for Layer {
    fn from(layer: ImageLayer) -> Self {
        Layer::Image(layer)
    }
}

impl From<NullLayer> for Layer {
    fn from(layer: NullLayer) -> Self {
        Layer::Null(layer)
    }
}

impl From<ShapeLayer> for Layer {
    fn from(layer: ShapeLayer) -> Self {
        Layer::Shape(layer)
    }
}

impl Node for Layer {
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

impl LottieValue for Layer {
    const TYPE_NAME: &'static str = "Layer";

    fn to_json(&self) -> LottieResult<Json> {
        self.to_dict().map(Json::Object)
    }

    fn from_json(value: &Json) -> LottieResult<Self> {
        Self::load(expect_object(value)?)
    }

    fn as_node(&self) -> Option<&dyn Node> {
        Some(self.node())
    }
}

impl LottieObject for Layer {
    fn to_dict(&self) -> LottieResult<Dict> {
        each_layer!(self, layer => layer.to_dict())
    }

    /// Picks the variant from the integer `ty`.
    fn load(dict: &Dict) -> LottieResult<Self> {
        let ty = match dict.get("ty") {
            Some(ty) if is_fractional(ty) => {
                return Err(LottieError::unknown_discriminator("layer", ty))
            }
            Some(ty) => i64::from_json(ty)
                .map_err(|_| LottieError::unknown_discriminator("layer", ty))?,
            None => {
                return Err(LottieError::MissingDiscriminator {
                    kind: "layer".into(),
                    key: "ty".into(),
                })
            }
        };
        debug!(ty, "loading layer");
        match ty {
            PreCompLayer::TYPE => PreCompLayer::load(dict).map(Layer::PreComp),
            SolidColorLayer::TYPE => SolidColorLayer::load(dict).map(Layer::SolidColor),
            ImageLayer::TYPE => ImageLayer::load(dict).map(Layer::Image),
            NullLayer::TYPE => NullLayer::load(dict).map(Layer::Null),
            ShapeLayer::TYPE => ShapeLayer::load(dict).map(Layer::Shape),
            other => Err(LottieError::unknown_discriminator("layer", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Fill, Rect};
    use lottie_core::NVector;
    use serde_json::json;

    #[test]
    fn test_null_layer_wire_form() {
        let mut layer = NullLayer::default();
        layer.base.index = Some(2);
        let dict = layer.to_dict().unwrap();
        let keys: Vec<&str> = dict.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["ddd", "ty", "sr", "ks", "ao", "st", "bm", "ind"]
        );
        assert_eq!(dict["ddd"], json!(0));
        assert_eq!(dict["ty"], json!(3));
    }

    #[test]
    fn test_has_mask_follows_masks() {
        let mut layer = ShapeLayer::new();
        assert!(!layer.to_dict().unwrap().contains_key("hasMask"));
        layer.base.masks = Some(vec![Mask::default()]);
        let dict = layer.to_dict().unwrap();
        assert_eq!(dict["hasMask"], json!(true));
        assert_eq!(dict["masksProperties"].as_array().unwrap().len(), 1);
        layer.base.masks = Some(Vec::new());
        assert_eq!(layer.to_dict().unwrap()["hasMask"], json!(false));
    }

    #[test]
    fn test_shape_layer_add_and_insert() {
        let mut layer = ShapeLayer::new();
        layer.add_shape(Rect::default());
        layer.add_shape(Fill::default());
        layer.insert_shape(0, Fill::new(NVector::xyz(1.0, 0.0, 0.0)));
        let tags: Vec<_> = layer.shapes.iter().map(|s| s.type_tag()).collect();
        assert_eq!(tags, vec!["fl", "rc", "fl"]);
    }

    #[test]
    fn test_dispatch_on_type() {
        let layers = vec![
            Layer::from(PreCompLayer::new("comp_0")),
            SolidColorLayer::new("#ff0000", 100.0, 50.0).into(),
            ImageLayer::new("image_0").into(),
            NullLayer::default().into(),
            ShapeLayer::new().into(),
        ];
        for layer in layers {
            let dict = layer.to_dict().unwrap();
            assert_eq!(dict["ty"], json!(layer.type_id()));
            let loaded = Layer::load(&dict).unwrap();
            assert_eq!(loaded, layer);
        }
    }

    #[test]
    fn test_unknown_layer_type() {
        let err = Layer::load(json!({"ty": 5}).as_object().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            LottieError::UnknownDiscriminator { ref kind, ref tag } if kind == "layer" && tag == "5"
        ));
        let err = Layer::load(json!({"nm": "untyped"}).as_object().unwrap()).unwrap_err();
        assert!(matches!(err, LottieError::MissingDiscriminator { .. }));
    }

    #[test]
    fn test_fractional_layer_type() {
        let dict = json!({"ty": 4.7, "ks": {}, "shapes": []});
        let err = Layer::load(dict.as_object().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            LottieError::UnknownDiscriminator { ref kind, ref tag } if kind == "layer" && tag == "4.7"
        ));

        let dict = json!({"ty": 4.0, "ks": {}, "shapes": []});
        assert!(Layer::load(dict.as_object().unwrap()).unwrap().as_shape_layer().is_some());
    }

    #[test]
    fn test_find_shape_in_layer() {
        let mut layer = ShapeLayer::new();
        let mut rect = Rect::default();
        rect.base.name = Some("box".into());
        layer.add_shape(rect);
        let wrapped = Layer::from(layer);
        let found: &Rect = wrapped.find_as("box").unwrap();
        assert_eq!(found.base.name.as_deref(), Some("box"));
        assert_eq!(wrapped.class_name(), "ShapeLayer");
    }
}
