//! Layer effects.
//!
//! An [`Effect`] is a list of positional [`EffectValue`]s. The well known
//! effects in [`EffectKind`] give each position a name, so values can be
//! looked up with [`Effect::get`].

use std::sync::OnceLock;

use lottie_core::{LottieResult, NVector};

use crate::enums::lottie_enum;
use crate::object::{Node, Schema};
use crate::prop::{scalar_field, Cardinality, Prop};
use crate::properties::{MultiDimensional, Value};
use crate::values::{LottieValue, PseudoBool};
use crate::Json;

lottie_enum! {
    /// Wire type of an effect value.
    EffectValueKind: i64 {
        Slider = 0,
        Angle = 1,
        Color = 2,
        Point = 3,
        Checkbox = 4,
        Ignored = 6,
        DropDown = 7,
        Layer = 10,
    }
}

/// The `v` payload of an effect value.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectParam {
    Scalar(Value),
    Vector(MultiDimensional),
    /// Plain number stored by [`EffectValueKind::Ignored`].
    Ignored(f64),
}

impl EffectParam {
    fn default_for(kind: EffectValueKind) -> Self {
        match kind {
            EffectValueKind::Color => EffectParam::Vector(NVector::xyz(0.0, 0.0, 0.0).into()),
            EffectValueKind::Point => EffectParam::Vector(NVector::xy(0.0, 0.0).into()),
            EffectValueKind::Ignored => EffectParam::Ignored(0.0),
            _ => EffectParam::Scalar(0.0.into()),
        }
    }

    fn decode(kind: EffectValueKind, json: &Json) -> LottieResult<Self> {
        Ok(match kind {
            EffectValueKind::Color | EffectValueKind::Point => {
                EffectParam::Vector(MultiDimensional::from_json(json)?)
            }
            EffectValueKind::Ignored => EffectParam::Ignored(f64::from_json(json)?),
            _ => EffectParam::Scalar(Value::from_json(json)?),
        })
    }

    fn to_json(&self) -> LottieResult<Json> {
        match self {
            EffectParam::Scalar(value) => value.to_json(),
            EffectParam::Vector(value) => value.to_json(),
            EffectParam::Ignored(value) => value.to_json(),
        }
    }

    fn as_node(&self) -> Option<&dyn Node> {
        match self {
            EffectParam::Scalar(value) => value.as_node(),
            EffectParam::Vector(value) => value.as_node(),
            EffectParam::Ignored(_) => None,
        }
    }
}

/// One parameter of an effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectValue {
    pub effect_index: Option<i64>,
    pub name: Option<String>,
    pub kind: EffectValueKind,
    pub value: EffectParam,
}

impl Default for EffectValue {
    fn default() -> Self {
        Self::new(EffectValueKind::Slider)
    }
}

impl EffectValue {
    pub fn new(kind: EffectValueKind) -> Self {
        Self {
            effect_index: None,
            name: None,
            kind,
            value: EffectParam::default_for(kind),
        }
    }

    pub fn slider(value: f64) -> Self {
        Self {
            value: EffectParam::Scalar(value.into()),
            ..Self::new(EffectValueKind::Slider)
        }
    }

    pub fn angle(degrees: f64) -> Self {
        Self {
            value: EffectParam::Scalar(degrees.into()),
            ..Self::new(EffectValueKind::Angle)
        }
    }

    pub fn color(color: NVector) -> Self {
        Self {
            value: EffectParam::Vector(color.into()),
            ..Self::new(EffectValueKind::Color)
        }
    }

    pub fn point(point: NVector) -> Self {
        Self {
            value: EffectParam::Vector(point.into()),
            ..Self::new(EffectValueKind::Point)
        }
    }

    pub fn checkbox(checked: bool) -> Self {
        let value = if checked { 1.0 } else { 0.0 };
        Self {
            value: EffectParam::Scalar(value.into()),
            ..Self::new(EffectValueKind::Checkbox)
        }
    }

    pub fn dropdown(choice: f64) -> Self {
        Self {
            value: EffectParam::Scalar(choice.into()),
            ..Self::new(EffectValueKind::DropDown)
        }
    }

    pub fn scalar(&self) -> Option<&Value> {
        match &self.value {
            EffectParam::Scalar(value) => Some(value),
            _ => None,
        }
    }

    pub fn vector(&self) -> Option<&MultiDimensional> {
        match &self.value {
            EffectParam::Vector(value) => Some(value),
            _ => None,
        }
    }
}

impl Schema for EffectValue {
    const CLASS: &'static str = "EffectValue";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<EffectValue>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            vec![
                scalar_field!(EffectValue, "effect_index", "ix", effect_index),
                scalar_field!(EffectValue, "name", "nm", name),
                Prop::required(
                    "kind",
                    "ty",
                    Cardinality::Scalar,
                    |o: &EffectValue| &o.kind,
                    |o: &mut EffectValue| &mut o.kind,
                ),
                // `ty` precedes `v`, so the kind is known when the value loads.
                Prop::custom(
                    "value",
                    "v",
                    "EffectParam",
                    Cardinality::Scalar,
                    |o: &EffectValue| Some(o.value.to_json()),
                    |o: &mut EffectValue, json: Option<&Json>| {
                        o.value = match json {
                            Some(json) => EffectParam::decode(o.kind, json)?,
                            None => EffectParam::default_for(o.kind),
                        };
                        Ok(())
                    },
                )
                .with_children(|o: &EffectValue| o.value.as_node().into_iter().collect()),
            ]
        })
    }
}

crate::schema_object!(EffectValue);

/// Well known effects and the names of their values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    ChangeToColor,
    Tint,
    Fill,
    Stroke,
    Tritone,
    DropShadow,
    Matte3,
    GaussianBlur,
}

impl EffectKind {
    pub const ALL: &'static [EffectKind] = &[
        EffectKind::ChangeToColor,
        EffectKind::Tint,
        EffectKind::Fill,
        EffectKind::Stroke,
        EffectKind::Tritone,
        EffectKind::DropShadow,
        EffectKind::Matte3,
        EffectKind::GaussianBlur,
    ];

    /// The `ty` written for the effect.
    pub fn type_id(self) -> i64 {
        match self {
            EffectKind::ChangeToColor => 5,
            EffectKind::Tint => 20,
            EffectKind::Fill => 21,
            EffectKind::Stroke => 22,
            EffectKind::Tritone => 23,
            EffectKind::DropShadow => 25,
            EffectKind::Matte3 => 28,
            EffectKind::GaussianBlur => 29,
        }
    }

    pub fn from_type_id(ty: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.type_id() == ty)
    }

    /// Value names and kinds, by position.
    pub fn params(self) -> &'static [(&'static str, EffectValueKind)] {
        use EffectValueKind::*;
        match self {
            EffectKind::ChangeToColor => &[
                ("from_color", Color),
                ("to_color", Color),
                ("change", DropDown),
                ("change_by", DropDown),
                ("tolerance", Ignored),
                ("hue", Slider),
                ("lightness", Slider),
                ("saturation", Slider),
                ("saturation_", Ignored),
                ("softness", Slider),
                ("view_correction", DropDown),
            ],
            // Opacity in [0, 100].
            EffectKind::Tint => &[
                ("color_black", Color),
                ("color_white", Color),
                ("opacity", Slider),
            ],
            // Opacity in [0, 1].
            EffectKind::Fill => &[
                ("00", Point),
                ("01", DropDown),
                ("color", Color),
                ("03", DropDown),
                ("04", Slider),
                ("05", Slider),
                ("opacity", Slider),
            ],
            EffectKind::Stroke => &[
                ("00", Color),
                ("01", Checkbox),
                ("02", Checkbox),
                ("color", Color),
                ("04", Slider),
                ("05", Slider),
                ("06", Slider),
                ("07", Slider),
                ("08", Slider),
                ("09", DropDown),
                ("type", DropDown),
            ],
            EffectKind::Tritone => &[("bright", Color), ("mid", Color), ("dark", Color)],
            // Opacity in [0, 255].
            EffectKind::DropShadow => &[
                ("color", Color),
                ("opacity", Slider),
                ("angle", Angle),
                ("distance", Slider),
                ("blur", Slider),
            ],
            EffectKind::Matte3 => &[("index", Slider)],
            EffectKind::GaussianBlur => &[
                ("sigma", Slider),
                ("dimensions", Slider),
                ("wrap", Checkbox),
            ],
        }
    }
}

/// A layer effect.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Effect {
    pub effect_index: Option<i64>,
    pub name: Option<String>,
    pub type_id: Option<i64>,
    pub enabled: Option<bool>,
    pub values: Vec<EffectValue>,
}

impl Effect {
    /// An effect of a known kind with every value at its default.
    pub fn new(kind: EffectKind) -> Self {
        Self {
            type_id: Some(kind.type_id()),
            values: kind
                .params()
                .iter()
                .map(|(_, value_kind)| EffectValue::new(*value_kind))
                .collect(),
            ..Default::default()
        }
    }

    pub fn kind(&self) -> Option<EffectKind> {
        self.type_id.and_then(EffectKind::from_type_id)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.kind()
            .and_then(|kind| kind.params().iter().position(|(n, _)| *n == name))
            .or_else(|| {
                self.values
                    .iter()
                    .position(|v| v.name.as_deref() == Some(name))
            })
    }

    /// Value named `name`, by the kind's positional names or by `nm`.
    pub fn get(&self, name: &str) -> Option<&EffectValue> {
        self.position(name).and_then(|i| self.values.get(i))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut EffectValue> {
        self.position(name).and_then(move |i| self.values.get_mut(i))
    }

    fn with(mut self, name: &str, value: EffectParam) -> Self {
        if let Some(slot) = self.get_mut(name) {
            slot.value = value;
        }
        self
    }

    /// Replaces the layer with `color`. `opacity` is in `[0, 1]`.
    pub fn fill(color: NVector, opacity: f64) -> Self {
        Self::new(EffectKind::Fill)
            .with("color", EffectParam::Vector(color.into()))
            .with("opacity", EffectParam::Scalar(opacity.into()))
    }

    pub fn stroke(color: NVector) -> Self {
        Self::new(EffectKind::Stroke).with("color", EffectParam::Vector(color.into()))
    }

    /// Maps dark and light areas to the two colors. `amount` is in `[0, 100]`.
    pub fn tint(black: NVector, white: NVector, amount: f64) -> Self {
        Self::new(EffectKind::Tint)
            .with("color_black", EffectParam::Vector(black.into()))
            .with("color_white", EffectParam::Vector(white.into()))
            .with("opacity", EffectParam::Scalar(amount.into()))
    }

    pub fn tritone(bright: NVector, mid: NVector, dark: NVector) -> Self {
        Self::new(EffectKind::Tritone)
            .with("bright", EffectParam::Vector(bright.into()))
            .with("mid", EffectParam::Vector(mid.into()))
            .with("dark", EffectParam::Vector(dark.into()))
    }

    /// `opacity` is in `[0, 255]`, `angle` in degrees.
    pub fn drop_shadow(color: NVector, opacity: f64, angle: f64, distance: f64, blur: f64) -> Self {
        Self::new(EffectKind::DropShadow)
            .with("color", EffectParam::Vector(color.into()))
            .with("opacity", EffectParam::Scalar(opacity.into()))
            .with("angle", EffectParam::Scalar(angle.into()))
            .with("distance", EffectParam::Scalar(distance.into()))
            .with("blur", EffectParam::Scalar(blur.into()))
    }
}

impl Schema for Effect {
    const CLASS: &'static str = "Effect";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<Effect>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            vec![
                scalar_field!(Effect, "effect_index", "ix", effect_index),
                scalar_field!(Effect, "name", "nm", name),
                scalar_field!(Effect, "type_id", "ty", type_id),
                Prop::converted::<PseudoBool, _, _>(
                    "enabled",
                    "en",
                    |o: &Effect| &o.enabled,
                    |o: &mut Effect| &mut o.enabled,
                ),
                Prop::items("values", "ef", |o: &Effect| &o.values, |o: &mut Effect| {
                    &mut o.values
                }),
            ]
        })
    }
}

crate::schema_object!(Effect);
