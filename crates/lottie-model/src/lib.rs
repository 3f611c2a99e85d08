//! # lottie-model
//!
//! The Lottie object model for lottie-rs.
//!
//! Every wire-format object (animation, layers, shapes, transforms, effects,
//! animatable properties and their keyframes) is a plain Rust type described by
//! a static table of [`prop::Prop`] descriptors. The table drives serialization
//! to and from the Lottie JSON dictionary, so `to_dict` and `load` are exact
//! inverses for every type.
//!
//! Polymorphic families (layers, shape elements, assets, effect values) are
//! closed enums that dispatch on their discriminator key. Unknown discriminators
//! are rejected with [`LottieError::UnknownDiscriminator`].

pub mod animation;
pub mod assets;
pub mod composition;
pub mod easing;
pub mod effects;
pub mod enums;
pub mod gradient;
pub mod helpers;
pub mod keyframe;
pub mod layers;
pub mod object;
pub mod prop;
pub mod properties;
pub mod registry;
pub mod shapes;
pub mod values;

pub use lottie_core::{LottieError, LottieResult};

/// A JSON value on the wire.
pub type Json = serde_json::Value;

/// A JSON object on the wire. Key order follows property declaration order.
pub type Dict = serde_json::Map<String, Json>;

pub use animation::{Animation, LOTTIE_VERSION, TGS_SIZE};
pub use assets::{Asset, ImageAsset, Precomp};
pub use composition::Composition;
pub use easing::{Easing, KeyframeBezier, KeyframeBezierHandle};
pub use effects::{Effect, EffectKind, EffectParam, EffectValue, EffectValueKind};
pub use enums::*;
pub use gradient::{GradientColors, GradientStop};
pub use helpers::{Mask, Transform};
pub use keyframe::{Keyframe, KeyframeValue};
pub use layers::{
    ImageLayer, Layer, LayerBase, LayerVariant, NullLayer, PreCompLayer, ShapeLayer,
    SolidColorLayer,
};
pub use object::{walk, LottieObject, Node, Schema};
pub use prop::{Cardinality, Prop};
pub use properties::{
    Animatable, MultiDimensional, PositionValue, PropertyValue, ShapeProperty, Value,
};
pub use registry::{
    register_extension, registered_extensions, unregister_extension, CustomShape, Extension,
    EXTENSION_KEY,
};
pub use shapes::*;
pub use values::{Converter, LottieValue, PseudoBool};
