//! The top level animation object.

use std::sync::OnceLock;

use lottie_core::{LottieError, LottieResult};
use tracing::{debug, warn};

use crate::assets::{Asset, Precomp};
use crate::composition::Composition;
use crate::layers::Layer;
use crate::object::Schema;
use crate::prop::{scalar_field, Prop};
use crate::properties::{MultiDimensional, PropertyValue};
use crate::values::PseudoBool;

/// Bodymovin version written by new animations.
pub const LOTTIE_VERSION: &str = "5.5.2";

/// Canvas side of a Telegram sticker.
pub const TGS_SIZE: i64 = 512;

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub layers: Vec<Layer>,
    pub version: Option<String>,
    /// Frames per second.
    pub frame_rate: Option<f64>,
    /// First frame of the work area.
    pub in_point: Option<f64>,
    /// Frame at which the animation ends.
    pub out_point: Option<f64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub name: Option<String>,
    pub threedimensional: Option<bool>,
    /// Images and precomps, referenced by id.
    pub assets: Option<Vec<Asset>>,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(60.0, 60.0)
    }
}

impl Animation {
    /// An empty 512x512 animation lasting `n_frames` frames.
    pub fn new(n_frames: f64, frame_rate: f64) -> Self {
        Self {
            layers: Vec::new(),
            version: Some(LOTTIE_VERSION.to_string()),
            frame_rate: Some(frame_rate),
            in_point: Some(0.0),
            out_point: Some(n_frames),
            width: Some(TGS_SIZE),
            height: Some(TGS_SIZE),
            name: None,
            threedimensional: Some(false),
            assets: Some(Vec::new()),
        }
    }

    /// Frame count of the work area.
    pub fn duration(&self) -> f64 {
        self.out_point.unwrap_or(0.0) - self.in_point.unwrap_or(0.0)
    }

    pub fn precomp(&self, id: &str) -> Option<&Precomp> {
        self.assets.iter().flatten().find_map(|asset| match asset {
            Asset::Precomp(precomp) if precomp.id.as_deref() == Some(id) => Some(precomp),
            _ => None,
        })
    }

    pub fn precomp_mut(&mut self, id: &str) -> Option<&mut Precomp> {
        self.assets.iter_mut().flatten().find_map(|asset| match asset {
            Asset::Precomp(precomp) if precomp.id.as_deref() == Some(id) => Some(precomp),
            _ => None,
        })
    }

    /// Adds an asset, returning a reference to it.
    pub fn add_asset(&mut self, asset: impl Into<Asset>) -> &mut Asset {
        let assets = self.assets.get_or_insert_with(Vec::new);
        assets.push(asset.into());
        let last = assets.len() - 1;
        &mut assets[last]
    }

    /// Adds a layer to the precomp `id`, timed by this animation.
    pub fn add_precomp_layer(&mut self, id: &str, layer: impl Into<Layer>) -> LottieResult<&mut Layer> {
        let mut layer = layer.into();
        self.prepare_layer(&mut layer);
        let precomp = self
            .precomp_mut(id)
            .ok_or_else(|| LottieError::InvalidArgument(format!("no precomp with id {id:?}")))?;
        Ok(precomp.add_layer(layer))
    }

    /// Adjusts the animation to the sticker constraints.
    ///
    /// A canvas other than 512x512 becomes 512x512, and the scale and
    /// position of every root layer are multiplied by the fitting factor.
    /// An empty canvas is resized without touching the layers. The frame
    /// rate snaps to 30 or 60.
    pub fn tgs_sanitize(&mut self) {
        let width = self.width.unwrap_or(TGS_SIZE);
        let height = self.height.unwrap_or(TGS_SIZE);
        if width <= 0 || height <= 0 {
            warn!(width, height, "empty canvas, layers left unscaled");
            self.width = Some(TGS_SIZE);
            self.height = Some(TGS_SIZE);
        } else if width != TGS_SIZE || height != TGS_SIZE {
            let size = TGS_SIZE as f64;
            let factor = (size / width as f64).min(size / height as f64);
            debug!(width, height, factor, "rescaling canvas");
            self.width = Some(TGS_SIZE);
            self.height = Some(TGS_SIZE);

            for layer in &mut self.layers {
                if layer.parent_index().is_some() {
                    continue;
                }
                if let Some(transform) = layer.base_mut().transform.as_mut() {
                    if let Some(scale) = transform.scale.as_mut() {
                        scale_vectors(scale, factor);
                    }
                    if let Some(position) = transform.position.as_mut() {
                        scale_vectors(position, factor);
                    }
                }
            }
        }

        let frame_rate = self.frame_rate.unwrap_or(60.0);
        self.frame_rate = Some(if frame_rate < 45.0 { 30.0 } else { 60.0 });
    }
}

fn scale_vectors(prop: &mut MultiDimensional, factor: f64) {
    match &mut prop.value {
        PropertyValue::Static(value) => *value = &*value * factor,
        PropertyValue::Animated(keyframes) => {
            for keyframe in keyframes {
                if let Some(start) = keyframe.start.as_mut() {
                    *start = &*start * factor;
                }
                if let Some(end) = keyframe.end.as_mut() {
                    *end = &*end * factor;
                }
            }
        }
    }
}

impl Composition for Animation {
    fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn layers_mut(&mut self) -> &mut Vec<Layer> {
        &mut self.layers
    }

    fn prepare_layer(&self, layer: &mut Layer) {
        let base = layer.base_mut();
        if base.in_point.is_none() {
            base.in_point = self.in_point;
        }
        if base.out_point.is_none() {
            base.out_point = self.out_point;
        }
    }
}

impl Schema for Animation {
    const CLASS: &'static str = "Animation";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<Animation>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            vec![
                Prop::items("layers", "layers", |o: &Animation| &o.layers, |o: &mut Animation| {
                    &mut o.layers
                }),
                scalar_field!(Animation, "version", "v", version),
                scalar_field!(Animation, "frame_rate", "fr", frame_rate),
                scalar_field!(Animation, "in_point", "ip", in_point),
                scalar_field!(Animation, "out_point", "op", out_point),
                scalar_field!(Animation, "width", "w", width),
                scalar_field!(Animation, "height", "h", height),
                scalar_field!(Animation, "name", "nm", name),
                Prop::converted::<PseudoBool, _, _>(
                    "threedimensional",
                    "ddd",
                    |o: &Animation| &o.threedimensional,
                    |o: &mut Animation| &mut o.threedimensional,
                ),
                Prop::list("assets", "assets", |o: &Animation| &o.assets, |o: &mut Animation| {
                    &mut o.assets
                }),
            ]
        })
    }
}

crate::schema_object!(Animation);
