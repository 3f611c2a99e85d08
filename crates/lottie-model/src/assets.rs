//! Assets referenced by image and precomp layers.

use std::sync::OnceLock;

use lottie_core::{LottieError, LottieResult};
use tracing::debug;

use crate::composition::Composition;
use crate::layers::Layer;
use crate::object::{LottieObject, Node, Schema};
use crate::prop::{scalar_field, Prop};
use crate::values::{expect_object, LottieValue, PseudoBool};
use crate::{Dict, Json};

/// External or embedded image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub id: Option<String>,
    /// File name, or a data URL when embedded.
    pub image: Option<String>,
    /// Directory prefix of `image`.
    pub image_path: Option<String>,
    pub embedded: Option<bool>,
}

impl Default for ImageAsset {
    fn default() -> Self {
        Self::new("")
    }
}

impl ImageAsset {
    pub fn new(id: &str) -> Self {
        Self {
            height: Some(0.0),
            width: Some(0.0),
            id: Some(id.to_string()),
            image: Some(String::new()),
            image_path: Some(String::new()),
            embedded: Some(false),
        }
    }

    /// Image embedded as a base64 data URL.
    pub fn embedded(id: &str, mime_subtype: &str, base64: &str, width: f64, height: f64) -> Self {
        Self {
            height: Some(height),
            width: Some(width),
            image: Some(format!("data:image/{mime_subtype};base64,{base64}")),
            embedded: Some(true),
            ..Self::new(id)
        }
    }
}

impl Schema for ImageAsset {
    const CLASS: &'static str = "ImageAsset";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<ImageAsset>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            vec![
                scalar_field!(ImageAsset, "height", "h", height),
                scalar_field!(ImageAsset, "width", "w", width),
                scalar_field!(ImageAsset, "id", "id", id),
                scalar_field!(ImageAsset, "image", "p", image),
                scalar_field!(ImageAsset, "image_path", "u", image_path),
                Prop::converted::<PseudoBool, _, _>(
                    "embedded",
                    "e",
                    |o: &ImageAsset| &o.embedded,
                    |o: &mut ImageAsset| &mut o.embedded,
                ),
            ]
        })
    }
}

crate::schema_object!(ImageAsset);

/// Reusable layer stack, instanced by precomp layers.
#[derive(Debug, Clone, PartialEq)]
pub struct Precomp {
    pub layers: Vec<Layer>,
    pub id: Option<String>,
}

impl Default for Precomp {
    fn default() -> Self {
        Self::new("")
    }
}

impl Precomp {
    pub fn new(id: &str) -> Self {
        Self {
            layers: Vec::new(),
            id: Some(id.to_string()),
        }
    }

    /// Sets the in and out points of every layer, or only of layers that
    /// have none unless `overwrite` is set.
    pub fn set_timing(&mut self, in_point: f64, out_point: f64, overwrite: bool) {
        for layer in &mut self.layers {
            let base = layer.base_mut();
            if overwrite || base.in_point.is_none() {
                base.in_point = Some(in_point);
            }
            if overwrite || base.out_point.is_none() {
                base.out_point = Some(out_point);
            }
        }
    }
}

impl Composition for Precomp {
    fn layers(&self) -> &[Layer] {
        &self.layers
    }

    fn layers_mut(&mut self) -> &mut Vec<Layer> {
        &mut self.layers
    }
}

impl Schema for Precomp {
    const CLASS: &'static str = "Precomp";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<Precomp>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            vec![
                Prop::items("layers", "layers", |o: &Precomp| &o.layers, |o: &mut Precomp| {
                    &mut o.layers
                }),
                scalar_field!(Precomp, "id", "id", id),
            ]
        })
    }
}

crate::schema_object!(Precomp);

/// Any asset. The kind is told by the keys present: `p` or `u` for images,
/// `layers` for precomps.
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    Image(ImageAsset),
    Precomp(Precomp),
}

impl Asset {
    pub fn id(&self) -> Option<&str> {
        match self {
            Asset::Image(image) => image.id.as_deref(),
            Asset::Precomp(precomp) => precomp.id.as_deref(),
        }
    }

    fn node(&self) -> &dyn Node {
        match self {
            Asset::Image(image) => image,
            Asset::Precomp(precomp) => precomp,
        }
    }
}

impl From<ImageAsset> for Asset {
    fn from(image: ImageAsset) -> Self {
        Asset::Image(image)
    }
}

impl From<Precomp> for Asset {
    fn from(precomp: Precomp) -> Self {
        Asset::Precomp(precomp)
    }
}

impl Node for Asset {
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

impl LottieValue for Asset {
    const TYPE_NAME: &'static str = "Asset";

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

impl LottieObject for Asset {
    fn to_dict(&self) -> LottieResult<Dict> {
        match self {
            Asset::Image(image) => image.to_dict(),
            Asset::Precomp(precomp) => precomp.to_dict(),
        }
    }

    fn load(dict: &Dict) -> LottieResult<Self> {
        if dict.contains_key("p") || dict.contains_key("u") {
            debug!("loading image asset");
            return ImageAsset::load(dict).map(Asset::Image);
        }
        if dict.contains_key("layers") {
            debug!("loading precomp asset");
            return Precomp::load(dict).map(Asset::Precomp);
        }
        Err(LottieError::MissingDiscriminator {
            kind: "asset".into(),
            key: "p, u or layers".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::NullLayer;
    use serde_json::json;

    #[test]
    fn test_asset_dispatch() {
        let image = Asset::load(json!({"id": "img", "p": "a.png", "u": "images/"}).as_object().unwrap())
            .unwrap();
        assert!(matches!(image, Asset::Image(_)));
        assert_eq!(image.id(), Some("img"));

        let precomp = Asset::load(json!({"id": "comp", "layers": []}).as_object().unwrap()).unwrap();
        assert!(matches!(precomp, Asset::Precomp(_)));

        let err = Asset::load(json!({"id": "what"}).as_object().unwrap()).unwrap_err();
        assert!(matches!(err, LottieError::MissingDiscriminator { .. }));
    }

    #[test]
    fn test_embedded_image_wire_form() {
        let image = ImageAsset::embedded("img", "png", "AAAA", 16.0, 8.0);
        let dict = image.to_dict().unwrap();
        assert_eq!(dict["p"], json!("data:image/png;base64,AAAA"));
        assert_eq!(dict["e"], json!(1));
        assert_eq!(dict["w"], json!(16));
        assert_eq!(Asset::load(&dict).unwrap(), Asset::Image(image));
    }

    #[test]
    fn test_precomp_layers_and_timing() {
        let mut precomp = Precomp::new("comp_0");
        precomp.add_layer(NullLayer::default());
        let mut timed = NullLayer::default();
        timed.base.in_point = Some(3.0);
        precomp.add_layer(timed);
        precomp.set_timing(0.0, 30.0, false);
        assert_eq!(precomp.layers[0].base().in_point, Some(0.0));
        assert_eq!(precomp.layers[1].base().in_point, Some(3.0));
        assert_eq!(precomp.layers[1].base().out_point, Some(30.0));

        let asset = Asset::from(precomp);
        let loaded = Asset::load(&asset.to_dict().unwrap()).unwrap();
        assert_eq!(loaded, asset);
    }
}
