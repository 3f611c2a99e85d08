//! Output size reduction.

use std::collections::BTreeSet;

use lottie_core::config::StripConfig;
use lottie_core::LottieResult;
use lottie_model::values::number_to_json;
use lottie_model::{Animation, Asset, Dict, Json, Layer, LottieObject, ShapeElement};

/// Attributes `heavy` removes: indices, names and match names.
pub const HEAVY_ATTRIBUTES: [&str; 4] = ["ind", "ix", "nm", "mn"];

/// Rounds numbers and drops attributes from the serialized animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Strip {
    pub float_precision: u32,
    pub remove_attributes: BTreeSet<String>,
    /// Unset static transform properties holding their defaults first.
    pub transform_defaults: bool,
}

impl Default for Strip {
    fn default() -> Self {
        Self::floats(3)
    }
}

impl From<&StripConfig> for Strip {
    fn from(config: &StripConfig) -> Self {
        Self {
            float_precision: config.float_precision,
            remove_attributes: config.remove_attributes.iter().cloned().collect(),
            transform_defaults: config.transform_defaults,
        }
    }
}

impl Strip {
    /// Rounding only.
    pub fn floats(float_precision: u32) -> Self {
        Self {
            float_precision,
            remove_attributes: BTreeSet::new(),
            transform_defaults: false,
        }
    }

    /// Rounding to 3 places, [`HEAVY_ATTRIBUTES`] removed and transform
    /// defaults unset.
    pub fn heavy() -> Self {
        Self {
            float_precision: 3,
            remove_attributes: HEAVY_ATTRIBUTES.iter().map(|a| a.to_string()).collect(),
            transform_defaults: true,
        }
    }

    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.float_precision as i32);
        (value * factor).round() / factor
    }

    /// The stripped wire form of `animation`.
    pub fn to_dict(&self, animation: &Animation) -> LottieResult<Dict> {
        let mut dict = if self.transform_defaults {
            let mut animation = animation.clone();
            strip_transform_defaults(&mut animation);
            animation.to_dict()?
        } else {
            animation.to_dict()?
        };
        self.strip_dict(&mut dict)?;
        Ok(dict)
    }

    pub fn strip_dict(&self, dict: &mut Dict) -> LottieResult<()> {
        dict.retain(|key, _| !self.remove_attributes.contains(key));
        for value in dict.values_mut() {
            self.strip_value(value)?;
        }
        Ok(())
    }

    fn strip_value(&self, value: &mut Json) -> LottieResult<()> {
        match value {
            Json::Number(number) if !number.is_i64() && !number.is_u64() => {
                if let Some(float) = number.as_f64() {
                    *value = number_to_json(self.round(float))?;
                }
            }
            Json::Array(items) => {
                for item in items {
                    self.strip_value(item)?;
                }
            }
            Json::Object(dict) => self.strip_dict(dict)?,
            _ => {}
        }
        Ok(())
    }
}

/// Unsets default transform values on every layer and shape group.
pub fn strip_transform_defaults(animation: &mut Animation) {
    strip_layers(&mut animation.layers);
    for asset in animation.assets.iter_mut().flatten() {
        if let Asset::Precomp(precomp) = asset {
            strip_layers(&mut precomp.layers);
        }
    }
}

fn strip_layers(layers: &mut [Layer]) {
    for layer in layers {
        if let Some(transform) = layer.base_mut().transform.as_mut() {
            transform.strip_defaults();
        }
        if let Some(shape_layer) = layer.as_shape_layer_mut() {
            strip_shapes(&mut shape_layer.shapes);
        }
    }
}

fn strip_shapes(shapes: &mut [ShapeElement]) {
    for shape in shapes {
        match shape {
            ShapeElement::Group(group) => strip_shapes(&mut group.shapes),
            ShapeElement::Transform(transform) => transform.transform.strip_defaults(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_core::NVector;
    use lottie_model::{Composition, Group, Rect, ShapeLayer};
    use serde_json::json;

    fn animation() -> Animation {
        let mut animation = Animation::new(60.0, 60.0);
        animation.name = Some("Shapes".into());
        let layer = animation.add_layer(ShapeLayer::new());
        let mut group = Group::new();
        group.add_shape(Rect::new(
            NVector::xy(10.123456, 20.0),
            NVector::xy(1.0 / 3.0, 5.5),
        ));
        layer.as_shape_layer_mut().unwrap().add_shape(group);
        animation
    }

    #[test]
    fn test_rounds_floats() {
        let mut dict = json!({"a": 1.23456, "b": [0.3333333, 2], "c": {"d": 9.9999}});
        let Json::Object(dict_ref) = &mut dict else {
            unreachable!()
        };
        Strip::floats(3).strip_dict(dict_ref).unwrap();
        assert_eq!(dict, json!({"a": 1.235, "b": [0.333, 2], "c": {"d": 10}}));
    }

    #[test]
    fn test_removes_attributes_everywhere() {
        let strip = Strip {
            remove_attributes: ["nm".to_string()].into(),
            ..Strip::default()
        };
        let dict = strip.to_dict(&animation()).unwrap();
        let text = serde_json::to_string(&dict).unwrap();
        assert!(!text.contains("\"nm\""));
        assert!(text.contains("10.123"));
        assert!(!text.contains("10.1234"));
    }

    #[test]
    fn test_heavy_strip() {
        let animation = animation();
        let dict = Strip::heavy().to_dict(&animation).unwrap();
        let layer = &dict["layers"][0];
        assert!(layer.get("ind").is_none());
        let transform = layer["ks"].as_object().unwrap();
        assert!(transform.get("p").is_none());
        assert!(transform.get("a").is_none());
        assert_eq!(transform["s"]["k"], json!([100, 100]));
        assert_eq!(transform["o"]["k"], json!(100));

        // The source animation is left untouched.
        let position = animation.layers[0].base().transform.as_ref().unwrap();
        assert!(position.position.is_some());
    }

    #[test]
    fn test_from_config() {
        let config = StripConfig {
            enabled: true,
            float_precision: 1,
            remove_attributes: vec!["mn".into()],
            transform_defaults: false,
        };
        let strip = Strip::from(&config);
        assert_eq!(strip.float_precision, 1);
        assert!(strip.remove_attributes.contains("mn"));
    }
}
