//! Telegram sticker checks.

use std::fmt;
use std::path::Path;

use lottie_model::helpers::HasTransform;
use lottie_model::{
    walk, Animation, Asset, GradientStroke, Layer, MatteMode, Merge, Node, Repeater,
    RepeaterTransform, Star, Transform, TransformShape,
};
use serde::Serialize;

use crate::tgs::parse_tgs;

/// Largest accepted sticker file, in bytes.
pub const MAX_FILE_SIZE: usize = 64 * 1024;

/// Longest accepted sticker, in frames.
pub const MAX_FRAMES: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Note,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Note => "Note",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TgsIssue {
    pub message: String,
    /// Name of the offending object, or its class when unnamed.
    pub target: String,
    pub severity: Severity,
}

impl fmt::Display for TgsIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: on {}: {}", self.severity, self.target, self.message)
    }
}

/// Collects the ways an animation fails the sticker requirements.
///
/// Issues below the validator's severity are ignored.
#[derive(Debug, Clone)]
pub struct TgsValidator {
    severity: Severity,
    issues: Vec<TgsIssue>,
}

impl Default for TgsValidator {
    fn default() -> Self {
        Self::new(Severity::Note)
    }
}

fn target_of(name: Option<&str>, class: &str) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => class.to_string(),
    }
}

fn node_target(node: &dyn Node) -> String {
    let name = node.property("name");
    target_of(name.as_ref().and_then(|n| n.as_str()), node.class_name())
}

impl TgsValidator {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            issues: Vec::new(),
        }
    }

    pub fn issues(&self) -> &[TgsIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<TgsIssue> {
        self.issues
    }

    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Error)
    }

    fn check(&mut self, ok: bool, message: impl Into<String>, target: String, severity: Severity) {
        if severity >= self.severity && !ok {
            self.issues.push(TgsIssue {
                message: message.into(),
                target,
                severity,
            });
        }
    }

    pub fn check_size(&mut self, bytes: usize, target: &str) {
        let kib = bytes as f64 / 1024.0;
        self.check(
            bytes <= MAX_FILE_SIZE,
            format!("Invalid size ({kib:.1}k), should be less than 64k"),
            target.to_string(),
            Severity::Error,
        );
    }

    /// Checks the size and contents of a sticker file.
    pub fn check_file(&mut self, path: &Path) -> lottie_core::LottieResult<()> {
        let bytes = std::fs::read(path)?;
        let target = path.display().to_string();
        self.check_size(bytes.len(), &target);
        match parse_tgs(bytes.as_slice()) {
            Ok(animation) => self.check_animation(&animation),
            Err(err) => self.check(false, format!("Invalid file: {err}"), target, Severity::Error),
        }
        Ok(())
    }

    pub fn check_animation(&mut self, animation: &Animation) {
        let target = target_of(animation.name.as_deref(), "Animation");
        let frame_rate = animation.frame_rate.unwrap_or(0.0);
        self.check(
            frame_rate == 30.0 || frame_rate == 60.0,
            format!("Invalid framerate {frame_rate}, should be 30 or 60"),
            target.clone(),
            Severity::Error,
        );
        let width = animation.width.unwrap_or(0);
        self.check(
            width == 512,
            format!("Invalid width {width}, should be 512"),
            target.clone(),
            Severity::Error,
        );
        let height = animation.height.unwrap_or(0);
        self.check(
            height == 512,
            format!("Invalid height {height}, should be 512"),
            target.clone(),
            Severity::Error,
        );
        let frames = animation.duration();
        self.check(
            frames <= MAX_FRAMES,
            format!("Too many frames ({frames}), should be less than 180"),
            target,
            Severity::Error,
        );

        for layer in &animation.layers {
            self.check_layer(layer);
        }
        for asset in animation.assets.iter().flatten() {
            if let Asset::Precomp(precomp) = asset {
                for layer in &precomp.layers {
                    self.check_layer(layer);
                }
            }
        }

        walk(animation, &mut |node| self.check_node(node));
    }

    fn check_layer(&mut self, layer: &Layer) {
        let base = layer.base();
        let target = target_of(base.name.as_deref(), layer.node().class_name());
        self.check(
            !base.has_masks().unwrap_or(false),
            "Masks are not officially supported",
            target.clone(),
            Severity::Note,
        );
        self.check(
            base.effects.as_ref().map_or(true, Vec::is_empty),
            "Effects are not supported",
            target.clone(),
            Severity::Warning,
        );
        self.check(
            !base.threedimensional.unwrap_or(false),
            "3D layers are not supported",
            target.clone(),
            Severity::Warning,
        );
        self.check(
            !matches!(layer, Layer::Image(_)),
            "Image layers are not supported",
            target.clone(),
            Severity::Warning,
        );
        self.check(
            !base.auto_orient.unwrap_or(false),
            "Auto-orient layers are not supported",
            target.clone(),
            Severity::Warning,
        );
        self.check(
            matches!(base.matte_mode, None | Some(MatteMode::Normal)),
            "Mattes are not supported",
            target.clone(),
            Severity::Warning,
        );
        if let Layer::PreComp(precomp) = layer {
            self.check(
                precomp.time_remapping.is_none(),
                "Time remapping is not supported",
                target,
                Severity::Warning,
            );
        }
    }

    fn check_node(&mut self, node: &dyn Node) {
        let transform = node
            .downcast_ref::<Transform>()
            .or_else(|| node.downcast_ref::<TransformShape>().map(HasTransform::transform))
            .or_else(|| node.downcast_ref::<RepeaterTransform>().map(HasTransform::transform));
        if let Some(transform) = transform {
            let skew = transform.skew.as_ref();
            self.check(
                skew.map_or(true, |s| s.static_value() == Some(&0.0)),
                "Skew transforms are not supported",
                node_target(node),
                Severity::Warning,
            );
        }

        let unsupported = if node.is::<Merge>() {
            Some(("Merge paths are not supported", Severity::Warning))
        } else if node.is::<GradientStroke>() {
            Some(("Gradient strokes are not officially supported", Severity::Note))
        } else if node.is::<Star>() {
            Some(("Star Shapes are not officially supported", Severity::Note))
        } else if node.is::<Repeater>() {
            Some(("Repeaters are not officially supported", Severity::Note))
        } else {
            None
        };
        if let Some((message, severity)) = unsupported {
            self.check(false, message, node_target(node), severity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_model::{Composition, Group, ImageLayer, ShapeLayer};

    fn sticker() -> Animation {
        let mut animation = Animation::new(60.0, 60.0);
        animation.add_layer(ShapeLayer::new());
        animation
    }

    #[test]
    fn test_valid_sticker_has_no_issues() {
        let mut validator = TgsValidator::default();
        validator.check_animation(&sticker());
        assert!(validator.issues().is_empty(), "{:?}", validator.issues());
    }

    #[test]
    fn test_canvas_and_timing_errors() {
        let mut animation = sticker();
        animation.width = Some(1024);
        animation.frame_rate = Some(25.0);
        animation.out_point = Some(240.0);
        let mut validator = TgsValidator::default();
        validator.check_animation(&animation);
        assert!(validator.has_errors());
        let messages: Vec<String> = validator.issues().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Error: on Animation: Invalid framerate 25, should be 30 or 60",
                "Error: on Animation: Invalid width 1024, should be 512",
                "Error: on Animation: Too many frames (240), should be less than 180",
            ]
        );
    }

    #[test]
    fn test_unsupported_features() {
        let mut animation = sticker();
        let mut image = ImageLayer::new("img");
        image.base.name = Some("Photo".into());
        animation.add_layer(image);

        let shapes = animation.layers[0].as_shape_layer_mut().unwrap();
        let mut star = Star::default();
        star.base.name = Some("Spiky".into());
        let mut group = Group::new();
        group.add_shape(star);
        group.transform_mut().unwrap().transform.skew = Some(15.0.into());
        shapes.add_shape(group);

        let mut validator = TgsValidator::new(Severity::Note);
        validator.check_animation(&animation);
        let issues = validator.issues();
        assert!(issues
            .iter()
            .any(|i| i.target == "Photo" && i.message == "Image layers are not supported"));
        assert!(issues
            .iter()
            .any(|i| i.target == "Spiky" && i.severity == Severity::Note));
        assert!(issues
            .iter()
            .any(|i| i.message == "Skew transforms are not supported"));
        assert!(!validator.has_errors());

        let mut strict = TgsValidator::new(Severity::Warning);
        strict.check_animation(&animation);
        assert!(strict.issues().iter().all(|i| i.severity >= Severity::Warning));
    }

    #[test]
    fn test_size_limit() {
        let mut validator = TgsValidator::default();
        validator.check_size(MAX_FILE_SIZE, "ok.tgs");
        assert!(validator.issues().is_empty());
        validator.check_size(MAX_FILE_SIZE + 512, "big.tgs");
        assert_eq!(
            validator.issues()[0].to_string(),
            "Error: on big.tgs: Invalid size (64.5k), should be less than 64k"
        );
    }
}
