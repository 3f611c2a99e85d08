//! Telegram animated stickers: gzip-compressed Lottie JSON.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use lottie_core::config::TgsConfig;
use lottie_core::LottieResult;
use lottie_model::{Animation, Json, LottieObject};
use tracing::{info, warn};

use crate::lottie::{load_animation, write_json};
use crate::validate::{TgsIssue, TgsValidator};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TgsOptions {
    /// Fit the animation to the sticker canvas and frame rates first.
    pub sanitize: bool,
    /// Run the sticker checks on the result.
    pub validate: bool,
    /// gzip level, 0 to 9.
    pub compression_level: u32,
    /// Add `"tgs": 1` to the payload.
    pub marker: bool,
}

impl Default for TgsOptions {
    fn default() -> Self {
        Self::from(&TgsConfig::default())
    }
}

impl From<&TgsConfig> for TgsOptions {
    fn from(config: &TgsConfig) -> Self {
        Self {
            sanitize: config.sanitize,
            validate: config.validate,
            compression_level: config.compression_level,
            marker: config.marker,
        }
    }
}

/// Gzips `dict`, adding the `tgs` marker when `options.marker` is set.
pub fn compress_tgs(mut dict: lottie_model::Dict, options: &TgsOptions) -> LottieResult<Vec<u8>> {
    if options.marker {
        dict.insert("tgs".to_string(), Json::from(1));
    }
    let level = options.compression_level.min(9);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    write_json(&Json::Object(dict), &mut encoder, None)?;
    Ok(encoder.finish()?)
}

/// Writes the animation as a sticker.
///
/// Returns the issues found when `options.validate` is set; they are
/// reported but never stop the export.
pub fn export_tgs<W: Write>(
    animation: &mut Animation,
    mut writer: W,
    options: &TgsOptions,
) -> LottieResult<Vec<TgsIssue>> {
    if options.sanitize {
        animation.tgs_sanitize();
    }
    let bytes = compress_tgs(animation.to_dict()?, options)?;
    writer.write_all(&bytes)?;
    info!(bytes = bytes.len(), "exported tgs");

    if !options.validate {
        return Ok(Vec::new());
    }
    let mut validator = TgsValidator::default();
    validator.check_animation(animation);
    validator.check_size(bytes.len(), "file");
    for issue in validator.issues() {
        warn!("{issue}");
    }
    Ok(validator.into_issues())
}

/// Reads a sticker. Input without the gzip magic is read as plain JSON.
pub fn parse_tgs<R: Read>(mut reader: R) -> LottieResult<Animation> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let value: Json = if bytes.starts_with(&GZIP_MAGIC) {
        serde_json::from_reader(GzDecoder::new(bytes.as_slice()))?
    } else {
        serde_json::from_slice(&bytes)?
    };
    load_animation(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_core::NVector;
    use lottie_model::{Composition, Fill, ShapeLayer};

    fn sticker() -> Animation {
        let mut animation = Animation::new(60.0, 60.0);
        let layer = animation.add_layer(ShapeLayer::new());
        layer
            .as_shape_layer_mut()
            .unwrap()
            .add_shape(Fill::new(NVector::xyz(1.0, 0.0, 0.0)));
        animation
    }

    #[test]
    fn test_tgs_payload_is_the_lottie_dict() {
        let mut animation = sticker();
        let mut bytes = Vec::new();
        export_tgs(&mut animation, &mut bytes, &TgsOptions::default()).unwrap();
        assert_eq!(&bytes[..2], &GZIP_MAGIC);

        let decoded: Json = serde_json::from_reader(GzDecoder::new(bytes.as_slice())).unwrap();
        assert_eq!(decoded, Json::Object(animation.to_dict().unwrap()));
    }

    #[test]
    fn test_marker_is_opt_in() {
        let mut animation = sticker();
        let options = TgsOptions {
            marker: true,
            ..TgsOptions::default()
        };
        let mut bytes = Vec::new();
        export_tgs(&mut animation, &mut bytes, &options).unwrap();

        let decoded: Json = serde_json::from_reader(GzDecoder::new(bytes.as_slice())).unwrap();
        assert_eq!(decoded["tgs"], Json::from(1));
        let mut expected = animation.to_dict().unwrap();
        expected.insert("tgs".into(), Json::from(1));
        assert_eq!(decoded, Json::Object(expected));
        assert_eq!(parse_tgs(bytes.as_slice()).unwrap(), animation);
    }

    #[test]
    fn test_parse_tgs_accepts_both_forms() {
        let mut animation = sticker();
        let mut bytes = Vec::new();
        export_tgs(&mut animation, &mut bytes, &TgsOptions::default()).unwrap();
        assert_eq!(parse_tgs(bytes.as_slice()).unwrap(), animation);

        let plain = crate::lottie::to_lottie_string(&animation, false).unwrap();
        assert_eq!(parse_tgs(plain.as_bytes()).unwrap(), animation);
    }

    #[test]
    fn test_export_sanitizes_and_validates() {
        let mut animation = sticker();
        animation.width = Some(256);
        animation.height = Some(256);
        animation.frame_rate = Some(24.0);
        let options = TgsOptions {
            sanitize: true,
            validate: true,
            ..TgsOptions::default()
        };
        let issues = export_tgs(&mut animation, std::io::sink(), &options).unwrap();
        assert!(issues.is_empty(), "{issues:?}");
        assert_eq!(animation.width, Some(512));
        assert_eq!(animation.frame_rate, Some(30.0));

        let mut unsanitized = sticker();
        unsanitized.frame_rate = Some(24.0);
        let options = TgsOptions {
            validate: true,
            ..TgsOptions::default()
        };
        let issues = export_tgs(&mut unsanitized, std::io::sink(), &options).unwrap();
        assert_eq!(issues.len(), 1);
    }
}
