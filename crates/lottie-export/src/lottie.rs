//! Plain Lottie JSON.

use std::io::{Read, Write};

use lottie_core::config::JsonConfig;
use lottie_core::{LottieError, LottieResult};
use lottie_model::{Animation, Json, LottieObject};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::debug;

/// Writes `value` compactly, or indented by `indent` spaces.
pub fn write_json<W: Write>(value: &Json, writer: W, indent: Option<usize>) -> LottieResult<()> {
    match indent {
        Some(width) => {
            let indent = vec![b' '; width];
            let mut serializer =
                Serializer::with_formatter(writer, PrettyFormatter::with_indent(&indent));
            value.serialize(&mut serializer)?;
        }
        None => serde_json::to_writer(writer, value)?,
    }
    Ok(())
}

/// Writes the animation as Lottie JSON. `pretty` indents by four spaces.
pub fn export_lottie<W: Write>(animation: &Animation, writer: W, pretty: bool) -> LottieResult<()> {
    let config = JsonConfig {
        pretty,
        ..JsonConfig::default()
    };
    export_lottie_with(animation, writer, &config)
}

pub fn export_lottie_with<W: Write>(
    animation: &Animation,
    writer: W,
    config: &JsonConfig,
) -> LottieResult<()> {
    let dict = animation.to_dict()?;
    debug!(layers = animation.layers.len(), pretty = config.pretty, "exporting lottie");
    write_json(&Json::Object(dict), writer, config.pretty.then_some(config.indent))
}

pub fn to_lottie_string(animation: &Animation, pretty: bool) -> LottieResult<String> {
    let mut buffer = Vec::new();
    export_lottie(animation, &mut buffer, pretty)?;
    String::from_utf8(buffer).map_err(|e| LottieError::InvalidArgument(e.to_string()))
}

/// Reads a Lottie JSON document.
pub fn import_lottie<R: Read>(reader: R) -> LottieResult<Animation> {
    let value: Json = serde_json::from_reader(reader)?;
    load_animation(&value)
}

pub(crate) fn load_animation(value: &Json) -> LottieResult<Animation> {
    match value {
        Json::Object(dict) => Animation::load(dict),
        other => Err(LottieError::unexpected(
            "animation object",
            lottie_model::values::json_kind(other),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_model::{Composition, NullLayer};

    #[test]
    fn test_compact_and_pretty_output() {
        let animation = Animation::new(60.0, 60.0);
        let compact = to_lottie_string(&animation, false).unwrap();
        assert!(compact.starts_with("{\"layers\":[],\"v\":\"5.5.2\""));
        assert!(!compact.contains('\n'));

        let pretty = to_lottie_string(&animation, true).unwrap();
        assert!(pretty.contains("\n    \"v\": \"5.5.2\""));
    }

    #[test]
    fn test_custom_indent() {
        let config = JsonConfig {
            pretty: true,
            indent: 2,
        };
        let mut buffer = Vec::new();
        export_lottie_with(&Animation::default(), &mut buffer, &config).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("\n  \"fr\": 60"));
    }

    #[test]
    fn test_import_round_trip() {
        let mut animation = Animation::new(24.0, 30.0);
        animation.add_layer(NullLayer::default());
        let text = to_lottie_string(&animation, true).unwrap();
        let loaded = import_lottie(text.as_bytes()).unwrap();
        assert_eq!(loaded, animation);
    }

    #[test]
    fn test_import_rejects_non_objects() {
        assert!(matches!(
            import_lottie("[1, 2]".as_bytes()),
            Err(LottieError::UnexpectedType { .. })
        ));
        assert!(matches!(
            import_lottie("{".as_bytes()),
            Err(LottieError::Serialization(_))
        ));
    }
}
