//! Conversion between wire JSON and the primitive values properties hold.

use lottie_core::{Bezier, LottieError, LottieResult, NVector};

use crate::object::Node;
use crate::{Dict, Json};

/// A value a property can hold, convertible to and from its wire form.
pub trait LottieValue: Sized {
    /// Type name reported in property errors.
    const TYPE_NAME: &'static str;

    fn to_json(&self) -> LottieResult<Json>;

    fn from_json(value: &Json) -> LottieResult<Self>;

    /// The value as a graph node, for values that are objects themselves.
    fn as_node(&self) -> Option<&dyn Node> {
        None
    }
}

/// A wire encoding that differs from the value's natural JSON form.
pub trait Converter {
    type Value;
    const NAME: &'static str;

    fn to_lottie(value: &Self::Value) -> Json;
    fn from_lottie(value: &Json) -> LottieResult<Self::Value>;
}

/// Booleans written as `0`/`1`.
pub struct PseudoBool;

impl Converter for PseudoBool {
    type Value = bool;
    const NAME: &'static str = "PseudoBool";

    fn to_lottie(value: &bool) -> Json {
        Json::from(i64::from(*value))
    }

    fn from_lottie(value: &Json) -> LottieResult<bool> {
        match value {
            Json::Bool(b) => Ok(*b),
            Json::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
            other => Err(LottieError::unexpected("0 or 1", json_kind(other))),
        }
    }
}

/// Short name of a JSON value's kind, for error messages.
pub fn json_kind(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Writes a float, using an integer when it has no fractional part.
pub fn number_to_json(value: f64) -> LottieResult<Json> {
    if !value.is_finite() {
        return Err(LottieError::NonFiniteNumber(value));
    }
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        return Ok(Json::from(value as i64));
    }
    serde_json::Number::from_f64(value)
        .map(Json::Number)
        .ok_or(LottieError::NonFiniteNumber(value))
}

/// Whether `value` is a number with a fractional part, which no integer
/// discriminator accepts.
pub fn is_fractional(value: &Json) -> bool {
    match unwrap_single(value) {
        Json::Number(n) if !n.is_i64() && !n.is_u64() => {
            n.as_f64().map_or(true, |v| v.fract() != 0.0)
        }
        _ => false,
    }
}

pub fn expect_object<'a>(value: &'a Json) -> LottieResult<&'a Dict> {
    value
        .as_object()
        .ok_or_else(|| LottieError::unexpected("object", json_kind(value)))
}

/// Scalars given as a one-element array are unwrapped.
fn unwrap_single(value: &Json) -> &Json {
    match value {
        Json::Array(items) if !items.is_empty() => &items[0],
        other => other,
    }
}

impl LottieValue for f64 {
    const TYPE_NAME: &'static str = "float";

    fn to_json(&self) -> LottieResult<Json> {
        number_to_json(*self)
    }

    fn from_json(value: &Json) -> LottieResult<Self> {
        match unwrap_single(value) {
            Json::Number(n) => n
                .as_f64()
                .ok_or_else(|| LottieError::unexpected("number", "out of range number")),
            Json::Bool(b) => Ok(f64::from(u8::from(*b))),
            other => Err(LottieError::unexpected("number", json_kind(other))),
        }
    }
}

impl LottieValue for i64 {
    const TYPE_NAME: &'static str = "int";

    fn to_json(&self) -> LottieResult<Json> {
        Ok(Json::from(*self))
    }

    fn from_json(value: &Json) -> LottieResult<Self> {
        match unwrap_single(value) {
            Json::Number(n) => {
                if let Some(v) = n.as_i64() {
                    return Ok(v);
                }
                match n.as_f64() {
                    Some(v) if v.is_finite() => Ok(v.trunc() as i64),
                    _ => Err(LottieError::unexpected("integer", "out of range number")),
                }
            }
            Json::Bool(b) => Ok(i64::from(*b)),
            other => Err(LottieError::unexpected("integer", json_kind(other))),
        }
    }
}

impl LottieValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn to_json(&self) -> LottieResult<Json> {
        Ok(Json::Bool(*self))
    }

    fn from_json(value: &Json) -> LottieResult<Self> {
        match value {
            Json::Bool(b) => Ok(*b),
            Json::Number(n) => Ok(n.as_f64().is_some_and(|v| v != 0.0)),
            other => Err(LottieError::unexpected("boolean", json_kind(other))),
        }
    }
}

impl LottieValue for String {
    const TYPE_NAME: &'static str = "str";

    fn to_json(&self) -> LottieResult<Json> {
        Ok(Json::String(self.clone()))
    }

    fn from_json(value: &Json) -> LottieResult<Self> {
        match value {
            Json::String(s) => Ok(s.clone()),
            Json::Number(n) => Ok(n.to_string()),
            other => Err(LottieError::unexpected("string", json_kind(other))),
        }
    }
}

impl LottieValue for NVector {
    const TYPE_NAME: &'static str = "NVector";

    fn to_json(&self) -> LottieResult<Json> {
        self.iter()
            .map(|c| number_to_json(*c))
            .collect::<LottieResult<Vec<_>>>()
            .map(Json::Array)
    }

    fn from_json(value: &Json) -> LottieResult<Self> {
        match value {
            Json::Array(items) => items
                .iter()
                .map(f64::from_json)
                .collect::<LottieResult<Vec<_>>>()
                .map(NVector::from),
            Json::Number(_) => Ok(NVector::new(vec![f64::from_json(value)?])),
            other => Err(LottieError::unexpected("array of numbers", json_kind(other))),
        }
    }
}

fn points_to_json(points: &[NVector]) -> LottieResult<Json> {
    points
        .iter()
        .map(NVector::to_json)
        .collect::<LottieResult<Vec<_>>>()
        .map(Json::Array)
}

fn points_from_json(dict: &Dict, key: &str) -> LottieResult<Vec<NVector>> {
    match dict.get(key) {
        None | Some(Json::Null) => Ok(Vec::new()),
        Some(Json::Array(items)) => items
            .iter()
            .map(NVector::from_json)
            .collect::<LottieResult<Vec<_>>>()
            .map_err(|e| LottieError::property(key, key, "NVector", e)),
        Some(other) => Err(LottieError::property(
            key,
            key,
            "NVector",
            LottieError::unexpected("array", json_kind(other)),
        )),
    }
}

/// Paths are written as `{"c": closed, "i": [...], "o": [...], "v": [...]}`.
impl LottieValue for Bezier {
    const TYPE_NAME: &'static str = "Bezier";

    fn to_json(&self) -> LottieResult<Json> {
        let mut dict = Dict::new();
        dict.insert("c".into(), Json::Bool(self.closed));
        dict.insert("i".into(), points_to_json(&self.in_tangents)?);
        dict.insert("o".into(), points_to_json(&self.out_tangents)?);
        dict.insert("v".into(), points_to_json(&self.vertices)?);
        Ok(Json::Object(dict))
    }

    fn from_json(value: &Json) -> LottieResult<Self> {
        let dict = expect_object(value)?;
        let closed = match dict.get("c") {
            None | Some(Json::Null) => false,
            Some(c) => bool::from_json(c)?,
        };
        let bezier = Bezier {
            closed,
            in_tangents: points_from_json(dict, "i")?,
            out_tangents: points_from_json(dict, "o")?,
            vertices: points_from_json(dict, "v")?,
        };
        let n = bezier.vertices.len();
        if bezier.in_tangents.len() != n || bezier.out_tangents.len() != n {
            return Err(LottieError::InvalidArgument(format!(
                "bezier has {} vertices, {} in tangents and {} out tangents",
                n,
                bezier.in_tangents.len(),
                bezier.out_tangents.len()
            )));
        }
        Ok(bezier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_whole_floats_become_integers() {
        assert_eq!(2.0f64.to_json().unwrap(), json!(2));
        assert_eq!(2.5f64.to_json().unwrap(), json!(2.5));
        assert_eq!((-0.0f64).to_json().unwrap(), json!(0));
    }

    #[test]
    fn test_non_finite_is_error() {
        assert!(matches!(
            f64::NAN.to_json(),
            Err(LottieError::NonFiniteNumber(_))
        ));
    }

    #[test]
    fn test_scalar_unwraps_single_element_array() {
        assert_eq!(f64::from_json(&json!([7])).unwrap(), 7.0);
        assert_eq!(i64::from_json(&json!(3.0)).unwrap(), 3);
    }

    #[test]
    fn test_pseudo_bool() {
        assert_eq!(PseudoBool::to_lottie(&true), json!(1));
        assert!(!PseudoBool::from_lottie(&json!(0)).unwrap());
        assert!(PseudoBool::from_lottie(&json!(true)).unwrap());
        assert!(PseudoBool::from_lottie(&json!("yes")).is_err());
    }

    #[test]
    fn test_nvector_json() {
        let v = NVector::xy(1.0, 0.5);
        assert_eq!(v.to_json().unwrap(), json!([1, 0.5]));
        assert_eq!(NVector::from_json(&json!([3, 4])).unwrap(), NVector::xy(3.0, 4.0));
        assert!(NVector::from_json(&json!("x")).is_err());
    }

    #[test]
    fn test_bezier_json() {
        let mut bez = Bezier::new();
        bez.add_point(NVector::xy(0.0, 0.0));
        bez.add_smooth_point(NVector::xy(10.0, 0.0), NVector::xy(-1.0, 0.5));
        bez.close(true);

        let wire = bez.to_json().unwrap();
        assert_eq!(
            wire,
            json!({
                "c": true,
                "i": [[0, 0], [-1, 0.5]],
                "o": [[0, 0], [1, -0.5]],
                "v": [[0, 0], [10, 0]]
            })
        );
        assert_eq!(Bezier::from_json(&wire).unwrap(), bez);
    }

    #[test]
    fn test_bezier_rejects_mismatched_arrays() {
        let wire = json!({"c": false, "i": [[0, 0]], "o": [], "v": [[0, 0]]});
        assert!(matches!(
            Bezier::from_json(&wire),
            Err(LottieError::InvalidArgument(_))
        ));
    }
}
