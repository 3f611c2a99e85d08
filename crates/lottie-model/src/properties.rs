//! Animatable properties.
//!
//! A property is either static, holding one value, or animated, holding a
//! list of keyframes. On the wire the two forms share the `k` key and are
//! told apart by the `a` flag:
//!
//! ```json
//! {"a": 0, "k": [256, 256]}
//! {"a": 1, "k": [{"t": 0, "s": [0, 0], "e": [10, 10]}, {"t": 30, "s": [10, 10]}]}
//! ```

use std::sync::OnceLock;

use lottie_core::{Bezier, LottieError, LottieResult, NVector};

use crate::easing::Easing;
use crate::keyframe::{Keyframe, KeyframeValue};
use crate::object::{LottieObject, Node, Schema};
use crate::prop::{Cardinality, Prop};
use crate::values::{json_kind, Converter, LottieValue, PseudoBool};
use crate::{Dict, Json};

/// The two states of an animatable property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue<T> {
    Static(T),
    Animated(Vec<Keyframe<T>>),
}

impl<T: Default> Default for PropertyValue<T> {
    fn default() -> Self {
        PropertyValue::Static(T::default())
    }
}

/// A property that is either a fixed value or a keyframe animation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Animatable<T> {
    pub value: PropertyValue<T>,
    pub property_index: Option<i64>,
}

/// An animatable number.
pub type Value = Animatable<f64>;

/// An animatable vector: positions, sizes, colors.
pub type MultiDimensional = Animatable<NVector>;

/// Positions also accept the split `{"s": true, "x": .., "y": ..}` form on load.
pub type PositionValue = MultiDimensional;

/// An animatable path.
pub type ShapeProperty = Animatable<Bezier>;

impl<T> From<T> for Animatable<T> {
    fn from(value: T) -> Self {
        Self {
            value: PropertyValue::Static(value),
            property_index: None,
        }
    }
}

impl<T: KeyframeValue> Animatable<T> {
    pub fn new(value: T) -> Self {
        Self::from(value)
    }

    pub fn with_keyframes(keyframes: Vec<Keyframe<T>>) -> Self {
        Self {
            value: PropertyValue::Animated(keyframes),
            property_index: None,
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self.value, PropertyValue::Animated(_))
    }

    /// The fixed value, when the property is not animated.
    pub fn static_value(&self) -> Option<&T> {
        match &self.value {
            PropertyValue::Static(value) => Some(value),
            PropertyValue::Animated(_) => None,
        }
    }

    pub fn keyframes(&self) -> Option<&[Keyframe<T>]> {
        match &self.value {
            PropertyValue::Animated(keyframes) => Some(keyframes),
            PropertyValue::Static(_) => None,
        }
    }

    pub fn keyframes_mut(&mut self) -> Option<&mut Vec<Keyframe<T>>> {
        match &mut self.value {
            PropertyValue::Animated(keyframes) => Some(keyframes),
            PropertyValue::Static(_) => None,
        }
    }

    /// Drops any animation and holds `value`.
    pub fn clear_animation(&mut self, value: T) {
        self.value = PropertyValue::Static(value);
    }

    /// Appends a keyframe. Calls must come in increasing `time` order.
    ///
    /// The first call turns a static property into an animated one. Later
    /// calls end the previous keyframe at `value`, easing into it with
    /// `easing`. A call at the time of the last keyframe replaces its start.
    pub fn add_keyframe(&mut self, time: f64, value: T, easing: Easing) -> &mut Self {
        if let PropertyValue::Animated(keyframes) = &mut self.value {
            if let Some(last) = keyframes.last_mut() {
                if last.time == time {
                    if last.start.as_ref() != Some(&value) {
                        last.start = Some(value);
                    }
                    return self;
                }
                last.end = Some(value.clone());
                last.set_easing(&easing);
            }
            keyframes.push(Keyframe::new(time, value, &easing));
            return self;
        }
        self.value = PropertyValue::Animated(vec![Keyframe::new(time, value, &easing)]);
        self
    }

    /// Value at `time`, held constant between keyframes.
    ///
    /// Returns the start of the last keyframe at or before `time` (the first
    /// keyframe for earlier times). An animated property with no keyframes
    /// has no value.
    pub fn get_value(&self, time: f64) -> Option<T> {
        let keyframes = match &self.value {
            PropertyValue::Static(value) => return Some(value.clone()),
            PropertyValue::Animated(keyframes) => keyframes,
        };
        let first = keyframes.first()?;
        let mut value = None;
        let mut previous_end: Option<&T> = None;
        for (i, keyframe) in keyframes.iter().enumerate() {
            if i > 0 && keyframe.time > time {
                break;
            }
            value = keyframe.start.as_ref().or(previous_end);
            previous_end = keyframe.end.as_ref();
        }
        value.or(first.end.as_ref()).cloned()
    }

    /// Value at `time`, following keyframe easing and spatial tangents.
    pub fn get_value_interpolated(&self, time: f64) -> Option<T> {
        let keyframes = match &self.value {
            PropertyValue::Static(value) => return Some(value.clone()),
            PropertyValue::Animated(keyframes) => keyframes,
        };
        let last = keyframes.last()?;
        match keyframes.iter().position(|k| k.time >= time) {
            Some(0) => keyframes[0].start.clone().or_else(|| keyframes[0].end.clone()),
            Some(i) => {
                let (previous, next) = (&keyframes[i - 1], &keyframes[i]);
                let ratio = segment_ratio(previous.time, next.time, time);
                let end = previous.end.as_ref().or(next.start.as_ref());
                previous
                    .interpolated_value(ratio, end)
                    .or_else(|| next.start.clone())
            }
            None => last.end.clone().or_else(|| last.start.clone()),
        }
    }

    /// Combines several animated properties into one.
    ///
    /// Every distinct keyframe time of `items` becomes a keyframe whose start
    /// is `conversion` applied to the values of `items` at that time. Easing
    /// is taken from the first keyframe found at each time.
    pub fn merge_keyframes<U, F>(items: &[&Animatable<U>], conversion: F) -> Vec<Keyframe<T>>
    where
        U: KeyframeValue,
        F: Fn(Vec<U>) -> T,
    {
        let mut source: Vec<&Keyframe<U>> = items
            .iter()
            .filter_map(|item| item.keyframes())
            .flatten()
            .collect();
        source.sort_by(|a, b| a.time.total_cmp(&b.time));

        let mut merged: Vec<Keyframe<T>> = Vec::new();
        for keyframe in source {
            if merged.last().is_some_and(|k| k.time == keyframe.time) {
                continue;
            }
            let values = items
                .iter()
                .map(|item| item.get_value(keyframe.time).unwrap_or_default())
                .collect();
            merged.push(Keyframe {
                time: keyframe.time,
                in_value: keyframe.in_value,
                out_value: keyframe.out_value,
                jump: keyframe.jump,
                start: Some(conversion(values)),
                ..Default::default()
            });
        }
        for i in 1..merged.len() {
            merged[i - 1].end = merged[i].start.clone();
        }
        merged
    }
}

impl Animatable<NVector> {
    /// Direction of motion at `time`, in radians, for auto-orient.
    pub fn get_tangent_angle(&self, time: f64) -> f64 {
        let keyframes = match &self.value {
            PropertyValue::Animated(keyframes) if keyframes.len() >= 2 => keyframes,
            _ => return 0.0,
        };
        match keyframes.iter().position(|k| k.time >= time) {
            Some(0) => {
                let end = keyframes[0].end.as_ref().or(keyframes[1].start.as_ref());
                keyframes[0].interpolated_tangent_angle(0.0, end)
            }
            Some(i) => {
                let (previous, next) = (&keyframes[i - 1], &keyframes[i]);
                let ratio = segment_ratio(previous.time, next.time, time);
                let end = previous.end.as_ref().or(next.start.as_ref());
                previous.interpolated_tangent_angle(ratio, end)
            }
            None => 0.0,
        }
    }
}

fn segment_ratio(start: f64, end: f64, time: f64) -> f64 {
    let span = end - start;
    if span > 0.0 {
        (time - start) / span
    } else {
        1.0
    }
}

/// Whether a wire dictionary holds the animated form.
///
/// An explicit `a` flag wins; otherwise `k` being a list of objects means
/// keyframes.
pub fn prop_animated(dict: &Dict) -> bool {
    if let Some(flag) = dict.get("a") {
        return PseudoBool::from_lottie(flag).unwrap_or(false);
    }
    matches!(dict.get("k"), Some(Json::Array(items)) if items.first().is_some_and(Json::is_object))
}

pub fn prop_not_animated(dict: &Dict) -> bool {
    !prop_animated(dict)
}

fn keyframes_to_json<T>(keyframes: &[Keyframe<T>]) -> LottieResult<Json>
where
    Keyframe<T>: LottieObject,
{
    let mut items = keyframes
        .iter()
        .map(LottieObject::to_dict)
        .collect::<LottieResult<Vec<Dict>>>()?;
    if let Some(last) = items.last_mut() {
        last.retain(|key, _| key != "i" && key != "o");
    }
    Ok(Json::Array(items.into_iter().map(Json::Object).collect()))
}

fn keyframes_from_json<T>(json: Option<&Json>) -> LottieResult<Vec<Keyframe<T>>>
where
    Keyframe<T>: LottieValue,
{
    match json {
        None | Some(Json::Null) => Ok(Vec::new()),
        Some(Json::Array(items)) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(Keyframe::<T>::from_json)
            .collect(),
        Some(other) => Err(LottieError::unexpected("array of keyframes", json_kind(other))),
    }
}

fn animatable_props<T>() -> Vec<Prop<Animatable<T>>>
where
    T: KeyframeValue,
    Keyframe<T>: LottieObject + LottieValue,
{
    vec![
        Prop::computed("animated", "a", PseudoBool::NAME, |o: &Animatable<T>| {
            Some(PseudoBool::to_lottie(&o.is_animated()))
        }),
        Prop::custom(
            "value",
            "k",
            T::TYPE_NAME,
            Cardinality::Scalar,
            |o: &Animatable<T>| o.static_value().map(LottieValue::to_json),
            |o: &mut Animatable<T>, json: Option<&Json>| {
                if let Some(json) = json.filter(|j| !j.is_null()) {
                    o.value = PropertyValue::Static(T::from_json(json)?);
                }
                Ok(())
            },
        )
        .when(prop_not_animated),
        Prop::custom(
            "keyframes",
            "k",
            <Keyframe<T> as LottieValue>::TYPE_NAME,
            Cardinality::List,
            |o: &Animatable<T>| o.keyframes().map(keyframes_to_json),
            |o: &mut Animatable<T>, json: Option<&Json>| {
                o.value = PropertyValue::Animated(keyframes_from_json(json)?);
                Ok(())
            },
        )
        .when(prop_animated)
        .with_children(|o: &Animatable<T>| {
            o.keyframes()
                .unwrap_or_default()
                .iter()
                .map(|k| k as &dyn Node)
                .collect()
        }),
        Prop::scalar(
            "property_index",
            "ix",
            |o: &Animatable<T>| &o.property_index,
            |o: &mut Animatable<T>| &mut o.property_index,
        ),
    ]
}

/// Loads the split position form into a single vector property.
fn load_split(obj: &mut MultiDimensional, dict: &Dict) -> LottieResult<()> {
    let split = dict
        .get("s")
        .is_some_and(|s| PseudoBool::from_lottie(s).unwrap_or(false));
    if !split {
        return Ok(());
    }

    let mut components = Vec::with_capacity(3);
    for key in ["x", "y", "z"] {
        match dict.get(key) {
            Some(json) => components.push(
                Value::from_json(json).map_err(|e| LottieError::property(key, key, "Value", e))?,
            ),
            None if key == "z" => {}
            None => components.push(Value::default()),
        }
    }

    if components.iter().any(Value::is_animated) {
        let refs: Vec<&Value> = components.iter().collect();
        obj.value = PropertyValue::Animated(MultiDimensional::merge_keyframes(&refs, NVector::new));
    } else {
        obj.value = PropertyValue::Static(NVector::new(
            components
                .iter()
                .map(|c| c.get_value(0.0).unwrap_or_default())
                .collect(),
        ));
    }
    Ok(())
}

macro_rules! animatable_schema {
    ($value:ty => $class:literal $(, after_load = $hook:path)?) => {
        impl Schema for Animatable<$value> {
            const CLASS: &'static str = $class;

            fn props() -> &'static [Prop<Self>] {
                static PROPS: OnceLock<Vec<Prop<Animatable<$value>>>> = OnceLock::new();
                PROPS.get_or_init(animatable_props::<$value>)
            }

            $(
                fn after_load(&mut self, dict: &Dict) -> LottieResult<()> {
                    $hook(self, dict)
                }
            )?
        }

        crate::schema_object!(Animatable<$value>);
    };
}

animatable_schema!(f64 => "Value");
animatable_schema!(NVector => "MultiDimensional", after_load = load_split);
animatable_schema!(Bezier => "ShapeProperty");

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dict(value: Json) -> Dict {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_static_wire_form() {
        let mut value = Value::new(5.0);
        assert_eq!(Json::Object(value.to_dict().unwrap()), json!({"a": 0, "k": 5}));
        value.property_index = Some(3);
        assert_eq!(
            Json::Object(value.to_dict().unwrap()),
            json!({"a": 0, "k": 5, "ix": 3})
        );
    }

    #[test]
    fn test_keyframes_are_added_in_order() {
        let mut position = MultiDimensional::new(NVector::xy(0.0, 0.0));
        position
            .add_keyframe(0.0, NVector::xy(10.0, 10.0), Easing::Linear)
            .add_keyframe(30.0, NVector::xy(50.0, 50.0), Easing::Linear)
            .add_keyframe(60.0, NVector::xy(0.0, 20.0), Easing::Linear);

        let keyframes = position.keyframes().unwrap();
        assert_eq!(keyframes.len(), 3);
        assert_eq!(keyframes[1].time, 30.0);
        assert_eq!(keyframes[1].start, Some(NVector::xy(50.0, 50.0)));
        assert_eq!(keyframes[0].end, Some(NVector::xy(50.0, 50.0)));
        assert_eq!(keyframes[2].end, None);
    }

    #[test]
    fn test_same_time_replaces_start() {
        let mut value = Value::default();
        value.add_keyframe(0.0, 1.0, Easing::Linear);
        value.add_keyframe(0.0, 2.0, Easing::Linear);
        let keyframes = value.keyframes().unwrap();
        assert_eq!(keyframes.len(), 1);
        assert_eq!(keyframes[0].start, Some(2.0));
    }

    #[test]
    fn test_easing_applies_to_previous_keyframe() {
        let mut value = Value::default();
        value.add_keyframe(0.0, 0.0, Easing::Linear);
        value.add_keyframe(10.0, 1.0, Easing::Jump);
        assert!(value.keyframes().unwrap()[0].is_jump());
        assert_eq!(value.get_value_interpolated(5.0), Some(0.0));
    }

    #[test]
    fn test_get_value_is_a_step_function() {
        let mut position = MultiDimensional::default();
        position.add_keyframe(0.0, NVector::xy(10.0, 10.0), Easing::Linear);
        position.add_keyframe(30.0, NVector::xy(50.0, 50.0), Easing::Linear);
        assert_eq!(position.get_value(-5.0), Some(NVector::xy(10.0, 10.0)));
        assert_eq!(position.get_value(15.0), Some(NVector::xy(10.0, 10.0)));
        assert_eq!(position.get_value(30.0), Some(NVector::xy(50.0, 50.0)));
        assert_eq!(position.get_value(90.0), Some(NVector::xy(50.0, 50.0)));
    }

    #[test]
    fn test_get_value_interpolated() {
        let mut position = MultiDimensional::default();
        position.add_keyframe(0.0, NVector::xy(10.0, 10.0), Easing::Linear);
        position.add_keyframe(30.0, NVector::xy(50.0, 50.0), Easing::Linear);
        let mid = position.get_value_interpolated(15.0).unwrap();
        assert!((mid[0] - 30.0).abs() < 1e-3);
        assert!((mid[1] - 30.0).abs() < 1e-3);
        assert_eq!(
            position.get_value_interpolated(45.0),
            Some(NVector::xy(50.0, 50.0))
        );
    }

    #[test]
    fn test_empty_animation_has_no_value() {
        let value = Value::with_keyframes(Vec::new());
        assert_eq!(value.get_value(0.0), None);
        assert_eq!(value.get_value_interpolated(0.0), None);
    }

    #[test]
    fn test_missing_first_start_falls_back_to_end() {
        let value = Value::with_keyframes(vec![
            Keyframe {
                time: 0.0,
                end: Some(4.0),
                ..Default::default()
            },
            Keyframe {
                time: 10.0,
                ..Default::default()
            },
        ]);
        assert_eq!(value.get_value(0.0), Some(4.0));
        assert_eq!(value.get_value(12.0), Some(4.0));
    }

    #[test]
    fn test_clear_animation() {
        let mut value = Value::default();
        value.add_keyframe(0.0, 1.0, Easing::Linear);
        value.clear_animation(7.0);
        assert!(!value.is_animated());
        assert_eq!(value.get_value(100.0), Some(7.0));
    }

    #[test]
    fn test_animated_wire_form_drops_last_easing() {
        let mut value = Value::default();
        value.add_keyframe(0.0, 0.0, Easing::Linear);
        value.add_keyframe(10.0, 100.0, Easing::Linear);
        assert_eq!(
            Json::Object(value.to_dict().unwrap()),
            json!({
                "a": 1,
                "k": [
                    {"t": 0, "i": {"x": [1], "y": [1]}, "o": {"x": [0], "y": [0]}, "s": [0], "e": [100]},
                    {"t": 10, "s": [100]}
                ]
            })
        );
    }

    #[test]
    fn test_load_detects_animation_without_flag() {
        let value = Value::load(&dict(json!({"k": [{"t": 0, "s": [1]}, {"t": 5, "s": [2]}]})))
            .unwrap();
        assert!(value.is_animated());
        assert_eq!(value.get_value(5.0), Some(2.0));

        let value = Value::load(&dict(json!({"k": [3]}))).unwrap();
        assert_eq!(value.static_value(), Some(&3.0));
    }

    #[test]
    fn test_load_round_trip() {
        let wire = json!({
            "a": 1,
            "k": [
                {"t": 0, "i": {"x": [0.5], "y": [1]}, "o": {"x": [0.5], "y": [0]}, "s": [0, 0], "e": [5, 5], "to": [1, 0], "ti": [-1, 0]},
                {"t": 20, "s": [5, 5]}
            ],
            "ix": 2
        });
        let loaded = MultiDimensional::load(&dict(wire.clone())).unwrap();
        assert_eq!(Json::Object(loaded.to_dict().unwrap()), wire);
    }

    #[test]
    fn test_split_position() {
        let position = PositionValue::load(&dict(json!({
            "s": true,
            "x": {"a": 0, "k": 10},
            "y": {"a": 1, "k": [{"t": 0, "s": [0]}, {"t": 10, "s": [20]}]}
        })))
        .unwrap();
        let keyframes = position.keyframes().unwrap();
        assert_eq!(keyframes.len(), 2);
        assert_eq!(keyframes[0].start, Some(NVector::xy(10.0, 0.0)));
        assert_eq!(keyframes[0].end, Some(NVector::xy(10.0, 20.0)));
        assert_eq!(position.get_value(10.0), Some(NVector::xy(10.0, 20.0)));

        let position = PositionValue::load(&dict(json!({
            "s": 1,
            "x": {"a": 0, "k": 1},
            "y": {"a": 0, "k": 2},
            "z": {"a": 0, "k": 3}
        })))
        .unwrap();
        assert_eq!(position.static_value(), Some(&NVector::xyz(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_tangent_angle_follows_motion() {
        let mut position = MultiDimensional::default();
        position.add_keyframe(0.0, NVector::xy(0.0, 0.0), Easing::Linear);
        position.add_keyframe(10.0, NVector::xy(0.0, 10.0), Easing::Linear);
        if let Some(keyframes) = position.keyframes_mut() {
            keyframes[0].out_tan = Some(NVector::xy(0.0, 1.0));
            keyframes[0].in_tan = Some(NVector::xy(0.0, -1.0));
        }
        let angle = position.get_tangent_angle(5.0);
        assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(MultiDimensional::new(NVector::xy(1.0, 1.0)).get_tangent_angle(0.0), 0.0);
    }

    #[test]
    fn test_shape_property_static() {
        let mut bez = Bezier::new();
        bez.add_point(NVector::xy(0.0, 0.0));
        bez.add_point(NVector::xy(1.0, 1.0));
        let shape = ShapeProperty::new(bez.clone());
        let loaded = ShapeProperty::load(&shape.to_dict().unwrap()).unwrap();
        assert_eq!(loaded.static_value(), Some(&bez));
    }
}
