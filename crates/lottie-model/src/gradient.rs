//! Gradient color stops.
//!
//! Lottie packs gradient stops into one flat vector. Without alpha it is a
//! run of `offset, r, g, b` quadruples; when any stop has alpha, a run of
//! `offset, alpha` pairs follows. A gradient from opaque red to half
//! transparent blue is `[0, 1, 0, 0, 1, 0, 0, 1, 0, 1, 1, 0.5]`.

use std::sync::OnceLock;

use lottie_core::NVector;

use crate::easing::Easing;
use crate::object::Schema;
use crate::prop::{Cardinality, Prop};
use crate::properties::{MultiDimensional, PropertyValue};

/// One color stop: an offset in `[0, 1]` and an RGB or RGBA color.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: NVector,
}

impl GradientStop {
    pub fn new(offset: f64, color: NVector) -> Self {
        Self { offset, color }
    }

    fn alpha(&self) -> f64 {
        self.color.components.get(3).copied().unwrap_or(1.0)
    }
}

/// The animatable stop list of a gradient fill or stroke.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GradientColors {
    /// Flattened stops.
    pub colors: MultiDimensional,
    /// Number of stops.
    pub count: i64,
}

fn rgb(color: &NVector) -> [f64; 3] {
    let c = |i: usize| color.components.get(i).copied().unwrap_or(0.0);
    [c(0), c(1), c(2)]
}

fn flatten(stops: &[GradientStop]) -> NVector {
    let mut flat: Vec<f64> = stops
        .iter()
        .flat_map(|stop| {
            let [r, g, b] = rgb(&stop.color);
            [stop.offset, r, g, b]
        })
        .collect();
    if stops.iter().any(|stop| stop.color.len() > 3) {
        flat.extend(stops.iter().flat_map(|stop| [stop.offset, stop.alpha()]));
    }
    NVector::new(flat)
}

fn unflatten(flat: &NVector, count: usize) -> Vec<GradientStop> {
    let c = &flat.components;
    if c.len() < count * 4 {
        return Vec::new();
    }
    let has_alpha = c.len() >= count * 6 && c.len() != count * 4;
    (0..count)
        .map(|i| {
            let off = i * 4;
            let mut color = vec![c[off + 1], c[off + 2], c[off + 3]];
            if has_alpha {
                color.push(c[count * 4 + i * 2 + 1]);
            }
            GradientStop::new(c[off], NVector::new(color))
        })
        .collect()
}

/// Inserts one stop into a flattened vector holding `count` stops.
fn insert_flat(flat: &mut NVector, count: usize, stop: &GradientStop) {
    let [r, g, b] = rgb(&stop.color);
    let rgb_size = 4 * count;
    let c = &mut flat.components;
    if c.len() == rgb_size {
        c.extend([stop.offset, r, g, b]);
        if count == 0 && stop.color.len() > 3 {
            c.extend([stop.offset, stop.alpha()]);
        }
    } else {
        let tail = c.split_off(rgb_size.min(c.len()));
        c.extend([stop.offset, r, g, b]);
        c.extend(tail);
        c.extend([stop.offset, stop.alpha()]);
    }
}

impl GradientColors {
    pub fn from_stops(stops: &[GradientStop]) -> Self {
        let mut gradient = Self::default();
        gradient.set_stops(stops, None);
        gradient
    }

    /// Replaces the stops, either of the static value or of keyframe
    /// `keyframe` (which also becomes the end of the keyframe before it).
    pub fn set_stops(&mut self, stops: &[GradientStop], keyframe: Option<usize>) {
        let flat = flatten(stops);
        match (keyframe, self.colors.keyframes_mut()) {
            (Some(index), Some(keyframes)) if index < keyframes.len() => {
                if index > 0 {
                    keyframes[index - 1].end = Some(flat.clone());
                }
                keyframes[index].start = Some(flat);
            }
            _ => self.colors.clear_animation(flat),
        }
        self.count = stops.len() as i64;
    }

    /// Adds a stop to the static value, to one keyframe, or to every keyframe
    /// when `keyframe` is `None`.
    pub fn add_color(&mut self, offset: f64, color: NVector, keyframe: Option<usize>) {
        let stop = GradientStop::new(offset, color);
        let count = self.count.max(0) as usize;
        match &mut self.colors.value {
            PropertyValue::Static(flat) => insert_flat(flat, count, &stop),
            PropertyValue::Animated(keyframes) => match keyframe {
                None => {
                    for kf in keyframes.iter_mut() {
                        for flat in [&mut kf.start, &mut kf.end].into_iter().flatten() {
                            insert_flat(flat, count, &stop);
                        }
                    }
                }
                Some(index) => {
                    if index > 0 {
                        if let Some(flat) = keyframes.get_mut(index - 1).and_then(|k| k.end.as_mut()) {
                            insert_flat(flat, count, &stop);
                        }
                    }
                    if let Some(flat) = keyframes.get_mut(index).and_then(|k| k.start.as_mut()) {
                        insert_flat(flat, count, &stop);
                    }
                }
            },
        }
        self.count += 1;
    }

    pub fn add_keyframe(&mut self, time: f64, stops: &[GradientStop], easing: Easing) {
        self.colors.add_keyframe(time, flatten(stops), easing);
        self.count = stops.len() as i64;
    }

    /// Stops of the static value, or of keyframe `keyframe`.
    pub fn stops(&self, keyframe: Option<usize>) -> Vec<GradientStop> {
        let flat = match keyframe {
            Some(index) => self
                .colors
                .keyframes()
                .and_then(|k| k.get(index))
                .and_then(|k| k.start.as_ref()),
            None => self.colors.static_value(),
        };
        flat.map(|f| unflatten(f, self.count.max(0) as usize))
            .unwrap_or_default()
    }

    pub fn stops_at(&self, time: f64) -> Vec<GradientStop> {
        self.colors
            .get_value(time)
            .map(|f| unflatten(&f, self.count.max(0) as usize))
            .unwrap_or_default()
    }
}

impl Schema for GradientColors {
    const CLASS: &'static str = "GradientColors";

    fn props() -> &'static [Prop<Self>] {
        static PROPS: OnceLock<Vec<Prop<GradientColors>>> = OnceLock::new();
        PROPS.get_or_init(|| {
            vec![
                Prop::required(
                    "colors",
                    "k",
                    Cardinality::Scalar,
                    |o: &GradientColors| &o.colors,
                    |o: &mut GradientColors| &mut o.colors,
                ),
                Prop::required(
                    "count",
                    "p",
                    Cardinality::Scalar,
                    |o: &GradientColors| &o.count,
                    |o: &mut GradientColors| &mut o.count,
                ),
            ]
        })
    }
}

crate::schema_object!(GradientColors);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::LottieObject;
    use crate::Json;
    use serde_json::json;

    fn red_to_blue() -> Vec<GradientStop> {
        vec![
            GradientStop::new(0.0, NVector::xyz(1.0, 0.0, 0.0)),
            GradientStop::new(1.0, NVector::xyz(0.0, 0.0, 1.0)),
        ]
    }

    #[test]
    fn test_flatten_without_alpha() {
        let gradient = GradientColors::from_stops(&red_to_blue());
        assert_eq!(gradient.count, 2);
        assert_eq!(
            Json::Object(gradient.to_dict().unwrap()),
            json!({"k": {"a": 0, "k": [0, 1, 0, 0, 1, 0, 0, 1]}, "p": 2})
        );
        assert_eq!(gradient.stops(None), red_to_blue());
    }

    #[test]
    fn test_flatten_with_alpha() {
        let stops = vec![
            GradientStop::new(0.0, NVector::new(vec![1.0, 0.0, 0.0, 1.0])),
            GradientStop::new(1.0, NVector::new(vec![0.0, 0.0, 1.0, 0.5])),
        ];
        let gradient = GradientColors::from_stops(&stops);
        assert_eq!(
            gradient.colors.static_value().unwrap().components,
            vec![0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.5]
        );
        assert_eq!(gradient.stops(None), stops);
    }

    #[test]
    fn test_add_color() {
        let mut gradient = GradientColors::from_stops(&red_to_blue());
        gradient.add_color(0.5, NVector::xyz(0.0, 1.0, 0.0), None);
        assert_eq!(gradient.count, 3);
        let stops = gradient.stops(None);
        assert_eq!(stops[2], GradientStop::new(0.5, NVector::xyz(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_add_color_with_alpha_to_alpha_gradient() {
        let mut gradient = GradientColors::from_stops(&[GradientStop::new(
            0.0,
            NVector::new(vec![1.0, 1.0, 1.0, 0.2]),
        )]);
        gradient.add_color(1.0, NVector::new(vec![0.0, 0.0, 0.0, 0.8]), None);
        assert_eq!(
            gradient.colors.static_value().unwrap().components,
            vec![0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.2, 1.0, 0.8]
        );
    }

    #[test]
    fn test_animated_stops() {
        let mut gradient = GradientColors::default();
        gradient.add_keyframe(0.0, &red_to_blue(), Easing::Linear);
        let mut reversed = red_to_blue();
        reversed.reverse();
        for (i, stop) in reversed.iter_mut().enumerate() {
            stop.offset = i as f64;
        }
        gradient.add_keyframe(10.0, &reversed, Easing::Linear);
        assert_eq!(gradient.stops_at(0.0), red_to_blue());
        assert_eq!(gradient.stops_at(10.0), reversed);
        assert_eq!(gradient.stops(Some(1)), reversed);
    }
}
