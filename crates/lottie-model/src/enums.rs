//! Enumerations with integer or string wire values.

macro_rules! lottie_enum {
    (
        $(#[$meta:meta])*
        $name:ident : $raw:ty { $($variant:ident = $value:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire value.
            pub fn value(self) -> $raw {
                match self {
                    $($name::$variant => $value.into()),+
                }
            }

            pub fn from_value(value: &$raw) -> Option<Self> {
                $(if *value == <$raw>::from($value) {
                    return Some($name::$variant);
                })+
                None
            }
        }

        impl $crate::values::LottieValue for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn to_json(&self) -> $crate::LottieResult<$crate::Json> {
                Ok($crate::Json::from(self.value()))
            }

            fn from_json(value: &$crate::Json) -> $crate::LottieResult<Self> {
                if $crate::values::is_fractional(value) {
                    return Err($crate::LottieError::unknown_discriminator(stringify!($name), value));
                }
                let raw = <$raw as $crate::values::LottieValue>::from_json(value)?;
                Self::from_value(&raw)
                    .ok_or_else(|| $crate::LottieError::unknown_discriminator(stringify!($name), raw))
            }
        }
    };
}

pub(crate) use lottie_enum;

lottie_enum! {
    /// How a layer blends with the layers below it.
    BlendMode: i64 {
        Normal = 0,
        Multiply = 1,
        Screen = 2,
        Overlay = 3,
        Darken = 4,
        Lighten = 5,
        ColorDodge = 6,
        ColorBurn = 7,
        HardLight = 8,
        SoftLight = 9,
        Difference = 10,
        Exclusion = 11,
        Hue = 12,
        Saturation = 13,
        Color = 14,
        Luminosity = 15,
    }
}

lottie_enum! {
    /// Track matte applied from the layer above.
    MatteMode: i64 {
        Normal = 0,
        Alpha = 1,
        InvertedAlpha = 2,
        Luma = 3,
        InvertedLuma = 4,
    }
}

lottie_enum! {
    /// How masks combine with each other.
    MaskMode: String {
        None = "n",
        Add = "a",
        Subtract = "s",
        Intersect = "i",
        Lighten = "l",
        Darken = "d",
        Difference = "f",
    }
}

lottie_enum! {
    FillRule: i64 {
        NonZero = 1,
        EvenOdd = 2,
    }
}

lottie_enum! {
    StarType: i64 {
        Star = 1,
        Polygon = 2,
    }
}

lottie_enum! {
    LineJoin: i64 {
        Miter = 1,
        Round = 2,
        Bevel = 3,
    }
}

lottie_enum! {
    LineCap: i64 {
        Butt = 1,
        Round = 2,
        Square = 3,
    }
}

lottie_enum! {
    StrokeDashType: String {
        Dash = "d",
        Gap = "g",
        Offset = "o",
    }
}

lottie_enum! {
    GradientType: i64 {
        Linear = 1,
        Radial = 2,
    }
}

lottie_enum! {
    TrimMultipleShapes: i64 {
        Simultaneously = 1,
        Individually = 2,
    }
}

lottie_enum! {
    /// Stacking order of repeater copies.
    Composite: i64 {
        Above = 1,
        Below = 2,
    }
}

impl StrokeDashType {
    /// Default dash name, as written by After Effects.
    pub fn label(self) -> &'static str {
        match self {
            StrokeDashType::Dash => "dash",
            StrokeDashType::Gap => "gap",
            StrokeDashType::Offset => "offset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::LottieValue;
    use crate::LottieError;
    use serde_json::json;

    #[test]
    fn test_integer_enum_json() {
        assert_eq!(BlendMode::Screen.to_json().unwrap(), json!(2));
        assert_eq!(
            BlendMode::from_json(&json!(15)).unwrap(),
            BlendMode::Luminosity
        );
        assert_eq!(BlendMode::ALL.len(), 16);
    }

    #[test]
    fn test_string_enum_json() {
        assert_eq!(MaskMode::Intersect.to_json().unwrap(), json!("i"));
        assert_eq!(MaskMode::from_json(&json!("s")).unwrap(), MaskMode::Subtract);
        assert_eq!(StrokeDashType::Gap.label(), "gap");
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = FillRule::from_json(&json!(7)).unwrap_err();
        assert!(matches!(err, LottieError::UnknownDiscriminator { tag, .. } if tag == "7"));
        assert!(MaskMode::from_json(&json!("zz")).is_err());
    }

    #[test]
    fn test_fractional_value_is_rejected() {
        let err = BlendMode::from_json(&json!(1.5)).unwrap_err();
        assert!(matches!(err, LottieError::UnknownDiscriminator { tag, .. } if tag == "1.5"));
        assert_eq!(BlendMode::from_json(&json!(1.0)).unwrap(), BlendMode::Multiply);
    }
}
