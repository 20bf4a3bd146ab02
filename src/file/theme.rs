use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Both carousel tracks draw with the same colors so the overlay is
/// indistinguishable from the primary track underneath it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CarouselTheme {
    #[serde(with = "srgb_float")]
    pub background: Color,
    #[serde(with = "srgb_float")]
    pub card_background: Color,
    #[serde(with = "srgb_float")]
    pub photo_tint: Color,
    #[serde(with = "srgb_float")]
    pub text_primary: Color,
    #[serde(with = "srgb_float")]
    pub text_secondary: Color,
    #[serde(with = "srgb_float")]
    pub indicator_active: Color,
    #[serde(with = "srgb_float")]
    pub indicator_inactive: Color,
}

impl Default for CarouselTheme {
    fn default() -> Self {
        CarouselTheme {
            background: Color::srgb(0.149, 0.1529, 0.1451), // #262725
            card_background: Color::srgb(0.0, 0.502, 0.502), // #008080
            photo_tint: Color::WHITE,
            text_primary: Color::srgb(0.8196, 0.8118, 0.8118), // #d1cfcf
            text_secondary: Color::srgb(0.5922, 0.7098, 0.7059), // #97B5B4
            indicator_active: Color::srgb(1.0, 0.7216, 0.0), // #ffb800
            indicator_inactive: Color::srgb(0.2235, 0.1765, 0.1961), // #392d32
        }
    }
}

mod srgb_float {
    use bevy::prelude::Color;
    use serde::de::Deserializer;
    use serde::ser::{SerializeSeq, Serializer};
    use serde::Deserialize;

    pub fn serialize<S>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> where S: Serializer {
        let srgba = color.to_srgba();
        let mut seq = serializer.serialize_seq(Some(3))?;
        seq.serialize_element(&srgba.red)?;
        seq.serialize_element(&srgba.green)?;
        seq.serialize_element(&srgba.blue)?;
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color, D::Error>
        where D: Deserializer<'de>
    {
        let rgb: [f32; 3] = <[f32; 3]>::deserialize(deserializer)?;
        Ok(Color::srgb(rgb[0], rgb[1], rgb[2]))
    }
}
