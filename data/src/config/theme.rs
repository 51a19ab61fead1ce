use iced_core::{
    Color,
    theme::{Custom, Palette},
};
use palette::{Darken, FromColor, Hsla, Lighten, Srgba};
use serde::{Deserialize, Serialize};

const PASTURE: &str = "Pasture";
const NIGHT_SHIFT: &str = "Night Shift";

#[derive(Debug, Clone)]
pub struct Theme(pub iced_core::Theme);

#[derive(Serialize, Deserialize)]
struct SerTheme {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    palette: Option<Palette>,
}

impl Default for Theme {
    fn default() -> Self {
        Self(iced_core::Theme::Custom(pasture().into()))
    }
}

impl PartialEq for Theme {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_string() == other.0.to_string() && self.0.palette() == other.0.palette()
    }
}

impl From<Theme> for iced_core::Theme {
    fn from(val: Theme) -> Self {
        val.0
    }
}

impl Theme {
    pub fn night_shift() -> Self {
        Self(iced_core::Theme::Custom(night_shift().into()))
    }

    /// Themes offered in the settings picker.
    pub fn all() -> Vec<Theme> {
        vec![
            Theme::default(),
            Theme::night_shift(),
            Theme(iced_core::Theme::Light),
            Theme(iced_core::Theme::Dark),
            Theme(iced_core::Theme::Nord),
            Theme(iced_core::Theme::SolarizedLight),
            Theme(iced_core::Theme::GruvboxDark),
        ]
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Light green palette, the default.
pub fn pasture() -> Custom {
    Custom::new(
        PASTURE.to_string(),
        Palette {
            background: Color::from_rgb8(246, 248, 242),
            text: Color::from_rgb8(33, 37, 41),
            primary: Color::from_rgb8(76, 175, 80),
            success: Color::from_rgb8(56, 142, 60),
            danger: Color::from_rgb8(211, 47, 47),
            warning: Color::from_rgb8(245, 124, 0),
        },
    )
}

pub fn night_shift() -> Custom {
    Custom::new(
        NIGHT_SHIFT.to_string(),
        Palette {
            background: Color::from_rgb8(24, 27, 24),
            text: Color::from_rgb8(225, 230, 222),
            primary: Color::from_rgb8(129, 199, 132),
            success: Color::from_rgb8(102, 187, 106),
            danger: Color::from_rgb8(229, 115, 115),
            warning: Color::from_rgb8(255, 183, 77),
        },
    )
}

impl Serialize for Theme {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if let iced_core::Theme::Custom(custom) = &self.0 {
            let name = custom.to_string();
            let ser_theme = match name.as_str() {
                PASTURE => SerTheme {
                    name: "pasture".to_string(),
                    palette: None,
                },
                NIGHT_SHIFT => SerTheme {
                    name: "night-shift".to_string(),
                    palette: None,
                },
                _ => SerTheme {
                    name: "custom".to_string(),
                    palette: Some(self.0.palette()),
                },
            };
            ser_theme.serialize(serializer)
        } else {
            let theme_str = match self.0 {
                iced_core::Theme::Light => "light",
                iced_core::Theme::Dark => "dark",
                iced_core::Theme::Nord => "nord",
                iced_core::Theme::SolarizedLight => "solarized_light",
                iced_core::Theme::GruvboxDark => "gruvbox_dark",
                _ => "pasture",
            };
            theme_str.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value =
            serde_json::Value::deserialize(deserializer).map_err(serde::de::Error::custom)?;

        if let Some(s) = value.as_str() {
            let theme = match s {
                "light" => Theme(iced_core::Theme::Light),
                "dark" => Theme(iced_core::Theme::Dark),
                "nord" => Theme(iced_core::Theme::Nord),
                "solarized_light" => Theme(iced_core::Theme::SolarizedLight),
                "gruvbox_dark" => Theme(iced_core::Theme::GruvboxDark),
                "pasture" => Theme::default(),
                "night-shift" => Theme::night_shift(),
                _ => {
                    return Err(serde::de::Error::custom(format!("Invalid theme: {s}")));
                }
            };
            return Ok(theme);
        }

        let serialized = SerTheme::deserialize(value).map_err(serde::de::Error::custom)?;

        match serialized.name.as_str() {
            "pasture" => Ok(Theme::default()),
            "night-shift" => Ok(Theme::night_shift()),
            "custom" => match serialized.palette {
                Some(palette) => Ok(Theme(iced_core::Theme::Custom(
                    Custom::new("Custom".to_string(), palette).into(),
                ))),
                None => Err(serde::de::Error::custom(
                    "Custom theme missing palette data",
                )),
            },
            _ => Err(serde::de::Error::custom("Invalid theme")),
        }
    }
}

fn to_hsla(color: Color) -> Hsla {
    Hsla::from_color(Srgba::new(color.r, color.g, color.b, color.a))
}

fn from_hsla(hsla: Hsla) -> Color {
    let rgba = Srgba::from_color(hsla);
    Color {
        r: rgba.color.red,
        g: rgba.color.green,
        b: rgba.color.blue,
        a: rgba.alpha,
    }
}

pub fn darken(color: Color, amount: f32) -> Color {
    from_hsla(to_hsla(color).darken_fixed(amount))
}

pub fn lighten(color: Color, amount: f32) -> Color {
    from_hsla(to_hsla(color).lighten_fixed(amount))
}

pub fn is_dark(color: Color) -> bool {
    let brightness = (color.r * 299.0 + color.g * 587.0 + color.b * 114.0) / 1000.0;
    brightness < 0.5
}
