use serde::{Deserialize, Serialize};

/// Theme colors supplied by the host, all optional hex strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub button_text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_bg_color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAttribute {
    Background,
    Text,
    Hint,
    Link,
    ButtonBackground,
    ButtonText,
    SecondaryBackground,
}

impl ThemeAttribute {
    pub fn all() -> [ThemeAttribute; 7] {
        [
            ThemeAttribute::Background,
            ThemeAttribute::Text,
            ThemeAttribute::Hint,
            ThemeAttribute::Link,
            ThemeAttribute::ButtonBackground,
            ThemeAttribute::ButtonText,
            ThemeAttribute::SecondaryBackground,
        ]
    }

    /// Presentation variable this attribute is written to.
    pub fn variable(&self) -> &'static str {
        match self {
            ThemeAttribute::Background => "--tg-theme-bg-color",
            ThemeAttribute::Text => "--tg-theme-text-color",
            ThemeAttribute::Hint => "--tg-theme-hint-color",
            ThemeAttribute::Link => "--tg-theme-link-color",
            ThemeAttribute::ButtonBackground => "--tg-theme-button-color",
            ThemeAttribute::ButtonText => "--tg-theme-button-text-color",
            ThemeAttribute::SecondaryBackground => "--tg-theme-secondary-bg-color",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            ThemeAttribute::Background => "#f5f5f5",
            ThemeAttribute::Text => "#333333",
            ThemeAttribute::Hint => "#888888",
            ThemeAttribute::Link => "#2481cc",
            ThemeAttribute::ButtonBackground => "#2481cc",
            ThemeAttribute::ButtonText => "#ffffff",
            ThemeAttribute::SecondaryBackground => "#ffffff",
        }
    }

    fn host_value<'a>(&self, params: &'a ThemeParams) -> Option<&'a str> {
        let value = match self {
            ThemeAttribute::Background => &params.bg_color,
            ThemeAttribute::Text => &params.text_color,
            ThemeAttribute::Hint => &params.hint_color,
            ThemeAttribute::Link => &params.link_color,
            ThemeAttribute::ButtonBackground => &params.button_color,
            ThemeAttribute::ButtonText => &params.button_text_color,
            ThemeAttribute::SecondaryBackground => &params.secondary_bg_color,
        };
        value.as_deref().filter(|v| !v.is_empty())
    }
}

/// Resolved presentation variables. Every attribute always has a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    values: [String; 7],
}

impl Default for Theme {
    fn default() -> Self {
        apply_theme(None)
    }
}

impl Theme {
    pub fn get(&self, attribute: ThemeAttribute) -> &str {
        &self.values[attribute as usize]
    }

    /// RGB triple for an attribute, if its value is a valid hex color.
    pub fn rgb(&self, attribute: ThemeAttribute) -> Option<(u8, u8, u8)> {
        parse_hex_color(self.get(attribute))
    }

    /// `(variable, value)` pairs in attribute order.
    pub fn variables(&self) -> impl Iterator<Item = (&'static str, &str)> {
        ThemeAttribute::all()
            .into_iter()
            .map(move |attr| (attr.variable(), self.get(attr)))
    }
}

/// Resolve every attribute from the host params, falling back to defaults.
pub fn apply_theme(params: Option<&ThemeParams>) -> Theme {
    let values = ThemeAttribute::all().map(|attr| {
        params
            .and_then(|p| attr.host_value(p))
            .unwrap_or(attr.default_value())
            .to_string()
    });
    Theme { values }
}

/// Parse `#rgb` or `#rrggbb` (leading `#` optional).
pub fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let mut channels = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            let r = channels.next()??;
            let g = channels.next()??;
            let b = channels.next()??;
            Some((r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_host() {
        let theme = apply_theme(None);
        assert_eq!(theme.get(ThemeAttribute::Background), "#f5f5f5");
        assert_eq!(theme.get(ThemeAttribute::Text), "#333333");
        assert_eq!(theme.get(ThemeAttribute::Hint), "#888888");
        assert_eq!(theme.get(ThemeAttribute::Link), "#2481cc");
        assert_eq!(theme.get(ThemeAttribute::ButtonBackground), "#2481cc");
        assert_eq!(theme.get(ThemeAttribute::ButtonText), "#ffffff");
        assert_eq!(theme.get(ThemeAttribute::SecondaryBackground), "#ffffff");
        assert_eq!(theme, Theme::default());
    }

    #[test]
    fn test_host_values_override_per_attribute() {
        let params = ThemeParams {
            bg_color: Some("#17212b".to_string()),
            text_color: Some("#f5f5f5".to_string()),
            button_color: Some(String::new()),
            ..Default::default()
        };
        let theme = apply_theme(Some(&params));

        assert_eq!(theme.get(ThemeAttribute::Background), "#17212b");
        assert_eq!(theme.get(ThemeAttribute::Text), "#f5f5f5");
        // empty host value falls back
        assert_eq!(theme.get(ThemeAttribute::ButtonBackground), "#2481cc");
        assert_eq!(theme.get(ThemeAttribute::Hint), "#888888");
    }

    #[test]
    fn test_variables_cover_all_attributes() {
        let theme = Theme::default();
        let vars: Vec<_> = theme.variables().collect();
        assert_eq!(vars.len(), 7);
        assert_eq!(vars[0], ("--tg-theme-bg-color", "#f5f5f5"));
        assert_eq!(vars[6], ("--tg-theme-secondary-bg-color", "#ffffff"));
    }

    #[test]
    fn test_theme_params_from_host_json() {
        let params: ThemeParams =
            serde_json::from_str(r##"{"bg_color":"#000000","unknown_key":"#123456"}"##).unwrap();
        assert_eq!(params.bg_color.as_deref(), Some("#000000"));
        assert_eq!(params.text_color, None);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#2481cc"), Some((0x24, 0x81, 0xcc)));
        assert_eq!(parse_hex_color("ffffff"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#fa0"), Some((255, 170, 0)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#gggggg"), None);
        assert_eq!(parse_hex_color("#ääa"), None);
    }
}
