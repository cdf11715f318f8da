use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::content::UnknownOption;

/// Glow effect applied to highlighted blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlowAnimation {
    #[default]
    Pulse,
    Static,
    None,
}

impl FromStr for GlowAnimation {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pulse" => Ok(GlowAnimation::Pulse),
            "static" => Ok(GlowAnimation::Static),
            "none" => Ok(GlowAnimation::None),
            _ => Err(UnknownOption::new("glow animation", s, "pulse, static, none")),
        }
    }
}

impl fmt::Display for GlowAnimation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlowAnimation::Pulse => write!(f, "pulse"),
            GlowAnimation::Static => write!(f, "static"),
            GlowAnimation::None => write!(f, "none"),
        }
    }
}

/// Presentation settings. Flat, consumed only by rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub dynamic_title_color_start: String,
    pub dynamic_title_color_end: String,
    pub font: String,
    pub light_mode_text_color: String,
    pub dark_mode_text_color: String,
    pub light_mode_heading_color: String,
    pub dark_mode_heading_color: String,
    pub light_mode_bg_color: String,
    pub dark_mode_bg_color: String,
    pub glow_color: String,
    pub glow_animation: GlowAnimation,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#3b82f6".to_string(),
            secondary_color: "#8b5cf6".to_string(),
            dynamic_title_color_start: "#a855f7".to_string(),
            dynamic_title_color_end: "#ec4899".to_string(),
            font: "system-ui".to_string(),
            light_mode_text_color: "#374151".to_string(),
            dark_mode_text_color: "#d1d5db".to_string(),
            light_mode_heading_color: "#111827".to_string(),
            dark_mode_heading_color: "#f9fafb".to_string(),
            light_mode_bg_color: "#fef3c7".to_string(),
            dark_mode_bg_color: "#083344".to_string(),
            glow_color: "#3b82f6".to_string(),
            glow_animation: GlowAnimation::Pulse,
        }
    }
}

impl fmt::Display for ThemeSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Theme")?;
        writeln!(f, "=====")?;
        writeln!(f, "primary:          {}", self.primary_color)?;
        writeln!(f, "secondary:        {}", self.secondary_color)?;
        writeln!(
            f,
            "title gradient:   {} -> {}",
            self.dynamic_title_color_start, self.dynamic_title_color_end
        )?;
        writeln!(f, "font:             {}", self.font)?;
        writeln!(
            f,
            "text:             {} / {}",
            self.light_mode_text_color, self.dark_mode_text_color
        )?;
        writeln!(
            f,
            "headings:         {} / {}",
            self.light_mode_heading_color, self.dark_mode_heading_color
        )?;
        writeln!(
            f,
            "background:       {} / {}",
            self.light_mode_bg_color, self.dark_mode_bg_color
        )?;
        writeln!(f, "glow:             {} ({})", self.glow_color, self.glow_animation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_glow_animation_from_str() {
        assert_eq!("Static".parse::<GlowAnimation>().unwrap(), GlowAnimation::Static);
        let err = "strobe".parse::<GlowAnimation>().unwrap_err();
        assert_eq!(err.value, "strobe");
    }

    #[test]
    fn test_glow_animation_wire_names() {
        assert_eq!(serde_json::to_value(GlowAnimation::Static).unwrap(), json!("static"));
        let parsed: GlowAnimation = serde_json::from_value(json!("none")).unwrap();
        assert_eq!(parsed, GlowAnimation::None);
    }

    #[test]
    fn test_partial_theme_fills_defaults() {
        let theme: ThemeSettings =
            serde_json::from_value(json!({"primaryColor": "#000000"})).unwrap();
        assert_eq!(theme.primary_color, "#000000");
        assert_eq!(theme.font, "system-ui");
        assert_eq!(theme.glow_animation, GlowAnimation::Pulse);
    }

    #[test]
    fn test_theme_display() {
        let output = format!("{}", ThemeSettings::default());
        assert!(output.contains("#3b82f6"));
        assert!(output.contains("pulse"));
    }
}
