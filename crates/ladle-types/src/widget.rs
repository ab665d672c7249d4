//! Embeddable widget configuration and visible state.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Screen corner the widget is anchored to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl fmt::Display for WidgetPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetPosition::BottomRight => write!(f, "bottom-right"),
            WidgetPosition::BottomLeft => write!(f, "bottom-left"),
            WidgetPosition::TopRight => write!(f, "top-right"),
            WidgetPosition::TopLeft => write!(f, "top-left"),
        }
    }
}

impl FromStr for WidgetPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bottom-right" => Ok(WidgetPosition::BottomRight),
            "bottom-left" => Ok(WidgetPosition::BottomLeft),
            "top-right" => Ok(WidgetPosition::TopRight),
            "top-left" => Ok(WidgetPosition::TopLeft),
            other => Err(format!("invalid widget position: '{other}'")),
        }
    }
}

/// Visible widget state. Sending is tracked separately and never shown as a
/// state of its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetState {
    #[default]
    Minimized,
    Open,
}

impl WidgetState {
    pub fn toggled(self) -> Self {
        match self {
            WidgetState::Minimized => WidgetState::Open,
            WidgetState::Open => WidgetState::Minimized,
        }
    }
}

/// Integrator-facing widget options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub position: WidgetPosition,
    pub primary_color: String,
    /// Text of the assistant greeting seeded into new sessions.
    pub greeting: String,
    pub title: String,
    pub placeholder: String,
    /// History truncation bound for outgoing requests.
    pub max_messages: usize,
    /// Generation bound requested per turn.
    pub max_tokens: u32,
    pub allow_file_upload: bool,
    /// Reserved prompt override; accepted but not applied.
    pub custom_prompt: Option<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            position: WidgetPosition::default(),
            primary_color: "#3B82F6".to_string(),
            greeting: "Hi! I'm your cooking assistant. Ask me about our recipes, ingredients, \
                       cooking techniques, or any culinary questions you have!"
                .to_string(),
            title: "Recipe Chat Support".to_string(),
            placeholder: "Ask about recipes, cooking tips, ingredients...".to_string(),
            max_messages: 50,
            max_tokens: 800,
            allow_file_upload: true,
            custom_prompt: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_roundtrip() {
        for pos in [
            WidgetPosition::BottomRight,
            WidgetPosition::BottomLeft,
            WidgetPosition::TopRight,
            WidgetPosition::TopLeft,
        ] {
            let parsed: WidgetPosition = pos.to_string().parse().unwrap();
            assert_eq!(pos, parsed);
            let json = serde_json::to_string(&pos).unwrap();
            assert_eq!(json, format!("\"{pos}\""));
        }
    }

    #[test]
    fn test_toggle_is_symmetric() {
        let state = WidgetState::Minimized;
        assert_eq!(state.toggled(), WidgetState::Open);
        assert_eq!(state.toggled().toggled(), state);
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config: WidgetConfig =
            serde_json::from_str(r#"{"position":"top-left","maxMessages":10}"#).unwrap();
        assert_eq!(config.position, WidgetPosition::TopLeft);
        assert_eq!(config.max_messages, 10);
        assert_eq!(config.max_tokens, 800);
        assert!(config.allow_file_upload);
        assert!(config.custom_prompt.is_none());
    }
}
