use log::LevelFilter;
use serde::Deserialize;

use crate::error::XrError;
use crate::look::LOOK_SPEED;

pub const DEFAULT_CONTAINER_SELECTOR: &str = "#vr-canvas";
pub const DEFAULT_MODEL_URL: &str = "/odooxr-base/static/media/gltf/space/space.gltf";
pub const DEFAULT_SKYBOX_URL: &str = "/odooxr-base/static/media/textures/milky-way-4k.png";

/// Right mouse button in `MouseEvent.buttons`.
pub const RIGHT_BUTTON_MASK: u16 = 2;

/// When to install the WebXR polyfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolyfillMode {
    /// Only when the browser has no native `navigator.xr`.
    IfNeeded,
    #[default]
    Always,
    Never,
}

impl PolyfillMode {
    /// Parse a `usePolyfill` query argument. Unknown values yield `None`.
    pub fn from_query_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "always" => Some(Self::Always),
            "false" | "no" | "0" | "never" => Some(Self::Never),
            "if-needed" => Some(Self::IfNeeded),
            _ => None,
        }
    }

    pub fn should_install(&self, native_xr_present: bool) -> bool {
        match self {
            Self::Always => true,
            Self::IfNeeded => !native_xr_present,
            Self::Never => false,
        }
    }
}

/// Viewer settings. Every field has a default, so an empty JSON object is a
/// valid config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ViewerConfig {
    /// Element that receives the canvas and the VR button.
    pub container_selector: String,
    pub model_url: String,
    pub skybox_url: String,
    /// Radians per pixel of drag.
    pub look_speed: f64,
    /// `MouseEvent.buttons` bits that rotate the inline view.
    pub drag_button_mask: u16,
    pub polyfill: PolyfillMode,
    pub log_level: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            container_selector: DEFAULT_CONTAINER_SELECTOR.to_string(),
            model_url: DEFAULT_MODEL_URL.to_string(),
            skybox_url: DEFAULT_SKYBOX_URL.to_string(),
            look_speed: LOOK_SPEED,
            drag_button_mask: RIGHT_BUTTON_MASK,
            polyfill: PolyfillMode::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, XrError> {
        let config: Self = serde_json::from_str(json).map_err(|e| XrError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), XrError> {
        if self.container_selector.trim().is_empty() {
            return Err(XrError::Config("containerSelector must not be empty".into()));
        }
        if !self.look_speed.is_finite() || self.look_speed <= 0.0 {
            return Err(XrError::Config(format!(
                "lookSpeed must be a positive number, got {}",
                self.look_speed
            )));
        }
        if self.drag_button_mask == 0 {
            return Err(XrError::Config("dragButtonMask must select at least one button".into()));
        }
        Ok(())
    }

    /// Let a `usePolyfill` query argument override the configured mode.
    pub fn with_polyfill_query(mut self, value: Option<&str>) -> Self {
        if let Some(mode) = value.and_then(PolyfillMode::from_query_value) {
            self.polyfill = mode;
        }
        self
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.container_selector, "#vr-canvas");
        assert_eq!(config.look_speed, 0.0025);
        assert_eq!(config.drag_button_mask, 2);
        assert_eq!(config.polyfill, PolyfillMode::Always);
    }

    #[test]
    fn test_partial_override() {
        let config = ViewerConfig::from_json(
            r#"{"modelUrl": "/m.gltf", "polyfill": "if-needed", "logLevel": "debug"}"#,
        )
        .unwrap();
        assert_eq!(config.model_url, "/m.gltf");
        assert_eq!(config.skybox_url, DEFAULT_SKYBOX_URL);
        assert_eq!(config.polyfill, PolyfillMode::IfNeeded);
        assert_eq!(config.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ViewerConfig::from_json(r#"{"lookSpeed": -1.0}"#),
            Err(XrError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json(r#"{"containerSelector": "  "}"#),
            Err(XrError::Config(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json(r#"{"dragButtonMask": 0}"#),
            Err(XrError::Config(_))
        ));
        assert!(matches!(ViewerConfig::from_json("not json"), Err(XrError::Config(_))));
        assert!(matches!(
            ViewerConfig::from_json(r#"{"lookSped": 1.0}"#),
            Err(XrError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let config = ViewerConfig {
            log_level: "chatty".into(),
            ..ViewerConfig::default()
        };
        assert_eq!(config.log_level(), LevelFilter::Info);
    }

    // ── PolyfillMode ──

    #[test]
    fn test_polyfill_query_values() {
        assert_eq!(PolyfillMode::from_query_value("true"), Some(PolyfillMode::Always));
        assert_eq!(PolyfillMode::from_query_value("YES"), Some(PolyfillMode::Always));
        assert_eq!(PolyfillMode::from_query_value("false"), Some(PolyfillMode::Never));
        assert_eq!(PolyfillMode::from_query_value("no"), Some(PolyfillMode::Never));
        assert_eq!(PolyfillMode::from_query_value("if-needed"), Some(PolyfillMode::IfNeeded));
        assert_eq!(PolyfillMode::from_query_value("maybe"), None);
    }

    #[test]
    fn test_query_overrides_config() {
        let config = ViewerConfig::default().with_polyfill_query(Some("false"));
        assert_eq!(config.polyfill, PolyfillMode::Never);

        let config = ViewerConfig::default().with_polyfill_query(Some("garbage"));
        assert_eq!(config.polyfill, PolyfillMode::Always);

        let config = ViewerConfig::default().with_polyfill_query(None);
        assert_eq!(config.polyfill, PolyfillMode::Always);
    }

    #[test]
    fn test_should_install() {
        assert!(PolyfillMode::Always.should_install(true));
        assert!(PolyfillMode::IfNeeded.should_install(false));
        assert!(!PolyfillMode::IfNeeded.should_install(true));
        assert!(!PolyfillMode::Never.should_install(false));
    }
}
