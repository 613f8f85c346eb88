//! # Application Configuration
//!
//! Records describing how an application wants its window and renderer set up.
//! They are plain data: loading one never touches the backend. Range checks
//! happen when the values reach [`crate::window::Window::from_config`] and
//! [`crate::render::RenderSession::from_config`].
//!
//! ```toml
//! [metadata]
//! name = "Demo"
//!
//! [window]
//! title = "Demo"
//! width = 1280
//! height = 720
//! resizable = true
//!
//! [renderer]
//! vsync = 1
//! ```

use super::metadata::AppMetadata;
use crate::render::presentation::Presentation;
use crate::window::WindowFlags;
use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// # Window Configuration
///
/// Initial title, size and the flags that may be requested at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Client area width in screen coordinates
    pub width: i32,
    /// Client area height in screen coordinates
    pub height: i32,
    /// Allow user resizing
    pub resizable: bool,
    /// Create without decorations
    pub borderless: bool,
    /// Start in fullscreen
    pub fullscreen: bool,
    /// Keep above other windows
    pub always_on_top: bool,
    /// Start hidden
    pub hidden: bool,
    /// Request a high pixel density back buffer
    pub high_pixel_density: bool,
    /// Window opacity in `[0, 1]`
    pub opacity: f32,
    /// Minimum client area size
    pub min_size: Option<(i32, i32)>,
    /// Maximum client area size
    pub max_size: Option<(i32, i32)>,
}

impl WindowConfig {
    /// Create a window configuration with a title and size
    pub fn new(title: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            ..Self::default()
        }
    }

    /// Allow or forbid user resizing
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Set the opacity
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Creation flags described by this configuration
    pub fn flags(&self) -> WindowFlags {
        let mut flags = WindowFlags::empty();
        flags.set(WindowFlags::RESIZABLE, self.resizable);
        flags.set(WindowFlags::BORDERLESS, self.borderless);
        flags.set(WindowFlags::FULLSCREEN, self.fullscreen);
        flags.set(WindowFlags::ALWAYS_ON_TOP, self.always_on_top);
        flags.set(WindowFlags::HIDDEN, self.hidden);
        flags.set(WindowFlags::HIGH_PIXEL_DENSITY, self.high_pixel_density);
        flags
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "casement".to_string(),
            width: 800,
            height: 600,
            resizable: false,
            borderless: false,
            fullscreen: false,
            always_on_top: false,
            hidden: false,
            high_pixel_density: false,
            opacity: 1.0,
            min_size: None,
            max_size: None,
        }
    }
}

/// # Renderer Configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Vsync interval: 0 disabled, -1 adaptive, N every Nth refresh
    pub vsync: i32,
    /// Logical presentation
    pub presentation: Presentation,
    /// Render driver to request, `None` picks the best available
    pub driver: Option<String>,
}

/// # Complete Application Configuration
///
/// Top-level configuration applications load at startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Metadata reported to the backend
    pub metadata: AppMetadata,
    /// Main window
    pub window: WindowConfig,
    /// Renderer bound to the main window
    pub renderer: RendererConfig,
}

impl ApplicationConfig {
    /// Create a configuration with a window titled after the application
    pub fn new(app_name: impl Into<String>) -> Self {
        let name = app_name.into();
        Self {
            metadata: AppMetadata::new(name.clone(), env!("CARGO_PKG_VERSION")),
            window: WindowConfig {
                title: name,
                ..WindowConfig::default()
            },
            renderer: RendererConfig::default(),
        }
    }
}

impl Config for ApplicationConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFormat;
    use crate::render::presentation::LogicalPresentation;

    #[test]
    fn test_flags_from_config() {
        let config = WindowConfig {
            resizable: true,
            hidden: true,
            ..WindowConfig::default()
        };
        assert_eq!(config.flags(), WindowFlags::RESIZABLE | WindowFlags::HIDDEN);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = "[window]\ntitle = \"Demo\"\nwidth = 320\n\n[renderer]\nvsync = 1\n";
        let config = ApplicationConfig::from_str_as(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.window.title, "Demo");
        assert_eq!(config.window.width, 320);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.renderer.vsync, 1);
        assert_eq!(config.renderer.presentation.mode, LogicalPresentation::Disabled);
    }

    #[test]
    fn test_round_trip_through_both_formats() {
        let mut config = ApplicationConfig::new("Demo");
        config.window.min_size = Some((100, 100));
        config.renderer.presentation = Presentation::new(320, 240, LogicalPresentation::Letterbox);
        config.renderer.driver = Some("software".to_string());

        for format in [ConfigFormat::Toml, ConfigFormat::Ron] {
            let text = config.to_string_as(format).unwrap();
            let parsed = ApplicationConfig::from_str_as(&text, format).unwrap();
            assert_eq!(parsed, config);
        }
    }
}
