//! Viewer configuration, stored as RON.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::inertia::InertiaParams;
use crate::render::EyeColors;

/// Default size and location for still-image exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Frame the export like the live view rather than the output size
    pub window_aspect: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stereoview.png"),
            width: 1920,
            height: 1080,
            window_aspect: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Interpupillary separation in model units
    pub eye_distance: f64,
    /// Convergence distance along the view axis
    pub eye_target: f64,
    /// Initial height of the visible region
    pub zoom: f64,
    pub pan_step: f64,
    pub zoom_base: f64,
    pub colors: EyeColors,
    pub inertia: InertiaParams,
    pub export: ExportConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            eye_distance: 0.1,
            eye_target: 7.0,
            zoom: 6.0,
            pan_step: 0.05,
            zoom_base: 0.9,
            colors: EyeColors::default(),
            inertia: InertiaParams::default(),
            export: ExportConfig::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_ron(text: &str) -> Result<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .indentor("  ".to_string());
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config = Self::from_ron(&fs::read_to_string(path)?)?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| -> Result<()> { Err(Error::InvalidConfig(msg)) };

        let floats = [
            ("eye_distance", self.eye_distance),
            ("eye_target", self.eye_target),
            ("zoom", self.zoom),
            ("pan_step", self.pan_step),
            ("zoom_base", self.zoom_base),
            ("inertia.carry", self.inertia.carry),
            ("inertia.follow", self.inertia.follow),
            ("inertia.resistance", self.inertia.resistance),
            ("inertia.rest_threshold", self.inertia.rest_threshold),
            ("inertia.density", self.inertia.density),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, value)| !value.is_finite()) {
            return invalid(format!("{} must be finite, got {}", name, value));
        }

        if self.eye_distance < 0.0 {
            return invalid(format!("eye_distance must be >= 0, got {}", self.eye_distance));
        }
        if self.zoom <= 0.0 {
            return invalid(format!("zoom must be > 0, got {}", self.zoom));
        }
        if self.pan_step < 0.0 {
            return invalid(format!("pan_step must be >= 0, got {}", self.pan_step));
        }
        if self.zoom_base <= 0.0 {
            return invalid(format!("zoom_base must be > 0, got {}", self.zoom_base));
        }
        let resistance = self.inertia.resistance;
        if !(resistance > 0.0 && resistance < 1.0) {
            return invalid(format!("inertia.resistance must be in (0, 1), got {}", resistance));
        }
        if self.inertia.density <= 0.0 {
            return invalid(format!("inertia.density must be > 0, got {}", self.inertia.density));
        }
        if self.inertia.rest_threshold <= 0.0 {
            return invalid(format!(
                "inertia.rest_threshold must be > 0, got {}",
                self.inertia.rest_threshold
            ));
        }
        if self.export.width == 0 || self.export.height == 0 {
            return invalid("export size must be non-zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Rgb;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.inertia.resistance, 0.995);
        assert_eq!(config.inertia.density, 100.0);
    }

    #[test]
    fn test_partial_ron_fills_defaults() {
        let config = ViewerConfig::from_ron(
            "(eye_distance: 0.25, colors: (left: (r: 0, g: 255, b: 0), right: (r: 255, g: 0, b: 255)))",
        )
        .unwrap();
        assert_eq!(config.eye_distance, 0.25);
        assert_eq!(config.eye_target, 7.0);
        assert_eq!(config.colors.left, Rgb::new(0, 255, 0));
        assert_eq!(config.inertia, InertiaParams::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            ViewerConfig::from_ron("(eye_distance: -1.0)"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            ViewerConfig::from_ron("(inertia: (resistance: 1.5))"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(ViewerConfig::from_ron("(zoom: 0.0)"), Err(Error::InvalidConfig(_))));
        assert!(matches!(ViewerConfig::from_ron("(zoom: "), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        for text in [
            "(inertia: (rest_threshold: NaN))",
            "(inertia: (follow: NaN))",
            "(inertia: (carry: inf))",
            "(pan_step: -inf)",
            "(pan_step: -0.5)",
            "(eye_target: NaN)",
            "(inertia: (rest_threshold: 0.0))",
        ] {
            assert!(
                matches!(ViewerConfig::from_ron(text), Err(Error::InvalidConfig(_))),
                "accepted {}",
                text
            );
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.ron");

        let mut config = ViewerConfig::default();
        config.eye_target = 3.5;
        config.export.window_aspect = true;
        config.save(&path).unwrap();

        assert_eq!(ViewerConfig::load(&path).unwrap(), config);
    }
}
