use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::render::BlendMode;
use serde::Deserialize;
use std::path::Path;

// Classic firework colours: red, green, blue, violet, gold, white
pub const DEFAULT_PALETTE: [Rgb; 6] = [
    Rgb(0xff, 0x00, 0x43),
    Rgb(0x14, 0xfc, 0x56),
    Rgb(0x1e, 0x7f, 0xff),
    Rgb(0xe6, 0x0a, 0xff),
    Rgb(0xff, 0xbf, 0x36),
    Rgb(0xff, 0xff, 0xff),
];

/// Full show configuration, usually read from a TOML file.
///
/// Every field has a default, so an empty file (or no file) is a valid
/// configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub physics: Physics,
    pub show: ShowConfig,
    pub render: RenderConfig,
    pub driver: DriverConfig,
}

/// Per-kind motion constants.
///
/// Gravity is in distance per tick per millisecond; drag is a per-tick
/// velocity multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Physics {
    pub star_gravity: f32,
    pub spark_gravity: f32,
    pub star_drag: f32,
    pub spark_drag: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            star_gravity: 0.001,
            spark_gravity: 0.0005,
            star_drag: 0.99,
            spark_drag: 0.95,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowConfig {
    pub palette: Vec<Rgb>,
    pub launch_gain: f32,
    pub ascent_boost: f32,
    pub ascent_life_factor: f32,
    // Bursts land in the upper part of the viewport
    pub burst_height_ratio: f32,
    pub sparks_per_burst: usize,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_vec(),
            launch_gain: 0.003,
            ascent_boost: 1.2,
            ascent_life_factor: 7.0,
            burst_height_ratio: 0.7,
            sparks_per_burst: 15,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub fade_alpha: f32,
    pub flash_color: Rgb,
    pub flash_alpha: f32,
    pub flash_blend: BlendMode,
    pub star_width: f32,
    pub spark_width: f32,
    pub background: Rgb,
    // Logical pixels per device pixel (half a terminal cell)
    pub pixel_scale: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fade_alpha: 0.15,
            flash_color: Rgb(255, 200, 100),
            flash_alpha: 0.5,
            flash_blend: BlendMode::Lighten,
            star_width: 3.0,
            spark_width: 1.5,
            background: Rgb::BLACK,
            pixel_scale: 4.0,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DriverConfig {
    pub auto_fire_period_ms: f64,
    pub max_frame_ms: f64,
    pub frame_interval_ms: f64,
    pub seed: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            auto_fire_period_ms: 800.0,
            max_frame_ms: 32.0,
            frame_interval_ms: 16.0,
            seed: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml(&text)?;
        tracing::info!(path = %path.as_ref().display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::InvalidConfig(msg.to_string()));

        if self.show.palette.is_empty() {
            return invalid("show.palette must contain at least one color");
        }
        if !(0.0..=1.0).contains(&self.render.fade_alpha) {
            return invalid("render.fade_alpha must be within [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.render.flash_alpha) {
            return invalid("render.flash_alpha must be within [0, 1]");
        }
        if self.render.star_width < 0.0 || self.render.spark_width < 0.0 {
            return invalid("render stroke widths must not be negative");
        }
        if !self.render.pixel_scale.is_finite() || self.render.pixel_scale <= 0.0 {
            return invalid("render.pixel_scale must be positive and finite");
        }
        if !self.driver.auto_fire_period_ms.is_finite() || self.driver.auto_fire_period_ms <= 0.0 {
            return invalid("driver.auto_fire_period_ms must be positive and finite");
        }
        if !self.driver.frame_interval_ms.is_finite() || self.driver.frame_interval_ms <= 0.0 {
            return invalid("driver.frame_interval_ms must be positive and finite");
        }
        if !self.driver.max_frame_ms.is_finite() || self.driver.max_frame_ms < 0.0 {
            return invalid("driver.max_frame_ms must be finite and not negative");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.show.palette.len(), 6);
        assert_eq!(config.driver.auto_fire_period_ms, 800.0);
        assert_eq!(config.driver.max_frame_ms, 32.0);
    }

    #[test]
    fn sample_file_matches_defaults() {
        let config = Config::from_toml(include_str!("../fireshow.toml")).unwrap();
        let defaults = Config::default();
        assert_eq!(config.physics, defaults.physics);
        assert_eq!(config.show.palette, defaults.show.palette);
        assert_eq!(config.render.flash_color, defaults.render.flash_color);
        assert_eq!(config.render.flash_blend, defaults.render.flash_blend);
        assert_eq!(config.driver.seed, None);
    }

    #[test]
    fn empty_file_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.physics, Physics::default());
        assert_eq!(config.render.fade_alpha, 0.15);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r##"
            [show]
            palette = ["#ff0000", "00ff00"]

            [render]
            flash_blend = "additive"
            background = "1a1b26"

            [driver]
            seed = 42
            "##,
        )
        .unwrap();
        assert_eq!(config.show.palette, vec![Rgb(255, 0, 0), Rgb(0, 255, 0)]);
        assert_eq!(config.show.sparks_per_burst, 15);
        assert_eq!(config.render.flash_blend, BlendMode::Additive);
        assert_eq!(config.render.background, Rgb(0x1a, 0x1b, 0x26));
        assert_eq!(config.driver.seed, Some(42));
        assert_eq!(config.driver.auto_fire_period_ms, 800.0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let err = Config::from_toml("[render]\nfade_alpha = 1.5").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = Config::from_toml("[show]\npalette = []").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));

        let err = Config::from_toml("[driver]\nauto_fire_period_ms = 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_non_finite_values() {
        for text in [
            "[driver]\nmax_frame_ms = nan",
            "[driver]\nframe_interval_ms = inf",
            "[driver]\nauto_fire_period_ms = inf",
            "[render]\npixel_scale = inf",
        ] {
            let err = Config::from_toml(text).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "{text}");
        }
    }

    #[test]
    fn rejects_bad_colors_and_unknown_keys() {
        let err = Config::from_toml("[render]\nbackground = \"nope\"").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));

        let err = Config::from_toml("[physics]\nwind = 3.0").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }
}
