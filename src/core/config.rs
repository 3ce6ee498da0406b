use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::shared::constants;

/// Render defaults, optionally read from `concol.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub width: u32,
    pub aspect: f64,
    pub dither: bool,
    pub palette: String,
    pub seed: Option<u64>,
    pub parallel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: constants::DEFAULT_WIDTH,
            aspect: constants::DEFAULT_ASPECT,
            dither: false,
            palette: constants::DEFAULT_PALETTE.to_string(),
            seed: None,
            parallel: false,
        }
    }
}

/// Values given on the command line; `None` keeps the file or default value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub width: Option<u32>,
    pub aspect: Option<f64>,
    pub palette: Option<String>,
    pub seed: Option<u64>,
    pub dither: Option<bool>,
    pub parallel: Option<bool>,
}

impl Settings {
    /// An explicit path must exist. Without one, `concol.json` in the working
    /// directory is used when present, else the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(constants::CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        crate::utils::logger::info(&format!("Loaded settings from {}", path.display()));
        Ok(settings)
    }

    /// Apply command line values on top of the loaded settings and re-validate.
    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(aspect) = overrides.aspect {
            self.aspect = aspect;
        }
        if let Some(palette) = overrides.palette {
            self.palette = palette;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        if let Some(dither) = overrides.dither {
            self.dither = dither;
        }
        if let Some(parallel) = overrides.parallel {
            self.parallel = parallel;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            bail!("width must be at least 1");
        }
        if !self.aspect.is_finite() || self.aspect <= 0.0 {
            bail!("aspect must be a positive number, got {}", self.aspect);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let s = Settings::default();
        assert_eq!(s.width, 75);
        assert_eq!(s.aspect, 1.5);
        assert!(!s.dither);
        assert_eq!(s.palette, "classic");
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "dither": true, "seed": 7 }"#).unwrap();
        assert!(s.dither);
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.width, constants::DEFAULT_WIDTH);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<Settings>(r#"{ "colour": 1 }"#).is_err());
    }

    #[test]
    fn test_validation() {
        let mut s = Settings::default();
        s.aspect = -1.0;
        assert!(s.validate().is_err());
        s.aspect = 2.0;
        s.width = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_overrides_can_switch_flags_off() {
        let from_file: Settings =
            serde_json::from_str(r#"{ "dither": true, "parallel": true, "width": 40 }"#).unwrap();

        let kept = from_file.clone().apply(Overrides::default()).unwrap();
        assert_eq!(kept, from_file);

        let s = from_file
            .apply(Overrides {
                dither: Some(false),
                parallel: Some(false),
                palette: Some("campbell".to_string()),
                seed: Some(3),
                ..Overrides::default()
            })
            .unwrap();
        assert!(!s.dither);
        assert!(!s.parallel);
        assert_eq!(s.width, 40);
        assert_eq!(s.palette, "campbell");
        assert_eq!(s.seed, Some(3));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let bad = Overrides { aspect: Some(0.0), ..Overrides::default() };
        assert!(Settings::default().apply(bad).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(Settings::load(Some(Path::new("no/such/concol.json"))).is_err());
    }
}
