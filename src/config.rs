#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Process-wide defaults, read once from the environment.

use std::sync::OnceLock;

use tracing::warn;

use crate::types::Tolerance;

/// Default width of report separator rules.
const DEFAULT_RULE_WIDTH: usize = 60;

/// Defaults applied when a grader or console is built without overrides.
#[derive(Debug, Clone)]
pub struct GraderConfig {
    /// Tolerance used by graders that are not given one.
    tolerance:           Tolerance,
    /// Width of the report separator rules.
    rule_width:          usize,
    /// Whether subject output stays visible while grading.
    show_subject_output: bool,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            tolerance:           Tolerance::default(),
            rule_width:          DEFAULT_RULE_WIDTH,
            show_subject_output: false,
        }
    }
}

impl GraderConfig {
    /// Reads `NBGRADE_ABS_TOL`, `NBGRADE_REL_TOL`, `NBGRADE_RULE_WIDTH` and
    /// `NBGRADE_SHOW_SUBJECT_OUTPUT`, falling back to the defaults for
    /// anything missing or unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tolerance:           Tolerance::new(
                read_env("NBGRADE_ABS_TOL", defaults.tolerance.absolute),
                read_env("NBGRADE_REL_TOL", defaults.tolerance.relative),
            ),
            rule_width:          read_env("NBGRADE_RULE_WIDTH", defaults.rule_width),
            show_subject_output: read_flag(
                "NBGRADE_SHOW_SUBJECT_OUTPUT",
                defaults.show_subject_output,
            ),
        }
    }

    /// Returns the default tolerance.
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Returns the report rule width.
    pub fn rule_width(&self) -> usize {
        self.rule_width
    }

    /// Returns whether subject output is shown while grading.
    pub fn show_subject_output(&self) -> bool {
        self.show_subject_output
    }

    /// Returns a new config with a custom default tolerance.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Global storage for the lazily read configuration.
static CONFIG: OnceLock<GraderConfig> = OnceLock::new();

/// Installs `config` as the process-wide configuration. Returns `false` if a
/// configuration was already in place.
pub fn install(config: GraderConfig) -> bool {
    CONFIG.set(config).is_ok()
}

/// Returns the active configuration, reading the environment on first use.
pub fn get() -> &'static GraderConfig {
    CONFIG.get_or_init(GraderConfig::from_env)
}

/// Parses an environment variable, falling back to `default` when it is
/// missing or does not parse.
fn read_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    let Ok(raw) = std::env::var(name) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(variable = name, value = %raw, "ignoring unparsable setting");
            default
        }
    }
}

/// Reads a boolean-ish environment variable.
fn read_flag(name: &str, default: bool) -> bool {
    match std::env::var(name)
        .map(|s| s.trim().to_ascii_lowercase())
        .as_deref()
    {
        Ok("1" | "true" | "yes" | "on") => true,
        Ok("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerance_override_keeps_other_defaults() {
        let config = GraderConfig::default().with_tolerance(Tolerance::new(0.5, 0.1));
        assert_eq!(config.tolerance(), Tolerance::new(0.5, 0.1));
        assert_eq!(config.rule_width(), 60);
        assert!(!config.show_subject_output());
    }

    #[test]
    fn unparsable_settings_fall_back() {
        assert_eq!(read_env("NBGRADE_TEST_UNSET_SETTING", 7_usize), 7);
        assert!(read_flag("NBGRADE_TEST_UNSET_FLAG", true));
    }
}
