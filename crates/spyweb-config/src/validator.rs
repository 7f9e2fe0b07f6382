//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Collapse into the first error, if any.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_storage(config, &mut result);
        Self::validate_observer(config, &mut result);
        Self::validate_history(config, &mut result);
        Self::validate_render(config, &mut result);

        Ok(result)
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.namespace.trim().is_empty() {
            result.add_error(ValidationError::new(
                "storage.namespace",
                "Namespace cannot be empty",
            ));
        }

        if config.storage.settings_key.trim().is_empty() {
            result.add_error(ValidationError::new(
                "storage.settings_key",
                "Settings key cannot be empty",
            ));
        }

        if config.storage.namespace == config.storage.settings_key {
            result.add_error(ValidationError::new(
                "storage.settings_key",
                "Settings key must differ from the record namespace",
            ));
        }
    }

    fn validate_observer(config: &Config, result: &mut ValidationResult) {
        if config.observer.debounce_ms == 0 {
            result.add_error(ValidationError::new(
                "observer.debounce_ms",
                "debounce_ms must be greater than 0",
            ));
        }

        if config.observer.debounce_ms > 10_000 {
            result.add_warning(ValidationWarning::new(
                "observer.debounce_ms",
                "debounce_ms is very high (>10s), dynamic content will stay unmasked for long",
            ));
        }
    }

    fn validate_history(config: &Config, result: &mut ValidationResult) {
        if config.history.limit == 0 {
            result.add_error(ValidationError::new(
                "history.limit",
                "limit must be greater than 0",
            ));
        }

        if config.history.limit > 1000 {
            result.add_warning(ValidationWarning::new(
                "history.limit",
                "limit is very high (>1000)",
            ));
        }
    }

    fn validate_render(config: &Config, result: &mut ValidationResult) {
        if config.render.background_search_depth == 0 {
            result.add_error(ValidationError::new(
                "render.background_search_depth",
                "background_search_depth must be greater than 0",
            ));
        }

        if !is_hex_color(&config.render.fallback_color) {
            result.add_error(ValidationError::new(
                "render.fallback_color",
                format!(
                    "'{}' is not a hex color (#rgb or #rrggbb)",
                    config.render.fallback_color
                ),
            ));
        }

        if config.render.image_timeout_secs == 0 {
            result.add_warning(ValidationWarning::new(
                "render.image_timeout_secs",
                "image_timeout_secs is 0, remote mask images will always fail",
            ));
        }
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
