//! Configuration validation.

use threadlens_protocols::types::ApiConfiguration;

use crate::schema::AppConfig;

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
    /// Validate the application configuration.
    pub fn validate(config: &AppConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_site(config, &mut result);
        Self::validate_content(config, &mut result);
        Self::validate_providers(config, &mut result);

        result
    }

    /// Validate a stored provider configuration.
    pub fn validate_api_configuration(config: &ApiConfiguration) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !config.satisfies_verified_invariant() {
            result.add_error(ValidationError::new(
                "configVerified",
                format!(
                    "configuration is marked verified but required {} fields are missing",
                    config.provider
                ),
            ));
        }

        if let Some(endpoint) = config.endpoint() {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                result.add_warning(ValidationWarning::new(
                    "ollamaEndpoint",
                    "endpoint does not start with http:// or https://",
                ));
            }
        }

        result
    }

    fn validate_site(config: &AppConfig, result: &mut ValidationResult) {
        if config.site.match_pattern.trim().is_empty() {
            result.add_error(ValidationError::new(
                "site.match_pattern",
                "match_pattern cannot be empty",
            ));
        }
    }

    fn validate_content(config: &AppConfig, result: &mut ValidationResult) {
        let content = &config.content;

        for (path, value) in [
            ("content.rescan_interval_ms", content.rescan_interval_ms),
            ("content.ready_check_interval_ms", content.ready_check_interval_ms),
        ] {
            if value == 0 {
                result.add_error(ValidationError::new(path, "interval must be greater than 0"));
            }
        }

        if content.retry_budget == 0 {
            result.add_warning(ValidationWarning::new(
                "content.retry_budget",
                "retry_budget is 0, the first channel failure will require a page reload",
            ));
        }

        if content.focus_prefix_chars == 0 {
            result.add_warning(ValidationWarning::new(
                "content.focus_prefix_chars",
                "focus_prefix_chars is 0, every comment will match a focus request",
            ));
        }
    }

    fn validate_providers(config: &AppConfig, result: &mut ValidationResult) {
        let url = &config.providers.gemini.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            result.add_error(ValidationError::new(
                "providers.gemini.base_url",
                "base_url must start with http:// or https://",
            ));
        }

        if config.providers.gemini.default_model.trim().is_empty() {
            result.add_error(ValidationError::new(
                "providers.gemini.default_model",
                "default_model cannot be empty",
            ));
        }

        if config.providers.ollama.max_tokens == 0 {
            result.add_error(ValidationError::new(
                "providers.ollama.max_tokens",
                "max_tokens must be greater than 0",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
