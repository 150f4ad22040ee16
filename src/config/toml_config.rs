use crate::config::LookupConfig;
use crate::utils::error::{LookupError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub backend: BackendConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub table: Option<String>,
    pub column: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub fixture: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<String>,
}

impl TomlConfig {
    /// Loads a config file. A relative `backend.fixture` path is resolved
    /// against the directory holding the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(LookupError::IoError)?;
        let mut config = Self::from_toml_str(&content)?;

        let resolved = match (&config.backend.fixture, path.as_ref().parent()) {
            (Some(fixture), Some(dir)) if Path::new(fixture).is_relative() => {
                Some(dir.join(fixture).to_string_lossy().into_owned())
            }
            _ => None,
        };
        if resolved.is_some() {
            config.backend.fixture = resolved;
        }

        Ok(config)
    }

    /// Parses config text; fixture paths are kept as written.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| LookupError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| LookupError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl From<TomlConfig> for LookupConfig {
    fn from(config: TomlConfig) -> Self {
        let defaults = LookupConfig::default();
        let backend = config.backend;

        Self {
            base_url: backend.base_url,
            api_key: backend.api_key,
            table: backend.table.unwrap_or(defaults.table),
            column: backend.column.unwrap_or(defaults.column),
            timeout_seconds: backend.timeout_seconds,
            fixture: backend.fixture,
            format: config
                .output
                .and_then(|o| o.format)
                .unwrap_or(defaults.format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[backend]
base_url = "https://demo.supabase.co"
api_key = "anon"
table = "filters"
column = "removes"
timeout_seconds = 10

[output]
format = "csv"
"#,
        )
        .unwrap();

        let lookup: LookupConfig = config.into();
        assert_eq!(lookup.base_url(), Some("https://demo.supabase.co"));
        assert_eq!(lookup.api_key(), Some("anon"));
        assert_eq!(lookup.table(), "filters");
        assert_eq!(lookup.column(), "removes");
        assert_eq!(lookup.timeout_seconds(), Some(10));
        assert_eq!(lookup.format, "csv");
        assert!(lookup.validate().is_ok());
    }

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = TomlConfig::from_toml_str(
            r#"
[backend]
base_url = "http://localhost:54321"
"#,
        )
        .unwrap();

        let lookup: LookupConfig = config.into();
        assert_eq!(lookup.table(), "water_filters");
        assert_eq!(lookup.column(), "contaminants_filtered");
        assert_eq!(lookup.format, "json");
        assert_eq!(lookup.timeout_seconds(), None);
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("FILTER_LOOKUP_TEST_KEY", "secret-anon");
        let config = TomlConfig::from_toml_str(
            r#"
[backend]
base_url = "http://localhost:54321"
api_key = "${FILTER_LOOKUP_TEST_KEY}"
table = "${FILTER_LOOKUP_TEST_UNSET_VAR}"
"#,
        )
        .unwrap();

        assert_eq!(config.backend.api_key.as_deref(), Some("secret-anon"));
        assert_eq!(
            config.backend.table.as_deref(),
            Some("${FILTER_LOOKUP_TEST_UNSET_VAR}")
        );
    }

    #[test]
    fn test_invalid_toml_is_validation_error() {
        let err = TomlConfig::from_toml_str("[backend\nbase_url=").unwrap_err();
        assert!(matches!(err, LookupError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_from_file_resolves_fixture_next_to_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[backend]\nfixture = \"filters.json\"").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        let expected = file.path().parent().unwrap().join("filters.json");
        assert_eq!(
            config.backend.fixture.as_deref(),
            Some(expected.to_string_lossy().as_ref())
        );
        assert!(TomlConfig::from_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_from_file_keeps_absolute_fixture() {
        let dir = tempfile::TempDir::new().unwrap();
        let fixture = dir.path().join("data").join("filters.json");
        let config_path = dir.path().join("lookup.toml");
        std::fs::write(
            &config_path,
            format!("[backend]\nfixture = {:?}\n", fixture.to_string_lossy()),
        )
        .unwrap();

        let config = TomlConfig::from_file(&config_path).unwrap();
        assert_eq!(
            config.backend.fixture.as_deref(),
            Some(fixture.to_string_lossy().as_ref())
        );
    }
}
