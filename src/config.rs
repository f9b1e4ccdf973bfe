//! YAML configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.
//!
//! ```yaml
//! store_dir: ./data
//! request_timeout_secs: 30
//! model:
//!   model: gpt-3.5-turbo
//!   max_retries: 2
//! render:
//!   endpoint: http://localhost:3000
//! search_terms:
//!   by_country:
//!     NG: President Tinubu
//!   by_source:
//!     Arise News: Tinubu
//! ```

use crate::api::ModelSettings;
use crate::error::ConfigError;
use crate::fetch::render::RenderSettings;
use crate::models::Country;
use crate::orchestrator::SearchTerms;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the store snapshot.
    pub store_dir: String,
    /// Per-request timeout for listing and detail fetches.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub model: ModelSettings,
    pub render: RenderSettings,
    /// Zone scheduled jobs compute their "today" in.
    pub job_timezone: Tz,
    /// Posts summarized per run.
    pub activity_batch_size: usize,
    pub search_terms: SearchTerms,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_dir: "./data".into(),
            request_timeout_secs: 30,
            user_agent: format!("statewatch/{}", env!("CARGO_PKG_VERSION")),
            model: ModelSettings::default(),
            render: RenderSettings::default(),
            job_timezone: chrono_tz::Africa::Lagos,
            activity_batch_size: 100,
            search_terms: default_search_terms(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Load `path`, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Config::default());
        };
        let shown = path.display().to_string();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let config = Config::from_yaml(&yaml).map_err(|source| ConfigError::Parse {
            path: shown.clone(),
            source,
        })?;
        info!(path = %shown, "Loaded configuration");
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// The head-of-state queries each country's publishers are searched with.
pub fn default_search_terms() -> SearchTerms {
    let by_country = HashMap::from([
        (Country::Nigeria, "President Tinubu".to_string()),
        (Country::Gambia, "President Adama Barrow".to_string()),
        (Country::Ghana, "President Nana Akufo-Addo".to_string()),
        (Country::Kenya, "President William Ruto".to_string()),
        (Country::Liberia, "President George Weah".to_string()),
        (Country::SierraLeone, "President Julius Maada Bio".to_string()),
    ]);
    // Arise is searched by surname only.
    let by_source = HashMap::from([("Arise News".to_string(), "Tinubu".to_string())]);
    SearchTerms {
        by_country,
        by_source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_yaml_is_all_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.model.temperature, 0.4);
        assert_eq!(config.model.max_tokens, 1000);
        assert_eq!(config.activity_batch_size, 100);
        assert_eq!(config.job_timezone, chrono_tz::Africa::Lagos);
    }

    #[test]
    fn partial_yaml_overrides_only_named_fields() {
        let yaml = r#"
store_dir: /var/lib/statewatch
job_timezone: Africa/Nairobi
model:
  model: gpt-4o-mini
  max_retries: 0
render:
  endpoint: http://localhost:3000
search_terms:
  by_country:
    KE: Ruto
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.store_dir, "/var/lib/statewatch");
        assert_eq!(config.job_timezone, chrono_tz::Africa::Nairobi);
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(config.model.max_retries, 0);
        assert_eq!(config.model.temperature, 0.4);
        assert_eq!(config.render.endpoint.as_deref(), Some("http://localhost:3000"));
        assert_eq!(config.render.timeout_secs, 60);
        assert_eq!(config.search_terms.by_country[&Country::Kenya], "Ruto");
        assert!(config.search_terms.by_source.is_empty());
    }

    #[test]
    fn defaults_cover_every_country() {
        let terms = default_search_terms();
        for country in Country::ALL {
            assert!(terms.by_country.contains_key(&country), "{country}");
        }
        assert_eq!(terms.by_source["Arise News"], "Tinubu");
    }

    #[test]
    fn load_reads_file_and_reports_bad_yaml() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "activity_batch_size: 25").unwrap();
        let config = Config::load(Some(good.path())).unwrap();
        assert_eq!(config.activity_batch_size, 25);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "activity_batch_size: [not, a, number]").unwrap();
        assert!(matches!(
            Config::load(Some(bad.path())),
            Err(ConfigError::Parse { .. })
        ));

        let missing = Config::load(Some(Path::new("/nonexistent/statewatch.yaml")));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));
    }
}
