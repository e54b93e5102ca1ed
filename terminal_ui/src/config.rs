use std::path::PathBuf;

use url::Url;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::tui::theme::ThemeMode;

const TASKS_PATH: [&str; 2] = ["api", "tasks"];
const DEFAULT_LOG_NAME: &str = "taskdesk.log";

/// Settings resolved from flags and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tasks_url: Url,
    pub export_dir: PathBuf,
    pub log_file: Option<PathBuf>,
    pub theme: ThemeMode,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Config, ConfigError> {
        let api_url = Url::parse(&cli.api_url).map_err(|source| ConfigError::InvalidApiUrl {
            url: cli.api_url.clone(),
            source,
        })?;
        let tasks_url = tasks_url(&api_url)?;
        Ok(Config {
            tasks_url,
            export_dir: cli.export_dir.clone(),
            log_file: cli.log_file.clone(),
            theme: if cli.light {
                ThemeMode::Light
            } else {
                ThemeMode::Dark
            },
        })
    }

    /// The dashboard owns the terminal, so it always logs to a file.
    pub fn tui_log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_NAME))
    }
}

/// `{base}/api/tasks`, unless `base` already points there.
fn tasks_url(base: &Url) -> Result<Url, ConfigError> {
    let mut url = base.clone();
    let already = base
        .path_segments()
        .map(|segments| {
            let segments: Vec<&str> = segments.filter(|s| !s.is_empty()).collect();
            segments.ends_with(&TASKS_PATH)
        })
        .unwrap_or(false);
    if !already {
        url.path_segments_mut()
            .map_err(|_| ConfigError::NotABase(base.to_string()))?
            .pop_if_empty()
            .extend(TASKS_PATH);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config(args: &[&str]) -> Result<Config, ConfigError> {
        let mut argv = vec!["taskdesk"];
        argv.extend_from_slice(args);
        Config::from_cli(&Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn tasks_live_under_api_tasks() {
        let local = config_with_base("http://localhost:3000");
        assert_eq!(local.tasks_url.as_str(), "http://localhost:3000/api/tasks");

        let prefixed = config_with_base("http://example.com/prefix/");
        assert_eq!(prefixed.tasks_url.as_str(), "http://example.com/prefix/api/tasks");
    }

    fn config_with_base(base: &str) -> Config {
        config(&["--api-url", base]).unwrap()
    }

    #[test]
    fn full_tasks_url_is_kept() {
        let config = config_with_base("http://example.com/api/tasks/");
        assert_eq!(config.tasks_url.as_str(), "http://example.com/api/tasks/");
    }

    #[test]
    fn bad_urls_are_rejected() {
        assert!(matches!(
            config(&["--api-url", "not a url"]),
            Err(ConfigError::InvalidApiUrl { .. })
        ));
        assert!(matches!(
            config(&["--api-url", "mailto:someone@example.com"]),
            Err(ConfigError::NotABase(_))
        ));
    }

    #[test]
    fn light_flag_and_log_default() {
        let light = config(&["--light", "--api-url", "http://localhost:3000"]).unwrap();
        assert_eq!(light.theme, ThemeMode::Light);
        if light.log_file.is_none() {
            assert!(light.tui_log_file().ends_with(DEFAULT_LOG_NAME));
        }
    }
}
