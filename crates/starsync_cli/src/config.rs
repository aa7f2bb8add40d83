//! Configuration file support for starsync.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `STARSYNC_`, sections nested with
//!    `__`, e.g. `STARSYNC_NOTION__DATABASE_ID`)
//! 3. Local config file (`./starsync.toml`)
//! 4. XDG config file (`~/.config/starsync/config.toml`)
//! 5. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."
//!
//! [notion]
//! token = "secret_..."
//! database_id = "0123456789abcdef0123456789abcdef"
//! title_property = "Name"          # optional
//! id_property = "Repository ID"    # optional
//!
//! [notification]
//! wechat_params = "corpid,corpsecret,touser,agentid"  # optional
//!
//! [sync]
//! concurrency = 3
//! dry_run = false
//! ```

use std::error::Error;
use std::path::PathBuf;

use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;
use starsync::sync::{DEFAULT_CONCURRENCY, DatabaseLayout, SyncOptions};

use crate::commands::sync::SyncArgs;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Notion configuration.
    pub notion: NotionConfig,
    /// Notification configuration.
    pub notification: NotificationConfig,
    /// Default sync options.
    pub sync: SyncConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token. Needs read access to the user's stars.
    pub token: Option<String>,
}

/// Notion configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    /// Notion integration token.
    pub token: Option<String>,
    /// ID of the target database.
    pub database_id: Option<String>,
    /// Name of the title property (default "Name").
    pub title_property: Option<String>,
    /// Name of the repository ID property (default "Repository ID").
    pub id_property: Option<String>,
}

/// Notification configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// WeChat Work parameters: `corpid,corpsecret,touser,agentid`.
    pub wechat_params: Option<String>,
}

/// Default sync options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum concurrent create/archive requests.
    pub concurrency: usize,
    /// Compute the plan without writing.
    pub dry_run: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }
}

/// Fully resolved settings for one `sync` run.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub github_token: String,
    pub notion_token: String,
    pub database_id: String,
    pub layout: DatabaseLayout,
    pub wechat_params: Option<String>,
    pub options: SyncOptions,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// A malformed file or environment variable is logged and the built-in
    /// defaults are used instead.
    pub fn load() -> Self {
        match Self::layered().and_then(|settings| settings.try_deserialize::<Config>()) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config: {}", e);
                Config::default()
            }
        }
    }

    fn layered() -> Result<ConfigBuilder, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("starsync.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./starsync.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // STARSYNC_NOTION__DATABASE_ID -> notion.database_id
        builder = builder.add_source(Self::environment());

        builder.build()
    }

    fn environment() -> Environment {
        Environment::with_prefix("STARSYNC")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "starsync").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Overlay CLI flags and validate the result.
    ///
    /// Each missing required value is reported under its flag name.
    pub fn resolve(self, args: &SyncArgs) -> Result<SyncSettings, Box<dyn Error>> {
        let github_token = required(args.github_token.clone(), self.github.token, "github-token")?;
        let notion_token = required(args.notion_token.clone(), self.notion.token, "notion-token")?;
        let database_id = required(
            args.notion_database_id.clone(),
            self.notion.database_id,
            "notion-database-id",
        )?;

        let concurrency = args.concurrency.unwrap_or(self.sync.concurrency);
        if concurrency == 0 {
            return Err("concurrency must be at least 1".into());
        }

        let mut layout = DatabaseLayout::default();
        if let Some(title) = self.notion.title_property.filter(|s| !s.is_empty()) {
            layout.title = title;
        }
        if let Some(id) = self.notion.id_property.filter(|s| !s.is_empty()) {
            layout.source_id = id;
        }

        let wechat_params = args
            .notification_wechat_params
            .clone()
            .or(self.notification.wechat_params)
            .filter(|s| !s.trim().is_empty());

        Ok(SyncSettings {
            github_token,
            notion_token,
            database_id,
            layout,
            wechat_params,
            options: SyncOptions {
                concurrency,
                dry_run: args.dry_run.unwrap_or(self.sync.dry_run),
            },
        })
    }
}

fn required(
    flag: Option<String>,
    configured: Option<String>,
    name: &str,
) -> Result<String, Box<dyn Error>> {
    flag.or(configured)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| format!("{name} is required").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml_content: &str) -> Config {
        ConfigBuilder::builder()
            .add_source(File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    fn full_config() -> Config {
        from_toml(
            r#"
            [github]
            token = "ghp_test123"

            [notion]
            token = "secret_abc"
            database_id = "db-1"
        "#,
        )
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sync.concurrency, DEFAULT_CONCURRENCY);
        assert!(!config.sync.dry_run);
        assert!(config.github.token.is_none());
        assert!(config.notion.database_id.is_none());
        assert!(config.notification.wechat_params.is_none());
    }

    #[test]
    fn test_config_builder_with_toml_string() {
        let config = from_toml(
            r#"
            [github]
            token = "ghp_test123"

            [notion]
            token = "secret_abc"
            database_id = "db-1"
            title_property = "Repo"
            id_property = "GitHub ID"

            [notification]
            wechat_params = "corp,secret,@all,1000002"

            [sync]
            concurrency = 5
            dry_run = true
        "#,
        );

        assert_eq!(config.github.token.as_deref(), Some("ghp_test123"));
        assert_eq!(config.notion.token.as_deref(), Some("secret_abc"));
        assert_eq!(config.notion.database_id.as_deref(), Some("db-1"));
        assert_eq!(config.notion.title_property.as_deref(), Some("Repo"));
        assert_eq!(config.notion.id_property.as_deref(), Some("GitHub ID"));
        assert_eq!(
            config.notification.wechat_params.as_deref(),
            Some("corp,secret,@all,1000002")
        );
        assert_eq!(config.sync.concurrency, 5);
        assert!(config.sync.dry_run);
    }

    #[test]
    fn test_config_builder_partial_override() {
        let config = from_toml(
            r#"
            [sync]
            dry_run = true
        "#,
        );

        assert!(config.sync.dry_run);
        assert_eq!(config.sync.concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_config_merging_order() {
        let settings = ConfigBuilder::builder()
            .add_source(File::from_str(
                r#"
                [notion]
                database_id = "from-xdg"
                token = "xdg-token"
                "#,
                FileFormat::Toml,
            ))
            .add_source(File::from_str(
                r#"
                [notion]
                database_id = "from-local"
                "#,
                FileFormat::Toml,
            ))
            .build()
            .unwrap();
        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.notion.database_id.as_deref(), Some("from-local"));
        assert_eq!(config.notion.token.as_deref(), Some("xdg-token"));
    }

    #[test]
    fn test_environment_nesting() {
        let source = std::collections::HashMap::from([
            (
                "STARSYNC_NOTION__DATABASE_ID".to_string(),
                "env-db".to_string(),
            ),
            ("STARSYNC_SYNC__CONCURRENCY".to_string(), "7".to_string()),
        ]);
        let settings = ConfigBuilder::builder()
            .add_source(Config::environment().source(Some(source)))
            .build()
            .unwrap();
        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.notion.database_id.as_deref(), Some("env-db"));
        assert_eq!(config.sync.concurrency, 7);
    }

    #[test]
    fn test_config_unknown_fields_ignored() {
        let config = from_toml(
            r#"
            [github]
            token = "ghp_test"
            unknown_field = "ignored"

            [unknown_section]
            foo = "bar"
        "#,
        );
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
    }

    #[test]
    fn test_resolve_uses_config_values() {
        let settings = full_config().resolve(&SyncArgs::default()).unwrap();

        assert_eq!(settings.github_token, "ghp_test123");
        assert_eq!(settings.notion_token, "secret_abc");
        assert_eq!(settings.database_id, "db-1");
        assert_eq!(settings.layout, DatabaseLayout::default());
        assert_eq!(settings.options.concurrency, DEFAULT_CONCURRENCY);
        assert!(!settings.options.dry_run);
        assert!(settings.wechat_params.is_none());
    }

    #[test]
    fn test_resolve_flags_win() {
        let args = SyncArgs {
            github_token: Some("ghp_flag".to_string()),
            notion_database_id: Some("db-flag".to_string()),
            concurrency: Some(1),
            dry_run: Some(true),
            ..SyncArgs::default()
        };

        let settings = full_config().resolve(&args).unwrap();
        assert_eq!(settings.github_token, "ghp_flag");
        assert_eq!(settings.notion_token, "secret_abc");
        assert_eq!(settings.database_id, "db-flag");
        assert_eq!(settings.options.concurrency, 1);
        assert!(settings.options.dry_run);
    }

    #[test]
    fn test_resolve_dry_run_flag_overrides_config_both_ways() {
        let config = || {
            let mut config = full_config();
            config.sync.dry_run = true;
            config
        };

        let inherited = config().resolve(&SyncArgs::default()).unwrap();
        assert!(inherited.options.dry_run);

        let args = SyncArgs {
            dry_run: Some(false),
            ..SyncArgs::default()
        };
        let overridden = config().resolve(&args).unwrap();
        assert!(!overridden.options.dry_run);
    }

    #[test]
    fn test_resolve_names_missing_flag() {
        let err = Config::default()
            .resolve(&SyncArgs::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "github-token is required");

        let mut config = full_config();
        config.notion.database_id = Some("  ".to_string());
        let err = config.resolve(&SyncArgs::default()).unwrap_err();
        assert_eq!(err.to_string(), "notion-database-id is required");
    }

    #[test]
    fn test_resolve_rejects_zero_concurrency() {
        let args = SyncArgs {
            concurrency: Some(0),
            ..SyncArgs::default()
        };
        let err = full_config().resolve(&args).unwrap_err();
        assert_eq!(err.to_string(), "concurrency must be at least 1");
    }

    #[test]
    fn test_resolve_custom_layout() {
        let mut config = full_config();
        config.notion.title_property = Some("Repo".to_string());
        config.notion.id_property = Some("GitHub ID".to_string());

        let settings = config.resolve(&SyncArgs::default()).unwrap();
        assert_eq!(settings.layout.title, "Repo");
        assert_eq!(settings.layout.source_id, "GitHub ID");
        assert_eq!(settings.layout.url, "URL");
    }

    #[test]
    fn test_resolve_blank_wechat_params_disable_notifier() {
        let mut config = full_config();
        config.notification.wechat_params = Some(String::new());
        assert!(
            config
                .resolve(&SyncArgs::default())
                .unwrap()
                .wechat_params
                .is_none()
        );
    }
}
