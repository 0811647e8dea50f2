use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` layers environment variables (prefix `EARWORM__`) over an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("EARWORM")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("tool.extra_args"),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Load and validate, falling back to defaults. The config is optional,
    /// so a broken one never stops startup; the reason for the fallback is
    /// returned for the caller to report once logging is up.
    pub fn load_or_default() -> (Self, Option<String>) {
        let loaded = Self::load()
            .map_err(|e| format!("failed to load config: {e}"))
            .and_then(|s| match s.validate() {
                Ok(()) => Ok(s),
                Err(msg) => Err(format!("invalid config: {msg}")),
            });

        match loaded {
            Ok(s) => (s, None),
            Err(reason) => (Self::default(), Some(reason)),
        }
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.quiz.num_choices == 0 {
            return Err("quiz.num_choices must be >= 1".to_string());
        }
        if self.quiz.excerpt_seconds == 0 {
            return Err("quiz.excerpt_seconds must be >= 1".to_string());
        }
        if self.quiz.max_attempts == 0 {
            return Err("quiz.max_attempts must be >= 1".to_string());
        }
        if self.tool.program.trim().is_empty() {
            return Err("tool.program must not be empty".to_string());
        }
        if self.tool.audio_format.trim().is_empty() {
            return Err("tool.audio_format must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `EARWORM_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("EARWORM_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/earworm/config.toml`
/// or `~/.config/earworm/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("earworm").join("config.toml"))
}
