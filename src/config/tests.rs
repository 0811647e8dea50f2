use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_earworm_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("EARWORM_CONFIG_PATH", "/tmp/earworm-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/earworm-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("earworm")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("earworm")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_quiz_rules() {
    let s = Settings::default();
    assert_eq!(s.quiz.num_choices, 5);
    assert_eq!(s.quiz.excerpt_length(), Duration::from_secs(30));
    assert_eq!(s.tool.program, "yt-dlp");
    assert_eq!(s.tool.audio_format, "mp3");
    assert_eq!(s.tool.audio_quality, "128K");
    assert_eq!(s.log.level, LogLevelSetting::Info);
    assert!(s.validate().is_ok());
}

#[test]
fn partial_sections_keep_defaults_for_missing_keys() {
    let s: Settings = toml::from_str(
        r#"
[quiz]
num_choices = 3

[log]
level = "warning"
"#,
    )
    .unwrap();

    assert_eq!(s.quiz.num_choices, 3);
    assert_eq!(s.quiz.excerpt_seconds, 30);
    assert_eq!(s.quiz.max_attempts, 10);
    assert_eq!(s.tool.program, "yt-dlp");
    assert_eq!(s.log.level, LogLevelSetting::Warn);
    assert_eq!(s.log.level.to_filter(), log::LevelFilter::Warn);
}

#[test]
fn validate_rejects_zero_counts_and_empty_program() {
    let mut s = Settings::default();
    s.quiz.num_choices = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.quiz.excerpt_seconds = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.quiz.max_attempts = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.tool.program = "  ".to_string();
    assert!(s.validate().is_err());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[quiz]
num_choices = 4
excerpt_seconds = 15
max_attempts = 3
cache_dir = "/tmp/earworm-cache"

[tool]
program = "/opt/bin/yt-dlp"
audio_format = "opus"
audio_quality = "96K"
watch_url_prefix = "https://music.example/watch?v="
extra_args = ["--no-warnings"]

[ui]
header_text = "hello"
default_url = "https://music.example/playlist?list=abc"

[log]
level = "debug"
file = "/tmp/earworm-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("EARWORM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("EARWORM__QUIZ__NUM_CHOICES");

    let s = Settings::load().unwrap();
    assert_eq!(s.quiz.num_choices, 4);
    assert_eq!(s.quiz.excerpt_seconds, 15);
    assert_eq!(s.quiz.max_attempts, 3);
    assert_eq!(
        s.quiz.cache_dir,
        Some(std::path::PathBuf::from("/tmp/earworm-cache"))
    );
    assert_eq!(s.tool.program, "/opt/bin/yt-dlp");
    assert_eq!(s.tool.audio_format, "opus");
    assert_eq!(s.tool.audio_quality, "96K");
    assert_eq!(s.tool.watch_url_prefix, "https://music.example/watch?v=");
    assert_eq!(s.tool.extra_args, vec!["--no-warnings".to_string()]);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(s.ui.default_url, "https://music.example/playlist?list=abc");
    assert_eq!(s.log.level, LogLevelSetting::Debug);
    assert_eq!(
        s.log.file,
        Some(std::path::PathBuf::from("/tmp/earworm-test.log"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[quiz]
num_choices = 4
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("EARWORM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("EARWORM__QUIZ__NUM_CHOICES", "7");

    let s = Settings::load().unwrap();
    assert_eq!(s.quiz.num_choices, 7);
}

#[test]
fn invalid_config_falls_back_to_defaults_with_reason() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[quiz]\nnum_choices = 0\n").unwrap();

    let _g1 = EnvGuard::set("EARWORM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("EARWORM__QUIZ__NUM_CHOICES");

    let (s, reason) = Settings::load_or_default();
    assert_eq!(s.quiz.num_choices, 5);
    assert!(reason.unwrap().contains("quiz.num_choices"));
}

#[test]
fn unparsable_config_falls_back_to_defaults_with_reason() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[quiz]\nnum_choices = \"many\"\n").unwrap();

    let _g1 = EnvGuard::set("EARWORM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("EARWORM__QUIZ__NUM_CHOICES");

    let (s, reason) = Settings::load_or_default();
    assert_eq!(s.quiz.num_choices, 5);
    assert!(reason.unwrap().starts_with("failed to load config"));
}

#[test]
fn valid_config_loads_without_fallback() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(&cfg_path, "[quiz]\nnum_choices = 3\n").unwrap();

    let _g1 = EnvGuard::set("EARWORM_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("EARWORM__QUIZ__NUM_CHOICES");

    let (s, reason) = Settings::load_or_default();
    assert_eq!(s.quiz.num_choices, 3);
    assert!(reason.is_none());
}
