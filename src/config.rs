pub mod defaults;
pub mod settings;
pub mod user;

pub use settings::{SummarizeConfig, WeightsConfig};
pub use user::{CONFIG_FILE_NAME, load_user_config, user_config_path};

use crate::error::{KirinukiError, KirinukiResult};
use crate::summarize::SummarizeSettings;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }

    /// Forward the event to the `log` facade
    pub fn log(&self) {
        match self.kind {
            SettingsEventKind::Info => log::info!(target: "kirinuki::config", "{}", self.message),
            SettingsEventKind::Warning => {
                log::warn!(target: "kirinuki::config", "{}", self.message)
            }
        }
    }
}

#[derive(Debug)]
pub struct SettingsLoadOutcome {
    /// All layers merged; every field is set because the defaults layer is complete
    pub config: SummarizeConfig,
    pub events: Vec<SettingsEvent>,
}

impl SettingsLoadOutcome {
    pub fn settings(&self) -> SummarizeSettings {
        self.config.resolve()
    }

    pub fn budget(&self) -> usize {
        self.config.budget.unwrap_or(defaults::DEFAULT_BUDGET)
    }
}

/// Fold layers from lowest to highest precedence
pub fn merge_all(layers: &[Option<SummarizeConfig>]) -> SummarizeConfig {
    layers
        .iter()
        .flatten()
        .cloned()
        .fold(SummarizeConfig::default(), SummarizeConfig::merge)
}

/// Load every configuration layer.
///
/// Precedence: defaults < user < project < `overrides`. The project layer is
/// `explicit_path` when given, otherwise `root_path/kirinuki.toml` if it exists.
/// Only a failing `explicit_path` is an error; other layers that fail to load
/// are skipped with a warning event.
pub fn load_settings(
    root_path: Option<&Path>,
    explicit_path: Option<&Path>,
    overrides: Option<SummarizeConfig>,
) -> KirinukiResult<SettingsLoadOutcome> {
    let mut events = Vec::new();

    let defaults = Some(defaults::default_config());
    let user_config = load_user_config_with_events(&mut events);
    let project_config = match explicit_path {
        Some(path) => Some(load_explicit_config(path, &mut events)?),
        None => load_project_config(root_path, &mut events),
    };

    let config = merge_all(&[defaults, user_config, project_config, overrides]);
    Ok(SettingsLoadOutcome { config, events })
}

fn load_user_config_with_events(events: &mut Vec<SettingsEvent>) -> Option<SummarizeConfig> {
    match load_user_config() {
        Ok(Some(config)) => {
            events.push(SettingsEvent::info("Loaded user config from XDG_CONFIG_HOME"));
            Some(config)
        }
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to load user config: {err}"
            )));
            None
        }
    }
}

fn load_project_config(
    root_path: Option<&Path>,
    events: &mut Vec<SettingsEvent>,
) -> Option<SummarizeConfig> {
    let config_path = root_path?.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return None;
    }

    events.push(SettingsEvent::info(format!(
        "Found config file: {}",
        config_path.display()
    )));

    match read_config(&config_path) {
        Ok(config) => {
            events.push(SettingsEvent::info(format!(
                "Successfully loaded {CONFIG_FILE_NAME}"
            )));
            Some(config)
        }
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to load {}: {err}",
                config_path.display()
            )));
            None
        }
    }
}

fn load_explicit_config(
    path: &Path,
    events: &mut Vec<SettingsEvent>,
) -> KirinukiResult<SummarizeConfig> {
    let config = read_config(path).map_err(|err| {
        KirinukiError::config(format!("failed to load {}: {err}", path.display()))
    })?;
    events.push(SettingsEvent::info(format!(
        "Loaded config file: {}",
        path.display()
    )));
    Ok(config)
}

fn read_config(path: &Path) -> KirinukiResult<SummarizeConfig> {
    let contents = fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::LineNumberStyle;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    /// Point XDG_CONFIG_HOME at an empty directory so the host user config does not leak in
    fn with_empty_user_config<T>(f: impl FnOnce() -> T) -> T {
        let xdg = TempDir::new().expect("failed to create temp dir");
        let original = env::var_os("XDG_CONFIG_HOME");
        // SAFETY: tests touching XDG_CONFIG_HOME are serialized
        unsafe { env::set_var("XDG_CONFIG_HOME", xdg.path()) };
        let result = f();
        // SAFETY: same as above, restoring the original state
        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        result
    }

    #[test]
    fn test_merge_all_later_layers_win() {
        let low = SummarizeConfig {
            budget: Some(10),
            ellipsis: Some("...".to_string()),
            ..Default::default()
        };
        let high = SummarizeConfig {
            budget: Some(20),
            ..Default::default()
        };
        let merged = merge_all(&[Some(low), None, Some(high)]);
        assert_eq!(merged.budget, Some(20));
        assert_eq!(merged.ellipsis.as_deref(), Some("..."));
    }

    #[test]
    fn test_merge_all_is_idempotent() {
        let layer = SummarizeConfig {
            budget: Some(10),
            preserve_type_checking: Some(true),
            ..Default::default()
        };
        let once = merge_all(&[Some(layer.clone())]);
        let twice = merge_all(&[Some(layer.clone()), Some(layer)]);
        assert_eq!(once, twice);
    }

    #[test]
    #[serial(xdg_env)]
    fn test_load_settings_without_files_uses_defaults() {
        let outcome = with_empty_user_config(|| load_settings(None, None, None)).unwrap();
        assert_eq!(outcome.settings(), SummarizeSettings::default());
        assert_eq!(outcome.budget(), defaults::DEFAULT_BUDGET);
        assert!(outcome.events.is_empty());
    }

    #[test]
    #[serial(xdg_env)]
    fn test_project_config_overrides_defaults_and_flags_override_project() {
        let project = TempDir::new().expect("failed to create temp dir");
        fs::write(
            project.path().join(CONFIG_FILE_NAME),
            "budget = 100\nlineNumberStyle = \"omitted-ranges\"\n",
        )
        .expect("failed to write config");

        let overrides = SummarizeConfig {
            budget: Some(50),
            ..Default::default()
        };
        let outcome =
            with_empty_user_config(|| load_settings(Some(project.path()), None, Some(overrides)))
                .unwrap();

        assert_eq!(outcome.budget(), 50);
        assert_eq!(
            outcome.settings().line_number_style,
            LineNumberStyle::OmittedRanges
        );
        assert!(
            outcome
                .events
                .iter()
                .any(|e| e.kind == SettingsEventKind::Info && e.message.contains("Found config"))
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn test_broken_project_config_is_a_warning() {
        let project = TempDir::new().expect("failed to create temp dir");
        fs::write(project.path().join(CONFIG_FILE_NAME), "budget = \"lots\"\n")
            .expect("failed to write config");

        let outcome =
            with_empty_user_config(|| load_settings(Some(project.path()), None, None)).unwrap();
        assert_eq!(outcome.budget(), defaults::DEFAULT_BUDGET);
        assert!(
            outcome
                .events
                .iter()
                .any(|e| e.kind == SettingsEventKind::Warning)
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn test_broken_explicit_config_is_fatal() {
        let project = TempDir::new().expect("failed to create temp dir");
        let path = project.path().join("custom.toml");
        fs::write(&path, "not toml at all = = =").expect("failed to write config");

        let result = with_empty_user_config(|| load_settings(None, Some(&path), None));
        assert!(matches!(result, Err(KirinukiError::Config { .. })));
    }

    #[test]
    #[serial(xdg_env)]
    fn test_user_config_sits_below_project_config() {
        let xdg = TempDir::new().expect("failed to create temp dir");
        let user_dir = xdg.path().join("kirinuki");
        fs::create_dir_all(&user_dir).expect("failed to create config dir");
        fs::write(
            user_dir.join(CONFIG_FILE_NAME),
            "budget = 7\nellipsis = \"[...]\"\n",
        )
        .expect("failed to write config");

        let project = TempDir::new().expect("failed to create temp dir");
        fs::write(project.path().join(CONFIG_FILE_NAME), "budget = 9\n")
            .expect("failed to write config");

        let original = env::var_os("XDG_CONFIG_HOME");
        // SAFETY: serialized with the other XDG tests
        unsafe { env::set_var("XDG_CONFIG_HOME", xdg.path()) };
        let outcome = load_settings(Some(project.path()), None, None);
        // SAFETY: restoring the original state
        unsafe {
            match original {
                Some(val) => env::set_var("XDG_CONFIG_HOME", val),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }

        let outcome = outcome.unwrap();
        assert_eq!(outcome.budget(), 9);
        assert_eq!(outcome.settings().ellipsis, "[...]");
    }
}
