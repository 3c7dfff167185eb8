use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use handmade_platform::LoopConfig;
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoopConfigFile {
    window_title: Option<String>,
    display_refresh_hz: Option<u32>,
    overrun_log_every: Option<u32>,
    metrics_log_interval_ms: Option<u64>,
    simulated_slow_frame_ms: Option<u64>,
}

impl LoopConfigFile {
    fn apply(self, config: &mut LoopConfig) {
        if let Some(window_title) = self.window_title {
            config.window_title = window_title;
        }
        if let Some(display_refresh_hz) = self.display_refresh_hz {
            config.display_refresh_hz = display_refresh_hz;
        }
        if let Some(overrun_log_every) = self.overrun_log_every {
            config.overrun_log_every = overrun_log_every;
        }
        if let Some(interval_ms) = self.metrics_log_interval_ms {
            config.metrics_log_interval = Duration::from_millis(interval_ms);
        }
        if let Some(slow_frame_ms) = self.simulated_slow_frame_ms {
            config.simulated_slow_frame_ms = slow_frame_ms;
        }
    }
}

pub(crate) fn load_loop_config(path: &Path) -> LoopConfig {
    let mut config = LoopConfig::default();
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "loop_config_file_absent");
            return config;
        }
        Err(error) => {
            warn!(
                path = %path.display(),
                error = %error,
                "loop_config_unreadable; using defaults"
            );
            return config;
        }
    };

    match parse_loop_config_json(&raw) {
        Ok(file) => {
            file.apply(&mut config);
            info!(path = %path.display(), "loop_config_file_loaded");
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "loop_config_invalid; using defaults");
        }
    }
    config
}

fn parse_loop_config_json(raw: &str) -> Result<LoopConfigFile, String> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    match serde_path_to_error::deserialize::<_, LoopConfigFile>(&mut deserializer) {
        Ok(file) => Ok(file),
        Err(error) => {
            let path = error.path().to_string();
            let source = error.into_inner();
            if path.is_empty() || path == "." {
                Err(format!("parse loop config json: {source}"))
            } else {
                Err(format!("parse loop config json at {path}: {source}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("loop.json");
        fs::write(&path, contents).expect("write config");
        (dir, path)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_loop_config(&dir.path().join("absent.json"));

        let defaults = LoopConfig::default();
        assert_eq!(config.display_refresh_hz, defaults.display_refresh_hz);
        assert_eq!(config.window_title, defaults.window_title);
    }

    #[test]
    fn fields_present_in_file_override_defaults() {
        let (_dir, path) = write_config(
            r#"{ "display_refresh_hz": 120, "metrics_log_interval_ms": 250, "window_title": "Test" }"#,
        );

        let config = load_loop_config(&path);

        assert_eq!(config.display_refresh_hz, 120);
        assert_eq!(config.metrics_log_interval, Duration::from_millis(250));
        assert_eq!(config.window_title, "Test");
        assert_eq!(
            config.overrun_log_every,
            LoopConfig::default().overrun_log_every
        );
    }

    #[test]
    fn wrong_type_reports_json_path() {
        let error = parse_loop_config_json(r#"{ "overrun_log_every": "often" }"#)
            .expect_err("string is not a u32");

        assert!(error.contains("overrun_log_every"), "{error}");
    }

    #[test]
    fn unknown_field_is_rejected() {
        let error =
            parse_loop_config_json(r#"{ "refresh": 60 }"#).expect_err("unknown field");
        assert!(error.contains("refresh"), "{error}");
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let (_dir, path) = write_config(r#"{ "display_refresh_hz": -5 }"#);

        let config = load_loop_config(&path);

        assert_eq!(
            config.display_refresh_hz,
            LoopConfig::default().display_refresh_hz
        );
    }
}
