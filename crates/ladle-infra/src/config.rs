//! Configuration loader for Ladle.
//!
//! Reads `ladle.toml` and deserializes it into [`LadleConfig`]. Falls back to
//! defaults when the file is missing or malformed, then applies environment
//! overrides.

use std::path::Path;

use ladle_types::config::LadleConfig;

/// Load configuration from `path`.
///
/// - If the file does not exist, returns [`LadleConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(path: &Path) -> LadleConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return LadleConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return LadleConfig::default();
        }
    };

    match toml::from_str::<LadleConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            LadleConfig::default()
        }
    }
}

/// Overlay values from the process environment.
///
/// Recognised: `COSMIC_BUCKET_SLUG`, `COSMIC_READ_KEY`, `COSMIC_WRITE_KEY`,
/// `LADLE_HOST`, `LADLE_PORT`.
pub fn apply_env_overrides(config: &mut LadleConfig) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Overlay values from an arbitrary lookup. Empty values are ignored.
pub fn apply_overrides(config: &mut LadleConfig, lookup: impl Fn(&str) -> Option<String>) {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(slug) = get("COSMIC_BUCKET_SLUG") {
        config.cosmic.bucket_slug = slug;
    }
    if let Some(key) = get("COSMIC_READ_KEY") {
        config.cosmic.read_key = key;
    }
    if let Some(key) = get("COSMIC_WRITE_KEY") {
        config.cosmic.write_key = key;
    }
    if let Some(host) = get("LADLE_HOST") {
        config.server.host = host;
    }
    if let Some(port) = get("LADLE_PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(err) => tracing::warn!("Ignoring invalid LADLE_PORT '{port}': {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("ladle.toml")).await;
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.chat.default_max_tokens, 1000);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ladle.toml");
        tokio::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"

[cosmic]
bucket_slug = "kitchen"
read_key = "read"
write_key = "write"

[chat]
idle_timeout_secs = 15
"#,
        )
        .await
        .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.cosmic.bucket_slug, "kitchen");
        assert_eq!(config.chat.idle_timeout_secs, 15);
        assert_eq!(config.chat.open_timeout_secs, 30);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ladle.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(&path).await;
        assert_eq!(config.server.port, 3000);
        assert!(config.cosmic.bucket_slug.is_empty());
    }

    #[test]
    fn overrides_replace_config_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("COSMIC_BUCKET_SLUG", "env-bucket"),
            ("COSMIC_WRITE_KEY", "secret"),
            ("LADLE_PORT", "8081"),
            ("LADLE_HOST", ""),
        ]);
        let mut config = LadleConfig::default();
        apply_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.cosmic.bucket_slug, "env-bucket");
        assert_eq!(config.cosmic.write_key, "secret");
        assert!(config.cosmic.read_key.is_empty());
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let mut config = LadleConfig::default();
        apply_overrides(&mut config, |k| (k == "LADLE_PORT").then(|| "http".to_string()));
        assert_eq!(config.server.port, 3000);
    }
}
