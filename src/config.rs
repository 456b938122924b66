//! Configuration for syllabus paths and rendering.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (SYLLABUS_HOME, SYLLABUS_CONTENT)
//! 2. Config file (.syllabus/config.yaml)
//! 3. Defaults (~/.syllabus, ~/.syllabus/content)
//!
//! The CLI `--content` flag is applied on top of the resolved config.
//!
//! Config file discovery:
//! - Searches current directory and parents for .syllabus/config.yaml
//! - `paths.home` is relative to the .syllabus/ directory
//! - `paths.content` is relative to the project root (parent of .syllabus/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::mdx::UnknownComponentPolicy;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub render: Option<RenderConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .syllabus/)
    pub home: Option<String>,
    /// Content directory (relative to project root)
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub unknown_components: Option<UnknownComponentPolicy>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to syllabus home
    pub home: PathBuf,
    /// Content directory holding courses.yaml / challenges.yaml
    pub content: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Render settings
    pub render: RenderSettings,
}

#[derive(Debug, Clone, Default)]
pub struct RenderSettings {
    pub unknown_components: UnknownComponentPolicy,
}

impl ResolvedConfig {
    /// Defaults around an explicit content directory, no config file
    pub fn for_content_dir(content: impl Into<PathBuf>) -> Self {
        let content = content.into();
        Self {
            home: content.clone(),
            content,
            config_file: None,
            render: RenderSettings::default(),
        }
    }

    /// Copy with the content directory replaced (CLI `--content`)
    pub fn with_content_dir(mut self, content: impl Into<PathBuf>) -> Self {
        self.content = content.into();
        self
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".syllabus").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Environment overrides, read once per resolution
struct EnvOverrides {
    home: Option<PathBuf>,
    content: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            home: std::env::var("SYLLABUS_HOME").ok().map(PathBuf::from),
            content: std::env::var("SYLLABUS_CONTENT").ok().map(PathBuf::from),
        }
    }
}

/// Combine config file, environment and defaults
fn resolve(
    config_file: Option<PathBuf>,
    env: EnvOverrides,
    default_home: PathBuf,
) -> Result<ResolvedConfig> {
    let Some(config_path) = config_file else {
        let home = env.home.unwrap_or(default_home);
        let content = env.content.unwrap_or_else(|| home.join("content"));

        return Ok(ResolvedConfig {
            home,
            content,
            config_file: None,
            render: RenderSettings::default(),
        });
    };

    let config = load_config_file(&config_path)?;

    // .syllabus/ and the project root above it
    let syllabus_dir = config_path.parent().unwrap_or(Path::new("."));
    let base_dir = syllabus_dir.parent().unwrap_or(Path::new("."));

    let home = if let Some(env_home) = env.home {
        env_home
    } else if let Some(ref home_path) = config.paths.home {
        resolve_path(syllabus_dir, home_path)
    } else {
        default_home
    };

    let content = if let Some(env_content) = env.content {
        env_content
    } else if let Some(ref content_path) = config.paths.content {
        resolve_path(base_dir, content_path)
    } else {
        home.join("content")
    };

    let render = RenderSettings {
        unknown_components: config
            .render
            .as_ref()
            .and_then(|r| r.unknown_components)
            .unwrap_or_default(),
    };

    Ok(ResolvedConfig {
        home,
        content,
        config_file: Some(config_path),
        render,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".syllabus");

    let config_file = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_file_from(&cwd));

    resolve(config_file, EnvOverrides::from_env(), default_home)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Get the content directory.
pub fn content_dir() -> Result<PathBuf> {
    Ok(config()?.content.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn no_env() -> EnvOverrides {
        EnvOverrides {
            home: None,
            content: None,
        }
    }

    fn write_config(root: &Path, body: &str) -> PathBuf {
        let dir = root.join(".syllabus");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{}", body).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, no_env(), PathBuf::from("/home/u/.syllabus")).unwrap();

        assert_eq!(config.home, PathBuf::from("/home/u/.syllabus"));
        assert_eq!(config.content, PathBuf::from("/home/u/.syllabus/content"));
        assert!(config.config_file.is_none());
        assert_eq!(
            config.render.unknown_components,
            UnknownComponentPolicy::Passthrough
        );
    }

    #[test]
    fn test_env_overrides_defaults() {
        let env = EnvOverrides {
            home: Some(PathBuf::from("/srv/syllabus")),
            content: None,
        };
        let config = resolve(None, env, PathBuf::from("/home/u/.syllabus")).unwrap();

        assert_eq!(config.content, PathBuf::from("/srv/syllabus/content"));
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let path = write_config(
            temp.path(),
            r#"
version: "1.0"
paths:
  home: ./
  content: content
render:
  unknown_components: strip
"#,
        );

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.paths.content, Some("content".to_string()));
        assert_eq!(
            config.render.unwrap().unknown_components,
            Some(UnknownComponentPolicy::Strip)
        );
    }

    #[test]
    fn test_content_resolves_against_project_root() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("content")).unwrap();
        let path = write_config(
            temp.path(),
            "version: \"1.0\"\npaths:\n  content: content\nrender:\n  unknown_components: error\n",
        );

        let config = resolve(Some(path.clone()), no_env(), PathBuf::from("/unused")).unwrap();

        assert_eq!(
            config.content,
            temp.path().join("content").canonicalize().unwrap()
        );
        assert_eq!(config.config_file, Some(path));
        assert_eq!(config.render.unknown_components, UnknownComponentPolicy::Error);
    }

    #[test]
    fn test_env_beats_config_file() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "version: \"1.0\"\npaths:\n  content: content\n");
        let env = EnvOverrides {
            home: None,
            content: Some(PathBuf::from("/env/content")),
        };

        let config = resolve(Some(path), env, PathBuf::from("/unused")).unwrap();
        assert_eq!(config.content, PathBuf::from("/env/content"));
    }

    #[test]
    fn test_find_config_walks_up() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "version: \"1.0\"\n");
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_file_from(&nested), Some(path));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
