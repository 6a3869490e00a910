use std::fs;
use std::path::Path;

use config::Config;
use config::ConfigError as ExternalConfigError;
use config::File;
use config::FileFormat;
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration build/deserialize error")]
    Config(#[from] ExternalConfigError),
    #[error("Failed to read composer.json")]
    ComposerIo(#[from] std::io::Error),
    #[error("Failed to parse composer.json")]
    ComposerParse(#[from] serde_json::Error),
    #[error("Invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Log at `debug` instead of `info` unless `RUST_LOG` says otherwise.
    pub debug: bool,
    /// Helper functions recognized in addition to the built-in Elem set.
    pub functions: Vec<String>,
    /// Name of the argument that carries CSS classes.
    pub class_argument: String,
    /// Extensions of files scanned for class selectors, without the dot.
    pub stylesheet_extensions: Vec<String>,
    /// Gitignore-style globs excluded from stylesheet enumeration.
    pub exclude: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            functions: Vec::new(),
            class_argument: "class".to_string(),
            stylesheet_extensions: vec!["css".to_string()],
            exclude: Vec::new(),
        }
    }
}

impl Settings {
    pub fn new(project_root: &Path) -> Result<Self, ConfigError> {
        let user_config_file = ProjectDirs::from("com.github", "epic64", "elem")
            .map(|proj_dirs| proj_dirs.config_dir().join("elem.toml"));

        Self::load_from_paths(project_root, user_config_file.as_deref())
    }

    fn load_from_paths(
        project_root: &Path,
        user_config_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }

        let composer_path = project_root.join("composer.json");
        if composer_path.exists() {
            let content = fs::read_to_string(&composer_path)?;
            let composer: serde_json::Value = serde_json::from_str(&content)?;

            if let Some(elem) = composer
                .get("extra")
                .and_then(|extra| extra.get("elem"))
                .filter(|elem| elem.is_object())
            {
                let elem_json = serde_json::to_string(elem)?;
                builder = builder.add_source(File::from_str(&elem_json, FileFormat::Json));
            }
        }

        builder = builder.add_source(
            File::from(project_root.join(".elem.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        builder = builder.add_source(
            File::from(project_root.join("elem.toml"))
                .format(FileFormat::Toml)
                .required(false),
        );

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;
        let settings = settings.normalized()?;
        tracing::debug!(
            "Loaded settings for {}: {} extra helper functions, extensions {:?}",
            project_root.display(),
            settings.functions.len(),
            settings.stylesheet_extensions
        );
        Ok(settings)
    }

    fn normalized(mut self) -> Result<Self, ConfigError> {
        if !is_identifier(&self.class_argument) {
            return Err(ConfigError::Invalid {
                key: "class_argument",
                reason: format!("`{}` is not a PHP identifier", self.class_argument),
            });
        }

        self.stylesheet_extensions = self
            .stylesheet_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_string())
            .filter(|ext| !ext.is_empty())
            .collect();

        if self.stylesheet_extensions.is_empty() {
            return Err(ConfigError::Invalid {
                key: "stylesheet_extensions",
                reason: "at least one extension is required".to_string(),
            });
        }

        Ok(self)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    mod defaults {
        use super::*;

        #[test]
        fn test_load_no_files() {
            let dir = tempdir().unwrap();
            let settings = Settings::load_from_paths(dir.path(), None).unwrap();
            assert_eq!(settings, Settings::default());
            assert_eq!(settings.class_argument, "class");
            assert_eq!(settings.stylesheet_extensions, vec!["css".to_string()]);
        }
    }

    mod project_files {
        use super::*;

        #[test]
        fn test_load_elem_toml_only() {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join("elem.toml"),
                "functions = [\"card\", \"badge\"]\n",
            )
            .unwrap();
            let settings = Settings::load_from_paths(dir.path(), None).unwrap();
            assert_eq!(settings.functions, vec!["card", "badge"]);
        }

        #[test]
        fn test_load_dot_elem_toml_only() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join(".elem.toml"), "debug = true").unwrap();
            let settings = Settings::load_from_paths(dir.path(), None).unwrap();
            assert!(settings.debug);
        }

        #[test]
        fn test_load_composer_extra_only() {
            let dir = tempdir().unwrap();
            let content = r#"{
                "name": "acme/site",
                "extra": { "elem": { "stylesheet_extensions": ["css", ".pcss"] } }
            }"#;
            fs::write(dir.path().join("composer.json"), content).unwrap();
            let settings = Settings::load_from_paths(dir.path(), None).unwrap();
            assert_eq!(settings.stylesheet_extensions, vec!["css", "pcss"]);
        }

        #[test]
        fn test_composer_without_extra_uses_defaults() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("composer.json"), r#"{"name": "acme/site"}"#).unwrap();
            let settings = Settings::load_from_paths(dir.path(), None).unwrap();
            assert_eq!(settings, Settings::default());
        }
    }

    mod priority {
        use super::*;

        #[test]
        fn test_elem_toml_overrides_dot_elem_toml() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join(".elem.toml"), "debug = false").unwrap();
            fs::write(dir.path().join("elem.toml"), "debug = true").unwrap();
            let settings = Settings::load_from_paths(dir.path(), None).unwrap();
            assert!(settings.debug);
        }

        #[test]
        fn test_dot_elem_toml_overrides_composer() {
            let dir = tempdir().unwrap();
            fs::write(
                dir.path().join("composer.json"),
                r#"{"extra": {"elem": {"class_argument": "classes"}}}"#,
            )
            .unwrap();
            fs::write(dir.path().join(".elem.toml"), "class_argument = \"css\"").unwrap();
            let settings = Settings::load_from_paths(dir.path(), None).unwrap();
            assert_eq!(settings.class_argument, "css");
        }

        #[test]
        fn test_project_overrides_user() {
            let user_dir = tempdir().unwrap();
            let project_dir = tempdir().unwrap();
            let user_conf_path = user_dir.path().join("elem.toml");
            fs::write(&user_conf_path, "debug = true").unwrap();
            fs::write(project_dir.path().join("elem.toml"), "debug = false").unwrap();

            let settings =
                Settings::load_from_paths(project_dir.path(), Some(&user_conf_path)).unwrap();
            assert!(!settings.debug);
        }

        #[test]
        fn test_user_config_only() {
            let user_dir = tempdir().unwrap();
            let project_dir = tempdir().unwrap();
            let user_conf_path = user_dir.path().join("elem.toml");
            fs::write(&user_conf_path, "exclude = [\"vendor/**\"]").unwrap();

            let settings =
                Settings::load_from_paths(project_dir.path(), Some(&user_conf_path)).unwrap();
            assert_eq!(settings.exclude, vec!["vendor/**"]);
        }

        #[test]
        fn test_missing_user_config_is_ignored() {
            let user_dir = tempdir().unwrap();
            let project_dir = tempdir().unwrap();
            let user_conf_path = user_dir.path().join("elem.toml");

            let settings =
                Settings::load_from_paths(project_dir.path(), Some(&user_conf_path)).unwrap();
            assert_eq!(settings, Settings::default());
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_invalid_toml_content() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("elem.toml"), "debug = not_a_boolean").unwrap();
            let result = Settings::load_from_paths(dir.path(), None);
            assert!(matches!(result.unwrap_err(), ConfigError::Config(_)));
        }

        #[test]
        fn test_invalid_composer_json() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("composer.json"), "{ not json").unwrap();
            let result = Settings::load_from_paths(dir.path(), None);
            assert!(matches!(result.unwrap_err(), ConfigError::ComposerParse(_)));
        }

        #[test]
        fn test_class_argument_must_be_identifier() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("elem.toml"), "class_argument = \"my-class\"").unwrap();
            let result = Settings::load_from_paths(dir.path(), None);
            assert!(matches!(
                result.unwrap_err(),
                ConfigError::Invalid {
                    key: "class_argument",
                    ..
                }
            ));
        }

        #[test]
        fn test_empty_extension_list_rejected() {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("elem.toml"), "stylesheet_extensions = [\".\"]").unwrap();
            let result = Settings::load_from_paths(dir.path(), None);
            assert!(matches!(
                result.unwrap_err(),
                ConfigError::Invalid {
                    key: "stylesheet_extensions",
                    ..
                }
            ));
        }
    }
}
