//! Loading `ProcessOptions` from `options.toml`.
//!
//! The file is a flat table of kebab-case stage switches, for example:
//!
//! ```toml
//! normalize-case = true
//! detect-outliers = true
//! remove-duplicates = false
//! ```
//!
//! Keys that are left out keep their default. Problems never stop a run:
//! they come back as warnings and the defaults are used instead.

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tidycsv_core::ProcessOptions;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

/// Read options from `config_file`, or from the user config dir when no
/// path is given. A missing user config is not a warning; a missing
/// explicit one is.
pub fn load_options(config_file: Option<&Path>) -> (ProcessOptions, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let Some(path) = config_file.map(Path::to_path_buf).or_else(user_config_path) else {
        return (ProcessOptions::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (ProcessOptions::default(), warnings);
    }

    let options = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => match parse_options(&content) {
                Ok(options) => Some(options),
                Err(err) => {
                    warnings.push(format!("Failed to parse {}: {}", path.display(), err));
                    None
                }
            },
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            None
        }
    };

    (options.unwrap_or_default(), warnings)
}

pub fn parse_options(content: &str) -> Result<ProcessOptions, toml::de::Error> {
    toml::from_str(content)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "tidycsv")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("options.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidycsv_core::Stage;

    fn temp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "tidycsv_config_{}_{}_{}.toml",
            tag,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
        ))
    }

    struct Cleanup(PathBuf);
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_parse_options_partial() {
        let options = parse_options("normalize-case = true\nremove-duplicates = false\n").unwrap();
        assert!(options.is_enabled(Stage::NormalizeCase));
        assert!(!options.is_enabled(Stage::RemoveDuplicates));
        assert!(options.is_enabled(Stage::Trim));
        assert!(!options.recompute_types);
    }

    #[test]
    fn test_parse_options_rejects_unknown_keys() {
        assert!(parse_options("shuffle = true\n").is_err());
        assert!(parse_options("trim = \"yes\"\n").is_err());
    }

    #[test]
    fn test_load_options_from_file() {
        let path = temp_path("ok");
        let _cleanup = Cleanup(path.clone());
        std::fs::write(&path, "detect-outliers = true\nrecompute-types = true\n").unwrap();

        let (options, warnings) = load_options(Some(&path));
        assert!(warnings.is_empty());
        assert!(options.is_enabled(Stage::DetectOutliers));
        assert!(options.recompute_types);
    }

    #[test]
    fn test_load_options_bad_file_warns() {
        let path = temp_path("bad");
        let _cleanup = Cleanup(path.clone());
        std::fs::write(&path, "not toml [[[").unwrap();

        let (options, warnings) = load_options(Some(&path));
        assert_eq!(options, ProcessOptions::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].starts_with("Failed to parse"));
    }

    #[test]
    fn test_load_options_missing_explicit_file_warns() {
        let path = temp_path("missing");
        let (options, warnings) = load_options(Some(&path));
        assert_eq!(options, ProcessOptions::default());
        assert!(warnings[0].starts_with("Config file not found"));
    }
}
