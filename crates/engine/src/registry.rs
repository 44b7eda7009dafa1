//! Language profile registry.
//!
//! Profiles are supplied configuration: the registry starts from the built-in
//! set and can be extended from a JSON file. Every profile is handed out as an
//! `Arc` so all units of one language share the same read-only table.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use hashbrown::HashMap;
use polyloc_core::LanguageProfile;
use polyloc_core::language::builtin;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    by_name: HashMap<String, Arc<LanguageProfile>>,
    by_ext: HashMap<String, String>,
}

impl ProfileRegistry {
    /// Empty registry, no profiles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in profiles.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for profile in builtin::all() {
            registry.insert(profile);
        }
        registry
    }

    /// Register a profile, replacing any profile with the same name.
    pub fn insert(&mut self, profile: LanguageProfile) {
        let name = profile.name.to_lowercase();
        for ext in &profile.extensions {
            self.by_ext.insert(ext.to_lowercase(), name.clone());
        }
        self.by_name.insert(name, Arc::new(profile));
    }

    /// Load additional profiles from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, is not a valid profile
    /// list, or holds a profile with empty comment or region delimiters. On
    /// error no profile from the file is registered.
    pub fn load_json(&mut self, path: &Path) -> Result<usize> {
        let file = File::open(path).map_err(|e| EngineError::SourceOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        let profiles: Vec<LanguageProfile> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| EngineError::ProfileLoad {
                path: path.to_path_buf(),
                source: e,
            })?;

        if let Some((profile, reason)) = profiles
            .iter()
            .find_map(|p| p.validate().err().map(|reason| (p, reason)))
        {
            return Err(EngineError::InvalidProfile {
                path: path.to_path_buf(),
                name: profile.name.clone(),
                reason,
            });
        }

        let loaded = profiles.len();
        for profile in profiles {
            log::debug!("loaded profile '{}' from {}", profile.name, path.display());
            self.insert(profile);
        }
        Ok(loaded)
    }

    /// Route an extension to a registered language (`--map-ext`).
    ///
    /// # Errors
    ///
    /// Returns `UnknownLanguage` if no profile is registered under `language`.
    pub fn map_extension(&mut self, ext: &str, language: &str) -> Result<()> {
        let language = language.to_lowercase();
        if !self.by_name.contains_key(&language) {
            return Err(EngineError::UnknownLanguage(language));
        }
        self.by_ext.insert(ext.trim_start_matches('.').to_lowercase(), language);
        Ok(())
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Arc<LanguageProfile>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    #[must_use]
    pub fn by_extension(&self, ext: &str) -> Option<Arc<LanguageProfile>> {
        self.by_ext
            .get(&ext.to_lowercase())
            .and_then(|name| self.by_name(name))
    }

    /// Resolve the profile for a file path by its extension.
    #[must_use]
    pub fn for_path(&self, path: &Path) -> Option<Arc<LanguageProfile>> {
        let ext = path.extension().and_then(|s| s.to_str())?;
        self.by_extension(ext)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.by_name.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_resolves_extensions() {
        let registry = ProfileRegistry::builtin();
        assert_eq!(
            registry.for_path(&PathBuf::from("index.HTML")).map(|p| p.name.clone()),
            Some("html".to_string())
        );
        assert!(registry.for_path(&PathBuf::from("main.unknown")).is_none());
        assert!(registry.for_path(&PathBuf::from("Makefile")).is_none());
    }

    #[test]
    fn test_map_extension() {
        let mut registry = ProfileRegistry::builtin();
        registry.map_extension(".vue", "html").unwrap();
        assert_eq!(registry.by_extension("vue").unwrap().name, "html");
        assert!(matches!(
            registry.map_extension("x", "cobol"),
            Err(EngineError::UnknownLanguage(_))
        ));
    }

    #[test]
    fn test_load_json_profiles() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "ini", "extensions": ["ini"], "comments": {{"line": [";"]}}}}]"#
        )
        .unwrap();

        let mut registry = ProfileRegistry::builtin();
        assert_eq!(registry.load_json(file.path()).unwrap(), 1);
        let ini = registry.by_extension("ini").unwrap();
        assert_eq!(ini.comments.line, vec![";".to_string()]);
        assert!(ini.case_sensitive);
    }

    #[test]
    fn test_load_json_rejects_empty_delimiters() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"name": "odd", "extensions": ["odd"], "comments": {{"block": [{{"open": "", "close": ""}}], "nested": true}}}}]"#
        )
        .unwrap();

        let mut registry = ProfileRegistry::builtin();
        assert!(matches!(
            registry.load_json(file.path()),
            Err(EngineError::InvalidProfile { ref name, .. }) if name == "odd"
        ));
        assert!(registry.by_extension("odd").is_none());
    }

    #[test]
    fn test_load_json_rejects_garbage() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let mut registry = ProfileRegistry::new();
        assert!(matches!(
            registry.load_json(file.path()),
            Err(EngineError::ProfileLoad { .. })
        ));
    }
}
