//! # Template Persistence
//!
//! A saved template is the block sequence (absent for freeform templates)
//! plus the compiled HTML. [`FileTemplateStore`] keeps them side by side
//! as `<name>.json` and `<name>.html`.

use maildraft_blocks::Block;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Invalid template name: {0:?}")]
    InvalidName(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTemplate {
    pub name: String,

    /// `None` once the template was detached into freeform markup
    #[serde(default)]
    pub blocks: Option<Vec<Block>>,

    pub html: String,
}

impl SavedTemplate {
    pub fn is_freeform(&self) -> bool {
        self.blocks.is_none()
    }
}

pub trait TemplateStore {
    fn save(&mut self, template: &SavedTemplate) -> Result<(), StoreError>;

    fn load(&self, name: &str) -> Result<SavedTemplate, StoreError>;

    /// Template names in sorted order
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    templates: BTreeMap<String, SavedTemplate>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&SavedTemplate> {
        self.templates.get(name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn save(&mut self, template: &SavedTemplate) -> Result<(), StoreError> {
        self.templates.insert(template.name.clone(), template.clone());
        Ok(())
    }

    fn load(&self, name: &str) -> Result<SavedTemplate, StoreError> {
        self.templates
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.templates.keys().cloned().collect())
    }
}

/// Block half of a template on disk
#[derive(Serialize, Deserialize)]
struct TemplateRecord {
    name: String,
    #[serde(default)]
    blocks: Option<Vec<Block>>,
}

/// Directory of `<name>.json` + `<name>.html` pairs
#[derive(Debug, Clone)]
pub struct FileTemplateStore {
    root: PathBuf,
}

impl FileTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn json_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(format!("{}.json", check_name(name)?)))
    }

    pub fn html_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        Ok(self.root.join(format!("{}.html", check_name(name)?)))
    }
}

impl TemplateStore for FileTemplateStore {
    fn save(&mut self, template: &SavedTemplate) -> Result<(), StoreError> {
        let json_path = self.json_path(&template.name)?;
        let html_path = self.html_path(&template.name)?;
        fs::create_dir_all(&self.root)?;

        let record = TemplateRecord {
            name: template.name.clone(),
            blocks: template.blocks.clone(),
        };
        let json = serde_json::to_string_pretty(&record)?;

        // Both halves are staged before either replaces the stored pair,
        // and the `.json` record goes last since `load` keys off it
        let html_tmp = self.root.join(format!(".{}.html.tmp", template.name));
        let json_tmp = self.root.join(format!(".{}.json.tmp", template.name));
        let result = fs::write(&html_tmp, &template.html)
            .and_then(|_| fs::write(&json_tmp, &json))
            .and_then(|_| fs::rename(&html_tmp, &html_path))
            .and_then(|_| fs::rename(&json_tmp, &json_path));

        if let Err(e) = result {
            let _ = fs::remove_file(&html_tmp);
            let _ = fs::remove_file(&json_tmp);
            return Err(e.into());
        }

        info!(path = %json_path.display(), "Saved template");
        Ok(())
    }

    fn load(&self, name: &str) -> Result<SavedTemplate, StoreError> {
        let json_path = self.json_path(name)?;
        let source = match fs::read_to_string(&json_path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let record: TemplateRecord = serde_json::from_str(&source)?;

        // A template saved without markup yet still loads
        let html = match fs::read_to_string(self.html_path(name)?) {
            Ok(html) => html,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };

        debug!(name, freeform = record.blocks.is_none(), "Loaded template");
        Ok(SavedTemplate {
            name: record.name,
            blocks: record.blocks,
            html,
        })
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Template names become file names; keep them to one path component
fn check_name(name: &str) -> Result<&str, StoreError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(name)
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maildraft_blocks::{create_block, BlockType};

    fn template(name: &str) -> SavedTemplate {
        SavedTemplate {
            name: name.to_string(),
            blocks: Some(vec![create_block("h", BlockType::Header)]),
            html: "<!DOCTYPE html>".to_string(),
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryTemplateStore::new();
        store.save(&template("weekly")).unwrap();

        assert_eq!(store.load("weekly").unwrap(), template("weekly"));
        assert!(matches!(store.load("monthly"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_file_store_writes_pair() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileTemplateStore::new(dir.path().join("templates"));

        store.save(&template("weekly")).unwrap();

        assert!(dir.path().join("templates/weekly.json").exists());
        assert!(dir.path().join("templates/weekly.html").exists());
        assert_eq!(store.load("weekly").unwrap(), template("weekly"));
        assert_eq!(store.list().unwrap(), vec!["weekly".to_string()]);
    }

    #[test]
    fn test_file_store_freeform_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileTemplateStore::new(dir.path());

        let freeform = SavedTemplate {
            name: "promo".to_string(),
            blocks: None,
            html: "<p>hand written</p>".to_string(),
        };
        store.save(&freeform).unwrap();

        let json = fs::read_to_string(dir.path().join("promo.json")).unwrap();
        assert!(json.contains("\"blocks\": null"));
        assert!(store.load("promo").unwrap().is_freeform());
    }

    #[test]
    fn test_save_leaves_no_staging_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileTemplateStore::new(dir.path());

        store.save(&template("weekly")).unwrap();
        store.save(&template("weekly")).unwrap();

        let mut files: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        files.sort();
        assert_eq!(files, vec!["weekly.html".to_string(), "weekly.json".to_string()]);
    }

    #[test]
    fn test_failed_html_write_keeps_previous_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileTemplateStore::new(dir.path());

        let previous = SavedTemplate {
            name: "weekly".to_string(),
            blocks: None,
            html: "<p>previous</p>".to_string(),
        };
        store.save(&previous).unwrap();

        // A directory in place of the markup file makes its rename fail
        fs::remove_file(dir.path().join("weekly.html")).unwrap();
        fs::create_dir(dir.path().join("weekly.html")).unwrap();

        assert!(matches!(store.save(&template("weekly")), Err(StoreError::Io(_))));

        let json = fs::read_to_string(dir.path().join("weekly.json")).unwrap();
        assert!(json.contains("\"blocks\": null"));
        assert!(!dir.path().join(".weekly.json.tmp").exists());
        assert!(!dir.path().join(".weekly.html.tmp").exists());
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileTemplateStore::new(dir.path());

        for name in ["../escape", "a/b", "", ".hidden"] {
            let mut bad = template("ok");
            bad.name = name.to_string();
            assert!(matches!(store.save(&bad), Err(StoreError::InvalidName(_))));
        }
    }

    #[test]
    fn test_missing_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTemplateStore::new(dir.path().join("nope"));
        assert!(store.list().unwrap().is_empty());
    }
}
