//! HellSpawner projects
//!
//! A project is a `.hsp` RON file sitting next to a `content/` directory.
//! It also names the auxiliary MPQs (relative to the configured auxiliary
//! MPQ directory) whose contents the MPQ explorer exposes.

mod path_entry;

pub use path_entry::{PathEntry, PathEntrySource};

use crate::archive::Mpq;
use crate::config::Config;
use ron::ser::PrettyConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROJECT_EXTENSION: &str = "hsp";
const CONTENT_DIR: &str = "content";

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse project file: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("could not serialize project: {0}")]
    Serialize(#[from] ron::Error),
}

/// The user-editable fields shown in the project properties dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectProperties {
    pub project_name: String,
    pub description: String,
    pub author: String,
    pub auxiliary_mpqs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub auxiliary_mpqs: Vec<String>,

    #[serde(skip)]
    file_path: PathBuf,
    #[serde(skip)]
    file_structure: Option<PathEntry>,
    #[serde(skip)]
    mpqs: Vec<Mpq>,
}

impl Project {
    /// Create `<dir>/<name>.hsp` and `<dir>/content/`
    pub fn create(dir: &Path, name: &str) -> Result<Self, ProjectError> {
        fs::create_dir_all(dir.join(CONTENT_DIR))?;
        let project = Self {
            project_name: name.to_string(),
            description: String::new(),
            author: String::new(),
            auxiliary_mpqs: Vec::new(),
            file_path: dir.join(format!("{name}.{PROJECT_EXTENSION}")),
            file_structure: None,
            mpqs: Vec::new(),
        };
        project.save()?;
        log::info!("Created project {}", project.file_path.display());
        Ok(project)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ProjectError> {
        let contents = fs::read_to_string(path)?;
        let mut project: Project = ron::from_str(&contents)?;
        project.file_path = path.to_path_buf();
        Ok(project)
    }

    pub fn save(&self) -> Result<(), ProjectError> {
        let contents = ron::ser::to_string_pretty(self, PrettyConfig::new())?;
        fs::write(&self.file_path, contents)?;
        Ok(())
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn project_dir(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new("."))
    }

    pub fn content_path(&self) -> PathBuf {
        self.project_dir().join(CONTENT_DIR)
    }

    /// Tree of the content directory, built on first access
    pub fn file_structure(&mut self) -> Option<&mut PathEntry> {
        if self.file_structure.is_none() {
            let content = self.content_path();
            if let Err(e) = fs::create_dir_all(&content) {
                log::warn!("Could not create {}: {}", content.display(), e);
                return None;
            }
            match PathEntry::from_directory(&content, &self.project_name, true) {
                Ok(tree) => self.file_structure = Some(tree),
                Err(e) => {
                    log::warn!("Could not read project content {}: {}", content.display(), e);
                    return None;
                }
            }
        }
        self.file_structure.as_mut()
    }

    /// Drop the cached tree so the next access rescans the disk
    pub fn invalidate_file_structure(&mut self) {
        self.file_structure = None;
    }

    pub fn auxiliary_mpq_paths(&self, config: &Config) -> Vec<PathBuf> {
        self.auxiliary_mpqs
            .iter()
            .map(|relative| config.auxiliary_mpq_path.join(relative))
            .collect()
    }

    /// True when every configured auxiliary MPQ exists on disk
    pub fn validate_auxiliary_mpqs(&self, config: &Config) -> bool {
        self.auxiliary_mpq_paths(config).iter().all(|path| {
            let found = path.is_file();
            if !found {
                log::warn!("Auxiliary MPQ not found: {}", path.display());
            }
            found
        })
    }

    /// Reopen the auxiliary archives. Archives that fail to open are logged
    /// and skipped.
    pub fn reload_auxiliary_mpqs(&mut self, config: &Config) {
        self.mpqs = self
            .auxiliary_mpq_paths(config)
            .into_iter()
            .filter_map(|path| match Mpq::open(&path) {
                Ok(mpq) => Some(mpq),
                Err(e) => {
                    log::error!("Could not open MPQ {}: {}", path.display(), e);
                    None
                }
            })
            .collect();
    }

    pub fn auxiliary_mpqs(&self) -> &[Mpq] {
        &self.mpqs
    }

    pub fn properties(&self) -> ProjectProperties {
        ProjectProperties {
            project_name: self.project_name.clone(),
            description: self.description.clone(),
            author: self.author.clone(),
            auxiliary_mpqs: self.auxiliary_mpqs.clone(),
        }
    }

    pub fn apply_properties(&mut self, properties: ProjectProperties) {
        if properties.project_name != self.project_name {
            self.invalidate_file_structure();
        }
        self.project_name = properties.project_name;
        self.description = properties.description;
        self.author = properties.author;
        self.auxiliary_mpqs = properties.auxiliary_mpqs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::{write_mpq, Storage};
    use tempfile::TempDir;

    fn config_with_mpq_dir(dir: &Path) -> Config {
        let mut config = Config::default();
        config.auxiliary_mpq_path = dir.to_path_buf();
        config
    }

    #[test]
    fn test_create_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::create(dir.path(), "Mod").unwrap();
        assert!(dir.path().join("content").is_dir());
        assert_eq!(project.file_path(), dir.path().join("Mod.hsp"));

        project.apply_properties(ProjectProperties {
            project_name: "My Mod".into(),
            description: "desc".into(),
            author: "me".into(),
            auxiliary_mpqs: vec!["d2data.mpq".into()],
        });
        project.save().unwrap();

        let loaded = Project::load_from_file(&dir.path().join("Mod.hsp")).unwrap();
        assert_eq!(loaded.properties(), project.properties());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.hsp");
        fs::write(&path, "not ron at all {").unwrap();
        assert!(matches!(Project::load_from_file(&path), Err(ProjectError::Parse(_))));
    }

    #[test]
    fn test_file_structure_is_cached_until_invalidated() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::create(dir.path(), "Mod").unwrap();
        assert!(project.file_structure().unwrap().children.is_empty());

        fs::write(project.content_path().join("a.txt"), "a").unwrap();
        assert!(project.file_structure().unwrap().children.is_empty());

        project.invalidate_file_structure();
        let tree = project.file_structure().unwrap();
        assert_eq!(tree.name, "Mod");
        assert!(tree.is_root);
        assert_eq!(tree.children.len(), 1);
    }

    #[test]
    fn test_auxiliary_mpq_validation() {
        let mpq_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        write_mpq(&mpq_dir.path().join("d2data.mpq"), &[("a.txt", &b"a"[..], Storage::Stored)]);
        let config = config_with_mpq_dir(mpq_dir.path());

        let mut project = Project::create(project_dir.path(), "Mod").unwrap();
        project.auxiliary_mpqs = vec!["d2data.mpq".into()];
        assert!(project.validate_auxiliary_mpqs(&config));
        project.reload_auxiliary_mpqs(&config);
        assert_eq!(project.auxiliary_mpqs().len(), 1);

        project.auxiliary_mpqs.push("missing.mpq".into());
        assert!(!project.validate_auxiliary_mpqs(&config));
    }
}
