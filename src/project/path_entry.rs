//! File tree nodes shared by the project and MPQ browsers

use crate::archive::{ArchiveError, Mpq};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where a path entry's bytes live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathEntrySource {
    Project,
    Mpq,
}

#[derive(Debug, Clone)]
pub struct PathEntry {
    pub name: String,
    /// Absolute filesystem path for project files, archive-internal
    /// `\`-separated path for MPQ files
    pub full_path: String,
    pub is_directory: bool,
    pub is_root: bool,
    pub source: PathEntrySource,
    pub mpq_file: Option<PathBuf>,
    pub children: Vec<PathEntry>,
    sorted: bool,
}

impl PathEntry {
    /// A single file on disk inside a project
    pub fn project_file(path: &Path) -> Self {
        Self {
            name: file_name_of(path),
            full_path: path.to_string_lossy().into_owned(),
            is_directory: false,
            is_root: false,
            source: PathEntrySource::Project,
            mpq_file: None,
            children: Vec::new(),
            sorted: true,
        }
    }

    /// A file inside an archive
    pub fn mpq_file(mpq_path: &Path, internal_path: &str) -> Self {
        let name = internal_path.rsplit('\\').next().unwrap_or(internal_path).to_string();
        Self {
            name,
            full_path: internal_path.to_string(),
            is_directory: false,
            is_root: false,
            source: PathEntrySource::Mpq,
            mpq_file: Some(mpq_path.to_path_buf()),
            children: Vec::new(),
            sorted: true,
        }
    }

    /// Walk a directory on disk into a tree. Unreadable subdirectories are
    /// logged and left empty.
    pub fn from_directory(dir: &Path, name: &str, is_root: bool) -> io::Result<Self> {
        let mut children = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                match Self::from_directory(&path, &file_name_of(&path), false) {
                    Ok(child) => children.push(child),
                    Err(e) => log::warn!("Skipping unreadable directory {}: {}", path.display(), e),
                }
            } else {
                children.push(Self::project_file(&path));
            }
        }

        Ok(Self {
            name: name.to_string(),
            full_path: dir.to_string_lossy().into_owned(),
            is_directory: true,
            is_root,
            source: PathEntrySource::Project,
            mpq_file: None,
            children,
            sorted: false,
        })
    }

    /// Build the tree for an archive from its listfile names
    pub fn from_mpq_listing(mpq_path: &Path, names: &[String]) -> Self {
        let mut root = Self {
            name: file_name_of(mpq_path),
            full_path: String::new(),
            is_directory: true,
            is_root: true,
            source: PathEntrySource::Mpq,
            mpq_file: Some(mpq_path.to_path_buf()),
            children: Vec::new(),
            sorted: false,
        };

        for name in names {
            let parts: Vec<&str> = name.split(['\\', '/']).filter(|p| !p.is_empty()).collect();
            root.insert_mpq_path(mpq_path, &parts, String::new());
        }

        root
    }

    fn insert_mpq_path(&mut self, mpq_path: &Path, parts: &[&str], prefix: String) {
        let Some((first, rest)) = parts.split_first() else {
            return;
        };
        let full_path = if prefix.is_empty() {
            first.to_string()
        } else {
            format!("{prefix}\\{first}")
        };

        if rest.is_empty() {
            if !self.children.iter().any(|c| c.full_path.eq_ignore_ascii_case(&full_path)) {
                self.children.push(Self::mpq_file(mpq_path, &full_path));
            }
            return;
        }

        let index = match self
            .children
            .iter()
            .position(|c| c.is_directory && c.name.eq_ignore_ascii_case(first))
        {
            Some(index) => index,
            None => {
                self.children.push(Self {
                    name: first.to_string(),
                    full_path: full_path.clone(),
                    is_directory: true,
                    is_root: false,
                    source: PathEntrySource::Mpq,
                    mpq_file: Some(mpq_path.to_path_buf()),
                    children: Vec::new(),
                    sorted: false,
                });
                self.children.len() - 1
            }
        };
        self.children[index].insert_mpq_path(mpq_path, rest, full_path);
    }

    /// Identity used for editor deduplication and texture ownership
    pub fn unique_id(&self) -> String {
        match self.source {
            PathEntrySource::Project => format!("project:{}", self.full_path),
            PathEntrySource::Mpq => format!(
                "mpq:{}|{}",
                self.mpq_file.as_deref().map(|p| p.display().to_string()).unwrap_or_default(),
                self.full_path
            ),
        }
    }

    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .filter(|(stem, _)| !stem.is_empty())
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Children in browser order, sorting on first access
    pub fn sorted_children_mut(&mut self) -> &mut [PathEntry] {
        if !self.sorted {
            sort_entries(&mut self.children);
            self.sorted = true;
        }
        &mut self.children
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>, ArchiveError> {
        match self.source {
            PathEntrySource::Project => Ok(fs::read(&self.full_path)?),
            PathEntrySource::Mpq => {
                let archive = self
                    .mpq_file
                    .as_deref()
                    .ok_or_else(|| ArchiveError::FileNotFound(self.full_path.clone()))?;
                Mpq::open(archive)?.read_file(&self.full_path)
            }
        }
    }

    pub fn is_writable(&self) -> bool {
        self.source == PathEntrySource::Project
    }

    pub fn write_bytes(&self, data: &[u8]) -> io::Result<()> {
        match self.source {
            PathEntrySource::Project => fs::write(&self.full_path, data),
            PathEntrySource::Mpq => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "cannot save into an MPQ archive",
            )),
        }
    }
}

/// Entries with children first, then case-insensitive by name
pub fn sort_entries(entries: &mut [PathEntry]) {
    entries.sort_by(|a, b| {
        a.children
            .is_empty()
            .cmp(&b.children.is_empty())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sort_puts_populated_entries_first() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::write(dir.path().join("zeta").join("x.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("Empty")).unwrap();
        fs::write(dir.path().join("beta.txt"), "b").unwrap();
        fs::write(dir.path().join("Alpha.txt"), "a").unwrap();

        let mut root = PathEntry::from_directory(dir.path(), "content", true).unwrap();
        let names: Vec<&str> = root.sorted_children_mut().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "Alpha.txt", "beta.txt", "Empty"]);
    }

    #[test]
    fn test_mpq_listing_builds_nested_tree() {
        let names = vec![
            "data\\global\\ui\\cursor.dc6".to_string(),
            "data\\global\\palette\\act1\\pal.dat".to_string(),
            "DATA\\global\\ui\\font.tbl".to_string(),
            "readme.txt".to_string(),
        ];
        let mpq = Path::new("/games/d2data.mpq");
        let mut root = PathEntry::from_mpq_listing(mpq, &names);

        assert!(root.is_root);
        assert_eq!(root.name, "d2data.mpq");
        let children = root.sorted_children_mut();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "data");

        let global = &children[0].children[0];
        let ui = global.children.iter().find(|c| c.name == "ui").unwrap();
        assert_eq!(ui.children.len(), 2);
        let cursor = ui.children.iter().find(|c| c.name == "cursor.dc6").unwrap();
        assert_eq!(cursor.full_path, "data\\global\\ui\\cursor.dc6");
        assert_eq!(cursor.source, PathEntrySource::Mpq);
    }

    #[test]
    fn test_unique_id_distinguishes_sources() {
        let mpq = PathEntry::mpq_file(Path::new("/a/d2data.mpq"), "data\\x.txt");
        let other = PathEntry::mpq_file(Path::new("/a/d2exp.mpq"), "data\\x.txt");
        let disk = PathEntry::project_file(Path::new("/p/content/x.txt"));
        assert_ne!(mpq.unique_id(), other.unique_id());
        assert_ne!(mpq.unique_id(), disk.unique_id());
        assert_eq!(mpq.name, "x.txt");
    }

    #[test]
    fn test_extension() {
        assert_eq!(PathEntry::project_file(Path::new("/p/Font.TBL")).extension().as_deref(), Some("tbl"));
        assert_eq!(PathEntry::project_file(Path::new("/p/.hidden")).extension(), None);
        assert_eq!(PathEntry::project_file(Path::new("/p/noext")).extension(), None);
    }

    #[test]
    fn test_mpq_entries_are_not_writable() {
        let entry = PathEntry::mpq_file(Path::new("/a/d2data.mpq"), "data\\x.txt");
        assert!(!entry.is_writable());
        assert_eq!(
            entry.write_bytes(b"x").unwrap_err().kind(),
            io::ErrorKind::PermissionDenied
        );
    }
}
