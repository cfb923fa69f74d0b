//! In-memory folder tree that is assembled first and written to disk once.

use std::io;
use std::path::Path;

use serde_json::Value;
use tracing::{trace, warn};

use crate::infrastructure::traits::FileSystem;

/// Content of a virtual file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    /// Structured metadata, written as pretty-printed JSON
    Json(Value),
    /// Command lines, written one per line
    Lines(Vec<String>),
}

impl FileContent {
    pub fn render(&self) -> String {
        match self {
            FileContent::Json(value) => {
                // Value serialization cannot fail: keys are always strings
                serde_json::to_string_pretty(value).unwrap_or_default()
            }
            FileContent::Lines(lines) if lines.is_empty() => String::new(),
            FileContent::Lines(lines) => lines.join("\n") + "\n",
        }
    }
}

impl From<Value> for FileContent {
    fn from(value: Value) -> Self {
        FileContent::Json(value)
    }
}

impl From<Vec<String>> for FileContent {
    fn from(lines: Vec<String>) -> Self {
        FileContent::Lines(lines)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VirtualFile {
    pub name: String,
    pub content: FileContent,
}

/// Folder node. Folders and files keep their insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualFolder {
    name: String,
    folders: Vec<VirtualFolder>,
    files: Vec<VirtualFile>,
}

impl VirtualFolder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folders: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creates (or reuses) the nested folder at `path`, segments separated by `/`.
    pub fn new_folder(&mut self, path: &str) -> &mut VirtualFolder {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.child_or_insert(segment);
        }
        current
    }

    /// Creates several sibling folders, returning `self` for chaining.
    pub fn new_folders(&mut self, paths: &[&str]) -> &mut Self {
        for path in paths {
            self.new_folder(path);
        }
        self
    }

    /// Existing folder at `path`.
    pub fn access_folder(&mut self, path: &str) -> Option<&mut VirtualFolder> {
        let mut current = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = current.folders.iter_mut().find(|f| f.name == segment)?;
        }
        Some(current)
    }

    /// Adds a file. An existing file of the same name is replaced.
    pub fn new_file(&mut self, name: impl Into<String>, content: impl Into<FileContent>) -> &mut VirtualFile {
        let name = name.into();
        let content = content.into();
        let pos = match self.files.iter().position(|f| f.name == name) {
            Some(pos) => {
                warn!("replacing virtual file {}/{}", self.name, name);
                self.files[pos].content = content;
                pos
            }
            None => {
                self.files.push(VirtualFile { name, content });
                self.files.len() - 1
            }
        };
        &mut self.files[pos]
    }

    /// Same as [`new_file`](Self::new_file) but returns the folder.
    pub fn chain_new_file(&mut self, name: impl Into<String>, content: impl Into<FileContent>) -> &mut Self {
        self.new_file(name, content);
        self
    }

    /// Number of folders and files below this folder.
    pub fn child_count(&self) -> usize {
        self.files.len()
            + self
                .folders
                .iter()
                .map(|f| 1 + f.child_count())
                .sum::<usize>()
    }

    /// File at a `/` separated path relative to this folder.
    pub fn file(&self, path: &str) -> Option<&VirtualFile> {
        let (dir, name) = match path.rsplit_once('/') {
            Some((dir, name)) => (Some(dir), name),
            None => (None, path),
        };
        let mut current = self;
        if let Some(dir) = dir {
            for segment in dir.split('/').filter(|s| !s.is_empty()) {
                current = current.folders.iter().find(|f| f.name == segment)?;
            }
        }
        current.files.iter().find(|f| f.name == name)
    }

    fn child_or_insert(&mut self, name: &str) -> &mut VirtualFolder {
        let pos = match self.folders.iter().position(|f| f.name == name) {
            Some(pos) => pos,
            None => {
                self.folders.push(VirtualFolder::new(name));
                self.folders.len() - 1
            }
        };
        &mut self.folders[pos]
    }

    /// Writes this folder into `parent`, reporting every written entry to `on_written`.
    pub fn write_to_disk(
        &self,
        fs: &dyn FileSystem,
        parent: &Path,
        on_written: &mut dyn FnMut(usize),
    ) -> io::Result<()> {
        let dir = parent.join(&self.name);
        fs.create_dir_all(&dir)?;
        for file in &self.files {
            let path = dir.join(&file.name);
            trace!("write {}", path.display());
            fs.write(&path, &file.content.render())?;
            on_written(1);
        }
        for folder in &self.folders {
            folder.write_to_disk(fs, &dir, on_written)?;
            on_written(1);
        }
        Ok(())
    }
}
