// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Storage listing behind split generation

use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub size: u64,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Last path component
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Lists the data files under a partition location
///
/// Implementations are shared across enumeration threads.
pub trait FileLister: Send + Sync {
    fn list(&self, location: &str, recursive: bool) -> io::Result<Vec<FileEntry>>;
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('_')
}

/// Lists the local filesystem; accepts plain paths and `file:` URIs
pub struct LocalFileLister;

impl LocalFileLister {
    fn local_path(location: &str) -> &str {
        location
            .strip_prefix("file://")
            .or_else(|| location.strip_prefix("file:"))
            .unwrap_or(location)
    }

    fn walk(dir: &Path, recursive: bool, out: &mut Vec<FileEntry>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();
            if file_type.is_dir() {
                let hidden = entry.file_name().to_str().map_or(true, is_hidden);
                if recursive && !hidden {
                    Self::walk(&path, recursive, out)?;
                }
            } else if file_type.is_file() {
                let size = entry.metadata()?.len();
                out.push(FileEntry::new(path.to_string_lossy().into_owned(), size));
            }
        }
        Ok(())
    }
}

impl FileLister for LocalFileLister {
    fn list(&self, location: &str, recursive: bool) -> io::Result<Vec<FileEntry>> {
        let mut files = Vec::new();
        Self::walk(Path::new(Self::local_path(location)), recursive, &mut files)?;
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

/// Fixed listing per location, for tests and dry runs
#[derive(Default)]
pub struct StaticFileLister {
    files: HashMap<String, Vec<FileEntry>>,
    failures: HashMap<String, io::ErrorKind>,

    /// Locations listed so far, in call order
    listed: Mutex<Vec<String>>,
}

impl StaticFileLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(mut self, location: &str, files: Vec<FileEntry>) -> Self {
        self.files.insert(location.to_string(), files);
        self
    }

    /// Make every listing of `location` fail with `kind`
    pub fn with_failure(mut self, location: &str, kind: io::ErrorKind) -> Self {
        self.failures.insert(location.to_string(), kind);
        self
    }

    pub fn listed(&self) -> Vec<String> {
        self.listed.lock().clone()
    }
}

impl FileLister for StaticFileLister {
    fn list(&self, location: &str, _recursive: bool) -> io::Result<Vec<FileEntry>> {
        self.listed.lock().push(location.to_string());
        if let Some(kind) = self.failures.get(location) {
            return Err(io::Error::new(*kind, format!("cannot list {}", location)));
        }
        self.files.get(location).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", location))
        })
    }
}
