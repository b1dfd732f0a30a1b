//! Flat per-run record of the modules that were gathered.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Module names in processing order, their source files, and their page links.
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    module_names: Vec<String>,
    module_parts: Vec<Vec<String>>,
    module_files: Vec<PathBuf>,
    module_name_to_link: IndexMap<String, String>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a gathered module. A repeated name replaces the earlier link.
    pub fn register(&mut self, name: &str, file: &Path, link: String) {
        self.module_names.push(name.to_string());
        self.module_parts
            .push(name.split('.').map(str::to_string).collect());
        self.module_files.push(file.to_path_buf());
        self.module_name_to_link.insert(name.to_string(), link);
    }

    pub fn module_names(&self) -> &[String] {
        &self.module_names
    }

    pub fn module_files(&self) -> &[PathBuf] {
        &self.module_files
    }

    pub fn module_name_to_link(&self) -> &IndexMap<String, String> {
        &self.module_name_to_link
    }

    pub fn link(&self, module: &str) -> Option<&str> {
        self.module_name_to_link.get(module).map(String::as_str)
    }

    /// Module names split into their dotted components, in processing order.
    pub fn module_parts(&self) -> impl Iterator<Item = &[String]> {
        self.module_parts.iter().map(Vec::as_slice)
    }

    /// Module names sorted alphabetically, as listings present them.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.module_names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
