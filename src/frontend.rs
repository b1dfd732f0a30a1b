//! Loading front-end output from disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ast::{self, ModuleDecl};
use crate::error::{DocError, Result};

/// File extensions recognized as front-end output.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["json"];

/// One front-end output file and the modules it describes.
#[derive(Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub modules: Vec<ModuleDecl>,
}

/// Read and parse a single front-end output file.
///
/// Files over `max_bytes` are rejected before being read.
pub fn load(path: &Path, max_bytes: u64) -> Result<SourceFile> {
    let io_err = |source| DocError::Io {
        path: path.to_path_buf(),
        source,
    };

    let size = fs::metadata(path).map_err(io_err)?.len();
    if size > max_bytes {
        return Err(DocError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: max_bytes,
        });
    }

    let text = fs::read_to_string(path).map_err(io_err)?;
    let modules = ast::parse_modules(&text).map_err(|source| DocError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), modules = modules.len(), "loaded front-end output");

    Ok(SourceFile {
        path: path.to_path_buf(),
        modules,
    })
}
