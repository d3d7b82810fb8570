//! Build-time specialization of component codecs and action routing.
//!
//! `scan` reads Rust source into [`model`] descriptors, `emit` renders them,
//! and [`Generator`] drives both over a tree, writing `<stem>_hx.rs` next to
//! each source file that declares components. Components pull the output in
//! with `include!("<stem>_hx.rs");`.

pub mod emit;
pub mod model;
pub mod scan;

pub use emit::GENERATED_HEADER;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

pub const GENERATED_SUFFIX: &str = "_hx.rs";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{file}: parse error: {message}")]
    Parse { file: String, message: String },
    #[error("component `{component}` does not declare `type Props`")]
    MissingProps { component: String },
    #[error("component `{component}`: props struct `{props}` is not defined in {file}")]
    PropsNotFound {
        component: String,
        props: String,
        file: String,
    },
    #[error("component `{component}`: {reason}")]
    UnsupportedAction { component: String, reason: String },
    #[error("component `{component}`: action `{action}` registered twice")]
    DuplicateAction { component: String, action: String },
    #[error("component `{component}`: handler `{handler}` is not an inherent method")]
    HandlerNotFound { component: String, handler: String },
    #[error("component `{component}`: handler `{handler}`: {reason}")]
    UnsupportedHandler {
        component: String,
        handler: String,
        reason: String,
    },
    #[error("props `{props}`, field `{field}`: {message}")]
    Attribute {
        props: String,
        field: String,
        message: String,
    },
    #[error("props `{props}`: {reason}")]
    UnsupportedProps { props: String, reason: String },
    #[error("props `{props}`, field `{field}`: unsupported type `{ty}` (mark it #[serde(skip)])")]
    UnsupportedField {
        props: String,
        field: String,
        ty: String,
    },
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl GenerateError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// One rendered companion file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub content: String,
    /// False when `output` already holds exactly `content`.
    pub changed: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub scanned: usize,
    pub written: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Generator {
    dry_run: bool,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Generates companions for every component source under `paths`.
    /// The first failing unit aborts the run.
    pub fn generate(&self, paths: &[PathBuf]) -> Result<Summary, GenerateError> {
        let mut summary = Summary::default();
        for source in discover(paths)? {
            summary.scanned += 1;
            let Some(file) = generate_file(&source)? else {
                continue;
            };
            if !file.changed {
                debug!(output = %file.output.display(), "generated file up to date");
                summary.unchanged.push(file.output);
                continue;
            }
            if !self.dry_run {
                fs::write(&file.output, &file.content)
                    .map_err(|e| GenerateError::io(&file.output, e))?;
                info!(output = %file.output.display(), "generated");
            }
            summary.written.push(file.output);
        }
        Ok(summary)
    }

    /// Removes generated companions under `paths`. Files not carrying the
    /// generated header are left alone even if their name matches.
    pub fn clean(&self, paths: &[PathBuf]) -> Result<Summary, GenerateError> {
        let mut summary = Summary::default();
        for path in walk(paths)? {
            if !is_generated_name(&path) {
                continue;
            }
            summary.scanned += 1;
            let content = fs::read_to_string(&path).map_err(|e| GenerateError::io(&path, e))?;
            if !content.starts_with(GENERATED_HEADER) {
                debug!(path = %path.display(), "skipping hand-written file");
                continue;
            }
            if !self.dry_run {
                fs::remove_file(&path).map_err(|e| GenerateError::io(&path, e))?;
                info!(path = %path.display(), "removed");
            }
            summary.removed.push(path);
        }
        Ok(summary)
    }
}

/// `src/counter.rs` -> `src/counter_hx.rs`.
pub fn output_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    source.with_file_name(format!("{stem}{GENERATED_SUFFIX}"))
}

fn is_generated_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(GENERATED_SUFFIX))
}

fn is_ignored_dir(name: &str) -> bool {
    name == "target" || name.starts_with('.')
}

fn walk(paths: &[PathBuf]) -> Result<Vec<PathBuf>, GenerateError> {
    let mut files = Vec::new();
    for root in paths {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        let entries = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !is_ignored_dir(&entry.file_name().to_string_lossy())
            });
        for entry in entries {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Rust sources under `paths`, sorted, excluding generated companions,
/// `target/` and hidden directories.
pub fn discover(paths: &[PathBuf]) -> Result<Vec<PathBuf>, GenerateError> {
    Ok(walk(paths)?
        .into_iter()
        .filter(|p| p.extension().is_some_and(|ext| ext == "rs"))
        .filter(|p| !is_generated_name(p))
        .collect())
}

/// Scans and renders one source file. `None` when it declares no components.
pub fn generate_file(source: &Path) -> Result<Option<GeneratedFile>, GenerateError> {
    let text = fs::read_to_string(source).map_err(|e| GenerateError::io(source, e))?;
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let components = scan::scan_source(&text, &name)?;
    if components.is_empty() {
        return Ok(None);
    }
    let content = emit::render_unit(&name, &components);
    let output = output_path(source);
    let changed = match fs::read_to_string(&output) {
        Ok(existing) => existing != content,
        Err(_) => true,
    };
    Ok(Some(GeneratedFile {
        source: source.to_path_buf(),
        output,
        content,
        changed,
    }))
}
