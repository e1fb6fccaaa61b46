//! Content collection.
//!
//! Reads the `projects` and `tags` collections from the content directory.
//! Collection order is the sorted file path order, so builds are reproducible.

use std::{
    fs,
    path::{Path, PathBuf},
};

use projecthub_core::{CoreError, Project, Tag, frontmatter::parse_project};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory walk error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Project frontmatter error.
    #[error(transparent)]
    Project(#[from] CoreError),

    /// Tag data error.
    #[error("parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

const PROJECT_EXTENSIONS: &[&str] = &["md", "mdx"];
const TAG_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Collected site content.
#[derive(Debug, Default, Clone)]
pub struct SiteContent {
    /// Projects in collection order.
    pub projects: Vec<Project>,

    /// Tags in collection order.
    pub tags: Vec<Tag>,
}

impl SiteContent {
    /// Projects that may appear on the site.
    pub fn public_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.is_public())
    }
}

/// Content collector for the `projects` and `tags` collections.
#[derive(Debug)]
pub struct ContentCollector {
    content_dir: PathBuf,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
        }
    }

    /// Collect all content from the content directory.
    ///
    /// Missing collection directories yield empty collections.
    pub fn collect(&self) -> Result<SiteContent> {
        info!(dir = %self.content_dir.display(), "collecting content");

        let projects_dir = self.content_dir.join("projects");
        let project_files = find_files(&projects_dir, PROJECT_EXTENSIONS)?;
        let projects = project_files
            .par_iter()
            .map(|path| load_project(&projects_dir, path))
            .collect::<Result<Vec<_>>>()?;

        let tag_files = find_files(&self.content_dir.join("tags"), TAG_EXTENSIONS)?;
        let tags = tag_files
            .par_iter()
            .map(|path| load_tag(path))
            .collect::<Result<Vec<_>>>()?;

        info!(
            projects = projects.len(),
            tags = tags.len(),
            "collected content"
        );

        Ok(SiteContent { projects, tags })
    }
}

/// Files below `dir` with one of `extensions`, in sorted path order.
fn find_files(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "collection directory missing");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.contains(&ext.to_lowercase().as_str()));
        if matches {
            files.push(path.to_path_buf());
        }
    }

    Ok(files)
}

/// Slug of a project file: its path below the collection, without extension.
fn project_slug(collection_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(collection_dir).ok()?.with_extension("");
    let segments: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(segments.join("/"))
}

fn load_project(collection_dir: &Path, path: &Path) -> Result<Project> {
    let slug = project_slug(collection_dir, path).ok_or_else(|| CollectorError::Parse {
        path: path.to_path_buf(),
        message: "file name is not valid UTF-8".to_string(),
    })?;
    let content = fs::read_to_string(path)?;
    let project = parse_project(&content, path, slug)?;
    debug!(slug = %project.slug, "loaded project");
    Ok(project)
}

fn load_tag(path: &Path) -> Result<Tag> {
    let content = fs::read_to_string(path)?;
    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str::<Tag>(&content).map_err(|e| e.to_string()),
        _ => serde_yaml::from_str::<Tag>(&content).map_err(|e| e.to_string()),
    };

    let tag = parsed.map_err(|message| CollectorError::Parse {
        path: path.to_path_buf(),
        message,
    })?;

    if tag.id.trim().is_empty() {
        return Err(CollectorError::Parse {
            path: path.to_path_buf(),
            message: "id is required".to_string(),
        });
    }

    Ok(tag)
}
