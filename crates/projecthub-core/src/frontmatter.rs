//! Frontmatter parsing for project entries.

use std::path::Path;

use crate::{
    content::{Project, ProjectData},
    error::{CoreError, Result},
};

const DELIMITER: &str = "---";

/// Split content into YAML frontmatter and body.
///
/// The frontmatter is delimited by `---` lines at the top of the file.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    let after_first = content.strip_prefix(DELIMITER)?;
    let after_first = after_first
        .strip_prefix("\r\n")
        .or_else(|| after_first.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in after_first.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let frontmatter = after_first[..offset].trim();
            let body = after_first[offset + line.len()..].trim_start();
            return Some((frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse a project entry.
///
/// `slug` is derived by the caller from the file location.
pub fn parse_project(content: &str, path: &Path, slug: impl Into<String>) -> Result<Project> {
    let Some((frontmatter, body)) = split_frontmatter(content) else {
        return Err(CoreError::frontmatter(path, "missing --- frontmatter block"));
    };

    let data: ProjectData =
        serde_yaml::from_str(frontmatter).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    if data.id.trim().is_empty() {
        return Err(CoreError::frontmatter(path, "id is required"));
    }

    Ok(Project {
        slug: slug.into(),
        data,
        body: body.to_string(),
    })
}
