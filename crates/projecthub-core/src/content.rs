//! Content records for the `projects` and `tags` collections.

use serde::{Deserialize, Serialize};

use crate::i18n::LocalizedValue;

/// Whether a project is listed publicly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Listed on the site and in the sitemap.
    #[default]
    Public,
    /// Never listed.
    Private,
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    /// Not started yet.
    Planned,
    /// In progress.
    #[default]
    Active,
    /// Finished.
    Completed,
    /// No longer maintained.
    Archived,
}

/// Relation of an outbound project link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRel {
    /// Source repository.
    Source,
    /// Live demo.
    Demo,
    /// Documentation.
    Docs,
    /// Related material.
    Related,
    /// Anything else.
    #[default]
    Other,
}

/// An outbound link attached to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLink {
    /// Link relation.
    #[serde(default)]
    pub rel: LinkRel,

    /// Display label.
    #[serde(default)]
    pub label: Option<String>,

    /// Target URL.
    pub url: String,

    /// Icon override path or URL.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Timestamps authored in a project's frontmatter.
///
/// Values are kept as written (`2023-01-01`, `2023-01-01T10:00:00Z`, ...) and
/// normalized only when a lastmod is computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDates {
    /// When the entry was first published.
    #[serde(default)]
    pub created: Option<String>,
    /// Last content change.
    #[serde(default)]
    pub updated: Option<String>,
    /// When work on the project began.
    #[serde(default)]
    pub started: Option<String>,
    /// When the project was finished.
    #[serde(default)]
    pub completed: Option<String>,
}

/// A GitHub repository backing a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRef {
    /// Repository in `owner/name` form.
    pub repo: String,

    /// Branch whose head commit is consulted.
    #[serde(default = "default_branch")]
    pub branch: String,
}

/// External references of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalRefs {
    /// Backing GitHub repository.
    #[serde(default)]
    pub github: Option<GithubRef>,
}

fn default_branch() -> String {
    "main".to_string()
}

/// Frontmatter of a project entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectData {
    /// Stable project identifier.
    pub id: String,

    /// Project title.
    pub title: LocalizedValue<String>,

    /// One-line summary.
    pub summary: LocalizedValue<String>,

    /// Longer description.
    #[serde(default)]
    pub description: Option<LocalizedValue<String>>,

    /// Lifecycle status.
    #[serde(default)]
    pub status: ProjectStatus,

    /// Tag ids.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Category names.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Roles held on the project.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Skills the project demonstrates.
    #[serde(default)]
    pub skills: Vec<String>,

    /// Outbound links.
    #[serde(default)]
    pub links: Vec<ProjectLink>,

    /// Authored timestamps.
    #[serde(default)]
    pub dates: Option<ProjectDates>,

    /// Highlighted on the landing page.
    #[serde(default)]
    pub featured: bool,

    /// Sort priority, lower first.
    #[serde(default)]
    pub priority: Option<u32>,

    /// Listing visibility.
    #[serde(default)]
    pub visibility: Visibility,

    /// External references.
    #[serde(default)]
    pub external: Option<ExternalRefs>,
}

/// A project entry from the `projects` collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// URL slug derived from the content file path.
    pub slug: String,

    /// Parsed frontmatter.
    pub data: ProjectData,

    /// Body below the frontmatter, unrendered.
    pub body: String,
}

impl Project {
    /// Whether the project may appear on the site.
    pub fn is_public(&self) -> bool {
        self.data.visibility != Visibility::Private
    }

    /// The linked GitHub repository, if any.
    pub fn github(&self) -> Option<&GithubRef> {
        self.data.external.as_ref()?.github.as_ref()
    }

    /// Authored dates, if any.
    pub fn dates(&self) -> Option<&ProjectDates> {
        self.data.dates.as_ref()
    }

    /// Site-relative detail page path.
    pub fn path(&self) -> String {
        format!("/projects/{}", self.slug)
    }
}

/// A taxonomy entry from the `tags` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag identifier used in URLs.
    pub id: String,

    /// Display label.
    pub label: String,

    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Tag {
    /// Site-relative tag page path.
    pub fn path(&self) -> String {
        format!("/tags/{}", self.id)
    }
}
