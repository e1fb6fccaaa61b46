//! Check command - validate configuration and content

use std::{collections::HashSet, path::Path};

use color_eyre::eyre::{Result, bail};
use projecthub_core::{Config, LocaleSet, LocalizedValue, Project};
use projecthub_generator::{
    ContentCollector, SiteContent,
    github::split_repo,
    links::{favicon_for, parse_host},
    normalize_timestamp,
};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and all content files.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match Config::load_with_env(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            Some(c)
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
            None
        }
    };

    if let Some(ref cfg) = config {
        println!("\nChecking content...");
        match ContentCollector::new(&cfg.build.content_dir).collect() {
            Ok(content) => {
                println!(
                    "  ✓ {} project(s), {} tag(s)",
                    content.projects.len(),
                    content.tags.len()
                );
                // A config that loaded has already validated its locales.
                if let Ok(locales) = cfg.locale_set() {
                    check_content(&content, &locales, &mut result);
                }
            }
            Err(e) => {
                result.add_error(format!("Content error: {e}"));
                println!("  ✗ Content invalid: {e}");
            }
        }
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Check collected content for problems that would not stop a build.
fn check_content(content: &SiteContent, locales: &LocaleSet, result: &mut ValidationResult) {
    let mut tag_ids = HashSet::new();
    for tag in &content.tags {
        if !tag_ids.insert(tag.id.as_str()) {
            result.add_error(format!("Duplicate tag id '{}'", tag.id));
        }
    }

    let mut project_paths = HashSet::new();
    for project in &content.projects {
        if !project_paths.insert(project.path()) {
            result.add_warning(format!(
                "Project '{}' shares its path with another project",
                project.slug
            ));
        }
        check_project(project, &tag_ids, locales, result);
    }
}

fn check_project(
    project: &Project,
    tag_ids: &HashSet<&str>,
    locales: &LocaleSet,
    result: &mut ValidationResult,
) {
    let slug = &project.slug;

    if let Some(github) = project.github()
        && split_repo(&github.repo).is_none()
    {
        result.add_error(format!(
            "Project '{slug}': external.github.repo '{}' is not owner/name",
            github.repo
        ));
    }

    if let Some(dates) = project.dates() {
        let fields = [
            ("created", &dates.created),
            ("updated", &dates.updated),
            ("started", &dates.started),
            ("completed", &dates.completed),
        ];
        for (field, value) in fields {
            if let Some(value) = value
                && normalize_timestamp(value).is_none()
            {
                result.add_warning(format!(
                    "Project '{slug}': dates.{field} '{value}' is not a valid date"
                ));
            }
        }
    }

    for tag in &project.data.tags {
        if !tag_ids.contains(tag.as_str()) {
            result.add_warning(format!("Project '{slug}': unknown tag '{tag}'"));
        }
    }

    let localized = [
        ("title", Some(&project.data.title)),
        ("summary", Some(&project.data.summary)),
        ("description", project.data.description.as_ref()),
    ];
    for (field, value) in localized {
        if let Some(LocalizedValue::PerLocale(map)) = value {
            for locale in locales.iter().filter(|l| !map.contains_key(*l)) {
                result.add_warning(format!(
                    "Project '{slug}': {field} has no '{locale}' translation"
                ));
            }
        }
    }

    for link in &project.data.links {
        let favicon = favicon_for(&link.url);
        if favicon.src.is_empty() {
            result.add_warning(format!(
                "Project '{slug}': link '{}' is not an absolute URL",
                link.url
            ));
        }

        match &link.icon {
            Some(icon) if !icon.starts_with('/') && parse_host(icon).is_none() => {
                result.add_warning(format!(
                    "Project '{slug}': icon '{icon}' of link '{}' is neither a site path nor an absolute URL",
                    link.url
                ));
            }
            None if favicon.src.is_empty() => {
                result.add_warning(format!(
                    "Project '{slug}': link '{}' has no icon and no favicon can be derived",
                    link.url
                ));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, content).expect("write");
    }

    fn site(dir: &Path) -> std::path::PathBuf {
        let content = dir.join("content");
        let config_path = dir.join("projecthub.toml");
        std::fs::write(
            &config_path,
            format!(
                "[site]\ntitle = \"T\"\nbase_url = \"https://example.com\"\nlocales = [\"en\", \"de\"]\n\n[build]\ncontent_dir = {:?}\n",
                content.display().to_string()
            ),
        )
        .expect("write");
        config_path
    }

    fn collect(dir: &Path) -> ValidationResult {
        let content = ContentCollector::new(dir.join("content"))
            .collect()
            .expect("collect");
        let locales = LocaleSet::new(["en", "de"], "en").expect("locales");
        let mut result = ValidationResult::default();
        check_content(&content, &locales, &mut result);
        result
    }

    #[test]
    fn test_validation_result() {
        let mut result = ValidationResult::default();
        assert!(!result.has_errors());
        assert!(!result.has_warnings());

        result.add_error("error");
        result.add_warning("warning");
        assert!(result.has_errors());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_clean_site_passes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = site(dir.path());
        write(
            &dir.path().join("content"),
            "projects/a.md",
            "---\nid: a\ntitle: A\nsummary: A\ntags: [rust]\ndates:\n  created: 2023-01-01\n---\n",
        );
        write(&dir.path().join("content"), "tags/rust.yaml", "id: rust\nlabel: Rust\n");

        assert!(run(&config_path, true).is_ok());
    }

    #[test]
    fn test_missing_config_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(run(&dir.path().join("missing.toml"), false).is_err());
    }

    #[test]
    fn test_duplicate_tag_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let content = dir.path().join("content");
        write(&content, "tags/rust.yaml", "id: rust\nlabel: Rust\n");
        write(&content, "tags/rust-lang.yaml", "id: rust\nlabel: Rust lang\n");

        let result = collect(dir.path());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Duplicate tag id 'rust'"));
    }

    #[test]
    fn test_malformed_repo_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            &dir.path().join("content"),
            "projects/a.md",
            "---\nid: a\ntitle: A\nsummary: A\nexternal:\n  github:\n    repo: just-a-name\n---\n",
        );

        let result = collect(dir.path());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("just-a-name"));
    }

    #[test]
    fn test_warnings() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            &dir.path().join("content"),
            "projects/a.md",
            "---\nid: a\ntitle:\n  en: A\nsummary: A\ntags: [ghost]\ndates:\n  started: someday\nlinks:\n  - rel: source\n    url: /relative\n---\n",
        );

        let result = collect(dir.path());
        assert!(!result.has_errors());
        let warnings = result.warnings.join("\n");
        assert!(warnings.contains("dates.started 'someday'"));
        assert!(warnings.contains("unknown tag 'ghost'"));
        assert!(warnings.contains("title has no 'de' translation"));
        assert!(warnings.contains("link '/relative' is not an absolute URL"));
        assert!(warnings.contains("link '/relative' has no icon"));
    }

    #[test]
    fn test_link_icons() {
        let dir = tempfile::tempdir().expect("tempdir");
        write(
            &dir.path().join("content"),
            "projects/a.md",
            "---\nid: a\ntitle: A\nsummary: A\nlinks:\n  - url: https://docs.rs/serde\n  - url: /guide\n    icon: /icons/guide.svg\n  - url: https://example.com\n    icon: icons/broken.svg\n---\n",
        );

        let result = collect(dir.path());
        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 2, "{:?}", result.warnings);
        let warnings = result.warnings.join("\n");
        assert!(warnings.contains("link '/guide' is not an absolute URL"));
        assert!(!warnings.contains("link '/guide' has no icon"));
        assert!(warnings.contains("icon 'icons/broken.svg'"));
        assert!(!warnings.contains("docs.rs"));
    }

    #[test]
    fn test_strict_fails_on_warnings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config_path = site(dir.path());
        write(
            &dir.path().join("content"),
            "projects/a.md",
            "---\nid: a\ntitle: A\nsummary: A\ntags: [ghost]\n---\n",
        );

        assert!(run(&config_path, false).is_ok());
        assert!(run(&config_path, true).is_err());
    }
}
