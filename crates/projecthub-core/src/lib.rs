//! Project Hub Core Library
//!
//! Core types, configuration, locale handling and error types shared by the
//! project hub generator and CLI.

pub mod config;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod i18n;

pub use config::Config;
pub use content::{GithubRef, Project, ProjectDates, ProjectData, Tag, Visibility};
pub use error::{CoreError, Result};
pub use i18n::{LocaleSet, LocalizedValue};
