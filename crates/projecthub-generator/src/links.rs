//! Outbound link helpers.

use url::Url;

/// Icon descriptor for an outbound link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Favicon {
    /// Primary icon URL; empty when the link could not be parsed.
    pub src: String,

    /// Icon to try when `src` fails to load.
    pub fallback: Option<String>,

    /// Alt text.
    pub alt: String,
}

/// Host name of an absolute URL.
pub fn parse_host(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_string)
}

/// Favicon for a link: the site's own icon, falling back to DuckDuckGo's cache.
pub fn favicon_for(url: &str) -> Favicon {
    let Some(host) = parse_host(url) else {
        return Favicon {
            src: String::new(),
            fallback: None,
            alt: "favicon".to_string(),
        };
    };

    Favicon {
        src: format!("https://{host}/favicon.ico"),
        fallback: Some(format!("https://icons.duckduckgo.com/ip3/{host}.ico")),
        alt: format!("{host} favicon"),
    }
}
