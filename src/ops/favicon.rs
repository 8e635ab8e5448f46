use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::config::FaviconConfig;

/// Icon shown for folders (and anything without a url)
pub const FOLDER_ICON: &str = "images/folder.png";
/// Icon shown for links that have no usable remote favicon
pub const BOOKMARK_ICON: &str = "images/bookmark.png";

/// scheme, then optional `//authority`
static URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):(?://([^/?#]*))?").expect("valid url regex")
});

/// Picks the icon reference for an entry.
#[derive(Debug, Clone)]
pub struct FaviconResolver {
    service: String,
    offline: bool,
}

impl Default for FaviconResolver {
    fn default() -> Self {
        FaviconResolver::new(&FaviconConfig::default())
    }
}

impl FaviconResolver {
    pub fn new(config: &FaviconConfig) -> Self {
        FaviconResolver {
            service: config.service.clone(),
            offline: config.offline,
        }
    }

    /// Icon for `url`: the folder icon when there is no url, the generic
    /// bookmark icon when offline or when the url has no public http(s)
    /// host, otherwise the remote icon keyed by host.
    pub fn resolve(&self, url: Option<&str>) -> String {
        let url = match url {
            Some(u) if !u.is_empty() => u,
            _ => return FOLDER_ICON.to_string(),
        };
        if self.offline {
            return BOOKMARK_ICON.to_string();
        }
        match public_http_host(url) {
            Some(host) => format!("{}{}", self.service, host),
            None => BOOKMARK_ICON.to_string(),
        }
    }
}

/// Host of an http(s) url, unless it is local, loopback or a raw IP.
fn public_http_host(url: &str) -> Option<&str> {
    let caps = URL_PREFIX.captures(url)?;
    let scheme = caps.get(1)?.as_str();
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return None;
    }
    let authority = caps.get(2)?.as_str();
    let host_port = authority.rsplit('@').next().unwrap_or(authority);
    let host = if let Some(rest) = host_port.strip_prefix('[') {
        // [v6]:port
        rest.split(']').next().unwrap_or(rest)
    } else {
        host_port.split(':').next().unwrap_or(host_port)
    };

    if host.is_empty() || host.parse::<IpAddr>().is_ok() {
        return None;
    }
    let lower = host.to_ascii_lowercase();
    if lower == "localhost" || lower.ends_with(".localhost") || lower.ends_with(".local") {
        return None;
    }
    Some(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FaviconResolver {
        FaviconResolver::default()
    }

    #[test]
    fn remote_icon_keyed_by_host() {
        assert_eq!(
            resolver().resolve(Some("https://www.rust-lang.org/learn?x=1")),
            "https://favicons.githubusercontent.com/www.rust-lang.org"
        );
        assert_eq!(
            resolver().resolve(Some("http://user:pw@example.com:8080/a")),
            "https://favicons.githubusercontent.com/example.com"
        );
    }

    #[test]
    fn no_url_is_folder_icon() {
        assert_eq!(resolver().resolve(None), FOLDER_ICON);
        assert_eq!(resolver().resolve(Some("")), FOLDER_ICON);
    }

    #[test]
    fn local_hosts_get_generic_icon() {
        for url in [
            "http://localhost:3000/",
            "http://127.0.0.1/admin",
            "http://192.168.1.1",
            "http://[::1]:8080/",
            "http://printer.local/",
            "http://app.localhost/",
        ] {
            assert_eq!(resolver().resolve(Some(url)), BOOKMARK_ICON, "{url}");
        }
    }

    #[test]
    fn non_http_schemes_get_generic_icon() {
        for url in ["ftp://example.com/", "file:///home/me", "javascript:void(0)", "about:blank"] {
            assert_eq!(resolver().resolve(Some(url)), BOOKMARK_ICON, "{url}");
        }
    }

    #[test]
    fn offline_gets_generic_icon() {
        let r = FaviconResolver::new(&FaviconConfig {
            offline: true,
            ..FaviconConfig::default()
        });
        assert_eq!(r.resolve(Some("https://example.com")), BOOKMARK_ICON);
        assert_eq!(r.resolve(None), FOLDER_ICON);
    }

    #[test]
    fn custom_service() {
        let r = FaviconResolver::new(&FaviconConfig {
            service: "https://icons.example.net/?host=".into(),
            offline: false,
        });
        assert_eq!(
            r.resolve(Some("https://docs.rs/serde")),
            "https://icons.example.net/?host=docs.rs"
        );
    }
}
