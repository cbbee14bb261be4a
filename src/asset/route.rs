//! Site root: URL ↔ filesystem path mapping.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use url::Url;

/// A directory published under a base URL.
///
/// This is the single source of truth for asset path mapping: source URLs are
/// resolved to files through it, and unified output files get their URL from it.
///
/// ```text
/// url: https://example.com/themes/twentytwelve/
/// dir: /srv/www/themes/twentytwelve
///
/// https://example.com/themes/twentytwelve/js/html5.js ↔ /srv/www/themes/twentytwelve/js/html5.js
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot {
    dir: PathBuf,
    url: Url,
}

impl SiteRoot {
    /// Create a mapping. The base URL is treated as a directory
    /// (a trailing slash is appended if missing).
    pub fn new(dir: impl Into<PathBuf>, url: &str) -> Result<Self, url::ParseError> {
        let mut url = Url::parse(url)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        url.set_query(None);
        url.set_fragment(None);
        Ok(Self {
            dir: dir.into(),
            url,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Resolve a path that may be relative to the root directory.
    pub fn resolve_dir(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        }
    }

    /// Map an asset URL to a file under the root directory.
    ///
    /// Relative URLs are joined onto the base URL. Returns `None` for URLs on
    /// another origin, outside the base path, or escaping it with `..`.
    pub fn path_for(&self, raw: &str) -> Option<PathBuf> {
        let url = self.url.join(raw).ok()?;
        if url.origin() != self.url.origin() {
            return None;
        }
        let rest = url.path().strip_prefix(self.url.path())?;

        let mut path = self.dir.clone();
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            let decoded = percent_decode_str(segment).decode_utf8().ok()?;
            if decoded == ".." || decoded.contains(['/', '\\']) {
                return None;
            }
            path.push(&*decoded);
        }
        Some(path)
    }

    /// Map a file under the root directory to its public URL.
    ///
    /// Returns `None` if the path is outside the root directory.
    pub fn url_for(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.dir).ok()?;
        let mut segments = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_str()?),
                Component::CurDir => {}
                _ => return None,
            }
        }
        let mut url = self.url.clone();
        url.path_segments_mut().ok()?.pop_if_empty().extend(segments);
        Some(url.to_string())
    }

    /// URL for a directory, always with a trailing slash.
    pub fn dir_url_for(&self, dir: &Path) -> Option<String> {
        let url = self.url_for(dir)?;
        Some(if url.ends_with('/') { url } else { url + "/" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> SiteRoot {
        SiteRoot::new("/srv/theme", "https://example.com/themes/twentytwelve").unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        assert_eq!(
            root().url().as_str(),
            "https://example.com/themes/twentytwelve/"
        );
    }

    #[test]
    fn test_path_for_absolute_and_relative() {
        let root = root();
        assert_eq!(
            root.path_for("https://example.com/themes/twentytwelve/js/html5.js"),
            Some(PathBuf::from("/srv/theme/js/html5.js"))
        );
        assert_eq!(
            root.path_for("style.css?ver=1.1.3"),
            Some(PathBuf::from("/srv/theme/style.css"))
        );
        assert_eq!(
            root.path_for("css/my%20style.css"),
            Some(PathBuf::from("/srv/theme/css/my style.css"))
        );
    }

    #[test]
    fn test_path_for_rejects_foreign_urls() {
        let root = root();
        assert_eq!(root.path_for("https://cdn.example.org/jquery.js"), None);
        assert_eq!(root.path_for("https://example.com/other/app.js"), None);
        assert_eq!(root.path_for("../secret.css"), None);
        assert_eq!(root.path_for("a%2F..%2Fb.css"), None);
    }

    #[test]
    fn test_url_for() {
        let root = root();
        assert_eq!(
            root.url_for(Path::new("/srv/theme/min/css/abc.css")).as_deref(),
            Some("https://example.com/themes/twentytwelve/min/css/abc.css")
        );
        assert_eq!(
            root.url_for(Path::new("/srv/theme/min/my file.js")).as_deref(),
            Some("https://example.com/themes/twentytwelve/min/my%20file.js")
        );
        assert_eq!(root.url_for(Path::new("/elsewhere/a.css")), None);
        assert_eq!(root.url_for(Path::new("/srv/theme/../a.css")), None);
    }

    #[test]
    fn test_dir_url_for() {
        let root = root();
        assert_eq!(
            root.dir_url_for(Path::new("/srv/theme/min")).as_deref(),
            Some("https://example.com/themes/twentytwelve/min/")
        );
        assert_eq!(
            root.dir_url_for(Path::new("/srv/theme")).as_deref(),
            Some("https://example.com/themes/twentytwelve/")
        );
    }

    #[test]
    fn test_resolve_dir() {
        let root = root();
        assert_eq!(
            root.resolve_dir(Path::new("min/js")),
            PathBuf::from("/srv/theme/min/js")
        );
        assert_eq!(root.resolve_dir(Path::new("/tmp/out")), PathBuf::from("/tmp/out"));
    }
}
