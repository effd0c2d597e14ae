//! Request context: the storage-side addressing record for a public path.
//!
//! A public path `/<org>/<site>/<path...>` is resolved into the storage key of
//! the document, its companion `.props` key, and the public paths used when
//! cross-referencing the site and publish namespaces. Resolution never fails;
//! degenerate shapes (root path, org without site) still yield a context and
//! are rejected later by the access policy.

/// Extension assumed for extension-less documents.
pub const DEFAULT_EXTENSION: &str = "html";

/// Suffix of the companion metadata object stored next to each content key.
pub const PROPS_SUFFIX: &str = ".props";

/// Addressing record for one inbound request. Immutable once resolved;
/// fields are read through accessors so derived keys stay consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Configured name of the shared content bucket
    bucket: String,
    /// Owner namespace (first path segment, may be empty)
    org: String,
    /// Project namespace within the org, absent when nothing precedes the filename
    site: Option<String>,
    /// Last path segment as requested (empty for a bare org)
    filename: String,
    is_file: bool,
    ext: Option<String>,
    /// Filename without its final extension
    name: String,
    /// Object key within the org's content bucket
    key: String,
    /// Companion metadata key, always `key` + `.props`. Set only by `resolve`.
    props_key: String,
    /// Public path within the org, `.html` omitted
    pathname: String,
    /// Public path relative to the site's publish root
    aem_pathname: String,
}

impl RequestContext {
    /// Resolve a raw URL path (starting with `/`) into a request context.
    pub fn resolve(raw_path: &str, bucket: &str) -> Self {
        let lower = raw_path
            .strip_prefix('/')
            .unwrap_or(raw_path)
            .to_lowercase();
        let sanitized = if lower.ends_with('/') {
            format!("{}index", lower)
        } else {
            lower
        };

        let mut segments = sanitized.split('/');
        let org = segments.next().unwrap_or_default().to_string();

        // Collapse repeated slashes
        let mut path: Vec<&str> = segments.filter(|part| !part.is_empty()).collect();
        let key_base = path.join("/");

        let filename = path.pop().unwrap_or_default().to_string();
        let site = path.first().map(|s| s.to_string());

        let mut parts: Vec<&str> = filename.split('.').collect();
        if parts.len() == 1 {
            parts.push(DEFAULT_EXTENSION);
        }
        let is_file = parts.len() > 1;
        let ext = if is_file {
            parts.pop().map(str::to_string)
        } else {
            None
        };
        let name = parts.join(".");

        let is_document = ext.as_deref().map_or(true, |e| e == DEFAULT_EXTENSION);

        let key = if ext.as_deref() == Some(DEFAULT_EXTENSION) {
            format!("{}.{}", key_base, DEFAULT_EXTENSION)
        } else {
            key_base
        };
        let props_key = format!("{}{}", key, PROPS_SUFFIX);

        let aem_parts = if site.is_some() { &path[1..] } else { &path[..] };
        let pathname = public_path(&path, &name, ext.as_deref(), is_document);
        let aem_pathname = public_path(aem_parts, &name, ext.as_deref(), is_document);

        Self {
            bucket: bucket.to_string(),
            org,
            site,
            filename,
            is_file,
            ext,
            name,
            key,
            props_key,
            pathname,
            aem_pathname,
        }
    }

    /// Bucket holding this org's content objects.
    pub fn content_bucket(&self) -> String {
        format!("{}-content", self.org)
    }

    /// Configured shared bucket name. Storage reads use [`content_bucket`](Self::content_bucket).
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn site(&self) -> Option<&str> {
        self.site.as_deref()
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn ext(&self) -> Option<&str> {
        self.ext.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Object key within [`content_bucket`](Self::content_bucket).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn props_key(&self) -> &str {
        &self.props_key
    }

    pub fn pathname(&self) -> &str {
        &self.pathname
    }

    pub fn aem_pathname(&self) -> &str {
        &self.aem_pathname
    }
}

fn public_path(parents: &[&str], name: &str, ext: Option<&str>, is_document: bool) -> String {
    let mut joined = parents.join("/");
    if !parents.is_empty() {
        joined.push('/');
    }
    joined.push_str(name);

    match ext {
        Some(ext) if !is_document => format!("/{}.{}", joined, ext),
        _ => format!("/{}", joined),
    }
}
