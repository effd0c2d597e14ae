//! Admin-side path canonicalization.
//!
//! The admin source API addresses documents by a normalized path: lowercase,
//! restricted to `[a-z0-9.-]` per segment, no empty/`.`/`..` segments, and
//! always carrying an extension (`.html` by default). Embeddable assets keep
//! their original characters because many were stored before sanitization
//! existed.
//!
//! [`remove_dot_segments`] runs on every inbound path before routing, so
//! neither backend ever sees `.` or `..` segments.

/// Canonicalize a raw URL path for the admin source API.
pub fn canonicalize(raw_path: &str, is_embeddable_asset: bool) -> String {
    let mut lowered = raw_path.to_lowercase();
    if lowered.ends_with('/') {
        lowered.push_str("index");
    }

    let segments: Vec<String> = lowered
        .split('/')
        .map(|segment| {
            if is_embeddable_asset {
                segment.to_string()
            } else {
                segment.chars().filter(is_canonical_char).collect()
            }
        })
        .filter(|segment| !matches!(segment.as_str(), "" | "." | ".."))
        .collect();

    let mut canonical = format!("/{}", segments.join("/"));
    if !segments.last().is_some_and(|last| last.contains('.')) {
        canonical.push_str(".html");
    }
    canonical
}

/// Resolve `.` and `..` segments of an inbound URL path (RFC 3986 §5.2.4),
/// treating `%2e` as a dot the way URL parsers do. `..` never climbs above
/// the root. Empty segments are kept.
pub fn remove_dot_segments(path: &str) -> String {
    let segments: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();
    let last = segments.len().saturating_sub(1);

    let mut output: Vec<&str> = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        match dot_segment(segment) {
            Some(DotSegment::Current) => {}
            Some(DotSegment::Parent) => {
                output.pop();
            }
            None => {
                output.push(*segment);
                continue;
            }
        }
        // A trailing dot segment still names a directory
        if i == last {
            output.push("");
        }
    }

    format!("/{}", output.join("/"))
}

enum DotSegment {
    Current,
    Parent,
}

fn dot_segment(segment: &str) -> Option<DotSegment> {
    let is = |s: &str| segment.eq_ignore_ascii_case(s);
    if is(".") || is("%2e") {
        Some(DotSegment::Current)
    } else if is("..") || is(".%2e") || is("%2e.") || is("%2e%2e") {
        Some(DotSegment::Parent)
    } else {
        None
    }
}

fn is_canonical_char(c: &char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '.' | '-')
}
