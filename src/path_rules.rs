//! Backend addressing conventions behind one interface.
//!
//! Storage and the admin API address the same public path differently and
//! version those conventions independently, so each keeps its own rules:
//! [`StorageRules`] resolves a full [`RequestContext`], [`AdminRules`]
//! produces the canonical admin path.

use crate::access::AccessPolicy;
use crate::canonical::canonicalize;
use crate::context::RequestContext;

/// Maps a raw public path to a backend-specific address.
pub trait PathRules {
    type Address;

    fn address(&self, raw_path: &str) -> Self::Address;
}

/// Object storage addressing.
#[derive(Debug, Clone, Copy)]
pub struct StorageRules<'a> {
    pub bucket: &'a str,
}

impl PathRules for StorageRules<'_> {
    type Address = RequestContext;

    fn address(&self, raw_path: &str) -> RequestContext {
        RequestContext::resolve(raw_path, self.bucket)
    }
}

/// Admin source API addressing. Asset paths skip character sanitization.
#[derive(Debug, Clone, Copy)]
pub struct AdminRules<'a> {
    pub policy: &'a AccessPolicy,
}

impl PathRules for AdminRules<'_> {
    type Address = String;

    fn address(&self, raw_path: &str) -> String {
        canonicalize(raw_path, self.policy.is_embeddable_asset(raw_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DEFAULT_EMBEDDABLE_EXTENSIONS;

    fn policy() -> AccessPolicy {
        AccessPolicy::new(
            Vec::<String>::new(),
            Vec::<String>::new(),
            Vec::new(),
            DEFAULT_EMBEDDABLE_EXTENSIONS.iter().map(|e| e.to_string()),
        )
    }

    #[test]
    fn test_rules_diverge_on_the_same_path() {
        let policy = policy();
        let raw = "/Org/Site/My Page";

        let ctx = StorageRules { bucket: "b" }.address(raw);
        assert_eq!(ctx.key(), "site/my page.html");

        let admin = AdminRules { policy: &policy }.address(raw);
        assert_eq!(admin, "/org/site/mypage.html");
    }

    #[test]
    fn test_admin_rules_keep_asset_characters() {
        let policy = policy();
        let rules = AdminRules { policy: &policy };
        assert_eq!(rules.address("/org/site/a_b.png"), "/org/site/a_b.png");
        assert_eq!(rules.address("/org/site/a_b.txt"), "/org/site/ab.txt");
    }
}
