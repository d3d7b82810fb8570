use sha2::{Digest, Sha256};
use std::fmt;
use std::panic::Location;
use std::path::Path;

pub const DEFAULT_BASE_PATH: &str = "/_c";
const HASH_BYTES: usize = 4;

/// Stable address of a component: `<base>/<name>-<8 hex chars>`.
///
/// The hash covers the component name and the source site that built it,
/// so the same name constructed in two places yields two prefixes while a
/// given site always yields the same one across restarts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteIdentity {
    name: String,
    site: String,
    prefix: String,
}

impl RouteIdentity {
    /// Identity for the caller's source location.
    #[track_caller]
    pub fn here(base: &str, name: &str) -> Self {
        Self::with_site(base, name, &call_site(Location::caller()))
    }

    pub fn with_site(base: &str, name: &str, site: &str) -> Self {
        let prefix = format!(
            "{}/{}-{}",
            base.trim_end_matches('/'),
            name,
            route_hash(name, site)
        );
        Self {
            name: name.to_string(),
            site: site.to_string(),
            prefix,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl fmt::Display for RouteIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)
    }
}

/// `<file basename>:<line>`; directories are dropped so prefixes survive
/// moving the checkout.
pub fn call_site(location: &Location<'_>) -> String {
    let file = Path::new(location.file())
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(location.file());
    format!("{file}:{}", location.line())
}

pub fn route_hash(name: &str, site: &str) -> String {
    let digest = Sha256::digest(format!("{site}:{name}").as_bytes());
    hex::encode(&digest[..HASH_BYTES])
}
