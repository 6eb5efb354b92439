//! Ordered overlay merging for manifest mappings
//!
//! Manifest generation combines `require` and `repositories` mappings from
//! several sources with a fixed precedence: base document, then the root
//! manifest, then each repository manifest in table order. Every one of those
//! steps is the same operation, an overlay where the later source wins on a
//! key collision, so it lives here once.
//!
//! Overlays are shallow. A constraint or repository entry from a later source
//! replaces the earlier one whole; nested objects are never combined.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// The constraint given to packages that are served from local paths.
pub const ANY_VERSION: &str = "*";

/// Overlay `top` onto `base`: keys from `top` overwrite same-named keys in
/// `base`, other keys of `base` are kept.
///
/// Existing keys keep their position; new keys are appended in `top`'s order.
pub fn overlay(base: &mut Map<String, Value>, top: &Map<String, Value>) {
    for (key, value) in top {
        base.insert(key.clone(), value.clone());
    }
}

/// Overlay each source onto `base` in order, so the last source wins.
pub fn overlay_all<'a, I>(base: &mut Map<String, Value>, sources: I)
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    for source in sources {
        overlay(base, source);
    }
}

fn local_package_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Literal pattern, cannot fail to compile
    PATTERN.get_or_init(|| Regex::new(r"/(framework|module)").unwrap())
}

/// Whether a package name refers to a framework or module package that the
/// development environment serves from a local path.
///
/// # Examples
///
/// ```
/// use cloud_dev::merge::is_local_package;
///
/// assert!(is_local_package("magento/module-catalog"));
/// assert!(is_local_package("magento/framework"));
/// assert!(!is_local_package("magento/ece-tools"));
/// ```
pub fn is_local_package(name: &str) -> bool {
    local_package_pattern().is_match(name)
}

/// Rewrite the constraint of every local package in `require` to `*`.
pub fn pin_local_packages(require: &mut Map<String, Value>) {
    for (name, constraint) in require.iter_mut() {
        if is_local_package(name) {
            *constraint = Value::String(ANY_VERSION.to_string());
        }
    }
}
