//! URL match patterns.

use glob::Pattern;
use tracing::warn;

/// Whether `url` matches a match pattern such as `https://docs.google.com/document/*`.
///
/// `*` matches any run of characters, including `/`.
pub fn url_matches(pattern: &str, url: &str) -> bool {
    match Pattern::new(pattern) {
        Ok(p) => p.matches(url),
        Err(e) => {
            warn!("Invalid match pattern {:?}: {}", pattern, e);
            false
        }
    }
}
