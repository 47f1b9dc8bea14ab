//! Unique test data backed by ULIDs, so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("product");
/// assert_ne!(a, unique_str("product"));
/// assert!(a.starts_with("product-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Lowercase unique email under `example.test`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("buyer");
/// assert!(email.starts_with("buyer-"));
/// assert!(email.ends_with("@example.test"));
/// assert_eq!(email, email.to_lowercase());
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}
