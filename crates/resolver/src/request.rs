//! Validated request inputs.
//!
//! Everything in here is checked before the resolver performs any I/O, so a
//! malformed request can never cause a store read or an upstream call.

use crate::error::{ErrorKind, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Smallest allowed value of `max_limit`; also the lower bound for any limit.
pub const MIN_LIMIT: u32 = 1;
/// Hard ceiling for collection limits, regardless of configuration.
pub const MAX_LIMIT: u32 = 100;
/// Limit applied when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 20;

const MAX_OWNER_LEN: usize = 128;
const MAX_RESOURCE_ID_LEN: usize = 256;

fn is_identifier(value: &str, max_len: usize) -> bool {
    !value.is_empty()
        && value.chars().count() <= max_len
        && !value.chars().any(|c| c.is_whitespace() || c.is_control())
}

/// The authenticated account that owns (and partitions) snapshots.
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);
impl OwnerId {
    /// Parse a caller identity.
    ///
    /// Missing, blank or malformed identities are rejected with
    /// [`NotAuthenticated`](ErrorKind::NotAuthenticated).
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            Some(owner) if is_identifier(owner, MAX_OWNER_LEN) => Ok(Self(owner.to_string())),
            _ => exn::bail!(ErrorKind::NotAuthenticated),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stable upstream identifier of a resource (video id, playlist id, ...).
#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);
impl ResourceId {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            exn::bail!(ErrorKind::InvalidRequest("resource id must not be empty".to_string()));
        }
        if !is_identifier(trimmed, MAX_RESOURCE_ID_LEN) {
            exn::bail!(ErrorKind::InvalidRequest(format!("malformed resource id: {trimmed:?}")));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Upper bound on the number of items in a collection payload.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Limit(u32);
impl Limit {
    /// The largest limit any request may carry.
    pub const MAX: Limit = Limit(MAX_LIMIT);

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn as_usize(self) -> usize {
        // Bounded by MAX_LIMIT, always fits.
        self.0 as usize
    }
}
impl Default for Limit {
    fn default() -> Self {
        Self(DEFAULT_LIMIT)
    }
}

/// Limit policy applied to incoming requests: the default used when a caller
/// omits the limit, and the maximum a caller may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    default: Limit,
    max: Limit,
}
impl Limits {
    /// Build a limit policy. `max` must lie within `1..=100` and `default`
    /// within `1..=max`.
    pub fn new(default: u32, max: u32) -> Result<Self> {
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&max) {
            exn::bail!(ErrorKind::InvalidRequest(format!(
                "max limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {max}"
            )));
        }
        if !(MIN_LIMIT..=max).contains(&default) {
            exn::bail!(ErrorKind::InvalidRequest(format!(
                "default limit must be between {MIN_LIMIT} and {max}, got {default}"
            )));
        }
        Ok(Self { default: Limit(default), max: Limit(max) })
    }

    /// Validate a caller-supplied limit, falling back to the default.
    pub fn check(&self, requested: Option<u32>) -> Result<Limit> {
        match requested {
            None => Ok(self.default),
            Some(value) if (MIN_LIMIT..=self.max.0).contains(&value) => Ok(Limit(value)),
            Some(value) => exn::bail!(ErrorKind::InvalidRequest(format!(
                "limit must be between {MIN_LIMIT} and {}, got {value}",
                self.max
            ))),
        }
    }

    pub fn default_limit(&self) -> Limit {
        self.default
    }

    pub fn max_limit(&self) -> Limit {
        self.max
    }
}
impl Default for Limits {
    fn default() -> Self {
        Self { default: Limit::default(), max: Limit::MAX }
    }
}

/// A fully validated read request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub owner: OwnerId,
    pub resource_id: ResourceId,
    pub refresh: bool,
    pub limit: Limit,
}
impl Request {
    /// Validate raw caller input against a limit policy.
    ///
    /// The owner is checked first: an unauthenticated caller learns nothing
    /// about whether the rest of the request would have been valid.
    pub fn new(
        owner: Option<&str>,
        resource_id: &str,
        refresh: bool,
        limit: Option<u32>,
        limits: &Limits,
    ) -> Result<Self> {
        let owner = OwnerId::parse(owner)?;
        let resource_id = ResourceId::parse(resource_id)?;
        let limit = limits.check(limit)?;
        Ok(Self { owner, resource_id, refresh, limit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("4f1c2a"), "4f1c2a")]
    #[case(Some("  user-42  "), "user-42")]
    #[case(Some("c0ffee00-0000-4000-8000-000000000000"), "c0ffee00-0000-4000-8000-000000000000")]
    fn test_owner_valid(#[case] raw: Option<&str>, #[case] expected: &str) {
        assert_eq!(OwnerId::parse(raw).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[case(Some("two words"))]
    #[case(Some("nul\0byte"))]
    fn test_owner_invalid(#[case] raw: Option<&str>) {
        let err = OwnerId::parse(raw).unwrap_err();
        assert_eq!(*err, ErrorKind::NotAuthenticated);
    }

    #[test]
    fn test_owner_too_long() {
        let raw = "u".repeat(MAX_OWNER_LEN + 1);
        assert!(OwnerId::parse(Some(&raw)).is_err());
        let raw = "u".repeat(MAX_OWNER_LEN);
        assert!(OwnerId::parse(Some(&raw)).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    #[case("abc def")]
    #[case("line\nbreak")]
    fn test_resource_id_invalid(#[case] raw: &str) {
        let err = ResourceId::parse(raw).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidRequest(_)));
    }

    #[test]
    fn test_resource_id_trimmed() {
        assert_eq!(ResourceId::parse(" PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG ").unwrap().as_str(), "PLx0sYbCqOb8TBPRdmBHs5Iftvv9TPboYG");
    }

    #[rstest]
    #[case(None, 20)]
    #[case(Some(1), 1)]
    #[case(Some(57), 57)]
    #[case(Some(100), 100)]
    fn test_limit_accepted(#[case] requested: Option<u32>, #[case] expected: u32) {
        let limit = Limits::default().check(requested).unwrap();
        assert_eq!(limit.get(), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(101)]
    #[case(u32::MAX)]
    fn test_limit_rejected(#[case] requested: u32) {
        let err = Limits::default().check(Some(requested)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidRequest(_)));
    }

    #[test]
    fn test_configured_limits() {
        let limits = Limits::new(5, 10).unwrap();
        assert_eq!(limits.check(None).unwrap().get(), 5);
        assert_eq!(limits.check(Some(10)).unwrap().get(), 10);
        assert!(limits.check(Some(11)).is_err());
    }

    #[rstest]
    #[case(20, 0)]
    #[case(20, 101)]
    #[case(0, 50)]
    #[case(60, 50)]
    fn test_limits_invalid(#[case] default: u32, #[case] max: u32) {
        assert!(Limits::new(default, max).is_err());
    }

    #[test]
    fn test_request_checks_owner_first() {
        let err = Request::new(None, "", false, Some(0), &Limits::default()).unwrap_err();
        assert_eq!(*err, ErrorKind::NotAuthenticated);
        let err = Request::new(Some("U1"), "", false, Some(0), &Limits::default()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidRequest(_)));
    }
}
