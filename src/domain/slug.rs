//! Slug lookups that may arrive without a slug.
//!
//! Route parameters and query strings hand us "no slug" in two shapes: the
//! parameter was never supplied, or it was supplied as an explicit null.
//! Both are kept distinct so callers can tell them apart from "slug given
//! but unknown".

/// Challenge slug as received from a caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeSlug<'a> {
    /// A slug was supplied
    Present(&'a str),

    /// No slug parameter at all
    Absent,

    /// The parameter was supplied as null
    Null,
}

impl<'a> ChallengeSlug<'a> {
    /// The slug to search for, if there is a usable one.
    ///
    /// Empty strings never match a content entry.
    pub fn as_lookup(&self) -> Option<&'a str> {
        match *self {
            ChallengeSlug::Present(slug) if !slug.is_empty() => Some(slug),
            _ => None,
        }
    }
}

impl<'a> From<&'a str> for ChallengeSlug<'a> {
    fn from(slug: &'a str) -> Self {
        ChallengeSlug::Present(slug)
    }
}

impl<'a> From<&'a String> for ChallengeSlug<'a> {
    fn from(slug: &'a String) -> Self {
        ChallengeSlug::Present(slug.as_str())
    }
}

/// `None` maps to [`ChallengeSlug::Absent`].
impl<'a> From<Option<&'a str>> for ChallengeSlug<'a> {
    fn from(slug: Option<&'a str>) -> Self {
        match slug {
            Some(slug) => ChallengeSlug::Present(slug),
            None => ChallengeSlug::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_key() {
        assert_eq!(ChallengeSlug::from("counter").as_lookup(), Some("counter"));
        assert_eq!(ChallengeSlug::from("").as_lookup(), None);
        assert_eq!(ChallengeSlug::Absent.as_lookup(), None);
        assert_eq!(ChallengeSlug::Null.as_lookup(), None);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(ChallengeSlug::from(None::<&str>), ChallengeSlug::Absent);
        assert_eq!(
            ChallengeSlug::from(Some("x")),
            ChallengeSlug::Present("x")
        );
    }
}
