use std::fmt;
use std::str::FromStr;

use crate::error::{Cause, Error};
use crate::lines::{LineSet, parse_lines};
use crate::parse::split_line_markers;
use crate::resolve::{FeatureUriResolver, LocatorResolver};
use crate::uri::FeatureUri;

/// Identifies scenarios and examples in a feature.
///
/// Written as `URI[:LINE]*`: a feature locator followed by any number of
/// line numbers, each preceded by a colon, e.g. `features/login.feature:12:30`.
/// No lines means the whole feature.
///
/// Two values are equal when they point at the same resource and pin the same
/// set of lines; the order and repetition the lines were given in is lost at
/// construction. `Display` gives the canonical text, which parses back to an
/// equal value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureWithLines<R = FeatureUri> {
  uri: R,
  lines: LineSet,
}

impl<R> FeatureWithLines<R> {
  /// Create from an already resolved resource and any collection of lines
  pub fn create(uri: R, lines: impl IntoIterator<Item = u32>) -> Self {
    Self {
      uri,
      lines: lines.into_iter().collect(),
    }
  }

  /// The feature resource, e.g. `file:///src/features/login.feature`
  pub const fn uri(&self) -> &R {
    &self.uri
  }

  /// The pinned lines, ascending
  pub const fn lines(&self) -> &LineSet {
    &self.lines
  }

  /// Whether this selects the whole feature rather than specific lines
  pub fn is_whole_feature(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn into_parts(self) -> (R, LineSet) {
    (self.uri, self.lines)
  }
}

impl<R: Clone + Eq + std::hash::Hash + fmt::Display> FeatureWithLines<R> {
  /// Parse `URI[:LINE]*` text, handing the locator to `resolver`.
  ///
  /// Every failure, whether from the locator or the lines, is reported as
  /// [`Error::MalformedIdentifier`] naming `text`, with the original failure
  /// as its source.
  pub fn resolve<T>(resolver: &T, text: &str) -> Result<Self, Error>
  where
    T: LocatorResolver<Resource = R>,
  {
    let result = match split_line_markers(text) {
      None => resolve_locator(resolver, text).map(|uri| Self {
        uri,
        lines: LineSet::new(),
      }),
      Some(("", _)) => Err(Cause::EmptyLocator),
      Some((locator, lines)) => resolve_locator(resolver, locator).and_then(|uri| {
        let lines = parse_lines(lines)?;
        Ok(Self { uri, lines })
      }),
    };

    result.map_err(|cause| {
      tracing::debug!(text, %cause, "rejected feature identifier");
      Error::malformed(text, cause)
    })
  }

  /// Resolve `locator` and pair it with explicitly given lines.
  ///
  /// Resolver failures come back untouched.
  pub fn resolve_with_lines<T>(
    resolver: &T,
    locator: &str,
    lines: impl IntoIterator<Item = u32>,
  ) -> Result<Self, T::Error>
  where
    T: LocatorResolver<Resource = R>,
  {
    let uri = resolver.resolve(locator)?;
    Ok(Self::create(uri, lines))
  }
}

impl FeatureWithLines<FeatureUri> {
  /// Parse `URI[:LINE]*` text with the default [`FeatureUriResolver`]
  ///
  /// ```
  /// use featurelines_core::FeatureWithLines;
  ///
  /// let feature = FeatureWithLines::parse("classpath:login.feature:30:12:30").unwrap();
  /// assert_eq!(feature.uri().to_string(), "classpath:login.feature");
  /// assert_eq!(feature.lines().iter().collect::<Vec<_>>(), vec![12, 30]);
  /// assert_eq!(feature.to_string(), "classpath:login.feature:12:30");
  /// ```
  pub fn parse(text: &str) -> Result<Self, Error> {
    Self::resolve(&FeatureUriResolver::default(), text)
  }

  /// Like [`FeatureWithLines::create`], but from unresolved locator text
  pub fn parse_with_lines(
    locator: &str,
    lines: impl IntoIterator<Item = u32>,
  ) -> Result<Self, crate::error::LocatorError> {
    Self::resolve_with_lines(&FeatureUriResolver::default(), locator, lines)
  }
}

fn resolve_locator<T: LocatorResolver>(resolver: &T, locator: &str) -> Result<T::Resource, Cause> {
  resolver
    .resolve(locator)
    .map_err(|e| Cause::Locator(Box::new(e)))
}

/// The canonical `URI[:LINE]*` form, lines ascending
impl<R: fmt::Display> fmt::Display for FeatureWithLines<R> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.uri, self.lines)
  }
}

impl FromStr for FeatureWithLines<FeatureUri> {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl<R: fmt::Display> serde::Serialize for FeatureWithLines<R> {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> serde::Deserialize<'de> for FeatureWithLines<FeatureUri> {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let text = String::deserialize(deserializer)?;
    Self::parse(&text).map_err(serde::de::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::{LineError, LocatorError};
  use pretty_assertions::assert_eq;
  use rstest::rstest;
  use std::collections::HashMap;
  use std::collections::hash_map::DefaultHasher;
  use std::hash::{Hash, Hasher};

  fn resolver() -> FeatureUriResolver {
    FeatureUriResolver::new().with_base_dir("/work")
  }

  fn parse(text: &str) -> Result<FeatureWithLines, Error> {
    FeatureWithLines::resolve(&resolver(), text)
  }

  fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
  }

  /// Keeps the locator verbatim, so tests don't depend on file URI rules
  #[derive(Debug, Default)]
  struct Verbatim;

  #[derive(Debug, thiserror::Error)]
  #[error("verbatim locators may not contain spaces")]
  struct VerbatimError;

  impl LocatorResolver for Verbatim {
    type Resource = String;
    type Error = VerbatimError;

    fn resolve(&self, locator: &str) -> Result<String, VerbatimError> {
      if locator.contains(' ') {
        return Err(VerbatimError);
      }
      Ok(locator.to_string())
    }
  }

  #[test]
  fn test_parse_path_only() {
    let feature = parse("foo/bar.feature").expect("should parse");
    let uri = resolver().resolve("foo/bar.feature").expect("should resolve");

    assert_eq!(feature.uri(), &uri);
    assert!(feature.lines().is_empty());
    assert!(feature.is_whole_feature());
  }

  #[test]
  fn test_parse_with_lines_ascending_and_deduplicated() {
    let feature = parse("foo/bar.feature:3:7:3").expect("should parse");
    let uri = resolver().resolve("foo/bar.feature").expect("should resolve");

    assert_eq!(feature.uri(), &uri);
    assert_eq!(feature.lines().iter().collect::<Vec<_>>(), vec![3, 7]);
    assert!(!feature.is_whole_feature());
  }

  #[rstest]
  #[case("foo/bar.feature", "file:///work/foo/bar.feature")]
  #[case("foo/bar.feature:3", "file:///work/foo/bar.feature:3")]
  #[case("foo/bar.feature:7:3:7", "file:///work/foo/bar.feature:3:7")]
  #[case("foo/bar.feature:0", "file:///work/foo/bar.feature:0")]
  #[case("classpath:com/example/bar.feature:12", "classpath:com/example/bar.feature:12")]
  #[case("file:///tmp/bar.feature:5:1", "file:///tmp/bar.feature:1:5")]
  #[cfg_attr(windows, ignore = "unix paths")]
  fn test_to_string_is_canonical(#[case] input: &str, #[case] expected: &str) {
    let feature = parse(input).expect("should parse");
    assert_eq!(feature.to_string(), expected);
  }

  #[rstest]
  #[case("foo/bar.feature")]
  #[case("foo/bar.feature:3:7:3")]
  #[case("classpath:com/example/bar.feature:1:2:3")]
  #[case("file:///tmp/my%20bar.feature:9")]
  #[case("my bar.feature:40:4")]
  fn test_round_trip(#[case] input: &str) {
    let feature = parse(input).expect("should parse");
    let reparsed = parse(&feature.to_string()).expect("should reparse");
    assert_eq!(reparsed, feature);
  }

  #[test]
  fn test_parse_with_lines_matches_parse() {
    let explicit = FeatureWithLines::resolve_with_lines(&resolver(), "foo.feature", [5, 5, 2])
      .expect("should resolve");
    let parsed = parse("foo.feature:2:5").expect("should parse");

    assert_eq!(explicit, parsed);
  }

  #[test]
  fn test_default_resolver_entry_points_agree() {
    let explicit = FeatureWithLines::parse_with_lines("foo.feature", [5, 5, 2]).expect("should resolve");
    let parsed = FeatureWithLines::parse("foo.feature:2:5").expect("should parse");
    let from_str: FeatureWithLines = "foo.feature:5:2".parse().expect("should parse");

    assert_eq!(explicit, parsed);
    assert_eq!(from_str, parsed);
  }

  #[test]
  fn test_parse_with_lines_propagates_resolver_error_unwrapped() {
    let err = FeatureWithLines::resolve_with_lines(&resolver(), "foo.txt", [1])
      .expect_err("should reject");
    assert!(matches!(err, LocatorError::NotAFeature { .. }));
  }

  #[test]
  fn test_create_normalizes_lines() {
    let uri = resolver().resolve("foo.feature").expect("should resolve");
    let messy = FeatureWithLines::create(uri.clone(), [9, 1, 9, 4, 1]);
    let tidy = FeatureWithLines::create(uri, [1, 4, 9]);

    assert_eq!(messy.lines(), tidy.lines());
    assert_eq!(messy.lines().iter().collect::<Vec<_>>(), vec![1, 4, 9]);
    assert_eq!(messy, tidy);
    assert_eq!(hash_of(&messy), hash_of(&tidy));
  }

  #[test]
  fn test_equality_needs_same_resource_and_lines() {
    let a = FeatureWithLines::create("a.feature".to_string(), [1, 2]);

    assert_ne!(a, FeatureWithLines::create("b.feature".to_string(), [1, 2]));
    assert_ne!(a, FeatureWithLines::create("a.feature".to_string(), [1]));
    assert_ne!(a, FeatureWithLines::create("a.feature".to_string(), Vec::new()));
    assert_eq!(a, FeatureWithLines::create("a.feature".to_string(), [2, 1, 2]));
  }

  #[test]
  fn test_usable_as_map_key() {
    let mut selected = HashMap::new();
    selected.insert(parse("foo.feature:3:1").expect("should parse"), "first");
    selected.insert(parse("foo.feature:1:3:3").expect("should parse"), "second");

    assert_eq!(selected.len(), 1);
    assert_eq!(selected.values().next(), Some(&"second"));
  }

  #[test]
  #[cfg_attr(windows, ignore = "unix paths")]
  fn test_into_parts() {
    let (uri, lines) = parse("foo.feature:4:2")
      .expect("should parse")
      .into_parts();

    assert_eq!(uri.to_string(), "file:///work/foo.feature");
    assert_eq!(lines.iter().collect::<Vec<_>>(), vec![2, 4]);
  }

  #[test]
  fn test_reject_empty_locator() {
    let err = parse(":3").expect_err("should reject");

    assert_eq!(err.to_string(), ":3 is not valid. Try URI[:LINE]*");
    assert_eq!(err.text(), ":3");
    assert!(matches!(err.cause(), Cause::EmptyLocator));
  }

  #[test]
  fn test_reject_trailing_colon() {
    let err = parse("foo.feature:").expect_err("should reject");

    assert_eq!(err.to_string(), "foo.feature: is not valid. Try URI[:LINE]*");
    assert!(matches!(err.cause(), Cause::Locator(_)));
  }

  #[rstest]
  #[case("foo.feature:3:", LineError::Empty)]
  #[case("foo.feature::3", LineError::Empty)]
  #[case("foo.feature:3::4", LineError::Empty)]
  #[case("foo.feature:3:99999999999", LineError::OutOfRange { segment: "99999999999".to_string() })]
  fn test_reject_bad_lines(#[case] input: &str, #[case] expected: LineError) {
    let err = parse(input).expect_err("should reject");

    assert_eq!(err.to_string(), format!("{input} is not valid. Try URI[:LINE]*"));
    match err.cause() {
      Cause::Lines(actual) => assert_eq!(actual, &expected),
      other => panic!("expected a line error, got {other:?}"),
    }
  }

  #[rstest]
  #[case("foo.feature:3:x")]
  #[case("")]
  #[case("foo.txt:3")]
  #[case("features/")]
  fn test_reject(#[case] input: &str) {
    let err = parse(input).expect_err("should reject");
    assert_eq!(err.to_string(), format!("{input} is not valid. Try URI[:LINE]*"));
  }

  #[test]
  fn test_non_numeric_suffix_is_part_of_the_locator() {
    // `:x` doesn't look like a line marker, so the whole text is the locator
    let err = parse("foo.feature:3:x").expect_err("should reject");
    assert!(matches!(err.cause(), Cause::Locator(_)));
  }

  #[test]
  fn test_multiline_text_is_one_locator() {
    let err = parse("login\n.feature:3").expect_err("should reject");
    let Cause::Locator(source) = err.cause() else {
      panic!("expected a locator error, got {:?}", err.cause());
    };
    assert!(matches!(
      source.downcast_ref::<LocatorError>(),
      Some(LocatorError::NotAFeature { .. })
    ));
  }

  #[test]
  fn test_source_chain_reaches_resolver_error() {
    use std::error::Error as _;

    let err = parse("foo.txt").expect_err("should reject");
    let cause = err.source().expect("should have a cause");
    let root = cause.source().expect("should have a root cause");

    assert_eq!(cause.to_string(), "locator could not be resolved");
    assert_eq!(
      root.to_string(),
      "`foo.txt` does not reference a single feature file"
    );
  }

  #[test]
  fn test_custom_resolver() {
    let feature = FeatureWithLines::resolve(&Verbatim, "anything-goes:8:2").expect("should parse");
    assert_eq!(feature.uri(), "anything-goes");
    assert_eq!(feature.to_string(), "anything-goes:2:8");
  }

  #[test]
  fn test_custom_resolver_error_is_wrapped() {
    use std::error::Error as _;

    let err = FeatureWithLines::resolve(&Verbatim, "with space:1").expect_err("should reject");
    let root = err
      .source()
      .and_then(std::error::Error::source)
      .expect("should chain to the resolver error");

    assert!(root.downcast_ref::<VerbatimError>().is_some());
  }

  #[test]
  fn test_ambiguous_locator_ending_in_digits() {
    // A locator can't end in `:digits`; the digits are always taken as lines
    let feature = FeatureWithLines::resolve(&Verbatim, "server:8080").expect("should parse");
    assert_eq!(feature.uri(), "server");
    assert_eq!(feature.lines().iter().collect::<Vec<_>>(), vec![8080]);
  }

  #[test]
  #[cfg_attr(windows, ignore = "unix paths")]
  fn test_serde_uses_canonical_text() {
    let feature = parse("foo.feature:4:2:4").expect("should parse");
    let json = serde_json::to_string(&feature).expect("should serialize");
    assert_eq!(json, r#""file:///work/foo.feature:2:4""#);

    let back: FeatureWithLines = serde_json::from_str(&json).expect("should deserialize");
    assert_eq!(back, feature);
  }

  #[test]
  fn test_deserialize_rejects_malformed() {
    let result = serde_json::from_str::<FeatureWithLines>(r#"":3""#);
    assert!(result.is_err());
  }
}
