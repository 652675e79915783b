use std::fmt;
use std::str::FromStr;

use crate::error::LocatorError;
use crate::resolve::{FeatureUriResolver, LocatorResolver};

/// An absolute URI pointing at a single feature, e.g. `file:///src/login.feature`
/// or `classpath:com/example/login.feature`.
///
/// Produced by [`FeatureUriResolver`]; compares and hashes on its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureUri {
  /// e.g. `file`, `classpath`
  scheme: String,
  /// Everything after the first colon, e.g. `///src/login.feature`
  scheme_specific_part: String,
}

impl FeatureUri {
  pub(crate) fn new(scheme: String, scheme_specific_part: String) -> Self {
    Self {
      scheme,
      scheme_specific_part,
    }
  }

  pub fn scheme(&self) -> &str {
    &self.scheme
  }

  pub fn scheme_specific_part(&self) -> &str {
    &self.scheme_specific_part
  }

  /// The path of a hierarchical URI (`/src/login.feature` for
  /// `file:///src/login.feature`), otherwise the scheme specific part.
  pub fn path(&self) -> &str {
    self
      .scheme_specific_part
      .strip_prefix("//")
      .map_or(self.scheme_specific_part.as_str(), |rest| {
        rest.find('/').map_or("", |slash| &rest[slash..])
      })
  }

  /// Whether this points at a file on disk rather than e.g. the classpath
  pub fn is_file(&self) -> bool {
    self.scheme == "file"
  }
}

impl fmt::Display for FeatureUri {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.scheme, self.scheme_specific_part)
  }
}

/// Resolves against the working directory, see [`FeatureUriResolver`]
impl FromStr for FeatureUri {
  type Err = LocatorError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    FeatureUriResolver::default().resolve(s)
  }
}

impl serde::Serialize for FeatureUri {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> serde::Deserialize<'de> for FeatureUri {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(serde::de::Error::custom)
  }
}
