//! Error types for identifier parsing.

/// Returned by [`crate::FeatureWithLines::parse`] and friends.
///
/// The message always names the offending text; the underlying reason is
/// available through [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("{text} is not valid. Try URI[:LINE]*")]
  MalformedIdentifier {
    /// The full text that was handed to the parser
    text: String,
    #[source]
    cause: Cause,
  },
}

impl Error {
  pub(crate) fn malformed(text: &str, cause: impl Into<Cause>) -> Self {
    Self::MalformedIdentifier {
      text: text.to_string(),
      cause: cause.into(),
    }
  }

  /// The text that failed to parse
  pub fn text(&self) -> &str {
    match self {
      Self::MalformedIdentifier { text, .. } => text,
    }
  }

  /// Why the text was rejected
  pub fn cause(&self) -> &Cause {
    match self {
      Self::MalformedIdentifier { cause, .. } => cause,
    }
  }
}

/// The reason behind an [`Error::MalformedIdentifier`]
#[derive(Debug, thiserror::Error)]
pub enum Cause {
  /// Text such as `:3`, where nothing precedes the line markers
  #[error("locator may not be empty")]
  EmptyLocator,

  #[error(transparent)]
  Lines(#[from] LineError),

  /// Whatever the locator resolver reported
  #[error("locator could not be resolved")]
  Locator(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A `:LINE` segment that isn't a line number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
  /// Doubled, leading or trailing colon
  #[error("line number may not be empty")]
  Empty,

  #[error("line number `{segment}` is not a base-10 integer")]
  NotANumber { segment: String },

  #[error("line number `{segment}` is out of range (max {})", u32::MAX)]
  OutOfRange { segment: String },
}

/// Failures of the default [`crate::FeatureUriResolver`]
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
  #[error("feature identifier may not be empty")]
  Empty,

  /// A scheme with nothing after it, e.g. `classpath:`
  #[error("`{locator}` has a scheme but no scheme specific part")]
  MissingSchemeSpecificPart { locator: String },

  /// A raw space, a stray `%` or similar in text that claims to be a URI
  #[error("`{locator}` is not a valid URI: illegal character at index {index}")]
  InvalidUri { locator: String, index: usize },

  #[error("`{locator}` does not reference a single feature file")]
  NotAFeature { locator: String },

  #[error("`{locator}` could not be made absolute: {source}")]
  Path {
    locator: String,
    #[source]
    source: std::io::Error,
  },
}
