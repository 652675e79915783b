use std::fmt;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use nom::{
  IResult, Parser,
  branch::alt,
  bytes::complete::{take_while, take_while1},
  character::complete::{char, satisfy},
  combinator::recognize,
  multi::many0_count,
  sequence::terminated,
};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::LocatorError;
use crate::uri::FeatureUri;

const CLASSPATH_SCHEME: &str = "classpath";
const FILE_SCHEME: &str = "file";
const FEATURE_EXTENSION: &str = ".feature";

/// Characters escaped in the path of a `file` URI; `/` separates segments
const PATH: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'#')
  .add(b'%')
  .add(b'<')
  .add(b'>')
  .add(b'?')
  .add(b'[')
  .add(b'\\')
  .add(b']')
  .add(b'^')
  .add(b'`')
  .add(b'{')
  .add(b'|')
  .add(b'}');

/// Turns the locator half of an identifier into a resource identifier.
///
/// Implementations must reject malformed locators rather than coerce them,
/// and must hand back identifiers whose equality is stable.
pub trait LocatorResolver {
  type Resource: Clone + Eq + Hash + fmt::Display;
  type Error: std::error::Error + Send + Sync + 'static;

  fn resolve(&self, locator: &str) -> Result<Self::Resource, Self::Error>;
}

/// Resolves paths and URIs into a [`FeatureUri`].
///
/// - `classpath:com/example/login.feature` stays on the classpath
/// - anything starting with a URI scheme (`file:`, `jar:`, ...) is taken as-is
/// - everything else is a file path, made absolute against the base directory
///   (or the working directory when there is none) and turned into a `file` URI
///
/// Whatever the form, it has to name a single `.feature` file.
#[derive(Debug, Clone, Default)]
pub struct FeatureUriResolver {
  base_dir: Option<PathBuf>,
}

impl FeatureUriResolver {
  pub fn new() -> Self {
    Self::default()
  }

  /// Resolve relative paths against `base_dir` instead of the working directory
  #[must_use]
  pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
    self.base_dir = Some(base_dir.into());
    self
  }

  pub fn base_dir(&self) -> Option<&Path> {
    self.base_dir.as_deref()
  }

  fn resolve_path(&self, locator: &str) -> Result<FeatureUri, LocatorError> {
    let path = self
      .base_dir
      .as_ref()
      .map_or_else(|| PathBuf::from(locator), |base| base.join(locator));

    let absolute = std::path::absolute(&path).map_err(|source| LocatorError::Path {
      locator: locator.to_string(),
      source,
    })?;

    Ok(FeatureUri::new(
      FILE_SCHEME.to_string(),
      format!("//{}", to_uri_path(&absolute)),
    ))
  }
}

impl LocatorResolver for FeatureUriResolver {
  type Resource = FeatureUri;
  type Error = LocatorError;

  fn resolve(&self, locator: &str) -> Result<FeatureUri, LocatorError> {
    if locator.is_empty() {
      return Err(LocatorError::Empty);
    }

    let uri = match parse_scheme(locator) {
      Ok((rest, scheme)) if !is_drive_letter(scheme, rest) => {
        let rest = if scheme == CLASSPATH_SCHEME {
          rest.trim_start_matches('/')
        } else {
          rest
        };
        if rest.is_empty() {
          return Err(LocatorError::MissingSchemeSpecificPart {
            locator: locator.to_string(),
          });
        }
        if let Some(index) = invalid_uri_index(rest) {
          return Err(LocatorError::InvalidUri {
            locator: locator.to_string(),
            index: locator.len() - rest.len() + index,
          });
        }
        FeatureUri::new(scheme.to_string(), rest.to_string())
      }
      _ => self.resolve_path(locator)?,
    };

    if !uri.scheme_specific_part().ends_with(FEATURE_EXTENSION) {
      return Err(LocatorError::NotAFeature {
        locator: locator.to_string(),
      });
    }

    tracing::trace!(locator, %uri, "resolved locator");
    Ok(uri)
  }
}

/// A URI scheme followed by its colon, e.g. `classpath:`
fn parse_scheme(input: &str) -> IResult<&str, &str> {
  terminated(
    recognize((
      satisfy(|c: char| c.is_ascii_alphabetic()),
      take_while(|c: char| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
    )),
    char(':'),
  )
  .parse(input)
}

/// Byte offset of the first character that can't appear in a URI, if any.
///
/// Raw spaces, controls and the other unwise ASCII characters are rejected, as
/// is a `%` that doesn't start a two digit hex escape.
fn invalid_uri_index(input: &str) -> Option<usize> {
  let escape = recognize((
    char('%'),
    satisfy(|c: char| c.is_ascii_hexdigit()),
    satisfy(|c: char| c.is_ascii_hexdigit()),
  ));
  let mut uri_text = recognize(many0_count(alt((take_while1(is_uri_char), escape))));

  let result: IResult<&str, &str> = uri_text.parse(input);
  match result {
    Ok(("", _)) => None,
    Ok((rest, _)) => Some(input.len() - rest.len()),
    Err(_) => Some(0),
  }
}

fn is_uri_char(c: char) -> bool {
  !c.is_control()
    && !matches!(
      c,
      ' ' | '"' | '%' | '<' | '>' | '\\' | '^' | '`' | '{' | '|' | '}'
    )
}

/// `C:\features\login.feature` is a path, not a URI with scheme `C`
fn is_drive_letter(scheme: &str, rest: &str) -> bool {
  cfg!(windows) && scheme.len() == 1 && rest.starts_with(['\\', '/'])
}

/// Forward slashes, a leading slash and percent-encoded segments
fn to_uri_path(path: &Path) -> String {
  let mut text = path.to_string_lossy().into_owned();
  if std::path::MAIN_SEPARATOR != '/' {
    text = text.replace(std::path::MAIN_SEPARATOR, "/");
  }
  if !text.starts_with('/') {
    text.insert(0, '/');
  }
  utf8_percent_encode(&text, PATH).to_string()
}
