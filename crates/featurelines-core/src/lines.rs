use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

use nom::{Parser, character::complete::u32 as line_number, combinator::all_consuming};

use crate::error::LineError;

/// The line numbers pinned by an identifier, e.g. `3` and `7` in `login.feature:7:3`.
///
/// Always ascending and free of duplicates, however the lines were supplied.
/// There is no way to mutate a `LineSet` once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineSet(BTreeSet<u32>);

impl LineSet {
  /// An empty set, i.e. the whole feature
  pub fn new() -> Self {
    Self(BTreeSet::new())
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn contains(&self, line: u32) -> bool {
    self.0.contains(&line)
  }

  /// The lowest line number, if any
  pub fn first(&self) -> Option<u32> {
    self.0.first().copied()
  }

  /// The highest line number, if any
  pub fn last(&self) -> Option<u32> {
    self.0.last().copied()
  }

  /// Line numbers in ascending order
  pub fn iter(&self) -> impl DoubleEndedIterator<Item = u32> + ExactSizeIterator + '_ {
    self.0.iter().copied()
  }

  /// Read-only view of the underlying ordered set
  pub const fn as_set(&self) -> &BTreeSet<u32> {
    &self.0
  }
}

impl FromIterator<u32> for LineSet {
  fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
    Self(iter.into_iter().collect())
  }
}

impl<'a> IntoIterator for &'a LineSet {
  type Item = &'a u32;
  type IntoIter = btree_set::Iter<'a, u32>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

/// Renders the `:LINE` suffix, e.g. `:3:7`. An empty set renders as nothing.
impl fmt::Display for LineSet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for line in &self.0 {
      write!(f, ":{line}")?;
    }
    Ok(())
  }
}

/// Parse the colon separated digits that follow a locator, e.g. `3:7:3`
///
/// Every segment has to be a plain base-10 `u32`; one bad segment fails the
/// whole set.
pub fn parse_lines(input: &str) -> Result<LineSet, LineError> {
  tracing::trace!(input, "parsing line markers");
  input.split(':').map(parse_line_number).collect()
}

/// A single segment, with no sign, whitespace or other decoration
fn parse_line_number(segment: &str) -> Result<u32, LineError> {
  if segment.is_empty() {
    return Err(LineError::Empty);
  }

  all_consuming(line_number::<_, nom::error::Error<&str>>)
    .parse(segment)
    .map(|(_, line)| line)
    .map_err(|_| {
      // nom rejects digit runs that don't fit in a u32 the same way as garbage
      if segment.bytes().all(|b| b.is_ascii_digit()) {
        LineError::OutOfRange {
          segment: segment.to_string(),
        }
      } else {
        LineError::NotANumber {
          segment: segment.to_string(),
        }
      }
    })
}
