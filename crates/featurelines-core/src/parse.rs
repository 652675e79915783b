/// Split `URI[:LINE]*` text into its locator and its line markers
///
/// Returns `None` when the text doesn't end in line markers, in which case
/// the whole text is the locator. Otherwise returns `(locator, lines)` where
/// `lines` is the colon separated digits without the leading colon, e.g.
/// `("features/login.feature", "12:30")`.
///
/// The locator is kept as short as possible: the split happens at the first
/// colon of the trailing run of digits and colons, as long as something
/// follows it. A locator that itself ends in `:digits` can't be written
/// this way. The locator may come back empty (`:3`); callers reject that.
/// A locator spanning more than one line never splits.
///
/// ```
/// use featurelines_core::parse::split_line_markers;
///
/// assert_eq!(split_line_markers("login.feature:3:7"), Some(("login.feature", "3:7")));
/// assert_eq!(split_line_markers("login.feature"), None);
/// assert_eq!(split_line_markers("classpath:login.feature"), None);
/// ```
pub fn split_line_markers(input: &str) -> Option<(&str, &str)> {
  let head = input.trim_end_matches(is_marker_char);
  let tail = &input[head.len()..];

  let colon = tail.find(':')?;
  let lines = &tail[colon + 1..];
  if lines.is_empty() {
    return None;
  }

  let locator = &input[..head.len() + colon];
  if locator.contains(is_line_terminator) {
    return None;
  }
  tracing::trace!(locator, lines, "split line markers");
  Some((locator, lines))
}

const fn is_marker_char(c: char) -> bool {
  c.is_ascii_digit() || c == ':'
}

const fn is_line_terminator(c: char) -> bool {
  matches!(c, '\n' | '\r' | '\u{0085}' | '\u{2028}' | '\u{2029}')
}
