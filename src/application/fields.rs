//! Parsing helpers for optional command fields

/// Parses an optional field; blank strings count as absent
pub(crate) fn optional<T, E>(
  value: Option<String>,
  parse: impl FnOnce(String) -> Result<T, E>,
) -> Result<Option<T>, E> {
  match value {
    Some(value) if !value.trim().is_empty() => parse(value).map(Some),
    _ => Ok(None),
  }
}

/// Parses a partial-update field: `None` leaves the value untouched,
/// `Some(None)` or a blank string clears it
pub(crate) fn nullable<T, E>(
  value: Option<Option<String>>,
  parse: impl FnOnce(String) -> Result<T, E>,
) -> Result<Option<Option<T>>, E> {
  value.map(|inner| optional(inner, parse)).transpose()
}
