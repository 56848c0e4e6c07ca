// -----------------------------------------------------------------------------
// Ordered Navigation
// -----------------------------------------------------------------------------

use triomphe::Arc;

use crate::actor::ActorId;
use crate::core::TableCell;
use crate::core::TableId;
use crate::error::TableError;
use crate::lang::Term;

/// Smallest key in term order.
///
/// # Errors
///
/// Returns [`TableError::SetNotOrdered`] for unordered layouts and
/// [`TableError::EmptyTable`] when no records exist.
pub(crate) fn first(caller: ActorId, id: TableId) -> Result<Term, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let key: Term = cell.storage.read().first()?;

  Ok(key)
}

/// Largest key in term order.
///
/// # Errors
///
/// Returns [`TableError::SetNotOrdered`] for unordered layouts and
/// [`TableError::EmptyTable`] when no records exist.
pub(crate) fn last(caller: ActorId, id: TableId) -> Result<Term, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let key: Term = cell.storage.read().last()?;

  Ok(key)
}

/// Smallest key strictly greater than `key`; the probe need not exist in
/// the table.
///
/// # Errors
///
/// Returns [`TableError::SetNotOrdered`] for unordered layouts and
/// [`TableError::EndOfTable`] when no key follows.
pub(crate) fn next(caller: ActorId, id: TableId, key: &Term) -> Result<Term, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let key: Term = cell.storage.read().next(key)?;

  Ok(key)
}

/// Largest key strictly less than `key`; the probe need not exist in the
/// table.
///
/// # Errors
///
/// Returns [`TableError::SetNotOrdered`] for unordered layouts and
/// [`TableError::StartOfTable`] when no key precedes.
pub(crate) fn prev(caller: ActorId, id: TableId, key: &Term) -> Result<Term, TableError> {
  let cell: Arc<TableCell> = super::readable(caller, id)?;
  let key: Term = cell.storage.read().prev(key)?;

  Ok(key)
}
