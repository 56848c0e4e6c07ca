use parking_lot::RwLockReadGuard;

use crate::actor::ActorId;
use crate::core::TableCell;
use crate::core::TableExternal;
use crate::core::Visibility;
use crate::error::TableError;

// -----------------------------------------------------------------------------
// Access Gate
//
// Applied before every storage operation. Ownership always implies full
// access; visibility widens access for non-owning actors.
// -----------------------------------------------------------------------------

/// Checks that `caller` may read records from the table.
///
/// # Errors
///
/// Returns [`TableError::ReadProtected`] for a private table read by a
/// non-owner.
pub(crate) fn check_read(cell: &TableCell, caller: ActorId) -> Result<(), TableError> {
  let external: RwLockReadGuard<'_, TableExternal> = cell.external.read();

  match external.visibility {
    Visibility::Public | Visibility::Protected => Ok(()),
    Visibility::Private if external.owner == caller => Ok(()),
    Visibility::Private => Err(TableError::ReadProtected),
  }
}

/// Checks that `caller` may write records to the table.
///
/// # Errors
///
/// Returns [`TableError::WriteProtected`] for a non-public table written by
/// a non-owner.
pub(crate) fn check_write(cell: &TableCell, caller: ActorId) -> Result<(), TableError> {
  let external: RwLockReadGuard<'_, TableExternal> = cell.external.read();

  if external.visibility == Visibility::Public || external.owner == caller {
    Ok(())
  } else {
    Err(TableError::WriteProtected)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
