use crossbeam_utils::CachePadded;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::actor::ActorId;
use crate::core::Layout;
use crate::core::Storage;
use crate::core::TableFlags;
use crate::core::TableOptions;
use crate::core::TableRef;
use crate::core::Visibility;
use crate::lang::Atom;
use crate::lang::Term;

// -----------------------------------------------------------------------------
// Heir
// -----------------------------------------------------------------------------

/// Actor inheriting table ownership on owner termination, plus the payload
/// delivered with the hand-off.
#[derive(Clone, Debug)]
pub(crate) struct Heir {
  pub(crate) actor: ActorId,
  pub(crate) gift: Term,
}

// -----------------------------------------------------------------------------
// Table Cell
// -----------------------------------------------------------------------------

/// Frequently-read, never-written table attributes.
#[derive(Debug)]
pub(crate) struct TableReadOnly {
  pub(crate) table: TableRef,
  pub(crate) layout: Layout,
  pub(crate) key_pos: usize,
  pub(crate) flags: TableFlags,
}

/// Rarely-written table attributes guarded by their own lock.
///
/// Ownership reads (the access gate) and ownership transitions (hand-off,
/// heir transfer, rename) all serialize through this lock, so at most one
/// hand-off commits at a time per table.
#[derive(Debug)]
pub(crate) struct TableExternal {
  pub(crate) name: Option<Atom>,
  pub(crate) owner: ActorId,
  pub(crate) heir: Option<Heir>,
  pub(crate) visibility: Visibility,
}

/// Top-level table state container with three locking domains.
///
/// 1. **Read-only**: no lock needed, fixed at creation
/// 2. **External**: name/owner/heir/visibility behind one lock
/// 3. **Storage**: the row store behind its own lock
///
/// The two locked domains sit on separate cache lines so gate checks and
/// row traffic do not false-share. Lock order is external before storage
/// when both are held.
pub(crate) struct TableCell {
  pub(crate) readonly: TableReadOnly,
  pub(crate) external: CachePadded<RwLock<TableExternal>>,
  pub(crate) storage: CachePadded<RwLock<Storage>>,
}

impl TableCell {
  /// Creates a cell for validated `options`, owned by `owner`.
  pub(crate) fn new(options: TableOptions, owner: ActorId) -> Self {
    let mut flags: TableFlags = TableFlags::empty();

    flags.set(TableFlags::COMPACT, options.compact);
    flags.set(TableFlags::READ_CONCURRENCY, options.read_concurrency);
    flags.set(TableFlags::WRITE_CONCURRENCY, options.write_concurrency);

    let readonly: TableReadOnly = TableReadOnly {
      table: TableRef::next(),
      layout: options.layout,
      key_pos: options.key_pos,
      flags,
    };

    let external: TableExternal = TableExternal {
      name: options.name,
      owner,
      heir: options.heir.map(|(actor, gift)| Heir { actor, gift }),
      visibility: options.visibility,
    };

    Self {
      readonly,
      external: CachePadded::new(RwLock::new(external)),
      storage: CachePadded::new(RwLock::new(Storage::new(
        options.layout,
        options.key_pos,
      ))),
    }
  }

  /// Takes a point-in-time snapshot of the table's metadata.
  pub(crate) fn info(&self) -> TableInfo {
    let external: RwLockReadGuard<'_, TableExternal> = self.external.read();

    TableInfo {
      table: self.readonly.table,
      name: external.name,
      layout: self.readonly.layout,
      key_pos: self.readonly.key_pos,
      visibility: external.visibility,
      owner: external.owner,
      heir: external.heir.as_ref().map(|heir| heir.actor),
      size: self.storage.read().len(),
      compact: self.readonly.flags.contains(TableFlags::COMPACT),
      read_concurrency: self.readonly.flags.contains(TableFlags::READ_CONCURRENCY),
      write_concurrency: self.readonly.flags.contains(TableFlags::WRITE_CONCURRENCY),
    }
  }
}

impl Debug for TableCell {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("TableCell")
      .field("readonly", &self.readonly)
      .field("external", &*self.external.read())
      .field("size", &self.storage.read().len())
      .finish()
  }
}

// -----------------------------------------------------------------------------
// Table Info
// -----------------------------------------------------------------------------

/// Point-in-time metadata snapshot of a table.
///
/// Values may be stale immediately after returning due to concurrent
/// operations.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct TableInfo {
  /// Reference identity.
  pub table: TableRef,
  /// Registered name, if any.
  pub name: Option<Atom>,
  /// Storage discipline.
  pub layout: Layout,
  /// 1-indexed key position.
  pub key_pos: usize,
  /// Protection level.
  pub visibility: Visibility,
  /// Current owning actor.
  pub owner: ActorId,
  /// Configured heir, if any.
  pub heir: Option<ActorId>,
  /// Number of stored records.
  pub size: usize,
  /// Compact-encoding flag.
  pub compact: bool,
  /// Read-concurrency hint.
  pub read_concurrency: bool,
  /// Write-concurrency hint.
  pub write_concurrency: bool,
}
