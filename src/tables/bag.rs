use std::time::Duration;

use crate::actor::ActorId;
use crate::core::Layout;
use crate::core::TableId;
use crate::core::TableInfo;
use crate::core::TableOptions;
use crate::core::Visibility;
use crate::error::TableError;
use crate::lang::Atom;
use crate::lang::Record;
use crate::lang::Term;
use crate::tables::Table;
use crate::tables::Transfer;

// -----------------------------------------------------------------------------
// Bag Options
// -----------------------------------------------------------------------------

/// Creation options for a [`Bag`].
#[derive(Clone, Debug)]
pub struct BagOptions {
  /// Optional process-wide registered name.
  pub name: Option<Atom>,
  /// Who may read and write.
  pub visibility: Visibility,
  /// Actor inheriting ownership on owner termination, with its payload.
  pub heir: Option<(ActorId, Term)>,
  /// 1-indexed tuple slot holding each record's key.
  pub key_pos: usize,
  /// Allow fully identical records to coexist.
  pub duplicate: bool,
  /// Advisory hint: expect concurrent read bursts.
  pub read_concurrency: bool,
  /// Advisory hint: expect concurrent write bursts.
  pub write_concurrency: bool,
  /// Favor compact record encoding over raw speed.
  pub compact: bool,
}

impl Default for BagOptions {
  fn default() -> Self {
    let base: TableOptions = TableOptions::default();

    Self {
      name: None,
      visibility: base.visibility,
      heir: None,
      key_pos: base.key_pos,
      duplicate: false,
      read_concurrency: false,
      write_concurrency: false,
      compact: false,
    }
  }
}

impl From<BagOptions> for TableOptions {
  fn from(other: BagOptions) -> Self {
    Self {
      name: other.name,
      visibility: other.visibility,
      heir: other.heir,
      key_pos: other.key_pos,
      layout: if other.duplicate {
        Layout::DuplicateBag
      } else {
        Layout::Bag
      },
      read_concurrency: other.read_concurrency,
      write_concurrency: other.write_concurrency,
      compact: other.compact,
    }
  }
}

// -----------------------------------------------------------------------------
// @api - Bag
// -----------------------------------------------------------------------------

/// Multi-key table facade: many records per key, in insertion order.
///
/// The `duplicate` option additionally allows fully identical records to
/// coexist; without it, inserting an identical record is a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bag {
  table: Table,
}

impl Bag {
  /// Creates a multi-key table owned by the calling actor.
  pub fn create(options: BagOptions) -> Result<Self, TableError> {
    Table::create(options.into()).map(|table| Self { table })
  }

  /// Raising variant of [`Bag::create`].
  pub fn create_or_raise(options: BagOptions) -> Self {
    Self::create(options).unwrap_or_else(|error| error.raise())
  }

  /// Wraps an existing table, checking that its layout is multi-key.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::InvalidType`] when the table is a unique-key
  /// layout.
  pub fn wrap_existing(id: impl Into<TableId>) -> Result<Self, TableError> {
    let table: Table = Table::wrap(id)?;
    let info: TableInfo = table.info()?;

    if info.layout.is_unique() {
      return Err(TableError::InvalidType {
        expected: Layout::Bag,
        actual: info.layout,
      });
    }

    Ok(Self { table })
  }

  /// Returns the untyped handle for the full table contract.
  #[inline]
  pub const fn table(&self) -> &Table {
    &self.table
  }

  /// Appends one record under its key.
  pub fn insert(&self, record: impl Into<Record>) -> Result<(), TableError> {
    self.table.insert(record)
  }

  /// Raising variant of [`Bag::insert`].
  pub fn insert_or_raise(&self, record: impl Into<Record>) {
    self.table.insert_or_raise(record);
  }

  /// Inserts one record unless an identical record exists
  /// (duplicate-rejecting layout only).
  pub fn insert_new(&self, record: impl Into<Record>) -> Result<(), TableError> {
    self.table.insert_new(record)
  }

  /// Raising variant of [`Bag::insert_new`].
  pub fn insert_new_or_raise(&self, record: impl Into<Record>) {
    self.table.insert_new_or_raise(record);
  }

  /// Inserts a batch atomically.
  pub fn insert_all(&self, records: Vec<Record>) -> Result<(), TableError> {
    self.table.insert_all(records)
  }

  /// Raising variant of [`Bag::insert_all`].
  pub fn insert_all_or_raise(&self, records: Vec<Record>) {
    self.table.insert_all_or_raise(records);
  }

  /// Returns all records stored under `key`, in insertion order.
  pub fn lookup(&self, key: impl Into<Term>) -> Result<Vec<Record>, TableError> {
    self.table.lookup(key)
  }

  /// Raising variant of [`Bag::lookup`].
  pub fn lookup_or_raise(&self, key: impl Into<Term>) -> Vec<Record> {
    self.table.lookup_or_raise(key)
  }

  /// Returns `true` if any record is stored under `key`.
  pub fn member(&self, key: impl Into<Term>) -> Result<bool, TableError> {
    self.table.member(key)
  }

  /// Raising variant of [`Bag::member`].
  pub fn member_or_raise(&self, key: impl Into<Term>) -> bool {
    self.table.member_or_raise(key)
  }

  /// Removes and returns all records stored under `key`.
  pub fn take(&self, key: impl Into<Term>) -> Result<Vec<Record>, TableError> {
    self.table.take(key)
  }

  /// Raising variant of [`Bag::take`].
  pub fn take_or_raise(&self, key: impl Into<Term>) -> Vec<Record> {
    self.table.take_or_raise(key)
  }

  /// Removes every record stored under `key`.
  pub fn delete(&self, key: impl Into<Term>) -> Result<(), TableError> {
    self.table.delete(key)
  }

  /// Raising variant of [`Bag::delete`].
  pub fn delete_or_raise(&self, key: impl Into<Term>) {
    self.table.delete_or_raise(key);
  }

  /// Removes every copy of an exact record.
  pub fn delete_record(&self, record: impl Into<Record>) -> Result<(), TableError> {
    self.table.delete_record(record)
  }

  /// Raising variant of [`Bag::delete_record`].
  pub fn delete_record_or_raise(&self, record: impl Into<Record>) {
    self.table.delete_record_or_raise(record);
  }

  /// Removes every record; the table itself survives.
  pub fn delete_all(&self) -> Result<(), TableError> {
    self.table.delete_all()
  }

  /// Raising variant of [`Bag::delete_all`].
  pub fn delete_all_or_raise(&self) {
    self.table.delete_all_or_raise();
  }

  /// Deletes the table.
  pub fn delete_table(self) -> Result<(), TableError> {
    self.table.delete_table()
  }

  /// Raising variant of [`Bag::delete_table`].
  pub fn delete_table_or_raise(self) {
    self.table.delete_table_or_raise();
  }

  /// Materializes every record.
  pub fn to_list(&self) -> Result<Vec<Record>, TableError> {
    self.table.to_list()
  }

  /// Raising variant of [`Bag::to_list`].
  pub fn to_list_or_raise(&self) -> Vec<Record> {
    self.table.to_list_or_raise()
  }

  /// Returns the number of stored records.
  pub fn size(&self) -> Result<usize, TableError> {
    self.table.size()
  }

  /// Raising variant of [`Bag::size`].
  pub fn size_or_raise(&self) -> usize {
    self.table.size_or_raise()
  }

  /// Offers table ownership to `target`, carrying `gift`.
  pub fn give_away(&self, target: ActorId, gift: impl Into<Term>) -> Result<(), TableError> {
    self.table.give_away(target, gift)
  }

  /// Raising variant of [`Bag::give_away`].
  pub fn give_away_or_raise(&self, target: ActorId, gift: impl Into<Term>) {
    self.table.give_away_or_raise(target, gift);
  }

  /// Awaits an ownership transfer and wraps the received table as a `Bag`.
  ///
  /// # Errors
  ///
  /// Returns [`TableError::Timeout`] when `timeout` elapses first and
  /// [`TableError::InvalidType`] when the received table is not multi-key.
  pub async fn accept(timeout: Duration) -> Result<(Self, ActorId, Term), TableError> {
    let transfer: Transfer = Table::accept(timeout).await?;
    let wrapped: Self = Self::wrap_existing(transfer.table)?;

    Ok((wrapped, transfer.from, transfer.gift))
  }
}
