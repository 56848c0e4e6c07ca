use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::time::Duration;

use crate::actor::Actor;
use crate::actor::ActorId;
use crate::core::TableId;
use crate::core::TableInfo;
use crate::core::TableOptions;
use crate::core::TableRef;
use crate::core::TableRegistry;
use crate::core::Visibility;
use crate::error::TableError;
use crate::lang::Atom;
use crate::lang::Record;
use crate::lang::Term;
use crate::ops;
use crate::select::Bindings;
use crate::select::Continuation;
use crate::select::MatchSpec;
use crate::select::Pattern;

// -----------------------------------------------------------------------------
// Transfer
// -----------------------------------------------------------------------------

/// A completed ownership hand-off received by [`Table::accept`].
#[derive(Debug)]
#[non_exhaustive]
pub struct Transfer {
  /// The table whose ownership moved to the caller.
  pub table: Table,
  /// The previous owner.
  pub from: ActorId,
  /// The payload sent alongside the hand-off.
  pub gift: Term,
}

// -----------------------------------------------------------------------------
// @api - Table
// -----------------------------------------------------------------------------

/// Untyped handle exposing the full table contract.
///
/// Every operation runs on behalf of the calling actor (the task-local
/// installed by [`Actor::spawn`] or [`Actor::run`]) and returns its failure
/// reason as a value; each operation also has a `*_or_raise` variant that
/// converts the failure into a fatal panic.
///
/// The typed facades ([`Set`], [`Bag`], [`KeyValueSet`]) constrain creation
/// options and record shapes, then delegate here.
///
/// [`Set`]: crate::tables::Set
/// [`Bag`]: crate::tables::Bag
/// [`KeyValueSet`]: crate::tables::KeyValueSet
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Table {
  table: TableRef,
}

impl Table {
  // ---------------------------------------------------------------------------
  // Lifecycle
  // ---------------------------------------------------------------------------

  /// Creates a table owned by the calling actor.
  pub fn create(options: TableOptions) -> Result<Self, TableError> {
    ops::create(Actor::this(), options).map(|table| Self { table })
  }

  /// Raising variant of [`Table::create`].
  pub fn create_or_raise(options: TableOptions) -> Self {
    Self::create(options).unwrap_or_else(|error| error.raise())
  }

  /// Wraps an existing table by reference or registered name.
  pub fn wrap(id: impl Into<TableId>) -> Result<Self, TableError> {
    TableRegistry::resolve(id.into()).map(|cell| Self {
      table: cell.readonly.table,
    })
  }

  /// Looks up a table by registered name.
  pub fn whereis(name: impl Into<Atom>) -> Option<Self> {
    ops::whereis(name.into()).map(|table| Self { table })
  }

  /// Returns the table's reference identity.
  #[inline]
  pub const fn table_ref(&self) -> TableRef {
    self.table
  }

  #[inline]
  const fn id(&self) -> TableId {
    TableId::Ref(self.table)
  }

  /// Takes a point-in-time metadata snapshot.
  pub fn info(&self) -> Result<TableInfo, TableError> {
    ops::info(self.id())
  }

  /// Raising variant of [`Table::info`].
  pub fn info_or_raise(&self) -> TableInfo {
    self.info().unwrap_or_else(|error| error.raise())
  }

  /// Rebinds the table's name identity; the reference identity never
  /// changes.
  pub fn rename(&self, name: impl Into<Atom>) -> Result<Atom, TableError> {
    ops::rename(Actor::this(), self.id(), name.into())
  }

  /// Raising variant of [`Table::rename`].
  pub fn rename_or_raise(&self, name: impl Into<Atom>) -> Atom {
    self.rename(name).unwrap_or_else(|error| error.raise())
  }

  /// Replaces the heir configuration. Owner-only.
  pub fn set_heir(&self, heir: Option<(ActorId, Term)>) -> Result<(), TableError> {
    ops::set_heir(Actor::this(), self.id(), heir)
  }

  /// Raising variant of [`Table::set_heir`].
  pub fn set_heir_or_raise(&self, heir: Option<(ActorId, Term)>) {
    self.set_heir(heir).unwrap_or_else(|error| error.raise())
  }

  /// Replaces the protection level. Owner-only.
  pub fn set_visibility(&self, visibility: Visibility) -> Result<(), TableError> {
    ops::set_visibility(Actor::this(), self.id(), visibility)
  }

  /// Raising variant of [`Table::set_visibility`].
  pub fn set_visibility_or_raise(&self, visibility: Visibility) {
    self.set_visibility(visibility).unwrap_or_else(|error| error.raise())
  }

  /// Deletes the table and drops its name binding.
  pub fn delete_table(self) -> Result<(), TableError> {
    ops::delete_table(Actor::this(), self.id())
  }

  /// Raising variant of [`Table::delete_table`].
  pub fn delete_table_or_raise(self) {
    self.delete_table().unwrap_or_else(|error| error.raise())
  }

  // ---------------------------------------------------------------------------
  // Insertion
  // ---------------------------------------------------------------------------

  /// Inserts one record; unique-key layouts replace on key collision.
  pub fn insert(&self, record: impl Into<Record>) -> Result<(), TableError> {
    ops::insert(Actor::this(), self.id(), record.into())
  }

  /// Raising variant of [`Table::insert`].
  pub fn insert_or_raise(&self, record: impl Into<Record>) {
    self.insert(record).unwrap_or_else(|error| error.raise())
  }

  /// Inserts one record unless a conflicting entry exists.
  pub fn insert_new(&self, record: impl Into<Record>) -> Result<(), TableError> {
    ops::insert_new(Actor::this(), self.id(), record.into())
  }

  /// Raising variant of [`Table::insert_new`].
  pub fn insert_new_or_raise(&self, record: impl Into<Record>) {
    self.insert_new(record).unwrap_or_else(|error| error.raise())
  }

  /// Inserts a batch atomically; readers observe none or all of it.
  pub fn insert_all(&self, records: Vec<Record>) -> Result<(), TableError> {
    ops::insert_all(Actor::this(), self.id(), records)
  }

  /// Raising variant of [`Table::insert_all`].
  pub fn insert_all_or_raise(&self, records: Vec<Record>) {
    self.insert_all(records).unwrap_or_else(|error| error.raise())
  }

  /// Inserts a batch atomically, unless any record conflicts.
  pub fn insert_all_new(&self, records: Vec<Record>) -> Result<(), TableError> {
    ops::insert_all_new(Actor::this(), self.id(), records)
  }

  /// Raising variant of [`Table::insert_all_new`].
  pub fn insert_all_new_or_raise(&self, records: Vec<Record>) {
    self.insert_all_new(records).unwrap_or_else(|error| error.raise())
  }

  // ---------------------------------------------------------------------------
  // Lookup
  // ---------------------------------------------------------------------------

  /// Returns all records stored under `key`, in insertion order for
  /// multi-key layouts.
  pub fn lookup(&self, key: impl Into<Term>) -> Result<Vec<Record>, TableError> {
    ops::lookup(Actor::this(), self.id(), &key.into())
  }

  /// Raising variant of [`Table::lookup`].
  pub fn lookup_or_raise(&self, key: impl Into<Term>) -> Vec<Record> {
    self.lookup(key).unwrap_or_else(|error| error.raise())
  }

  /// Returns the single record stored under `key`.
  pub fn lookup_one(&self, key: impl Into<Term>) -> Result<Record, TableError> {
    ops::lookup_one(Actor::this(), self.id(), &key.into())
  }

  /// Raising variant of [`Table::lookup_one`].
  pub fn lookup_one_or_raise(&self, key: impl Into<Term>) -> Record {
    self.lookup_one(key).unwrap_or_else(|error| error.raise())
  }

  /// Projects element `position` from every record stored under `key`.
  pub fn lookup_element(
    &self,
    key: impl Into<Term>,
    position: usize,
  ) -> Result<Vec<Term>, TableError> {
    ops::lookup_element(Actor::this(), self.id(), &key.into(), position)
  }

  /// Raising variant of [`Table::lookup_element`].
  pub fn lookup_element_or_raise(&self, key: impl Into<Term>, position: usize) -> Vec<Term> {
    self.lookup_element(key, position).unwrap_or_else(|error| error.raise())
  }

  /// Returns `true` if any record is stored under `key`.
  pub fn member(&self, key: impl Into<Term>) -> Result<bool, TableError> {
    ops::member(Actor::this(), self.id(), &key.into())
  }

  /// Raising variant of [`Table::member`].
  pub fn member_or_raise(&self, key: impl Into<Term>) -> bool {
    self.member(key).unwrap_or_else(|error| error.raise())
  }

  /// Removes and returns all records stored under `key`.
  pub fn take(&self, key: impl Into<Term>) -> Result<Vec<Record>, TableError> {
    ops::take(Actor::this(), self.id(), &key.into())
  }

  /// Raising variant of [`Table::take`].
  pub fn take_or_raise(&self, key: impl Into<Term>) -> Vec<Record> {
    self.take(key).unwrap_or_else(|error| error.raise())
  }

  /// Materializes every record: term order for the ordered layout,
  /// otherwise an unspecified order stable between mutations.
  pub fn to_list(&self) -> Result<Vec<Record>, TableError> {
    ops::to_list(Actor::this(), self.id())
  }

  /// Raising variant of [`Table::to_list`].
  pub fn to_list_or_raise(&self) -> Vec<Record> {
    self.to_list().unwrap_or_else(|error| error.raise())
  }

  /// Returns the number of stored records.
  pub fn size(&self) -> Result<usize, TableError> {
    ops::size(Actor::this(), self.id())
  }

  /// Raising variant of [`Table::size`].
  pub fn size_or_raise(&self) -> usize {
    self.size().unwrap_or_else(|error| error.raise())
  }

  // ---------------------------------------------------------------------------
  // Deletion
  // ---------------------------------------------------------------------------

  /// Removes every record stored under `key`.
  pub fn delete(&self, key: impl Into<Term>) -> Result<(), TableError> {
    ops::delete_key(Actor::this(), self.id(), &key.into())
  }

  /// Raising variant of [`Table::delete`].
  pub fn delete_or_raise(&self, key: impl Into<Term>) {
    self.delete(key).unwrap_or_else(|error| error.raise())
  }

  /// Removes every copy of an exact record.
  pub fn delete_record(&self, record: impl Into<Record>) -> Result<(), TableError> {
    ops::delete_record(Actor::this(), self.id(), &record.into())
  }

  /// Raising variant of [`Table::delete_record`].
  pub fn delete_record_or_raise(&self, record: impl Into<Record>) {
    self.delete_record(record).unwrap_or_else(|error| error.raise())
  }

  /// Removes every record; the table itself survives.
  pub fn delete_all(&self) -> Result<(), TableError> {
    ops::delete_all(Actor::this(), self.id())
  }

  /// Raising variant of [`Table::delete_all`].
  pub fn delete_all_or_raise(&self) {
    self.delete_all().unwrap_or_else(|error| error.raise())
  }

  // ---------------------------------------------------------------------------
  // Match / Select
  // ---------------------------------------------------------------------------

  /// Full-scan match: one binding list per matching record, in the table's
  /// natural order.
  pub fn match_pattern(&self, pattern: &Pattern) -> Result<Vec<Bindings>, TableError> {
    ops::match_pattern(Actor::this(), self.id(), pattern)
  }

  /// Raising variant of [`Table::match_pattern`].
  pub fn match_pattern_or_raise(&self, pattern: &Pattern) -> Vec<Bindings> {
    self.match_pattern(pattern).unwrap_or_else(|error| error.raise())
  }

  /// Full-scan match returning whole records instead of bindings.
  pub fn match_records(&self, pattern: &Pattern) -> Result<Vec<Record>, TableError> {
    ops::match_records(Actor::this(), self.id(), pattern)
  }

  /// Raising variant of [`Table::match_records`].
  pub fn match_records_or_raise(&self, pattern: &Pattern) -> Vec<Record> {
    self.match_records(pattern).unwrap_or_else(|error| error.raise())
  }

  /// Paginated match: at most `limit` binding lists plus a continuation.
  pub fn match_limit(
    &self,
    pattern: &Pattern,
    limit: usize,
  ) -> Result<(Vec<Bindings>, Continuation), TableError> {
    ops::match_limit(Actor::this(), self.id(), pattern, limit)
  }

  /// Raising variant of [`Table::match_limit`].
  pub fn match_limit_or_raise(
    &self,
    pattern: &Pattern,
    limit: usize,
  ) -> (Vec<Bindings>, Continuation) {
    self.match_limit(pattern, limit).unwrap_or_else(|error| error.raise())
  }

  /// Full-scan select with guard evaluation.
  pub fn select(&self, spec: &MatchSpec) -> Result<Vec<Bindings>, TableError> {
    ops::select(Actor::this(), self.id(), spec)
  }

  /// Raising variant of [`Table::select`].
  pub fn select_or_raise(&self, spec: &MatchSpec) -> Vec<Bindings> {
    self.select(spec).unwrap_or_else(|error| error.raise())
  }

  /// Paginated select: at most `limit` binding lists plus a continuation.
  pub fn select_limit(
    &self,
    spec: &MatchSpec,
    limit: usize,
  ) -> Result<(Vec<Bindings>, Continuation), TableError> {
    ops::select_limit(Actor::this(), self.id(), spec, limit)
  }

  /// Raising variant of [`Table::select_limit`].
  pub fn select_limit_or_raise(
    &self,
    spec: &MatchSpec,
    limit: usize,
  ) -> (Vec<Bindings>, Continuation) {
    self.select_limit(spec, limit).unwrap_or_else(|error| error.raise())
  }

  /// Counts records satisfying `spec`.
  pub fn select_count(&self, spec: &MatchSpec) -> Result<usize, TableError> {
    ops::select_count(Actor::this(), self.id(), spec)
  }

  /// Raising variant of [`Table::select_count`].
  pub fn select_count_or_raise(&self, spec: &MatchSpec) -> usize {
    self.select_count(spec).unwrap_or_else(|error| error.raise())
  }

  /// Atomically removes every record satisfying `spec`; returns the
  /// removed count.
  pub fn select_delete(&self, spec: &MatchSpec) -> Result<usize, TableError> {
    ops::select_delete(Actor::this(), self.id(), spec)
  }

  /// Raising variant of [`Table::select_delete`].
  pub fn select_delete_or_raise(&self, spec: &MatchSpec) -> usize {
    self.select_delete(spec).unwrap_or_else(|error| error.raise())
  }

  /// Resumes a paginated match or select exactly where it left off.
  ///
  /// A continuation is valid only against the table and query that
  /// produced it; resuming an exhausted continuation yields an empty page.
  pub fn resume(continuation: Continuation) -> Result<(Vec<Bindings>, Continuation), TableError> {
    ops::resume(Actor::this(), continuation)
  }

  /// Raising variant of [`Table::resume`].
  pub fn resume_or_raise(continuation: Continuation) -> (Vec<Bindings>, Continuation) {
    Self::resume(continuation).unwrap_or_else(|error| error.raise())
  }

  // ---------------------------------------------------------------------------
  // Ordered Navigation
  // ---------------------------------------------------------------------------

  /// Smallest key in term order. Ordered layout only.
  pub fn first(&self) -> Result<Term, TableError> {
    ops::first(Actor::this(), self.id())
  }

  /// Raising variant of [`Table::first`].
  pub fn first_or_raise(&self) -> Term {
    self.first().unwrap_or_else(|error| error.raise())
  }

  /// Largest key in term order. Ordered layout only.
  pub fn last(&self) -> Result<Term, TableError> {
    ops::last(Actor::this(), self.id())
  }

  /// Raising variant of [`Table::last`].
  pub fn last_or_raise(&self) -> Term {
    self.last().unwrap_or_else(|error| error.raise())
  }

  /// Smallest key strictly greater than `key`; the probe need not exist.
  pub fn next(&self, key: impl Into<Term>) -> Result<Term, TableError> {
    ops::next(Actor::this(), self.id(), &key.into())
  }

  /// Raising variant of [`Table::next`].
  pub fn next_or_raise(&self, key: impl Into<Term>) -> Term {
    self.next(key).unwrap_or_else(|error| error.raise())
  }

  /// Largest key strictly less than `key`; the probe need not exist.
  pub fn prev(&self, key: impl Into<Term>) -> Result<Term, TableError> {
    ops::prev(Actor::this(), self.id(), &key.into())
  }

  /// Raising variant of [`Table::prev`].
  pub fn prev_or_raise(&self, key: impl Into<Term>) -> Term {
    self.prev(key).unwrap_or_else(|error| error.raise())
  }

  // ---------------------------------------------------------------------------
  // Ownership
  // ---------------------------------------------------------------------------

  /// Offers table ownership to `target`, carrying `gift`.
  ///
  /// Ownership does not change until the target accepts.
  pub fn give_away(&self, target: ActorId, gift: impl Into<Term>) -> Result<(), TableError> {
    ops::give_away(Actor::this(), self.id(), target, gift.into())
  }

  /// Raising variant of [`Table::give_away`].
  pub fn give_away_or_raise(&self, target: ActorId, gift: impl Into<Term>) {
    self.give_away(target, gift).unwrap_or_else(|error| error.raise())
  }

  /// Awaits an ownership transfer addressed to the calling actor, bounded
  /// by `timeout`.
  ///
  /// On timeout no side effect remains; stale offers are dropped and the
  /// wait continues within the remaining time.
  pub async fn accept(timeout: Duration) -> Result<Transfer, TableError> {
    let caller: ActorId = Actor::this();
    let (table, from, gift) = ops::accept(caller, timeout).await?;

    Ok(Transfer {
      table: Self { table },
      from,
      gift,
    })
  }

  /// Raising variant of [`Table::accept`].
  pub async fn accept_or_raise(timeout: Duration) -> Transfer {
    Self::accept(timeout).await.unwrap_or_else(|error| error.raise())
  }
}

impl Debug for Table {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(&self.table, f)
  }
}

impl Display for Table {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(&self.table, f)
  }
}

impl From<Table> for TableId {
  #[inline]
  fn from(other: Table) -> Self {
    Self::Ref(other.table)
  }
}
