//! Physical record storage for one table.
//!
//! Two row stores back the four layout disciplines:
//!
//! - [`HashedRows`]: bucket map keyed by record key, with a monotonic
//!   scan index giving iteration an order that is unspecified but stable
//!   between mutations. Backs `Set`, `Bag`, and `DuplicateBag`.
//! - [`OrderedRows`]: tree map in term order. Backs `OrderedSet`.
//!
//! Both stores support resumable scans through [`ScanPos`] tokens: a token
//! names the last-visited record, and resumption continues strictly after
//! it. Tokens survive concurrent mutation without corruption; records may
//! be skipped or re-seen, never torn.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::ops::ControlFlow;

use crate::consts;
use crate::core::Layout;
use crate::error::TableError;
use crate::lang::Record;
use crate::lang::Term;

// -----------------------------------------------------------------------------
// Scan Position
// -----------------------------------------------------------------------------

/// Token naming the last-visited record of a paginated scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ScanPos {
  /// Position in a hashed store: bucket sequence number plus row offset.
  Hashed { seq: u64, row: usize },
  /// Position in an ordered store: the last-visited key.
  Ordered { key: Term },
}

// -----------------------------------------------------------------------------
// Hashed Rows
// -----------------------------------------------------------------------------

#[derive(Debug)]
struct Bucket {
  seq: u64,
  rows: Vec<Record>,
}

/// Unordered row store with a stable scan index.
///
/// Each distinct key occupies one bucket; buckets are scanned in the order
/// their keys first appeared. Within a bucket, rows keep insertion order.
#[derive(Debug)]
pub(crate) struct HashedRows {
  layout: Layout,
  key_pos: usize,
  rows: HashMap<Term, Bucket>,
  scan: BTreeMap<u64, Term>,
  next_seq: u64,
  size: usize,
}

impl HashedRows {
  fn new(layout: Layout, key_pos: usize) -> Self {
    Self {
      layout,
      key_pos,
      rows: HashMap::with_capacity(consts::DEF_TABLE_CAPACITY),
      scan: BTreeMap::new(),
      next_seq: 0,
      size: 0,
    }
  }

  fn insert(&mut self, record: Record) {
    let key: Term = record.key(self.key_pos).clone();

    match self.rows.entry(key) {
      Entry::Occupied(mut entry) => {
        let bucket: &mut Bucket = entry.get_mut();

        if self.layout.is_unique() {
          self.size -= bucket.rows.len();
          bucket.rows.clear();
        } else if !self.layout.allows_duplicates() && bucket.rows.contains(&record) {
          return; // Identical record: no-op for the duplicate-rejecting layout.
        }

        bucket.rows.push(record);
        self.size += 1;
      }
      Entry::Vacant(entry) => {
        let seq: u64 = self.next_seq;

        self.next_seq += 1;
        self.scan.insert(seq, entry.key().clone());
        entry.insert(Bucket {
          seq,
          rows: vec![record],
        });
        self.size += 1;
      }
    }
  }

  fn conflict(&self, record: &Record) -> Option<TableError> {
    let key: &Term = record.key(self.key_pos);
    let bucket: &Bucket = self.rows.get(key)?;

    if self.layout.is_unique() {
      return Some(TableError::KeyAlreadyExists);
    }

    if !self.layout.allows_duplicates() && bucket.rows.contains(record) {
      return Some(TableError::RecordAlreadyExists);
    }

    None
  }

  fn lookup(&self, key: &Term) -> Vec<Record> {
    self
      .rows
      .get(key)
      .map(|bucket| bucket.rows.clone())
      .unwrap_or_default()
  }

  fn take(&mut self, key: &Term) -> Vec<Record> {
    let Some(bucket) = self.rows.remove(key) else {
      return Vec::new();
    };

    self.scan.remove(&bucket.seq);
    self.size -= bucket.rows.len();

    bucket.rows
  }

  fn delete_record(&mut self, record: &Record) {
    let key: &Term = record.key(self.key_pos);

    let Some(bucket) = self.rows.get_mut(key) else {
      return;
    };

    let before: usize = bucket.rows.len();

    bucket.rows.retain(|row| row != record);

    self.size -= before - bucket.rows.len();

    if bucket.rows.is_empty() {
      let seq: u64 = bucket.seq;

      self.rows.remove(key);
      self.scan.remove(&seq);
    }
  }

  fn clear(&mut self) {
    self.rows.clear();
    self.scan.clear();
    self.size = 0;
  }

  fn scan<F>(&self, from: Option<&ScanPos>, mut visit: F)
  where
    F: FnMut(ScanPos, &Record) -> ControlFlow<()>,
  {
    let resume: Option<(u64, usize)> = match from {
      None => None,
      Some(ScanPos::Hashed { seq, row }) => Some((*seq, *row)),
      // Cursor kind is validated upstream; a mismatch yields nothing.
      Some(ScanPos::Ordered { .. }) => return,
    };

    let start: Bound<u64> = match resume {
      None => Bound::Unbounded,
      Some((seq, _)) => Bound::Included(seq),
    };

    for (&seq, key) in self.scan.range((start, Bound::Unbounded)) {
      let Some(bucket) = self.rows.get(key) else {
        continue;
      };

      // The row offset applies only when resuming into the same bucket.
      let skip: usize = match resume {
        Some((resume_seq, row)) if resume_seq == seq => row + 1,
        _ => 0,
      };

      for (row, record) in bucket.rows.iter().enumerate().skip(skip) {
        if visit(ScanPos::Hashed { seq, row }, record).is_break() {
          return;
        }
      }
    }
  }

  fn select_delete<F>(&mut self, mut matches: F) -> usize
  where
    F: FnMut(&Record) -> bool,
  {
    let mut removed: usize = 0;
    let mut emptied: Vec<(Term, u64)> = Vec::new();

    for (key, bucket) in self.rows.iter_mut() {
      bucket.rows.retain(|record| {
        if matches(record) {
          removed += 1;
          false
        } else {
          true
        }
      });

      if bucket.rows.is_empty() {
        emptied.push((key.clone(), bucket.seq));
      }
    }

    for (key, seq) in emptied {
      self.rows.remove(&key);
      self.scan.remove(&seq);
    }

    self.size -= removed;

    removed
  }

  fn to_list(&self) -> Vec<Record> {
    let mut list: Vec<Record> = Vec::with_capacity(self.size);

    for key in self.scan.values() {
      if let Some(bucket) = self.rows.get(key) {
        list.extend(bucket.rows.iter().cloned());
      }
    }

    list
  }
}

// -----------------------------------------------------------------------------
// Ordered Rows
// -----------------------------------------------------------------------------

/// Term-ordered row store with one record per key.
#[derive(Debug)]
pub(crate) struct OrderedRows {
  key_pos: usize,
  rows: BTreeMap<Term, Record>,
}

impl OrderedRows {
  fn new(key_pos: usize) -> Self {
    Self {
      key_pos,
      rows: BTreeMap::new(),
    }
  }

  fn insert(&mut self, record: Record) {
    let key: Term = record.key(self.key_pos).clone();

    self.rows.insert(key, record);
  }

  fn conflict(&self, record: &Record) -> Option<TableError> {
    self
      .rows
      .contains_key(record.key(self.key_pos))
      .then_some(TableError::KeyAlreadyExists)
  }

  fn lookup(&self, key: &Term) -> Vec<Record> {
    self.rows.get(key).cloned().into_iter().collect()
  }

  fn take(&mut self, key: &Term) -> Vec<Record> {
    self.rows.remove(key).into_iter().collect()
  }

  fn delete_record(&mut self, record: &Record) {
    let key: &Term = record.key(self.key_pos);

    if self.rows.get(key) == Some(record) {
      self.rows.remove(key);
    }
  }

  fn first(&self) -> Result<Term, TableError> {
    self.rows.keys().next().cloned().ok_or(TableError::EmptyTable)
  }

  fn last(&self) -> Result<Term, TableError> {
    self.rows.keys().next_back().cloned().ok_or(TableError::EmptyTable)
  }

  fn next(&self, key: &Term) -> Result<Term, TableError> {
    self
      .rows
      .range((Bound::Excluded(key), Bound::Unbounded))
      .map(|(next, _)| next.clone())
      .next()
      .ok_or(TableError::EndOfTable)
  }

  fn prev(&self, key: &Term) -> Result<Term, TableError> {
    self
      .rows
      .range((Bound::Unbounded, Bound::Excluded(key)))
      .map(|(prev, _)| prev.clone())
      .next_back()
      .ok_or(TableError::StartOfTable)
  }

  fn scan<F>(&self, from: Option<&ScanPos>, mut visit: F)
  where
    F: FnMut(ScanPos, &Record) -> ControlFlow<()>,
  {
    let start: Bound<&Term> = match from {
      None => Bound::Unbounded,
      Some(ScanPos::Ordered { key }) => Bound::Excluded(key),
      // Cursor kind is validated upstream; a mismatch yields nothing.
      Some(ScanPos::Hashed { .. }) => return,
    };

    for (key, record) in self.rows.range((start, Bound::Unbounded)) {
      let position: ScanPos = ScanPos::Ordered { key: key.clone() };

      if visit(position, record).is_break() {
        return;
      }
    }
  }

  fn select_delete<F>(&mut self, mut matches: F) -> usize
  where
    F: FnMut(&Record) -> bool,
  {
    let before: usize = self.rows.len();

    self.rows.retain(|_, record| !matches(record));

    before - self.rows.len()
  }
}

// -----------------------------------------------------------------------------
// Storage
// -----------------------------------------------------------------------------

/// Row storage behind one table, dispatching on the layout discipline.
#[derive(Debug)]
pub(crate) enum Storage {
  Hashed(HashedRows),
  Ordered(OrderedRows),
}

impl Storage {
  /// Creates empty storage for the given layout and key position.
  pub(crate) fn new(layout: Layout, key_pos: usize) -> Self {
    if layout.is_ordered() {
      Self::Ordered(OrderedRows::new(key_pos))
    } else {
      Self::Hashed(HashedRows::new(layout, key_pos))
    }
  }

  /// Returns the total number of stored records.
  pub(crate) fn len(&self) -> usize {
    match self {
      Self::Hashed(rows) => rows.size,
      Self::Ordered(rows) => rows.rows.len(),
    }
  }

  /// Inserts one record with the layout's replace/append/no-op semantics.
  ///
  /// The caller has already validated the record's arity against the key
  /// position.
  pub(crate) fn insert(&mut self, record: Record) {
    match self {
      Self::Hashed(rows) => rows.insert(record),
      Self::Ordered(rows) => rows.insert(record),
    }
  }

  /// Returns the conflict that would prevent an if-absent insert.
  pub(crate) fn conflict(&self, record: &Record) -> Option<TableError> {
    match self {
      Self::Hashed(rows) => rows.conflict(record),
      Self::Ordered(rows) => rows.conflict(record),
    }
  }

  /// Inserts one record unless a conflicting entry exists.
  pub(crate) fn insert_new(&mut self, record: Record) -> Result<(), TableError> {
    match self.conflict(&record) {
      Some(error) => Err(error),
      None => {
        self.insert(record);
        Ok(())
      }
    }
  }

  /// Returns all records stored under `key`, in insertion order.
  pub(crate) fn lookup(&self, key: &Term) -> Vec<Record> {
    match self {
      Self::Hashed(rows) => rows.lookup(key),
      Self::Ordered(rows) => rows.lookup(key),
    }
  }

  /// Returns `true` if any record is stored under `key`.
  pub(crate) fn member(&self, key: &Term) -> bool {
    match self {
      Self::Hashed(rows) => rows.rows.contains_key(key),
      Self::Ordered(rows) => rows.rows.contains_key(key),
    }
  }

  /// Removes and returns all records stored under `key`.
  pub(crate) fn take(&mut self, key: &Term) -> Vec<Record> {
    match self {
      Self::Hashed(rows) => rows.take(key),
      Self::Ordered(rows) => rows.take(key),
    }
  }

  /// Removes every copy of an exact record.
  pub(crate) fn delete_record(&mut self, record: &Record) {
    match self {
      Self::Hashed(rows) => rows.delete_record(record),
      Self::Ordered(rows) => rows.delete_record(record),
    }
  }

  /// Removes every record.
  pub(crate) fn clear(&mut self) {
    match self {
      Self::Hashed(rows) => rows.clear(),
      Self::Ordered(rows) => {
        rows.rows.clear();
      }
    }
  }

  /// Smallest key in term order.
  pub(crate) fn first(&self) -> Result<Term, TableError> {
    match self {
      Self::Hashed(_) => Err(TableError::SetNotOrdered),
      Self::Ordered(rows) => rows.first(),
    }
  }

  /// Largest key in term order.
  pub(crate) fn last(&self) -> Result<Term, TableError> {
    match self {
      Self::Hashed(_) => Err(TableError::SetNotOrdered),
      Self::Ordered(rows) => rows.last(),
    }
  }

  /// Smallest key strictly greater than `key`; the probe need not exist.
  pub(crate) fn next(&self, key: &Term) -> Result<Term, TableError> {
    match self {
      Self::Hashed(_) => Err(TableError::SetNotOrdered),
      Self::Ordered(rows) => rows.next(key),
    }
  }

  /// Largest key strictly less than `key`; the probe need not exist.
  pub(crate) fn prev(&self, key: &Term) -> Result<Term, TableError> {
    match self {
      Self::Hashed(_) => Err(TableError::SetNotOrdered),
      Self::Ordered(rows) => rows.prev(key),
    }
  }

  /// Visits records in the table's natural order, starting strictly after
  /// `from` when given.
  pub(crate) fn scan<F>(&self, from: Option<&ScanPos>, visit: F)
  where
    F: FnMut(ScanPos, &Record) -> ControlFlow<()>,
  {
    match self {
      Self::Hashed(rows) => rows.scan(from, visit),
      Self::Ordered(rows) => rows.scan(from, visit),
    }
  }

  /// Removes every record satisfying `matches`; returns the removed count.
  pub(crate) fn select_delete<F>(&mut self, matches: F) -> usize
  where
    F: FnMut(&Record) -> bool,
  {
    match self {
      Self::Hashed(rows) => rows.select_delete(matches),
      Self::Ordered(rows) => rows.select_delete(matches),
    }
  }

  /// Materializes every record in the table's natural order.
  pub(crate) fn to_list(&self) -> Vec<Record> {
    match self {
      Self::Hashed(rows) => rows.to_list(),
      Self::Ordered(rows) => rows.rows.values().cloned().collect(),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::record;

  fn keys(storage: &Storage) -> Vec<Term> {
    storage
      .to_list()
      .iter()
      .map(|record| record.key(1).clone())
      .collect()
  }

  fn collect_pages(storage: &Storage, limit: usize) -> Vec<Record> {
    let mut out: Vec<Record> = Vec::new();
    let mut from: Option<ScanPos> = None;

    loop {
      let mut page: Vec<(ScanPos, Record)> = Vec::new();

      storage.scan(from.as_ref(), |position, record| {
        page.push((position, record.clone()));

        if page.len() == limit {
          ControlFlow::Break(())
        } else {
          ControlFlow::Continue(())
        }
      });

      let Some((position, _)) = page.last() else {
        break;
      };

      from = Some(position.clone());
      out.extend(page.into_iter().map(|(_, record)| record));
    }

    out
  }

  #[test]
  fn test_unique_insert_replaces() {
    let mut storage: Storage = Storage::new(Layout::Set, 1);

    storage.insert(record!["k", 1]);
    storage.insert(record!["k", 2]);

    assert_eq!(storage.len(), 1);
    assert_eq!(storage.lookup(&Term::from("k")), vec![record!["k", 2]]);
  }

  #[test]
  fn test_unique_insert_new_conflicts() {
    let mut storage: Storage = Storage::new(Layout::Set, 1);

    assert_eq!(storage.insert_new(record!["k", 1]), Ok(()));
    assert_eq!(
      storage.insert_new(record!["k", 2]),
      Err(TableError::KeyAlreadyExists),
    );
    assert_eq!(storage.lookup(&Term::from("k")), vec![record!["k", 1]]);
  }

  #[test]
  fn test_bag_appends_in_insertion_order() {
    let mut storage: Storage = Storage::new(Layout::Bag, 1);

    storage.insert(record!["k", 1]);
    storage.insert(record!["k", 2]);

    assert_eq!(storage.len(), 2);
    assert_eq!(
      storage.lookup(&Term::from("k")),
      vec![record!["k", 1], record!["k", 2]],
    );
  }

  #[test]
  fn test_bag_identical_record_is_noop() {
    let mut storage: Storage = Storage::new(Layout::Bag, 1);

    storage.insert(record!["k", 1]);
    storage.insert(record!["k", 1]);

    assert_eq!(storage.len(), 1);
  }

  #[test]
  fn test_bag_insert_new_identical_conflicts() {
    let mut storage: Storage = Storage::new(Layout::Bag, 1);

    storage.insert(record!["k", 1]);

    assert_eq!(
      storage.insert_new(record!["k", 1]),
      Err(TableError::RecordAlreadyExists),
    );
    assert_eq!(storage.insert_new(record!["k", 2]), Ok(()));
  }

  #[test]
  fn test_duplicate_bag_keeps_copies() {
    let mut storage: Storage = Storage::new(Layout::DuplicateBag, 1);

    storage.insert(record!["k", 1]);
    storage.insert(record!["k", 1]);

    assert_eq!(storage.len(), 2);
    assert_eq!(storage.insert_new(record!["k", 1]), Ok(()));
    assert_eq!(storage.len(), 3);
  }

  #[test]
  fn test_ordered_list_is_sorted() {
    let mut storage: Storage = Storage::new(Layout::OrderedSet, 1);

    storage.insert(record![3, "c"]);
    storage.insert(record![1, "a"]);
    storage.insert(record![2, "b"]);

    assert_eq!(keys(&storage), vec![Term::Int(1), Term::Int(2), Term::Int(3)]);
  }

  #[test]
  fn test_ordered_navigation() {
    let mut storage: Storage = Storage::new(Layout::OrderedSet, 1);

    storage.insert(record![3]);
    storage.insert(record![1]);
    storage.insert(record![2]);

    assert_eq!(storage.first(), Ok(Term::Int(1)));
    assert_eq!(storage.last(), Ok(Term::Int(3)));
    assert_eq!(storage.next(&Term::Int(1)), Ok(Term::Int(2)));
    assert_eq!(storage.prev(&Term::Int(1)), Err(TableError::StartOfTable));
    assert_eq!(storage.next(&Term::Int(3)), Err(TableError::EndOfTable));
  }

  #[test]
  fn test_navigation_probe_need_not_exist() {
    let mut storage: Storage = Storage::new(Layout::OrderedSet, 1);

    storage.insert(record![10]);
    storage.insert(record![30]);

    assert_eq!(storage.next(&Term::Int(15)), Ok(Term::Int(30)));
    assert_eq!(storage.prev(&Term::Int(15)), Ok(Term::Int(10)));
  }

  #[test]
  fn test_navigation_requires_ordered_layout() {
    let storage: Storage = Storage::new(Layout::Set, 1);

    assert_eq!(storage.first(), Err(TableError::SetNotOrdered));
    assert_eq!(storage.last(), Err(TableError::SetNotOrdered));
    assert_eq!(storage.next(&Term::Int(1)), Err(TableError::SetNotOrdered));
    assert_eq!(storage.prev(&Term::Int(1)), Err(TableError::SetNotOrdered));
  }

  #[test]
  fn test_empty_ordered_navigation() {
    let storage: Storage = Storage::new(Layout::OrderedSet, 1);

    assert_eq!(storage.first(), Err(TableError::EmptyTable));
    assert_eq!(storage.last(), Err(TableError::EmptyTable));
  }

  #[test]
  fn test_take_removes_and_returns() {
    let mut storage: Storage = Storage::new(Layout::Bag, 1);

    storage.insert(record!["k", 1]);
    storage.insert(record!["k", 2]);
    storage.insert(record!["other", 3]);

    let taken: Vec<Record> = storage.take(&Term::from("k"));

    assert_eq!(taken, vec![record!["k", 1], record!["k", 2]]);
    assert_eq!(storage.len(), 1);
    assert!(storage.lookup(&Term::from("k")).is_empty());
  }

  #[test]
  fn test_delete_record_exact_match_only() {
    let mut storage: Storage = Storage::new(Layout::Bag, 1);

    storage.insert(record!["k", 1]);
    storage.insert(record!["k", 2]);

    storage.delete_record(&record!["k", 1]);

    assert_eq!(storage.lookup(&Term::from("k")), vec![record!["k", 2]]);

    storage.delete_record(&record!["k", 9]);

    assert_eq!(storage.len(), 1);
  }

  #[test]
  fn test_clear() {
    let mut storage: Storage = Storage::new(Layout::Set, 1);

    storage.insert(record![1]);
    storage.insert(record![2]);
    storage.clear();

    assert_eq!(storage.len(), 0);
    assert!(storage.to_list().is_empty());
  }

  #[test]
  fn test_scan_order_is_stable_between_mutations() {
    let mut storage: Storage = Storage::new(Layout::Set, 1);

    storage.insert(record![5]);
    storage.insert(record![1]);
    storage.insert(record![9]);

    let first: Vec<Record> = storage.to_list();
    let again: Vec<Record> = storage.to_list();

    assert_eq!(first, again);
    assert_eq!(first.len(), 3);
  }

  #[test]
  fn test_paged_scan_equals_full_scan() {
    for layout in [Layout::Set, Layout::OrderedSet, Layout::Bag, Layout::DuplicateBag] {
      let mut storage: Storage = Storage::new(layout, 1);

      for index in 0..17 {
        storage.insert(record![index, index * 10]);
        storage.insert(record![index, index * 10 + 1]);
      }

      let full: Vec<Record> = storage.to_list();

      for limit in 1..=5 {
        assert_eq!(collect_pages(&storage, limit), full, "layout {layout}");
      }
    }
  }

  #[test]
  fn test_scan_resumes_after_bucket_deletion() {
    let mut storage: Storage = Storage::new(Layout::Set, 1);

    storage.insert(record![1]);
    storage.insert(record![2]);
    storage.insert(record![3]);

    // Capture the position of the first scanned record.
    let mut cursor: Option<ScanPos> = None;

    storage.scan(None, |position, _| {
      cursor = Some(position);
      ControlFlow::Break(())
    });

    // Delete the bucket the cursor points into; resumption skips forward.
    let first: Vec<Record> = storage.to_list();

    storage.delete_record(&first[0]);

    let mut seen: usize = 0;

    storage.scan(cursor.as_ref(), |_, _| {
      seen += 1;
      ControlFlow::Continue(())
    });

    assert_eq!(seen, 2);
  }

  #[test]
  fn test_select_delete_counts_and_removes() {
    let mut storage: Storage = Storage::new(Layout::DuplicateBag, 1);

    storage.insert(record![1, "keep"]);
    storage.insert(record![1, "drop"]);
    storage.insert(record![2, "drop"]);
    storage.insert(record![2, "drop"]);

    let removed: usize =
      storage.select_delete(|record| record.get(2) == Some(&Term::from("drop")));

    assert_eq!(removed, 3);
    assert_eq!(storage.len(), 1);
    assert_eq!(storage.lookup(&Term::Int(1)), vec![record![1, "keep"]]);
    assert!(storage.lookup(&Term::Int(2)).is_empty());
  }

  #[test]
  fn test_select_delete_ordered() {
    let mut storage: Storage = Storage::new(Layout::OrderedSet, 1);

    for index in 0..10 {
      storage.insert(record![index]);
    }

    let removed: usize = storage.select_delete(|record| {
      matches!(record.get(1), Some(Term::Int(value)) if value % 2 == 0)
    });

    assert_eq!(removed, 5);
    assert_eq!(
      keys(&storage),
      vec![Term::Int(1), Term::Int(3), Term::Int(5), Term::Int(7), Term::Int(9)],
    );
  }

  #[test]
  fn test_non_default_key_pos() {
    let mut storage: Storage = Storage::new(Layout::Set, 2);

    storage.insert(record!["a", "k1"]);
    storage.insert(record!["b", "k1"]);
    storage.insert(record!["c", "k2"]);

    assert_eq!(storage.len(), 2);
    assert_eq!(storage.lookup(&Term::from("k1")), vec![record!["b", "k1"]]);
  }
}
