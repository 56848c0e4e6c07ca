//! End-to-end walks through the core table contract.

use std::time::Duration;

use tokio::sync::oneshot;

use tabit::actor::Actor;
use tabit::actor::ActorId;
use tabit::core::TableOptions;
use tabit::core::Visibility;
use tabit::error::TableError;
use tabit::lang::Record;
use tabit::lang::Term;
use tabit::record;
use tabit::select::Pat;
use tabit::select::Pattern;
use tabit::tables::Bag;
use tabit::tables::BagOptions;
use tabit::tables::Set;
use tabit::tables::SetOptions;
use tabit::tables::Table;
use tabit::tables::Transfer;

#[tokio::test]
async fn test_unique_key_overwrite() {
  Actor::run(async {
    let set: Set = Set::create(SetOptions::default()).unwrap();

    set.insert(record!["k1", "a"]).unwrap();
    set.insert(record!["k1", "b"]).unwrap();

    assert_eq!(set.lookup("k1").unwrap(), Some(record!["k1", "b"]));
    assert_eq!(set.size().unwrap(), 1);
  })
  .await;
}

#[tokio::test]
async fn test_ordered_set_navigation() {
  Actor::run(async {
    let set: Set = Set::create(SetOptions {
      ordered: true,
      ..SetOptions::default()
    })
    .unwrap();

    set.insert(record![3]).unwrap();
    set.insert(record![1]).unwrap();
    set.insert(record![2]).unwrap();

    let keys: Vec<Term> = set
      .to_list()
      .unwrap()
      .iter()
      .map(|record| record.get(1).cloned().unwrap())
      .collect();

    assert_eq!(keys, vec![Term::Int(1), Term::Int(2), Term::Int(3)]);
    assert_eq!(set.first().unwrap(), Term::Int(1));
    assert_eq!(set.last().unwrap(), Term::Int(3));
    assert_eq!(set.next(1).unwrap(), Term::Int(2));
    assert_eq!(set.prev(1), Err(TableError::StartOfTable));
  })
  .await;
}

#[tokio::test]
async fn test_bag_keeps_insertion_order() {
  Actor::run(async {
    let bag: Bag = Bag::create(BagOptions::default()).unwrap();

    bag.insert(record!["k", 1]).unwrap();
    bag.insert(record!["k", 2]).unwrap();

    assert_eq!(
      bag.lookup("k").unwrap(),
      vec![record!["k", 1], record!["k", 2]],
    );
  })
  .await;
}

#[tokio::test]
async fn test_short_record_rejects_whole_batch() {
  Actor::run(async {
    let table: Table = Table::create(TableOptions {
      key_pos: 2,
      ..TableOptions::default()
    })
    .unwrap();

    let records: Vec<Record> = vec![
      record!["a", 1],
      record!["only-one-element"],
      record!["c", 3],
    ];

    assert_eq!(
      table.insert_all(records),
      Err(TableError::RecordTooSmall { arity: 1, key_pos: 2 }),
    );
    assert_eq!(table.size().unwrap(), 0);
  })
  .await;
}

#[tokio::test]
async fn test_give_away_then_accept() {
  Actor::run(async {
    let (send_target, recv_target) = oneshot::channel::<ActorId>();
    let (send_done, recv_done) = oneshot::channel::<(Term, Result<(), TableError>)>();
    let (send_release, recv_release) = oneshot::channel::<()>();

    Actor::spawn(async move {
      send_target.send(Actor::this()).unwrap();

      let transfer: Transfer = Table::accept(Duration::from_secs(5)).await.unwrap();
      let write: Result<(), TableError> = transfer.table.insert(record!["from-new-owner", 1]);

      send_done.send((transfer.gift, write)).unwrap();

      // Stay live (and keep owning the table) until the old owner has
      // finished its assertions.
      let _ignore = recv_release.await;
    });

    let target: ActorId = recv_target.await.unwrap();

    let table: Table = Table::create(TableOptions {
      visibility: Visibility::Private,
      ..TableOptions::default()
    })
    .unwrap();

    table.give_away(target, "payload").unwrap();

    let (gift, write) = recv_done.await.unwrap();

    assert_eq!(gift, Term::from("payload"));
    assert_eq!(write, Ok(()));

    // Ownership moved: the old owner can no longer write or re-gift.
    assert_eq!(table.insert(record!["from-old-owner", 1]), Err(TableError::WriteProtected));
    assert_eq!(
      table.give_away(target, "again"),
      Err(TableError::SenderNotTableOwner),
    );

    send_release.send(()).unwrap();
  })
  .await;
}

#[tokio::test]
async fn test_match_limit_pagination() {
  Actor::run(async {
    let set: Set = Set::create(SetOptions {
      ordered: true,
      ..SetOptions::default()
    })
    .unwrap();

    set.insert(record![1, "a"]).unwrap();
    set.insert(record![2, "b"]).unwrap();
    set.insert(record![3, "c"]).unwrap();

    let pattern: Pattern = Pattern::new(vec![Pat::Bind(1), Pat::Any]);

    let (page, cursor) = set.table().match_limit(&pattern, 2).unwrap();

    assert_eq!(page, vec![vec![Term::Int(1)], vec![Term::Int(2)]]);
    assert!(!cursor.is_end());

    let (rest, cursor) = Table::resume(cursor).unwrap();

    assert_eq!(rest, vec![vec![Term::Int(3)]]);

    let (empty, cursor) = Table::resume(cursor).unwrap();

    assert!(empty.is_empty());
    assert!(cursor.is_end());
  })
  .await;
}
