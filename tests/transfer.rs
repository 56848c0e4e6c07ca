//! Ownership hand-off: offers, bequests, timeouts, and owner death.

use std::time::Duration;

use tokio::sync::oneshot;

use tabit::actor::Actor;
use tabit::actor::ActorId;
use tabit::core::TableOptions;
use tabit::core::Visibility;
use tabit::error::TableError;
use tabit::lang::Term;
use tabit::record;
use tabit::tables::Table;
use tabit::tables::Transfer;

fn private_options() -> TableOptions {
  TableOptions {
    visibility: Visibility::Private,
    ..TableOptions::default()
  }
}

#[tokio::test]
async fn test_accept_times_out_cleanly() {
  Actor::run(async {
    let result: Result<Transfer, TableError> = Table::accept(Duration::from_millis(20)).await;

    assert_eq!(result.unwrap_err(), TableError::Timeout);
  })
  .await;
}

#[tokio::test]
async fn test_give_away_to_self_is_rejected() {
  Actor::run(async {
    let table: Table = Table::create(private_options()).unwrap();
    let this: ActorId = Actor::this();

    assert_eq!(
      table.give_away(this, "gift"),
      Err(TableError::RecipientAlreadyOwnsTable),
    );

    // The rejection is non-mutating: the owner still holds the table.
    assert_eq!(table.insert(record!["k", 1]), Ok(()));
  })
  .await;
}

#[tokio::test]
async fn test_give_away_to_dead_actor_is_rejected() {
  Actor::run(async {
    let (send, recv) = oneshot::channel::<ActorId>();

    Actor::spawn(async move {
      send.send(Actor::this()).unwrap();
    });

    let target: ActorId = recv.await.unwrap();

    // Wait for the spawned actor to terminate.
    while Actor::alive(target) {
      tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let table: Table = Table::create(private_options()).unwrap();

    assert_eq!(
      table.give_away(target, "gift"),
      Err(TableError::RecipientNotAlive),
    );
  })
  .await;
}

#[tokio::test]
async fn test_give_away_by_non_owner_is_rejected() {
  Actor::run(async {
    let table: Table = Table::create(private_options()).unwrap();
    let owner: ActorId = Actor::this();
    let (send, recv) = oneshot::channel();

    Actor::spawn(async move {
      send.send(table.give_away(owner, "gift")).unwrap();
    });

    assert_eq!(recv.await.unwrap(), Err(TableError::SenderNotTableOwner));
  })
  .await;
}

#[tokio::test]
async fn test_heir_inherits_on_owner_termination() {
  Actor::run(async {
    let heir: ActorId = Actor::this();

    Actor::spawn(async move {
      let table: Table = Table::create(TableOptions {
        visibility: Visibility::Private,
        heir: Some((heir, Term::from("legacy"))),
        ..TableOptions::default()
      })
      .unwrap();

      table.insert(record!["k", "kept"]).unwrap();
      // Scope exit terminates the owner; the table passes to the heir.
    });

    let transfer: Transfer = Table::accept(Duration::from_secs(5)).await.unwrap();

    assert_eq!(transfer.gift, Term::from("legacy"));

    // The heir now owns the private table outright.
    assert_eq!(
      transfer.table.lookup("k").unwrap(),
      vec![record!["k", "kept"]],
    );
    assert_eq!(transfer.table.insert(record!["k2", 2]), Ok(()));

    let owner: ActorId = transfer.table.info().unwrap().owner;

    assert_eq!(owner, heir);
  })
  .await;
}

#[tokio::test]
async fn test_table_destroyed_without_heir() {
  Actor::run(async {
    let (send, recv) = oneshot::channel::<Table>();

    Actor::spawn(async move {
      let table: Table = Table::create(private_options()).unwrap();

      send.send(table).unwrap();
    });

    let table: Table = recv.await.unwrap();

    // Wait for the owner's termination sweep to destroy the table.
    let mut gone: bool = false;

    for _ in 0..500 {
      if table.info().is_err() {
        gone = true;
        break;
      }

      tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert!(gone, "table should be destroyed with its owner");
    assert_eq!(table.lookup("k"), Err(TableError::TableNotFound));
  })
  .await;
}

#[tokio::test]
async fn test_ownership_unchanged_until_accept() {
  Actor::run(async {
    let (send_target, recv_target) = oneshot::channel::<ActorId>();
    let (send_release, recv_release) = oneshot::channel::<()>();

    Actor::spawn(async move {
      send_target.send(Actor::this()).unwrap();

      // Never accepts; just stays alive until released.
      let _ignore = recv_release.await;
    });

    let target: ActorId = recv_target.await.unwrap();
    let table: Table = Table::create(private_options()).unwrap();

    table.give_away(target, "gift").unwrap();

    // The offer is pending: the sender still owns and writes the table.
    assert_eq!(table.insert(record!["k", 1]), Ok(()));
    assert_eq!(table.info().unwrap().owner, Actor::this());

    send_release.send(()).unwrap();
  })
  .await;
}
