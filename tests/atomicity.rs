//! Batch isolation: readers never observe a partially-applied batch.

use tokio::sync::oneshot;

use tabit::actor::Actor;
use tabit::core::TableOptions;
use tabit::core::Visibility;
use tabit::lang::Record;
use tabit::lang::Term;
use tabit::record;
use tabit::tables::Table;

const BATCH: usize = 10;
const ROUNDS: usize = 200;

fn batch(value: &str) -> Vec<Record> {
  (0..BATCH as i64).map(|key| record![key, value]).collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_never_observe_partial_batches() {
  Actor::run(async {
    let table: Table = Table::create(TableOptions {
      visibility: Visibility::Public,
      write_concurrency: true,
      read_concurrency: true,
      ..TableOptions::default()
    })
    .unwrap();

    let (send_done, recv_done) = oneshot::channel::<()>();

    Actor::spawn(async move {
      for round in 0..ROUNDS {
        let value: &str = if round % 2 == 0 { "even" } else { "odd" };

        table.insert_all(batch(value)).unwrap();
        tokio::task::yield_now().await;
      }

      send_done.send(()).unwrap();
    });

    let mut done = recv_done;

    loop {
      let rows: Vec<Record> = table.to_list().unwrap();

      // Unique keys overwritten batch-at-a-time: a coherent snapshot holds
      // either no records or one full batch with a homogeneous value.
      assert!(rows.is_empty() || rows.len() == BATCH, "saw {} rows", rows.len());

      if let Some(first) = rows.first() {
        let value: Option<&Term> = first.get(2);

        for row in &rows {
          assert_eq!(row.get(2), value, "saw a torn batch");
        }
      }

      match done.try_recv() {
        Ok(()) => break,
        Err(oneshot::error::TryRecvError::Empty) => {
          tokio::task::yield_now().await;
        }
        Err(oneshot::error::TryRecvError::Closed) => break,
      }
    }
  })
  .await;
}

#[tokio::test]
async fn test_conflicting_batch_leaves_table_unchanged() {
  Actor::run(async {
    let table: Table = Table::create(TableOptions::default()).unwrap();

    table.insert(record!["taken", 0]).unwrap();

    let records: Vec<Record> = vec![record!["fresh", 1], record!["taken", 2]];

    assert!(table.insert_all_new(records).is_err());
    assert_eq!(table.size().unwrap(), 1);
    assert_eq!(table.lookup("taken").unwrap(), vec![record!["taken", 0]]);
    assert!(table.lookup("fresh").unwrap().is_empty());
  })
  .await;
}
