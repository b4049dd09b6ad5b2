mod common;

use cluegrid_core::{CellColor, MemoryDocumentStore, SyncError};
use common::{session, stored, ControlledStore};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn bound_board_pushes_notes_without_explicit_call() {
    let store = Arc::new(MemoryDocumentStore::new());
    let (session, _) = session(store.clone());
    let id = session.share_board().await.unwrap().board_id;

    session.set_notes("clue: fruit");
    session.flush().await.unwrap();

    assert_eq!(stored(&store, &id).await.unwrap().notes, "clue: fruit");
}

#[tokio::test]
async fn every_kind_of_local_edit_is_pushed() {
    let store = Arc::new(MemoryDocumentStore::new());
    let (session, _) = session(store.clone());
    let id = session.share_board().await.unwrap().board_id;

    session.set_cell_word(2, "PIANO").unwrap();
    session.cycle_cell_color(2).unwrap();
    session.set_cell_color(9, CellColor::Bystander).unwrap();
    session.flush().await.unwrap();

    let board = stored(&store, &id).await.unwrap().to_board().unwrap();
    assert_eq!(board, session.board());
    assert_eq!(board.cells()[2].color, CellColor::TeamA);
}

#[tokio::test]
async fn unbound_edits_never_touch_the_store() {
    let store = Arc::new(MemoryDocumentStore::new());
    let (session, _) = session(store.clone());

    session.set_cell_word(0, "LOCAL").unwrap();
    session.set_notes("private");
    let status = session.flush().await.unwrap();

    assert_eq!(store.write_count(), 0);
    assert_eq!(status.pushed, 0);
}

#[tokio::test]
async fn rapid_edits_land_in_mutation_order() {
    let store = ControlledStore::new();
    let (session, _) = session(store.clone());
    let id = session.share_board().await.unwrap().board_id;
    store.delay_puts(&[Duration::from_millis(60), Duration::from_millis(1)]);

    session.set_notes("1");
    tokio::time::sleep(Duration::from_millis(5)).await;
    session.set_notes("12");
    session.set_notes("123");
    session.flush().await.unwrap();

    assert_eq!(store.document(&id).await.unwrap().notes, "123");
    // share + in-flight "1" + coalesced "123"
    assert_eq!(store.inner.write_count(), 3);
}

#[tokio::test]
async fn reset_drops_pending_push_and_stays_unbound() {
    let store = ControlledStore::new();
    let (session, _) = session(store.clone());
    let id = session.share_board().await.unwrap().board_id;
    store.delay_puts(&[Duration::from_millis(60)]);

    session.set_notes("in flight");
    tokio::time::sleep(Duration::from_millis(5)).await;
    session.set_notes("pending");
    session.reset_board();
    session.flush().await.unwrap();

    assert_eq!(store.document(&id).await.unwrap().notes, "in flight");
    assert!(session.identity().is_none());
    assert!(session.board().is_blank());

    session.set_notes("after reset");
    session.flush().await.unwrap();
    assert_eq!(store.document(&id).await.unwrap().notes, "in flight");
}

#[tokio::test]
async fn failed_push_is_reported_and_later_edit_recovers() {
    let store = Arc::new(MemoryDocumentStore::new());
    let (session, _) = session(store.clone());
    let id = session.share_board().await.unwrap().board_id;

    store.set_offline(true);
    session.set_notes("offline edit");
    let err = session.flush().await.unwrap_err();
    assert!(matches!(err, SyncError::RemoteUnavailable(_)));
    assert_eq!(session.board().notes, "offline edit");
    assert!(session.push_status().last_error.is_some());

    store.set_offline(false);
    session.set_notes("back online");
    session.flush().await.unwrap();
    assert_eq!(stored(&store, &id).await.unwrap().notes, "back online");
}

#[tokio::test]
async fn two_clients_on_one_board_resolve_last_write_wins() {
    let store = Arc::new(MemoryDocumentStore::new());
    let (giver, _) = session(store.clone());
    let id = giver.share_board().await.unwrap().board_id;
    let (guesser, _) = session(store.clone());
    guesser.load_board_from_id(id.clone()).await.unwrap();

    giver.set_cell_word(0, "GIVER").unwrap();
    giver.flush().await.unwrap();
    guesser.set_notes("guesser notes");
    guesser.flush().await.unwrap();

    let document = stored(&store, &id).await.unwrap();
    assert_eq!(document.notes, "guesser notes");
    assert_eq!(document.cells[0].word, "");
}
