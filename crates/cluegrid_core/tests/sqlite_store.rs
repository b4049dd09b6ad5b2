mod common;

use cluegrid_core::db::open_db;
use cluegrid_core::{
    Board, BoardId, Cell, CellColor, DocumentStore, RemoteDocument, SqliteDocumentStore, StoreError,
    BOARDS_COLLECTION,
};
use common::session;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn sample_board() -> Board {
    let mut cells = vec![Cell::default(); 25];
    cells[6] = Cell::new("ROBOT", CellColor::TeamB);
    Board::from_cells(cells, "watch out for 6").unwrap()
}

#[tokio::test]
async fn put_then_get_round_trips_document() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let id = BoardId::new("sq1");
    let document = RemoteDocument::from_board(&sample_board(), 100, 200);

    store.put(BOARDS_COLLECTION, &id, &document).await.unwrap();

    let loaded = store.get(BOARDS_COLLECTION, &id).await.unwrap().unwrap();
    assert_eq!(loaded, document);
    assert!(store.get("other", &id).await.unwrap().is_none());
}

#[tokio::test]
async fn put_fully_replaces_existing_document() {
    let store = SqliteDocumentStore::open_in_memory().unwrap();
    let id = BoardId::new("sq2");
    store
        .put(BOARDS_COLLECTION, &id, &RemoteDocument::from_board(&sample_board(), 1, 1))
        .await
        .unwrap();

    let replacement = RemoteDocument::from_board(&Board::default(), 1, 9);
    store.put(BOARDS_COLLECTION, &id, &replacement).await.unwrap();

    let loaded = store.get(BOARDS_COLLECTION, &id).await.unwrap().unwrap();
    assert_eq!(loaded, replacement);
    assert!(loaded.to_board().unwrap().is_blank());
}

#[tokio::test]
async fn corrupted_body_is_reported_as_invalid_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO documents (collection, id, body, created_at, updated_at)
         VALUES ('boards', 'bad', 'not json', 0, 0);",
        [],
    )
    .unwrap();
    let store = SqliteDocumentStore::new(conn);

    let err = store
        .get(BOARDS_COLLECTION, &BoardId::new("bad"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[tokio::test]
async fn documents_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boards.db");
    let id = BoardId::new("persisted");
    {
        let store = SqliteDocumentStore::open(&path).unwrap();
        store
            .put(BOARDS_COLLECTION, &id, &RemoteDocument::from_board(&sample_board(), 5, 6))
            .await
            .unwrap();
    }

    let store = SqliteDocumentStore::open(&path).unwrap();
    let loaded = store.get(BOARDS_COLLECTION, &id).await.unwrap().unwrap();
    assert_eq!(loaded.to_board().unwrap(), sample_board());
}

#[tokio::test]
async fn sessions_share_and_join_through_sqlite() {
    let store = Arc::new(SqliteDocumentStore::open_in_memory().unwrap());
    let (giver, _) = session(store.clone());
    giver.set_cell_word(6, "ROBOT").unwrap();
    giver.set_cell_color(6, CellColor::TeamB).unwrap();
    let id = giver.share_board().await.unwrap().board_id;
    giver.set_notes("watch out for 6");
    giver.flush().await.unwrap();

    let (guesser, _) = session(store.clone());
    guesser.load_board_from_id(id).await.unwrap();

    assert_eq!(guesser.board(), sample_board());
}

#[tokio::test]
async fn busy_database_does_not_stall_other_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("busy.db");
    let store = SqliteDocumentStore::open(&path).unwrap();
    let blocker = rusqlite::Connection::open(&path).unwrap();
    blocker.execute_batch("BEGIN IMMEDIATE;").unwrap();
    let started_at = Instant::now();

    let id = BoardId::new("busy");
    let document = RemoteDocument::from_board(&sample_board(), 1, 1);
    let release = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        blocker.execute_batch("COMMIT;").unwrap();
    };
    let (written, ()) = tokio::join!(store.put(BOARDS_COLLECTION, &id, &document), release);

    written.unwrap();
    assert!(started_at.elapsed() < Duration::from_secs(2));
    assert_eq!(
        store.get(BOARDS_COLLECTION, &id).await.unwrap().unwrap(),
        document
    );
}
