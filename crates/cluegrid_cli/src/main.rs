//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging and a document store into one board session.
//! - `show <board_id>` joins an existing board and prints it.
//! - `share` shares a fresh board and prints its reference.

use async_trait::async_trait;
use cluegrid_core::config::ENV_DB_PATH;
use cluegrid_core::{
    init_logging, BoardSession, DocumentStore, MemoryDocumentStore, ReferenceSink, SinkError,
    SqliteDocumentStore, SyncConfig,
};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Usage,
    Show(String),
    Share,
}

/// Maps CLI arguments to a command.
///
/// `show` is refused without a database: the in-memory store starts empty, so
/// no board id could ever be found.
fn parse_command(args: &[String], has_db: bool) -> Result<Command, String> {
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] => Ok(Command::Usage),
        ["show", _] if !has_db => Err(format!(
            "`show` needs a shared database; set {ENV_DB_PATH} to the board file"
        )),
        ["show", board_id] => Ok(Command::Show((*board_id).to_string())),
        ["share"] => Ok(Command::Share),
        other => Err(format!("unknown arguments: {}", other.join(" "))),
    }
}

struct StdoutSink;

#[async_trait]
impl ReferenceSink for StdoutSink {
    async fn write(&self, text: &str) -> Result<(), SinkError> {
        println!("reference={text}");
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match SyncConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(config.log_level, dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("cluegrid_core version={}", cluegrid_core::core_version());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args, config.db_path.is_some()) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };
    let session = open_session(config);

    let outcome = match command {
        Command::Usage => {
            println!("usage: cluegrid_cli show <board_id> | share");
            Ok(())
        }
        Command::Show(board_id) => show(&session, &board_id).await,
        Command::Share => share(&session).await,
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn open_session(config: SyncConfig) -> BoardSession {
    let sink = Arc::new(StdoutSink);
    let store: Arc<dyn DocumentStore> = match &config.db_path {
        Some(path) => match SqliteDocumentStore::open(path) {
            Ok(store) => Arc::new(store),
            Err(err) => {
                eprintln!("document store unavailable, editing locally: {err}");
                return BoardSession::local_only(config, sink);
            }
        },
        None => Arc::new(MemoryDocumentStore::new()),
    };
    BoardSession::new(config, store, sink)
}

async fn show(session: &BoardSession, board_id: &str) -> Result<(), String> {
    session
        .load_board_from_id(board_id)
        .await
        .map_err(|err| err.to_string())?;
    let board = session.board();
    for row in board.cells().chunks(5) {
        let line: Vec<String> = row
            .iter()
            .map(|cell| format!("{:>12}:{:<5}", cell.word, cell.color.as_str()))
            .collect();
        println!("{}", line.join(" "));
    }
    println!("notes={}", board.notes);
    Ok(())
}

async fn share(session: &BoardSession) -> Result<(), String> {
    let outcome = session.share_board().await.map_err(|err| err.to_string())?;
    if let Some(warning) = outcome.sink_warning {
        eprintln!("{warning}");
    }
    println!("board_id={} role={}", outcome.board_id, session.role());
    Ok(())
}
