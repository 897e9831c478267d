//! parley-mock - local-only chat room
//!
//! A login step sets the display name, then every typed line is appended
//! to the persisted list and the whole room is reprinted. Nothing is ever
//! sent anywhere.

mod room;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;

use parley_client::TranscriptStore;
use parley_utils::{init_logging_with_config, LogConfig, Result};
use room::MockRoom;

/// parley-mock - chat with yourself, locally
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Display name (prompted for when omitted)
    #[arg(long, short = 'u', env = "PARLEY_USER")]
    user: Option<String>,

    /// Custom message list path
    #[arg(long)]
    store: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging_with_config(LogConfig::mock())?;
    tracing::info!("parley-mock starting");

    match run_app(args) {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!("parley-mock error: {}", e);
            eprintln!("Error: {}", e);
            Err(e)
        }
    }
}

fn run_app(args: Args) -> Result<()> {
    let user = match args.user {
        Some(user) => user,
        None => prompt_login()?,
    };

    let store = match args.store {
        Some(path) => TranscriptStore::new(path),
        None => TranscriptStore::new(parley_utils::mock_store_file()),
    };

    let room = MockRoom::login(user, store);
    println!("welcome, {} (local room, nothing leaves this machine)", room.user());
    println!("commands: /clear  /quit");
    rerender(&room);

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/clear" => {
                room.clear()?;
                rerender(&room);
            }
            _ => {
                room.post(input)?;
                rerender(&room);
            }
        }
    }

    Ok(())
}

fn prompt_login() -> Result<String> {
    print!("display name: ");
    std::io::stdout().flush()?;
    let mut name = String::new();
    std::io::stdin().read_line(&mut name)?;
    let name = name.trim();
    if name.is_empty() {
        Ok("Guest".to_string())
    } else {
        Ok(name.to_string())
    }
}

/// Reprint the whole room after every change
fn rerender(room: &MockRoom) {
    let rendered = room.render_all();
    println!("--- {} ---", room.user());
    if rendered.is_empty() {
        println!("(no messages)");
    } else {
        println!("{}", rendered);
    }
}
