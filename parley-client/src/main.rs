//! parley - WebSocket chat client
//!
//! Interactive prompt: plain lines are sent as chat messages, slash
//! commands drive the connection and the local transcript.

use tokio::io::{AsyncBufReadExt, BufReader};

use parley_client::cli::Args;
use parley_client::commands::{help_text, is_command, parse_command, Command};
use parley_client::config::ClientConfig;
use parley_client::{ChatEvent, Connection, Session, TranscriptStore};
use parley_utils::{init_logging_with_config, LogConfig, ParleyError, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    // Log to file by default, the prompt owns stdout/stderr
    let log_config = if args.verbose {
        LogConfig::development()
    } else {
        LogConfig::client()
    };
    init_logging_with_config(log_config)?;
    tracing::info!("parley client starting");

    match run_app(args).await {
        Ok(()) => {
            tracing::info!("parley client exiting normally");
            Ok(())
        }
        Err(e) => {
            tracing::error!("parley client error: {}", e);
            eprintln!("Error: {}", e);
            Err(e)
        }
    }
}

async fn run_app(args: Args) -> Result<()> {
    let config = ClientConfig::load();

    let endpoint = match (&args.url, &args.remote) {
        (Some(url), _) => url.clone(),
        (None, Some(alias)) => config.resolve_remote(alias).ok_or_else(|| {
            ParleyError::config(format!("Unknown remote alias '{}'", alias))
        })?,
        (None, None) => config.url.clone(),
    };
    let user = args.user.unwrap_or(config.user);

    let store = match args.transcript {
        Some(path) => TranscriptStore::new(path),
        None => TranscriptStore::at_default_path(),
    };

    let mut session = Session::new(user, store);
    let mut conn = Connection::new(endpoint);

    println!("parley - chatting as {}", session.user());
    let history = session.render_feed();
    if !history.is_empty() {
        println!("{}", history);
    }
    println!("{}", help_text());

    if args.connect {
        do_connect(&mut conn).await;
    } else {
        println!("status: {}", conn.state());
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    None => break,
                    Some(input) => {
                        if handle_line(&input, &mut conn, &mut session).await? {
                            break;
                        }
                    }
                }
            }

            event = conn.recv() => match event {
                Some(ChatEvent::Message(raw)) => {
                    let outcome = session.handle_inbound(&raw);
                    if let Some(line) = session.render_entry(outcome.index()) {
                        println!("{}", line);
                    }
                }
                Some(ChatEvent::Closed) | None => {
                    conn.mark_closed();
                    let failed = session.handle_disconnect();
                    if failed > 0 {
                        println!("! {} pending message(s) failed to send", failed);
                    }
                    println!("status: {}", conn.state());
                }
            }
        }
    }

    conn.disconnect().await;
    Ok(())
}

/// Handle one input line; returns true when the client should exit
async fn handle_line(input: &str, conn: &mut Connection, session: &mut Session) -> Result<bool> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(false);
    }

    if is_command(input) {
        return handle_command(input, conn, session).await;
    }

    // Plain line: send as a chat message
    if !conn.is_connected() {
        println!("! Not connected. Use /connect first.");
        return Ok(false);
    }

    let message = session.send(input);
    if let Some(line) = session.render_entry(session.feed().len() - 1) {
        println!("{}", line);
    }

    let wire = message
        .to_wire()
        .map_err(|e| ParleyError::protocol(e.to_string()))?;
    if let Err(e) = conn.send_text(wire).await {
        if let Some(id) = message.id.as_deref() {
            session.fail_pending(id);
        }
        println!("! Failed to send message: {}", e);
    }

    Ok(false)
}

async fn handle_command(input: &str, conn: &mut Connection, session: &mut Session) -> Result<bool> {
    let command = match parse_command(input) {
        Ok(command) => command,
        Err(e) => {
            println!("! {}", e);
            return Ok(false);
        }
    };

    match command {
        Command::Connect(url) => {
            if let Some(url) = url {
                conn.set_endpoint(url);
            }
            do_connect(conn).await;
        }
        Command::Disconnect => {
            conn.disconnect().await;
            let failed = session.handle_disconnect();
            if failed > 0 {
                println!("! {} pending message(s) failed to send", failed);
            }
            println!("status: {}", conn.state());
        }
        Command::Clear => {
            session.clear_history()?;
            println!("history cleared");
        }
        Command::Export => {
            let dir = std::env::current_dir()?;
            let path = session.store().export_to_file(&dir)?;
            println!("transcript written to {}", path.display());
        }
        Command::History => {
            let rendered = session.render_feed();
            if rendered.is_empty() {
                println!("(no messages)");
            } else {
                println!("{}", rendered);
            }
        }
        Command::Status => {
            println!("status: {} ({})", conn.state(), conn.endpoint());
        }
        Command::Help => {
            println!("{}", help_text());
        }
        Command::Quit => return Ok(true),
        Command::Unknown(name) => {
            println!("! unknown command /{}", name);
        }
    }

    Ok(false)
}

async fn do_connect(conn: &mut Connection) {
    println!("status: connecting to {}", conn.endpoint());
    match conn.connect().await {
        Ok(()) => println!("status: {}", conn.state()),
        Err(e) => {
            if !e.is_user_error() {
                tracing::warn!("Connect failed: {}", e);
            }
            println!("! {}", e);
        }
    }
}
