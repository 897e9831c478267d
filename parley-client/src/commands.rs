//! Client command parsing
//!
//! Parses slash commands typed at the prompt, like `/connect wss://...`
//! or `/export`. Any line that does not start with `/` is a chat message.

/// Parsed client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect, optionally switching to a new endpoint first
    Connect(Option<String>),
    /// Close the active connection
    Disconnect,
    /// Clear the persisted history and the visible feed
    Clear,
    /// Export the transcript to a text file
    Export,
    /// Reprint the whole feed
    History,
    /// Show the connection state
    Status,
    /// Show available commands
    Help,
    /// Exit the client
    Quit,
    /// Unknown command name
    Unknown(String),
}

/// Error parsing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Empty input
    Empty,
    /// Input does not start with `/`
    NotACommand,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::NotACommand => write!(f, "command must start with /"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Check whether an input line is a command rather than a message
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

/// Parse a command string into a Command
///
/// # Supported commands
///
/// - `/connect [url]` - connect, optionally to a different endpoint
/// - `/disconnect` - close the connection
/// - `/clear` - clear local chat history
/// - `/export` - write the transcript to `chat-transcript.txt`
/// - `/history` - reprint the feed
/// - `/status` - show the connection state
/// - `/help`, `/quit`
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    if !input.starts_with('/') {
        return Err(ParseError::NotACommand);
    }

    let parts: Vec<&str> = input[1..].splitn(2, char::is_whitespace).collect();
    let name = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();
    let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    let command = match name.as_str() {
        "connect" => Command::Connect(arg.map(str::to_string)),
        "disconnect" => Command::Disconnect,
        "clear" => Command::Clear,
        "export" => Command::Export,
        "history" => Command::History,
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(name),
    };
    Ok(command)
}

/// One-line usage summary for `/help`
pub fn help_text() -> &'static str {
    "commands: /connect [url]  /disconnect  /clear  /export  /history  /status  /quit"
}
