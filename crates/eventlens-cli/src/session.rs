//! Interactive session over stdin
//!
//! ```text
//! users                 reload the user list
//! user <id>             select a user
//! address <id>          select an address
//! toggle <index|guid>   select or deselect an event
//! compare               open the comparison
//! close                 close the comparison
//! dismiss               clear the error message
//! apply <json>          dispatch a wire-form transition
//! state                 print the tree
//! quit                  leave
//! ```

use crate::commands::{explain, resolve_event, App};
use crate::render;
use anyhow::{bail, Context, Result};
use eventlens_app::workflows::explorer;
use eventlens_app::{AddressId, UserId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// One parsed session line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Reload user ids
    Users,
    /// Select a user
    User(UserId),
    /// Select an address
    Address(AddressId),
    /// Toggle an event given by index or guid
    Toggle(String),
    /// Open the comparison
    Compare,
    /// Close the comparison
    Close,
    /// Clear the error message
    Dismiss,
    /// Dispatch a wire-form transition
    Apply(String),
    /// Print the tree
    State,
    /// End the session
    Quit,
}

impl SessionCommand {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let (word, arg) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, Some(rest.trim())),
            None => (line, None),
        };

        let command = match (word, arg) {
            ("users", None) => Self::Users,
            ("user", Some(id)) => Self::User(UserId::new(id).context("Invalid user id")?),
            ("address", Some(id)) => {
                Self::Address(AddressId::new(id).context("Invalid address id")?)
            }
            ("toggle", Some(event)) => Self::Toggle(event.to_string()),
            ("compare", None) => Self::Compare,
            ("close", None) => Self::Close,
            ("dismiss", None) => Self::Dismiss,
            ("apply", Some(raw)) => Self::Apply(raw.to_string()),
            ("state", None) => Self::State,
            ("quit" | "exit", None) => Self::Quit,
            ("user" | "address" | "toggle" | "apply", None) => bail!("'{word}' needs an argument"),
            (_, Some(_)) if matches!(word, "users" | "compare" | "close" | "dismiss" | "state") => {
                bail!("'{word}' takes no argument")
            }
            _ => bail!("Unknown command '{word}'"),
        };
        Ok(Some(command))
    }
}

async fn execute(app: &App, command: SessionCommand) -> Result<()> {
    let result = match command {
        SessionCommand::Users => explorer::load_users(app).await,
        SessionCommand::User(id) => explorer::select_user(app, id).await,
        SessionCommand::Address(id) => explorer::select_address(app, id).await,
        SessionCommand::Toggle(selector) => {
            let state = explorer::snapshot(app).await;
            let guid = resolve_event(&state, &selector)?;
            explorer::toggle_event(app, guid).await
        }
        SessionCommand::Compare => explorer::request_comparison(app).await,
        SessionCommand::Close => explorer::close_comparison(app).await,
        SessionCommand::Dismiss => explorer::dismiss_error(app).await,
        SessionCommand::Apply(raw) => explorer::dispatch_transition(app, &raw).await,
        SessionCommand::State | SessionCommand::Quit => return Ok(()),
    };
    let dispatch = result.map_err(explain)?;
    if !dispatch.outcome.is_applied() {
        tracing::info!(outcome = ?dispatch.outcome, "command had no effect");
    }
    Ok(())
}

/// Read commands from `input` until `quit` or end of input, writing the tree
/// after each one.
pub async fn run<R, W>(app: &App, input: R, mut output: W, show_unchanged: bool) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let command = match SessionCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                output.write_all(format!("error: {e:#}\n").as_bytes()).await?;
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }

        let mut text = String::new();
        if let Err(e) = execute(app, command).await {
            text.push_str(&format!("error: {e:#}\n"));
        }
        let state = explorer::snapshot(app).await;
        text.push_str(&render::state(&state, show_unchanged));
        text.push('\n');
        output.write_all(text.as_bytes()).await?;
    }
    output.flush().await?;
    Ok(())
}
