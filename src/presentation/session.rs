//! Interactive session: one line per command against a shared board client.

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument};

use crate::clients::BoardClient;
use crate::domain::{OrderSubmission, TallySummary, TOP_ITEMS};
use crate::error::BoardError;
use crate::store::{LoadOutcome, UpsertKind};

use super::render;

pub const HELP: &str = "\
Commands:
  order <name> | <items> [| <note>]   place or replace an order (items comma separated)
  order <items>                       order for the name chosen with `pick`
  pick <n>                            choose a name from the roster
  roster                              list roster names
  delete <n>                          delete the order shown at position n
  list | tally | status | board       show orders, top items, counts, or everything
  refresh                             reload orders from the file
  save                                write orders to the file again
  menu [<path>]                       show the menu board, or upload a PNG/JPEG
  help | quit
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Order {
        name: Option<String>,
        items: String,
        note: String,
    },
    Pick(usize),
    Roster,
    Delete(usize),
    List,
    Tally,
    Status,
    Board,
    Refresh,
    Save,
    UploadMenu(PathBuf),
    ShowMenu,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses one input line. Blank lines are `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, BoardError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "order" => parse_order(rest),
            "pick" => SessionCommand::Pick(parse_position(word, rest)?),
            "roster" => SessionCommand::Roster,
            "delete" | "del" => SessionCommand::Delete(parse_position(word, rest)?),
            "list" => SessionCommand::List,
            "tally" => SessionCommand::Tally,
            "status" => SessionCommand::Status,
            "board" => SessionCommand::Board,
            "refresh" => SessionCommand::Refresh,
            "save" => SessionCommand::Save,
            "menu" if rest.is_empty() => SessionCommand::ShowMenu,
            "menu" => SessionCommand::UploadMenu(PathBuf::from(rest)),
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => {
                return Err(BoardError::Validation(format!(
                    "unknown command `{other}` (try `help`)"
                )))
            }
        };
        Ok(Some(command))
    }
}

fn parse_order(rest: &str) -> SessionCommand {
    let mut parts = rest.splitn(3, '|').map(str::trim);
    let first = parts.next().unwrap_or_default().to_string();
    match parts.next() {
        Some(items) => SessionCommand::Order {
            name: Some(first),
            items: items.to_string(),
            note: parts.next().unwrap_or_default().to_string(),
        },
        None => SessionCommand::Order {
            name: None,
            items: first,
            note: String::new(),
        },
    }
}

fn parse_position(word: &str, rest: &str) -> Result<usize, BoardError> {
    rest.parse()
        .map_err(|_| BoardError::Validation(format!("`{word}` needs a position number")))
}

/// What the loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

/// Per-session state: the shared client plus this user's picked name.
pub struct Session {
    client: BoardClient,
    roster: Vec<String>,
    selected_name: Option<String>,
}

impl Session {
    pub fn new(client: BoardClient, roster: Vec<String>) -> Self {
        Self {
            client,
            roster,
            selected_name: None,
        }
    }

    #[cfg(test)]
    pub fn selected_name(&self) -> Option<&str> {
        self.selected_name.as_deref()
    }

    #[instrument(skip(self))]
    pub async fn execute(&mut self, command: SessionCommand) -> Result<Reply, BoardError> {
        let text = match command {
            SessionCommand::Order { name, items, note } => self.order(name, items, note).await?,
            SessionCommand::Pick(position) => {
                let name = self.roster.get(position).cloned().ok_or_else(|| {
                    BoardError::Validation(format!("no roster entry {position}"))
                })?;
                let text = format!("Ordering as {name}\n");
                self.selected_name = Some(name);
                text
            }
            SessionCommand::Roster => self
                .roster
                .iter()
                .enumerate()
                .map(|(position, name)| format!("  [{position}] {name}\n"))
                .collect(),
            SessionCommand::Delete(display_index) => {
                let report = self.client.delete(display_index).await?;
                let mut text = format!("Deleted order for {}\n", report.change.name);
                push_persist_warning(&mut text, &report.persisted);
                text
            }
            SessionCommand::List => render::render_orders(&self.client.list_orders().await?),
            SessionCommand::Tally => render::render_tally(&self.tally_summary().await?),
            SessionCommand::Status => render::render_metrics(&self.client.metrics().await?),
            SessionCommand::Board => self.board().await?,
            SessionCommand::Refresh => {
                let note = match self.client.refresh().await? {
                    LoadOutcome::Loaded(count) => format!("Reloaded {count} orders\n"),
                    LoadOutcome::Missing => "No saved orders yet\n".to_string(),
                };
                note + &self.board().await?
            }
            SessionCommand::Save => {
                self.client.save().await?;
                "Orders saved\n".to_string()
            }
            SessionCommand::UploadMenu(path) => self.upload_menu(&path).await?,
            SessionCommand::ShowMenu => render::render_menu(self.client.get_menu().await?.as_ref()),
            SessionCommand::Help => HELP.to_string(),
            SessionCommand::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Text(text))
    }

    async fn order(
        &mut self,
        name: Option<String>,
        items: String,
        note: String,
    ) -> Result<String, BoardError> {
        let name = match name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.selected_name.clone().unwrap_or_default(),
        };
        let report = self
            .client
            .upsert(OrderSubmission::new(name.trim(), items, note))
            .await?;
        self.selected_name = None;

        let mut text = match report.change {
            UpsertKind::Inserted { .. } => format!("Order placed for {}\n", name.trim()),
            UpsertKind::Updated { .. } => format!("Order updated for {}\n", name.trim()),
        };
        push_persist_warning(&mut text, &report.persisted);
        Ok(text)
    }

    async fn tally_summary(&self) -> Result<TallySummary, BoardError> {
        Ok(TallySummary::from_ranked(self.client.tally().await?, TOP_ITEMS))
    }

    async fn board(&self) -> Result<String, BoardError> {
        let metrics = self.client.metrics().await?;
        let summary = self.tally_summary().await?;
        let orders = self.client.list_orders().await?;
        Ok(render::render_board(&metrics, &summary, &orders))
    }

    async fn upload_menu(&self, path: &Path) -> Result<String, BoardError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| BoardError::Image(format!("failed to read {}: {e}", path.display())))?;
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let image = self.client.upload_menu(bytes, label).await?;
        Ok(format!("Menu board uploaded\n{}", render::render_menu(Some(&image))))
    }
}

fn push_persist_warning(text: &mut String, persisted: &Result<(), BoardError>) {
    if let Err(e) = persisted {
        text.push_str(&format!("warning: change not saved ({e}); run `save` to retry\n"));
    }
}

/// Reads commands from `input` until `quit` or end of input, writing
/// replies and errors to `output`.
pub async fn run_session<R, W>(mut session: Session, input: R, mut output: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    output.write_all(b"> ").await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let reply = match SessionCommand::parse(&line) {
            Ok(Some(command)) => session.execute(command).await,
            Ok(None) => Ok(Reply::Text(String::new())),
            Err(e) => Err(e),
        };
        match reply {
            Ok(Reply::Quit) => break,
            Ok(Reply::Text(text)) => output.write_all(text.as_bytes()).await?,
            Err(e) => {
                debug!(error = %e, "Command failed");
                output.write_all(format!("error: {e}\n").as_bytes()).await?;
            }
        }
        output.write_all(b"> ").await?;
        output.flush().await?;
    }

    output.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_order_forms() {
        assert_eq!(
            SessionCommand::parse("order Jun | Americano, Latte | hot").unwrap(),
            Some(SessionCommand::Order {
                name: Some("Jun".into()),
                items: "Americano, Latte".into(),
                note: "hot".into(),
            })
        );
        assert_eq!(
            SessionCommand::parse("order Latte, Scone").unwrap(),
            Some(SessionCommand::Order {
                name: None,
                items: "Latte, Scone".into(),
                note: String::new(),
            })
        );
        // notes may themselves contain a pipe
        assert_eq!(
            SessionCommand::parse("ORDER Jun|Tea|a|b").unwrap(),
            Some(SessionCommand::Order {
                name: Some("Jun".into()),
                items: "Tea".into(),
                note: "a|b".into(),
            })
        );
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(SessionCommand::parse("   ").unwrap(), None);
        assert_eq!(SessionCommand::parse("delete 2").unwrap(), Some(SessionCommand::Delete(2)));
        assert_eq!(SessionCommand::parse("menu").unwrap(), Some(SessionCommand::ShowMenu));
        assert_eq!(
            SessionCommand::parse("menu ./board photo.png").unwrap(),
            Some(SessionCommand::UploadMenu(PathBuf::from("./board photo.png")))
        );
        assert_eq!(SessionCommand::parse("exit").unwrap(), Some(SessionCommand::Quit));
    }

    #[test]
    fn rejects_unknown_commands_and_bad_positions() {
        assert!(matches!(
            SessionCommand::parse("dance"),
            Err(BoardError::Validation(_))
        ));
        assert!(matches!(
            SessionCommand::parse("delete last"),
            Err(BoardError::Validation(_))
        ));
        assert!(SessionCommand::parse("pick").is_err());
    }
}
