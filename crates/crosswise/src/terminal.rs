//! Line-oriented terminal front end.
//!
//! Reads commands from stdin and prints every snapshot the driver publishes,
//! either as a drawn board or as one JSON object per line.

use anyhow::Result;
use crosswise::{Command, GameEvent, MatchHandle, MatchView};
use crosswise_tictactoe::Cell;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

const HELP: &str = "Commands: 1-9 play a cell, h hint, d dismiss hint, r restart, q quit";

/// What a line of input asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Forward to the driver.
    Send(Command),
    /// End the match and leave.
    Quit,
    /// Print the command list.
    Help,
}

/// Parses one line of input.
pub fn parse_input(line: &str) -> Option<Input> {
    match line.trim().to_lowercase().as_str() {
        "" => None,
        "h" | "hint" => Some(Input::Send(Command::Hint)),
        "d" | "dismiss" => Some(Input::Send(Command::DismissHint)),
        "r" | "restart" => Some(Input::Send(Command::Restart)),
        "q" | "quit" | "end" => Some(Input::Quit),
        "?" | "help" => Some(Input::Help),
        other => Cell::parse(other).map(|cell| Input::Send(Command::Play(cell))),
    }
}

/// Renders a snapshot as text.
pub fn render(view: &MatchView) -> String {
    let mut out = String::new();
    out.push_str(&view.board.display());
    out.push('\n');
    out.push_str(&view.status);
    if let Some(turn) = &view.turn_label {
        out.push_str(" - ");
        out.push_str(turn);
    }
    if view.computer_thinking {
        out.push_str(" (thinking...)");
    }
    if let Some(line) = &view.winning_line {
        out.push_str(&format!("\nWinning line: {}", line));
    }
    if let Some(message) = &view.hint_message {
        out.push_str(&format!("\nHint: {}", message));
    }
    out
}

/// Runs the front end until the player quits or the driver stops.
#[instrument(skip_all, fields(json = json))]
pub async fn run(
    handle: MatchHandle,
    mut events: mpsc::UnboundedReceiver<GameEvent>,
    json: bool,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    if !json {
        println!("{}", HELP);
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(GameEvent::Snapshot(view)) => {
                    if json {
                        println!("{}", serde_json::to_string(&view)?);
                    } else {
                        println!("\n{}", render(&view));
                    }
                }
                None => {
                    debug!("Driver stopped");
                    break;
                }
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Input closed");
                    handle.send(Command::End);
                    break;
                };
                match parse_input(&line) {
                    Some(Input::Send(command)) => {
                        if !handle.send(command) {
                            break;
                        }
                    }
                    Some(Input::Quit) => {
                        handle.send(Command::End);
                        break;
                    }
                    Some(Input::Help) => println!("{}", HELP),
                    None => {
                        if !line.trim().is_empty() {
                            println!("Unrecognized input '{}'. {}", line.trim(), HELP);
                        }
                    }
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cells_and_commands() {
        assert_eq!(
            parse_input("5"),
            Some(Input::Send(Command::Play(Cell::Center)))
        );
        assert_eq!(
            parse_input(" top left "),
            Some(Input::Send(Command::Play(Cell::TopLeft)))
        );
        assert_eq!(parse_input("H"), Some(Input::Send(Command::Hint)));
        assert_eq!(parse_input("q"), Some(Input::Quit));
        assert_eq!(parse_input("10"), None);
        assert_eq!(parse_input(""), None);
    }
}
