//! Line based text protocol between the engine and a game coordinator.
//!
//! The coordinator sends one command per line and the engine answers on a
//! single line where an answer is expected.
//!
//! ## Supported Commands
//!
//! - `name` - Return the engine name
//! - `isready` - Return `readyok`
//! - `position ... <column>` - The opponent played `<column>` (the last
//!   character of the line, `0` to `6`)
//! - `go` - Search, play the engine's move and return `bestmove <column> <score>`
//! - `perft <depth>` - Return the number of leaves `<depth>` plies ahead
//! - `quit` - Return `quitting` and stop reading
//!
//! Blank lines and unknown commands are ignored. A command that cannot be
//! carried out is answered with `error <reason>`.
//!
//! ## Example
//!
//! ```
//! use connect4_minimax::{engine::Engine, protocol::ProtocolAdapter};
//!
//! let mut adapter = ProtocolAdapter::new(Engine::new());
//! let mut output = Vec::new();
//! adapter.run("isready\nperft 2\nquit\n".as_bytes(), &mut output).unwrap();
//! assert_eq!(String::from_utf8(output).unwrap(), "readyok\n49\nquitting\n");
//! ```

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};

use std::io::{self, BufRead, Write};

use crate::{engine::Engine, position::Side, WIDTH};

/// A parsed coordinator command
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Name,
    IsReady,
    /// The opponent's move, or `None` when the line carries no move
    Position(Option<usize>),
    Go,
    Perft(usize),
    Quit,
}

impl Command {
    /// Parses a command line
    ///
    /// Returns `Ok(None)` for lines that are not commands.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut tokens = line.split_whitespace();
        let keyword = match tokens.next() {
            Some(keyword) => keyword.to_lowercase(),
            None => return Ok(None),
        };

        let command = match keyword.as_str() {
            "name" => Command::Name,
            "isready" => Command::IsReady,
            "go" => Command::Go,
            "quit" => Command::Quit,
            "position" => Command::Position(Self::parse_move(line)?),
            "perft" => {
                let depth = tokens
                    .last()
                    .ok_or_else(|| anyhow!("perft needs a depth"))?;
                let depth = depth
                    .parse::<usize>()
                    .with_context(|| format!("could not parse '{}' as a perft depth", depth))?;
                Command::Perft(depth)
            }
            _ => return Ok(None),
        };
        Ok(Some(command))
    }

    // the opponent's move is the last character of the line
    fn parse_move(line: &str) -> Result<Option<usize>> {
        match line.trim_end().chars().last().and_then(|c| c.to_digit(10)) {
            Some(column) if (column as usize) < WIDTH => Ok(Some(column as usize)),
            Some(column) => Err(anyhow!(
                "column {} out of range, columns must be between 0 and {}",
                column,
                WIDTH - 1
            )),
            None => Ok(None),
        }
    }
}

/// Relays coordinator commands to an [`Engine`]
pub struct ProtocolAdapter {
    engine: Engine,
    show_board: bool,
}

impl ProtocolAdapter {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            show_board: false,
        }
    }

    /// Draw the board to stderr after every move
    pub fn with_board_display(mut self, show_board: bool) -> Self {
        self.show_board = show_board;
        self
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Reads commands from `input` until `quit` or the end of input, writing
    /// replies to `output`
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let command = match Command::parse(line) {
                Ok(Some(command)) => command,
                Ok(None) => {
                    debug!("ignoring '{}'", line);
                    continue;
                }
                Err(err) => {
                    warn!("ignoring '{}': {}", line, err);
                    continue;
                }
            };

            if let Some(reply) = self.execute(command) {
                writeln!(output, "{}", reply).context("failed to write reply")?;
                output.flush().context("failed to flush reply")?;
            }

            if command == Command::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Carries out a command and returns the reply, if the command has one
    pub fn execute(&mut self, command: Command) -> Option<String> {
        match command {
            Command::Name => Some(self.engine.name().to_string()),

            Command::IsReady => Some("readyok".to_string()),

            Command::Position(None) => None,

            Command::Position(Some(column)) => {
                match self.engine.apply_move(column, Side::PlayerTwo) {
                    Ok(()) => {
                        self.show();
                        None
                    }
                    Err(err) => Some(format!("error {}", err)),
                }
            }

            Command::Go => match self.engine.best_move() {
                Ok((column, score)) => {
                    self.show();
                    Some(format!("bestmove {} {}", column, score))
                }
                Err(err) => Some(format!("error {}", err)),
            },

            Command::Perft(depth) => Some(self.engine.node_count(depth).to_string()),

            Command::Quit => Some("quitting".to_string()),
        }
    }

    fn show(&self) {
        if !self.show_board {
            return;
        }
        if let Err(err) = self.engine.position().display(&mut io::stderr()) {
            warn!("failed to draw board: {}", err);
        }
    }
}
