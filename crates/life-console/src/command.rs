//! Text commands accepted by the console host.

use life_core::Position;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
    /// Flip one cell; only honored while paused
    Toggle(Position),
    Randomize,
    Save(PathBuf),
    Load(PathBuf),
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or_else(|| "empty command".to_string())?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "q" | "quit" => Command::Quit,
            "p" | "pause" => Command::TogglePause,
            "r" | "randomize" => Command::Randomize,
            "t" | "toggle" => {
                let row = parse_index(parts.next(), "row")?;
                let col = parse_index(parts.next(), "col")?;
                Command::Toggle(Position::new(row, col))
            }
            "s" | "save" => Command::Save(parse_path(parts.next())?),
            "l" | "load" => Command::Load(parse_path(parts.next())?),
            other => return Err(format!("unknown command '{}'", other)),
        };

        match parts.next() {
            Some(extra) => Err(format!("unexpected argument '{}'", extra)),
            None => Ok(command),
        }
    }
}

fn parse_index(arg: Option<&str>, name: &str) -> Result<usize, String> {
    let arg = arg.ok_or_else(|| format!("missing {}", name))?;
    arg.parse()
        .map_err(|_| format!("invalid {} '{}'", name, arg))
}

fn parse_path(arg: Option<&str>) -> Result<PathBuf, String> {
    arg.map(PathBuf::from)
        .ok_or_else(|| "missing path".to_string())
}
