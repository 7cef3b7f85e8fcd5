//! Loading change commands from JSON.
//!
//! A change file holds either a single command object or an array of them.

use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::command::ChangeCommand;
use crate::error::Result;

#[derive(Deserialize)]
#[serde(untagged)]
enum CommandFile {
    Many(Vec<ChangeCommand>),
    One(Box<ChangeCommand>),
}

impl From<CommandFile> for Vec<ChangeCommand> {
    fn from(file: CommandFile) -> Self {
        match file {
            CommandFile::Many(commands) => commands,
            CommandFile::One(command) => vec![*command],
        }
    }
}

/// Parses commands from a JSON string.
pub fn parse_commands(json: &str) -> Result<Vec<ChangeCommand>> {
    let file: CommandFile = serde_json::from_str(json)?;
    Ok(file.into())
}

/// Reads commands from a reader, e.g. stdin.
pub fn read_commands<R: Read>(mut reader: R) -> Result<Vec<ChangeCommand>> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    parse_commands(&json)
}

/// Loads commands from a file.
pub fn load_commands(path: &Path) -> Result<Vec<ChangeCommand>> {
    parse_commands(&fs::read_to_string(path)?)
}
