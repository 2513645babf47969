//! Commands typed at the desktop prompt.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use shared::domain::{Face, FaceColorGrid};

pub const HELP: &str = "\
commands:
  scan <face> <image>   classify a photo of one face
  set <face> <colors>   enter nine sticker letters by hand, e.g. set U WWWWWWWWW
  clear <face>          forget one face
  clear-all             forget every face
  faces                 list the scanned faces
  solve                 request a solution and start playback
  next                  perform the current action (an empty line does the same)
  show                  print playback progress
  help                  this text
  quit                  leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan { face: Face, image: PathBuf },
    Set { face: Face, grid: FaceColorGrid },
    Clear { face: Face },
    ClearAll,
    Faces,
    Solve,
    Next,
    Show,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map(|(verb, rest)| (verb, rest.trim()))
            .unwrap_or((line, ""));

        let command = match verb.to_ascii_lowercase().as_str() {
            "" | "next" | "n" => Self::Next,
            "scan" => {
                let (face, image) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: scan <face> <image>"))?;
                Self::Scan {
                    face: parse_face(face)?,
                    image: PathBuf::from(image.trim()),
                }
            }
            "set" => {
                let (face, colors) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: set <face> <colors>"))?;
                Self::Set {
                    face: parse_face(face)?,
                    grid: colors.to_ascii_uppercase().parse()?,
                }
            }
            "clear" => Self::Clear {
                face: parse_face(rest)?,
            },
            "clear-all" => Self::ClearAll,
            "faces" => Self::Faces,
            "solve" => Self::Solve,
            "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command `{other}`; try `help`"),
        };
        Ok(command)
    }
}

/// Prompt input is case-insensitive, unlike move notation.
fn parse_face(raw: &str) -> Result<Face> {
    let mut chars = raw.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Face::from_letter(letter.to_ascii_uppercase())
            .ok_or_else(|| anyhow!("unknown face `{letter}`")),
        _ => bail!("expected one of U R F D L B, got `{raw}`"),
    }
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
