//! Intents and the actions that resolve them.
//!
//! An [`Intent`] is an unvalidated request parsed once at the system
//! boundary. The engine queues it and, when its turn in the queue comes,
//! turns it into a concrete action ([`MoveAction`], [`AttackAction`],
//! [`SpeakAction`]) that is validated and applied through
//! [`ActionTransition`].

mod available;
mod combat;
mod error;
mod movement;
mod speak;
mod transition;

pub use available::{LegalIntents, legal_intents};
pub use combat::AttackAction;
pub use error::{IntentError, IntentParseError};
pub use movement::MoveAction;
pub use speak::SpeakAction;
pub use transition::ActionTransition;

use std::fmt;
use std::str::FromStr;

use crate::state::{EntityId, Position};

/// Unvalidated request from a player or a decision provider.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    /// Walk to a cell along the shortest free route.
    Move(Position),
    /// Fire at a visible enemy cell, or at a random cell when `None`.
    Attack(Option<Position>),
    /// Send a message to a visible teammate standing on the cell.
    Speak(Position, String),
}

impl Intent {
    /// Cells named by the intent.
    pub fn cell(&self) -> Option<Position> {
        match self {
            Intent::Move(cell) | Intent::Speak(cell, _) => Some(*cell),
            Intent::Attack(cell) => *cell,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Intent::Move(_) => "MOVE",
            Intent::Attack(_) => "ATTACK",
            Intent::Speak(..) => "SPEAK",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::Move(cell) => write!(f, "MOVE {cell}"),
            Intent::Attack(Some(cell)) => write!(f, "ATTACK {cell}"),
            Intent::Attack(None) => f.write_str("ATTACK"),
            Intent::Speak(cell, message) => write!(f, "SPEAK {cell} {message}"),
        }
    }
}

/// Splits `[x, y]rest` into the cell and whatever follows the bracket.
fn parse_cell<'a>(input: &'a str, keyword: &str) -> Result<(Position, &'a str), IntentParseError> {
    let Some(body) = input.strip_prefix('[') else {
        return Err(IntentParseError::MissingCell {
            keyword: keyword.to_string(),
        });
    };
    let Some(close) = body.find(']') else {
        return Err(IntentParseError::MalformedCell(input.to_string()));
    };
    let (inner, rest) = body.split_at(close);
    let malformed = || IntentParseError::MalformedCell(format!("[{inner}]"));

    let mut parts = inner.split(',').map(str::trim);
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };
    let x = x.parse::<i32>().map_err(|_| malformed())?;
    let y = y.parse::<i32>().map_err(|_| malformed())?;
    Ok((Position::new(x, y), &rest[1..]))
}

impl FromStr for Intent {
    type Err = IntentParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() {
            return Err(IntentParseError::Empty);
        }
        let split = input
            .find(|c: char| c.is_whitespace() || c == '[')
            .unwrap_or(input.len());
        let (keyword, rest) = input.split_at(split);
        let rest = rest.trim_start();

        match keyword.to_ascii_uppercase().as_str() {
            "MOVE" => {
                let (cell, tail) = parse_cell(rest, "MOVE")?;
                match tail.trim() {
                    "" => Ok(Intent::Move(cell)),
                    extra => Err(IntentParseError::TrailingInput(extra.to_string())),
                }
            }
            "ATTACK" if rest.is_empty() => Ok(Intent::Attack(None)),
            "ATTACK" => {
                let (cell, tail) = parse_cell(rest, "ATTACK")?;
                match tail.trim() {
                    "" => Ok(Intent::Attack(Some(cell))),
                    extra => Err(IntentParseError::TrailingInput(extra.to_string())),
                }
            }
            "SPEAK" => {
                let (cell, tail) = parse_cell(rest, "SPEAK")?;
                match tail.trim() {
                    "" => Err(IntentParseError::MissingMessage),
                    message => Ok(Intent::Speak(cell, message.to_string())),
                }
            }
            _ => Err(IntentParseError::UnknownKeyword(keyword.to_string())),
        }
    }
}

/// An intent waiting in the resolution queue.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueuedIntent {
    pub actor: EntityId,
    pub intent: Intent,
    /// Free-form reasoning attached by the submitter, kept in the historic log.
    pub rationale: Option<String>,
}

/// What a successfully applied action set in motion.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionOutcome {
    /// The agent stepped onto the first cell of its route.
    Moved {
        from: Position,
        to: Position,
        destination: Position,
        remaining: usize,
    },
    /// A projectile left the shooter's cell.
    Fired {
        projectile: EntityId,
        target: Position,
        wild: bool,
    },
    /// A message reached a teammate.
    Spoke {
        recipient: EntityId,
        from: Position,
        to: Position,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_forms() {
        assert_eq!(
            "MOVE [3, -2]".parse::<Intent>(),
            Ok(Intent::Move(Position::new(3, -2)))
        );
        assert_eq!(
            "  attack[1,1] ".parse::<Intent>(),
            Ok(Intent::Attack(Some(Position::new(1, 1))))
        );
        assert_eq!("ATTACK".parse::<Intent>(), Ok(Intent::Attack(None)));
        assert_eq!(
            "Speak [0, 4] enemy spotted near [2, 2]".parse::<Intent>(),
            Ok(Intent::Speak(
                Position::new(0, 4),
                "enemy spotted near [2, 2]".to_string()
            ))
        );
    }

    #[test]
    fn display_matches_wire_form() {
        let intents = [
            Intent::Move(Position::new(-1, 5)),
            Intent::Attack(Some(Position::new(2, 2))),
            Intent::Attack(None),
            Intent::Speak(Position::new(0, 0), "hold position".to_string()),
        ];
        for intent in intents {
            assert_eq!(intent.to_string().parse::<Intent>(), Ok(intent));
        }
        assert_eq!(Intent::Move(Position::new(-1, 5)).to_string(), "MOVE [-1, 5]");
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!("".parse::<Intent>(), Err(IntentParseError::Empty));
        assert_eq!(
            "JUMP [1, 1]".parse::<Intent>(),
            Err(IntentParseError::UnknownKeyword("JUMP".to_string()))
        );
        assert!(matches!(
            "MOVE 1, 1".parse::<Intent>(),
            Err(IntentParseError::MissingCell { .. })
        ));
        assert!(matches!(
            "MOVE [1, x]".parse::<Intent>(),
            Err(IntentParseError::MalformedCell(_))
        ));
        assert!(matches!(
            "MOVE [1, 2, 3]".parse::<Intent>(),
            Err(IntentParseError::MalformedCell(_))
        ));
        assert!(matches!(
            "MOVE [1, 2".parse::<Intent>(),
            Err(IntentParseError::MalformedCell(_))
        ));
        assert_eq!(
            "SPEAK [1, 2]".parse::<Intent>(),
            Err(IntentParseError::MissingMessage)
        );
        assert!(matches!(
            "MOVE [1, 2] now".parse::<Intent>(),
            Err(IntentParseError::TrailingInput(_))
        ));
    }
}
