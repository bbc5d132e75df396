//! Transport event vocabulary.
//!
//! The frontend (and the native transport controller, when announcing is
//! enabled) broadcasts action names on the `ACTION` global event. Unknown
//! names are an error, not a panic, so a misbehaving frontend can't take the
//! listener down.

use std::str::FromStr;

/// Global event channel carrying transport action names.
pub const ACTION_EVENT: &str = "ACTION";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play,
    Stop,
    Done,
    Tick,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::Play => "PLAY",
            Action::Stop => "STOP",
            Action::Done => "DONE",
            Action::Tick => "TICK",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown transport action: {0:?}")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(input: &str) -> Result<Action, Self::Err> {
        match input {
            "PLAY" => Ok(Action::Play),
            "STOP" => Ok(Action::Stop),
            "DONE" => Ok(Action::Done),
            "TICK" => Ok(Action::Tick),
            other => Err(UnknownAction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_actions() {
        assert_eq!("PLAY".parse::<Action>().unwrap(), Action::Play);
        assert_eq!("STOP".parse::<Action>().unwrap(), Action::Stop);
        assert_eq!("DONE".parse::<Action>().unwrap(), Action::Done);
        assert_eq!("TICK".parse::<Action>().unwrap(), Action::Tick);
    }

    #[test]
    fn rejects_unknown_and_lowercase_names() {
        assert!("play".parse::<Action>().is_err());
        assert!("PAUSE".parse::<Action>().is_err());
        assert!("".parse::<Action>().is_err());
    }

    #[test]
    fn name_round_trips() {
        for action in [Action::Play, Action::Stop, Action::Done, Action::Tick] {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
    }
}
