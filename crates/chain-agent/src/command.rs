//! Operator messages delivered alongside a tick.

const PAUSE_KEYWORD: &str = "pause";
const DEBUG_KEYWORD: &str = "debug";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Freeze in place until the next non-pause message.
    Pause,
    /// Set trace verbosity and resume.
    Verbosity(u8),
    /// Any other message resumes normal operation.
    Resume,
}

impl OperatorCommand {
    pub fn parse(message: &str) -> Self {
        if message == PAUSE_KEYWORD {
            return OperatorCommand::Pause;
        }
        if let Some(at) = message.find(DEBUG_KEYWORD) {
            let rest = format!("{}{}", &message[..at], &message[at + DEBUG_KEYWORD.len()..]);
            return OperatorCommand::Verbosity(leading_level(&rest));
        }
        OperatorCommand::Resume
    }
}

/// Leading decimal digits after whitespace; 0 when there are none or they overflow.
fn leading_level(text: &str) -> u8 {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(0)
}
