//! POSIX shell-style word splitting.
//!
//! Database lines quote values containing spaces, e.g.
//! `description:"buy milk"`. Splitting follows POSIX shell rules:
//!
//! - unquoted whitespace separates words;
//! - single quotes preserve everything literally;
//! - inside double quotes a backslash only escapes `"` or `\`, otherwise it
//!   is kept;
//! - outside quotes a backslash escapes any character;
//! - quoted and unquoted parts of one word are concatenated, and `""` is an
//!   empty word.
//!
//! `#` has no special meaning, unlike in a shell.

use crate::error::LineError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Between,
    Word,
    Single,
    Double,
}

/// Split `input` into words.
///
/// # Errors
///
/// Returns [`LineError::UnterminatedQuote`] for an unclosed quote and
/// [`LineError::TrailingEscape`] for a backslash at end of input.
pub fn split(input: &str) -> Result<Vec<String>, LineError> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut state = State::Between;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match state {
            State::Between | State::Word => match c {
                c if is_blank(c) => {
                    if state == State::Word {
                        words.push(std::mem::take(&mut word));
                        state = State::Between;
                    }
                }
                '\'' => state = State::Single,
                '"' => state = State::Double,
                '\\' => {
                    word.push(chars.next().ok_or(LineError::TrailingEscape)?);
                    state = State::Word;
                }
                c => {
                    word.push(c);
                    state = State::Word;
                }
            },
            State::Single => match c {
                '\'' => state = State::Word,
                c => word.push(c),
            },
            State::Double => match c {
                '"' => state = State::Word,
                '\\' => match chars.next() {
                    Some(escaped @ ('"' | '\\')) => word.push(escaped),
                    Some(other) => {
                        word.push('\\');
                        word.push(other);
                    }
                    None => return Err(LineError::UnterminatedQuote),
                },
                c => word.push(c),
            },
        }
    }

    match state {
        State::Single | State::Double => Err(LineError::UnterminatedQuote),
        State::Word => {
            words.push(word);
            Ok(words)
        }
        State::Between => Ok(words),
    }
}

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}
