use super::{ScriptError, ScriptLine, Step};
use crate::mask::MaskSource;

/// Parse a whole script
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut lines = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let step = parse_line(line, trimmed)?;
        lines.push(ScriptLine {
            line,
            source: trimmed.to_string(),
            step,
        });
    }
    Ok(lines)
}

fn parse_line(line: usize, text: &str) -> Result<Step, ScriptError> {
    let (command, rest) = split_word(text);

    let step = match command {
        "type" => Step::Type(required_text(line, command, rest)?),
        "paste" => Step::Paste(required_text(line, command, rest)?),
        "drop" => Step::Drop(required_text(line, command, rest)?),
        "backspace" => Step::Backspace(optional_count(line, rest)?),
        "delete" => Step::Delete(optional_count(line, rest)?),
        "select" => {
            let (start, rest) = split_word(rest);
            let (end, _) = split_word(rest);
            if start.is_empty() || end.is_empty() {
                return Err(missing(line, command, "a start and an end position"));
            }
            Step::Select {
                start: parse_number(line, start)?,
                end: parse_number(line, end)?,
            }
        }
        "click" => {
            if rest.is_empty() {
                Step::Click(None)
            } else {
                Step::Click(Some(parse_number(line, rest)?))
            }
        }
        "focus" => Step::Focus,
        "blur" => Step::Blur,
        "wait" => {
            if rest.is_empty() {
                return Err(missing(line, command, "a duration in milliseconds"));
            }
            Step::Wait(parse_number(line, rest)?)
        }
        "set" => parse_set(line, rest)?,
        "print" => Step::Print,
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            })
        }
    };
    Ok(step)
}

fn parse_set(line: usize, rest: &str) -> Result<Step, ScriptError> {
    let (target, value) = split_word(rest);
    let value = unquote(value);
    match target {
        "value" => Ok(Step::SetValue(value.to_string())),
        "unmasked" => Ok(Step::SetUnmasked(value.to_string())),
        "mask" => value
            .parse::<MaskSource>()
            .map(Step::SetMask)
            .map_err(|e| ScriptError::InvalidArgument {
                line,
                argument: value.to_string(),
                message: e.to_string(),
            }),
        "" => Err(missing(line, "set", "`value`, `unmasked` or `mask`")),
        other => Err(ScriptError::InvalidArgument {
            line,
            argument: other.to_string(),
            message: "expected `value`, `unmasked` or `mask`".to_string(),
        }),
    }
}

fn split_word(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (text, ""),
    }
}

fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
}

fn required_text(line: usize, command: &str, rest: &str) -> Result<String, ScriptError> {
    let text = unquote(rest);
    if text.is_empty() {
        return Err(missing(line, command, "some text"));
    }
    Ok(text.to_string())
}

fn optional_count(line: usize, rest: &str) -> Result<usize, ScriptError> {
    if rest.is_empty() {
        Ok(1)
    } else {
        parse_number(line, rest)
    }
}

fn parse_number<T: std::str::FromStr>(line: usize, text: &str) -> Result<T, ScriptError>
where
    T::Err: std::fmt::Display,
{
    text.trim()
        .parse()
        .map_err(|e: T::Err| ScriptError::InvalidArgument {
            line,
            argument: text.to_string(),
            message: e.to_string(),
        })
}

fn missing(line: usize, command: &str, expected: &'static str) -> ScriptError {
    ScriptError::MissingArgument {
        line,
        command: command.to_string(),
        expected,
    }
}
