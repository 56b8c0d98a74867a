const FRAME_ERROR_COMMAND: &str = ":frame-error";
const QUIT_COMMAND: &str = ":quit";

/// What a line typed on stdin asks the host to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InputCommand {
    /// Raw prompt field value; validation happens in the controller.
    Prompt(String),
    /// Runtime error raised inside the current preview.
    FrameError { message: String, stack: Option<String> },
    Quit,
}

/// `:frame-error <message>` optionally followed by ` | <stack>`, where
/// `\n` in the stack stands for a line break.
pub(crate) fn parse_line(line: &str) -> InputCommand {
    let trimmed = line.trim();
    if trimmed == QUIT_COMMAND {
        return InputCommand::Quit;
    }
    if let Some(rest) = trimmed.strip_prefix(FRAME_ERROR_COMMAND) {
        let (message, stack) = match rest.split_once(" | ") {
            Some((message, stack)) => (message, Some(stack.trim().replace("\\n", "\n"))),
            None => (rest, None),
        };
        return InputCommand::FrameError {
            message: message.trim().to_string(),
            stack: stack.filter(|stack| !stack.is_empty()),
        };
    }
    InputCommand::Prompt(line.to_string())
}
