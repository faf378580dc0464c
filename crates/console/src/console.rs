use crate::command::{Command, ParseError, parse};

/// Scrollback lines kept before the oldest are dropped.
const MAX_LOG_LINES: usize = 200;

/// Single-line console state: the edit buffer, submitted history, and
/// scrollback log.
#[derive(Debug, Default)]
pub struct Console {
    input: String,
    history: Vec<String>,
    /// Index into `history` while recalling with up/down; `None` when the
    /// user is editing a fresh line.
    history_cursor: Option<usize>,
    log: Vec<String>,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn insert_char(&mut self, ch: char) {
        if !ch.is_control() {
            self.input.push(ch);
            self.history_cursor = None;
        }
    }

    pub fn backspace(&mut self) {
        self.input.pop();
        self.history_cursor = None;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.history_cursor = None;
    }

    /// Append a line to the scrollback.
    pub fn println(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
        if self.log.len() > MAX_LOG_LINES {
            let excess = self.log.len() - MAX_LOG_LINES;
            self.log.drain(..excess);
        }
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Recall the previous history entry into the edit buffer.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let next = match self.history_cursor {
            None => self.history.len() - 1,
            Some(0) => 0,
            Some(at) => at - 1,
        };
        self.history_cursor = Some(next);
        self.input = self.history[next].clone();
    }

    /// Recall the next history entry, or clear the buffer past the newest.
    pub fn history_next(&mut self) {
        match self.history_cursor {
            None => {}
            Some(at) if at + 1 < self.history.len() => {
                self.history_cursor = Some(at + 1);
                self.input = self.history[at + 1].clone();
            }
            Some(_) => {
                self.history_cursor = None;
                self.input.clear();
            }
        }
    }

    /// Submit the current line: echo it to the log, record history, parse.
    ///
    /// Returns `None` for a blank line. Parse failures are logged and
    /// returned so the host can decide whether to surface them further.
    pub fn submit(&mut self) -> Option<Result<Command, ParseError>> {
        let line = std::mem::take(&mut self.input);
        self.history_cursor = None;
        if line.trim().is_empty() {
            return None;
        }

        self.println(format!("> {line}"));
        self.history.push(line.clone());

        let result = parse(&line);
        match &result {
            Ok(command) => tracing::debug!(?command, "console command"),
            Err(error) => {
                tracing::debug!(%error, "console parse error");
                self.println(error.to_string());
            }
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_line(console: &mut Console, line: &str) {
        for ch in line.chars() {
            console.insert_char(ch);
        }
    }

    #[test]
    fn editing_builds_the_input() {
        let mut console = Console::new();
        type_line(&mut console, "fov 60");
        assert_eq!(console.input(), "fov 60");
        console.backspace();
        assert_eq!(console.input(), "fov 6");
    }

    #[test]
    fn control_characters_are_ignored() {
        let mut console = Console::new();
        console.insert_char('\u{8}');
        console.insert_char('\n');
        assert_eq!(console.input(), "");
    }

    #[test]
    fn submit_parses_and_echoes() {
        let mut console = Console::new();
        type_line(&mut console, "fov 75");
        let result = console.submit();
        assert_eq!(result, Some(Ok(Command::Fov(75.0))));
        assert_eq!(console.input(), "");
        assert_eq!(console.log(), ["> fov 75"]);
    }

    #[test]
    fn submit_blank_is_none() {
        let mut console = Console::new();
        type_line(&mut console, "   ");
        assert_eq!(console.submit(), None);
        assert!(console.log().is_empty());
    }

    #[test]
    fn parse_errors_land_in_the_log() {
        let mut console = Console::new();
        type_line(&mut console, "warp 9");
        let result = console.submit();
        assert!(matches!(result, Some(Err(ParseError::Unknown(_)))));
        assert_eq!(console.log().len(), 2);
        assert!(console.log()[1].contains("unknown command"));
    }

    #[test]
    fn history_recall_walks_backwards() {
        let mut console = Console::new();
        type_line(&mut console, "fov 60");
        console.submit();
        type_line(&mut console, "mode free");
        console.submit();

        console.history_prev();
        assert_eq!(console.input(), "mode free");
        console.history_prev();
        assert_eq!(console.input(), "fov 60");
        // Stays pinned at the oldest entry.
        console.history_prev();
        assert_eq!(console.input(), "fov 60");

        console.history_next();
        assert_eq!(console.input(), "mode free");
        console.history_next();
        assert_eq!(console.input(), "");
    }

    #[test]
    fn log_is_bounded() {
        let mut console = Console::new();
        for i in 0..300 {
            console.println(format!("line {i}"));
        }
        assert_eq!(console.log().len(), 200);
        assert_eq!(console.log()[0], "line 100");
    }

    #[test]
    fn failed_commands_stay_in_history() {
        let mut console = Console::new();
        type_line(&mut console, "bogus");
        console.submit();
        console.history_prev();
        assert_eq!(console.input(), "bogus");
    }
}
