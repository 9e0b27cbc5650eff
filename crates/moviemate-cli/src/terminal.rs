use moviemate_core::{DisplayLabel, FocusProbe};
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;

/// The terminal window title, set with the xterm OSC 0 sequence.
///
/// Terminals offer no way to read the title back, so the last value written
/// is remembered and reported by `get`.
pub struct TerminalTitle {
    current: Mutex<String>,
    enabled: bool,
}

impl TerminalTitle {
    pub fn new(initial: &str) -> Self {
        let title = Self {
            current: Mutex::new(String::new()),
            enabled: io::stdout().is_terminal(),
        };
        title.set(initial);
        title
    }
}

pub fn title_sequence(title: &str) -> String {
    // Control characters would end the sequence early
    let clean: String = title.chars().filter(|c| !c.is_control()).collect();
    format!("\x1b]0;{}\x07", clean)
}

impl DisplayLabel for TerminalTitle {
    fn get(&self) -> String {
        self.current
            .lock()
            .map(|t| t.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn set(&self, label: &str) {
        *self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = label.to_string();
        if self.enabled {
            let mut stdout = io::stdout();
            if let Err(e) = write!(stdout, "{}", title_sequence(label)).and_then(|_| stdout.flush()) {
                tracing::debug!(error = %e, "Could not set terminal title");
            }
        }
    }
}

/// Keyboard focus as seen from the line prompt: a key event arrives either
/// from an empty line (nothing typed) or from an explicit `:key` command, and
/// in both cases no text is being edited.
pub struct PromptFocus;

impl FocusProbe for PromptFocus {
    fn text_input_focused(&self) -> bool {
        false
    }
}
