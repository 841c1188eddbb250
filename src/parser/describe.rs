//! Multi-line description accumulation with dedent normalization.

/// Accumulates `@description` text across comment lines.
///
/// The first contributing line fixes the dedent column: the width of its
/// comment-marker-plus-whitespace prefix, or the column where inline text
/// starts on the tag line itself. Continuation lines must sit at exactly
/// that column; bare markers insert paragraph breaks.
#[derive(Debug, Default)]
pub struct DescBuffer {
    open: bool,
    dedent: Option<usize>,
    lines: Vec<String>,
}

/// Outcome of feeding a comment line to an open buffer.
#[derive(Debug, PartialEq, Eq)]
pub enum Continuation {
    Consumed,
    /// The line is not part of the description; the buffer is closed and the
    /// line must be re-dispatched.
    Closed,
}

impl DescBuffer {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open on a bare `@description`; the first contributing line will fix
    /// the dedent column.
    pub fn open(&mut self) {
        self.open = true;
        self.dedent = None;
        self.lines.clear();
    }

    /// Open on `@description <text>`; the inline text seeds the buffer and
    /// its column becomes the dedent column.
    pub fn open_inline(&mut self, text: &str, column: usize) {
        self.open();
        self.dedent = Some(column);
        self.lines.push(text.to_string());
    }

    /// Feed a comment line while the buffer is open. `prefix` is the width
    /// of the marker-plus-whitespace prefix, `raw` the whole line.
    pub fn feed_comment(&mut self, prefix: usize, content: &str, raw: &str) -> Continuation {
        debug_assert!(self.open);

        // Bare marker: paragraph break, buffer stays open.
        if content.is_empty() {
            self.lines.push(String::new());
            return Continuation::Consumed;
        }

        match self.dedent {
            None => {
                self.dedent = Some(prefix);
                self.lines.push(content.to_string());
                Continuation::Consumed
            }
            // Continuations must sit exactly at the dedent column: a wider
            // prefix belongs to the next construct, a narrower one is
            // ordinary comment text.
            Some(dedent) if prefix != dedent => Continuation::Closed,
            Some(dedent) => {
                self.lines.push(raw[dedent..].to_string());
                Continuation::Consumed
            }
        }
    }

    /// Close the buffer and take the accumulated text. Leading and trailing
    /// blank lines are dropped; interior paragraph breaks are kept.
    pub fn close(&mut self) -> Option<String> {
        if !self.open {
            return None;
        }
        self.open = false;
        self.dedent = None;

        let lines = std::mem::take(&mut self.lines);
        let first = lines.iter().position(|l| !l.trim().is_empty())?;
        let last = lines.iter().rposition(|l| !l.trim().is_empty())?;
        Some(lines[first..=last].join("\n"))
    }
}
