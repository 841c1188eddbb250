//! Annotation parser — line-by-line state machine over classified events.
//!
//! One `Parser` owns everything a run accumulates: the document under
//! construction, the fatal-error log, the panic-mode flag, and the pending
//! block. Feeding several files through the same parser shares the
//! cross-reference index across them.

pub mod classify;
mod describe;

use crate::diag::{Diagnostic, Reporter};
use crate::model::*;
use classify::Event;
use describe::{Continuation, DescBuffer};

/// Fields accumulated for the block under construction.
#[derive(Default)]
struct Block {
    section: Option<PendingSection>,
    type_pending: bool,
    description: Option<String>,
    args: Vec<Argument>,
    env_reads: Vec<String>,
    var_writes: Vec<String>,
    see_also: Vec<String>,
    internal: bool,
    noargs: bool,
}

struct PendingSection {
    title: String,
    description: Option<String>,
    location: SourceLocation,
}

impl Block {
    /// Any function-directed content collected? Blocks with none produce no
    /// FunctionEntry (undocumented declarations are not emitted).
    fn has_function_fields(&self) -> bool {
        self.description.is_some()
            || !self.args.is_empty()
            || !self.env_reads.is_empty()
            || !self.var_writes.is_empty()
            || !self.see_also.is_empty()
            || self.internal
            || self.noargs
    }
}

/// Single-pass annotation parser. Construct once per run, feed each input
/// file, then call [`Parser::finish`].
pub struct Parser<'r> {
    reporter: &'r Reporter,
    doc: Document,
    errors: Vec<Diagnostic>,
    panic_mode: bool,
    block: Block,
    desc: DescBuffer,
    file: String,
    line: u32,
}

impl<'r> Parser<'r> {
    pub fn new(reporter: &'r Reporter) -> Self {
        Self {
            reporter,
            doc: Document::default(),
            errors: Vec::new(),
            panic_mode: false,
            block: Block::default(),
            desc: DescBuffer::default(),
            file: String::new(),
            line: 0,
        }
    }

    /// Parse one source file. End of input is a synchronization point, so
    /// nothing pending leaks into the next file except the shared document
    /// and cross-reference state.
    pub fn parse(&mut self, file: &str, input: &str) {
        self.file = file.to_string();
        let functions_before = self.doc.functions().count();
        let types_before = self.doc.types.len();

        for (idx, line) in input.lines().enumerate() {
            self.line = idx as u32 + 1;
            self.process_line(line);
        }
        self.end_of_input();

        self.reporter.info(&format!(
            "{}: {} functions, {} types",
            file,
            self.doc.functions().count() - functions_before,
            self.doc.types.len() - types_before,
        ));
    }

    /// Consume the parser. Fatal errors discard the document.
    pub fn finish(mut self) -> Result<Document, Vec<Diagnostic>> {
        if self.errors.is_empty() {
            Ok(std::mem::take(&mut self.doc))
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }

    fn loc(&self) -> SourceLocation {
        SourceLocation::new(self.file.clone(), self.line)
    }

    // -- Line processing ------------------------------------------------------

    fn process_line(&mut self, line: &str) {
        // Panic mode skips everything until a resynchronization tag.
        if self.panic_mode {
            if !classify::is_resync(line) {
                return;
            }
            self.panic_mode = false;
            self.reporter
                .debug(&format!("resynchronized at {}", self.loc()));
        }

        let event = classify::classify(line);

        // An open description buffer consumes comment lines; anything else
        // closes it and is handled normally.
        if self.desc.is_open() {
            if let Event::Comment { prefix, content } = event {
                match self.desc.feed_comment(prefix, content, line) {
                    Continuation::Consumed => return,
                    Continuation::Closed => {
                        // Ordinary comment text: inert after the close.
                        self.commit_description();
                        return;
                    }
                }
            }
            self.commit_description();
        }

        match event {
            Event::Section(title) => {
                if title.is_empty() {
                    self.record_fatal("@section requires a title");
                } else {
                    self.block.section = Some(PendingSection {
                        title: title.to_string(),
                        description: None,
                        location: self.loc(),
                    });
                }
            }
            Event::Description(inline) => match inline {
                Some(seed) => self.desc.open_inline(seed.text, seed.column),
                None => self.desc.open(),
            },
            Event::Arg(raw) => {
                if raw.is_empty() {
                    self.record_fatal("@arg requires a name");
                } else {
                    self.block.args.push(parse_argument(raw));
                }
            }
            Event::Env(raw) => {
                if let Some(name) = first_token(raw) {
                    self.block.env_reads.push(name.to_string());
                }
            }
            Event::Set(raw) => {
                if let Some(name) = first_token(raw) {
                    self.block.var_writes.push(name.to_string());
                }
            }
            Event::See(raw) => {
                if !raw.is_empty() {
                    self.block.see_also.push(raw.to_string());
                }
            }
            Event::Internal => self.block.internal = true,
            Event::NoArgs => self.block.noargs = true,
            Event::Type => self.block.type_pending = true,
            Event::Unknown(name) => self.advisory(&format!("unknown tag @{name}")),
            Event::FunctionDecl(name) => self.flush_function(name),
            Event::VarAssign(name) => {
                if self.block.type_pending {
                    self.flush_type(name);
                } else {
                    self.synchronize();
                }
            }
            Event::Blank | Event::Code => self.synchronize(),
            // Unmatched comment lines outside a description are inert.
            Event::Comment { .. } => {}
        }
    }

    /// Bind a closed description to the pending section if it has none yet,
    /// otherwise to the pending function. Last write wins.
    fn commit_description(&mut self) {
        let Some(text) = self.desc.close() else {
            return;
        };
        if !self.block.has_function_fields() {
            if let Some(section) = &mut self.block.section {
                if section.description.is_none() {
                    section.description = Some(text);
                    return;
                }
            }
        }
        self.block.description = Some(text);
    }

    // -- Synchronization & flush ----------------------------------------------

    fn flush_function(&mut self, name: &str) {
        let location = self.loc();

        if self.block.type_pending {
            self.advisory("@type attached to a function block");
            self.block.type_pending = false;
        }
        if let Some(section) = self.block.section.take() {
            self.advisory("@section attached to a function block");
            self.emit_section(section);
        }

        if !self.block.has_function_fields() {
            self.block = Block::default();
            return;
        }

        let block = std::mem::take(&mut self.block);
        if block.noargs && !block.args.is_empty() {
            self.record_fatal("@noargs conflicts with @arg entries");
        }

        let entry = FunctionEntry {
            name: name.to_string(),
            location,
            description: block.description,
            args: block.args,
            env_reads: block.env_reads,
            var_writes: block.var_writes,
            see_also: block.see_also,
            internal: block.internal,
            noargs: block.noargs,
        };

        if entry.internal {
            self.reporter
                .debug(&format!("discarded internal function {}", entry.name));
            return;
        }
        self.reporter
            .debug(&format!("flushed function {} at {}", entry.name, entry.location));
        self.doc.xref.record(&entry);
        self.doc.entries.push(Entry::Function(entry));
    }

    fn flush_type(&mut self, name: &str) {
        let entry = TypeEntry {
            name: name.to_string(),
            location: self.loc(),
        };
        self.reporter
            .debug(&format!("flushed type {} at {}", entry.name, entry.location));
        self.doc.types.push(entry);
        self.block = Block::default();
    }

    /// Non-declaration synchronization point: blank or code line, or end of
    /// input. Flushes a pending section, drops an orphaned type flag, and
    /// resets the accumulator.
    fn synchronize(&mut self) {
        if let Some(section) = self.block.section.take() {
            self.emit_section(section);
        }
        if self.block.type_pending {
            self.reporter
                .debug(&format!("orphaned @type dropped at {}", self.loc()));
        }
        self.block = Block::default();
    }

    fn emit_section(&mut self, section: PendingSection) {
        self.reporter.debug(&format!(
            "flushed section \"{}\" at {}",
            section.title, section.location
        ));
        self.doc.entries.push(Entry::Section(SectionEntry {
            title: section.title,
            description: section.description,
            location: section.location,
        }));
    }

    fn end_of_input(&mut self) {
        self.commit_description();
        self.synchronize();
        self.panic_mode = false;
    }

    // -- Diagnostics ----------------------------------------------------------

    fn record_fatal(&mut self, message: &str) {
        self.errors.push(Diagnostic::fatal(message, self.loc()));
        self.panic_mode = true;
        self.reporter
            .debug(&format!("panic mode entered at {}", self.loc()));
    }

    fn advisory(&self, message: &str) {
        self.reporter
            .report(&Diagnostic::advisory(message, self.loc()));
    }
}

// -- Tag payload helpers ------------------------------------------------------

fn first_token(raw: &str) -> Option<&str> {
    raw.split_whitespace().next()
}

/// Parse an `@arg` payload: `name [(type)] [description...]`.
///
/// The type is recognized only as a parenthesized token right after the
/// name; otherwise the whole remainder is the description.
fn parse_argument(raw: &str) -> Argument {
    let raw = raw.trim();
    let (name, rest) = match raw.find(char::is_whitespace) {
        Some(at) => (&raw[..at], raw[at..].trim_start()),
        None => (raw, ""),
    };

    let (type_name, description) = match rest.strip_prefix('(') {
        Some(after) => match after.find(')') {
            Some(close) => (
                after[..close].trim(),
                after[close + 1..].trim_start(),
            ),
            None => ("", rest),
        },
        None => ("", rest),
    };

    Argument {
        name: name.to_string(),
        type_name: type_name.to_string(),
        description: description.to_string(),
    }
}
