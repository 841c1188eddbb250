//! Data model for parsed documentation — format-agnostic.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Where an entry came from: file identifier plus 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Complete parsed document, possibly spanning several source files.
#[derive(Debug, Default)]
pub struct Document {
    /// Sections and functions interleaved in source order.
    pub entries: Vec<Entry>,
    /// Declared types, in source order.
    pub types: Vec<TypeEntry>,
    pub xref: CrossRefIndex,
}

/// One emission in the document body.
#[derive(Debug)]
pub enum Entry {
    Section(SectionEntry),
    Function(FunctionEntry),
}

impl Document {
    /// All visible functions, in emission order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Function(f) => Some(f),
            Entry::Section(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.types.is_empty()
    }
}

/// A `@section` heading with its optional description.
#[derive(Debug)]
pub struct SectionEntry {
    pub title: String,
    pub description: Option<String>,
    pub location: SourceLocation,
}

/// A single documented function.
#[derive(Debug)]
pub struct FunctionEntry {
    pub name: String,
    pub location: SourceLocation,
    pub description: Option<String>,
    /// `@arg` entries in declaration order.
    pub args: Vec<Argument>,
    /// Environment variables read (`@env`), in tag order.
    pub env_reads: Vec<String>,
    /// Global variables written (`@set`), in tag order.
    pub var_writes: Vec<String>,
    /// `@see` cross-references, in tag order.
    pub see_also: Vec<String>,
    pub internal: bool,
    pub noargs: bool,
}

/// Parsed `@arg` entry: `name [(type)] description`.
#[derive(Debug, PartialEq, Eq)]
pub struct Argument {
    pub name: String,
    /// Empty when the tag carried no parenthesized type token.
    pub type_name: String,
    pub description: String,
}

/// A variable declaration annotated with `@type`.
#[derive(Debug)]
pub struct TypeEntry {
    pub name: String,
    pub location: SourceLocation,
}

/// Which functions read or write each named variable.
///
/// Both maps iterate lexicographically, so rendered listings are stable
/// across runs regardless of tag order in the sources.
#[derive(Debug, Default)]
pub struct CrossRefIndex {
    pub read_by: BTreeMap<String, BTreeSet<String>>,
    pub written_by: BTreeMap<String, BTreeSet<String>>,
}

impl CrossRefIndex {
    /// Record the env/set lists of a finalized function.
    pub fn record(&mut self, func: &FunctionEntry) {
        for var in &func.env_reads {
            self.read_by
                .entry(var.clone())
                .or_default()
                .insert(func.name.clone());
        }
        for var in &func.var_writes {
            self.written_by
                .entry(var.clone())
                .or_default()
                .insert(func.name.clone());
        }
    }
}
