//! Line classifier — purely syntactic, one line at a time, no lookahead.

use regex::Regex;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([[:blank:]]*#[[:blank:]]*)(.*)$").unwrap());

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z][A-Za-z0-9_-]*)(?:[[:blank:]]+(.*))?$").unwrap());

static RE_FUNC_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:blank:]]*function[[:blank:]]+([A-Za-z_][A-Za-z0-9_:.-]*)").unwrap()
});

static RE_FUNC_PARENS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[[:blank:]]*([A-Za-z_][A-Za-z0-9_:.-]*)[[:blank:]]*\([[:blank:]]*\)").unwrap()
});

static RE_VAR_ASSIGN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^[[:blank:]]*",
        r"(?:(?:declare|typeset|local|export|readonly)[[:blank:]]+(?:-[A-Za-z]+[[:blank:]]+)*)?",
        r"([A-Za-z_][A-Za-z0-9_]*)="
    ))
    .unwrap()
});

static RE_BLANK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[[:blank:]]*$").unwrap());

// -- Events -------------------------------------------------------------------

/// Classification of one raw source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event<'a> {
    /// `@section` with its (trimmed) title — possibly empty.
    Section(&'a str),
    Arg(&'a str),
    Set(&'a str),
    Env(&'a str),
    See(&'a str),
    Internal,
    NoArgs,
    /// `@description`, optionally carrying inline text and the column at
    /// which that text starts (the dedent column for continuations).
    Description(Option<Inline<'a>>),
    Type,
    /// Comment tag whose name is not in the vocabulary.
    Unknown(&'a str),
    FunctionDecl(&'a str),
    VarAssign(&'a str),
    Blank,
    /// Comment line not matching any tag: marker prefix width + content.
    Comment { prefix: usize, content: &'a str },
    /// Any other non-comment text.
    Code,
}

/// Inline description text with its starting column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inline<'a> {
    pub text: &'a str,
    pub column: usize,
}

// -- Tag dispatch table -------------------------------------------------------

/// Constructor for a tag event. Receives the raw payload (text after the tag
/// name, untrimmed) and the column in the line where the payload starts.
type TagCtor = for<'a> fn(&'a str, usize) -> Event<'a>;

fn tag_section<'a>(payload: &'a str, _: usize) -> Event<'a> {
    Event::Section(payload.trim())
}
fn tag_arg<'a>(payload: &'a str, _: usize) -> Event<'a> {
    Event::Arg(payload.trim())
}
fn tag_set<'a>(payload: &'a str, _: usize) -> Event<'a> {
    Event::Set(payload.trim())
}
fn tag_env<'a>(payload: &'a str, _: usize) -> Event<'a> {
    Event::Env(payload.trim())
}
fn tag_see<'a>(payload: &'a str, _: usize) -> Event<'a> {
    Event::See(payload.trim())
}
fn tag_internal<'a>(_: &'a str, _: usize) -> Event<'a> {
    Event::Internal
}
fn tag_noargs<'a>(_: &'a str, _: usize) -> Event<'a> {
    Event::NoArgs
}
fn tag_type<'a>(_: &'a str, _: usize) -> Event<'a> {
    Event::Type
}
fn tag_description<'a>(payload: &'a str, column: usize) -> Event<'a> {
    let text = payload.trim_end();
    if text.is_empty() {
        Event::Description(None)
    } else {
        Event::Description(Some(Inline { text, column }))
    }
}

/// The annotation vocabulary, mapping each tag name to its event constructor.
static TAG_TABLE: &[(&str, TagCtor)] = &[
    ("section", tag_section),
    ("description", tag_description),
    ("arg", tag_arg),
    ("set", tag_set),
    ("env", tag_env),
    ("see", tag_see),
    ("internal", tag_internal),
    ("noargs", tag_noargs),
    ("type", tag_type),
];

/// Tags that clear panic mode. Deliberately omits `see` and `internal`.
static RESYNC_TAGS: &[&str] = &[
    "section",
    "arg",
    "set",
    "env",
    "type",
    "noargs",
    "description",
];

// -- Classification -----------------------------------------------------------

/// Classify one raw line. Pure: no state, no side effects.
pub fn classify(line: &str) -> Event<'_> {
    if let Some(caps) = RE_COMMENT.captures(line) {
        let prefix = caps.get(1).unwrap();
        let content = caps.get(2).unwrap();
        if let Some(tag) = RE_TAG.captures(content.as_str()) {
            let name = tag.get(1).unwrap().as_str();
            let (payload, column) = match tag.get(2) {
                Some(m) => (m.as_str(), prefix.len() + m.start()),
                None => ("", line.len()),
            };
            return match TAG_TABLE.iter().find(|(n, _)| *n == name) {
                Some((_, ctor)) => ctor(payload, column),
                None => Event::Unknown(name),
            };
        }
        return Event::Comment {
            prefix: prefix.len(),
            content: content.as_str(),
        };
    }

    if RE_BLANK.is_match(line) {
        return Event::Blank;
    }
    if let Some(caps) = RE_FUNC_KEYWORD.captures(line) {
        return Event::FunctionDecl(caps.get(1).unwrap().as_str());
    }
    if let Some(caps) = RE_FUNC_PARENS.captures(line) {
        return Event::FunctionDecl(caps.get(1).unwrap().as_str());
    }
    if let Some(caps) = RE_VAR_ASSIGN.captures(line) {
        return Event::VarAssign(caps.get(1).unwrap().as_str());
    }
    Event::Code
}

/// Whether a line can clear panic mode: a comment line carrying one of the
/// resynchronization tags. Checked instead of full classification while
/// skipping.
pub fn is_resync(line: &str) -> bool {
    let Some(caps) = RE_COMMENT.captures(line) else {
        return false;
    };
    let Some(tag) = RE_TAG.captures(caps.get(2).unwrap().as_str()) else {
        return false;
    };
    RESYNC_TAGS.contains(&tag.get(1).unwrap().as_str())
}
