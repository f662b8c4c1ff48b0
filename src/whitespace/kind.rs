//! The three whitespace issue kinds tracked per document.

use std::fmt;

/// A class of whitespace issue. Each kind owns one region set per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IssueKind {
    /// The document does not end with a newline.
    Eof,
    /// Two or more spaces between non-space characters.
    ExtraSpaces,
    /// Spaces or tabs at the end of a line.
    Trailing,
}

impl IssueKind {
    /// All kinds, in the order display and fix process them.
    pub const ALL: [IssueKind; 3] = [IssueKind::Eof, IssueKind::ExtraSpaces, IssueKind::Trailing];

    /// The name used in settings files and command arguments.
    pub fn name(self) -> &'static str {
        match self {
            IssueKind::Eof => "eof",
            IssueKind::ExtraSpaces => "extra",
            IssueKind::Trailing => "trailing",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "eof" => Some(IssueKind::Eof),
            "extra" => Some(IssueKind::ExtraSpaces),
            "trailing" => Some(IssueKind::Trailing),
            _ => None,
        }
    }

    /// Human-readable description of a single occurrence.
    pub fn message(self) -> &'static str {
        match self {
            IssueKind::Eof => "Missing newline at end of file",
            IssueKind::ExtraSpaces => "Multiple consecutive spaces",
            IssueKind::Trailing => "Trailing whitespace",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
