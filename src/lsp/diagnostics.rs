//! Diagnostics conversion from annotated region sets.

use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity, NumberOrString};

use crate::document::Buffer;
use crate::whitespace::{IssueKind, Region};

/// Value of `Diagnostic::source` for everything this server publishes.
pub const DIAGNOSTIC_SOURCE: &str = "whitespaces";

/// Convert every annotated region on the buffer to an LSP diagnostic.
pub fn to_diagnostics(buffer: &Buffer) -> Vec<Diagnostic> {
    buffer
        .annotations()
        .into_iter()
        .flat_map(|(kind, regions)| {
            regions
                .into_iter()
                .map(move |region| region_to_diagnostic(buffer, kind, region))
        })
        .collect()
}

fn region_to_diagnostic(buffer: &Buffer, kind: IssueKind, region: Region) -> Diagnostic {
    Diagnostic {
        range: buffer.line_index().region_to_range(region),
        severity: Some(DiagnosticSeverity::WARNING),
        code: Some(NumberOrString::String(kind.name().to_string())),
        code_description: None,
        source: Some(DIAGNOSTIC_SOURCE.to_string()),
        message: kind.message().to_string(),
        related_information: None,
        tags: None,
        data: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whitespace::TextView;
    use tower_lsp::lsp_types::Position;

    #[test]
    fn one_diagnostic_per_region() {
        let mut buffer = Buffer::new("a  b  \nc");
        buffer.add_regions(IssueKind::Eof, vec![Region::new(7, 8)]);
        buffer.add_regions(IssueKind::Trailing, vec![Region::new(4, 6)]);

        let diagnostics = to_diagnostics(&buffer);
        assert_eq!(diagnostics.len(), 2);

        let eof = &diagnostics[0];
        assert_eq!(eof.range.start, Position::new(1, 0));
        assert_eq!(eof.range.end, Position::new(1, 1));
        assert_eq!(eof.code, Some(NumberOrString::String("eof".to_string())));

        let trailing = &diagnostics[1];
        assert_eq!(trailing.range.start, Position::new(0, 4));
        assert_eq!(trailing.range.end, Position::new(0, 6));
        assert_eq!(trailing.message, "Trailing whitespace");
        assert_eq!(trailing.source.as_deref(), Some(DIAGNOSTIC_SOURCE));
    }

    #[test]
    fn no_annotations_no_diagnostics() {
        assert!(to_diagnostics(&Buffer::new("clean\n")).is_empty());
    }
}
