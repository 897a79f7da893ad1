//! Error-row CSV export.
//!
//! Pure formatting: classified rows in, CSV text out. No I/O here — the
//! download handler wraps the result in a response.

use crate::error::ImportError;
use crate::services::reconcile::IssueRow;

/// Render issue rows as a two-column CSV: `row index` and the row's
/// semicolon-joined messages (quoted). One header line plus one line per
/// row.
pub fn issues_to_csv<T>(rows: &[IssueRow<T>]) -> Result<String, ImportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    writer
        .write_record(["row index", "messages"])
        .map_err(|e| ImportError::Internal(format!("CSV write error: {e}")))?;

    for row in rows {
        writer
            .write_record([row.row_index.to_string(), row.messages.join("; ")])
            .map_err(|e| ImportError::Internal(format!("CSV write error: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::Internal(format!("CSV flush error: {e}")))?;

    String::from_utf8(bytes).map_err(|e| ImportError::Internal(format!("CSV encoding error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::reconcile::Severity;

    fn issue(row_index: usize, messages: &[&str]) -> IssueRow<String> {
        IssueRow {
            row_index,
            data: String::new(),
            messages: messages.iter().map(|m| (*m).to_string()).collect(),
            severity: Severity::Error,
        }
    }

    #[test]
    fn test_two_error_rows_produce_three_lines() {
        let rows = vec![
            issue(2, &["row 2: name must not be empty"]),
            issue(5, &["row 5: department must not be empty", "row 5: position must not be empty"]),
        ];
        let csv = issues_to_csv(&rows).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "\"row index\",\"messages\"");
    }

    #[test]
    fn test_messages_are_quoted_and_semicolon_joined() {
        let rows = vec![issue(
            1,
            &["row 1: name must not be empty", "row 1: position must not be empty"],
        )];
        let csv = issues_to_csv(&rows).unwrap();
        let data_line = csv.lines().nth(1).unwrap();
        assert_eq!(
            data_line,
            "1,\"row 1: name must not be empty; row 1: position must not be empty\""
        );
    }

    #[test]
    fn test_embedded_quotes_are_escaped() {
        let rows = vec![issue(3, &["manager '\"Odd\" Name' does not match"])];
        let csv = issues_to_csv(&rows).unwrap();
        let data_line = csv.lines().nth(1).unwrap();
        // csv doubles embedded quotes
        assert!(data_line.contains("\"\"Odd\"\""));
    }

    #[test]
    fn test_empty_input_is_header_only() {
        let csv = issues_to_csv::<String>(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
