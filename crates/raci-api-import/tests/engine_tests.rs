//! End-to-end tests for the import engine: CSV bytes in, classified
//! batches and error exports out. No database required — these cover the
//! pure pipeline (decode → normalize → validate → classify → export).

use raci_api_import::services::csv_parser::{parse_csv, CsvParseConfig};
use raci_api_import::services::export::issues_to_csv;
use raci_api_import::services::reconcile::{validate_employee_rows, validate_project_rows};
use raci_api_import::ReferenceSnapshot;

fn snapshot() -> ReferenceSnapshot {
    ReferenceSnapshot::from_names(
        ["IT", "Finance"],
        ["Developer", "Analyst", "Sales Manager"],
        ["Alice Smith", "Bob Jones"],
        ["Website Relaunch"],
    )
}

fn decode(csv: &str) -> Vec<Vec<String>> {
    parse_csv(csv.as_bytes(), &CsvParseConfig::new()).expect("decode failed")
}

#[test]
fn employee_pipeline_classifies_and_counts() {
    let csv = "\
name,department,position,manager
Carol White,IT,Developer,Alice Smith
Dan Brown,Marketing,Developer,
Erin Black,Marketing,Designer,Frank Field
,IT,Developer,
carol white,IT,Developer,
";
    let rows = decode(csv);
    assert_eq!(rows.len(), 5);

    let outcome = validate_employee_rows(&rows, &snapshot());

    // Row 1 valid; rows 2, 3, 5 warnings; row 4 error
    assert_eq!(outcome.summary.valid_count, 1);
    assert_eq!(outcome.summary.warning_count, 3);
    assert_eq!(outcome.summary.error_count, 1);

    // Marketing appears twice among accepted rows but counts once
    assert_eq!(outcome.summary.new_departments, 1);
    assert_eq!(outcome.summary.new_positions, 1); // Designer
    assert_eq!(outcome.summary.new_managers, 1); // Frank Field

    // Error row message carries the 1-based data row index
    assert_eq!(outcome.error_rows.len(), 1);
    assert_eq!(outcome.error_rows[0].row_index, 4);
    assert_eq!(
        outcome.error_rows[0].messages,
        vec!["row 4: name must not be empty"]
    );

    // Duplicate (case-insensitive) detected on the last row
    let duplicate_row = outcome
        .warning_rows
        .iter()
        .find(|w| w.row_index == 5)
        .expect("row 5 should be a warning row");
    assert!(duplicate_row
        .messages
        .iter()
        .any(|m| m == "duplicate name in file"));

    // Errors block the whole batch
    assert!(!outcome.can_import(true));
}

#[test]
fn employee_manager_matching_position_is_flagged_as_content() {
    let csv = "\
name,department,position,manager
Carol White,IT,Developer,Sales Manager
";
    let outcome = validate_employee_rows(&decode(csv), &snapshot());

    assert_eq!(outcome.summary.warning_count, 1);
    let messages = &outcome.warning_rows[0].messages;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("matches a position name"));
    assert!(!messages[0].contains("will be created"));

    // A likely user error must not be auto-accepted
    assert!(!outcome.warnings_auto_accepted);
    assert!(!outcome.can_import(false));
    assert!(outcome.can_import(true));
}

#[test]
fn auto_accepted_batch_produces_full_create_plan() {
    // 5 valid rows + 2 pure creation-warning rows, 0 errors
    let csv = "\
name,department,position,manager
E1,IT,Developer,
E2,IT,Analyst,
E3,Finance,Developer,
E4,Finance,Analyst,Alice Smith
E5,IT,Developer,Bob Jones
W1,Marketing,Developer,
W2,IT,Designer,
";
    let outcome = validate_employee_rows(&decode(csv), &snapshot());

    assert_eq!(outcome.summary.valid_count, 5);
    assert_eq!(outcome.summary.warning_count, 2);
    assert_eq!(outcome.summary.error_count, 0);
    assert!(outcome.warnings_auto_accepted);

    // No explicit acceptance needed under the auto-accept heuristic
    assert!(outcome.can_import(false));

    // The create plan carries exactly the 7 accepted rows
    let plan = outcome.create_plan();
    assert_eq!(plan.len(), 7);
}

#[test]
fn project_pipeline_enforces_manager_resolution() {
    let csv = "\
name,client,manager
ProjX,ClientY,NoSuchPerson
CRM Rollout,Acme,Alice Smith
Website Relaunch,Acme,
";
    let outcome = validate_project_rows(&decode(csv), &snapshot());

    // Unknown project manager is an error, not a warning
    assert_eq!(outcome.error_rows.len(), 1);
    assert_eq!(outcome.error_rows[0].row_index, 1);
    assert!(outcome.error_rows[0].messages[0].contains("NoSuchPerson"));

    // Importable rows always carry at least one warning
    assert_eq!(outcome.summary.valid_count, 0);
    assert_eq!(outcome.summary.warning_count, 2);
    assert_eq!(outcome.summary.new_projects, 1); // CRM Rollout only

    assert!(!outcome.can_import(true));
}

#[test]
fn blank_rows_are_dropped_before_indexing() {
    let csv = "\
name,department,position,manager
A1,IT,Developer,
,,,
A2,IT,Developer,
";
    let rows = decode(csv);
    assert_eq!(rows.len(), 2);

    let outcome = validate_employee_rows(&rows, &snapshot());
    assert_eq!(outcome.summary.valid_count, 2);
    assert_eq!(outcome.summary.error_count, 0);
}

#[test]
fn error_export_has_header_plus_one_line_per_row() {
    let csv = "\
name,department,position,manager
,IT,Developer,
Valid Person,IT,Developer,
,,Developer,
";
    let outcome = validate_employee_rows(&decode(csv), &snapshot());
    assert_eq!(outcome.error_rows.len(), 2);

    let export = issues_to_csv(&outcome.error_rows).unwrap();
    let lines: Vec<&str> = export.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "\"row index\",\"messages\"");
    assert!(lines[1].starts_with("1,"));
    assert!(lines[2].starts_with("3,"));

    // Multi-message rows are semicolon-joined inside one quoted field
    assert!(lines[2].contains("row 3: name must not be empty; row 3: department must not be empty"));
}

#[test]
fn revalidating_unchanged_input_is_deterministic() {
    let csv = "\
name,department,position,manager
Carol,Marketing,Developer,
alice smith,IT,Developer,
";
    let rows = decode(csv);
    let first = validate_employee_rows(&rows, &snapshot());
    let second = validate_employee_rows(&rows, &snapshot());

    assert_eq!(first.summary, second.summary);
    assert_eq!(first.warnings_auto_accepted, second.warnings_auto_accepted);
    let first_messages: Vec<_> = first.warning_rows.iter().map(|w| &w.messages).collect();
    let second_messages: Vec<_> = second.warning_rows.iter().map(|w| &w.messages).collect();
    assert_eq!(first_messages, second_messages);
}
