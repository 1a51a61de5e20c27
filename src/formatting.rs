//! Formatting helpers for note text and the end-of-run summary

use crate::convert::{ImportReport, RecordOutcome};
use crate::snoonotes::NoteRecord;
use chrono::SecondsFormat;

/// Longest possible note header: a 25-character timestamp, a 20-character
/// Reddit username and 8 characters of brackets and spacing
pub const MAX_HEADER_LENGTH: usize = 53;

/// Header put in front of every imported note
///
/// Mod Notes are attributed to the account running the import, so the header
/// keeps the original date and moderator: `[2022-09-24T18:46:14+00:00] [u/Techman-] `
pub fn note_header(record: &NoteRecord) -> String {
    format!(
        "[{}] [u/{}] ",
        record.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false),
        record.submitter
    )
}

/// Format an import report for display
///
/// # Arguments
/// * `report` - Report returned by the converter
/// * `list_failures` - Whether to list every dropped note
pub fn format_report(report: &ImportReport, list_failures: bool) -> String {
    let mut result = String::from("Import summary:\n");
    result.push_str(&format!("  Notes parsed:       {}\n", report.parsed));
    result.push_str(&format!(
        "  Skipped at parse:   {} (deleted accounts: {}, bad timestamps: {})\n",
        report.skipped.total(),
        report.skipped.deleted_accounts,
        report.skipped.bad_timestamps
    ));
    if report.filtered > 0 {
        result.push_str(&format!("  Filtered out:       {}\n", report.filtered));
    }
    result.push_str(&format!("  Notes imported:     {}\n", report.posted));
    result.push_str(&format!("  Mod Notes created:  {}\n", report.notes_created));
    if report.retried_without_reference > 0 {
        result.push_str(&format!(
            "  Posted unlinked:    {} (linked item was rejected)\n",
            report.retried_without_reference
        ));
    }
    result.push_str(&format!("  Failed:             {}\n", report.failed));

    if list_failures && report.failed > 0 {
        result.push_str("\nFailed notes:\n");
        for outcome in &report.outcomes {
            if let RecordOutcome::Dropped {
                note_id,
                class,
                error,
                ..
            } = outcome
            {
                result.push_str(&format!("- note {} ({}): {}\n", note_id, class, error));
            }
        }
    }

    result
}
