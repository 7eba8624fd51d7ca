use std::fmt::Write as _;

use super::domain::EnrichedRecord;

/// Renders the chat digest from the enriched records. A bold header opens
/// every contiguous run of a vacation type; each record contributes a
/// name/title line and a date-range line followed by a blank separator.
/// An empty record set renders an empty message.
pub fn format_digest_message(records: &[EnrichedRecord]) -> String {
    let mut message = String::new();
    let mut current_type: Option<&str> = None;

    for record in records {
        if current_type != Some(record.vacation_type.as_str()) {
            current_type = Some(record.vacation_type.as_str());
            writeln!(message, "*On {}*", record.vacation_type).expect("write header");
        }

        writeln!(message, "{} ({})", record.employee_name, record.job_title)
            .expect("write entry");
        writeln!(
            message,
            "From: {}  To: {}\n",
            record.start_date, record.end_date
        )
        .expect("write date range");
    }

    message
}
