//! Export Formatter
//!
//! Flattens groups into comma-separated text for spreadsheet import: one
//! header row, one row per member, group-level columns only on the first
//! member row of each group, and a blank separator row after every group.

use crate::summary::Group;
use bandmates_common::{Error, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::io::Write;

/// Column headers, in output order
pub const HEADERS: [&str; 14] = [
    "Group ID",
    "Group Name",
    "Group Compatibility (%)",
    "Member Name",
    "Email",
    "Major",
    "Year",
    "Top Genres",
    "Listening Style",
    "Common Genres",
    "Diversity (%)",
    "Cohesion (%)",
    "Playlist",
    "Activities",
];

/// Render groups as CSV text
pub fn to_table(groups: &[Group]) -> Result<String> {
    let mut buffer = Vec::new();
    write_table(groups, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Export(e.to_string()))
}

/// Write groups as CSV to any sink
pub fn write_table<W: Write>(groups: &[Group], sink: W) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(sink);

    writer.write_record(HEADERS).map_err(export_error)?;

    let blank = [""; HEADERS.len()];
    for group in groups {
        for (position, member) in group.members.iter().enumerate() {
            let leading = position == 0;
            let group_cell = |value: String| if leading { value } else { String::new() };

            writer
                .write_record([
                    group_cell(group.id.to_string()),
                    group_cell(group.name.clone()),
                    group_cell(percent(group.group_compatibility)),
                    member.name.clone(),
                    member.email.clone(),
                    member.major.clone(),
                    member.year.clone(),
                    member.top_genres.join(", "),
                    member.listening_style.to_string(),
                    group_cell(group.common_genres.join(", ")),
                    group_cell(percent(group.dynamics.diversity)),
                    group_cell(percent(group.dynamics.cohesion)),
                    group_cell(group.recommendations.playlist.clone()),
                    group_cell(group.recommendations.activities.join("; ")),
                ])
                .map_err(export_error)?;
        }
        writer.write_record(blank).map_err(export_error)?;
    }

    writer.flush()?;
    Ok(())
}

fn percent(fraction: f64) -> String {
    format!("{:.1}", fraction * 100.0)
}

fn export_error(e: csv::Error) -> Error {
    Error::Export(e.to_string())
}
