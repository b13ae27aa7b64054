//! Markdown data dictionary rendering

use chrono::NaiveDateTime;

use crate::metadata::{ColumnDescriptor, TableIdentity};

const TABLE_HEADER: &str =
    "| Column Name | Data Type | Length | Nullable | Primary Key | Identity | Default | Description |";
const TABLE_DIVIDER: &str =
    "|-------------|-----------|--------|----------|-------------|----------|---------|-------------|";
const SEPARATOR: &str = "---";

/// Document-level facts printed above the first table
#[derive(Debug, Clone)]
pub struct DocumentHeader<'a> {
    pub database: &'a str,
    pub server: &'a str,
    pub generated_at: NaiveDateTime,
}

/// A table and its columns, in catalog ordinal order
#[derive(Debug, Clone)]
pub struct TableSection {
    pub table: TableIdentity,
    pub columns: Vec<ColumnDescriptor>,
}

/// Render the data dictionary.
///
/// Sections appear in the order given; sections whose table is not selected
/// are skipped.
pub fn render_markdown(header: &DocumentHeader<'_>, sections: &[TableSection]) -> String {
    let mut out = String::new();

    push_line(&mut out, &format!("# Database: {}", header.database));
    push_line(&mut out, &format!("**Server:** {}", header.server));
    push_line(
        &mut out,
        &format!(
            "**Generated:** {}",
            header.generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
    );
    push_line(&mut out, "");
    push_line(&mut out, SEPARATOR);
    push_line(&mut out, "");

    for section in sections.iter().filter(|s| s.table.selected) {
        render_section(&mut out, section);
    }

    out
}

fn render_section(out: &mut String, section: &TableSection) {
    push_line(out, &format!("## Table: {}", section.table.full_name()));
    push_line(out, "");
    push_line(out, TABLE_HEADER);
    push_line(out, TABLE_DIVIDER);

    for column in &section.columns {
        let cells = [
            escape_cell(&column.name),
            escape_cell(&column.display_type()),
            escape_cell(&column.length_or_precision),
            yes_no(column.nullable).to_string(),
            yes_no(column.is_primary_key).to_string(),
            yes_no(column.is_identity).to_string(),
            escape_cell(&column.default_expression),
            escape_cell(&column.description),
        ];
        push_line(out, &format!("| {} |", cells.join(" | ")));
    }

    push_line(out, "");
    push_line(out, SEPARATOR);
    push_line(out, "");
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

/// Keep free text from breaking the table: pipes are escaped and line breaks
/// become `<br>`.
fn escape_cell(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('|', "\\|")
        .replace('\n', "<br>")
}
