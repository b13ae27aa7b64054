//! Unit tests for Markdown data dictionary rendering

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use sqldd::dictionary::{render_markdown, DocumentHeader, TableSection};
use sqldd::metadata::{ColumnDescriptor, TableIdentity};

use crate::common::{column, orders_columns, users_columns};

fn header() -> DocumentHeader<'static> {
    DocumentHeader {
        database: "Sales",
        server: "db01",
        generated_at: NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap(),
    }
}

fn section(schema: &str, table: &str, columns: Vec<ColumnDescriptor>) -> TableSection {
    let mut table = TableIdentity::new(schema, table);
    table.selected = true;
    TableSection { table, columns }
}

#[test]
fn test_full_document_layout() {
    let sections = vec![
        section("dbo", "Users", users_columns()),
        section("sales", "Orders", orders_columns()),
    ];

    let markdown = render_markdown(&header(), &sections);

    let expected = "\
# Database: Sales
**Server:** db01
**Generated:** 2024-01-15 09:30:00

---

## Table: dbo.Users

| Column Name | Data Type | Length | Nullable | Primary Key | Identity | Default | Description |
|-------------|-----------|--------|----------|-------------|----------|---------|-------------|
| Id | int |  | NO | YES | YES |  | Surrogate key |
| Name | nvarchar(50) | 50 | YES | NO | NO |  |  |

---

## Table: sales.Orders

| Column Name | Data Type | Length | Nullable | Primary Key | Identity | Default | Description |
|-------------|-----------|--------|----------|-------------|----------|---------|-------------|
| OrderId | bigint |  | NO | YES | NO |  |  |
| Total | decimal(10,2) | 10,2 | YES | NO | NO |  |  |
| PlacedAt | datetime2 |  | NO | NO | NO | (getdate()) |  |

---

";
    assert_eq!(markdown, expected);
}

#[test]
fn test_one_section_per_selected_table_in_order() {
    let mut skipped = section("dbo", "Audit", vec![column("Id", "int", "", false)]);
    skipped.table.selected = false;

    let sections = vec![
        section("sales", "Orders", orders_columns()),
        skipped,
        section("dbo", "Users", users_columns()),
    ];
    let markdown = render_markdown(&header(), &sections);

    let headings: Vec<&str> = markdown
        .lines()
        .filter(|line| line.starts_with("## Table: "))
        .collect();
    assert_eq!(headings, vec!["## Table: sales.Orders", "## Table: dbo.Users"]);
}

#[test]
fn test_header_only_when_nothing_selected() {
    let mut unselected = section("dbo", "Users", users_columns());
    unselected.table.selected = false;

    let markdown = render_markdown(&header(), &[unselected]);

    assert_eq!(
        markdown,
        "# Database: Sales\n**Server:** db01\n**Generated:** 2024-01-15 09:30:00\n\n---\n\n"
    );
}

#[test]
fn test_table_without_columns_keeps_its_header_rows() {
    let markdown = render_markdown(&header(), &[section("dbo", "Empty", Vec::new())]);

    assert!(markdown.contains(
        "## Table: dbo.Empty\n\n| Column Name | Data Type | Length | Nullable | Primary Key | Identity | Default | Description |\n|-------------|-----------|--------|----------|-------------|----------|---------|-------------|\n\n---\n"
    ));
}

#[test]
fn test_description_with_pipe_and_newline_stays_on_one_row() {
    let columns = vec![ColumnDescriptor {
        description: "Status code | see lookup\nLegacy values allowed".to_string(),
        ..column("Status", "char", "1", false)
    }];

    let markdown = render_markdown(&header(), &[section("dbo", "Orders", columns)]);

    assert!(markdown.contains(
        "| Status | char(1) | 1 | NO | NO | NO |  | Status code \\| see lookup<br>Legacy values allowed |\n"
    ));
}

#[test]
fn test_unbounded_length_rendered_as_max() {
    let columns = vec![column("Notes", "nvarchar", "MAX", true)];

    let markdown = render_markdown(&header(), &[section("dbo", "Notes", columns)]);

    assert!(markdown.contains("| Notes | nvarchar(MAX) | MAX | YES | NO | NO |  |  |\n"));
}

#[test]
fn test_bare_carriage_return_does_not_split_row() {
    let columns = vec![ColumnDescriptor {
        description: "first\rsecond".to_string(),
        ..column("Note", "int", "", false)
    }];

    let markdown = render_markdown(&header(), &[section("dbo", "Notes", columns)]);

    assert!(!markdown.contains('\r'));
    assert!(markdown.contains("| Note | int |  | NO | NO | NO |  | first<br>second |\n"));
}
