//! Integration tests for pagination.

use tabpdf::layout::{split_rows, PagePlan, Paginator, Placement};
use tabpdf::{
    Assembler, CellValue, Column, DataTable, Dataset, Error, FontMetrics, LayoutOptions, Row,
};

fn numbered(name: &str, rows: usize) -> DataTable {
    let mut table = DataTable::new(name, ["Id"]);
    for i in 0..rows {
        table.add_row(Row::new(vec![CellValue::Integer(i as i64)]));
    }
    table
}

fn plan(dataset: &Dataset, options: &LayoutOptions) -> Vec<PagePlan> {
    let metrics = FontMetrics::builtin();
    Paginator::new(options, &metrics).plan(dataset).unwrap()
}

#[test]
fn test_split_examples() {
    // 50 + 50 > 90, so every row closes the page before it.
    assert_eq!(split_rows(&[50.0, 50.0, 50.0], 90.0, 0.0), vec![0..1, 1..2, 2..3]);
    // 45 + 45 == 90 stays on the page.
    assert_eq!(split_rows(&[45.0, 45.0, 50.0], 90.0, 0.0), vec![0..2, 2..3]);
    assert_eq!(split_rows(&[30.0; 6], 90.0, 0.0), vec![0..3, 3..6]);
}

#[test]
fn test_split_resets_to_header_height() {
    // Every page starts with the 30pt header, leaving room for two 30pt rows.
    assert_eq!(split_rows(&[30.0; 5], 90.0, 30.0), vec![0..2, 2..4, 4..5]);
}

#[test]
fn test_page_row_counts() {
    // Rows are 15.25pt (one 9pt line plus 4pt padding); usable height is 666pt.
    // Page 1 holds the 21.5pt title and 15.25pt header plus 41 rows,
    // continuation pages the repeated header plus 42 rows.
    let mut dataset = Dataset::new("D");
    dataset.add_table(numbered("Ledger", 100));
    let options = LayoutOptions::new();

    let plans = plan(&dataset, &options);
    let counts: Vec<usize> = plans.iter().map(PagePlan::row_count).collect();
    assert_eq!(counts, vec![41, 42, 17]);
}

#[test]
fn test_rows_kept_in_order() {
    let mut dataset = Dataset::new("D");
    dataset.add_table(numbered("A", 130));
    dataset.add_table(numbered("B", 7));
    dataset.add_table(numbered("C", 60));

    let plans = plan(&dataset, &LayoutOptions::new().sequential());
    let rows: Vec<(usize, usize)> = plans.iter().flat_map(|p| p.rows()).collect();
    let expected: Vec<(usize, usize)> = (0..130)
        .map(|r| (0, r))
        .chain((0..7).map(|r| (1, r)))
        .chain((0..60).map(|r| (2, r)))
        .collect();
    assert_eq!(rows, expected);
}

#[test]
fn test_no_page_exceeds_usable_height() {
    let mut dataset = Dataset::new("D");
    let mut table = DataTable::new("Notes", ["Id", "Text"]);
    for i in 0..150 {
        table.add_row(Row::new(vec![
            CellValue::Integer(i),
            CellValue::Text("word ".repeat((i as usize * 37) % 120)),
        ]));
    }
    dataset.add_table(table);

    let options = LayoutOptions::new();
    let usable = options.page.usable_height();
    let plans = plan(&dataset, &options);
    assert!(plans.len() > 1);
    for page in &plans {
        assert!(!page.oversized);
        assert!(page.content_height <= usable, "{} > {}", page.content_height, usable);
    }
}

#[test]
fn test_continuation_repeats_header() {
    let mut dataset = Dataset::new("D");
    dataset.add_table(numbered("Ledger", 200));
    let plans = plan(&dataset, &LayoutOptions::new());

    assert_eq!(
        &plans[0].placements[..2],
        &[Placement::Title { table: 0 }, Placement::Header { table: 0 }]
    );
    for page in &plans[1..] {
        assert_eq!(page.placements[0], Placement::Header { table: 0 });
        assert!(!page.placements.contains(&Placement::Title { table: 0 }));
        assert_eq!(page.outline_title.as_deref(), Some("Ledger (continued)"));
    }
}

#[test]
fn test_oversized_row_alone() {
    let mut table = DataTable::new("Tall", ["Text"]);
    table.add_row(Row::from_strings(["before"]));
    table.add_row(Row::from_strings(["line\n".repeat(80)]));
    table.add_row(Row::from_strings(["after"]));
    let mut dataset = Dataset::new("D");
    dataset.add_table(table);

    let options = LayoutOptions::new();
    let plans = plan(&dataset, &options);
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[0].rows().collect::<Vec<_>>(), vec![(0, 0)]);
    assert_eq!(plans[1].rows().collect::<Vec<_>>(), vec![(0, 1)]);
    assert!(plans[1].oversized);
    assert!(plans[1].content_height > options.page.usable_height());
    assert_eq!(plans[2].rows().collect::<Vec<_>>(), vec![(0, 2)]);

    let doc = Assembler::new(options).assemble(&dataset).unwrap();
    assert_eq!(doc.page_count, 3);
}

#[test]
fn test_small_tables_share_a_page() {
    let mut dataset = Dataset::new("D");
    dataset.add_table(numbered("First", 3));
    dataset.add_table(numbered("Second", 3));

    let plans = plan(&dataset, &LayoutOptions::new());
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].outline_title.as_deref(), Some("First"));
    assert!(plans[0].placements.contains(&Placement::Title { table: 1 }));
}

#[test]
fn test_table_moves_to_next_page_when_first_row_does_not_fit() {
    let mut dataset = Dataset::new("D");
    dataset.add_table(numbered("First", 41));
    dataset.add_table(numbered("Second", 2));

    let plans = plan(&dataset, &LayoutOptions::new());
    assert_eq!(plans.len(), 2);
    assert_eq!(plans[0].row_count(), 41);
    assert_eq!(plans[1].placements[0], Placement::Title { table: 1 });
    assert_eq!(plans[1].outline_title.as_deref(), Some("Second"));
}

#[test]
fn test_zero_width_column_rejected() {
    let mut table = DataTable::new("T", ["A"]);
    table.columns.push(Column::new("B").width(0.0));
    table.add_row(Row::from_strings(["x", "y"]));
    let mut dataset = Dataset::new("D");
    dataset.add_table(table);

    let err = Assembler::default().assemble(&dataset).unwrap_err();
    assert!(matches!(err, Error::LayoutConfiguration(_)));
}

#[test]
fn test_no_room_for_auto_columns() {
    let mut table = DataTable::new("T", ["Auto"]);
    table.columns.push(Column::new("Wide").width(540.0));
    let mut dataset = Dataset::new("D");
    dataset.add_table(table);

    let err = Assembler::default().assemble(&dataset).unwrap_err();
    assert!(err.to_string().contains("Auto"));
}
