//! Drives a student-roster grid the way a page-level caller would: feed
//! rows, wire signals, search, sort, page, select, and export.
//!
//! Run with `cargo run --example roster` (add `RUST_LOG=slate_grid=debug`
//! to watch the pipeline).

use serde_json::json;
use slate_grid::model::{ActionSource, ActionSpec, BulkActionSpec, ColumnSpec};
use slate_grid::view::{GridConfig, GridView};

fn print_page(grid: &GridView) {
    println!(
        "-- page {}/{} ({} of {} rows match)",
        grid.current_page(),
        grid.total_pages(),
        grid.filtered_count(),
        grid.row_count(),
    );
    if grid.is_empty() {
        println!("   {}", grid.empty_message());
        return;
    }
    for row in grid.visible_rows() {
        let mark = if row.selected { "[x]" } else { "[ ]" };
        let cells: Vec<String> = row
            .cells
            .iter()
            .map(|cell| match &cell.subtext {
                Some(subtext) => format!("{} ({})", cell.text, subtext),
                None => cell.text.clone(),
            })
            .collect();
        let actions: Vec<&str> = row.actions.iter().map(|a| a.label.as_str()).collect();
        println!("   {} {}  <{}>", mark, cells.join(" | "), actions.join(", "));
    }
}

fn main() -> slate_grid::Result<()> {
    tracing_subscriber::fmt::init();

    let columns = vec![
        ColumnSpec::new("profile.lastName", "Last Name")
            .with_subtext_path("profile.email"),
        ColumnSpec::new("profile.firstName", "First Name"),
        ColumnSpec::new("grade", "Grade"),
        ColumnSpec::new("homeroom", "Homeroom")
            .with_render(|value, _| value.label())
            .with_sortable(false),
    ];

    let actions = ActionSource::Static(vec![
        ActionSpec::new("Edit", |row| {
            println!("   -> edit student {:?}", row.id());
        }),
        ActionSpec::new("Archive", |row| {
            println!("   -> archive student {:?}", row.id());
        })
        .with_color("red")
        .with_hidden_if(|row| row.resolve("archived").as_bool().unwrap_or(false)),
    ]);

    let mut grid = GridView::new(
        "Student Roster",
        columns,
        GridConfig::default()
            .with_page_size(3)
            .with_selectable(true)
            .with_empty_message("No students match the current filters."),
    )?
    .with_actions(actions)
    .with_bulk_actions(vec![BulkActionSpec::new("Send Letter", |keys| {
        println!("   -> sending letters to {} students", keys.len());
    })]);

    grid.row_activated.connect(|row| {
        println!("   -> open detail view for {:?}", row.id());
    });
    grid.selection_changed().connect(|keys| {
        println!("   -> selection now {} rows", keys.len());
    });

    grid.set_rows_json(json!([
        { "id": 1, "profile": { "firstName": "Ann",  "lastName": "Archer", "email": "ann@school.test" },  "grade": 5, "homeroom": { "id": 41, "name": "5B" } },
        { "id": 2, "profile": { "firstName": "Bo",   "lastName": "Berg",   "email": "bo@school.test" },   "grade": 5, "homeroom": { "id": 41, "name": "5B" } },
        { "id": 3, "profile": { "firstName": "Cy",   "lastName": "Chen",   "email": "cy@school.test" },   "grade": 6, "homeroom": { "id": 42, "name": "6A" } },
        { "id": 4, "profile": { "firstName": "Di",   "lastName": "Diaz",   "email": "di@school.test" },   "grade": 6, "homeroom": { "id": 42, "name": "6A" }, "archived": true },
        { "id": 5, "profile": { "firstName": "Ed",   "lastName": "Egan",   "email": "ed@school.test" },   "grade": 7, "homeroom": { "id": 43, "name": "7C" } },
    ]));

    println!("fresh grid:");
    print_page(&grid);

    println!("\nsorted by last name, descending:");
    grid.toggle_sort("profile.lastName")?;
    grid.toggle_sort("profile.lastName")?;
    print_page(&grid);

    println!("\npage 2:");
    grid.next_page();
    print_page(&grid);

    println!("\nsearching for \"6a\":");
    grid.set_search_term("6a");
    print_page(&grid);

    println!("\nselect all matches, then clear filters (selection survives):");
    grid.toggle_select_all();
    grid.clear_filters();
    print_page(&grid);
    grid.run_bulk_action(0);

    println!("\nexport mirrors the filtered+sorted set:");
    let export = grid.export()?;
    println!("   {}:", export.file_name);
    for line in export.content.lines() {
        println!("   {line}");
    }

    Ok(())
}
