use std::time::Duration;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use nexus_core::PipelineManager;
use nexus_model::{PipelineStats, StageKind};

const STAGE_COLUMNS: [StageKind; 3] = [StageKind::Input, StageKind::Transform, StageKind::Output];

/// Per-pipeline counters, efficiency and cumulative stage times.
pub fn stats_table(stats: &[PipelineStats]) -> Table {
    let mut table = Table::new();
    let mut header = vec![
        header_cell("Pipeline"),
        header_cell("Adapter"),
        header_cell("Processed"),
        header_cell("Errors"),
        header_cell("Efficiency"),
    ];
    header.extend(
        STAGE_COLUMNS
            .iter()
            .map(|kind| header_cell(&format!("{kind} (µs)"))),
    );
    table.set_header(header);
    apply_stats_table_style(&mut table);
    for index in 2..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_processed = 0u64;
    let mut total_errors = 0u64;
    for entry in stats {
        total_processed += entry.processed;
        total_errors += entry.errors;
        let mut row = vec![
            Cell::new(&entry.id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&entry.adapter),
            Cell::new(entry.processed),
            count_cell(entry.errors, Color::Red),
            efficiency_cell(entry.efficiency),
        ];
        row.extend(
            STAGE_COLUMNS
                .iter()
                .map(|kind| micros_cell(entry.stage_times.get(kind).copied())),
        );
        table.add_row(row);
    }
    if stats.len() > 1 {
        let mut row = vec![
            Cell::new("TOTAL")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            Cell::new(total_processed).add_attribute(Attribute::Bold),
            count_cell(total_errors, Color::Red).add_attribute(Attribute::Bold),
            efficiency_cell(nexus_model::efficiency(total_processed, total_errors))
                .add_attribute(Attribute::Bold),
        ];
        row.extend(STAGE_COLUMNS.iter().map(|_| dim_cell("-")));
        table.add_row(row);
    }
    table
}

/// Registered primaries with their adapter, stage chain and backup.
pub fn pipelines_table(manager: &PipelineManager) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Pipeline"),
        header_cell("Adapter"),
        header_cell("Stages"),
        header_cell("Backup"),
    ]);
    apply_table_style(&mut table);
    for id in manager.pipeline_ids() {
        let Some(pipeline) = manager.pipeline(id) else {
            continue;
        };
        let backup = match manager.backup_id(id) {
            Some(backup_id) => Cell::new(backup_id).fg(Color::Yellow),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(id).fg(Color::Blue).add_attribute(Attribute::Bold),
            Cell::new(pipeline.adapter()),
            Cell::new(pipeline.stage_names().join(" -> ")),
            backup,
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_stats_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: u64, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn efficiency_cell(efficiency: f64) -> Cell {
    let text = format!("{:.1}%", efficiency * 100.0);
    if efficiency < 1.0 {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text).fg(Color::Green)
    }
}

fn micros_cell(elapsed: Option<Duration>) -> Cell {
    match elapsed {
        Some(elapsed) => Cell::new(elapsed.as_micros()),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn stats(id: &str, processed: u64, errors: u64) -> PipelineStats {
        PipelineStats {
            id: id.to_string(),
            adapter: "JSON".to_string(),
            processed,
            errors,
            efficiency: nexus_model::efficiency(processed, errors),
            stage_times: BTreeMap::from([(StageKind::Input, Duration::from_micros(42))]),
        }
    }

    #[test]
    fn stats_table_renders_rows_and_total() {
        let mut table = stats_table(&[stats("JSON_PIPE", 3, 1), stats("JSON_BACKUP", 1, 0)]);
        table.force_no_tty();
        let rendered = table.to_string();

        assert!(rendered.contains("JSON_PIPE"));
        assert!(rendered.contains("75.0%"));
        assert!(rendered.contains("TOTAL"));
        assert!(rendered.contains("80.0%"));
        assert!(rendered.contains("42"));
    }

    #[test]
    fn single_pipeline_has_no_total_row() {
        let mut table = stats_table(&[stats("CSV_PIPE", 0, 0)]);
        table.force_no_tty();

        let rendered = table.to_string();
        assert!(rendered.contains("100.0%"));
        assert!(!rendered.contains("TOTAL"));
    }
}
