//! Terminal tables for catalogue listings and map runs.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use geostat_catalogue::{Catalogue, FetchRequest};
use geostat_classify::{Legend, LegendEntry};
use geostat_join::JoinSummary;
use geostat_model::{GeographyLayer, VariableSpec};
use geostat_pipeline::GeographySummary;

pub fn variables_table(variables: &[&VariableSpec]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Category"),
        header_cell("Subcategory"),
        header_cell("Label"),
        header_cell("Codes"),
        header_cell("Transformation"),
        header_cell("Format"),
        header_cell("Method"),
        header_cell("Dataset"),
    ]);
    apply_table_style(&mut table);
    for spec in variables {
        table.add_row(vec![
            Cell::new(&spec.key.category).fg(Color::Cyan),
            Cell::new(&spec.key.subcategory),
            Cell::new(spec.label()).add_attribute(Attribute::Bold),
            Cell::new(spec.source_codes.join(", ")),
            Cell::new(spec.transformation.as_str()),
            Cell::new(spec.format.as_str()),
            Cell::new(spec.classification.as_str()),
            Cell::new(&spec.dataset.displayed),
        ]);
    }
    table
}

pub fn geographies_table(catalogue: &Catalogue) -> Table {
    let initial = &catalogue.settings().initial_geography;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Id"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("Code field"),
        header_cell("Query"),
    ]);
    apply_table_style(&mut table);
    for layer in catalogue.geographies() {
        table.add_row(geography_row(layer, layer.id == *initial));
    }
    table
}

fn geography_row(layer: &GeographyLayer, is_initial: bool) -> Vec<Cell> {
    let id = if is_initial {
        Cell::new(format!("{} *", layer.id)).add_attribute(Attribute::Bold)
    } else {
        Cell::new(&layer.id)
    };
    vec![
        id,
        Cell::new(&layer.label),
        Cell::new(&layer.geography_type),
        Cell::new(&layer.geo_code_field),
        dim_cell(&layer.api_query),
    ]
}

pub fn query_table<'a>(requests: impl IntoIterator<Item = &'a FetchRequest>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Role"), header_cell("URL")]);
    apply_table_style(&mut table);
    for request in requests {
        table.add_row(vec![
            Cell::new(request.role.to_string()),
            Cell::new(request.census_url()),
        ]);
    }
    table
}

pub fn legend_table(legend: &Legend) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(""),
        header_cell("Color"),
        header_cell("Range"),
        header_cell("Features"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for entry in legend.iter() {
        table.add_row(legend_row(entry));
    }
    table
}

fn legend_row(entry: &LegendEntry) -> Vec<Cell> {
    let color = entry.color;
    let label = if entry.class.is_no_data() {
        dim_cell(&entry.label)
    } else {
        Cell::new(&entry.label)
    };
    vec![
        Cell::new("██").fg(Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }),
        Cell::new(color.to_string()),
        label,
        count_cell(entry.count, Color::Reset),
    ]
}

pub fn join_summary_table(summary: &JoinSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Join"), header_cell("Count"), header_cell("Codes")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        Cell::new("Matched"),
        count_cell(summary.matched, Color::Green),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        Cell::new("No data"),
        count_cell(summary.no_data, Color::Yellow),
        dim_cell("-"),
    ]);
    table.add_row(vec![
        Cell::new("Unmatched metrics"),
        count_cell(summary.unmatched_metrics.len(), Color::Yellow),
        codes_cell(&summary.unmatched_metrics),
    ]);
    table.add_row(vec![
        Cell::new("Duplicate metrics"),
        count_cell(summary.duplicate_metrics.len(), Color::Red),
        codes_cell(&summary.duplicate_metrics),
    ]);
    table
}

pub fn geography_summary_table(summary: &GeographySummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variable"),
        header_cell("Value"),
        header_cell("Category"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in &summary.entries {
        let value = if entry.value.is_missing() {
            dim_cell(entry.formatted())
        } else {
            Cell::new(entry.formatted()).add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(entry.label()),
            value,
            dim_cell(format!("{} / {}", entry.key.category, entry.key.subcategory)),
        ]);
    }
    table
}

const SHOWN_CODES: usize = 8;

fn codes_cell(codes: &[String]) -> Cell {
    if codes.is_empty() {
        return dim_cell("-");
    }
    let mut shown = codes
        .iter()
        .take(SHOWN_CODES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if codes.len() > SHOWN_CODES {
        shown.push_str(&format!(" (+{} more)", codes.len() - SHOWN_CODES));
    }
    Cell::new(shown)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).fg(Color::DarkGrey)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
