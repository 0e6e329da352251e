use crate::domain::config::OutputFormat;
use crate::shared::error::Result;
use comfy_table::{presets::NOTHING, Cell, ContentArrangement, Table};
use serde::Serialize;

/// Rows for the `table` output format.
#[derive(Debug, Clone, Default)]
pub struct TableOutput {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Renders the same data as a table, JSON or YAML.
pub struct Output<'a, T: Serialize> {
    table: TableOutput,
    data: &'a T,
}

impl<'a, T: Serialize> Output<'a, T> {
    pub fn new(table: TableOutput, data: &'a T) -> Self {
        Self { table, data }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Table => Ok(self.render_table()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self.data)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(self.data)?),
        }
    }

    fn render_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(NOTHING)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_header(self.table.headers.iter().map(Cell::new));

        for row in &self.table.rows {
            table.add_row(row.clone());
        }

        table.to_string()
    }
}
