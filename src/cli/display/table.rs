use super::output::TableOutput;
use super::{ColorTheme, StatusIcon};
use crate::domain::testing::TestResult;
use comfy_table::Cell;
use std::time::Duration;

pub const TEST_REPORT_HEADERS: [&str; 5] = ["Test image", "Command", "State", "Exit code", "Duration"];

pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// One row per test job
    pub fn test_report(&self, results: &[TestResult]) -> TableOutput {
        let rows = results
            .iter()
            .map(|result| {
                vec![
                    Cell::new(&result.image),
                    Cell::new(result.commands.join(" ")),
                    Cell::new(format!(
                        "{} {}",
                        StatusIcon::state_icon(result.state),
                        result.state
                    ))
                    .fg(self.theme.state_color(result.state)),
                    Cell::new(result.exit_code).fg(self.theme.exit_code_color(result.exit_code)),
                    Cell::new(format_duration(result.duration)),
                ]
            })
            .collect();

        TableOutput {
            headers: TEST_REPORT_HEADERS.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

/// Rounds to whole seconds and prints like `1h2m3s`, `4m0s` or `12s`.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs_f64().round() as u64;
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
