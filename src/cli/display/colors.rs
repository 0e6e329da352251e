use crate::domain::testing::TestState;
use comfy_table::Color as TableColor;

#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    /// Get color for a test job state
    pub fn state_color(&self, state: TestState) -> TableColor {
        match state {
            TestState::Success => self.success,
            TestState::Failed => self.error,
            TestState::Pending => self.warning,
        }
    }

    /// Exit codes other than zero are highlighted
    pub fn exit_code_color(&self, exit_code: i32) -> TableColor {
        if exit_code == 0 {
            self.muted
        } else {
            self.error
        }
    }
}
