use crate::domain::testing::TestState;

pub struct StatusIcon;

impl StatusIcon {
    /// Test passed
    pub const SUCCESS: &'static str = "✓";

    /// Test failed
    pub const ERROR: &'static str = "✗";

    /// Test still running
    pub const PENDING: &'static str = "⏳";

    pub fn state_icon(state: TestState) -> &'static str {
        match state {
            TestState::Success => Self::SUCCESS,
            TestState::Failed => Self::ERROR,
            TestState::Pending => Self::PENDING,
        }
    }
}
