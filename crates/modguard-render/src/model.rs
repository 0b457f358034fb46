#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableStatus {
    Pass,
    Warn,
    Fail,
}

impl RenderableStatus {
    pub fn marker(self) -> &'static str {
        match self {
            RenderableStatus::Pass => "✓",
            RenderableStatus::Warn => "⚠",
            RenderableStatus::Fail => "✗",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RenderableStatus::Pass => "pass",
            RenderableStatus::Warn => "warn",
            RenderableStatus::Fail => "fail",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
    pub line: Option<u32>,
    pub col: Option<u32>,
}

impl RenderableLocation {
    /// `path`, `path:line` or `path:line:col`.
    pub fn display(&self) -> String {
        match (self.line, self.col) {
            (Some(line), Some(col)) => format!("{}:{line}:{col}", self.path),
            (Some(line), None) => format!("{}:{line}", self.path),
            _ => self.path.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableVerdict {
    pub status: RenderableStatus,
    pub check_id: String,
    pub code: String,
    pub target: String,
    pub message: String,
    pub location: Option<RenderableLocation>,
    pub help: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderableSummary {
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub total: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableSection {
    pub title: String,
    pub summary: RenderableSummary,
    pub verdicts: Vec<RenderableVerdict>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub module: String,
    pub passed: bool,
    pub summary: RenderableSummary,
    pub sections: Vec<RenderableSection>,
}

impl RenderableReport {
    pub fn result_label(&self) -> &'static str {
        if self.passed { "PASS" } else { "FAIL" }
    }
}
