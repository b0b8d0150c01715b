pub const STAGE_STRUCTURING: &str = "Calling AI to structure content...";
pub const STAGE_PARSING: &str = "Parsing AI response...";
pub const GENERATION_SUCCEEDED: &str = "Presentation Generated Successfully!";
pub const GENERATION_FAILED: &str = "An error occurred during generation.";

pub fn building_stage(slide_count: usize) -> String {
    format!("Building {slide_count} slides...")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub message: String,
}

/// Final panel shown under the status list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPanel {
    Success { summary: String },
    Failure { summary: String },
}

impl ResultPanel {
    pub fn summary(&self) -> &str {
        match self {
            ResultPanel::Success { summary } | ResultPanel::Failure { summary } => summary,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultPanel::Success { .. })
    }
}

/// Narrates one submission: a line per stage entered, then a single
/// terminal line and the result panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReporter {
    visible: bool,
    lines: Vec<StatusLine>,
    result: Option<ResultPanel>,
}

impl StatusReporter {
    /// Show the status area for a fresh submission.
    pub fn begin(&mut self) {
        self.visible = true;
        self.lines.clear();
        self.result = None;
    }

    pub fn stage(&mut self, message: impl Into<String>) {
        self.lines.push(StatusLine {
            kind: StatusKind::Pending,
            message: message.into(),
        });
    }

    pub fn succeed(&mut self, slide_count: usize) {
        self.finish(
            StatusKind::Success,
            GENERATION_SUCCEEDED,
            ResultPanel::Success {
                summary: format!("Your presentation with {slide_count} slides is ready."),
            },
        );
    }

    pub fn fail(&mut self, message: &str) {
        self.finish(
            StatusKind::Error,
            GENERATION_FAILED,
            ResultPanel::Failure {
                summary: format!("Error: {message}"),
            },
        );
    }

    fn finish(&mut self, kind: StatusKind, line: &str, result: ResultPanel) {
        self.lines.clear();
        self.lines.push(StatusLine {
            kind,
            message: line.to_string(),
        });
        self.result = Some(result);
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn lines(&self) -> &[StatusLine] {
        &self.lines
    }

    pub fn result(&self) -> Option<&ResultPanel> {
        self.result.as_ref()
    }
}
