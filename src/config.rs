/// Knobs for a checking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckConfig {
    /// Emit an `Info` diagnostic with the inferred type of every top-level
    /// binding that checked successfully.
    pub report_types: bool,
    /// Fail the pass when any warning was emitted.
    pub warnings_as_errors: bool,
}

impl CheckConfig {
    pub fn with_report_types(mut self, report_types: bool) -> Self {
        self.report_types = report_types;
        self
    }

    pub fn with_warnings_as_errors(mut self, warnings_as_errors: bool) -> Self {
        self.warnings_as_errors = warnings_as_errors;
        self
    }
}
