/// Aggregate result of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Forums enumerated for the run.
    pub total: usize,
    /// Forums that ended in a recorded or reused success.
    pub success: usize,
    /// Forums that ended in any failure, including blacklist skips.
    pub failed: usize,
    /// True when the run stopped on the abort flag; `success + failed`
    /// then covers only the forums processed before the stop.
    pub aborted: bool,
}
