//! Progress events streamed from the batch precalc.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecalcStage {
    EnumeratingRuns,
    MaterializingRuns,
    ComputingExtents,
    SavingArtifacts,
    Completed,
}

#[derive(Debug, Clone)]
pub struct PrecalcProgressEvent {
    pub stage: PrecalcStage,
    /// Units completed within the stage (runs written, extents computed).
    pub completed: usize,
    pub total: usize,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}
