//! Stage pipeline
//!
//! Runs stages strictly in order. The first failing stage stops the
//! pipeline and is reported as `ShipError::StageFailed`; remote effects of
//! earlier stages are left in place.

use crate::domain::ports::RunReport;
use crate::domain::value_objects::Stage;
use crate::error::ShipResult;

/// Outcome of a pipeline that ran to the end
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub completed: Vec<Stage>,
    pub report: RunReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePipeline {
    stages: Vec<Stage>,
}

impl StagePipeline {
    pub fn new(stages: impl IntoIterator<Item = Stage>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
        }
    }

    /// push → envconfig → start
    pub fn deploy() -> Self {
        Self::new([Stage::Push, Stage::EnvConfig, Stage::Start])
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Run each stage after the previous one fully succeeded
    pub fn run<F>(&self, mut run_stage: F) -> ShipResult<PipelineReport>
    where
        F: FnMut(Stage) -> ShipResult<RunReport>,
    {
        let mut result = PipelineReport::default();
        for &stage in &self.stages {
            tracing::info!("pipeline stage {}", stage);
            let report = run_stage(stage).map_err(|e| e.in_stage(stage))?;
            result.report.merge(report);
            result.completed.push(stage);
        }
        Ok(result)
    }
}
