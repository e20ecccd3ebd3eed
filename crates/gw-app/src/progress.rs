#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingInput,
    Solving,
    WritingOutput,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::LoadingInput => "loading",
            RunStage::Solving => "solving",
            RunStage::WritingOutput => "writing",
            RunStage::Completed => "done",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub iteration: Option<usize>,
    pub max_iterations: Option<usize>,
    pub closure_error: Option<f64>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            iteration: None,
            max_iterations: None,
            closure_error: None,
        }
    }
}
