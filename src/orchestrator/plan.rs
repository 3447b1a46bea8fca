//! Which composite operations a single invocation performs.

use crate::tree::Bitdepth;

/// File writing toggle requested for this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileWriting {
    Start,
    Stop,
}

impl FileWriting {
    pub fn enabled(self) -> bool {
        matches!(self, FileWriting::Start)
    }
}

/// Overrides and operation selection for one run.
#[derive(Debug, Clone, Default)]
pub struct RunPlan {
    /// Text of the defaults document, if one was supplied.
    pub defaults: Option<String>,

    pub frames: Option<u64>,
    pub bitdepth: Option<Bitdepth>,
    pub file_path: Option<String>,
    pub file_name: Option<String>,

    /// Push the configuration trees.
    pub configure: bool,
    pub file_writing: Option<FileWriting>,
    pub status: bool,
    pub get_config: bool,
    pub get_version: bool,
    pub reset_stats: bool,
    pub shutdown: bool,
}

impl RunPlan {
    /// True when no command would be sent to either target.
    pub fn sends_nothing(&self) -> bool {
        !(self.configure
            || self.file_writing.is_some()
            || self.status
            || self.get_config
            || self.get_version
            || self.reset_stats
            || self.shutdown)
    }
}
