/// Verbosity level from which clone/fetch progress is streamed to stderr.
pub const PROGRESS_VERBOSITY: u8 = 2;

/// Explicit runtime settings handed to [`crate::RepoSync`].
///
/// `verbosity` follows the usual `-v` counting: 0 is quiet, 1 reports what
/// happened, 2 and above also stream transfer progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    pub verbosity: u8,
}

impl Settings {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    pub fn progress_enabled(&self) -> bool {
        self.verbosity >= PROGRESS_VERBOSITY
    }
}
