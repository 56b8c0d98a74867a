use std::time::Duration;

pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(3_500);

pub const DEFAULT_PROGRESS_STEPS: [&str; 10] = [
    "Initializing code generation...",
    "Generating initial structure...",
    "Adding components...",
    "Integrating styles...",
    "Setting up dependencies...",
    "Creating configuration files...",
    "Reviewing code for errors...",
    "Performing final checks...",
    "Preparing sandbox environment...",
    "Finalizing...",
];

/// Cosmetic status messages shown while a generation request is pending.
///
/// Steps carry no information about real server progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressScript {
    steps: Vec<String>,
    interval: Duration,
}

impl ProgressScript {
    pub fn new(steps: Vec<String>, interval: Duration) -> Self {
        Self { steps, interval }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&str> {
        self.steps.get(index).map(String::as_str)
    }
}

impl Default for ProgressScript {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROGRESS_STEPS
                .iter()
                .map(|step| (*step).to_string())
                .collect(),
            DEFAULT_STEP_INTERVAL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_script_matches_constants() {
        let script = ProgressScript::default();
        assert_eq!(script.len(), DEFAULT_PROGRESS_STEPS.len());
        assert_eq!(script.step(0), Some("Initializing code generation..."));
        assert_eq!(script.step(9), Some("Finalizing..."));
        assert_eq!(script.step(10), None);
        assert_eq!(script.interval(), Duration::from_millis(3_500));
    }

    #[test]
    fn interval_can_be_overridden() {
        let script = ProgressScript::default().with_interval(Duration::from_millis(10));
        assert_eq!(script.interval(), Duration::from_millis(10));
        assert!(!script.is_empty());
    }
}
