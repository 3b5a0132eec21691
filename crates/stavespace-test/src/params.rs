//! Regression test parameters and operations

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare against expected values (default)
    #[default]
    Compare,
    /// Display mode - log comparisons without failing
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable.
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the state of a regression test: the test name, a running
/// check index, the mode, and the recorded failures. Call
/// [`RegParams::cleanup`] at the end and assert its return value.
///
/// ```
/// use stavespace_test::RegParams;
///
/// let mut rp = RegParams::new("example");
/// rp.compare_values(2.0, 2.0, 0.0);
/// assert!(rp.cleanup());
/// ```
pub struct RegParams {
    /// Name of the test (e.g., "detect")
    pub test_name: String,
    /// Current check index (incremented before each comparison)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters.
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            test_name: test_name.into(),
            index: 0,
            mode: RegTestMode::from_env(),
            success: true,
            failures: Vec::new(),
        }
    }

    /// Compare two values within a tolerance.
    ///
    /// Records a failure (in Compare mode) if
    /// `|expected - actual| > delta`. Returns whether this check
    /// passed.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let ok = (expected - actual).abs() <= delta;
        if !ok {
            let message = format!(
                "{} check {}: expected {} +/- {}, got {}",
                self.test_name, self.index, expected, delta, actual
            );
            eprintln!("FAIL {message}");
            if self.mode == RegTestMode::Compare {
                self.success = false;
                self.failures.push(message);
            }
        }
        ok
    }

    /// Record a named boolean check.
    pub fn check(&mut self, label: &str, ok: bool) -> bool {
        self.index += 1;
        if !ok {
            let message = format!("{} check {} ({label}) failed", self.test_name, self.index);
            eprintln!("FAIL {message}");
            if self.mode == RegTestMode::Compare {
                self.success = false;
                self.failures.push(message);
            }
        }
        ok
    }

    /// Finish the test: print a summary and return overall success.
    pub fn cleanup(&mut self) -> bool {
        if self.success {
            eprintln!("{}: {} checks passed", self.test_name, self.index);
        } else {
            eprintln!(
                "{}: {} of {} checks failed",
                self.test_name,
                self.failures.len(),
                self.index
            );
        }
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passing_checks() {
        let mut rp = RegParams::new("unit");
        assert!(rp.compare_values(1.0, 1.0, 0.0));
        assert!(rp.compare_values(10.0, 10.4, 0.5));
        assert!(rp.check("flag", true));
        assert!(rp.cleanup());
    }

    #[test]
    fn test_failing_check_is_recorded() {
        let mut rp = RegParams::new("unit");
        rp.mode = RegTestMode::Compare;
        assert!(!rp.compare_values(1.0, 2.0, 0.5));
        assert!(!rp.cleanup());
    }

    #[test]
    fn test_display_mode_never_fails() {
        let mut rp = RegParams::new("unit");
        rp.mode = RegTestMode::Display;
        rp.compare_values(1.0, 100.0, 0.0);
        assert!(rp.cleanup());
    }
}
