use std::fmt;
use std::time::Duration;

use super::env::Bindings;

/// Detailed result of one batch check, returned by
/// [`check_batch_detailed`](crate::check_batch_detailed).
///
/// Carries the per-blank verdicts in evaluation order, the final state of
/// the binding environment, and the wall-clock duration of the pass.
#[derive(Debug, Clone)]
#[must_use]
pub struct CheckReport {
    verdicts: Vec<(String, bool)>,
    bindings: Bindings,
    duration: Duration,
}

impl CheckReport {
    pub(crate) fn new(
        verdicts: Vec<(String, bool)>,
        bindings: Bindings,
        duration: Duration,
    ) -> Self {
        Self {
            verdicts,
            bindings,
            duration,
        }
    }

    /// Per-blank `(name, verdict)` pairs in evaluation order.
    #[must_use]
    pub fn verdicts(&self) -> &[(String, bool)] {
        &self.verdicts
    }

    /// Whether every blank in the batch was accepted.
    #[must_use]
    pub fn all_correct(&self) -> bool {
        self.verdicts.iter().all(|(_, ok)| *ok)
    }

    /// The binding environment as it stood at the end of the batch.
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Wall-clock duration of the batch check.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let correct = self.verdicts.iter().filter(|(_, ok)| *ok).count();
        write!(f, "{}/{} correct", correct, self.verdicts.len())?;
        let wrong: Vec<&str> = self
            .verdicts
            .iter()
            .filter(|(_, ok)| !*ok)
            .map(|(name, _)| name.as_str())
            .collect();
        if !wrong.is_empty() {
            write!(f, ", wrong: [{}]", wrong.join(", "))?;
        }
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
