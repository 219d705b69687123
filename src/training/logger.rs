//! Progress logging for the fitting engine.

/// How much fitting progress gets printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// No output
    #[default]
    Silent,
    /// One summary line per fit
    Info,
    /// Per-node split decisions
    Debug,
}

/// Stdout logger gated by a [`Verbosity`] level.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Print a fit summary line.
    pub fn info(&self, msg: &str) {
        if self.verbosity >= Verbosity::Info {
            println!("{msg}");
        }
    }

    /// Print a per-node decision line.
    pub fn debug(&self, msg: &str) {
        if self.verbosity >= Verbosity::Debug {
            println!("{msg}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_ordering() {
        assert!(Verbosity::Silent < Verbosity::Info);
        assert!(Verbosity::Info < Verbosity::Debug);
        assert_eq!(Verbosity::default(), Verbosity::Silent);
    }

    #[test]
    fn logger_reports_level() {
        let logger = TrainingLogger::new(Verbosity::Info);
        assert_eq!(logger.verbosity(), Verbosity::Info);
    }
}
