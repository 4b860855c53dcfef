//! Evaluation policy.
//!
//! Options are fixed when a program is built and shared by every
//! evaluation of it. There are no config files: the embedding host decides.

/// Switches consulted by the steps at run time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EvaluationOptions {
    /// Track unknown attributes instead of treating them as errors.
    pub enable_unknowns: bool,
    /// Accumulate list-building comprehensions into a mutable builder.
    pub enable_comprehension_list_append: bool,
    /// Leave a comprehension as soon as its loop condition is false.
    pub short_circuiting: bool,
    /// Element bindings allowed per evaluation; `0` means unlimited.
    pub comprehension_max_iterations: u64,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        EvaluationOptions {
            enable_unknowns: false,
            enable_comprehension_list_append: false,
            short_circuiting: true,
            comprehension_max_iterations: 0,
        }
    }
}

impl EvaluationOptions {
    #[must_use]
    pub fn with_unknowns(mut self, enabled: bool) -> Self {
        self.enable_unknowns = enabled;
        self
    }

    #[must_use]
    pub fn with_comprehension_list_append(mut self, enabled: bool) -> Self {
        self.enable_comprehension_list_append = enabled;
        self
    }

    #[must_use]
    pub fn with_short_circuiting(mut self, enabled: bool) -> Self {
        self.short_circuiting = enabled;
        self
    }

    #[must_use]
    pub fn with_max_iterations(mut self, limit: u64) -> Self {
        self.comprehension_max_iterations = limit;
        self
    }
}
