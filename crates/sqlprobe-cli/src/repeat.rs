// sqlprobe-cli/src/repeat.rs
// ============================================================================
// Module: Repeat Plan
// Description: Decides whether the `run` command triggers another probe.
// Purpose: Keep the repeat loop policy pure and testable.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! A probe run always happens at least once. Afterwards the plan either stops,
//! continues for a fixed number of iterations, or asks the operator.

// ============================================================================
// SECTION: Types
// ============================================================================

/// Repeat policy selected from the `run` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatPlan {
    /// Run once.
    Once,
    /// Run a fixed number of additional times.
    Iterations {
        /// Runs still owed after the current one.
        remaining: u32,
    },
    /// Ask the operator after every run.
    Interactive,
}

/// What to do after a run completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Stop and exit.
    Stop,
    /// Start another run immediately.
    Continue,
    /// Ask the operator before starting another run.
    Confirm,
}

impl RepeatPlan {
    /// Builds a plan from `--repeat` and `--iterations`.
    ///
    /// `iterations` counts total runs; zero is treated as one.
    #[must_use]
    pub const fn from_flags(interactive: bool, iterations: Option<u32>) -> Self {
        if interactive {
            return Self::Interactive;
        }
        match iterations {
            Some(total) if total > 1 => Self::Iterations {
                remaining: total - 1,
            },
            _ => Self::Once,
        }
    }

    /// Consumes one completed run and returns the next step.
    pub fn advance(&mut self) -> NextStep {
        match self {
            Self::Once => NextStep::Stop,
            Self::Iterations {
                remaining,
            } => {
                if *remaining == 0 {
                    return NextStep::Stop;
                }
                *remaining -= 1;
                NextStep::Continue
            }
            Self::Interactive => NextStep::Confirm,
        }
    }
}

/// Returns true when an operator reply asks for another run.
///
/// An empty reply (Enter) or `y`/`yes` repeats; anything else stops.
#[must_use]
pub fn confirms_repeat(reply: &str) -> bool {
    matches!(reply.trim().to_ascii_lowercase().as_str(), "" | "y" | "yes")
}
