//! Blocking yes/no gate in front of state-changing actions.

/// Presents `message` and blocks until the user answers.
pub trait ConfirmationGate {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Runs `action` only when the gate answers yes.
pub fn confirm_then<T>(
    gate: &mut dyn ConfirmationGate,
    message: &str,
    action: impl FnOnce() -> T,
) -> Option<T> {
    if gate.confirm(message) {
        Some(action())
    } else {
        None
    }
}

/// Answers every prompt the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmationGate for FixedAnswer {
    fn confirm(&mut self, _message: &str) -> bool {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuation_runs_only_on_yes() {
        let mut ran = 0;
        assert_eq!(confirm_then(&mut FixedAnswer(false), "sure?", || ran += 1), None);
        assert_eq!(ran, 0);
        assert_eq!(confirm_then(&mut FixedAnswer(true), "sure?", || ran += 1), Some(()));
        assert_eq!(ran, 1);
    }
}
