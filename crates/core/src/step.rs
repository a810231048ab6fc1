use serde::{Deserialize, Serialize};

/// The seven ordered stages of a mock coding interview.
///
/// The derived `Ord` follows declaration order, which is the interview
/// ordering; the transition detector's allow-lists and the orchestrator's
/// "may advance only once at or past X" checks rely on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStep {
    ProblemExplanation,
    Clarification,
    SolutionDiscussion,
    Coding,
    CodeReview,
    FollowUp,
    Complexity,
}

impl InterviewStep {
    /// All steps in interview order.
    pub const ALL: [InterviewStep; 7] = [
        InterviewStep::ProblemExplanation,
        InterviewStep::Clarification,
        InterviewStep::SolutionDiscussion,
        InterviewStep::Coding,
        InterviewStep::CodeReview,
        InterviewStep::FollowUp,
        InterviewStep::Complexity,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// The following step, or `self` at the final step. No wraparound.
    pub fn next(self) -> Self {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(self)
    }

    /// The preceding step, or `self` at the first step. No wraparound.
    pub fn previous(self) -> Self {
        match self.index() {
            0 => self,
            i => Self::ALL[i - 1],
        }
    }

    /// The snake_case wire name, as carried in `step_control` payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStep::ProblemExplanation => "problem_explanation",
            InterviewStep::Clarification => "clarification",
            InterviewStep::SolutionDiscussion => "solution_discussion",
            InterviewStep::Coding => "coding",
            InterviewStep::CodeReview => "code_review",
            InterviewStep::FollowUp => "follow_up",
            InterviewStep::Complexity => "complexity",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_walks_the_full_sequence() {
        let mut step = InterviewStep::ProblemExplanation;
        for expected in InterviewStep::ALL.iter().skip(1) {
            step = step.next();
            assert_eq!(step, *expected);
        }
    }

    #[test]
    fn boundaries_are_idempotent() {
        assert_eq!(InterviewStep::Complexity.next(), InterviewStep::Complexity);
        assert_eq!(
            InterviewStep::ProblemExplanation.previous(),
            InterviewStep::ProblemExplanation
        );
    }

    #[test]
    fn previous_undoes_next_away_from_the_edges() {
        for step in InterviewStep::ALL.iter().take(6) {
            assert_eq!(step.next().previous(), *step);
        }
    }

    #[test]
    fn steps_are_ordered_by_interview_position() {
        assert!(InterviewStep::ProblemExplanation < InterviewStep::Clarification);
        assert!(InterviewStep::SolutionDiscussion < InterviewStep::Coding);
        assert!(InterviewStep::FollowUp < InterviewStep::Complexity);
    }

    #[test]
    fn serde_uses_the_wire_names() {
        for step in InterviewStep::ALL {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(json, format!("\"{}\"", step.as_str()));
            let back: InterviewStep = serde_json::from_str(&json).unwrap();
            assert_eq!(back, step);
        }
    }
}
