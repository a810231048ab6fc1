//! Step-transition detection from free-text candidate input.
//!
//! The detector is a stateless classifier: given what the candidate just said
//! and the step the session is currently in, it suggests the step the session
//! should be in. Matching is case-insensitive substring/pattern testing, not
//! parsing, so identical `(input, step)` pairs always produce the same result.
//!
//! Rules are evaluated in strict priority order:
//! 1. natural-progression shortcuts, each tied to one specific current step;
//! 2. the coding-intent gate, which blocks coding before the approach has
//!    been discussed;
//! 3. broad topic-vocabulary categories, each gated by an allow-list of
//!    current steps.
//!
//! The ordering keeps a broad vocabulary hit (say, the word "example" inside
//! a sentence about algorithms) from overriding an explicit shortcut or the
//! blocking rule.

use crate::step::InterviewStep;
use regex::RegexSet;
use std::sync::LazyLock;

/// Result of classifying one candidate utterance.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// The step the session should be in after this input.
    pub suggested: InterviewStep,
    /// Whether the orchestrator should move to `suggested`.
    pub should_transition: bool,
    /// Present when the candidate tried to skip ahead and was redirected;
    /// surfaced to the client and folded into the interviewer's reply.
    pub reason: Option<String>,
}

impl Detection {
    fn stay(current: InterviewStep) -> Self {
        Self {
            suggested: current,
            should_transition: false,
            reason: None,
        }
    }

    fn transition(to: InterviewStep) -> Self {
        Self {
            suggested: to,
            should_transition: true,
            reason: None,
        }
    }
}

/// An exact-intent phrase that only fires from one specific step.
struct ShortcutRule {
    from: InterviewStep,
    to: InterviewStep,
    patterns: &'static LazyLock<RegexSet>,
}

/// A vocabulary category gated by the steps it may fire from.
struct VocabularyRule {
    target: InterviewStep,
    allowed_from: &'static [InterviewStep],
    patterns: &'static LazyLock<RegexSet>,
}

fn case_insensitive_set(patterns: &[&str]) -> RegexSet {
    let prefixed: Vec<String> = patterns.iter().map(|p| format!("(?i){p}")).collect();
    RegexSet::new(prefixed).expect("step detection patterns must compile")
}

static UNDERSTOOD_PROBLEM: LazyLock<RegexSet> =
    LazyLock::new(|| case_insensitive_set(&[r"understand.*problem"]));

static NO_MORE_QUESTIONS: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive_set(&[
        r"no.*more.*question",
        r"no.*question",
        r"ready.*to.*discuss",
        r"ready.*for.*next",
    ])
});

static GO_AHEAD: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive_set(&[r"got.*it", r"sounds.*good", r"go.*ahead", r"code.*it"])
});

static CODING_INTENT: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive_set(&[
        r"start.*cod",
        r"write.*code",
        r"implement",
        r"code.*now",
        r"begin.*coding",
        r"let.*code",
        r"ready.*to.*code",
        r"can.*i.*code",
        r"should.*i.*code",
        r"time.*to.*code",
    ])
});

static CLARIFICATION_VOCABULARY: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive_set(&[
        r"what.*if",
        r"can.*assume",
        r"should.*handle",
        r"what.*about",
        r"clarify",
        r"edge.*case",
        r"constraint",
        r"input.*range",
        r"output.*format",
        r"example",
    ])
});

static SOLUTION_VOCABULARY: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive_set(&[
        r"approach",
        r"solution",
        r"algorithm",
        r"strategy",
        r"plan",
        r"think.*about",
        r"would.*use",
        r"idea.*is",
        r"solve.*by",
        r"my.*approach",
        r"i.*think",
        r"propose",
        r"suggest",
        r"iterate",
        r"loop",
        r"recursion",
        r"dynamic.*programming",
        r"hash.*table",
        r"binary.*search",
        r"two.*pointer",
        r"sliding.*window",
        r"breadth.*first",
        r"depth.*first",
        r"sort",
    ])
});

static REVIEW_VOCABULARY: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive_set(&[
        r"review.*code",
        r"check.*code",
        r"look.*at.*code",
        r"finished.*coding",
        r"done.*with.*code",
        r"completed.*solution",
        r"here.*is.*my.*code",
        r"my.*solution",
    ])
});

static FOLLOW_UP_VOCABULARY: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive_set(&[
        r"optimiz",
        r"improve",
        r"better.*way",
        r"alternative",
        r"different.*approach",
        r"more.*efficient",
        r"trade.*off",
        r"pros.*and.*cons",
        r"other.*solution",
    ])
});

static COMPLEXITY_VOCABULARY: LazyLock<RegexSet> = LazyLock::new(|| {
    case_insensitive_set(&[
        r"time.*complexity",
        r"space.*complexity",
        r"big.*o",
        r"runtime",
        r"memory.*usage",
        r"complexity.*analysis",
        r"o\(.*\)",
        r"linear.*time",
        r"constant.*time",
        r"logarithmic",
    ])
});

static SHORTCUT_RULES: [ShortcutRule; 3] = [
    ShortcutRule {
        from: InterviewStep::ProblemExplanation,
        to: InterviewStep::Clarification,
        patterns: &UNDERSTOOD_PROBLEM,
    },
    ShortcutRule {
        from: InterviewStep::Clarification,
        to: InterviewStep::SolutionDiscussion,
        patterns: &NO_MORE_QUESTIONS,
    },
    ShortcutRule {
        from: InterviewStep::SolutionDiscussion,
        to: InterviewStep::Coding,
        patterns: &GO_AHEAD,
    },
];

// Declaration order is the tie-break when an input matches the vocabulary of
// more than one category.
static VOCABULARY_RULES: [VocabularyRule; 5] = [
    VocabularyRule {
        target: InterviewStep::Clarification,
        allowed_from: &[
            InterviewStep::ProblemExplanation,
            InterviewStep::Clarification,
        ],
        patterns: &CLARIFICATION_VOCABULARY,
    },
    VocabularyRule {
        target: InterviewStep::SolutionDiscussion,
        allowed_from: &[
            InterviewStep::Clarification,
            InterviewStep::SolutionDiscussion,
        ],
        patterns: &SOLUTION_VOCABULARY,
    },
    VocabularyRule {
        target: InterviewStep::CodeReview,
        allowed_from: &[InterviewStep::Coding, InterviewStep::CodeReview],
        patterns: &REVIEW_VOCABULARY,
    },
    VocabularyRule {
        target: InterviewStep::FollowUp,
        allowed_from: &[InterviewStep::CodeReview, InterviewStep::FollowUp],
        patterns: &FOLLOW_UP_VOCABULARY,
    },
    VocabularyRule {
        target: InterviewStep::Complexity,
        allowed_from: &[
            InterviewStep::CodeReview,
            InterviewStep::FollowUp,
            InterviewStep::Complexity,
        ],
        patterns: &COMPLEXITY_VOCABULARY,
    },
];

/// Redirection message for candidates who ask to code before discussing
/// their approach.
pub const APPROACH_FIRST_REASON: &str =
    "Before coding, please first explain your approach and solution strategy.";

/// Classifies `input` against the rule sets and returns the suggested step.
pub fn detect(input: &str, current: InterviewStep) -> Detection {
    let input = input.trim();

    // 1. Natural-progression shortcuts, each tied to its own current step.
    for rule in &SHORTCUT_RULES {
        if current == rule.from && rule.patterns.is_match(input) {
            return Detection::transition(rule.to);
        }
    }

    // 2. Coding-intent gate. Coding may never be entered without passing
    //    through solution discussion.
    if CODING_INTENT.is_match(input) {
        match current {
            InterviewStep::ProblemExplanation | InterviewStep::Clarification => {
                return Detection {
                    suggested: InterviewStep::SolutionDiscussion,
                    should_transition: true,
                    reason: Some(APPROACH_FIRST_REASON.to_string()),
                };
            }
            InterviewStep::SolutionDiscussion | InterviewStep::Coding => {
                return Detection::transition(InterviewStep::Coding);
            }
            // From later steps the gate does not apply; fall through to the
            // vocabulary rules.
            _ => {}
        }
    }

    // 3. Topic vocabulary, gated by each category's allow-list.
    for rule in &VOCABULARY_RULES {
        if rule.allowed_from.contains(&current) && rule.patterns.is_match(input) {
            return Detection::transition(rule.target);
        }
    }

    // 4. No match.
    Detection::stay(current)
}
