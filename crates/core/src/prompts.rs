//! Per-step interviewer instructions and the solution-detail heuristic.
//!
//! Each interview step has one fixed instruction template describing what the
//! interviewer should and should not do while in it. `respond_for_step` layers
//! the candidate's input and the problem context on top of the template and
//! delegates to the generative collaborator — except during solution
//! discussion, where a lexical heuristic first decides whether the candidate
//! has actually explained their approach or merely named a technique.

use crate::Turn;
use crate::catalog::Problem;
use crate::generator::Generator;
use crate::step::InterviewStep;
use anyhow::Result;
use rand::seq::SliceRandom;
use regex::RegexSet;
use std::sync::LazyLock;

/// Fallback instruction used outside an active, problem-bound interview.
pub const SYSTEM_PROMPT: &str =
    "You are a technical interviewer. Follow the specific step-based prompts exactly.";

/// Opening line sent with the problem presentation at interview start.
pub const GREETING: &str = "Hi! Ready to solve a coding problem? Let's get started.";

/// Fixed closing reply for the `end` action.
pub const COMPLETION: &str = "Great! That completes our interview. Good work today!";

/// Reply from the resolver, with an optional auto-advance signal.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReply {
    pub text: String,
    /// When set, the orchestrator advances the session to `next(step)`.
    pub advance: bool,
}

/// The interviewer's standing instructions for one step.
pub fn step_prompt(step: InterviewStep) -> &'static str {
    match step {
        InterviewStep::ProblemExplanation => {
            "You are presenting a coding problem. Your job:\n\
             - Present the problem clearly with examples and constraints\n\
             - Wait for the candidate to understand\n\
             - Ask: \"Do you understand the problem? Any questions?\"\n\
             Keep it simple and clear."
        }
        InterviewStep::Clarification => {
            "You are answering clarification questions about the problem.\n\
             - Answer their specific questions about the problem\n\
             - Be clear and concise\n\
             - Don't give solution hints\n\
             - After answering, ask: \"Any other questions about the problem?\"\n\
             - If no more questions, say: \"Great! What's your approach to solve this?\""
        }
        InterviewStep::SolutionDiscussion => {
            "You are evaluating the candidate's proposed solution approach.\n\n\
             IMPORTANT: The candidate MUST explain their solution approach before they can \
             proceed to coding.\n\n\
             If they ask to code without explaining their approach:\n\
             - Respond: \"Please first explain your approach and solution strategy.\"\n\
             - Guide them to discuss their plan\n\n\
             If they give a detailed explanation (describing how they'll use techniques, what \
             they'll compare, how they'll handle cases), then respond with a short go-ahead \
             like \"Sounds good, go ahead and code it\".\n\n\
             ONLY ask questions if:\n\
             - They only mention the technique name without explaining HOW they'll use it\n\
             - Their explanation is vague or missing key details\n\
             - There's a fundamental flaw in their approach\n\n\
             Keep responses under 15 words when letting them proceed to coding."
        }
        InterviewStep::Coding => {
            "You are monitoring the candidate while they code.\n\
             - Stay mostly SILENT while they code\n\
             - Only speak if they ask for help directly, are clearly going in the wrong \
             direction, or are completely stuck for a while\n\
             - Responses should be minimal: \"You're on the right track, keep going\", \
             \"Think about what happens when...\", \"Consider this edge case...\"\n\
             - Don't give implementation details"
        }
        InterviewStep::CodeReview => {
            "You are reviewing their completed code submission.\n\n\
             CRITICAL: You MUST carefully analyze their code for correctness and bugs.\n\n\
             Your job:\n\
             1. Check for bugs: logical errors, edge case issues, syntax problems\n\
             2. Test mentally: does this code actually solve the problem correctly?\n\
             3. Ask ONE specific question about their implementation, e.g. \"How does this \
             handle [specific edge case]?\" or \"Walk me through this part of your code\"\n\n\
             If you find bugs, point them out with a question and guide them to the fix; \
             don't give the solution directly. If the code looks correct, probe one specific \
             part to verify they understand it.\n\n\
             Don't summarize their code back to them. Ask ONE focused question."
        }
        InterviewStep::FollowUp => {
            "You are asking follow-up questions about their solution.\n\
             - Ask about optimizations: \"Can you think of a more efficient approach?\"\n\
             - Ask about alternatives: \"What other ways could you solve this?\"\n\
             - Ask about trade-offs: \"What are the pros and cons of your approach?\"\n\
             - Keep questions focused and specific\n\
             - Don't give alternative solutions yourself"
        }
        InterviewStep::Complexity => {
            "You are discussing time and space complexity.\n\
             - Ask: \"What's the time complexity of your solution?\"\n\
             - Ask: \"What's the space complexity?\"\n\
             - If they get it wrong, guide with questions like \"How many times does this \
             loop run?\" or \"How much extra space are you using?\"\n\
             - Confirm their analysis or help them correct it\n\
             - End with: \"Great! That completes our interview.\""
        }
    }
}

/// Short go-ahead replies used when a solution explanation is detailed enough
/// to skip the generative call entirely.
const BRIEF_GO_AHEADS: [&str; 5] = [
    "Sounds good, go ahead and code it",
    "Got it, let's see the implementation",
    "Alright, code it up",
    "Perfect, please implement that",
    "Great approach, start coding",
];

// Mechanism-describing patterns: a candidate who is actually explaining an
// algorithm tends to narrate steps, iteration, comparisons, data-structure
// usage, case handling, or pointer movement.
static DETAIL_INDICATORS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)start.*from|begin.*with|first.*then|step.*by.*step",
        r"(?i)move.*pointer|iterate|loop.*through|traverse",
        r"(?i)compare|check.*if|when.*equal|if.*match",
        r"(?i)store.*in|put.*into|use.*array|hash.*table",
        r"(?i)handle.*case|convert.*to|ignore.*non",
        r"(?i)left.*right|beginning.*end|increment|decrement",
    ])
    .expect("detail indicator patterns must compile")
});

/// Judges whether a solution explanation describes mechanism rather than just
/// naming a technique. Detailed iff it hits two or more indicator categories
/// at a reasonable length, or one indicator in a long explanation.
pub fn is_solution_explanation_detailed(explanation: &str) -> bool {
    let indicator_count = DETAIL_INDICATORS.matches(explanation).iter().count();
    let word_count = explanation.split_whitespace().count();
    (indicator_count >= 2 && word_count >= 15) || (indicator_count >= 1 && word_count >= 30)
}

/// Builds the one-line problem context handed to the collaborator.
pub fn problem_context(problem: &Problem) -> String {
    format!("Problem: {} - {}", problem.title, problem.description)
}

/// Renders the problem-presentation message sent at interview start.
pub fn problem_presentation(problem: &Problem) -> String {
    let examples = if problem.examples.is_empty() {
        String::new()
    } else {
        let rendered = problem
            .examples
            .iter()
            .map(|ex| {
                let mut s = format!("Input: {}\nOutput: {}", ex.input, ex.output);
                if let Some(explanation) = &ex.explanation {
                    s.push_str("\nExplanation: ");
                    s.push_str(explanation);
                }
                s
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("\n**Example**: {rendered}\n")
    };
    let constraints = if problem.constraints.is_empty() {
        String::new()
    } else {
        format!("\n**Constraints**: {}\n", problem.constraints.join("\n"))
    };
    format!(
        "**{}** ({})\n\n{}\n\n{}{}\n\nDo you understand the problem? Any questions?",
        problem.title, problem.difficulty, problem.description, examples, constraints
    )
}

/// Instruction used when the candidate tried something inappropriate for the
/// current step and the detector produced a redirection reason.
pub fn validation_prompt(reason: &str, problem_context: &str) -> String {
    format!(
        "You are a technical interviewer. The candidate just asked something inappropriate \
         for the current step.\n\nRespond with: \"{reason}\" and then guide them \
         appropriately for the current step.\n\nCurrent step context: {problem_context}"
    )
}

/// General-purpose review instruction for code submitted outside an active,
/// problem-bound interview.
pub fn general_review_prompt(language: &str) -> String {
    format!(
        "You are an experienced software engineering interviewer. Please review this \
         {language} code and provide constructive feedback.\n\nAnalyze the code for \
         quality, functionality, efficiency, and {language} style, and suggest \
         improvements. Be encouraging and educational in your feedback."
    )
}

fn contextual_prompt(step: InterviewStep, problem_context: &str, user_input: &str) -> String {
    format!(
        "{}\n\nProblem context: {}\n\nCandidate said: \"{}\"\n\nRespond according to the \
         step guidelines above.",
        step_prompt(step),
        problem_context,
        user_input
    )
}

/// Produces the interviewer's reply for one candidate turn in `step`.
///
/// During solution discussion a detailed explanation short-circuits the
/// collaborator: the candidate gets a canned go-ahead and the session is told
/// to advance. Everything else delegates to the collaborator with the step's
/// instruction template.
pub async fn respond_for_step<G: Generator + Send + Sync + ?Sized>(
    generator: &G,
    step: InterviewStep,
    user_input: &str,
    problem_context: &str,
    history: &[Turn],
) -> Result<StepReply> {
    if step == InterviewStep::SolutionDiscussion && is_solution_explanation_detailed(user_input) {
        let text = BRIEF_GO_AHEADS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(BRIEF_GO_AHEADS[0])
            .to_string();
        return Ok(StepReply {
            text,
            advance: true,
        });
    }

    let prompt = contextual_prompt(step, problem_context, user_input);
    let text = generator.generate(&prompt, user_input, history).await?;
    Ok(StepReply {
        text,
        advance: false,
    })
}
