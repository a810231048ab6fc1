//! Per-connection session state and the event-dispatch pipeline.
//!
//! A `Session` owns everything one candidate's connection accumulates: the
//! conversation history, the selected problem, submitted code, and the
//! current interview step. `handle_event` is the single entry point: it maps
//! one inbound event to the session's next state plus the ordered list of
//! outbound events, so the whole control flow is unit-testable without a live
//! connection. The only I/O it performs is the generative-collaborator call.

use crate::Turn;
use crate::catalog::{self, Problem};
use crate::detector;
use crate::events::{ClientEvent, ProblemConfig, ServerEvent, SessionAction, StepAction};
use crate::generator::Generator;
use crate::prompts::{self, StepReply};
use crate::step::InterviewStep;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

/// Lifecycle status of a session. Moves forward only, except that a new
/// `start` re-enters `Active` from `Completed` (sessions live as long as
/// their connection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Active,
    Completed,
}

pub struct Session {
    pub id: Uuid,
    pub status: SessionStatus,
    pub step: InterviewStep,
    pub history: Vec<Turn>,
    pub problem: Option<Problem>,
    /// Most recent submission per language; last write wins.
    pub submitted_code: HashMap<String, String>,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            status: SessionStatus::Idle,
            step: InterviewStep::ProblemExplanation,
            history: Vec::new(),
            problem: None,
            submitted_code: HashMap::new(),
            started_at: Utc::now(),
        }
    }

    /// Dispatches one inbound event and returns the outbound events to send,
    /// in order. Collaborator failures never escape: they surface as a single
    /// `error` event for this session.
    pub async fn handle_event<G: Generator + Send + Sync>(
        &mut self,
        generator: &G,
        event: ClientEvent,
    ) -> Vec<ServerEvent> {
        match event {
            ClientEvent::SessionControl {
                action: SessionAction::Start,
                problem_config,
            } => self.start(problem_config),
            ClientEvent::SessionControl {
                action: SessionAction::End,
                ..
            } => self.end(),
            ClientEvent::TextInput { text } => self.respond(generator, &text).await,
            ClientEvent::VoiceInput {
                transcript,
                is_final,
            } => {
                if is_final {
                    self.respond(generator, &transcript).await
                } else {
                    // Interim transcripts are for live display only; the core
                    // acts on final ones.
                    tracing::debug!(session = %self.id, "ignoring interim transcript");
                    Vec::new()
                }
            }
            ClientEvent::CodeInput { code, language } => {
                self.review_code(generator, code, language).await
            }
            ClientEvent::StepControl { action, step } => self.control_step(action, step),
        }
    }

    fn start(&mut self, config: Option<ProblemConfig>) -> Vec<ServerEvent> {
        // Resolve the problem before touching any state, so a failed start
        // leaves the session exactly as it was.
        let (problem, step) = match &config {
            Some(ProblemConfig::Category {
                category,
                difficulty,
            }) => match catalog::random_problem(category, difficulty.as_deref()) {
                Some(problem) => (problem, InterviewStep::Clarification),
                None => {
                    return vec![ServerEvent::error(format!(
                        "No {} problems found in {} category",
                        difficulty.as_deref().unwrap_or(""),
                        category
                    ))];
                }
            },
            Some(ProblemConfig::Url { url }) => match catalog::parse_problem_url(url) {
                Some(slug) => (
                    catalog::placeholder_from_slug(&slug),
                    InterviewStep::Clarification,
                ),
                None => return vec![ServerEvent::error("Invalid problem URL format")],
            },
            // Default: a random easy array problem, presented from the top.
            None => match catalog::random_problem("array", Some("Easy")) {
                Some(problem) => (problem, InterviewStep::ProblemExplanation),
                None => return vec![ServerEvent::error("Failed to select a problem")],
            },
        };

        tracing::info!(session = %self.id, problem = %problem.id, "interview started");
        self.status = SessionStatus::Active;
        self.started_at = Utc::now();
        self.step = step;

        let presentation = format!(
            "{}\n\n{}",
            prompts::GREETING,
            prompts::problem_presentation(&problem)
        );
        self.problem = Some(problem.clone());
        self.history.push(Turn::assistant(presentation.clone()));

        vec![
            ServerEvent::AiResponse {
                text: presentation,
                should_speak: true,
                current_step: Some(self.step),
                step_changed: None,
            },
            ServerEvent::SessionControl {
                session_id: None,
                message: "Interview started".to_string(),
                problem: Some(problem),
                current_step: Some(self.step),
            },
        ]
    }

    fn end(&mut self) -> Vec<ServerEvent> {
        tracing::info!(session = %self.id, "interview completed");
        self.status = SessionStatus::Completed;
        self.history.push(Turn::assistant(prompts::COMPLETION));

        vec![
            ServerEvent::AiResponse {
                text: prompts::COMPLETION.to_string(),
                should_speak: true,
                current_step: None,
                step_changed: None,
            },
            ServerEvent::SessionControl {
                session_id: None,
                message: "Interview completed".to_string(),
                problem: None,
                current_step: None,
            },
        ]
    }

    /// Text or final-voice input: detect a step transition, then produce the
    /// interviewer's reply for the (possibly just-changed) step.
    async fn respond<G: Generator + Send + Sync>(
        &mut self,
        generator: &G,
        input: &str,
    ) -> Vec<ServerEvent> {
        self.history.push(Turn::user(input));

        let mut events = Vec::new();
        let mut step_changed = false;
        let mut validation: Option<String> = None;

        if self.status == SessionStatus::Active {
            let detection = detector::detect(input, self.step);
            if detection.should_transition && detection.suggested != self.step {
                tracing::info!(
                    session = %self.id,
                    from = self.step.as_str(),
                    to = detection.suggested.as_str(),
                    "step transition detected"
                );
                self.step = detection.suggested;
                step_changed = true;
                // A reason means the candidate tried to skip a step and was
                // redirected; the client shows it alongside the step change.
                events.push(match &detection.reason {
                    Some(reason) => ServerEvent::StepControl {
                        message: format!("Moved to step: {} - {}", self.step.as_str(), reason),
                        current_step: self.step,
                        auto_detected: Some(true),
                        auto_advanced: None,
                        validation_message: Some(reason.clone()),
                    },
                    None => ServerEvent::StepControl {
                        message: format!("Automatically moved to step: {}", self.step.as_str()),
                        current_step: self.step,
                        auto_detected: Some(true),
                        auto_advanced: None,
                        validation_message: None,
                    },
                });
            } else if !detection.should_transition {
                // No transition, but a rejection reason: fold it into this
                // turn's instruction instead.
                validation = detection.reason;
            }
        }

        // Context excludes the user turn just appended; it travels as the
        // current message instead.
        let prior = &self.history[..self.history.len() - 1];

        let generated = match (&self.problem, self.status) {
            (Some(problem), SessionStatus::Active) => {
                let context = prompts::problem_context(problem);
                match validation {
                    Some(reason) => generator
                        .generate(&prompts::validation_prompt(&reason, &context), input, prior)
                        .await
                        .map(|text| StepReply {
                            text,
                            advance: false,
                        }),
                    None => {
                        prompts::respond_for_step(generator, self.step, input, &context, prior)
                            .await
                    }
                }
            }
            // Outside an active, problem-bound interview fall back to the
            // general interviewer instructions.
            _ => generator
                .generate(prompts::SYSTEM_PROMPT, input, prior)
                .await
                .map(|text| StepReply {
                    text,
                    advance: false,
                }),
        };

        let reply = match generated {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(session = %self.id, error = ?e, "generation failed");
                events.push(ServerEvent::error("Failed to generate AI response"));
                return events;
            }
        };

        self.history.push(Turn::assistant(reply.text.clone()));
        events.push(ServerEvent::AiResponse {
            text: reply.text,
            should_speak: true,
            current_step: Some(self.step),
            step_changed: Some(step_changed),
        });

        // A detailed solution explanation advances straight to coding.
        if reply.advance {
            let next = self.step.next();
            if next != self.step {
                tracing::info!(
                    session = %self.id,
                    from = self.step.as_str(),
                    to = next.as_str(),
                    "auto-advancing step"
                );
                self.step = next;
                events.push(ServerEvent::StepControl {
                    message: format!("Advanced to {}", next.as_str()),
                    current_step: next,
                    auto_detected: None,
                    auto_advanced: Some(true),
                    validation_message: None,
                });
            }
        }

        events
    }

    /// Code submission: store it, force the session into code review, and
    /// produce a review reply. The detector is bypassed — submitting code is
    /// itself an unambiguous step signal.
    async fn review_code<G: Generator + Send + Sync>(
        &mut self,
        generator: &G,
        code: String,
        language: String,
    ) -> Vec<ServerEvent> {
        tracing::info!(
            session = %self.id,
            language = %language,
            bytes = code.len(),
            "code submission"
        );
        self.submitted_code.insert(language.clone(), code.clone());

        let code_message = format!("Here's my {language} solution:\n```{language}\n{code}\n```");
        self.history.push(Turn::user(code_message.clone()));

        let mut events = Vec::new();
        if self.status == SessionStatus::Active && self.step != InterviewStep::CodeReview {
            self.step = InterviewStep::CodeReview;
            events.push(ServerEvent::StepControl {
                message: format!("Automatically moved to step: {}", self.step.as_str()),
                current_step: self.step,
                auto_detected: Some(true),
                auto_advanced: None,
                validation_message: None,
            });
        }

        let prior = &self.history[..self.history.len() - 1];
        let result = match (&self.problem, self.status) {
            (Some(problem), SessionStatus::Active) => {
                let context = prompts::problem_context(problem);
                prompts::respond_for_step(
                    generator,
                    InterviewStep::CodeReview,
                    &code_message,
                    &context,
                    prior,
                )
                .await
                .map(|reply| reply.text)
            }
            // Without a selected problem there is nothing step-specific to
            // review against; ask for general feedback instead.
            _ => {
                generator
                    .generate(
                        &prompts::general_review_prompt(&language),
                        &format!("Please review this {language} code:\n```{language}\n{code}\n```"),
                        prior,
                    )
                    .await
            }
        };

        match result {
            Ok(text) => {
                self.history.push(Turn::assistant(text.clone()));
                events.push(ServerEvent::AiResponse {
                    text,
                    should_speak: true,
                    current_step: Some(self.step),
                    step_changed: None,
                });
            }
            Err(e) => {
                tracing::error!(session = %self.id, error = ?e, "code review failed");
                events.push(ServerEvent::error("Failed to review code"));
            }
        }
        events
    }

    /// Manual step control always wins; the detector is bypassed entirely.
    fn control_step(
        &mut self,
        action: StepAction,
        step: Option<InterviewStep>,
    ) -> Vec<ServerEvent> {
        match action {
            StepAction::SetStep => match step {
                Some(step) => self.step = step,
                None => {
                    tracing::warn!(session = %self.id, "set_step without a step; ignoring");
                    return Vec::new();
                }
            },
            StepAction::Next => self.step = self.step.next(),
            StepAction::Previous => self.step = self.step.previous(),
        }
        vec![ServerEvent::StepControl {
            message: "Step changed".to_string(),
            current_step: self.step,
            auto_detected: None,
            auto_advanced: None,
            validation_message: None,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Role;
    use crate::generator::MockGenerator;
    use anyhow::anyhow;

    fn active_session(step: InterviewStep) -> Session {
        let mut session = Session::new(Uuid::new_v4());
        session.status = SessionStatus::Active;
        session.step = step;
        session.problem = catalog::random_problem("array", Some("Easy"));
        session
    }

    fn start_event(config: Option<ProblemConfig>) -> ClientEvent {
        ClientEvent::SessionControl {
            action: SessionAction::Start,
            problem_config: config,
        }
    }

    #[tokio::test]
    async fn start_with_a_configured_problem_begins_at_clarification() {
        let generator = MockGenerator::new();
        let mut session = Session::new(Uuid::new_v4());

        let events = session
            .handle_event(
                &generator,
                start_event(Some(ProblemConfig::Category {
                    category: "array".to_string(),
                    difficulty: Some("Easy".to_string()),
                })),
            )
            .await;

        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.step, InterviewStep::Clarification);
        assert!(session.problem.is_some());
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].role, Role::Assistant);

        assert!(matches!(events[0], ServerEvent::AiResponse { .. }));
        match &events[1] {
            ServerEvent::SessionControl {
                message, problem, ..
            } => {
                assert_eq!(message, "Interview started");
                assert!(problem.is_some());
            }
            other => panic!("expected session_control ack, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn start_without_config_begins_at_problem_explanation() {
        let generator = MockGenerator::new();
        let mut session = Session::new(Uuid::new_v4());

        session.handle_event(&generator, start_event(None)).await;

        assert_eq!(session.step, InterviewStep::ProblemExplanation);
        let problem = session.problem.as_ref().unwrap();
        assert_eq!(problem.category, "array");
        assert_eq!(problem.difficulty, "Easy");
    }

    #[tokio::test]
    async fn start_with_an_empty_category_fails_and_leaves_state_untouched() {
        let generator = MockGenerator::new();
        let mut session = Session::new(Uuid::new_v4());

        let events = session
            .handle_event(
                &generator,
                start_event(Some(ProblemConfig::Category {
                    category: "graphs".to_string(),
                    difficulty: None,
                })),
            )
            .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ServerEvent::Error { .. }));
        assert_eq!(session.status, SessionStatus::Idle);
        assert!(session.problem.is_none());
        assert!(session.history.is_empty());
    }

    #[tokio::test]
    async fn start_from_a_problem_url_builds_a_placeholder() {
        let generator = MockGenerator::new();
        let mut session = Session::new(Uuid::new_v4());

        session
            .handle_event(
                &generator,
                start_event(Some(ProblemConfig::Url {
                    url: "https://leetcode.com/problems/two-sum/".to_string(),
                })),
            )
            .await;

        let problem = session.problem.as_ref().unwrap();
        assert_eq!(problem.title, "Two Sum");
        assert_eq!(problem.category, "custom");
        assert_eq!(session.step, InterviewStep::Clarification);
    }

    #[tokio::test]
    async fn invalid_problem_url_is_rejected() {
        let generator = MockGenerator::new();
        let mut session = Session::new(Uuid::new_v4());

        let events = session
            .handle_event(
                &generator,
                start_event(Some(ProblemConfig::Url {
                    url: "https://example.com/nope".to_string(),
                })),
            )
            .await;

        assert!(matches!(events[0], ServerEvent::Error { .. }));
        assert_eq!(session.status, SessionStatus::Idle);
    }

    #[tokio::test]
    async fn end_completes_the_session() {
        let generator = MockGenerator::new();
        let mut session = active_session(InterviewStep::Complexity);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::SessionControl {
                    action: SessionAction::End,
                    problem_config: None,
                },
            )
            .await;

        assert_eq!(session.status, SessionStatus::Completed);
        match &events[0] {
            ServerEvent::AiResponse { text, .. } => {
                assert_eq!(text, prompts::COMPLETION);
            }
            other => panic!("expected ai_response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn coding_request_before_discussion_is_blocked() {
        let mut generator = MockGenerator::new();
        // After the redirect, the solution-discussion resolver still answers
        // this turn.
        generator
            .expect_generate()
            .returning(|_, _, _| Ok("Please explain your approach first.".to_string()))
            .once();
        let mut session = active_session(InterviewStep::ProblemExplanation);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::TextInput {
                    text: "let me write the code".to_string(),
                },
            )
            .await;

        // The session must land on solution discussion, not coding.
        assert_eq!(session.step, InterviewStep::SolutionDiscussion);
        match &events[0] {
            ServerEvent::StepControl {
                current_step,
                auto_detected,
                validation_message,
                ..
            } => {
                assert_eq!(*current_step, InterviewStep::SolutionDiscussion);
                assert_eq!(*auto_detected, Some(true));
                assert!(validation_message.is_some());
            }
            other => panic!("expected step_control, got {other:?}"),
        }
        match &events[1] {
            ServerEvent::AiResponse { step_changed, .. } => {
                assert_eq!(*step_changed, Some(true));
            }
            other => panic!("expected ai_response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn clarifying_question_moves_to_clarification() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _, _| Ok("Yes, the array can be empty.".to_string()))
            .once();
        let mut session = active_session(InterviewStep::ProblemExplanation);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::TextInput {
                    text: "What if the array is empty?".to_string(),
                },
            )
            .await;

        assert_eq!(session.step, InterviewStep::Clarification);
        assert!(matches!(
            events[0],
            ServerEvent::StepControl {
                auto_detected: Some(true),
                validation_message: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn detailed_solution_explanation_auto_advances_to_coding() {
        // Zero expectations: a detailed explanation must not reach the
        // collaborator.
        let generator = MockGenerator::new();
        let mut session = active_session(InterviewStep::SolutionDiscussion);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::TextInput {
                    text: "I'll use a hash table to store seen values, iterate once, and \
                           check if the complement exists"
                        .to_string(),
                },
            )
            .await;

        assert_eq!(session.step, InterviewStep::Coding);
        assert!(matches!(events[0], ServerEvent::AiResponse { .. }));
        assert!(matches!(
            events[1],
            ServerEvent::StepControl {
                auto_advanced: Some(true),
                current_step: InterviewStep::Coding,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn interim_voice_transcripts_are_ignored() {
        let generator = MockGenerator::new();
        let mut session = active_session(InterviewStep::Clarification);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::VoiceInput {
                    transcript: "what if".to_string(),
                    is_final: false,
                },
            )
            .await;

        assert!(events.is_empty());
        assert!(session.history.is_empty());
        assert_eq!(session.step, InterviewStep::Clarification);
    }

    #[tokio::test]
    async fn final_voice_transcripts_are_processed_like_text() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _, _| Ok("Good question.".to_string()))
            .once();
        let mut session = active_session(InterviewStep::Clarification);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::VoiceInput {
                    transcript: "Can I assume the input fits in memory?".to_string(),
                    is_final: true,
                },
            )
            .await;

        assert_eq!(session.history.len(), 2);
        assert!(events
            .iter()
            .any(|e| matches!(e, ServerEvent::AiResponse { .. })));
    }

    #[tokio::test]
    async fn code_submission_forces_code_review_with_event_ordering() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt, _, _| prompt.contains("reviewing their completed code submission"))
            .returning(|_, _, _| Ok("What happens if the array is empty?".to_string()))
            .once();
        let mut session = active_session(InterviewStep::SolutionDiscussion);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::CodeInput {
                    code: "def two_sum(nums, target): ...".to_string(),
                    language: "python".to_string(),
                },
            )
            .await;

        assert_eq!(session.step, InterviewStep::CodeReview);
        assert_eq!(
            session.submitted_code.get("python").map(String::as_str),
            Some("def two_sum(nums, target): ...")
        );
        // The step change is announced before the review reply.
        assert!(matches!(
            events[0],
            ServerEvent::StepControl {
                current_step: InterviewStep::CodeReview,
                auto_detected: Some(true),
                ..
            }
        ));
        assert!(matches!(events[1], ServerEvent::AiResponse { .. }));
    }

    #[tokio::test]
    async fn code_resubmission_in_review_emits_no_step_change() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _, _| Ok("Walk me through this line.".to_string()))
            .once();
        let mut session = active_session(InterviewStep::CodeReview);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::CodeInput {
                    code: "fixed version".to_string(),
                    language: "python".to_string(),
                },
            )
            .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ServerEvent::AiResponse { .. }));
    }

    #[tokio::test]
    async fn code_resubmission_overwrites_per_language() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _, _| Ok("OK.".to_string()))
            .times(2);
        let mut session = active_session(InterviewStep::CodeReview);

        for code in ["v1", "v2"] {
            session
                .handle_event(
                    &generator,
                    ClientEvent::CodeInput {
                        code: code.to_string(),
                        language: "rust".to_string(),
                    },
                )
                .await;
        }

        assert_eq!(
            session.submitted_code.get("rust").map(String::as_str),
            Some("v2")
        );
    }

    #[tokio::test]
    async fn generator_failure_surfaces_as_a_single_error_event() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _, _| Err(anyhow!("timeout")))
            .once();
        let mut session = active_session(InterviewStep::Clarification);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::TextInput {
                    text: "hello there".to_string(),
                },
            )
            .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], ServerEvent::Error { .. }));
        // The candidate's turn stays; no assistant turn is appended.
        assert_eq!(session.history.len(), 1);
        assert_eq!(session.history[0].role, Role::User);
        assert_eq!(session.step, InterviewStep::Clarification);
    }

    #[tokio::test]
    async fn manual_step_control_bypasses_the_detector() {
        let generator = MockGenerator::new();
        let mut session = active_session(InterviewStep::Clarification);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::StepControl {
                    action: StepAction::SetStep,
                    step: Some(InterviewStep::Complexity),
                },
            )
            .await;

        assert_eq!(session.step, InterviewStep::Complexity);
        assert!(matches!(
            events[0],
            ServerEvent::StepControl {
                current_step: InterviewStep::Complexity,
                auto_detected: None,
                ..
            }
        ));

        session
            .handle_event(
                &generator,
                ClientEvent::StepControl {
                    action: StepAction::Previous,
                    step: None,
                },
            )
            .await;
        assert_eq!(session.step, InterviewStep::FollowUp);

        session
            .handle_event(
                &generator,
                ClientEvent::StepControl {
                    action: StepAction::Next,
                    step: None,
                },
            )
            .await;
        assert_eq!(session.step, InterviewStep::Complexity);
    }

    #[tokio::test]
    async fn set_step_without_a_step_is_ignored() {
        let generator = MockGenerator::new();
        let mut session = active_session(InterviewStep::Coding);

        let events = session
            .handle_event(
                &generator,
                ClientEvent::StepControl {
                    action: StepAction::SetStep,
                    step: None,
                },
            )
            .await;

        assert!(events.is_empty());
        assert_eq!(session.step, InterviewStep::Coding);
    }

    #[tokio::test]
    async fn history_preserves_insertion_order() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .returning(|_, _, _| Ok("reply".to_string()))
            .times(2);
        let mut session = active_session(InterviewStep::Clarification);

        for text in ["first question", "second question"] {
            session
                .handle_event(
                    &generator,
                    ClientEvent::TextInput {
                        text: text.to_string(),
                    },
                )
                .await;
        }

        let contents: Vec<&str> = session
            .history
            .iter()
            .map(|turn| turn.content.as_str())
            .collect();
        assert_eq!(
            contents,
            vec!["first question", "reply", "second question", "reply"]
        );
        assert_eq!(session.history[0].role, Role::User);
        assert_eq!(session.history[1].role, Role::Assistant);
        assert!(session.history[0].timestamp <= session.history[2].timestamp);
    }

    #[tokio::test]
    async fn idle_session_falls_back_to_the_general_prompt() {
        let mut generator = MockGenerator::new();
        generator
            .expect_generate()
            .withf(|prompt, _, _| prompt == prompts::SYSTEM_PROMPT)
            .returning(|_, _, _| Ok("Hello! Start when you're ready.".to_string()))
            .once();
        let mut session = Session::new(Uuid::new_v4());

        let events = session
            .handle_event(
                &generator,
                ClientEvent::TextInput {
                    text: "hi".to_string(),
                },
            )
            .await;

        assert!(matches!(events[0], ServerEvent::AiResponse { .. }));
        // Idle sessions never run the detector.
        assert_eq!(session.step, InterviewStep::ProblemExplanation);
    }
}
