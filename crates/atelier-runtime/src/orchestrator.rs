//! The session orchestrator.
//!
//! [`SessionOrchestrator`] is the only component allowed to mutate the active
//! agent, the agent sequence, and the loop bookkeeping, and the only invoker
//! of persistence. The conversational shell calls the action methods
//! (identify, capture, refine, propose, feedback, capsule) with structured
//! data extracted from user utterances; every spoken reply flows back through
//! the speech sink and the transcript broadcast.
//!
//! Failure policy: milestone-save failures are caught, logged, and folded
//! into the spoken reply as an apology — the conversation continues on
//! in-memory state and the user may retry the triggering action. Unknown
//! agent targets degrade to a fallback message with the current agent left
//! active.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use atelier_core::agent::AgentKind;
use atelier_core::context::ContextItem;
use atelier_core::events::{SessionEvent, Speaker, TranscriptMessage};
use atelier_core::ids::SessionId;
use atelier_core::session::{ClarityCapsule, DesignIteration, FeedbackEntry, SessionStatus};
use atelier_store::DesignStore;

use crate::config::OrchestratorConfig;
use crate::context::{ConversationContext, handoff_items};
use crate::emitter::EventEmitter;
use crate::errors::OrchestratorError;
use crate::policy::{self, NextStep};
use crate::session_state::SessionState;
use crate::shell::SpeechSink;

/// Orchestrates one user's session across the three workflow agents.
pub struct SessionOrchestrator {
    state: SessionState,
    contexts: BTreeMap<AgentKind, ConversationContext>,
    prev_agent: Option<AgentKind>,
    emitter: Arc<EventEmitter>,
    speech: Arc<dyn SpeechSink>,
    config: OrchestratorConfig,
}

impl SessionOrchestrator {
    /// Create an orchestrator with no gateway attached.
    pub fn new(speech: Arc<dyn SpeechSink>) -> Self {
        let config = OrchestratorConfig::default();
        Self {
            state: SessionState::new(),
            contexts: AgentKind::ALL
                .into_iter()
                .map(|agent| (agent, ConversationContext::new()))
                .collect(),
            prev_agent: None,
            emitter: Arc::new(EventEmitter::with_capacity(config.channel_capacity)),
            speech,
            config,
        }
    }

    /// Attach a persistence gateway.
    #[must_use]
    pub fn with_store(mut self, store: Arc<DesignStore>) -> Self {
        self.state = SessionState::with_store(store);
        self
    }

    /// Override the default configuration.
    #[must_use]
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.emitter = Arc::new(EventEmitter::with_capacity(config.channel_capacity));
        self.config = config;
        self
    }

    /// The session state. Agents read it; mutation goes through the
    /// orchestrator's operations.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The currently active agent.
    pub fn current_agent(&self) -> AgentKind {
        self.state.current_agent
    }

    /// The previously active agent, if a transition has happened.
    pub fn prev_agent(&self) -> Option<AgentKind> {
        self.prev_agent
    }

    /// An agent's conversation context.
    pub fn agent_context(&self, agent: AgentKind) -> &ConversationContext {
        &self.contexts[&agent]
    }

    /// Subscribe to the session's event broadcast.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.emitter.subscribe()
    }

    /// The event emitter handle.
    pub fn emitter(&self) -> &Arc<EventEmitter> {
        &self.emitter
    }

    // ── Transcripts and speech ─────────────────────────────────────────

    fn agent_speaker(&self) -> Speaker {
        let agent = self.state.current_agent;
        Speaker {
            identity: agent.name().to_owned(),
            name: agent.display_name().to_owned(),
        }
    }

    fn user_speaker(&self) -> Speaker {
        Speaker {
            identity: "user".to_owned(),
            name: self
                .state
                .snapshot
                .first_name
                .clone()
                .unwrap_or_else(|| "User".to_owned()),
        }
    }

    /// Speak one utterance: record it in the active agent's context, publish
    /// a final transcript record, and hand the text to the speech sink.
    pub async fn speak(&mut self, text: &str) {
        let speaker = self.agent_speaker();
        if let Some(ctx) = self.contexts.get_mut(&self.state.current_agent) {
            ctx.push_assistant(text);
        }
        let _ = self.emitter.emit(SessionEvent::Transcript {
            message: TranscriptMessage::now(text, true, speaker),
        });
        self.speech.speak(text).await;
    }

    /// Speak a streamed utterance: publish one non-final transcript record
    /// per chunk, then a terminal final record, and hand the joined text to
    /// the speech sink.
    pub async fn speak_streaming<I>(&mut self, chunks: I)
    where
        I: IntoIterator<Item = String>,
    {
        let speaker = self.agent_speaker();
        let mut full = String::new();
        for chunk in chunks {
            let _ = self.emitter.emit(SessionEvent::Transcript {
                message: TranscriptMessage::now(chunk.clone(), false, speaker.clone()),
            });
            full.push_str(&chunk);
        }
        let _ = self.emitter.emit(SessionEvent::Transcript {
            message: TranscriptMessage::now("", true, speaker),
        });
        if let Some(ctx) = self.contexts.get_mut(&self.state.current_agent) {
            ctx.push_assistant(full.clone());
        }
        self.speech.speak(&full).await;
    }

    /// Record and publish a user utterance.
    pub fn record_user_utterance(&mut self, text: &str) {
        let speaker = self.user_speaker();
        if let Some(ctx) = self.contexts.get_mut(&self.state.current_agent) {
            ctx.push_user(text);
        }
        let _ = self.emitter.emit(SessionEvent::Transcript {
            message: TranscriptMessage::now(text, true, speaker),
        });
    }

    /// Record a structured action round-trip in the active agent's context.
    pub fn record_action_call(&mut self, call: &str, output: &str) {
        if let Some(ctx) = self.contexts.get_mut(&self.state.current_agent) {
            ctx.push(ContextItem::function_call(call));
            ctx.push(ContextItem::function_call_output(output));
        }
    }

    fn emit_agent_state(&self) {
        let loop_counts = self
            .state
            .loop_counts
            .iter()
            .map(|(agent, count)| (agent.name().to_owned(), *count))
            .collect();
        let _ = self.emitter.emit(SessionEvent::AgentState {
            current_agent_name: self.state.current_agent.name().to_owned(),
            agent_sequence: self
                .state
                .agent_sequence
                .iter()
                .map(|agent| agent.name().to_owned())
                .collect(),
            loop_reason: self.state.loop_reason.clone(),
            loop_counts,
        });
    }

    // ── Transitions ────────────────────────────────────────────────────

    /// Switch the active agent, carrying over conversation context.
    ///
    /// Records the previous agent, copies the recent non-system tail of the
    /// outgoing agent's history into the incoming agent's context (duplicate
    /// ids filtered, leading function-call entries stripped), injects the
    /// system-level context message if provided, appends to the agent
    /// sequence, and emits a state snapshot.
    #[instrument(skip(self, context_message), fields(to = %target))]
    pub fn transition_to_agent(
        &mut self,
        target: AgentKind,
        context_message: Option<String>,
    ) -> AgentKind {
        let outgoing = self.state.current_agent;
        self.prev_agent = Some(outgoing);

        let carried = self
            .contexts
            .get(&outgoing)
            .map(|ctx| handoff_items(ctx.items(), self.config.keep_last_messages))
            .unwrap_or_default();

        if let Some(ctx) = self.contexts.get_mut(&target) {
            ctx.absorb(carried);
            if let Some(message) = context_message {
                ctx.push_system(message);
            }
        }

        self.state.current_agent = target;
        self.state.agent_sequence.push(target);
        self.emit_agent_state();
        debug!(from = %outgoing, to = %target, "agent transition");
        target
    }

    /// Resolve a wire name and transition, or fail with a typed error.
    pub fn transition_to_named(
        &mut self,
        name: &str,
        context_message: Option<String>,
    ) -> Result<AgentKind, OrchestratorError> {
        let target = AgentKind::from_name(name)
            .ok_or_else(|| OrchestratorError::UnknownAgent(name.to_owned()))?;
        Ok(self.transition_to_agent(target, context_message))
    }

    /// Advance the workflow one step, if the state allows it.
    ///
    /// A terminal or incomplete state surfaces the explanatory message
    /// without mutating the agent sequence, which makes repeated calls from
    /// the Evaluator idempotent.
    pub async fn handle_agent_transition(&mut self) -> AgentKind {
        match policy::next(self.state.current_agent, &self.state.snapshot) {
            NextStep::Stay { message } => {
                self.speak(&message).await;
                self.state.current_agent
            }
            NextStep::Advance { target, context } => {
                self.transition_to_agent(target, Some(context))
            }
        }
    }

    /// Loop back to an earlier agent, with bookkeeping applied first.
    ///
    /// Increments the target's loop count, records the reason, and
    /// transitions regardless of data completeness. An unknown target name
    /// degrades to a spoken fallback with the current agent left active.
    pub async fn handle_loop_back(&mut self, target_name: &str, reason: &str) -> AgentKind {
        let Some(target) = AgentKind::from_name(target_name) else {
            warn!(target_name, "loop-back to unknown agent");
            self.speak(&format!(
                "Sorry, I could not find the {target_name} agent."
            ))
            .await;
            return self.state.current_agent;
        };

        self.state.loop_reason = Some(reason.to_owned());
        *self.state.loop_counts.entry(target).or_insert(0) += 1;

        self.transition_to_agent(target, Some(policy::loop_back_context(reason)))
    }

    // ── Milestone persistence ──────────────────────────────────────────

    /// Save the session if a gateway is attached.
    ///
    /// Returns an apology fragment on failure; the conversation continues on
    /// in-memory state with no automatic retry.
    fn persist_milestone(&mut self) -> Option<String> {
        if self.state.store().is_none() {
            debug!("no gateway attached; keeping state in memory");
            return None;
        }
        match self.state.save() {
            Ok(session_id) => {
                debug!(session_id = %session_id, "milestone saved");
                None
            }
            Err(err) => {
                warn!(error = %err, category = err.category(), "milestone save failed");
                Some(
                    "I couldn't save your progress just now, so we'll continue from memory. \
                     You can try that again in a moment."
                        .to_owned(),
                )
            }
        }
    }

    fn with_apology(reply: &str, apology: Option<String>) -> String {
        match apology {
            Some(extra) => format!("{reply} {extra}"),
            None => reply.to_owned(),
        }
    }

    // ── Agent action surface ───────────────────────────────────────────

    /// Identify the user by name; assigns an id and branches the greeting on
    /// new-vs-returning when a gateway is attached.
    #[instrument(skip(self))]
    pub async fn identify_user(&mut self, first_name: &str, last_name: &str) -> String {
        self.state.snapshot.first_name = Some(first_name.to_owned());
        self.state.snapshot.last_name = Some(last_name.to_owned());

        let reply = match self.state.store().cloned() {
            Some(store) => match store.get_or_create_user(first_name, last_name) {
                Ok((user_id, was_created)) => {
                    self.state.snapshot.user_id = Some(user_id.clone());
                    let past_sessions = if was_created {
                        Vec::new()
                    } else {
                        store.list_user_sessions(&user_id).unwrap_or_default()
                    };
                    if past_sessions.is_empty() {
                        format!(
                            "Thank you, {first_name}. I've created a new profile for you. \
                             To get started, please describe your design challenge."
                        )
                    } else {
                        let listing = past_sessions
                            .iter()
                            .map(|session| {
                                format!(
                                    "- Session ID: {}, Created: {}",
                                    session.id, session.created_at
                                )
                            })
                            .collect::<Vec<_>>()
                            .join("\n");
                        format!(
                            "Welcome back, {first_name}. I found these past sessions:\n\
                             {listing}\n\
                             Would you like to load one of these sessions, or start a new one?"
                        )
                    }
                }
                Err(err) => {
                    warn!(error = %err, "user lookup failed");
                    format!(
                        "I'm sorry, {first_name}. I ran into a problem reaching the session \
                         store. Let's proceed for now. Please describe your design challenge."
                    )
                }
            },
            None => format!("Thank you, {first_name}. Please describe your design challenge."),
        };

        self.speak(&reply).await;
        reply
    }

    /// Record which past session the user wants to load.
    pub async fn select_session_to_load(&mut self, raw_session_id: &str) -> String {
        let reply = match SessionId::parse(raw_session_id) {
            Ok(session_id) => {
                self.state.pending_session_id = Some(session_id.clone());
                format!("Great. I will load session {session_id} for you now. One moment.")
            }
            Err(err) => {
                warn!(error = %err, "rejected malformed session id");
                "That doesn't look like a session I can load. Please pick an id from the list."
                    .to_owned()
            }
        };
        self.speak(&reply).await;
        reply
    }

    /// Load the previously selected session and route to the right agent.
    ///
    /// A missing session produces an apology and a [`SessionState::reset`] so
    /// the user is not left holding a dangling reference.
    pub async fn load_selected_session(&mut self) -> AgentKind {
        let Some(session_id) = self.state.pending_session_id.clone() else {
            self.speak("I'm sorry, I don't have a session ID to load. Please select one first.")
                .await;
            return self.state.current_agent;
        };

        match self.state.load(&session_id) {
            Ok(()) => {
                let first_name = self
                    .state
                    .snapshot
                    .first_name
                    .clone()
                    .unwrap_or_else(|| "there".to_owned());
                self.speak(&format!(
                    "Welcome back, {first_name}. I've loaded your session. Here's a quick summary:"
                ))
                .await;
                let summary = self.state.summarize();
                self.speak(&summary).await;

                if self.state.snapshot.status == SessionStatus::ReadyForEvaluation {
                    self.speak(
                        "It looks like we were ready for feedback. I'll bring in the Design Evaluator.",
                    )
                    .await;
                    let context = self.state.snapshot.proposed_solution.as_ref().map(|solution| {
                        format!(
                            "The user has proposed the following solution: {solution}. \
                             Your task is to evaluate it."
                        )
                    });
                    self.transition_to_agent(AgentKind::Evaluator, context)
                } else {
                    self.speak(
                        "Let's continue refining your solution. I'll bring in the Design Strategist.",
                    )
                    .await;
                    let context =
                        format!("The user has resumed a previous session.\n{summary}");
                    self.transition_to_agent(AgentKind::Strategist, Some(context))
                }
            }
            Err(OrchestratorError::NotFound(_)) => {
                self.speak("I'm sorry, I couldn't find that session. Let's start fresh.")
                    .await;
                self.state.reset();
                self.state.current_agent
            }
            Err(err) => {
                warn!(error = %err, category = err.category(), "session load failed");
                self.speak("I ran into a problem loading your session. Please try again in a moment.")
                    .await;
                self.state.current_agent
            }
        }
    }

    /// Capture the design challenge, target users, and emotional goals.
    #[instrument(skip_all)]
    pub async fn capture_design_challenge(
        &mut self,
        design_challenge: &str,
        target_users: Vec<String>,
        emotional_goals: Vec<String>,
    ) -> String {
        if !self.state.is_identified() {
            let reply = "Please tell me your first and last name before we capture the challenge."
                .to_owned();
            self.speak(&reply).await;
            return reply;
        }

        self.state.snapshot.design_challenge = Some(design_challenge.to_owned());
        self.state.snapshot.target_users = target_users;
        self.state.snapshot.emotional_goals = emotional_goals;
        self.state.snapshot.status = SessionStatus::AwaitingProblemDefinition;

        let apology = self.persist_milestone();
        let reply = Self::with_apology(
            "I've captured the details of your design challenge. Let me know when you're \
             ready for the next step, or if there's anything you'd like to add or modify.",
            apology,
        );
        self.speak(&reply).await;
        reply
    }

    /// Refine the problem statement; rejected statements mutate nothing.
    #[instrument(skip_all)]
    pub async fn refine_problem_statement(&mut self, problem_statement: &str) -> String {
        if !self.state.is_identified() {
            let reply = "Please tell me your first and last name first.".to_owned();
            self.speak(&reply).await;
            return reply;
        }
        if self.state.snapshot.design_challenge.is_none() {
            let reply =
                "Please describe your design challenge first; the Design Coach can capture it."
                    .to_owned();
            self.speak(&reply).await;
            return reply;
        }
        if let Err(err) = policy::validate_problem_statement(problem_statement) {
            let reply = match err {
                OrchestratorError::Validation(message) => message,
                other => other.to_string(),
            };
            self.speak(&reply).await;
            return reply;
        }

        self.state.snapshot.problem_statement = Some(problem_statement.to_owned());

        let apology = self.persist_milestone();
        let reply = Self::with_apology(
            "I've refined your problem statement. Let's work on proposing solutions.",
            apology,
        );
        self.speak(&reply).await;
        reply
    }

    /// Record a proposed solution, log the iteration, and advance to the
    /// Evaluator.
    #[instrument(skip_all)]
    pub async fn propose_solution(
        &mut self,
        solution_description: &str,
        key_features: Vec<String>,
    ) -> AgentKind {
        if !self.state.is_identified() {
            self.speak("Please tell me your first and last name first.").await;
            return self.state.current_agent;
        }
        let Some(problem_statement) = self.state.snapshot.problem_statement.clone() else {
            self.speak(
                "We need a 'How might we' problem statement before proposing a solution.",
            )
            .await;
            return self.state.current_agent;
        };

        self.state.snapshot.proposed_solution = Some(solution_description.to_owned());
        self.state.snapshot.status = SessionStatus::ReadyForEvaluation;
        let iteration = DesignIteration {
            problem_statement,
            solution: solution_description.to_owned(),
            features: key_features,
        };
        if !self.state.snapshot.iterations.contains(&iteration) {
            self.state.snapshot.iterations.push(iteration);
        }

        let apology = self.persist_milestone();
        let reply =
            Self::with_apology("That's a great starting point. I've noted that down.", apology);
        self.speak(&reply).await;

        self.handle_agent_transition().await
    }

    /// Append a feedback entry (deduplicated on exact content).
    #[instrument(skip_all)]
    pub async fn provide_feedback(&mut self, feedback: &str) -> String {
        let entry = FeedbackEntry::from_text(feedback);
        if !self.state.snapshot.feedback.contains(&entry) {
            self.state.snapshot.feedback.push(entry);
        }

        let apology = self.persist_milestone();
        let reply = Self::with_apology(
            "OK. I've noted that feedback. Let me know when you're ready to wrap up, and \
             I'll put together your clarity capsule.",
            apology,
        );
        self.speak(&reply).await;
        reply
    }

    /// Generate the terminal clarity capsule — exactly once per session.
    #[instrument(skip_all)]
    pub async fn generate_clarity_capsule(
        &mut self,
        strengths: Vec<String>,
        blind_spots: Vec<String>,
        next_steps: Vec<String>,
    ) -> String {
        if self.state.snapshot.clarity_capsule.is_some() {
            let reply = "A clarity capsule has already been created for this session; it stays \
                         as generated."
                .to_owned();
            self.speak(&reply).await;
            return reply;
        }
        let (Some(problem_statement), Some(solution_concept)) = (
            self.state.snapshot.problem_statement.clone(),
            self.state.snapshot.proposed_solution.clone(),
        ) else {
            let reply = "We need both a problem statement and a proposed solution before I \
                         can build your clarity capsule."
                .to_owned();
            self.speak(&reply).await;
            return reply;
        };

        let capsule = ClarityCapsule {
            problem_statement,
            solution_concept,
            strengths,
            blind_spots,
            next_steps,
        };
        self.state.snapshot.clarity_capsule = Some(capsule.clone());
        self.state.snapshot.status = SessionStatus::EvaluationComplete;

        let apology = self.persist_milestone();
        let _ = self.emitter.emit(SessionEvent::ClarityCapsule {
            problem_statement: capsule.problem_statement,
            solution_concept: capsule.solution_concept,
            strengths: capsule.strengths,
            blind_spots: capsule.blind_spots,
            next_steps: capsule.next_steps,
        });

        let reply = Self::with_apology(
            "I've finished generating your clarity capsule. You should see it on your \
             screen now. Thank you for using the Design Assistant!",
            apology,
        );
        self.speak(&reply).await;
        reply
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
