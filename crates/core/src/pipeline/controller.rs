//! # Pipeline Controller
//!
//! Drives rounds through `draft -> editors -> review -> revision -> buyers -> synthesis`.
//!
//! The controller owns the round store. Every mutation builds a new
//! [`PipelineState`] and publishes it on a `watch` channel, so observers only
//! ever see whole snapshots. Transitions take `&mut self`; two of them can
//! never overlap on one controller.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};

use crate::error::PipelineError;
use crate::gateway::AgentGateway;
use crate::skills::{
    AgentError, BuyerPersona, BuyerSkill, EditorPersona, EditorSkill, RevisionSkill, VoiceSkill,
};
use crate::state::{
    BuyerReaction, FeedbackDecision, FeedbackItem, PipelineState, RoundRecord, RoundStore,
};
use crate::synthesis::Synthesis;

use super::events::{PipelineEvent, PipelineEventKind};
use super::stage::PipelineStage;

/// The pipeline controller
pub struct PipelineController {
    gateway: Arc<dyn AgentGateway>,
    state_tx: watch::Sender<Arc<PipelineState>>,
    event_tx: Option<mpsc::Sender<PipelineEvent>>,
    seq: u64,
}

impl PipelineController {
    pub fn new(gateway: Arc<dyn AgentGateway>) -> Self {
        let (state_tx, _) = watch::channel(Arc::new(PipelineState::default()));
        Self {
            gateway,
            state_tx,
            event_tx: None,
            seq: 0,
        }
    }

    /// Set event channel for streaming events
    pub fn with_event_channel(mut self, tx: mpsc::Sender<PipelineEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Current snapshot
    pub fn state(&self) -> Arc<PipelineState> {
        self.state_tx.borrow().clone()
    }

    /// Receiver that sees every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<Arc<PipelineState>> {
        self.state_tx.subscribe()
    }

    /// The round the pointer is on
    pub fn current_round(&self) -> Option<Arc<RoundRecord>> {
        self.state().active_round().cloned()
    }

    /// Diff summary of the active round, once its revision has landed
    pub fn synthesis(&self) -> Option<Synthesis> {
        self.current_round()
            .and_then(|round| Synthesis::from_round(&round))
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Discard every round and load `document` as round 1.
    #[tracing::instrument(skip(self, document), fields(chars = document.len()))]
    pub async fn start_pipeline(
        &mut self,
        document: &str,
        goal: Option<&str>,
    ) -> Result<(), PipelineError> {
        if document.trim().is_empty() {
            return Err(self.fail(PipelineError::EmptyDocument).await);
        }

        let mut rounds = RoundStore::default();
        let number = rounds.open_round(document);
        self.state_tx.send_replace(Arc::new(PipelineState {
            current_round: number,
            document_goal: goal
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string),
            rounds,
            ..PipelineState::default()
        }));

        tracing::info!("Pipeline started");
        let event = self.event(PipelineEventKind::PipelineStarted).with_round(1);
        self.emit(event);
        Ok(())
    }

    /// Run the three editors over the active round's input.
    #[tracing::instrument(skip(self))]
    pub async fn run_editors(&mut self) -> Result<(), PipelineError> {
        let result = self.editors_step().await;
        self.settle(result).await
    }

    /// Replace the active round's feedback list wholesale.
    pub async fn update_feedback(&mut self, items: Vec<FeedbackItem>) -> Result<(), PipelineError> {
        let result = match self.guard("update feedback", PipelineStage::Review) {
            Ok(round) => {
                self.land_feedback(round.with_feedback_replaced(items)).await;
                Ok(())
            }
            Err(err) => Err(err),
        };
        self.settle(result).await
    }

    /// Apply one triage decision to a pending item.
    pub async fn triage_feedback(
        &mut self,
        id: &str,
        decision: FeedbackDecision,
    ) -> Result<(), PipelineError> {
        let result = self.triage_step(id, decision).await;
        self.settle(result).await
    }

    /// Promote every pending item to accepted.
    pub async fn accept_all_feedback(&mut self) -> Result<(), PipelineError> {
        let result = self.accept_all_step().await;
        self.settle(result).await
    }

    /// Revise, voice-pass and then collect buyer reactions.
    ///
    /// If the buyers fail after the revision has landed, the round rests in
    /// `buyers` and [`Self::run_buyers_step`] retries only the buyers.
    #[tracing::instrument(skip(self))]
    pub async fn run_revision_step(&mut self) -> Result<(), PipelineError> {
        let result = self.revision_chain().await;
        self.settle(result).await
    }

    /// Run the four buyers over the active round's latest document.
    #[tracing::instrument(skip(self))]
    pub async fn run_buyers_step(&mut self) -> Result<(), PipelineError> {
        let result = self.buyers_step().await;
        self.settle(result).await
    }

    /// Append a round seeded with the active round's latest document.
    #[tracing::instrument(skip(self))]
    pub async fn start_new_round(&mut self) -> Result<(), PipelineError> {
        let result = self.new_round_step().await;
        self.settle(result).await
    }

    /// Move the round pointer. Round data is never touched.
    pub async fn view_round(&mut self, round_number: usize) -> Result<(), PipelineError> {
        let state = self.state();
        let Some(round) = state.rounds.get(round_number) else {
            let err = PipelineError::RoundOutOfRange {
                requested: round_number,
                available: state.rounds.len(),
            };
            return Err(self.fail(err).await);
        };

        if state.current_round == round_number && state.current_stage == round.stage {
            return Ok(());
        }

        let stage = round.stage;
        self.update(|s| {
            s.current_round = round_number;
            s.current_stage = stage;
        });
        let event = self
            .event(PipelineEventKind::RoundViewed)
            .with_round(round_number as u32);
        self.emit(event);
        Ok(())
    }

    /// Drive `rounds` complete rounds without human triage.
    ///
    /// Every pending item is auto-accepted. A round already in synthesis
    /// gets a successor first; no round is opened after the last one.
    #[tracing::instrument(skip(self))]
    pub async fn let_it_cook(&mut self, rounds: u32) -> Result<(), PipelineError> {
        if rounds == 0 {
            return Ok(());
        }
        if !self.state().has_started() {
            return Err(self.fail(PipelineError::NotStarted).await);
        }

        self.update(|s| {
            s.let_it_cook_mode = true;
            s.let_it_cook_rounds = Some(rounds);
        });
        let event = self
            .event(PipelineEventKind::CookStarted)
            .with_data(json!({ "rounds": rounds }));
        self.emit(event);

        let result = self.cook(rounds).await;

        self.update(|s| {
            s.let_it_cook_mode = false;
            s.let_it_cook_rounds = None;
        });
        let event = self
            .event(PipelineEventKind::CookFinished)
            .with_data(json!({ "ok": result.is_ok() }));
        self.emit(event);

        self.settle(result).await
    }

    /// Back to the initial empty state.
    pub async fn reset(&mut self) {
        self.state_tx
            .send_replace(Arc::new(PipelineState::default()));
        tracing::info!("Pipeline reset");
        let event = self.event(PipelineEventKind::PipelineReset);
        self.emit(event);
    }

    // =========================================================================
    // Steps (no error bookkeeping; see `settle`)
    // =========================================================================

    async fn editors_step(&mut self) -> Result<(), PipelineError> {
        let round = self.guard("run editors", PipelineStage::Draft)?;
        self.begin(PipelineStage::Editors, &round).await;

        let state = self.state();
        let goal = state.document_goal.as_deref();
        let document = round.input_document.as_str();
        let gateway = Arc::clone(&self.gateway);
        let gateway = gateway.as_ref();

        let (skeptic, besci, clarity) = tokio::join!(
            EditorSkill::run(gateway, EditorPersona::Skeptic, document, goal),
            EditorSkill::run(gateway, EditorPersona::Besci, document, goal),
            EditorSkill::run(gateway, EditorPersona::Clarity, document, goal),
        );
        let outputs = join_group(PipelineStage::Editors, vec![skeptic, besci, clarity])?;

        let feedback: Vec<FeedbackItem> = EditorPersona::ALL
            .iter()
            .zip(outputs)
            .flat_map(|(&persona, output)| {
                output
                    .feedback
                    .into_iter()
                    .enumerate()
                    .map(move |(index, finding)| {
                        FeedbackItem::from_finding(persona, index, finding)
                    })
            })
            .collect();

        tracing::info!(items = feedback.len(), "Editor feedback merged");
        self.land(round.with_editor_feedback(feedback)).await;
        Ok(())
    }

    async fn triage_step(
        &mut self,
        id: &str,
        decision: FeedbackDecision,
    ) -> Result<(), PipelineError> {
        let round = self.guard("triage feedback", PipelineStage::Review)?;
        let item = round
            .find_feedback(id)
            .ok_or_else(|| PipelineError::FeedbackNotFound(id.to_string()))?;
        let updated = item.apply(decision)?;
        self.land_feedback(round.with_feedback_item(updated)).await;
        Ok(())
    }

    async fn accept_all_step(&mut self) -> Result<(), PipelineError> {
        let round = self.guard("accept feedback", PipelineStage::Review)?;
        self.land_feedback(round.with_all_pending_accepted()).await;
        Ok(())
    }

    async fn revision_chain(&mut self) -> Result<(), PipelineError> {
        let revised = self.revise_round().await?;
        self.begin(PipelineStage::Buyers, &revised).await;
        self.react_round(revised).await
    }

    /// Revision then voice; both outputs land together in `buyers`.
    async fn revise_round(&mut self) -> Result<Arc<RoundRecord>, PipelineError> {
        let round = self.guard("run revision", PipelineStage::Review)?;
        self.begin(PipelineStage::Revision, &round).await;

        let accepted = round.actionable_feedback();
        let state = self.state();
        let goal = state.document_goal.as_deref();
        let gateway = Arc::clone(&self.gateway);

        let revision =
            RevisionSkill::run(gateway.as_ref(), &round.input_document, &accepted, goal).await?;
        let voice = VoiceSkill::run(gateway.as_ref(), &revision.revised_document).await?;

        tracing::info!(
            accepted = accepted.len(),
            changes = revision.changes_summary.len(),
            "Revision landed"
        );
        let revised = Arc::new(round.with_revision(accepted, revision, voice));
        self.update(|s| {
            s.rounds.replace(RoundRecord::clone(&revised));
        });
        Ok(revised)
    }

    async fn buyers_step(&mut self) -> Result<(), PipelineError> {
        let round = self.guard("run buyers", PipelineStage::Buyers)?;
        self.begin(PipelineStage::Buyers, &round).await;
        self.react_round(round).await
    }

    /// Buyer fan-out over the round's latest document.
    async fn react_round(&mut self, round: Arc<RoundRecord>) -> Result<(), PipelineError> {
        let document = round.latest_document();
        let gateway = Arc::clone(&self.gateway);
        let gateway = gateway.as_ref();

        let (ceo, cpo, cro, head_cx) = tokio::join!(
            BuyerSkill::run(gateway, BuyerPersona::Ceo, document),
            BuyerSkill::run(gateway, BuyerPersona::Cpo, document),
            BuyerSkill::run(gateway, BuyerPersona::Cro, document),
            BuyerSkill::run(gateway, BuyerPersona::HeadCx, document),
        );
        let outputs = join_group(PipelineStage::Buyers, vec![ceo, cpo, cro, head_cx])?;

        let reactions: Vec<BuyerReaction> = BuyerPersona::ALL
            .iter()
            .zip(outputs)
            .map(|(&buyer, output)| BuyerReaction::from_output(buyer, output))
            .collect();

        self.land(round.with_buyer_reactions(reactions)).await;
        Ok(())
    }

    async fn new_round_step(&mut self) -> Result<(), PipelineError> {
        let round = self.guard("start new round", PipelineStage::Synthesis)?;
        let mut state = PipelineState::clone(&self.state());
        let number = state
            .rounds
            .open_round_from(round.round_number as usize)
            .ok_or(PipelineError::NotStarted)?;
        state.current_round = number;
        state.current_stage = PipelineStage::Draft;
        state.error = None;
        self.state_tx.send_replace(Arc::new(state));

        tracing::info!(round = number, "Round opened");
        let event = self
            .event(PipelineEventKind::RoundOpened)
            .with_round(number as u32);
        self.emit(event);
        Ok(())
    }

    async fn cook(&mut self, rounds: u32) -> Result<(), PipelineError> {
        for cooked in 0..rounds {
            if self.active_round()?.stage.is_complete() {
                self.new_round_step().await?;
            }
            self.drive_to_synthesis().await?;
            tracing::info!(cooked = cooked + 1, of = rounds, "Round cooked");
        }
        Ok(())
    }

    /// Resume the active round wherever it rests and finish it.
    async fn drive_to_synthesis(&mut self) -> Result<(), PipelineError> {
        loop {
            match self.active_round()?.stage {
                PipelineStage::Draft => self.editors_step().await?,
                PipelineStage::Review => {
                    self.accept_all_step().await?;
                    self.revision_chain().await?;
                }
                PipelineStage::Buyers => self.buyers_step().await?,
                PipelineStage::Synthesis => return Ok(()),
                transient => {
                    return Err(PipelineError::InvalidStage {
                        operation: "let it cook",
                        expected: PipelineStage::Draft,
                        actual: transient,
                    })
                }
            }
        }
    }

    // =========================================================================
    // State plumbing
    // =========================================================================

    fn active_round(&self) -> Result<Arc<RoundRecord>, PipelineError> {
        self.current_round().ok_or(PipelineError::NotStarted)
    }

    fn guard(
        &self,
        operation: &'static str,
        expected: PipelineStage,
    ) -> Result<Arc<RoundRecord>, PipelineError> {
        let round = self.active_round()?;
        if round.stage != expected {
            return Err(PipelineError::InvalidStage {
                operation,
                expected,
                actual: round.stage,
            });
        }
        Ok(round)
    }

    /// Clone the current snapshot, mutate it and publish the result
    fn update(&self, f: impl FnOnce(&mut PipelineState)) {
        let mut next = PipelineState::clone(&self.state());
        f(&mut next);
        self.state_tx.send_replace(Arc::new(next));
    }

    async fn begin(&mut self, stage: PipelineStage, round: &RoundRecord) {
        tracing::info!(round = round.round_number, stage = %stage, "Stage started");
        self.update(|s| {
            s.current_stage = stage;
            s.is_processing = true;
            s.error = None;
        });
        let event = self
            .event(PipelineEventKind::StageStarted)
            .with_round(round.round_number)
            .with_data(json!({ "stage": stage }));
        self.emit(event);
    }

    /// Store a finished step; the pipeline mirrors the round's new stage
    async fn land(&mut self, record: RoundRecord) {
        let number = record.round_number;
        let stage = record.stage;
        self.update(|s| {
            s.rounds.replace(record);
            s.current_stage = stage;
            s.is_processing = false;
            s.error = None;
        });
        tracing::info!(round = number, stage = %stage, "Stage completed");
        let event = self
            .event(PipelineEventKind::StageCompleted)
            .with_round(number)
            .with_data(json!({ "stage": stage }));
        self.emit(event);
    }

    async fn land_feedback(&mut self, record: RoundRecord) {
        let number = record.round_number;
        let pending = record.pending_count();
        self.update(|s| {
            s.rounds.replace(record);
            s.error = None;
        });
        let event = self
            .event(PipelineEventKind::FeedbackUpdated)
            .with_round(number)
            .with_data(json!({ "pending": pending }));
        self.emit(event);
    }

    async fn settle(&mut self, result: Result<(), PipelineError>) -> Result<(), PipelineError> {
        match result {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err).await),
        }
    }

    /// Surface `err` on the state and put the pipeline back at rest
    async fn fail(&mut self, err: PipelineError) -> PipelineError {
        let message = err.to_string();
        tracing::warn!(error = %message, "Pipeline transition failed");

        self.update(|s| {
            s.error = Some(message.clone());
            s.is_processing = false;
            s.current_stage = s.active_round().map(|r| r.stage).unwrap_or_default();
        });

        let round = self.current_round().map(|r| r.round_number);
        for agent in err.failed_agents() {
            let mut event = self.event(PipelineEventKind::AgentFailed).with_agent(agent);
            event.round = round;
            self.emit(event);
        }
        let mut event = self
            .event(PipelineEventKind::TransitionFailed)
            .with_data(json!({ "error": message }));
        event.round = round;
        self.emit(event);

        err
    }

    fn event(&mut self, kind: PipelineEventKind) -> PipelineEvent {
        self.seq += 1;
        PipelineEvent::new(self.seq, kind)
    }

    /// Never waits on the observer; a full or closed channel drops the event
    fn emit(&self, event: PipelineEvent) {
        let Some(tx) = &self.event_tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::warn!(seq = event.seq, kind = ?event.kind, "Event channel full, dropping event");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!("Event receiver dropped");
            }
        }
    }
}

/// Wait-for-all merge: every result is inspected, any failure fails the group
fn join_group<T>(
    stage: PipelineStage,
    results: Vec<Result<T, AgentError>>,
) -> Result<Vec<T>, PipelineError> {
    let mut outputs = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(output) => outputs.push(output),
            Err(err) => failures.push(err),
        }
    }

    if failures.is_empty() {
        Ok(outputs)
    } else {
        Err(PipelineError::FanOut { stage, failures })
    }
}
