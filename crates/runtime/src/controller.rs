//! Session controller: the public face of the runtime.
//!
//! The controller owns the only copy of the current [`Session`] and replaces it
//! wholesale on every committed step. All writes go through an epoch check:
//! starting, resetting or switching mode advances the epoch, and any result
//! issued under an older epoch is dropped instead of applied.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use game_core::{Outcome, StateSnapshot};

use crate::api::{
    AutoPlayState, BotId, Failure, GameService, Lifecycle, PlayMode, Result, ServiceError,
    SessionError, SessionId, SessionView, StopReason, ValidationError,
};
use crate::events::{EventBus, SessionEvent, Topic};
use crate::workers::{AutoPlayLoop, StepExecutor};

/// Upper bound for the pause between autonomous steps.
pub const MAX_AUTOPLAY_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub initial_mode: PlayMode,
    /// Pause between autonomous steps, clamped to [`MAX_AUTOPLAY_DELAY`].
    pub autoplay_delay: Duration,
    /// Stop the autoplay loop after this many steps of one run.
    pub max_steps: Option<u64>,
    pub event_buffer: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            initial_mode: PlayMode::Manual,
            autoplay_delay: Duration::from_millis(200),
            max_steps: None,
            event_buffer: 64,
        }
    }
}

/// One game as last committed.
///
/// Never mutated after construction: a step produces a new `Session`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub participants: Arc<[BotId]>,
    /// Names as reported by the service, one per seat.
    pub display_names: Arc<[String]>,
    pub snapshot: Arc<StateSnapshot>,
    pub lifecycle: Lifecycle,
    /// Number of steps committed since the session was created.
    pub step: u64,
    pub(crate) executor: Arc<StepExecutor>,
}

impl Session {
    fn created(view: SessionView, participants: Arc<[BotId]>, executor: Arc<StepExecutor>) -> Self {
        let display_names: Arc<[String]> = if view.display_names.len() == participants.len() {
            view.display_names.into()
        } else {
            participants.iter().map(ToString::to_string).collect()
        };

        Self {
            id: view.id,
            participants,
            display_names,
            lifecycle: lifecycle_of(&view.snapshot),
            snapshot: Arc::new(view.snapshot),
            step: 0,
            executor,
        }
    }

    fn with_snapshot(&self, snapshot: StateSnapshot, step: u64) -> Self {
        Self {
            lifecycle: lifecycle_of(&snapshot),
            snapshot: Arc::new(snapshot),
            step,
            ..self.clone()
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.snapshot.outcome()
    }

    pub fn display_name(&self, seat: usize) -> &str {
        self.display_names
            .get(seat)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

fn lifecycle_of(snapshot: &StateSnapshot) -> Lifecycle {
    if snapshot.outcome().is_terminal() {
        Lifecycle::Terminal
    } else {
        Lifecycle::Active
    }
}

/// Everything the presentation layer observes, published as one value.
#[derive(Debug, Clone)]
pub struct ControllerState {
    /// Advances on every start, reset and mode switch.
    pub epoch: u64,
    pub mode: PlayMode,
    pub session: Option<Arc<Session>>,
    pub autoplay: AutoPlayState,
    /// Most recent surfaced failure; cleared by the next commit or start.
    pub failure: Option<Failure>,
    pub autoplay_delay: Duration,
}

impl ControllerState {
    pub fn lifecycle(&self) -> Lifecycle {
        self.session
            .as_ref()
            .map_or(Lifecycle::NotStarted, |session| session.lifecycle)
    }
}

/// Result of [`SessionController::start`].
#[derive(Debug, Clone)]
pub enum StartOutcome {
    Started(Arc<Session>),
    /// Another start or a reset happened while the session was being created.
    Discarded,
}

/// Result of [`SessionController::request_step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Committed { terminal: bool },
    /// The step resolved after a mode switch, restart or reset and was dropped.
    Discarded,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoSession,
    Terminal,
    /// Steps are driven by the autoplay loop.
    Autonomous,
    InFlight,
}

pub(crate) enum Commit {
    Applied { terminal: bool },
    Stale,
}

pub(crate) struct Shared {
    service: Arc<dyn GameService>,
    state: watch::Sender<ControllerState>,
    events: EventBus,
    pub(crate) max_steps: Option<u64>,
}

impl Shared {
    pub(crate) fn epoch(&self) -> u64 {
        self.state.borrow().epoch
    }

    pub(crate) fn autoplay_delay(&self) -> Duration {
        self.state.borrow().autoplay_delay
    }

    pub(crate) fn watch(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    pub(crate) fn publish(&self, event: SessionEvent) {
        self.events.publish(event);
    }

    /// Advance the epoch, apply `update`, and stop any running loop.
    ///
    /// Returns the new epoch.
    fn bump(&self, update: impl FnOnce(&mut ControllerState)) -> u64 {
        let mut epoch = 0;
        let mut cancelled = false;
        self.state.send_modify(|state| {
            state.epoch += 1;
            if state.autoplay.is_running() {
                state.autoplay = AutoPlayState::Stopped(StopReason::Cancelled);
                cancelled = true;
            }
            update(state);
            epoch = state.epoch;
        });

        if cancelled {
            debug!("Autoplay loop superseded at epoch {}", epoch);
            self.publish(SessionEvent::AutoPlayStopped {
                reason: StopReason::Cancelled,
            });
        }
        epoch
    }

    /// Replace the session with the next stepped snapshot if `epoch` is current.
    pub(crate) fn commit(&self, epoch: u64, view: SessionView) -> Commit {
        let id = view.id.clone();
        let mut applied = None;
        self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            let Some(current) = &state.session else {
                return false;
            };
            if current.id != view.id || current.lifecycle != Lifecycle::Active {
                return false;
            }

            let next = current.with_snapshot(view.snapshot, current.step + 1);
            applied = Some((next.step, next.lifecycle == Lifecycle::Terminal));
            state.session = Some(Arc::new(next));
            state.failure = None;
            true
        });

        match applied {
            Some((step, terminal)) => {
                debug!("Committed step {} of session {}", step, id);
                if terminal {
                    info!("Session {} reached a terminal state after {} steps", id, step);
                }
                self.publish(SessionEvent::StepCommitted {
                    session: id,
                    step,
                    terminal,
                });
                Commit::Applied { terminal }
            }
            None => {
                debug!("Discarded stale step result for session {} (epoch {})", id, epoch);
                self.publish(SessionEvent::StepDiscarded { session: id, epoch });
                Commit::Stale
            }
        }
    }

    /// Record a failure if `epoch` is current. Stale failures are dropped.
    pub(crate) fn record_failure(&self, epoch: u64, err: &ServiceError) -> bool {
        let failure = Failure::from_service(err);
        let recorded = self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            state.failure = Some(failure.clone());
            true
        });

        if recorded {
            warn!("Game service call failed: {}", failure);
            self.publish(SessionEvent::Failed(failure));
        } else {
            debug!("Dropped failure from superseded epoch {}: {}", epoch, failure);
        }
        recorded
    }

    pub(crate) fn set_autoplay(&self, epoch: u64, autoplay: AutoPlayState) -> bool {
        self.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            state.autoplay = autoplay;
            true
        })
    }
}

/// Drives one game session against a [`GameService`].
///
/// Cheap to clone; clones share the same session. Must be used from within a
/// Tokio runtime, since autonomous play runs as a spawned task.
#[derive(Clone)]
pub struct SessionController {
    shared: Arc<Shared>,
}

impl SessionController {
    pub fn new(service: Arc<dyn GameService>, config: ControllerConfig) -> Self {
        let initial = ControllerState {
            epoch: 0,
            mode: config.initial_mode,
            session: None,
            autoplay: AutoPlayState::Idle,
            failure: None,
            autoplay_delay: config.autoplay_delay.min(MAX_AUTOPLAY_DELAY),
        };
        let (state, _) = watch::channel(initial);

        Self {
            shared: Arc::new(Shared {
                service,
                state,
                events: EventBus::with_capacity(config.event_buffer),
                max_steps: config.max_steps,
            }),
        }
    }

    /// Create a new remote session seating `participants` in order.
    ///
    /// Any current session is dropped first. Validation happens before any
    /// network call. On failure the controller stays `NotStarted` and the
    /// failure is both returned and recorded.
    pub async fn start(&self, participants: Vec<BotId>) -> Result<StartOutcome> {
        validate_participants(&participants)?;

        let epoch = self.shared.bump(|state| {
            state.session = None;
            state.failure = None;
        });
        info!(
            "Starting session for [{}]",
            participants
                .iter()
                .map(BotId::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );

        let seats = participants.len();
        let created = match self.shared.service.create_session(&participants).await {
            Ok(view) => view.snapshot.validate(seats).map(|_| view).map_err(ServiceError::from),
            Err(err) => Err(err),
        };
        let view = match created {
            Ok(view) => view,
            Err(err) => {
                self.shared.record_failure(epoch, &err);
                return Err(err.into());
            }
        };

        let executor = Arc::new(StepExecutor::new(
            self.shared.service.clone(),
            view.id.clone(),
            seats,
        ));
        let session = Arc::new(Session::created(view, participants.into(), executor));

        let mut committed = false;
        let mut autonomous = false;
        self.shared.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            autonomous = state.mode == PlayMode::Autonomous;
            state.session = Some(session.clone());
            state.autoplay = AutoPlayState::Idle;
            committed = true;
            true
        });

        if !committed {
            debug!("Session {} created under a superseded epoch, dropping it", session.id);
            return Ok(StartOutcome::Discarded);
        }

        info!("Session {} started ({})", session.id, session.lifecycle);
        self.shared.publish(SessionEvent::SessionStarted {
            session: session.id.clone(),
            participants: session.participants.clone(),
        });

        if autonomous && session.lifecycle == Lifecycle::Active {
            AutoPlayLoop::spawn(self.shared.clone(), epoch, session.executor.clone());
        }

        Ok(StartOutcome::Started(session))
    }

    /// Switch between manual and autonomous play.
    ///
    /// Always advances the epoch, so a step issued before the switch is never
    /// committed after it. Selecting autonomous play on an active session
    /// starts a fresh loop.
    pub fn set_mode(&self, mode: PlayMode) {
        let mut executor = None;
        let epoch = self.shared.bump(|state| {
            state.mode = mode;
            if mode == PlayMode::Autonomous
                && let Some(session) = &state.session
                && session.lifecycle == Lifecycle::Active
            {
                state.autoplay = AutoPlayState::Idle;
                executor = Some(session.executor.clone());
            }
        });

        info!("Play mode set to {}", mode);
        self.shared.publish(SessionEvent::ModeChanged { mode });

        if let Some(executor) = executor {
            AutoPlayLoop::spawn(self.shared.clone(), epoch, executor);
        }
    }

    /// Advance the session by one step in manual mode.
    ///
    /// A no-op, reported as [`StepOutcome::Skipped`], when there is no active
    /// session, when autonomous play is selected, or while another step is
    /// still outstanding.
    pub async fn request_step(&self) -> Result<StepOutcome> {
        let (epoch, executor) = {
            let state = self.shared.state.borrow();
            if state.mode == PlayMode::Autonomous {
                return Ok(StepOutcome::Skipped(SkipReason::Autonomous));
            }
            let Some(session) = &state.session else {
                return Ok(StepOutcome::Skipped(SkipReason::NoSession));
            };
            if session.lifecycle == Lifecycle::Terminal {
                return Ok(StepOutcome::Skipped(SkipReason::Terminal));
            }
            (state.epoch, session.executor.clone())
        };

        let Some(result) = executor.try_advance().await else {
            debug!("Step already in flight for session {}", executor.session());
            return Ok(StepOutcome::Skipped(SkipReason::InFlight));
        };

        match result {
            Ok(view) => match self.shared.commit(epoch, view) {
                Commit::Applied { terminal } => Ok(StepOutcome::Committed { terminal }),
                Commit::Stale => Ok(StepOutcome::Discarded),
            },
            Err(err) => {
                if self.shared.record_failure(epoch, &err) {
                    Err(err.into())
                } else {
                    Ok(StepOutcome::Discarded)
                }
            }
        }
    }

    /// Re-read the session from the service without advancing it.
    ///
    /// Returns `None` when the result was superseded by a start, reset, mode
    /// switch or a newer committed step.
    pub async fn refresh(&self) -> Result<Option<Arc<Session>>> {
        let (epoch, step, executor) = {
            let state = self.shared.state.borrow();
            let session = state.session.as_ref().ok_or(SessionError::NoActiveSession)?;
            (state.epoch, session.step, session.executor.clone())
        };

        let view = match executor.fetch().await {
            Ok(view) => view,
            Err(err) => {
                self.shared.record_failure(epoch, &err);
                return Err(err.into());
            }
        };

        let mut refreshed = None;
        self.shared.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            let Some(current) = &state.session else {
                return false;
            };
            if current.step != step {
                return false;
            }
            let next = Arc::new(current.with_snapshot(view.snapshot, step));
            state.session = Some(next.clone());
            refreshed = Some(next);
            true
        });

        Ok(refreshed)
    }

    /// Drop the session and return to setup.
    pub fn reset(&self) {
        self.shared.bump(|state| {
            state.session = None;
            state.failure = None;
            state.autoplay = AutoPlayState::Idle;
        });
        info!("Session reset");
        self.shared.publish(SessionEvent::SessionReset);
    }

    /// Change the pause between autonomous steps. Takes effect at the next pause.
    pub fn set_autoplay_delay(&self, delay: Duration) {
        let delay = delay.min(MAX_AUTOPLAY_DELAY);
        self.shared.state.send_modify(|state| state.autoplay_delay = delay);
    }

    pub fn current_snapshot(&self) -> Option<Arc<StateSnapshot>> {
        self.shared
            .state
            .borrow()
            .session
            .as_ref()
            .map(|session| session.snapshot.clone())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.current_snapshot().map(|snapshot| snapshot.outcome())
    }

    pub fn session(&self) -> Option<Arc<Session>> {
        self.shared.state.borrow().session.clone()
    }

    pub fn mode(&self) -> PlayMode {
        self.shared.state.borrow().mode
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.shared.state.borrow().lifecycle()
    }

    pub fn autoplay_state(&self) -> AutoPlayState {
        self.shared.state.borrow().autoplay.clone()
    }

    pub fn last_failure(&self) -> Option<Failure> {
        self.shared.state.borrow().failure.clone()
    }

    pub fn state(&self) -> ControllerState {
        self.shared.state.borrow().clone()
    }

    /// Watch the whole controller state.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.shared.watch()
    }

    pub fn subscribe_events(&self, topic: Topic) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe(topic)
    }}

fn validate_participants(participants: &[BotId]) -> std::result::Result<(), ValidationError> {
    if participants.len() < 2 {
        return Err(ValidationError::TooFewParticipants {
            count: participants.len(),
        });
    }
    if let Some(index) = participants.iter().position(BotId::is_empty) {
        return Err(ValidationError::EmptySlot { index });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FailureKind;
    use crate::mock::{ScriptedGameService, ScriptedStep, hands};

    fn bots(ids: &[&str]) -> Vec<BotId> {
        ids.iter().map(|id| BotId::from(*id)).collect()
    }

    fn controller(service: &Arc<ScriptedGameService>, mode: PlayMode) -> SessionController {
        SessionController::new(
            service.clone(),
            ControllerConfig {
                initial_mode: mode,
                ..ControllerConfig::default()
            },
        )
    }

    async fn wait_for_autoplay_stop(controller: &SessionController) -> StopReason {
        let mut rx = controller.subscribe();
        let state = rx
            .wait_for(|state| matches!(state.autoplay, AutoPlayState::Stopped(_)))
            .await
            .unwrap();
        match &state.autoplay {
            AutoPlayState::Stopped(reason) => reason.clone(),
            other => panic!("unexpected autoplay state {:?}", other),
        }
    }

    #[tokio::test]
    async fn single_participant_is_rejected_without_network() {
        let service = Arc::new(ScriptedGameService::new());
        let controller = controller(&service, PlayMode::Manual);

        let err = controller.start(bots(&["A"])).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::TooFewParticipants { count: 1 })
        ));
        assert_eq!(service.create_calls(), 0);
        assert_eq!(controller.lifecycle(), Lifecycle::NotStarted);
    }

    #[tokio::test]
    async fn empty_slot_is_rejected_without_network() {
        let service = Arc::new(ScriptedGameService::new());
        let controller = controller(&service, PlayMode::Manual);

        let err = controller.start(bots(&["A", " ", "C"])).await.unwrap_err();

        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::EmptySlot { index: 1 })
        ));
        assert_eq!(service.create_calls(), 0);
    }

    #[tokio::test]
    async fn failed_start_stays_not_started_and_surfaces() {
        let service = Arc::new(ScriptedGameService::new());
        service.fail_create();
        let controller = controller(&service, PlayMode::Manual);

        let err = controller.start(bots(&["A", "B"])).await.unwrap_err();

        assert!(matches!(err, SessionError::Transport(_)));
        assert_eq!(controller.lifecycle(), Lifecycle::NotStarted);
        assert_eq!(
            controller.last_failure().map(|f| f.kind),
            Some(FailureKind::Transport)
        );
        assert_eq!(service.create_calls(), 1);
    }

    #[tokio::test]
    async fn duplicate_participants_are_allowed() {
        let service = Arc::new(ScriptedGameService::new());
        let controller = controller(&service, PlayMode::Manual);

        let outcome = controller.start(bots(&["A", "A"])).await.unwrap();

        let StartOutcome::Started(session) = outcome else {
            panic!("session should start");
        };
        assert_eq!(session.participants.len(), 2);
        assert_eq!(session.display_name(1), "A");
        assert_eq!(controller.lifecycle(), Lifecycle::Active);
    }

    #[tokio::test]
    async fn manual_step_replaces_the_session() {
        let service = Arc::new(ScriptedGameService::new());
        service.push_step(ScriptedStep::hands(hands(&[&["6♠", "8♦"], &[]])));
        let controller = controller(&service, PlayMode::Manual);
        controller.start(bots(&["A", "B"])).await.unwrap();
        let before = controller.session().unwrap();

        let outcome = controller.request_step().await.unwrap();

        assert_eq!(outcome, StepOutcome::Committed { terminal: true });
        let after = controller.session().unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.step, 0);
        assert_eq!(after.step, 1);
        assert_eq!(controller.lifecycle(), Lifecycle::Terminal);
        assert_eq!(
            controller.request_step().await.unwrap(),
            StepOutcome::Skipped(SkipReason::Terminal)
        );
        assert_eq!(service.step_calls(), 1);
    }

    #[tokio::test]
    async fn manual_step_is_skipped_without_session_or_in_autonomous_mode() {
        let service = Arc::new(ScriptedGameService::new());
        let controller = controller(&service, PlayMode::Manual);

        assert_eq!(
            controller.request_step().await.unwrap(),
            StepOutcome::Skipped(SkipReason::NoSession)
        );

        controller.set_mode(PlayMode::Autonomous);
        assert_eq!(
            controller.request_step().await.unwrap(),
            StepOutcome::Skipped(SkipReason::Autonomous)
        );
        assert_eq!(service.step_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_step_is_skipped_while_one_is_in_flight() {
        let service = Arc::new(ScriptedGameService::new());
        service.hold_steps();
        service.push_step(ScriptedStep::hands(hands(&[&["6♠"], &["7♥"]])));
        let controller = controller(&service, PlayMode::Manual);
        controller.start(bots(&["A", "B"])).await.unwrap();

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.request_step().await }
        });
        service.step_entered().await;

        assert_eq!(
            controller.request_step().await.unwrap(),
            StepOutcome::Skipped(SkipReason::InFlight)
        );

        service.release_step();
        assert_eq!(
            pending.await.unwrap().unwrap(),
            StepOutcome::Committed { terminal: false }
        );
        assert_eq!(service.step_calls(), 1);
    }

    #[tokio::test]
    async fn manual_step_failure_is_surfaced() {
        let service = Arc::new(ScriptedGameService::new());
        service.push_step(ScriptedStep::Garbage);
        let controller = controller(&service, PlayMode::Manual);
        controller.start(bots(&["A", "B"])).await.unwrap();
        let mut events = controller.subscribe_events(Topic::Session);

        let err = controller.request_step().await.unwrap_err();

        assert!(matches!(err, SessionError::Protocol(_)));
        assert_eq!(controller.lifecycle(), Lifecycle::Active);
        assert_eq!(controller.session().unwrap().step, 0);
        assert!(matches!(
            events.recv().await,
            Ok(SessionEvent::Failed(Failure {
                kind: FailureKind::Protocol,
                ..
            }))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_runs_to_the_end_and_stops() {
        let service = Arc::new(ScriptedGameService::new().with_initial(hands(&[
            &["6♠", "7♠", "8♠"],
            &["9♥", "10♥"],
        ])));
        service.push_step(ScriptedStep::hands(hands(&[&["6♠", "7♠"], &["10♥"]])));
        service.push_step(ScriptedStep::hands(hands(&[&["6♠"], &[]])));
        // never requested
        service.push_step(ScriptedStep::hands(hands(&[&[], &[]])));
        let controller = controller(&service, PlayMode::Autonomous);

        controller.start(bots(&["A", "B"])).await.unwrap();
        let reason = wait_for_autoplay_stop(&controller).await;

        assert_eq!(reason, StopReason::Finished);
        let outcome = controller.outcome().unwrap();
        assert_eq!(outcome.winners, vec![1]);
        assert_eq!(outcome.loser, Some(0));
        assert_eq!(controller.lifecycle(), Lifecycle::Terminal);
        assert_eq!(service.step_calls(), 2);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(service.step_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn mode_switch_discards_the_in_flight_step() {
        let service = Arc::new(ScriptedGameService::new());
        service.hold_steps();
        service.push_step(ScriptedStep::hands(hands(&[&["6♠"], &[]])));
        let controller = controller(&service, PlayMode::Autonomous);
        let mut steps = controller.subscribe_events(Topic::Step);

        controller.start(bots(&["A", "B"])).await.unwrap();
        service.step_entered().await;
        controller.set_mode(PlayMode::Manual);
        service.release_step();

        assert!(matches!(
            steps.recv().await,
            Ok(SessionEvent::StepDiscarded { .. })
        ));
        let session = controller.session().unwrap();
        assert_eq!(session.step, 0);
        assert_eq!(session.snapshot.hands[1].len(), 1);
        assert_eq!(controller.lifecycle(), Lifecycle::Active);
        assert_eq!(
            controller.autoplay_state(),
            AutoPlayState::Stopped(StopReason::Cancelled)
        );
        assert!(controller.last_failure().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_failure_stops_the_loop() {
        let service = Arc::new(ScriptedGameService::new());
        service.push_step(ScriptedStep::hands(hands(&[&["6♠"], &["7♥"]])));
        service.push_step(ScriptedStep::Unreachable);
        service.push_step(ScriptedStep::hands(hands(&[&["6♠"], &[]])));
        let controller = controller(&service, PlayMode::Autonomous);

        controller.start(bots(&["A", "B"])).await.unwrap();
        let reason = wait_for_autoplay_stop(&controller).await;

        assert_eq!(reason, StopReason::Failed);
        assert_eq!(
            controller.last_failure().map(|f| f.kind),
            Some(FailureKind::Transport)
        );
        assert_eq!(controller.session().unwrap().step, 1);
        assert_eq!(service.step_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn autoplay_respects_the_step_limit() {
        let service = Arc::new(ScriptedGameService::new());
        for _ in 0..5 {
            service.push_step(ScriptedStep::hands(hands(&[&["6♠"], &["7♥"]])));
        }
        let controller = SessionController::new(
            service.clone(),
            ControllerConfig {
                initial_mode: PlayMode::Autonomous,
                max_steps: Some(3),
                ..ControllerConfig::default()
            },
        );

        controller.start(bots(&["A", "B"])).await.unwrap();

        assert_eq!(
            wait_for_autoplay_stop(&controller).await,
            StopReason::StepLimit
        );
        assert_eq!(service.step_calls(), 3);
        assert_eq!(controller.lifecycle(), Lifecycle::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn switching_to_autonomous_resumes_an_active_session() {
        let service = Arc::new(ScriptedGameService::new());
        service.push_step(ScriptedStep::hands(hands(&[&[], &["7♥"]])));
        let controller = controller(&service, PlayMode::Manual);
        controller.start(bots(&["A", "B"])).await.unwrap();
        assert_eq!(service.step_calls(), 0);

        controller.set_mode(PlayMode::Autonomous);

        assert_eq!(
            wait_for_autoplay_stop(&controller).await,
            StopReason::Finished
        );
        assert_eq!(controller.outcome().unwrap().loser, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_discards_a_pending_step() {
        let service = Arc::new(ScriptedGameService::new());
        service.hold_steps();
        service.push_step(ScriptedStep::hands(hands(&[&["6♠"], &["7♥"]])));
        let controller = controller(&service, PlayMode::Manual);
        controller.start(bots(&["A", "B"])).await.unwrap();

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.request_step().await }
        });
        service.step_entered().await;
        controller.reset();
        service.release_step();

        assert_eq!(pending.await.unwrap().unwrap(), StepOutcome::Discarded);
        assert_eq!(controller.lifecycle(), Lifecycle::NotStarted);
        assert!(controller.current_snapshot().is_none());
    }

    #[tokio::test]
    async fn restart_replaces_the_previous_session() {
        let service = Arc::new(ScriptedGameService::new());
        let controller = controller(&service, PlayMode::Manual);
        let mut session_events = controller.subscribe_events(Topic::Session);

        controller.start(bots(&["A", "B"])).await.unwrap();
        let first_epoch = controller.state().epoch;
        controller.start(bots(&["C", "D", "E"])).await.unwrap();

        let session = controller.session().unwrap();
        assert_eq!(session.participants.len(), 3);
        assert!(controller.state().epoch > first_epoch);
        assert!(matches!(
            session_events.recv().await,
            Ok(SessionEvent::SessionStarted { .. })
        ));
        assert!(matches!(
            session_events.recv().await,
            Ok(SessionEvent::SessionStarted { .. })
        ));
    }

    #[tokio::test]
    async fn refresh_rereads_without_advancing() {
        let service = Arc::new(ScriptedGameService::new());
        let controller = controller(&service, PlayMode::Manual);

        assert!(matches!(
            controller.refresh().await,
            Err(SessionError::NoActiveSession)
        ));

        controller.start(bots(&["A", "B"])).await.unwrap();
        let refreshed = controller.refresh().await.unwrap().unwrap();

        assert_eq!(refreshed.step, 0);
        assert_eq!(service.get_calls(), 1);
        assert_eq!(service.step_calls(), 0);
    }

    #[test]
    fn autoplay_delay_is_clamped() {
        let service: Arc<dyn GameService> = Arc::new(ScriptedGameService::new());
        let controller = SessionController::new(
            service,
            ControllerConfig {
                autoplay_delay: Duration::from_secs(10),
                ..ControllerConfig::default()
            },
        );
        assert_eq!(controller.state().autoplay_delay, MAX_AUTOPLAY_DELAY);

        controller.set_autoplay_delay(Duration::from_millis(50));
        assert_eq!(controller.state().autoplay_delay, Duration::from_millis(50));
    }
}
