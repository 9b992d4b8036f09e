//! Scripted game service for testing without network.
//!
//! Step responses are queued up front. Steps can be held at the service until
//! the test releases them, which is how in-flight races are reproduced.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use game_core::{Card, StateSnapshot};

use crate::api::{
    BotId, GameService, ProtocolError, ServiceError, SessionId, SessionView, TransportError,
};

/// One queued answer to `step_session`.
pub enum ScriptedStep {
    Snapshot(StateSnapshot),
    /// Answer for a session other than the one asked about.
    ForeignSession,
    /// Connection-level failure.
    Unreachable,
    /// Body that does not decode.
    Garbage,
}

impl ScriptedStep {
    pub fn hands(hands: Vec<Vec<Card>>) -> Self {
        Self::Snapshot(snapshot(hands))
    }
}

pub fn hands(seats: &[&[&str]]) -> Vec<Vec<Card>> {
    seats
        .iter()
        .map(|codes| codes.iter().map(|c| Card::from(*c)).collect())
        .collect()
}

pub fn snapshot(hands: Vec<Vec<Card>>) -> StateSnapshot {
    let seats = hands.len();
    StateSnapshot {
        log: vec![Vec::new(); seats],
        hands,
        attack: Vec::new(),
        defense: Vec::new(),
        attacker: 0,
        defender: 1 % seats.max(1),
        current_player: 0,
        deck_count: 0,
        trump_card: Card::from("6♠"),
        trump_suit: None,
        burned_count: 0,
    }
}

pub struct ScriptedGameService {
    initial: Mutex<Option<StateSnapshot>>,
    current: Mutex<Option<StateSnapshot>>,
    steps: Mutex<VecDeque<ScriptedStep>>,
    fail_create: AtomicBool,
    create_calls: AtomicUsize,
    step_calls: AtomicUsize,
    get_calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    held: AtomicBool,
    release: Semaphore,
    entered: Notify,
}

impl ScriptedGameService {
    pub fn new() -> Self {
        Self {
            initial: Mutex::new(None),
            current: Mutex::new(None),
            steps: Mutex::new(VecDeque::new()),
            fail_create: AtomicBool::new(false),
            create_calls: AtomicUsize::new(0),
            step_calls: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            held: AtomicBool::new(false),
            release: Semaphore::new(0),
            entered: Notify::new(),
        }
    }

    pub fn session_id() -> SessionId {
        SessionId::new("game-1")
    }

    /// Snapshot returned by `create_session`. Defaults to one card per seat.
    pub fn with_initial(self, hands: Vec<Vec<Card>>) -> Self {
        *self.initial.lock().unwrap() = Some(snapshot(hands));
        self
    }

    pub fn fail_create(&self) {
        self.fail_create.store(true, Ordering::SeqCst);
    }

    pub fn push_step(&self, step: ScriptedStep) {
        self.steps.lock().unwrap().push_back(step);
    }

    /// Park every following step at the service until [`release_step`](Self::release_step).
    pub fn hold_steps(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub fn release_step(&self) {
        self.release.add_permits(1);
    }

    /// Resolves once a step request has reached the service.
    pub async fn step_entered(&self) {
        self.entered.notified().await;
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn step_calls(&self) -> usize {
        self.step_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn view(&self, id: SessionId, snapshot: StateSnapshot) -> SessionView {
        let display_names = (0..snapshot.hands.len())
            .map(|i| format!("Bot {}", i))
            .collect();
        SessionView {
            id,
            display_names,
            snapshot,
        }
    }
}

impl Default for ScriptedGameService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameService for ScriptedGameService {
    async fn create_session(&self, participants: &[BotId]) -> Result<SessionView, ServiceError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if self.fail_create.load(Ordering::SeqCst) {
            return Err(TransportError::Unreachable("connection refused".into()).into());
        }

        let snapshot = self
            .initial
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| snapshot(vec![vec![Card::from("7♥")]; participants.len()]));
        *self.current.lock().unwrap() = Some(snapshot.clone());

        let mut view = self.view(Self::session_id(), snapshot);
        view.display_names = participants.iter().map(|p| p.to_string()).collect();
        Ok(view)
    }

    async fn step_session(&self, id: &SessionId) -> Result<SessionView, ServiceError> {
        self.step_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        self.entered.notify_one();

        if self.held.load(Ordering::SeqCst) {
            self.release.acquire().await.unwrap().forget();
        } else {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(ScriptedStep::Snapshot(snapshot)) => {
                *self.current.lock().unwrap() = Some(snapshot.clone());
                Ok(self.view(id.clone(), snapshot))
            }
            Some(ScriptedStep::ForeignSession) => {
                let snapshot = snapshot(hands(&[&["6♠"], &["7♥"]]));
                Ok(self.view(SessionId::new("someone-else"), snapshot))
            }
            Some(ScriptedStep::Garbage) => {
                let err = serde_json::from_str::<SessionView>("<html>").unwrap_err();
                Err(ProtocolError::Decode(err).into())
            }
            Some(ScriptedStep::Unreachable) | None => {
                Err(TransportError::Unreachable("connection refused".into()).into())
            }
        }
    }

    async fn get_session(&self, id: &SessionId) -> Result<SessionView, ServiceError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        match self.current.lock().unwrap().clone() {
            Some(snapshot) => Ok(self.view(id.clone(), snapshot)),
            None => Err(ProtocolError::Rejected("Game not found".into()).into()),
        }
    }
}
