//! Line-oriented console frontend.
//!
//! Prints a text frame after every change. Headless by default: the session
//! runs to its end on its own. With `interactive` set, commands are read from
//! stdin instead.
use std::fmt::Write as _;

use anyhow::{Result, bail};
use async_trait::async_trait;
use client_frontend_core::{
    EventConsumer, Frame, Frontend, FrontendConfig, MessageLevel, StatusMessages,
};
use runtime::{
    AutoPlayState, BotId, Lifecycle, PlayMode, SessionController, SessionEvent, StartOutcome,
    StepOutcome, Topic,
};
use strum::EnumString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

const MESSAGE_LINES: usize = 5;

const HELP: &str = "commands: [s]tep (or enter), [a]uto, [m]anual, [r]estart, re[f]resh, [h]elp, [q]uit";

/// Commands accepted on stdin in interactive mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum Command {
    #[strum(serialize = "", serialize = "s", serialize = "step")]
    Step,
    #[strum(serialize = "a", serialize = "auto")]
    Auto,
    #[strum(serialize = "m", serialize = "manual")]
    Manual,
    #[strum(serialize = "r", serialize = "restart")]
    Restart,
    #[strum(serialize = "f", serialize = "refresh")]
    Refresh,
    #[strum(serialize = "h", serialize = "help", serialize = "?")]
    Help,
    #[strum(serialize = "q", serialize = "quit", serialize = "exit")]
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        line.trim().parse().ok()
    }
}

pub struct ConsoleFrontend {
    config: FrontendConfig,
    participants: Vec<BotId>,
    messages: StatusMessages,
    interactive: bool,
}

impl ConsoleFrontend {
    pub fn new(config: FrontendConfig, participants: Vec<BotId>) -> Self {
        let messages = StatusMessages::new(config.messages.capacity);
        Self {
            config,
            participants,
            messages,
            interactive: false,
        }
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    async fn start(&mut self, controller: &SessionController) -> Result<()> {
        match controller.start(self.participants.clone()).await? {
            StartOutcome::Started(session) => {
                tracing::info!("Console attached to session {}", session.id);
                Ok(())
            }
            StartOutcome::Discarded => bail!("session start was superseded"),
        }
    }

    fn consume(&mut self, event: &SessionEvent) -> bool {
        self.messages.on_event(event).requires_redraw
    }

    fn render(&self, controller: &SessionController) {
        let frame = Frame::from_state(
            &controller.state(),
            &self.config.log,
            self.messages.message_log(),
            MESSAGE_LINES,
        );
        println!("{}", render_frame(&frame));
    }

    /// Wait for the autoplay loop to finish, printing every committed step.
    async fn follow_autoplay(
        &mut self,
        controller: &SessionController,
        events: &mut EventStreams,
    ) -> Result<()> {
        if controller.lifecycle() != Lifecycle::Active {
            return Ok(());
        }
        // the stop event may already have been drained
        if matches!(controller.autoplay_state(), AutoPlayState::Stopped(_)) {
            return Ok(());
        }
        while let Some(event) = events.next().await {
            let stopped = matches!(event, SessionEvent::AutoPlayStopped { .. });
            if self.consume(&event) {
                self.render(controller);
            }
            if stopped {
                break;
            }
        }
        Ok(())
    }

    /// Request steps one after another until the game ends.
    async fn step_through(
        &mut self,
        controller: &SessionController,
        events: &mut EventStreams,
    ) -> Result<()> {
        while controller.lifecycle() == Lifecycle::Active {
            let outcome = controller.request_step().await?;
            for event in events.drain() {
                self.consume(&event);
            }
            self.render(controller);
            if matches!(outcome, StepOutcome::Skipped(_)) {
                break;
            }
        }
        Ok(())
    }

    async fn interactive_loop(
        &mut self,
        controller: &SessionController,
        events: &mut EventStreams,
    ) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("{}", HELP);

        loop {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else { break };
                    if self.consume(&event) {
                        self.render(controller);
                    }
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match Command::parse(&line) {
                        Some(Command::Quit) => break,
                        Some(command) => self.apply(command, controller).await?,
                        None => println!("unknown command {:?}; {}", line.trim(), HELP),
                    }
                }
            }
        }
        Ok(())
    }

    async fn apply(&mut self, command: Command, controller: &SessionController) -> Result<()> {
        match command {
            Command::Step => match controller.request_step().await {
                Ok(StepOutcome::Skipped(reason)) => println!("step skipped: {:?}", reason),
                Ok(_) => {}
                // recorded on the controller and shown through the event
                Err(err) => tracing::debug!("Step failed: {}", err),
            },
            Command::Auto => controller.set_mode(PlayMode::Autonomous),
            Command::Manual => controller.set_mode(PlayMode::Manual),
            Command::Restart => self.start(controller).await?,
            Command::Refresh => {
                if let Err(err) = controller.refresh().await {
                    println!("refresh failed: {}", err);
                }
                self.render(controller);
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => {}
        }
        Ok(())
    }
}

#[async_trait]
impl Frontend for ConsoleFrontend {
    async fn run(&mut self, controller: SessionController) -> Result<()> {
        let mut events = EventStreams::subscribe(&controller);

        self.start(&controller).await?;
        for event in events.drain() {
            self.consume(&event);
        }
        self.render(&controller);

        if self.interactive {
            self.interactive_loop(&controller, &mut events).await?;
        } else if controller.mode() == PlayMode::Autonomous {
            self.follow_autoplay(&controller, &mut events).await?;
        } else {
            self.step_through(&controller, &mut events).await?;
        }

        if let Some(failure) = controller.last_failure() {
            bail!("session ended with a {}", failure);
        }
        Ok(())
    }
}

/// Receivers for every event topic, read as one stream.
struct EventStreams {
    session: broadcast::Receiver<SessionEvent>,
    step: broadcast::Receiver<SessionEvent>,
    autoplay: broadcast::Receiver<SessionEvent>,
}

impl EventStreams {
    fn subscribe(controller: &SessionController) -> Self {
        Self {
            session: controller.subscribe_events(Topic::Session),
            step: controller.subscribe_events(Topic::Step),
            autoplay: controller.subscribe_events(Topic::AutoPlay),
        }
    }

    async fn next(&mut self) -> Option<SessionEvent> {
        loop {
            let received = tokio::select! {
                received = self.session.recv() => received,
                received = self.step.recv() => received,
                received = self.autoplay.recv() => received,
            };
            match received {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Console fell behind by {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    fn drain(&mut self) -> Vec<SessionEvent> {
        let mut drained = Vec::new();
        for rx in [&mut self.session, &mut self.step, &mut self.autoplay] {
            loop {
                match rx.try_recv() {
                    Ok(event) => drained.push(event),
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(_) => break,
                }
            }
        }
        drained
    }
}

/// Plain-text rendering of a frame.
pub fn render_frame(frame: &Frame) -> String {
    let mut out = String::new();
    let summary = &frame.summary;

    let session = summary
        .session
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    let _ = writeln!(
        out,
        "== session {} | step {} | {} | mode {} ==",
        session, summary.step, summary.lifecycle, summary.mode
    );

    if let Some(game) = &frame.game {
        let _ = writeln!(
            out,
            "trump {}  deck {}  burned {}",
            game.trump, game.deck_count, game.burned_count
        );

        let table: Vec<_> = game
            .table
            .iter()
            .map(|pair| match &pair.defense {
                Some(defense) => format!("{}/{}", pair.attack, defense),
                None => format!("{}/--", pair.attack),
            })
            .collect();
        let _ = writeln!(
            out,
            "table: {}",
            if table.is_empty() { "empty".to_string() } else { table.join("  ") }
        );

        for seat in &game.seats {
            let role = match (seat.is_attacker, seat.is_defender) {
                (true, _) => "A",
                (_, true) => "D",
                _ => " ",
            };
            let marker = if seat.is_current { ">" } else { " " };
            let cards: Vec<_> = seat.cards.iter().map(ToString::to_string).collect();
            let _ = writeln!(
                out,
                "{} [{}] {:<16} {:>2} | {}",
                marker,
                role,
                seat.name,
                seat.card_count,
                cards.join(" ")
            );
        }

        for line in &game.log {
            let _ = writeln!(out, "  {}: {}", line.name, line.text);
        }

        for (seat, log) in game.seats.iter().zip(&game.bot_logs) {
            if let Some(latest) = log.first() {
                let _ = writeln!(out, "  [{}] {}", seat.name, latest);
            }
        }

        let _ = writeln!(out, "{}", game.headline());
    }

    for message in &frame.messages {
        let prefix = match message.level {
            MessageLevel::Info => "",
            MessageLevel::Warning => "warning: ",
            MessageLevel::Error => "error: ",
        };
        match message.step {
            Some(step) => {
                let _ = writeln!(out, "* [step {}] {}{}", step, prefix, message.text);
            }
            None => {
                let _ = writeln!(out, "* {}{}", prefix, message.text);
            }
        }
    }

    out.trim_end().to_string()
}
