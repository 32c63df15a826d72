use crate::live::view::LiveMatchView;
use crate::{ApiError, ApiResult};
use database::{DatabaseResult, MatchRepository};
use log::{debug, error, info, warn};
use scoring::{
    ActionOutcome, AutosaveCoordinator, ClockEvent, LiveMatch, MatchAction, MatchSummary,
    SaveTicket, ScoringError, UserSession,
};
use serde_json::{Map, Value};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub enum SessionCommand {
    Apply {
        action: MatchAction,
        reply: oneshot::Sender<ApiResult<LiveMatchView>>,
    },
    View {
        reply: oneshot::Sender<LiveMatchView>,
    },
    Summary {
        reply: oneshot::Sender<MatchSummary>,
    },
    Save {
        session: UserSession,
        exit: bool,
        reply: oneshot::Sender<ApiResult<LiveMatchView>>,
    },
    Close,
}

struct SaveReport {
    ticket: SaveTicket,
    snapshot: Map<String, Value>,
    result: DatabaseResult<()>,
}

enum Flow {
    Continue,
    Stop,
}

/// Single owner of one live match. Every mutation, clock tick and save runs
/// on this task, so the state needs no locking.
pub struct MatchSession {
    live: LiveMatch,
    owner_id: String,
    repository: MatchRepository,
    autosave: AutosaveCoordinator,
    last_saved: Option<Map<String, Value>>,
    in_flight: Option<SaveTicket>,
    commands: mpsc::Receiver<SessionCommand>,
    reports_tx: mpsc::UnboundedSender<SaveReport>,
    reports: mpsc::UnboundedReceiver<SaveReport>,
}

impl MatchSession {
    /// `last_saved` is the stored document the match was loaded from; only
    /// fields that differ from it are written.
    pub fn new(
        live: LiveMatch,
        owner_id: String,
        repository: MatchRepository,
        quiet_period: Duration,
        last_saved: Option<Map<String, Value>>,
        commands: mpsc::Receiver<SessionCommand>,
    ) -> Self {
        let (reports_tx, reports) = mpsc::unbounded_channel();

        MatchSession {
            live,
            owner_id,
            repository,
            autosave: AutosaveCoordinator::new(quiet_period),
            last_saved,
            in_flight: None,
            commands,
            reports_tx,
            reports,
        }
    }

    pub async fn run(mut self) {
        info!("match {}: live session opened", self.live.id);

        let mut ticker = time::interval(TICK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let clock_running = self.live.clock.is_running();
            let deadline = self
                .autosave
                .deadline()
                .filter(|_| self.in_flight.is_none())
                .map(Instant::from_std);

            tokio::select! {
                command = self.commands.recv() => {
                    let Some(command) = command else {
                        debug!("match {}: all handles dropped", self.live.id);
                        break;
                    };

                    if let Flow::Stop = self.handle_command(command).await {
                        break;
                    }

                    if !clock_running && self.live.clock.is_running() {
                        ticker.reset();
                    }
                }
                _ = ticker.tick(), if clock_running => {
                    self.on_tick();
                }
                _ = time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.begin_autosave();
                }
                Some(report) = self.reports.recv() => {
                    self.finish_autosave(report);
                }
            }
        }

        if self.in_flight.is_some() {
            debug!("match {}: closing with an autosave in flight", self.live.id);
        }

        info!(
            "match {}: live session closed ({:?})",
            self.live.id,
            self.autosave.status()
        );
    }

    async fn handle_command(&mut self, command: SessionCommand) -> Flow {
        match command {
            SessionCommand::Apply { action, reply } => {
                let result = self.apply(action);
                send_reply(reply, result);
            }
            SessionCommand::View { reply } => {
                send_reply(reply, self.view());
            }
            SessionCommand::Summary { reply } => {
                send_reply(reply, MatchSummary::build(&self.live));
            }
            SessionCommand::Save {
                session,
                exit,
                reply,
            } => {
                let saved = self.save(&session).await;
                let result = saved.map(|_| self.view());
                let close = exit && result.is_ok();

                send_reply(reply, result);

                if close {
                    return Flow::Stop;
                }
            }
            SessionCommand::Close => return Flow::Stop,
        }

        Flow::Continue
    }

    fn view(&self) -> LiveMatchView {
        LiveMatchView::build(&self.live, self.autosave.status())
    }

    fn apply(&mut self, action: MatchAction) -> ApiResult<LiveMatchView> {
        if let ActionOutcome::Changed = self.live.apply(action)? {
            self.autosave.mark_dirty(Instant::now().into_std());
        }

        Ok(self.view())
    }

    fn on_tick(&mut self) {
        if let Some(ClockEvent::HalfEnded(half)) = self.live.tick() {
            debug!("match {}: clock stopped at end of {}", self.live.id, half.as_str());
        }
    }

    fn begin_autosave(&mut self) {
        if self.live.my_team_side.is_none() {
            debug!("match {}: no side assigned, autosave skipped", self.live.id);
            self.autosave.skip();
            return;
        }

        let Some(ticket) = self.autosave.begin(Instant::now().into_std()) else {
            return;
        };

        let document = self.live.to_document(&self.owner_id);

        let prepared = document.to_fields().and_then(|snapshot| {
            let changed = document.changed_fields(self.last_saved.as_ref())?;
            Ok((snapshot, changed))
        });

        let (snapshot, changed) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                error!("match {}: cannot serialize for autosave: {}", self.live.id, e);
                self.autosave.complete(ticket, false);
                return;
            }
        };

        if changed.is_empty() {
            debug!("match {}: nothing changed since last save", self.live.id);
            self.autosave.complete(ticket, true);
            return;
        }

        info!("match {}: autosaving {} field(s)", self.live.id, changed.len());

        self.in_flight = Some(ticket);

        let repository = self.repository.clone();
        let match_id = self.live.id.clone();
        let reports = self.reports_tx.clone();

        tokio::spawn(async move {
            let result = repository.update(&match_id, changed).await;

            let report = SaveReport {
                ticket,
                snapshot,
                result,
            };

            if reports.send(report).is_err() {
                debug!("match {}: autosave finished after session closed", match_id);
            }
        });
    }

    fn finish_autosave(&mut self, report: SaveReport) {
        self.in_flight = None;

        match report.result {
            Ok(()) => {
                info!("match {}: autosave complete", self.live.id);
                self.last_saved = Some(report.snapshot);
                self.autosave.complete(report.ticket, true);
            }
            Err(e) => {
                warn!("match {}: autosave failed: {}", self.live.id, e);
                self.autosave.complete(report.ticket, false);
            }
        }
    }

    async fn wait_for_autosave(&mut self) {
        if self.in_flight.is_none() {
            return;
        }

        if let Some(report) = self.reports.recv().await {
            self.finish_autosave(report);
        }
    }

    /// Writes immediately, bypassing the debounce. An autosave already in
    /// flight is awaited first so the two writes cannot land out of order.
    async fn save(&mut self, session: &UserSession) -> ApiResult<()> {
        if self.live.my_team_side.is_none() {
            warn!("match {}: manual save refused, no side assigned", self.live.id);
            return Err(ScoringError::MissingTeamSide.into());
        }

        if let Err(e) = session.ensure_entitled() {
            warn!(
                "match {}: manual save refused for {}: {}",
                self.live.id, session.user_id, e
            );
            return Err(e.into());
        }

        self.wait_for_autosave().await;

        let document = self.live.to_document(&self.owner_id);
        let snapshot = document.to_fields()?;
        let changed = document.changed_fields(self.last_saved.as_ref())?;

        info!(
            "match {}: manual save by {} ({} field(s))",
            self.live.id,
            session.user_id,
            changed.len()
        );

        if !changed.is_empty() {
            if let Err(e) = self.repository.update(&self.live.id, changed).await {
                error!("match {}: manual save failed: {}", self.live.id, e);
                self.autosave.manual_failed();
                return Err(ApiError::from(e));
            }
        }

        self.last_saved = Some(snapshot);
        self.autosave.saved_manually();

        Ok(())
    }
}

fn send_reply<T>(reply: oneshot::Sender<T>, value: T) {
    if reply.send(value).is_err() {
        debug!("caller went away before the reply");
    }
}
