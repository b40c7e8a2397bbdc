use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::api::ClientResult;
use crate::models::StatusSnapshot;

pub type AppSignal = Signal<AppState>;

/// What asked for a refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshTrigger {
    Mount,
    Schedule,
    Manual,
    Recompute,
}

/// Identifies one issued refresh; only the latest ticket may change the panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn sequence(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PanelStatus {
    #[default]
    Idle,
    Loading {
        trigger: RefreshTrigger,
        stale: Option<StatusSnapshot>,
    },
    Ready {
        snapshot: StatusSnapshot,
        fetched_at: OffsetDateTime,
    },
    Failed {
        message: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveOutcome {
    Applied,
    Superseded,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PanelModel {
    status: PanelStatus,
    issued: u64,
    pending: Option<RefreshTicket>,
    last_fetched_at: Option<OffsetDateTime>,
}

impl PanelModel {
    pub fn status(&self) -> &PanelStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.status, PanelStatus::Loading { .. })
    }

    /// Snapshot currently on screen; while loading this is the one being refreshed.
    pub fn snapshot(&self) -> Option<&StatusSnapshot> {
        match &self.status {
            PanelStatus::Ready { snapshot, .. } => Some(snapshot),
            PanelStatus::Loading { stale, .. } => stale.as_ref(),
            PanelStatus::Idle | PanelStatus::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            PanelStatus::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn last_fetched_at(&self) -> Option<OffsetDateTime> {
        match self.status {
            PanelStatus::Ready { fetched_at, .. } => Some(fetched_at),
            PanelStatus::Loading { stale: Some(_), .. } => self.last_fetched_at,
            _ => None,
        }
    }

    /// Moves the panel into loading and issues a ticket.
    ///
    /// A scheduled refresh is skipped while another request is in flight; other
    /// triggers always start a new request and supersede the one in flight.
    pub fn begin(&mut self, trigger: RefreshTrigger) -> Option<RefreshTicket> {
        if trigger == RefreshTrigger::Schedule && self.is_busy() {
            return None;
        }

        let stale = match std::mem::take(&mut self.status) {
            PanelStatus::Ready { snapshot, .. } => Some(snapshot),
            PanelStatus::Loading { stale, .. } => stale,
            PanelStatus::Idle | PanelStatus::Failed { .. } => None,
        };

        self.issued += 1;
        let ticket = RefreshTicket(self.issued);
        self.pending = Some(ticket);
        self.status = PanelStatus::Loading { trigger, stale };
        Some(ticket)
    }

    /// Applies the result of a request if `ticket` is still the latest one issued.
    pub fn resolve(
        &mut self,
        ticket: RefreshTicket,
        result: ClientResult<StatusSnapshot>,
        now: OffsetDateTime,
    ) -> ResolveOutcome {
        if self.pending != Some(ticket) {
            return ResolveOutcome::Superseded;
        }
        self.pending = None;

        self.status = match result {
            Ok(snapshot) => {
                self.last_fetched_at = Some(now);
                PanelStatus::Ready {
                    snapshot,
                    fetched_at: now,
                }
            }
            Err(err) => {
                self.last_fetched_at = None;
                PanelStatus::Failed {
                    message: err.user_message().to_string(),
                }
            }
        };

        ResolveOutcome::Applied
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub panel: PanelModel,
}

#[derive(Clone, Copy)]
pub struct AppActions {
    state: AppSignal,
}

impl AppActions {
    pub fn begin_refresh(&self, trigger: RefreshTrigger) -> Option<RefreshTicket> {
        let mut state = self.state;
        let ticket = state.write().panel.begin(trigger);
        ticket
    }

    pub fn resolve_refresh(
        &self,
        ticket: RefreshTicket,
        result: ClientResult<StatusSnapshot>,
    ) -> ResolveOutcome {
        let mut state = self.state;
        let outcome = state
            .write()
            .panel
            .resolve(ticket, result, OffsetDateTime::now_utc());
        outcome
    }
}

pub fn use_app_state() -> AppSignal {
    use_context::<AppSignal>()
}

pub fn use_app_actions() -> AppActions {
    let state = use_app_state();
    AppActions { state }
}
