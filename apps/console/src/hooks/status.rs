//! Status panel hooks
//!
//! Mount-time fetch, periodic polling and the manual refresh triggers.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use tracing::{debug, error, info};

use crate::api::ClientError;
use crate::config::AppConfig;
use crate::services::refresh::{fetch_status, recompute_then_fetch};
use crate::services::schedule::{refresh_schedule, ScheduleGuard};
use crate::state::{
    use_app_actions, use_app_state, AppActions, AppSignal, RefreshTrigger, ResolveOutcome,
};
use crate::{API_CLIENT, APP_CONFIG};

#[derive(Clone, Copy)]
pub struct StatusPanelHandle {
    pub state: AppSignal,
    actions: AppActions,
}

impl StatusPanelHandle {
    pub fn refresh(&self) {
        start_refresh(self.actions, RefreshTrigger::Manual);
    }

    pub fn refresh_and_recompute(&self) {
        start_refresh(self.actions, RefreshTrigger::Recompute);
    }
}

/// Status panel hook: fetches once on mount, then every poll interval until the
/// calling component is dropped.
pub fn use_status_panel() -> StatusPanelHandle {
    let state = use_app_state();
    let actions = use_app_actions();
    let guard_slot = use_hook(|| Rc::new(RefCell::new(None::<ScheduleGuard>)));

    use_drop({
        let guard_slot = guard_slot.clone();
        move || {
            if let Some(guard) = guard_slot.borrow_mut().take() {
                guard.stop();
                info!("status polling stopped");
            }
        }
    });

    use_future(move || {
        let guard_slot = guard_slot.clone();
        async move {
            TimeoutFuture::new(0).await;

            start_refresh(actions, RefreshTrigger::Mount);

            let period = APP_CONFIG
                .get()
                .map(|cfg| cfg.poll_interval)
                .unwrap_or_else(|| AppConfig::default().poll_interval);
            let (guard, schedule) = refresh_schedule(period);
            *guard_slot.borrow_mut() = Some(guard);
            info!(period_secs = schedule.period().as_secs(), "status polling started");

            schedule
                .run(
                    |delay| TimeoutFuture::new(timeout_millis(delay)),
                    || start_refresh(actions, RefreshTrigger::Schedule),
                )
                .await;
        }
    });

    StatusPanelHandle { state, actions }
}

fn start_refresh(actions: AppActions, trigger: RefreshTrigger) {
    let Some(ticket) = actions.begin_refresh(trigger) else {
        debug!(?trigger, "refresh skipped, request already in flight");
        return;
    };

    spawn(async move {
        let result = match API_CLIENT.get() {
            Some(client) if trigger == RefreshTrigger::Recompute => {
                recompute_then_fetch(client).await
            }
            Some(client) => fetch_status(client).await,
            None => Err(ClientError::Unavailable),
        };

        if let Err(ref err) = result {
            error!(?trigger, status = ?err.status(), "status refresh failed: {err}");
        }

        match actions.resolve_refresh(ticket, result) {
            ResolveOutcome::Applied => {
                debug!(?trigger, ticket = ticket.sequence(), "status refresh applied")
            }
            ResolveOutcome::Superseded => {
                debug!(?trigger, ticket = ticket.sequence(), "status refresh superseded, dropped")
            }
        }
    });
}

fn timeout_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}
