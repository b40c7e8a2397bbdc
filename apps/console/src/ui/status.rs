//! Order status panel
//!
//! Shows the order counters and the refresh controls.

use dioxus::prelude::*;
use time::macros::format_description;

use crate::hooks::status::use_status_panel;
use crate::models::StatusSnapshot;
use crate::state::{PanelModel, PanelStatus};

const MISSING_VALUE: &str = "–";
const BUSY_LABEL: &str = "Ładowanie...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterRow {
    pub label: &'static str,
    pub value: String,
    pub emphasized: bool,
}

/// Everything the panel renders, derived from the panel state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelView {
    pub busy: bool,
    pub error: Option<String>,
    pub counters: Vec<CounterRow>,
    pub server_timestamp: Option<String>,
    pub fetched_at: Option<String>,
}

impl PanelView {
    pub fn from_model(model: &PanelModel) -> Self {
        let clock = format_description!("[hour]:[minute]:[second]");

        Self {
            busy: matches!(model.status(), PanelStatus::Loading { .. }),
            error: model.error().map(str::to_string),
            counters: model.snapshot().map(counter_rows).unwrap_or_default(),
            server_timestamp: model.snapshot().and_then(|s| s.timestamp.clone()),
            fetched_at: model
                .last_fetched_at()
                .and_then(|at| at.format(&clock).ok()),
        }
    }
}

/// Label for a refresh control; every control reads the same while a request is in flight.
pub fn control_label(busy: bool, idle: &'static str) -> &'static str {
    if busy {
        BUSY_LABEL
    } else {
        idle
    }
}

pub fn counter_rows(snapshot: &StatusSnapshot) -> Vec<CounterRow> {
    let row = |label, value: &str, emphasized| CounterRow {
        label,
        value: value.to_string(),
        emphasized,
    };

    vec![
        row("Realizowane", &snapshot.realized, false),
        row("Oczekuje", &snapshot.pending, false),
        row("Nie dodane", &snapshot.not_added, false),
        row(
            "Wykonane",
            snapshot.completed.as_deref().unwrap_or(MISSING_VALUE),
            false,
        ),
        row("Wszystkie", &snapshot.combined, true),
    ]
}

#[component]
pub fn StatusPanel() -> Element {
    let panel = use_status_panel();
    let view = PanelView::from_model(&panel.state.read().panel);
    let busy = view.busy;
    let recompute_label = control_label(busy, "Przelicz");
    let refresh_label = control_label(busy, "Odśwież");

    let body = if let Some(ref err) = view.error {
        rsx! { p { class: "text-sm text-red-500", "{err}" } }
    } else if view.counters.is_empty() {
        if busy {
            rsx! { p { class: "text-xs text-slate-500", "{BUSY_LABEL}" } }
        } else {
            rsx! { p { class: "text-xs text-slate-500 italic", "Brak danych" } }
        }
    } else {
        rsx! {
            div { class: if busy { "space-y-1 opacity-60" } else { "space-y-1" },
                for row in view.counters.iter() {
                    h5 {
                        key: "{row.label}",
                        class: if row.emphasized { "pt-5 text-base text-slate-100" } else { "text-base text-slate-100" },
                        "{row.label}: "
                        strong { "{row.value}" }
                    }
                }
                div { class: "flex flex-wrap gap-4 pt-3 text-[11px] text-slate-300",
                    if let Some(ref ts) = view.server_timestamp {
                        span { "Aktualizacja: {ts}" }
                    }
                    if let Some(ref at) = view.fetched_at {
                        span { "Pobrano: {at} UTC" }
                    }
                }
            }
        }
    };

    rsx! {
        section { class: "rounded-lg bg-slate-900 p-5 text-slate-100 shadow-sm space-y-3",
            div { class: "flex gap-2",
                button {
                    class: "rounded bg-blue-600 px-4 py-2 text-xs font-semibold text-white hover:bg-blue-500 disabled:opacity-50 disabled:cursor-not-allowed",
                    disabled: busy,
                    onclick: move |_| panel.refresh_and_recompute(),
                    "{recompute_label}"
                }
                button {
                    class: "rounded bg-slate-600 px-4 py-2 text-xs font-semibold text-white hover:bg-slate-500 disabled:opacity-50 disabled:cursor-not-allowed",
                    disabled: busy,
                    onclick: move |_| panel.refresh(),
                    "{refresh_label}"
                }
            }
            div { class: "min-h-[50px] rounded border border-slate-700 bg-slate-700/60 p-3",
                {body}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientError, GENERIC_FAILURE_MESSAGE};
    use crate::state::RefreshTrigger;
    use reqwest::StatusCode;
    use time::macros::datetime;

    fn snapshot() -> StatusSnapshot {
        StatusSnapshot {
            realized: "12".into(),
            pending: "3".into(),
            not_added: "5".into(),
            combined: "20".into(),
            completed: Some("41".into()),
            timestamp: Some("14:05".into()),
        }
    }

    fn loaded(snapshot: StatusSnapshot) -> PanelModel {
        let mut model = PanelModel::default();
        let ticket = model.begin(RefreshTrigger::Mount).unwrap();
        model.resolve(ticket, Ok(snapshot), datetime!(2026-10-19 13:05:09 UTC));
        model
    }

    #[test]
    fn ok_response_renders_five_counters_and_timestamp() {
        let view = PanelView::from_model(&loaded(snapshot()));

        let rendered: Vec<(&str, &str)> = view
            .counters
            .iter()
            .map(|row| (row.label, row.value.as_str()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("Realizowane", "12"),
                ("Oczekuje", "3"),
                ("Nie dodane", "5"),
                ("Wykonane", "41"),
                ("Wszystkie", "20"),
            ]
        );
        assert_eq!(view.server_timestamp.as_deref(), Some("14:05"));
        assert_eq!(view.fetched_at.as_deref(), Some("13:05:09"));
        assert!(view.error.is_none());
        assert!(!view.busy);
    }

    #[test]
    fn missing_completed_still_yields_five_rows() {
        let view = PanelView::from_model(&loaded(StatusSnapshot {
            completed: None,
            ..snapshot()
        }));
        assert_eq!(view.counters.len(), 5);
        assert_eq!(view.counters[3].value, MISSING_VALUE);
        assert!(view.counters[4].emphasized);
    }

    #[test]
    fn failed_response_renders_error_and_no_counters() {
        let mut model = loaded(snapshot());
        let ticket = model.begin(RefreshTrigger::Schedule).unwrap();
        model.resolve(
            ticket,
            Err(ClientError::UnexpectedStatus {
                status: StatusCode::NOT_FOUND,
                body: Vec::new(),
            }),
            datetime!(2026-10-19 13:10 UTC),
        );

        let view = PanelView::from_model(&model);
        assert_eq!(view.error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
        assert!(view.counters.is_empty());
        assert!(view.server_timestamp.is_none());
        assert!(view.fetched_at.is_none());
    }

    #[test]
    fn controls_are_disabled_while_in_flight() {
        let mut model = loaded(snapshot());
        model.begin(RefreshTrigger::Manual).unwrap();

        let view = PanelView::from_model(&model);
        assert!(view.busy);
        assert_eq!(control_label(view.busy, "Przelicz"), BUSY_LABEL);
        assert_eq!(control_label(view.busy, "Odśwież"), BUSY_LABEL);
        assert_eq!(view.counters.len(), 5);
        assert!(view.error.is_none());
    }

    #[test]
    fn idle_controls_keep_their_own_labels() {
        let view = PanelView::from_model(&loaded(snapshot()));
        assert_eq!(control_label(view.busy, "Przelicz"), "Przelicz");
        assert_eq!(control_label(view.busy, "Odśwież"), "Odśwież");
    }
}
