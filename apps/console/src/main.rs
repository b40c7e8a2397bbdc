#![allow(non_snake_case)]

mod api;
mod config;
mod hooks;
mod models;
mod services;
mod state;
mod ui;

use api::{ClientError, StatusClient};
use config::AppConfig;
use dioxus::prelude::*;
use dioxus_router::prelude::*;
use once_cell::sync::OnceCell;
use state::AppState;
use tracing::{error, info};
use ui::status::StatusPanel;

pub(crate) static APP_CONFIG: OnceCell<AppConfig> = OnceCell::new();
pub(crate) static API_CLIENT: OnceCell<StatusClient> = OnceCell::new();

fn main() {
    console_error_panic_hook::set_once();
    let config = AppConfig::from_env();
    init_logging(&config);
    bootstrap_infrastructure(config);
    launch(App);
}

fn init_logging(config: &AppConfig) {
    static INIT: std::sync::Once = std::sync::Once::new();
    let level = config.profile.log_level();
    INIT.call_once(|| {
        let _ = dioxus_logger::init(level);
    });
}

fn bootstrap_infrastructure(config: AppConfig) {
    let _ = APP_CONFIG.set(config.clone());

    match StatusClient::new(config) {
        Ok(client) => {
            info!(status_url = client.status_url(), "status client initialized");
            let _ = API_CLIENT.set(client);
        }
        Err(err) => {
            report_client_error("failed to initialise status client", &err);
        }
    }
}

fn report_client_error(context: &str, err: &ClientError) {
    error!(%context, ?err, status = ?err.status(), "api bootstrap error");
}

#[component]
fn App() -> Element {
    let app_state = use_signal(AppState::default);

    use_context_provider(|| app_state);

    rsx! {
        div { class: "relative",
            Router::<Route> {}
        }
    }
}

#[derive(Clone, Routable, Debug, PartialEq)]
enum Route {
    #[route("/")]
    Dashboard {},
}

#[component]
fn Dashboard() -> Element {
    rsx! {
        div { class: "app-shell mx-auto mt-12 max-w-xl space-y-4",
            StatusPanel {}
        }
    }
}
