//! FloraFind Frontend Entry Point

mod app;
mod browser;
mod components;
mod context;
mod logging;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let config = context::build_config();
    logging::init(&config.log_level);
    tracing::info!(api = %config.api_url, user = config.user_id, "starting FloraFind");
    mount_to_body(move || view! { <App config=config /> });
}
