//! FloraFind Frontend App
//!
//! Header, navigation, the four sections and the page-level overlays.

use florafind_core::ClientConfig;
use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::{
    AchievementPopup, CalendarPanel, ChatPanel, CommunityPanel, GardenPanel, NavBar, NotesEditor,
    ToastStack, WizardDialog,
};
use crate::context::AppContext;
use crate::store::UiState;

#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    let ctx = AppContext::new(config);
    provide_context(ctx);
    provide_context(Store::new(UiState::default()));

    ctx.drive_timers();
    ctx.start();

    view! {
        <div class="container">
            <header class="header">
                <h1>"🌿 FloraFind"</h1>
                <p>"Your AI-powered plant care companion"</p>
            </header>

            <NavBar />

            <main class="main-content">
                <ChatPanel />
                <GardenPanel />
                <CommunityPanel />
                <CalendarPanel />
            </main>

            // Overlays
            <ToastStack />
            <AchievementPopup />
            <WizardDialog />
            <NotesEditor />
        </div>
    }
}
