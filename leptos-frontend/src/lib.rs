use dreamspace_core::{run_pipeline, SessionController};
use leptos::logging::{error, log};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::*;
use wasm_bindgen::prelude::*;

mod api;
mod browser;
mod components;

use api::HttpOrchestrator;
use components::*;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="DreamSpace AI"/>
        <Meta name="description" content="Redesign your room from a single photo"/>
        <DreamSpace/>
    }
}

#[component]
fn DreamSpace() -> impl IntoView {
    let session = RwSignal::new(SessionController::new());
    let theme = RwSignal::new(browser::initial_theme());

    // Keep the document class and saved preference in sync
    Effect::new(move |_| browser::apply_theme(theme.get()));

    view! {
        <div class="app">
            <Navbar theme=theme/>

            <main class="container">
                <header class="hero">
                    <h1>"Redesign Your Room with AI"</h1>
                    <p>"Upload a photo, pick a style, and see your space transformed in seconds."</p>
                </header>

                <div class="workspace">
                    <div class="column">
                        <UploadSection session=session/>
                        <AspectRatioPicker session=session/>
                    </div>
                    <div class="column">
                        <StylePicker session=session/>
                        <IdeasInput session=session/>
                    </div>
                </div>

                <FailureBanner session=session/>
                <GenerateButton session=session/>
            </main>

            <ResultModal session=session/>

            <footer class="footer">
                <p>"DreamSpace AI. Visualize before you renovate."</p>
            </footer>
        </div>
    }
}

/// Runs the three pipeline calls against the backend and feeds the outcome back
/// into the session. A click while a run is in flight does nothing.
pub(crate) fn start_generation(session: RwSignal<SessionController>) {
    let mut job = None;
    session.update(|s| job = s.begin_generation());
    let Some(job) = job else {
        return;
    };

    log!("Generating {} design ({})", job.style, job.aspect_ratio);
    spawn_local(async move {
        let result = run_pipeline(&HttpOrchestrator::default(), &job).await;
        if let Err(e) = &result {
            error!("Generation failed: {}", e);
        }
        session.update(|s| s.finish_generation(result));
    });
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
