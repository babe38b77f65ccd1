use dreamspace_core::styles::style_entry;
use dreamspace_core::{AspectRatio, SessionController, Theme, ViewMode, DESIGN_STYLES};
use leptos::logging::warn;
use leptos::prelude::*;

use crate::browser;

#[component]
pub fn Navbar(theme: RwSignal<Theme>) -> impl IntoView {
    view! {
        <nav class="navbar">
            <div class="navbar-inner">
                <div class="brand">
                    <div class="brand-mark">"D"</div>
                    <span class="brand-name">"DreamSpace " <span class="brand-suffix">"AI"</span></span>
                </div>
                <button
                    class="theme-toggle"
                    aria-label="Toggle Theme"
                    on:click=move |_| theme.update(|t| *t = t.toggled())
                >
                    {move || if theme.get().is_dark() {
                        view! {
                            <svg class="icon" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 3v1m0 16v1m9-9h-1M4 12H3m15.364-6.364l-.707.707M6.343 17.657l-.707.707M17.657 17.657l-.707-.707M6.343 6.343l-.707-.707M12 5a7 7 0 100 14 7 7 0 000-14z"/>
                            </svg>
                        }.into_any()
                    } else {
                        view! {
                            <svg class="icon" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                                <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M20.354 15.354A9 9 0 018.646 3.646 9.003 9.003 0 0012 21a9.003 9.003 0 008.354-5.646z"/>
                            </svg>
                        }.into_any()
                    }}
                </button>
            </div>
        </nav>
    }
}

#[component]
pub fn UploadSection(session: RwSignal<SessionController>) -> impl IntoView {
    let file_input_ref = NodeRef::<leptos::html::Input>::new();

    let open_picker = move |_| {
        if let Some(input) = file_input_ref.get() {
            input.click();
        }
    };

    let on_file_change = move |_| {
        let Some(file) = file_input_ref
            .get()
            .and_then(|input| input.files())
            .and_then(|files| files.get(0))
        else {
            return;
        };
        browser::read_as_data_url(file, move |data_url| {
            session.update(|s| {
                if let Err(e) = s.upload_image(data_url) {
                    warn!("Upload rejected: {}", e);
                }
            });
        });
    };

    let preview = move || session.with(|s| s.original_image().map(|image| image.as_str().to_string()));

    view! {
        <section class="panel">
            <h2>"Upload Your Room Photo"</h2>
            <div class="upload-surface" on:click=open_picker>
                {move || match preview() {
                    Some(src) => view! { <img src=src class="upload-preview" alt="Uploaded Room"/> }.into_any(),
                    None => view! {
                        <div class="upload-placeholder">
                            <div class="upload-plus">
                                <svg class="icon" fill="none" stroke="currentColor" viewBox="0 0 24 24">
                                    <path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 4v16m8-8H4"/>
                                </svg>
                            </div>
                            <p>"Upload Room"</p>
                        </div>
                    }.into_any(),
                }}
            </div>
            <input
                type="file"
                class="hidden"
                accept="image/*"
                node_ref=file_input_ref
                on:change=on_file_change
            />
            <Show when=move || session.with(|s| s.original_image().is_some())>
                <button class="link-button" on:click=open_picker>"Change Photo"</button>
            </Show>
        </section>
    }
}

#[component]
pub fn StylePicker(session: RwSignal<SessionController>) -> impl IntoView {
    view! {
        <section class="panel">
            <h2>"Choose a Style"</h2>
            <div class="style-grid">
                {DESIGN_STYLES
                    .iter()
                    .map(|entry| {
                        let style = entry.id;
                        view! {
                            <button
                                class="choice style-card"
                                class:selected=move || session.with(|s| s.selected_style() == style)
                                on:click=move |_| session.update(|s| s.select_style(style))
                            >
                                <svg class="style-icon" fill="currentColor" viewBox="0 0 24 24">
                                    <path d=entry.icon_path/>
                                </svg>
                                <span>{entry.name}</span>
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
pub fn IdeasInput(session: RwSignal<SessionController>) -> impl IntoView {
    view! {
        <section class="panel section-divider">
            <h2>"Add Your Own Ideas (Optional)"</h2>
            <textarea
                class="ideas"
                placeholder="E.g., Add a yellow lamp on the left corner and the TV should be on the middle wall..."
                prop:value=move || session.with(|s| s.custom_ideas().to_string())
                on:input=move |ev| session.update(|s| s.set_custom_ideas(event_target_value(&ev)))
            ></textarea>
        </section>
    }
}

#[component]
pub fn AspectRatioPicker(session: RwSignal<SessionController>) -> impl IntoView {
    view! {
        <section class="panel">
            <h2>"Choose Aspect Ratio"</h2>
            <div class="ratio-grid">
                {AspectRatio::ALL
                    .into_iter()
                    .map(|ratio| view! {
                        <button
                            class="choice ratio"
                            class:selected=move || session.with(|s| s.aspect_ratio() == ratio)
                            on:click=move |_| session.update(|s| s.select_aspect_ratio(ratio))
                        >
                            {ratio.as_str()}
                        </button>
                    })
                    .collect_view()}
            </div>
        </section>
    }
}

#[component]
pub fn FailureBanner(session: RwSignal<SessionController>) -> impl IntoView {
    let failure = move || session.with(|s| s.last_failure().cloned());

    view! {
        {move || failure().map(|failure| view! {
            <div class="error">
                <p>
                    "We couldn't finish your design: " {failure.stage.label()} " failed. "
                    <span class="error-detail">{failure.message}</span>
                </p>
                <button class="link-button" on:click=move |_| session.update(|s| s.dismiss_failure())>
                    "Dismiss"
                </button>
            </div>
        })}
    }
}

#[component]
pub fn GenerateButton(session: RwSignal<SessionController>) -> impl IntoView {
    let processing = move || session.with(|s| s.is_processing());

    view! {
        <div class="generate-row">
            <button
                class="generate-button"
                disabled=move || !session.with(|s| s.can_generate())
                on:click=move |_| crate::start_generation(session)
            >
                {move || if processing() {
                    view! { <span class="spinner"></span> "Creating Magic..." }.into_any()
                } else {
                    "Generate My New Room!".into_any()
                }}
            </button>
            <Show when=move || session.with(|s| s.transformation().is_some() && !s.show_modal())>
                <button class="link-button" on:click=move |_| session.update(|s| s.open_modal())>
                    "View Last Design"
                </button>
            </Show>
        </div>
    }
}

#[component]
pub fn ResultModal(session: RwSignal<SessionController>) -> impl IntoView {
    let design = move || session.with(|s| s.transformation().cloned());
    let view_mode = move || session.with(|s| s.view_mode());
    let style_name = move || session.with(|s| s.transformation().map(|t| style_entry(t.style).name).unwrap_or_default());

    let shown_image = move || {
        session.with(|s| match s.view_mode() {
            ViewMode::After => s
                .transformation()
                .and_then(|t| t.generated_image_base64.as_ref())
                .map(|image| image.as_str().to_string())
                .unwrap_or_default(),
            ViewMode::Before => s
                .original_image()
                .map(|image| image.as_str().to_string())
                .unwrap_or_default(),
        })
    };

    let download = move |_| {
        if let Some(image) = session.with(|s| s.download()) {
            browser::save_image(&image);
        }
    };

    view! {
        <Show when=move || session.with(|s| s.show_modal() && s.transformation().is_some())>
            <div class="modal-backdrop">
                <div class="modal">
                    <div class="modal-image">
                        <div class="image-badge">
                            {move || if view_mode() == ViewMode::After { "AI Redesign" } else { "Original Photo" }}
                        </div>
                        <img src=shown_image alt="Transformation View"/>
                        <div class="view-toggle">
                            <button
                                class:active=move || view_mode() == ViewMode::Before
                                on:click=move |_| session.update(|s| s.set_view_mode(ViewMode::Before))
                            >
                                "Original"
                            </button>
                            <button
                                class:active=move || view_mode() == ViewMode::After
                                on:click=move |_| session.update(|s| s.set_view_mode(ViewMode::After))
                            >
                                {style_name} " AI"
                            </button>
                        </div>
                    </div>

                    <aside class="modal-details">
                        <div class="modal-header">
                            <div>
                                <h3>"Transformation Complete"</h3>
                                <p class="style-tag">{style_name} " Style"</p>
                            </div>
                            <button class="close-button" on:click=move |_| session.update(|s| s.close_modal())>
                                "×"
                            </button>
                        </div>

                        {move || design().map(|design| view! {
                            <div class="details">
                                <div class="card">
                                    <h4>"Color Palette"</h4>
                                    <p class="palette">{design.color_palette}</p>
                                </div>
                                <div>
                                    <h4>"Core Elements"</h4>
                                    <div class="chips">
                                        {design
                                            .furniture_recommendations
                                            .into_iter()
                                            .map(|item| view! { <span class="chip">{item}</span> })
                                            .collect_view()}
                                    </div>
                                </div>
                                <div>
                                    <h4>"Lighting & Ambiance"</h4>
                                    <p class="muted">{design.lighting_plan}</p>
                                </div>
                                <blockquote class="summary">{design.summary}</blockquote>
                            </div>
                        })}

                        <div class="modal-actions">
                            <button class="primary" on:click=download>"Download Design"</button>
                            <div class="action-row">
                                <button class="secondary" on:click=move |_| session.update(|s| s.close_modal())>
                                    "Keep Editing"
                                </button>
                                <button class="outline" on:click=move |_| session.update(|s| s.reset())>
                                    "Start New"
                                </button>
                            </div>
                        </div>
                    </aside>
                </div>
            </div>
        </Show>
    }
}
