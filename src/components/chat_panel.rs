//! Chat Panel
//!
//! Message log, typeahead input, quick queries and location suggestions.

use florafind_core::chat::SAMPLE_QUERIES;
use florafind_core::flows;
use florafind_core::render::render_nlp_analysis;
use florafind_core::section::Section;
use florafind_core::SessionHandle;
use leptos::prelude::*;

use super::markup_actions::handle_markup_click;
use crate::context::use_app;
use crate::store::use_ui_store;

#[component]
pub fn ChatPanel() -> impl IntoView {
    let ctx = use_app();
    let ui = use_ui_store();

    let (input, set_input) = signal(String::new());
    let (city, set_city) = signal(String::new());

    let send = move || {
        let text = input.get_untracked();
        if text.trim().is_empty() {
            return;
        }
        set_input.set(String::new());
        ctx.spawn(move |s, c| async move {
            flows::send_message(&s, &c, &text).await;
        });
    };

    let messages = move || {
        ctx.session
            .read(|s| s.chat().messages().iter().cloned().enumerate().collect::<Vec<_>>())
    };
    let suggestions = move || ctx.session.read(|s| s.suggestions().to_vec());

    view! {
        <section id="chat" class=move || ctx.section_class(Section::Chat)>
            <div class="chat-toolbar">
                <input
                    type="text"
                    class="location-input"
                    placeholder="Your city (optional)"
                    prop:value=move || city.get()
                    on:input=move |ev| set_city.set(event_target_value(&ev))
                    on:change=move |_| {
                        let value = city.get_untracked();
                        ctx.session.with(|s| s.set_location(Some(&value)));
                    }
                />
                <button
                    class="quick-btn"
                    on:click=move |_| {
                        let value = city.get_untracked();
                        ctx.spawn(move |s, c| async move {
                            let city = Some(value.as_str()).filter(|v| !v.trim().is_empty());
                            flows::location_suggestions(&s, &c, city).await;
                        });
                    }
                >
                    "📍 Local suggestions"
                </button>
            </div>

            <div class="chat-messages" on:click=move |ev| handle_markup_click(&ev, ctx, ui)>
                <For
                    each=messages
                    key=|(i, _)| *i
                    children=move |(_, message)| {
                        let analysis = message.analysis.as_ref().map(render_nlp_analysis);
                        view! {
                            <div class=format!("message {}", message.sender.class())>
                                <div class="message-content" inner_html=message.html.clone()></div>
                                {analysis.map(|html| view! { <div class="message-analysis" inner_html=html></div> })}
                            </div>
                        }
                    }
                />
                <Show when=move || ctx.session.read(|s| s.typing())>
                    <div class="message bot typing">"🌱 FloraFind is thinking..."</div>
                </Show>
            </div>

            <div class="quick-queries">
                {SAMPLE_QUERIES.iter().take(4).map(|&query| view! {
                    <button
                        class="quick-btn"
                        on:click=move |_| ctx.spawn(move |s, c| async move {
                            flows::quick_query(&s, &c, query).await;
                        })
                    >
                        {query}
                    </button>
                }).collect_view()}
            </div>

            <div class="chat-input-area">
                <input
                    type="text"
                    class="chat-input"
                    placeholder=SAMPLE_QUERIES[0]
                    prop:value=move || input.get()
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        ctx.session.with(|s| s.update_suggestions(&value));
                        set_input.set(value);
                    }
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            send();
                        }
                    }
                />
                <button class="send-btn" on:click=move |_| send()>"Send"</button>

                <Show when=move || !suggestions().is_empty()>
                    <ul class="suggestions">
                        {move || suggestions().into_iter().map(|text| view! {
                            <li on:click=move |_| {
                                set_input.set(text.to_string());
                                ctx.session.with(|s| s.clear_suggestions());
                            }>{text}</li>
                        }).collect_view()}
                    </ul>
                </Show>
            </div>
        </section>
    }
}
