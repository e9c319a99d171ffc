use serde_json::json;
use web_sys::window;
use yew::prelude::*;

use crate::{
    config::{LogLevel, RuntimeConfig},
    cursor::{use_cursor_target, PointerTracker},
    dom::read_stored,
    hover_card::HoverCard,
    telemetry::{log_event, set_log_level},
};

#[function_component(App)]
fn app() -> Html {
    let brand = use_cursor_target();
    let backend_link = use_cursor_target();
    let primary_action = use_cursor_target();
    let secondary_action = use_cursor_target();

    html! {
        <div class="page-shell">
            <PointerTracker />

            <header class="site-header">
                <div
                    ref={brand.node}
                    class="brand"
                    data-cursor=""
                    data-cursor-size="22"
                    data-cursor-aura="120"
                    data-cursor-label="Drag me with your eyes"
                    onmouseenter={brand.onmouseenter}
                    onmouseleave={brand.onmouseleave}
                >
                    <div class="brand-mark" aria-hidden="true">{"✦"}</div>
                    <div>
                        <h1>{"Motion Playground"}</h1>
                        <p class="muted">{"Sticky cursor + playfully professional cards"}</p>
                    </div>
                </div>
                <a
                    ref={backend_link.node}
                    class="header-link"
                    href="/test"
                    data-cursor=""
                    data-cursor-size="14"
                    data-cursor-aura="110"
                    data-cursor-label="Ping backend"
                    onmouseenter={backend_link.onmouseenter}
                    onmouseleave={backend_link.onmouseleave}
                >
                    {"Backend Test"}
                </a>
            </header>

            <main id="content">
                <section class="card-grid">
                    <HoverCard
                        title="Launch Flows"
                        subtitle="Design delightful motion systems"
                        color="#2563eb"
                        icon={html! { <span aria-hidden="true">{"🚀"}</span> }}
                    />
                    <HoverCard
                        title="Gamey UX"
                        subtitle="Add playful, tasteful micro-interactions"
                        color="#7c3aed"
                        icon={html! { <span aria-hidden="true">{"🎮"}</span> }}
                    />
                    <HoverCard
                        title="Creative Edge"
                        subtitle="Invent patterns that feel fresh"
                        color="#0ea5e9"
                        icon={html! { <span aria-hidden="true">{"🎨"}</span> }}
                    />
                </section>

                <section class="cta-grid">
                    <button
                        ref={primary_action.node}
                        type="button"
                        class="cta cta-primary"
                        data-cursor=""
                        data-cursor-size="16"
                        data-cursor-aura="140"
                        data-cursor-label="Primary Action"
                        onmouseenter={primary_action.onmouseenter}
                        onmouseleave={primary_action.onmouseleave}
                    >
                        <span class="cta-label">{"Start Building"}</span>
                        <span class="cta-glow" aria-hidden="true" />
                    </button>
                    <button
                        ref={secondary_action.node}
                        type="button"
                        class="cta cta-secondary"
                        data-cursor=""
                        data-cursor-size="16"
                        data-cursor-aura="130"
                        data-cursor-label="Secondary"
                        onmouseenter={secondary_action.onmouseenter}
                        onmouseleave={secondary_action.onmouseleave}
                    >
                        <span class="cta-label">{"Try a Demo"}</span>
                        <span class="cta-glow" aria-hidden="true" />
                    </button>
                </section>
            </main>

            <footer class="site-footer">
                {"Built for playful pros. Hover anything and watch the cursor adapt."}
            </footer>
        </div>
    }
}

pub fn run() {
    let config = RuntimeConfig::from_lookup(read_stored);
    set_log_level(config.log_level);
    log_event(
        LogLevel::Info,
        "page_mounted",
        json!({ "log_level": config.log_level.as_str() }),
    );

    yew::Renderer::<App>::with_root(
        window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("app"))
            .expect("missing #app mount point"),
    )
    .render();
}
