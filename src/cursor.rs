use serde_json::json;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::JsCast;
use web_sys::{window, Element, MouseEvent};
use yew::prelude::*;

use crate::{
    config::LogLevel,
    dom::{cursor_mode, random_seed, viewport_center, AnimationFrames, EventListener, RootClass},
    motion::Point,
    targets::{
        SharedRegistry, Subscription, TargetDescriptor, TargetId, AURA_ATTR, LABEL_ATTR,
        MARKER_ATTR, SIZE_ATTR,
    },
    telemetry::log_event,
    ticker::{start_ticks, TickHandle},
    tracker::{CursorMode, PointerEngine},
    trail::Particle,
};

/// Everything the tracker attaches while mounted. Dropping it detaches the
/// listeners, the registry subscription and the frame loop, and gives the
/// system cursor back.
struct TrackerGuards {
    _root_class: Option<RootClass>,
    _listeners: Vec<EventListener>,
    _subscription: Subscription,
    _ticks: TickHandle,
}

fn mount_tracker(
    mode: CursorMode,
    engine: Rc<RefCell<PointerEngine>>,
    force: UseForceUpdateHandle,
) -> Option<TrackerGuards> {
    let root_class = mode.root_class()?;
    let win = window()?;
    let mut listeners = Vec::with_capacity(3);

    {
        let engine = engine.clone();
        listeners.extend(EventListener::new(&win, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                engine.borrow_mut().pointer_moved(Point::new(
                    f64::from(event.client_x()),
                    f64::from(event.client_y()),
                ));
            }
        }));
    }
    {
        let engine = engine.clone();
        listeners.extend(EventListener::new(&win, "mousedown", move |_| {
            engine.borrow_mut().set_pressed(true);
        }));
    }
    {
        let engine = engine.clone();
        listeners.extend(EventListener::new(&win, "mouseup", move |_| {
            engine.borrow_mut().set_pressed(false);
        }));
    }

    let registry = SharedRegistry::global();
    engine.borrow_mut().apply_appearance(&registry.appearance());
    let subscription = {
        let engine = engine.clone();
        registry.subscribe(move |appearance| engine.borrow_mut().apply_appearance(appearance))
    };

    let ticks = start_ticks(Rc::new(AnimationFrames::new()), move |tick| {
        engine
            .borrow_mut()
            .tick(tick.delta_seconds, js_sys::Date::now());
        force.force_update();
    });

    log_event(
        LogLevel::Info,
        "cursor_enabled",
        json!({ "targets": registry.len() }),
    );

    Some(TrackerGuards {
        _root_class: RootClass::add(root_class),
        _listeners: listeners,
        _subscription: subscription,
        _ticks: ticks,
    })
}

fn translate_style(position: Point) -> String {
    format!(
        "transform: translate3d({:.2}px, {:.2}px, 0) translate(-50%, -50%);",
        position.x, position.y
    )
}

fn spark_style(particle: &Particle) -> String {
    format!(
        "left: {:.2}px; top: {:.2}px; opacity: {:.3}; transform: translate(-50%, -50%) scale({:.3}); background: {};",
        particle.position.x,
        particle.position.y,
        particle.opacity(),
        particle.scale(),
        particle.background()
    )
}

#[function_component(PointerTracker)]
pub fn pointer_tracker() -> Html {
    let mode = *use_memo((), |_| cursor_mode());
    let engine = use_mut_ref(|| PointerEngine::new(viewport_center(), random_seed()));
    let force = use_force_update();

    {
        let engine = engine.clone();
        use_effect_with(mode, move |mode| {
            let guards = mount_tracker(*mode, engine, force);
            if guards.is_none() {
                log_event(LogLevel::Info, "cursor_disabled_touch", json!({}));
            }
            move || drop(guards)
        });
    }

    if !mode.is_custom() {
        return Html::default();
    }

    let engine = engine.borrow();
    let appearance = engine.appearance();

    let aura_style = format!(
        "width: {:.2}px; height: {:.2}px; border-radius: {}; transform: rotate({:.2}deg); filter: blur({:.2}px);",
        engine.aura_size(),
        engine.aura_size(),
        engine.aura_border_radius(),
        engine.aura_rotate(),
        engine.aura_blur()
    );
    let core_style = format!(
        "width: {:.2}px; height: {:.2}px; transform: scale({:.3});",
        engine.core_size(),
        engine.core_size(),
        engine.press_scale()
    );
    let label_style = {
        let aura = engine.aura_position();
        format!(
            "transform: translate3d({:.2}px, {:.2}px, 0) translate(-50%, -170%);",
            aura.x, aura.y
        )
    };

    html! {
        <div class="cursor-layer" aria-hidden="true">
            { for engine.particles().iter().map(|particle| html! {
                <span key={particle.id} class="cursor-spark" style={spark_style(particle)} />
            }) }
            <div class="cursor-anchor" style={translate_style(engine.aura_position())}>
                <div
                    class={classes!("cursor-aura", appearance.hovering.then_some("is-hovering"))}
                    style={aura_style}
                />
            </div>
            <div class="cursor-anchor" style={translate_style(engine.core_position())}>
                <div class={classes!("cursor-core", engine.pressed().then_some("is-pressed"))} style={core_style}>
                    <span class="cursor-ring cursor-ring-inner" />
                    <span class="cursor-ring cursor-ring-outer" />
                </div>
            </div>
            if !appearance.label.is_empty() {
                <div class="cursor-label" style={label_style}>{appearance.label.clone()}</div>
            }
        </div>
    }
}

fn descriptor_from_element(element: &Element) -> TargetDescriptor {
    TargetDescriptor::from_attributes(
        element.get_attribute(SIZE_ATTR).as_deref(),
        element.get_attribute(AURA_ATTR).as_deref(),
        element.get_attribute(LABEL_ATTR).as_deref(),
    )
}

/// Handles a hoverable element wires up to take part in cursor styling.
pub struct CursorTarget {
    pub node: NodeRef,
    pub onmouseenter: Callback<MouseEvent>,
    pub onmouseleave: Callback<MouseEvent>,
}

/// Registers the element behind `node` with the cursor registry for as long as
/// the calling component is mounted. The element opts in with `data-cursor`
/// and may override size, aura and label with the companion attributes.
#[hook]
pub fn use_cursor_target() -> CursorTarget {
    let node = use_node_ref();
    let target = *use_memo((), |_| TargetId::next());

    {
        let node = node.clone();
        use_effect_with((), move |_| {
            let registry = SharedRegistry::global();
            let registered = node
                .cast::<Element>()
                .filter(|element| element.has_attribute(MARKER_ATTR))
                .map(|element| registry.register(target, descriptor_from_element(&element)))
                .is_some();

            move || {
                if registered {
                    registry.unregister(target);
                }
            }
        });
    }

    let onmouseenter = Callback::from(move |_: MouseEvent| SharedRegistry::global().pointer_enter(target));
    let onmouseleave = Callback::from(move |_: MouseEvent| SharedRegistry::global().pointer_leave(target));

    CursorTarget {
        node,
        onmouseenter,
        onmouseleave,
    }
}
