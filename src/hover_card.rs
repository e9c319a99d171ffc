use std::rc::Rc;
use web_sys::{Element, MouseEvent};
use yew::prelude::*;

use crate::{
    card::{pegs, CardAnimator, HoverCardModel, DEFAULT_ACCENT},
    dom::{bounding_rect, AnimationFrames},
    motion::Point,
};

#[derive(Properties, PartialEq)]
pub struct HoverCardProps {
    pub title: AttrValue,
    pub subtitle: AttrValue,
    pub icon: Html,
    #[prop_or(AttrValue::from(DEFAULT_ACCENT))]
    pub color: AttrValue,
}

#[function_component(HoverCard)]
pub fn hover_card(props: &HoverCardProps) -> Html {
    let node = use_node_ref();
    let model = use_mut_ref(HoverCardModel::default);
    let force = use_force_update();
    let animator = {
        let model = model.clone();
        use_mut_ref(move || CardAnimator::new(model, Rc::new(AnimationFrames::new())))
    };

    let wake = {
        let animator = animator.clone();
        let force = force.clone();
        move || {
            let force = force.clone();
            animator
                .borrow_mut()
                .wake(move || force.force_update());
        }
    };

    let onmousemove = {
        let node = node.clone();
        let model = model.clone();
        let wake = wake.clone();
        Callback::from(move |event: MouseEvent| {
            let Some(element) = node.cast::<Element>() else {
                return;
            };
            let client = Point::new(f64::from(event.client_x()), f64::from(event.client_y()));
            model.borrow_mut().pointer_moved(client, bounding_rect(&element));
            force.force_update();
            wake();
        })
    };

    let onmouseenter = {
        let model = model.clone();
        let wake = wake.clone();
        Callback::from(move |_: MouseEvent| {
            model.borrow_mut().pointer_enter();
            wake();
        })
    };

    let onmouseleave = {
        let model = model.clone();
        Callback::from(move |_: MouseEvent| {
            model.borrow_mut().pointer_leave();
            wake();
        })
    };

    let color = props.color.clone();
    let model = model.borrow();
    let tilt = model.tilt();
    let pegs = pegs();

    let card_style = format!(
        "transform: perspective(900px) rotateX({:.3}deg) rotateY({:.3}deg); background-image: {};",
        tilt.rotate_x,
        tilt.rotate_y,
        model.highlight()
    );
    let ring_style = format!(
        "background: radial-gradient(circle, {color}22, transparent 60%); transform: rotate({:.2}deg) scale({:.3});",
        model.ring_rotate(),
        model.ring_scale()
    );
    let puck_style = format!(
        "background: {color}; box-shadow: 0 12px 28px {color}55; transform: translateY({:.2}px) rotate({:.2}deg);",
        model.puck_lift(),
        model.puck_rotate()
    );
    let chase = model.chase_position();
    let visibility = model.chase_visibility();
    let chase_style = format!(
        "transform: translate(-50%, -50%) translate3d({:.2}px, {:.2}px, 0) scale({:.3}); opacity: {:.3};",
        chase.x,
        chase.y,
        visibility.max(0.0),
        visibility.clamp(0.0, 1.0)
    );
    let progress_style = format!(
        "background: {color}; width: {:.2}%;",
        model.progress_percent()
    );

    html! {
        <div
            ref={node}
            class={classes!("hover-card", model.hovered().then_some("is-hovered"))}
            style={card_style}
            onmousemove={onmousemove}
            onmouseenter={onmouseenter}
            onmouseleave={onmouseleave}
        >
            <div class="hover-card-ring" style={ring_style} />
            <div class="hover-card-puck" style={puck_style}>{props.icon.clone()}</div>

            <div class="hover-card-copy">
                <h3>{props.title.clone()}</h3>
                <p>{props.subtitle.clone()}</p>
            </div>

            { for pegs.iter().map(|peg| html! {
                <span
                    key={peg.index}
                    class="hover-card-peg"
                    style={format!(
                        "left: calc(50% + {:.2}px); top: calc(50% + {:.2}px); background: {color}; transform: translateY({:.2}px);",
                        peg.position.x,
                        peg.position.y,
                        model.peg_lift(peg)
                    )}
                />
            }) }

            <span class="hover-card-chaser" style={chase_style} />

            <div class="hover-card-track">
                <span class="hover-card-progress" style={progress_style} />
            </div>
        </div>
    }
}
