#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod card;
mod config;
mod motion;
mod targets;
mod telemetry;
mod ticker;
mod tracker;
mod trail;

#[cfg(target_arch = "wasm32")]
mod cursor;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod frontend;
#[cfg(target_arch = "wasm32")]
mod hover_card;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("This project is frontend-only. Run `trunk serve` or `trunk build --release`.");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    frontend::run();
}
