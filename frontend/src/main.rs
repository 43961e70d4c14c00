#![cfg_attr(
    all(not(target_arch = "wasm32"), not(feature = "desktop")),
    allow(dead_code, unused_imports)
)]

#[macro_use]
mod logging;

mod app;
mod home;
mod issue_page;

#[cfg(target_arch = "wasm32")]
fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

#[cfg(not(target_arch = "wasm32"))]
fn init_panic_hook() {}

#[cfg(target_arch = "wasm32")]
fn init_logger() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logger() {
    logging::install_stdout_logger();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    init_panic_hook();
    init_logger();
    dioxus::launch(app::App);
}

#[cfg(all(not(target_arch = "wasm32"), feature = "desktop"))]
fn main() {
    use dioxus::prelude::LaunchBuilder;

    init_panic_hook();
    init_logger();
    let cfg = dioxus_desktop::Config::new()
        .with_window(dioxus_desktop::WindowBuilder::new().with_title("civix"));
    LaunchBuilder::desktop().with_cfg(cfg).launch(app::App);
}

#[cfg(all(not(target_arch = "wasm32"), not(feature = "desktop")))]
fn main() {
    init_panic_hook();
    init_logger();
    log::error!(
        "civix was built without a renderer; rebuild with `--features desktop` or for wasm32"
    );
}
