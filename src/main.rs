//! Inventory Dashboard Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod controller;
mod filter;
mod logger;
mod models;
mod notify;
mod store;
mod validation;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logger::init(logger::default_level());
    mount_to_body(App);
}
