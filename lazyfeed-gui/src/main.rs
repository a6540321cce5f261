#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![allow(clippy::new_without_default, clippy::type_complexity)]

mod cmd;
mod controller;
mod data;
mod delegate;
mod error;
mod source;
mod ui;
mod widget;

use std::sync::Arc;

use druid::AppLauncher;
use env_logger::{Builder, Env};
use lazyfeed_core::source::SyntheticSource;

use crate::{
    data::{AppState, Config},
    delegate::Delegate,
};

const ENV_LOG: &str = "LAZYFEED_LOG";
const ENV_LOG_STYLE: &str = "LAZYFEED_LOG_STYLE";

fn main() {
    // Setup logging from the env variables, with defaults.
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "info")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    // Load configuration
    let config = Config::load().unwrap_or_default();

    source::install_as_global(Arc::new(SyntheticSource));
    let state = AppState::default_with_config(config, source::global().as_ref());

    let window = ui::main_window();
    let delegate = Delegate::with_main(window.id);
    AppLauncher::with_window(window)
        .configure_env(ui::theme::setup)
        .delegate(delegate)
        .launch(state)
        .expect("Application launch");
}
