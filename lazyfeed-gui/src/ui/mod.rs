use druid::{
    widget::{CrossAxisAlignment, Flex, Label, Maybe, ViewSwitcher},
    Widget, WidgetExt, WindowDesc,
};

use crate::{
    cmd,
    data::{AppState, Nav, Theme},
    widget::ThemeScope,
};

pub mod feed;
pub mod theme;
pub mod utils;

pub fn main_window() -> WindowDesc<AppState> {
    WindowDesc::new(root_widget())
        .title("Lazyfeed")
        .with_min_size((theme::grid(40.0), theme::grid(40.0)))
        .window_size((theme::grid(60.0), theme::grid(90.0)))
}

fn root_widget() -> impl Widget<AppState> {
    let error = Maybe::or_empty(utils::error_widget).lens(AppState::error);

    let main = Flex::column()
        .cross_axis_alignment(CrossAxisAlignment::Fill)
        .with_child(topbar_widget())
        .with_child(error)
        .with_flex_child(route_widget(), 1.0)
        .background(theme::BACKGROUND_LIGHT);

    ThemeScope::new(|state: &AppState| state.config.theme, main)
}

fn topbar_widget() -> impl Widget<AppState> {
    let count = Label::dynamic(|state: &AppState, _| match state.len() {
        1 => "1 post".to_string(),
        n => format!("{} posts", n),
    })
    .with_text_size(theme::TEXT_SIZE_SMALL)
    .with_text_color(theme::PLACEHOLDER_COLOR);

    let reload = Label::new("Reload")
        .padding((theme::grid(1.5), theme::grid(1.0)))
        .on_click(|ctx, _, _| ctx.submit_command(cmd::RELOAD));

    let toggle_theme = Label::dynamic(|state: &AppState, _| match state.config.theme {
        Theme::Light => "Dark".to_string(),
        Theme::Dark => "Light".to_string(),
    })
    .padding((theme::grid(1.5), theme::grid(1.0)))
    .on_click(|_, state: &mut AppState, _| {
        state.config.theme = match state.config.theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        };
    });

    Flex::row()
        .with_child(nav_button_widget(Nav::ScrollTrigger))
        .with_child(nav_button_widget(Nav::SentinelTrigger))
        .with_flex_spacer(1.0)
        .with_child(count)
        .with_default_spacer()
        .with_child(reload)
        .with_child(toggle_theme)
        .padding((theme::grid(1.0), theme::grid(0.5)))
        .background(theme::BACKGROUND_DARK)
}

fn nav_button_widget(nav: Nav) -> impl Widget<AppState> {
    Label::new(nav.title())
        .with_font(theme::UI_FONT_MEDIUM)
        .padding((theme::grid(1.5), theme::grid(1.0)))
        .env_scope(move |env, state: &AppState| {
            if nav == state.nav {
                env.set(theme::TEXT_COLOR, env.get(theme::NAV_FG_ACTIVE));
            } else {
                env.set(theme::TEXT_COLOR, env.get(theme::NAV_FG_INACTIVE));
            }
        })
        .on_click(move |ctx, _, _| ctx.submit_command(cmd::NAVIGATE.with(nav)))
}

/// Rebuilds the screen for every freshly mounted feed, so controllers of the
/// previous feed never see the new one.
fn route_widget() -> impl Widget<AppState> {
    ViewSwitcher::new(
        |state: &AppState, _| (state.nav, state.generation()),
        |&(nav, _), _, _| match nav {
            Nav::ScrollTrigger => feed::scroll_screen().boxed(),
            Nav::SentinelTrigger => feed::sentinel_screen().boxed(),
        },
    )
}
