pub use druid::theme::*;
use druid::{Color, Env, FontDescriptor, FontFamily, FontWeight, Insets, Key};

use crate::data::{AppState, Theme};

pub fn grid(m: f64) -> f64 {
    GRID * m
}

pub const GRID: f64 = 8.0;

pub const GREY_000: Key<Color> = Key::new("app.grey_000");
pub const GREY_100: Key<Color> = Key::new("app.grey_100");
pub const GREY_200: Key<Color> = Key::new("app.grey_200");
pub const GREY_300: Key<Color> = Key::new("app.grey_300");
pub const GREY_400: Key<Color> = Key::new("app.grey_400");
pub const GREY_500: Key<Color> = Key::new("app.grey_500");
pub const GREY_600: Key<Color> = Key::new("app.grey_600");
pub const GREY_700: Key<Color> = Key::new("app.grey_700");
pub const BLUE_100: Key<Color> = Key::new("app.blue_100");
pub const BLUE_200: Key<Color> = Key::new("app.blue_200");
pub const RED: Key<Color> = Key::new("app.red");

pub const NAV_FG_ACTIVE: Key<Color> = Key::new("app.nav-fg-active");
pub const NAV_FG_INACTIVE: Key<Color> = Key::new("app.nav-fg-inactive");
pub const CARD_BACKGROUND: Key<Color> = Key::new("app.card-background");

pub const UI_FONT_MEDIUM: Key<FontDescriptor> = Key::new("app.ui-font-medium");
pub const TEXT_SIZE_SMALL: Key<f64> = Key::new("app.text-size-small");

pub fn setup(env: &mut Env, state: &AppState) {
    setup_theme(env, state.config.theme);
}

pub fn setup_theme(env: &mut Env, theme: Theme) {
    match theme {
        Theme::Light => setup_light_theme(env),
        Theme::Dark => setup_dark_theme(env),
    };

    env.set(WINDOW_BACKGROUND_COLOR, env.get(GREY_700));
    env.set(TEXT_COLOR, env.get(GREY_100));
    env.set(PLACEHOLDER_COLOR, env.get(GREY_300));
    env.set(PRIMARY_LIGHT, env.get(BLUE_100));
    env.set(PRIMARY_DARK, env.get(BLUE_200));

    env.set(BACKGROUND_LIGHT, env.get(GREY_700));
    env.set(BACKGROUND_DARK, env.get(GREY_600));
    env.set(FOREGROUND_LIGHT, env.get(GREY_100));
    env.set(FOREGROUND_DARK, env.get(GREY_000));

    env.set(BUTTON_DARK, env.get(GREY_600));
    env.set(BUTTON_LIGHT, env.get(GREY_700));
    env.set(BUTTON_BORDER_RADIUS, 4.0);
    env.set(BUTTON_BORDER_WIDTH, 1.0);

    env.set(BORDER_DARK, env.get(GREY_400));
    env.set(BORDER_LIGHT, env.get(GREY_500));

    env.set(NAV_FG_ACTIVE, env.get(GREY_000));
    env.set(NAV_FG_INACTIVE, env.get(GREY_300));
    env.set(CARD_BACKGROUND, env.get(GREY_600));

    env.set(
        UI_FONT,
        FontDescriptor::new(FontFamily::SYSTEM_UI).with_size(13.0),
    );
    env.set(
        UI_FONT_MEDIUM,
        FontDescriptor::new(FontFamily::SYSTEM_UI)
            .with_size(13.0)
            .with_weight(FontWeight::MEDIUM),
    );
    env.set(TEXT_SIZE_SMALL, 11.0);
    env.set(TEXT_SIZE_NORMAL, 13.0);
    env.set(TEXT_SIZE_LARGE, 16.0);

    env.set(BASIC_WIDGET_HEIGHT, grid(3.0));
    env.set(WIDE_WIDGET_WIDTH, grid(12.0));
    env.set(BORDERED_WIDGET_HEIGHT, grid(4.0));

    env.set(SCROLLBAR_BORDER_COLOR, env.get(GREY_300));
    env.set(SCROLLBAR_MAX_OPACITY, 0.8);
    env.set(SCROLLBAR_FADE_DELAY, 1500u64);
    env.set(SCROLLBAR_WIDTH, 6.0);
    env.set(SCROLLBAR_PAD, 2.0);
    env.set(SCROLLBAR_RADIUS, 5.0);
    env.set(SCROLLBAR_EDGE_WIDTH, 1.0);

    env.set(WIDGET_PADDING_VERTICAL, grid(0.5));
    env.set(WIDGET_PADDING_HORIZONTAL, grid(1.0));
    env.set(
        TEXTBOX_INSETS,
        Insets::new(grid(1.2), grid(1.0), grid(1.2), grid(1.0)),
    );
}

fn setup_light_theme(env: &mut Env) {
    env.set(GREY_000, Color::grey8(0x00));
    env.set(GREY_100, Color::grey8(0x33));
    env.set(GREY_200, Color::grey8(0x4f));
    env.set(GREY_300, Color::grey8(0x82));
    env.set(GREY_400, Color::grey8(0xbd));
    env.set(GREY_500, Color::rgb8(0xe5, 0xe6, 0xe7));
    env.set(GREY_600, Color::rgb8(0xf5, 0xf6, 0xf7));
    env.set(GREY_700, Color::WHITE);
    env.set(BLUE_100, Color::rgb8(0x5c, 0xc4, 0xff));
    env.set(BLUE_200, Color::rgb8(0x00, 0x8d, 0xdd));
    env.set(RED, Color::rgba8(0xEB, 0x57, 0x57, 0xFF));
    env.set(SCROLLBAR_COLOR, env.get(GREY_300));
}

fn setup_dark_theme(env: &mut Env) {
    env.set(GREY_000, Color::grey8(0xff));
    env.set(GREY_100, Color::grey8(0xf2));
    env.set(GREY_200, Color::grey8(0xe0));
    env.set(GREY_300, Color::grey8(0xbd));
    env.set(GREY_400, Color::grey8(0x82));
    env.set(GREY_500, Color::grey8(0x4f));
    env.set(GREY_600, Color::grey8(0x33));
    env.set(GREY_700, Color::grey8(0x28));
    env.set(BLUE_100, Color::rgb8(0x0a, 0x63, 0xa5));
    env.set(BLUE_200, Color::rgb8(0x5c, 0xc4, 0xff));
    env.set(RED, Color::rgba8(0xEB, 0x57, 0x57, 0xFF));
    env.set(SCROLLBAR_COLOR, env.get(GREY_500));
}
