use std::sync::Arc;

use druid::{
    im::Vector,
    kurbo::Circle,
    lens::Map,
    widget::{
        CrossAxisAlignment, Either, Flex, Label, LineBreaking, List, Painter, Scroll, SizedBox,
        ViewSwitcher,
    },
    Color, Env, RenderContext, Widget, WidgetExt,
};
use lazyfeed_core::{post::Post, sentinel::AppearanceKey};

use crate::{
    cmd,
    data::AppState,
    source,
    widget::{MyWidgetExt, ScrollExt},
};

use super::{theme, utils};

/// Vertical extent of one post row, the lists below lay rows out back to back.
pub const CARD_EXTENT: f64 = theme::GRID * 10.0;

const AVATAR_SIZE: f64 = theme::GRID * 5.0;

pub fn scroll_screen() -> impl Widget<AppState> {
    let posts = Scroll::new(post_list())
        .vertical()
        .on_bottom_reached(CARD_EXTENT, AppState::len, |ctx, state, _| {
            if let Some(scheduled) = state.begin_load() {
                ctx.submit_command(cmd::SCHEDULE_LOAD.with(scheduled));
            }
        });

    let loading = Either::new(
        |state: &AppState, _| state.is_loading(),
        utils::spinner_widget().fix_height(theme::grid(6.0)),
        SizedBox::empty(),
    );

    Flex::column()
        .cross_axis_alignment(CrossAxisAlignment::Fill)
        .with_flex_child(posts, 1.0)
        .with_child(loading)
        .load_after_delay(|_, state: &mut AppState, ticket, _| {
            state.finish_load(ticket, source::global().as_ref());
        })
}

pub fn sentinel_screen() -> impl Widget<AppState> {
    let slot = ViewSwitcher::new(
        |state: &AppState, _| (state.len(), state.sentinel_revealed && state.can_load_more()),
        |&(len, revealed), _, _| {
            if revealed {
                sentinel_widget(len).boxed()
            } else {
                SizedBox::empty().boxed()
            }
        },
    )
    .fix_height(CARD_EXTENT);

    let content = Flex::column()
        .cross_axis_alignment(CrossAxisAlignment::Fill)
        .with_child(post_list())
        .with_child(slot);

    Scroll::new(content)
        .vertical()
        .on_viewport(
            CARD_EXTENT,
            |state: &AppState| state.len() + 1,
            |_, state, items, _| {
                state.sentinel_revealed = items.is_at_bottom();
            },
        )
        .on_sentinel(|_, state: &mut AppState, key, _| {
            state.sentinel_appeared(key, source::global().as_ref());
        })
}

fn sentinel_widget(len: usize) -> impl Widget<AppState> {
    Label::new("Loading more posts…")
        .with_text_color(theme::PLACEHOLDER_COLOR)
        .center()
        .on_mount(move |ctx, _, _| {
            ctx.submit_command(cmd::SENTINEL_APPEARED.with(AppearanceKey::after(len)));
        })
}

fn post_list() -> impl Widget<AppState> {
    List::new(card_widget).lens(Map::new(
        |state: &AppState| state.posts(),
        |_: &mut AppState, _: Vector<Arc<Post>>| {
            // Immutable.
        },
    ))
}

fn card_widget() -> impl Widget<Arc<Post>> {
    let nickname = Label::raw()
        .with_font(theme::UI_FONT_MEDIUM)
        .lens(Map::new(|post: &Arc<Post>| post.nickname.clone(), |_, _| {}));

    let caption = Label::raw()
        .with_line_break_mode(LineBreaking::Clip)
        .with_text_color(theme::PLACEHOLDER_COLOR)
        .lens(Map::new(|post: &Arc<Post>| post.caption.clone(), |_, _| {}));

    let text = Flex::column()
        .cross_axis_alignment(CrossAxisAlignment::Start)
        .with_child(nickname)
        .with_spacer(theme::grid(0.5))
        .with_child(caption);

    Flex::row()
        .with_child(avatar_widget())
        .with_default_spacer()
        .with_flex_child(text, 1.0)
        .padding(theme::grid(1.5))
        .expand()
        .background(theme::CARD_BACKGROUND)
        .rounded(theme::BUTTON_BORDER_RADIUS)
        .padding((theme::grid(1.0), theme::grid(0.5)))
        .fix_height(CARD_EXTENT)
}

fn avatar_widget() -> impl Widget<Arc<Post>> {
    let initial = Label::dynamic(|post: &Arc<Post>, _| {
        post.nickname.chars().next().unwrap_or('?').to_string()
    })
    .with_text_color(Color::WHITE)
    .center();

    let circle = Painter::new(|ctx, post: &Arc<Post>, _env: &Env| {
        let rect = ctx.size().to_rect();
        let circle = Circle::new(rect.center(), rect.width().min(rect.height()) / 2.0);
        ctx.fill(circle, &avatar_color(post.number));
    });

    initial.background(circle).fix_size(AVATAR_SIZE, AVATAR_SIZE)
}

fn avatar_color(number: usize) -> Color {
    const HUES: [(u8, u8, u8); 5] = [
        (0x5c, 0x9d, 0xd5),
        (0x6f, 0xb3, 0x7a),
        (0xd5, 0x8a, 0x4c),
        (0xa7, 0x6b, 0xc9),
        (0xc9, 0x5b, 0x6b),
    ];
    let (r, g, b) = HUES[number % HUES.len()];
    Color::rgb8(r, g, b)
}
