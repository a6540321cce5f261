use druid::widget::prelude::*;

use crate::{data::Theme, ui::theme};

/// Gives its subtree the environment of the theme picked from the data, and
/// rebuilds that environment only when the picked theme changes.
pub struct ThemeScope<T, W> {
    inner: W,
    pick: Box<dyn Fn(&T) -> Theme>,
    themed: Option<(Theme, Env)>,
}

impl<T, W> ThemeScope<T, W> {
    pub fn new(pick: impl Fn(&T) -> Theme + 'static, inner: W) -> Self {
        Self {
            inner,
            pick: Box::new(pick),
            themed: None,
        }
    }

    /// Returns `true` if the environment had to be rebuilt.
    fn apply(&mut self, data: &T, outer_env: &Env) -> bool {
        let theme = (self.pick)(data);
        if matches!(&self.themed, Some((current, _)) if *current == theme) {
            return false;
        }
        log::debug!("applying {:?} theme", theme);
        let mut env = outer_env.clone();
        theme::setup_theme(&mut env, theme);
        self.themed = Some((theme, env));
        true
    }
}

impl<T: Data, W: Widget<T>> Widget<T> for ThemeScope<T, W> {
    fn event(&mut self, ctx: &mut EventCtx, event: &Event, data: &mut T, env: &Env) {
        let env = self.themed.as_ref().map_or(env, |(_, env)| env);
        self.inner.event(ctx, event, data, env)
    }

    fn lifecycle(&mut self, ctx: &mut LifeCycleCtx, event: &LifeCycle, data: &T, env: &Env) {
        if let LifeCycle::WidgetAdded = event {
            self.apply(data, env);
        }
        let env = self.themed.as_ref().map_or(env, |(_, env)| env);
        self.inner.lifecycle(ctx, event, data, env)
    }

    fn update(&mut self, ctx: &mut UpdateCtx, old_data: &T, data: &T, env: &Env) {
        if self.apply(data, env) {
            ctx.request_layout();
            ctx.request_paint();
        }
        let env = self.themed.as_ref().map_or(env, |(_, env)| env);
        self.inner.update(ctx, old_data, data, env);
    }

    fn layout(&mut self, ctx: &mut LayoutCtx, bc: &BoxConstraints, data: &T, env: &Env) -> Size {
        let env = self.themed.as_ref().map_or(env, |(_, env)| env);
        self.inner.layout(ctx, bc, data, env)
    }

    fn paint(&mut self, ctx: &mut PaintCtx, data: &T, env: &Env) {
        let env = self.themed.as_ref().map_or(env, |(_, env)| env);
        self.inner.paint(ctx, data, env);
    }
}
