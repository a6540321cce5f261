use std::time::Duration;

use druid::{
    widget::{Controller, Scroll},
    Data, Env, Event, EventCtx, LifeCycle, LifeCycleCtx, Rect, TimerToken, UpdateCtx, Widget,
};
use lazyfeed_core::trigger::{BottomReached, DistinctUntilChanged, VisibleItems};

type RowsFunc<T> = Box<dyn Fn(&T) -> usize>;
type ViewportFunc<T> = Box<dyn FnMut(&mut EventCtx, &mut T, &VisibleItems, &Env)>;

/// Turns viewport rectangles of a list with uniform rows into visible item
/// reports, passing on only the ones that differ from the last.
pub struct ViewportReports {
    row_extent: f64,
    last: DistinctUntilChanged<VisibleItems>,
}

impl ViewportReports {
    pub fn new(row_extent: f64) -> Self {
        Self {
            row_extent,
            last: DistinctUntilChanged::new(),
        }
    }

    /// Returns `None` while the viewport has no height yet, or when nothing changed.
    pub fn measure(&mut self, viewport: Rect, rows: usize) -> Option<VisibleItems> {
        if viewport.height() <= 0.0 {
            return None;
        }
        let items =
            VisibleItems::from_uniform_rows(viewport.y0, viewport.height(), self.row_extent, rows);
        self.last.observe(items.clone()).then_some(items)
    }
}

/// Reports which rows of a scrolled list of uniform rows are on screen.
///
/// The viewport is measured again after scrolling, after a resize and whenever the
/// row count changes.
pub struct OnViewport<T> {
    rows: RowsFunc<T>,
    handler: ViewportFunc<T>,
    reports: ViewportReports,
    recheck: TimerToken,
}

impl<T> OnViewport<T> {
    pub fn new(
        row_extent: f64,
        rows: impl Fn(&T) -> usize + 'static,
        handler: impl FnMut(&mut EventCtx, &mut T, &VisibleItems, &Env) + 'static,
    ) -> Self {
        Self {
            rows: Box::new(rows),
            handler: Box::new(handler),
            reports: ViewportReports::new(row_extent),
            recheck: TimerToken::INVALID,
        }
    }

    /// Calls `load_more` once every time the last row scrolls into view. Arriving
    /// again needs leaving the bottom first.
    pub fn bottom_reached(
        row_extent: f64,
        rows: impl Fn(&T) -> usize + 'static,
        load_more: impl Fn(&mut EventCtx, &mut T, &Env) + 'static,
    ) -> Self {
        let mut bottom = BottomReached::new();
        Self::new(row_extent, rows, move |ctx, data, items, env| {
            if bottom.observe(items) {
                load_more(ctx, data, env);
            }
        })
    }

    fn report<W>(&mut self, scroll: &Scroll<T, W>, ctx: &mut EventCtx, data: &mut T, env: &Env)
    where
        T: Data,
        W: Widget<T>,
    {
        let rows = (self.rows)(data);
        if let Some(items) = self.reports.measure(scroll.viewport_rect(), rows) {
            (self.handler)(ctx, data, &items, env);
        }
    }
}

impl<T, W> Controller<T, Scroll<T, W>> for OnViewport<T>
where
    T: Data,
    W: Widget<T>,
{
    fn event(
        &mut self,
        child: &mut Scroll<T, W>,
        ctx: &mut EventCtx,
        event: &Event,
        data: &mut T,
        env: &Env,
    ) {
        match event {
            Event::Timer(token) if token == &self.recheck => {
                self.recheck = TimerToken::INVALID;
                self.report(child, ctx, data, env);
            }
            _ => {
                child.event(ctx, event, data, env);
                self.report(child, ctx, data, env);
            }
        }
    }

    fn lifecycle(
        &mut self,
        child: &mut Scroll<T, W>,
        ctx: &mut LifeCycleCtx,
        event: &LifeCycle,
        data: &T,
        env: &Env,
    ) {
        if let LifeCycle::WidgetAdded | LifeCycle::Size(_) = event {
            self.recheck = ctx.request_timer(Duration::ZERO);
        }
        child.lifecycle(ctx, event, data, env)
    }

    fn update(
        &mut self,
        child: &mut Scroll<T, W>,
        ctx: &mut UpdateCtx,
        old_data: &T,
        data: &T,
        env: &Env,
    ) {
        if (self.rows)(old_data) != (self.rows)(data) {
            self.recheck = ctx.request_timer(Duration::ZERO);
        }
        child.update(ctx, old_data, data, env)
    }
}
