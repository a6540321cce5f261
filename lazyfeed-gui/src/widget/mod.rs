mod theme;

use druid::{
    widget::{ControllerHost, Scroll},
    Data, Env, EventCtx, LifeCycleCtx, Widget,
};
use lazyfeed_core::{feed::LoadTicket, sentinel::AppearanceKey, trigger::VisibleItems};

use crate::controller::{LoadAfterDelay, OnMount, OnSentinel, OnViewport};

pub use theme::ThemeScope;

pub trait MyWidgetExt<T: Data>: Widget<T> + Sized + 'static {
    fn on_mount(
        self,
        func: impl Fn(&mut LifeCycleCtx, &T, &Env) + 'static,
    ) -> ControllerHost<Self, OnMount<T>> {
        ControllerHost::new(self, OnMount::new(func))
    }

    fn on_sentinel(
        self,
        load: impl Fn(&mut EventCtx, &mut T, AppearanceKey, &Env) + 'static,
    ) -> ControllerHost<Self, OnSentinel<T>> {
        ControllerHost::new(self, OnSentinel::new(load))
    }

    fn load_after_delay(
        self,
        finish: impl Fn(&mut EventCtx, &mut T, LoadTicket, &Env) + 'static,
    ) -> ControllerHost<Self, LoadAfterDelay<T>> {
        ControllerHost::new(self, LoadAfterDelay::new(finish))
    }
}

impl<T: Data, W: Widget<T> + 'static> MyWidgetExt<T> for W {}

pub trait ScrollExt<T: Data, W: Widget<T>>: Sized {
    fn on_viewport(
        self,
        row_extent: f64,
        rows: impl Fn(&T) -> usize + 'static,
        handler: impl FnMut(&mut EventCtx, &mut T, &VisibleItems, &Env) + 'static,
    ) -> ControllerHost<Scroll<T, W>, OnViewport<T>>;

    fn on_bottom_reached(
        self,
        row_extent: f64,
        rows: impl Fn(&T) -> usize + 'static,
        load_more: impl Fn(&mut EventCtx, &mut T, &Env) + 'static,
    ) -> ControllerHost<Scroll<T, W>, OnViewport<T>>;
}

impl<T: Data, W: Widget<T>> ScrollExt<T, W> for Scroll<T, W> {
    fn on_viewport(
        self,
        row_extent: f64,
        rows: impl Fn(&T) -> usize + 'static,
        handler: impl FnMut(&mut EventCtx, &mut T, &VisibleItems, &Env) + 'static,
    ) -> ControllerHost<Scroll<T, W>, OnViewport<T>> {
        ControllerHost::new(self, OnViewport::new(row_extent, rows, handler))
    }

    fn on_bottom_reached(
        self,
        row_extent: f64,
        rows: impl Fn(&T) -> usize + 'static,
        load_more: impl Fn(&mut EventCtx, &mut T, &Env) + 'static,
    ) -> ControllerHost<Scroll<T, W>, OnViewport<T>> {
        ControllerHost::new(
            self,
            OnViewport::bottom_reached(row_extent, rows, load_more),
        )
    }
}
