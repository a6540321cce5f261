use druid::{widget::Controller, Data, Env, Event, EventCtx, Widget};
use lazyfeed_core::sentinel::{AppearanceKey, SentinelTrigger};

use crate::cmd;

type LoadFunc<T> = Box<dyn Fn(&mut EventCtx, &mut T, AppearanceKey, &Env)>;

/// Listens for `cmd::SENTINEL_APPEARED` and loads once per sentinel appearance.
/// Older sentinels mounting again late are ignored.
pub struct OnSentinel<T> {
    trigger: SentinelTrigger,
    load: LoadFunc<T>,
}

impl<T> OnSentinel<T> {
    pub fn new(load: impl Fn(&mut EventCtx, &mut T, AppearanceKey, &Env) + 'static) -> Self {
        Self {
            trigger: SentinelTrigger::new(),
            load: Box::new(load),
        }
    }
}

impl<T, W> Controller<T, W> for OnSentinel<T>
where
    T: Data,
    W: Widget<T>,
{
    fn event(&mut self, child: &mut W, ctx: &mut EventCtx, event: &Event, data: &mut T, env: &Env) {
        match event {
            Event::Command(cmd) if cmd.is(cmd::SENTINEL_APPEARED) => {
                let key = *cmd.get_unchecked(cmd::SENTINEL_APPEARED);
                if self.trigger.appear(key) {
                    (self.load)(ctx, data, key, env);
                }
                ctx.set_handled();
            }
            _ => child.event(ctx, event, data, env),
        }
    }
}
