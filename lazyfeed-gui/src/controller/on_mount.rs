use druid::{widget::Controller, Data, Env, LifeCycle, LifeCycleCtx, Widget};

type MountFunc<T> = Box<dyn Fn(&mut LifeCycleCtx, &T, &Env)>;

/// Runs `func` once, when the widget is added to the tree.
pub struct OnMount<T> {
    func: MountFunc<T>,
}

impl<T> OnMount<T> {
    pub fn new(func: impl Fn(&mut LifeCycleCtx, &T, &Env) + 'static) -> Self {
        Self {
            func: Box::new(func),
        }
    }
}

impl<T, W> Controller<T, W> for OnMount<T>
where
    T: Data,
    W: Widget<T>,
{
    fn lifecycle(
        &mut self,
        child: &mut W,
        ctx: &mut LifeCycleCtx,
        event: &LifeCycle,
        data: &T,
        env: &Env,
    ) {
        if let LifeCycle::WidgetAdded = event {
            (self.func)(ctx, data, env);
        }
        child.lifecycle(ctx, event, data, env)
    }
}
