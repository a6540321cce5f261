use druid::{AppDelegate, Application, Command, DelegateCtx, Env, Handled, Target, WindowId};

use crate::{cmd, data::AppState, source};

pub struct Delegate {
    main_window: Option<WindowId>,
}

impl Delegate {
    pub fn with_main(main_window: WindowId) -> Self {
        Self {
            main_window: Some(main_window),
        }
    }
}

impl AppDelegate<AppState> for Delegate {
    fn command(
        &mut self,
        _ctx: &mut DelegateCtx,
        _target: Target,
        cmd: &Command,
        data: &mut AppState,
        _env: &Env,
    ) -> Handled {
        if let Some(nav) = cmd.get(cmd::NAVIGATE) {
            log::info!("navigating to {:?}", nav);
            data.navigate(*nav, source::global().as_ref());
            Handled::Yes
        } else if cmd.is(cmd::RELOAD) {
            log::info!("reloading {:?}", data.nav);
            data.mount(source::global().as_ref());
            Handled::Yes
        } else {
            Handled::No
        }
    }

    fn window_removed(
        &mut self,
        id: WindowId,
        data: &mut AppState,
        _env: &Env,
        _ctx: &mut DelegateCtx,
    ) {
        if self.main_window == Some(id) {
            self.main_window.take();
            if let Err(err) = data.config.save() {
                log::error!("failed to save config: {}", err);
            }
            Application::global().quit();
        }
    }
}
