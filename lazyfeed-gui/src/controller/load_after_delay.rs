use std::time::Duration;

use druid::{widget::Controller, Data, Env, Event, EventCtx, TimerToken, Widget};
use lazyfeed_core::feed::LoadTicket;

use crate::cmd;

type FinishFunc<T> = Box<dyn Fn(&mut EventCtx, &mut T, LoadTicket, &Env)>;

/// The one load waiting for its timer.
#[derive(Debug, Default)]
pub struct PendingLoad {
    pending: Option<(TimerToken, LoadTicket)>,
}

impl PendingLoad {
    /// Waits for `timer` to finish `ticket`. Returns the load it replaces, if any.
    pub fn schedule(&mut self, timer: TimerToken, ticket: LoadTicket) -> Option<LoadTicket> {
        self.pending
            .replace((timer, ticket))
            .map(|(_, replaced)| replaced)
    }

    /// Hands out the ticket waiting for `timer`, at most once.
    pub fn elapsed(&mut self, timer: TimerToken) -> Option<LoadTicket> {
        match self.pending {
            Some((pending, ticket)) if pending == timer => {
                self.pending = None;
                Some(ticket)
            }
            _ => None,
        }
    }
}

/// Finishes loads scheduled through `cmd::SCHEDULE_LOAD` once their delay is over.
///
/// The delay is a timer of this widget, so a load still pending when the widget
/// goes away is never finished.
pub struct LoadAfterDelay<T> {
    pending: PendingLoad,
    finish: FinishFunc<T>,
}

impl<T> LoadAfterDelay<T> {
    pub fn new(finish: impl Fn(&mut EventCtx, &mut T, LoadTicket, &Env) + 'static) -> Self {
        Self {
            pending: PendingLoad::default(),
            finish: Box::new(finish),
        }
    }

    fn schedule(&mut self, ctx: &mut EventCtx, ticket: LoadTicket, delay: Duration) {
        let timer = ctx.request_timer(delay);
        if let Some(replaced) = self.pending.schedule(timer, ticket) {
            log::warn!("replacing pending load at offset {}", replaced.offset);
        }
    }
}

impl<T, W> Controller<T, W> for LoadAfterDelay<T>
where
    T: Data,
    W: Widget<T>,
{
    fn event(&mut self, child: &mut W, ctx: &mut EventCtx, event: &Event, data: &mut T, env: &Env) {
        match event {
            Event::Command(cmd) if cmd.is(cmd::SCHEDULE_LOAD) => {
                let (ticket, delay) = *cmd.get_unchecked(cmd::SCHEDULE_LOAD);
                self.schedule(ctx, ticket, delay);
                ctx.set_handled();
            }
            Event::Timer(token) => match self.pending.elapsed(*token) {
                Some(ticket) => {
                    (self.finish)(ctx, data, ticket, env);
                    ctx.set_handled();
                }
                None => child.event(ctx, event, data, env),
            },
            _ => child.event(ctx, event, data, env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(offset: usize) -> LoadTicket {
        LoadTicket {
            generation: 1,
            offset,
            limit: 20,
        }
    }

    #[test]
    fn finishes_once_on_its_own_timer() {
        let mut pending = PendingLoad::default();
        assert_eq!(pending.schedule(TimerToken::from_raw(7), ticket(50)), None);

        assert_eq!(pending.elapsed(TimerToken::from_raw(8)), None);
        assert_eq!(pending.elapsed(TimerToken::from_raw(7)), Some(ticket(50)));
        assert_eq!(pending.elapsed(TimerToken::from_raw(7)), None);
    }

    #[test]
    fn rescheduling_drops_the_previous_load() {
        let mut pending = PendingLoad::default();
        pending.schedule(TimerToken::from_raw(1), ticket(50));
        assert_eq!(
            pending.schedule(TimerToken::from_raw(2), ticket(70)),
            Some(ticket(50))
        );

        assert_eq!(pending.elapsed(TimerToken::from_raw(1)), None);
        assert_eq!(pending.elapsed(TimerToken::from_raw(2)), Some(ticket(70)));
    }
}
