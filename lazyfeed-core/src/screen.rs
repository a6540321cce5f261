//! A feed screen without a UI toolkit.
//!
//! The screen runs as an actor that owns its [`Feed`]. Viewport and sentinel
//! reports come in as [`ScreenEvent`]s, and a [`ScreenUpdate`] goes out after every
//! state change. The simulated fetch delay is a receive deadline, so the screen
//! keeps handling events while a load is pending. Once the screen is unmounted, a
//! pending load is dropped and never touches the feed.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crossbeam_channel::Sender;

use crate::{
    actor::{Act, Actor, ActorHandle},
    error::Error,
    feed::{Completion, Feed, LoadTicket},
    policy::LoadPolicy,
    sentinel::{AppearanceKey, SentinelTrigger},
    source::PostSource,
    trigger::{BottomReached, VisibleItems},
};

#[derive(Debug)]
pub enum ScreenEvent {
    Scrolled(VisibleItems),
    SentinelAppeared(AppearanceKey),
    LoadElapsed(LoadTicket),
    Unmount,
}

#[derive(Clone, Debug)]
pub enum ScreenUpdate {
    Mounted(Feed),
    LoadStarted(Feed),
    Loaded(Feed, Completion),
    Failed(Feed, Error),
    Unmounted(Option<LoadTicket>),
}

impl ScreenUpdate {
    pub fn feed(&self) -> Option<&Feed> {
        match self {
            Self::Mounted(feed)
            | Self::LoadStarted(feed)
            | Self::Loaded(feed, _)
            | Self::Failed(feed, _) => Some(feed),
            Self::Unmounted(_) => None,
        }
    }
}

pub struct FeedScreen {
    feed: Feed,
    source: Arc<dyn PostSource>,
    bottom: BottomReached,
    sentinel: SentinelTrigger,
    pending: Option<(Instant, LoadTicket)>,
    updates: Sender<ScreenUpdate>,
}

impl FeedScreen {
    /// Mounts a new feed and starts the screen. Fails if the initial batch cannot
    /// be created.
    pub fn mount(
        policy: LoadPolicy,
        source: Arc<dyn PostSource>,
        updates: Sender<ScreenUpdate>,
    ) -> Result<ScreenHandle, Error> {
        let feed = Feed::mount(policy, source.as_ref())?;
        updates.send(ScreenUpdate::Mounted(feed.clone()))?;
        let screen = Self {
            feed,
            source,
            bottom: BottomReached::new(),
            sentinel: SentinelTrigger::new(),
            pending: None,
            updates,
        };
        Ok(ScreenHandle {
            actor: Self::spawn_default(move || screen),
        })
    }

    fn publish(&self, update: ScreenUpdate) {
        if self.updates.send(update).is_err() {
            log::debug!("screen update dropped, nobody is listening");
        }
    }

    fn request_load(&mut self) {
        let Some(ticket) = self.feed.begin_load() else {
            return;
        };
        let delay = self.feed.policy().delay();
        if delay == Duration::ZERO {
            self.finish_load(ticket);
        } else {
            log::debug!("loading {} posts in {:?}", ticket.limit, delay);
            self.pending = Some((Instant::now() + delay, ticket));
            self.publish(ScreenUpdate::LoadStarted(self.feed.clone()));
        }
    }

    fn finish_load(&mut self, ticket: LoadTicket) {
        let result = self.feed.fetch(&ticket, self.source.as_ref());
        match self.feed.complete(ticket, result) {
            Ok(Completion::Stale) => {}
            Ok(completion) => {
                self.publish(ScreenUpdate::Loaded(self.feed.clone(), completion));
            }
            Err(err) => {
                self.publish(ScreenUpdate::Failed(self.feed.clone(), err));
            }
        }
    }

    fn next_act(&self) -> Act<Self> {
        match self.pending {
            Some((deadline, ticket)) => Act::WaitUntil {
                deadline,
                timeout_msg: ScreenEvent::LoadElapsed(ticket),
            },
            None => Act::Continue,
        }
    }
}

impl Actor for FeedScreen {
    type Message = ScreenEvent;
    type Error = Error;

    fn handle(&mut self, msg: Self::Message) -> Result<Act<Self>, Self::Error> {
        match msg {
            ScreenEvent::Scrolled(items) => {
                if self.bottom.observe_current(&items, self.feed.len()) {
                    self.request_load();
                }
            }
            ScreenEvent::SentinelAppeared(key) => {
                if !key.is_current(self.feed.len()) {
                    log::debug!(
                        "ignoring sentinel after {} posts, feed has {}",
                        key.0,
                        self.feed.len()
                    );
                } else if self.sentinel.appear(key) {
                    self.request_load();
                }
            }
            ScreenEvent::LoadElapsed(ticket) => {
                if matches!(self.pending, Some((_, pending)) if pending == ticket) {
                    self.pending = None;
                    self.finish_load(ticket);
                }
            }
            ScreenEvent::Unmount => {
                let pending = self.pending.take().map(|(_, ticket)| ticket);
                log::info!(
                    "unmounting feed #{} with {} posts",
                    self.feed.generation(),
                    self.feed.len()
                );
                self.publish(ScreenUpdate::Unmounted(pending));
                return Ok(Act::Shutdown);
            }
        }
        Ok(self.next_act())
    }
}

/// Keeps the screen mounted. Dropping it disconnects the screen, which then stops
/// without publishing [`ScreenUpdate::Unmounted`]. Use [`ScreenHandle::unmount`]
/// to learn about a load that was still pending.
pub struct ScreenHandle {
    actor: ActorHandle<ScreenEvent>,
}

impl ScreenHandle {
    pub fn scrolled(&self, items: VisibleItems) -> Result<(), Error> {
        Ok(self.actor.send(ScreenEvent::Scrolled(items))?)
    }

    pub fn sentinel_appeared(&self, key: AppearanceKey) -> Result<(), Error> {
        Ok(self.actor.send(ScreenEvent::SentinelAppeared(key))?)
    }

    /// Unmounts the screen and waits for it to stop.
    pub fn unmount(self) -> Result<(), Error> {
        let sent = self.actor.send(ScreenEvent::Unmount);
        self.actor.join();
        Ok(sent?)
    }
}
