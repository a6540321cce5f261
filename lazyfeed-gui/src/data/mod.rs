mod config;
mod nav;

use std::{sync::Arc, time::Duration};

use druid::{im::Vector, Data, Lens};
use lazyfeed_core::{
    error::Error as FeedError,
    feed::{Completion, Feed, LoadTicket},
    post::Post,
    sentinel::AppearanceKey,
    source::PostSource,
};

pub use crate::data::{
    config::{Config, Theme},
    nav::Nav,
};
use crate::error::Error;

#[derive(Clone, Data, Lens)]
pub struct AppState {
    pub nav: Nav,
    pub config: Config,
    #[data(same_fn = "same_feed")]
    pub feed: Option<Feed>,
    /// Whether the slot after the last post is scrolled into view.
    pub sentinel_revealed: bool,
    pub error: Option<Error>,
}

fn same_feed(a: &Option<Feed>, b: &Option<Feed>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.same(b),
        (None, None) => true,
        _ => false,
    }
}

impl AppState {
    pub fn default_with_config(config: Config, source: &dyn PostSource) -> Self {
        let mut state = Self {
            nav: config.last_nav,
            config,
            feed: None,
            sentinel_revealed: false,
            error: None,
        };
        state.mount(source);
        state
    }

    /// Replaces the feed with a freshly mounted one. Loads still pending for the
    /// old feed will be ignored.
    pub fn mount(&mut self, source: &dyn PostSource) {
        self.sentinel_revealed = false;
        match Feed::mount(self.config.policy(self.nav), source) {
            Ok(feed) => {
                self.feed = Some(feed);
                self.error = None;
            }
            Err(err) => {
                log::error!("failed to mount feed: {}", err);
                self.feed = None;
                self.error = Some(err.into());
            }
        }
    }

    pub fn navigate(&mut self, nav: Nav, source: &dyn PostSource) {
        self.nav = nav;
        self.config.last_nav = nav;
        self.mount(source);
    }

    pub fn generation(&self) -> u64 {
        self.feed.as_ref().map_or(0, Feed::generation)
    }

    pub fn posts(&self) -> Vector<Arc<Post>> {
        self.feed
            .as_ref()
            .map(|feed| feed.posts().clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.feed.as_ref().map_or(0, Feed::len)
    }

    pub fn is_loading(&self) -> bool {
        self.feed.as_ref().is_some_and(Feed::is_loading)
    }

    pub fn can_load_more(&self) -> bool {
        self.feed
            .as_ref()
            .is_some_and(|feed| !feed.is_exhausted() && !feed.is_failed())
    }

    /// Starts a load, returns the ticket together with the delay to finish it after.
    pub fn begin_load(&mut self) -> Option<(LoadTicket, Duration)> {
        let feed = self.feed.as_mut()?;
        let ticket = feed.begin_load()?;
        Some((ticket, feed.policy().delay()))
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, source: &dyn PostSource) {
        let result = match self.feed.as_mut() {
            Some(feed) => {
                let page = feed.fetch(&ticket, source);
                feed.complete(ticket, page).map(Some)
            }
            None => Ok(None),
        };
        self.apply(result);
    }

    pub fn load_now(&mut self, source: &dyn PostSource) {
        self.sentinel_revealed = false;
        let result = match self.feed.as_mut() {
            Some(feed) => feed.load_now(source),
            None => Ok(None),
        };
        self.apply(result);
    }

    /// Loads right away for the sentinel rendered after `key` posts, as long as the
    /// list still has exactly that many.
    pub fn sentinel_appeared(&mut self, key: AppearanceKey, source: &dyn PostSource) {
        if key.is_current(self.len()) {
            self.load_now(source);
        } else {
            log::debug!("ignoring sentinel after {} posts, feed has {}", key.0, self.len());
        }
    }

    fn apply(&mut self, result: Result<Option<Completion>, FeedError>) {
        match result {
            Ok(Some(Completion::Appended(_))) => {
                self.error = None;
            }
            Ok(Some(Completion::Retryable(err))) | Err(err) => {
                self.error = Some(err.into());
            }
            Ok(Some(Completion::Stale)) | Ok(None) => {}
        }
    }
}
