use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use im::Vector;

use crate::{
    error::Error,
    policy::LoadPolicy,
    post::Post,
    source::{Page, PostSource},
};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A pending load. Only the ticket the feed handed out last can complete it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoadTicket {
    pub generation: u64,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoadState {
    Idle,
    Loading(LoadTicket),
    Failed(Error),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Completion {
    Appended(usize),
    Retryable(Error),
    Stale,
}

/// Posts of one mounted screen together with the load-more state machine.
///
/// The post list is only ever replaced as a whole, so two versions of a feed can be
/// compared by pointer, see [`Feed::same`].
#[derive(Clone, Debug)]
pub struct Feed {
    generation: u64,
    policy: LoadPolicy,
    posts: Vector<Arc<Post>>,
    state: LoadState,
    last_error: Option<Error>,
}

impl Feed {
    pub fn mount(policy: LoadPolicy, source: &dyn PostSource) -> Result<Self, Error> {
        policy.validate()?;
        let generation = NEXT_GENERATION.fetch_add(1, Ordering::Relaxed);
        let page = source.fetch(0, policy.initial_count)?;
        log::info!(
            "mounted feed #{} with {} posts",
            generation,
            page.items.len()
        );
        Ok(Self {
            generation,
            policy,
            posts: page.items,
            state: LoadState::Idle,
            last_error: None,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn policy(&self) -> &LoadPolicy {
        &self.policy
    }

    pub fn posts(&self) -> &Vector<Arc<Post>> {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, LoadState::Failed(_))
    }

    pub fn is_exhausted(&self) -> bool {
        !self.policy.max_count.allows(self.posts.len())
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Cheap equality for change detection: same mount, same list allocation, same
    /// state.
    pub fn same(&self, other: &Self) -> bool {
        self.generation == other.generation
            && self.posts.ptr_eq(&other.posts)
            && self.state == other.state
            && self.last_error == other.last_error
    }

    /// Moves from idle to loading. Returns `None` if a load is already pending, the
    /// feed has failed, or the policy allows no more posts.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        match self.state {
            LoadState::Idle => {}
            LoadState::Loading(_) => {
                log::debug!("feed #{} is already loading", self.generation);
                return None;
            }
            LoadState::Failed(_) => return None,
        }
        if self.is_exhausted() {
            log::debug!(
                "feed #{} reached its limit of {:?}",
                self.generation,
                self.policy.max_count
            );
            return None;
        }
        let ticket = LoadTicket {
            generation: self.generation,
            offset: self.posts.len(),
            limit: self.policy.batch_size,
        };
        self.state = LoadState::Loading(ticket);
        Some(ticket)
    }

    pub fn fetch(&self, ticket: &LoadTicket, source: &dyn PostSource) -> Result<Page, Error> {
        source.fetch(ticket.offset, ticket.limit)
    }

    /// Finishes the load started by `ticket`. Fatal errors stop the feed and are
    /// returned; everything else is reported through [`Completion`].
    pub fn complete(
        &mut self,
        ticket: LoadTicket,
        result: Result<Page, Error>,
    ) -> Result<Completion, Error> {
        if self.state != LoadState::Loading(ticket) {
            log::warn!(
                "ignoring stale completion for feed #{} at offset {}",
                ticket.generation,
                ticket.offset
            );
            return Ok(Completion::Stale);
        }
        let result = result.and_then(|page| {
            if page.offset == ticket.offset {
                Ok(page)
            } else {
                Err(Error::TransientFetch(format!(
                    "expected page at offset {}, got {}",
                    ticket.offset, page.offset
                )))
            }
        });
        match result {
            Ok(page) => {
                let count = page.items.len();
                let mut posts = self.posts.clone();
                posts.append(page.items);
                self.posts = posts;
                self.state = LoadState::Idle;
                self.last_error = None;
                log::info!(
                    "feed #{} appended {} posts, {} total",
                    self.generation,
                    count,
                    self.posts.len()
                );
                Ok(Completion::Appended(count))
            }
            Err(err) if err.is_transient() => {
                log::warn!("feed #{}: {}", self.generation, err);
                self.state = LoadState::Idle;
                self.last_error = Some(err.clone());
                Ok(Completion::Retryable(err))
            }
            Err(err) => {
                log::error!("feed #{}: {}", self.generation, err);
                self.state = LoadState::Failed(err.clone());
                self.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Begins, fetches and completes a load in one go. `Ok(None)` means no load
    /// could be started.
    pub fn load_now(&mut self, source: &dyn PostSource) -> Result<Option<Completion>, Error> {
        match self.begin_load() {
            Some(ticket) => {
                let result = self.fetch(&ticket, source);
                self.complete(ticket, result).map(Some)
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::{policy::MaxCount, source::SyntheticSource};

    /// Fails with the queued errors first, then generates posts.
    struct ScriptedSource {
        errors: Mutex<Vec<Error>>,
    }

    impl ScriptedSource {
        fn failing(errors: Vec<Error>) -> Self {
            Self {
                errors: Mutex::new(errors),
            }
        }
    }

    impl PostSource for ScriptedSource {
        fn fetch(&self, offset: usize, limit: usize) -> Result<Page, Error> {
            match self.errors.lock().unwrap().pop() {
                Some(err) => Err(err),
                None => SyntheticSource.fetch(offset, limit),
            }
        }
    }

    fn numbers(feed: &Feed) -> Vec<usize> {
        feed.posts().iter().map(|p| p.number).collect()
    }

    #[test]
    fn mount_loads_initial_batch() {
        let feed = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        assert_eq!(feed.len(), 50);
        assert_eq!(numbers(&feed), (1..=50).collect::<Vec<_>>());
        assert!(!feed.is_loading());
        assert_eq!(feed.state(), &LoadState::Idle);
    }

    #[test]
    fn mounts_get_distinct_generations() {
        let a = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        let b = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        assert_ne!(a.generation(), b.generation());
    }

    #[test]
    fn mount_rejects_invalid_policy() {
        let policy = LoadPolicy {
            batch_size: 0,
            ..LoadPolicy::scroll()
        };
        assert!(matches!(
            Feed::mount(policy, &SyntheticSource),
            Err(Error::FatalConfiguration(_))
        ));
    }

    #[test]
    fn load_cycle() {
        let mut feed = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        let ticket = feed.begin_load().unwrap();
        assert_eq!(ticket.offset, 50);
        assert_eq!(ticket.limit, 20);
        assert!(feed.is_loading());

        let page = feed.fetch(&ticket, &SyntheticSource);
        assert_eq!(feed.complete(ticket, page), Ok(Completion::Appended(20)));
        assert!(!feed.is_loading());
        assert_eq!(numbers(&feed), (1..=70).collect::<Vec<_>>());
    }

    #[test]
    fn triggers_while_loading_are_ignored() {
        let mut feed = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        let ticket = feed.begin_load().unwrap();
        assert_eq!(feed.begin_load(), None);
        assert_eq!(feed.load_now(&SyntheticSource), Ok(None));
        assert_eq!(feed.state(), &LoadState::Loading(ticket));
        assert_eq!(feed.len(), 50);
    }

    #[test]
    fn length_grows_by_batches() {
        let mut feed = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        for k in 1..=5 {
            feed.load_now(&SyntheticSource).unwrap();
            assert_eq!(feed.len(), 50 + k * 20);
        }
        assert_eq!(numbers(&feed), (1..=150).collect::<Vec<_>>());
    }

    #[test]
    fn stale_tickets_are_ignored() {
        let mut old = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        let old_ticket = old.begin_load().unwrap();

        let mut feed = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        let page = SyntheticSource.fetch(50, 20);
        assert_eq!(feed.complete(old_ticket, page), Ok(Completion::Stale));
        assert_eq!(feed.len(), 50);

        let ticket = feed.begin_load().unwrap();
        let page = feed.fetch(&ticket, &SyntheticSource);
        feed.complete(ticket, page.clone()).unwrap();
        assert_eq!(feed.complete(ticket, page), Ok(Completion::Stale));
        assert_eq!(feed.len(), 70);
    }

    #[test]
    fn transient_failure_keeps_posts() {
        let source = ScriptedSource::failing(vec![Error::TransientFetch("offline".into())]);
        let mut feed = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        let before = feed.clone();

        let completion = feed.load_now(&source).unwrap();
        assert!(matches!(completion, Some(Completion::Retryable(_))));
        assert!(!feed.is_loading());
        assert!(feed.posts().ptr_eq(before.posts()));
        assert!(feed.last_error().is_some());

        assert_eq!(
            feed.load_now(&source),
            Ok(Some(Completion::Appended(20)))
        );
        assert_eq!(feed.len(), 70);
        assert_eq!(feed.last_error(), None);
    }

    #[test]
    fn fatal_failure_stops_loading() {
        let err = Error::FatalConfiguration("no source".into());
        let source = ScriptedSource::failing(vec![err.clone()]);
        let mut feed = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();

        assert_eq!(feed.load_now(&source), Err(err.clone()));
        assert_eq!(feed.state(), &LoadState::Failed(err));
        assert!(feed.is_failed());
        assert_eq!(feed.begin_load(), None);
        assert_eq!(feed.len(), 50);
    }

    #[test]
    fn misplaced_page_is_retryable() {
        let mut feed = Feed::mount(LoadPolicy::scroll(), &SyntheticSource).unwrap();
        let ticket = feed.begin_load().unwrap();
        let wrong = SyntheticSource.fetch(10, 20);
        assert!(matches!(
            feed.complete(ticket, wrong),
            Ok(Completion::Retryable(Error::TransientFetch(_)))
        ));
        assert_eq!(feed.len(), 50);
    }

    #[test]
    fn max_count_stops_growth() {
        let policy = LoadPolicy::sentinel().with_max_count(MaxCount::AtMost(60));
        let mut feed = Feed::mount(policy, &SyntheticSource).unwrap();
        assert!(feed.load_now(&SyntheticSource).unwrap().is_some());
        assert!(feed.load_now(&SyntheticSource).unwrap().is_some());
        assert_eq!(feed.len(), 75);
        assert!(feed.is_exhausted());
        assert_eq!(feed.load_now(&SyntheticSource), Ok(None));
        assert_eq!(feed.len(), 75);
    }

    #[test]
    fn same_tracks_replacement() {
        let mut feed = Feed::mount(LoadPolicy::sentinel(), &SyntheticSource).unwrap();
        let copy = feed.clone();
        assert!(feed.same(&copy));
        feed.load_now(&SyntheticSource).unwrap();
        assert!(!feed.same(&copy));
        assert_eq!(copy.len(), 25);
    }
}
