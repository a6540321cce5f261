use std::{env, process, sync::Arc};

use crossbeam_channel::{unbounded, Receiver};
use lazyfeed_core::{
    error::Error,
    feed::{Completion, Feed},
    policy::LoadPolicy,
    screen::{FeedScreen, ScreenHandle, ScreenUpdate},
    sentinel::AppearanceKey,
    source::SyntheticSource,
    trigger::VisibleItems,
};

/// Rows the simulated viewport shows at once.
const VIEWPORT_ROWS: usize = 10;
const DEFAULT_LOADS: usize = 3;

#[derive(Clone, Copy, Debug)]
enum Mode {
    Scroll,
    Sentinel,
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mode = match args.get(1).map(String::as_str) {
        None | Some("scroll") => Mode::Scroll,
        Some("sentinel") => Mode::Sentinel,
        Some(other) => {
            eprintln!("unknown mode {:?}, expected `scroll` or `sentinel`", other);
            process::exit(1);
        }
    };
    let loads = match args.get(2).map(|arg| arg.parse::<usize>()) {
        None => DEFAULT_LOADS,
        Some(Ok(loads)) => loads,
        Some(Err(err)) => {
            eprintln!("invalid number of loads: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = run(mode, loads) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(mode: Mode, loads: usize) -> Result<(), Error> {
    let policy = match mode {
        Mode::Scroll => LoadPolicy::scroll(),
        Mode::Sentinel => LoadPolicy::sentinel(),
    };
    let (sender, updates) = unbounded();
    let screen = FeedScreen::mount(policy, Arc::new(SyntheticSource), sender)?;

    let mut feed = match updates.recv().map_err(|_| Error::ScreenClosed)? {
        ScreenUpdate::Mounted(feed) => feed,
        other => {
            log::error!("unexpected update before mount: {:?}", other);
            return Err(Error::ScreenClosed);
        }
    };
    log::info!("{:?} feed mounted with {} posts", mode, feed.len());

    for load in 1..=loads {
        if feed.is_exhausted() {
            log::info!("feed is exhausted at {} posts", feed.len());
            break;
        }
        trigger(&screen, mode, &feed)?;
        feed = wait_for_load(&updates)?;
        log::info!("load {}/{}: {} posts", load, loads, feed.len());
    }
    if let Some(last) = feed.posts().last() {
        log::info!("last post: {} {}", last.nickname, last.caption);
    }

    screen.unmount()
}

fn trigger(screen: &ScreenHandle, mode: Mode, feed: &Feed) -> Result<(), Error> {
    let total = feed.len();
    match mode {
        Mode::Scroll if total == 0 => screen.scrolled(VisibleItems::empty(0)),
        Mode::Scroll => {
            // Leave the bottom first, so a retry after a failure is a new arrival.
            let top = VIEWPORT_ROWS.min(total) - 1;
            screen.scrolled(VisibleItems::new(0..=top, total))?;
            let first = total.saturating_sub(VIEWPORT_ROWS);
            screen.scrolled(VisibleItems::new(first..=total - 1, total))
        }
        Mode::Sentinel => screen.sentinel_appeared(AppearanceKey::after(total)),
    }
}

fn wait_for_load(updates: &Receiver<ScreenUpdate>) -> Result<Feed, Error> {
    loop {
        match updates.recv().map_err(|_| Error::ScreenClosed)? {
            ScreenUpdate::LoadStarted(feed) => {
                log::info!("loading more after {} posts", feed.len());
            }
            ScreenUpdate::Loaded(feed, Completion::Appended(count)) => {
                log::debug!("appended {} posts", count);
                return Ok(feed);
            }
            ScreenUpdate::Loaded(feed, Completion::Retryable(err)) => {
                log::warn!("load failed, keeping {} posts: {}", feed.len(), err);
                return Ok(feed);
            }
            ScreenUpdate::Failed(_, err) => return Err(err),
            ScreenUpdate::Unmounted(_) => return Err(Error::ScreenClosed),
            ScreenUpdate::Mounted(_) | ScreenUpdate::Loaded(_, Completion::Stale) => {}
        }
    }
}
