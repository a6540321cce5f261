use std::time::Duration;

use druid::Selector;
use lazyfeed_core::{feed::LoadTicket, sentinel::AppearanceKey};

use crate::data::Nav;

// Navigation

pub const NAVIGATE: Selector<Nav> = Selector::new("app.navigate");
pub const RELOAD: Selector = Selector::new("app.reload");

// Feed

pub const SCHEDULE_LOAD: Selector<(LoadTicket, Duration)> = Selector::new("app.feed.schedule-load");
pub const SENTINEL_APPEARED: Selector<AppearanceKey> =
    Selector::new("app.feed.sentinel-appeared");
