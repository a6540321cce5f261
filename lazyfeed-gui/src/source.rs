use std::sync::Arc;

use lazyfeed_core::source::{PostSource, SyntheticSource};
use once_cell::sync::OnceCell;

static GLOBAL_SOURCE: OnceCell<Arc<dyn PostSource>> = OnceCell::new();

pub fn install_as_global(source: Arc<dyn PostSource>) {
    if GLOBAL_SOURCE.set(source).is_err() {
        log::warn!("post source is already installed");
    }
}

/// Installed post source, posts are generated locally until one is installed.
pub fn global() -> Arc<dyn PostSource> {
    GLOBAL_SOURCE
        .get_or_init(|| Arc::new(SyntheticSource))
        .clone()
}
