mod load_after_delay;
mod on_mount;
mod on_sentinel;
mod on_viewport;

pub use load_after_delay::LoadAfterDelay;
pub use on_mount::OnMount;
pub use on_sentinel::OnSentinel;
pub use on_viewport::OnViewport;
