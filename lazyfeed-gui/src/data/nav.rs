use druid::Data;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Data, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Nav {
    ScrollTrigger,
    SentinelTrigger,
}

impl Nav {
    pub fn title(&self) -> &'static str {
        match self {
            Nav::ScrollTrigger => "Scroll",
            Nav::SentinelTrigger => "Sentinel",
        }
    }
}

impl Default for Nav {
    fn default() -> Self {
        Self::ScrollTrigger
    }
}
