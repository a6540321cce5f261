use std::{error, fmt};

use druid::Data;

#[derive(Clone, Debug, Data)]
pub enum Error {
    FeedError(String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::FeedError(err) => f.write_str(err),
        }
    }
}

impl From<lazyfeed_core::error::Error> for Error {
    fn from(err: lazyfeed_core::error::Error) -> Self {
        Self::FeedError(err.to_string())
    }
}
