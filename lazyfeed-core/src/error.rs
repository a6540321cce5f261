use std::{error, fmt, io};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The page could not be produced this time; the feed is left untouched and
    /// the next trigger may try again.
    TransientFetch(String),
    /// The feed cannot continue with the current setup.
    FatalConfiguration(String),
    ScreenClosed,
    IoError(String),
    JsonError(String),
}

impl Error {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientFetch(_))
    }
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransientFetch(err) => write!(f, "Failed to fetch posts: {err}"),
            Self::FatalConfiguration(err) => write!(f, "Invalid feed configuration: {err}"),
            Self::ScreenClosed => write!(f, "Screen is closed"),
            Self::IoError(err) | Self::JsonError(err) => f.write_str(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::JsonError(err.to_string())
    }
}

impl<T> From<crossbeam_channel::SendError<T>> for Error {
    fn from(_: crossbeam_channel::SendError<T>) -> Error {
        Error::ScreenClosed
    }
}
