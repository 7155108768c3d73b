use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, log, Level, LevelFilter};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config, Logger, Root},
    encode::pattern::PatternEncoder,
};
use reqwest::{Method, StatusCode, Url};

use crate::error::{Error, Result};

/// A unique identifier for a particular request to the backend.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct RequestId(pub usize);

impl Display for RequestId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl RequestId {
    /// Atomically get the next ID. This wraps around back to zero if you somehow exceed a usize.
    pub fn next() -> RequestId {
        static REQUEST_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);
        RequestId(REQUEST_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Log an outgoing request and return the ID to log its response under.
pub fn log_request(method: &Method, url: &Url) -> RequestId {
    let id = RequestId::next();
    info!("->req{id} {method} {url}");
    id
}

/// Log the backend's response to request `id`.
pub fn log_response(id: RequestId, status: StatusCode, url: &Url) {
    log!(response_level(status), "<-rsp{id} {status} {url}");
}

/// Server errors are errors, client errors are warnings, everything else is routine.
pub fn response_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::Error
    } else if status.is_client_error() {
        Level::Warn
    } else {
        Level::Info
    }
}

/// Set up logging from the log4rs config at `path`, or log warnings to
/// stderr if there is no such file.
pub fn init_logging(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if path.exists() {
        log4rs::init_file(path, Default::default()).map_err(|e| Error::Logging(e.to_string()))?;
        info!("Initialised logging from {}", path.display());
    } else {
        log4rs::init_config(fallback_config()?).map_err(|e| Error::Logging(e.to_string()))?;
    }
    Ok(())
}

/// Warnings and above on stderr, keeping stdout for command output.
fn fallback_config() -> Result<Config> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();
    Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .logger(Logger::builder().build("reqwest", LevelFilter::Warn))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))
        .map_err(|e| Error::Logging(e.to_string()))
}
