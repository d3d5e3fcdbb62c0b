//! Host-side collaborators the launcher calls into.

/// Hands a URL to whatever the platform uses for links leaving the app.
pub trait ExternalOpener {
    fn open(&mut self, url: &str);
}

/// Keeps the launcher process resident while it runs in the background.
pub trait KeepAlive {
    fn start(&mut self);
    fn stop(&mut self);
}

/// Opener that only logs; used by the headless demo.
#[derive(Debug, Default)]
pub struct LogOpener;

impl ExternalOpener for LogOpener {
    fn open(&mut self, url: &str) {
        log::info!("opening externally: {}", url);
    }
}

/// Keep-alive that only logs; used by the headless demo.
#[derive(Debug, Default)]
pub struct LogKeepAlive;

impl KeepAlive for LogKeepAlive {
    fn start(&mut self) {
        log::info!("keep-alive started");
    }

    fn stop(&mut self) {
        log::info!("keep-alive stopped");
    }
}
