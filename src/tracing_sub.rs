use std::io;

use tracing::Level;

#[derive(Clone, Copy, Debug)]
pub struct SubscriberMakeWriter;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = io::Stderr;

    fn make_writer(&'a self) -> Self::Writer {
        io::stderr()
    }
}

/// Initialize the tracing subscriber writing compact lines to stderr. Safe to
/// call multiple times; subsequent calls are no-ops for the global
/// subscriber.
pub fn init_default() {
    init_with_level(Level::INFO);
}

pub fn init_with_level(level: Level) {
    let _ = tracing_subscriber::fmt()
        .compact()
        .with_max_level(level)
        .with_writer(SubscriberMakeWriter)
        .with_target(false)
        .with_thread_names(false)
        .try_init();
}
