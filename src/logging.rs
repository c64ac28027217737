//! Tracing installation for hosts embedding Arbor.
//!
//! Every crate of the workspace reports through [`tracing`]. Nothing is
//! printed until a subscriber is installed, either by the host or through
//! [`install_tracing`].

use std::io::{self, Write};
use std::sync::Once;

use tracing_subscriber::fmt::writer::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogConfig;

const TRACING_PREFIX: &str = "[arbor] ";

static TRACING_INSTALLED: Once = Once::new();

/// Installs a stderr subscriber filtered by `config.level` (idempotent).
///
/// `RUST_LOG` takes precedence over the configured level when set. Returns
/// `true` if this call installed the subscriber. Later calls, and calls made
/// after the host installed its own global subscriber, return `false`.
pub fn install_tracing(config: &LogConfig) -> bool {
    let mut installed = false;
    TRACING_INSTALLED.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

        let console = fmt::layer()
            .with_writer(PrefixedWriter)
            .with_ansi(config.ansi)
            .with_target(true)
            .with_filter(filter);

        installed = tracing_subscriber::registry().with(console).try_init().is_ok();
        if !installed {
            eprintln!("{TRACING_PREFIX}a global tracing subscriber is already set");
        }
    });
    installed
}

#[derive(Debug, Clone, Copy, Default)]
struct PrefixedWriter;

impl<'a> MakeWriter<'a> for PrefixedWriter {
    type Writer = PrefixedWriterInner<io::Stderr>;

    fn make_writer(&'a self) -> Self::Writer {
        PrefixedWriterInner {
            inner: io::stderr(),
            wrote_prefix: false,
        }
    }
}

struct PrefixedWriterInner<W> {
    inner: W,
    wrote_prefix: bool,
}

impl<W: Write> Write for PrefixedWriterInner<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.wrote_prefix {
            self.inner.write_all(TRACING_PREFIX.as_bytes())?;
            self.wrote_prefix = true;
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_written_once_per_event() {
        let mut writer = PrefixedWriterInner {
            inner: Vec::new(),
            wrote_prefix: false,
        };
        writer.write_all(b"INFO ").unwrap();
        writer.write_all(b"mounted\n").unwrap();
        assert_eq!(writer.inner, b"[arbor] INFO mounted\n");
    }

    #[test]
    fn second_install_is_a_no_op() {
        let config = LogConfig::default();
        install_tracing(&config);
        assert!(!install_tracing(&config));
    }
}
