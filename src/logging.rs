use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "editor_engine=info";

fn filter(directives: Option<&str>) -> EnvFilter {
    match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Installs the global subscriber. Calling it again is a no-op.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(directives: Option<&str>) {
    let _ = tracing_subscriber::fmt().with_env_filter(filter(directives)).try_init();
}

#[cfg(target_arch = "wasm32")]
pub fn init(directives: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(directives))
        .with_writer(console::ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .try_init();
}

#[cfg(target_arch = "wasm32")]
mod console {
    use std::io;

    use tracing_subscriber::fmt::MakeWriter;

    pub struct ConsoleMakeWriter;

    /// Buffers one formatted event and logs it on drop.
    pub struct ConsoleWriter {
        buf: Vec<u8>,
    }

    impl io::Write for ConsoleWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Drop for ConsoleWriter {
        fn drop(&mut self) {
            let line = String::from_utf8_lossy(&self.buf);
            let line = line.trim_end();
            if !line.is_empty() {
                web_sys::console::log_1(&line.into());
            }
        }
    }

    impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
        type Writer = ConsoleWriter;

        fn make_writer(&'a self) -> Self::Writer {
            ConsoleWriter { buf: Vec::new() }
        }
    }
}
