//! The scanner seam and read options.

use std::{
    fmt,
    sync::Arc,
};

use wbr_error::Result;

use crate::reader::BinaryReader;

/// A trait for receiving trace lines
pub trait LogSink: Send + Sync {
    /// Write one line, without its trailing newline
    fn write_log(&self, entry: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn write_log(&self, entry: &str) {
        self(entry);
    }
}

/// Options shared by every read entry point
#[derive(Clone, Default)]
pub struct ReadBinaryOptions {
    /// When set, every event is traced to this sink
    pub log_sink:         Option<Arc<dyn LogSink>>,
    /// Whether events of the `name` section are delivered
    pub read_debug_names: bool,
}

impl ReadBinaryOptions {
    /// Trace events to `sink`
    #[must_use]
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Deliver `name` section events
    #[must_use]
    pub fn with_debug_names(mut self, read_debug_names: bool) -> Self {
        self.read_debug_names = read_debug_names;
        self
    }
}

impl fmt::Debug for ReadBinaryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadBinaryOptions")
            .field("log_sink", &self.log_sink.is_some())
            .field("read_debug_names", &self.read_debug_names)
            .finish()
    }
}

/// Producer of decode events: the scanner.
///
/// An implementation walks `data` and calls `reader` once per event, in
/// encoding order, stopping at the first `Err`. Events of the `name` section
/// are only delivered when `options.read_debug_names` is set.
pub trait EventSource {
    /// Walk `data`, feeding every event to `reader`
    fn read(&self, data: &[u8], reader: &mut dyn BinaryReader, options: &ReadBinaryOptions) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_default_options() {
        let options = ReadBinaryOptions::default();
        assert!(options.log_sink.is_none());
        assert!(!options.read_debug_names);
        assert_eq!(
            format!("{options:?}"),
            "ReadBinaryOptions { log_sink: false, read_debug_names: false }"
        );
    }

    #[test]
    fn test_closure_sink() {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&lines);
        let sink: Arc<dyn LogSink> = Arc::new(move |entry: &str| {
            captured.lock().unwrap().push(entry.to_string());
        });
        let options = ReadBinaryOptions::default().with_log_sink(sink).with_debug_names(true);

        if let Some(sink) = &options.log_sink {
            sink.write_log("BeginModule(version: 1)");
        }
        assert!(options.read_debug_names);
        assert_eq!(lines.lock().unwrap().as_slice(), ["BeginModule(version: 1)"]);
    }
}
