use super::{Record, Recorder};

/// Buffered recorder.
///
/// Keeps every written record in memory, in the order of writing.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// The number of records written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no record has been written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Collects the scalar stored under `key` from every record having it.
    pub fn scalars(&self, key: &str) -> Vec<f32> {
        self.buf
            .iter()
            .filter_map(|r| r.get_scalar(key).ok())
            .collect()
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}
