use super::{Record, RecordStorage, Recorder};

/// Buffered recorder.
///
/// This is used for recording sequences of metrics during evaluation runs.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
}

impl BufferedRecorder {
    /// Construct the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an iterator over the records.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Number of buffered records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Moves the buffered records into a [`RecordStorage`] for aggregation.
    pub fn into_storage(self) -> RecordStorage {
        let mut storage = RecordStorage::new();
        for record in self.buf {
            storage.store(record);
        }
        storage
    }
}

impl Recorder for BufferedRecorder {
    /// Write a [`Record`] to the buffer.
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }
}
