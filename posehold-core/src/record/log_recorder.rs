use super::{AggregateRecorder, Record, RecordStorage, RecordValue, Recorder};
use log::{info, trace};

/// Writes records through the [`log`] facade.
///
/// [`Recorder::write`] emits each record at `trace` level. Records passed to
/// [`AggregateRecorder::store`] are kept until [`AggregateRecorder::flush`],
/// which logs their aggregate at `info` level.
#[derive(Default)]
pub struct LogRecorder {
    storage: RecordStorage,
}

impl LogRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

fn format_record(record: &Record) -> String {
    let mut items: Vec<_> = record
        .iter()
        .filter_map(|(k, v)| match v {
            RecordValue::Scalar(v) => Some(format!("{} = {:.4}", k, v)),
            RecordValue::String(s) => Some(format!("{} = {}", k, s)),
            RecordValue::Array1(_) => None,
        })
        .collect();
    items.sort();
    items.join(", ")
}

impl Recorder for LogRecorder {
    fn write(&mut self, record: Record) {
        trace!("{}", format_record(&record));
    }
}

impl AggregateRecorder for LogRecorder {
    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        if self.storage.is_empty() {
            return;
        }
        let record = self.storage.aggregate();
        info!("[{}] {}", step, format_record(&record));
    }
}
