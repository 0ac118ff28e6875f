// ============================================================================
// yuvcmp-core/src/processing/compare.rs
// ============================================================================
//
// SEQUENTIAL COMPARATOR: Lock-step statistics over two streams
//
// Frame i of the first stream is compared with frame i of the second until
// either stream ends. Skip and window settings do not apply here; every
// frame pair is reported.

use crate::error::CoreResult;
use crate::events::{Event, EventDispatcher, Stage};
use crate::frame::{FrameGeometry, FrameReader, ensure_same_size};
use crate::metrics::compute_stats;

use log::debug;
use std::path::Path;

/// Compares two equally sized streams frame by frame.
///
/// Emits one [`Event::FrameCompared`] per pair and returns the pair count.
pub fn compare_streams(
    path_a: &Path,
    path_b: &Path,
    geometry: FrameGeometry,
    dispatcher: &EventDispatcher,
) -> CoreResult<u64> {
    ensure_same_size(path_a, path_b)?;

    let mut reader_a = FrameReader::open(path_a, geometry)?;
    let mut reader_b = FrameReader::open(path_b, geometry)?;
    let total = reader_a.frame_count();

    dispatcher.emit(Event::StageStarted {
        stage: Stage::Compare,
        total,
        message: format!("Comparing {total} frames"),
    });

    let mut compared = 0;
    loop {
        let index = reader_a.position();
        let Some(frame_a) = reader_a.next_frame()? else {
            break;
        };
        let Some(frame_b) = reader_b.next_frame()? else {
            break;
        };

        let stats = compute_stats(frame_a, Some(frame_b));
        dispatcher.emit(Event::FrameCompared { index, stats });

        compared += 1;
        dispatcher.emit(Event::StageProgress {
            stage: Stage::Compare,
            current: compared,
            total,
        });
    }

    dispatcher.emit(Event::StageComplete {
        stage: Stage::Compare,
    });
    debug!("Compared {compared} frame pair(s)");
    Ok(compared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::events::EventHandler;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    #[derive(Default)]
    struct Rows {
        rows: Mutex<Vec<(u64, f64)>>,
    }

    impl EventHandler for Rows {
        fn handle(&self, event: &Event) {
            if let Event::FrameCompared { index, stats } = event {
                self.rows.lock().unwrap().push((*index, stats.y_mse));
            }
        }
    }

    fn stream(frames: &[u8], frame_size: usize) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for &value in frames {
            file.write_all(&vec![value; frame_size]).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_compares_every_frame_pair() {
        let geometry = FrameGeometry::new(4, 4).unwrap();
        let a = stream(&[10, 20, 30], geometry.frame_size());
        let b = stream(&[10, 22, 30], geometry.frame_size());

        let rows = Arc::new(Rows::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(rows.clone());

        let count = compare_streams(a.path(), b.path(), geometry, &dispatcher).unwrap();
        assert_eq!(count, 3);
        assert_eq!(
            *rows.rows.lock().unwrap(),
            vec![(0, 0.0), (1, 4.0), (2, 0.0)]
        );
    }

    #[test]
    fn test_size_mismatch_is_fatal() {
        let geometry = FrameGeometry::new(4, 4).unwrap();
        let a = stream(&[1, 2], geometry.frame_size());
        let b = stream(&[1], geometry.frame_size());

        let result = compare_streams(a.path(), b.path(), geometry, &EventDispatcher::new());
        assert!(matches!(result, Err(CoreError::StreamSizeMismatch { .. })));
    }
}
