//! Fixed-width text report.
//!
//! Renders run events in the column layout the comparison tools have always
//! printed, so existing scripts that scrape the report keep working. Lines
//! starting with `#` are commentary; everything else is data.

use super::{Event, EventHandler};
use crate::config::AnalysisMode;
use crate::metrics::FrameStats;

use std::io::{self, Write};
use std::sync::Mutex;

/// Data rows printed between repetitions of the table header.
pub const HEADER_INTERVAL: usize = 26;

struct ReportState {
    output: Box<dyn Write + Send>,
    rows_since_header: usize,
    error: Option<io::Error>,
}

/// Event handler that writes the human-readable report.
pub struct TextReportHandler {
    state: Mutex<ReportState>,
    verbose: bool,
}

impl TextReportHandler {
    /// Create a report handler that writes to stdout
    pub fn new(verbose: bool) -> Self {
        Self::with_writer(Box::new(io::stdout()), verbose)
    }

    /// Create a report handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>, verbose: bool) -> Self {
        Self {
            state: Mutex::new(ReportState {
                output: writer,
                rows_since_header: 0,
                error: None,
            }),
            verbose,
        }
    }

    /// Flushes the writer and returns the first write failure, if any.
    pub fn finish(&self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("report writer lock poisoned"))?;
        if let Some(err) = state.error.take() {
            return Err(err);
        }
        state.output.flush()
    }

    fn write_lines(&self, lines: &[String]) {
        if let Ok(mut state) = self.state.lock() {
            if state.error.is_some() {
                return;
            }
            for line in lines {
                if let Err(err) = writeln!(state.output, "{line}") {
                    state.error = Some(err);
                    return;
                }
            }
        }
    }

    fn write_row(&self, row: String) {
        let needs_header = match self.state.lock() {
            Ok(mut state) => {
                let due = state.rows_since_header == 0;
                state.rows_since_header = (state.rows_since_header + 1) % HEADER_INTERVAL;
                due
            }
            Err(_) => return,
        };

        if needs_header {
            let mut lines = table_header();
            lines.push(row);
            self.write_lines(&lines);
        } else {
            self.write_lines(&[row]);
        }
    }
}

impl EventHandler for TextReportHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::RunConfigured {
                geometry,
                dimension_source,
                inputs,
                mode,
                window_size,
                skip_frames,
                verbosity,
            } => {
                let mut lines = vec![format!(
                    "# dimensions: {} x {} ({})",
                    geometry.width(),
                    geometry.height(),
                    dimension_source.as_str()
                )];
                for (i, input) in inputs.iter().enumerate() {
                    lines.push(format!("# file{}: {}", i + 1, input.display()));
                }
                lines.push(format!("# windowsize: {window_size}"));
                lines.push(format!("# skipframes: {skip_frames}"));
                lines.push(format!(
                    "# bestmatch: {}",
                    u8::from(*mode == AnalysisMode::BestMatch)
                ));
                lines.push(format!("# verbose: {verbosity}"));
                lines.push(format!(
                    "# dcthashmatch: {}",
                    u8::from(*mode == AnalysisMode::HashAlign)
                ));
                self.write_lines(&lines);
            }

            Event::FrameCompared { index, stats } => {
                self.write_row(format_compare_row(*index, stats));
            }

            Event::PairScanned {
                anchor_index,
                candidate_index,
                stats,
            } => {
                self.write_lines(&[format!(
                    "frame {anchor_index:08}.{candidate_index:08}, mse Y {:8.2}, U {:8.2}, V {:8.2}, psnr(dB) Y {:8.2}, U {:8.2}, V {:8.2}",
                    stats.y_mse, stats.u_mse, stats.v_mse, stats.y_psnr, stats.u_psnr, stats.v_psnr
                )]);
            }

            Event::BestMatchFound(result) => {
                self.write_lines(&[format!(
                    "best match for file1.frame {:08}, y mse was {:8.2} file2.frame {:08}",
                    result.anchor_index, result.min_y_mse, result.best_frame_index
                )]);
            }

            Event::FrameHashed {
                source,
                index,
                hash,
                ..
            } if self.verbose => {
                self.write_lines(&[format!(
                    "frame {index:08}, hash {hash:016x}, {}",
                    source.display()
                )]);
            }

            Event::AlignmentComplete {
                result,
                matched_hashes,
                trims,
            } => {
                let mut lines = Vec::new();
                if self.verbose && !matched_hashes.is_empty() {
                    let hashes: Vec<String> =
                        matched_hashes.iter().map(|h| format!("{h:016x}")).collect();
                    lines.push(format!("# Matching sequence: {}", hashes.join(" ")));
                }
                lines.push(format!("# hash sequence matches: {}", result.match_length));
                if result.found() {
                    let [start_a, start_b] = result.absolute_starts();
                    lines.push(format!(
                        "# Frame sequence, file 1 begins frame {start_a:08}, file 2 begins frame {start_b:08}"
                    ));
                    if trims.is_empty() {
                        lines.push(
                            "# No trimming instructions necessary, YUV is already aligned."
                                .to_string(),
                        );
                    }
                    for trim in trims {
                        lines.push("# Trimming instructions:".to_string());
                        lines.push(format!("#   {}", trim.dd_command()));
                        lines.push(format!("#   byte offset: {}", trim.byte_offset()));
                    }
                }
                self.write_lines(&lines);
            }

            _ => {}
        }
    }
}

/// Bracket line grouping frame number, MSE, PSNR, sharpness and hash columns.
const TABLE_RULE: &str = "#------> <---------------------------> <---------------------------> <-----------------> <---------------------------------------------------------------->";

fn table_header() -> Vec<String> {
    let first = format!(
        "{:>8} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>27} {:>17} {:>8} {:>21}",
        "#  Frame", "MSE", "", "", "PSNR", "", "", "Sharp", "DCT Hash", "", "Hamming", "Hash"
    );
    let second = format!(
        "{:>8} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>18} {:>17} {:>8} {:>21}",
        "#     Nr", "Y", "U", "V", "Y", "U", "V", "f1", "f2", "f1", "f2", "Dist", "Assessment"
    );
    vec![first, second, TABLE_RULE.to_string()]
}

fn format_compare_row(index: u64, stats: &FrameStats) -> String {
    format!(
        "{index:08}, {:8.2}, {:8.2}, {:8.2}, {:8.2}, {:8.2}, {:8.2}, {:8.2}, {:8.2}, {:016x}, {:016x}, {:7}, {:>20}",
        stats.y_mse,
        stats.u_mse,
        stats.v_mse,
        stats.y_psnr,
        stats.u_psnr,
        stats.v_psnr,
        stats.sharpness[0],
        stats.sharpness[1],
        stats.hash[0],
        stats.hash[1],
        stats.hash_distance(),
        stats.assessment().as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DimensionSource;
    use crate::frame::FrameGeometry;
    use crate::processing::{AlignmentResult, BestMatchResult, TrimInstruction};
    use std::path::PathBuf;
    use std::sync::Arc;

    struct MockWriter {
        content: Arc<Mutex<Vec<u8>>>,
    }

    impl MockWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let content = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    content: content.clone(),
                },
                content,
            )
        }
    }

    impl Write for MockWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.content.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn output_of(content: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(content.lock().unwrap().clone()).unwrap()
    }

    fn identical_stats() -> FrameStats {
        FrameStats {
            y_psnr: f64::INFINITY,
            u_psnr: f64::INFINITY,
            v_psnr: f64::INFINITY,
            sharpness: [12.5, 12.5],
            hash: [0xABCD, 0xABCD],
            ..FrameStats::default()
        }
    }

    #[test]
    fn test_run_header() {
        let (writer, content) = MockWriter::new();
        let handler = TextReportHandler::with_writer(Box::new(writer), false);

        handler.handle(&Event::RunConfigured {
            geometry: FrameGeometry::new(1280, 720).unwrap(),
            dimension_source: DimensionSource::Detected,
            inputs: vec![PathBuf::from("a.yuv"), PathBuf::from("b.yuv")],
            mode: AnalysisMode::BestMatch,
            window_size: 30,
            skip_frames: 2,
            verbosity: 0,
        });

        let output = output_of(&content);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "# dimensions: 1280 x 720 (autodetected)");
        assert_eq!(lines[1], "# file1: a.yuv");
        assert_eq!(lines[2], "# file2: b.yuv");
        assert!(lines.contains(&"# skipframes: 2"));
        assert!(lines.contains(&"# bestmatch: 1"));
        assert!(lines.contains(&"# dcthashmatch: 0"));
    }

    #[test]
    fn test_compare_row_layout() {
        let row = format_compare_row(7, &identical_stats());
        assert!(row.starts_with("00000007,     0.00,"));
        assert!(row.contains("     inf"));
        assert!(row.contains("000000000000abcd, 000000000000abcd,       0"));
        assert!(row.ends_with("         Exact Match"));
    }

    #[test]
    fn test_table_header_groups_columns() {
        let header = table_header();
        assert_eq!(header.len(), 3);
        assert!(header[0].starts_with("#  Frame       MSE"));
        assert!(header[1].starts_with("#     Nr         Y"));
        assert!(header[2].starts_with("#------> <----"));
        assert_eq!(header[2].matches('<').count(), 4);
        assert!(header[2].ends_with("------->"));
    }

    #[test]
    fn test_header_repeats_every_interval() {
        let (writer, content) = MockWriter::new();
        let handler = TextReportHandler::with_writer(Box::new(writer), false);

        for index in 0..(HEADER_INTERVAL as u64 * 2 + 1) {
            handler.handle(&Event::FrameCompared {
                index,
                stats: identical_stats(),
            });
        }
        handler.finish().unwrap();

        let output = output_of(&content);
        let headers = output.lines().filter(|l| l.starts_with("#  Frame")).count();
        assert_eq!(headers, 3);

        let lines: Vec<&str> = output.lines().collect();
        // Three header lines, then rows 0..26, then the header again.
        assert!(lines[3].starts_with("00000000,"));
        assert!(lines[3 + HEADER_INTERVAL].starts_with("#  Frame"));
        assert!(lines[3 + HEADER_INTERVAL + 3].starts_with("00000026,"));
    }

    #[test]
    fn test_best_match_line() {
        let (writer, content) = MockWriter::new();
        let handler = TextReportHandler::with_writer(Box::new(writer), false);

        handler.handle(&Event::BestMatchFound(BestMatchResult {
            anchor_index: 5,
            best_frame_index: 3,
            min_y_mse: 0.0,
        }));

        assert_eq!(
            output_of(&content),
            "best match for file1.frame 00000005, y mse was     0.00 file2.frame 00000003\n"
        );
    }

    #[test]
    fn test_hash_lines_only_when_verbose() {
        let event = Event::FrameHashed {
            source: PathBuf::from("a.yuv"),
            index: 4,
            hash: 0xFF,
            sharpness: 1.0,
        };

        let (writer, content) = MockWriter::new();
        TextReportHandler::with_writer(Box::new(writer), false).handle(&event);
        assert!(output_of(&content).is_empty());

        let (writer, content) = MockWriter::new();
        TextReportHandler::with_writer(Box::new(writer), true).handle(&event);
        assert_eq!(
            output_of(&content),
            "frame 00000004, hash 00000000000000ff, a.yuv\n"
        );
    }

    #[test]
    fn test_alignment_with_trim() {
        let (writer, content) = MockWriter::new();
        let handler = TextReportHandler::with_writer(Box::new(writer), false);

        let result = AlignmentResult {
            match_length: 8,
            offset_a: 0,
            offset_b: 3,
            first_frame_a: 0,
            first_frame_b: 0,
        };
        handler.handle(&Event::AlignmentComplete {
            result,
            matched_hashes: vec![1, 2, 3],
            trims: vec![TrimInstruction {
                source: PathBuf::from("b.yuv"),
                frames_to_trim: 3,
                frame_size: 24,
            }],
        });

        let output = output_of(&content);
        assert!(!output.contains("Matching sequence"));
        assert!(output.contains("# hash sequence matches: 8\n"));
        assert!(output.contains(
            "# Frame sequence, file 1 begins frame 00000000, file 2 begins frame 00000003\n"
        ));
        assert!(output.contains("# Trimming instructions:\n"));
        assert!(output.contains("#   dd if=b.yuv of=b.yuv.trimmed bs=24 skip=3\n"));
        assert!(output.contains("#   byte offset: 72\n"));
    }

    #[test]
    fn test_alignment_already_aligned() {
        let (writer, content) = MockWriter::new();
        let handler = TextReportHandler::with_writer(Box::new(writer), false);

        handler.handle(&Event::AlignmentComplete {
            result: AlignmentResult {
                match_length: 30,
                offset_a: 0,
                offset_b: 0,
                first_frame_a: 0,
                first_frame_b: 0,
            },
            matched_hashes: Vec::new(),
            trims: Vec::new(),
        });

        assert!(output_of(&content)
            .contains("# No trimming instructions necessary, YUV is already aligned.\n"));
    }

    #[test]
    fn test_no_alignment_found() {
        let (writer, content) = MockWriter::new();
        let handler = TextReportHandler::with_writer(Box::new(writer), false);

        handler.handle(&Event::AlignmentComplete {
            result: AlignmentResult::default(),
            matched_hashes: Vec::new(),
            trims: Vec::new(),
        });

        assert_eq!(output_of(&content), "# hash sequence matches: 0\n");
    }
}
