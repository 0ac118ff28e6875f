//! JSON report handler for machine-readable output
//!
//! Each relevant event becomes one JSON object on its own line, tagged with a
//! `type` field. Hashes are written as 16-digit hex strings and infinite PSNR
//! values as `null`, since JSON has no representation for either.

use super::{Event, EventHandler};
use crate::metrics::FrameStats;
use serde_json::{Value, json};
use std::io::{self, Write};
use std::sync::Mutex;

struct JsonOutput {
    writer: Box<dyn Write + Send>,
    error: Option<io::Error>,
}

/// Event handler that outputs run events as JSON lines
pub struct JsonReportHandler {
    output: Mutex<JsonOutput>,
}

impl JsonReportHandler {
    /// Create a new JSON report handler that writes to stdout
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Create a new JSON report handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(JsonOutput {
                writer,
                error: None,
            }),
        }
    }

    /// Flushes the writer and returns the first write failure, if any.
    pub fn finish(&self) -> io::Result<()> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| io::Error::other("report writer lock poisoned"))?;
        if let Some(err) = output.error.take() {
            return Err(err);
        }
        output.writer.flush()
    }

    fn write_json(&self, value: Value) {
        let Ok(mut output) = self.output.lock() else {
            return;
        };
        if output.error.is_some() {
            return;
        }
        let result = serde_json::to_string(&value)
            .map_err(io::Error::from)
            .and_then(|line| writeln!(output.writer, "{line}"))
            .and_then(|()| output.writer.flush());
        if let Err(err) = result {
            output.error = Some(err);
        }
    }
}

fn hex(hash: u64) -> String {
    format!("{hash:016x}")
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn stats_json(stats: &FrameStats) -> Value {
    json!({
        "mse": { "y": stats.y_mse, "u": stats.u_mse, "v": stats.v_mse },
        "psnr": {
            "y": finite(stats.y_psnr),
            "u": finite(stats.u_psnr),
            "v": finite(stats.v_psnr)
        },
        "sharpness": stats.sharpness,
        "hash": [hex(stats.hash[0]), hex(stats.hash[1])],
        "hamming_distance": stats.hash_distance(),
        "assessment": stats.assessment().as_str()
    })
}

impl EventHandler for JsonReportHandler {
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
                self.write_json(json!({
                    "type": "run",
                    "geometry": geometry,
                    "frame_size": geometry.frame_size(),
                    "dimensions": dimension_source.as_str(),
                    "inputs": inputs.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
                    "mode": mode.as_str(),
                    "window_size": window_size,
                    "skip_frames": skip_frames,
                    "verbose": verbosity
                }));
            }

            Event::FrameCompared { index, stats } => {
                let mut value = stats_json(stats);
                value["type"] = json!("frame");
                value["frame"] = json!(index);
                self.write_json(value);
            }

            Event::PairScanned {
                anchor_index,
                candidate_index,
                stats,
            } => {
                let mut value = stats_json(stats);
                value["type"] = json!("pair");
                value["frame"] = json!(anchor_index);
                value["candidate"] = json!(candidate_index);
                self.write_json(value);
            }

            Event::BestMatchFound(result) => {
                self.write_json(json!({
                    "type": "best_match",
                    "frame": result.anchor_index,
                    "best_frame": result.best_frame_index,
                    "y_mse": result.min_y_mse
                }));
            }

            Event::FrameHashed {
                source,
                index,
                hash,
                sharpness,
            } => {
                self.write_json(json!({
                    "type": "hash",
                    "source": source.display().to_string(),
                    "frame": index,
                    "hash": hex(*hash),
                    "sharpness": sharpness
                }));
            }

            Event::AlignmentComplete {
                result,
                matched_hashes,
                trims,
            } => {
                let starts = result.found().then(|| result.absolute_starts());
                self.write_json(json!({
                    "type": "alignment",
                    "matches": result.match_length,
                    "file1_begins": starts.map(|s| s[0]),
                    "file2_begins": starts.map(|s| s[1]),
                    "matched_hashes": matched_hashes.iter().map(|h| hex(*h)).collect::<Vec<_>>(),
                    "trims": trims.iter().map(|t| json!({
                        "source": t.source.display().to_string(),
                        "frames": t.frames_to_trim,
                        "frame_size": t.frame_size,
                        "byte_offset": t.byte_offset(),
                        "command": t.dd_command()
                    })).collect::<Vec<_>>()
                }));
            }

            // Progress stays on the terminal
            _ => {}
        }
    }
}

impl Default for JsonReportHandler {
    fn default() -> Self {
        Self::new()
    }
}
