//! JSON lines output for the embedding trainer.
//!
//! One object per line, always the same three fields:
//!
//! ```text
//! {"label":4.0,"in0":[196],"in1":[242]}
//! ```
//!
//! `in0` is the user feature and `in1` the item feature. Each is a
//! single-element list so that multi-token encodings fit the same shape.
//! Train and validation files share this schema. Output order is input
//! order; shuffling happens before this step.

use crate::error::{Result, SerializeError};
use crate::labels::LabeledExample;
use data_loader::{ItemId, UserId};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Wire shape of one line
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct JsonLine {
    label: f32,
    in0: Vec<UserId>,
    in1: Vec<ItemId>,
}

impl From<&LabeledExample> for JsonLine {
    fn from(example: &LabeledExample) -> Self {
        Self {
            label: example.label,
            in0: vec![example.user_id],
            in1: vec![example.item_id],
        }
    }
}

impl JsonLine {
    fn into_example(self, line: usize) -> Result<LabeledExample> {
        let user_id = single_feature(&self.in0, "in0", line)?;
        let item_id = single_feature(&self.in1, "in1", line)?;
        Ok(LabeledExample {
            user_id,
            item_id,
            label: self.label,
        })
    }
}

fn single_feature(values: &[u32], field: &str, line: usize) -> Result<u32> {
    match values {
        [value] => Ok(*value),
        _ => Err(SerializeError::Format {
            line,
            reason: format!("{} must hold exactly one id, found {}", field, values.len()),
        }),
    }
}

/// Write examples as JSON lines, one per example
pub fn write_json_lines<W: Write>(writer: W, examples: &[LabeledExample]) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for example in examples {
        serde_json::to_writer(&mut writer, &JsonLine::from(example))?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    debug!("Wrote {} JSON lines", examples.len());
    Ok(())
}

pub fn write_json_lines_to_path(path: &Path, examples: &[LabeledExample]) -> Result<()> {
    let file = File::create(path)?;
    write_json_lines(file, examples)?;
    info!("Wrote {} examples to {:?}", examples.len(), path);
    Ok(())
}

/// Read examples back from JSON lines; blank lines are skipped
pub fn read_json_lines<R: BufRead>(reader: R) -> Result<Vec<LabeledExample>> {
    let mut examples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let parsed: JsonLine =
            serde_json::from_str(&line).map_err(|e| SerializeError::Format {
                line: line_no,
                reason: e.to_string(),
            })?;
        examples.push(parsed.into_example(line_no)?);
    }
    Ok(examples)
}

pub fn read_json_lines_from_path(path: &Path) -> Result<Vec<LabeledExample>> {
    let file = File::open(path)?;
    let examples = read_json_lines(BufReader::new(file))?;
    info!("Read {} examples from {:?}", examples.len(), path);
    Ok(examples)
}

/// One (user, item) query for the prediction service
#[derive(Debug, Serialize)]
struct Instance {
    in0: [UserId; 1],
    in1: [ItemId; 1],
}

#[derive(Debug, Serialize)]
struct InferenceRequest {
    instances: Vec<Instance>,
}

/// Request body asking the prediction service to score every example
///
/// The features use the same field names and shape as the training lines;
/// labels are left out.
pub fn inference_payload(examples: &[LabeledExample]) -> Result<String> {
    let request = InferenceRequest {
        instances: examples
            .iter()
            .map(|e| Instance {
                in0: [e.user_id],
                in1: [e.item_id],
            })
            .collect(),
    };
    Ok(serde_json::to_string(&request)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn examples() -> Vec<LabeledExample> {
        vec![
            LabeledExample { user_id: 196, item_id: 242, label: 3.0 },
            LabeledExample { user_id: 22, item_id: 377, label: 1.0 },
            LabeledExample { user_id: 196, item_id: 242, label: 4.5 },
        ]
    }

    fn to_string(examples: &[LabeledExample]) -> String {
        let mut buffer = Vec::new();
        write_json_lines(&mut buffer, examples).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_line_schema() {
        let output = to_string(&examples()[..1]);
        assert_eq!(output, "{\"label\":3.0,\"in0\":[196],\"in1\":[242]}\n");

        let value: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_one_line_per_example_no_blank_lines() {
        let output = to_string(&examples());
        assert_eq!(output.lines().count(), 3);
        assert!(output.ends_with("}\n"));
        assert!(!output.contains("\n\n"));
    }

    #[test]
    fn test_round_trip_keeps_order_and_duplicates() {
        let output = to_string(&examples());
        let parsed = read_json_lines(Cursor::new(output)).unwrap();
        assert_eq!(parsed, examples());
    }

    #[test]
    fn test_empty_input_writes_nothing() {
        assert_eq!(to_string(&[]), "");
        assert!(read_json_lines(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn test_reader_rejects_multi_valued_features() {
        let input = "{\"label\":1,\"in0\":[1,2],\"in1\":[3]}\n";
        let err = read_json_lines(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, SerializeError::Format { line: 1, .. }));

        let input = "{\"label\":1,\"in0\":[1],\"in1\":[]}\n";
        assert!(read_json_lines(Cursor::new(input)).is_err());
    }

    #[test]
    fn test_reader_rejects_unknown_fields_and_garbage() {
        let input = "{\"label\":1,\"in0\":[1],\"in1\":[3],\"extra\":0}\n";
        assert!(read_json_lines(Cursor::new(input)).is_err());

        let input = "{\"label\":1,\"in0\":[1],\"in1\":[3]}\nnot json\n";
        let err = read_json_lines(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, SerializeError::Format { line: 2, .. }));
    }

    #[test]
    fn test_inference_payload() {
        let payload = inference_payload(&examples()[..2]).unwrap();
        assert_eq!(
            payload,
            "{\"instances\":[{\"in0\":[196],\"in1\":[242]},{\"in0\":[22],\"in1\":[377]}]}"
        );
    }

    #[test]
    fn test_path_round_trip() {
        let path = std::env::temp_dir().join(format!("pipeline-{}.jsonl", std::process::id()));
        write_json_lines_to_path(&path, &examples()).unwrap();
        let parsed = read_json_lines_from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(parsed, examples());
    }
}
