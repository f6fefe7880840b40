//! Saving and loading encoded payloads as JSON.
//!
//! # File Format
//!
//! ```text
//! {
//!   "method": "raw",
//!   "data": [0, 1, 0, 0, 1, 0, 0, 0]
//! }
//! ```
//!
//! Both fields are required. `data` entries must be 0 or 1. The method tag is
//! read as a plain string and validated afterwards, so an unknown tag is
//! reported as an unsupported method rather than a malformed file.

use crate::bits::BitSequence;
use crate::error::{Error, PersistError, Result};
use crate::source::{EncodedPayload, Method};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
struct PayloadOut<'a> {
    method: Method,
    data: &'a BitSequence,
}

#[derive(Deserialize)]
struct PayloadIn {
    method: String,
    data: BitSequence,
}

impl PayloadIn {
    fn into_payload(self) -> Result<EncodedPayload> {
        let method: Method = self.method.parse()?;
        Ok(EncodedPayload::new(method, self.data))
    }
}

/// Write `payload` to `path`, replacing any existing file.
pub fn save(path: impl AsRef<Path>, payload: &EncodedPayload) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    serde_json::to_writer_pretty(&mut writer, &record(payload)).map_err(classify)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    log::debug!(
        "saved {} bits ({}) to {}",
        payload.data.len(),
        payload.method,
        path.display()
    );
    Ok(())
}

/// Read a payload previously written by [`save`].
///
/// # Errors
/// - `PersistError::MalformedFile` if a field is missing or has the wrong shape
/// - `SourceCodingError::UnsupportedMethod` if the method tag is unknown
/// - `Error::Io` if the file cannot be read
pub fn load(path: impl AsRef<Path>) -> Result<EncodedPayload> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let record: PayloadIn = serde_json::from_reader(reader).map_err(classify)?;
    let payload = record.into_payload()?;

    log::debug!(
        "loaded {} bits ({}) from {}",
        payload.data.len(),
        payload.method,
        path.display()
    );
    Ok(payload)
}

/// Serialize a payload to a JSON string in the same format as [`save`].
pub fn to_json(payload: &EncodedPayload) -> Result<String> {
    serde_json::to_string_pretty(&record(payload)).map_err(classify)
}

/// Parse a payload from a JSON string.
pub fn from_json(json: &str) -> Result<EncodedPayload> {
    let record: PayloadIn = serde_json::from_str(json).map_err(classify)?;
    record.into_payload()
}

fn record(payload: &EncodedPayload) -> PayloadOut<'_> {
    PayloadOut {
        method: payload.method,
        data: &payload.data,
    }
}

/// Split serde_json failures into I/O problems and content problems.
fn classify(err: serde_json::Error) -> Error {
    if err.is_io() {
        Error::Io(err.into())
    } else {
        PersistError::MalformedFile {
            reason: err.to_string(),
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{self, Charset};
    use crate::error::SourceCodingError;
    use crate::source::encode_source;

    fn sample_payload() -> EncodedPayload {
        encode_source(&bits::encode("Hi", Charset::Utf8).unwrap())
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saida_raw.json");
        let payload = sample_payload();

        save(&path, &payload).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, payload);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        std::fs::write(&path, "this is not json and it is quite a bit longer than the payload").unwrap();

        let payload = encode_source(&BitSequence::try_from(vec![1, 0]).unwrap());
        save(&path, &payload).unwrap();

        assert_eq!(load(&path).unwrap(), payload);
    }

    #[test]
    fn test_file_layout() {
        let json = to_json(&sample_payload()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["method"], "raw");
        assert_eq!(
            value["data"],
            serde_json::json!([0, 1, 0, 0, 1, 0, 0, 0, 0, 1, 1, 0, 1, 0, 0, 1])
        );
        // Human-readable, 2-space indentation
        assert!(json.starts_with("{\n  \"method\": \"raw\""));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let result = from_json(r#"{"method": "raw"}"#);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::MalformedFile { .. }))
        ));

        let result = from_json(r#"{"data": [0, 1]}"#);
        assert!(matches!(
            result,
            Err(Error::Persist(PersistError::MalformedFile { .. }))
        ));
    }

    #[test]
    fn test_wrong_shapes_are_malformed() {
        for json in [
            r#"{"method": "raw", "data": "0101"}"#,
            r#"{"method": "raw", "data": [0, 1, 2]}"#,
            r#"{"method": "raw", "data": [0, -1]}"#,
            r#"{"method": 7, "data": [0, 1]}"#,
            r#"[0, 1, 0]"#,
            r#"{"method": "raw", "data": [0, 1]"#,
        ] {
            let result = from_json(json);
            assert!(
                matches!(result, Err(Error::Persist(PersistError::MalformedFile { .. }))),
                "expected MalformedFile for {}, got {:?}",
                json,
                result
            );
        }
    }

    #[test]
    fn test_unknown_method_is_unsupported() {
        let result = from_json(r#"{"method": "huffman", "data": [0, 1]}"#);
        assert!(matches!(
            result,
            Err(Error::SourceCoding(SourceCodingError::UnsupportedMethod { .. }))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(dir.path().join("does_not_exist.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"method": "raw"}"#).unwrap();

        assert!(matches!(
            load(&path),
            Err(Error::Persist(PersistError::MalformedFile { .. }))
        ));
    }
}
