//! JSON I/O handling for CLI
//!
//! - Input: one `QueryRequest` JSON document on stdin (empty means defaults)
//! - Output: one JSON document on stdout

use std::io::{Read, Write};

use serde::Serialize;

use super::errors::CliResult;
use crate::planner::QueryRequest;

/// Read a query request from `reader` until EOF
pub fn read_request<R: Read>(mut reader: R) -> CliResult<QueryRequest> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Ok(QueryRequest::default());
    }
    Ok(serde_json::from_str(&input)?)
}

/// Write `value` as pretty JSON followed by a newline
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> CliResult<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;

    #[test]
    fn test_empty_input_is_default_request() {
        let request = read_request("\n".as_bytes()).unwrap();
        assert_eq!(request, QueryRequest::default());
    }

    #[test]
    fn test_read_request() {
        let request = read_request(r#"{"limit": 3, "page": 2}"#.as_bytes()).unwrap();
        assert_eq!(request.limit, Some(3));
        assert_eq!(request.page, Some(2));
    }

    #[test]
    fn test_invalid_json_is_io_error() {
        let err = read_request("{ nope".as_bytes()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::IoError);
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&mut out, &serde_json::json!({"total": 0})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert!(text.contains("\"total\": 0"));
    }
}
