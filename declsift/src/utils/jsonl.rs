//! Serialization utilities for reading and writing records.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::{api::record::Record, Error, Result, SourceLocation};

/// Write a collection of records to a file in JSON-lines format
pub fn write_jsonl_file<P: AsRef<Path>>(file_path: P, records: &[Record]) -> Result<()> {
    let io_err = |source| Error::Io {
        path: file_path.as_ref().to_path_buf(),
        source,
    };
    let mut file = fs::File::create(&file_path).map_err(io_err)?;
    for record in records {
        let json_line = record.to_jsonl_string().map_err(|source| Error::Json {
            location: record.source_location.clone(),
            source,
        })?;
        writeln!(file, "{json_line}").map_err(io_err)?;
    }
    file.flush().map_err(io_err)?;
    Ok(())
}

/// Read records from a JSON-lines file
pub fn read_jsonl_file<P: AsRef<Path>>(file_path: P) -> Result<Vec<Record>> {
    let content = fs::read_to_string(&file_path).map_err(|source| Error::Io {
        path: file_path.as_ref().to_path_buf(),
        source,
    })?;
    parse_jsonl(&content, &file_path.as_ref().display().to_string())
}

/// Parse JSON-lines text; `origin` names the input in error messages
pub fn parse_jsonl(content: &str, origin: &str) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let record: Record = serde_json::from_str(line).map_err(|source| Error::Json {
            location: SourceLocation::new(origin, line_num + 1, 1),
            source,
        })?;

        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::model::{AggregateKind, CType, Declaration};
    use std::fs;
    use tempfile::NamedTempFile;

    #[test]
    fn test_jsonl_file_format() {
        let records = vec![
            Record::new(
                Declaration::aggregate(AggregateKind::Struct, "pj_pool_t", None),
                SourceLocation::default(),
            ),
            Record::new(
                Declaration::typedef("pj_status_t", CType::named("int")),
                SourceLocation::default(),
            ),
        ];

        let temp_file = NamedTempFile::new().unwrap();
        write_jsonl_file(temp_file.path(), &records).unwrap();

        let content = fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content.lines().count(), 2);

        let loaded = read_jsonl_file(temp_file.path()).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_blank_lines_skipped_and_errors_located() {
        let text = "\n{\"declaration\":{\"decl\":\"enum\"}}\n\n{not json}\n";
        match parse_jsonl(text, "decls.jsonl") {
            Err(Error::Json { location, .. }) => {
                assert_eq!(location.file, "decls.jsonl");
                assert_eq!(location.line, 4);
            }
            other => panic!("expected a located JSON error, got {other:?}"),
        }

        let records = parse_jsonl("\n{\"declaration\":{\"decl\":\"enum\"}}\n", "x").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "");
    }
}
