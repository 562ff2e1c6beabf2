//! Record Source: CSV fixture loading
//!
//! `load` validates the header against the domain schema up front, then
//! yields one [`DomainRecord`] per data row, lazily and in file order.
//! Re-invoking `load` re-reads from the start; nothing is cached.

use std::fs::File;
use std::path::Path;

use crate::error::{SuiteError, SuiteResult};
use crate::record::{DomainRecord, RecordSchema};

pub struct RecordSource;

impl RecordSource {
    /// Open a fixture and validate its header against `schema`.
    ///
    /// Fails with `SourceUnreadable` when the file cannot be opened and
    /// `SourceMalformed` when the header is missing a required column.
    /// Row-level problems (ragged rows) surface per item from the returned
    /// iterator, so a bad row does not hide the rows before it.
    pub fn load(path: &Path, schema: &RecordSchema) -> SuiteResult<Records> {
        let file = File::open(path).map_err(|source| SuiteError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header: Vec<String> = reader
            .headers()
            .map_err(|e| SuiteError::SourceMalformed(format!("{}: bad header: {}", path.display(), e)))?
            .iter()
            .map(String::from)
            .collect();

        // Case-sensitive match; extra columns are ignored.
        for required in schema.required {
            if !header.iter().any(|h| h == required) {
                return Err(SuiteError::SourceMalformed(format!(
                    "{}: missing required column {:?}",
                    path.display(),
                    required
                )));
            }
        }

        Ok(Records {
            reader,
            header,
            path: path.display().to_string(),
            row: 0,
        })
    }
}

/// Lazy, finite sequence of records from one fixture file.
pub struct Records {
    reader: csv::Reader<File>,
    header: Vec<String>,
    path: String,
    row: u64,
}

impl Iterator for Records {
    type Item = SuiteResult<DomainRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut raw = csv::StringRecord::new();
        self.row += 1;
        match self.reader.read_record(&mut raw) {
            Ok(false) => None,
            // The csv reader rejects rows whose column count differs from
            // the header's.
            Err(e) => Some(Err(SuiteError::SourceMalformed(format!(
                "{}: row {}: {}",
                self.path, self.row, e
            )))),
            Ok(true) => {
                let mut record = DomainRecord::new();
                for (name, value) in self.header.iter().zip(raw.iter()) {
                    record.set(name.clone(), value);
                }
                Some(Ok(record))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Domain;
    use std::io::Write;

    fn write_fixture(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const CLIENT_HEADER: &str =
        "Client Name,Email,Phone,Website,Industry,Address,City,State,Postal Code,Country,Notes";

    #[test]
    fn yields_one_record_per_row_in_file_order() {
        let fixture = write_fixture(&format!(
            "{}\nAcme,a@b.com,123,https://acme.test,Retail,1 Main St,Pune,MH,411001,India,first\nGlobex,g@x.com,456,https://globex.test,Media,2 Side St,Mumbai,MH,400001,India,second\n",
            CLIENT_HEADER
        ));

        let records: Vec<_> = RecordSource::load(fixture.path(), &Domain::Clients.schema())
            .unwrap()
            .collect::<SuiteResult<Vec<_>>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Client Name"), "Acme");
        assert_eq!(records[0].get("Notes"), "first");
        assert_eq!(records[1].get("Client Name"), "Globex");
        assert_eq!(records[1].get("Email"), "g@x.com");
    }

    #[test]
    fn missing_file_is_source_unreadable() {
        let err = RecordSource::load(Path::new("no/such/fixture.csv"), &Domain::Clients.schema())
            .err()
            .unwrap();
        assert!(matches!(err, SuiteError::SourceUnreadable { .. }));
    }

    #[test]
    fn missing_required_column_fails_fast() {
        let fixture = write_fixture("Client Name,Email\nAcme,a@b.com\n");
        let err = RecordSource::load(fixture.path(), &Domain::Clients.schema())
            .err()
            .unwrap();
        match err {
            SuiteError::SourceMalformed(msg) => assert!(msg.contains("Phone"), "{}", msg),
            other => panic!("expected SourceMalformed, got {:?}", other),
        }
    }

    #[test]
    fn ragged_row_is_source_malformed() {
        let fixture = write_fixture(&format!(
            "{}\nAcme,a@b.com,123,https://acme.test,Retail,1 Main St,Pune,MH,411001,India,ok\nshort,row\n",
            CLIENT_HEADER
        ));

        let mut records = RecordSource::load(fixture.path(), &Domain::Clients.schema()).unwrap();
        assert!(records.next().unwrap().is_ok());
        let err = records.next().unwrap().err().unwrap();
        assert!(matches!(err, SuiteError::SourceMalformed(_)));
    }

    #[test]
    fn reload_restarts_from_the_top() {
        let fixture = write_fixture(&format!(
            "{}\nAcme,a@b.com,123,https://acme.test,Retail,1 Main St,Pune,MH,411001,India,\n",
            CLIENT_HEADER
        ));
        let schema = Domain::Clients.schema();

        for _ in 0..2 {
            let records: Vec<_> = RecordSource::load(fixture.path(), &schema)
                .unwrap()
                .collect::<SuiteResult<Vec<_>>>()
                .unwrap();
            assert_eq!(records.len(), 1);
            assert_eq!(records[0].get("Client Name"), "Acme");
        }
    }

    #[test]
    fn extra_columns_are_ignored() {
        let fixture = write_fixture(
            "parentEvent,name,description,startDate,endDate,location,unexpected\nGala,Dinner,desc,2025-12-25,2025-12-25,Hall A,x\n",
        );
        let records: Vec<_> = RecordSource::load(fixture.path(), &Domain::SubEvents.schema())
            .unwrap()
            .collect::<SuiteResult<Vec<_>>>()
            .unwrap();
        assert_eq!(records[0].get("parentEvent"), "Gala");
        assert_eq!(records[0].get("unexpected"), "x");
    }
}
