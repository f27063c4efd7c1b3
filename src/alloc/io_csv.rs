// Primitives for reading CSV files.

use std::io::Read;

use crate::alloc::{io_common::pad_rows, *};

pub fn read_csv_table(path: &str) -> OcasResult<Table> {
    let f = std::fs::File::open(path)
        .map_err(csv::Error::from)
        .context(CsvOpenSnafu { path })?;
    read_csv_from(f, path)
}

pub fn read_csv_from<R: Read>(input: R, path: &str) -> OcasResult<Table> {
    read_records(reader_builder().from_reader(input), path)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut b = csv::ReaderBuilder::new();
    b.has_headers(true).flexible(true).trim(csv::Trim::Headers);
    b
}

fn read_records<R: Read>(mut rdr: csv::Reader<R>, path: &str) -> OcasResult<Table> {
    let columns: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path, lineno: 1usize })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    debug!("read_csv_table: {}: header: {:?}", path, columns);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { path, lineno })?;
        if line.len() > columns.len() {
            warn!(
                "read_csv_table: {}: line {} has {} cells for {} columns, ignoring the extra cells",
                path,
                lineno,
                line.len(),
                columns.len()
            );
        }
        rows.push(line.iter().take(columns.len()).map(|s| s.to_string()).collect());
    }
    pad_rows(columns.len(), &mut rows);
    Ok(Table { columns, rows })
}
