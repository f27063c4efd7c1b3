// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::alloc::{
    io_common::{format_number, pad_rows},
    *,
};

/// Reads one worksheet as a table: the first row is the header.
pub fn read_excel_table(path: &str, worksheet: Option<&str>) -> OcasResult<Table> {
    let wrange = get_range(path, worksheet)?;
    range_to_table(&wrange, path)
}

fn get_range(path: &str, worksheet: Option<&str>) -> OcasResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { path, name })?
            .context(OpeningExcelSnafu { path })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?,
    };
    Ok(wrange)
}

fn range_to_table(wrange: &Range<DataType>, path: &str) -> OcasResult<Table> {
    let mut iter = wrange.rows();
    let columns: Vec<String> = match iter.next() {
        Some(header) => header
            .iter()
            .map(|c| read_cell(c, path, 1).map(|s| s.trim().to_string()))
            .collect::<OcasResult<_>>()?,
        None => {
            warn!("read_excel_table: {}: empty worksheet", path);
            Vec::new()
        }
    };
    debug!("read_excel_table: {}: header: {:?}", path, columns);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = idx + 2;
        let cells: Vec<String> = row
            .iter()
            .take(columns.len())
            .map(|c| read_cell(c, path, lineno))
            .collect::<OcasResult<_>>()?;
        rows.push(cells);
    }
    pad_rows(columns.len(), &mut rows);
    Ok(Table { columns, rows })
}

fn read_cell(cell: &DataType, path: &str, lineno: usize) -> OcasResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Float(f) => Ok(format_number(*f)),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::Empty => Ok(String::new()),
        _ => whatever!(
            "{}: line {}: could not understand cell {:?}",
            path,
            lineno,
            cell
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(cells: &[&[DataType]]) -> Range<DataType> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut r = Range::new((0, 0), (height - 1, width - 1));
        for (i, row) in cells.iter().enumerate() {
            for (j, c) in row.iter().enumerate() {
                r.set_value((i as u32, j as u32), c.clone());
            }
        }
        r
    }

    fn s(x: &str) -> DataType {
        DataType::String(x.to_string())
    }

    #[test]
    fn converts_cells() {
        let r = range(&[
            &[s("Course "), s("Seats")],
            &[s("CS-101"), DataType::Float(30.0)],
            &[s("ART"), DataType::Int(2)],
            &[s("PHYS"), DataType::Empty],
        ]);
        let t = range_to_table(&r, "mem.xlsx").unwrap();
        assert_eq!(t.columns, vec!["Course", "Seats"]);
        assert_eq!(
            t.rows,
            vec![
                vec!["CS-101", "30"],
                vec!["ART", "2"],
                vec!["PHYS", ""]
            ]
        );
    }

    #[test]
    fn scores_keep_decimals() {
        let r = range(&[&[s("Sem3")], &[DataType::Float(8.25)]]);
        let t = range_to_table(&r, "mem.xlsx").unwrap();
        assert_eq!(t.rows[0], vec!["8.25"]);
    }

    #[test]
    fn missing_workbook() {
        assert!(matches!(
            read_excel_table("/nonexistent/courses.xlsx", None),
            Err(OcasError::OpeningExcel { .. })
        ));
    }
}
