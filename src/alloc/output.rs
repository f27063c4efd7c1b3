// Writers for the allotment lists.

use std::io::Write;

use serde_json::json;

use crate::alloc::{io_common::format_score, *};

pub const FINAL_FILE: &str = "final_allotment.csv";
pub const COURSE_WISE_FILE: &str = "coursewise_allotment.csv";
pub const DEPARTMENT_WISE_FILE: &str = "departmentwise_allotment.csv";
pub const SUMMARY_FILE: &str = "allotment_summary.json";

/// The header of the student table followed by the computed columns.
fn header(students: &Table, extra: &[&str]) -> Vec<String> {
    let mut columns = students.columns.clone();
    columns.extend(extra.iter().map(|s| s.to_string()));
    columns
}

/// The row of the student table the entry was read from, as it was read.
///
/// A student added without a table row only has its code, name and scores
/// filled in, under the configured column names.
fn student_cells(
    students: &Table,
    names: &ColumnNames,
    source_row: Option<usize>,
    candidate_code: &str,
    name: &str,
    scores: &Scores,
) -> Vec<String> {
    let width = students.columns.len();
    if let Some(row) = source_row.and_then(|idx| students.rows.get(idx)) {
        let mut cells = row.clone();
        cells.resize(width, String::new());
        return cells;
    }
    students
        .columns
        .iter()
        .map(|c| match c.as_str() {
            c if c == names.candidate_code => candidate_code.to_string(),
            c if c == names.name => name.to_string(),
            c if c == names.sem1 => format_score(scores.sem1),
            c if c == names.sem2 => format_score(scores.sem2),
            c if c == names.sem3 => format_score(scores.sem3),
            c if c == names.plus_two => format_score(scores.plus_two),
            _ => String::new(),
        })
        .collect()
}

/// Every student, in input order: the student row, the rank and the allotted
/// course (empty when none).
pub fn final_table(students: &Table, names: &ColumnNames, result: &AllotmentResult) -> Table {
    let rows = result
        .final_list
        .iter()
        .map(|o| {
            let mut row =
                student_cells(students, names, o.source_row, &o.candidate_code, &o.name, &o.scores);
            row.push(o.rank.to_string());
            row.push(o.allotted().unwrap_or_default().to_string());
            row
        })
        .collect();
    Table {
        columns: header(students, &["Rank", "Allotted"]),
        rows,
    }
}

/// The course-wise or department-wise list, with the department column.
pub fn grouped_table(students: &Table, names: &ColumnNames, entries: &[GroupedEntry]) -> Table {
    let rows = entries
        .iter()
        .map(|e| {
            let mut row =
                student_cells(students, names, e.source_row, &e.candidate_code, &e.name, &e.scores);
            row.push(e.rank.to_string());
            row.push(e.allotted.clone());
            row.push(e.department.clone());
            row
        })
        .collect();
    Table {
        columns: header(students, &["Rank", "Allotted", "Department"]),
        rows,
    }
}

pub fn write_table<W: Write>(table: &Table, out: W, path: &str) -> OcasResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);
    writer
        .write_record(&table.columns)
        .context(CsvWriteSnafu { path })?;
    for row in table.rows.iter() {
        writer.write_record(row).context(CsvWriteSnafu { path })?;
    }
    writer
        .flush()
        .map_err(csv::Error::from)
        .context(CsvWriteSnafu { path })?;
    Ok(())
}

pub fn render_table(table: &Table) -> OcasResult<String> {
    let mut buf: Vec<u8> = Vec::new();
    write_table(table, &mut buf, "<memory>")?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// The three lists one after the other, each preceded by its file name.
pub fn render_all(
    students: &Table,
    names: &ColumnNames,
    result: &AllotmentResult,
) -> OcasResult<String> {
    let mut s = String::new();
    for (name, table) in named_tables(students, names, result) {
        s.push_str(&format!("# {}\n", name));
        s.push_str(&render_table(&table)?);
        s.push('\n');
    }
    Ok(s)
}

fn named_tables(
    students: &Table,
    names: &ColumnNames,
    result: &AllotmentResult,
) -> [(&'static str, Table); 3] {
    [
        (FINAL_FILE, final_table(students, names, result)),
        (
            COURSE_WISE_FILE,
            grouped_table(students, names, &result.course_wise),
        ),
        (
            DEPARTMENT_WISE_FILE,
            grouped_table(students, names, &result.department_wise),
        ),
    ]
}

/// Writes the three lists to the directory, which is created if needed.
pub fn write_all(
    dir: &Path,
    students: &Table,
    names: &ColumnNames,
    result: &AllotmentResult,
) -> OcasResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).context(WritingFileSnafu {
        path: dir.display().to_string(),
    })?;
    let mut written: Vec<PathBuf> = Vec::new();
    for (name, table) in named_tables(students, names, result) {
        let p = dir.join(name);
        let path = p.display().to_string();
        let f = fs::File::create(&p).context(WritingFileSnafu { path: path.clone() })?;
        write_table(&table, f, &path)?;
        written.push(p);
    }
    Ok(written)
}

pub fn summary_json(student_file: &str, course_file: &str, result: &AllotmentResult) -> JSValue {
    let courses: Vec<JSValue> = result
        .seat_stats
        .iter()
        .map(|s| {
            json!({
                "course": s.course,
                "seats": s.seats,
                "filled": s.filled,
                "remaining": s.remaining(),
            })
        })
        .collect();
    let allotted = result
        .final_list
        .iter()
        .filter(|o| o.allotted().is_some())
        .count();
    let empty_preferences = result
        .final_list
        .iter()
        .filter(|o| o.status == AllotmentStatus::NotAllotted(NoSeatReason::EmptyPreferences))
        .count();
    json!({
        "config": {
            "studentFile": student_file,
            "courseFile": course_file,
        },
        "results": {
            "students": result.final_list.len(),
            "allotted": allotted,
            "notAllotted": result.final_list.len() - allotted,
            "emptyPreferences": empty_preferences,
            "courses": courses,
        }
    })
}

pub fn write_summary(dir: &Path, summary: &JSValue) -> OcasResult<PathBuf> {
    fs::create_dir_all(dir).context(WritingFileSnafu {
        path: dir.display().to_string(),
    })?;
    let p = dir.join(SUMMARY_FILE);
    let pretty = serde_json::to_string_pretty(summary).context(WritingJsonSnafu {})?;
    fs::write(&p, pretty).context(WritingFileSnafu {
        path: p.display().to_string(),
    })?;
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_allotment::builder::Builder;

    fn students() -> Table {
        let mut students = Table::new(&[
            "Candidate Code",
            "Name",
            "Sem1",
            "Sem2",
            "Sem3",
            "PlusTwo",
            "Preference 1",
            "Preference 2",
        ]);
        students.push_row(&["C1", "Doe, Jane", "8.5", "9", "9", "", "CS-101", "ART"]);
        students.push_row(&["C2", "Roe", "7", "7", "9.5", "88", "CS-101", ""]);
        students.push_row(&["C3", "Moe", "7", "7", "6", "88", "", ""]);
        students
    }

    fn courses() -> Table {
        let mut courses = Table::new(&["Course", "Seats"]);
        courses.push_row(&["CS-101", "1"]);
        courses.push_row(&["ART", "1"]);
        courses
    }

    fn result() -> AllotmentResult {
        run_allotment(&students(), &courses(), &AllotmentRules::default()).unwrap()
    }

    #[test]
    fn final_list_rendering() {
        let names = ColumnNames::default();
        let s = render_table(&final_table(&students(), &names, &result())).unwrap();
        assert_eq!(
            s,
            "Candidate Code,Name,Sem1,Sem2,Sem3,PlusTwo,Preference 1,Preference 2,Rank,Allotted\n\
             C1,\"Doe, Jane\",8.5,9,9,,CS-101,ART,2,ART\n\
             C2,Roe,7,7,9.5,88,CS-101,,1,CS-101\n\
             C3,Moe,7,7,6,88,,,3,\n"
        );
    }

    #[test]
    fn grouped_rendering() {
        let r = result();
        let names = ColumnNames::default();
        let t = grouped_table(&students(), &names, &r.department_wise);
        assert_eq!(t.columns.last().map(|s| s.as_str()), Some("Department"));
        assert_eq!(t.rows.len(), 2);
        assert_eq!(t.rows[0][9], "ART");
        assert_eq!(t.rows[1][10], "CS");
        assert!(render_all(&students(), &names, &r)
            .unwrap()
            .contains("# coursewise_allotment.csv\n"));
    }

    #[test]
    fn keeps_renamed_columns_and_cell_text() {
        let mut rules = AllotmentRules::default();
        rules.columns.plus_two = "HSE".to_string();
        let mut students = Table::new(&[
            "Candidate Code",
            "Name",
            "Sem1",
            "Sem2",
            "Sem3",
            "HSE",
            "Preference 1",
        ]);
        students.push_row(&["C1", "Ann", "08.50", "9", "9", "1e2", "ART"]);
        let res = run_allotment(&students, &courses(), &rules).unwrap();

        let t = final_table(&students, &rules.columns, &res);
        assert_eq!(t.columns[5], "HSE");
        assert_eq!(
            t.rows[0],
            vec!["C1", "Ann", "08.50", "9", "9", "1e2", "ART", "1", "ART"]
        );
    }

    #[test]
    fn students_without_table_row() {
        let mut builder = Builder::new(&AllotmentRules::default())
            .unwrap()
            .courses(&[Course {
                name: "ART".to_string(),
                seats: 1,
            }])
            .unwrap();
        builder
            .add_student_simple("C9", "Kim", 7.5, &["ART".to_string()])
            .unwrap();
        let res = builder.run();

        let header = Table::new(&["Name", "Sem3", "Candidate Code", "Notes"]);
        let t = final_table(&header, &ColumnNames::default(), &res);
        assert_eq!(t.rows[0], vec!["Kim", "7.5", "C9", "", "1", "ART"]);
    }

    #[test]
    fn summary() {
        let js = summary_json("s.csv", "c.csv", &result());
        assert_eq!(js["results"]["students"], 3);
        assert_eq!(js["results"]["allotted"], 2);
        assert_eq!(js["results"]["emptyPreferences"], 1);
        assert_eq!(js["results"]["courses"][0]["course"], "CS-101");
        assert_eq!(js["results"]["courses"][1]["remaining"], 0);
    }
}
