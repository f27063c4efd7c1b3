pub use crate::config::*;

use log::{debug, warn};
use std::collections::HashSet;

/// A builder for loading the courses and the students of one batch.
///
/// Tables go through a schema check first: a missing column fails the whole
/// batch before any row is read.
///
/// ```
/// use course_allotment::builder::Builder;
/// use course_allotment::{AllotmentRules, Course};
/// # use course_allotment::AllotmentErrors;
///
/// let mut builder = Builder::new(&AllotmentRules::default())?.courses(&[
///     Course { name: "MATH".to_string(), seats: 1 },
///     Course { name: "PHYS".to_string(), seats: 1 },
/// ])?;
///
/// builder.add_student_simple("C001", "Alice", 9.1, &["MATH".to_string()])?;
/// builder.add_student_simple("C002", "Bob", 8.4, &["MATH".to_string(), "PHYS".to_string()])?;
///
/// let result = builder.run();
/// assert_eq!(result.final_list[1].allotted(), Some("PHYS"));
/// # Ok::<(), AllotmentErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: AllotmentRules,
    pub(crate) _courses: Vec<Course>,
    pub(crate) _students: Vec<Student>,
    seen_codes: HashSet<String>,
}

impl Builder {
    pub fn new(rules: &AllotmentRules) -> Result<Builder, AllotmentErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _courses: Vec::new(),
            _students: Vec::new(),
            seen_codes: HashSet::new(),
        })
    }

    pub fn courses(self, courses: &[Course]) -> Result<Builder, AllotmentErrors> {
        let mut names: HashSet<&str> = HashSet::new();
        for c in courses {
            if !names.insert(c.name.as_str()) {
                return Err(AllotmentErrors::DuplicateCourse(c.name.clone()));
            }
        }
        Ok(Builder {
            _courses: courses.to_vec(),
            ..self
        })
    }

    /// Reads the course table. Expects the course and seat columns.
    pub fn course_table(self, table: &Table) -> Result<Builder, AllotmentErrors> {
        let cols = &self._rules.columns;
        let course_idx = require_column(table, TableKind::Courses, &cols.course)?;
        let seats_idx = require_column(table, TableKind::Courses, &cols.seats)?;

        let mut courses: Vec<Course> = Vec::new();
        for (idx, row) in table.rows.iter().enumerate() {
            let name = match cell(row, course_idx) {
                Some(s) => s.to_string(),
                None if row_is_blank(row) => {
                    warn!("course_table: skipping blank row {}", idx + 1);
                    continue;
                }
                None => {
                    return Err(AllotmentErrors::MissingKey {
                        table: TableKind::Courses,
                        row: idx + 1,
                    })
                }
            };
            let raw_seats = cell(row, seats_idx).unwrap_or("");
            let seats = raw_seats
                .parse::<u32>()
                .map_err(|_| AllotmentErrors::InvalidSeats {
                    course: name.clone(),
                    value: raw_seats.to_string(),
                })?;
            courses.push(Course { name, seats });
        }
        debug!("course_table: read {} courses", courses.len());
        self.courses(&courses)
    }

    /// Reads the student table. The schema (all the score columns, the name and
    /// the candidate code) is checked before any row is read.
    pub fn student_table(mut self, table: &Table) -> Result<Builder, AllotmentErrors> {
        let cols = self._rules.columns.clone();
        let code_idx = require_column(table, TableKind::Students, &cols.candidate_code)?;
        let name_idx = require_column(table, TableKind::Students, &cols.name)?;
        let score_cols: Vec<(&String, usize)> = [&cols.sem1, &cols.sem2, &cols.sem3, &cols.plus_two]
            .into_iter()
            .map(|c| require_column(table, TableKind::Students, c).map(|idx| (c, idx)))
            .collect::<Result<_, _>>()?;

        let pref_idxs: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.starts_with(cols.preference_prefix.as_str()))
            .map(|(idx, _)| idx)
            .collect();
        if pref_idxs.is_empty() {
            warn!(
                "student_table: no column starting with {:?}, no student can be allotted",
                cols.preference_prefix
            );
        }
        debug!("student_table: preference columns: {:?}", pref_idxs);

        for (idx, row) in table.rows.iter().enumerate() {
            let candidate_code = match cell(row, code_idx) {
                Some(s) => s.to_string(),
                None if row_is_blank(row) => {
                    warn!("student_table: skipping blank row {}", idx + 1);
                    continue;
                }
                None => {
                    return Err(AllotmentErrors::MissingKey {
                        table: TableKind::Students,
                        row: idx + 1,
                    })
                }
            };

            let mut values: Vec<Option<f64>> = Vec::with_capacity(4);
            for (col_name, col_idx) in score_cols.iter() {
                values.push(parse_score(&candidate_code, col_name, cell(row, *col_idx))?);
            }
            let scores = Scores {
                sem1: values[0],
                sem2: values[1],
                sem3: values[2],
                plus_two: values[3],
            };

            let preferences: Vec<String> = pref_idxs
                .iter()
                .filter_map(|i| cell(row, *i))
                .map(|s| s.to_string())
                .collect();

            self.add_student(&Student {
                candidate_code,
                name: row
                    .get(name_idx)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default(),
                scores,
                preferences,
                source_row: Some(idx),
            })?;
        }
        Ok(self)
    }

    /// Adds a student ranked on the most recent semester score only.
    ///
    /// Mostly useful for small examples and tests.
    pub fn add_student_simple(
        &mut self,
        candidate_code: &str,
        name: &str,
        sem3: f64,
        preferences: &[String],
    ) -> Result<(), AllotmentErrors> {
        self.add_student(&Student {
            candidate_code: candidate_code.to_string(),
            name: name.to_string(),
            scores: Scores {
                sem3: Some(sem3),
                ..Scores::default()
            },
            preferences: preferences.to_vec(),
            source_row: None,
        })
    }

    pub fn add_student(&mut self, student: &Student) -> Result<(), AllotmentErrors> {
        if !self.seen_codes.insert(student.candidate_code.clone()) {
            return Err(AllotmentErrors::DuplicateCandidate(
                student.candidate_code.clone(),
            ));
        }
        self._students.push(student.clone());
        Ok(())
    }

    /// Ranks, allots and groups everything added so far.
    pub fn run(&self) -> AllotmentResult {
        crate::allot_students(&self._students, &self._courses, &self._rules)
    }
}

fn require_column(table: &Table, kind: TableKind, name: &str) -> Result<usize, AllotmentErrors> {
    table
        .column_index(name)
        .ok_or_else(|| AllotmentErrors::SchemaError {
            table: kind,
            column: name.to_string(),
        })
}

// A trimmed, non-blank cell.
fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn row_is_blank(row: &[String]) -> bool {
    row.iter().all(|s| s.trim().is_empty())
}

fn parse_score(
    candidate_code: &str,
    column: &str,
    value: Option<&str>,
) -> Result<Option<f64>, AllotmentErrors> {
    match value {
        None => Ok(None),
        Some(s) => match s.parse::<f64>() {
            Ok(x) if x.is_nan() => Ok(None),
            Ok(x) => Ok(Some(x)),
            Err(_) => Err(AllotmentErrors::InvalidScore {
                candidate_code: candidate_code.to_string(),
                column: column.to_string(),
                value: s.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_table() -> Table {
        let mut t = Table::new(&[
            "Candidate Code",
            "Name",
            "Sem1",
            "Sem2",
            "Sem3",
            "PlusTwo",
            "Preference 1",
            "Preference 2",
        ]);
        t.push_row(&["C1", "Alice", "8", "8.5", "9", "92", "MATH", " PHYS "]);
        t.push_row(&["C2", "Bob", "", "7", "NaN", "80", "", "MATH"]);
        t
    }

    #[test]
    fn reads_students() {
        let b = Builder::new(&AllotmentRules::default())
            .unwrap()
            .student_table(&student_table())
            .unwrap();
        assert_eq!(b._students.len(), 2);
        let alice = &b._students[0];
        assert_eq!(alice.scores.sem3, Some(9.0));
        assert_eq!(alice.preferences, vec!["MATH", "PHYS"]);
        let bob = &b._students[1];
        assert_eq!(bob.scores.sem1, None);
        assert_eq!(bob.scores.sem3, None);
        assert_eq!(bob.preferences, vec!["MATH"]);
    }

    #[test]
    fn missing_score_column() {
        let mut t = student_table();
        t.columns[3] = "Semester 2".to_string();
        let res = Builder::new(&AllotmentRules::default())
            .unwrap()
            .student_table(&t);
        assert_eq!(
            res.err(),
            Some(AllotmentErrors::SchemaError {
                table: TableKind::Students,
                column: "Sem2".to_string()
            })
        );

        for (idx, expected) in [(0, "Candidate Code"), (1, "Name")] {
            let mut t = student_table();
            t.columns[idx] = "Other".to_string();
            let res = Builder::new(&AllotmentRules::default())
                .unwrap()
                .student_table(&t);
            assert_eq!(
                res.err(),
                Some(AllotmentErrors::SchemaError {
                    table: TableKind::Students,
                    column: expected.to_string()
                })
            );
        }
    }

    #[test]
    fn missing_course_column() {
        let t = Table::new(&["Programme", "Seats"]);
        let res = Builder::new(&AllotmentRules::default())
            .unwrap()
            .course_table(&t);
        assert_eq!(
            res.err(),
            Some(AllotmentErrors::SchemaError {
                table: TableKind::Courses,
                column: "Course".to_string()
            })
        );
    }

    #[test]
    fn remembers_source_rows() {
        let mut t = student_table();
        t.rows.insert(1, vec![String::new(); 8]);
        let b = Builder::new(&AllotmentRules::default())
            .unwrap()
            .student_table(&t)
            .unwrap();
        let rows: Vec<Option<usize>> = b._students.iter().map(|s| s.source_row).collect();
        assert_eq!(rows, vec![Some(0), Some(2)]);
    }

    #[test]
    fn missing_seats_column() {
        let t = Table::new(&["Course", "Capacity"]);
        let res = Builder::new(&AllotmentRules::default())
            .unwrap()
            .course_table(&t);
        assert!(matches!(
            res.err(),
            Some(AllotmentErrors::SchemaError { table: TableKind::Courses, column }) if column == "Seats"
        ));
    }

    #[test]
    fn rejects_bad_values() {
        let mut t = student_table();
        t.rows[0][4] = "nine".to_string();
        let res = Builder::new(&AllotmentRules::default())
            .unwrap()
            .student_table(&t);
        assert!(matches!(res.err(), Some(AllotmentErrors::InvalidScore { .. })));

        let mut courses = Table::new(&["Course", "Seats"]);
        courses.push_row(&["MATH", "-1"]);
        let res = Builder::new(&AllotmentRules::default())
            .unwrap()
            .course_table(&courses);
        assert!(matches!(res.err(), Some(AllotmentErrors::InvalidSeats { .. })));
    }

    #[test]
    fn rejects_duplicate_keys() {
        let mut t = student_table();
        t.rows[1][0] = "C1".to_string();
        let res = Builder::new(&AllotmentRules::default())
            .unwrap()
            .student_table(&t);
        assert_eq!(
            res.err(),
            Some(AllotmentErrors::DuplicateCandidate("C1".to_string()))
        );

        let mut courses = Table::new(&["Course", "Seats"]);
        courses.push_row(&["MATH", "1"]);
        courses.push_row(&["MATH", "2"]);
        let res = Builder::new(&AllotmentRules::default())
            .unwrap()
            .course_table(&courses);
        assert_eq!(
            res.err(),
            Some(AllotmentErrors::DuplicateCourse("MATH".to_string()))
        );
    }

    #[test]
    fn skips_blank_rows() {
        let mut t = student_table();
        t.push_row(&["", "", "", ""]);
        let b = Builder::new(&AllotmentRules::default())
            .unwrap()
            .student_table(&t)
            .unwrap();
        assert_eq!(b._students.len(), 2);
    }

    #[test]
    fn custom_column_names() {
        let mut rules = AllotmentRules::default();
        rules.columns.course = "Programme".to_string();
        rules.columns.seats = "Intake".to_string();
        let mut courses = Table::new(&["Intake", "Programme"]);
        courses.push_row(&["30", "CS-101"]);
        let b = Builder::new(&rules).unwrap().course_table(&courses).unwrap();
        assert_eq!(
            b._courses,
            vec![Course {
                name: "CS-101".to_string(),
                seats: 30
            }]
        );
    }
}
