// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A table as handed over by the readers: a header row and rows of cells.
///
/// Cells are kept as strings. A cell that is empty after trimming whitespace
/// is treated as a missing value. Rows shorter than the header are padded
/// with missing values.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[&str]) -> Table {
        Table {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: &[&str]) {
        self.rows.push(row.iter().map(|s| s.to_string()).collect());
    }

    /// The position of a column, by exact header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// The four scores used for the merit rank. A missing score is `None`, and
/// sorts below any present score.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
pub struct Scores {
    pub sem1: Option<f64>,
    pub sem2: Option<f64>,
    pub sem3: Option<f64>,
    pub plus_two: Option<f64>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct Student {
    pub candidate_code: String,
    pub name: String,
    pub scores: Scores,
    /// Course identifiers in order of preference, as submitted. May contain
    /// duplicates and courses that are not offered.
    pub preferences: Vec<String>,
    /// Index of the row in the student table, when the student was read from one.
    pub source_row: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Course {
    pub name: String,
    pub seats: u32,
}

// ******** Output data structures *********

/// A student with the merit rank attached.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedStudent {
    pub student: Student,
    pub rank: u32,
}

/// Why a student ended up without a course.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum NoSeatReason {
    /// The student did not list any course.
    EmptyPreferences,
    /// Every listed course was either full or not offered.
    PreferencesExhausted,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AllotmentStatus {
    /// The course, and its position (1-based) in the deduplicated preference list.
    Allotted {
        course: String,
        preference_index: usize,
    },
    NotAllotted(NoSeatReason),
}

#[derive(PartialEq, Debug, Clone)]
pub struct StudentOutcome {
    pub candidate_code: String,
    pub name: String,
    pub scores: Scores,
    pub rank: u32,
    pub status: AllotmentStatus,
    pub source_row: Option<usize>,
}

impl StudentOutcome {
    pub fn allotted(&self) -> Option<&str> {
        match &self.status {
            AllotmentStatus::Allotted { course, .. } => Some(course.as_str()),
            AllotmentStatus::NotAllotted(_) => None,
        }
    }
}

/// One row of the course-wise or department-wise lists.
#[derive(PartialEq, Debug, Clone)]
pub struct GroupedEntry {
    pub candidate_code: String,
    pub name: String,
    pub scores: Scores,
    pub rank: u32,
    pub allotted: String,
    pub department: String,
    pub source_row: Option<usize>,
}

/// Seat usage for one course.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SeatStats {
    pub course: String,
    pub seats: u32,
    pub filled: u32,
}

impl SeatStats {
    pub fn remaining(&self) -> u32 {
        self.seats.saturating_sub(self.filled)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct AllotmentResult {
    /// Every student, in the order of the input table.
    pub final_list: Vec<StudentOutcome>,
    /// Allotted students, grouped by course then sorted by rank.
    pub course_wise: Vec<GroupedEntry>,
    /// Allotted students, grouped by department then sorted by rank.
    pub department_wise: Vec<GroupedEntry>,
    /// In the order of the course table.
    pub seat_stats: Vec<SeatStats>,
}

/// Errors that prevent the allotment from running.
///
/// Per-student quirks (duplicate preferences, unknown courses, no seat left)
/// are not errors: they simply lead to no allotment for that student.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AllotmentErrors {
    /// A required column is missing from one of the tables.
    SchemaError { table: TableKind, column: String },
    InvalidScore {
        candidate_code: String,
        column: String,
        value: String,
    },
    InvalidSeats { course: String, value: String },
    DuplicateCandidate(String),
    DuplicateCourse(String),
    /// A row has no value for its key column.
    MissingKey { table: TableKind, row: usize },
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TableKind {
    Students,
    Courses,
}

impl Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Students => write!(f, "student table"),
            TableKind::Courses => write!(f, "course table"),
        }
    }
}

impl Error for AllotmentErrors {}

impl Display for AllotmentErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllotmentErrors::SchemaError { table, column } => {
                write!(f, "missing column {:?} in the {}", column, table)
            }
            AllotmentErrors::InvalidScore {
                candidate_code,
                column,
                value,
            } => write!(
                f,
                "candidate {}: score {:?} in column {:?} is not a number",
                candidate_code, value, column
            ),
            AllotmentErrors::InvalidSeats { course, value } => write!(
                f,
                "course {}: seat count {:?} is not a non-negative integer",
                course, value
            ),
            AllotmentErrors::DuplicateCandidate(code) => {
                write!(f, "candidate code {} appears more than once", code)
            }
            AllotmentErrors::DuplicateCourse(name) => {
                write!(f, "course {} appears more than once", name)
            }
            AllotmentErrors::MissingKey { table, row } => {
                write!(f, "row {} of the {} has no key", row, table)
            }
        }
    }
}

// ********* Configuration **********

/// The names of the columns read from the input tables.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnNames {
    pub candidate_code: String,
    pub name: String,
    pub sem1: String,
    pub sem2: String,
    pub sem3: String,
    pub plus_two: String,
    /// Every column whose header starts with this prefix holds one preference.
    /// They are read in column order.
    pub preference_prefix: String,
    pub course: String,
    pub seats: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            candidate_code: "Candidate Code".to_string(),
            name: "Name".to_string(),
            sem1: "Sem1".to_string(),
            sem2: "Sem2".to_string(),
            sem3: "Sem3".to_string(),
            plus_two: "PlusTwo".to_string(),
            preference_prefix: "Preference".to_string(),
            course: "Course".to_string(),
            seats: "Seats".to_string(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AllotmentRules {
    pub columns: ColumnNames,
    /// The department of a course is the part of its name before the first
    /// occurrence of this character.
    pub department_separator: char,
}

impl Default for AllotmentRules {
    fn default() -> Self {
        AllotmentRules {
            columns: ColumnNames::default(),
            department_separator: '-',
        }
    }
}
