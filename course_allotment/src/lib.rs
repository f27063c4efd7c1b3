/*!
Merit-ranked course allotment.

Students are ranked on their semester scores, then served one after the other
in rank order: each one receives the first course of their preference list
that still has a seat. The allotment is then grouped by course and by
department for reporting.

```
use course_allotment::{run_allotment, AllotmentRules, Table};

let mut courses = Table::new(&["Course", "Seats"]);
courses.push_row(&["MATH", "1"]);
courses.push_row(&["PHYS", "1"]);

let mut students = Table::new(&[
    "Candidate Code", "Name", "Sem1", "Sem2", "Sem3", "PlusTwo", "Preference 1", "Preference 2",
]);
students.push_row(&["C1", "Alice", "8", "8", "9", "90", "MATH", "PHYS"]);
students.push_row(&["C2", "Bob", "8", "8", "7", "90", "MATH", ""]);

let res = run_allotment(&students, &courses, &AllotmentRules::default())?;
assert_eq!(res.final_list[0].allotted(), Some("MATH"));
assert_eq!(res.final_list[1].allotted(), None);
# Ok::<(), course_allotment::AllotmentErrors>(())
```

See the [manual](manual/index.html) for the input formats.
*/

pub mod builder;
mod config;
pub mod manual;

mod allot;
mod group;
mod rank;

use log::{debug, info};
use std::collections::HashMap;

pub use crate::allot::{allot_courses, dedup_preferences};
pub use crate::config::*;
pub use crate::group::{course_wise, department_of, department_wise, seat_stats};
pub use crate::rank::{calculate_rank, merit_order};

/// Runs the complete allotment on the two input tables.
///
/// Both tables are checked before anything is computed: a missing column in
/// either of them fails the run with `AllotmentErrors::SchemaError`.
pub fn run_allotment(
    students: &Table,
    courses: &Table,
    rules: &AllotmentRules,
) -> Result<AllotmentResult, AllotmentErrors> {
    info!(
        "run_allotment: {} student rows, {} course rows",
        students.rows.len(),
        courses.rows.len()
    );
    let builder = builder::Builder::new(rules)?
        .course_table(courses)?
        .student_table(students)?;
    Ok(builder.run())
}

/// Ranks, allots and groups students that have already been validated.
pub fn allot_students(
    students: &[Student],
    courses: &[Course],
    rules: &AllotmentRules,
) -> AllotmentResult {
    info!(
        "allot_students: processing {} students and {} courses",
        students.len(),
        courses.len()
    );
    let ranked = calculate_rank(students);

    let preferences: HashMap<String, Vec<String>> = students
        .iter()
        .map(|s| (s.candidate_code.clone(), s.preferences.clone()))
        .collect();
    let statuses = allot_courses(&ranked, &preferences, courses);

    let final_list: Vec<StudentOutcome> = ranked
        .into_iter()
        .zip(statuses)
        .map(|(rs, status)| StudentOutcome {
            candidate_code: rs.student.candidate_code,
            name: rs.student.name,
            scores: rs.student.scores,
            rank: rs.rank,
            status,
            source_row: rs.student.source_row,
        })
        .collect();

    let sep = rules.department_separator;
    let course_wise = course_wise(&final_list, sep);
    let department_wise = department_wise(&final_list, sep);
    let seat_stats = seat_stats(&final_list, courses);

    for s in seat_stats.iter() {
        info!(
            "Course {}: {}/{} seats filled",
            s.course, s.filled, s.seats
        );
    }
    let unallotted = final_list.iter().filter(|o| o.allotted().is_none()).count();
    info!(
        "allot_students: {} allotted, {} without a course",
        final_list.len() - unallotted,
        unallotted
    );
    debug!("allot_students: final list: {:?}", final_list);

    AllotmentResult {
        final_list,
        course_wise,
        department_wise,
        seat_stats,
    }
}
