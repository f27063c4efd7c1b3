use std::collections::BTreeMap;

use crate::config::*;

/// The department of a course: the part before the first separator, trimmed,
/// or the whole name when there is no separator.
///
/// ```
/// use course_allotment::department_of;
/// assert_eq!(department_of("CS-101", '-'), "CS");
/// assert_eq!(department_of("ART", '-'), "ART");
/// ```
pub fn department_of(course: &str, separator: char) -> String {
    match course.split_once(separator) {
        Some((dept, _)) => dept.trim().to_string(),
        None => course.to_string(),
    }
}

/// Allotted students, by course name then by rank.
pub fn course_wise(outcomes: &[StudentOutcome], separator: char) -> Vec<GroupedEntry> {
    group_by(outcomes, separator, |e| e.allotted.clone())
}

/// Allotted students, by department then by rank.
pub fn department_wise(outcomes: &[StudentOutcome], separator: char) -> Vec<GroupedEntry> {
    group_by(outcomes, separator, |e| e.department.clone())
}

fn group_by<F>(outcomes: &[StudentOutcome], separator: char, key: F) -> Vec<GroupedEntry>
where
    F: Fn(&GroupedEntry) -> String,
{
    let mut groups: BTreeMap<String, Vec<GroupedEntry>> = BTreeMap::new();
    for o in outcomes.iter() {
        let course = match o.allotted() {
            Some(c) if !c.trim().is_empty() => c,
            _ => continue,
        };
        let entry = GroupedEntry {
            candidate_code: o.candidate_code.clone(),
            name: o.name.clone(),
            scores: o.scores,
            rank: o.rank,
            allotted: course.to_string(),
            department: department_of(course, separator),
            source_row: o.source_row,
        };
        groups.entry(key(&entry)).or_default().push(entry);
    }

    groups
        .into_values()
        .flat_map(|mut g| {
            g.sort_by_key(|e| e.rank);
            g
        })
        .collect()
}

/// Declared, filled and remaining seats for every course, in course table order.
pub fn seat_stats(outcomes: &[StudentOutcome], courses: &[Course]) -> Vec<SeatStats> {
    let mut filled: BTreeMap<&str, u32> = BTreeMap::new();
    for c in outcomes.iter().filter_map(|o| o.allotted()) {
        *filled.entry(c).or_insert(0) += 1;
    }
    courses
        .iter()
        .map(|c| SeatStats {
            course: c.name.clone(),
            seats: c.seats,
            filled: filled.get(c.name.as_str()).cloned().unwrap_or(0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(code: &str, rank: u32, course: Option<&str>) -> StudentOutcome {
        StudentOutcome {
            candidate_code: code.to_string(),
            name: code.to_uppercase(),
            scores: Scores::default(),
            rank,
            status: match course {
                Some(c) => AllotmentStatus::Allotted {
                    course: c.to_string(),
                    preference_index: 1,
                },
                None => AllotmentStatus::NotAllotted(NoSeatReason::PreferencesExhausted),
            },
            source_row: None,
        }
    }

    fn codes(entries: &[GroupedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.candidate_code.as_str()).collect()
    }

    #[test]
    fn departments() {
        assert_eq!(department_of("CS-101", '-'), "CS");
        assert_eq!(department_of("CS-102", '-'), "CS");
        assert_eq!(department_of("ART", '-'), "ART");
        assert_eq!(department_of(" Physics - Optics-2", '-'), "Physics");
        assert_eq!(department_of("cs-101", '-'), "cs");
        assert_eq!(department_of("BIO/Genetics", '/'), "BIO");
    }

    #[test]
    fn groups_by_course_then_rank() {
        let outcomes = vec![
            outcome("a", 4, Some("CS-102")),
            outcome("b", 1, Some("CS-101")),
            outcome("c", 3, None),
            outcome("d", 2, Some("CS-102")),
            outcome("e", 5, Some("ART")),
        ];
        let cw = course_wise(&outcomes, '-');
        assert_eq!(codes(&cw), vec!["e", "b", "d", "a"]);
        assert_eq!(cw[1].department, "CS");

        let dw = department_wise(&outcomes, '-');
        assert_eq!(codes(&dw), vec!["e", "b", "d", "a"]);
        assert!(dw[1..].iter().all(|e| e.department == "CS"));
    }

    #[test]
    fn department_groups_mix_courses() {
        let outcomes = vec![
            outcome("a", 3, Some("CS-101")),
            outcome("b", 1, Some("CS-102")),
            outcome("c", 2, Some("CS-101")),
        ];
        assert_eq!(codes(&course_wise(&outcomes, '-')), vec!["c", "a", "b"]);
        assert_eq!(codes(&department_wise(&outcomes, '-')), vec!["b", "c", "a"]);
    }

    #[test]
    fn empty_allotment_excluded() {
        let outcomes = vec![outcome("a", 1, Some("  ")), outcome("b", 2, Some("ART"))];
        assert_eq!(codes(&course_wise(&outcomes, '-')), vec!["b"]);
        assert_eq!(codes(&department_wise(&outcomes, '-')), vec!["b"]);
    }

    #[test]
    fn seat_usage() {
        let outcomes = vec![
            outcome("a", 1, Some("MATH")),
            outcome("b", 2, Some("MATH")),
            outcome("c", 3, None),
        ];
        let courses = vec![
            Course {
                name: "PHYS".to_string(),
                seats: 2,
            },
            Course {
                name: "MATH".to_string(),
                seats: 2,
            },
        ];
        let stats = seat_stats(&outcomes, &courses);
        assert_eq!(stats[0].course, "PHYS");
        assert_eq!((stats[0].filled, stats[0].remaining()), (0, 2));
        assert_eq!((stats[1].filled, stats[1].remaining()), (2, 0));
    }
}
