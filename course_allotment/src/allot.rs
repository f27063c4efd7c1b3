use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};

use crate::config::*;

/// The remaining seats of every course, for the duration of one allotment.
struct SeatCounter {
    remaining: HashMap<String, u32>,
}

impl SeatCounter {
    fn new(courses: &[Course]) -> SeatCounter {
        SeatCounter {
            remaining: courses
                .iter()
                .map(|c| (c.name.clone(), c.seats))
                .collect(),
        }
    }

    fn is_offered(&self, course: &str) -> bool {
        self.remaining.contains_key(course)
    }

    /// Takes one seat if there is one left. Courses that are not offered have
    /// no seat.
    fn take(&mut self, course: &str) -> bool {
        match self.remaining.get_mut(course) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        }
    }
}

/// Removes the repeated courses, keeping the first occurrence of each.
pub fn dedup_preferences(preferences: &[String]) -> Vec<&str> {
    let mut seen: HashSet<&str> = HashSet::new();
    preferences
        .iter()
        .map(|s| s.as_str())
        .filter(|s| seen.insert(*s))
        .collect()
}

/// Assigns at most one course to every student.
///
/// Students are served by increasing rank. Each one gets the first course of
/// their (deduplicated) preference list that still has a seat. A seat once
/// given is never taken back.
///
/// The returned statuses are in the order of `ranked`. A student missing from
/// `preferences` is treated as having an empty list.
pub fn allot_courses(
    ranked: &[RankedStudent],
    preferences: &HashMap<String, Vec<String>>,
    courses: &[Course],
) -> Vec<AllotmentStatus> {
    info!(
        "allot_courses: {} students, {} courses, {} seats",
        ranked.len(),
        courses.len(),
        courses.iter().map(|c| c.seats as u64).sum::<u64>()
    );
    let mut seats = SeatCounter::new(courses);

    let mut by_rank: Vec<usize> = (0..ranked.len()).collect();
    by_rank.sort_by_key(|&idx| ranked[idx].rank);

    let empty: Vec<String> = Vec::new();
    let mut statuses: Vec<Option<AllotmentStatus>> = vec![None; ranked.len()];
    for idx in by_rank {
        let rs = &ranked[idx];
        let code = rs.student.candidate_code.as_str();
        let prefs = dedup_preferences(preferences.get(code).unwrap_or(&empty));

        let status = if prefs.is_empty() {
            AllotmentStatus::NotAllotted(NoSeatReason::EmptyPreferences)
        } else {
            let mut found: Option<AllotmentStatus> = None;
            for (pos, course) in prefs.iter().enumerate() {
                if !seats.is_offered(course) {
                    warn!(
                        "allot_courses: candidate {}: course {:?} is not offered, skipping",
                        code, course
                    );
                    continue;
                }
                if seats.take(course) {
                    found = Some(AllotmentStatus::Allotted {
                        course: course.to_string(),
                        preference_index: pos + 1,
                    });
                    break;
                }
            }
            found.unwrap_or(AllotmentStatus::NotAllotted(
                NoSeatReason::PreferencesExhausted,
            ))
        };
        debug!(
            "allot_courses: rank {} candidate {}: {:?}",
            rs.rank, code, status
        );
        statuses[idx] = Some(status);
    }

    statuses
        .into_iter()
        .map(|s| s.unwrap_or(AllotmentStatus::NotAllotted(NoSeatReason::EmptyPreferences)))
        .collect()
}
