use log::debug;
use std::cmp::Ordering;

use crate::config::*;

/// Attaches a merit rank to every student.
///
/// The students are returned in their input order. The rank is the 1-based
/// position in the merit order (see `merit_order`), so ranks are always a
/// permutation of `1..=n`.
pub fn calculate_rank(students: &[Student]) -> Vec<RankedStudent> {
    let mut order: Vec<usize> = (0..students.len()).collect();
    // Stable: students with the same name and scores keep their input order.
    order.sort_by(|&a, &b| merit_order(&students[a], &students[b]));

    let mut ranks: Vec<u32> = vec![0; students.len()];
    for (pos, &idx) in order.iter().enumerate() {
        ranks[idx] = (pos + 1) as u32;
    }
    debug!("calculate_rank: merit order: {:?}", order);

    students
        .iter()
        .zip(ranks)
        .map(|(s, rank)| RankedStudent {
            student: s.clone(),
            rank,
        })
        .collect()
}

/// Most recent semester first, then the older ones, then the prior
/// qualification, all descending. Name ascending breaks the remaining ties.
pub fn merit_order(a: &Student, b: &Student) -> Ordering {
    let (x, y) = (&a.scores, &b.scores);
    score_desc(x.sem3, y.sem3)
        .then_with(|| score_desc(x.sem2, y.sem2))
        .then_with(|| score_desc(x.sem1, y.sem1))
        .then_with(|| score_desc(x.plus_two, y.plus_two))
        .then_with(|| a.name.cmp(&b.name))
}

// Higher scores first. A missing score is below any present score.
fn score_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (comparable(a), comparable(b)) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// NaN counts as missing, and -0 equals 0 so that the name decides between them.
fn comparable(score: Option<f64>) -> Option<f64> {
    score.filter(|x| !x.is_nan()).map(|x| x + 0.0)
}
