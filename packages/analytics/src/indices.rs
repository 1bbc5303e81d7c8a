//! Derived index formulas.
//!
//! Every denominator carries a `+1` so zero-activity rows stay finite
//! and well defined. The stability score is table-relative: it is
//! normalized against the maximum velocity index of the aggregate it
//! belongs to, so scores from different aggregations are not
//! comparable with each other.

#![allow(clippy::cast_precision_loss)]

/// Identity velocity index: update volume relative to the enrolment
/// base, as a percentage.
#[must_use]
pub fn velocity_index(total_updates: u64, total_enrolments: u64) -> f64 {
    total_updates as f64 / (total_enrolments + 1) as f64 * 100.0
}

/// Biometric stress index: biometric updates per demographic update.
#[must_use]
pub fn stress_index(total_bio_updates: u64, total_demo_updates: u64) -> f64 {
    total_bio_updates as f64 / (total_demo_updates + 1) as f64
}

/// Youth update ratio: share of updates in the 5-17 bracket.
#[must_use]
pub fn youth_ratio(bio_age_5_17: u64, demo_age_5_17: u64, total_updates: u64) -> f64 {
    (bio_age_5_17 + demo_age_5_17) as f64 / (total_updates + 1) as f64
}

/// Update intensity: updates per biometric-active day.
#[must_use]
pub fn update_intensity(total_updates: u64, bio_days: u64) -> f64 {
    total_updates as f64 / (bio_days + 1) as f64
}

/// Second pass over a finished aggregate: scales each row's velocity
/// index against the table maximum and inverts it into a 0-100
/// stability score. A table with no update activity anywhere is
/// uniformly stable at 100.
pub fn apply_stability<T>(rows: &mut [T], velocity: impl Fn(&T) -> f64, set: impl Fn(&mut T, f64)) {
    let max_velocity = rows.iter().map(&velocity).fold(0.0_f64, f64::max);

    for row in rows.iter_mut() {
        let score = if max_velocity == 0.0 {
            100.0
        } else {
            100.0 - velocity(row) / max_velocity * 100.0
        };
        set(row, score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_activity_stays_finite() {
        assert!(velocity_index(0, 0).abs() < f64::EPSILON);
        assert!(stress_index(0, 0).abs() < f64::EPSILON);
        assert!(youth_ratio(0, 0, 0).abs() < f64::EPSILON);
        assert!(update_intensity(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn velocity_uses_plus_one_denominator() {
        // 15 / (10 + 1) * 100
        let ivi = velocity_index(15, 10);
        assert!((ivi - 136.363_636).abs() < 1e-5);
    }

    #[test]
    fn stability_spans_zero_to_hundred() {
        let mut rows = vec![0.0_f64, 50.0, 200.0];
        apply_stability(&mut rows, |v| *v, |v, s| *v = s);
        assert!((rows[0] - 100.0).abs() < f64::EPSILON);
        assert!((rows[1] - 75.0).abs() < f64::EPSILON);
        assert!(rows[2].abs() < f64::EPSILON);
    }

    #[test]
    fn stability_of_dormant_table_is_uniform() {
        let mut rows = vec![0.0_f64, 0.0];
        apply_stability(&mut rows, |v| *v, |v, s| *v = s);
        assert!(rows.iter().all(|s| (s - 100.0).abs() < f64::EPSILON));
    }
}
