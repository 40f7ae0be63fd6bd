//! Weighted aggregation of dimension scores.

use crate::types::{Dimension, OverallStatus};

/// Relative importance of each dimension. Sums to 1.0.
pub const fn weight(dimension: Dimension) -> f64 {
    match dimension {
        Dimension::Nameservers | Dimension::A => 0.20,
        Dimension::Soa => 0.15,
        Dimension::Mx | Dimension::Ptr | Dimension::Propagation => 0.10,
        Dimension::Aaaa | Dimension::Cname | Dimension::Security => 0.05,
    }
}

/// Weight-normalized mean of the given dimension scores, rounded.
///
/// Normalizing by the weights actually present keeps a partial set comparable
/// to a full one. No scores at all yields 0.
// f64 -> u8: the mean of values in 0..=100 stays in 0..=100
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn overall_score<I>(scores: I) -> u8
where
    I: IntoIterator<Item = (Dimension, u8)>,
{
    let (weighted, total_weight) = scores
        .into_iter()
        .fold((0.0_f64, 0.0_f64), |(sum, total), (dimension, score)| {
            let w = weight(dimension);
            (sum + f64::from(score.min(100)) * w, total + w)
        });

    if total_weight <= 0.0 {
        return 0;
    }

    (weighted / total_weight).round().clamp(0.0, 100.0) as u8
}

/// Map an overall score to its coarse label.
pub const fn overall_status(score: u8) -> OverallStatus {
    match score {
        90.. => OverallStatus::Excellent,
        75..=89 => OverallStatus::Good,
        50..=74 => OverallStatus::Warning,
        _ => OverallStatus::Critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = Dimension::ALL.iter().map(|d| weight(*d)).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_score_all_perfect() {
        let score = overall_score(Dimension::ALL.map(|d| (d, 100)));
        assert_eq!(score, 100);
        assert_eq!(overall_status(score), OverallStatus::Excellent);
    }

    #[test]
    fn test_overall_score_all_zero() {
        let score = overall_score(Dimension::ALL.map(|d| (d, 0)));
        assert_eq!(score, 0);
        assert_eq!(overall_status(score), OverallStatus::Critical);
    }

    #[test]
    fn test_overall_score_empty_is_zero() {
        assert_eq!(overall_score(std::iter::empty()), 0);
    }

    #[test]
    fn test_overall_score_weighted_mix() {
        // Typical healthy domain without IPv6, PTR, or email hardening.
        let scores = [
            (Dimension::Nameservers, 100),
            (Dimension::Soa, 100),
            (Dimension::Mx, 100),
            (Dimension::A, 100),
            (Dimension::Aaaa, 75),
            (Dimension::Cname, 100),
            (Dimension::Ptr, 75),
            (Dimension::Propagation, 100),
            (Dimension::Security, 33),
        ];
        // 20+15+10+20+3.75+5+7.5+10+1.65 = 92.9
        assert_eq!(overall_score(scores), 93);
    }

    #[test]
    fn test_overall_score_normalizes_partial_sets() {
        let scores = [(Dimension::A, 100), (Dimension::Security, 40)];
        // (20 + 2) / 0.25 = 88
        assert_eq!(overall_score(scores), 88);
    }

    #[test]
    fn test_overall_status_thresholds() {
        assert_eq!(overall_status(100), OverallStatus::Excellent);
        assert_eq!(overall_status(90), OverallStatus::Excellent);
        assert_eq!(overall_status(89), OverallStatus::Good);
        assert_eq!(overall_status(75), OverallStatus::Good);
        assert_eq!(overall_status(74), OverallStatus::Warning);
        assert_eq!(overall_status(50), OverallStatus::Warning);
        assert_eq!(overall_status(49), OverallStatus::Critical);
        assert_eq!(overall_status(0), OverallStatus::Critical);
    }
}
