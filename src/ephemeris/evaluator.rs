//! Position evaluation from a [`SegmentStore`].
//!
//! The evaluator selects the record covering the query time (half-open
//! domains, lower bound inclusive) and sums the three Chebyshev series with the
//! Clenshaw recurrence on the record's own domain mapped onto `[-1, 1]`:
//!
//! ```text
//! u = 2 (t - start) / (end - start) - 1
//! b_k = 2 u b_{k+1} - b_{k+2} + c_k        (k = n-1 .. 1)
//! f(u) = c_0 + u b_1 - b_2
//! ```
//!
//! Ephemeris coefficient sets commonly run to a dozen terms or more; the
//! recurrence never forms the power basis and keeps full precision.
use crate::{
    constants::{EtSeconds, Position},
    ephemeris::segment_store::SegmentStore,
    numeph_errors::Result,
};

/// Evaluate a Chebyshev series `sum c_k T_k(u)` with the Clenshaw recurrence.
///
/// Arguments
/// -----------------
/// * `coefficients`: Series coefficients, lowest degree first.
/// * `u`: Abscissa on the canonical interval `[-1, 1]`.
///
/// Return
/// ----------
/// * The value of the series (0 for an empty series).
pub fn clenshaw(coefficients: &[f64], u: f64) -> f64 {
    let Some((&c0, higher)) = coefficients.split_first() else {
        return 0.0;
    };

    let two_u = 2.0 * u;
    let (b1, b2) = higher
        .iter()
        .rev()
        .fold((0.0, 0.0), |(b1, b2), &c| (two_u * b1 - b2 + c, b1));

    c0 + u * b1 - b2
}

/// Position (km) of the segment target relative to its center at `t`.
///
/// Arguments
/// -----------------
/// * `store`: Segment to evaluate.
/// * `t`: Query time in TDB seconds past J2000.
///
/// Return
/// ----------
/// * The position vector, or [`NumephError::TimeOutOfRange`](crate::numeph_errors::NumephError::TimeOutOfRange)
///   when no record covers `t`.
///
/// See also
/// ------------
/// * [`SegmentStore::find_record`] – Record selection rules.
pub fn evaluate(store: &SegmentStore, t: EtSeconds) -> Result<Position> {
    let index = store.find_record(t)?;
    Ok(store.records()[index].position(t))
}

#[cfg(test)]
mod test_evaluator {
    use approx::assert_relative_eq;

    use super::*;
    use crate::{
        ephemeris::{chebyshev_record::ChebyshevRecord, segment_id::SegmentId},
        numeph_errors::NumephError,
    };

    /// Direct evaluation through T_n(u) = cos(n acos(u)).
    fn trigonometric_series(coefficients: &[f64], u: f64) -> f64 {
        coefficients
            .iter()
            .enumerate()
            .map(|(n, c)| c * (n as f64 * u.acos()).cos())
            .sum()
    }

    #[test]
    fn test_clenshaw_low_degree() {
        assert_eq!(clenshaw(&[], 0.3), 0.0);
        assert_eq!(clenshaw(&[5.0], -1.0), 5.0);
        assert_eq!(clenshaw(&[5.0], 0.7), 5.0);
        // T1(u) = u
        assert_relative_eq!(clenshaw(&[0.0, 2.0], 0.25), 0.5, epsilon = 1e-15);
        // T2(u) = 2u² - 1
        assert_relative_eq!(clenshaw(&[0.0, 0.0, 1.0], 0.5), -0.5, epsilon = 1e-15);
        // T3(u) = 4u³ - 3u
        assert_relative_eq!(clenshaw(&[0.0, 0.0, 0.0, 1.0], 0.5), -1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_clenshaw_matches_trigonometric_form() {
        let coefficients = [
            -59117487.054044664,
            -19163216.532728795,
            291991.27938009636,
            15847.329699283478,
            -133.03948110729542,
            -4.459284869049275,
            0.03379900481247174,
            0.0011716375873243507,
            1.4852185006919311e-5,
            -1.1096435596643423e-5,
            -3.3277738887706986e-6,
            -1.7115381406088932e-7,
            1.8759402940064767e-7,
        ];
        for u in [-1.0, -0.73, -0.2, 0.0, 0.11, 0.5, 0.999, 1.0] {
            assert_relative_eq!(
                clenshaw(&coefficients, u),
                trigonometric_series(&coefficients, u),
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_evaluate_selects_record() {
        let id = SegmentId::new(0, 3);
        let store = SegmentStore::new(
            id,
            vec![
                ChebyshevRecord::new(0.0, 10.0, vec![1.0], vec![0.0], vec![0.0]).unwrap(),
                ChebyshevRecord::new(10.0, 20.0, vec![2.0], vec![0.0], vec![0.0]).unwrap(),
            ],
        )
        .unwrap();

        assert_eq!(evaluate(&store, 5.0).unwrap().x, 1.0);
        assert_eq!(evaluate(&store, 10.0).unwrap().x, 2.0);
        assert_eq!(
            evaluate(&store, 20.0),
            Err(NumephError::TimeOutOfRange {
                segment: id,
                time: 20.0
            })
        );
    }
}
