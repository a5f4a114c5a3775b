use crate::error::RegressionError;

/// Least-squares line `y = slope·x + intercept` with its correlation coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    /// `sqrt(slope · slope_x)`, where `slope_x` is the slope of x regressed on y.
    pub correlation: f64,
}

/// Fit a straight line through `(xs[i], ys[i])` by least squares.
///
/// Fails when either slope denominator is exactly zero (all x or all y equal)
/// or when the two slopes have opposite signs.
pub fn regression(xs: &[f64], ys: &[f64]) -> Result<Regression, RegressionError> {
    if xs.len() != ys.len() {
        return Err(RegressionError::LengthMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(RegressionError::Empty);
    }

    let n = xs.len() as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_yy = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
        sum_yy += y * y;
    }

    let numerator = n * sum_xy - sum_x * sum_y;

    let denom_y = n * sum_xx - sum_x * sum_x;
    if denom_y == 0.0 {
        return Err(RegressionError::ZeroDenominator { axis: 'y' });
    }
    let denom_x = n * sum_yy - sum_y * sum_y;
    if denom_x == 0.0 {
        return Err(RegressionError::ZeroDenominator { axis: 'x' });
    }

    let slope = numerator / denom_y;
    let slope_x = numerator / denom_x;
    let intercept = (sum_y - slope * sum_x) / n;

    let product = slope * slope_x;
    if product < 0.0 {
        return Err(RegressionError::NegativeCorrelation);
    }

    Ok(Regression {
        slope,
        intercept,
        correlation: product.sqrt(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_line() {
        let xs: Vec<f64> = (0..10).map(f64::from).collect();
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let fit = regression(&xs, &ys).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-10);
        assert!((fit.intercept - 1.0).abs() < 1e-10);
        assert!((fit.correlation - 1.0).abs() < 1e-10);
    }

    #[test]
    fn decreasing_line_has_unit_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [8.0, 6.0, 4.0, 2.0];
        let fit = regression(&xs, &ys).unwrap();
        assert!((fit.slope + 2.0).abs() < 1e-10);
        assert!((fit.intercept - 10.0).abs() < 1e-10);
        // Both slopes are negative, so their product is positive.
        assert!((fit.correlation - 1.0).abs() < 1e-10);
    }

    #[test]
    fn noisy_points_correlation_below_one() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [0.1, 0.9, 2.2, 2.8, 4.1, 5.0];
        let fit = regression(&xs, &ys).unwrap();
        assert!(fit.slope > 0.9 && fit.slope < 1.1);
        assert!(fit.correlation > 0.95 && fit.correlation < 1.0);
    }

    #[test]
    fn identical_x_fails() {
        let xs = [3.0, 3.0, 3.0];
        let ys = [1.0, 2.0, 3.0];
        assert_eq!(
            regression(&xs, &ys),
            Err(RegressionError::ZeroDenominator { axis: 'y' })
        );
    }

    #[test]
    fn constant_y_fails() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [5.0, 5.0, 5.0];
        assert_eq!(
            regression(&xs, &ys),
            Err(RegressionError::ZeroDenominator { axis: 'x' })
        );
    }

    #[test]
    fn single_point_fails() {
        assert!(regression(&[1.0], &[2.0]).is_err());
    }

    #[test]
    fn empty_and_mismatched_inputs() {
        assert_eq!(regression(&[], &[]), Err(RegressionError::Empty));
        assert_eq!(
            regression(&[1.0, 2.0], &[1.0]),
            Err(RegressionError::LengthMismatch { xs: 2, ys: 1 })
        );
    }
}
