use super::{FunctionError, MathFunction};

/// B-spline curve of a given degree, evaluated with de Boor's algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct DeBoorFunction {
    knots: Vec<f64>,
    control_points: Vec<f64>,
    degree: usize,
}

impl DeBoorFunction {
    /// # Errors
    /// `InvalidArgument` when there are no control points, the degree is not
    /// below the number of control points, or there are fewer than
    /// `control_points.len() + degree + 1` knots.
    pub fn new(
        knots: Vec<f64>,
        control_points: Vec<f64>,
        degree: usize,
    ) -> Result<Self, FunctionError> {
        if control_points.is_empty() {
            return Err(FunctionError::InvalidArgument(
                "a B-spline needs at least one control point".to_string(),
            ));
        }
        if degree >= control_points.len() {
            return Err(FunctionError::InvalidArgument(format!(
                "degree {} needs at least {} control points, got {}",
                degree,
                degree + 1,
                control_points.len()
            )));
        }
        if knots.len() < control_points.len() + degree + 1 {
            return Err(FunctionError::InvalidArgument(format!(
                "{} knots cannot carry {} control points of degree {}",
                knots.len(),
                control_points.len(),
                degree
            )));
        }

        Ok(DeBoorFunction {
            knots,
            control_points,
            degree,
        })
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn control_points(&self) -> &[f64] {
        &self.control_points
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Index `k` of the knot span `[knots[k], knots[k + 1])` holding `x`,
    /// clamped to `[degree, n]` where `n` is the last control point.
    fn knot_span(&self, x: f64) -> usize {
        let n = self.control_points.len() - 1;
        let p = self.degree;
        if x >= self.knots[n + 1] {
            return n;
        }
        if x <= self.knots[p] {
            return p;
        }
        // knots[p] < x < knots[n + 1], so at least one knot in the slice is <= x
        p + self.knots[p..=n + 1].partition_point(|&knot| knot <= x) - 1
    }
}

impl MathFunction for DeBoorFunction {
    fn apply(&self, x: f64) -> f64 {
        if x.is_nan() {
            return f64::NAN;
        }

        let p = self.degree;
        let k = self.knot_span(x);
        let mut d = self.control_points[k - p..=k].to_vec();

        for r in 1..=p {
            for j in (r..=p).rev() {
                let i = k - p + j;
                let alpha = (x - self.knots[i]) / (self.knots[i + p - r + 1] - self.knots[i]);
                d[j] = (1.0 - alpha) * d[j - 1] + alpha * d[j];
            }
        }
        d[p]
    }
}
