//! Clamped piecewise-linear interpolation.

/// Evaluate the piecewise-linear function through `(input[i], output[i])` at `x`.
///
/// `input` must be ascending. Outside `[input[0], input[last]]` the boundary
/// output is returned; there is no extrapolation. An empty table yields `0.0`
/// and a single point yields its output everywhere. Extra entries in the
/// longer slice are ignored.
pub fn interpolate(x: f64, input: &[f64], output: &[f64]) -> f64 {
    let n = input.len().min(output.len());
    if n == 0 {
        return 0.0;
    }
    let (input, output) = (&input[..n], &output[..n]);

    if n == 1 || x.is_nan() || x <= input[0] {
        return output[0];
    }
    if x >= input[n - 1] {
        return output[n - 1];
    }

    // First segment whose right end reaches x.
    let seg = input
        .windows(2)
        .position(|w| x <= w[1])
        .unwrap_or(n - 2);
    let (x0, x1) = (input[seg], input[seg + 1]);
    let (y0, y1) = (output[seg], output[seg + 1]);

    let span = x1 - x0;
    if span.abs() < f64::EPSILON {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / span
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: [f64; 3] = [0.0, 1.0, 2.0];
    const OUTPUT: [f64; 3] = [0.0, 100.0, 300.0];

    #[test]
    fn empty_table_is_zero() {
        assert_eq!(interpolate(1.5, &[], &[]), 0.0);
    }

    #[test]
    fn single_point_is_constant() {
        assert_eq!(interpolate(-4.0, &[0.0], &[42.0]), 42.0);
        assert_eq!(interpolate(9.0, &[0.0], &[42.0]), 42.0);
    }

    #[test]
    fn exact_knots() {
        assert_eq!(interpolate(0.0, &INPUT, &OUTPUT), 0.0);
        assert_eq!(interpolate(1.0, &INPUT, &OUTPUT), 100.0);
        assert_eq!(interpolate(2.0, &INPUT, &OUTPUT), 300.0);
    }

    #[test]
    fn linear_between_knots() {
        assert!((interpolate(0.5, &INPUT, &OUTPUT) - 50.0).abs() < 1e-9);
        assert!((interpolate(1.25, &INPUT, &OUTPUT) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn clamps_outside_range() {
        assert_eq!(interpolate(-0.7, &INPUT, &OUTPUT), 0.0);
        assert_eq!(interpolate(5.0, &INPUT, &OUTPUT), 300.0);
    }

    #[test]
    fn sparse_input_positions() {
        // Only positions 0 and 2 measured.
        let input = [0.0, 2.0];
        let output = [10.0, 30.0];
        assert!((interpolate(1.0, &input, &output) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn mismatched_lengths_use_shorter() {
        assert_eq!(interpolate(5.0, &[0.0, 1.0, 2.0], &[3.0, 4.0]), 4.0);
    }

    #[test]
    fn nan_maps_to_first_output() {
        assert_eq!(interpolate(f64::NAN, &INPUT, &OUTPUT), 0.0);
    }
}
