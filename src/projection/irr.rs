//! Internal Rate of Return (IRR) calculations
//!
//! Two flavours: the lump-sum approximation reported on every projection
//! row, and a discounted solve over the full cash-flow series.

use crate::analysis::safe_divide;

/// Lump-sum IRR approximation (percent) for an exit at the end of `year`.
///
/// Treats the sale proceeds and every interim cash flow as if received
/// together at exit: `((proceeds + cumulative) / invested)^(1/year) - 1`.
/// Resolves to `0` when the return multiple is not positive, including when
/// nothing was invested.
pub fn approximate_irr(sale_proceeds: f64, cumulative_cash_flow: f64, total_cash_invested: f64, year: u32) -> f64 {
    let multiple = safe_divide(sale_proceeds + cumulative_cash_flow, total_cash_invested);
    if multiple <= 0.0 || year == 0 {
        return 0.0;
    }
    (multiple.powf(1.0 / year as f64) - 1.0) * 100.0
}

/// Lowest annual rate the solver considers (a 99% yearly loss)
const RATE_FLOOR: f64 = -0.99;

/// Highest annual rate the solver considers (1000% a year)
const RATE_CEILING: f64 = 10.0;

/// Flows smaller than this are treated as zero when checking for a sign change
const FLOW_EPSILON: f64 = 1e-10;

const RATE_TOLERANCE: f64 = 1e-10;
const MAX_STEPS: usize = 200;

/// Annual rate (decimal, `0.05` = 5%) at which the present value of
/// `flows` is zero.
///
/// `flows[0]` falls at time zero and `flows[t]` at the end of year `t`.
/// The root is searched inside `[-99%, 1000%]`: a Newton step is taken
/// whenever it lands inside the current bracket, otherwise the bracket is
/// halved. Returns `None` for an empty series, a series without both an
/// inflow and an outflow, or one whose root lies outside the search range.
pub fn solve_irr(flows: &[f64]) -> Option<f64> {
    if flows.is_empty() {
        return None;
    }
    if flows.iter().all(|cf| cf.abs() < FLOW_EPSILON) {
        return Some(0.0);
    }

    let has_inflow = flows.iter().any(|&cf| cf > FLOW_EPSILON);
    let has_outflow = flows.iter().any(|&cf| cf < -FLOW_EPSILON);
    if !(has_inflow && has_outflow) {
        return None;
    }

    let (mut low, mut high) = (RATE_FLOOR, RATE_CEILING);
    let (value_at_low, _) = present_value(flows, low);
    let (value_at_high, _) = present_value(flows, high);
    if value_at_low == 0.0 {
        return Some(low);
    }
    if value_at_high == 0.0 {
        return Some(high);
    }
    if value_at_low.signum() == value_at_high.signum() {
        return None;
    }
    let low_sign = value_at_low.signum();

    let mut rate = 0.05;
    for _ in 0..MAX_STEPS {
        let (value, slope) = present_value(flows, rate);
        if value == 0.0 {
            return Some(rate);
        }
        if value.signum() == low_sign {
            low = rate;
        } else {
            high = rate;
        }

        let newton = rate - value / slope;
        let next = if slope != 0.0 && newton > low && newton < high {
            newton
        } else {
            0.5 * (low + high)
        };

        if (next - rate).abs() < RATE_TOLERANCE {
            return Some(next);
        }
        rate = next;
    }

    Some(rate)
}

/// Present value of `flows` at annual `rate` and its derivative with
/// respect to the rate
fn present_value(flows: &[f64], rate: f64) -> (f64, f64) {
    let v = 1.0 / (1.0 + rate);
    let mut discount = 1.0;
    let mut value = 0.0;
    let mut slope = 0.0;

    for (t, &cf) in flows.iter().enumerate() {
        value += cf * discount;
        slope -= t as f64 * cf * discount * v;
        discount *= v;
    }

    (value, slope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_approximate_irr_doubling() {
        // Doubling over 10 years is ~7.18% a year
        let irr = approximate_irr(150_000.0, 50_000.0, 100_000.0, 10);
        assert_abs_diff_eq!(irr, (2.0_f64.powf(0.1) - 1.0) * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_approximate_irr_zero_investment() {
        assert_eq!(approximate_irr(150_000.0, 10_000.0, 0.0, 5), 0.0);
    }

    #[test]
    fn test_approximate_irr_loss() {
        assert_eq!(approximate_irr(-20_000.0, 5_000.0, 50_000.0, 3), 0.0);
        // A partial loss is a negative rate
        assert!(approximate_irr(30_000.0, 0.0, 50_000.0, 3) < 0.0);
    }

    #[test]
    fn test_one_year_return() {
        let irr = solve_irr(&[-1000.0, 1100.0]).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_level_cashflows() {
        // 1000 invested, 5 x 263.80 back is ~10%
        let irr = solve_irr(&[-1000.0, 263.80, 263.80, 263.80, 263.80, 263.80]).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-3);
    }

    #[test]
    fn test_root_zeroes_present_value() {
        // Negative interim year followed by a sale
        let flows = [-50_000.0, 2_000.0, -1_500.0, 3_000.0, 68_000.0];
        let irr = solve_irr(&flows).unwrap();
        let (value, _) = present_value(&flows, irr);
        assert_abs_diff_eq!(value, 0.0, epsilon = 1e-6);
        assert!(irr > 0.0 && irr < 0.15);
    }

    #[test]
    fn test_losing_investment_is_negative() {
        let irr = solve_irr(&[-1000.0, 0.0, 810.0]).unwrap();
        assert_abs_diff_eq!(irr, -0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_all_zero_flows() {
        assert_eq!(solve_irr(&[0.0, 0.0, 0.0]), Some(0.0));
    }

    #[test]
    fn test_no_sign_change() {
        assert!(solve_irr(&[100.0, 200.0]).is_none());
        assert!(solve_irr(&[-100.0, -5.0]).is_none());
        assert!(solve_irr(&[]).is_none());
    }
}
