//! Commission calculation using rust_decimal for precision
//!
//! All arithmetic happens on `Decimal`; amounts are converted to `f64` only
//! at the storage/serialization boundary, rounded to 2 decimal places.
//! The net amount is defined as gross minus fee so the three figures always
//! sum exactly.

use rust_decimal::prelude::*;

use super::traits::SettlementError;

const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price for a single listing
const MAX_AMOUNT: f64 = 1_000_000.0;

/// Convert f64 to Decimal, rounded to 2 decimal places
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert Decimal back to f64, rounded to 2 decimal places
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Gross / fee / net split for one order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeBreakdown {
    pub gross_amount: f64,
    pub fee_amount: f64,
    pub net_amount: f64,
}

/// Validate that an amount is usable as money
pub fn validate_amount(value: f64, field_name: &str) -> Result<(), SettlementError> {
    if !value.is_finite() {
        return Err(SettlementError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    if value < 0.0 {
        return Err(SettlementError::Validation(format!(
            "{} must be non-negative, got {}",
            field_name, value
        )));
    }
    if value > MAX_AMOUNT {
        return Err(SettlementError::Validation(format!(
            "{} exceeds maximum allowed ({}), got {}",
            field_name, MAX_AMOUNT, value
        )));
    }
    Ok(())
}

/// Compute the platform fee split for a gross amount
///
/// fee = round(gross × rate, 2); net = gross − fee. Because net is derived
/// by subtraction after rounding, `fee + net == gross` holds exactly for
/// every input.
pub fn compute_fees(gross: f64, fee_rate: f64) -> Result<FeeBreakdown, SettlementError> {
    validate_amount(gross, "gross amount")?;
    if !fee_rate.is_finite() || !(0.0..=1.0).contains(&fee_rate) {
        return Err(SettlementError::Validation(format!(
            "fee rate must be between 0 and 1, got {}",
            fee_rate
        )));
    }

    let gross_d = to_decimal(gross);
    let rate_d = Decimal::from_f64(fee_rate).unwrap_or(Decimal::ZERO);

    let fee_d = (gross_d * rate_d)
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    let net_d = gross_d - fee_d;

    Ok(FeeBreakdown {
        gross_amount: to_f64(gross_d),
        fee_amount: to_f64(fee_d),
        net_amount: to_f64(net_d),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_split() {
        let fees = compute_fees(1000.0, 0.05).unwrap();
        assert_eq!(fees.gross_amount, 1000.0);
        assert_eq!(fees.fee_amount, 50.0);
        assert_eq!(fees.net_amount, 950.0);
    }

    #[test]
    fn test_fee_rounds_half_up() {
        // 33.33 * 0.05 = 1.6665 -> 1.67
        let fees = compute_fees(33.33, 0.05).unwrap();
        assert_eq!(fees.fee_amount, 1.67);
        assert_eq!(fees.net_amount, 31.66);
    }

    #[test]
    fn test_sum_is_exact() {
        for gross in [0.01, 0.99, 10.55, 33.33, 99.99, 123.45, 999999.99] {
            for rate in [0.0, 0.03, 0.05, 0.1, 0.155, 1.0] {
                let fees = compute_fees(gross, rate).unwrap();
                let sum = to_decimal(fees.fee_amount) + to_decimal(fees.net_amount);
                assert_eq!(
                    sum,
                    to_decimal(fees.gross_amount),
                    "gross={} rate={}",
                    gross,
                    rate
                );
            }
        }
    }

    #[test]
    fn test_zero_gross() {
        let fees = compute_fees(0.0, 0.05).unwrap();
        assert_eq!(fees.fee_amount, 0.0);
        assert_eq!(fees.net_amount, 0.0);
    }

    #[test]
    fn test_zero_rate() {
        let fees = compute_fees(250.0, 0.0).unwrap();
        assert_eq!(fees.fee_amount, 0.0);
        assert_eq!(fees.net_amount, 250.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(compute_fees(f64::NAN, 0.05).is_err());
        assert!(compute_fees(f64::INFINITY, 0.05).is_err());
        assert!(compute_fees(-1.0, 0.05).is_err());
        assert!(compute_fees(2_000_000.0, 0.05).is_err());
        assert!(compute_fees(100.0, -0.1).is_err());
        assert!(compute_fees(100.0, 1.5).is_err());
        assert!(compute_fees(100.0, f64::NAN).is_err());
    }
}
