//! Date and headcount consistency for negotiations.

use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::database::models::Negotiation;

/// Longest allowed span between start and end of a negotiation
pub const MAX_TERM_MONTHS: u32 = 36;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("endDate before startDate")]
    EndBeforeStart,

    #[error("term exceeds 36 months")]
    TermTooLong,

    #[error("endDate exceeds commercial expiry")]
    BeyondCommercialExpiry,

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("unionizedPercentage must be between 0 and 100")]
    PercentageOutOfRange,

    #[error("unionizedHeadcount exceeds totalHeadcount")]
    HeadcountExceedsTotal,

    #[error("inconsistent headcount/percentage")]
    Inconsistent,

    #[error("headcount out of range")]
    HeadcountOverflow,
}

/// Calendar-month addition; the day is clamped to the end of the target month.
fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Validate a negotiation candidate and fill in derived values.
///
/// For updates the candidate is the stored state with the requested
/// changes already merged in. Checks run in a fixed order and the first
/// failure is returned.
pub fn validate(mut candidate: Negotiation) -> Result<Negotiation, RuleViolation> {
    // Closing without an end date assumes the maximum term
    if candidate.is_closed() && candidate.end_date.is_none() {
        if let Some(start) = candidate.start_date {
            candidate.end_date = add_months(start, MAX_TERM_MONTHS);
        }
    }

    if let (Some(start), Some(end)) = (candidate.start_date, candidate.end_date) {
        if end < start {
            return Err(RuleViolation::EndBeforeStart);
        }
        // Same day-of-month 36 months later is the last valid end date
        if add_months(start, MAX_TERM_MONTHS).is_some_and(|limit| end > limit) {
            return Err(RuleViolation::TermTooLong);
        }
    }

    if let (Some(end), Some(expiry)) = (candidate.end_date, candidate.commercial_contract_expiry) {
        if end > expiry {
            return Err(RuleViolation::BeyondCommercialExpiry);
        }
    }

    if candidate.total_headcount.is_some_and(|n| n < 0) {
        return Err(RuleViolation::Negative("totalHeadcount"));
    }
    if candidate.unionized_headcount.is_some_and(|n| n < 0) {
        return Err(RuleViolation::Negative("unionizedHeadcount"));
    }
    if candidate
        .unionized_percentage
        .is_some_and(|p| p < Decimal::ZERO || p > Decimal::ONE_HUNDRED)
    {
        return Err(RuleViolation::PercentageOutOfRange);
    }

    if let (Some(total), Some(unionized)) = (candidate.total_headcount, candidate.unionized_headcount) {
        if unionized > total {
            return Err(RuleViolation::HeadcountExceedsTotal);
        }
    }

    match (
        candidate.total_headcount,
        candidate.unionized_headcount,
        candidate.unionized_percentage,
    ) {
        (Some(total), None, Some(percentage)) => {
            candidate.unionized_headcount = Some(headcount_from_percentage(total, percentage)?);
        }
        (Some(total), Some(unionized), None) => {
            candidate.unionized_percentage = Some(percentage_from_headcount(total, unionized));
        }
        (Some(total), Some(unionized), Some(percentage)) => {
            if headcount_from_percentage(total, percentage)? != unionized {
                return Err(RuleViolation::Inconsistent);
            }
        }
        _ => {}
    }

    Ok(candidate)
}

fn headcount_from_percentage(total: i64, percentage: Decimal) -> Result<i64, RuleViolation> {
    let exact = Decimal::from(total) * percentage / Decimal::ONE_HUNDRED;
    let rounded = exact.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    i64::try_from(rounded).map_err(|_| RuleViolation::HeadcountOverflow)
}

fn percentage_from_headcount(total: i64, unionized: i64) -> Decimal {
    let mut percentage = if total == 0 {
        Decimal::ZERO
    } else {
        (Decimal::from(unionized) * Decimal::ONE_HUNDRED / Decimal::from(total))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };
    percentage.rescale(2);
    percentage
}

/// Round a supplied percentage to the stored precision
pub fn normalize_percentage(percentage: Decimal) -> Decimal {
    let mut rounded = percentage.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn pct(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn negotiation() -> Negotiation {
        Negotiation {
            contractor_id: 1,
            union_id: 1,
            contract_label: "CC-2024".to_string(),
            status: None,
            start_date: None,
            end_date: None,
            commercial_contract_expiry: None,
            total_headcount: None,
            unionized_headcount: None,
            unionized_percentage: None,
        }
    }

    #[test]
    fn derives_headcount_from_percentage() {
        let n = Negotiation { total_headcount: Some(100), unionized_percentage: Some(pct("33")), ..negotiation() };
        assert_eq!(validate(n).unwrap().unionized_headcount, Some(33));
    }

    #[test]
    fn derived_headcount_rounds_half_away_from_zero() {
        let n = Negotiation { total_headcount: Some(100), unionized_percentage: Some(pct("33.5")), ..negotiation() };
        assert_eq!(validate(n).unwrap().unionized_headcount, Some(34));
    }

    #[test]
    fn derives_percentage_from_headcount() {
        let n = Negotiation { total_headcount: Some(100), unionized_headcount: Some(34), ..negotiation() };
        let validated = validate(n).unwrap();
        assert_eq!(validated.unionized_percentage.map(|p| p.to_string()), Some("34.00".to_string()));
    }

    #[test]
    fn derived_percentage_keeps_two_decimals() {
        let n = Negotiation { total_headcount: Some(3), unionized_headcount: Some(1), ..negotiation() };
        assert_eq!(validate(n).unwrap().unionized_percentage, Some(pct("33.33")));

        let n = Negotiation { total_headcount: Some(0), unionized_headcount: Some(0), ..negotiation() };
        assert_eq!(
            validate(n).unwrap().unionized_percentage.map(|p| p.to_string()),
            Some("0.00".to_string())
        );
    }

    #[test]
    fn rejects_inconsistent_triple() {
        let n = Negotiation {
            total_headcount: Some(100),
            unionized_headcount: Some(40),
            unionized_percentage: Some(pct("30")),
            ..negotiation()
        };
        let err = validate(n).unwrap_err();
        assert_eq!(err, RuleViolation::Inconsistent);
        assert_eq!(err.to_string(), "inconsistent headcount/percentage");
    }

    #[test]
    fn accepts_consistent_triple() {
        let n = Negotiation {
            total_headcount: Some(100),
            unionized_headcount: Some(34),
            unionized_percentage: Some(pct("34.00")),
            ..negotiation()
        };
        assert!(validate(n).is_ok());
    }

    #[test]
    fn term_boundary_uses_calendar_months() {
        let ok = Negotiation {
            start_date: Some(date("2024-01-15")),
            end_date: Some(date("2027-01-14")),
            ..negotiation()
        };
        assert!(validate(ok).is_ok());

        let too_long = Negotiation {
            start_date: Some(date("2024-01-15")),
            end_date: Some(date("2027-01-16")),
            ..negotiation()
        };
        assert_eq!(validate(too_long).unwrap_err().to_string(), "term exceeds 36 months");
    }

    #[test]
    fn term_limit_is_start_plus_36_months_with_clamped_day() {
        let cases = [
            ("2024-01-31", "2027-01-31", true),
            ("2024-01-31", "2027-02-28", false),
            ("2024-01-15", "2027-01-15", true),
            ("2024-01-15", "2027-02-14", false),
            ("2024-02-29", "2027-02-28", true),
            ("2024-02-29", "2027-03-01", false),
        ];
        for (start, end, accepted) in cases {
            let n = Negotiation {
                start_date: Some(date(start)),
                end_date: Some(date(end)),
                ..negotiation()
            };
            match validate(n) {
                Ok(_) => assert!(accepted, "{} -> {} should be rejected", start, end),
                Err(err) => {
                    assert!(!accepted, "{} -> {} should be accepted", start, end);
                    assert_eq!(err, RuleViolation::TermTooLong);
                }
            }
        }
    }

    #[test]
    fn closing_fills_end_date() {
        let n = Negotiation {
            status: Some("Closed".to_string()),
            start_date: Some(date("2024-06-10")),
            ..negotiation()
        };
        assert_eq!(validate(n).unwrap().end_date, Some(date("2027-06-10")));
    }

    #[test]
    fn closing_clamps_to_month_end() {
        let n = Negotiation {
            status: Some("closed".to_string()),
            start_date: Some(date("2024-02-29")),
            ..negotiation()
        };
        assert_eq!(validate(n).unwrap().end_date, Some(date("2027-02-28")));
    }

    #[test]
    fn closing_keeps_explicit_end_date() {
        let n = Negotiation {
            status: Some("Closed".to_string()),
            start_date: Some(date("2024-06-10")),
            end_date: Some(date("2025-01-01")),
            ..negotiation()
        };
        assert_eq!(validate(n).unwrap().end_date, Some(date("2025-01-01")));
    }

    #[test]
    fn rejects_end_before_start() {
        let n = Negotiation {
            start_date: Some(date("2024-06-10")),
            end_date: Some(date("2024-06-09")),
            ..negotiation()
        };
        assert_eq!(validate(n).unwrap_err(), RuleViolation::EndBeforeStart);
    }

    #[test]
    fn rejects_end_after_commercial_expiry() {
        let n = Negotiation {
            end_date: Some(date("2025-01-02")),
            commercial_contract_expiry: Some(date("2025-01-01")),
            ..negotiation()
        };
        assert_eq!(validate(n).unwrap_err(), RuleViolation::BeyondCommercialExpiry);
    }

    #[test]
    fn auto_filled_end_date_is_checked_against_expiry() {
        let n = Negotiation {
            status: Some("Closed".to_string()),
            start_date: Some(date("2024-06-10")),
            commercial_contract_expiry: Some(date("2026-12-31")),
            ..negotiation()
        };
        assert_eq!(validate(n).unwrap_err(), RuleViolation::BeyondCommercialExpiry);
    }

    #[test]
    fn rejects_out_of_range_numbers() {
        let n = Negotiation { total_headcount: Some(-1), ..negotiation() };
        assert_eq!(validate(n).unwrap_err(), RuleViolation::Negative("totalHeadcount"));

        let n = Negotiation { unionized_percentage: Some(pct("100.01")), ..negotiation() };
        assert_eq!(validate(n).unwrap_err(), RuleViolation::PercentageOutOfRange);

        let n = Negotiation { total_headcount: Some(10), unionized_headcount: Some(11), ..negotiation() };
        assert_eq!(validate(n).unwrap_err(), RuleViolation::HeadcountExceedsTotal);
    }

    #[test]
    fn normalizes_percentage_precision() {
        assert_eq!(normalize_percentage(pct("33.335")).to_string(), "33.34");
        assert_eq!(normalize_percentage(pct("34")).to_string(), "34.00");
    }
}
