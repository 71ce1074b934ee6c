use rust_decimal::Decimal;

/// Largest amount a `NUMERIC(12, 2)` salary column can hold: 9 999 999 999.99.
pub const MAX_SALARY: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SalaryProblem {
    #[error("must not be negative")]
    Negative,
    #[error("must not exceed {}", MAX_SALARY)]
    TooLarge,
}

impl SalaryProblem {
    /// Validation code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            SalaryProblem::Negative => "negative_salary",
            SalaryProblem::TooLarge => "salary_too_large",
        }
    }
}

pub fn salary_problem(value: Decimal) -> Option<SalaryProblem> {
    if value.is_sign_negative() {
        Some(SalaryProblem::Negative)
    } else if value > MAX_SALARY {
        Some(SalaryProblem::TooLarge)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn bound_matches_the_column_precision() {
        assert_eq!(MAX_SALARY, Decimal::from_str("9999999999.99").unwrap());
        assert_eq!(salary_problem(MAX_SALARY), None);
        assert_eq!(
            salary_problem(Decimal::from(10_000_000_000i64)),
            Some(SalaryProblem::TooLarge)
        );
        assert_eq!(salary_problem(Decimal::from(-1)), Some(SalaryProblem::Negative));
        assert_eq!(SalaryProblem::TooLarge.to_string(), "must not exceed 9999999999.99");
    }
}
