use std::{fmt, str::FromStr};

use crate::{EngineError, MoneyCents, ResultEngine};

const PPM_PER_UNIT: i128 = 1_000_000;
const PPM_PER_PERCENT: i32 = 10_000;
const FRACTION_DIGITS: usize = 4;

/// A tax rate stored in **parts per million** of the taxed amount, i.e.
/// 1/10 000 of a percent (`88_750` = 8.875%).
///
/// `TaxRate` is always within `0..=100%`. Inputs with more than four decimals
/// are rounded half away from zero to that scale.
///
/// ```rust
/// use engine::TaxRate;
///
/// let rate: TaxRate = "8.875".parse().unwrap();
/// assert_eq!(rate.ppm(), 88_750);
/// assert_eq!(rate.to_string(), "8.875");
/// assert_eq!(TaxRate::try_from(0.1 + 0.2).unwrap().ppm(), 3_000);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaxRate(i32);

impl TaxRate {
    pub const ZERO: TaxRate = TaxRate(0);
    pub const MAX_PPM: i32 = 100 * PPM_PER_PERCENT;

    /// Builds a rate from parts per million, rejecting values outside
    /// `0..=1_000_000`.
    pub fn from_ppm(ppm: i32) -> ResultEngine<Self> {
        if !(0..=Self::MAX_PPM).contains(&ppm) {
            return Err(EngineError::Validation(
                "tax rate must be between 0 and 100".to_string(),
            ));
        }
        Ok(Self(ppm))
    }

    #[must_use]
    pub const fn ppm(self) -> i32 {
        self.0
    }

    /// The rate as a percentage, for presentation only.
    #[must_use]
    pub fn as_percent(self) -> f64 {
        f64::from(self.0) / f64::from(PPM_PER_PERCENT)
    }

    /// Tax owed on `amount`, rounded half away from zero to the cent.
    pub fn apply(self, amount: MoneyCents) -> ResultEngine<MoneyCents> {
        let scaled = i128::from(amount.cents()) * i128::from(self.0);
        let half = PPM_PER_UNIT / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / PPM_PER_UNIT
        } else {
            (scaled - half) / PPM_PER_UNIT
        };
        i64::try_from(rounded)
            .map(MoneyCents::new)
            .map_err(|_| EngineError::Validation("tax amount too large".to_string()))
    }
}

impl fmt::Display for TaxRate {
    /// At least two decimals, trailing zeros beyond that trimmed: `8.50`, `8.875`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frac = format!("{:04}", self.0 % PPM_PER_PERCENT);
        let frac = frac.trim_end_matches('0');
        write!(f, "{}.{:0<2}", self.0 / PPM_PER_PERCENT, frac)
    }
}

impl FromStr for TaxRate {
    type Err = EngineError;

    /// Parses a percentage such as `10`, `8.875` or `7,25`.
    ///
    /// No sign, at most three integer digits, within `0..=100`. Digits past
    /// the fourth decimal only round the result.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation(format!("invalid tax rate: {s:?}"));

        let trimmed = s.trim().replace(',', ".");
        let (whole, frac) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (trimmed.as_str(), ""),
        };

        if whole.is_empty() || whole.len() > 3 || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: i32 = whole.parse().map_err(|_| invalid())?;

        let kept: String = frac
            .chars()
            .chain(std::iter::repeat('0'))
            .take(FRACTION_DIGITS)
            .collect();
        let mut fraction: i32 = kept.parse().map_err(|_| invalid())?;
        if frac
            .chars()
            .nth(FRACTION_DIGITS)
            .is_some_and(|digit| digit >= '5')
        {
            fraction += 1;
        }

        Self::from_ppm(whole * PPM_PER_PERCENT + fraction)
    }
}

impl TryFrom<f64> for TaxRate {
    type Error = EngineError;

    /// Converts a JSON percentage, rounding to 1/10 000 of a percent so float
    /// noise such as `0.1 + 0.2` lands on `0.3`.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(EngineError::Validation(
                "tax rate must be a finite number".to_string(),
            ));
        }
        let scaled = (value * f64::from(PPM_PER_PERCENT)).round();
        if !(0.0..=f64::from(Self::MAX_PPM)).contains(&scaled) {
            return Err(EngineError::Validation(
                "tax rate must be between 0 and 100".to_string(),
            ));
        }
        Self::from_ppm(scaled as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_percentages() {
        assert_eq!("10".parse::<TaxRate>().unwrap().ppm(), 100_000);
        assert_eq!("8.5".parse::<TaxRate>().unwrap().ppm(), 85_000);
        assert_eq!("8.875".parse::<TaxRate>().unwrap().ppm(), 88_750);
        assert_eq!("7,125".parse::<TaxRate>().unwrap().ppm(), 71_250);
        assert_eq!("0".parse::<TaxRate>().unwrap(), TaxRate::ZERO);
        assert_eq!("100.00".parse::<TaxRate>().unwrap().ppm(), 1_000_000);
    }

    #[test]
    fn extra_decimals_are_rounded() {
        assert_eq!("8.12345".parse::<TaxRate>().unwrap().ppm(), 81_235);
        assert_eq!("8.12344".parse::<TaxRate>().unwrap().ppm(), 81_234);
        assert_eq!("9.99995".parse::<TaxRate>().unwrap().ppm(), 100_000);
    }

    #[test]
    fn rejects_bad_rates() {
        assert!("".parse::<TaxRate>().is_err());
        assert!("-1".parse::<TaxRate>().is_err());
        assert!("100.01".parse::<TaxRate>().is_err());
        assert!("1.2.3".parse::<TaxRate>().is_err());
        assert!("abc".parse::<TaxRate>().is_err());
        assert!(TaxRate::from_ppm(1_000_001).is_err());
    }

    #[test]
    fn converts_json_numbers() {
        assert_eq!(TaxRate::try_from(8.5).unwrap().ppm(), 85_000);
        assert_eq!(TaxRate::try_from(8.875).unwrap().ppm(), 88_750);
        assert_eq!(TaxRate::try_from(0.1 + 0.2).unwrap().ppm(), 3_000);
        assert_eq!(TaxRate::try_from(10.0).unwrap().ppm(), 100_000);
        assert!(TaxRate::try_from(f64::NAN).is_err());
        assert!(TaxRate::try_from(-0.5).is_err());
        assert!(TaxRate::try_from(100.5).is_err());
    }

    #[test]
    fn applies_with_half_up_rounding() {
        let ten = TaxRate::from_ppm(100_000).unwrap();
        assert_eq!(ten.apply(MoneyCents::new(3500)).unwrap(), MoneyCents::new(350));

        let rate = TaxRate::from_ppm(85_000).unwrap();
        // 1.00 * 8.5% = 0.085 -> 0.09
        assert_eq!(rate.apply(MoneyCents::new(100)).unwrap(), MoneyCents::new(9));
        // 0.10 * 8.5% = 0.0085 -> 0.01
        assert_eq!(rate.apply(MoneyCents::new(10)).unwrap(), MoneyCents::new(1));
        assert_eq!(TaxRate::ZERO.apply(MoneyCents::new(999)).unwrap(), MoneyCents::ZERO);
    }

    #[test]
    fn applies_three_decimal_rates() {
        let rate: TaxRate = "8.875".parse().unwrap();
        // 100.00 * 8.875% = 8.875 -> 8.88
        assert_eq!(rate.apply(MoneyCents::new(10_000)).unwrap(), MoneyCents::new(888));
        // 12.00 * 8.875% = 1.065 -> 1.07
        assert_eq!(rate.apply(MoneyCents::new(1_200)).unwrap(), MoneyCents::new(107));
    }

    #[test]
    fn display_and_percent() {
        let rate = TaxRate::from_ppm(85_000).unwrap();
        assert_eq!(rate.to_string(), "8.50");
        assert_eq!(rate.as_percent(), 8.5);

        let rate = TaxRate::from_ppm(88_750).unwrap();
        assert_eq!(rate.to_string(), "8.875");
        assert_eq!(rate.as_percent(), 8.875);
        assert_eq!(TaxRate::from_ppm(100_000).unwrap().to_string(), "10.00");
    }
}
