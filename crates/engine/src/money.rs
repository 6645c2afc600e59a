use std::{
    fmt,
    ops::{Add, AddAssign},
    str::FromStr,
};

/// Monetary amount represented as **integer minor units** (e.g. kobo, cents).
///
/// Every monetary value that flows through the engine uses this type; legacy
/// decimal columns are converted exactly once, at the row-read boundary, and
/// floating point is never used past that point.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount: Amount = "100.50".parse().unwrap();
/// assert_eq!(amount.minor(), 10050);
/// assert_eq!(amount.to_string(), "100.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from integer minor units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the raw value in minor units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Amount) {
        self.0 += rhs.0;
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Parses a legacy decimal string into minor units (scale 2).
    ///
    /// Accepts an optional leading sign and `.` as decimal separator.
    /// Fraction digits beyond the scale are truncated toward zero; the
    /// legacy store kept over-precise decimals in a few tables and the
    /// original engine truncated them the same way.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_scaled(s, 2).map(Amount)
    }
}

/// Exchange rate in **micro-units** (rate × 1_000_000), same fixed-point
/// discipline as [`Amount`] but with 6 fraction digits.
pub fn rate_micros(s: &str) -> Option<i64> {
    parse_scaled(s, 6).ok()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseAmountError;

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid decimal amount")
    }
}

impl std::error::Error for ParseAmountError {}

fn parse_scaled(s: &str, scale: u32) -> Result<i64, ParseAmountError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseAmountError);
    }

    let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (-1i64, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (1i64, stripped)
    } else {
        (1i64, trimmed)
    };

    let mut parts = rest.split('.');
    let whole_str = parts.next().ok_or(ParseAmountError)?;
    let frac_str = parts.next().unwrap_or("");
    if parts.next().is_some() {
        return Err(ParseAmountError);
    }

    if whole_str.is_empty() && frac_str.is_empty() {
        return Err(ParseAmountError);
    }
    if !whole_str.chars().all(|c| c.is_ascii_digit())
        || !frac_str.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ParseAmountError);
    }

    let whole: i64 = if whole_str.is_empty() {
        0
    } else {
        whole_str.parse().map_err(|_| ParseAmountError)?
    };

    // Truncate (not round) extra fraction digits, pad short ones.
    let mut frac: i64 = 0;
    let scale = scale as usize;
    for digit in frac_str
        .chars()
        .take(scale)
        .chain(std::iter::repeat('0'))
        .take(scale)
    {
        frac = frac * 10 + i64::from(digit as u8 - b'0');
    }

    let factor = 10i64.pow(scale as u32);
    let total = whole
        .checked_mul(factor)
        .and_then(|v| v.checked_add(frac))
        .ok_or(ParseAmountError)?;

    if sign < 0 {
        total.checked_neg().map_or(Err(ParseAmountError), Ok)
    } else {
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_and_fraction() {
        assert_eq!("100".parse::<Amount>().unwrap().minor(), 10000);
        assert_eq!("100.5".parse::<Amount>().unwrap().minor(), 10050);
        assert_eq!("100.50".parse::<Amount>().unwrap().minor(), 10050);
        assert_eq!("-0.01".parse::<Amount>().unwrap().minor(), -1);
        assert_eq!(".5".parse::<Amount>().unwrap().minor(), 50);
    }

    #[test]
    fn parse_truncates_extra_decimals() {
        assert_eq!("100.4999".parse::<Amount>().unwrap().minor(), 10049);
        assert_eq!("-1.999".parse::<Amount>().unwrap().minor(), -199);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<Amount>().is_err());
        assert!("12,50".parse::<Amount>().is_err());
        assert!("1.2.3".parse::<Amount>().is_err());
        assert!("abc".parse::<Amount>().is_err());
    }

    #[test]
    fn rate_uses_six_fraction_digits() {
        assert_eq!(rate_micros("1.5"), Some(1_500_000));
        assert_eq!(rate_micros("758.2041"), Some(758_204_100));
        assert_eq!(rate_micros("x"), None);
    }

    #[test]
    fn display_two_decimals() {
        assert_eq!(Amount::from_minor(10050).to_string(), "100.50");
        assert_eq!(Amount::from_minor(-1).to_string(), "-0.01");
    }
}
