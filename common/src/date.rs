//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::BorrowedFormatItem, macros::format_description};

/// `YYYY-MM-DD` representation of a [`Date`].
const FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date without a time-of-day component.
///
/// Contract windows and pricing tier bounds are calendar dates: a tier
/// covering `2024-01-01..2024-07-01` applies to whole days, and two adjacent
/// tiers are contiguous exactly when one ends on the day the next starts.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] representing the current day in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Creates a new [`Date`] from the provided year, month and day numbers.
    ///
    /// [`None`] is returned if the combination doesn't form a valid calendar
    /// date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the [`Date`] shifted the provided number of days forward.
    ///
    /// # Panics
    ///
    /// If the resulting date doesn't fit into the supported calendar range.
    #[must_use]
    pub fn plus_days(self, days: u16) -> Self {
        Self(
            self.0
                .checked_add(time::Duration::days(days.into()))
                .expect("`Date` overflow"),
        )
    }

    /// Returns the first day of this [`Date`]'s month.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn start_of_month(self) -> Self {
        Self(self.0.replace_day(1).expect("day 1 always exists"))
    }

    /// Returns the first day of the month the provided number of `months`
    /// before this [`Date`]'s month.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn months_back(self, months: u32) -> Self {
        let mut year = self.0.year();
        let mut month = self.0.month();
        for _ in 0..months {
            month = month.previous();
            if month == time::Month::December {
                year -= 1;
            }
        }
        Self(
            time::Date::from_calendar_date(year, month, 1)
                .expect("day 1 always exists"),
        )
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0
            .format(FORMAT)
            .map_err(|_| fmt::Error)
            .and_then(|s| f.write_str(&s))
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, FORMAT).map(Self).map_err(ParseError)
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("invalid `YYYY-MM-DD` date: {_0}")]
pub struct ParseError(time::error::Parse);

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Date;

    #[test]
    fn from_str() {
        assert_eq!(
            Date::from_str("2024-07-01").unwrap(),
            Date::from_ymd(2024, 7, 1).unwrap(),
        );

        assert!(Date::from_str("2024-7-1").is_err());
        assert!(Date::from_str("2024-02-30").is_err());
        assert!(Date::from_str("yesterday").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Date::from_ymd(2024, 1, 9).unwrap().to_string(),
            "2024-01-09",
        );
    }

    #[test]
    fn plus_days() {
        let date = Date::from_ymd(2024, 2, 27).unwrap();

        assert_eq!(date.plus_days(0), date);
        // 2024 is a leap year.
        assert_eq!(date.plus_days(3), Date::from_ymd(2024, 3, 1).unwrap());
        assert_eq!(date.plus_days(365), Date::from_ymd(2025, 2, 26).unwrap());
    }

    #[test]
    fn months_back() {
        let date = Date::from_ymd(2024, 8, 15).unwrap();

        assert_eq!(date.months_back(0), Date::from_ymd(2024, 8, 1).unwrap());
        assert_eq!(date.months_back(7), Date::from_ymd(2024, 1, 1).unwrap());
        assert_eq!(date.months_back(11), Date::from_ymd(2023, 9, 1).unwrap());
        assert_eq!(date.months_back(24), Date::from_ymd(2022, 8, 1).unwrap());
    }
}
