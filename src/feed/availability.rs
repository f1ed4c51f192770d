use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use std::fmt;

/// Stock state written to `g:availability`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    InStock,
    OutOfStock,
    Backorder,
}

impl Availability {
    /// Value expected by the shopping feed format.
    pub fn as_str(self) -> &'static str {
        match self {
            Availability::InStock => "in stock",
            Availability::OutOfStock => "out of stock",
            Availability::Backorder => "backorder",
        }
    }

    /// `g:availability_date` for a product, if one should be written.
    ///
    /// Only in-stock products carry a date: the availability date itself,
    /// in RFC 3339 with its stored offset.
    pub fn date_for(
        available_on: Option<DateTime<FixedOffset>>,
        now: DateTime<Utc>,
    ) -> Option<String> {
        match (classify(available_on, now), available_on) {
            (Availability::InStock, Some(date)) => Some(format_date(&date)),
            _ => None,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a product by its availability date.
///
/// - no date: [`Availability::OutOfStock`]
/// - date at or before `now`: [`Availability::InStock`]
/// - date after `now`: [`Availability::Backorder`]
///
/// # Examples
///
/// ```
/// use chrono::{DateTime, Duration, Utc};
/// use shopfeed::feed::{classify, Availability};
///
/// let now = Utc::now();
/// let past = (now - Duration::days(1)).fixed_offset();
/// let future = (now + Duration::days(1)).fixed_offset();
///
/// assert_eq!(classify(None, now), Availability::OutOfStock);
/// assert_eq!(classify(Some(past), now), Availability::InStock);
/// assert_eq!(classify(Some(future), now), Availability::Backorder);
/// ```
pub fn classify(available_on: Option<DateTime<FixedOffset>>, now: DateTime<Utc>) -> Availability {
    match available_on {
        None => Availability::OutOfStock,
        Some(date) if date.with_timezone(&Utc) <= now => Availability::InStock,
        Some(_) => Availability::Backorder,
    }
}

/// `2020-01-01T00:00:00+00:00` style: whole seconds, numeric offset.
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_no_date_is_out_of_stock() {
        assert_eq!(classify(None, now()), Availability::OutOfStock);
        assert_eq!(Availability::date_for(None, now()), None);
    }

    #[test]
    fn test_past_date_is_in_stock_with_date() {
        let date = DateTime::parse_from_rfc3339("2020-01-01T00:00:00+00:00").unwrap();
        assert_eq!(classify(Some(date), now()), Availability::InStock);
        assert_eq!(
            Availability::date_for(Some(date), now()).as_deref(),
            Some("2020-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_future_date_is_backorder_without_date() {
        let date = (now() + Duration::days(365)).fixed_offset();
        assert_eq!(classify(Some(date), now()), Availability::Backorder);
        assert_eq!(Availability::date_for(Some(date), now()), None);
    }

    #[test]
    fn test_date_equal_to_now_is_in_stock() {
        let date = now().fixed_offset();
        assert_eq!(classify(Some(date), now()), Availability::InStock);
        assert!(Availability::date_for(Some(date), now()).is_some());
    }

    #[test]
    fn test_one_second_ahead_is_backorder() {
        let date = (now() + Duration::seconds(1)).fixed_offset();
        assert_eq!(classify(Some(date), now()), Availability::Backorder);
    }

    #[test]
    fn test_offset_is_respected_when_comparing() {
        // 13:30 at +02:00 is 11:30 UTC, half an hour before `now`.
        let date = DateTime::parse_from_rfc3339("2026-10-19T13:30:00+02:00").unwrap();
        assert_eq!(classify(Some(date), now()), Availability::InStock);
        assert_eq!(
            Availability::date_for(Some(date), now()).as_deref(),
            Some("2026-10-19T13:30:00+02:00")
        );
    }

    #[test]
    fn test_format_date_drops_subseconds() {
        let date = DateTime::parse_from_rfc3339("2021-06-30T08:15:42.123456-05:00").unwrap();
        assert_eq!(format_date(&date), "2021-06-30T08:15:42-05:00");
    }

    #[test]
    fn test_wire_strings() {
        assert_eq!(Availability::InStock.to_string(), "in stock");
        assert_eq!(Availability::OutOfStock.to_string(), "out of stock");
        assert_eq!(Availability::Backorder.to_string(), "backorder");
    }

    proptest! {
        #[test]
        fn prop_classification_follows_ordering(offset_secs in -1_000_000i64..1_000_000i64) {
            let date = (now() + Duration::seconds(offset_secs)).fixed_offset();
            let expected = if offset_secs <= 0 {
                Availability::InStock
            } else {
                Availability::Backorder
            };
            prop_assert_eq!(classify(Some(date), now()), expected);
        }
    }
}
