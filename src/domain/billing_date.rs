use chrono::{Datelike, NaiveDate};

const ISO_FORMAT: &str = "%Y-%m-%d";
// Earliest day a Postgres `date` can hold (4713 BC). The upper bound is beyond chrono's range.
const EARLIEST_STORABLE_YEAR: i32 = -4712;

/// A calendar date as accepted at the boundary of the service.
///
/// Full ISO dates (`2025-07-15`) are taken as they are. The compact month-year form
/// (`07-2025`) is normalized to the first day of that month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BillingDate(NaiveDate);

impl BillingDate {
    pub fn parse(date: &str) -> Result<BillingDate, String> {
        let date = date.trim();

        let parsed = NaiveDate::parse_from_str(date, ISO_FORMAT)
            .ok()
            .or_else(|| parse_month_year(date))
            .ok_or_else(|| {
                format!(
                    "{} is not a valid date. Use either YYYY-MM-DD or MM-YYYY",
                    date
                )
            })?;

        if parsed.year() < EARLIEST_STORABLE_YEAR {
            return Err(format!("{} is too far in the past", date));
        }

        Ok(Self(parsed))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for BillingDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

fn parse_month_year(date: &str) -> Option<NaiveDate> {
    let (month, year) = date.split_once('-')?;

    let is_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());

    if month.len() != 2 || year.len() != 4 || !is_digits(month) || !is_digits(year) {
        return None;
    }

    let month: u32 = month.parse().ok()?;
    let year: i32 = year.parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, 1)
}
