//! Publication date parsing
//!
//! The dataset carries two date shapes, distinguished by the presence of a
//! slash: "86/4/27" (two-digit year first) and "August 1st 1988". Both are
//! validated by constructing a real calendar date; anything else is None.

use chrono::NaiveDate;

/// Parse either source date form into a calendar date
pub fn parse_publication_date(raw: &str) -> Option<NaiveDate> {
    if raw.contains('/') {
        parse_slash_date(raw)
    } else {
        parse_textual_date(raw)
    }
}

/// "yy/m/d" with the two-digit year expanded to 19xx when > 24, else 20xx
fn parse_slash_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let year: i32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let day: u32 = parts[2].trim().parse().ok()?;

    let full_year = if year > 24 { 1900 + year } else { 2000 + year };

    NaiveDate::from_ymd_opt(full_year, month, day)
}

/// "Month Dayth Year", e.g. "August 1st 1988"
fn parse_textual_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() != 3 {
        return None;
    }

    let month = month_number(parts[0])?;
    let day: u32 = parts[1]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect::<String>()
        .parse()
        .ok()?;
    let year: i32 = parts[2].parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    Some(match name {
        "January" => 1,
        "February" => 2,
        "March" => 3,
        "April" => 4,
        "May" => 5,
        "June" => 6,
        "July" => 7,
        "August" => 8,
        "September" => 9,
        "October" => 10,
        "November" => 11,
        "December" => 12,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_date_parses() {
        assert_eq!(
            parse_publication_date("August 1st 1988"),
            NaiveDate::from_ymd_opt(1988, 8, 1)
        );
        assert_eq!(
            parse_publication_date("January 22nd 2005"),
            NaiveDate::from_ymd_opt(2005, 1, 22)
        );
    }

    #[test]
    fn slash_date_expands_two_digit_year() {
        // > 24 lands in the 1900s
        assert_eq!(
            parse_publication_date("86/4/27"),
            NaiveDate::from_ymd_opt(1986, 4, 27)
        );
        // <= 24 lands in the 2000s
        assert_eq!(
            parse_publication_date("06/01/08"),
            NaiveDate::from_ymd_opt(2006, 1, 8)
        );
    }

    #[test]
    fn invalid_calendar_dates_rejected() {
        assert_eq!(parse_publication_date("February 30th 2001"), None);
        assert_eq!(parse_publication_date("86/13/1"), None);
    }

    #[test]
    fn malformed_input_rejected() {
        assert_eq!(parse_publication_date(""), None);
        assert_eq!(parse_publication_date("Augggust 1st 1988"), None);
        assert_eq!(parse_publication_date("August 1988"), None);
        assert_eq!(parse_publication_date("86/4"), None);
        assert_eq!(parse_publication_date("a/b/c"), None);
    }
}
