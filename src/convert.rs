//! Converters between string and typed representations of cell values.
//!
//! Every converter follows one convention: blank input means "absent" and
//! returns `Ok(None)`; non-blank input that cannot be converted is a parse
//! error, never a silent `None`.

use crate::error::{TabioError, TabioResult};
use crate::table::CellValue;
use crate::util::is_blank;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Two-way conversion capability for one target type: from a typed cell
/// value and from a string representation.
pub trait CellConverter {
    type Output;

    /// Convert a typed cell value. Blank yields `Ok(None)`.
    fn from_cell(&self, value: &CellValue) -> TabioResult<Option<Self::Output>>;

    /// Convert a string representation. Blank yields `Ok(None)`; malformed
    /// non-blank input yields a parse error.
    fn from_text(&self, input: &str) -> TabioResult<Option<Self::Output>>;
}

/// Parse a date-time from its string shape, mirroring the formats the
/// exporter emits: `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DD`, `DD/MM/YYYY`, and
/// bare `HH:MM:SS` (anchored to the epoch date).
pub fn parse_date_time(input: &str) -> TabioResult<NaiveDateTime> {
    let s = input.trim();
    let parsed = if s.len() == 19 {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
    } else if s.len() == 10 && s.contains('/') {
        NaiveDate::parse_from_str(s, "%d/%m/%Y")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    } else if s.len() == 10 {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    } else if s.len() == 8 && s.contains(':') {
        NaiveTime::parse_from_str(s, "%H:%M:%S")
            .ok()
            .and_then(|t| NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(t)))
    } else {
        None
    };
    parsed.ok_or_else(|| TabioError::Parse(format!("unparsable date: {s:?}")))
}

/// Parse a calendar date; accepts the same shapes as [`parse_date_time`].
pub fn parse_date(input: &str) -> TabioResult<NaiveDate> {
    parse_date_time(input).map(|dt| dt.date())
}

pub struct DateConverter;

impl CellConverter for DateConverter {
    type Output = NaiveDate;

    fn from_cell(&self, value: &CellValue) -> TabioResult<Option<NaiveDate>> {
        match value {
            CellValue::Blank => Ok(None),
            CellValue::Date(d) => Ok(Some(*d)),
            CellValue::DateTime(dt) => Ok(Some(dt.date())),
            CellValue::Text(s) => self.from_text(s),
            other => Err(TabioError::Parse(format!(
                "cannot convert {} cell to date",
                other.type_name()
            ))),
        }
    }

    fn from_text(&self, input: &str) -> TabioResult<Option<NaiveDate>> {
        if is_blank(input) {
            return Ok(None);
        }
        parse_date(input).map(Some)
    }
}

pub struct DateTimeConverter;

impl CellConverter for DateTimeConverter {
    type Output = NaiveDateTime;

    fn from_cell(&self, value: &CellValue) -> TabioResult<Option<NaiveDateTime>> {
        match value {
            CellValue::Blank => Ok(None),
            CellValue::DateTime(dt) => Ok(Some(*dt)),
            CellValue::Date(d) => Ok(d.and_hms_opt(0, 0, 0)),
            CellValue::Text(s) => self.from_text(s),
            other => Err(TabioError::Parse(format!(
                "cannot convert {} cell to date-time",
                other.type_name()
            ))),
        }
    }

    fn from_text(&self, input: &str) -> TabioResult<Option<NaiveDateTime>> {
        if is_blank(input) {
            return Ok(None);
        }
        parse_date_time(input).map(Some)
    }
}

pub struct NumberConverter;

impl CellConverter for NumberConverter {
    type Output = f64;

    fn from_cell(&self, value: &CellValue) -> TabioResult<Option<f64>> {
        match value {
            CellValue::Blank => Ok(None),
            CellValue::Number(n) => Ok(Some(*n)),
            CellValue::Text(s) => self.from_text(s),
            other => Err(TabioError::Parse(format!(
                "cannot convert {} cell to number",
                other.type_name()
            ))),
        }
    }

    fn from_text(&self, input: &str) -> TabioResult<Option<f64>> {
        if is_blank(input) {
            return Ok(None);
        }
        input
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| TabioError::Parse(format!("unparsable number: {input:?}")))
    }
}

pub struct IntegerConverter;

impl CellConverter for IntegerConverter {
    type Output = i64;

    fn from_cell(&self, value: &CellValue) -> TabioResult<Option<i64>> {
        match value {
            CellValue::Blank => Ok(None),
            CellValue::Number(n) if n.fract() == 0.0 => Ok(Some(*n as i64)),
            CellValue::Number(n) => Err(TabioError::Parse(format!(
                "number {n} has a fractional part"
            ))),
            CellValue::Text(s) => self.from_text(s),
            other => Err(TabioError::Parse(format!(
                "cannot convert {} cell to integer",
                other.type_name()
            ))),
        }
    }

    fn from_text(&self, input: &str) -> TabioResult<Option<i64>> {
        if is_blank(input) {
            return Ok(None);
        }
        input
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| TabioError::Parse(format!("unparsable integer: {input:?}")))
    }
}

pub struct BooleanConverter;

impl CellConverter for BooleanConverter {
    type Output = bool;

    fn from_cell(&self, value: &CellValue) -> TabioResult<Option<bool>> {
        match value {
            CellValue::Blank => Ok(None),
            CellValue::Boolean(b) => Ok(Some(*b)),
            CellValue::Text(s) => self.from_text(s),
            other => Err(TabioError::Parse(format!(
                "cannot convert {} cell to boolean",
                other.type_name()
            ))),
        }
    }

    fn from_text(&self, input: &str) -> TabioResult<Option<bool>> {
        if is_blank(input) {
            return Ok(None);
        }
        match input.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(TabioError::Parse(format!("unparsable boolean: {input:?}"))),
        }
    }
}

pub struct TextConverter;

impl CellConverter for TextConverter {
    type Output = String;

    fn from_cell(&self, value: &CellValue) -> TabioResult<Option<String>> {
        match value {
            CellValue::Blank => Ok(None),
            other => Ok(Some(other.display_string())),
        }
    }

    fn from_text(&self, input: &str) -> TabioResult<Option<String>> {
        if is_blank(input) {
            return Ok(None);
        }
        Ok(Some(input.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_date_converter_blank_is_none() {
        assert_eq!(DateConverter.from_text("").unwrap(), None);
        assert_eq!(DateConverter.from_text("   ").unwrap(), None);
        assert_eq!(DateConverter.from_cell(&CellValue::Blank).unwrap(), None);
    }

    #[test]
    fn test_date_converter_malformed_is_error() {
        assert!(matches!(
            DateConverter.from_text("not-a-date"),
            Err(TabioError::Parse(_))
        ));
        assert!(matches!(
            DateConverter.from_text("2024-13-99"),
            Err(TabioError::Parse(_))
        ));
    }

    #[test]
    fn test_date_converter_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(DateConverter.from_text("2024-01-31").unwrap(), Some(expected));
        assert_eq!(DateConverter.from_text("31/01/2024").unwrap(), Some(expected));
        assert_eq!(
            DateConverter.from_text("2024-01-31 10:20:30").unwrap(),
            Some(expected)
        );
    }

    #[test]
    fn test_date_converter_from_cell() {
        let d = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        assert_eq!(
            DateConverter.from_cell(&CellValue::Date(d)).unwrap(),
            Some(d)
        );
        assert_eq!(
            DateConverter
                .from_cell(&CellValue::DateTime(d.and_hms_opt(8, 0, 0).unwrap()))
                .unwrap(),
            Some(d)
        );
        assert!(DateConverter.from_cell(&CellValue::Number(1.0)).is_err());
    }

    #[test]
    fn test_date_time_converter() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(10, 20, 30)
            .unwrap();
        assert_eq!(
            DateTimeConverter.from_text("2024-01-31 10:20:30").unwrap(),
            Some(dt)
        );
        // bare time anchors to the epoch date
        let t = DateTimeConverter.from_text("10:20:30").unwrap().unwrap();
        assert_eq!(t.date(), NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
    }

    #[test]
    fn test_number_converter() {
        assert_eq!(NumberConverter.from_text("").unwrap(), None);
        assert_eq!(NumberConverter.from_text("3.5").unwrap(), Some(3.5));
        assert_eq!(NumberConverter.from_text(" 42 ").unwrap(), Some(42.0));
        assert!(NumberConverter.from_text("abc").is_err());
        assert_eq!(
            NumberConverter.from_cell(&CellValue::Number(7.0)).unwrap(),
            Some(7.0)
        );
    }

    #[test]
    fn test_integer_converter() {
        assert_eq!(IntegerConverter.from_text("42").unwrap(), Some(42));
        assert!(IntegerConverter.from_text("3.5").is_err());
        assert_eq!(
            IntegerConverter.from_cell(&CellValue::Number(5.0)).unwrap(),
            Some(5)
        );
        assert!(IntegerConverter.from_cell(&CellValue::Number(5.5)).is_err());
    }

    #[test]
    fn test_boolean_converter() {
        assert_eq!(BooleanConverter.from_text("true").unwrap(), Some(true));
        assert_eq!(BooleanConverter.from_text("FALSE").unwrap(), Some(false));
        assert_eq!(BooleanConverter.from_text("1").unwrap(), Some(true));
        assert_eq!(BooleanConverter.from_text("").unwrap(), None);
        assert!(BooleanConverter.from_text("maybe").is_err());
    }

    #[test]
    fn test_text_converter() {
        assert_eq!(TextConverter.from_text("").unwrap(), None);
        assert_eq!(
            TextConverter.from_text("hello").unwrap(),
            Some("hello".to_string())
        );
        assert_eq!(
            TextConverter
                .from_cell(&CellValue::Number(3.0))
                .unwrap(),
            Some("3".to_string())
        );
        assert_eq!(TextConverter.from_cell(&CellValue::Blank).unwrap(), None);
    }
}
