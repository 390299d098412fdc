//! Primitive values and their canonical text form.
//!
//! Every scalar crosses the wire as text. [`render_scalar`] produces that text
//! on encode; [`infer_scalar`] recovers dates and datetimes from it on decode.

use chrono::{NaiveDate, NaiveDateTime};

/// Wire format for [`Scalar::Date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for [`Scalar::DateTime`].
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Shapes checked before handing text to chrono, which is more lenient
// about digit counts than the wire format allows.
const DATE_SHAPE: &[u8] = b"dddd-dd-dd";
const DATETIME_SHAPE: &[u8] = b"dddd-dd-dd dd:dd:dd";

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// A primitive leaf of a [`crate::Value`] tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// No value. Renders as the empty string.
    Absent,
    /// Free text.
    Text(String),
    /// Whole number.
    Integer(i64),
    /// Floating-point number.
    Float(f64),
    /// Renders as `"true"` / `"false"`.
    Boolean(bool),
    /// Calendar date, rendered as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Date and time of day, rendered as `YYYY-MM-DD HH:MM:SS`.
    DateTime(NaiveDateTime),
    /// Symbolic identifier; renders as its bare name.
    Symbol(String),
    /// A value of a type the protocol has no representation for, carried as
    /// its debug rendering.
    Unsupported(String),
}

impl Scalar {
    /// Creates a [`Scalar::Symbol`].
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Captures the debug rendering of an arbitrary value as
    /// [`Scalar::Unsupported`].
    pub fn unsupported(value: &impl std::fmt::Debug) -> Self {
        Self::Unsupported(format!("{value:?}"))
    }

    /// Returns the text if this is a [`Scalar::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&render_scalar(self))
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u32> for Scalar {
    fn from(value: u32) -> Self {
        Self::Integer(value.into())
    }
}

impl From<usize> for Scalar {
    fn from(value: usize) -> Self {
        i64::try_from(value)
            .map(Self::Integer)
            .unwrap_or_else(|_| Self::Text(value.to_string()))
    }
}

impl From<u64> for Scalar {
    fn from(value: u64) -> Self {
        i64::try_from(value)
            .map(Self::Integer)
            .unwrap_or_else(|_| Self::Text(value.to_string()))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

// ---------------------------------------------------------------------------
// Text conversion
// ---------------------------------------------------------------------------

/// Renders a scalar as the text placed on the wire.
///
/// Never fails: [`Scalar::Unsupported`] yields its captured debug text.
pub fn render_scalar(scalar: &Scalar) -> String {
    match scalar {
        Scalar::Absent => String::new(),
        Scalar::Text(text) => text.clone(),
        Scalar::Integer(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Boolean(b) => b.to_string(),
        Scalar::Date(date) => date.format(DATE_FORMAT).to_string(),
        Scalar::DateTime(datetime) => datetime.format(DATETIME_FORMAT).to_string(),
        Scalar::Symbol(name) => name.clone(),
        Scalar::Unsupported(debug) => debug.clone(),
    }
}

/// Guesses the scalar type of decoded text.
///
/// `YYYY-MM-DD HH:MM:SS` becomes [`Scalar::DateTime`], `YYYY-MM-DD` becomes
/// [`Scalar::Date`], anything else (including text of the right shape that
/// is not a real calendar value) stays [`Scalar::Text`].
pub fn infer_scalar(text: &str) -> Scalar {
    if has_shape(text, DATETIME_SHAPE) {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT) {
            return Scalar::DateTime(datetime);
        }
    } else if has_shape(text, DATE_SHAPE) {
        if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
            return Scalar::Date(date);
        }
    }
    Scalar::Text(text.to_owned())
}

/// `d` in `shape` matches an ASCII digit; any other byte matches itself.
fn has_shape(text: &str, shape: &[u8]) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == shape.len()
        && bytes.iter().zip(shape).all(|(&b, &s)| match s {
            b'd' => b.is_ascii_digit(),
            _ => b == s,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn renders_primitives() {
        assert_eq!(render_scalar(&Scalar::from(12_345)), "12345");
        assert_eq!(render_scalar(&Scalar::from(true)), "true");
        assert_eq!(render_scalar(&Scalar::from(false)), "false");
        assert_eq!(render_scalar(&Scalar::from("cheezburger")), "cheezburger");
        assert_eq!(render_scalar(&Scalar::from("<smile>")), "<smile>");
        assert_eq!(render_scalar(&Scalar::symbol("name")), "name");
        assert_eq!(render_scalar(&Scalar::Absent), "");
    }

    #[test]
    fn renders_numbers_without_separators() {
        assert_eq!(render_scalar(&Scalar::from(1_000_000)), "1000000");
        assert_eq!(render_scalar(&Scalar::from(8549.18)), "8549.18");
        assert_eq!(render_scalar(&Scalar::from(-3)), "-3");
    }

    #[test]
    fn renders_temporal_values() {
        assert_eq!(render_scalar(&Scalar::from(date(2010, 2, 12))), "2010-02-12");

        let datetime = date(2010, 2, 12).and_hms_opt(8, 5, 9).expect("valid time");
        assert_eq!(render_scalar(&Scalar::from(datetime)), "2010-02-12 08:05:09");
    }

    #[test]
    fn renders_unsupported_as_debug_text() {
        let scalar = Scalar::unsupported(&(1, "two"));
        assert_eq!(render_scalar(&scalar), r#"(1, "two")"#);
    }

    #[test]
    fn none_is_absent() {
        assert_eq!(Scalar::from(None::<i64>), Scalar::Absent);
        assert_eq!(Scalar::from(Some("x")), Scalar::Text("x".to_owned()));
    }

    #[test]
    fn infers_dates_and_datetimes() {
        assert_eq!(infer_scalar("2010-02-12"), Scalar::Date(date(2010, 2, 12)));
        assert_eq!(
            infer_scalar("2010-02-12 23:59:01"),
            Scalar::DateTime(date(2010, 2, 12).and_hms_opt(23, 59, 1).expect("valid time"))
        );
    }

    #[test]
    fn leaves_near_misses_as_text() {
        for text in [
            "2010-2-12",
            "2010-02-12T10:00:00",
            " 2010-02-12",
            "2010-13-40",
            "2010-02-12 25:00:00",
            "8549.18",
            "1",
            "",
        ] {
            assert_eq!(infer_scalar(text), Scalar::Text(text.to_owned()), "{text:?}");
        }
    }
}
