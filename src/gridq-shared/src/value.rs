//! Typed filter values
//!
//! Filter operands travel as plain strings inside the grammar. The column
//! a filter targets carries a [`DataType`] which drives coercion back into
//! a typed [`ScalarValue`] during parsing, and the scalar knows how to
//! encode itself back into the wire form.

use chrono::NaiveDate;
use std::fmt;

/// Wire format for date values
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column data type, used to coerce string operands during parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Free text (default)
    #[default]
    Text,
    /// Integer or floating point number
    Number,
    /// Boolean flag
    Boolean,
    /// Calendar date, `YYYY-MM-DD` on the wire
    Date,
    /// Closed set of selectable values, kept as text
    Select,
}

impl DataType {
    /// Coerce a raw wire token into a typed scalar.
    ///
    /// Coercion is lenient: a token that does not fit the declared type
    /// falls back to a text scalar rather than failing the parse.
    pub fn coerce(&self, raw: &str) -> ScalarValue {
        match self {
            DataType::Text | DataType::Select => ScalarValue::Text(raw.to_string()),
            DataType::Number => {
                if let Ok(int) = raw.parse::<i64>() {
                    ScalarValue::Int(int)
                } else if let Ok(float) = raw.parse::<f64>() {
                    ScalarValue::Float(float)
                } else {
                    ScalarValue::Text(raw.to_string())
                }
            }
            DataType::Boolean => match raw {
                "true" => ScalarValue::Bool(true),
                "false" => ScalarValue::Bool(false),
                _ => ScalarValue::Text(raw.to_string()),
            },
            DataType::Date => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
                Ok(date) => ScalarValue::Date(date),
                Err(_) => ScalarValue::Text(raw.to_string()),
            },
        }
    }
}

/// A single typed filter operand
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Text value
    Text(String),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Date value
    Date(NaiveDate),
}

impl ScalarValue {
    /// Encode the scalar into its wire token.
    ///
    /// Dates use [`DATE_FORMAT`]; everything else is its plain string form.
    pub fn encode(&self) -> String {
        match self {
            ScalarValue::Text(s) => s.clone(),
            ScalarValue::Int(n) => n.to_string(),
            ScalarValue::Float(n) => n.to_string(),
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

/// Operand of a filter item: a single scalar or a value list
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Single scalar operand
    Scalar(ScalarValue),
    /// Value list, serialized as `(v1,v2,v3)`
    List(Vec<ScalarValue>),
}

impl FilterValue {
    /// Convenience constructor for a text scalar
    pub fn text(s: impl Into<String>) -> Self {
        FilterValue::Scalar(ScalarValue::Text(s.into()))
    }

    /// Convenience constructor for an integer scalar
    pub fn int(n: i64) -> Self {
        FilterValue::Scalar(ScalarValue::Int(n))
    }

    /// Convenience constructor for a list of text values
    pub fn texts<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FilterValue::List(values.into_iter().map(|v| ScalarValue::Text(v.into())).collect())
    }
}
