use std::io::Read;

use serde::{Deserialize, Serialize};

use super::{CodecError, ErrorContext};

/// Layout of the text format.
///
/// The default matches the interchange files: a comma as the decimal
/// separator and a single space between the two columns.
///
/// ```rust
/// use tabfn::io::TextFormat;
///
/// let format = TextFormat::from_json_str(r#"{ "decimal_separator": "." }"#).unwrap();
/// assert_eq!(format.decimal_separator, '.');
/// assert_eq!(format.column_separator, ' ');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFormat {
    pub decimal_separator: char,
    pub column_separator: char,
}

impl Default for TextFormat {
    fn default() -> Self {
        TextFormat {
            decimal_separator: ',',
            column_separator: ' ',
        }
    }
}

impl TextFormat {
    pub fn new(decimal_separator: char, column_separator: char) -> Result<Self, CodecError> {
        let format = TextFormat {
            decimal_separator,
            column_separator,
        };
        format.validate()?;
        Ok(format)
    }

    /// Loads a format from a JSON document; missing fields take their
    /// defaults.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CodecError> {
        let format: TextFormat = serde_json::from_reader(reader)?;
        format.validate()?;
        Ok(format)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CodecError> {
        let format: TextFormat = serde_json::from_str(json)?;
        format.validate()?;
        Ok(format)
    }

    /// Checks that numbers and columns can be told apart.
    pub fn validate(&self) -> Result<(), CodecError> {
        let context = ErrorContext::new().with_parsing("text format");
        for (name, separator) in [
            ("decimal", self.decimal_separator),
            ("column", self.column_separator),
        ] {
            if separator.is_ascii_digit() || separator == '-' || separator == '+' {
                return Err(CodecError::malformed(
                    format!("{} separator '{}' can appear in a number", name, separator),
                    context,
                ));
            }
        }
        if self.decimal_separator.is_whitespace() {
            return Err(CodecError::malformed(
                "decimal separator cannot be whitespace",
                context,
            ));
        }
        if self.decimal_separator == self.column_separator {
            return Err(CodecError::malformed(
                format!(
                    "decimal and column separators are both '{}'",
                    self.decimal_separator
                ),
                context,
            ));
        }
        Ok(())
    }

    pub(crate) fn format_number(&self, value: f64) -> String {
        let text = value.to_string();
        if self.decimal_separator == '.' {
            text
        } else {
            text.replace('.', &self.decimal_separator.to_string())
        }
    }

    pub(crate) fn parse_number(&self, token: &str, context: ErrorContext) -> Result<f64, CodecError> {
        if self.decimal_separator != '.' && token.contains('.') {
            return Err(CodecError::malformed(
                format!(
                    "'{}' uses '.' instead of '{}' as decimal separator",
                    token, self.decimal_separator
                ),
                context,
            ));
        }
        token
            .replace(self.decimal_separator, ".")
            .parse::<f64>()
            .map_err(|_| CodecError::malformed(format!("'{}' is not a number", token), context))
    }

    /// Splits a point line into its columns.
    pub(crate) fn split_columns<'a>(&self, line: &'a str) -> Vec<&'a str> {
        if self.column_separator.is_whitespace() {
            line.split_whitespace().collect()
        } else {
            line.split(self.column_separator).map(str::trim).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_comma_decimal() {
        let format = TextFormat::default();
        assert_eq!(format.decimal_separator, ',');
        assert_eq!(format.column_separator, ' ');
        assert!(format.validate().is_ok());
    }

    #[test]
    fn test_numbers() {
        let format = TextFormat::default();
        assert_eq!(format.format_number(2.5), "2,5");
        assert_eq!(format.format_number(-3.0), "-3");
        assert_eq!(format.parse_number("6,25", ErrorContext::new()).unwrap(), 6.25);
        assert_eq!(format.parse_number("-0,5", ErrorContext::new()).unwrap(), -0.5);
        assert!(format.parse_number("6.25", ErrorContext::new()).is_err());
        assert!(format.parse_number("abc", ErrorContext::new()).is_err());

        let dotted = TextFormat::new('.', ';').unwrap();
        assert_eq!(dotted.format_number(0.125), "0.125");
        assert_eq!(dotted.parse_number("0.125", ErrorContext::new()).unwrap(), 0.125);
        assert_eq!(dotted.split_columns("1.5 ; 2"), vec!["1.5", "2"]);
    }

    #[test]
    fn test_rejects_ambiguous_separators() {
        assert!(TextFormat::new('1', ' ').is_err());
        assert!(TextFormat::new('-', ' ').is_err());
        assert!(TextFormat::new(' ', ';').is_err());
        assert!(TextFormat::new(',', ',').is_err());
        assert!(TextFormat::new(',', '+').is_err());
    }

    #[test]
    fn test_from_json() {
        assert_eq!(TextFormat::from_json_str("{}").unwrap(), TextFormat::default());

        let format = TextFormat::from_reader(
            r#"{ "decimal_separator": ".", "column_separator": "\t" }"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(format, TextFormat::new('.', '\t').unwrap());

        assert!(matches!(
            TextFormat::from_json_str(r#"{ "decimal_separator": " " }"#),
            Err(CodecError::MalformedInput { .. })
        ));
        assert!(matches!(
            TextFormat::from_json_str("not json"),
            Err(CodecError::Serialization(_))
        ));
    }
}
