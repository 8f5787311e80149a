//! Settings handed to the CSV reader and writer.
//!
//! [`CsvHelperSettings`] is a plain data holder. The facade never interprets
//! most of it: each field is translated into the matching option of
//! [`csv::ReaderBuilder`] or [`csv::WriterBuilder`]. The remaining fields
//! (header matching, empty-row skipping, error tolerance, encoding) are
//! applied around the csv reader by [`CsvHelpers`](crate::helpers::CsvHelpers).
//!
//! Settings can be built fluently or loaded from JSON:
//!
//! ```
//! use csv_helper_rs::settings::{CsvHelperSettings, Culture, FieldQuoting};
//!
//! let settings = CsvHelperSettings::new()
//!     .culture(Culture::DeDe)
//!     .has_header_record(true)
//!     .quote_all_fields(true);
//!
//! assert_eq!(settings.effective_delimiter(), b';');
//! assert_eq!(settings.quoting, FieldQuoting::Always);
//!
//! let settings = CsvHelperSettings::from_json_str(r#"{ "delimiter": "|", "trim_fields": true }"#).unwrap();
//! assert_eq!(settings.effective_delimiter(), b'|');
//! assert!(settings.trim_fields);
//! assert!(settings.has_header_record);
//! ```

use std::{borrow::Cow, fmt, fs, path::Path, str::FromStr};

use csv::{QuoteStyle, ReaderBuilder, WriterBuilder};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{CsvHelperError, Result};

const DEFAULT_BUFFER_SIZE: usize = 2048;

/// Contains settings used by [`CsvHelpers`](crate::helpers::CsvHelpers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvHelperSettings {
    /// Skip lines starting with [`comment`](Self::comment) when reading.
    pub allow_comments: bool,

    /// Size of the buffer used for reading and writing. Default is 2048.
    pub buffer_size: usize,

    /// Character used to denote a commented out line. Default is `#`.
    #[serde(with = "ascii_char")]
    pub comment: u8,

    /// Culture used to pick a delimiter when none is set explicitly.
    pub culture: Culture,

    /// Separator between fields of a row. Falls back to the list separator
    /// of [`culture`](Self::culture).
    #[serde(with = "optional_ascii_char")]
    pub delimiter: Option<u8>,

    /// Fail when a row has a different number of fields than the previous
    /// ones.
    pub detect_column_count_changes: bool,

    /// Encoding of the file. Defaults to UTF-8.
    pub encoding: Encoding,

    pub has_header_record: bool,

    /// Remove all white space from header names before matching them to
    /// fields.
    pub ignore_header_white_space: bool,

    /// Log and skip rows that cannot be read instead of failing.
    pub ignore_reading_exceptions: bool,

    /// Treat quotes like any other character when parsing.
    pub ignore_quotes: bool,

    pub is_header_case_sensitive: bool,

    /// Character used to escape fields containing a delimiter, quote, or line
    /// ending.
    #[serde(with = "ascii_char")]
    pub quote: u8,

    /// Which fields get quoted when writing.
    pub quoting: FieldQuoting,

    /// Skip rows whose fields are all empty when reading.
    pub skip_empty_records: bool,

    /// Trim white space around field values when reading.
    pub trim_fields: bool,

    /// Trim white space around header names when matching them to fields.
    pub trim_headers: bool,

    /// Fail when a field defined in a class map has no column in the file.
    /// Default is `true`.
    pub will_throw_on_missing_field: bool,
}

impl Default for CsvHelperSettings {
    fn default() -> Self {
        Self {
            allow_comments: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
            comment: b'#',
            culture: Culture::Invariant,
            delimiter: None,
            detect_column_count_changes: false,
            encoding: Encoding::utf8(),
            has_header_record: true,
            ignore_header_white_space: false,
            ignore_reading_exceptions: false,
            ignore_quotes: false,
            is_header_case_sensitive: true,
            quote: b'"',
            quoting: FieldQuoting::Necessary,
            skip_empty_records: false,
            trim_fields: false,
            trim_headers: false,
            will_throw_on_missing_field: true,
        }
    }
}

impl CsvHelperSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a JSON document. Missing keys keep their default.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|error| CsvHelperError::Settings(error.to_string()))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path.as_ref())?;
        debug!("Loaded CSV settings from {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    pub fn allow_comments(mut self, yes: bool) -> Self {
        self.allow_comments = yes;
        self
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn comment(mut self, comment: u8) -> Self {
        self.comment = comment;
        self
    }

    pub fn culture(mut self, culture: Culture) -> Self {
        self.culture = culture;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn detect_column_count_changes(mut self, yes: bool) -> Self {
        self.detect_column_count_changes = yes;
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn has_header_record(mut self, yes: bool) -> Self {
        self.has_header_record = yes;
        self
    }

    pub fn ignore_header_white_space(mut self, yes: bool) -> Self {
        self.ignore_header_white_space = yes;
        self
    }

    pub fn ignore_reading_exceptions(mut self, yes: bool) -> Self {
        self.ignore_reading_exceptions = yes;
        self
    }

    pub fn ignore_quotes(mut self, yes: bool) -> Self {
        self.ignore_quotes = yes;
        self
    }

    pub fn is_header_case_sensitive(mut self, yes: bool) -> Self {
        self.is_header_case_sensitive = yes;
        self
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn quoting(mut self, quoting: FieldQuoting) -> Self {
        self.quoting = quoting;
        self
    }

    /// Quotes every field when writing. Turning this on turns
    /// [`quote_no_fields`](Self::quote_no_fields) off.
    pub fn quote_all_fields(mut self, yes: bool) -> Self {
        if yes {
            self.quoting = FieldQuoting::Always;
        } else if self.quoting == FieldQuoting::Always {
            self.quoting = FieldQuoting::Necessary;
        }
        self
    }

    /// Never quotes fields when writing. Turning this on turns
    /// [`quote_all_fields`](Self::quote_all_fields) off.
    pub fn quote_no_fields(mut self, yes: bool) -> Self {
        if yes {
            self.quoting = FieldQuoting::Never;
        } else if self.quoting == FieldQuoting::Never {
            self.quoting = FieldQuoting::Necessary;
        }
        self
    }

    pub fn skip_empty_records(mut self, yes: bool) -> Self {
        self.skip_empty_records = yes;
        self
    }

    pub fn trim_fields(mut self, yes: bool) -> Self {
        self.trim_fields = yes;
        self
    }

    pub fn trim_headers(mut self, yes: bool) -> Self {
        self.trim_headers = yes;
        self
    }

    pub fn will_throw_on_missing_field(mut self, yes: bool) -> Self {
        self.will_throw_on_missing_field = yes;
        self
    }

    /// The delimiter actually used: the explicit one, or the culture's list
    /// separator.
    pub fn effective_delimiter(&self) -> u8 {
        self.delimiter
            .unwrap_or_else(|| self.culture.list_separator())
    }

    /// Checks the combination of settings before any file is touched.
    pub fn validate(&self) -> Result<()> {
        let delimiter = self.effective_delimiter();

        if self.buffer_size == 0 {
            return Err(CsvHelperError::Settings(
                "buffer_size must be greater than zero".to_string(),
            ));
        }
        if delimiter == self.quote {
            return Err(CsvHelperError::Settings(format!(
                "delimiter and quote must differ (both are {:?})",
                delimiter as char
            )));
        }
        if self.allow_comments && (self.comment == delimiter || self.comment == self.quote) {
            return Err(CsvHelperError::Settings(format!(
                "comment character {:?} clashes with the delimiter or quote",
                self.comment as char
            )));
        }
        for (name, byte) in [
            ("delimiter", delimiter),
            ("quote", self.quote),
            ("comment", self.comment),
        ] {
            if !byte.is_ascii() || matches!(byte, b'\r' | b'\n') {
                return Err(CsvHelperError::Settings(format!(
                    "{name} must be an ASCII character other than a line ending"
                )));
            }
        }

        Ok(())
    }

    /// A csv reader builder configured from these settings.
    ///
    /// Headers are read as plain rows: header matching happens in the facade.
    pub fn reader_builder(&self) -> ReaderBuilder {
        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.effective_delimiter())
            .quote(self.quote)
            .quoting(!self.ignore_quotes)
            .flexible(!self.detect_column_count_changes)
            .comment(self.allow_comments.then_some(self.comment))
            .buffer_capacity(self.buffer_size);
        builder
    }

    /// A csv writer builder configured from these settings.
    ///
    /// The header row is written explicitly by the facade.
    pub fn writer_builder(&self) -> WriterBuilder {
        let mut builder = WriterBuilder::new();
        builder
            .has_headers(false)
            .delimiter(self.effective_delimiter())
            .quote(self.quote)
            .quote_style(self.quoting.into())
            .flexible(!self.detect_column_count_changes)
            .buffer_capacity(self.buffer_size);
        builder
    }
}

/// Quoting policy when writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldQuoting {
    /// Quote every field.
    Always,
    /// Never quote, even if that produces invalid CSV.
    Never,
    /// Quote only fields containing a delimiter, quote or line ending.
    #[default]
    Necessary,
    /// Quote every field that is not a number.
    NonNumeric,
}

impl From<FieldQuoting> for QuoteStyle {
    fn from(quoting: FieldQuoting) -> Self {
        match quoting {
            FieldQuoting::Always => QuoteStyle::Always,
            FieldQuoting::Never => QuoteStyle::Never,
            FieldQuoting::Necessary => QuoteStyle::Necessary,
            FieldQuoting::NonNumeric => QuoteStyle::NonNumeric,
        }
    }
}

/// Culture of a CSV file. Only the list separator is taken from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Culture {
    #[default]
    Invariant,
    EnUs,
    EnGb,
    DeDe,
    FrFr,
    EsEs,
    ItIt,
    NlNl,
    PtBr,
}

impl Culture {
    pub fn name(&self) -> &'static str {
        match self {
            Culture::Invariant => "",
            Culture::EnUs => "en-US",
            Culture::EnGb => "en-GB",
            Culture::DeDe => "de-DE",
            Culture::FrFr => "fr-FR",
            Culture::EsEs => "es-ES",
            Culture::ItIt => "it-IT",
            Culture::NlNl => "nl-NL",
            Culture::PtBr => "pt-BR",
        }
    }

    /// Separator used between list items in this culture.
    pub fn list_separator(&self) -> u8 {
        match self {
            Culture::Invariant | Culture::EnUs | Culture::EnGb => b',',
            _ => b';',
        }
    }
}

impl fmt::Display for Culture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Culture::Invariant => write!(f, "invariant"),
            other => write!(f, "{}", other.name()),
        }
    }
}

impl FromStr for Culture {
    type Err = CsvHelperError;

    fn from_str(name: &str) -> Result<Self> {
        let normalized = name.trim().replace('_', "-").to_ascii_lowercase();
        let culture = match normalized.as_str() {
            "" | "invariant" => Culture::Invariant,
            "en-us" => Culture::EnUs,
            "en-gb" => Culture::EnGb,
            "de-de" => Culture::DeDe,
            "fr-fr" => Culture::FrFr,
            "es-es" => Culture::EsEs,
            "it-it" => Culture::ItIt,
            "nl-nl" => Culture::NlNl,
            "pt-br" => Culture::PtBr,
            _ => {
                return Err(CsvHelperError::Settings(format!(
                    "unknown culture `{name}`"
                )));
            }
        };
        Ok(culture)
    }
}

impl TryFrom<String> for Culture {
    type Error = CsvHelperError;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

impl From<Culture> for String {
    fn from(culture: Culture) -> Self {
        culture.name().to_string()
    }
}

/// Text encoding of a CSV file.
///
/// Input is decoded to UTF-8 before parsing, with a byte order mark taking
/// precedence over the configured encoding. Output is encoded after
/// writing; UTF-16 output starts with a byte order mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Encoding(&'static encoding_rs::Encoding);

impl Encoding {
    pub fn utf8() -> Self {
        Self(encoding_rs::UTF_8)
    }

    /// Looks an encoding up by its WHATWG label, e.g. `"utf-8"`,
    /// `"windows-1252"` or `"latin1"`.
    pub fn for_label(label: &str) -> Result<Self> {
        encoding_rs::Encoding::for_label(label.trim().as_bytes())
            .map(Self)
            .ok_or_else(|| CsvHelperError::Settings(format!("unknown encoding `{label}`")))
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Decodes raw file content.
    ///
    /// Malformed sequences are replaced with U+FFFD and reported in the log.
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, str> {
        let (text, actual, had_errors) = self.0.decode(bytes);
        if actual != self.0 {
            debug!("Byte order mark overrides {} with {}", self.name(), actual.name());
        }
        if had_errors {
            warn!("Malformed {} sequences were replaced while decoding", actual.name());
        }
        text
    }

    /// Encodes text for writing.
    pub fn encode<'a>(&self, text: &'a str) -> Result<Cow<'a, [u8]>> {
        if self.0 == encoding_rs::UTF_16LE || self.0 == encoding_rs::UTF_16BE {
            return Ok(Cow::Owned(self.encode_utf16(text)));
        }

        let (bytes, actual, had_errors) = self.0.encode(text);
        if actual != self.0 {
            debug!("{} cannot be written, using {}", self.name(), actual.name());
        }
        if had_errors {
            return Err(CsvHelperError::Encoding(format!(
                "text contains characters that cannot be represented in {}",
                actual.name()
            )));
        }
        Ok(bytes)
    }

    // encoding_rs only decodes UTF-16, so the code units are laid out here.
    fn encode_utf16(&self, text: &str) -> Vec<u8> {
        let big_endian = self.0 == encoding_rs::UTF_16BE;
        let mut bytes = Vec::with_capacity(2 * (text.len() + 1));
        for unit in std::iter::once(0xFEFF).chain(text.encode_utf16()) {
            let pair = if big_endian {
                unit.to_be_bytes()
            } else {
                unit.to_le_bytes()
            };
            bytes.extend_from_slice(&pair);
        }
        bytes
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self::utf8()
    }
}

impl TryFrom<String> for Encoding {
    type Error = CsvHelperError;

    fn try_from(label: String) -> Result<Self> {
        Self::for_label(&label)
    }
}

impl From<Encoding> for String {
    fn from(encoding: Encoding) -> Self {
        encoding.name().to_string()
    }
}

/// Serializes a single-byte setting as a one character string.
mod ascii_char {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(byte: &u8, serializer: S) -> Result<S::Ok, S::Error> {
        let mut buffer = [0; 4];
        serializer.serialize_str(char::from(*byte).encode_utf8(&mut buffer))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).map_err(D::Error::custom)
    }

    pub(super) fn parse(value: &str) -> Result<u8, String> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii() => Ok(c as u8),
            _ => Err(format!("expected a single ASCII character, got `{value}`")),
        }
    }
}

mod optional_ascii_char {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(byte: &Option<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        match byte {
            Some(byte) => super::ascii_char::serialize(byte, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|value| super::ascii_char::parse(&value).map_err(D::Error::custom))
            .transpose()
    }
}
