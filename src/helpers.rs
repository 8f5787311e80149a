//! The read/write facade.
//!
//! [`CsvHelpers`] checks its arguments, resolves the file against the
//! working directory, opens it through the [`FileSystem`] and hands the
//! stream to the csv reader or writer configured from
//! [`CsvHelperSettings`]. Records go through serde on both sides.
//!
//! # Examples
//!
//! ```
//! use csv_helper_rs::{
//!     core::{environment::SystemEnvironment, file_system::PhysicalFileSystem, path::FilePath},
//!     helpers::CsvHelpers,
//!     settings::CsvHelperSettings,
//! };
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Person {
//!     id: u32,
//!     name: String,
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let file_system = PhysicalFileSystem;
//! let environment = SystemEnvironment::with_working_directory(dir.path());
//! let helpers = CsvHelpers::new(&file_system, &environment);
//!
//! let people = vec![
//!     Person { id: 1, name: "Alice".to_string() },
//!     Person { id: 2, name: "Bob".to_string() },
//! ];
//! let settings = CsvHelperSettings::default();
//!
//! helpers.write_records(&FilePath::from("people.csv"), &people, &settings).unwrap();
//! let read: Vec<Person> = helpers.read_records(&FilePath::from("./people.csv"), &settings).unwrap();
//!
//! assert_eq!(read, people);
//! ```

use std::{
    io::{Read, Write},
    path::PathBuf,
};

use log::{debug, info, warn};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    core::{context::Context, environment::Environment, file_system::FileSystem, path::FilePath},
    error::{CsvHelperError, Result},
    mapping::{ClassMap, ReadLayout, WriteLayout},
    record,
    settings::CsvHelperSettings,
};

/// Reads and writes CSV files on behalf of a build script.
pub struct CsvHelpers<'a> {
    file_system: &'a dyn FileSystem,
    environment: &'a dyn Environment,
}

impl<'a> CsvHelpers<'a> {
    pub fn new(file_system: &'a dyn FileSystem, environment: &'a dyn Environment) -> Self {
        Self {
            file_system,
            environment,
        }
    }

    pub fn from_context<C: Context + ?Sized>(context: &'a C) -> Self {
        Self::new(context.file_system(), context.environment())
    }

    /// Reads every record of `csv_file`.
    ///
    /// # Errors
    ///
    /// - [`CsvHelperError::ArgumentMissing`] if `csv_file` is empty
    /// - [`CsvHelperError::FileNotFound`] if the resolved file does not exist
    /// - [`CsvHelperError::Record`] if a row cannot be parsed or deserialized,
    ///   unless `ignore_reading_exceptions` is set
    pub fn read_records<T: DeserializeOwned>(
        &self,
        csv_file: &FilePath,
        settings: &CsvHelperSettings,
    ) -> Result<Vec<T>> {
        self.read(csv_file, None, settings)
    }

    /// Reads records whose columns are renamed by a field → column
    /// dictionary.
    pub fn read_records_with_mapping<T, I, K, V>(
        &self,
        csv_file: &FilePath,
        mapping: I,
        settings: &CsvHelperSettings,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let class_map = mapping_to_class_map(mapping)?;
        self.read(csv_file, Some(&class_map), settings)
    }

    pub fn read_records_with_class_map<T: DeserializeOwned>(
        &self,
        csv_file: &FilePath,
        class_map: &ClassMap,
        settings: &CsvHelperSettings,
    ) -> Result<Vec<T>> {
        if class_map.is_empty() {
            return Err(CsvHelperError::ArgumentMissing("class_map"));
        }
        self.read(csv_file, Some(class_map), settings)
    }

    /// Writes `records` to `csv_file`, replacing its content.
    ///
    /// Every record is serialized before the file is opened, so a record
    /// that cannot be written leaves an existing file untouched.
    pub fn write_records<T: Serialize>(
        &self,
        csv_file: &FilePath,
        records: &[T],
        settings: &CsvHelperSettings,
    ) -> Result<()> {
        self.write(csv_file, records, None, settings)
    }

    /// Writes the fields named in `mapping`, under their mapped column names.
    pub fn write_records_with_mapping<T, I, K, V>(
        &self,
        csv_file: &FilePath,
        records: &[T],
        mapping: I,
        settings: &CsvHelperSettings,
    ) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let class_map = mapping_to_class_map(mapping)?;
        self.write(csv_file, records, Some(&class_map), settings)
    }

    pub fn write_records_with_class_map<T: Serialize>(
        &self,
        csv_file: &FilePath,
        records: &[T],
        class_map: &ClassMap,
        settings: &CsvHelperSettings,
    ) -> Result<()> {
        if class_map.is_empty() {
            return Err(CsvHelperError::ArgumentMissing("class_map"));
        }
        self.write(csv_file, records, Some(class_map), settings)
    }

    fn resolve(&self, csv_file: &FilePath) -> Result<PathBuf> {
        if csv_file.is_empty() {
            return Err(CsvHelperError::ArgumentMissing("csv_file"));
        }

        let path = csv_file.make_absolute(self.environment).into_path_buf();
        debug!("Resolved {} to {}", csv_file, path.display());
        Ok(path)
    }

    fn read<T: DeserializeOwned>(
        &self,
        csv_file: &FilePath,
        class_map: Option<&ClassMap>,
        settings: &CsvHelperSettings,
    ) -> Result<Vec<T>> {
        let path = self.resolve(csv_file)?;
        settings.validate()?;
        if let Some(class_map) = class_map {
            class_map.validate()?;
        }

        if !self.file_system.exists(&path) {
            return Err(CsvHelperError::FileNotFound(path));
        }

        let mut content = Vec::new();
        self.file_system.open_read(&path)?.read_to_end(&mut content)?;
        let text = settings.encoding.decode(&content);

        let records = deserialize_rows(text.as_bytes(), class_map, settings)?;
        info!("Read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    fn write<T: Serialize>(
        &self,
        csv_file: &FilePath,
        records: &[T],
        class_map: Option<&ClassMap>,
        settings: &CsvHelperSettings,
    ) -> Result<()> {
        let path = self.resolve(csv_file)?;
        settings.validate()?;
        if let Some(class_map) = class_map {
            class_map.validate()?;
        }

        let text = serialize_rows(records, class_map, settings)?;
        let content = settings.encoding.encode(&text)?;

        let mut stream = self.file_system.open_write(&path)?;
        stream.write_all(&content)?;
        stream.flush()?;

        info!("Wrote {} records to {}", records.len(), path.display());
        Ok(())
    }
}

fn mapping_to_class_map<I, K, V>(mapping: I) -> Result<ClassMap>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let class_map = ClassMap::from_mapping(mapping)?;
    if class_map.is_empty() {
        return Err(CsvHelperError::ArgumentMissing("mapping"));
    }
    Ok(class_map)
}

/// Reports a bad row, or logs and swallows it when reading exceptions are
/// ignored.
fn skip_or_fail(line: Option<u64>, message: String, settings: &CsvHelperSettings) -> Result<()> {
    if settings.ignore_reading_exceptions {
        match line {
            Some(line) => warn!("Skipping record at line {line}: {message}"),
            None => warn!("Skipping record: {message}"),
        }
        Ok(())
    } else {
        Err(CsvHelperError::Record { line, message })
    }
}

fn deserialize_rows<T: DeserializeOwned, R: Read>(
    input: R,
    class_map: Option<&ClassMap>,
    settings: &CsvHelperSettings,
) -> Result<Vec<T>> {
    let mut reader = settings.reader_builder().from_reader(input);
    let mut rows = reader.records();

    let layout = if settings.has_header_record {
        match rows.next() {
            Some(header) => {
                ReadLayout::from_headers(&header?, record::field_names::<T>(), class_map, settings)?
            }
            None => {
                debug!("Empty CSV input, no header row");
                return Ok(Vec::new());
            }
        }
    } else {
        ReadLayout::positional(class_map, record::field_names::<T>())?
    };
    debug!("Reading with headers {:?}", layout.headers());

    let mut records = Vec::new();
    for row in rows {
        let mut row = match row {
            Ok(row) => row,
            Err(error) => {
                let line = error.position().map(|position| position.line());
                skip_or_fail(line, error.to_string(), settings)?;
                continue;
            }
        };

        let line = row.position().map(|position| position.line());

        if settings.trim_fields {
            row.trim();
        }
        if settings.skip_empty_records && row.iter().all(str::is_empty) {
            debug!("Skipping empty record at line {line:?}");
            continue;
        }

        match layout.apply(&row).deserialize::<T>(layout.headers()) {
            Ok(record) => records.push(record),
            Err(error) => skip_or_fail(line, error.to_string(), settings)?,
        }
    }

    Ok(records)
}

fn serialize_rows<T: Serialize>(
    records: &[T],
    class_map: Option<&ClassMap>,
    settings: &CsvHelperSettings,
) -> Result<String> {
    let flattened = records
        .iter()
        .map(record::flatten)
        .collect::<Result<Vec<_>>>()?;

    let layout = match (class_map, flattened.first()) {
        (Some(class_map), first) => Some(WriteLayout::from_class_map(class_map, first)?),
        (None, Some(first)) => Some(WriteLayout::from_record(first)),
        (None, None) => None,
    };

    let mut writer = settings.writer_builder().from_writer(Vec::new());
    if let Some(layout) = &layout {
        if settings.has_header_record {
            writer.write_record(layout.header())?;
        }
        for record in &flattened {
            writer.write_record(layout.row(record))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| CsvHelperError::Io(error.into_error()))?;
    String::from_utf8(bytes).map_err(|error| CsvHelperError::Serialization(error.to_string()))
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::{deserialize_rows, serialize_rows};
    use crate::{error::CsvHelperError, mapping::ClassMap, settings::CsvHelperSettings};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Car {
        year: u16,
        make: String,
        model: String,
        description: Option<String>,
    }

    fn car(year: u16, make: &str, model: &str, description: Option<&str>) -> Car {
        Car {
            year,
            make: make.to_string(),
            model: model.to_string(),
            description: description.map(str::to_string),
        }
    }

    #[test]
    fn rows_should_be_deserialized_by_header() -> Result<(), CsvHelperError> {
        let csv = "model,year,make,description\n356,1948,Porsche,Luxury sports car\n205,1995,Peugeot,\n";

        let cars: Vec<Car> = deserialize_rows(csv.as_bytes(), None, &CsvHelperSettings::default())?;

        assert_eq!(
            cars,
            vec![
                car(1948, "Porsche", "356", Some("Luxury sports car")),
                car(1995, "Peugeot", "205", None),
            ]
        );

        Ok(())
    }

    #[test]
    fn rows_without_header_should_be_deserialized_by_position() -> Result<(), CsvHelperError> {
        let csv = "1948;Porsche;356;\n1967;Ford;Mustang;American car\n";
        let settings = CsvHelperSettings::new()
            .has_header_record(false)
            .delimiter(b';');

        let cars: Vec<Car> = deserialize_rows(csv.as_bytes(), None, &settings)?;

        assert_eq!(cars.len(), 2);
        assert_eq!(cars[1], car(1967, "Ford", "Mustang", Some("American car")));

        Ok(())
    }

    #[test]
    fn empty_input_should_yield_no_records() -> Result<(), CsvHelperError> {
        let cars: Vec<Car> = deserialize_rows("".as_bytes(), None, &CsvHelperSettings::default())?;

        assert!(cars.is_empty());

        Ok(())
    }

    #[test]
    fn bad_row_should_report_its_line() {
        let csv = "year,make,model,description\n1948,Porsche,356,\n19x5,Peugeot,205,\n";

        let result: Result<Vec<Car>, _> =
            deserialize_rows(csv.as_bytes(), None, &CsvHelperSettings::default());

        match result {
            Err(CsvHelperError::Record { line, .. }) => assert_eq!(line, Some(3)),
            other => panic!("expected a record error, got {other:?}"),
        }
    }

    #[test]
    fn bad_rows_should_be_skipped_when_ignoring_exceptions() -> Result<(), CsvHelperError> {
        let csv = "year,make,model,description\n1948,Porsche,356,\n19x5,Peugeot,205,\n2021,Mazda,CX-30,\n";
        let settings = CsvHelperSettings::new().ignore_reading_exceptions(true);

        let cars: Vec<Car> = deserialize_rows(csv.as_bytes(), None, &settings)?;

        assert_eq!(cars.len(), 2);
        assert_eq!(cars[1].make, "Mazda");

        Ok(())
    }

    #[test]
    fn column_count_changes_should_fail_when_detected() {
        let csv = "year,make,model,description\n1948,Porsche,356,\n1995,Peugeot\n";
        let settings = CsvHelperSettings::new().detect_column_count_changes(true);

        let result: Result<Vec<Car>, _> = deserialize_rows(csv.as_bytes(), None, &settings);

        assert!(matches!(result, Err(CsvHelperError::Record { .. })));
    }

    #[test]
    fn trimming_comments_and_empty_rows_should_be_honoured() -> Result<(), CsvHelperError> {
        let csv = "year,make,model,description\n# vintage cars\n 1948 , Porsche ,356,\n,,,\n";
        let settings = CsvHelperSettings::new()
            .allow_comments(true)
            .trim_fields(true)
            .skip_empty_records(true);

        let cars: Vec<Car> = deserialize_rows(csv.as_bytes(), None, &settings)?;

        assert_eq!(cars, vec![car(1948, "Porsche", "356", None)]);

        Ok(())
    }

    #[test]
    fn ignored_quotes_should_be_kept_in_values() -> Result<(), CsvHelperError> {
        let csv = "year,make,model,description\n1948,\"Porsche\",356,\n";
        let settings = CsvHelperSettings::new().ignore_quotes(true);

        let cars: Vec<Car> = deserialize_rows(csv.as_bytes(), None, &settings)?;

        assert_eq!(cars[0].make, "\"Porsche\"");

        Ok(())
    }

    #[test]
    fn class_map_should_rename_columns_on_read() -> Result<(), CsvHelperError> {
        let csv = "Built,Brand,Name,Notes\n1948,Porsche,356,\n";
        let class_map = ClassMap::from_mapping([
            ("year", "Built"),
            ("make", "Brand"),
            ("model", "Name"),
            ("description", "Notes"),
        ])?;

        let cars: Vec<Car> =
            deserialize_rows(csv.as_bytes(), Some(&class_map), &CsvHelperSettings::default())?;

        assert_eq!(cars, vec![car(1948, "Porsche", "356", None)]);

        Ok(())
    }

    #[test]
    fn partial_mapping_should_match_other_columns_by_name() -> Result<(), CsvHelperError> {
        let csv = "Built,make,model,description\n1948,Porsche,356,\n";
        let class_map = ClassMap::from_mapping([("year", "Built")])?;

        let cars: Vec<Car> =
            deserialize_rows(csv.as_bytes(), Some(&class_map), &CsvHelperSettings::default())?;

        assert_eq!(cars[0].year, 1948);
        assert_eq!(cars[0].make, "Porsche");

        Ok(())
    }

    #[test]
    fn records_should_be_serialized_with_header() -> Result<(), CsvHelperError> {
        let cars = vec![
            car(1948, "Porsche", "356", Some("Luxury, sports car")),
            car(1995, "Peugeot", "205", None),
        ];

        let csv = serialize_rows(&cars, None, &CsvHelperSettings::default())?;

        assert_eq!(
            csv,
            "year,make,model,description\n1948,Porsche,356,\"Luxury, sports car\"\n1995,Peugeot,205,\n"
        );

        Ok(())
    }

    #[test]
    fn quoting_and_delimiter_should_be_applied_on_write() -> Result<(), CsvHelperError> {
        let cars = vec![car(1948, "Porsche", "356", None)];
        let settings = CsvHelperSettings::new()
            .delimiter(b';')
            .has_header_record(false)
            .quote_all_fields(true);

        let csv = serialize_rows(&cars, None, &settings)?;

        assert_eq!(csv, "\"1948\";\"Porsche\";\"356\";\"\"\n");

        Ok(())
    }

    #[test]
    fn class_map_should_select_and_rename_on_write() -> Result<(), CsvHelperError> {
        let cars = vec![car(1948, "Porsche", "356", None)];
        let mut class_map = ClassMap::new();
        class_map.map("make").name("Brand");
        class_map.map("year").name("Built");

        let csv = serialize_rows(&cars, Some(&class_map), &CsvHelperSettings::default())?;

        assert_eq!(csv, "Built,Brand\n1948,Porsche\n");

        Ok(())
    }

    #[test]
    fn no_records_should_write_class_map_header_only() -> Result<(), CsvHelperError> {
        let class_map = ClassMap::from_mapping([("year", "Built")])?;

        let csv = serialize_rows::<Car>(&[], Some(&class_map), &CsvHelperSettings::default())?;
        assert_eq!(csv, "Built\n");

        let csv = serialize_rows::<Car>(&[], None, &CsvHelperSettings::default())?;
        assert_eq!(csv, "");

        Ok(())
    }
}
