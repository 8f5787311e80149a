//! Script verbs for reading and writing CSV files.
//!
//! Every [`Context`] gets the `read_csv*` and `write_csv*` methods through the
//! blanket implementation of [`CsvHelperAliases`]. Overloads without settings
//! use [`CsvHelperSettings::default`].
//!
//! ```
//! use csv_helper_rs::{
//!     aliases::CsvHelperAliases,
//!     core::{context::BuildContext, environment::SystemEnvironment, file_system::PhysicalFileSystem},
//!     settings::CsvHelperSettings,
//! };
//! use serde::{Deserialize, Serialize};
//! use std::collections::HashMap;
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Person {
//!     id: u32,
//!     name: String,
//! }
//!
//! let dir = tempfile::tempdir().unwrap();
//! let context = BuildContext::with(PhysicalFileSystem, SystemEnvironment::with_working_directory(dir.path()));
//!
//! let people = vec![Person { id: 1, name: "Alice".to_string() }];
//!
//! context.write_csv("./people.csv", &people).unwrap();
//! let read: Vec<Person> = context.read_csv("./people.csv").unwrap();
//! assert_eq!(read, people);
//!
//! let mapping = HashMap::from([("id", "EmployeeId"), ("name", "FirstName")]);
//! context
//!     .write_csv_with_mapping("./employees.csv", &people, mapping.clone(), &CsvHelperSettings::default())
//!     .unwrap();
//! let read: Vec<Person> = context
//!     .read_csv_with_mapping("./employees.csv", mapping, &CsvHelperSettings::default())
//!     .unwrap();
//! assert_eq!(read, people);
//! ```

use serde::{Serialize, de::DeserializeOwned};

use crate::{
    core::{context::Context, path::FilePath},
    error::Result,
    helpers::CsvHelpers,
    mapping::ClassMap,
    settings::CsvHelperSettings,
};

/// CSV verbs available on a build [`Context`].
pub trait CsvHelperAliases: Context {
    /// Reads a CSV file into a list of records.
    ///
    /// ```no_run
    /// # use csv_helper_rs::{aliases::CsvHelperAliases, core::context::BuildContext};
    /// # #[derive(serde::Deserialize)] struct Person { id: u32, name: String }
    /// # let context = BuildContext::new();
    /// let people: Vec<Person> = context.read_csv("./people.csv")?;
    /// # Ok::<(), csv_helper_rs::CsvHelperError>(())
    /// ```
    fn read_csv<T: DeserializeOwned>(&self, csv_file: impl Into<FilePath>) -> Result<Vec<T>> {
        self.read_csv_with_settings(csv_file, &CsvHelperSettings::default())
    }

    fn read_csv_with_settings<T: DeserializeOwned>(
        &self,
        csv_file: impl Into<FilePath>,
        settings: &CsvHelperSettings,
    ) -> Result<Vec<T>> {
        CsvHelpers::from_context(self).read_records(&csv_file.into(), settings)
    }

    /// Reads a CSV file whose column names differ from the record fields.
    fn read_csv_with_mapping<T, I, K, V>(
        &self,
        csv_file: impl Into<FilePath>,
        mapping: I,
        settings: &CsvHelperSettings,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        CsvHelpers::from_context(self).read_records_with_mapping(&csv_file.into(), mapping, settings)
    }

    fn read_csv_with_class_map<T: DeserializeOwned>(
        &self,
        csv_file: impl Into<FilePath>,
        class_map: &ClassMap,
        settings: &CsvHelperSettings,
    ) -> Result<Vec<T>> {
        CsvHelpers::from_context(self).read_records_with_class_map(&csv_file.into(), class_map, settings)
    }

    /// Writes records to a CSV file.
    ///
    /// ```no_run
    /// # use csv_helper_rs::{aliases::CsvHelperAliases, core::context::BuildContext};
    /// # #[derive(serde::Serialize)] struct Person { id: u32, name: String }
    /// # let context = BuildContext::new();
    /// context.write_csv("./people.csv", &Vec::<Person>::new())?;
    /// # Ok::<(), csv_helper_rs::CsvHelperError>(())
    /// ```
    fn write_csv<T: Serialize>(&self, csv_file: impl Into<FilePath>, records: &[T]) -> Result<()> {
        self.write_csv_with_settings(csv_file, records, &CsvHelperSettings::default())
    }

    fn write_csv_with_settings<T: Serialize>(
        &self,
        csv_file: impl Into<FilePath>,
        records: &[T],
        settings: &CsvHelperSettings,
    ) -> Result<()> {
        CsvHelpers::from_context(self).write_records(&csv_file.into(), records, settings)
    }

    /// Writes the mapped fields of each record under their mapped column
    /// names.
    ///
    /// ```no_run
    /// # use csv_helper_rs::{aliases::CsvHelperAliases, core::context::BuildContext, settings::CsvHelperSettings};
    /// # use std::collections::HashMap;
    /// # #[derive(serde::Serialize)] struct Person { id: u32, name: String }
    /// # let context = BuildContext::new();
    /// let mapping = HashMap::from([("id", "EmployeeId"), ("name", "FirstName")]);
    /// context.write_csv_with_mapping(
    ///     "./people.csv",
    ///     &Vec::<Person>::new(),
    ///     mapping,
    ///     &CsvHelperSettings::new().has_header_record(true),
    /// )?;
    /// # Ok::<(), csv_helper_rs::CsvHelperError>(())
    /// ```
    fn write_csv_with_mapping<T, I, K, V>(
        &self,
        csv_file: impl Into<FilePath>,
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
        CsvHelpers::from_context(self).write_records_with_mapping(&csv_file.into(), records, mapping, settings)
    }

    fn write_csv_with_class_map<T: Serialize>(
        &self,
        csv_file: impl Into<FilePath>,
        records: &[T],
        class_map: &ClassMap,
        settings: &CsvHelperSettings,
    ) -> Result<()> {
        CsvHelpers::from_context(self).write_records_with_class_map(&csv_file.into(), records, class_map, settings)
    }
}

impl<C: Context + ?Sized> CsvHelperAliases for C {}
