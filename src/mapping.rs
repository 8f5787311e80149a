//! Associations between record fields and CSV columns.
//!
//! A [`ClassMap`] lists, for each field of a record, the column it is read
//! from and written to. It is either declared member by member or built
//! from a plain field → column dictionary with [`ClassMap::from_mapping`].
//!
//! ```
//! use csv_helper_rs::mapping::ClassMap;
//!
//! // Declared member by member
//! let mut person_map = ClassMap::new();
//! person_map.map("id").name("EmployeeId");
//! person_map.map("name").name("GivenName");
//! person_map.map("email").ignore(true);
//!
//! assert_eq!(person_map.column_for("id"), Some("EmployeeId"));
//! assert_eq!(person_map.field_for("GivenName"), Some("name"));
//! assert_eq!(person_map.column_for("email"), None);
//!
//! // Built from a dictionary
//! let mapping = ClassMap::from_mapping([("id", "EmployeeId"), ("name", "FirstName")]).unwrap();
//! assert_eq!(mapping.len(), 2);
//! ```
//!
//! When reading, columns named in the map are matched to their field;
//! columns outside the map are still matched to fields the map does not
//! mention, by name. When writing, only the members of the map are written.

use std::collections::HashSet;

use csv::StringRecord;

use crate::{
    error::{CsvHelperError, Result},
    record::FlatRecord,
    settings::CsvHelperSettings,
};

/// How a single field maps to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberMap {
    /// Field of the record, as named by serde.
    pub field: String,
    /// Column name in the CSV file. Defaults to the field name.
    pub name: String,
    /// Column position, used for files without header and to order
    /// written columns.
    pub index: Option<usize>,
    /// Neither read nor written.
    pub ignore: bool,
    /// Substituted on read when the column is missing or the cell is empty.
    pub default_value: Option<String>,
}

impl MemberMap {
    pub fn new<S: Into<String>>(field: S) -> Self {
        let field = field.into();
        Self {
            name: field.clone(),
            field,
            index: None,
            ignore: false,
            default_value: None,
        }
    }

    pub fn name<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn index(&mut self, index: usize) -> &mut Self {
        self.index = Some(index);
        self
    }

    pub fn ignore(&mut self, yes: bool) -> &mut Self {
        self.ignore = yes;
        self
    }

    pub fn default_value<S: Into<String>>(&mut self, value: S) -> &mut Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Ordered set of [`MemberMap`]s for one record type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassMap {
    members: Vec<MemberMap>,
}

impl ClassMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a class map from a field → column dictionary.
    ///
    /// Accepts anything yielding pairs: a `HashMap`, a `BTreeMap`, an array
    /// or a vector of tuples. Members are kept in iteration order.
    ///
    /// # Errors
    ///
    /// Returns [`CsvHelperError::InvalidMapping`] when a field or column
    /// name is empty, or when a field is mapped twice.
    pub fn from_mapping<I, K, V>(mapping: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut class_map = ClassMap::new();

        for (field, column) in mapping {
            let field = field.into();
            let column = column.into();

            if field.trim().is_empty() || column.trim().is_empty() {
                return Err(CsvHelperError::InvalidMapping(format!(
                    "empty name in mapping `{field}` -> `{column}`"
                )));
            }
            if class_map.member(&field).is_some() {
                return Err(CsvHelperError::InvalidMapping(format!(
                    "field `{field}` is mapped more than once"
                )));
            }

            class_map.map(field).name(column);
        }

        Ok(class_map)
    }

    /// Returns the member for `field`, adding it if needed.
    pub fn map<S: Into<String>>(&mut self, field: S) -> &mut MemberMap {
        let field = field.into();
        let position = match self.members.iter().position(|member| member.field == field) {
            Some(position) => position,
            None => {
                self.members.push(MemberMap::new(field));
                self.members.len() - 1
            }
        };
        &mut self.members[position]
    }

    pub fn member(&self, field: &str) -> Option<&MemberMap> {
        self.members.iter().find(|member| member.field == field)
    }

    pub fn members(&self) -> &[MemberMap] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Column a field is written to, `None` if unmapped or ignored.
    pub fn column_for(&self, field: &str) -> Option<&str> {
        self.member(field)
            .filter(|member| !member.ignore)
            .map(|member| member.name.as_str())
    }

    /// Field a column is read into, `None` if unmapped or ignored.
    pub fn field_for(&self, column: &str) -> Option<&str> {
        self.members
            .iter()
            .find(|member| !member.ignore && member.name == column)
            .map(|member| member.field.as_str())
    }

    /// Rejects maps that would make two fields share a column or position.
    pub fn validate(&self) -> Result<()> {
        let mut columns = HashSet::new();

        for member in self.members.iter().filter(|member| !member.ignore) {
            if member.name.is_empty() {
                return Err(CsvHelperError::InvalidMapping(format!(
                    "field `{}` has an empty column name",
                    member.field
                )));
            }
            if !columns.insert(member.name.as_str()) {
                return Err(CsvHelperError::InvalidMapping(format!(
                    "column `{}` is mapped more than once",
                    member.name
                )));
            }
        }

        self.positions(&[]).map(|_| ())
    }

    /// Column position of each active member, sorted by position.
    ///
    /// Explicit indexes are kept. The other members fill the lowest free
    /// positions, in the order their fields appear in `field_order`; members
    /// absent from it follow in declaration order.
    pub(crate) fn positions(&self, field_order: &[&str]) -> Result<Vec<(usize, &MemberMap)>> {
        let mut taken = HashSet::new();
        let mut placed = Vec::with_capacity(self.members.len());
        let mut unindexed = Vec::new();

        for (ordinal, member) in self.members.iter().enumerate() {
            if member.ignore {
                continue;
            }
            match member.index {
                Some(index) => {
                    if !taken.insert(index) {
                        return Err(CsvHelperError::InvalidMapping(format!(
                            "index {index} is mapped more than once"
                        )));
                    }
                    placed.push((index, member));
                }
                None => {
                    let rank = field_order
                        .iter()
                        .position(|field| *field == member.field)
                        .unwrap_or(field_order.len() + ordinal);
                    unindexed.push((rank, member));
                }
            }
        }

        unindexed.sort_by_key(|(rank, _)| *rank);
        let mut next = 0;
        for (_, member) in unindexed {
            while taken.contains(&next) {
                next += 1;
            }
            taken.insert(next);
            placed.push((next, member));
        }

        placed.sort_by_key(|(position, _)| *position);
        Ok(placed)
    }
}

/// Normalizes a header or field name according to the header matching
/// settings.
fn normalize(name: &str, settings: &CsvHelperSettings) -> String {
    let name = if settings.trim_headers {
        name.trim()
    } else {
        name
    };

    let mut normalized = name.to_string();
    if settings.ignore_header_white_space {
        normalized.retain(|c| !c.is_whitespace());
    }
    if !settings.is_header_case_sensitive {
        normalized = normalized.to_lowercase();
    }
    normalized
}

/// How raw rows are turned into rows the csv deserializer understands.
#[derive(Debug)]
pub(crate) struct ReadLayout {
    /// Field names per column, `None` to deserialize by position.
    headers: Option<StringRecord>,
    /// Number of columns taken from the file; the rest are appended defaults.
    width: usize,
    /// Defaults for empty cells, by column.
    defaults: Vec<(usize, String)>,
    /// Values of columns absent from the file.
    appended: Vec<String>,
}

impl ReadLayout {
    /// Layout for a file whose first row is `raw_headers`.
    ///
    /// `fields` are the field names of the target record, used to match
    /// headers that differ in case or white space.
    pub(crate) fn from_headers(
        raw_headers: &StringRecord,
        fields: &[&str],
        class_map: Option<&ClassMap>,
        settings: &CsvHelperSettings,
    ) -> Result<Self> {
        let by_name: Vec<(String, &str)> = fields
            .iter()
            .filter(|field| class_map.is_none_or(|map| map.member(field).is_none()))
            .map(|field| (normalize(field, settings), *field))
            .collect();

        let mut headers = Vec::with_capacity(raw_headers.len());
        for column in raw_headers {
            let key = normalize(column, settings);
            let member = class_map.and_then(|map| {
                map.members()
                    .iter()
                    .find(|member| normalize(&member.name, settings) == key)
            });
            let field = by_name
                .iter()
                .find(|(normalized, _)| *normalized == key)
                .map(|(_, field)| *field);

            let header = match (member, field, class_map) {
                (Some(member), _, _) if member.ignore => String::new(),
                (Some(member), _, _) => member.field.clone(),
                (None, Some(field), _) => field.to_string(),
                // Unknown columns are dropped when a map decides the layout,
                // so they cannot collide with a renamed field.
                (None, None, Some(_)) => String::new(),
                (None, None, None) => column.to_string(),
            };
            headers.push(header);
        }

        let width = headers.len();
        let mut defaults = Vec::new();
        let mut appended = Vec::new();

        if let Some(map) = class_map {
            for member in map.members().iter().filter(|member| !member.ignore) {
                match headers.iter().position(|header| *header == member.field) {
                    Some(position) => {
                        if let Some(value) = &member.default_value {
                            defaults.push((position, value.clone()));
                        }
                    }
                    None => match &member.default_value {
                        Some(value) => {
                            headers.push(member.field.clone());
                            appended.push(value.clone());
                        }
                        None if settings.will_throw_on_missing_field => {
                            return Err(CsvHelperError::MissingField {
                                field: member.field.clone(),
                                column: member.name.clone(),
                            });
                        }
                        None => {}
                    },
                }
            }
        }

        Ok(Self {
            headers: Some(StringRecord::from(headers)),
            width,
            defaults,
            appended,
        })
    }

    /// Layout for a file without header row.
    ///
    /// With a class map, field names are placed at each member's position,
    /// unindexed members following `fields`. Without one, rows are
    /// deserialized by position.
    pub(crate) fn positional(class_map: Option<&ClassMap>, fields: &[&str]) -> Result<Self> {
        let Some(map) = class_map else {
            return Ok(Self {
                headers: None,
                width: 0,
                defaults: Vec::new(),
                appended: Vec::new(),
            });
        };

        let positions = map.positions(fields)?;
        let width = positions.last().map_or(0, |(position, _)| position + 1);
        let mut headers = vec![String::new(); width];
        let mut defaults = Vec::new();

        for (position, member) in positions {
            headers[position] = member.field.clone();
            if let Some(value) = &member.default_value {
                defaults.push((position, value.clone()));
            }
        }

        Ok(Self {
            headers: Some(StringRecord::from(headers)),
            width,
            defaults,
            appended: Vec::new(),
        })
    }

    pub(crate) fn headers(&self) -> Option<&StringRecord> {
        self.headers.as_ref()
    }

    /// Reshapes a data row to match [`headers`](Self::headers): pads or
    /// truncates it to the file width, fills defaults and appends the values
    /// of missing columns.
    pub(crate) fn apply(&self, record: &StringRecord) -> StringRecord {
        if self.headers.is_none() {
            return record.clone();
        }

        let mut row = StringRecord::with_capacity(record.as_slice().len(), self.width + self.appended.len());
        for position in 0..self.width {
            let value = record.get(position).unwrap_or("");
            let default = self
                .defaults
                .iter()
                .find(|(index, _)| *index == position)
                .map(|(_, value)| value.as_str());

            match default {
                Some(default) if value.is_empty() => row.push_field(default),
                _ => row.push_field(value),
            }
        }
        for value in &self.appended {
            row.push_field(value);
        }
        row
    }
}

/// Which fields are written, under which column, in which order.
///
/// `None` columns are gaps left by explicit indexes and are written empty.
#[derive(Debug)]
pub(crate) struct WriteLayout {
    columns: Vec<Option<(String, String)>>,
}

impl WriteLayout {
    /// Every field under its own name, in declaration order.
    pub(crate) fn from_record(record: &FlatRecord) -> Self {
        Self {
            columns: record
                .iter()
                .map(|(field, _)| Some((field.clone(), field.clone())))
                .collect(),
        }
    }

    /// Members of `class_map` at the same positions a header-less read
    /// expects: explicit indexes first, the others in the field order of
    /// `first` (or in map order when there are no records).
    pub(crate) fn from_class_map(class_map: &ClassMap, first: Option<&FlatRecord>) -> Result<Self> {
        let field_order: Vec<&str> = first
            .map(|record| record.iter().map(|(field, _)| field.as_str()).collect())
            .unwrap_or_default();

        if first.is_some() {
            let unknown = class_map
                .members()
                .iter()
                .filter(|member| !member.ignore)
                .find(|member| !field_order.contains(&member.field.as_str()));
            if let Some(member) = unknown {
                return Err(CsvHelperError::InvalidMapping(format!(
                    "field `{}` is not a member of the record",
                    member.field
                )));
            }
        }

        let positions = class_map.positions(&field_order)?;
        let width = positions.last().map_or(0, |(position, _)| position + 1);
        let mut columns = vec![None; width];
        for (position, member) in positions {
            columns[position] = Some((member.field.clone(), member.name.clone()));
        }

        Ok(Self { columns })
    }

    pub(crate) fn header(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|column| column.as_ref().map_or("", |(_, name)| name.as_str()))
            .collect()
    }

    /// Values of `record` in column order. Fields the record lacks are
    /// written empty.
    pub(crate) fn row<'a>(&self, record: &'a FlatRecord) -> Vec<&'a str> {
        self.columns
            .iter()
            .enumerate()
            .map(|(position, column)| {
                let value = column.as_ref().and_then(|(field, _)| match record.get(position) {
                    Some((name, value)) if name == field => Some(value.as_str()),
                    _ => record
                        .iter()
                        .find(|(name, _)| name == field)
                        .map(|(_, value)| value.as_str()),
                });
                value.unwrap_or("")
            })
            .collect()
    }
}
