#![allow(dead_code)]

pub mod fakes;
pub mod mocks;

use serde::{Deserialize, Serialize};

use csv_helper_rs::{
    Result,
    core::{environment::SystemEnvironment, path::FilePath},
    helpers::CsvHelpers,
    mapping::ClassMap,
    settings::CsvHelperSettings,
};

pub use fakes::FakeFileSystem;

pub const PEOPLE_CSV: &str = "id,name\n1,Alice\n2,Bob\n3,Charlie\n";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Person {
    pub id: u32,
    pub name: String,
}

impl Person {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

pub fn people() -> Vec<Person> {
    vec![
        Person::new(1, "Alice"),
        Person::new(2, "Bob"),
        Person::new(3, "Charlie"),
    ]
}

/// Maps `Person` onto an HR export.
pub fn person_map() -> ClassMap {
    let mut map = ClassMap::new();
    map.map("id").name("EmployeeId");
    map.map("name").name("GivenName");
    map
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A fake file system rooted at `/Working`, optionally holding `people.csv`.
pub struct CsvHelpersFixture {
    pub file_system: FakeFileSystem,
    pub environment: SystemEnvironment,
    pub csv_file_path: FilePath,
    pub settings: CsvHelperSettings,
}

impl CsvHelpersFixture {
    pub fn new(csv_file_exists: bool) -> Self {
        init_logger();

        let file_system = FakeFileSystem::new();
        let csv_file_path = if csv_file_exists {
            file_system.create_file("/Working/people.csv", PEOPLE_CSV);
            FilePath::from("/Working/people.csv")
        } else {
            FilePath::from("")
        };

        Self {
            file_system,
            environment: SystemEnvironment::with_working_directory("/Working"),
            csv_file_path,
            settings: CsvHelperSettings::default(),
        }
    }

    pub fn helpers(&self) -> CsvHelpers<'_> {
        CsvHelpers::new(&self.file_system, &self.environment)
    }

    pub fn read(&self) -> Result<Vec<Person>> {
        self.helpers().read_records(&self.csv_file_path, &self.settings)
    }

    pub fn write(&self, records: &[Person]) -> Result<()> {
        self.helpers()
            .write_records(&self.csv_file_path, records, &self.settings)
    }
}
