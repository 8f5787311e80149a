use std::env::temp_dir;

use serde::{Deserialize, Serialize};

use csv_helper_rs::{
    aliases::CsvHelperAliases,
    core::{context::BuildContext, environment::SystemEnvironment, file_system::PhysicalFileSystem},
    error::CsvHelperError,
    settings::CsvHelperSettings,
};

#[derive(Deserialize, Serialize, Debug, Clone)]
struct Person {
    id: u32,
    first_name: String,
    last_name: String,
    email: Option<String>,
}

fn main() -> Result<(), CsvHelperError> {
    env_logger::init();

    let context = BuildContext::with(
        PhysicalFileSystem,
        SystemEnvironment::with_working_directory(temp_dir()),
    );

    let people = vec![
        Person {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: Some("ada@example.com".to_string()),
        },
        Person {
            id: 2,
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            email: None,
        },
    ];

    context.write_csv("./people.csv", &people)?;

    let settings = CsvHelperSettings::new()
        .is_header_case_sensitive(false)
        .trim_fields(true);
    let read: Vec<Person> = context.read_csv_with_settings("./people.csv", &settings)?;

    for person in &read {
        println!("{person:?}");
    }

    Ok(())
}
