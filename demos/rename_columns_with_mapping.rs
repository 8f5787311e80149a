use std::{collections::HashMap, env::temp_dir, fs};

use serde::{Deserialize, Serialize};

use csv_helper_rs::{
    aliases::CsvHelperAliases,
    core::context::BuildContext,
    error::CsvHelperError,
    settings::{CsvHelperSettings, Culture},
};

#[derive(Deserialize, Serialize, Debug, Clone)]
struct Car {
    year: u16,
    make: String,
    model: String,
}

fn main() -> Result<(), CsvHelperError> {
    env_logger::init();

    let context = BuildContext::new();
    let path = temp_dir().join("cars.csv");
    let path = path.to_string_lossy().into_owned();

    let cars = vec![
        Car {
            year: 1948,
            make: "Porsche".to_string(),
            model: "356".to_string(),
        },
        Car {
            year: 1967,
            make: "Ford".to_string(),
            model: "Mustang fastback 1967".to_string(),
        },
    ];

    let mapping = HashMap::from([
        ("year", "Baujahr"),
        ("make", "Marke"),
        ("model", "Modell"),
    ]);
    let settings = CsvHelperSettings::new().culture(Culture::DeDe);

    context.write_csv_with_mapping(path.as_str(), &cars, mapping.clone(), &settings)?;
    println!("{}", fs::read_to_string(&path)?);

    let read: Vec<Car> = context.read_csv_with_mapping(path.as_str(), mapping, &settings)?;
    println!("{read:?}");

    Ok(())
}
