#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # CSV helpers for build scripts

 Read and write CSV files from build scripts with one call. The crate is a
 thin layer over the [`csv`](https://docs.rs/csv) crate: it resolves paths
 against the script's working directory, validates its arguments, applies a
 [`CsvHelperSettings`](settings::CsvHelperSettings) and optionally renames
 columns through a [`ClassMap`](mapping::ClassMap). Parsing, quoting and
 escaping are left to `csv`; records go through `serde`.

 ## Core Concepts

- **Context:** What a build script sees of its host: a [`FileSystem`](core::file_system::FileSystem)
  and an [`Environment`](core::environment::Environment) that knows the working directory.
- **Aliases:** The script verbs `read_csv` and `write_csv` (and their overloads), available on
  every `Context` through [`CsvHelperAliases`](aliases::CsvHelperAliases).
- **CsvHelpers:** The facade the aliases forward to. It can be used directly with any file
  system and environment.
- **Settings:** Delimiter, culture, quoting, encoding and header behavior, passed to the csv
  reader and writer.
- **Class map:** Field to column associations, declared member by member or built from a
  simple dictionary.

 ## Getting Started

```rust
# use serde::{Deserialize, Serialize};
# use csv_helper_rs::{
#     aliases::CsvHelperAliases,
#     core::{context::BuildContext, environment::SystemEnvironment, file_system::PhysicalFileSystem},
#     error::CsvHelperError,
#     mapping::ClassMap,
#     settings::{CsvHelperSettings, Culture},
# };
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
struct Car {
    year: u16,
    make: String,
    model: String,
    description: String,
}

fn main() -> Result<(), CsvHelperError> {
#   let dir = tempfile::tempdir()?;
#   let context = BuildContext::with(PhysicalFileSystem, SystemEnvironment::with_working_directory(dir.path()));
    let cars = vec![
        Car { year: 1948, make: "Porsche".into(), model: "356".into(), description: "Luxury sports car".into() },
        Car { year: 1995, make: "Peugeot".into(), model: "205".into(), description: "City car".into() },
    ];

    // Default settings: comma separated, with a header row
    context.write_csv("./cars.csv", &cars)?;
    let read: Vec<Car> = context.read_csv("./cars.csv")?;
    assert_eq!(read, cars);

    // German spreadsheet export: semicolons and renamed columns
    let settings = CsvHelperSettings::new().culture(Culture::DeDe);
    let mut class_map = ClassMap::new();
    class_map.map("year").name("Baujahr");
    class_map.map("make").name("Marke");
    class_map.map("model").name("Modell");
    class_map.map("description").name("Beschreibung");

    context.write_csv_with_class_map("./autos.csv", &cars, &class_map, &settings)?;
    let content = std::fs::read_to_string(dir.path().join("autos.csv"))?;
    assert!(content.starts_with("Baujahr;Marke;Modell;Beschreibung\n"));

    let read: Vec<Car> = context.read_csv_with_class_map("./autos.csv", &class_map, &settings)?;
    assert_eq!(read, cars);

    Ok(())
}
```

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// File system, environment and context abstractions
pub mod core;

/// Error types for CSV operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Settings passed to the csv reader and writer
pub mod settings;

/// Field to column mappings
pub mod mapping;

/// Read/write facade
pub mod helpers;

/// Script verbs available on a build context
pub mod aliases;

mod record;
