//! `addrgen countries` - print the country directory.

use std::fmt::Write as _;

use addrgen_core::{Country, CountryDirectoryPort};
use addrgen_runtime::JsonCountryDirectory;

use crate::commands::LocationArgs;
use crate::error::CliError;

pub async fn execute(location: &LocationArgs) -> Result<(), CliError> {
    let path = location.countries_file();
    let directory = JsonCountryDirectory::new(&path);
    let countries = directory.list().await?;

    if countries.is_empty() {
        println!("No countries found in {}", path.display());
        return Ok(());
    }

    print!("{}", format_countries(&countries));
    Ok(())
}

fn format_countries(countries: &[Country]) -> String {
    let mut out = String::new();
    for country in countries {
        let _ = writeln!(out, "{}  {}", country.code, country.name);
    }
    let _ = writeln!(out, "\n{} countries", countries.len());
    out
}
