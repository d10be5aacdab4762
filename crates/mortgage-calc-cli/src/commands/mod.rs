pub mod closing_costs;
pub mod mortgage;

use clap::{Args, ValueEnum};
use std::path::Path;

use mortgage_calc_core::closing_costs::jurisdiction::{City, JurisdictionTables, Province};
use mortgage_calc_core::mortgage::payment::PaymentFrequency;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    BiWeekly,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::BiWeekly => PaymentFrequency::BiWeekly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProvinceArg {
    Ontario,
    Bc,
}

impl From<ProvinceArg> for Province {
    fn from(arg: ProvinceArg) -> Self {
        match arg {
            ProvinceArg::Ontario => Province::Ontario,
            ProvinceArg::Bc => Province::Bc,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CityArg {
    Toronto,
    Vancouver,
}

impl From<CityArg> for City {
    fn from(arg: CityArg) -> Self {
        match arg {
            CityArg::Toronto => City::Toronto,
            CityArg::Vancouver => City::Vancouver,
        }
    }
}

/// Where the property is and who is buying it
#[derive(Args)]
pub struct JurisdictionFlags {
    /// City of the property
    #[arg(long, value_enum)]
    pub city: Option<CityArg>,

    /// Province of the property (defaults to the city's province)
    #[arg(long, value_enum)]
    pub province: Option<ProvinceArg>,

    /// Buyer qualifies for first-time buyer rebates
    #[arg(long)]
    pub first_time_buyer: bool,

    /// Path to a JSON file of jurisdiction tables replacing the built-in ones
    #[arg(long)]
    pub tables: Option<String>,
}

impl JurisdictionFlags {
    pub fn resolve(&self) -> Result<(Province, City), Box<dyn std::error::Error>> {
        let city: City = self
            .city
            .ok_or("--city is required (or provide --input)")?
            .into();
        let province = self.province.map(Province::from).unwrap_or(city.province());
        Ok((province, city))
    }
}

/// Built-in tables, or the validated replacement at `path`.
pub fn load_tables(path: Option<&str>) -> Result<JurisdictionTables, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let tables: JurisdictionTables = input::read_file(Path::new(path))?;
            tables.validate()?;
            Ok(tables)
        }
        None => Ok(JurisdictionTables::default()),
    }
}
