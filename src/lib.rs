use std::io;

//gen
pub mod chart_data;
pub mod chart_raster;
pub mod chart_svg;
pub mod common;
//spec
pub mod chart_specs;
pub mod mock;
pub mod owid_fetch;
pub mod owid_structs;
pub mod site_build;

use common::Stowage;
use mock::write_mock_dataset;
use owid_fetch::load_dataset;
use site_build::{build_site, write_row_csvs};

pub const USAGE: &str = "usage: vaxeff <build|fetch|to-csv|mock> <root> [seed]";

pub fn runner(comm: &str, root_str: &str, seed: Option<u64>) -> io::Result<()> {
    let stowage = Stowage::new(root_str);
    if comm == "build" {
        let owid = load_dataset(&stowage, false)?;
        build_site(&stowage, &owid)?;
    } else if comm == "fetch" {
        load_dataset(&stowage, true)?;
    } else if comm == "to-csv" {
        let owid = load_dataset(&stowage, false)?;
        write_row_csvs(&stowage, &owid)?;
    } else if comm == "mock" {
        write_mock_dataset(&stowage, seed.unwrap_or(42))?;
    } else {
        println!("{}", USAGE);
    }
    Ok(())
}
