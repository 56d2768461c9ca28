//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};
use std::str::FromStr;

use log::info;

/// Read an SVG from a file, or from stdin when `path` is `-`.
pub fn read_input(path: &str) -> io::Result<String> {
    if path == "-" {
        info!("Reading SVG from stdin...");
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        info!("Loading: {}", path);
        fs::read_to_string(path)
    }
}

/// Take the value following flag `args[*i]`, advancing `i`.
pub fn flag_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, String> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value for {}", flag))
}

/// Take and parse the value following a flag.
pub fn parse_flag<T: FromStr>(args: &[String], i: &mut usize) -> Result<T, String> {
    let flag = args[*i].clone();
    let value = flag_value(args, i)?;
    value
        .parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, value))
}
