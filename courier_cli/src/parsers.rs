use courier_dispatch::clock::parse_clock;
use jiff::civil::Time;

pub fn parse_time(input: &str) -> Result<Time, String> {
    parse_clock(input).map_err(|error| format!("Invalid time '{input}': {error}"))
}

pub fn parse_package_id(input: &str) -> Result<u32, String> {
    input
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid package id '{input}'"))
}
