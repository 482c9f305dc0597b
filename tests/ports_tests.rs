use portscan_rs::ports::{parse_port_range, validate_bounds};

#[test]
fn parse_range_argument() {
    assert_eq!(parse_port_range("20-80").expect("parse ok"), (20, 80));
    assert_eq!(parse_port_range("1-65535").expect("parse ok"), (1, 65535));
}

#[test]
fn malformed_range_arguments_rejected() {
    // Rejected during argument handling, before any socket is opened.
    assert!(parse_port_range("80").is_err());
    assert!(parse_port_range("20-").is_err());
    assert!(parse_port_range("-80").is_err());
    assert!(parse_port_range("eighty-ninety").is_err());
}

#[test]
fn out_of_domain_ports_rejected() {
    assert!(parse_port_range("0-80").is_err());
    assert!(parse_port_range("1-65536").is_err());
}

#[test]
fn inverted_bounds_rejected() {
    assert!(parse_port_range("443-80").is_err());
    assert!(validate_bounds(443, 80).is_err());
    assert!(validate_bounds(80, 443).is_ok());
}
