use anyhow::{bail, Context, Result};

/// Parse a `start-end` range argument (e.g. `20-80`) into inclusive bounds.
///
/// Both sides must be integers in 1..=65535 separated by a literal hyphen,
/// and `start` must not exceed `end`.
pub fn parse_port_range(s: &str) -> Result<(u16, u16)> {
    let Some((a, b)) = s.split_once('-') else {
        bail!("invalid port range {s:?}: expected <start>-<end>");
    };
    let start = parse_port_str(a.trim()).with_context(|| format!("invalid start in range: {a}"))?;
    let end = parse_port_str(b.trim()).with_context(|| format!("invalid end in range: {b}"))?;
    validate_bounds(start, end)?;
    Ok((start, end))
}

/// Reject inverted bounds before any socket is opened.
pub fn validate_bounds(start: u16, end: u16) -> Result<()> {
    if start == 0 {
        bail!("port out of range: 0");
    }
    if start > end {
        bail!("invalid range {start}-{end} (start > end)");
    }
    Ok(())
}

fn parse_port_str(s: &str) -> Result<u16> {
    let val: u32 = s.parse::<u32>().map_err(|e| anyhow::anyhow!(e))?;
    if val == 0 || val > 65535 {
        bail!("port out of range: {val}");
    }
    Ok(val as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_range() {
        assert_eq!(parse_port_range("20-80").unwrap(), (20, 80));
    }

    #[test]
    fn parse_range_with_spaces() {
        assert_eq!(parse_port_range("8000 - 8010").unwrap(), (8000, 8010));
    }

    #[test]
    fn parse_single_port_span() {
        assert_eq!(parse_port_range("443-443").unwrap(), (443, 443));
    }

    #[test]
    fn missing_hyphen_rejected() {
        assert!(parse_port_range("80").is_err());
    }

    #[test]
    fn inverted_range_rejected() {
        assert!(parse_port_range("80-20").is_err());
    }

    #[test]
    fn out_of_range_values_rejected() {
        assert!(parse_port_range("0-80").is_err());
        assert!(parse_port_range("1-70000").is_err());
        assert!(parse_port_range("abc-80").is_err());
    }

    #[test]
    fn validate_bounds_checks_order() {
        assert!(validate_bounds(1, 65535).is_ok());
        assert!(validate_bounds(443, 443).is_ok());
        assert!(validate_bounds(2, 1).is_err());
        assert!(validate_bounds(0, 10).is_err());
    }
}
