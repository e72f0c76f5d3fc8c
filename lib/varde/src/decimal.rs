use anyhow::{bail, Result};

/// Parses a fixed-point decimal token of the shape `-?[0-9]{1,2}\.[0-9]` into
/// signed tenths: `"41.1"` -> 411, `"-3.5"` -> -35. Any other shape is a fatal
/// input-format error. Pure byte arithmetic; never goes through floating point.
pub fn parse_tenths(token: &[u8]) -> Result<i32> {
    let (neg, digits) = match token.split_first() {
        Some((b'-', rest)) => (true, rest),
        _ => (false, token),
    };
    let magnitude = match *digits {
        [d1 @ b'0'..=b'9', b'.', d0 @ b'0'..=b'9'] => {
            i32::from(d1 - b'0') * 10 + i32::from(d0 - b'0')
        }
        [d2 @ b'0'..=b'9', d1 @ b'0'..=b'9', b'.', d0 @ b'0'..=b'9'] => {
            i32::from(d2 - b'0') * 100 + i32::from(d1 - b'0') * 10 + i32::from(d0 - b'0')
        }
        _ => bail!(
            "malformed decimal token {:?} (expected -?[0-9]{{1,2}}.[0-9])",
            String::from_utf8_lossy(token)
        ),
    };
    Ok(if neg { -magnitude } else { magnitude })
}

/// Renders tenths with exactly one fractional digit: 411 -> "41.1", -1 -> "-0.1".
pub fn format_tenths(tenths: i64) -> String {
    let sign = if tenths < 0 { "-" } else { "" };
    let mag = tenths.unsigned_abs();
    format!("{}{}.{}", sign, mag / 10, mag % 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_reference_tokens() {
        assert_eq!(parse_tenths(b"41.1").unwrap(), 411);
        assert_eq!(parse_tenths(b"-3.5").unwrap(), -35);
        assert_eq!(parse_tenths(b"0.0").unwrap(), 0);
        assert_eq!(parse_tenths(b"-0.1").unwrap(), -1);
        assert_eq!(parse_tenths(b"99.9").unwrap(), 999);
        assert_eq!(parse_tenths(b"-99.9").unwrap(), -999);
    }

    #[test]
    fn rejects_malformed_tokens() {
        for bad in [
            &b""[..],
            b"-",
            b"5",
            b"5.",
            b".5",
            b"5.55",
            b"123.4",
            b"1,4",
            b"--1.0",
            b"1.x",
            b"x.1",
            b" 1.0",
            b"1.0 ",
        ] {
            assert!(parse_tenths(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn render_round_trips_every_valid_token() {
        // All representable values with one or two integer digits.
        for tenths in -999i64..=999 {
            let rendered = format_tenths(tenths);
            assert_eq!(
                parse_tenths(rendered.as_bytes()).unwrap() as i64,
                tenths,
                "token {rendered}"
            );
        }
    }

    #[test]
    fn renders_sign_and_fraction() {
        assert_eq!(format_tenths(0), "0.0");
        assert_eq!(format_tenths(-1), "-0.1");
        assert_eq!(format_tenths(171), "17.1");
        assert_eq!(format_tenths(-10), "-1.0");
    }
}
