use crate::foundation::error::{SlatecastError, SlatecastResult};

/// Parse a `#RRGGBB` (or `RRGGBB`) hex color into RGB components.
pub fn parse_hex_rgb(s: &str) -> SlatecastResult<[u8; 3]> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SlatecastError::validation(format!(
            "invalid hex color '{s}': expected #RRGGBB"
        )));
    }

    let channel = |i: usize| -> SlatecastResult<u8> {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|e| SlatecastError::validation(format!("invalid hex color '{s}': {e}")))
    };

    Ok([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_accepts_leading_hash_and_bare() {
        assert_eq!(parse_hex_rgb("#FFFFFF").unwrap(), [255, 255, 255]);
        assert_eq!(parse_hex_rgb("78185A").unwrap(), [0x78, 0x18, 0x5A]);
        assert_eq!(parse_hex_rgb(" #000000 ").unwrap(), [0, 0, 0]);
    }

    #[test]
    fn parse_hex_rejects_malformed_input() {
        assert!(parse_hex_rgb("#FFF").is_err());
        assert!(parse_hex_rgb("#GGGGGG").is_err());
        assert!(parse_hex_rgb("").is_err());
        assert!(parse_hex_rgb("#12345678").is_err());
    }
}
