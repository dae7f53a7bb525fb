/// 8-bit XOR over a sentence payload (the characters strictly between `$`
/// and `*`).
pub fn checksum(payload: &str) -> u8 {
    payload.bytes().fold(0, |crc, b| crc ^ b)
}

/// Format a payload as a complete sentence with its `*HH` trailer and CRLF.
pub fn sentence(payload: &str) -> String {
    format!("${}*{:02X}\r\n", payload, checksum(payload))
}

/// Rewrite (or add) the checksum trailer on an existing line. Lines that do
/// not start with `$` are not checksummable and come back untouched.
/// Re-sealing an already sealed sentence reproduces the same digits.
pub fn seal(line: &str) -> String {
    let Some(body) = line.strip_prefix('$') else {
        return line.to_string();
    };
    let end = body.find(['*', '\r', '\n']).unwrap_or(body.len());
    sentence(&body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_character_payload() {
        assert_eq!(checksum("A"), 0x41);
        assert_eq!(sentence("A"), "$A*41\r\n");
    }

    #[test]
    fn seal_adds_missing_trailer() {
        let sealed = seal("$GPGGA,120000.000,0000.0000,N,00000.0000,E,1,05,02.4,0.0,M,45.0,M,,");
        assert!(sealed.ends_with("\r\n"));
        let (payload, trailer) = sealed[1..].split_once('*').unwrap();
        assert_eq!(trailer.trim_end(), format!("{:02X}", checksum(payload)));
    }

    #[test]
    fn seal_is_idempotent() {
        let once = seal("$GPVTG,90.00,T,,,19.44,N,36.00,K,A");
        let twice = seal(once.trim_end());
        assert_eq!(once, twice);
    }

    #[test]
    fn seal_replaces_stale_checksum() {
        assert_eq!(seal("$A*00"), "$A*41\r\n");
    }

    #[test]
    fn non_sentences_pass_through() {
        assert_eq!(seal("GPGGA,no,dollar"), "GPGGA,no,dollar");
        assert_eq!(seal(""), "");
    }
}
