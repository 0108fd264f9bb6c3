use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacError {
    InvalidLength,
    InvalidSeparator,
    InvalidOctet,
}

impl fmt::Display for MacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MacError::InvalidLength => f.write_str("expected six colon-separated octets"),
            MacError::InvalidSeparator => f.write_str("octets must be separated by ':'"),
            MacError::InvalidOctet => f.write_str("octets must be two hex digits"),
        }
    }
}

impl std::error::Error for MacError {}

/// Colon-separated MAC address, e.g. `04:ce:14:fe:a5:2f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr([u8; 6]);

impl MacAddr {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddr {
    type Err = MacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // "xx:" * 5 + "xx"
        if s.len() != 17 {
            return Err(MacError::InvalidLength);
        }

        let bytes = s.as_bytes();
        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            let start = i * 3;
            if i < 5 && bytes[start + 2] != b':' {
                return Err(MacError::InvalidSeparator);
            }
            let digits = &bytes[start..start + 2];
            if !digits.iter().all(u8::is_ascii_hexdigit) {
                return Err(MacError::InvalidOctet);
            }
            // ASCII only past this point, byte offsets are char boundaries
            *octet = u8::from_str_radix(&s[start..start + 2], 16)
                .map_err(|_| MacError::InvalidOctet)?;
        }

        Ok(MacAddr(octets))
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

/// Whether the input is a valid colon-separated MAC address.
pub fn validate_mac_addr(mac: &str) -> bool {
    mac.parse::<MacAddr>().is_ok()
}
