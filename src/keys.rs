//! Access key shape check and the built-in key table.

use crate::errors::AccessError;

const KEY_LETTERS: usize = 2;
const KEY_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyConfig {
    pub domain: &'static str,
    pub count: usize,
    pub description: &'static str,
}

pub const ACCESS_KEYS: [(&str, KeyConfig); 5] = [
    (
        "DS2006",
        KeyConfig {
            domain: "DS",
            count: 6,
            description: "Data Science Profiles",
        },
    ),
    (
        "WD1010",
        KeyConfig {
            domain: "WD",
            count: 10,
            description: "Web Development Profiles",
        },
    ),
    (
        "ML0504",
        KeyConfig {
            domain: "ML",
            count: 4,
            description: "Machine Learning Profiles",
        },
    ),
    (
        "UI0805",
        KeyConfig {
            domain: "UI",
            count: 5,
            description: "UI/UX Design Profiles",
        },
    ),
    (
        "BE0708",
        KeyConfig {
            domain: "BE",
            count: 8,
            description: "Backend Engineering Profiles",
        },
    ),
];

pub fn normalize_key(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Two ASCII capitals then four ASCII digits, nothing else.
fn matches_key_shape(key: &str) -> bool {
    let bytes = key.as_bytes();
    bytes.len() == KEY_LETTERS + KEY_DIGITS
        && bytes[..KEY_LETTERS].iter().all(u8::is_ascii_uppercase)
        && bytes[KEY_LETTERS..].iter().all(u8::is_ascii_digit)
}

pub fn is_valid_key(raw: &str) -> bool {
    matches_key_shape(normalize_key(raw).as_str())
}

/// Returns the normalized key for a well-formed input.
pub fn validate_key(raw: &str) -> Result<String, AccessError> {
    let key = normalize_key(raw);
    if matches_key_shape(key.as_str()) {
        Ok(key)
    } else {
        Err(AccessError::Malformed)
    }
}

/// Exact match on the normalized key.
pub fn lookup_key(key: &str) -> Option<&'static KeyConfig> {
    ACCESS_KEYS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, config)| config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_two_letters_and_four_digits_in_any_case() {
        assert_eq!(validate_key("DS2006"), Ok("DS2006".to_string()));
        assert_eq!(validate_key("  ds2006\n"), Ok("DS2006".to_string()));
        assert!(is_valid_key("zz0000"));
    }

    #[test]
    fn rejects_other_shapes() {
        let shapes = [
            "", "D2006", "DS206", "DS20066", "DSX006", "12DS06", "DS 2006", "DS２００６",
        ];
        for raw in shapes {
            assert_eq!(validate_key(raw), Err(AccessError::Malformed), "{raw:?}");
        }
    }

    #[test]
    fn lookup_is_exact() {
        assert_eq!(lookup_key("DS2006").map(|c| c.count), Some(6));
        assert_eq!(lookup_key("ds2006"), None);
        assert_eq!(lookup_key("DS2007"), None);
    }
}
