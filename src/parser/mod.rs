//! Free-text address parsing boundary.
//!
//! The resolution engine trusts parser output verbatim and never re-validates
//! street or house-number syntax. [`RegexAddressParser`] is the bundled
//! implementation; callers with their own tokenizer implement
//! [`AddressParser`] instead.

use regex::Regex;

/// Tokens extracted from one free-form address string. Anything the parser
/// could not find stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    pub house_number: Option<String>,
    pub street: Option<String>,
    pub borough_code: Option<u8>,
    pub zip: Option<String>,
}

impl ParsedAddress {
    /// Resolution needs at least a house number and a street to act on.
    pub fn is_actionable(&self) -> bool {
        self.house_number.is_some() && self.street.is_some()
    }
}

pub trait AddressParser: Send + Sync {
    fn parse(&self, text: &str) -> ParsedAddress;
}

/// Map a spelled-out borough (or common abbreviation) to its code.
pub fn borough_code_from_name(name: &str) -> Option<u8> {
    match name.trim().to_ascii_lowercase().as_str() {
        "manhattan" | "mn" | "new york" => Some(1),
        "bronx" | "the bronx" | "bx" => Some(2),
        "brooklyn" | "bk" | "bklyn" | "kings" => Some(3),
        "queens" | "qn" | "qns" => Some(4),
        "staten island" | "si" | "richmond" => Some(5),
        _ => None,
    }
}

/// Regex-based tokenizer covering the common "house street[, borough][, zip]"
/// shapes, including hyphenated Queens house numbers ("30-15 38th Ave").
pub struct RegexAddressParser {
    house: Regex,
    zip: Regex,
}

impl RegexAddressParser {
    pub fn new() -> Self {
        Self {
            house: Regex::new(r"^(\d+[A-Za-z]?(?:-\d+[A-Za-z]?)?)\s+(.+)$")
                .expect("house number pattern"),
            zip: Regex::new(r"[,\s]+(\d{5})(?:-\d{4})?$").expect("zip pattern"),
        }
    }
}

impl Default for RegexAddressParser {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressParser for RegexAddressParser {
    fn parse(&self, text: &str) -> ParsedAddress {
        let mut remainder = text.trim().to_string();

        let mut zip = None;
        if let Some(captures) = self.zip.captures(&remainder) {
            zip = Some(captures[1].to_string());
            let cut = captures.get(0).map_or(remainder.len(), |m| m.start());
            remainder.truncate(cut);
        }

        let mut borough_code = None;
        let borough_cut = remainder.rsplit_once(',').and_then(|(head, tail)| {
            borough_code_from_name(tail).map(|code| (head.len(), code))
        });
        if let Some((cut, code)) = borough_cut {
            borough_code = Some(code);
            remainder.truncate(cut);
        }

        let trimmed = remainder.trim().trim_end_matches(',').trim_end();
        let (house_number, street) = match self.house.captures(trimmed) {
            Some(captures) => {
                let street = captures[2].trim().trim_end_matches(',').trim_end();
                (
                    Some(captures[1].to_string()),
                    (!street.is_empty()).then(|| street.to_string()),
                )
            }
            None => (None, None),
        };

        ParsedAddress {
            house_number,
            street,
            borough_code,
            zip,
        }
    }
}
