//! Address Parsing
//!
//! Extracts city and district from Taiwanese-style free-text site
//! addresses ("台北市大安區和平東路…"). Returns a tagged result instead
//! of string splicing; anything the pattern does not recognize is
//! `Unparsed` and callers keep the raw text.

use regex::Regex;
use std::sync::OnceLock;

/// Parse outcome for a free-text address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAddress {
    Parsed { city: String, district: String },
    Unparsed,
}

fn city_district_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // City: 2-3 chars ending in 市/縣; district: 1-3 chars ending
        // in 區/鄉/鎮 or a county-administered 市.
        Regex::new(r"^\s*(?P<city>[^市縣]{1,3}[市縣])(?P<district>[^區鄉鎮市]{1,3}[區鄉鎮市])")
            .expect("static regex is valid")
    })
}

/// 解析地址的县市/行政区前缀
pub fn parse_city_district(address: &str) -> ParsedAddress {
    match city_district_re().captures(address) {
        Some(caps) => ParsedAddress::Parsed {
            city: caps["city"].to_string(),
            district: caps["district"].to_string(),
        },
        None => ParsedAddress::Unparsed,
    }
}

impl ParsedAddress {
    /// City label for display/export, empty when unparsed.
    pub fn city(&self) -> &str {
        match self {
            ParsedAddress::Parsed { city, .. } => city,
            ParsedAddress::Unparsed => "",
        }
    }

    /// District label for display/export, empty when unparsed.
    pub fn district(&self) -> &str {
        match self {
            ParsedAddress::Parsed { district, .. } => district,
            ParsedAddress::Unparsed => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_city_and_district() {
        let parsed = parse_city_district("台北市大安區和平東路二段18號");
        assert_eq!(
            parsed,
            ParsedAddress::Parsed {
                city: "台北市".to_string(),
                district: "大安區".to_string(),
            }
        );
    }

    #[test]
    fn parses_county_township() {
        let parsed = parse_city_district("宜蘭縣羅東鎮中正路100號");
        assert_eq!(parsed.city(), "宜蘭縣");
        assert_eq!(parsed.district(), "羅東鎮");
    }

    #[test]
    fn leading_whitespace_is_tolerated() {
        let parsed = parse_city_district("  新北市板橋區文化路一段");
        assert_eq!(parsed.city(), "新北市");
    }

    #[test]
    fn unrecognized_input_is_unparsed() {
        assert_eq!(parse_city_district("somewhere abroad"), ParsedAddress::Unparsed);
        assert_eq!(parse_city_district(""), ParsedAddress::Unparsed);
        assert_eq!(parse_city_district("").city(), "");
    }
}
