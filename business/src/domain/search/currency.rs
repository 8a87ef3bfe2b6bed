//! Currency inference for provider price strings.
//!
//! Providers frequently report a bare price string with no currency
//! field. Precedence, in order: an explicit regional marker in the
//! string, a region-aware default for an ambiguous symbol, the generic
//! symbol table, nothing.

/// Regional markers are checked longest-prefix-first so `US$` never
/// resolves through its `S$` suffix.
const EXPLICIT_MARKERS: &[(&str, &str)] = &[
    ("US$", "USD"),
    ("S$", "SGD"),
    ("CA$", "CAD"),
    ("C$", "CAD"),
    ("AU$", "AUD"),
    ("A$", "AUD"),
    ("NZ$", "NZD"),
    ("HK$", "HKD"),
    ("NT$", "TWD"),
    ("R$", "BRL"),
    ("MX$", "MXN"),
];

const KNOWN_ISO_CODES: &[&str] = &[
    "USD", "EUR", "GBP", "SGD", "AUD", "CAD", "NZD", "HKD", "JPY", "CNY", "INR", "KRW", "TWD",
    "BRL", "MXN", "THB", "CHF", "SEK", "NOK", "DKK", "PLN",
];

const REGION_DOLLAR_DEFAULTS: &[(&str, &str)] = &[
    ("us", "USD"),
    ("sg", "SGD"),
    ("au", "AUD"),
    ("ca", "CAD"),
    ("nz", "NZD"),
    ("hk", "HKD"),
    ("mx", "MXN"),
];

const REGION_YEN_DEFAULTS: &[(&str, &str)] = &[("jp", "JPY"), ("cn", "CNY")];

const SYMBOL_DEFAULTS: &[(&str, &str)] = &[
    ("$", "USD"),
    ("€", "EUR"),
    ("£", "GBP"),
    ("¥", "JPY"),
    ("₹", "INR"),
    ("₩", "KRW"),
    ("฿", "THB"),
];

/// Infers the ISO currency code for a provider price string. `region` is
/// the caller-configured lowercase region code (e.g. `"sg"`), used only
/// to resolve ambiguous symbols.
pub fn infer_currency(price: &str, region: Option<&str>) -> Option<String> {
    let price = price.trim();
    if price.is_empty() {
        return None;
    }

    for (marker, code) in EXPLICIT_MARKERS {
        if price.contains(marker) {
            return Some((*code).to_string());
        }
    }
    if let Some(code) = find_iso_code(price) {
        return Some(code);
    }

    let region = region.map(|r| r.trim().to_lowercase());
    if let Some(region) = &region {
        if price.contains('$') {
            for (candidate, code) in REGION_DOLLAR_DEFAULTS {
                if region == candidate {
                    return Some((*code).to_string());
                }
            }
        }
        if price.contains('¥') {
            for (candidate, code) in REGION_YEN_DEFAULTS {
                if region == candidate {
                    return Some((*code).to_string());
                }
            }
        }
    }

    for (symbol, code) in SYMBOL_DEFAULTS {
        if price.contains(symbol) {
            return Some((*code).to_string());
        }
    }

    None
}

/// Extracts the numeric amount from a price string, tolerating thousands
/// separators. Returns `None` when the string carries no digits.
pub fn extract_numeric_price(price: &str) -> Option<f64> {
    let re = regex::Regex::new(r"[0-9][0-9,]*(?:\.[0-9]+)?").ok()?;
    let matched = re.find(price)?;
    matched.as_str().replace(',', "").parse().ok()
}

fn find_iso_code(price: &str) -> Option<String> {
    let re = regex::Regex::new(r"\b([A-Z]{3})\b").ok()?;
    for capture in re.captures_iter(price) {
        let code = capture.get(1)?.as_str();
        if KNOWN_ISO_CODES.contains(&code) {
            return Some(code.to_string());
        }
    }
    None
}
