//! Amount extraction from free-form chat text
//!
//! Two notations are recognized: a currency symbol prefix (`$100`, `៛5000`)
//! and a number followed by a currency code (`100 usd`, `5000 KHR`).
//! Thousands separators are stripped before matching. Text with no
//! monetary pattern yields an empty vector, never an error.

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "KHR")]
    Khr,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Khr => "KHR",
        }
    }

    /// Case-insensitive 3-letter code lookup.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Some(Currency::Usd),
            "KHR" => Some(Currency::Khr),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Currency::Usd => '$',
            Currency::Khr => '៛',
        }
    }

    pub fn all() -> [Currency; 2] {
        [Currency::Usd, Currency::Khr]
    }
}

/// Extract every (amount, currency) pair from `text`, left to right.
pub fn parse_amounts(text: &str) -> Vec<(f64, Currency)> {
    let cleaned = text.replace(',', "");
    let re = Regex::new(r"(?i)([$៛])\s*(\d+(?:\.\d+)?)|(\d+(?:\.\d+)?)\s*(usd|khr)").unwrap();

    let mut results = Vec::new();
    for caps in re.captures_iter(&cleaned) {
        if let (Some(symbol), Some(number)) = (caps.get(1), caps.get(2)) {
            let currency = if symbol.as_str() == "$" {
                Currency::Usd
            } else {
                Currency::Khr
            };
            if let Ok(amount) = number.as_str().parse::<f64>() {
                results.push((amount, currency));
            }
        } else if let (Some(number), Some(code)) = (caps.get(3), caps.get(4)) {
            if let (Ok(amount), Some(currency)) =
                (number.as_str().parse::<f64>(), Currency::from_code(code.as_str()))
            {
                results.push((amount, currency));
            }
        }
    }
    results
}
