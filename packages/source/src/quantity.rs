//! Leading-quantity parsing for bulletin lines.
//!
//! Bulletins spell counts out ("Fifteen Tampa students ...") or, less often,
//! use digits. Anything that is neither counts as a single case.

/// The leading token was not a recognizable number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed quantity '{token}'")]
pub struct MalformedQuantity {
    /// The offending token.
    pub token: String,
}

fn unit_value(word: &str) -> Option<u64> {
    Some(match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    })
}

fn scale_value(word: &str) -> Option<u64> {
    match word {
        "thousand" => Some(1_000),
        "million" => Some(1_000_000),
        _ => None,
    }
}

/// Parses a count written as digits or as an English cardinal.
///
/// Compound words may be joined with hyphens, spaces, or `"and"`
/// (`"twenty-one"`, `"one hundred and five"`). Surrounding punctuation is
/// ignored.
///
/// # Errors
///
/// Returns [`MalformedQuantity`] if the text is not a number.
pub fn parse_quantity(text: &str) -> Result<u64, MalformedQuantity> {
    let malformed = || MalformedQuantity {
        token: text.to_string(),
    };

    let cleaned = text
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase();

    if cleaned.is_empty() {
        return Err(malformed());
    }

    if cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return cleaned.parse().map_err(|_| malformed());
    }

    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut saw_number = false;

    for word in cleaned
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty() && *w != "and")
    {
        if let Some(v) = unit_value(word) {
            current = current.checked_add(v).ok_or_else(malformed)?;
        } else if word == "hundred" {
            current = current.max(1).checked_mul(100).ok_or_else(malformed)?;
        } else if let Some(scale) = scale_value(word) {
            total = current
                .max(1)
                .checked_mul(scale)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(malformed)?;
            current = 0;
        } else {
            return Err(malformed());
        }
        saw_number = true;
    }

    if !saw_number {
        return Err(malformed());
    }

    total.checked_add(current).ok_or_else(malformed)
}

/// Parses the leading quantity of a bulletin line, treating anything
/// unrecognizable as one case.
#[must_use]
pub fn quantity_or_one(token: &str) -> u64 {
    parse_quantity(token).unwrap_or_else(|e| {
        log::debug!("{e}, counting as 1");
        1
    })
}
