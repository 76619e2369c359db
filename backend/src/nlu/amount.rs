//! Colombian colloquial amount normalization.
//!
//! Turns money expressions as people actually type them ("10k", "10 lucas",
//! "diez mil", "$10.000", "1 palo") into an exact peso amount. Pure functions,
//! no state. When no numeric token is found the result is `None` - callers
//! must never substitute a zero amount.

use once_cell::sync::Lazy;
use regex::Regex;

/// Digit-based amount: optional `$`, digits with `.`/`,` separators, and an
/// optional multiplier suffix (k/mil/lucas x1000, M/palo x1_000_000).
static NUM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$?\s*(\d+(?:[.,]\d+)*)\s*(mil\b|lucas\b|palos\b|palo\b|k\b|m\b)?")
        .expect("amount regex is valid")
});

/// Word-based amount: a Spanish cardinal immediately followed by a multiplier
/// word ("diez mil", "veinte lucas", "un palo"). A bare cardinal with no
/// multiplier is not an amount ("un helado" is not 1 peso).
static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(doscientos|quinientos|cien|cincuenta|cuarenta|sesenta|setenta|ochenta|noventa|treinta|veinte|quince|catorce|trece|doce|once|diez|nueve|ocho|siete|seis|cinco|cuatro|tres|dos|uno|una|un)\s+(mil|lucas|palos|palo)\b",
    )
    .expect("word amount regex is valid")
});

fn multiplier(suffix: &str) -> u64 {
    match suffix.to_lowercase().as_str() {
        "k" | "mil" | "lucas" => 1_000,
        "m" | "palo" | "palos" => 1_000_000,
        _ => 1,
    }
}

fn word_value(word: &str) -> Option<u64> {
    let value = match word.to_lowercase().as_str() {
        "un" | "uno" | "una" => 1,
        "dos" => 2,
        "tres" => 3,
        "cuatro" => 4,
        "cinco" => 5,
        "seis" => 6,
        "siete" => 7,
        "ocho" => 8,
        "nueve" => 9,
        "diez" => 10,
        "once" => 11,
        "doce" => 12,
        "trece" => 13,
        "catorce" => 14,
        "quince" => 15,
        "veinte" => 20,
        "treinta" => 30,
        "cuarenta" => 40,
        "cincuenta" => 50,
        "sesenta" => 60,
        "setenta" => 70,
        "ochenta" => 80,
        "noventa" => 90,
        "cien" => 100,
        "doscientos" => 200,
        "quinientos" => 500,
        _ => return None,
    };
    Some(value)
}

/// Parse one digit token into pesos.
///
/// With a multiplier suffix the separator is a decimal point ("1.5k" -> 1500);
/// without one it is a thousands separator ("15.000" -> 15000).
fn token_value(number: &str, suffix: Option<&str>) -> Option<u64> {
    match suffix {
        Some(suffix) => {
            let normalized = number.replace(',', ".");
            let value: f64 = normalized.parse().ok()?;
            if value <= 0.0 {
                return None;
            }
            Some((value * multiplier(suffix) as f64).round() as u64)
        }
        None => {
            let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
            let value: u64 = digits.parse().ok()?;
            if value == 0 {
                return None;
            }
            Some(value)
        }
    }
}

/// True when the match starts right after a letter or digit, e.g. the "1" in
/// "d1". Those digits belong to a word, not to an amount.
fn glued_to_word(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .map(|c| c.is_alphanumeric())
        .unwrap_or(false)
}

/// Extract the first plausible peso amount from a free-form message.
///
/// Returns `None` when the message carries no recognizable amount - callers
/// must treat that as "indeterminate", never as zero.
pub fn normalize_amount(text: &str) -> Option<u64> {
    for caps in NUM_RE.captures_iter(text) {
        let digits = caps.get(1).expect("digit group always present");
        if glued_to_word(text, digits.start()) {
            continue;
        }
        let suffix = caps.get(2).map(|s| s.as_str());
        if let Some(value) = token_value(&caps[1], suffix) {
            return Some(value);
        }
    }

    if let Some(caps) = WORD_RE.captures(text) {
        let value = word_value(&caps[1])?;
        return Some(value * multiplier(&caps[2]));
    }

    None
}

/// Remove amount tokens (digits, `$`, multiplier suffixes, cardinal + mil
/// phrases) from a message, leaving the description text.
pub fn strip_amount_tokens(message: &str) -> String {
    let without_digits = NUM_RE.replace_all(message, " ");
    let without_words = WORD_RE.replace_all(&without_digits, " ");
    without_words.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_colombian_shorthand() {
        assert_eq!(normalize_amount("10k"), Some(10_000));
        assert_eq!(normalize_amount("10 lucas"), Some(10_000));
        assert_eq!(normalize_amount("10 mil"), Some(10_000));
        assert_eq!(normalize_amount("diez mil"), Some(10_000));
        assert_eq!(normalize_amount("$10.000"), Some(10_000));
        assert_eq!(normalize_amount("1M"), Some(1_000_000));
        assert_eq!(normalize_amount("1 palo"), Some(1_000_000));
    }

    #[test]
    fn amount_embedded_in_text() {
        assert_eq!(normalize_amount("Almuerzo 15000"), Some(15_000));
        assert_eq!(normalize_amount("gasté 10 lucas en comida"), Some(10_000));
        assert_eq!(normalize_amount("me comí un helado de diez mil"), Some(10_000));
        assert_eq!(normalize_amount("helado $10k"), Some(10_000));
    }

    #[test]
    fn thousand_separators_without_suffix() {
        assert_eq!(normalize_amount("15.000"), Some(15_000));
        assert_eq!(normalize_amount("1.500.000"), Some(1_500_000));
    }

    #[test]
    fn decimal_before_multiplier() {
        assert_eq!(normalize_amount("1.5k"), Some(1_500));
        assert_eq!(normalize_amount("2,5 mil"), Some(2_500));
    }

    #[test]
    fn word_multipliers() {
        assert_eq!(normalize_amount("veinte mil"), Some(20_000));
        assert_eq!(normalize_amount("quince lucas"), Some(15_000));
        assert_eq!(normalize_amount("dos palos"), Some(2_000_000));
    }

    #[test]
    fn indeterminate_when_no_numeric_token() {
        assert_eq!(normalize_amount("hola parcero"), None);
        assert_eq!(normalize_amount(""), None);
        // a bare cardinal without multiplier is not an amount
        assert_eq!(normalize_amount("un helado"), None);
        // zero is not a plausible amount
        assert_eq!(normalize_amount("0 uber"), None);
    }

    #[test]
    fn digits_glued_to_words_are_not_amounts() {
        // "d1" is a supermarket chain, not one peso
        assert_eq!(normalize_amount("mercado en el d1"), None);
        assert_eq!(normalize_amount("d1 45000"), Some(45_000));
    }

    #[test]
    fn strips_amount_tokens_from_description() {
        assert_eq!(strip_amount_tokens("Almuerzo 15000"), "Almuerzo");
        assert_eq!(strip_amount_tokens("gasté 10 lucas en comida"), "gasté en comida");
        assert_eq!(strip_amount_tokens("10k uber"), "uber");
        assert_eq!(strip_amount_tokens("15000"), "");
    }
}
