use quire_style::{ListNumbering, ListSymbol};

/// Text of the symbol drawn in front of the list item numbered `number`.
pub fn symbol_text(symbol: &ListSymbol, number: usize) -> String {
    match symbol {
        ListSymbol::Text(text) => text.clone(),
        ListSymbol::Numbered(numbering) => format!("{}.", format_number(*numbering, number)),
    }
}

pub fn format_number(numbering: ListNumbering, n: usize) -> String {
    match numbering {
        ListNumbering::Decimal => n.to_string(),
        ListNumbering::LowerAlpha => to_lower_alpha(n),
        ListNumbering::UpperAlpha => to_lower_alpha(n).to_uppercase(),
        ListNumbering::LowerRoman => to_lower_roman(n),
        ListNumbering::UpperRoman => to_lower_roman(n).to_uppercase(),
    }
}

/// Bijective base-26: 1 is "a", 26 is "z", 27 is "aa".
fn to_lower_alpha(n: usize) -> String {
    if n == 0 {
        return "a".to_string();
    }
    let mut letters = Vec::new();
    let mut rest = n;
    while rest > 0 {
        rest -= 1;
        letters.push((b'a' + (rest % 26) as u8) as char);
        rest /= 26;
    }
    letters.iter().rev().collect()
}

fn to_lower_roman(n: usize) -> String {
    const VALUES: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut rest = n;
    let mut out = String::new();
    for (value, digits) in VALUES {
        while rest >= value {
            out.push_str(digits);
            rest -= value;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_numbering_wraps() {
        assert_eq!(format_number(ListNumbering::LowerAlpha, 1), "a");
        assert_eq!(format_number(ListNumbering::LowerAlpha, 26), "z");
        assert_eq!(format_number(ListNumbering::UpperAlpha, 28), "AB");
    }

    #[test]
    fn test_roman_numbering() {
        assert_eq!(format_number(ListNumbering::LowerRoman, 4), "iv");
        assert_eq!(format_number(ListNumbering::UpperRoman, 1994), "MCMXCIV");
    }

    #[test]
    fn test_symbol_text() {
        assert_eq!(symbol_text(&ListSymbol::default(), 3), "- ");
        assert_eq!(symbol_text(&ListSymbol::Numbered(ListNumbering::Decimal), 3), "3.");
    }
}
