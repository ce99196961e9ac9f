use std::fmt;
use std::str::FromStr;

use crate::error::SheetError;

// Calibration codes for models A through H, one symbol per answer column,
// 'U' = mark in the upper row, 'D' = mark in the lower row. Printed sheets
// are decoded against these exact patterns, so the table must never change.
pub const INFOBITS_TABLE: [&str; 8] = [
    "DDDU", "UDDD", "DUDD", "UUDU", "DDUD", "UDUU", "DUUU", "UUUD",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Model {
    pub const ALL: [Model; 8] = [
        Model::A,
        Model::B,
        Model::C,
        Model::D,
        Model::E,
        Model::F,
        Model::G,
        Model::H,
    ];

    pub fn from_letter(letter: char) -> Result<Model, SheetError> {
        match letter {
            'A'..='H' => Ok(Model::ALL[(letter as u8 - b'A') as usize]),
            other => Err(SheetError::UnknownModel(other)),
        }
    }

    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }

    pub fn base_code(self) -> &'static str {
        INFOBITS_TABLE[self as usize]
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Model {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Model::from_letter(letter),
            (Some(letter), Some(_)) => Err(SheetError::UnknownModel(letter)),
            (None, _) => Err(SheetError::UnknownModel(' ')),
        }
    }
}

/// Repeats the model's base code and truncates it to exactly `num_columns`
/// symbols, one per answer column across all tables.
pub fn encode(model: Model, num_columns: usize) -> String {
    let base = model.base_code();
    let mut code = String::with_capacity(num_columns.saturating_add(base.len()));
    while code.len() < num_columns {
        code.push_str(base);
    }
    code.truncate(num_columns);
    code
}

/// Recovers the model from a full infobits code. Returns `None` when the
/// code is too short to carry the three payload bits, contains a foreign
/// symbol, fails the parity bit, or breaks the period-four repetition.
pub fn decode(code: &str) -> Option<Model> {
    let mut bits = Vec::with_capacity(code.len());
    for symbol in code.chars() {
        match symbol {
            'U' => bits.push(true),
            'D' => bits.push(false),
            _ => return None,
        }
    }
    if bits.len() < 3 {
        return None;
    }
    if bits.len() >= 4 {
        // Bit 3 is parity over the payload; the rest must repeat the
        // first four bits verbatim.
        if bits[3] != (bits[0] ^ bits[1] ^ !bits[2]) {
            return None;
        }
        for i in 4..bits.len() {
            if bits[i] != bits[i - 4] {
                return None;
            }
        }
    }
    let index = usize::from(bits[0]) | usize::from(bits[1]) << 1 | usize::from(bits[2]) << 2;
    Some(Model::ALL[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_matches_published_examples() {
        assert_eq!(encode(Model::A, 4), "DDDU");
        assert_eq!(encode(Model::A, 10), "DDDUDDDUDD");
        assert_eq!(encode(Model::H, 6), "UUUDUU");
    }

    #[test]
    fn encode_truncates_below_one_period() {
        assert_eq!(encode(Model::B, 2), "UD");
        assert_eq!(encode(Model::C, 1), "D");
        assert_eq!(encode(Model::C, 0), "");
    }

    #[test]
    fn base_codes_are_distinct_four_symbol_patterns() {
        for (i, code) in INFOBITS_TABLE.iter().enumerate() {
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c == 'U' || c == 'D'));
            for other in &INFOBITS_TABLE[i + 1..] {
                assert_ne!(code, other);
            }
        }
    }

    #[test]
    fn base_codes_carry_model_bits_and_parity() {
        for (index, expected) in INFOBITS_TABLE.iter().enumerate() {
            let b0 = index & 1 != 0;
            let b1 = index & 2 != 0;
            let b2 = index & 4 != 0;
            let parity = b0 ^ b1 ^ !b2;
            let derived: String = [b0, b1, b2, parity]
                .iter()
                .map(|&bit| if bit { 'U' } else { 'D' })
                .collect();
            assert_eq!(&derived, expected);
        }
    }

    #[test]
    fn decode_round_trips_encode() {
        for model in Model::ALL {
            for columns in 3..=24 {
                assert_eq!(decode(&encode(model, columns)), Some(model));
            }
        }
    }

    #[test]
    fn decode_rejects_bad_codes() {
        assert_eq!(decode(""), None);
        assert_eq!(decode("DU"), None);
        assert_eq!(decode("DDX"), None);
        // Parity violation: model A would need a 'U' in position 3.
        assert_eq!(decode("DDDD"), None);
        // Broken repetition in the second period.
        assert_eq!(decode("DDDUDDDD"), None);
    }

    #[test]
    fn three_symbols_decode_without_parity() {
        assert_eq!(decode("DDD"), Some(Model::A));
        assert_eq!(decode("UUD"), Some(Model::D));
    }

    #[test]
    fn letters_round_trip() {
        for model in Model::ALL {
            assert_eq!(Model::from_letter(model.letter()).ok(), Some(model));
            assert_eq!(model.to_string().parse::<Model>().ok(), Some(model));
        }
    }

    #[test]
    fn unknown_letters_are_rejected() {
        assert!(matches!(
            Model::from_letter('I'),
            Err(SheetError::UnknownModel('I'))
        ));
        assert!(matches!(
            Model::from_letter('a'),
            Err(SheetError::UnknownModel('a'))
        ));
        assert!(matches!(
            "AB".parse::<Model>(),
            Err(SheetError::UnknownModel('A'))
        ));
        assert!("".parse::<Model>().is_err());
    }
}
