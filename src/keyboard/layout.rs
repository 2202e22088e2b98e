use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const LAYOUT_NAMES: &[&str] = &["qwerty", "dvorak", "colemak", "colemak-dh"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyboardLayout {
    pub name: String,
    pub rows: Vec<Vec<char>>,
}

fn rows(spec: [&str; 3]) -> Vec<Vec<char>> {
    spec.iter().map(|row| row.chars().collect()).collect()
}

impl KeyboardLayout {
    pub fn qwerty() -> Self {
        Self {
            name: "qwerty".to_string(),
            rows: rows(["qwertyuiop", "asdfghjkl;", "zxcvbnm,./"]),
        }
    }

    pub fn dvorak() -> Self {
        Self {
            name: "dvorak".to_string(),
            rows: rows(["',.pyfgcrl", "aoeuidhtns", ";qjkxbmwvz"]),
        }
    }

    pub fn colemak() -> Self {
        Self {
            name: "colemak".to_string(),
            rows: rows(["qwfpgjluy;", "arstdhneio", "zxcvbkm,./"]),
        }
    }

    pub fn colemak_dh() -> Self {
        Self {
            name: "colemak-dh".to_string(),
            rows: rows(["qwfpbjluy;", "arstgmneio", "zxcdvkh,./"]),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "qwerty" => Some(Self::qwerty()),
            "dvorak" => Some(Self::dvorak()),
            "colemak" => Some(Self::colemak()),
            "colemak-dh" | "colemak_dh" | "colemakdh" => Some(Self::colemak_dh()),
            _ => None,
        }
    }

    /// Table translating keys reported by a QWERTY-configured OS into the
    /// characters found at the same physical position in this layout.
    pub fn input_map(&self) -> InputMap {
        InputMap::between(&Self::qwerty(), self)
    }
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::qwerty()
    }
}

/// Fixed rune remapping applied to every typed character before it is
/// compared with the target text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputMap {
    mappings: HashMap<char, char>,
}

impl InputMap {
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn between(from: &KeyboardLayout, to: &KeyboardLayout) -> Self {
        let mut mappings = HashMap::new();
        for (from_row, to_row) in from.rows.iter().zip(&to.rows) {
            for (&physical, &produced) in from_row.iter().zip(to_row) {
                if physical == produced {
                    continue;
                }
                mappings.insert(physical, produced);
                // Shifted letters follow their base key; shifted punctuation
                // differs per layout and is left alone.
                if physical.is_ascii_alphabetic() && produced.is_ascii_alphabetic() {
                    mappings.insert(
                        physical.to_ascii_uppercase(),
                        produced.to_ascii_uppercase(),
                    );
                }
            }
        }
        Self { mappings }
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (char, char)>) -> Self {
        Self {
            mappings: pairs.into_iter().filter(|(a, b)| a != b).collect(),
        }
    }

    pub fn remap(&self, ch: char) -> char {
        self.mappings.get(&ch).copied().unwrap_or(ch)
    }

    pub fn is_identity(&self) -> bool {
        self.mappings.is_empty()
    }
}
