use serde::Deserialize;

/// The closed set of selectable pets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterId {
    #[default]
    Agumon,
    Gabumon,
    Biyomon,
    Gatomon,
    Gomamon,
    Palmon,
    Tentomon,
    Patamon,
}

impl CharacterId {
    /// All characters in selection-slot order.
    pub const ALL: &'static [CharacterId] = &[
        CharacterId::Agumon,
        CharacterId::Gabumon,
        CharacterId::Biyomon,
        CharacterId::Gatomon,
        CharacterId::Gomamon,
        CharacterId::Palmon,
        CharacterId::Tentomon,
        CharacterId::Patamon,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Agumon => "Agumon",
            Self::Gabumon => "Gabumon",
            Self::Biyomon => "Biyomon",
            Self::Gatomon => "Gatomon",
            Self::Gomamon => "Gomamon",
            Self::Palmon => "Palmon",
            Self::Tentomon => "Tentomon",
            Self::Patamon => "Patamon",
        }
    }

    /// 1-based selection slot (the number key that picks this character).
    pub fn slot(self) -> u8 {
        Self::ALL
            .iter()
            .position(|&c| c == self)
            .map_or(1, |i| i as u8 + 1)
    }

    pub fn from_slot(slot: u8) -> Option<Self> {
        let index = usize::from(slot).checked_sub(1)?;
        Self::ALL.get(index).copied()
    }

    /// Cycle to the next character (wraps around).
    pub fn next(self) -> Self {
        let slot = self.slot() as usize % Self::ALL.len();
        Self::ALL[slot]
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_agumon() {
        assert_eq!(CharacterId::default(), CharacterId::Agumon);
    }

    #[test]
    fn slots_round_trip() {
        for &character in CharacterId::ALL {
            assert_eq!(CharacterId::from_slot(character.slot()), Some(character));
        }
        assert_eq!(CharacterId::Agumon.slot(), 1);
        assert_eq!(CharacterId::Patamon.slot(), 8);
    }

    #[test]
    fn out_of_range_slots_are_rejected() {
        assert_eq!(CharacterId::from_slot(0), None);
        assert_eq!(CharacterId::from_slot(9), None);
    }

    #[test]
    fn next_cycles_through_all() {
        assert_eq!(CharacterId::Agumon.next(), CharacterId::Gabumon);
        assert_eq!(CharacterId::Patamon.next(), CharacterId::Agumon);
    }

    #[test]
    fn display_matches_label() {
        for &character in CharacterId::ALL {
            assert_eq!(format!("{}", character), character.label());
        }
    }

    #[test]
    fn deserializes_from_lowercase_name() {
        let parsed: CharacterId = serde_json::from_str("\"gatomon\"").expect("should parse");
        assert_eq!(parsed, CharacterId::Gatomon);
        assert!(serde_json::from_str::<CharacterId>("\"Gatomon\"").is_err());
    }
}
