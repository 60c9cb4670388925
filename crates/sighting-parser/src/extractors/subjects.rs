use std::collections::HashMap;

use super::SubjectExtractor;
use crate::model::Subject;

/// Names recognized out of the box.
pub const DEFAULT_SUBJECT_NAMES: &[&str] = &[
    "Bulbasaur", "Ivysaur", "Venusaur", "Charmander", "Charmeleon", "Charizard", "Squirtle",
    "Wartortle", "Blastoise", "Caterpie", "Metapod", "Butterfree", "Weedle", "Kakuna",
    "Beedrill", "Pidgey", "Pidgeotto", "Pidgeot", "Rattata", "Raticate", "Spearow", "Fearow",
    "Ekans", "Arbok", "Pikachu", "Raichu", "Sandshrew", "Sandslash", "Nidoran♀", "Nidorina",
    "Nidoqueen", "Nidoran♂", "Nidorino", "Nidoking", "Clefairy", "Clefable", "Vulpix",
    "Ninetales", "Jigglypuff", "Wigglytuff", "Zubat", "Golbat", "Oddish", "Gloom", "Vileplume",
    "Paras", "Parasect", "Venonat", "Venomoth", "Diglett", "Dugtrio", "Meowth", "Persian",
    "Psyduck", "Golduck", "Mankey", "Primeape", "Growlithe", "Arcanine", "Poliwag",
    "Poliwhirl", "Poliwrath", "Abra", "Kadabra", "Alakazam", "Machop", "Machoke", "Machamp",
    "Bellsprout", "Weepinbell", "Victreebel", "Tentacool", "Tentacruel", "Geodude", "Graveler",
    "Golem", "Ponyta", "Rapidash", "Slowpoke", "Slowbro", "Magnemite", "Magneton",
    "Farfetch'd", "Doduo", "Dodrio", "Seel", "Dewgong", "Grimer", "Muk", "Shellder", "Cloyster",
    "Gastly", "Haunter", "Gengar", "Onix", "Drowzee", "Hypno", "Krabby", "Kingler", "Voltorb",
    "Electrode", "Exeggcute", "Exeggutor", "Cubone", "Marowak", "Hitmonlee", "Hitmonchan",
    "Lickitung", "Koffing", "Weezing", "Rhyhorn", "Rhydon", "Chansey", "Tangela", "Kangaskhan",
    "Horsea", "Seadra", "Goldeen", "Seaking", "Staryu", "Starmie", "Mr. Mime", "Scyther",
    "Jynx", "Electabuzz", "Magmar", "Pinsir", "Tauros", "Magikarp", "Gyarados", "Lapras",
    "Ditto", "Eevee", "Vaporeon", "Jolteon", "Flareon", "Porygon", "Omanyte", "Omastar",
    "Kabuto", "Kabutops", "Aerodactyl", "Snorlax", "Articuno", "Zapdos", "Moltres", "Dratini",
    "Dragonair", "Dragonite", "Mewtwo", "Mew",
];

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '\'' | '.' | '♀' | '♂')
}

/// Lookup key: lowercase, with punctuation inside the name dropped.
fn name_key(text: &str) -> String {
    text.chars()
        .filter(|ch| ch.is_alphanumeric() || matches!(ch, '♀' | '♂'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Matches words (and adjacent word pairs, for names like "Mr. Mime")
/// against a table of known names. The first name in text order wins.
#[derive(Debug, Clone)]
pub struct NameTableSubjects {
    names: HashMap<String, String>,
}

impl Default for NameTableSubjects {
    fn default() -> Self {
        Self::new(DEFAULT_SUBJECT_NAMES.iter().copied())
    }
}

impl NameTableSubjects {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self {
            names: HashMap::new(),
        };
        table.extend(names);
        table
    }

    /// Adds names; an existing entry for the same key keeps its spelling.
    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim();
            let key = name_key(name);
            if key.is_empty() {
                continue;
            }
            self.names.entry(key).or_insert_with(|| name.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }
}

impl SubjectExtractor for NameTableSubjects {
    fn parse_subject(&self, fragment: &str) -> Subject {
        let keys: Vec<String> = fragment
            .split(|ch: char| !is_name_char(ch))
            .map(name_key)
            .filter(|key| !key.is_empty())
            .collect();

        for (index, key) in keys.iter().enumerate() {
            if let Some(next) = keys.get(index + 1) {
                if let Some(name) = self.lookup(&format!("{key}{next}")) {
                    return Subject::named(name);
                }
            }
            if let Some(name) = self.lookup(key) {
                return Subject::named(name);
            }
        }

        Subject::Unknown
    }
}
