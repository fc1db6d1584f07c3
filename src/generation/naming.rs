//! # Name Synthesis
//!
//! Pronounceable fantasy names built from phoneme pools, plus the adjective and
//! title vocabularies used to dress up item names.

use crate::game::{DamageKind, ProtectionKind, WeaponType};
use crate::utils::{coin_flip, pick};
use rand::rngs::StdRng;
use rand::Rng;

/// Consonant and vowel pools a name is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhonemePool {
    pub consonants: &'static [&'static str],
    pub vowels: &'static [&'static str],
}

const JAPANESE_SYLLABLES: &[&str] = &[
    "a", "i", "u", "e", "o", "ya", "yu", "yo", "n",
    "ka", "ki", "ku", "ke", "ko", "kya", "kyu", "kyo",
    "sa", "shi", "su", "se", "so", "sha", "shu", "sho",
    "ta", "chi", "tsu", "te", "to", "cha", "chu", "cho",
    "na", "ni", "nu", "ne", "no", "nya", "nyu", "nyo",
    "ha", "hi", "fu", "he", "ho", "hya", "hyu", "hyo",
    "ma", "mi", "mu", "me", "mo", "mya", "myu", "myo",
    "ra", "ri", "ru", "re", "ro", "rya", "ryu", "ryo",
    "wa", "wi", "we", "wo",
    "ga", "gi", "gu", "ge", "go", "gya", "gyu", "gyo",
    "za", "ji", "zu", "ze", "zo", "ja", "ju", "jo",
    "da", "de", "do",
    "ba", "bi", "bu", "be", "bo", "bya", "byu", "byo",
    "pa", "pi", "pu", "pe", "po", "pya", "pyu", "pyo",
];

const ORCISH_CONSONANTS: &[&str] = &[
    "skr", "skl", "sl", "jh", "j'r", "j'l", "dr", "dil", "gr", "gl", "k", "kr", "kl",
];
const ORCISH_VOWELS: &[&str] = &["a", "ah", "e", "eh", "i", "ih", "u", "uh", "o", "oh"];

impl PhonemePool {
    pub const DEFAULT: PhonemePool = PhonemePool {
        consonants: &[
            "w", "r", "t", "p", "s", "d", "f", "g", "h", "j", "k", "l", "z", "c", "v", "b", "n",
            "m", "-",
        ],
        vowels: &["a", "e", "i", "o", "u"],
    };

    /// Syllables stand in for both consonants and vowels.
    pub const JAPANESE: PhonemePool = PhonemePool {
        consonants: JAPANESE_SYLLABLES,
        vowels: JAPANESE_SYLLABLES,
    };

    /// Goblins and orks.
    pub const ORCISH: PhonemePool = PhonemePool {
        consonants: ORCISH_CONSONANTS,
        vowels: ORCISH_VOWELS,
    };

    pub const UNDEAD: PhonemePool = PhonemePool {
        consonants: &["gr", "br", "b", "d", "g", "w"],
        vowels: &["eeeh", "yoo", "yuuuh", "e", "ooooh", "uuuhh", "aaa", "yaaa"],
    };

    pub const SKELETAL: PhonemePool = PhonemePool {
        consonants: &[
            "spook", "doot", "scare", "jiggle", "bones", "rattle", "grim", "s", "ed", "er",
        ],
        vowels: &["e", "y", "ya", "e", "o", "oo"],
    };

    pub const BAT: PhonemePool = PhonemePool {
        consonants: &["skr", "r", "kr", "sh"],
        vowels: &["aa", "aaaa", "ee", "eeee", "ii", "iiii", "rr", "rrrr"],
    };
}

impl Default for PhonemePool {
    fn default() -> Self {
        PhonemePool::DEFAULT
    }
}

/// Builds a lowercase run of phonemes.
///
/// Starts with either a consonant-vowel pair or a lone vowel, adds
/// `length` more consonant-vowel pairs, then maybe a trailing consonant.
pub fn phoneme_string(rng: &mut StdRng, length: usize, pool: &PhonemePool) -> String {
    let mut name = String::new();
    if coin_flip(rng) {
        name.push_str(pick::<&str>(rng, pool.consonants));
    }
    name.push_str(pick::<&str>(rng, pool.vowels));

    for _ in 0..length {
        name.push_str(pick::<&str>(rng, pool.consonants));
        name.push_str(pick::<&str>(rng, pool.vowels));
    }

    if coin_flip(rng) {
        name.push_str(pick::<&str>(rng, pool.consonants));
    }
    name
}

/// Builds a capitalized fantasy name.
///
/// # Examples
///
/// ```
/// use delvegen::{create_rng, fantasy_name, PhonemePool};
///
/// let a = fantasy_name(&mut create_rng(3), 2, &PhonemePool::DEFAULT);
/// let b = fantasy_name(&mut create_rng(3), 2, &PhonemePool::DEFAULT);
/// assert_eq!(a, b);
/// assert!(a.chars().next().unwrap().is_uppercase());
/// ```
pub fn fantasy_name(rng: &mut StdRng, length: usize, pool: &PhonemePool) -> String {
    capitalize(&phoneme_string(rng, length, pool))
}

/// Uppercases the first character and lowercases the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Adjectives for items whose stats disappoint.
pub const BORING_ADJECTIVES: &[&str] = &[
    "boring",
    "uninteresting",
    "unworthy",
    "absolutely awful",
    "tasteless",
    "peasant's",
    "poorly crafted",
    "unfit",
];

/// Adjectives for a weapon with a noteworthy amount of `kind` damage.
pub fn damage_adjectives(kind: DamageKind) -> &'static [&'static str] {
    match kind {
        DamageKind::Blunt => &[
            "crushing", "bone-breaking", "head-squashing", "bludgeoning", "crippling",
            "gut-wrenching", "heavy",
        ],
        DamageKind::Slash => &[
            "slicing", "slashing", "bleeding", "serrated", "head-chopping", "decapitating",
            "cutting-edge", "dismembering", "sharp",
        ],
        DamageKind::Puncture => &[
            "piercing", "puncturing", "poking", "impaling", "stabbing", "skewering",
            "hole-making", "pointy",
        ],
        DamageKind::Electric => &[
            "electrifying", "shocking", "heart-stopping", "sparking", "thunderous", "jolting",
            "zapping",
        ],
        DamageKind::Fire => &[
            "burning", "fiery", "blistering", "scorching", "searing", "red-hot", "flaming",
        ],
        DamageKind::Magic => &[
            "magical", "enchanted", "mystical", "spellbound", "spectral", "otherworldly",
        ],
        DamageKind::True => &[
            "armour-ignoring", "disemboweling", "murderous", "intimidating", "legendary",
            "killer", "precise",
        ],
    }
}

/// Adjectives for armour with a noteworthy amount of `kind` resistance.
pub fn protection_adjectives(kind: ProtectionKind) -> &'static [&'static str] {
    match kind {
        ProtectionKind::General => &["sturdy", "reinforced", "fortified", "protective"],
        ProtectionKind::Blunt => &[
            "hardy", "cushioning", "heavy", "dent-resistant", "shock-absorbing",
        ],
        ProtectionKind::Slash => &["hard", "scratch-resistant", "hardened", "tempered"],
        ProtectionKind::Puncture => &[
            "impenetrable", "thick", "deflecting", "puncture-resistant",
        ],
        ProtectionKind::Electric => &[
            "grounded", "rubbery", "electron-absorbing", "lightning-reflecting",
        ],
        ProtectionKind::Fire => &[
            "heat-treated", "unburnable", "heat-absorbing", "fire-resistant",
        ],
        ProtectionKind::Magic => &["blessed", "enchanted", "magical", "dark"],
    }
}

/// Prepends a random adjective from `pool` to `name`.
pub fn prepend_adjective(rng: &mut StdRng, pool: &[&str], name: &str) -> String {
    format!("{} {}", pick(rng, pool), name)
}

fn title_name(rng: &mut StdRng) -> String {
    let length = rng.gen_range(1..=4);
    fantasy_name(rng, length, &PhonemePool::DEFAULT)
}

/// An epic title clause for a weapon, e.g. ", slayer of the Kadu".
pub fn weapon_title(rng: &mut StdRng, weapon_type: WeaponType) -> String {
    let name = title_name(rng);
    let kind = weapon_type.to_string();
    let titles = [
        format!(" of {name}"),
        format!(" from the land of {name}"),
        format!(", crafted by the talented {name}"),
        format!(", infused with {name}"),
        format!(", feared by the {name}"),
        format!(", slayer of the {name}"),
        format!(" of the faraway plains of {name}"),
        format!(" from the swamp of {name}"),
        format!(", wielded by the great {name}"),
        format!(" excavated from the tombs of {name}"),
        format!(", winner of the {name} war"),
        format!(", born from the depths of {name}"),
        format!(", originating from the deserts of {name}"),
        format!(" - \"The {kind} of all {kind}s\""),
        format!(" - One {kind} to rule them all."),
    ];
    pick(rng, &titles).clone()
}

/// An epic title clause for an armour piece.
pub fn armour_title(rng: &mut StdRng) -> String {
    let name = title_name(rng);
    let titles = [
        format!(" of {name}"),
        format!(" from the land of {name}"),
        format!(", crafted by the talented {name}"),
        format!(", infused with {name}"),
        format!(", feared by the {name}"),
        format!(", protector of the {name}"),
        format!(" of the faraway plains of {name}"),
        format!(" from the swamp of {name}"),
        format!(", worn by the great {name}"),
        format!(" excavated from the tombs of {name}"),
        format!(", born from the depths of {name}"),
        format!(", originating from the deserts of {name}"),
    ];
    pick(rng, &titles).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::create_rng;

    #[test]
    fn test_fantasy_name_is_seeded() {
        let a = fantasy_name(&mut create_rng(11), 3, &PhonemePool::ORCISH);
        let b = fantasy_name(&mut create_rng(11), 3, &PhonemePool::ORCISH);
        assert_eq!(a, b);
    }

    #[test]
    fn test_fantasy_name_shape() {
        let mut rng = create_rng(5);
        for _ in 0..200 {
            let name = fantasy_name(&mut rng, 2, &PhonemePool::DEFAULT);
            // 1 or 2 chars, two more pairs, maybe a trailing consonant
            assert!((5..=7).contains(&name.chars().count()), "{name}");
            let first = name.chars().next().unwrap();
            assert!(first.is_uppercase() || first == '-');
            assert!(name.chars().skip(1).all(|c| !c.is_uppercase()));
        }
    }

    #[test]
    fn test_length_one_name_has_a_full_pair() {
        let mut rng = create_rng(8);
        for _ in 0..100 {
            let name = phoneme_string(&mut rng, 1, &PhonemePool::DEFAULT);
            assert!((3..=5).contains(&name.len()), "{name}");
        }
    }

    #[test]
    fn test_pair_count_follows_length() {
        const PAIR: PhonemePool = PhonemePool {
            consonants: &["k"],
            vowels: &["a"],
        };
        let mut rng = create_rng(1);
        for length in 0..5 {
            for _ in 0..20 {
                let name = phoneme_string(&mut rng, length, &PAIR);
                // Opener vowel plus `length` pairs, before the optional ends
                let core = 1 + 2 * length;
                assert!((core..=core + 2).contains(&name.len()), "{name}");
                assert!(name.contains(&format!("a{}", "ka".repeat(length))), "{name}");
            }
        }
    }

    #[test]
    fn test_japanese_pool_has_split_syllables() {
        assert!(JAPANESE_SYLLABLES.contains(&"wo"));
        assert!(JAPANESE_SYLLABLES.contains(&"ga"));
        assert!(JAPANESE_SYLLABLES.contains(&"do"));
        assert!(!JAPANESE_SYLLABLES.contains(&"woga"));
        assert!(!JAPANESE_SYLLABLES.contains(&"doba"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("grAKah"), "Grakah");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("-ro"), "-ro");
    }

    #[test]
    fn test_titles_mention_weapon_type() {
        let mut rng = create_rng(21);
        for _ in 0..100 {
            let title = weapon_title(&mut rng, WeaponType::Glaive);
            assert!(!title.is_empty());
            if title.starts_with(" - ") {
                assert!(title.contains("glaive"));
            }
        }
        assert!(!armour_title(&mut rng).is_empty());
    }
}
