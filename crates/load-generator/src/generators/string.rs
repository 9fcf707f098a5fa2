//! Text generators guided by the column name.

use load_core::GeneratedValue;
use rand::seq::IndexedRandom;
use rand::Rng;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Carlos", "Maria", "Ahmed", "Fatima", "Wei", "Mei", "Hiroshi", "Yuki", "Ivan", "Olga",
    "Lucas", "Sofia", "Noah", "Emma", "Liam", "Olivia", "Mateo", "Lucia", "Arjun", "Priya",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Nguyen", "Kim", "Tanaka", "Ivanov", "Muller", "Rossi", "Silva", "Kumar",
];

const EMAIL_DOMAINS: &[&str] = &[
    "example.com", "example.org", "example.net", "mail.test", "inbox.test", "corp.test",
];

const COLORS: &[&str] = &[
    "red", "green", "blue", "yellow", "orange", "purple", "pink", "brown", "black", "white",
    "gray", "cyan", "magenta", "lime", "maroon", "navy", "olive", "teal", "silver", "gold",
    "indigo", "violet", "beige", "coral", "crimson", "khaki", "lavender", "salmon", "turquoise",
];

const CITIES: &[&str] = &[
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio",
    "San Diego", "Dallas", "Austin", "London", "Paris", "Berlin", "Madrid", "Rome", "Lisbon",
    "Amsterdam", "Vienna", "Prague", "Warsaw", "Tokyo", "Osaka", "Seoul", "Beijing", "Shanghai",
    "Mumbai", "Delhi", "Sydney", "Melbourne", "Toronto", "Montreal", "Mexico City",
    "Buenos Aires", "Sao Paulo", "Lima", "Bogota", "Cairo", "Lagos", "Nairobi", "Johannesburg",
];

const COUNTRIES: &[&str] = &[
    "United States", "Canada", "Mexico", "Brazil", "Argentina", "Chile", "Peru", "Colombia",
    "United Kingdom", "France", "Germany", "Spain", "Italy", "Portugal", "Netherlands",
    "Belgium", "Austria", "Switzerland", "Poland", "Sweden", "Norway", "Finland", "Denmark",
    "Japan", "South Korea", "China", "India", "Australia", "New Zealand", "Egypt", "Nigeria",
    "Kenya", "South Africa", "Morocco", "Turkey", "Greece", "Ireland", "Uruguay",
];

const STREET_NAMES: &[&str] = &[
    "Main", "Oak", "Pine", "Maple", "Cedar", "Elm", "Washington", "Lake", "Hill", "Park",
    "River", "Sunset", "Highland", "Church", "Mill", "Spring", "Forest", "Meadow", "Ridge",
];

const STREET_SUFFIXES: &[&str] = &[
    "Street", "Avenue", "Road", "Boulevard", "Lane", "Drive", "Court", "Way", "Place",
];

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in",
    "reprehenderit", "voluptate", "velit", "esse", "cillum", "fugiat", "nulla", "pariatur",
    "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt", "culpa", "qui",
    "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

/// Upper bound on the length of free text, whatever the column allows.
const MAX_TEXT_LEN: usize = 255;

/// Flavour of text produced for a string column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticHint {
    Email,
    FirstName,
    LastName,
    FullName,
    Phone,
    Zip,
    Color,
    City,
    Country,
    Address,
    Ip,
    /// Generic lorem ipsum words
    Word,
}

impl SemanticHint {
    /// Classify a column by its name. The first matching rule wins.
    pub fn from_column_name(name: &str) -> Self {
        let name = name.to_lowercase();

        if name.contains("email") {
            Self::Email
        } else if is_name_with_prefix(&name, "first") {
            Self::FirstName
        } else if is_name_with_prefix(&name, "last") {
            Self::LastName
        } else if name.contains("name") {
            Self::FullName
        } else if name.contains("phone") {
            Self::Phone
        } else if name.contains("zip") {
            Self::Zip
        } else if name.contains("color") || name.contains("colour") {
            Self::Color
        } else if name.contains("city") {
            Self::City
        } else if name.contains("country") {
            Self::Country
        } else if name.contains("address") && !is_ip_column(&name) {
            Self::Address
        } else if is_ip_column(&name) {
            Self::Ip
        } else {
            Self::Word
        }
    }
}

fn is_name_with_prefix(name: &str, prefix: &str) -> bool {
    name.find(prefix)
        .is_some_and(|start| name[start + prefix.len()..].contains("name"))
}

fn is_ip_column(name: &str) -> bool {
    name == "ip"
        || name.starts_with("ip_")
        || name.ends_with("_ip")
        || name.contains("ip_addr")
        || name.contains("ipaddr")
}

/// Generate text for `hint`, at most `max_len` characters long.
pub fn generate_semantic<R: Rng + ?Sized>(
    rng: &mut R,
    hint: SemanticHint,
    max_len: usize,
) -> GeneratedValue {
    let text = match hint {
        SemanticHint::Email => email(rng),
        SemanticHint::FirstName => choose(rng, FIRST_NAMES).to_string(),
        SemanticHint::LastName => choose(rng, LAST_NAMES).to_string(),
        SemanticHint::FullName => {
            format!("{} {}", choose(rng, FIRST_NAMES), choose(rng, LAST_NAMES))
        }
        SemanticHint::Phone => format!(
            "({:03}) {:03}-{:04}",
            rng.random_range(200..1000),
            rng.random_range(200..1000),
            rng.random_range(0..10_000)
        ),
        SemanticHint::Zip => format!("{:05}", rng.random_range(501..100_000)),
        SemanticHint::Color => choose(rng, COLORS).to_string(),
        SemanticHint::City => choose(rng, CITIES).to_string(),
        SemanticHint::Country => choose(rng, COUNTRIES).to_string(),
        SemanticHint::Address => format!(
            "{} {} {}",
            rng.random_range(1..10_000),
            choose(rng, STREET_NAMES),
            choose(rng, STREET_SUFFIXES)
        ),
        SemanticHint::Ip => format!(
            "{}.{}.{}.{}",
            rng.random_range(1..=254),
            rng.random_range(0..=255),
            rng.random_range(0..=255),
            rng.random_range(1..=254)
        ),
        SemanticHint::Word => words(rng, max_len.min(MAX_TEXT_LEN)),
    };

    GeneratedValue::String(truncate_chars(text, max_len))
}

/// A lorem ipsum sentence of four to twelve words.
pub fn sentence<R: Rng + ?Sized>(rng: &mut R) -> String {
    let count = rng.random_range(4..=12);
    let mut text = (0..count)
        .map(|_| choose(rng, WORDS))
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(first) = text.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    text.push('.');
    text
}

fn email<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}.{}{}@{}",
        choose(rng, FIRST_NAMES).to_lowercase(),
        choose(rng, LAST_NAMES).to_lowercase(),
        rng.random_range(0..1000),
        choose(rng, EMAIL_DOMAINS)
    )
}

/// Words joined by spaces, filling a random share of `budget` characters.
fn words<R: Rng + ?Sized>(rng: &mut R, budget: usize) -> String {
    if budget == 0 {
        return String::new();
    }
    let target = rng.random_range(1..=budget);
    let mut text = String::new();
    while text.len() < target {
        if !text.is_empty() {
            text.push(' ');
        }
        text.push_str(choose(rng, WORDS));
    }
    text
}

fn choose<R: Rng + ?Sized>(rng: &mut R, list: &[&'static str]) -> &'static str {
    list.choose(rng).copied().unwrap_or_default()
}

fn truncate_chars(mut text: String, max_len: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max_len) {
        text.truncate(idx);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn text(value: GeneratedValue) -> String {
        match value {
            GeneratedValue::String(s) => s,
            other => panic!("Expected String, got {other:?}"),
        }
    }

    #[test]
    fn test_hint_from_column_name() {
        let cases = [
            ("email", SemanticHint::Email),
            ("contact_email_address", SemanticHint::Email),
            ("first_name", SemanticHint::FirstName),
            ("FirstName", SemanticHint::FirstName),
            ("last_name", SemanticHint::LastName),
            ("name", SemanticHint::FullName),
            ("customer_name", SemanticHint::FullName),
            ("phone_number", SemanticHint::Phone),
            ("zip_code", SemanticHint::Zip),
            ("favorite_color", SemanticHint::Color),
            ("city", SemanticHint::City),
            ("country_code", SemanticHint::Country),
            ("billing_address", SemanticHint::Address),
            ("shipping_address", SemanticHint::Address),
            ("ip", SemanticHint::Ip),
            ("ip_address", SemanticHint::Ip),
            ("client_ip", SemanticHint::Ip),
            ("remote_ipaddr", SemanticHint::Ip),
            ("description", SemanticHint::Word),
            ("zipper_flip", SemanticHint::Zip),
            ("notes", SemanticHint::Word),
        ];

        for (name, expected) in cases {
            assert_eq!(SemanticHint::from_column_name(name), expected, "column {name}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        // "email" is checked before "name"
        assert_eq!(
            SemanticHint::from_column_name("email_name"),
            SemanticHint::Email
        );
        // "lastname" must not be classified as a plain name
        assert_eq!(
            SemanticHint::from_column_name("lastname"),
            SemanticHint::LastName
        );
    }

    #[test]
    fn test_respects_max_len() {
        let mut rng = StdRng::seed_from_u64(42);
        let hints = [
            SemanticHint::Email,
            SemanticHint::FullName,
            SemanticHint::Phone,
            SemanticHint::Address,
            SemanticHint::Ip,
            SemanticHint::Word,
        ];

        for hint in hints {
            for max_len in [0, 1, 5, 20] {
                let s = text(generate_semantic(&mut rng, hint, max_len));
                assert!(s.chars().count() <= max_len, "{hint:?} produced {s:?}");
            }
        }
    }

    #[test]
    fn test_words_fill_large_columns() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let s = text(generate_semantic(&mut rng, SemanticHint::Word, 65_535));
            assert!(!s.is_empty());
            assert!(s.len() <= MAX_TEXT_LEN + 16);
        }
    }

    #[test]
    fn test_email_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let s = text(generate_semantic(&mut rng, SemanticHint::Email, 255));
        let (local, domain) = s.split_once('@').unwrap();
        assert!(!local.is_empty());
        assert!(domain.contains('.'));
    }

    #[test]
    fn test_ip_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let s = text(generate_semantic(&mut rng, SemanticHint::Ip, 15));
        let octets: Vec<u16> = s.split('.').map(|o| o.parse().unwrap()).collect();
        assert_eq!(octets.len(), 4);
        assert!(octets.iter().all(|o| *o <= 255));
    }

    #[test]
    fn test_sentence() {
        let mut rng = StdRng::seed_from_u64(42);
        let s = sentence(&mut rng);
        assert!(s.ends_with('.'));
        assert!(s.chars().next().unwrap().is_ascii_uppercase());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("héllo".to_string(), 2), "hé");
        assert_eq!(truncate_chars("abc".to_string(), 10), "abc");
    }
}
