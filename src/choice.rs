//! Distraktor-Synthese und Misch-Logik für die Antwortmöglichkeiten.
//!
//! Alle Funktionen hier sind total: begrenzte Suche nach eindeutigen
//! Werten, danach synthetische Ausweichwerte. Es gibt immer genau drei
//! falsche Antworten, egal wie ungünstig der Zufall läuft.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;
use std::net::Ipv4Addr;
use tracing::debug;

use crate::codec::sn_from_cidr_u32;
use crate::netgen::random_ip;
use crate::subnet::na_unchecked;

/// Form der richtigen Antwort, nach der sich die falschen richten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceKind {
    Ip,
    Binary,
    Number,
}

/// Form der synthetischen Ausweichwerte in [`shuffle_choices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackShape {
    #[default]
    Default,
    Network,
}

#[derive(Debug, Clone)]
pub struct ShuffledChoices {
    pub choices: Vec<String>,
    pub correct_index: usize,
}

const COMMON_CIDRS: [u8; 9] = [8, 16, 24, 25, 26, 27, 28, 29, 30];

pub fn shuffle_array<T: Clone>(rng: &mut impl Rng, items: &[T]) -> Vec<T> {
    let mut shuffled = items.to_vec();
    shuffled.shuffle(rng);
    shuffled
}

pub fn random_binary_ip(rng: &mut impl Rng) -> String {
    crate::codec::binary_from_ip(random_ip(rng))
}

/// CIDR zwischen /8 und /32.
pub fn random_cidr(rng: &mut impl Rng) -> u8 {
    rng.gen_range(8..=32)
}

/// Subnetzmaske zu einem der gängigen CIDR-Werte.
pub fn random_sn(rng: &mut impl Rng) -> Ipv4Addr {
    let cidr = *COMMON_CIDRS.choose(rng).unwrap_or(&24);
    Ipv4Addr::from(sn_from_cidr_u32(cidr))
}

fn token(rng: &mut impl Rng) -> String {
    (0..6).map(|_| rng.sample(Alphanumeric) as char).collect()
}

/// Drei falsche Antworten in derselben Form wie `correct`. Begrenzte Suche
/// nach eindeutigen Zufallswerten; reicht das nicht, werden eindeutige
/// Platzhalter eingesetzt.
pub fn wrong_choices(rng: &mut impl Rng, correct: &str, kind: ChoiceKind) -> Vec<String> {
    let mut wrong: Vec<String> = Vec::with_capacity(3);

    for _ in 0..100 {
        if wrong.len() == 3 {
            break;
        }

        let candidate = match kind {
            ChoiceKind::Ip => random_ip(rng).to_string(),
            ChoiceKind::Binary => random_binary_ip(rng),
            ChoiceKind::Number => {
                let base: u64 = correct.parse().unwrap_or_default();
                let variation = rng.gen_range(1..=100u64);
                if rng.gen_bool(0.5) {
                    (base + variation).to_string()
                } else {
                    base.saturating_sub(variation).to_string()
                }
            }
        };

        if candidate != correct && !wrong.contains(&candidate) {
            wrong.push(candidate);
        }
    }

    while wrong.len() < 3 {
        debug!(correct, "distraktor-suche erschoepft, setze platzhalter");
        let fallback = format!("fallback-{}-{}", wrong.len(), token(rng));
        if fallback != correct && !wrong.contains(&fallback) {
            wrong.push(fallback);
        } else {
            wrong.push(format!("forced-{}-{}", wrong.len(), token(rng)));
        }
    }

    wrong
}

/// Drei Subnetzmasken, die sich von `correct` und untereinander
/// unterscheiden.
pub fn unique_sn_choices(rng: &mut impl Rng, correct: &str) -> Vec<String> {
    let mut wrong: Vec<String> = Vec::with_capacity(3);

    for _ in 0..100 {
        if wrong.len() == 3 {
            break;
        }
        let candidate = random_sn(rng).to_string();
        if candidate != correct && !wrong.contains(&candidate) {
            wrong.push(candidate);
        }
    }

    // Notnagel: feste CIDR-Schrittweite ablaufen, Duplikate auslassen.
    let mut cidr = 8u8;
    while wrong.len() < 3 && cidr <= 32 {
        let candidate = Ipv4Addr::from(sn_from_cidr_u32(cidr)).to_string();
        if candidate != correct && !wrong.contains(&candidate) {
            wrong.push(candidate);
        }
        cidr += 4;
    }

    wrong
}

/// Drei CIDR-Angaben (`/n`) ungleich `correct` und untereinander eindeutig.
pub fn unique_cidr_choices(rng: &mut impl Rng, correct: u8) -> Vec<String> {
    let mut wrong: Vec<String> = Vec::with_capacity(3);

    for _ in 0..100 {
        if wrong.len() == 3 {
            break;
        }
        let candidate_cidr = random_cidr(rng);
        let candidate = format!("/{}", candidate_cidr);
        if candidate_cidr != correct && !wrong.contains(&candidate) {
            wrong.push(candidate);
        }
    }

    let mut cidr = 10u8;
    while wrong.len() < 3 && cidr <= 32 {
        let candidate = format!("/{}", cidr);
        if cidr != correct && !wrong.contains(&candidate) {
            wrong.push(candidate);
        }
        cidr += 5;
    }

    wrong
}

fn shape_fallback(rng: &mut impl Rng, shape: FallbackShape, index: usize) -> String {
    match shape {
        FallbackShape::Network => {
            let cidr = *[8u8, 12, 16, 20, 24, 28].choose(rng).unwrap_or(&24);
            let network = na_unchecked(random_ip(rng), cidr);
            format!("{}/{}", network, cidr)
        }
        FallbackShape::Default => format!("fallback-{}-{}", index, token(rng)),
    }
}

/// Mischt die richtige Antwort mit bis zu drei falschen. Fehlen falsche
/// Antworten, werden sie formgerecht nachsynthetisiert; geht auch das
/// schief, wird nach wenigen Wiederholungen notfalls ein Wert eingesetzt,
/// ohne weitere Duplikatsprüfung.
pub fn shuffle_choices(
    rng: &mut impl Rng,
    correct: &str,
    wrong: Vec<String>,
    shape: FallbackShape,
) -> ShuffledChoices {
    let mut valid: Vec<String> = Vec::with_capacity(3);
    for choice in wrong {
        if valid.len() == 3 {
            break;
        }
        if choice != correct && !valid.contains(&choice) {
            valid.push(choice);
        }
    }

    let mut attempts = 0;
    while valid.len() < 3 && attempts < 50 {
        let fallback = shape_fallback(rng, shape, valid.len());
        if fallback != correct && !valid.contains(&fallback) {
            valid.push(fallback);
        }
        attempts += 1;
    }

    while valid.len() < 3 {
        let mut fallback = shape_fallback(rng, shape, valid.len());
        let mut retries = 0;
        while (fallback == correct || valid.contains(&fallback)) && retries < 3 {
            fallback = shape_fallback(rng, shape, valid.len());
            retries += 1;
        }
        debug!(correct, "erzwinge ausweichwert");
        valid.push(fallback);
    }

    let mut all: Vec<String> = Vec::with_capacity(4);
    all.push(correct.to_owned());
    all.extend(valid);

    let choices = shuffle_array(rng, &all);
    let correct_index = choices
        .iter()
        .position(|c| c == correct)
        .unwrap_or_default();

    ShuffledChoices {
        choices,
        correct_index,
    }
}
