//! Erzeugt die fertigen Quizfragen aus den Generator-Bausteinen.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use crate::choice::{
    random_cidr, shuffle_choices, unique_cidr_choices, unique_sn_choices, wrong_choices,
    ChoiceKind, FallbackShape,
};
use crate::codec::{binary_from_ip, sn_from_cidr_u32};
use crate::error::NetError;
use crate::longest::longest_match_networks;
use crate::netgen::{host_ip_in_network, random_ip};
use crate::subnet::{bc_unchecked, host_count, ip_belongs_to_network, na_unchecked};
use std::net::Ipv4Addr;

/// Die acht Fragearten. Die String-Kennungen sind die stabile Schnittstelle
/// nach außen (Themenauswahl, CLI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionKind {
    BinaryConversion,
    CidrToMask,
    MaskToCidr,
    NetworkAddress,
    BroadcastAddress,
    HostCount,
    HostInNetwork,
    LongestMatch,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 8] = [
        QuestionKind::BinaryConversion,
        QuestionKind::CidrToMask,
        QuestionKind::MaskToCidr,
        QuestionKind::NetworkAddress,
        QuestionKind::BroadcastAddress,
        QuestionKind::HostCount,
        QuestionKind::HostInNetwork,
        QuestionKind::LongestMatch,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            QuestionKind::BinaryConversion => "binary",
            QuestionKind::CidrToMask => "cidr-to-mask",
            QuestionKind::MaskToCidr => "mask-to-cidr",
            QuestionKind::NetworkAddress => "network-address",
            QuestionKind::BroadcastAddress => "broadcast-address",
            QuestionKind::HostCount => "host-count",
            QuestionKind::HostInNetwork => "host-in-network",
            QuestionKind::LongestMatch => "longest-match",
        }
    }

    /// Anzeigename für Menüs und Überschriften.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::BinaryConversion => "Binärumwandlung",
            QuestionKind::CidrToMask => "CIDR zu Subnetzmaske",
            QuestionKind::MaskToCidr => "Subnetzmaske zu CIDR",
            QuestionKind::NetworkAddress => "Netzadresse",
            QuestionKind::BroadcastAddress => "Broadcastadresse",
            QuestionKind::HostCount => "Hostanzahl",
            QuestionKind::HostInNetwork => "Host im Netz",
            QuestionKind::LongestMatch => "Longest Prefix Match",
        }
    }

    pub fn random(rng: &mut impl Rng) -> QuestionKind {
        *QuestionKind::ALL.choose(rng).unwrap_or(&QuestionKind::BinaryConversion)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for QuestionKind {
    type Err = NetError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        QuestionKind::ALL
            .into_iter()
            .find(|kind| kind.id() == text)
            .ok_or_else(|| NetError::UnknownQuestionType(text.to_owned()))
    }
}

/// Eine fertige Frage: Text, vier paarweise verschiedene Antworten, Index
/// der richtigen Antwort und eine ausgearbeitete Erklärung.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub kind: QuestionKind,
    pub question: String,
    pub choices: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
}

/// Erzeugt eine Frage der gewünschten Art. Total: für jeden `QuestionKind`
/// kommt immer eine gültige Frage heraus, Distraktor-Engpässe fängt die
/// Ausweichsynthese ab.
pub fn generate_quiz_question(rng: &mut impl Rng, kind: QuestionKind) -> QuizQuestion {
    match kind {
        QuestionKind::BinaryConversion => {
            let ip = random_ip(rng);
            let binary = binary_from_ip(ip);

            if rng.gen_bool(0.5) {
                let correct = ip.to_string();
                let wrong = wrong_choices(rng, &correct, ChoiceKind::Ip);
                let shuffled = shuffle_choices(rng, &correct, wrong, FallbackShape::Default);
                QuizQuestion {
                    kind,
                    question: format!(
                        "Wandle die Binärdarstellung {} in eine IP-Adresse um",
                        binary
                    ),
                    choices: shuffled.choices,
                    correct_answer: shuffled.correct_index,
                    explanation: format!("{} entspricht der IP-Adresse {}", binary, ip),
                }
            } else {
                let wrong = wrong_choices(rng, &binary, ChoiceKind::Binary);
                let shuffled = shuffle_choices(rng, &binary, wrong, FallbackShape::Default);
                QuizQuestion {
                    kind,
                    question: format!(
                        "Wandle die IP-Adresse {} in die Binärdarstellung um",
                        ip
                    ),
                    choices: shuffled.choices,
                    correct_answer: shuffled.correct_index,
                    explanation: format!("{} in Binärdarstellung ist {}", ip, binary),
                }
            }
        }

        QuestionKind::CidrToMask => {
            let cidr = random_cidr(rng);
            let correct = Ipv4Addr::from(sn_from_cidr_u32(cidr)).to_string();
            let wrong = unique_sn_choices(rng, &correct);
            let shuffled = shuffle_choices(rng, &correct, wrong, FallbackShape::Default);
            QuizQuestion {
                kind,
                question: format!("Welche Subnetzmaske entspricht /{}?", cidr),
                choices: shuffled.choices,
                correct_answer: shuffled.correct_index,
                explanation: format!("/{} entspricht der Subnetzmaske {}", cidr, correct),
            }
        }

        QuestionKind::MaskToCidr => {
            let cidr = random_cidr(rng);
            let mask = Ipv4Addr::from(sn_from_cidr_u32(cidr));
            let correct = format!("/{}", cidr);
            let wrong = unique_cidr_choices(rng, cidr);
            let shuffled = shuffle_choices(rng, &correct, wrong, FallbackShape::Default);
            QuizQuestion {
                kind,
                question: format!("Welcher CIDR-Wert entspricht der Subnetzmaske {}?", mask),
                choices: shuffled.choices,
                correct_answer: shuffled.correct_index,
                explanation: format!("{} entspricht /{}", mask, cidr),
            }
        }

        QuestionKind::NetworkAddress => {
            let ip = random_ip(rng);
            let cidr = random_cidr(rng);
            let correct = na_unchecked(ip, cidr).to_string();
            let wrong = wrong_choices(rng, &correct, ChoiceKind::Ip);
            let shuffled = shuffle_choices(rng, &correct, wrong, FallbackShape::Default);
            QuizQuestion {
                kind,
                question: format!("Bestimme die Netzadresse von {}/{}", ip, cidr),
                choices: shuffled.choices,
                correct_answer: shuffled.correct_index,
                explanation: format!("Die Netzadresse von {}/{} ist {}", ip, cidr, correct),
            }
        }

        QuestionKind::BroadcastAddress => {
            let ip = random_ip(rng);
            let cidr = random_cidr(rng);
            let correct = bc_unchecked(ip, cidr).to_string();
            let wrong = wrong_choices(rng, &correct, ChoiceKind::Ip);
            let shuffled = shuffle_choices(rng, &correct, wrong, FallbackShape::Default);
            QuizQuestion {
                kind,
                question: format!("Bestimme die Broadcastadresse von {}/{}", ip, cidr),
                choices: shuffled.choices,
                correct_answer: shuffled.correct_index,
                explanation: format!("Die Broadcastadresse von {}/{} ist {}", ip, cidr, correct),
            }
        }

        QuestionKind::HostCount => {
            let cidr = random_cidr(rng);
            let count = host_count(cidr).unwrap_or(0);
            let correct = count.to_string();
            let wrong = wrong_choices(rng, &correct, ChoiceKind::Number);
            let shuffled = shuffle_choices(rng, &correct, wrong, FallbackShape::Default);
            QuizQuestion {
                kind,
                question: format!("Wie viele Hosts sind in einem /{}-Subnetz nutzbar?", cidr),
                choices: shuffled.choices,
                correct_answer: shuffled.correct_index,
                explanation: format!(
                    "In einem /{}-Subnetz sind {} Hostadressen nutzbar",
                    cidr, count
                ),
            }
        }

        QuestionKind::HostInNetwork => {
            let base = random_ip(rng);
            // ab /31 gibt es keine Hostadressen mehr, also nur bis /30
            let cidr = rng.gen_range(8..=30);
            let network = na_unchecked(base, cidr);
            let broadcast = bc_unchecked(base, cidr);
            let host = host_ip_in_network(rng, base, cidr);

            let mut other = random_ip(rng);
            for _ in 0..50 {
                if !ip_belongs_to_network(other, network, cidr) {
                    break;
                }
                other = random_ip(rng);
            }

            let correct = host.to_string();
            let wrong = vec![
                network.to_string(),
                broadcast.to_string(),
                other.to_string(),
            ];
            let shuffled = shuffle_choices(rng, &correct, wrong, FallbackShape::Default);
            QuizQuestion {
                kind,
                question: format!(
                    "Welche Adresse ist ein nutzbarer Host im Netz {}/{}?",
                    network, cidr
                ),
                choices: shuffled.choices,
                correct_answer: shuffled.correct_index,
                explanation: format!(
                    "{} liegt im Hostbereich von {}/{}. Netzadresse ({}) und \
                     Broadcastadresse ({}) sind nicht nutzbar.",
                    host, network, cidr, network, broadcast
                ),
            }
        }

        QuestionKind::LongestMatch => {
            let target = random_ip(rng);
            let result = longest_match_networks(rng, target);
            let correct = result.correct.to_string();
            let wrong: Vec<String> = result.decoys.iter().map(|e| e.to_string()).collect();
            let shuffled = shuffle_choices(rng, &correct, wrong, FallbackShape::Network);
            QuizQuestion {
                kind,
                question: format!(
                    "Welches Netz wählt der Router für die Ziel-IP {} (Longest Prefix Match)?",
                    target
                ),
                choices: shuffled.choices,
                correct_answer: shuffled.correct_index,
                explanation: result.explanation,
            }
        }
    }
}
