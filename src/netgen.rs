//! Erzeugt Netz-Kandidaten für Distraktoren: ähnlich aussehende Netze, die
//! die Zieladresse trotzdem nicht enthalten.

use rand::Rng;
use std::fmt;
use std::net::Ipv4Addr;
use tracing::debug;

use crate::subnet::{bc_unchecked, ip_belongs_to_network, na_unchecked};

/// Ein Eintrag `netz/cidr`, wie er in Routing-Fragen auftaucht. Gleichheit
/// gilt paarweise über Netz und CIDR, nicht über Enthaltensein.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkEntry {
    pub network: Ipv4Addr,
    pub cidr: u8,
}

impl NetworkEntry {
    pub fn new(network: Ipv4Addr, cidr: u8) -> Self {
        NetworkEntry { network, cidr }
    }
}

impl fmt::Display for NetworkEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.cidr)
    }
}

/// Sammelt die richtige Antwort plus alle schon akzeptierten Distraktoren
/// einer Frage. Lebt nur für eine Generierung.
pub struct DuplicateChecker {
    correct: NetworkEntry,
    existing: Vec<NetworkEntry>,
}

impl DuplicateChecker {
    pub fn new(correct: NetworkEntry, existing: &[NetworkEntry]) -> Self {
        DuplicateChecker {
            correct,
            existing: existing.to_vec(),
        }
    }

    pub fn add_network(&mut self, network: Ipv4Addr, cidr: u8) {
        self.existing.push(NetworkEntry::new(network, cidr));
    }

    pub fn is_duplicate(&self, network: Ipv4Addr, cidr: u8) -> bool {
        let candidate = NetworkEntry::new(network, cidr);
        candidate == self.correct || self.existing.contains(&candidate)
    }

    pub fn existing_networks(&self) -> Vec<NetworkEntry> {
        self.existing.clone()
    }

    pub fn len(&self) -> usize {
        self.existing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.existing.is_empty()
    }
}

pub fn random_ip(rng: &mut impl Rng) -> Ipv4Addr {
    Ipv4Addr::new(rng.gen(), rng.gen(), rng.gen(), rng.gen())
}

/// Verschiebt das Oktett im Netzanteil um einen kleinen Zufallsbetrag, bis
/// ein Netz entsteht, das von der Netzadresse des Ziels abweicht. Nach 50
/// Versuchen fällt die Suche auf ein komplett zufälliges Netz zurück.
pub fn similar_non_matching_network(rng: &mut impl Rng, target: Ipv4Addr, cidr: u8) -> Ipv4Addr {
    let target_na = na_unchecked(target, cidr);
    let mut parts = target.octets();

    for _ in 0..50 {
        if cidr <= 8 {
            parts[0] = parts[0].wrapping_add(rng.gen_range(1..=50));
        } else if cidr <= 16 {
            parts[1] = parts[1].wrapping_add(rng.gen_range(1..=20));
        } else if cidr <= 24 {
            parts[2] = parts[2].wrapping_add(rng.gen_range(1..=10));
        } else {
            // Im letzten Oktett blockweise springen, damit die Subnetzgrenze
            // erhalten bleibt.
            let subnet_size = 1u16 << (32 - cidr);
            let current = (u16::from(parts[3]) / subnet_size) * subnet_size;
            let offset = subnet_size * rng.gen_range(1..=3);

            if current + offset < 256 {
                parts[3] = (current + offset) as u8;
            } else if current >= offset {
                parts[3] = (current - offset) as u8;
            } else {
                parts[2] = parts[2].wrapping_add(rng.gen_range(1..=5));
                parts[3] = 0;
            }
        }

        let candidate = na_unchecked(Ipv4Addr::from(parts), cidr);
        if candidate != target_na {
            return candidate;
        }
    }

    debug!(%target, cidr, "kein aehnliches netz gefunden, nehme zufallsnetz");
    na_unchecked(random_ip(rng), cidr)
}

/// Netz mit längerem Präfix als `base_cidr`, das das Ziel trotzdem nicht
/// enthält. `None`, wenn in 10 Versuchen keins entsteht; der Aufrufer lässt
/// diese Distraktor-Strategie dann aus.
pub fn confusing_network(
    rng: &mut impl Rng,
    target: Ipv4Addr,
    confusing_cidr: u8,
    base_cidr: u8,
) -> Option<Ipv4Addr> {
    if confusing_cidr <= base_cidr {
        return None;
    }

    let base = na_unchecked(target, base_cidr).octets();
    let mut parts = base;
    let mut attempts = 0u8;

    while attempts < 10 {
        if confusing_cidr <= 24 {
            parts[3] = parts[3].wrapping_add(rng.gen_range(1..=64));
        } else {
            let subnet_size = 1i16 << (32 - confusing_cidr);
            parts[3] = ((i16::from(parts[3]) / subnet_size) * subnet_size) as u8;

            let direction = if attempts % 2 == 0 { 1 } else { -1 };
            let offset = i16::from(attempts / 2) + 1;
            let shifted = i16::from(parts[3]) + subnet_size * direction * offset;

            if (0..256).contains(&shifted) {
                parts[3] = shifted as u8;
            } else if attempts < 5 {
                parts[2] = parts[2].wrapping_add(1);
                parts[3] = 0;
            } else {
                attempts += 1;
                continue;
            }
        }

        let candidate = Ipv4Addr::from(parts);
        if !ip_belongs_to_network(target, candidate, confusing_cidr) {
            return Some(candidate);
        }

        parts = base;
        attempts += 1;
    }

    None
}

const FALLBACK_PATTERNS: [Ipv4Addr; 6] = [
    Ipv4Addr::new(10, 0, 0, 0),
    Ipv4Addr::new(172, 16, 0, 0),
    Ipv4Addr::new(192, 168, 0, 0),
    Ipv4Addr::new(203, 0, 113, 0),
    Ipv4Addr::new(198, 51, 100, 0),
    Ipv4Addr::new(192, 0, 2, 0),
];

/// Letzte Instanz der Distraktor-Suche: bekannte Präfixe durchprobieren,
/// danach deterministisch `10.1.0.0, 10.2.0.0, ...` ablaufen. Terminiert
/// bei den hier auftretenden Registergrößen immer.
pub fn unique_network_fallback(checker: &DuplicateChecker, possible_cidrs: &[u8]) -> NetworkEntry {
    for base in FALLBACK_PATTERNS {
        for &cidr in possible_cidrs {
            if !checker.is_duplicate(base, cidr) {
                return NetworkEntry::new(base, cidr);
            }
        }
    }

    for counter in 1..255u8 {
        let network = Ipv4Addr::new(10, counter, 0, 0);
        for &cidr in possible_cidrs {
            if !checker.is_duplicate(network, cidr) {
                return NetworkEntry::new(network, cidr);
            }
        }
    }

    debug!("fallback-praefixe erschoepft");
    NetworkEntry::new(Ipv4Addr::new(10, 255, 255, 0), 24)
}

/// Gleichverteilte Hostadresse zwischen Netz- und Broadcastadresse,
/// oktettweise gezogen. Netz- und Broadcastadresse selbst werden verworfen;
/// nach 1000 Versuchen wird deterministisch nachgebessert.
pub fn host_ip_in_network(rng: &mut impl Rng, ip: Ipv4Addr, cidr: u8) -> Ipv4Addr {
    let na_parts = na_unchecked(ip, cidr).octets();
    let bc_parts = bc_unchecked(ip, cidr).octets();

    for _ in 0..1000 {
        let mut host = [0u8; 4];
        for idx in 0..4 {
            host[idx] = if bc_parts[idx] == na_parts[idx] {
                na_parts[idx]
            } else {
                rng.gen_range(na_parts[idx]..=bc_parts[idx])
            };
        }
        if host != na_parts && host != bc_parts {
            return Ipv4Addr::from(host);
        }
    }

    let mut fallback = na_parts;
    if u16::from(na_parts[3]) + 1 < u16::from(bc_parts[3]) {
        fallback[3] = na_parts[3] + 1;
    } else if na_parts[2] < bc_parts[2] {
        fallback[2] = na_parts[2] + 1;
        fallback[3] = 0;
    }
    debug!(%ip, cidr, "hostsuche erschoepft, nehme deterministischen host");
    Ipv4Addr::from(fallback)
}
