//! Longest-Prefix-Match-Aufgaben: eine Ziel-IP, vier Routingeinträge,
//! genau ein längster Match.

use rand::seq::SliceRandom;
use rand::Rng;
use std::net::Ipv4Addr;
use tracing::debug;

use crate::netgen::{
    confusing_network, random_ip, similar_non_matching_network, unique_network_fallback,
    DuplicateChecker, NetworkEntry,
};
use crate::subnet::{ip_belongs_to_network, na_unchecked};

const POSSIBLE_CIDRS: [u8; 4] = [16, 20, 24, 28];

/// Wahrscheinlichkeit, dass die Default-Route die richtige Antwort ist.
const DEFAULT_ROUTE_CORRECT_P: f64 = 0.2;
/// Wahrscheinlichkeit, dass die Default-Route als Köder auftaucht.
const DEFAULT_ROUTE_DECOY_P: f64 = 0.4;

/// Ergebnis einer Longest-Match-Generierung: richtiger Eintrag, drei Köder
/// und die fertig gerenderte Begründung.
#[derive(Debug, Clone)]
pub struct LongestMatchNetworks {
    pub target_ip: Ipv4Addr,
    pub correct: NetworkEntry,
    pub decoys: Vec<NetworkEntry>,
    pub explanation: String,
}

fn default_route() -> NetworkEntry {
    NetworkEntry::new(Ipv4Addr::new(0, 0, 0, 0), 0)
}

fn pick_cidr(rng: &mut impl Rng) -> u8 {
    *POSSIBLE_CIDRS.choose(rng).unwrap_or(&24)
}

/// Baut die Routingtabelle für eine Ziel-IP. Entweder ist die Default-Route
/// die richtige Antwort (kein anderer Eintrag passt), oder ein konkretes
/// Netz gewinnt als längster Match.
pub fn longest_match_networks(rng: &mut impl Rng, target_ip: Ipv4Addr) -> LongestMatchNetworks {
    if rng.gen_bool(DEFAULT_ROUTE_CORRECT_P) {
        return default_route_case(rng, target_ip);
    }

    let correct_cidr = pick_cidr(rng);
    let correct = NetworkEntry::new(na_unchecked(target_ip, correct_cidr), correct_cidr);

    let mut decoys: Vec<NetworkEntry> = Vec::with_capacity(3);
    if rng.gen_bool(DEFAULT_ROUTE_DECOY_P) {
        decoys.push(default_route());
    }

    fill_decoys(rng, target_ip, correct, &mut decoys);

    // Ohne mindestens einen nicht passenden Eintrag wäre die Frage entartet:
    // jeder Eintrag enthielte die Ziel-IP.
    let has_non_matching = decoys
        .iter()
        .any(|entry| !ip_belongs_to_network(target_ip, entry.network, entry.cidr));
    if !has_non_matching && !decoys.is_empty() {
        let mut parts = target_ip.octets();
        parts[0] = parts[0].wrapping_add(100);
        let replacement = na_unchecked(Ipv4Addr::from(parts), 24);
        debug!(%target_ip, "alle koeder passen, ersetze letzten eintrag");
        let last = decoys.len() - 1;
        decoys[last] = NetworkEntry::new(replacement, 24);
    }

    decoys.truncate(3);
    let explanation = render_explanation(target_ip, correct, &decoys);

    LongestMatchNetworks {
        target_ip,
        correct,
        decoys,
        explanation,
    }
}

fn default_route_case(rng: &mut impl Rng, target_ip: Ipv4Addr) -> LongestMatchNetworks {
    let correct = default_route();
    let mut decoys: Vec<NetworkEntry> = Vec::with_capacity(3);

    for i in 0..3u8 {
        let cidr = pick_cidr(rng);
        let mut parts = target_ip.octets();
        parts[0] = parts[0].wrapping_add(100 + i * 50);
        let network = na_unchecked(Ipv4Addr::from(parts), cidr);

        if !ip_belongs_to_network(target_ip, network, cidr) {
            decoys.push(NetworkEntry::new(network, cidr));
        } else {
            decoys.push(NetworkEntry::new(
                Ipv4Addr::new(10 + i, 20 + i, 30 + i, 0),
                24,
            ));
        }
    }

    let explanation = render_explanation(target_ip, correct, &decoys);
    LongestMatchNetworks {
        target_ip,
        correct,
        decoys,
        explanation,
    }
}

/// Füllt die Köderplätze in fester Reihenfolge: erst ein kürzerer Präfix
/// derselben Ziel-IP, dann verwechselbare und ähnliche Netze, dann
/// Zufallsnetze, zuletzt der deterministische Ausweichpfad. Jeder Kandidat
/// läuft gegen den [`DuplicateChecker`].
fn fill_decoys(
    rng: &mut impl Rng,
    target_ip: Ipv4Addr,
    correct: NetworkEntry,
    decoys: &mut Vec<NetworkEntry>,
) {
    let mut checker = DuplicateChecker::new(correct, decoys);

    if decoys.len() < 3 {
        for cidr in POSSIBLE_CIDRS.iter().copied().filter(|c| *c < correct.cidr) {
            if decoys.len() >= 3 {
                break;
            }
            let network = na_unchecked(target_ip, cidr);
            if !checker.is_duplicate(network, cidr) {
                decoys.push(NetworkEntry::new(network, cidr));
                checker.add_network(network, cidr);
                // nur ein kürzerer Eintrag
                break;
            }
        }
    }

    let mut attempts = 0;
    while decoys.len() < 3 && attempts < 200 {
        let cidr = pick_cidr(rng);

        if cidr > correct.cidr {
            if let Some(network) = confusing_network(rng, target_ip, cidr, correct.cidr) {
                if !ip_belongs_to_network(target_ip, network, cidr)
                    && !checker.is_duplicate(network, cidr)
                {
                    decoys.push(NetworkEntry::new(network, cidr));
                    checker.add_network(network, cidr);
                    attempts += 1;
                    continue;
                }
            }
        }

        let similar = similar_non_matching_network(rng, target_ip, cidr);
        if !checker.is_duplicate(similar, cidr) {
            decoys.push(NetworkEntry::new(similar, cidr));
            checker.add_network(similar, cidr);
        }
        attempts += 1;
    }

    let mut fallback_attempts = 0;
    while decoys.len() < 3 && fallback_attempts < 100 {
        let cidr = pick_cidr(rng);
        let network = na_unchecked(random_ip(rng), cidr);
        if !checker.is_duplicate(network, cidr) {
            decoys.push(NetworkEntry::new(network, cidr));
            checker.add_network(network, cidr);
        }
        fallback_attempts += 1;
    }

    while decoys.len() < 3 {
        debug!(%target_ip, "koedersuche erschoepft, nehme ausweichnetz");
        let entry = unique_network_fallback(&checker, &POSSIBLE_CIDRS);
        decoys.push(entry);
        checker.add_network(entry.network, entry.cidr);
    }
}

/// Zeile pro Eintrag mit Match-Symbol, danach die Begründung des
/// Routing-Entscheids.
fn render_explanation(
    target_ip: Ipv4Addr,
    correct: NetworkEntry,
    decoys: &[NetworkEntry],
) -> String {
    let mut text = format!("Richtige Antwort: {}\n", correct);
    text.push_str("Routing-Entscheidung:\n");
    text.push_str(&format!("  {} → ○ (längster Match)\n", correct));

    for entry in decoys {
        let matches = ip_belongs_to_network(target_ip, entry.network, entry.cidr);
        text.push_str(&format!(
            "  {} → {}\n",
            entry,
            if matches { "○" } else { "×" }
        ));
    }

    if correct == default_route() {
        text.push_str("\nKein spezifischeres Netz passt auf die Ziel-IP, ");
        text.push_str("also greift die Default-Route 0.0.0.0/0. Sie passt auf jede Adresse.");
    } else {
        text.push_str("\nPassen mehrere Netze, gewinnt das spezifischste, ");
        text.push_str("also das mit dem größten CIDR-Wert.");
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn immer_drei_eindeutige_koeder() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..300 {
            let target = random_ip(&mut rng);
            let result = longest_match_networks(&mut rng, target);

            assert_eq!(result.target_ip, target);
            assert_eq!(result.decoys.len(), 3);

            let mut entries = vec![result.correct];
            entries.extend(&result.decoys);
            for i in 0..entries.len() {
                for j in (i + 1)..entries.len() {
                    assert_ne!(entries[i], entries[j], "ziel {}", target);
                }
            }
        }
    }

    #[test]
    fn mindestens_ein_koeder_passt_nicht() {
        let mut rng = StdRng::seed_from_u64(43);
        for _ in 0..300 {
            let target = random_ip(&mut rng);
            let result = longest_match_networks(&mut rng, target);

            assert!(result
                .decoys
                .iter()
                .any(|e| !ip_belongs_to_network(target, e.network, e.cidr)));
        }
    }

    #[test]
    fn korrekter_eintrag_passt_immer() {
        let mut rng = StdRng::seed_from_u64(44);
        for _ in 0..300 {
            let target = random_ip(&mut rng);
            let result = longest_match_networks(&mut rng, target);
            assert!(ip_belongs_to_network(
                target,
                result.correct.network,
                result.correct.cidr
            ));
        }
    }

    #[test]
    fn korrekter_eintrag_ist_laengster_match() {
        let mut rng = StdRng::seed_from_u64(45);
        for _ in 0..300 {
            let target = random_ip(&mut rng);
            let result = longest_match_networks(&mut rng, target);

            for entry in &result.decoys {
                if ip_belongs_to_network(target, entry.network, entry.cidr) {
                    assert!(
                        entry.cidr < result.correct.cidr,
                        "koeder {} schlaegt {} fuer ziel {}",
                        entry,
                        result.correct,
                        target
                    );
                }
            }
        }
    }

    #[test]
    fn beide_faelle_kommen_vor() {
        let mut rng = StdRng::seed_from_u64(46);
        let mut default_correct = 0;
        let mut specific_correct = 0;

        for _ in 0..200 {
            let target = random_ip(&mut rng);
            let result = longest_match_networks(&mut rng, target);
            if result.correct == default_route() {
                default_correct += 1;
            } else {
                specific_correct += 1;
            }
        }

        assert!(default_correct > 0);
        assert!(specific_correct > 0);
    }

    #[test]
    fn default_fall_hat_nur_nicht_passende_koeder() {
        let mut rng = StdRng::seed_from_u64(47);
        for _ in 0..200 {
            let target = random_ip(&mut rng);
            let result = longest_match_networks(&mut rng, target);
            if result.correct != default_route() {
                continue;
            }

            for entry in &result.decoys {
                assert!(!ip_belongs_to_network(target, entry.network, entry.cidr));
            }
            assert!(result.explanation.contains("Default-Route"));
        }
    }

    #[test]
    fn begruendung_fuehrt_alle_eintraege_auf() {
        let mut rng = StdRng::seed_from_u64(48);
        let target = random_ip(&mut rng);
        let result = longest_match_networks(&mut rng, target);

        assert!(result
            .explanation
            .contains(&format!("{} → ○ (längster Match)", result.correct)));
        for entry in &result.decoys {
            assert!(result.explanation.contains(&entry.to_string()));
        }
    }
}
