//! Durchstich über die öffentliche Schnittstelle: von der Frageart bis zur
//! fertigen Frage, mit gesätem Zufall.

use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use std::net::Ipv4Addr;

use ipquizgenerator::choice::{wrong_choices, ChoiceKind};
use ipquizgenerator::codec::{binary_to_ip, cidr_from_sn, ip_to_binary, sn_from_cidr};
use ipquizgenerator::netgen::random_ip;
use ipquizgenerator::subnet::{
    bc_from_ip_and_cidr, host_count, ip_belongs_to_network, na_from_ip_and_cidr,
};
use ipquizgenerator::{generate_quiz_question, NetError, QuestionKind};

#[test]
fn binaerdarstellung_roundtrip() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..500 {
        let ip = random_ip(&mut rng).to_string();
        assert_eq!(binary_to_ip(&ip_to_binary(&ip).unwrap()).unwrap(), ip);
    }
}

#[test]
fn maske_und_cidr_sind_invers() {
    for cidr in 0..=32u8 {
        let mask = sn_from_cidr(cidr).unwrap();
        assert_eq!(cidr_from_sn(&mask.to_string()).unwrap(), cidr);
    }
}

#[test]
fn subnetzrechnung_szenario() {
    let ip: Ipv4Addr = "192.168.1.100".parse().unwrap();
    assert_eq!(
        na_from_ip_and_cidr(ip, 24).unwrap().to_string(),
        "192.168.1.0"
    );
    assert_eq!(
        bc_from_ip_and_cidr(ip, 24).unwrap().to_string(),
        "192.168.1.255"
    );
    assert_eq!(host_count(24).unwrap(), 254);

    assert_eq!(sn_from_cidr(24).unwrap().to_string(), "255.255.255.0");
    assert_eq!(sn_from_cidr(30).unwrap().to_string(), "255.255.255.252");

    assert_eq!(
        cidr_from_sn("255.255.255.1"),
        Err(NetError::InvalidMask("255.255.255.1".to_owned()))
    );
}

#[test]
fn distraktoren_bleiben_eindeutig() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..1000 {
        let wrong = wrong_choices(&mut rng, "192.168.1.1", ChoiceKind::Ip);
        assert_eq!(wrong.len(), 3);
        assert!(!wrong.contains(&"192.168.1.1".to_owned()));
        let mut dedup = wrong.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), 3);
    }
}

#[test]
fn jede_frageart_liefert_vier_eindeutige_antworten() {
    let mut rng = StdRng::seed_from_u64(3);
    for kind in QuestionKind::ALL {
        for _ in 0..50 {
            let question = generate_quiz_question(&mut rng, kind);
            assert_eq!(question.kind, kind);
            assert_eq!(question.choices.len(), 4);
            assert!(question.correct_answer < 4);
            assert!(!question.explanation.is_empty());

            let mut dedup = question.choices.clone();
            dedup.sort_unstable();
            dedup.dedup();
            assert_eq!(dedup.len(), 4, "duplikate bei {}: {:?}", kind, question.choices);
        }
    }
}

#[test]
fn longest_match_fragen_sind_wohlgeformt() {
    let entry_re = Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}/\d{1,2}$").unwrap();
    let target_re = Regex::new(r"Ziel-IP (\d+\.\d+\.\d+\.\d+)").unwrap();

    let mut rng = StdRng::seed_from_u64(4);
    let mut default_correct = 0;
    let mut specific_correct = 0;

    for _ in 0..150 {
        let question = generate_quiz_question(&mut rng, QuestionKind::LongestMatch);
        let target: Ipv4Addr = target_re.captures(&question.question).unwrap()[1]
            .parse()
            .unwrap();

        for choice in &question.choices {
            assert!(entry_re.is_match(choice), "kein netz/cidr: {}", choice);
        }

        if question.choices[question.correct_answer] == "0.0.0.0/0" {
            default_correct += 1;
        } else {
            specific_correct += 1;
        }

        // mindestens ein Eintrag darf die Ziel-IP nicht enthalten
        let non_matching = question.choices.iter().any(|choice| {
            let (network, cidr) = choice.split_once('/').unwrap();
            let network: Ipv4Addr = network.parse().unwrap();
            let cidr: u8 = cidr.parse().unwrap();
            !ip_belongs_to_network(target, network, cidr)
        });
        assert!(non_matching, "alle eintraege passen: {:?}", question.choices);
    }

    // statistisch: beide Zweige tauchen über 150 Fragen auf
    assert!(default_correct > 0);
    assert!(specific_correct > 0);
}

#[test]
fn unbekannte_frageart_wird_abgelehnt() {
    let err = "ipv6-routing".parse::<QuestionKind>().unwrap_err();
    assert_eq!(
        err,
        NetError::UnknownQuestionType("ipv6-routing".to_owned())
    );
}
