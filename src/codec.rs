//! Bit-Ebene: IP <-> Binärdarstellung, CIDR <-> Subnetzmaske.

use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv4Addr;

use crate::error::{NetError, NetResult};

pub const MAX_CIDR: u8 = 32;

lazy_static! {
    static ref IP_RE: Regex = Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").unwrap();
    static ref BINARY_RE: Regex =
        Regex::new(r"^[01]{8}\.[01]{8}\.[01]{8}\.[01]{8}$").unwrap();
}

/// Parst eine dotted-decimal Adresse. Führende Nullen sind erlaubt
/// (`192.168.00.005`), der std-Parser lehnt die ab.
pub fn parse_ip(text: &str) -> NetResult<Ipv4Addr> {
    if !IP_RE.is_match(text) {
        return Err(NetError::InvalidAddress(text.to_owned()));
    }

    let mut octets = [0u8; 4];
    for (idx, part) in text.split('.').enumerate() {
        octets[idx] = part
            .parse()
            .map_err(|_| NetError::InvalidAddress(text.to_owned()))?;
    }
    Ok(Ipv4Addr::from(octets))
}

/// IP-Adresse als vier 8-Bit-Gruppen, z.B. `11000000.10101000.00000001.00000001`.
pub fn ip_to_binary(text: &str) -> NetResult<String> {
    Ok(binary_from_ip(parse_ip(text)?))
}

pub fn binary_from_ip(ip: Ipv4Addr) -> String {
    let groups: Vec<String> = ip.octets().iter().map(|o| format!("{:08b}", o)).collect();
    groups.join(".")
}

/// Umkehrung von [`ip_to_binary`]; verlangt exakt vier 8-stellige Gruppen.
pub fn binary_to_ip(text: &str) -> NetResult<String> {
    if !BINARY_RE.is_match(text) {
        return Err(NetError::InvalidFormat(text.to_owned()));
    }

    let octets: Vec<String> = text
        .split('.')
        .map(|part| {
            u8::from_str_radix(part, 2)
                .map(|o| o.to_string())
                .map_err(|_| NetError::InvalidFormat(text.to_owned()))
        })
        .collect::<NetResult<_>>()?;
    Ok(octets.join("."))
}

// Shift über u64, damit cidr = 0 nicht im 32-Bit-Shift hängen bleibt.
pub(crate) fn sn_from_cidr_u32(cidr: u8) -> u32 {
    debug_assert!(cidr <= MAX_CIDR);
    let right = u64::from(MAX_CIDR - cidr.min(MAX_CIDR));
    (((u32::MAX as u64) >> right) << right) as u32
}

pub fn sn_from_cidr(cidr: u8) -> NetResult<Ipv4Addr> {
    if cidr > MAX_CIDR {
        return Err(NetError::InvalidCidr(cidr));
    }
    Ok(Ipv4Addr::from(sn_from_cidr_u32(cidr)))
}

/// Liest den CIDR aus einer Subnetzmaske. Masken mit Lücken im Bitmuster
/// (`255.255.255.1`) sind keine Subnetzmasken.
pub fn cidr_from_sn(text: &str) -> NetResult<u8> {
    let mask = parse_ip(text).map_err(|_| NetError::InvalidMask(text.to_owned()))?;
    let bits = u32::from(mask);

    let cidr = bits.leading_ones() as u8;
    if bits != sn_from_cidr_u32(cidr) {
        return Err(NetError::InvalidMask(text.to_owned()));
    }
    Ok(cidr)
}
