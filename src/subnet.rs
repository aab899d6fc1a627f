//! Netzadresse, Broadcastadresse, Hostbereich und Hostanzahl.
//!
//! Jede Operation gibt es in zwei Varianten: mit CIDR oder mit einer
//! dotted-decimal Subnetzmaske. Die Maskenvariante akzeptiert jede gültige
//! Adresse und rechnet oktettweise; nur [`host_count_from_sn`] verlangt ein
//! lückenloses `1*0*`-Bitmuster.

use std::net::Ipv4Addr;

use crate::codec::{self, MAX_CIDR};
use crate::error::{NetError, NetResult};

pub fn na_from_ip_and_cidr(ip: Ipv4Addr, cidr: u8) -> NetResult<Ipv4Addr> {
    let mask = codec::sn_from_cidr(cidr)?;
    Ok(na_from_ip_and_mask(ip, mask))
}

pub fn na_from_ip_and_sn(ip: Ipv4Addr, sn: &str) -> NetResult<Ipv4Addr> {
    let mask = codec::parse_ip(sn).map_err(|_| NetError::InvalidMask(sn.to_owned()))?;
    Ok(na_from_ip_and_mask(ip, mask))
}

pub fn bc_from_ip_and_cidr(ip: Ipv4Addr, cidr: u8) -> NetResult<Ipv4Addr> {
    let mask = codec::sn_from_cidr(cidr)?;
    Ok(bc_from_ip_and_mask(ip, mask))
}

pub fn bc_from_ip_and_sn(ip: Ipv4Addr, sn: &str) -> NetResult<Ipv4Addr> {
    let mask = codec::parse_ip(sn).map_err(|_| NetError::InvalidMask(sn.to_owned()))?;
    Ok(bc_from_ip_and_mask(ip, mask))
}

fn na_from_ip_and_mask(ip: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) & u32::from(mask))
}

fn bc_from_ip_and_mask(ip: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    let mask = u32::from(mask);
    Ipv4Addr::from((u32::from(ip) & mask) | !mask)
}

// Interne Varianten ohne CIDR-Prüfung; Aufrufer arbeiten mit cidr <= 32.
pub(crate) fn na_unchecked(ip: Ipv4Addr, cidr: u8) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) & codec::sn_from_cidr_u32(cidr))
}

pub(crate) fn bc_unchecked(ip: Ipv4Addr, cidr: u8) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) | !codec::sn_from_cidr_u32(cidr))
}

/// Erste Hostadresse: Netzadresse + 1 im letzten Oktett. Kein Übertrag in
/// höhere Oktette; endet das Netz auf 255, gibt es hier keinen Host.
pub fn min_host(na: Ipv4Addr) -> NetResult<Ipv4Addr> {
    let mut octets = na.octets();
    if octets[3] == 255 {
        return Err(NetError::NoHostsAvailable(na));
    }
    octets[3] += 1;
    Ok(Ipv4Addr::from(octets))
}

/// Letzte Hostadresse: Broadcastadresse - 1 im letzten Oktett, ohne Übertrag.
pub fn max_host(bc: Ipv4Addr) -> NetResult<Ipv4Addr> {
    let mut octets = bc.octets();
    if octets[3] == 0 {
        return Err(NetError::NoHostsAvailable(bc));
    }
    octets[3] -= 1;
    Ok(Ipv4Addr::from(octets))
}

/// Nutzbare Hosts: `2^(32-cidr) - 2`, nie negativ. /31 und /32 haben keine.
pub fn host_count(cidr: u8) -> NetResult<u64> {
    if cidr > MAX_CIDR {
        return Err(NetError::InvalidCidr(cidr));
    }
    let host_bits = MAX_CIDR - cidr;
    if host_bits <= 1 {
        return Ok(0);
    }
    Ok((1u64 << host_bits) - 2)
}

pub fn host_count_from_sn(sn: &str) -> NetResult<u64> {
    host_count(codec::cidr_from_sn(sn)?)
}

/// Eine Adresse gehört zum Netz, wenn ihre Netzadresse unter `cidr` exakt
/// der angegebenen Netzadresse entspricht.
pub fn ip_belongs_to_network(ip: Ipv4Addr, network: Ipv4Addr, cidr: u8) -> bool {
    match na_from_ip_and_cidr(ip, cidr) {
        Ok(na) => na == network,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ip(text: &str) -> Ipv4Addr {
        text.parse().unwrap()
    }

    #[test]
    fn na_und_bc_klassisches_beispiel() {
        assert_eq!(
            na_from_ip_and_cidr(ip("192.168.1.100"), 24).unwrap(),
            ip("192.168.1.0")
        );
        assert_eq!(
            bc_from_ip_and_cidr(ip("192.168.1.100"), 24).unwrap(),
            ip("192.168.1.255")
        );
    }

    #[test]
    fn na_und_bc_mit_maske() {
        assert_eq!(
            na_from_ip_and_sn(ip("10.20.30.40"), "255.255.0.0").unwrap(),
            ip("10.20.0.0")
        );
        assert_eq!(
            bc_from_ip_and_sn(ip("10.20.30.40"), "255.255.0.0").unwrap(),
            ip("10.20.255.255")
        );
        assert!(matches!(
            na_from_ip_and_sn(ip("10.20.30.40"), "255.255.x.0"),
            Err(NetError::InvalidMask(_))
        ));
    }

    #[test]
    fn na_bc_randfaelle() {
        assert_eq!(na_from_ip_and_cidr(ip("1.2.3.4"), 0).unwrap(), ip("0.0.0.0"));
        assert_eq!(
            bc_from_ip_and_cidr(ip("1.2.3.4"), 0).unwrap(),
            ip("255.255.255.255")
        );
        assert_eq!(na_from_ip_and_cidr(ip("1.2.3.4"), 32).unwrap(), ip("1.2.3.4"));
        assert_eq!(bc_from_ip_and_cidr(ip("1.2.3.4"), 32).unwrap(), ip("1.2.3.4"));
        assert_eq!(
            na_from_ip_and_cidr(ip("1.2.3.4"), 33),
            Err(NetError::InvalidCidr(33))
        );
    }

    #[test]
    fn hostbereich() {
        assert_eq!(min_host(ip("192.168.1.0")).unwrap(), ip("192.168.1.1"));
        assert_eq!(max_host(ip("192.168.1.255")).unwrap(), ip("192.168.1.254"));
    }

    #[test]
    fn hostbereich_ohne_hosts() {
        assert_eq!(
            min_host(ip("10.0.0.255")),
            Err(NetError::NoHostsAvailable(ip("10.0.0.255")))
        );
        assert_eq!(
            max_host(ip("10.0.0.0")),
            Err(NetError::NoHostsAvailable(ip("10.0.0.0")))
        );
    }

    #[test]
    fn host_count_grenzen() {
        assert_eq!(host_count(31).unwrap(), 0);
        assert_eq!(host_count(32).unwrap(), 0);
        assert_eq!(host_count(0).unwrap(), 4_294_967_294);
        assert_eq!(host_count(24).unwrap(), 254);
        assert_eq!(host_count(30).unwrap(), 2);
        assert_eq!(host_count(33), Err(NetError::InvalidCidr(33)));
    }

    #[test]
    fn host_count_aus_maske() {
        assert_eq!(host_count_from_sn("255.255.255.0").unwrap(), 254);
        assert!(matches!(
            host_count_from_sn("255.255.255.1"),
            Err(NetError::InvalidMask(_))
        ));
    }

    #[test]
    fn zugehoerigkeit() {
        assert!(ip_belongs_to_network(ip("192.168.1.100"), ip("192.168.1.0"), 24));
        assert!(!ip_belongs_to_network(ip("192.168.2.100"), ip("192.168.1.0"), 24));
        // Default-Route passt auf alles
        assert!(ip_belongs_to_network(ip("8.8.8.8"), ip("0.0.0.0"), 0));
        // Netzadresse muss exakt stimmen, nicht nur enthalten sein
        assert!(!ip_belongs_to_network(ip("192.168.1.100"), ip("192.168.1.64"), 24));
    }
}
