use std::net::Ipv4Addr;
use thiserror::Error;

/// Fehler der Adress- und Subnetzrechnung.
///
/// Die Generatoren erzeugen nur gültige Eingaben; taucht hier trotzdem ein
/// Validierungsfehler auf, ist das ein Bug im Generator und kein
/// Laufzeitfall.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    #[error("ungültige IP-Adresse: {0}")]
    InvalidAddress(String),

    #[error("ungültige Binärdarstellung: {0}")]
    InvalidFormat(String),

    #[error("ungültiger CIDR-Wert: {0}")]
    InvalidCidr(u8),

    #[error("ungültige Subnetzmaske: {0}")]
    InvalidMask(String),

    #[error("keine nutzbaren Hostadressen in {0}")]
    NoHostsAvailable(Ipv4Addr),

    #[error("unbekannter Fragetyp: {0}")]
    UnknownQuestionType(String),
}

pub type NetResult<T> = Result<T, NetError>;
