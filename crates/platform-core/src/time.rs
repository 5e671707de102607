//! Timestamp helpers. All wire timestamps are RFC 3339 UTC with a
//! trailing `Z`, per the ledger's canonicalization rule.

use chrono::{DateTime, Utc};

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

pub fn to_rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_rfc3339_ends_with_z() {
        assert!(now_rfc3339().ends_with('Z'));
    }
}
