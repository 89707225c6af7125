//! Static lookup between region display names and the short codes used by
//! the India boundary geometry.

/// Display name -> short code, in the order the map views list them.
pub const STATE_CODES: [(&str, &str); 37] = [
    ("Andaman and Nicobar Islands", "AN"),
    ("Andhra Pradesh", "AP"),
    ("Arunachal Pradesh", "AR"),
    ("Assam", "AS"),
    ("Bihar", "BR"),
    ("Chhattisgarh", "CT"),
    ("Goa", "GA"),
    ("Gujarat", "GJ"),
    ("Haryana", "HR"),
    ("Himachal Pradesh", "HP"),
    ("Jharkhand", "JH"),
    ("Karnataka", "KA"),
    ("Kerala", "KL"),
    ("Madhya Pradesh", "MP"),
    ("Maharashtra", "MH"),
    ("Manipur", "MN"),
    ("Meghalaya", "ML"),
    ("Mizoram", "MZ"),
    ("Nagaland", "NL"),
    ("Odisha", "OD"),
    ("Punjab", "PB"),
    ("Rajasthan", "RJ"),
    ("Sikkim", "SK"),
    ("Tamil Nadu", "TN"),
    ("Telangana", "TS"),
    ("Tripura", "TR"),
    ("Uttarakhand", "UK"),
    ("Uttar Pradesh", "UP"),
    ("West Bengal", "WB"),
    ("Jammu and Kashmir", "JK"),
    ("Ladakh", "LA"),
    ("Lakshadweep", "LD"),
    ("Puducherry", "PY"),
    ("Chandigarh", "CH"),
    ("Dadra and Nagar Haveli", "DN"),
    ("Daman and Diu", "DD"),
    ("Delhi", "DL"),
];

/// Older codes still found in some geometry files.
const LEGACY_CODES: [(&str, &str); 3] = [("OR", "OD"), ("TG", "TS"), ("UT", "UK")];

/// Short code for a display name (exact, case-insensitive match).
pub fn code_for(name: &str) -> Option<&'static str> {
    let name = name.trim();
    STATE_CODES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, c)| *c)
}

/// Normalize a code: uppercase, legacy aliases replaced. `None` if unknown.
pub fn canonical_code(code: &str) -> Option<&'static str> {
    let upper = code.trim().to_ascii_uppercase();
    if let Some((_, current)) = LEGACY_CODES.iter().find(|(old, _)| *old == upper) {
        return Some(*current);
    }
    STATE_CODES
        .iter()
        .find(|(_, c)| *c == upper)
        .map(|(_, c)| *c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<&str> = STATE_CODES.iter().map(|(_, c)| *c).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), STATE_CODES.len());
    }

    #[test]
    fn legacy_codes_resolve() {
        assert_eq!(canonical_code("OR"), Some("OD"));
        assert_eq!(canonical_code("tg"), Some("TS"));
        assert_eq!(canonical_code("UT"), Some("UK"));
        assert_eq!(canonical_code("XX"), None);
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        assert_eq!(code_for("tamil nadu"), Some("TN"));
        assert_eq!(code_for(" Delhi "), Some("DL"));
        assert_eq!(code_for("Atlantis"), None);
    }
}
