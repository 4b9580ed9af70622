use crate::domain::models::Identity;

/// Normalizes one allowed-signer entry or identity part for comparison:
/// surrounding `<…>` dropped, whitespace collapsed, lowercased.
pub fn canonical_signer_id(raw: &str) -> String {
    let s = raw.trim();
    let s = s
        .strip_prefix('<')
        .and_then(|r| r.strip_suffix('>'))
        .unwrap_or(s);
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// An allowed entry of the form `Name <email>` matches on its email part.
fn allowed_email(allowed: &str) -> Option<String> {
    let open = allowed.rfind('<')?;
    let close = allowed[open..].find('>')? + open;
    Some(canonical_signer_id(&allowed[open + 1..close]))
}

pub fn signer_matches_allowed(identity: &Identity, allowed: &str) -> bool {
    let entry = allowed_email(allowed).unwrap_or_else(|| canonical_signer_id(allowed));
    if entry.is_empty() {
        return false;
    }
    let email = canonical_signer_id(&identity.email);
    let name = canonical_signer_id(&identity.name);
    (!email.is_empty() && email == entry) || (!name.is_empty() && name == entry)
}

pub fn signer_is_allowed(identity: &Identity, allowed: &[String]) -> bool {
    allowed.iter().any(|a| signer_matches_allowed(identity, a))
}
