//! Reconciliation Predicates
//!
//! Pure classification logic over snapshots of the contact and
//! connection collections. No I/O; the service layer feeds these with
//! whatever the subscriptions last delivered and re-runs them on every
//! change.

use std::collections::HashSet;

use shared::models::{Contact, InboundConnection};

/// A contact is linked iff it holds a plausible platform token:
/// `U`-prefixed and longer than 20 chars.
pub fn is_linked(contact: &Contact) -> bool {
    contact.external_id.starts_with('U') && contact.external_id.len() > 20
}

/// Connections awaiting reconciliation.
///
/// A connection is pending when it is unbound AND its externalId is
/// not already claimed by any contact — a claim excludes the
/// connection regardless of its own `is_bound` flag, so a contact
/// imported out-of-band still clears the inbox entry. Caller order is
/// preserved (upstream delivers newest-first).
pub fn pending_inbox<'a>(
    connections: &'a [InboundConnection],
    contacts: &[Contact],
) -> Vec<&'a InboundConnection> {
    let claimed: HashSet<&str> = contacts
        .iter()
        .filter(|c| is_linked(c))
        .map(|c| c.external_id.as_str())
        .collect();

    connections
        .iter()
        .filter(|c| !c.is_bound && !claimed.contains(c.external_id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_contact(id: &str, external_id: &str) -> Contact {
        Contact {
            id: id.to_string(),
            name: format!("contact_{id}"),
            phone: String::new(),
            address: String::new(),
            external_id: external_id.to_string(),
            external_display_name: String::new(),
            avatar_url: String::new(),
            tags: Vec::new(),
            created_at: 0,
        }
    }

    fn make_connection(id: &str, external_id: &str, is_bound: bool) -> InboundConnection {
        InboundConnection {
            id: id.to_string(),
            external_id: external_id.to_string(),
            display_name: format!("user_{id}"),
            avatar_url: String::new(),
            is_bound,
            timestamp: 1_000,
            source: String::new(),
            is_blocked: false,
        }
    }

    const TOKEN: &str = "U0123456789abcdef0123456789abcdef"; // 33 chars

    #[test]
    fn linked_requires_u_prefix_and_length() {
        assert!(is_linked(&make_contact("1", TOKEN)));
        // Exactly 20 chars is not enough; the token must be longer.
        assert!(!is_linked(&make_contact("2", "U0123456789012345678")));
        assert!(!is_linked(&make_contact("3", "")));
        assert!(!is_linked(&make_contact("4", "X0123456789abcdef0123456789")));
    }

    const TOKEN_B: &str = "Ufedcba9876543210fedcba98"; // 25 chars

    #[test]
    fn inbox_excludes_bound_connections() {
        let connections = vec![
            make_connection("a", TOKEN, false),
            make_connection("b", TOKEN_B, true),
        ];
        let inbox = pending_inbox(&connections, &[]);
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].id, "a");
    }

    #[test]
    fn claimed_external_id_clears_inbox_even_when_unbound() {
        // Contact claims the token although the connection never
        // flipped is_bound (e.g. imported out-of-band).
        let connections = vec![make_connection("a", TOKEN, false)];
        let contacts = vec![make_contact("1", TOKEN)];
        assert!(pending_inbox(&connections, &contacts).is_empty());
    }

    #[test]
    fn caller_order_is_preserved() {
        let connections = vec![
            make_connection("newest", "U1", false),
            make_connection("older", "U2", false),
            make_connection("oldest", "U3", false),
        ];
        let inbox = pending_inbox(&connections, &[]);
        let ids: Vec<&str> = inbox.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["newest", "older", "oldest"]);
    }

    #[test]
    fn unrelated_contacts_do_not_claim() {
        let connections = vec![make_connection("a", "Uaaa", false)];
        let contacts = vec![make_contact("1", "Uzzz"), make_contact("2", "")];
        assert_eq!(pending_inbox(&connections, &contacts).len(), 1);
    }
}
