//! CSV Export
//!
//! Hand-rolled quoting for the contact export: a field is quoted when
//! it contains a comma, quote, CR or LF, and embedded quotes are
//! doubled. Output starts with a UTF-8 BOM so spreadsheet apps pick
//! the right encoding for CJK text.

use std::borrow::Cow;

use chrono_tz::Tz;
use shared::models::Contact;

use super::address::parse_city_district;
use super::time::local_date;

/// UTF-8 byte order mark, expected by desktop spreadsheet apps.
pub const BOM: &str = "\u{feff}";

/// Quote a single CSV field if needed.
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains(',') || field.contains('"') || field.contains('\r') || field.contains('\n') {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Join fields into one CSV line (no trailing newline).
pub fn write_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| escape_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

const EXPORT_HEADER: &[&str] = &[
    "id",
    "name",
    "phone",
    "externalId",
    "externalDisplayName",
    "tags",
    "address",
    "city",
    "district",
    "createdAt",
];

/// Render the full contact export (header + one row per contact).
///
/// City/district columns come from the address parser; unparsed
/// addresses leave them empty and keep the raw address column.
pub fn export_contacts(contacts: &[Contact], tz: Tz) -> String {
    let mut out = String::with_capacity(64 * (contacts.len() + 1));
    out.push_str(BOM);
    out.push_str(&write_line(EXPORT_HEADER));
    out.push('\n');

    for contact in contacts {
        let parsed = parse_city_district(&contact.address);
        let tags = contact.tags.join(";");
        let created = local_date(contact.created_at, tz)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let row = write_line(&[
            &contact.id,
            &contact.name,
            &contact.phone,
            &contact.external_id,
            &contact.external_display_name,
            &tags,
            &contact.address,
            parsed.city(),
            parsed.district(),
            &created,
        ]);
        out.push_str(&row);
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Taipei;

    fn make_contact(name: &str, address: &str) -> Contact {
        Contact {
            id: "1001".to_string(),
            name: name.to_string(),
            phone: "0912345678".to_string(),
            address: address.to_string(),
            external_id: String::new(),
            external_display_name: String::new(),
            avatar_url: String::new(),
            tags: vec!["vip".to_string(), "referral".to_string()],
            created_at: 1_753_977_600_000, // 2025-08-01 00:00 +08:00
        }
    }

    #[test]
    fn plain_fields_are_not_quoted() {
        assert_eq!(escape_field("hello"), "hello");
        assert_eq!(write_line(&["a", "b", "c"]), "a,b,c");
    }

    #[test]
    fn commas_and_quotes_force_quoting() {
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn export_starts_with_bom_and_header() {
        let contacts = vec![make_contact("王小姐", "台北市大安區和平東路")];
        let csv = export_contacts(&contacts, Taipei);
        assert!(csv.starts_with(BOM));
        let mut lines = csv.trim_start_matches(BOM).lines();
        assert_eq!(lines.next().unwrap().split(',').count(), 10);
        let row = lines.next().unwrap();
        assert!(row.contains("王小姐"));
        assert!(row.contains("台北市"));
        assert!(row.contains("大安區"));
        assert!(row.contains("vip;referral"));
        assert!(row.contains("2025-08-01"));
    }

    #[test]
    fn unparsed_address_leaves_city_columns_empty() {
        let contacts = vec![make_contact("客戶", "overseas")];
        let csv = export_contacts(&contacts, Taipei);
        let row = csv.lines().nth(1).unwrap();
        // ...,overseas,,,2025-08-01
        assert!(row.contains(",overseas,,,"));
    }
}
