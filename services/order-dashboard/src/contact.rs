//! Customer contact links

/// Messaging deep link for a phone number. The phone is used verbatim.
pub fn contact_link(link_base: &str, phone: &str) -> String {
    format!("{}/{}", link_base.trim_end_matches('/'), phone)
}
