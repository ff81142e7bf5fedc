//! Builders for identifiers and records

use eventlens_core::{Address, AddressId, Event, Record, UserId};

/// Build a [`Record`] from `key => value` pairs, keeping their order.
///
/// ```rust,ignore
/// let detail = record! { "id" => 7, "type" => "login", "ip" => "10.0.0.1" };
/// ```
#[macro_export]
macro_rules! record {
    () => {
        $crate::__record_new()
    };
    ($($key:expr => $value:tt),+ $(,)?) => {{
        let mut record = $crate::__record_new();
        $(record.insert($key, $crate::serde_json::json!($value));)+
        record
    }};
}

#[doc(hidden)]
pub fn __record_new() -> Record {
    Record::new()
}

/// A user id. Panics on a blank id.
pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// An address id. Panics on a blank id.
pub fn address_id(id: &str) -> AddressId {
    AddressId::new(id).expect("valid address id")
}

/// A live address with no extra fields.
pub fn address(id: &str) -> Address {
    Address::new(address_id(id))
}

/// A soft-deleted address.
pub fn deleted_address(id: &str) -> Address {
    Address {
        deleted: true,
        ..address(id)
    }
}

/// An event with a type and timestamp.
pub fn event(kind: &str, created_at: &str) -> Event {
    let mut fields = Record::new();
    fields.insert("type", kind);
    fields.insert("created_at", created_at);
    Event::new(fields)
}

/// The full detail record of `event`: its listed fields plus `extra`.
pub fn detail_of(event: &Event, extra: Record) -> Record {
    event
        .fields()
        .iter()
        .chain(extra.iter())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_macro_keeps_order() {
        let r = record! { "z" => 1, "a" => "two", "m" => [1, 2] };
        let keys: Vec<_> = r.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(r.get_str("a"), Some("two"));
    }

    #[test]
    fn test_detail_is_superset_of_event() {
        let e = event("login", "2024-01-01");
        let d = detail_of(&e, record! { "ip" => "10.0.0.1" });
        assert!(d.contains_all(e.fields()));
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn test_deleted_address() {
        assert!(deleted_address("a1").deleted);
        assert!(!address("a1").deleted);
    }
}
