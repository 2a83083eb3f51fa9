//! Test data builders.

use jiff::Timestamp;
use tonda::cart::NewItem;

use crate::auth::models::{User, UserUuid};

/// A fixed test instant offset by `ms` milliseconds.
pub(crate) fn at(ms: i64) -> Timestamp {
    Timestamp::from_millisecond(1_700_000_000_000 + ms).expect("valid test timestamp")
}

/// A plain menu margherita, one unit.
pub(crate) fn margherita() -> NewItem {
    NewItem {
        id: "1".to_string(),
        name: "Pizza Margherita".to_string(),
        price: 850,
        quantity: 1,
    }
}

/// A wheel offer line, one unit.
pub(crate) fn wheel_offer(id: &str) -> NewItem {
    NewItem {
        id: id.to_string(),
        name: format!("Offerta {id}"),
        price: 850,
        quantity: 1,
    }
}

/// A registered customer.
pub(crate) fn sample_user() -> User {
    User {
        uuid: UserUuid::new(),
        name: "Marco".to_string(),
        surname: "Bianchi".to_string(),
        email: "a@x.com".to_string(),
        address: None,
        is_chef: false,
    }
}
