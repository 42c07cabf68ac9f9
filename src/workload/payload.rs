use rand::Rng;
use rand::distributions::Alphanumeric;
use serde_json::{Map, Value, json};

use crate::runner::{Action, Request};

/// Length of the random reference attached to each inserted log.
pub const REFERENCE_LEN: usize = 10;

#[must_use]
pub fn generate_reference<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..REFERENCE_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

/// Insert request for one log entry keyed by `reference`.
#[must_use]
pub fn insert_request(reference: &str) -> Request {
    let mut payload = Map::new();
    payload.insert("reference".to_owned(), Value::String(reference.to_owned()));
    payload.insert(
        "metadata".to_owned(),
        json!({
            "event": format!("test_event_{}", reference),
            "details": format!("This is test log entry {}", reference),
        }),
    );
    Request::new(Action::Insert, payload)
}

#[must_use]
pub fn query_all_request() -> Request {
    Request::new(Action::QueryAll, Map::new())
}

#[must_use]
pub fn insert_requests<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Request> {
    (0..count)
        .map(|_| insert_request(&generate_reference(rng)))
        .collect()
}
