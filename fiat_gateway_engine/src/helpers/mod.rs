mod request_id;

pub use request_id::derive_request_id;
