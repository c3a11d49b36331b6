pub mod compose;
pub mod fingerprint;
pub mod transitions;
