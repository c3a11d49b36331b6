pub mod envelope;
pub mod gain;
