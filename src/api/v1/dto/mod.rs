pub mod alerts;
pub mod token;
