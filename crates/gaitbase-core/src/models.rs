pub mod measurement;
pub mod patient;
pub mod record;
