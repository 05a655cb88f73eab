pub mod activities;
pub mod status;
