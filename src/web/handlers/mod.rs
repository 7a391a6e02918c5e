pub mod contact;
pub mod status;
