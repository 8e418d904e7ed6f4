pub mod certificates;
pub mod login;
