pub mod accounts;
pub mod friends;
pub mod messages;
