pub mod backends;
pub mod channel;
