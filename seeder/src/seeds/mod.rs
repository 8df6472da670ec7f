pub mod client;
pub mod staff;
pub mod ticket;
