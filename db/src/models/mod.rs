pub mod assignment_entry;
pub mod client;
pub mod repair_ticket;
pub mod status_history;
pub mod technician_skill;
pub mod user;

pub use assignment_entry::Entity as AssignmentEntry;
pub use client::Entity as Client;
pub use repair_ticket::Entity as RepairTicket;
pub use status_history::Entity as StatusHistory;
pub use technician_skill::Entity as TechnicianSkill;
pub use user::Entity as User;
