pub mod m202510010001_create_users;
pub mod m202510010002_create_technician_skills;
pub mod m202510010003_create_clients;
pub mod m202510010004_create_repair_tickets;
pub mod m202510010005_create_status_history;
pub mod m202510010006_create_assignment_entries;
