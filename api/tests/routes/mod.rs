mod auth_test;
mod clients_test;
mod health_test;
mod masters_test;
mod pages_test;
mod tickets_test;
mod users_test;
