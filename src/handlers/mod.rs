pub mod beneficiaries;
pub mod health;
pub mod routes;
pub mod session;
pub mod settings;
pub mod statement;
pub mod support;
