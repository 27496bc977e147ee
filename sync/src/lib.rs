pub mod routes {
    pub mod admin;
}
pub mod services {
    pub mod codes;
    pub mod users;
}
pub mod dtos {
    pub mod report;
}

pub use services::users::spawn_sync_user;
