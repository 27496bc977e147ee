pub mod routes {
    pub mod pay;
}
pub mod services {
    pub mod sub;
}
pub mod dtos {
    pub mod pay;
}
