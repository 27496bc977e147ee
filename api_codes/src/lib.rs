pub mod routes {
    pub mod codes;
}
pub mod services {
    pub mod batch;
    pub mod gen;
    pub mod redeem;
}
pub mod dtos {
    pub mod codes;
}
