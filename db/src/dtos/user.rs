use common::misc::AccountType;

pub struct UserCreateRequest {
    pub email: String,
    pub password_hash: String,
    pub account_type: AccountType,
    pub name: Option<String>,
}
