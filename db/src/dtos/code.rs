use common::misc::AccountType;

/// A freshly generated code that has not been written anywhere yet.
#[derive(Debug, Clone)]
pub struct NewCode {
    pub code_string: String,
    pub account_type: AccountType,
}
