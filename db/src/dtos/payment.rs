use uuid::Uuid;

pub struct PaymentCreateRequest {
    pub user_id: Uuid,
    pub paystack_reference: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
}
