#[derive(Debug, Clone, PartialEq, Eq)]
/// Successful reply to a send request.
pub struct SendSmsResponse {
    /// Message ids assigned by the gateway, in the order they were returned.
    pub message_ids: Vec<String>,
    /// Response body as received, trimmed.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Successful reply to a balance inquiry.
pub struct BalanceResponse {
    /// Remaining credit exactly as returned by the gateway (e.g. `"125.50"`).
    pub balance: String,
}
