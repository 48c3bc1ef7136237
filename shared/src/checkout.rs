//! 支付链接
//!
//! 住户通过链接打开某笔待支付记录并确认付款。这里只放错误文案与可支付判断，
//! 请求本身见 [`crate::api::ResourceService::mark_as_paid`]。

use crate::error::ApiError;
use crate::models::{Payment, PaymentStatus};

pub const NOT_AUTHORIZED: &str = "You are not authorized to make this payment.";
pub const NOT_FOUND: &str = "Payment not found. Please check your link and try again.";
pub const ALREADY_COMPLETED: &str = "Payment has already been completed.";
pub const ALREADY_PAID: &str = "This payment has already been completed.";
pub const LOAD_FAILED: &str = "Failed to load payment details. Please check your link and try again.";
pub const PAY_FAILED: &str = "Failed to process payment. Please try again.";
pub const PAY_SUCCEEDED: &str = "Payment completed successfully!";

/// 加载支付详情失败时的提示
pub fn load_error_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::Forbidden { .. } => NOT_AUTHORIZED,
        ApiError::Validation { status: 404, .. } => NOT_FOUND,
        ApiError::Validation { status: 400, .. } => ALREADY_COMPLETED,
        _ => LOAD_FAILED,
    }
}

/// 确认付款失败时的提示；重复付款与越权单独说明
pub fn pay_error_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::Forbidden { .. } => NOT_AUTHORIZED,
        ApiError::Validation { status: 400, .. } => ALREADY_COMPLETED,
        _ => PAY_FAILED,
    }
}

/// 能否发起付款，不能时给出原因
pub fn check_payable(payment: &Payment) -> Result<(), &'static str> {
    match payment.status {
        PaymentStatus::Paid => Err(ALREADY_PAID),
        _ => Ok(()),
    }
}
