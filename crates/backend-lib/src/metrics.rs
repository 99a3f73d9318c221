// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const REGISTER_SUCCESS: &str = "auth.register.success";
pub const REGISTER_FAILURE: &str = "auth.register.failure";
pub const VERIFY_SUCCESS: &str = "auth.verify.success";
pub const VERIFY_FAILURE: &str = "auth.verify.failure";
