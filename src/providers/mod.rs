mod http_errors;
pub mod xai;
