pub mod constants;
pub mod naming;
pub mod string_utils;
