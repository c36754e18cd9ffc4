pub mod activation;
pub mod jwt;
pub mod password;
