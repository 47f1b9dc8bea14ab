pub mod claims;
pub mod jwt;
pub mod password;

pub use claims::{Claims, TokenType};
pub use jwt::{mint_access_token, mint_refresh_token, verify_token};
