use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct RegisterReqDto {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub department: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginReqDto {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    pub sub: String, // email
    pub role: u8,    // role id
    pub exp: usize,
    pub jti: String,

    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}
