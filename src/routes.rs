//! API route paths, shared by the HTTP client and the development server.

pub mod auth {
    pub const LOGIN: &str = "/api/auth/login";
    pub const LOGOUT: &str = "/api/auth/logout";
    pub const REGISTER: &str = "/api/auth/register";
    pub const ME: &str = "/api/auth/me";
}
