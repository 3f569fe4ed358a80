/// OAuth password grant against the org's token endpoint.
pub mod credentials;
/// Signed assertion construction and the JWT-bearer grant.
pub mod jwt;
/// Access token type and grant dispatch.
pub mod token;
