pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Session, User};
pub use errors::{AuthError, HashError};
pub use services::AuthService;
pub use value_objects::{
  Email, Password, PasswordHash, SessionToken, TokenHash, UserName, ValueObjectError,
};
