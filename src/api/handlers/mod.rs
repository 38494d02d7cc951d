pub mod employees;
pub use self::employees::employees;

pub mod health;
pub use self::health::health;
