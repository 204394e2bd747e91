// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";

// Session configuration
pub const SESSION_NAME: &str = "axum_session";
pub const SESSION_EXPIRY_DAYS: i64 = 30;
pub const MIN_SESSION_SECRET_LENGTH: usize = 64;

// Query limits and defaults
pub const DEFAULT_TRANSACTIONS_LIMIT: u32 = 500;
pub const MAX_LIMIT: u32 = 1000;

// Validation limits
pub const MIN_CATEGORY_NAME_LENGTH: usize = 3;
pub const MAX_CATEGORY_NAME_LENGTH: usize = 20;
pub const MAX_CATEGORY_ICON_LENGTH: usize = 20;
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
pub const MAX_USERNAME_LENGTH: usize = 50;
pub const MIN_USERNAME_LENGTH: usize = 4;
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Error messages
pub const ERR_DATABASE_ACCESS: &str = "Database access error";
pub const ERR_DATABASE_OPERATION: &str = "Database operation failed";
pub const ERR_CATEGORY_NOT_FOUND: &str = "Category not found";
pub const ERR_CATEGORY_EXISTS: &str = "Category already exists";
pub const ERR_SETTINGS_NOT_FOUND: &str = "User settings not found";
pub const ERR_UNAUTHORIZED: &str = "Not logged in";
