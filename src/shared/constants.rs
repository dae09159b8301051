/// Default page size for admin panel listings
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Default page size for the public product listing
pub const DEFAULT_PRODUCT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum length of a free-text search term
pub const MAX_SEARCH_LENGTH: usize = 255;

// =============================================================================
// PASSWORDS
// =============================================================================

/// bcrypt work factor for admin passwords
pub const BCRYPT_COST: u32 = 12;

/// Length of an encoded bcrypt hash (`$2b$12$` + 53 chars)
pub const BCRYPT_HASH_LENGTH: usize = 60;
