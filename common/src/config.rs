// Default grant expiration used when an allowance creates a new grant
// 9999-12-31T23:59:59Z, in seconds since the unix epoch
pub const DEFAULT_GRANT_EXPIRATION: u64 = 253_402_300_799;

// Permit domain version used when none is configured
pub const DEFAULT_PERMIT_VERSION: &str = "1";

// Highest number of decimals a token may declare
pub const MAX_TOKEN_DECIMALS: u8 = 18;

// Maximum length of a token name / symbol
pub const MAX_TOKEN_NAME_LENGTH: usize = 64;
pub const MAX_TOKEN_SYMBOL_LENGTH: usize = 16;
