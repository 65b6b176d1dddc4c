//! Provider constants

/// Default base URL for the Bedrock runtime endpoint
pub const BEDROCK_DEFAULT_BASE_URL: &str = "https://bedrock-runtime.us-west-2.amazonaws.com";

/// Default model when the caller does not pick one
pub const BEDROCK_DEFAULT_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Environment variable consulted for the bearer API key
pub const BEDROCK_API_KEY_ENV: &str = "AWS_BEARER_TOKEN_BEDROCK";
