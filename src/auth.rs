/// Wrapper for upstream API keys that keeps the value out of debug output.
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<redacted>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trips_its_value() {
        for key in ["cc_1234567890abcdef", "", "key with spaces\tand\ttabs"] {
            assert_eq!(Token::from(key).as_str(), key);
        }
    }

    #[test]
    fn test_token_debug_redacts_value() {
        let token = Token::from("cc_very_secret_key_do_not_log");

        let debug_output = format!("{token:?}");
        assert_eq!(debug_output, "<redacted>");
    }

    #[test]
    fn test_token_debug_in_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct ApiClient {
            token: Token,
            endpoint: String,
        }

        let client = ApiClient {
            token: Token::from("super_secret_key"),
            endpoint: String::from("https://api.example.com"),
        };

        let debug_output = format!("{client:?}");
        assert!(debug_output.contains("<redacted>"));
        assert!(!debug_output.contains("super_secret_key"));
        assert!(debug_output.contains("https://api.example.com"));
    }
}
