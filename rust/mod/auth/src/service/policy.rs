//! Credential strength rules applied at registration.
//!
//! Each rule is toggled independently from configuration. A check looks
//! only at the username/password it is given, so concurrent registrations
//! never observe each other's results.

use std::fmt;

use serde::Deserialize;

use crate::service::AuthError;

/// One rule a credential can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialRule {
    UsernameLength { min: usize, max: usize },
    UsernameAlphanumeric,
    PasswordLength { min: usize, max: usize },
    PasswordUppercase,
    PasswordLowercase,
    PasswordDigit,
    PasswordSymbol,
    PasswordWhitespace,
}

impl CredentialRule {
    /// Stable identifier, matching the config key that toggles the rule.
    pub fn name(&self) -> &'static str {
        match self {
            CredentialRule::UsernameLength { .. } => "username_length",
            CredentialRule::UsernameAlphanumeric => "username_alphanumeric",
            CredentialRule::PasswordLength { .. } => "password_length",
            CredentialRule::PasswordUppercase => "password_upper",
            CredentialRule::PasswordLowercase => "password_lower",
            CredentialRule::PasswordDigit => "password_digit",
            CredentialRule::PasswordSymbol => "password_symbol",
            CredentialRule::PasswordWhitespace => "password_no_whitespace",
        }
    }
}

impl fmt::Display for CredentialRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialRule::UsernameLength { min, max } => {
                write!(f, "username must be between {} and {} characters", min, max)
            }
            CredentialRule::UsernameAlphanumeric => {
                write!(f, "username may only contain letters and numbers")
            }
            CredentialRule::PasswordLength { min, max } => {
                write!(f, "password must be between {} and {} characters", min, max)
            }
            CredentialRule::PasswordUppercase => {
                write!(f, "password must contain an uppercase letter")
            }
            CredentialRule::PasswordLowercase => {
                write!(f, "password must contain a lowercase letter")
            }
            CredentialRule::PasswordDigit => write!(f, "password must contain a digit"),
            CredentialRule::PasswordSymbol => write!(f, "password must contain a symbol"),
            CredentialRule::PasswordWhitespace => {
                write!(f, "password must not contain whitespace")
            }
        }
    }
}

/// Which credential rules are enforced, and their bounds.
///
/// Lengths count characters, not bytes; bounds are inclusive.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialPolicy {
    pub username_length: bool,
    pub username_min: usize,
    pub username_max: usize,
    pub username_alphanumeric: bool,
    pub password_length: bool,
    pub password_min: usize,
    pub password_max: usize,
    pub password_upper: bool,
    pub password_lower: bool,
    pub password_digit: bool,
    pub password_symbol: bool,
    pub password_no_whitespace: bool,
}

impl Default for CredentialPolicy {
    fn default() -> Self {
        Self {
            username_length: true,
            username_min: 3,
            username_max: 50,
            username_alphanumeric: true,
            password_length: true,
            password_min: 8,
            password_max: 64,
            password_upper: true,
            password_lower: true,
            password_digit: true,
            password_symbol: true,
            password_no_whitespace: true,
        }
    }
}

impl CredentialPolicy {
    /// A policy with every rule switched off.
    pub fn permissive() -> Self {
        Self {
            username_length: false,
            username_alphanumeric: false,
            password_length: false,
            password_upper: false,
            password_lower: false,
            password_digit: false,
            password_symbol: false,
            password_no_whitespace: false,
            ..Default::default()
        }
    }

    /// Evaluate the enabled rules in a fixed order; the first failure wins.
    pub fn check(&self, username: &str, password: &str) -> Result<(), AuthError> {
        match self.first_violation(username, password) {
            Some(rule) => Err(AuthError::WeakCredential(rule)),
            None => Ok(()),
        }
    }

    fn first_violation(&self, username: &str, password: &str) -> Option<CredentialRule> {
        let username_len = username.chars().count();
        if self.username_length && !(self.username_min..=self.username_max).contains(&username_len)
        {
            return Some(CredentialRule::UsernameLength {
                min: self.username_min,
                max: self.username_max,
            });
        }
        if self.username_alphanumeric && !username.chars().all(char::is_alphanumeric) {
            return Some(CredentialRule::UsernameAlphanumeric);
        }

        let password_len = password.chars().count();
        if self.password_length && !(self.password_min..=self.password_max).contains(&password_len)
        {
            return Some(CredentialRule::PasswordLength {
                min: self.password_min,
                max: self.password_max,
            });
        }
        if self.password_upper && !password.chars().any(char::is_uppercase) {
            return Some(CredentialRule::PasswordUppercase);
        }
        if self.password_lower && !password.chars().any(char::is_lowercase) {
            return Some(CredentialRule::PasswordLowercase);
        }
        if self.password_digit && !password.chars().any(|c| c.is_numeric()) {
            return Some(CredentialRule::PasswordDigit);
        }
        if self.password_symbol && !password.chars().any(is_symbol) {
            return Some(CredentialRule::PasswordSymbol);
        }
        if self.password_no_whitespace && password.chars().any(char::is_whitespace) {
            return Some(CredentialRule::PasswordWhitespace);
        }
        None
    }
}

/// Anything that is neither a letter/number nor whitespace.
fn is_symbol(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(policy: &CredentialPolicy, user: &str, pass: &str) -> Option<CredentialRule> {
        match policy.check(user, pass) {
            Ok(()) => None,
            Err(AuthError::WeakCredential(rule)) => Some(rule),
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn default_policy_accepts_strong_credentials() {
        let policy = CredentialPolicy::default();
        assert_eq!(violation(&policy, "alice", "GoodPass1!"), None);
        assert_eq!(violation(&policy, "jürgen42", "Ünïcode9#x"), None);
    }

    #[test]
    fn each_password_rule_is_reported_by_name() {
        let policy = CredentialPolicy::default();
        let cases = [
            ("Sh0rt!", "password_length"),
            ("goodpass1!", "password_upper"),
            ("GOODPASS1!", "password_lower"),
            ("GoodPass!!", "password_digit"),
            ("GoodPass11", "password_symbol"),
            ("Good Pass1!", "password_no_whitespace"),
        ];
        for (password, rule) in cases {
            let got = violation(&policy, "alice", password)
                .unwrap_or_else(|| panic!("{password} should fail"));
            assert_eq!(got.name(), rule, "password {password}");
        }
    }

    #[test]
    fn username_rules() {
        let policy = CredentialPolicy::default();
        assert_eq!(
            violation(&policy, "al", "GoodPass1!"),
            Some(CredentialRule::UsernameLength { min: 3, max: 50 })
        );
        assert_eq!(
            violation(&policy, "alice_b", "GoodPass1!"),
            Some(CredentialRule::UsernameAlphanumeric)
        );
    }

    #[test]
    fn rules_toggle_independently() {
        let mut policy = CredentialPolicy::permissive();
        assert_eq!(violation(&policy, "a b", "x"), None);

        policy.password_digit = true;
        assert_eq!(violation(&policy, "a b", "x"), Some(CredentialRule::PasswordDigit));
        assert_eq!(violation(&policy, "a b", "x1"), None);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let policy = CredentialPolicy {
            username_length: true,
            username_min: 3,
            username_max: 3,
            ..CredentialPolicy::permissive()
        };
        // Three characters, six bytes.
        assert_eq!(violation(&policy, "äöü", "x"), None);
    }

    #[test]
    fn evaluation_does_not_leak_between_calls() {
        let policy = CredentialPolicy::default();
        assert!(policy.check("alice", "GoodPass1!").is_ok());
        assert!(policy.check("alice", "weak").is_err());
        assert!(policy.check("alice", "GoodPass1!").is_ok());
    }

    #[test]
    fn messages_are_human_readable() {
        assert_eq!(
            CredentialRule::PasswordUppercase.to_string(),
            "password must contain an uppercase letter"
        );
        assert_eq!(
            CredentialRule::PasswordLength { min: 8, max: 64 }.to_string(),
            "password must be between 8 and 64 characters"
        );
    }
}
