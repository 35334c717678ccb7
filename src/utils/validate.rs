use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

// 常见弱密码，大小写不敏感比对
const WEAK_PASSWORDS: &[&str] = &[
    "password",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "password1",
    "Password1",
    "Qwerty123",
    "Abcd1234",
];

/// 用户名规则：长度 5..=16，仅字母数字下划线连字符
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if !(5..=16).contains(&username.len()) {
        return Err("Username length must be between 5 and 16 characters");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 检查密码策略，返回所有未通过项
///
/// 策略：至少 8 字符，大写、小写、数字齐备，拒绝常见弱密码。
pub fn password_policy_violations(password: &str) -> Vec<&'static str> {
    type Check = (fn(&str) -> bool, &'static str);

    const CHECKS: &[Check] = &[
        (
            |p| p.len() >= 8,
            "Password must be at least 8 characters long",
        ),
        (
            |p| p.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            |p| p.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            |p| p.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one digit",
        ),
        (
            |p| !WEAK_PASSWORDS.iter().any(|w| p.eq_ignore_ascii_case(w)),
            "Password is too common, please choose a stronger password",
        ),
    ];

    CHECKS
        .iter()
        .filter(|(check, _)| !check(password))
        .map(|(_, msg)| *msg)
        .collect()
}

/// 密码策略校验，未通过项拼成一条消息
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let violations = password_policy_violations(password);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_passwords_pass() {
        assert!(password_policy_violations("SecureP@ss1").is_empty());
        assert!(password_policy_violations("MyP@ssw0rd").is_empty());
        assert!(validate_password_simple("SecurePass123").is_ok());
    }

    #[test]
    fn test_short_password_reports_length() {
        let violations = password_policy_violations("Ab1");
        assert!(violations.contains(&"Password must be at least 8 characters long"));
    }

    #[test]
    fn test_each_missing_character_class_reported() {
        assert!(
            password_policy_violations("zxcv9876")
                .contains(&"Password must contain at least one uppercase letter")
        );
        assert!(
            password_policy_violations("ZXCV9876")
                .contains(&"Password must contain at least one lowercase letter")
        );
        assert!(
            password_policy_violations("AbcdEfgh")
                .contains(&"Password must contain at least one digit")
        );
    }

    #[test]
    fn test_weak_password_rejected_case_insensitively() {
        assert!(validate_password_simple("Password1").is_err());
        assert!(validate_password_simple("pAsSwOrD1").is_err());
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space!").is_err());
        assert!(validate_username("seventeen_chars_x").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("student@example.com").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("user@domain").is_err());
    }
}
