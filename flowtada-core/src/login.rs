//! Kiểm tra form đăng nhập portal. Đây chỉ là lớp giữ chỗ phía client,
//! không phải ranh giới bảo mật.

use std::sync::OnceLock;

use regex::Regex;

static EMAIL_PATTERN: OnceLock<Regex> = OnceLock::new();

fn email_pattern() -> &'static Regex {
    EMAIL_PATTERN.get_or_init(|| {
        // `\s` của JavaScript có U+FEFF, còn Unicode White_Space thì không.
        Regex::new(r"^[^\s\x{FEFF}@]+@[^\s\x{FEFF}@]+\.[^\s\x{FEFF}@]+$")
            .expect("valid email regex")
    })
}

/// Lỗi nhập liệu; `Display` chính là thông báo hiển thị cho người dùng.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Password must be at least {min} characters long.")]
    PasswordTooShort { min: usize },
}

/// Dạng `local@domain.tld`: không khoảng trắng (kể cả BOM U+FEFF), có `@` và
/// có `.` sau `@`.
pub fn validate_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Kiểm tra email trước, sau đó tới độ dài mật khẩu. Độ dài tính theo đơn vị
/// UTF-16, giống `String.length` của trình duyệt.
pub fn validate_login(
    email: &str,
    password: &str,
    min_password_len: usize,
) -> Result<(), LoginError> {
    if !validate_email(email) {
        return Err(LoginError::InvalidEmail);
    }
    if password.encode_utf16().count() < min_password_len {
        return Err(LoginError::PasswordTooShort {
            min: min_password_len,
        });
    }
    Ok(())
}

pub fn welcome_message(email: &str) -> String {
    format!("Welcome back! Redirecting to your CRM dashboard for {email}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("first.last@mail.example.co"));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("user name@example.com"));
        assert!(!validate_email("user@@example.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn email_is_checked_before_password() {
        assert_eq!(
            validate_login("nope", "abc", 6),
            Err(LoginError::InvalidEmail)
        );
    }

    #[test]
    fn short_password_message() {
        let err = validate_login("user@example.com", "abc", 6).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters long.");
        assert!(validate_login("user@example.com", "abcdef", 6).is_ok());
    }

    #[test]
    fn password_length_counts_utf16_units() {
        let five_wide = "\u{1ead}".repeat(5);
        assert!(five_wide.len() >= 6);
        assert!(validate_login("user@example.com", &five_wide, 6).is_err());

        // Ký tự ngoài BMP chiếm hai đơn vị UTF-16.
        let emoji = "\u{1F600}".repeat(3);
        assert_eq!(emoji.chars().count(), 3);
        assert!(validate_login("user@example.com", &emoji, 6).is_ok());
        assert!(validate_login("user@example.com", "\u{1F600}\u{1F600}a", 6).is_err());
    }

    #[test]
    fn byte_order_mark_counts_as_whitespace() {
        assert!(!validate_email("us\u{FEFF}er@example.com"));
        assert!(!validate_email("user@exa\u{FEFF}mple.com"));
        assert!(!validate_email("user@example.\u{FEFF}"));
    }

    #[test]
    fn welcome_mentions_email() {
        assert!(welcome_message("user@example.com").contains("for user@example.com..."));
    }
}
