//! 统一错误处理
//!
//! 错误枚举由宏生成，每个变体携带错误码、类型名和详情文本。

use std::fmt;

/// 生成 ClassHubError 枚举及其访问方法
///
/// 每个变体展开出 code() / error_type() / message() 的对应分支，
/// 以及一个 snake_case 的便捷构造函数。
macro_rules! classhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ClassHubError {
            $($variant(String),)*
        }

        impl ClassHubError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(ClassHubError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ClassHubError::$variant(_) => $type_name,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(ClassHubError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl ClassHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ClassHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

macro_rules! impl_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for ClassHubError {
                fn from(err: $source) -> Self {
                    ClassHubError::$variant(err.to_string())
                }
            }
        )*
    };
}

classhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    DatabaseConfig("E002", "Database Configuration Error"),
    DatabaseConnection("E003", "Database Connection Error"),
    DatabaseOperation("E004", "Database Operation Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    Serialization("E007", "Serialization Error"),
    ClassCodeExhausted("E008", "Class Code Exhausted"),
    MemberConflict("E009", "Member Conflict"),
    ClassFull("E010", "Class Full"),
}

impl_from! {
    sea_orm::DbErr => DatabaseOperation,
    serde_json::Error => Serialization,
}

impl fmt::Display for ClassHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for ClassHubError {}

pub type Result<T> = std::result::Result<T, ClassHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_accessors() {
        let err = ClassHubError::validation("Invalid input");
        assert_eq!(err.code(), "E005");
        assert_eq!(err.error_type(), "Validation Error");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_display_includes_type_and_detail() {
        let err = ClassHubError::class_code_exhausted("all attempts collided");
        let text = err.to_string();
        assert!(text.contains("Class Code Exhausted"));
        assert!(text.contains("all attempts collided"));
    }

    #[test]
    fn test_db_error_converts_to_operation_error() {
        let err: ClassHubError = sea_orm::DbErr::Custom("boom".into()).into();
        assert_eq!(err.code(), "E004");
    }

    #[test]
    fn test_json_error_converts_to_serialization_error() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json");
        let err: ClassHubError = bad.unwrap_err().into();
        assert_eq!(err.code(), "E007");
    }
}
