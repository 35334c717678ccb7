//! 班级加入码生成
//!
//! 码面为 6 位大写字母加数字。唯一性由存储层查询保证，
//! 这里只负责产码。

use rand::Rng;

/// 加入码字符表
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 加入码长度
pub const CODE_LENGTH: usize = 6;

/// 生成一个候选加入码
pub fn generate_class_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// 兜底加入码：4 位随机字符拼上当前时间 base36 的末两位
///
/// 只在常规产码连续撞码时使用，不再回查唯一性，最终由
/// class_code 唯一索引把真正的冲突挡在插入时。
pub fn fallback_class_code() -> String {
    let mut rng = rand::rng();
    let mut code: String = (0..CODE_LENGTH - 2)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect();

    let ts = chrono::Utc::now().timestamp_millis().unsigned_abs();
    let suffix = to_base36(ts);
    // base36 字符表是 [0-9A-Z] 的子集，截尾两位直接可用
    for c in suffix.chars().skip(suffix.len().saturating_sub(2)) {
        code.push(c);
    }
    code
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = Vec::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    buf.iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_valid_code(code: &str) {
        assert_eq!(code.len(), CODE_LENGTH);
        assert!(
            code.bytes().all(|b| CODE_ALPHABET.contains(&b)),
            "unexpected character in code: {code}"
        );
    }

    #[test]
    fn test_generated_code_shape() {
        for _ in 0..100 {
            assert_valid_code(&generate_class_code());
        }
    }

    #[test]
    fn test_fallback_code_shape() {
        for _ in 0..100 {
            assert_valid_code(&fallback_class_code());
        }
    }

    #[test]
    fn test_base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "Z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36 - 1), "ZZ");
    }
}
