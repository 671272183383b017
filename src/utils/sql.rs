/// LIKE 模式使用的转义字符
///
/// 不用反斜杠：MySQL 字符串字面量里反斜杠本身需要转义，各数据库写法不一致。
pub const LIKE_ESCAPE: char = '!';

/// 转义 LIKE 模式中的元字符，使 `%` 与 `_` 按字面匹配
pub fn escape_like_pattern(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("plain"), "plain");
        assert_eq!(escape_like_pattern("50%_off"), "50!%!_off");
        assert_eq!(escape_like_pattern("wow!"), "wow!!");
        assert_eq!(escape_like_pattern(""), "");
    }
}
