pub mod launchagent;
pub mod log;
pub mod report;
pub mod update;

/// Pad or cut `s` to exactly `width` characters
pub(crate) fn pad(s: &str, width: usize) -> String {
    let mut out: String = s.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 3), "abc");
        assert_eq!(pad("héllo", 3), "hél");
    }
}
