/// CJK unified ideograph check (base + extension A).
pub fn is_cjk(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}')
}

/// Lowercase and strip everything but letters, digits, and CJK characters.
pub fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || is_cjk(*c))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Split text into match tokens: each CJK character stands alone, runs of
/// ASCII alphanumerics form one lowercased word, the rest is discarded.
pub fn tokens(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if is_cjk(c) {
            if !word.is_empty() {
                out.push(std::mem::take(&mut word));
            }
            out.push(c.to_string());
        } else if c.is_ascii_alphanumeric() {
            word.extend(c.to_lowercase());
        } else if !word.is_empty() {
            out.push(std::mem::take(&mut word));
        }
    }
    if !word.is_empty() {
        out.push(word);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("  Hello, World! "), "helloworld");
        assert_eq!(normalize("暂停。"), "暂停");
        assert_eq!(normalize("第2个！"), "第2个");
    }

    #[test]
    fn test_tokens_cjk_chars_stand_alone() {
        assert_eq!(tokens("你好世界"), vec!["你", "好", "世", "界"]);
    }

    #[test]
    fn test_tokens_ascii_words_group() {
        assert_eq!(tokens("Play the Intro"), vec!["play", "the", "intro"]);
    }

    #[test]
    fn test_tokens_mixed_script() {
        assert_eq!(tokens("播放intro视频"), vec!["播", "放", "intro", "视", "频"]);
    }

    #[test]
    fn test_tokens_empty() {
        assert!(tokens("  ...  ").is_empty());
    }
}
