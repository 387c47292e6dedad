//! 展示用的格式化工具

use booky_shared::Review;

pub const COVER_PLACEHOLDER: &str = "/images/not-available.svg";

/// 头像缩写
///
/// 空名字显示 `??`；单个词取前两个字符；多个词取首尾两词的首字母。
pub fn initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let letters: String = match words.as_slice() {
        [] => return "??".to_string(),
        [single] => single.chars().take(2).collect(),
        [first, .., last] => first.chars().take(1).chain(last.chars().take(1)).collect(),
    };
    letters.to_uppercase()
}

/// 封面地址，空地址和 `blob:` 临时地址使用占位图
pub fn cover_src(cover: Option<&str>) -> String {
    match cover.map(str::trim) {
        Some(url) if !url.is_empty() && !url.starts_with("blob:") => url.to_string(),
        _ => COVER_PLACEHOLDER.to_string(),
    }
}

/// 平均星级，保留一位小数
pub fn review_average(reviews: &[Review]) -> String {
    if reviews.is_empty() {
        return "0.0".to_string();
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.star)).sum();
    format!("{:.1}", f64::from(total) / reviews.len() as f64)
}

pub fn review_count_label(count: usize) -> String {
    if count == 1 {
        "1 review".to_string()
    } else {
        format!("{} reviews", count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booky_shared::ReviewAuthor;

    fn review(star: u8) -> Review {
        Review {
            id: u64::from(star),
            star,
            comment: String::new(),
            created_at: "2024-01-02T10:30:00Z".to_string(),
            user: ReviewAuthor {
                id: 1,
                name: "Reader".to_string(),
            },
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials(""), "??");
        assert_eq!(initials("   "), "??");
        assert_eq!(initials("budi"), "BU");
        assert_eq!(initials("J"), "J");
        assert_eq!(initials("John Ronald Tolkien"), "JT");
        assert_eq!(initials("  ada   lovelace "), "AL");
    }

    #[test]
    fn test_cover_fallback() {
        assert_eq!(cover_src(None), COVER_PLACEHOLDER);
        assert_eq!(cover_src(Some(" ")), COVER_PLACEHOLDER);
        assert_eq!(cover_src(Some("blob:http://localhost/1")), COVER_PLACEHOLDER);
        assert_eq!(cover_src(Some("https://img/a.png")), "https://img/a.png");
    }

    #[test]
    fn test_review_average_and_label() {
        assert_eq!(review_average(&[]), "0.0");
        assert_eq!(review_average(&[review(5), review(4), review(4)]), "4.3");
        assert_eq!(review_count_label(1), "1 review");
        assert_eq!(review_count_label(0), "0 reviews");
    }
}
