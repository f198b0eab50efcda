//! 模糊匹配打分
//!
//! 相似度基于最长公共子串递归匹配（与 difflib 的 ratio 相同），
//! 综合打分 `weighted_ratio` 按长度差异在整体、局部、词序、词集几种比较中取最高分，
//! 结果为 0..=100 的整数。

use std::collections::BTreeSet;

/// 预处理：丢弃非 ASCII 字符，其余非单词字符（字母、数字、下划线以外）替换为空格，转小写，去掉首尾空白
pub fn full_process(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii)
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// 四舍六入五成双
fn round_score(value: f64) -> u32 {
    value.round_ties_even() as u32
}

/// 在 a、b 中找最长公共子串，返回 (a 起点, b 起点, 长度)；长度相同时取最先出现的
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        let mut cur = vec![0usize; b.len() + 1];
        for j in 0..b.len() {
            if a[i] == b[j] {
                let k = prev[j] + 1;
                cur[j + 1] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            }
        }
        prev = cur;
    }

    best
}

/// 全部匹配块，按位置排序并合并相邻块，末尾追加 (a.len(), b.len(), 0)
fn matching_blocks(a: &[char], b: &[char]) -> Vec<(usize, usize, usize)> {
    let mut blocks = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(&a[alo..ahi], &b[blo..bhi]);
        if k == 0 {
            continue;
        }
        let (i, j) = (alo + i, blo + j);
        blocks.push((i, j, k));
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    blocks.sort_unstable();

    let mut merged: Vec<(usize, usize, usize)> = Vec::with_capacity(blocks.len() + 1);
    for (i, j, k) in blocks {
        match merged.last_mut() {
            Some(last) if last.0 + last.2 == i && last.1 + last.2 == j => last.2 += k,
            _ => merged.push((i, j, k)),
        }
    }
    merged.push((a.len(), b.len(), 0));
    merged
}

fn similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches: usize = matching_blocks(a, b).iter().map(|block| block.2).sum();
    2.0 * matches as f64 / total as f64
}

/// 整体相似度
pub fn ratio(s1: &str, s2: &str) -> u32 {
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    round_score(100.0 * similarity(&a, &b))
}

/// 局部相似度：短串与长串中最相近的等长片段比较
pub fn partial_ratio(s1: &str, s2: &str) -> u32 {
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    let (shorter, longer) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    let mut best = 0.0f64;
    for (i, j, _) in matching_blocks(&shorter, &longer) {
        let start = j.saturating_sub(i);
        let end = (start + shorter.len()).min(longer.len());
        let score = similarity(&shorter, &longer[start..end]);
        if score > 0.995 {
            return 100;
        }
        best = best.max(score);
    }

    round_score(100.0 * best)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn token_sort(s1: &str, s2: &str, partial: bool) -> u32 {
    let (t1, t2) = (sorted_tokens(s1), sorted_tokens(s2));
    if partial {
        partial_ratio(&t1, &t2)
    } else {
        ratio(&t1, &t2)
    }
}

fn token_set(s1: &str, s2: &str, partial: bool) -> u32 {
    if s1.is_empty() || s2.is_empty() {
        return 0;
    }
    let tokens1: BTreeSet<&str> = s1.split_whitespace().collect();
    let tokens2: BTreeSet<&str> = s2.split_whitespace().collect();

    let join = |tokens: Vec<&&str>| tokens.into_iter().copied().collect::<Vec<_>>().join(" ");
    let sect = join(tokens1.intersection(&tokens2).collect());
    let diff1to2 = join(tokens1.difference(&tokens2).collect());
    let diff2to1 = join(tokens2.difference(&tokens1).collect());

    let combined1to2 = format!("{} {}", sect, diff1to2).trim().to_string();
    let combined2to1 = format!("{} {}", sect, diff2to1).trim().to_string();

    let score = |x: &str, y: &str| if partial { partial_ratio(x, y) } else { ratio(x, y) };
    score(&sect, &combined1to2)
        .max(score(&sect, &combined2to1))
        .max(score(&combined1to2, &combined2to1))
}

/// 综合打分
///
/// 长度相差 1.5 倍以上时改用局部比较，并按长度差异折减
pub fn weighted_ratio(s1: &str, s2: &str) -> u32 {
    let p1 = full_process(s1);
    let p2 = full_process(s2);
    if p1.is_empty() || p2.is_empty() {
        return 0;
    }

    const UNBASE_SCALE: f64 = 0.95;
    let base = ratio(&p1, &p2) as f64;
    let (len1, len2) = (p1.chars().count() as f64, p2.chars().count() as f64);
    let len_ratio = len1.max(len2) / len1.min(len2);

    if len_ratio < 1.5 {
        let tsor = token_sort(&p1, &p2, false) as f64 * UNBASE_SCALE;
        let tser = token_set(&p1, &p2, false) as f64 * UNBASE_SCALE;
        return round_score(base.max(tsor).max(tser));
    }

    let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.9 };
    let partial = partial_ratio(&p1, &p2) as f64 * partial_scale;
    let ptsor = token_sort(&p1, &p2, true) as f64 * UNBASE_SCALE * partial_scale;
    let ptser = token_set(&p1, &p2, true) as f64 * UNBASE_SCALE * partial_scale;
    round_score(base.max(partial).max(ptsor).max(ptser))
}

/// 在候选中找与 query 最相近的一项，返回 (下标, 分数)
///
/// 分数相同时取靠前的候选；候选为空时返回 None
pub fn extract_one<S: AsRef<str>>(query: &str, choices: &[S]) -> Option<(usize, u32)> {
    let mut best: Option<(usize, u32)> = None;
    for (index, choice) in choices.iter().enumerate() {
        let score = weighted_ratio(query, choice.as_ref());
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((index, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_process() {
        assert_eq!(full_process("  Tata Motors Ltd. (NSE) "), "tata motors ltd   nse");
        assert_eq!(full_process("!!!"), "");
        assert_eq!(full_process("tata_motors"), "tata_motors");
    }

    /// 非 ASCII 字符直接丢弃，不替换为空格
    #[test]
    fn test_non_ascii_is_dropped() {
        assert_eq!(full_process("Nestlé India"), "nestl india");
        assert_eq!(full_process("Café"), "caf");
        // "nestl india" 与 "nestle india"：2 * 11 / 23
        assert_eq!(weighted_ratio("Nestlé India", "Nestle India"), 96);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio("this is a test", "this is a test!"), 97);
        assert_eq!(ratio("abc", "abc"), 100);
        assert_eq!(ratio("abc", "xyz"), 0);
        assert_eq!(ratio("", "abc"), 0);
    }

    #[test]
    fn test_partial_ratio() {
        assert_eq!(partial_ratio("this is a test", "this is a test!"), 100);
        assert_eq!(partial_ratio("cowboys", "dallas cowboys"), 100);
    }

    #[test]
    fn test_token_ratios() {
        assert_eq!(token_sort("fuzzy wuzzy was a bear", "wuzzy fuzzy was a bear", false), 100);
        assert_eq!(token_set("fuzzy was a bear", "fuzzy fuzzy was a bear", false), 100);
        assert_eq!(token_set("bear", "fuzzy was a bear", true), 100);
    }

    #[test]
    fn test_weighted_ratio_prefers_partial_for_long_names() {
        assert_eq!(weighted_ratio("cowboys", "Dallas Cowboys"), 90);
        assert_eq!(weighted_ratio("Infosys", "INFOSYS"), 100);
        assert_eq!(weighted_ratio("Infosys", ""), 0);
    }

    #[test]
    fn test_extract_one() {
        let choices = ["Atlanta Falcons", "New York Jets", "New York Giants", "Dallas Cowboys"];
        assert_eq!(extract_one("cowboys", &choices), Some((3, 90)));

        let names = vec![
            "Kalyani Steels Limited".to_string(),
            "Kalyan Jewellers India Limited".to_string(),
        ];
        let (index, _) = extract_one("Kalyan Jewellers", &names).unwrap();
        assert_eq!(index, 1);
    }

    #[test]
    fn test_extract_one_ties_take_first() {
        assert_eq!(extract_one("abc", &["ABC", "abc"]), Some((0, 100)));
        let empty: Vec<String> = Vec::new();
        assert_eq!(extract_one("abc", &empty), None);
    }
}
