//! Google News RSS 新闻搜索实现
//!
//! 对接 https://news.google.com/rss/search，返回按发布时间倒序的新闻

use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::DateTime;
use regex::Regex;
use reqwest::Client;
use scraper::Html;

use crate::config::{ApiConfig, NewsConfig};
use crate::models::NewsArticle;
use crate::services::providers::NewsSearch;

/// Google News 数据源
pub struct GoogleNews {
    client: Client,
    config: NewsConfig,
}

impl GoogleNews {
    pub fn new(config: NewsConfig, api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(api.timeout())
            .connect_timeout(api.connect_timeout())
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl NewsSearch for GoogleNews {
    async fn search(&self, query: &str) -> Result<Vec<NewsArticle>> {
        let hl = format!("{}-{}", self.config.language, self.config.region);
        let ceid = format!("{}:{}", self.config.region, self.config.language);

        let response = self
            .client
            .get(&self.config.rss_url)
            .query(&[
                ("q", query),
                ("hl", hl.as_str()),
                ("gl", self.config.region.as_str()),
                ("ceid", ceid.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("搜索新闻失败: {}", response.status()));
        }

        let text = response.text().await?;
        parse_rss_feed(&text)
    }
}

fn item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<item>(.*?)</item>").expect("valid item regex"))
}

fn numeric_entity_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&#(x?[0-9A-Fa-f]+);").expect("valid entity regex"))
}

/// 新闻条目中用到的标签
struct ItemTags {
    title: Regex,
    link: Regex,
    pub_date: Regex,
    description: Regex,
    source: Regex,
}

fn tag_regex(tag: &str) -> Regex {
    Regex::new(&format!(r"(?s)<{tag}(?:\s[^>]*)?>(.*?)</{tag}>")).expect("valid tag regex")
}

fn item_tags() -> &'static ItemTags {
    static TAGS: OnceLock<ItemTags> = OnceLock::new();
    TAGS.get_or_init(|| ItemTags {
        title: tag_regex("title"),
        link: tag_regex("link"),
        pub_date: tag_regex("pubDate"),
        description: tag_regex("description"),
        source: tag_regex("source"),
    })
}

/// 提取标签内容，标签可以带属性
fn tag_text(item: &str, tag: &Regex) -> String {
    tag.captures(item)
        .and_then(|c| c.get(1))
        .map(|m| unescape_xml(strip_cdata(m.as_str().trim())))
        .unwrap_or_default()
}

fn strip_cdata(text: &str) -> &str {
    text.strip_prefix("<![CDATA[")
        .and_then(|t| t.strip_suffix("]]>"))
        .unwrap_or(text)
}

/// 还原 XML 实体
fn unescape_xml(text: &str) -> String {
    let named = text
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ");

    let numeric = numeric_entity_regex().replace_all(&named, |caps: &regex::Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    // &amp; 最后处理，避免二次还原
    numeric.replace("&amp;", "&")
}

/// 摘要是一段 HTML，只保留纯文本
fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: Vec<&str> = fragment.root_element().text().collect();
    text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 解析 RSS 新闻列表
///
/// 按发布时间倒序排列，无法解析时间的条目排在最后，其余保持原顺序
fn parse_rss_feed(data: &str) -> Result<Vec<NewsArticle>> {
    if !data.contains("<rss") && !data.contains("<channel") {
        return Err(anyhow!("无效的 RSS 数据格式"));
    }

    let tags = item_tags();
    let mut articles: Vec<NewsArticle> = item_regex()
        .captures_iter(data)
        .filter_map(|cap| cap.get(1))
        .map(|item| {
            let item = item.as_str();
            let date = tag_text(item, &tags.pub_date);
            let datetime = DateTime::parse_from_rfc2822(&date).ok().map(|d| d.to_rfc3339());

            NewsArticle {
                title: tag_text(item, &tags.title),
                media: tag_text(item, &tags.source),
                date,
                datetime,
                desc: html_to_text(&tag_text(item, &tags.description)),
                link: tag_text(item, &tags.link),
            }
        })
        .collect();

    // 稳定排序；RFC 3339 字符串带时区，需要转换后比较
    articles.sort_by_key(|article| {
        std::cmp::Reverse(
            article
                .datetime
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                .map(|d| d.timestamp()),
        )
    });

    Ok(articles)
}

// ==================== 测试模块 ====================

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_FEED: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/"><channel>
<title>"Kalyan Jewellers" - Google News</title>
<item><title>Kalyan Jewellers Q2 profit jumps &amp; beats estimates - Mint</title>
<link>https://news.google.com/rss/articles/abc</link>
<guid isPermaLink="false">abc</guid>
<pubDate>Mon, 14 Oct 2024 06:30:00 GMT</pubDate>
<description>&lt;a href="https://news.google.com/rss/articles/abc"&gt;Kalyan Jewellers Q2 profit jumps&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Mint&lt;/font&gt;</description>
<source url="https://www.livemint.com">Mint</source></item>
<item><title>Undated story</title><link>https://example.com/undated</link>
<description>plain</description><source url="https://example.com">Example</source></item>
<item><title>Kalyan Jewellers opens new showroom - The Hindu</title>
<link>https://news.google.com/rss/articles/def</link>
<pubDate>Wed, 16 Oct 2024 09:00:00 GMT</pubDate>
<description>&lt;a href="x"&gt;Kalyan Jewellers opens new showroom&lt;/a&gt;</description>
<source url="https://www.thehindu.com">The Hindu</source></item>
</channel></rss>"##;

    /// 测试解析 RSS 并按时间倒序
    #[test]
    fn test_parse_rss_feed() {
        let articles = parse_rss_feed(MOCK_FEED).unwrap();
        assert_eq!(articles.len(), 3);

        assert_eq!(articles[0].title, "Kalyan Jewellers opens new showroom - The Hindu");
        assert_eq!(articles[0].media, "The Hindu");
        assert_eq!(articles[1].title, "Kalyan Jewellers Q2 profit jumps & beats estimates - Mint");
        assert_eq!(articles[1].link, "https://news.google.com/rss/articles/abc");
        assert_eq!(articles[1].date, "Mon, 14 Oct 2024 06:30:00 GMT");
        assert_eq!(articles[1].datetime.as_deref(), Some("2024-10-14T06:30:00+00:00"));
        assert_eq!(articles[1].desc, "Kalyan Jewellers Q2 profit jumps Mint");
        assert_eq!(articles[2].title, "Undated story");
        assert!(articles[2].datetime.is_none());
    }

    #[test]
    fn test_parse_invalid_feed() {
        assert!(parse_rss_feed("<html><body>blocked</body></html>").is_err());
    }

    /// 测试带属性、CDATA 的标签以及缺失的标签
    #[test]
    fn test_tag_text() {
        let tags = item_tags();
        let item = r#"<title><![CDATA[Titan Q2 results &amp; outlook]]></title>
<source url="https://example.com">Business Standard</source>"#;

        assert_eq!(tag_text(item, &tags.title), "Titan Q2 results & outlook");
        assert_eq!(tag_text(item, &tags.source), "Business Standard");
        assert_eq!(tag_text(item, &tags.link), "");
        assert_eq!(tag_text(item, &tags.pub_date), "");
    }

    #[test]
    fn test_unescape_xml() {
        assert_eq!(unescape_xml("A &amp;amp; B &#39;C&#x27;"), "A &amp; B 'C'");
    }
}
