use std::io::Cursor;

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use sea_orm::DatabaseConnection;

use crate::modules::error::{ServiceError, ServiceResult};
use crate::modules::posts::{PostService, PostWithTags};
use crate::modules::settings::{RenderContext, SettingsService};

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 50;
pub const TTL_MINUTES: u32 = 60;
pub const GENERATOR: &str = "Blog RSS Generator";

const DESCRIPTION_MAX_CHARS: usize = 300;
const DESCRIPTION_MIN_BREAK: usize = 200;

/// Missing, non-numeric or < 1 gives the default; anything above the
/// maximum is capped.
pub fn clamp_limit(raw: Option<&str>) -> u64 {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n >= 1 => (n as u64).min(MAX_LIMIT),
        _ => DEFAULT_LIMIT,
    }
}

/// Summary if present, otherwise tag-stripped content cut at a word
/// boundary.
pub fn describe(post: &entity::post::Model) -> String {
    if !post.summary.trim().is_empty() {
        return post.summary.clone();
    }

    let text = strip_html_tags(&post.content);
    if text.chars().count() <= DESCRIPTION_MAX_CHARS {
        return text;
    }

    let chars: Vec<char> = text.chars().take(DESCRIPTION_MAX_CHARS).collect();
    let cut = match chars.iter().rposition(|c| *c == ' ') {
        Some(space) if space > DESCRIPTION_MIN_BREAK => space,
        _ => chars.len(),
    };
    let mut truncated: String = chars[..cut].iter().collect();
    truncated.push_str("...");
    truncated
}

pub fn strip_html_tags(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_tag = false;
    for ch in content.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.trim().replace("\n\n", "\n").replace('\n', " ")
}

/// Render the channel document.
pub fn render(
    ctx: &RenderContext,
    base_url: &str,
    posts: &[PostWithTags],
    built_at: DateTime<Utc>,
) -> ServiceResult<String> {
    write_document(ctx, base_url, posts, built_at)
        .map_err(|e| ServiceError::Internal(format!("Failed to write RSS XML: {}", e)))
}

fn write_document(
    ctx: &RenderContext,
    base_url: &str,
    posts: &[PostWithTags],
    built_at: DateTime<Utc>,
) -> std::io::Result<String> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    let built = built_at.to_rfc2822();

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    text_element(&mut writer, "title", &ctx.site_name)?;
    text_element(&mut writer, "link", base_url)?;
    text_element(&mut writer, "description", &ctx.description)?;
    text_element(&mut writer, "language", &ctx.language)?;
    text_element(&mut writer, "lastBuildDate", &built)?;
    text_element(&mut writer, "pubDate", &built)?;
    text_element(&mut writer, "ttl", &TTL_MINUTES.to_string())?;
    text_element(&mut writer, "generator", GENERATOR)?;

    for entry in posts {
        let post = &entry.post;
        let link = format!("{}/posts/{}", base_url, post.slug);

        writer.write_event(Event::Start(BytesStart::new("item")))?;
        text_element(&mut writer, "title", &html_escape::encode_text(&post.title))?;
        text_element(&mut writer, "link", &link)?;
        text_element(
            &mut writer,
            "description",
            &html_escape::encode_text(&describe(post)),
        )?;
        text_element(&mut writer, "pubDate", &post.created_at.to_rfc2822())?;
        text_element(&mut writer, "guid", &link)?;
        for tag in &entry.tags {
            text_element(&mut writer, "category", &html_escape::encode_text(&tag.name))?;
        }
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

fn text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> std::io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub struct FeedService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FeedService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn build(&self, base_url: &str, limit: u64) -> ServiceResult<String> {
        let ctx = SettingsService::new(self.db).render_context().await?;
        let posts = PostService::new(self.db).recent_published(limit).await?;
        render(&ctx, base_url.trim_end_matches('/'), &posts, Utc::now())
    }
}
