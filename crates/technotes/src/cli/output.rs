//! Terminal output for CLI commands.

use std::io::{self, Write};

use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::activity::{ActivityCalendar, Intensity, DAYS_PER_WEEK};
use crate::format::FormattedContent;
use crate::icons::GroupMatch;
use crate::post::Post;
use crate::store::PostPage;

use super::OutputFormat;

/// Content column width in table output.
const TABLE_CONTENT_WIDTH: usize = 48;

/// Shortened id length in table output.
const SHORT_ID_LEN: usize = 8;

const WEEKDAY_LABELS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Serialize)]
struct PostDetail<'a> {
    #[serde(flatten)]
    post: &'a Post,
    icon_label: &'static str,
    formatted: FormattedContent,
}

fn timestamp<Tz: TimeZone>(post: &Post, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    post.created_at
        .with_timezone(tz)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Print a page of posts.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_posts(out: &mut impl Write, page: &PostPage, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, page)?;
            writeln!(out)
        }
        OutputFormat::Table => {
            writeln!(
                out,
                "{:<8}  {:<16}  {:<14}  CONTENT",
                "ID", "CREATED", "ICON"
            )?;
            for post in &page.posts {
                writeln!(
                    out,
                    "{:<8}  {:<16}  {:<14}  {}",
                    short_id(&post.id),
                    timestamp(post, &Local),
                    post.icon().label,
                    summary(&post.content, TABLE_CONTENT_WIDTH)
                )?;
            }
            write_page_footer(out, page)
        }
        OutputFormat::Plain => {
            for post in &page.posts {
                writeln!(
                    out,
                    "[{}] {} ({})",
                    timestamp(post, &Local),
                    post.icon().label,
                    post.id
                )?;
                for line in post.content.lines() {
                    writeln!(out, "  {line}")?;
                }
                writeln!(out)?;
            }
            write_page_footer(out, page)
        }
    }
}

fn write_page_footer(out: &mut impl Write, page: &PostPage) -> io::Result<()> {
    if page.posts.is_empty() {
        writeln!(out, "No posts yet.")?;
    }
    writeln!(
        out,
        "{} of {} posts{}",
        page.posts.len(),
        page.total,
        if page.has_more { ", more on the next page" } else { "" }
    )
}

/// Print one post with its content split into prose and code.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_post(out: &mut impl Write, post: &Post, format: OutputFormat) -> io::Result<()> {
    let formatted = post.formatted();

    if format == OutputFormat::Json {
        let detail = PostDetail {
            post,
            icon_label: post.icon().label,
            formatted,
        };
        serde_json::to_writer_pretty(&mut *out, &detail)?;
        return writeln!(out);
    }

    writeln!(out, "id:      {}", post.id)?;
    writeln!(out, "icon:    {} ({})", post.icon().label, post.tech_icon)?;
    writeln!(out, "created: {}", timestamp(post, &Local))?;
    writeln!(out)?;

    let prose = formatted.prose_text();
    if !prose.is_empty() {
        writeln!(out, "{prose}")?;
    }
    if let Some(code) = &formatted.code {
        writeln!(out, "--- {} ---", code.language_label())?;
        writeln!(out, "{}", code.code)?;
        writeln!(out, "---")?;
    }
    Ok(())
}

/// Print the activity heatmap, one row per weekday.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_activity(out: &mut impl Write, calendar: &ActivityCalendar) -> io::Result<()> {
    if let (Some(start), Some(end)) = (calendar.start(), calendar.end()) {
        writeln!(out, "Activity {start} .. {end}")?;
    }

    for (weekday, label) in WEEKDAY_LABELS.iter().enumerate() {
        write!(out, "{label} ")?;
        for week in &calendar.weeks {
            let day = &week[weekday];
            let cell = if day.is_today {
                '@'
            } else {
                intensity_char(day.intensity)
            };
            write!(out, " {cell}")?;
        }
        writeln!(out)?;
    }

    let legend: String = Intensity::scale()
        .into_iter()
        .map(|intensity| format!(" {}", intensity_char(intensity)))
        .collect();
    writeln!(out, "Less{legend} More   @ today")?;
    writeln!(
        out,
        "Total: {}  Days: {}",
        calendar.total_posts, calendar.active_days
    )
}

fn intensity_char(intensity: Intensity) -> char {
    match intensity {
        Intensity::None => '.',
        Intensity::Low => '-',
        Intensity::Medium => '+',
        Intensity::High => '#',
    }
}

/// Print icon groups as `key  label` lines.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_icons(out: &mut impl Write, groups: &[GroupMatch]) -> io::Result<()> {
    if groups.is_empty() {
        return writeln!(out, "No matching icons.");
    }

    for group in groups {
        writeln!(out, "{}", group.name)?;
        for (key, icon) in &group.icons {
            writeln!(out, "  {key:<14} {}", icon.label)?;
        }
    }
    Ok(())
}

fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_LEN).collect()
}

/// First line of `content`, cut to `width` characters with an ellipsis.
fn summary(content: &str, width: usize) -> String {
    let first = content.lines().next().unwrap_or_default();
    let truncated = first.chars().count() > width || content.lines().nth(1).is_some();
    let mut line: String = first.chars().take(width).collect();
    if truncated {
        line.push_str("...");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::WEEKS;
    use crate::icons;
    use crate::post::PostDraft;
    use chrono::NaiveDate;

    fn post(content: &str) -> Post {
        Post::new(PostDraft::new(content, "rust").unwrap())
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn page(posts: Vec<Post>, total: usize, has_more: bool) -> PostPage {
        PostPage {
            posts,
            total,
            has_more,
        }
    }

    #[test]
    fn test_table_output() {
        let p = post("a note about `Box`");
        let text = render(|out| write_posts(out, &page(vec![p.clone()], 1, false), OutputFormat::Table));

        assert!(text.starts_with("ID"));
        assert!(text.contains(&p.id[..8]));
        assert!(text.contains("Rust"));
        assert!(text.contains("1 of 1 posts"));
    }

    #[test]
    fn test_plain_output_mentions_more() {
        let text = render(|out| {
            write_posts(out, &page(vec![post("x")], 30, true), OutputFormat::Plain)
        });
        assert!(text.contains("more on the next page"));
    }

    #[test]
    fn test_empty_listing() {
        let text = render(|out| write_posts(out, &page(vec![], 0, false), OutputFormat::Plain));
        assert!(text.contains("No posts yet."));
    }

    #[test]
    fn test_json_listing() {
        let text = render(|out| write_posts(out, &page(vec![post("j")], 1, false), OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total"], 1);
        assert_eq!(value["posts"][0]["techIcon"], "rust");
    }

    #[test]
    fn test_show_splits_code() {
        let p = post("intro\n```sh\nls\n```");
        let text = render(|out| write_post(out, &p, OutputFormat::Plain));
        assert!(text.contains("intro"));
        assert!(text.contains("--- sh ---"));
        assert!(text.contains("\nls\n"));
    }

    #[test]
    fn test_show_json_is_flat() {
        let p = post("hi `x`");
        let text = render(|out| write_post(out, &p, OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["id"], p.id.as_str());
        assert_eq!(value["icon_label"], "Rust");
        assert_eq!(value["formatted"]["prose"][1]["kind"], "code");
    }

    #[test]
    fn test_activity_grid() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let calendar = ActivityCalendar::build(today, [today]);
        let text = render(|out| write_activity(out, &calendar));

        let rows: Vec<_> = text.lines().filter(|l| l.starts_with(WEEKDAY_LABELS[3])).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].matches(' ').count(), WEEKS + 1);
        assert!(rows[0].ends_with('@'));
        assert!(text.contains("Less . - + # More"));
        assert!(text.contains("Total: 1  Days: 1"));
    }

    #[test]
    fn test_icons_listing() {
        let text = render(|out| write_icons(out, &icons::search("rust")));
        assert!(text.contains("Languages"));
        assert!(text.contains("rust"));

        let text = render(|out| write_icons(out, &icons::search("zzzz")));
        assert!(text.contains("No matching icons."));
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary("short", 10), "short");
        assert_eq!(summary("abcdefghijk", 5), "abcde...");
        assert_eq!(summary("one\ntwo", 10), "one...");
    }
}
