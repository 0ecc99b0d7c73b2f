//! Rendering of published pages and posts into HTML.
//!
//! Text components and post bodies are stored rich-text HTML and pass
//! through `ammonia` before output. Media sources must be http(s) URLs or
//! site-relative paths. Everything placed inside an attribute or built from
//! plain text is escaped.

use pressroom_core::domain::{Component, ComponentKind, Page, PostView};

/// One renderable unit of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Html { html: String, style: String },
    Image { src: String, style: String },
    Video { src: String, style: String },
    Container { style: String },
}

impl Block {
    /// The block for one component. Unknown types and media without a
    /// usable source render nothing.
    pub fn from_component(component: &Component) -> Option<Self> {
        let style = component.styles.to_css();

        match &component.kind {
            ComponentKind::Text { html } => Some(Block::Html {
                html: ammonia::clean(html),
                style,
            }),
            ComponentKind::Image { url } if is_safe_src(url) => Some(Block::Image {
                src: url.trim().to_string(),
                style,
            }),
            ComponentKind::Video { url } if is_safe_src(url) => Some(Block::Video {
                src: url.trim().to_string(),
                style,
            }),
            ComponentKind::Layout => Some(Block::Container { style }),
            _ => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Block::Html { html, style } => {
                format!(
                    r#"<div class="component component-text"{}>{}</div>"#,
                    style_attr(style),
                    html
                )
            }
            Block::Image { src, style } => format!(
                r#"<div class="component component-image"{}><img src="{}" alt=""></div>"#,
                style_attr(style),
                escape(src)
            ),
            Block::Video { src, style } => format!(
                r#"<div class="component component-video"{}><video src="{}" controls></video></div>"#,
                style_attr(style),
                escape(src)
            ),
            Block::Container { style } => format!(
                r#"<div class="component component-layout"{}></div>"#,
                style_attr(style)
            ),
        }
    }
}

/// A page's components as blocks, in stored order.
pub fn page_blocks(page: &Page) -> Vec<Block> {
    page.components
        .iter()
        .filter_map(Block::from_component)
        .collect()
}

pub fn page_to_html(page: &Page) -> String {
    let body: String = page_blocks(page).iter().map(Block::to_html).collect();
    format!(
        r#"<article class="page"><h1>{}</h1>{}</article>"#,
        escape(&page.title),
        body
    )
}

/// A post with its title, metadata line, featured image, body and tags.
pub fn post_to_html(post: &PostView) -> String {
    let mut meta = Vec::new();
    if let Some(author) = &post.author {
        meta.push(format!("By {}", escape(&author.username)));
    }
    meta.push(post.created_at.format("%B %-d, %Y").to_string());
    meta.push(escape(&post.category));
    meta.push(format!("{} views", post.views));

    let mut html = format!(
        r#"<article class="post"><h1>{}</h1><p class="post-meta">{}</p>"#,
        escape(&post.title),
        meta.join(" | ")
    );

    if let Some(image) = post.featured_image.as_deref().filter(|i| is_safe_src(i)) {
        html.push_str(&format!(
            r#"<img class="featured-image" src="{}" alt="{}">"#,
            escape(image),
            escape(&post.title)
        ));
    }

    html.push_str(&format!(
        r#"<div class="post-content">{}</div>"#,
        ammonia::clean(&post.content)
    ));

    if !post.tags.is_empty() {
        html.push_str(r#"<ul class="post-tags">"#);
        for tag in &post.tags {
            html.push_str(&format!("<li>{}</li>", escape(tag)));
        }
        html.push_str("</ul>");
    }

    html.push_str("</article>");
    html
}

/// http(s) URLs and site-relative paths such as `/uploads/cover.png`.
fn is_safe_src(src: &str) -> bool {
    let src = src.trim();
    src.starts_with("https://")
        || src.starts_with("http://")
        || (src.starts_with('/') && !src.starts_with("//"))
}

fn style_attr(style: &str) -> String {
    if style.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, escape(style))
    }
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pressroom_core::domain::{Author, ComponentType, StyleProperty};
    use uuid::Uuid;

    fn component(id: &str, kind: ComponentKind) -> Component {
        Component::new(id, kind)
    }

    fn page(components: Vec<Component>) -> Page {
        let now = Utc::now();
        Page {
            id: Uuid::new_v4(),
            title: "Home".to_string(),
            slug: "home".to_string(),
            layout: Vec::new(),
            components,
            created_by: Uuid::new_v4(),
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_blocks_keep_order_and_skip_unrenderable() {
        let page = page(vec![
            component("1", ComponentKind::new(ComponentType::Text, "<p>a</p>".into())),
            component(
                "2",
                ComponentKind::Unknown {
                    type_name: "carousel".into(),
                    content: "x".into(),
                },
            ),
            component("3", ComponentKind::new(ComponentType::Image, String::new())),
            component("4", ComponentKind::new(ComponentType::Image, "/a.png".into())),
            component("5", ComponentKind::Layout),
        ]);

        let blocks = page_blocks(&page);

        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[0], Block::Html { .. }));
        assert!(matches!(blocks[1], Block::Image { .. }));
        assert!(matches!(blocks[2], Block::Container { .. }));
    }

    #[test]
    fn test_attributes_are_escaped() {
        let mut image = component(
            "1",
            ComponentKind::new(ComponentType::Image, r#"/x.png" onerror="alert(1)"#.into()),
        );
        image.styles.set(StyleProperty::Color, "red");

        let html = Block::from_component(&image).unwrap().to_html();

        assert!(html.contains(r#"src="/x.png&quot; onerror=&quot;alert(1)""#));
        assert!(html.contains(r#"style="color: red""#));
    }

    #[test]
    fn test_post_html_includes_meta_and_tags() {
        let now = Utc::now();
        let post = PostView {
            id: Uuid::new_v4(),
            title: "Tom & Jerry".to_string(),
            slug: "tom-jerry".to_string(),
            content: "<p>Body</p>".to_string(),
            excerpt: None,
            category: "Cartoons".to_string(),
            tags: vec!["cats".to_string()],
            author: Some(Author {
                id: Uuid::new_v4(),
                username: "hanna".to_string(),
            }),
            featured_image: None,
            views: 3,
            created_at: now,
            updated_at: now,
        };

        let html = post_to_html(&post);

        assert!(html.contains("<h1>Tom &amp; Jerry</h1>"));
        assert!(html.contains("By hanna"));
        assert!(html.contains("3 views"));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.contains("<li>cats</li>"));
        assert!(!html.contains("featured-image"));
    }

    #[test]
    fn test_rich_text_is_sanitized() {
        let text = component(
            "1",
            ComponentKind::new(
                ComponentType::Text,
                "<p>Hi</p><script>alert(1)</script><img src=x onerror=alert(2)>".into(),
            ),
        );

        let html = Block::from_component(&text).unwrap().to_html();

        assert!(html.contains("<p>Hi</p>"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
    }

    #[test]
    fn test_unsafe_media_sources_render_nothing() {
        let hostile = [
            "javascript:alert(3)",
            " JavaScript:alert(3)",
            "data:text/html,x",
            "//evil.example/x.png",
        ];
        for src in hostile {
            let image = component("1", ComponentKind::new(ComponentType::Image, src.into()));
            assert!(Block::from_component(&image).is_none(), "{src}");

            let video = component("2", ComponentKind::new(ComponentType::Video, src.into()));
            assert!(Block::from_component(&video).is_none(), "{src}");
        }

        let local = component(
            "3",
            ComponentKind::new(ComponentType::Image, "/uploads/a.png".into()),
        );
        let remote = component(
            "4",
            ComponentKind::new(ComponentType::Video, "https://cdn.example/v.mp4".into()),
        );
        assert!(Block::from_component(&local).is_some());
        assert!(Block::from_component(&remote).is_some());
    }

    #[test]
    fn test_post_body_and_featured_image_are_sanitized() {
        let now = Utc::now();
        let post = PostView {
            id: Uuid::new_v4(),
            title: "Hostile".to_string(),
            slug: "hostile".to_string(),
            content: r#"<p onclick="steal()">Body</p><script>steal()</script>"#.to_string(),
            excerpt: None,
            category: "General".to_string(),
            tags: Vec::new(),
            author: None,
            featured_image: Some("javascript:steal()".to_string()),
            views: 0,
            created_at: now,
            updated_at: now,
        };

        let html = post_to_html(&post);

        assert!(html.contains("<p>Body</p>"));
        assert!(!html.contains("steal()"));
        assert!(!html.contains("featured-image"));
    }
}
