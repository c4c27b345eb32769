use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use url::form_urlencoded;

use crate::application::error::{ErrorReport, HttpError};
use crate::application::listing::ALL_CATEGORIES;
use crate::application::site::{IndexContent, PostDetail};
use crate::domain::blocks::ContentBlock;
use crate::domain::entities::PostWithCategories;

const HUMAN_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        HttpError::from_error(
            "presentation::views::render_template",
            StatusCode::INTERNAL_SERVER_ERROR,
            "Template rendering failed",
            &err,
        )
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let view = LayoutContext::new(chrome, ErrorPageView::not_found());
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message("presentation::views::not_found", "no page at this address")
        .attach(&mut response);
    response
}

/// Site-wide strings shared by every page.
#[derive(Debug, Clone)]
pub struct LayoutChrome {
    pub site_title: String,
    pub tagline: String,
}

#[derive(Debug, Clone)]
pub struct LayoutContext<T> {
    pub chrome: LayoutChrome,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self { chrome, content }
    }
}

#[derive(Debug, Clone)]
pub struct PostCardView {
    pub title: String,
    pub href: String,
    pub description: String,
    pub date: String,
    pub has_image: bool,
    pub image: String,
    pub categories: Vec<String>,
}

impl From<&PostWithCategories> for PostCardView {
    fn from(value: &PostWithCategories) -> Self {
        let post = &value.post;
        Self {
            title: post.title.clone(),
            href: post_href(&post.slug),
            description: post.description.clone(),
            date: human_date(post.created_at),
            has_image: post.image.is_some(),
            image: post.image.clone().unwrap_or_default(),
            categories: value.category_names().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CategoryOptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct PageLinkView {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

#[derive(Debug, Clone)]
pub struct IndexView {
    pub query: String,
    pub recent: Vec<PostCardView>,
    pub posts: Vec<PostCardView>,
    pub categories: Vec<CategoryOptionView>,
    pub pages: Vec<PageLinkView>,
    pub has_previous: bool,
    pub previous_href: String,
    pub has_next: bool,
    pub next_href: String,
    pub total_matches: usize,
    pub filtered: bool,
}

impl From<IndexContent> for IndexView {
    fn from(content: IndexContent) -> Self {
        let listing = &content.listing;
        let query = listing.query().to_string();
        let category = listing.category().map(str::to_string);
        let page = listing.page();
        let total_pages = content.total_pages;

        let mut categories = vec![CategoryOptionView {
            value: String::new(),
            label: ALL_CATEGORIES.to_string(),
            selected: category.is_none(),
        }];
        categories.extend(content.category_names.iter().map(|name| CategoryOptionView {
            value: name.clone(),
            label: name.clone(),
            selected: category.as_deref() == Some(name.as_str()),
        }));

        let href = |number: usize| index_href(&query, category.as_deref(), number);
        let pages = (1..=total_pages)
            .map(|number| PageLinkView {
                number,
                href: href(number),
                current: number == page,
            })
            .collect();

        Self {
            recent: content.recent.iter().map(PostCardView::from).collect(),
            posts: content.posts.iter().map(PostCardView::from).collect(),
            categories,
            pages,
            has_previous: page > 1,
            previous_href: href(page.saturating_sub(1).max(1)),
            has_next: page < total_pages,
            next_href: href((page + 1).min(total_pages)),
            total_matches: content.total_matches,
            filtered: !query.trim().is_empty() || category.is_some(),
            query,
        }
    }
}

/// One display block. `kind` is `h2`, `h3`, `ul`, `ol` or `p`; lists use
/// `items`, the rest use `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockView {
    pub kind: &'static str,
    pub text: String,
    pub items: Vec<String>,
}

impl From<ContentBlock> for BlockView {
    fn from(block: ContentBlock) -> Self {
        let (kind, text, items) = match block {
            ContentBlock::Heading2(text) => ("h2", text, Vec::new()),
            ContentBlock::Heading3(text) => ("h3", text, Vec::new()),
            ContentBlock::UnorderedList(items) => ("ul", String::new(), items),
            ContentBlock::OrderedList(items) => ("ol", String::new(), items),
            ContentBlock::Paragraph(text) => ("p", text, Vec::new()),
        };
        Self { kind, text, items }
    }
}

#[derive(Debug, Clone)]
pub struct PostDetailView {
    pub card: PostCardView,
    pub blocks: Vec<BlockView>,
}

impl From<PostDetail> for PostDetailView {
    fn from(detail: PostDetail) -> Self {
        Self {
            card: PostCardView::from(&detail.post),
            blocks: detail.blocks.into_iter().map(BlockView::from).collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorPageView {
    pub status: u16,
    pub title: String,
    pub message: String,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            status: 404,
            title: "Page not found".to_string(),
            message: "The post you are looking for does not exist or is not published yet."
                .to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub view: LayoutContext<IndexView>,
}

#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate {
    pub view: LayoutContext<PostDetailView>,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

pub fn post_href(slug: &str) -> String {
    format!("/posts/{slug}")
}

/// Listing URL that keeps the active search and category.
pub fn index_href(query: &str, category: Option<&str>, page: usize) -> String {
    let mut params = form_urlencoded::Serializer::new(String::new());
    if !query.is_empty() {
        params.append_pair("q", query);
    }
    if let Some(category) = category {
        params.append_pair("category", category);
    }
    if page > 1 {
        params.append_pair("page", &page.to_string());
    }
    let encoded = params.finish();
    if encoded.is_empty() {
        "/".to_string()
    } else {
        format!("/?{encoded}")
    }
}

fn human_date(at: OffsetDateTime) -> String {
    at.format(HUMAN_DATE_FORMAT).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn index_href_keeps_filters() {
        assert_eq!(index_href("", None, 1), "/");
        assert_eq!(index_href("rust lang", None, 2), "/?q=rust+lang&page=2");
        assert_eq!(
            index_href("", Some("Design & UX"), 1),
            "/?category=Design+%26+UX"
        );
    }

    #[test]
    fn human_date_is_long_form() {
        assert_eq!(human_date(datetime!(2024-03-05 08:00 UTC)), "March 5, 2024");
    }

    #[test]
    fn blocks_map_to_tags() {
        let view = BlockView::from(ContentBlock::OrderedList(vec!["a".into()]));
        assert_eq!(view.kind, "ol");
        assert_eq!(view.items, vec!["a".to_string()]);
        assert_eq!(BlockView::from(ContentBlock::Heading3("x".into())).kind, "h3");
    }
}
