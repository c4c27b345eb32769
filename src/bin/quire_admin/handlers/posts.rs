use quire::application::listing::{ListingState, total_pages};
use quire::client::ApiPost;
use quire::domain::validation::{PostDraft, PostFields};
use quire_rpc_types::{PostInput, PostUpdateInput};
use serde_json::json;

use crate::args::{PostClearArgs, PostFieldArgs, PostsCmd};
use crate::context::{AdminError, Ctx, check_store};
use crate::io::{read_opt_value, read_value};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), AdminError> {
    match cmd {
        PostsCmd::List {
            search,
            category,
            page,
        } => list(ctx, search, category, page).await,
        PostsCmd::Show { slug } => show(ctx, &slug).await,
        PostsCmd::ByCategory { category_id } => by_category(ctx, category_id).await,
        PostsCmd::Create { title, fields } => create(ctx, title, fields).await,
        PostsCmd::Update {
            slug,
            title,
            fields,
            clear,
        } => update(ctx, &slug, title, fields, clear).await,
        PostsCmd::Delete { id } => delete(ctx, id).await,
    }
}

async fn list(
    ctx: &Ctx,
    search: Option<String>,
    category: Option<String>,
    page: usize,
) -> Result<(), AdminError> {
    let posts = ctx.posts.fetch_posts().await;
    check_store(true, ctx.posts.snapshot().error)?;

    let listing = listing_for(&posts, search, category, page);
    let view = listing.view(&posts);
    print_json(&json!({
        "page": view.page,
        "totalPages": view.total_pages,
        "totalMatches": view.total_matches,
        "posts": view.items,
    }))
}

/// Applies the filters in the order a reader would, so any filter change
/// starts from page 1 and an out-of-range page is ignored.
pub fn listing_for(
    posts: &[ApiPost],
    search: Option<String>,
    category: Option<String>,
    page: usize,
) -> ListingState {
    let mut listing = ListingState::new();
    if let Some(search) = search {
        listing.set_query(search);
    }
    if let Some(category) = category {
        listing.set_category(category);
    }
    let pages = total_pages(listing.filter(posts).len());
    if !listing.go_to_page(page, pages) && page != 1 {
        eprintln!("page {page} is out of range (1..={pages}); showing page 1");
    }
    listing
}

async fn show(ctx: &Ctx, slug: &str) -> Result<(), AdminError> {
    let post = ctx.posts.get_by_slug(slug).await;
    check_store(true, ctx.posts.snapshot().error)?;
    let post = post.ok_or_else(|| AdminError::NotFound(format!("post `{slug}`")))?;
    print_json(&post)
}

async fn by_category(ctx: &Ctx, category_id: i32) -> Result<(), AdminError> {
    let posts = ctx.posts.get_by_category(category_id).await;
    check_store(true, ctx.posts.snapshot().error)?;
    print_json(&posts)
}

async fn create(ctx: &Ctx, title: String, fields: PostFieldArgs) -> Result<(), AdminError> {
    let published = fields.published().unwrap_or(false);
    let PostFieldArgs {
        content,
        content_file,
        description,
        image,
        category_ids,
        ..
    } = fields;

    let input = PostInput {
        title,
        content: read_value(content, content_file)?,
        description,
        image,
        published,
        category_ids,
    };
    let draft = check_post(&PostFields {
        title: &input.title,
        content: &input.content,
        description: input.description.as_deref(),
        image: input.image.as_deref(),
        published: input.published,
        category_ids: Some(&input.category_ids),
    })?;

    let ok = ctx.posts.create_post(input).await;
    let state = ctx.posts.snapshot();
    check_store(ok, state.error)?;
    print_json(&find_by_slug(&state.posts, &draft.slug))
}

async fn update(
    ctx: &Ctx,
    slug: &str,
    title: Option<String>,
    fields: PostFieldArgs,
    clear: PostClearArgs,
) -> Result<(), AdminError> {
    let current = ctx.posts.get_by_slug(slug).await;
    check_store(true, ctx.posts.snapshot().error)?;
    let current = current.ok_or_else(|| AdminError::NotFound(format!("post `{slug}`")))?;

    let content = read_opt_value(fields.content.clone(), fields.content_file.clone())?;
    let input = merge_update(&current, title, content, fields, clear);
    let draft = check_post(&PostFields {
        title: &input.title,
        content: &input.content,
        description: input.description.as_deref(),
        image: input.image.as_deref(),
        published: input.published,
        category_ids: input.category_ids.as_deref(),
    })?;

    let ok = ctx.posts.update_post(input).await;
    let state = ctx.posts.snapshot();
    check_store(ok, state.error)?;
    print_json(&find_by_slug(&state.posts, &draft.slug))
}

async fn delete(ctx: &Ctx, id: i32) -> Result<(), AdminError> {
    let ok = ctx.posts.delete_post(id).await;
    let state = ctx.posts.snapshot();
    check_store(ok, state.error)?;
    print_json(&json!({ "deleted": id, "remaining": state.count }))
}

/// Overlays the given fields on the current post. Omitted fields keep
/// their value unless the matching `clear` flag is set; category links are
/// only sent when they change.
pub fn merge_update(
    current: &ApiPost,
    title: Option<String>,
    content: Option<String>,
    fields: PostFieldArgs,
    clear: PostClearArgs,
) -> PostUpdateInput {
    let published = fields.published().unwrap_or(current.published);
    let category_ids = if clear.categories {
        Some(Vec::new())
    } else if fields.category_ids.is_empty() {
        None
    } else {
        Some(fields.category_ids)
    };
    let description = if clear.description {
        None
    } else {
        fields.description.or_else(|| {
            Some(current.description.clone()).filter(|description| !description.is_empty())
        })
    };
    let image = if clear.image {
        None
    } else {
        fields.image.or_else(|| current.image.clone())
    };

    PostUpdateInput {
        id: current.id,
        title: title.unwrap_or_else(|| current.title.clone()),
        content: content.unwrap_or_else(|| current.content.clone()),
        description,
        image,
        published,
        category_ids,
    }
}

/// Runs the shared validation rules before anything is sent.
fn check_post(fields: &PostFields<'_>) -> Result<PostDraft, AdminError> {
    Ok(PostDraft::parse(*fields)?)
}

fn find_by_slug<'a>(posts: &'a [ApiPost], slug: &str) -> Option<&'a ApiPost> {
    posts.iter().find(|post| post.slug == slug)
}
