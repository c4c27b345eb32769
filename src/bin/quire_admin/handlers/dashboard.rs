use serde_json::json;

use crate::context::{AdminError, Ctx, check_store};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx) -> Result<(), AdminError> {
    tokio::join!(
        ctx.posts.fetch_posts(),
        ctx.posts.fetch_posts_count(),
        ctx.categories.fetch_categories_count(),
    );

    let posts = ctx.posts.snapshot();
    check_store(true, posts.error)?;
    let categories = ctx.categories.snapshot();
    check_store(true, categories.error)?;

    let recent: Vec<_> = posts
        .recent_posts
        .iter()
        .map(|post| {
            json!({
                "id": post.id,
                "title": post.title,
                "slug": post.slug,
                "published": post.published,
                "createdAt": post.created_at,
            })
        })
        .collect();

    print_json(&json!({
        "posts": posts.count.unwrap_or(0),
        "categories": categories.count.unwrap_or(0),
        "recentPosts": recent,
    }))
}
