use quire::client::ApiCategory;
use quire::domain::validation::CategoryDraft;
use quire_rpc_types::{CategoryInput, CategoryUpdateInput};

use crate::args::CategoriesCmd;
use crate::context::{AdminError, Ctx, check_store};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: CategoriesCmd) -> Result<(), AdminError> {
    match cmd {
        CategoriesCmd::List => list(ctx).await,
        CategoriesCmd::Show { slug } => show(ctx, &slug).await,
        CategoriesCmd::Create { name, description } => create(ctx, name, description).await,
        CategoriesCmd::Update {
            slug,
            name,
            description,
            clear_description,
        } => update(ctx, &slug, name, description, clear_description).await,
        CategoriesCmd::Delete { id } => delete(ctx, id).await,
    }
}

async fn list(ctx: &Ctx) -> Result<(), AdminError> {
    ctx.categories.fetch_categories().await;
    let state = ctx.categories.snapshot();
    check_store(true, state.error)?;
    print_json(&state.categories)
}

async fn show(ctx: &Ctx, slug: &str) -> Result<(), AdminError> {
    let category = ctx
        .client
        .category_by_slug(slug)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("category `{slug}`")))?;
    print_json(&category)
}

async fn create(ctx: &Ctx, name: String, description: Option<String>) -> Result<(), AdminError> {
    let draft = CategoryDraft::parse(&name, description.as_deref())?;
    let ok = ctx
        .categories
        .create_category(CategoryInput { name, description })
        .await;
    let state = ctx.categories.snapshot();
    check_store(ok, state.error)?;
    print_json(&find_by_slug(&state.categories, &draft.slug))
}

async fn update(
    ctx: &Ctx,
    slug: &str,
    name: Option<String>,
    description: Option<String>,
    clear_description: bool,
) -> Result<(), AdminError> {
    let current = ctx
        .client
        .category_by_slug(slug)
        .await?
        .ok_or_else(|| AdminError::NotFound(format!("category `{slug}`")))?;

    let input = merge_update(&current, name, description, clear_description);
    let draft = CategoryDraft::parse(&input.name, input.description.as_deref())?;
    let ok = ctx.categories.update_category(input).await;
    let state = ctx.categories.snapshot();
    check_store(ok, state.error)?;
    print_json(&find_by_slug(&state.categories, &draft.slug))
}

async fn delete(ctx: &Ctx, id: i32) -> Result<(), AdminError> {
    let ok = ctx.categories.delete_category(id).await;
    let state = ctx.categories.snapshot();
    check_store(ok, state.error)?;
    print_json(&serde_json::json!({ "deleted": id, "remaining": state.count }))
}

/// Overlays the given fields on the current category.
pub fn merge_update(
    current: &ApiCategory,
    name: Option<String>,
    description: Option<String>,
    clear_description: bool,
) -> CategoryUpdateInput {
    let description = if clear_description {
        None
    } else {
        description.or_else(|| current.description.clone())
    };
    CategoryUpdateInput {
        id: current.id,
        name: name.unwrap_or_else(|| current.name.clone()),
        description,
    }
}

fn find_by_slug<'a>(categories: &'a [ApiCategory], slug: &str) -> Option<&'a ApiCategory> {
    categories.iter().find(|category| category.slug == slug)
}
