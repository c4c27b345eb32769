use std::io::Write;

use clap::{CommandFactory, Parser};
use tempfile::NamedTempFile;

use quire::client::{ApiCategory, ApiPost};

use crate::args::{CategoriesCmd, Cli, Commands, PostClearArgs, PostFieldArgs, PostsCmd};
use crate::context::{AdminError, check_store};
use crate::handlers::{categories, posts, preview};

fn tmp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write tmp");
    file
}

fn post(title: &str, categories: &[&str]) -> ApiPost {
    ApiPost {
        id: 7,
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        content: "Body text long enough".to_string(),
        description: String::new(),
        image: None,
        created_at: None,
        updated_at: None,
        published: true,
        categories: categories
            .iter()
            .enumerate()
            .map(|(index, name)| quire::client::ApiPostCategoryLink {
                post_id: 7,
                category_id: index as i32 + 1,
                category: ApiCategory {
                    id: index as i32 + 1,
                    name: name.to_string(),
                    slug: name.to_lowercase(),
                    description: None,
                    created_at: None,
                    updated_at: None,
                },
            })
            .collect(),
    }
}

#[test]
fn command_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn repeated_category_flags_collect_in_order() {
    let cli = Cli::try_parse_from([
        "quire-admin",
        "posts",
        "create",
        "--title",
        "Hello World",
        "--content",
        "Some long content",
        "--category-id",
        "2",
        "--category-id",
        "5",
        "--publish",
    ])
    .expect("parse");

    match cli.command {
        Commands::Posts(args) => match args.action {
            PostsCmd::Create { title, fields } => {
                assert_eq!(title, "Hello World");
                assert_eq!(fields.category_ids, vec![2, 5]);
                assert_eq!(fields.published(), Some(true));
            }
            other => panic!("unexpected command: {other:?}"),
        },
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn publish_and_draft_conflict() {
    let result = Cli::try_parse_from([
        "quire-admin",
        "posts",
        "update",
        "hello-world",
        "--publish",
        "--draft",
    ]);
    assert!(result.is_err());
}

#[test]
fn category_update_takes_slug() {
    let cli = Cli::try_parse_from(["quire-admin", "categories", "update", "design", "--name", "UX"])
        .expect("parse");
    match cli.command {
        Commands::Categories(args) => assert!(matches!(
            args.action,
            CategoriesCmd::Update { ref slug, name: Some(ref name), description: None, .. }
                if slug == "design" && name == "UX"
        )),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn read_value_prefers_file_over_inline() -> Result<(), AdminError> {
    let file = tmp_file("from-file");
    let val = crate::io::read_value(Some("inline".into()), Some(file.path().to_path_buf()))?;
    assert_eq!(val, "from-file");
    Ok(())
}

#[test]
fn read_value_requires_some_input() {
    let err = crate::io::read_value(None, None).expect_err("missing value should fail");
    assert!(matches!(err, AdminError::InvalidInput(_)));
}

#[test]
fn update_keeps_links_unless_asked() {
    let current = post("Hello World", &["Design", "Development"]);

    let untouched = posts::merge_update(
        &current,
        None,
        None,
        PostFieldArgs::default(),
        PostClearArgs::default(),
    );
    assert_eq!(untouched.category_ids, None);
    assert_eq!(untouched.title, "Hello World");
    assert!(untouched.published);
    assert_eq!(untouched.description, None);

    let cleared = posts::merge_update(
        &current,
        None,
        None,
        PostFieldArgs::default(),
        PostClearArgs {
            categories: true,
            ..PostClearArgs::default()
        },
    );
    assert_eq!(cleared.category_ids, Some(Vec::new()));

    let replaced = posts::merge_update(
        &current,
        Some("Hello Again".into()),
        None,
        PostFieldArgs {
            category_ids: vec![3],
            draft: true,
            ..PostFieldArgs::default()
        },
        PostClearArgs::default(),
    );
    assert_eq!(replaced.category_ids, Some(vec![3]));
    assert_eq!(replaced.title, "Hello Again");
    assert!(!replaced.published);
}

#[test]
fn category_update_keeps_description() {
    let current = ApiCategory {
        id: 3,
        name: "Design".into(),
        slug: "design".into(),
        description: Some("Visual things".into()),
        created_at: None,
        updated_at: None,
    };
    let input = categories::merge_update(&current, Some("UX Design".into()), None, false);
    assert_eq!(input.id, 3);
    assert_eq!(input.name, "UX Design");
    assert_eq!(input.description.as_deref(), Some("Visual things"));

    let cleared = categories::merge_update(&current, None, None, true);
    assert_eq!(cleared.name, "Design");
    assert_eq!(cleared.description, None);
}

#[test]
fn post_update_can_clear_image_and_description() {
    let mut current = post("Hello World", &["Design"]);
    current.description = "A short intro to things".into();
    current.image = Some("https://images.example.com/cover.png".into());

    let kept = posts::merge_update(
        &current,
        None,
        None,
        PostFieldArgs::default(),
        PostClearArgs::default(),
    );
    assert_eq!(kept.description.as_deref(), Some("A short intro to things"));
    assert_eq!(kept.image.as_deref(), Some("https://images.example.com/cover.png"));

    let cleared = posts::merge_update(
        &current,
        None,
        None,
        PostFieldArgs::default(),
        PostClearArgs {
            image: true,
            description: true,
            ..PostClearArgs::default()
        },
    );
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.image, None);
    assert_eq!(cleared.category_ids, None);
}

#[test]
fn clear_flags_parse_and_conflict_with_values() {
    let cli = Cli::try_parse_from([
        "quire-admin",
        "posts",
        "update",
        "hello-world",
        "--clear-image",
        "--clear-description",
    ])
    .expect("parse");
    match cli.command {
        Commands::Posts(args) => match args.action {
            PostsCmd::Update { clear, .. } => {
                assert!(clear.image && clear.description && !clear.categories);
            }
            other => panic!("unexpected command: {other:?}"),
        },
        other => panic!("unexpected command: {other:?}"),
    }

    let conflicting = Cli::try_parse_from([
        "quire-admin",
        "posts",
        "update",
        "hello-world",
        "--image",
        "https://images.example.com/a.png",
        "--clear-image",
    ]);
    assert!(conflicting.is_err());

    let conflicting = Cli::try_parse_from([
        "quire-admin",
        "categories",
        "update",
        "design",
        "--description",
        "Visual things",
        "--clear-description",
    ]);
    assert!(conflicting.is_err());
}

#[test]
fn listing_ignores_out_of_range_page() {
    let posts: Vec<ApiPost> = (0..8).map(|n| post(&format!("Post {n}"), &["Design"])).collect();

    let listing = posts::listing_for(&posts, None, None, 2);
    assert_eq!(listing.page(), 2);

    let listing = posts::listing_for(&posts, None, Some("Design".into()), 5);
    assert_eq!(listing.page(), 1);

    let listing = posts::listing_for(&posts, Some("post 3".into()), None, 1);
    assert_eq!(listing.view(&posts).total_matches, 1);
}

#[test]
fn preview_outlines_blocks() {
    let outline = preview::render_outline("## Intro\n\n- a\n- b\n\n1. one\n2. two\n\nPlain text");
    assert_eq!(
        outline,
        "[h2] Intro\n[ul]\n  - a\n  - b\n[ol]\n  1. one\n  2. two\n[p] Plain text\n"
    );
}

#[test]
fn store_errors_win_over_success() {
    assert!(check_store(true, None).is_ok());
    assert!(matches!(
        check_store(true, Some("refresh failed".into())),
        Err(AdminError::Store(message)) if message == "refresh failed"
    ));
    assert!(matches!(check_store(false, None), Err(AdminError::Store(_))));
}
