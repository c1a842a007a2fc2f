mod common;

use std::time::Duration;

use cafe_api::{
    dto::content::{
        CreateCarouselImageRequest, CreateNewsRequest, CreatePageContentRequest, NewsQuery,
        PageContentQuery, UpdateNewsRequest,
    },
    error::AppError,
    models::NewsArticle,
    services::content_service,
};

async fn article(
    app: &common::TestApp,
    title: &str,
    featured: bool,
    published: bool,
) -> anyhow::Result<NewsArticle> {
    let resp = content_service::create_article(
        &app.state,
        &app.admin,
        CreateNewsRequest {
            title: title.into(),
            excerpt: format!("{title}..."),
            content: "<p>Novedades</p>".into(),
            author: "Equipo".into(),
            category: "eventos".into(),
            featured,
            image: None,
            tags: vec!["cafe".into()],
            published,
        },
    )
    .await?;
    Ok(resp.data.expect("article"))
}

#[tokio::test]
async fn news_list_hides_drafts_and_honours_filters() -> anyhow::Result<()> {
    let app = common::setup().await?;
    article(&app, "Nuevo tueste", true, true).await?;
    article(&app, "Horario de verano", false, true).await?;
    article(&app, "Brunch", false, true).await?;
    let draft = article(&app, "Borrador", true, false).await?;

    let all = content_service::list_published_news(&app.state, NewsQuery::default()).await?;
    let all = all.data.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.iter().all(|a| a.published));

    let featured = content_service::list_published_news(
        &app.state,
        NewsQuery {
            featured_only: true,
            limit: None,
        },
    )
    .await?;
    let featured = featured.data.unwrap();
    assert_eq!(featured.len(), 1);
    assert_eq!(featured[0].title, "Nuevo tueste");

    let limited = content_service::list_published_news(
        &app.state,
        NewsQuery {
            featured_only: false,
            limit: Some(2),
        },
    )
    .await?;
    assert_eq!(limited.data.unwrap().len(), 2);

    let err = content_service::get_published_article(&app.state, draft.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn news_update_bumps_updated_at() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let original = article(&app, "Cata de café", false, true).await?;
    tokio::time::sleep(Duration::from_millis(20)).await;

    let updated = content_service::update_article(
        &app.state,
        &app.admin,
        original.id,
        UpdateNewsRequest::default(),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.title, original.title);
    assert!(updated.updated_at > original.updated_at);
    Ok(())
}

#[tokio::test]
async fn carousel_lists_active_images_by_position() -> anyhow::Result<()> {
    let app = common::setup().await?;
    for (title, active, position) in [
        ("Terraza", true, 2),
        ("Desayunos", true, 1),
        ("Oculta", false, 0),
    ] {
        content_service::create_carousel_image(
            &app.state,
            &app.admin,
            CreateCarouselImageRequest {
                title: title.into(),
                subtitle: None,
                description: None,
                image: format!("/uploads/products/{position}.jpg"),
                link: None,
                active,
                order_position: position,
            },
        )
        .await?;
    }

    let public = content_service::list_active_carousel(&app.state).await?.data.unwrap();
    let titles: Vec<_> = public.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Desayunos", "Terraza"]);

    let admin = content_service::list_all_carousel(&app.state, &app.admin).await?;
    assert_eq!(admin.data.unwrap().len(), 3);
    Ok(())
}

#[tokio::test]
async fn page_content_ids_are_unique_and_lists_filter_by_page() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let block = |id: &str, page: &str, section: &str| CreatePageContentRequest {
        id: id.into(),
        title: id.into(),
        content: "Texto".into(),
        section: section.into(),
        page: page.into(),
    };
    for (id, page, section) in [
        ("home-hero", "home", "hero"),
        ("home-story", "home", "story"),
        ("about-story", "about", "story"),
    ] {
        content_service::create_page_content(&app.state, &app.admin, block(id, page, section))
            .await?;
    }

    let err = content_service::create_page_content(
        &app.state,
        &app.admin,
        block("home-hero", "home", "hero"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("home-hero")));

    let list = |page: Option<&str>, section: Option<&str>| PageContentQuery {
        page: page.map(str::to_owned),
        section: section.map(str::to_owned),
    };

    let home = content_service::list_page_content(&app.state, list(Some("home"), None)).await?;
    assert_eq!(home.data.unwrap().len(), 2);

    let hero =
        content_service::list_page_content(&app.state, list(Some("home"), Some("hero"))).await?;
    let hero = hero.data.unwrap();
    assert_eq!(hero.len(), 1);
    assert_eq!(hero[0].id, "home-hero");

    // A section without a page is ignored.
    let everything =
        content_service::list_page_content(&app.state, list(None, Some("story"))).await?;
    assert_eq!(everything.data.unwrap().len(), 3);
    Ok(())
}
