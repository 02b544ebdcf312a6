//! `uidoc serve` command - local documentation server
//!
//! Every request loads a fresh snapshot of the site, so edits to schemas,
//! templates and examples show up on the next reload without restarting.

use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use console::style;
use miette::{IntoDiagnostic, Result};
use serde_json::json;
use std::sync::Arc;

use crate::cli::GlobalOpts;
use crate::compose::compose;
use crate::core::{Config, Site};
use crate::pages::{self, PageRenderer};

use super::{init_tracing, open_site, report_failures, resolve_language, Snapshot};

#[derive(clap::Args, Debug)]
pub struct ServeArgs {
    /// Port to listen on (default: site config, then 4000)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}

#[derive(Clone)]
struct AppState {
    site: Arc<Site>,
    language: String,
}

pub fn run(args: ServeArgs, global: &GlobalOpts) -> Result<()> {
    init_tracing(global);

    let site = open_site(global)?;
    let config = Config::load(Some(&site));
    let language = resolve_language(global, &config);
    let port = args.port.unwrap_or(config.port);

    // One eager load so startup reports broken records immediately
    let snapshot = Snapshot::load(&site)?;
    report_failures(&snapshot, global);
    if !global.quiet {
        println!(
            "{} Serving {} schema(s) at {}",
            style("✓").green(),
            snapshot.registry.len(),
            style(format!("http://localhost:{port}/")).cyan()
        );
    }
    drop(snapshot);

    let state = AppState {
        site: Arc::new(site),
        language,
    };

    let app = Router::new()
        .route("/", get(index))
        .route("/schemas.json", get(schemas_feed))
        .route("/templates.json", get(templates_feed))
        .route("/examples.json", get(examples_feed))
        .route("/topics.json", get(topics_feed))
        .route("/css/{file}", get(stylesheet))
        .route("/favicon.ico", get(|| async { StatusCode::NOT_FOUND }))
        .route("/{slug}", get(page))
        .with_state(state);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .into_diagnostic()?;
        axum::serve(listener, app).await.into_diagnostic()
    })
}

async fn index(State(state): State<AppState>) -> Response {
    let snapshot = match load_snapshot(&state) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };
    let renderer = match PageRenderer::new() {
        Ok(renderer) => renderer,
        Err(error) => return internal(error),
    };
    match renderer.index(&snapshot.registry) {
        Ok(html) => Html(html).into_response(),
        Err(error) => internal(error),
    }
}

/// How a request path maps onto the catalogue
#[derive(Debug, PartialEq, Eq)]
enum SlugTarget {
    /// `/<Type>`: documentation page
    Page(String),
    /// `/<Type>.json`: merged schema record
    Record(String),
    /// any other extension is a bad request, not a miss
    Invalid,
}

fn classify_slug(slug: &str) -> SlugTarget {
    if let Some(ty) = slug.strip_suffix(".json") {
        return SlugTarget::Record(ty.to_string());
    }
    match slug.rsplit_once('.') {
        Some(_) => SlugTarget::Invalid,
        None => SlugTarget::Page(slug.to_string()),
    }
}

/// `/<Type>` renders the documentation page; `/<Type>.json` serves the
/// merged schema record.
async fn page(UrlPath(slug): UrlPath<String>, State(state): State<AppState>) -> Response {
    let ty = match classify_slug(&slug) {
        SlugTarget::Invalid => {
            return (StatusCode::BAD_REQUEST, format!("/{slug} is invalid")).into_response();
        }
        SlugTarget::Record(ty) => {
            let snapshot = match load_snapshot(&state) {
                Ok(snapshot) => snapshot,
                Err(response) => return response,
            };
            return match snapshot.registry.get(&ty) {
                Ok(schema) => Json(schema.record().clone()).into_response(),
                Err(_) => (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "error": format!("schema \"{ty}\" not found") })),
                )
                    .into_response(),
            };
        }
        SlugTarget::Page(ty) => ty,
    };

    let snapshot = match load_snapshot(&state) {
        Ok(snapshot) => snapshot,
        Err(response) => return response,
    };

    let renderer = match PageRenderer::new() {
        Ok(renderer) => renderer,
        Err(error) => return internal(error),
    };

    match compose(&snapshot.registry, &snapshot.examples, &ty, &state.language) {
        Ok(view) => match renderer.schema_page(&view) {
            Ok(html) => Html(html).into_response(),
            Err(error) => internal(error),
        },
        // both "no such schema" and "no such localization" are 404s
        Err(error) => (
            StatusCode::NOT_FOUND,
            Html(renderer.not_found(&error.to_string())),
        )
            .into_response(),
    }
}

async fn schemas_feed(State(state): State<AppState>) -> Response {
    match load_snapshot(&state) {
        Ok(snapshot) => Json(snapshot.registry.records()).into_response(),
        Err(response) => response,
    }
}

async fn templates_feed(State(state): State<AppState>) -> Response {
    match load_snapshot(&state) {
        Ok(snapshot) => Json(snapshot.templates.to_json()).into_response(),
        Err(response) => response,
    }
}

async fn examples_feed(State(state): State<AppState>) -> Response {
    match load_snapshot(&state) {
        Ok(snapshot) => Json(snapshot.examples.records()).into_response(),
        Err(response) => response,
    }
}

async fn topics_feed(State(state): State<AppState>) -> Response {
    match load_snapshot(&state) {
        Ok(snapshot) => Json(snapshot.registry.topic_names()).into_response(),
        Err(response) => response,
    }
}

/// Site stylesheets win; the embedded defaults back any name the site
/// does not provide.
async fn stylesheet(UrlPath(file): UrlPath<String>, State(state): State<AppState>) -> Response {
    if file.contains('/') || file.contains("..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let site_css = state.site.css_dir().join(&file);
    let body = std::fs::read(&site_css)
        .ok()
        .or_else(|| pages::embedded_css(&file));

    match body {
        Some(bytes) => ([(header::CONTENT_TYPE, "text/css")], bytes).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn load_snapshot(state: &AppState) -> std::result::Result<Snapshot, Response> {
    Snapshot::load(&state.site).map_err(|error| internal(error))
}

fn internal(error: impl std::fmt::Display) -> Response {
    tracing::error!(%error, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response()
}
