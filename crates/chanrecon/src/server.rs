use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chanrecon_lineup::{render_document, render_failure};
use chrono::Local;
use tokio::net::TcpListener;
use tracing::{error, info};
use utoipa::OpenApi;

use crate::reconciler::Reconciler;

#[derive(OpenApi)]
#[openapi(
    info(description = "chanrecon API"),
    paths(get_channels)
)]
pub struct ApiDoc;

pub fn router(state: Arc<Reconciler>) -> Router {
    let api = Router::new()
        .route("/channels", get(get_channels))
        .route("/openapi.json", get(async || Json(ApiDoc::openapi())))
        .with_state(state.clone());

    Router::new()
        .route("/", get(get_report))
        .with_state(state)
        .nest("/api", api)
}

pub async fn serve(addr: SocketAddr, state: Arc<Reconciler>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&addr).await?;

    info!("Listening on http://{}", &addr);

    axum::serve(listener, router(state)).await?;

    Ok(())
}

mod model {
    use chanrecon_lineup::ChannelRecord;
    use chrono::NaiveDateTime;
    use serde::Serialize;
    use utoipa::ToSchema;

    #[derive(Serialize, ToSchema)]
    pub struct Channel {
        pub chanid: u64,
        pub channum: String,
        pub freqid: String,
        pub name: String,
        pub display_name: String,
        pub visible: bool,
        /// `null` when the XMLTV database does not list the channel.
        pub xmltv_selected: Option<bool>,
        pub mismatch: bool,
    }

    impl From<&ChannelRecord> for Channel {
        fn from(value: &ChannelRecord) -> Self {
            Self {
                chanid: value.chanid,
                channum: value.number.to_string(),
                freqid: value.freqid.clone(),
                name: value.name.clone(),
                display_name: value.display_name().to_string(),
                visible: value.visible.is_on(),
                xmltv_selected: value.xmltv_selected.flag().map(|flag| flag.is_on()),
                mismatch: value.is_mismatch(),
            }
        }
    }

    #[derive(Serialize, ToSchema)]
    pub struct Lineup {
        pub generated_at: NaiveDateTime,
        pub channels: Vec<Channel>,
    }
}

async fn get_report(State(reconciler): State<Arc<Reconciler>>) -> (StatusCode, Html<String>) {
    match reconciler.reconcile().await {
        Ok(report) => {
            let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

            (StatusCode::OK, Html(render_document(&report, &generated_at)))
        }
        Err(err) => {
            error!("Failed to reconcile the channel lineup: {err:#}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_failure(&format!("{err:#}"))),
            )
        }
    }
}

#[utoipa::path(
    get,
    path = "/channels",
    responses((status = 200, body = model::Lineup), (status = INTERNAL_SERVER_ERROR)),
)]
async fn get_channels(
    State(reconciler): State<Arc<Reconciler>>,
) -> Result<Json<model::Lineup>, StatusCode> {
    let report = reconciler.reconcile().await.map_err(|err| {
        error!("Failed to reconcile the channel lineup: {err:#}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(model::Lineup {
        generated_at: Local::now().naive_local(),
        channels: report.channels.iter().map(model::Channel::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{Config, MythtvConfig};

    fn unreachable_reconciler() -> Arc<Reconciler> {
        let config = Config {
            mythtv: MythtvConfig {
                host: "127.0.0.1".to_string(),
                port: 1,
                ..MythtvConfig::default()
            },
            ..Config::default()
        };

        Arc::new(Reconciler::new(&config))
    }

    #[tokio::test]
    async fn test_report_failure_page() {
        let response = router(unreachable_reconciler())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains("Channel Reconciliation Failed"));
        assert!(body.contains("connecting to the MythTV database"));
        assert!(!body.contains("<table"));
    }

    #[tokio::test]
    async fn test_channels_failure_status() {
        let response = router(unreachable_reconciler())
            .oneshot(Request::get("/api/channels").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_openapi_lists_channels() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/channels"));
    }
}
