use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use ubl_create::models::{Error, InvoiceRecord, ValidationResponse};
use ubl_create::{logging, rips, ubl, ServerConfig, DEFAULT_CONFIG_PATH};

#[derive(Clone)]
struct AppState {
    config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    // Charge la configuration du serveur
    let config = ServerConfig::load(DEFAULT_CONFIG_PATH)?;
    if let Some(ref dir) = config.xml_storage {
        tokio::fs::create_dir_all(dir).await?;
    }

    let bind = config.bind.clone();
    let app_state = Arc::new(AppState { config });

    let app = Router::new()
        .route("/invoice", post(create_invoice))
        .route("/rips", post(create_rips))
        .route("/version", get(versions))
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    tracing::info!(%bind, "serveur de génération UBL démarré");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Réponse d'erreur au format JSON
fn error_response(status: StatusCode, error: &Error) -> Response {
    let response = ValidationResponse::with_errors(vec![error.to_field_error()]);
    (status, Json(response)).into_response()
}

fn xml_response(xml: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml,
    )
        .into_response()
}

/// Nom du fichier XML conservé pour une facture
fn storage_file_name(invoice_id: &str) -> String {
    format!("factura_{}.xml", invoice_id.replace(['/', '\\', ' '], "_"))
}

/// Génération d'une facture UBL à partir d'un corps JSON
async fn create_invoice(State(state): State<Arc<AppState>>, body: String) -> Response {
    // Phase de validation : aucune génération si un champ manque
    let record = match InvoiceRecord::from_json_str(&body) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!(error = %e, "facture refusée");
            return error_response(StatusCode::BAD_REQUEST, &e);
        }
    };

    let xml = match ubl::build(&record) {
        Ok(xml) => xml,
        Err(e) => {
            tracing::error!(invoice = %record.id, error = %e, "échec de génération XML");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e);
        }
    };

    // Copie optionnelle sur disque
    if let Some(ref dir) = state.config.xml_storage {
        let path = PathBuf::from(dir).join(storage_file_name(&record.id));
        let document = xml.clone();
        match tokio::task::spawn_blocking(move || ubl::write_document(&document, path)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::error!(invoice = %record.id, error = %e, "échec d'écriture");
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, &e);
            }
            Err(e) => {
                tracing::error!(invoice = %record.id, error = %e, "tâche d'écriture interrompue");
                let io = std::io::Error::new(std::io::ErrorKind::Other, e.to_string());
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, &Error::Io(io));
            }
        }
    }

    xml_response(xml)
}

/// Génération RIPS : toujours 200, une entrée mal formée donne count="0"
async fn create_rips(body: String) -> Response {
    xml_response(rips::generate_from_str(&body))
}

#[derive(Serialize)]
struct VersionResponse {
    ubl: &'static str,
    rips: &'static str,
}

async fn versions() -> Json<VersionResponse> {
    Json(VersionResponse {
        ubl: ubl::version(),
        rips: rips::version(),
    })
}
