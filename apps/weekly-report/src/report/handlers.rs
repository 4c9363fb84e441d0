use axum::{
    extract::{Form, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::render::{render_file, RenderError, DOCX_MIME};
use crate::report::form::{record_from_form, FormFields};
use crate::report::normalize::normalize_record;
use crate::report::store::{load_previous, save_record};
use crate::report::week::week_or_current;
use crate::report::ReportRecord;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");
const FILE_PREFIX: &str = "[CAP Weekly Report]";
const FALLBACK_FILE_NAME: &str = "Report";
const FORBIDDEN_FILE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/defaults
pub async fn handle_defaults(State(state): State<AppState>) -> Json<ReportRecord> {
    let mut record = if state.config.persist_yaml {
        load_previous(&state.config.input_file)
    } else {
        ReportRecord::default()
    };
    record.week = week_or_current(&record.week);
    if record.name_for_file.as_deref().map_or(true, |s| s.trim().is_empty()) {
        record.name_for_file = Some(record.name.clone());
    }
    Json(record)
}

/// POST /generate
pub async fn handle_generate(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let mut record = record_from_form(&FormFields::new(pairs));
    validate_required(&record)?;
    normalize_record(&mut record);

    let template = state.config.template_path.clone();
    if !template.exists() {
        return Err(RenderError::TemplateNotFound(template).into());
    }

    if state.config.persist_yaml {
        save_record(&state.config.input_file, &record)?;
    }

    let file_name = download_file_name(record.file_name_stem());
    let bytes = tokio::task::spawn_blocking(move || render_file(&template, &record))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    info!("Generated report '{}' ({} bytes)", file_name, bytes.len());

    let disposition = HeaderValue::from_str(&content_disposition(&file_name))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid Content-Disposition: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_MIME)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

fn validate_required(record: &ReportRecord) -> Result<(), AppError> {
    let missing: Vec<&str> = [
        ("Name", &record.name),
        ("Role", &record.role),
        ("Week", &record.week),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(label, _)| label)
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} required",
            missing.join(", ")
        )))
    }
}

/// Removes characters Windows and macOS refuse in file names.
pub fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !FORBIDDEN_FILE_CHARS.contains(c) && !c.is_control())
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

pub fn download_file_name(name: &str) -> String {
    format!("{FILE_PREFIX} {}.docx", safe_file_name(name))
}

/// `attachment` header with an ASCII fallback and the UTF-8 name in `filename*`.
fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    let mut encoded = String::with_capacity(file_name.len() * 3);
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name_strips_forbidden_chars() {
        assert_eq!(safe_file_name("Dana/Smith: \"QA\"?"), "DanaSmith QA");
        assert_eq!(safe_file_name("  <>|*  "), "Report");
        assert_eq!(safe_file_name(""), "Report");
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(
            download_file_name("Dana Smith"),
            "[CAP Weekly Report] Dana Smith.docx"
        );
    }

    #[test]
    fn test_content_disposition_encodes_non_ascii() {
        let header = content_disposition("[CAP Weekly Report] Zoë.docx");
        assert!(header.starts_with("attachment; filename=\"[CAP Weekly Report] Zo_.docx\""));
        assert!(header.contains("filename*=UTF-8''%5BCAP%20Weekly%20Report%5D%20Zo%C3%AB.docx"));
    }

    #[test]
    fn test_validate_required_lists_missing_fields() {
        let record = ReportRecord {
            name: "Dana".to_string(),
            ..Default::default()
        };
        match validate_required(&record) {
            Err(AppError::Validation(msg)) => assert_eq!(msg, "Role, Week required"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
