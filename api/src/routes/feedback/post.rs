use crate::response::error_response;
use crate::state::AppState;
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use marker::FeedbackJob;
use marker::error::MarkerError;
use marker::types::Submission;
use serde_json::Value;

/// POST /retroalimentacion
///
/// Generates feedback for one submission. The body is read raw so that malformed JSON can be
/// reported with a sample of what was received.
///
/// ### Request Body
/// ```json
/// {
///   "codigo": "def f(n):\n    return n * 2",
///   "enunciado": "Duplica un número",
///   "codigo_base": "",
///   "casos_prueba": [{"entrada": 2, "salida": 4}],
///   "restricciones": "Obligaciones:\n- usar return",
///   "resultados_casos": {"cases": [{"id": "c1", "ok": true}]}
/// }
/// ```
/// Every field is optional. `instrucciones` is accepted in place of `restricciones`, and
/// `biotes_log` in place of `resultados_casos`.
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "retroalimentacion": "Corrección\n...\nNOTA_IA: 9 - claro",
///   "nota": "10",
///   "nota_tests": "10",
///   "nota_ia": "9",
///   "nota_ia_comentario": "claro"
/// }
/// ```
///
/// - `400 Bad Request` (body is not a JSON object)
/// ```json
/// { "success": false, "data": { "raw_sample": "{nope" }, "message": "JSON inválido: ..." }
/// ```
///
/// - `500 Internal Server Error` (missing API key, checked before the body is read)
/// - `502 Bad Gateway` (network failure or unexpected response from OpenRouter)
/// - any other status returned by OpenRouter, with its body under `data.openrouter_error`
pub async fn generate_feedback(State(state): State<AppState>, body: Bytes) -> Response {
    if let Err(err) = state.generator().check_credentials() {
        return error_response(&err).into_response();
    }

    let value: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            let err = MarkerError::invalid_request(format!("JSON inválido: {e}"), &body);
            return error_response(&err).into_response();
        }
    };

    let Some(submission) = Submission::from_json(&value) else {
        let err = MarkerError::invalid_request("El cuerpo debe ser un objeto JSON", &body);
        return error_response(&err).into_response();
    };

    let job = FeedbackJob::new(submission, state.generator())
        .with_limits(state.limits())
        .with_settings(state.settings());

    match job.run().await {
        Ok(result) => {
            tracing::info!(
                nota = %result.nota,
                nota_tests = %result.nota_tests,
                nota_ia = %result.nota_ia,
                "feedback generated"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => error_response(&err).into_response(),
    }
}
